// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 metricast developers

//! Protocol string constraints for human-supplied names.
//!
//! Collectd identifiers (plugin, type, instances) allow ASCII letters,
//! digits, `-`, `_` and `.`, are at most 63 bytes long, and must not be
//! empty. Everything else is replaced by `_`. Both functions are pure,
//! deterministic, never fail, and are idempotent:
//! `name(name(x)) == name(x)` for every input.

use crate::config::{EMPTY_NAME_PLACEHOLDER, MAX_NAME_LEN};

/// Sanitize a plugin or type name.
pub fn name(raw: &str) -> String {
    sanitize(raw)
}

/// Sanitize an instance name.
///
/// Instance names sometimes arrive as path-like labels; leading and
/// trailing `/` are stripped before sanitization so they do not turn into
/// spurious underscores at the ends.
pub fn instance_name(raw: &str) -> String {
    sanitize(raw.trim_matches('/'))
}

fn sanitize(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len().min(MAX_NAME_LEN));
    for c in raw.chars() {
        if out.len() >= MAX_NAME_LEN {
            break;
        }
        if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
            out.push(c);
        } else {
            out.push('_');
        }
    }
    if out.is_empty() {
        return EMPTY_NAME_PLACEHOLDER.to_string();
    }
    out
}
