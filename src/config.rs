// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 metricast developers

//! Global configuration constants - single source of truth.
//!
//! This module centralizes the collectd network protocol defaults and the
//! reporter's own limits. **Never hardcode these elsewhere!**

/// Default collectd network plugin port (IANA registered for collectd).
pub const DEFAULT_COLLECTOR_PORT: u16 = 25826;

/// Default maximum datagram size in bytes.
///
/// Matches the default collectd network buffer and stays well inside the
/// path MTU of virtually all networks. Configurable via
/// [`crate::ReporterBuilder::with_max_packet_size`]; keeping the configured
/// value within the path MTU is the caller's responsibility.
pub const DEFAULT_MAX_PACKET_SIZE: usize = 1024;

/// Maximum length in bytes of a sanitized protocol name (plugin, type,
/// instances). The collectd receiver truncates or rejects longer names.
pub const MAX_NAME_LEN: usize = 63;

/// Placeholder returned by the sanitizer when a name is empty after
/// sanitization. Never empty, always within [`MAX_NAME_LEN`].
pub const EMPTY_NAME_PLACEHOLDER: &str = "default";

/// Host name label used when local host name resolution fails.
pub const FALLBACK_HOST_NAME: &str = "localhost";

/// Default prefix applied in front of named query metrics.
pub const DEFAULT_QUERY_PREFIX: &str = "db.query.";

/// The collectd type under which all metrics are reported.
///
/// Every value this crate emits is a point-in-time gauge; counters (with
/// their big-endian wire encoding) are never produced.
pub const TYPE_GAUGE: &str = "gauge";
