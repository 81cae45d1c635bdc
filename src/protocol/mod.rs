// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 metricast developers

//! Collectd binary network protocol encoding.
//!
//! A datagram is a sequence of typed, length-prefixed *parts*:
//!
//! ```text
//! +-------------------+-------------------+------------------+
//! | part type (u16 BE)| part len (u16 BE) | payload          |
//! +-------------------+-------------------+------------------+
//! ```
//!
//! `part len` includes the 4-byte part header. String parts carry a
//! NUL-terminated ASCII payload; numeric parts carry a big-endian u64;
//! the VALUES part carries typed numeric samples (only gauges here, as
//! little-endian IEEE-754 doubles).
//!
//! Module layering, leaves first:
//!
//! - [`sanitize`] - protocol string constraints for human-supplied names
//! - [`part`] - single-part encoders and part-type constants
//! - [`header`] - the mutable header fields shared by consecutive writes
//! - [`packet`] - one metric value-write as an ordered part sequence

pub mod header;
pub mod packet;
pub mod part;
pub mod sanitize;

pub use header::PacketHeader;
pub use packet::encode_value_write;

use std::fmt;

/// Result type for protocol encoding operations.
pub type EncodeResult<T> = Result<T, EncodeError>;

/// Errors that can occur while encoding one metric into parts.
///
/// Both variants are defensive invariant checks: the sanitizer and the
/// header setters make them unreachable through the public reporter path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EncodeError {
    /// A required header field (host, plugin or type) was empty.
    MissingField(&'static str),
    /// A name exceeded the protocol length limit after sanitization.
    NameTooLong { field: &'static str, len: usize },
}

impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingField(field) => {
                write!(f, "required header field '{}' is not set", field)
            }
            Self::NameTooLong { field, len } => {
                write!(
                    f,
                    "header field '{}' is {} bytes, exceeds protocol limit of {}",
                    field,
                    len,
                    crate::config::MAX_NAME_LEN
                )
            }
        }
    }
}

impl std::error::Error for EncodeError {}
