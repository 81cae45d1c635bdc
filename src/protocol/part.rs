// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 metricast developers

//! Single-part encoders for the collectd binary network protocol.
//!
//! # Wire Format
//!
//! ```text
//! 0                   1                   2                   3
//! 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |          part type            |          part length          |
//! +-------------------------------+-------------------------------+
//! |                      payload (part length - 4)                |
//! +---------------------------------------------------------------+
//! ```
//!
//! All part headers are big-endian. String payloads are NUL-terminated.
//! The VALUES part payload is:
//!
//! ```text
//! +-------------------------------+
//! |       value count (u16 BE)    |
//! +-------------------------------+
//! | count x data type code (u8)   |
//! +-------------------------------+
//! | count x value (8 bytes each)  |
//! +-------------------------------+
//! ```
//!
//! Gauge values are IEEE-754 doubles in LITTLE-endian byte order; counter
//! values would be big-endian u64. Only gauges are emitted here, which
//! sidesteps the endianness asymmetry entirely.

use super::{EncodeError, EncodeResult};
use crate::config::MAX_NAME_LEN;

/// Part type: source host name (string).
pub const PART_HOST: u16 = 0x0000;
/// Part type: epoch timestamp in seconds (u64).
pub const PART_TIME: u16 = 0x0001;
/// Part type: plugin name (string).
pub const PART_PLUGIN: u16 = 0x0002;
/// Part type: plugin instance (string, optional).
pub const PART_PLUGIN_INSTANCE: u16 = 0x0003;
/// Part type: type name (string).
pub const PART_TYPE: u16 = 0x0004;
/// Part type: type instance (string, optional).
pub const PART_TYPE_INSTANCE: u16 = 0x0005;
/// Part type: numeric values block.
pub const PART_VALUES: u16 = 0x0006;
/// Part type: reporting interval in seconds (u64).
pub const PART_INTERVAL: u16 = 0x0007;
/// Part type: HMAC-SHA256 signature (SIGN security level).
pub const PART_SIGNATURE: u16 = 0x0200;
/// Part type: AES-256-OFB encrypted wrapper (ENCRYPT security level).
pub const PART_ENCRYPTED: u16 = 0x0210;

/// Data type code for a monotonic counter (big-endian u64, not emitted).
pub const DATA_TYPE_COUNTER: u8 = 0;
/// Data type code for a gauge (little-endian f64).
pub const DATA_TYPE_GAUGE: u8 = 1;

/// Append a string part: 4-byte header, payload, NUL terminator.
///
/// The value must already be sanitized; a value over the protocol name
/// limit is rejected as a defensive invariant check.
pub fn encode_string_part(buf: &mut Vec<u8>, part_type: u16, value: &str) -> EncodeResult<()> {
    if value.len() > MAX_NAME_LEN {
        return Err(EncodeError::NameTooLong {
            field: part_name(part_type),
            len: value.len(),
        });
    }
    let part_len = (4 + value.len() + 1) as u16;
    buf.extend_from_slice(&part_type.to_be_bytes());
    buf.extend_from_slice(&part_len.to_be_bytes());
    buf.extend_from_slice(value.as_bytes());
    buf.push(0);
    Ok(())
}

/// Append a numeric part: 4-byte header plus a big-endian u64 (12 bytes).
pub fn encode_u64_part(buf: &mut Vec<u8>, part_type: u16, value: u64) {
    buf.extend_from_slice(&part_type.to_be_bytes());
    buf.extend_from_slice(&12u16.to_be_bytes());
    buf.extend_from_slice(&value.to_be_bytes());
}

/// Append a VALUES part holding `values` as gauges.
pub fn encode_gauge_values_part(buf: &mut Vec<u8>, values: &[f64]) {
    let count = values.len() as u16;
    let part_len = (4 + 2 + values.len() * 9) as u16;
    buf.extend_from_slice(&PART_VALUES.to_be_bytes());
    buf.extend_from_slice(&part_len.to_be_bytes());
    buf.extend_from_slice(&count.to_be_bytes());
    for _ in values {
        buf.push(DATA_TYPE_GAUGE);
    }
    for value in values {
        buf.extend_from_slice(&value.to_le_bytes());
    }
}

fn part_name(part_type: u16) -> &'static str {
    match part_type {
        PART_HOST => "host",
        PART_PLUGIN => "plugin",
        PART_PLUGIN_INSTANCE => "plugin_instance",
        PART_TYPE => "type",
        PART_TYPE_INSTANCE => "type_instance",
        _ => "string",
    }
}
