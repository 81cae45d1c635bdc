// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 metricast developers

//! One metric value-write as an ordered part sequence.
//!
//! Every value-write emits the full header part sequence followed by one
//! VALUES part:
//!
//! ```text
//! HOST, TIME, PLUGIN, [PLUGIN_INSTANCE], TYPE, [TYPE_INSTANCE], INTERVAL, VALUES
//! ```
//!
//! Header parts are re-emitted on every write rather than only on change.
//! Re-emission is always valid for a collectd receiver, and it keeps every
//! datagram self-describing when the transport splits a cycle's writes
//! across several datagrams.
//!
//! The returned blob is the transport's unit of buffering: it is appended
//! to a datagram whole or not at all, so no part is ever split across two
//! datagrams.

use super::part::{
    encode_gauge_values_part, encode_string_part, encode_u64_part, PART_HOST, PART_INTERVAL,
    PART_PLUGIN, PART_PLUGIN_INSTANCE, PART_TIME, PART_TYPE, PART_TYPE_INSTANCE,
};
use super::{EncodeError, EncodeResult, PacketHeader};

/// Encode one value-write against the current header state.
///
/// # Errors
///
/// [`EncodeError::MissingField`] when host, plugin or type is empty;
/// [`EncodeError::NameTooLong`] if a name slipped past sanitization over
/// the protocol limit.
pub fn encode_value_write(header: &PacketHeader, values: &[f64]) -> EncodeResult<Vec<u8>> {
    if header.host().is_empty() {
        return Err(EncodeError::MissingField("host"));
    }
    if header.plugin().is_empty() {
        return Err(EncodeError::MissingField("plugin"));
    }
    if header.type_name().is_empty() {
        return Err(EncodeError::MissingField("type"));
    }

    // Header parts dominate; 128 covers the common single-value write.
    let mut buf = Vec::with_capacity(128);
    encode_string_part(&mut buf, PART_HOST, header.host())?;
    encode_u64_part(&mut buf, PART_TIME, header.timestamp_secs());
    encode_string_part(&mut buf, PART_PLUGIN, header.plugin())?;
    if let Some(instance) = header.plugin_instance() {
        encode_string_part(&mut buf, PART_PLUGIN_INSTANCE, instance)?;
    }
    encode_string_part(&mut buf, PART_TYPE, header.type_name())?;
    if let Some(instance) = header.type_instance() {
        encode_string_part(&mut buf, PART_TYPE_INSTANCE, instance)?;
    }
    encode_u64_part(&mut buf, PART_INTERVAL, header.interval_secs());
    encode_gauge_values_part(&mut buf, values);

    Ok(buf)
}
