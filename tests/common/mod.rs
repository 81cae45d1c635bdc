// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 metricast developers

//! Shared test helpers: a trivial reference decoder for plaintext collectd
//! datagrams, a loopback UDP receiver, and a scripted metric source.

// Each integration test binary uses its own subset of these helpers.
#![allow(dead_code)]

use metricast::protocol::part::{
    DATA_TYPE_GAUGE, PART_HOST, PART_INTERVAL, PART_PLUGIN, PART_PLUGIN_INSTANCE, PART_TIME,
    PART_TYPE, PART_TYPE_INSTANCE, PART_VALUES,
};
use metricast::{Clock, MetricSnapshot, MetricSource};
use std::net::UdpSocket;
use std::time::Duration;

/// One decoded part from a plaintext datagram.
#[derive(Debug, Clone, PartialEq)]
pub enum Part {
    Host(String),
    Time(u64),
    Plugin(String),
    PluginInstance(String),
    Type(String),
    TypeInstance(String),
    Interval(u64),
    Values(Vec<f64>),
}

/// Decode a plaintext datagram into its part sequence.
///
/// Panics on malformed input; tests want loud failures.
pub fn decode_parts(buf: &[u8]) -> Vec<Part> {
    let mut parts = Vec::new();
    let mut at = 0;
    while at < buf.len() {
        assert!(buf.len() - at >= 4, "truncated part header at {}", at);
        let part_type = u16::from_be_bytes([buf[at], buf[at + 1]]);
        let part_len = u16::from_be_bytes([buf[at + 2], buf[at + 3]]) as usize;
        assert!(part_len >= 4 && at + part_len <= buf.len(), "bad part length");
        let payload = &buf[at + 4..at + part_len];

        let part = match part_type {
            PART_HOST => Part::Host(decode_string(payload)),
            PART_PLUGIN => Part::Plugin(decode_string(payload)),
            PART_PLUGIN_INSTANCE => Part::PluginInstance(decode_string(payload)),
            PART_TYPE => Part::Type(decode_string(payload)),
            PART_TYPE_INSTANCE => Part::TypeInstance(decode_string(payload)),
            PART_TIME => Part::Time(decode_u64(payload)),
            PART_INTERVAL => Part::Interval(decode_u64(payload)),
            PART_VALUES => Part::Values(decode_gauges(payload)),
            other => panic!("unexpected part type 0x{:04x}", other),
        };
        parts.push(part);
        at += part_len;
    }
    parts
}

fn decode_string(payload: &[u8]) -> String {
    let (last, body) = payload.split_last().expect("empty string payload");
    assert_eq!(*last, 0, "string part not NUL-terminated");
    String::from_utf8(body.to_vec()).expect("non-UTF8 string part")
}

fn decode_u64(payload: &[u8]) -> u64 {
    u64::from_be_bytes(payload.try_into().expect("numeric part must be 8 bytes"))
}

fn decode_gauges(payload: &[u8]) -> Vec<f64> {
    let count = u16::from_be_bytes([payload[0], payload[1]]) as usize;
    assert_eq!(payload.len(), 2 + count * 9, "values payload size mismatch");
    let types = &payload[2..2 + count];
    let mut values = Vec::with_capacity(count);
    for (i, code) in types.iter().enumerate() {
        assert_eq!(*code, DATA_TYPE_GAUGE, "non-gauge data type emitted");
        let at = 2 + count + i * 8;
        values.push(f64::from_le_bytes(
            payload[at..at + 8].try_into().expect("8-byte value"),
        ));
    }
    values
}

/// A `(plugin, type_instance, value)` triple for one VALUES part, with the
/// header fields in force when it was written.
pub fn value_writes(parts: &[Part]) -> Vec<(String, String, f64)> {
    let mut writes = Vec::new();
    let mut plugin = String::new();
    let mut type_instance = String::new();
    for part in parts {
        match part {
            Part::Plugin(name) => plugin = name.clone(),
            Part::TypeInstance(name) => type_instance = name.clone(),
            Part::Values(values) => {
                assert_eq!(values.len(), 1, "reporter emits one value per write");
                writes.push((plugin.clone(), type_instance.clone(), values[0]));
            }
            _ => {}
        }
    }
    writes
}

/// Bind a loopback receiver with a short read timeout.
pub fn loopback_receiver() -> (UdpSocket, u16) {
    let socket = UdpSocket::bind(("127.0.0.1", 0)).expect("bind receiver");
    socket
        .set_read_timeout(Some(Duration::from_millis(300)))
        .expect("set timeout");
    let port = socket.local_addr().expect("local addr").port();
    (socket, port)
}

/// Drain every datagram currently queued on the receiver.
pub fn recv_datagrams(socket: &UdpSocket) -> Vec<Vec<u8>> {
    let mut datagrams = Vec::new();
    let mut buf = [0u8; 4096];
    while let Ok((len, _)) = socket.recv_from(&mut buf) {
        datagrams.push(buf[..len].to_vec());
    }
    datagrams
}

/// Metric source returning a fixed snapshot every cycle.
pub struct FixedSource(pub MetricSnapshot);

impl MetricSource for FixedSource {
    fn snapshot(&self) -> MetricSnapshot {
        self.0.clone()
    }
}

/// Clock pinned to a fixed epoch second for deterministic packets.
pub struct FixedClock(pub u64);

impl Clock for FixedClock {
    fn epoch_seconds(&self) -> u64 {
        self.0
    }
}
