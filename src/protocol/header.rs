// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 metricast developers

//! Mutable packet header shared by consecutive value-writes.
//!
//! One `PacketHeader` lives for one report cycle. Host, timestamp and
//! interval are fixed at construction; plugin, type and the instances are
//! re-pointed at each metric as the cycle iterates the snapshot. The
//! setters sanitize, so a header never holds a name the wire format would
//! reject.

use super::sanitize;
use crate::config::TYPE_GAUGE;

/// Header fields for the next value-write.
#[derive(Debug, Clone)]
pub struct PacketHeader {
    host: String,
    timestamp_secs: u64,
    interval_secs: u64,
    plugin: String,
    plugin_instance: Option<String>,
    type_name: String,
    type_instance: Option<String>,
}

impl PacketHeader {
    /// Create a header for one cycle. The type defaults to `"gauge"`;
    /// plugin starts unset and must be pointed at a metric before the
    /// first value-write.
    pub fn new(host: &str, timestamp_secs: u64, interval_secs: u64) -> Self {
        Self {
            host: host.to_string(),
            timestamp_secs,
            interval_secs,
            plugin: String::new(),
            plugin_instance: None,
            type_name: TYPE_GAUGE.to_string(),
            type_instance: None,
        }
    }

    /// Point the header at a new plugin (sanitized).
    pub fn set_plugin(&mut self, name: &str) -> &mut Self {
        self.plugin = sanitize::name(name);
        self
    }

    /// Set or clear the plugin instance (sanitized).
    pub fn set_plugin_instance(&mut self, name: Option<&str>) -> &mut Self {
        self.plugin_instance = name.map(sanitize::instance_name);
        self
    }

    /// Override the collectd type (sanitized). Rarely needed; everything
    /// this crate reports is a gauge.
    pub fn set_type(&mut self, name: &str) -> &mut Self {
        self.type_name = sanitize::name(name);
        self
    }

    /// Set or clear the type instance (sanitized).
    pub fn set_type_instance(&mut self, name: Option<&str>) -> &mut Self {
        self.type_instance = name.map(sanitize::instance_name);
        self
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn timestamp_secs(&self) -> u64 {
        self.timestamp_secs
    }

    pub fn interval_secs(&self) -> u64 {
        self.interval_secs
    }

    pub fn plugin(&self) -> &str {
        &self.plugin
    }

    pub fn plugin_instance(&self) -> Option<&str> {
        self.plugin_instance.as_deref()
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn type_instance(&self) -> Option<&str> {
        self.type_instance.as_deref()
    }
}
