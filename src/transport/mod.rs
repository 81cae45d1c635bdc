// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 metricast developers

//! Network transport for encoded metric parts.

mod udp;

pub use udp::DatagramTransport;
