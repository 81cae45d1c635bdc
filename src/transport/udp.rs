// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 metricast developers

//! UDP datagram transport with size-bounded buffering.
//!
//! Owns one UDP socket to a fixed destination for the duration of one
//! connect/disconnect bracket. Encoded blobs are appended to a datagram
//! buffer; when the next blob would push the buffer past the plaintext
//! threshold, the buffer is sealed (security transform) and sent first,
//! so a blob is never split across two datagrams.
//!
//! UDP is connectionless: "connect" only resolves the destination once
//! and opens a local socket. There is no handshake and no delivery
//! acknowledgment. The configured maximum datagram size must stay within
//! the path MTU; this layer does not validate MTU behavior.

use crate::error::{Error, Result};
use crate::security::PacketSealer;
use std::net::{SocketAddr, ToSocketAddrs, UdpSocket};

/// Buffering UDP sender for one collector destination.
pub struct DatagramTransport {
    host: Option<String>,
    port: u16,
    max_datagram_size: usize,
    sealer: Box<dyn PacketSealer>,
    dest: Option<SocketAddr>,
    socket: Option<UdpSocket>,
    buffer: Vec<u8>,
}

impl DatagramTransport {
    /// Create a disconnected transport.
    ///
    /// `host` may be absent for loopback-style test setups; a real
    /// deployment always names its collector. Every datagram passes
    /// through `sealer` on its way to the socket.
    pub fn new(
        host: Option<String>,
        port: u16,
        max_datagram_size: usize,
        sealer: Box<dyn PacketSealer>,
    ) -> Self {
        Self {
            host,
            port,
            max_datagram_size,
            sealer,
            dest: None,
            socket: None,
            buffer: Vec::with_capacity(max_datagram_size),
        }
    }

    /// Resolve the destination and open the local socket.
    ///
    /// A single transport handle is not reentrant: connecting while
    /// already connected is an error.
    pub fn connect(&mut self) -> Result<()> {
        if self.is_connected() {
            return Err(Error::Connection("already connected".to_string()));
        }
        if let Some(host) = &self.host {
            let addr = (host.as_str(), self.port)
                .to_socket_addrs()
                .map_err(|err| {
                    Error::Connection(format!("failed to resolve {}:{}: {}", host, self.port, err))
                })?
                .next()
                .ok_or_else(|| {
                    Error::Connection(format!("no address for {}:{}", host, self.port))
                })?;
            self.dest = Some(addr);
        }
        let socket = UdpSocket::bind(("0.0.0.0", 0))
            .map_err(|err| Error::Connection(format!("failed to open UDP socket: {}", err)))?;
        log::debug!(
            "[transport] connected local={:?} dest={:?}",
            socket.local_addr().ok(),
            self.dest
        );
        self.socket = Some(socket);
        Ok(())
    }

    pub fn is_connected(&self) -> bool {
        self.socket.is_some()
    }

    /// Append one encoded blob, sending the current buffer first if the
    /// blob would not fit.
    ///
    /// A blob larger than the threshold on its own becomes its own
    /// oversized datagram rather than being split.
    pub fn write(&mut self, blob: &[u8]) -> Result<()> {
        let threshold = self.plaintext_threshold();
        if blob.len() > threshold {
            log::warn!(
                "[transport] single part sequence of {} bytes exceeds datagram budget of {}",
                blob.len(),
                threshold
            );
        }
        if !self.buffer.is_empty() && self.buffer.len() + blob.len() > threshold {
            self.send_buffer()?;
        }
        self.buffer.extend_from_slice(blob);
        Ok(())
    }

    /// Send any buffered bytes as a final datagram.
    pub fn flush(&mut self) -> Result<()> {
        if self.buffer.is_empty() {
            return Ok(());
        }
        self.send_buffer()
    }

    /// Close the socket. Idempotent; any unsent buffered bytes are
    /// dropped with the connection.
    pub fn disconnect(&mut self) {
        if self.socket.take().is_some() {
            log::debug!("[transport] disconnected dest={:?}", self.dest);
        }
        self.dest = None;
        self.buffer.clear();
    }

    /// Plaintext budget per datagram: the configured maximum minus the
    /// sealer's worst-case growth, so sealed datagrams stay within bound.
    fn plaintext_threshold(&self) -> usize {
        self.max_datagram_size
            .saturating_sub(self.sealer.overhead())
            .max(1)
    }

    fn send_buffer(&mut self) -> Result<()> {
        let socket = self
            .socket
            .as_ref()
            .ok_or_else(|| Error::Connection("not connected".to_string()))?;
        let dest = self.dest.ok_or_else(|| {
            Error::Transport(std::io::Error::new(
                std::io::ErrorKind::NotConnected,
                "no destination host configured",
            ))
        });

        // The buffer is consumed whether or not the send succeeds: a
        // failed datagram is lost, not retried.
        let sealed = self.sealer.seal(&self.buffer);
        self.buffer.clear();

        let sealed = sealed.map_err(Error::Security)?;
        let dest = dest?;
        socket.send_to(&sealed, dest).map_err(Error::Transport)?;
        log::debug!("[transport] sent datagram len={} dest={}", sealed.len(), dest);
        Ok(())
    }
}
