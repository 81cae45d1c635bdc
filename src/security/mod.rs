// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 metricast developers

//! Datagram security transforms (collectd SIGN and ENCRYPT parts).
//!
//! The collectd network protocol secures whole datagrams, not individual
//! parts: a SIGNATURE part prepended to the plaintext authenticates
//! everything after it, and an ENCRYPTED part wraps the entire plaintext.
//! The transform is therefore a per-datagram seam - the transport hands
//! each complete plaintext buffer to a [`PacketSealer`] just before the
//! socket send.
//!
//! Credential presence is validated once at reporter build time; a sealer
//! is only ever constructed from a valid configuration.

pub mod encrypt;
pub mod sign;

pub use encrypt::EncryptSealer;
pub use sign::SignSealer;

use std::fmt;

/// Security mode for outgoing datagrams.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SecurityLevel {
    /// Plaintext datagrams.
    #[default]
    None,
    /// HMAC-SHA256 authenticated plaintext.
    Sign,
    /// AES-256-OFB encrypted with SHA-1 integrity prefix.
    Encrypt,
}

impl fmt::Display for SecurityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "NONE"),
            Self::Sign => write!(f, "SIGN"),
            Self::Encrypt => write!(f, "ENCRYPT"),
        }
    }
}

/// Cryptographic failure while sealing one datagram.
///
/// Aborts only the datagram being sealed, never the report cycle.
#[derive(Debug, Clone)]
pub enum SecurityError {
    /// Cipher or RNG failure (key setup, IV generation, keystream).
    Crypto(String),
}

impl fmt::Display for SecurityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Crypto(msg) => write!(f, "cryptographic failure: {}", msg),
        }
    }
}

impl std::error::Error for SecurityError {}

/// Per-datagram security transform.
///
/// `seal` maps one complete plaintext datagram to its wire form. The
/// transport budgets its plaintext threshold with `overhead`, so sealed
/// datagrams stay within the configured maximum size.
pub trait PacketSealer: Send + Sync {
    /// Transform one plaintext datagram into its on-the-wire bytes.
    fn seal(&self, plain: &[u8]) -> Result<Vec<u8>, SecurityError>;

    /// Worst-case growth of `seal` output over its input, in bytes.
    fn overhead(&self) -> usize {
        0
    }
}

/// Pass-through sealer for [`SecurityLevel::None`].
#[derive(Debug, Default)]
pub struct PlainSealer;

impl PacketSealer for PlainSealer {
    fn seal(&self, plain: &[u8]) -> Result<Vec<u8>, SecurityError> {
        Ok(plain.to_vec())
    }
}

/// Build the sealer for a validated security configuration.
///
/// Callers must have checked that `username`/`password` are non-empty for
/// the non-plaintext levels; that check lives at the reporter's single
/// configuration boundary.
pub fn sealer_for(level: SecurityLevel, username: &str, password: &str) -> Box<dyn PacketSealer> {
    match level {
        SecurityLevel::None => Box::new(PlainSealer),
        SecurityLevel::Sign => Box::new(SignSealer::new(username, password)),
        SecurityLevel::Encrypt => Box::new(EncryptSealer::new(username, password)),
    }
}
