// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 metricast developers

//! SIGN security level: HMAC-SHA256 authenticated plaintext.
//!
//! # Wire Format
//!
//! ```text
//! +-------------------+-------------------+
//! | 0x0200 (u16 BE)   | part len (u16 BE) |
//! +-------------------+-------------------+
//! | HMAC-SHA256 tag (32 bytes)            |
//! +---------------------------------------+
//! | username (variable, no terminator)    |
//! +---------------------------------------+
//! | plaintext parts (rest of datagram)    |
//! +---------------------------------------+
//! ```
//!
//! The tag is computed over `username || plaintext` with the raw password
//! bytes as the HMAC key, and the signature part is placed first so it
//! authenticates the whole rest of the datagram.

use super::{PacketSealer, SecurityError};
use crate::protocol::part::PART_SIGNATURE;
use ring::hmac;

const HMAC_TAG_LEN: usize = 32;

/// Sealer prepending a collectd SIGNATURE part to each datagram.
pub struct SignSealer {
    key: hmac::Key,
    username: String,
}

impl SignSealer {
    pub fn new(username: &str, password: &str) -> Self {
        Self {
            key: hmac::Key::new(hmac::HMAC_SHA256, password.as_bytes()),
            username: username.to_string(),
        }
    }
}

impl PacketSealer for SignSealer {
    fn seal(&self, plain: &[u8]) -> Result<Vec<u8>, SecurityError> {
        let mut ctx = hmac::Context::with_key(&self.key);
        ctx.update(self.username.as_bytes());
        ctx.update(plain);
        let tag = ctx.sign();

        let part_len = 4 + HMAC_TAG_LEN + self.username.len();
        let mut out = Vec::with_capacity(part_len + plain.len());
        out.extend_from_slice(&PART_SIGNATURE.to_be_bytes());
        out.extend_from_slice(&(part_len as u16).to_be_bytes());
        out.extend_from_slice(tag.as_ref());
        out.extend_from_slice(self.username.as_bytes());
        out.extend_from_slice(plain);
        Ok(out)
    }

    fn overhead(&self) -> usize {
        4 + HMAC_TAG_LEN + self.username.len()
    }
}

/// Receiver-side check of a signed datagram, as a collectd server with the
/// same credentials would perform it.
///
/// Expects `datagram` to start with the SIGNATURE part; returns the signed
/// plaintext region on success.
pub fn verify_signed<'a>(
    datagram: &'a [u8],
    username: &str,
    password: &str,
) -> Result<&'a [u8], SecurityError> {
    let header_len = 4 + HMAC_TAG_LEN + username.len();
    if datagram.len() < header_len {
        return Err(SecurityError::Crypto("signed datagram too short".to_string()));
    }
    let part_type = u16::from_be_bytes([datagram[0], datagram[1]]);
    if part_type != PART_SIGNATURE {
        return Err(SecurityError::Crypto("missing signature part".to_string()));
    }
    let tag = &datagram[4..4 + HMAC_TAG_LEN];
    let signed_user = &datagram[4 + HMAC_TAG_LEN..header_len];
    if signed_user != username.as_bytes() {
        return Err(SecurityError::Crypto("username mismatch".to_string()));
    }
    let plain = &datagram[header_len..];

    let key = hmac::Key::new(hmac::HMAC_SHA256, password.as_bytes());
    let mut signed = Vec::with_capacity(username.len() + plain.len());
    signed.extend_from_slice(username.as_bytes());
    signed.extend_from_slice(plain);
    hmac::verify(&key, &signed, tag)
        .map_err(|_| SecurityError::Crypto("HMAC verification failed".to_string()))?;
    Ok(plain)
}
