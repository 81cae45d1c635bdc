// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 metricast developers

//! ENCRYPT security level: AES-256-OFB with SHA-1 integrity prefix.
//!
//! # Wire Format
//!
//! ```text
//! +-------------------+-------------------+-------------------+
//! | 0x0210 (u16 BE)   | part len (u16 BE) | user len (u16 BE) |
//! +-------------------+-------------------+-------------------+
//! | username (variable)                                       |
//! +-----------------------------------------------------------+
//! | initialization vector (16 bytes, random per datagram)     |
//! +-----------------------------------------------------------+
//! | ciphertext: AES-256-OFB( SHA1(plain) || plain || 0-pad )  |
//! +-----------------------------------------------------------+
//! ```
//!
//! The cipher key is SHA-256 of the raw password bytes. The SHA-1 digest
//! of the plaintext rides inside the ciphertext so the receiver can check
//! integrity after decrypting; the body is zero-padded to a whole number
//! of 16-byte cipher blocks. This matches the collectd network plugin's
//! `Encrypt` handling byte for byte.

use super::{PacketSealer, SecurityError};
use crate::protocol::part::PART_ENCRYPTED;
use aes::Aes256;
use ofb::cipher::{KeyIvInit, StreamCipher};
use ofb::Ofb;
use ring::digest;
use ring::rand::{SecureRandom, SystemRandom};

type Aes256Ofb = Ofb<Aes256>;

const IV_LEN: usize = 16;
const SHA1_LEN: usize = 20;
const BLOCK_LEN: usize = 16;

/// Sealer wrapping each datagram in a collectd ENCRYPTED part.
pub struct EncryptSealer {
    key: [u8; 32],
    username: String,
    rng: SystemRandom,
}

impl EncryptSealer {
    pub fn new(username: &str, password: &str) -> Self {
        Self {
            key: derive_key(password),
            username: username.to_string(),
            rng: SystemRandom::new(),
        }
    }
}

impl PacketSealer for EncryptSealer {
    fn seal(&self, plain: &[u8]) -> Result<Vec<u8>, SecurityError> {
        let mut iv = [0u8; IV_LEN];
        self.rng.fill(&mut iv).map_err(|_| {
            SecurityError::Crypto("system RNG failed to produce an IV".to_string())
        })?;

        // SHA-1 prefix, then plaintext, zero-padded to the block size.
        let checksum = digest::digest(&digest::SHA1_FOR_LEGACY_USE_ONLY, plain);
        let mut body = Vec::with_capacity(SHA1_LEN + plain.len() + BLOCK_LEN);
        body.extend_from_slice(checksum.as_ref());
        body.extend_from_slice(plain);
        let rem = body.len() % BLOCK_LEN;
        if rem != 0 {
            body.resize(body.len() + BLOCK_LEN - rem, 0);
        }

        let mut cipher = Aes256Ofb::new_from_slices(&self.key, &iv)
            .map_err(|_| SecurityError::Crypto("AES-256-OFB cipher init failed".to_string()))?;
        cipher.apply_keystream(&mut body);

        let part_len = 4 + 2 + self.username.len() + IV_LEN + body.len();
        let mut out = Vec::with_capacity(part_len);
        out.extend_from_slice(&PART_ENCRYPTED.to_be_bytes());
        out.extend_from_slice(&(part_len as u16).to_be_bytes());
        out.extend_from_slice(&(self.username.len() as u16).to_be_bytes());
        out.extend_from_slice(self.username.as_bytes());
        out.extend_from_slice(&iv);
        out.extend_from_slice(&body);
        Ok(out)
    }

    fn overhead(&self) -> usize {
        // Part header + user len + username + IV, plus digest prefix and
        // worst-case block padding inside the ciphertext.
        4 + 2 + self.username.len() + IV_LEN + SHA1_LEN + (BLOCK_LEN - 1)
    }
}

/// Derive the 256-bit cipher key from the shared password.
pub fn derive_key(password: &str) -> [u8; 32] {
    let d = digest::digest(&digest::SHA256, password.as_bytes());
    let mut key = [0u8; 32];
    key.copy_from_slice(d.as_ref());
    key
}

/// Receiver-side decryption of an ENCRYPTED part, as a collectd server
/// with the same password would perform it.
///
/// Returns the recovered plaintext (padding stripped) after checking the
/// SHA-1 integrity prefix.
pub fn open_encrypted(datagram: &[u8], password: &str) -> Result<Vec<u8>, SecurityError> {
    if datagram.len() < 6 {
        return Err(SecurityError::Crypto("encrypted datagram too short".to_string()));
    }
    let part_type = u16::from_be_bytes([datagram[0], datagram[1]]);
    if part_type != PART_ENCRYPTED {
        return Err(SecurityError::Crypto("missing encrypted part".to_string()));
    }
    let user_len = u16::from_be_bytes([datagram[4], datagram[5]]) as usize;
    let iv_at = 6 + user_len;
    let body_at = iv_at + IV_LEN;
    if datagram.len() < body_at + SHA1_LEN {
        return Err(SecurityError::Crypto("encrypted body truncated".to_string()));
    }
    let iv = &datagram[iv_at..body_at];

    let key = derive_key(password);
    let mut body = datagram[body_at..].to_vec();
    let mut cipher = Aes256Ofb::new_from_slices(&key, iv)
        .map_err(|_| SecurityError::Crypto("AES-256-OFB cipher init failed".to_string()))?;
    cipher.apply_keystream(&mut body);

    let (prefix, padded) = body.split_at(SHA1_LEN);
    // The zero padding sits past the signed region; match by scanning for
    // the longest plaintext whose digest equals the prefix.
    let mut len = padded.len();
    loop {
        let d = digest::digest(&digest::SHA1_FOR_LEGACY_USE_ONLY, &padded[..len]);
        if d.as_ref() == prefix {
            return Ok(padded[..len].to_vec());
        }
        if len == 0 || padded[len - 1] != 0 || padded.len() - len >= BLOCK_LEN {
            return Err(SecurityError::Crypto(
                "integrity check failed (wrong password or tampered data)".to_string(),
            ));
        }
        len -= 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_part_layout() {
        let sealer = EncryptSealer::new("user0", "foo");
        let sealed = sealer.seal(b"parts go here").expect("seal");

        assert_eq!(&sealed[0..2], &[0x02, 0x10]);
        let part_len = u16::from_be_bytes([sealed[2], sealed[3]]) as usize;
        assert_eq!(part_len, sealed.len());
        let user_len = u16::from_be_bytes([sealed[4], sealed[5]]) as usize;
        assert_eq!(user_len, 5);
        assert_eq!(&sealed[6..11], b"user0");
        // Ciphertext is a whole number of blocks.
        assert_eq!((sealed.len() - 11 - IV_LEN) % BLOCK_LEN, 0);
    }

    #[test]
    fn test_roundtrip() {
        let sealer = EncryptSealer::new("user0", "foo");
        let plain = b"host and values parts";
        let sealed = sealer.seal(plain).expect("seal");
        let opened = open_encrypted(&sealed, "foo").expect("open");
        assert_eq!(opened, plain);
    }

    #[test]
    fn test_roundtrip_block_aligned_plaintext() {
        let sealer = EncryptSealer::new("u", "pw");
        // 12 + 20 digest = 32 bytes, already block aligned: no padding.
        let plain = [0xABu8; 12];
        let sealed = sealer.seal(&plain).expect("seal");
        let opened = open_encrypted(&sealed, "pw").expect("open");
        assert_eq!(opened, plain);
    }

    #[test]
    fn test_wrong_password_rejected() {
        let sealer = EncryptSealer::new("user0", "foo");
        let sealed = sealer.seal(b"secret metrics").expect("seal");
        assert!(open_encrypted(&sealed, "bar").is_err());
    }

    #[test]
    fn test_tamper_detected() {
        let sealer = EncryptSealer::new("user0", "foo");
        let mut sealed = sealer.seal(b"secret metrics").expect("seal");
        let body_at = 11 + IV_LEN;
        let at = body_at + fastrand::usize(..sealed.len() - body_at);
        sealed[at] ^= 0x80;
        assert!(open_encrypted(&sealed, "foo").is_err());
    }

    #[test]
    fn test_iv_unique_per_datagram() {
        let sealer = EncryptSealer::new("user0", "foo");
        let a = sealer.seal(b"same plaintext").expect("seal");
        let b = sealer.seal(b"same plaintext").expect("seal");
        assert_ne!(&a[11..11 + IV_LEN], &b[11..11 + IV_LEN]);
        assert_ne!(a[11 + IV_LEN..], b[11 + IV_LEN..]);
    }

    #[test]
    fn test_key_derivation_is_sha256() {
        let key = derive_key("foo");
        let expected = digest::digest(&digest::SHA256, b"foo");
        assert_eq!(&key[..], expected.as_ref());
    }
}
