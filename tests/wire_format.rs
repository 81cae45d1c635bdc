// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 metricast developers

//! Wire-format compliance: round-trips through the reference decoder and
//! receiver-side checks of the SIGN and ENCRYPT transforms.

mod common;

use common::{decode_parts, Part};
use metricast::protocol::{encode_value_write, PacketHeader};
use metricast::security::encrypt::{open_encrypted, EncryptSealer};
use metricast::security::sign::{verify_signed, SignSealer};
use metricast::security::PacketSealer;

fn sample_header() -> PacketHeader {
    let mut header = PacketHeader::new("h1", 1_700_000_000, 60);
    header
        .set_plugin("app.query")
        .set_plugin_instance(Some("primary"))
        .set_type_instance(Some("mean"));
    header
}

#[test]
fn plaintext_roundtrip_recovers_all_fields() {
    let header = sample_header();
    let blob = encode_value_write(&header, &[40.0]).expect("encode");

    let parts = decode_parts(&blob);
    assert_eq!(
        parts,
        vec![
            Part::Host("h1".to_string()),
            Part::Time(1_700_000_000),
            Part::Plugin("app.query".to_string()),
            Part::PluginInstance("primary".to_string()),
            Part::Type("gauge".to_string()),
            Part::TypeInstance("mean".to_string()),
            Part::Interval(60),
            Part::Values(vec![40.0]),
        ]
    );
}

#[test]
fn negative_and_fractional_gauges_roundtrip_exactly() {
    let mut header = PacketHeader::new("h1", 1, 10);
    header.set_plugin("txn");
    for value in [-1.5, 0.0, f64::MAX, 1e-300, 123.456_789] {
        let blob = encode_value_write(&header, &[value]).expect("encode");
        let parts = decode_parts(&blob);
        let Some(Part::Values(values)) = parts.last() else {
            panic!("VALUES part must come last");
        };
        assert_eq!(values, &vec![value]);
    }
}

#[test]
fn signed_datagram_verifies_and_decodes() {
    let sealer = SignSealer::new("user0", "secret");
    let blob = encode_value_write(&sample_header(), &[40.0]).expect("encode");
    let sealed = sealer.seal(&blob).expect("seal");

    // Signature part leads the datagram and authenticates the rest.
    assert_eq!(&sealed[0..2], &[0x02, 0x00]);
    let plain = verify_signed(&sealed, "user0", "secret").expect("verify");
    assert_eq!(plain, &blob[..]);
    assert_eq!(decode_parts(plain).len(), 8);
}

#[test]
fn signed_datagram_rejects_any_flipped_byte() {
    let sealer = SignSealer::new("user0", "secret");
    let blob = encode_value_write(&sample_header(), &[40.0]).expect("encode");
    let sealed = sealer.seal(&blob).expect("seal");

    // Every byte of the signed region (username + parts) is covered.
    for at in 36..sealed.len() {
        let mut tampered = sealed.clone();
        tampered[at] ^= 0x01;
        assert!(
            verify_signed(&tampered, "user0", "secret").is_err(),
            "tamper at byte {} not detected",
            at
        );
    }
}

#[test]
fn encrypted_datagram_opens_with_right_password_only() {
    let sealer = EncryptSealer::new("user0", "secret");
    let blob = encode_value_write(&sample_header(), &[40.0]).expect("encode");
    let sealed = sealer.seal(&blob).expect("seal");

    assert_eq!(&sealed[0..2], &[0x02, 0x10]);
    let opened = open_encrypted(&sealed, "secret").expect("open");
    assert_eq!(opened, blob);
    assert_eq!(decode_parts(&opened).len(), 8);

    assert!(open_encrypted(&sealed, "not-the-password").is_err());
}

#[test]
fn encrypted_datagrams_differ_for_identical_plaintext() {
    let sealer = EncryptSealer::new("user0", "secret");
    let blob = encode_value_write(&sample_header(), &[40.0]).expect("encode");
    let a = sealer.seal(&blob).expect("seal");
    let b = sealer.seal(&blob).expect("seal");
    assert_ne!(a, b, "random IV must vary per datagram");
    assert_eq!(open_encrypted(&a, "secret").expect("open"), blob);
    assert_eq!(open_encrypted(&b, "secret").expect("open"), blob);
}

#[test]
fn sealed_size_stays_within_declared_overhead() {
    let blob = encode_value_write(&sample_header(), &[40.0]).expect("encode");
    for sealer in [
        Box::new(SignSealer::new("user0", "secret")) as Box<dyn PacketSealer>,
        Box::new(EncryptSealer::new("user0", "secret")),
    ] {
        let sealed = sealer.seal(&blob).expect("seal");
        assert!(
            sealed.len() <= blob.len() + sealer.overhead(),
            "sealed {} > plain {} + overhead {}",
            sealed.len(),
            blob.len(),
            sealer.overhead()
        );
    }
}
