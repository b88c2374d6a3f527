//! Tests for the stellar-transaction crate.
//!
//! Byte-level vectors were produced independently from the ledger's XDR
//! definitions; they cover envelope encoding, network-bound hashing and
//! signing, builder rules, result decoding and the txrep text form.

use stellar_primitives::{KeyPair, Network, PublicKey};
use tracing_test::traced_test;

use crate::account::{Account, MuxedAccount};
use crate::amount::Price;
use crate::asset::Asset;
use crate::builder::TransactionBuilder;
use crate::codec::XdrCodec;
use crate::memo::Memo;
use crate::operation::{
    ClaimableBalanceId, Operation, OperationBody, SetOptionsOp, Signer, SignerKey,
    AUTH_REQUIRED_FLAG, AUTH_REVOCABLE_FLAG,
};
use crate::predicate::{Claimant, Predicate};
use crate::result::{
    ClaimAtom, ManageOfferEffect, ManageOfferSuccess, OfferEntry, OpResult, OperationInnerResult,
    OperationResult, TransactionResult, TransactionResultBody, TransactionResultCode,
};
use crate::transaction::{DecoratedSignature, TimeBounds, Transaction};
use crate::TransactionError;

// -----------------------------------------------------------------------
// Fixtures
// -----------------------------------------------------------------------

/// Secret seed of the key pair whose raw seed is bytes 0..32.
const SEED: &str = "SAAACAQDAQCQMBYIBEFAWDANBYHRAEISCMKBKFQXDAMRUGY4DUPB6NKI";

/// Account id of `SEED`.
const ACCOUNT: &str = "GAB2CB576PHBBPQ5ODORRZ2LYCMWPZGWGCN2KDK7DXOIMZASKUY3QZ6Q";

/// All-zero account id.
const ZERO_ACCOUNT: &str = "GAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAWHF";

/// Unsigned envelope: source `ACCOUNT`, fee 100, seq 1, no memo or time
/// bounds, one native payment of 10 to `ZERO_ACCOUNT`.
const UNSIGNED_ENVELOPE: &str = "AAAAAgAAAAADoQe/884Qvh1w3RjnS8CZZ+TWMJulDV8d3IZkElUxuAAAAGQAAAAAAAAAAQAAAAAAAAAAAAAAAQAAAAAAAAABAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAF9eEAAAAAAAAAAAA=";

/// The same envelope signed by `SEED` on testnet.
const SIGNED_ENVELOPE: &str = "AAAAAgAAAAADoQe/884Qvh1w3RjnS8CZZ+TWMJulDV8d3IZkElUxuAAAAGQAAAAAAAAAAQAAAAAAAAAAAAAAAQAAAAAAAAABAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAF9eEAAAAAAAAAAAESVTG4AAAAQC44jKtTJdJbPN/+oQnCwWNUnita+BhMsVqxC0jcZ9sh1T62cu/DQlqVXYGbHffaBb8KH8Pq8lzPrNRldZagFQA=";

const TESTNET_HASH: &str = "04eba3aece5fcb77de6b12d766f7a6fc7818aa1962828df354aab7d29d8db5f9";
const PUBLIC_HASH: &str = "ad38816171d9ad3a1e6ee6374161dab3d5993a9c280ca2c41f4829dadbe59f55";
const TESTNET_SIGNATURE: &str = "2e388cab5325d25b3cdffea109c2c163549e2b5af8184cb15ab10b48dc67db21d53eb672efc3425a955d819b1df7da05bf0a1fc3eaf25ccfacd4657596a01500";

fn keypair() -> KeyPair {
    KeyPair::from_secret_seed(SEED).expect("valid seed")
}

fn zero_key() -> PublicKey {
    PublicKey::from_account_id(ZERO_ACCOUNT).expect("valid account")
}

fn payment_tx(account: &mut Account) -> Transaction {
    TransactionBuilder::new(account)
        .add_operation(Operation::payment(zero_key(), Asset::Native, "10").expect("valid payment"))
        .build()
        .expect("build should succeed")
}

fn usd() -> Asset {
    Asset::credit("USD", zero_key()).expect("valid asset")
}

/// A transaction touching every operation type, with a muxed source.
fn kitchen_sink_tx() -> Transaction {
    let kp = keypair();
    let mut account = Account::new(*kp.public_key(), 41).with_muxed_id(1234);
    let predicate = Predicate::and(
        Predicate::not(Predicate::before_relative_time(3600)),
        Predicate::or(
            Predicate::before_absolute_time(1_700_000_000),
            Predicate::unconditional(),
        ),
    );
    let set_options = SetOptionsOp {
        inflation_dest: Some(zero_key()),
        set_flags: Some(AUTH_REQUIRED_FLAG | AUTH_REVOCABLE_FLAG),
        master_weight: Some(10),
        med_threshold: Some(2),
        home_domain: Some("example.com".to_string()),
        signer: Some(Signer {
            key: SignerKey::HashX([7u8; 32]),
            weight: 1,
        }),
        ..SetOptionsOp::default()
    };
    let muxed_dest = MuxedAccount::MuxedEd25519 {
        id: 99,
        key: zero_key(),
    };
    TransactionBuilder::new(&mut account)
        .base_fee(250)
        .time_bounds(TimeBounds::new(10, 20))
        .memo(Memo::text("quote \" and \\ ok").expect("short memo"))
        .add_operation(Operation::create_account(zero_key(), "1.5").expect("create account"))
        .add_operation(
            Operation::payment(muxed_dest, usd(), "0.0000001")
                .expect("payment")
                .with_source_account(zero_key()),
        )
        .add_operation(
            Operation::manage_sell_offer(Asset::Native, usd(), "5", Price::from_decimal("1.25").expect("price"), 0)
                .expect("sell offer"),
        )
        .add_operation(Operation::set_options(set_options).expect("set options"))
        .add_operation(Operation::change_trust(usd(), None).expect("change trust"))
        .add_operation(Operation::account_merge(zero_key()))
        .add_operation(Operation::manage_data("config", Some(b"\x00\x01value")).expect("manage data"))
        .add_operation(Operation::manage_data("gone", None).expect("manage data"))
        .add_operation(Operation::bump_sequence(1_000).expect("bump"))
        .add_operation(
            Operation::manage_buy_offer(usd(), Asset::Native, "7", Price::new(3, 7).expect("price"), 12)
                .expect("buy offer"),
        )
        .add_operation(
            Operation::create_claimable_balance(
                Asset::Native,
                "100",
                vec![
                    Claimant::new(zero_key(), predicate),
                    Claimant::new(*kp.public_key(), Predicate::unconditional()),
                ],
            )
            .expect("claimable balance"),
        )
        .add_operation(Operation::claim_claimable_balance(ClaimableBalanceId::V0([0xab; 32])))
        .add_operation(
            Operation::set_trust_line_flags(zero_key(), usd(), 1, 2).expect("trust line flags"),
        )
        .build()
        .expect("build should succeed")
}

// -----------------------------------------------------------------------
// Envelope encoding
// -----------------------------------------------------------------------

/// Test that a built payment encodes to the known envelope bytes.
#[test]
fn test_unsigned_envelope_vector() {
    let kp = keypair();
    assert_eq!(kp.account_id(), ACCOUNT);
    let mut account = Account::new(*kp.public_key(), 0);
    let tx = payment_tx(&mut account);
    assert_eq!(tx.to_envelope_xdr_base64().unwrap(), UNSIGNED_ENVELOPE);
}

/// Test that decoding the known envelope yields the built transaction.
#[test]
fn test_envelope_decode_vector() {
    let tx = Transaction::from_envelope_xdr_base64(UNSIGNED_ENVELOPE).expect("should decode");
    assert_eq!(tx.source_account().address(), ACCOUNT);
    assert_eq!(tx.fee(), 100);
    assert_eq!(tx.sequence_number(), 1);
    assert!(tx.time_bounds().is_none());
    assert!(tx.memo().is_none());
    assert_eq!(tx.operations().len(), 1);
    match &tx.operations()[0].body {
        OperationBody::Payment(p) => {
            assert_eq!(p.destination.address(), ZERO_ACCOUNT);
            assert_eq!(p.asset, Asset::Native);
            assert_eq!(p.amount, 100_000_000);
        }
        other => panic!("unexpected body {:?}", other),
    }
    assert!(!tx.is_signed());
}

/// Test that every operation type survives an envelope round trip.
#[test]
fn test_kitchen_sink_envelope_roundtrip() {
    let mut tx = kitchen_sink_tx();
    tx.sign(&keypair(), &Network::testnet()).unwrap();
    let bytes = tx.to_envelope_xdr().unwrap();
    let decoded = Transaction::from_envelope_xdr(&bytes).expect("should decode");
    assert_eq!(decoded, tx);
    assert_eq!(decoded.to_envelope_xdr().unwrap(), bytes);
}

/// Test that a truncated envelope is rejected.
#[test]
fn test_truncated_envelope_rejected() {
    let tx = kitchen_sink_tx();
    let bytes = tx.to_envelope_xdr().unwrap();
    for cut in [1, 4, bytes.len() / 2, bytes.len() - 1] {
        let result = Transaction::from_envelope_xdr(&bytes[..bytes.len() - cut]);
        assert!(
            matches!(result, Err(TransactionError::MalformedInput(_))),
            "cut {} should be malformed",
            cut
        );
    }
}

/// Test that trailing bytes after an envelope are rejected.
#[test]
fn test_trailing_bytes_rejected() {
    let mut account = Account::new(*keypair().public_key(), 0);
    let mut bytes = payment_tx(&mut account).to_envelope_xdr().unwrap();
    bytes.extend_from_slice(&[0, 0, 0, 0]);
    assert!(matches!(
        Transaction::from_envelope_xdr(&bytes),
        Err(TransactionError::MalformedInput(_))
    ));
}

/// Test that an unknown envelope type is rejected.
#[test]
fn test_unknown_envelope_type_rejected() {
    let mut account = Account::new(*keypair().public_key(), 0);
    let mut bytes = payment_tx(&mut account).to_envelope_xdr().unwrap();
    // ENVELOPE_TYPE_TX_FEE_BUMP
    bytes[3] = 5;
    assert!(matches!(
        Transaction::from_envelope_xdr(&bytes),
        Err(TransactionError::MalformedInput(_))
    ));
}

/// Test that non-zero padding in a text memo is rejected.
#[test]
fn test_nonzero_padding_rejected() {
    let kp = keypair();
    let mut account = Account::new(*kp.public_key(), 0);
    let tx = TransactionBuilder::new(&mut account)
        .memo(Memo::text("abc").unwrap())
        .add_operation(Operation::bump_sequence(5).unwrap())
        .build()
        .unwrap();
    let mut bytes = tx.to_envelope_xdr().unwrap();
    // envelope type, source, fee, seq, cond, memo type, text length, "abc"
    let pad = 4 + 36 + 4 + 8 + 4 + 4 + 4 + 3;
    assert_eq!(&bytes[pad - 3..pad], b"abc");
    assert_eq!(bytes[pad], 0);
    bytes[pad] = 1;
    assert!(matches!(
        Transaction::from_envelope_xdr(&bytes),
        Err(TransactionError::MalformedInput(_))
    ));
}

/// Test that a text memo holding bytes that are not UTF-8 fails to decode.
#[test]
fn test_non_utf8_text_memo_rejected() {
    let kp = keypair();
    let mut account = Account::new(*kp.public_key(), 0);
    let tx = TransactionBuilder::new(&mut account)
        .memo(Memo::text("abc").unwrap())
        .add_operation(Operation::bump_sequence(5).unwrap())
        .build()
        .unwrap();
    let mut bytes = tx.to_envelope_xdr().unwrap();
    let text = 4 + 36 + 4 + 8 + 4 + 4 + 4;
    assert_eq!(&bytes[text..text + 3], b"abc");
    bytes[text + 1] = 0xff;
    assert!(matches!(
        Transaction::from_envelope_xdr(&bytes),
        Err(TransactionError::MalformedInput(_))
    ));
}

/// Test that an unknown operation discriminant is rejected.
#[test]
fn test_unknown_operation_type_rejected() {
    let mut account = Account::new(*keypair().public_key(), 0);
    let mut bytes = payment_tx(&mut account).to_envelope_xdr().unwrap();
    // envelope type, source, fee, seq, cond, memo, op count, op source flag
    let op_type = 4 + 36 + 4 + 8 + 4 + 4 + 4 + 4;
    assert_eq!(&bytes[op_type..op_type + 4], &[0, 0, 0, 1]);
    bytes[op_type + 3] = 2; // PATH_PAYMENT_STRICT_RECEIVE is not supported
    assert!(matches!(
        Transaction::from_envelope_xdr(&bytes),
        Err(TransactionError::MalformedInput(_))
    ));
}

/// Test that invalid base64 is reported as malformed input.
#[test]
fn test_invalid_base64_rejected() {
    assert!(matches!(
        Transaction::from_envelope_xdr_base64("not base64!"),
        Err(TransactionError::MalformedInput(_))
    ));
}

/// Test that hand-built assets with bad codes fail to encode instead of panicking.
#[test]
fn test_asset_code_checked_on_encode() {
    let too_long = Asset::CreditAlphanum4 {
        code: "TOOLONG".to_string(),
        issuer: zero_key(),
    };
    assert!(matches!(too_long.to_xdr_bytes(), Err(TransactionError::InvalidAsset(_))));

    let empty = Asset::CreditAlphanum4 {
        code: String::new(),
        issuer: zero_key(),
    };
    assert!(matches!(empty.to_xdr_bytes(), Err(TransactionError::InvalidAsset(_))));

    let short12 = Asset::CreditAlphanum12 {
        code: "USD".to_string(),
        issuer: zero_key(),
    };
    assert!(matches!(short12.to_xdr_bytes(), Err(TransactionError::InvalidAsset(_))));

    let spaced = Asset::CreditAlphanum4 {
        code: "U D".to_string(),
        issuer: zero_key(),
    };
    assert!(matches!(spaced.to_xdr_bytes(), Err(TransactionError::InvalidAsset(_))));

    let ok = Asset::CreditAlphanum12 {
        code: "LONGCODE".to_string(),
        issuer: zero_key(),
    };
    let bytes = ok.to_xdr_bytes().unwrap();
    assert_eq!(Asset::from_xdr_bytes(&bytes).unwrap(), ok);
}

/// Test that claimant lists beyond the limit fail to encode.
#[test]
fn test_too_many_claimants() {
    let claimants: Vec<Claimant> = (0..11)
        .map(|i| Claimant::new(PublicKey::from_bytes([i as u8; 32]), Predicate::unconditional()))
        .collect();
    let op = Operation::create_claimable_balance(Asset::Native, "1", claimants).unwrap();
    assert!(matches!(
        op.to_xdr_bytes(),
        Err(TransactionError::TooManyClaimants { count: 11, max: 10 })
    ));
}

/// Test that an empty claimant list is refused at construction.
#[test]
fn test_empty_claimant_list() {
    assert!(matches!(
        Operation::create_claimable_balance(Asset::Native, "1", vec![]),
        Err(TransactionError::EmptyClaimantList)
    ));
}

/// Test that a too-deep predicate surfaces when the transaction is encoded.
#[test]
fn test_predicate_too_deep_in_transaction() {
    let mut p = Predicate::unconditional();
    for _ in 0..4 {
        p = Predicate::not(p);
    }
    let kp = keypair();
    let mut account = Account::new(*kp.public_key(), 0);
    let tx = TransactionBuilder::new(&mut account)
        .add_operation(
            Operation::create_claimable_balance(Asset::Native, "1", vec![Claimant::new(zero_key(), p)])
                .unwrap(),
        )
        .build()
        .unwrap();
    assert!(matches!(
        tx.to_envelope_xdr(),
        Err(TransactionError::PredicateTooDeep { depth: 5, max: 4 })
    ));
    assert!(matches!(
        tx.hash(&Network::testnet()),
        Err(TransactionError::PredicateTooDeep { .. })
    ));
}

// -----------------------------------------------------------------------
// Hashing and signing
// -----------------------------------------------------------------------

/// Test the transaction hash on testnet and the public network.
#[test]
fn test_hash_vectors() {
    let mut account = Account::new(*keypair().public_key(), 0);
    let tx = payment_tx(&mut account);
    assert_eq!(tx.hash_hex(&Network::testnet()).unwrap(), TESTNET_HASH);
    assert_eq!(tx.hash_hex(&Network::public()).unwrap(), PUBLIC_HASH);
}

/// Test that the signature base is network id, envelope type, then body.
#[test]
fn test_signature_base_layout() {
    let mut account = Account::new(*keypair().public_key(), 0);
    let tx = payment_tx(&mut account);
    let network = Network::testnet();
    let base = tx.signature_base(&network).unwrap();
    assert_eq!(&base[..32], &network.network_id());
    assert_eq!(&base[32..36], &[0, 0, 0, 2]);
    let envelope = tx.to_envelope_xdr().unwrap();
    // envelope = type ‖ body ‖ empty signature array
    assert_eq!(&base[36..], &envelope[4..envelope.len() - 4]);
}

/// Test that signing produces the known envelope and a verifiable signature.
#[test]
fn test_sign_vector() {
    let kp = keypair();
    let mut account = Account::new(*kp.public_key(), 0);
    let mut tx = payment_tx(&mut account);
    tx.sign(&kp, &Network::testnet()).unwrap();

    assert_eq!(tx.signatures().len(), 1);
    let sig = &tx.signatures()[0];
    assert_eq!(hex::encode(sig.hint), "125531b8");
    assert_eq!(hex::encode(&sig.signature), TESTNET_SIGNATURE);
    assert_eq!(tx.to_envelope_xdr_base64().unwrap(), SIGNED_ENVELOPE);

    let hash = tx.hash(&Network::testnet()).unwrap();
    assert!(kp.public_key().verify(&hash, &sig.signature));
}

/// Test that signing is deterministic and separated by network.
#[test]
fn test_signing_determinism_and_network_separation() {
    let kp = keypair();
    let mut account = Account::new(*kp.public_key(), 0);
    let tx = payment_tx(&mut account);

    let mut a = tx.clone();
    let mut b = tx.clone();
    a.sign(&kp, &Network::testnet()).unwrap();
    b.sign(&kp, &Network::testnet()).unwrap();
    assert_eq!(a.signatures(), b.signatures());

    let mut c = tx.clone();
    c.sign(&kp, &Network::public()).unwrap();
    assert_ne!(a.signatures()[0].signature, c.signatures()[0].signature);

    // A testnet signature does not verify against the public-network hash.
    let public_hash = tx.hash(&Network::public()).unwrap();
    assert!(!kp.public_key().verify(&public_hash, &a.signatures()[0].signature));
    assert_ne!(
        tx.hash(&Network::public()).unwrap(),
        tx.hash(&Network::testnet()).unwrap()
    );
}

/// Test that a custom network passphrase changes the hash.
#[test]
fn test_custom_network_hash() {
    let mut account = Account::new(*keypair().public_key(), 0);
    let tx = payment_tx(&mut account);
    let standalone = Network::new("Standalone Network ; February 2017");
    assert_ne!(tx.hash_hex(&standalone).unwrap(), TESTNET_HASH);
}

/// Test that signing with a public-only key pair fails and leaves no signature.
#[test]
fn test_sign_without_secret() {
    let verify_only = KeyPair::from_account_id(ACCOUNT).unwrap();
    let mut account = Account::new(*verify_only.public_key(), 0);
    let mut tx = payment_tx(&mut account);
    assert!(tx.sign(&verify_only, &Network::testnet()).is_err());
    assert!(!tx.is_signed());
}

/// Test that signing twice appends two identical signatures.
#[test]
fn test_duplicate_signing_allowed() {
    let kp = keypair();
    let mut account = Account::new(*kp.public_key(), 0);
    let mut tx = payment_tx(&mut account);
    tx.sign(&kp, &Network::testnet()).unwrap();
    tx.sign(&kp, &Network::testnet()).unwrap();
    assert_eq!(tx.signatures().len(), 2);
    assert_eq!(tx.signatures()[0], tx.signatures()[1]);
}

/// Test that an externally produced signature can be attached.
#[test]
fn test_add_signature() {
    let kp = keypair();
    let mut account = Account::new(*kp.public_key(), 0);
    let mut tx = payment_tx(&mut account);
    tx.add_signature(DecoratedSignature {
        hint: kp.signature_hint(),
        signature: hex::decode(TESTNET_SIGNATURE).unwrap(),
    })
    .unwrap();
    assert_eq!(tx.to_envelope_xdr_base64().unwrap(), SIGNED_ENVELOPE);

    let too_long = DecoratedSignature {
        hint: [0; 4],
        signature: vec![0; 65],
    };
    assert!(tx.add_signature(too_long).is_err());
}

// -----------------------------------------------------------------------
// Builder and mutation rules
// -----------------------------------------------------------------------

/// Test that the fee is the base fee times the operation count.
#[test]
fn test_builder_fee_is_per_operation() {
    let kp = keypair();
    for n in 1..=5u32 {
        let mut account = Account::new(*kp.public_key(), 0);
        let mut builder = TransactionBuilder::new(&mut account).base_fee(150);
        for i in 0..n {
            builder = builder.add_operation(Operation::bump_sequence(i as i64).unwrap());
        }
        let tx = builder.build().unwrap();
        assert_eq!(tx.fee(), 150 * n);
    }
}

/// Test that the default base fee is 100 stroops.
#[test]
fn test_builder_default_fee() {
    let mut account = Account::new(*keypair().public_key(), 0);
    let tx = TransactionBuilder::new(&mut account)
        .add_operation(Operation::bump_sequence(1).unwrap())
        .add_operation(Operation::bump_sequence(2).unwrap())
        .build()
        .unwrap();
    assert_eq!(tx.fee(), 200);
}

/// Test that building without operations fails and leaves the account alone.
#[test]
fn test_builder_empty_operation_list() {
    let mut account = Account::new(*keypair().public_key(), 7);
    let result = TransactionBuilder::new(&mut account).build();
    assert!(matches!(result, Err(TransactionError::EmptyOperationList)));
    assert_eq!(account.sequence_number, 7);
}

/// Test that the account sequence advances by one per successful build.
#[test]
#[traced_test]
fn test_builder_advances_sequence() {
    let mut account = Account::new(*keypair().public_key(), 41);
    let first = payment_tx(&mut account);
    assert_eq!(first.sequence_number(), 42);
    assert_eq!(account.sequence_number, 42);
    let second = payment_tx(&mut account);
    assert_eq!(second.sequence_number(), 43);
    assert_eq!(account.sequence_number, 43);
    assert!(logs_contain("built transaction"));
    assert!(logs_contain("sequence_number=43"));
}

/// Test the operation count limit.
#[test]
fn test_builder_too_many_operations() {
    let mut account = Account::new(*keypair().public_key(), 0);
    let mut builder = TransactionBuilder::new(&mut account);
    for i in 0..101 {
        builder = builder.add_operation(Operation::bump_sequence(i).unwrap());
    }
    assert!(matches!(
        builder.build(),
        Err(TransactionError::TooManyOperations { count: 101, max: 100 })
    ));
    assert_eq!(account.sequence_number, 0);
}

/// Test fee overflow and the minimum base fee.
#[test]
fn test_builder_invalid_fee() {
    let mut account = Account::new(*keypair().public_key(), 0);
    let result = TransactionBuilder::new(&mut account)
        .base_fee(u32::MAX / 2 + 1)
        .add_operation(Operation::bump_sequence(1).unwrap())
        .add_operation(Operation::bump_sequence(2).unwrap())
        .build();
    assert!(matches!(result, Err(TransactionError::InvalidFee(_))));

    let result = TransactionBuilder::new(&mut account)
        .base_fee(99)
        .add_operation(Operation::bump_sequence(1).unwrap())
        .build();
    assert!(matches!(result, Err(TransactionError::InvalidFee(_))));
    assert_eq!(account.sequence_number, 0);
}

/// Test that a muxed account becomes an `M…` source.
#[test]
fn test_builder_muxed_source() {
    let mut account = Account::new(*keypair().public_key(), 0).with_muxed_id(1234);
    let tx = payment_tx(&mut account);
    assert_eq!(
        tx.source_account().address(),
        "MAB2CB576PHBBPQ5ODORRZ2LYCMWPZGWGCN2KDK7DXOIMZASKUY3QAAAAAAAAAAE2KDXS"
    );
}

/// Test that adding an operation raises the fee by one base fee.
#[test]
fn test_add_operation_updates_fee() {
    let mut account = Account::new(*keypair().public_key(), 0);
    let mut tx = TransactionBuilder::new(&mut account)
        .base_fee(300)
        .add_operation(Operation::bump_sequence(1).unwrap())
        .add_operation(Operation::bump_sequence(2).unwrap())
        .build()
        .unwrap();
    tx.add_operation(Operation::bump_sequence(3).unwrap()).unwrap();
    assert_eq!(tx.fee(), 900);
    assert_eq!(tx.operations().len(), 3);
}

/// Test that mutations after signing fail with `AlreadySigned`.
#[test]
fn test_mutation_after_signing() {
    let kp = keypair();
    let mut account = Account::new(*kp.public_key(), 0);
    let mut tx = payment_tx(&mut account);
    tx.set_memo(Memo::id(5)).unwrap();
    tx.sign(&kp, &Network::testnet()).unwrap();

    assert!(matches!(
        tx.add_operation(Operation::bump_sequence(1).unwrap()),
        Err(TransactionError::AlreadySigned)
    ));
    assert!(matches!(tx.set_memo(Memo::None), Err(TransactionError::AlreadySigned)));
    assert_eq!(tx.memo(), &Memo::Id(5));
    assert_eq!(tx.operations().len(), 1);
}

/// Test operation-level validation errors.
#[test]
fn test_operation_validation() {
    assert!(matches!(
        Operation::payment(zero_key(), Asset::Native, "-1"),
        Err(TransactionError::InvalidAmount(_))
    ));
    assert!(matches!(
        Operation::payment(zero_key(), Asset::Native, "1.12345678"),
        Err(TransactionError::InvalidAmount(_))
    ));
    assert!(matches!(
        Operation::change_trust(Asset::Native, None),
        Err(TransactionError::InvalidAsset(_))
    ));
    assert!(Operation::manage_data("", None).is_err());
    assert!(Operation::manage_data(&"n".repeat(65), None).is_err());
    assert!(Operation::manage_data("k", Some(&[0u8; 65])).is_err());
    assert!(Operation::set_options(SetOptionsOp {
        master_weight: Some(256),
        ..SetOptionsOp::default()
    })
    .is_err());
    assert!(Operation::set_options(SetOptionsOp {
        home_domain: Some("x".repeat(33)),
        ..SetOptionsOp::default()
    })
    .is_err());
    assert!(matches!(
        Memo::text("this memo is longer than twenty-eight bytes"),
        Err(TransactionError::InvalidMemo(_))
    ));
}

/// Test signer key StrKey forms and claimable balance id hex.
#[test]
fn test_signer_key_and_balance_id_strings() {
    let key = SignerKey::from_strkey(ACCOUNT).unwrap();
    assert_eq!(key, SignerKey::Ed25519(*keypair().public_key()));
    assert_eq!(key.to_strkey(), ACCOUNT);

    let pre_auth = SignerKey::PreAuthTx([1u8; 32]);
    let s = pre_auth.to_strkey();
    assert!(s.starts_with('T'));
    assert_eq!(SignerKey::from_strkey(&s).unwrap(), pre_auth);

    let hash_x = SignerKey::HashX([2u8; 32]);
    let s = hash_x.to_strkey();
    assert!(s.starts_with('X'));
    assert_eq!(s.parse::<SignerKey>().unwrap(), hash_x);

    let id = ClaimableBalanceId::V0([0xab; 32]);
    let hex_id = id.to_hex();
    assert_eq!(hex_id.len(), 72);
    assert!(hex_id.starts_with("00000000abab"));
    assert_eq!(ClaimableBalanceId::from_hex(&hex_id).unwrap(), id);
    assert_eq!(ClaimableBalanceId::from_hex(&hex::encode([0xab; 32])).unwrap(), id);
    assert!(ClaimableBalanceId::from_hex("00000001abab").is_err());
}

// -----------------------------------------------------------------------
// Results
// -----------------------------------------------------------------------

/// Success, one CREATE_CLAIMABLE_BALANCE with id 0xab…ab, fee 100.
const RESULT_CREATE_CLAIMABLE_BALANCE: &str =
    "AAAAAAAAAGQAAAAAAAAAAQAAAAAAAAAOAAAAAAAAAACrq6urq6urq6urq6urq6urq6urq6urq6urq6urq6urqwAAAAA=";

/// txFAILED: payment success, then payment failure -5, fee 200.
const RESULT_FAILED: &str = "AAAAAAAAAMj/////AAAAAgAAAAAAAAABAAAAAAAAAAAAAAAB////+wAAAAA=";

/// txBAD_SEQ with no operation results, fee 100.
const RESULT_BAD_SEQ: &str = "AAAAAAAAAGT////7AAAAAA==";

/// Test decoding a successful claimable balance result.
#[test]
fn test_result_created_claimable_balance() {
    let result = TransactionResult::from_xdr_base64(RESULT_CREATE_CLAIMABLE_BALANCE).unwrap();
    assert_eq!(result.fee_charged, 100);
    assert!(result.is_success());
    assert_eq!(result.code(), TransactionResultCode::Success);
    assert_eq!(
        result.created_claimable_balance_id(0).unwrap(),
        ClaimableBalanceId::V0([0xab; 32])
    );
    assert!(matches!(
        result.result_value_for_operation(1),
        Err(TransactionError::IndexOutOfRange { index: 1, len: 1 })
    ));
    assert_eq!(result.to_xdr_base64().unwrap(), RESULT_CREATE_CLAIMABLE_BALANCE);
}

/// Test decoding a failed transaction with per-operation codes.
#[test]
fn test_result_failed() {
    let result = TransactionResult::from_xdr_base64(RESULT_FAILED).unwrap();
    assert_eq!(result.fee_charged, 200);
    assert!(!result.is_success());
    assert_eq!(result.code().name(), "tx_failed");
    let ops = result.operation_results();
    assert_eq!(ops.len(), 2);
    assert!(ops[0].is_success());
    assert_eq!(
        ops[1],
        OperationResult::Inner(OperationInnerResult::Payment(OpResult::Failure(-5)))
    );
    assert!(matches!(
        result.created_claimable_balance_id(0),
        Err(TransactionError::UnexpectedOperationResultType { .. })
    ));
}

/// Test decoding a rejected transaction.
#[test]
fn test_result_bad_seq() {
    let result = TransactionResult::from_xdr_base64(RESULT_BAD_SEQ).unwrap();
    assert_eq!(result.code(), TransactionResultCode::BadSeq);
    assert_eq!(result.code().to_string(), "tx_bad_seq");
    assert!(result.operation_results().is_empty());
}

/// Test fee-bump results and offer effects survive a round trip.
#[test]
fn test_result_fee_bump_roundtrip() {
    let offer = ManageOfferSuccess {
        offers_claimed: vec![
            ClaimAtom::OrderBook {
                seller_id: zero_key(),
                offer_id: 9,
                asset_sold: usd(),
                amount_sold: 10,
                asset_bought: Asset::Native,
                amount_bought: 20,
            },
            ClaimAtom::LiquidityPool {
                liquidity_pool_id: [3u8; 32],
                asset_sold: Asset::Native,
                amount_sold: 1,
                asset_bought: usd(),
                amount_bought: 2,
            },
        ],
        offer: ManageOfferEffect::Created(OfferEntry {
            seller_id: *keypair().public_key(),
            offer_id: 77,
            selling: Asset::Native,
            buying: usd(),
            amount: 500,
            price: Price::new(1, 2).unwrap(),
            flags: 0,
        }),
    };
    let inner = TransactionResultBody::Success(vec![
        OperationResult::Inner(OperationInnerResult::ManageSellOffer(OpResult::Success(offer))),
        OperationResult::Inner(OperationInnerResult::AccountMerge(OpResult::Success(1234))),
        OperationResult::BadAuth,
    ]);
    let result = TransactionResult {
        fee_charged: 300,
        result: TransactionResultBody::FeeBumpInnerSuccess(crate::result::InnerTransactionResultPair {
            transaction_hash: [5u8; 32],
            result: crate::result::InnerTransactionResult {
                fee_charged: 200,
                result: Box::new(inner),
            },
        }),
    };
    let bytes = result.to_xdr_bytes().unwrap();
    let decoded = TransactionResult::from_xdr_bytes(&bytes).unwrap();
    assert_eq!(decoded, result);
    assert!(decoded.is_success());
    assert_eq!(decoded.operation_results().len(), 3);
}

/// Test that result codes outside an operation's range are rejected.
#[test]
fn test_result_out_of_range_code() {
    let mut bytes = TransactionResult::from_xdr_base64(RESULT_FAILED)
        .unwrap()
        .to_xdr_bytes()
        .unwrap();
    // last op's payment code -5 -> -10 (payment codes end at -9)
    let n = bytes.len();
    bytes[n - 5] = 0xf6;
    assert!(matches!(
        TransactionResult::from_xdr_bytes(&bytes),
        Err(TransactionError::MalformedInput(_))
    ));
}

// -----------------------------------------------------------------------
// Txrep
// -----------------------------------------------------------------------

/// Test that txrep output of a simple payment has the expected lines.
#[test]
fn test_txrep_payment_lines() {
    let kp = keypair();
    let mut account = Account::new(*kp.public_key(), 0);
    let mut tx = payment_tx(&mut account);
    tx.sign(&kp, &Network::testnet()).unwrap();
    let text = tx.to_txrep();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "type: ENVELOPE_TYPE_TX");
    assert!(lines.contains(
        &format!("tx.sourceAccount: {} (transaction source account)", ACCOUNT).as_str()
    ));
    assert!(lines.contains(&"tx.fee: 100 (total fee in stroops)"));
    assert!(lines.contains(&"tx.seqNum: 1 (sequence number)"));
    assert!(lines.contains(&"tx.cond.type: PRECOND_NONE"));
    assert!(lines.contains(&"tx.memo.type: MEMO_NONE"));
    assert!(lines.contains(&"tx.operations.len: 1"));
    assert!(lines.contains(&"tx.operations[0].sourceAccount._present: false"));
    assert!(lines.contains(&"tx.operations[0].body.type: PAYMENT"));
    assert!(lines.contains(&"tx.operations[0].body.paymentOp.asset: XLM"));
    assert!(lines.contains(&"tx.operations[0].body.paymentOp.amount: 100000000 (10.0000000)"));
    assert!(lines.contains(&"signatures.len: 1"));
    assert!(lines.contains(&format!("signatures[0].hint: 125531b8 (signer {})", ACCOUNT).as_str()));
    assert_eq!(Transaction::from_txrep(&text).unwrap(), tx);
}

/// Test that time bounds, memos, operation sources and predicate times carry
/// a comment naming their role, and that the comments survive parsing.
#[test]
fn test_txrep_role_comments() {
    let kp = keypair();
    let other = PublicKey::from_bytes([7u8; 32]);
    let mut account = Account::new(*kp.public_key(), 0);
    let mut tx = TransactionBuilder::new(&mut account)
        .time_bounds(TimeBounds::new(1_600_000_000, 0))
        .memo(Memo::Id(42))
        .add_operation(
            Operation::create_claimable_balance(
                Asset::Native,
                "1",
                vec![Claimant::new(
                    other,
                    Predicate::or(
                        Predicate::BeforeAbsoluteTime(1_700_000_000),
                        Predicate::BeforeRelativeTime(3600),
                    ),
                )],
            )
            .unwrap()
            .with_source_account(MuxedAccount::Ed25519(other)),
        )
        .build()
        .unwrap();
    tx.sign(&kp, &Network::testnet()).unwrap();
    tx.sign(&KeyPair::from_raw_seed(&[9u8; 32]).unwrap(), &Network::testnet())
        .unwrap();
    let text = tx.to_txrep();
    let lines: Vec<&str> = text.lines().collect();

    assert!(lines.contains(&"tx.cond.timeBounds.minTime: 1600000000 (earliest unix time)"));
    assert!(lines.contains(&"tx.cond.timeBounds.maxTime: 0 (no upper bound)"));
    assert!(lines.contains(&"tx.memo.id: 42 (memo id)"));
    assert!(lines.contains(
        &format!(
            "tx.operations[0].sourceAccount: {} (operation source account)",
            other.account_id()
        )
        .as_str()
    ));
    let predicate = "tx.operations[0].body.createClaimableBalanceOp.claimants[0].v0.predicate";
    assert!(lines.contains(
        &format!(
            "{}.orPredicates[0].absBefore: 1700000000 (claimable before this unix time)",
            predicate
        )
        .as_str()
    ));
    assert!(lines.contains(
        &format!(
            "{}.orPredicates[1].relBefore: 3600 (seconds after the balance is created)",
            predicate
        )
        .as_str()
    ));
    assert!(lines.contains(&format!("signatures[0].hint: 125531b8 (signer {})", ACCOUNT).as_str()));
    assert!(lines
        .iter()
        .any(|l| l.starts_with("signatures[1].hint:") && l.ends_with("(signer not among the source accounts)")));
    assert_eq!(Transaction::from_txrep(&text).unwrap(), tx);
}

/// Test the txrep round trip over every operation type.
#[test]
fn test_txrep_kitchen_sink_roundtrip() {
    let mut tx = kitchen_sink_tx();
    tx.sign(&keypair(), &Network::public()).unwrap();
    let text = tx.to_txrep();
    assert!(text.contains("tx.memo.text: \"quote \\\" and \\\\ ok\""));
    assert!(text.contains("predicate.type: CLAIM_PREDICATE_AND"));
    assert!(text.contains("andPredicates[0].notPredicate._present: true"));
    let parsed = Transaction::from_txrep(&text).expect("txrep should parse");
    assert_eq!(parsed, tx);
    assert_eq!(
        parsed.hash(&Network::public()).unwrap(),
        tx.hash(&Network::public()).unwrap()
    );
}

/// Test that hand-written txrep with comments and blank lines parses.
#[test]
fn test_txrep_hand_written() {
    let text = format!(
        "type: ENVELOPE_TYPE_TX\n\
         tx.sourceAccount: {account} (source)\n\
         tx.fee: 100\n\
         tx.seqNum: 1\n\
         \n\
         tx.cond.type: PRECOND_NONE\n\
         tx.memo.type: MEMO_NONE\n\
         tx.operations.len: 1\n\
         tx.operations[0].sourceAccount._present: false\n\
         tx.operations[0].body.type: PAYMENT\n\
         tx.operations[0].body.paymentOp.destination: {zero}\n\
         tx.operations[0].body.paymentOp.asset: XLM\n\
         tx.operations[0].body.paymentOp.amount: 100000000 (10 XLM)\n\
         tx.ext.v: 0\n\
         signatures.len: 0\n",
        account = ACCOUNT,
        zero = ZERO_ACCOUNT
    );
    let tx = Transaction::from_txrep(&text).unwrap();
    assert_eq!(tx.to_envelope_xdr_base64().unwrap(), UNSIGNED_ENVELOPE);
}

/// Test that broken txrep is reported as malformed input.
#[test]
fn test_txrep_malformed() {
    let mut account = Account::new(*keypair().public_key(), 0);
    let text = payment_tx(&mut account).to_txrep();

    let missing_fee: String = text
        .lines()
        .filter(|l| !l.starts_with("tx.fee:"))
        .map(|l| format!("{}\n", l))
        .collect();
    assert!(matches!(
        Transaction::from_txrep(&missing_fee),
        Err(TransactionError::MalformedInput(_))
    ));

    let bad_type = text.replace("body.type: PAYMENT", "body.type: INFLATION");
    assert!(matches!(
        Transaction::from_txrep(&bad_type),
        Err(TransactionError::MalformedInput(_))
    ));

    let bad_asset = text.replace("paymentOp.asset: XLM", "paymentOp.asset: NOT-AN-ASSET");
    assert!(matches!(
        Transaction::from_txrep(&bad_asset),
        Err(TransactionError::MalformedInput(_))
    ));

    assert!(matches!(
        Transaction::from_txrep("no separator here"),
        Err(TransactionError::MalformedInput(_))
    ));
}
