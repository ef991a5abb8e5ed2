//! Tests for the rawtx-transaction crate.
//!
//! Covers parsing and serialization roundtrips, txid computation, legacy
//! sighash under every flag combination, and the unlocking templates.
//! Signature hashes and signed transactions were computed independently.

use rawtx_primitives::ec::PrivateKey;
use rawtx_primitives::hash::hash160;
use rawtx_script::{Address, Network, Script};

use crate::input::DEFAULT_SEQUENCE_NUMBER;
use crate::output::TransactionOutput;
use crate::sighash::{self, *};
use crate::template::{p2pk, p2pkh, p2sh, UnlockingScriptTemplate};
use crate::transaction::Transaction;
use crate::TransactionError;

// -----------------------------------------------------------------------
// Fixtures
// -----------------------------------------------------------------------

/// A standard one-input, two-output transaction.
const SOURCE_RAW_TX: &str = "010000000138c7c61c14ffb063c3bb2664041a3e29ea6ea0412a0c18ff725ba4e9e12afae2030000006a47304402203e9ab8e4c14addf3b4741540b556cfb0e0efb67dc1a7b5ce84c3ac56b3fd447802203c9f49f7bd893ebd7060176dfc36bcaff9d2c443d9a0dd6cd2d59b372c024d20412102798913bc057b344de675dac34faafe3dc2f312c758cd9068209f810877306d66ffffffff02dc050000000000002076a914eb0bd5edba389198e73f8efabddfc61666969ff788ac6a0568656c6c6faa0d0000000000001976a914eb0bd5edba389198e73f8efabddfc61666969ff788ac00000000";

/// A three-input transaction with version 2 and a non-zero lock time.
const MULTI_INPUT_TX_HEX: &str = "0200000003a9bc457fdc6a54d99300fb137b23714d860c350a9d19ff0f571e694a419ff3a0010000006b48304502210086c83beb2b2663e4709a583d261d75be538aedcafa7766bd983e5c8db2f8b2fc02201a88b178624ab0ad1748b37c875f885930166237c88f5af78ee4e61d337f935f412103e8be830d98bb3b007a0343ee5c36daa48796ae8bb57946b1e87378ad6e8a090dfeffffff0092bb9a47e27bf64fc98f557c530c04d9ac25e2f2a8b600e92a0b1ae7c89c20010000006b483045022100f06b3db1c0a11af348401f9cebe10ae2659d6e766a9dcd9e3a04690ba10a160f02203f7fbd7dfcfc70863aface1a306fcc91bbadf6bc884c21a55ef0d32bd6b088c8412103e8be830d98bb3b007a0343ee5c36daa48796ae8bb57946b1e87378ad6e8a090dfeffffff9d0d4554fa692420a0830ca614b6c60f1bf8eaaa21afca4aa8c99fb052d9f398000000006b483045022100d920f2290548e92a6235f8b2513b7f693a64a0d3fa699f81a034f4b4608ff82f0220767d7d98025aff3c7bd5f2a66aab6a824f5990392e6489aae1e1ae3472d8dffb412103e8be830d98bb3b007a0343ee5c36daa48796ae8bb57946b1e87378ad6e8a090dfeffffff02807c814a000000001976a9143a6bf34ebfcf30e8541bbb33a7882845e5a29cb488ac76b0e60e000000001976a914bd492b67f90cb85918494767ebb23102c4f06b7088ac67000000";

const KEY_HEX: &str = "1234567890abcdef1234567890abcdef1234567890abcdef1234567890abcdef";
const KEY_PKH: &str = "a390bb4d6d4ab570767ef21f66c3edc1a4d69026";

const TXID_0: &str = "e2fa2ae1e9a45b72ff180c2a41a06eea293e1a046426bbc363b0ff141cc6c738";
const TXID_1: &str = "4a5e1e4baab89f3a32518a88c31bc87f618f76673e2cc77ab2127b7afdeda33b";
const TXID_2: &str = "0e3e2357e806b6cdb1f70b54c3a3a17b6714ee1f0e68bebb44a74b1efd512098";

/// Unsigned serialization of `sample_tx(3)`.
const SAMPLE_UNSIGNED_HEX: &str = "010000000338c7c61c14ffb063c3bb2664041a3e29ea6ea0412a0c18ff725ba4e9e12afae20300000000ffffffff3ba3edfd7a7b12b27ac72c3e67768f617fc81bc3888a51323a9fb8aa4b1e5e4a0000000000feffffff982051fd1e4ba744bbbe680e1fee14677ba1a3c3540bf7b1cdb606e857233e0e0100000000ffffffff02409c0000000000001976a9148fe80c75c9560e8b56ed64ea3c26e18d2c52211b88ac282300000000000017a9143505ae5f796b56edf37a613860c209b6925616948700000000";

/// `sample_tx(2)` with both inputs signed by `KEY_HEX` under SIGHASH_ALL.
const SAMPLE_SIGNED_HEX: &str = "010000000238c7c61c14ffb063c3bb2664041a3e29ea6ea0412a0c18ff725ba4e9e12afae2030000006b483045022100b39827cf0e9ed54a2d4129b90be8a9e672823092aa9f05fe5c22bb3d5bfc6251022006287e5eaea9691e47703cbf5172c1c144e7f4e33bb4323e058c7444832902ea012102bb50e2d89a4ed70663d080659fe0ad4b9bc3e06c17a227433966cb59ceee020dffffffff3ba3edfd7a7b12b27ac72c3e67768f617fc81bc3888a51323a9fb8aa4b1e5e4a000000006a47304402205ff8939b35f846cb72f7df72a8c10f50d4b3d93afaf65099d88481b6d36f7e67022008f083ffa030300b94102a52977ce4c5c2224bf52d23a07f2b0ca8fedfca32c3012102bb50e2d89a4ed70663d080659fe0ad4b9bc3e06c17a227433966cb59ceee020dfeffffff02409c0000000000001976a9148fe80c75c9560e8b56ed64ea3c26e18d2c52211b88ac282300000000000017a9143505ae5f796b56edf37a613860c209b6925616948700000000";

fn key() -> PrivateKey {
    PrivateKey::from_hex(KEY_HEX).unwrap()
}

fn key_script() -> Script {
    let mut pkh = [0u8; 20];
    pkh.copy_from_slice(&hex::decode(KEY_PKH).unwrap());
    Script::new_p2pkh(&pkh)
}

/// P2SH script whose redeem script is `key_script()`.
fn wrapped_key_script() -> Script {
    Script::new_p2sh(&hash160(key_script().to_bytes()))
}

fn outputs() -> Vec<TransactionOutput> {
    vec![
        TransactionOutput::new(
            40_000,
            Script::from_hex("76a9148fe80c75c9560e8b56ed64ea3c26e18d2c52211b88ac").unwrap(),
        ),
        TransactionOutput::new(
            9_000,
            Script::from_hex("a9143505ae5f796b56edf37a613860c209b69256169487").unwrap(),
        ),
    ]
}

/// A transaction with the first `n_inputs` of three fixed inputs, all
/// spending P2PKH outputs of `KEY_HEX`, and two outputs.
fn sample_tx(n_inputs: usize) -> Transaction {
    let mut tx = Transaction::new();
    let spends = [(TXID_0, 3u32), (TXID_1, 0), (TXID_2, 1)];
    for (txid, vout) in spends.iter().take(n_inputs) {
        tx.add_input_from(txid, *vout, &key_script().to_hex(), 50_000)
            .unwrap();
    }
    if n_inputs > 1 {
        tx.inputs[1].sequence_number = 0xffff_fffe;
    }
    for output in outputs() {
        tx.add_output(output);
    }
    tx
}

/// Sign every input against the unsigned transaction, then apply.
fn sign_all(tx: &Transaction, template: &dyn UnlockingScriptTemplate) -> Transaction {
    let scripts: Vec<Script> = (0..tx.inputs.len())
        .map(|i| template.sign(tx, i as u32).unwrap())
        .collect();
    let mut signed = tx.clone();
    for (input, script) in signed.inputs.iter_mut().zip(scripts) {
        input.unlocking_script = Some(script);
    }
    signed
}

// -----------------------------------------------------------------------
// Parsing and serialization
// -----------------------------------------------------------------------

/// A transaction parsed from hex re-serializes to the same hex.
#[test]
fn test_from_hex_roundtrip() {
    let tx = Transaction::from_hex(SOURCE_RAW_TX).expect("should parse source tx hex");
    assert_eq!(tx.version, 1, "version should be 1");
    assert_eq!(tx.input_count(), 1, "should have 1 input");
    assert_eq!(tx.output_count(), 2, "should have 2 outputs");
    assert_eq!(tx.lock_time, 0, "lock time should be 0");
    assert_eq!(tx.to_hex(), SOURCE_RAW_TX, "hex roundtrip should be identical");
}

/// A multi-input transaction keeps version, lock time, and ordering.
#[test]
fn test_multi_input_roundtrip() {
    let tx = Transaction::from_hex(MULTI_INPUT_TX_HEX).expect("should parse multi-input tx");
    assert_eq!(tx.version, 2);
    assert_eq!(tx.input_count(), 3);
    assert_eq!(tx.output_count(), 2);
    assert_eq!(tx.lock_time, 103, "lock time should be 103 (0x67)");
    assert_eq!(
        tx.inputs[0].source_txid_hex(),
        "a0f39f414a691e570fff199d0a350c864d71237b13fb0093d9546adc7f45bca9"
    );
    assert_eq!(tx.to_hex(), MULTI_INPUT_TX_HEX);
}

/// Trailing bytes and truncation are rejected.
#[test]
fn test_from_bytes_rejects_malformed() {
    let mut bytes = hex::decode(SOURCE_RAW_TX).unwrap();
    bytes.push(0x00);
    assert!(matches!(
        Transaction::from_bytes(&bytes),
        Err(TransactionError::SerializationError(_))
    ));

    let bytes = hex::decode(SOURCE_RAW_TX).unwrap();
    assert!(Transaction::from_bytes(&bytes[..bytes.len() - 1]).is_err());
    assert!(Transaction::from_hex("zz").is_err());
}

/// A freshly built transaction serializes to the expected unsigned layout:
/// version 1 prefix, empty scriptSigs, lock time 0 suffix.
#[test]
fn test_unsigned_serialization() {
    let tx = sample_tx(3);
    let hex = tx.to_hex();
    assert_eq!(hex, SAMPLE_UNSIGNED_HEX);
    assert!(hex.starts_with("01000000"));
    assert!(hex.ends_with("00000000"));
    assert_eq!(tx.size(), hex.len() / 2);
    assert!(tx.size_hint() >= tx.size());
}

/// Input and output totals.
#[test]
fn test_totals() {
    let tx = sample_tx(3);
    assert_eq!(tx.total_input_satoshis().unwrap(), 150_000);
    assert_eq!(tx.total_output_satoshis(), 49_000);

    let parsed = Transaction::from_hex(SOURCE_RAW_TX).unwrap();
    assert!(parsed.total_input_satoshis().is_err());
}

/// The txid is the byte-reversed double SHA-256 of the serialization.
#[test]
fn test_tx_id() {
    let tx = Transaction::from_hex(SAMPLE_SIGNED_HEX).unwrap();
    assert_eq!(
        tx.tx_id_hex(),
        "6f9a50a0d4358588cda4c08f5a1523f2e932294df0d0159f0f8ac860d1f90948"
    );
}

// -----------------------------------------------------------------------
// Legacy signature hash
// -----------------------------------------------------------------------

/// The SIGHASH_ALL preimage of input 0 places the script code in input 0
/// and empties the other scriptSigs.
#[test]
fn test_preimage_all() {
    let tx = sample_tx(3);
    let preimage =
        sighash::calc_preimage(&tx, 0, key_script().to_bytes(), SIGHASH_ALL).unwrap();
    let expected = format!(
        "{}{}",
        SAMPLE_UNSIGNED_HEX.replacen(
            "0300000000ffffffff",
            &format!("0300000019{}ffffffff", key_script().to_hex()),
            1
        ),
        "01000000"
    );
    assert_eq!(hex::encode(preimage), expected);
}

/// Signature hashes for every base type and the ANYONECANPAY modifier.
#[test]
fn test_signature_hash_vectors() {
    let tx = sample_tx(3);
    let code = key_script();
    let cases: [(usize, u32, &str); 7] = [
        (0, SIGHASH_ALL, "0fbd3043c15bd3134a7bcdb724d322ccf52297618a160d4771d697a09559a3d5"),
        (1, SIGHASH_ALL, "33325cb93421e5a1e4f616bc54e4ede67044fe63227c54d98994ff09e1096255"),
        (1, SIGHASH_NONE, "b4cd6512ee9a9e7e68a2b00c8522a81f339f7d863a398029d30dab6e2b13ab79"),
        (1, SIGHASH_SINGLE, "f30c2150b6eb5bf2bd7e3b1d1cf588b00d1917b1a08b19b92cb7519d46379249"),
        (
            2,
            SIGHASH_ALL | SIGHASH_ANYONECANPAY,
            "7a6402dafbe22745fea5ad0668a6dcc7f5fb0a8a01247df91d5cbf659f12c346",
        ),
        (
            0,
            SIGHASH_SINGLE | SIGHASH_ANYONECANPAY,
            "c2ef47203c9e05ad8ec54d0a4171f6653519e997aef3ec6472e3edc5aea7e0be",
        ),
        (
            1,
            SIGHASH_NONE | SIGHASH_ANYONECANPAY,
            "0937d0a32b3457ac30dc47efa6f1c9ea5043780e7a7699bb8a1ce2bd4c5b5ab0",
        ),
    ];
    for (idx, flag, expected) in cases {
        let hash = sighash::signature_hash(&tx, idx, code.to_bytes(), flag).unwrap();
        assert_eq!(hex::encode(hash), expected, "input {} flag {:#x}", idx, flag);
    }
}

/// SIGHASH_SINGLE without a matching output yields the digest 1 and has no preimage.
#[test]
fn test_sighash_single_out_of_range() {
    let tx = sample_tx(3);
    let code = key_script();
    let hash = sighash::signature_hash(&tx, 2, code.to_bytes(), SIGHASH_SINGLE).unwrap();
    assert_eq!(hash, SIGHASH_SINGLE_NO_OUTPUT);
    assert_eq!(
        hex::encode(hash),
        "0100000000000000000000000000000000000000000000000000000000000000"
    );
    assert!(sighash::calc_preimage(&tx, 2, code.to_bytes(), SIGHASH_SINGLE).is_err());
}

/// The signature hash ignores whatever scriptSigs the inputs already carry.
#[test]
fn test_sighash_ignores_existing_scripts() {
    let tx = sample_tx(3);
    let mut dirty = tx.clone();
    dirty.inputs[1].unlocking_script = Some(Script::from_bytes(&[0x51, 0x52]));
    dirty.inputs[0].unlocking_script = Some(Script::from_bytes(&[0x53]));
    for flag in [SIGHASH_ALL, SIGHASH_NONE, SIGHASH_SINGLE] {
        assert_eq!(
            tx.calc_input_signature_hash(0, flag).unwrap(),
            dirty.calc_input_signature_hash(0, flag).unwrap()
        );
    }
}

/// Out-of-range inputs and missing source outputs are errors.
#[test]
fn test_sighash_errors() {
    let tx = sample_tx(1);
    assert!(matches!(
        sighash::signature_hash(&tx, 1, &[], SIGHASH_ALL),
        Err(TransactionError::InvalidTransaction(_))
    ));
    let parsed = Transaction::from_hex(SOURCE_RAW_TX).unwrap();
    assert!(matches!(
        parsed.calc_input_signature_hash(0, SIGHASH_ALL),
        Err(TransactionError::SigningError(_))
    ));
}

// -----------------------------------------------------------------------
// Templates
// -----------------------------------------------------------------------

/// P2PKH signing reproduces an independently computed signed transaction.
#[test]
fn test_p2pkh_sign_golden() {
    let tx = sample_tx(2);
    let signed = sign_all(&tx, &p2pkh::unlock(key(), None));
    assert_eq!(signed.to_hex(), SAMPLE_SIGNED_HEX);
    assert!(signed.inputs.iter().all(|i| i.is_signed()));
}

/// Each P2PKH unlocking script carries a signature that verifies against
/// the recomputed signature hash.
#[test]
fn test_p2pkh_signature_verifies() {
    let tx = sample_tx(3);
    let template = p2pkh::unlock(key(), None);
    let pub_key = key().pub_key();
    for idx in 0..3 {
        let script = template.sign(&tx, idx).unwrap();
        let chunks = script.chunks().unwrap();
        assert_eq!(chunks.len(), 2);
        let sig_bytes = chunks[0].data.as_ref().unwrap();
        assert_eq!(*sig_bytes.last().unwrap(), SIGHASH_ALL as u8);
        assert_eq!(chunks[1].data.as_deref(), Some(&pub_key.to_compressed()[..]));

        let sig = rawtx_primitives::ec::Signature::from_der(&sig_bytes[..sig_bytes.len() - 1])
            .unwrap();
        let hash = tx.calc_input_signature_hash(idx as usize, SIGHASH_ALL).unwrap();
        assert!(pub_key.verify(&hash, &sig));
    }
}

/// P2PKH refuses inputs locked to another key or missing source info.
#[test]
fn test_p2pkh_sign_errors() {
    let mut tx = sample_tx(1);
    let other = PrivateKey::from_hex(
        "0000000000000000000000000000000000000000000000000000000000000001",
    )
    .unwrap();
    assert!(matches!(
        p2pkh::unlock(other, None).sign(&tx, 0),
        Err(TransactionError::SigningError(_))
    ));
    assert!(matches!(
        p2pkh::unlock(key(), None).sign(&tx, 5),
        Err(TransactionError::SigningError(_))
    ));
    tx.inputs[0].set_source_output(None);
    assert!(p2pkh::unlock(key(), None).sign(&tx, 0).is_err());
}

/// Address locking scripts are the scripts the templates spend.
#[test]
fn test_address_locking_scripts() {
    let p2pkh_addr = Address::from_string("1FurXQBd7xqdDBtTxBvFWEd9AX6tjKHX1C").unwrap();
    let p2sh_addr = Address::from_string("2Mx5acBcXigHun6VsdMQgBd2SzbnHQL2cwH").unwrap();
    assert_eq!(p2pkh_addr.locking_script(), key_script());
    assert_eq!(p2sh_addr.locking_script(), wrapped_key_script());
    assert_eq!(
        Address::from_redeem_script(&key_script(), Network::Testnet),
        p2sh_addr
    );
}

/// P2SH-wrapped P2PKH spend matches an independently computed transaction.
#[test]
fn test_p2sh_sign_golden() {
    let redeem = key_script();
    let mut tx = Transaction::new();
    tx.add_input_from(TXID_2, 1, &wrapped_key_script().to_hex(), 50_000)
        .unwrap();
    tx.add_output(outputs().remove(0));

    let template = p2sh::unlock(key(), redeem.clone(), None).unwrap();
    assert_eq!(template.redeem_script(), &redeem);
    let signed = sign_all(&tx, &template);
    assert_eq!(
        signed.to_hex(),
        "0100000001982051fd1e4ba744bbbe680e1fee14677ba1a3c3540bf7b1cdb606e857233e0e0100000085483045022100ccbc720d4f096b1207ab3b908debc1b8b458128fc3485fd71c37c91da3495ee1022042c5358629e1ecba7d432e9466e5e479eda49b76959d1be3cc7d3361d1020b20012102bb50e2d89a4ed70663d080659fe0ad4b9bc3e06c17a227433966cb59ceee020d1976a914a390bb4d6d4ab570767ef21f66c3edc1a4d6902688acffffffff01409c0000000000001976a9148fe80c75c9560e8b56ed64ea3c26e18d2c52211b88ac00000000"
    );
    let estimate = template.estimate_length(&tx, 0) as usize;
    let actual = signed.inputs[0].unlocking_script.as_ref().unwrap().len();
    assert!(estimate >= actual, "estimate {} actual {}", estimate, actual);
}

/// P2SH refuses foreign redeem scripts and mismatched script hashes.
#[test]
fn test_p2sh_errors() {
    let other_pkh = [0x11u8; 20];
    assert!(p2sh::unlock(key(), Script::new_p2pkh(&other_pkh), None).is_err());
    assert!(p2sh::unlock(key(), Script::from_bytes(&[0x51]), None).is_err());

    // Source output commits to a different redeem script.
    let mut tx = Transaction::new();
    tx.add_input_from(
        TXID_2,
        1,
        &Script::new_p2sh(&hash160(&[0x51])).to_hex(),
        50_000,
    )
    .unwrap();
    tx.add_output(outputs().remove(0));
    let template = p2sh::unlock(key(), key_script(), None).unwrap();
    assert!(matches!(
        template.sign(&tx, 0),
        Err(TransactionError::SigningError(_))
    ));

    // Source output is not P2SH at all.
    let tx = sample_tx(1);
    assert!(template.sign(&tx, 0).is_err());
}

/// Bare P2PK spend matches an independently computed transaction.
#[test]
fn test_p2pk_sign_golden() {
    let lock = Script::new_p2pk(&key().pub_key().to_compressed()).unwrap();
    let mut tx = Transaction::new();
    tx.add_input_from(TXID_2, 1, &lock.to_hex(), 50_000).unwrap();
    tx.add_output(outputs().remove(0));
    assert_eq!(tx.inputs[0].sequence_number, DEFAULT_SEQUENCE_NUMBER);

    let signed = sign_all(&tx, &p2pk::unlock(key(), None));
    assert_eq!(
        signed.to_hex(),
        "0100000001982051fd1e4ba744bbbe680e1fee14677ba1a3c3540bf7b1cdb606e857233e0e010000004847304402200911685c131b12a44f51dadc3ea84e571b40bb18b846ec4fe2ece033b5511d2e02201cf0fd92a5cffa7dcb71f787d4aeef3c26b1a5e091598a20fc2cd3c202acd69401ffffffff01409c0000000000001976a9148fe80c75c9560e8b56ed64ea3c26e18d2c52211b88ac00000000"
    );

    // A P2PKH source output is not a P2PK spend.
    assert!(p2pk::unlock(key(), None).sign(&sample_tx(1), 0).is_err());
}
