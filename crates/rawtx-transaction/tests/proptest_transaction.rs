use proptest::prelude::*;

use rawtx_primitives::chainhash::Hash;
use rawtx_script::Script;
use rawtx_transaction::sighash::{self, SIGHASH_ALL};
use rawtx_transaction::{Transaction, TransactionInput, TransactionOutput};

/// Strategy to generate a random transaction.
fn arb_transaction() -> impl Strategy<Value = Transaction> {
    let arb_input = (
        prop::array::uniform32(any::<u8>()),       // prev tx hash
        any::<u32>(),                              // prev tx index
        prop::collection::vec(any::<u8>(), 0..64), // script bytes
        any::<u32>(),                              // sequence
    )
        .prop_map(|(hash, idx, script_bytes, seq)| {
            let mut input = TransactionInput::new(&Hash::new(hash), idx);
            input.unlocking_script = if script_bytes.is_empty() {
                None
            } else {
                Some(Script::from_bytes(&script_bytes))
            };
            input.sequence_number = seq;
            input
        });

    let arb_output = (any::<u64>(), prop::collection::vec(any::<u8>(), 0..64))
        .prop_map(|(satoshis, script_bytes)| {
            TransactionOutput::new(satoshis, Script::from_bytes(&script_bytes))
        });

    (
        any::<u32>(), // version
        prop::collection::vec(arb_input, 1..4),
        prop::collection::vec(arb_output, 1..4),
        any::<u32>(), // locktime
    )
        .prop_map(|(version, inputs, outputs, locktime)| {
            let mut tx = Transaction::new();
            tx.version = version;
            tx.lock_time = locktime;
            for i in inputs {
                tx.add_input(i);
            }
            for o in outputs {
                tx.add_output(o);
            }
            tx
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn transaction_serialize_deserialize_roundtrip(tx in arb_transaction()) {
        let bytes = tx.to_bytes();
        let tx2 = Transaction::from_bytes(&bytes).unwrap();
        prop_assert_eq!(&tx2, &tx);
        prop_assert_eq!(tx2.to_bytes(), bytes);
    }

    #[test]
    fn transaction_hex_is_lowercase(tx in arb_transaction()) {
        let hex_str = tx.to_hex();
        prop_assert!(hex_str.chars().all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
        prop_assert_eq!(hex_str.len(), tx.size() * 2);
    }

    #[test]
    fn sighash_all_independent_of_script_sigs(
        tx in arb_transaction(),
        code in prop::collection::vec(any::<u8>(), 0..40),
    ) {
        let mut cleared = tx.clone();
        for input in &mut cleared.inputs {
            input.unlocking_script = None;
        }
        for idx in 0..tx.inputs.len() {
            prop_assert_eq!(
                sighash::signature_hash(&tx, idx, &code, SIGHASH_ALL).unwrap(),
                sighash::signature_hash(&cleared, idx, &code, SIGHASH_ALL).unwrap()
            );
        }
    }
}
