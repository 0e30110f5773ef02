//! Property-based tests for the outcome decode table.

use proptest::prelude::*;
use qrpg_core::{decode_counts, decode_outcome};
use qrpg_hal::Counts;

fn bitstring(value: u8) -> String {
    format!("{value:05b}")
}

fn arb_outcome() -> impl Strategy<Value = u8> {
    0u8..32
}

proptest! {
    #[test]
    fn decoded_characters_are_printable(value in arb_outcome()) {
        let ch = decode_outcome(&bitstring(value)).unwrap();
        prop_assert!((33..=126).contains(&(ch as u32)));
    }

    #[test]
    fn tag_zero_and_two_add_64(value in arb_outcome().prop_filter("tag 0 or 2", |v| v & 1 == 0)) {
        let ch = decode_outcome(&bitstring(value)).unwrap();
        prop_assert_eq!(ch as u32, u32::from(value) + 64);
    }

    #[test]
    fn tag_one_adds_32(value in arb_outcome().prop_filter("tag 1", |v| v & 0b11 == 1)) {
        let ch = decode_outcome(&bitstring(value)).unwrap();
        prop_assert_eq!(ch as u32, u32::from(value) + 32);
    }

    #[test]
    fn tag_three_adds_96_capped(value in arb_outcome().prop_filter("tag 3", |v| v & 0b11 == 3)) {
        let ch = decode_outcome(&bitstring(value)).unwrap();
        let expected = (u32::from(value) + 96).min(126);
        prop_assert_eq!(ch as u32, expected);
    }

    #[test]
    fn password_length_equals_total_shots(
        entries in prop::collection::btree_map(arb_outcome(), 1u64..5, 1..8)
    ) {
        let counts: Counts = entries.iter().map(|(v, c)| (bitstring(*v), *c)).collect();
        let password = decode_counts(&counts).unwrap();
        prop_assert_eq!(Some(password.len() as u64), counts.total_shots());
    }

    #[test]
    fn decode_ignores_order(
        entries in prop::collection::vec((arb_outcome(), 1u64..4), 1..8)
    ) {
        let forward: Counts = entries.iter().map(|(v, c)| (bitstring(*v), *c)).collect();
        let backward: Counts = entries.iter().rev().map(|(v, c)| (bitstring(*v), *c)).collect();
        let mut a: Vec<char> = decode_counts(&forward).unwrap().as_str().chars().collect();
        let mut b: Vec<char> = decode_counts(&backward).unwrap().as_str().chars().collect();
        a.sort_unstable();
        b.sort_unstable();
        prop_assert_eq!(a, b);
    }

    #[test]
    fn rejects_non_five_bit_strings(s in "[01]{0,4}|[01]{6,10}") {
        prop_assert!(decode_outcome(&s).is_err());
    }
}
