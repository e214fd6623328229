// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Property tests for wrapped index navigation.

use proptest::prelude::*;
use understory_combobox::next_wrapping_index;

proptest! {
    #[test]
    fn repeated_moves_stay_in_bounds(
        item_count in 1_usize..200,
        start in proptest::option::of(0_usize..400),
        moves in prop::collection::vec(-20_isize..20, 1..50),
    ) {
        let mut index = start;
        for amount in moves {
            let next = next_wrapping_index(amount, index, item_count);
            prop_assert!(next.is_some());
            let value = next.unwrap();
            prop_assert!(value < item_count);
            index = next;
        }
    }

    #[test]
    fn unit_steps_wrap_at_the_ends(item_count in 1_usize..1_000) {
        let last = item_count - 1;
        prop_assert_eq!(next_wrapping_index(1, Some(last), item_count), Some(0));
        prop_assert_eq!(next_wrapping_index(-1, Some(0), item_count), Some(last));
        prop_assert_eq!(next_wrapping_index(1, None, item_count), Some(0));
        prop_assert_eq!(next_wrapping_index(-1, None, item_count), Some(last));
    }

    #[test]
    fn in_range_moves_are_plain_offsets(
        item_count in 2_usize..100,
        base in 0_usize..100,
        amount in -3_isize..=3,
    ) {
        let base = base % item_count;
        let Some(target) = base.checked_add_signed(amount) else {
            return Ok(());
        };
        if target < item_count {
            prop_assert_eq!(next_wrapping_index(amount, Some(base), item_count), Some(target));
        }
    }

    #[test]
    fn empty_lists_never_highlight(amount in any::<isize>(), base in any::<Option<usize>>()) {
        prop_assert_eq!(next_wrapping_index(amount, base, 0), None);
    }
}
