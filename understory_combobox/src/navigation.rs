// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Wrap-around index navigation over a list of `item_count` entries.

/// Compute the next highlighted index for a move of `move_amount` positions.
///
/// - When `base_index` is `None` or out of range, it is treated as "before
///   the start" for positive moves (so the first step lands on `0`) and as
///   "after the end" otherwise (so the first step lands on the last index).
/// - Stepping past either end re-enters from the opposite end. Oversized
///   jumps do not wrap multiple times: any result below `0` becomes the last
///   index and any result past the end becomes `0`.
///
/// Returns `None` when `item_count` is zero; navigation over an empty list
/// has no meaningful target and callers are expected not to ask for one.
///
/// ```
/// use understory_combobox::next_wrapping_index;
///
/// assert_eq!(next_wrapping_index(1, Some(2), 3), Some(0));
/// assert_eq!(next_wrapping_index(-1, Some(0), 3), Some(2));
/// assert_eq!(next_wrapping_index(1, None, 3), Some(0));
/// assert_eq!(next_wrapping_index(-1, None, 3), Some(2));
/// assert_eq!(next_wrapping_index(1, None, 0), None);
/// ```
pub fn next_wrapping_index(
    move_amount: isize,
    base_index: Option<usize>,
    item_count: usize,
) -> Option<usize> {
    if item_count == 0 {
        return None;
    }
    let last = item_count - 1;

    let base = match base_index {
        Some(index) if index < item_count => index as i128,
        _ if move_amount > 0 => -1,
        _ => item_count as i128,
    };

    let next = base + move_amount as i128;
    if next < 0 {
        Some(last)
    } else if next > last as i128 {
        Some(0)
    } else {
        usize::try_from(next).ok()
    }
}
