//! # Slot Range Lists
//!
//! Autochanger commands take a slot selection such as `slots=1,3-5,9`. The
//! parser is forgiving about layout (leading blanks in a token, a trailing
//! comma) and strict about meaning: every value must be a positive integer no
//! larger than the magazine size, and ranges must ascend.
//!
//! Parsing is all-or-nothing. A list with one bad token selects nothing.

use thiserror::Error;
use tracing::debug;

use crate::console::Console;
use crate::error::SelectError;
use crate::types::SlotNumber;

/// Fixed-size set of selected slots `1..=N`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotList {
    bits: Vec<bool>,
}

impl SlotList {
    /// Empty selection over `slots` slots.
    pub fn new(slots: SlotNumber) -> Self {
        Self {
            bits: vec![false; slots as usize],
        }
    }

    /// Every slot selected.
    pub fn all(slots: SlotNumber) -> Self {
        Self {
            bits: vec![true; slots as usize],
        }
    }

    /// Select `slot`; out-of-range slots are ignored.
    pub fn set(&mut self, slot: SlotNumber) {
        if let Some(bit) = Self::position(slot).and_then(|i| self.bits.get_mut(i)) {
            *bit = true;
        }
    }

    pub fn is_set(&self, slot: SlotNumber) -> bool {
        Self::position(slot)
            .and_then(|i| self.bits.get(i))
            .copied()
            .unwrap_or(false)
    }

    /// Selected slots in ascending order.
    pub fn iter_set(&self) -> impl Iterator<Item = SlotNumber> + '_ {
        (1..).zip(&self.bits).filter_map(|(slot, &on)| on.then_some(slot))
    }

    pub fn count(&self) -> usize {
        self.bits.iter().filter(|&&on| on).count()
    }

    fn position(slot: SlotNumber) -> Option<usize> {
        slot.checked_sub(1).map(|i| i as usize)
    }
}

/// Why a slot list was rejected. Display text is shown to the console user.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SlotListError {
    #[error("Negative numbers not permitted")]
    NegativeNumber,

    #[error("Range end is not integer.")]
    RangeEndNotInteger,

    #[error("Range start is not an integer.")]
    RangeStartNotInteger,

    #[error("Input value is not an integer.")]
    NotInteger,

    #[error("Range end not bigger than start.")]
    InvertedRange,

    #[error("Values must be greater than zero.")]
    NotPositive,

    #[error("Slot too large.")]
    SlotTooLarge,
}

/// Parse a slot list for a changer with `max` slots.
///
/// `None` selects every slot.
///
/// ```rust
/// use consel_core::slots::parse_slot_list;
///
/// let slots = parse_slot_list(Some("1,3-5,9"), 10)?;
/// assert_eq!(slots.iter_set().collect::<Vec<_>>(), vec![1, 3, 4, 5, 9]);
/// # Ok::<(), consel_core::slots::SlotListError>(())
/// ```
pub fn parse_slot_list(spec: Option<&str>, max: SlotNumber) -> Result<SlotList, SlotListError> {
    let Some(spec) = spec else {
        return Ok(SlotList::all(max));
    };

    let mut slots = SlotList::new(max);
    let spec = spec.trim_end();
    let mut tokens: Vec<&str> = spec.split(',').collect();
    if tokens.last().is_some_and(|t| t.is_empty()) {
        tokens.pop();
    }

    for token in tokens {
        let (begin, end) = parse_token(token)?;
        if end < begin {
            return Err(SlotListError::InvertedRange);
        }
        if begin == 0 || end == 0 {
            return Err(SlotListError::NotPositive);
        }
        if end > u64::from(max) {
            return Err(SlotListError::SlotTooLarge);
        }
        // Both bounds are now within 1..=max, so they fit a SlotNumber.
        for slot in begin..=end {
            slots.set(SlotNumber::try_from(slot).unwrap_or(SlotNumber::MAX));
        }
    }

    Ok(slots)
}

fn parse_token(token: &str) -> Result<(u64, u64), SlotListError> {
    if token.starts_with('-') {
        return Err(SlotListError::NegativeNumber);
    }
    match token.split_once('-') {
        Some((start, end)) => {
            let end = parse_integer(end).ok_or(SlotListError::RangeEndNotInteger)?;
            let start =
                parse_integer(start.trim_start()).ok_or(SlotListError::RangeStartNotInteger)?;
            Ok((start, end))
        },
        None => {
            let value = parse_integer(token.trim_start()).ok_or(SlotListError::NotInteger)?;
            Ok((value, value))
        },
    }
}

/// Digits only. Values beyond `u64` saturate; they fail the size check anyway.
fn parse_integer(text: &str) -> Option<u64> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(text.parse().unwrap_or(u64::MAX))
}

/// Resolve the slot selection named by `argument` on the command line.
///
/// When `argument=` is absent and the name ends in `s`, the singular form is
/// tried too, so `slots` also accepts `slot=3`. A malformed list is reported
/// to the session and fails with [`SelectError::InvalidInput`].
pub fn get_user_slot_list(
    console: &mut Console<'_>,
    argument: &str,
    max: SlotNumber,
) -> Result<SlotList, SelectError> {
    let args = console.args;
    let index = args.find_arg_with_value(argument).or_else(|| {
        argument
            .strip_suffix('s')
            .filter(|singular| !singular.is_empty())
            .and_then(|singular| args.find_arg_with_value(singular))
    });
    let spec = index.and_then(|i| args.value(i));

    match parse_slot_list(spec, max) {
        Ok(slots) => {
            debug!(slots = ?slots.iter_set().collect::<Vec<_>>(), "slots turned on");
            Ok(slots)
        },
        Err(err) => {
            debug!("problem with user slot selection: {err}");
            console.error(&err.to_string());
            Err(SelectError::InvalidInput(spec.unwrap_or_default().to_owned()))
        },
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::test_support::Harness;

    fn selected(spec: &str, max: SlotNumber) -> Vec<SlotNumber> {
        parse_slot_list(Some(spec), max).unwrap().iter_set().collect()
    }

    #[test]
    fn test_lists_and_ranges() {
        assert_eq!(selected("1,3-5,9", 10), vec![1, 3, 4, 5, 9]);
        assert_eq!(selected(" 2, 4-4,", 10), vec![2, 4]);
        assert_eq!(selected("10", 10), vec![10]);
    }

    #[test]
    fn test_absent_spec_selects_everything() {
        let slots = parse_slot_list(None, 10).unwrap();
        assert_eq!(slots.count(), 10);
        assert!(slots.is_set(1) && slots.is_set(10));
        assert!(!slots.is_set(11));
    }

    #[test]
    fn test_errors_in_check_order() {
        let cases = [
            ("-3", SlotListError::NegativeNumber),
            ("1-x", SlotListError::RangeEndNotInteger),
            ("a-3", SlotListError::RangeStartNotInteger),
            ("a-", SlotListError::RangeEndNotInteger),
            ("abc", SlotListError::NotInteger),
            ("1,,3", SlotListError::NotInteger),
            ("5-3", SlotListError::InvertedRange),
            ("0-2", SlotListError::NotPositive),
            ("0", SlotListError::NotPositive),
            ("9-11", SlotListError::SlotTooLarge),
            ("99999999999999999999999", SlotListError::SlotTooLarge),
        ];

        for (spec, expected) in cases {
            assert_eq!(parse_slot_list(Some(spec), 10), Err(expected), "{spec}");
        }
    }

    #[test]
    fn test_failure_selects_nothing_even_after_good_tokens() {
        assert!(parse_slot_list(Some("1-3,12"), 10).is_err());
    }

    #[test]
    fn test_user_slot_list_falls_back_to_singular_argument() {
        let mut h = Harness::new("label storage=Tape slot=2-3");

        let slots = get_user_slot_list(&mut h.console(), "slots", 10).unwrap();

        assert_eq!(slots.iter_set().collect::<Vec<_>>(), vec![2, 3]);
    }

    #[test]
    fn test_user_slot_list_reports_errors() {
        let mut h = Harness::new("label slots=4-2");

        let err = get_user_slot_list(&mut h.console(), "slots", 10).unwrap_err();

        assert!(matches!(err, SelectError::InvalidInput(ref v) if v == "4-2"));
        assert_eq!(h.session.errors(), vec!["Range end not bigger than start."]);
    }

    #[test]
    fn test_user_slot_list_without_argument_selects_all() {
        let mut h = Harness::new("update slots");
        let slots = get_user_slot_list(&mut h.console(), "slots", 5).unwrap();
        assert_eq!(slots.count(), 5);
    }

    proptest! {
        #[test]
        fn test_listed_slots_are_exactly_selected(
            picks in prop::collection::btree_set(1_u32..=40, 1..12)
        ) {
            let spec = picks.iter().map(u32::to_string).collect::<Vec<_>>().join(",");
            let slots = parse_slot_list(Some(&spec), 40).unwrap();
            prop_assert_eq!(slots.iter_set().collect::<Vec<_>>(), picks.into_iter().collect::<Vec<_>>());
        }

        #[test]
        fn test_ranges_select_contiguous_runs(start in 1_u32..30, len in 0_u32..10) {
            let end = start + len;
            let slots = parse_slot_list(Some(&format!("{start}-{end}")), 40).unwrap();
            prop_assert_eq!(slots.count(), (len + 1) as usize);
            prop_assert!(slots.is_set(start) && slots.is_set(end));
        }
    }
}
