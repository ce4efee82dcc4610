//! Integer arithmetic exported to hosts
//!
//! All operations work on 32-bit signed integers, the width of a C `int`.
//! Overflow wraps in two's complement unless another `OverflowPolicy` is
//! requested through `add_with`.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// What to do when a sum leaves the `i32` range
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverflowPolicy {
    #[default]
    Wrap,
    Saturate,
    Reject,
}

/// Add two integers, wrapping on overflow
#[inline]
pub fn add(a: i32, b: i32) -> i32 {
    a.wrapping_add(b)
}

/// Multiply two integers, wrapping on overflow
#[inline]
pub fn multiply(a: i32, b: i32) -> i32 {
    a.wrapping_mul(b)
}

/// Add two integers under an explicit overflow policy
pub fn add_with(a: i32, b: i32, policy: OverflowPolicy) -> Result<i32> {
    match policy {
        OverflowPolicy::Wrap => Ok(a.wrapping_add(b)),
        OverflowPolicy::Saturate => Ok(a.saturating_add(b)),
        OverflowPolicy::Reject => a.checked_add(b).ok_or(Error::Overflow { a, b }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_add_small_values() {
        assert_eq!(add(2, 3), 5);
        assert_eq!(add(-1, 1), 0);
        assert_eq!(add(0, 0), 0);
    }

    #[test]
    fn test_add_wraps_at_bounds() {
        assert_eq!(add(i32::MAX, 1), i32::MIN);
        assert_eq!(add(i32::MIN, -1), i32::MAX);
    }

    #[test]
    fn test_multiply() {
        assert_eq!(multiply(4, 5), 20);
        assert_eq!(multiply(-3, 7), -21);
        assert_eq!(multiply(i32::MAX, 2), -2);
    }

    #[test]
    fn test_add_with_policies() {
        assert_eq!(add_with(i32::MAX, 1, OverflowPolicy::Wrap).unwrap(), i32::MIN);
        assert_eq!(add_with(i32::MAX, 1, OverflowPolicy::Saturate).unwrap(), i32::MAX);
        assert_eq!(add_with(i32::MIN, -5, OverflowPolicy::Saturate).unwrap(), i32::MIN);
        assert!(matches!(
            add_with(i32::MAX, 1, OverflowPolicy::Reject),
            Err(Error::Overflow { a: i32::MAX, b: 1 })
        ));
        assert_eq!(add_with(40, 2, OverflowPolicy::Reject).unwrap(), 42);
    }

    #[test]
    fn test_policy_from_json() {
        let policy: OverflowPolicy = serde_json::from_str("\"saturate\"").unwrap();
        assert_eq!(policy, OverflowPolicy::Saturate);
        assert_eq!(OverflowPolicy::default(), OverflowPolicy::Wrap);
        assert!(serde_json::from_str::<OverflowPolicy>("\"clamp\"").is_err());
    }

    proptest! {
        #[test]
        fn prop_add_matches_wide_sum(a in any::<i32>(), b in any::<i32>()) {
            let wide = i64::from(a) + i64::from(b);
            prop_assert_eq!(add(a, b), wide as i32);
            prop_assert_eq!(add(a, b), add(a, b));
            prop_assert_eq!(add(a, b), add(b, a));
        }

        #[test]
        fn prop_reject_agrees_with_range(a in any::<i32>(), b in any::<i32>()) {
            let wide = i64::from(a) + i64::from(b);
            let in_range = i32::try_from(wide).is_ok();
            prop_assert_eq!(add_with(a, b, OverflowPolicy::Reject).is_ok(), in_range);
        }
    }
}
