//! The one/not-one rule.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use glot_core::ArgValue;

/// Decide whether a runtime value counts as exactly one.
///
/// True for: boolean `true`; every integer type equal to 1; `f32`/`f64`
/// within machine epsilon of 1.0; a [`Duration`] of exactly one
/// nanosecond tick; a [`SystemTime`] exactly one tick after the epoch;
/// the strings `"1"` or `"one"` ignoring case. False for every other
/// value, the null sentinel included.
#[must_use]
pub fn is_one(value: ArgValue<'_>) -> bool {
    if value.is_null() {
        return false;
    }

    macro_rules! int_is_one {
        ($($ty:ty),*) => {
            $(
                if let Some(v) = value.downcast_ref::<$ty>() {
                    return *v == 1;
                }
            )*
        };
    }
    int_is_one!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

    if let Some(v) = value.downcast_ref::<bool>() {
        return *v;
    }
    if let Some(v) = value.downcast_ref::<f32>() {
        return (*v - 1.0).abs() <= f32::EPSILON;
    }
    if let Some(v) = value.downcast_ref::<f64>() {
        return (*v - 1.0).abs() <= f64::EPSILON;
    }
    if let Some(v) = value.downcast_ref::<&str>() {
        return str_is_one(v);
    }
    if let Some(v) = value.downcast_ref::<String>() {
        return str_is_one(v);
    }
    if let Some(v) = value.downcast_ref::<Duration>() {
        return v.as_nanos() == 1;
    }
    if let Some(v) = value.downcast_ref::<SystemTime>() {
        return v
            .duration_since(UNIX_EPOCH)
            .is_ok_and(|d| d.as_nanos() == 1);
    }

    false
}

fn str_is_one(s: &str) -> bool {
    s.eq_ignore_ascii_case("1") || s.eq_ignore_ascii_case("one")
}
