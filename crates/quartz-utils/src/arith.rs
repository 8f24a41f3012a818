//! Integer helpers shared by code generation and layout.

/// The larger of `a` and `b`.
#[inline]
pub fn max(a: i64, b: i64) -> i64 {
    if a >= b { a } else { b }
}

/// The smaller of `a` and `b`.
#[inline]
pub fn min(a: i64, b: i64) -> i64 {
    if a <= b { a } else { b }
}

/// Rounds `value` up to the next multiple of `alignment`.
///
/// `alignment` must be a positive power of two. This is the caller's job;
/// only debug builds check it. Use [`is_power_of_two`] first when the
/// alignment comes from user input.
#[inline]
pub fn align_up(value: i64, alignment: i64) -> i64 {
    debug_assert!(
        is_power_of_two(alignment),
        "alignment {} is not a power of two",
        alignment
    );
    (value + (alignment - 1)) & !(alignment - 1)
}

#[inline]
pub fn is_power_of_two(value: i64) -> bool {
    value > 0 && value & (value - 1) == 0
}
