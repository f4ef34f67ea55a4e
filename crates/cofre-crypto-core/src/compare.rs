//! Constant-time byte comparison.

/// Constant-time byte comparison for hashes and tags.
///
/// Returns `true` iff both slices have equal length and identical contents.
/// Equal-length inputs are scanned in full with bitwise OR accumulation, so
/// the running time does not depend on where the first difference sits.
///
/// The early return on length mismatch only reveals the length, which is
/// fixed and public for every value this crate compares.
#[must_use]
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }
    std::hint::black_box(diff) == 0
}
