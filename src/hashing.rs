/// Polynomial rolling hash over the UTF-16 code units of `text`.
///
/// Accumulates `hash * 31 + unit` with signed 32-bit wrap-around and returns
/// the absolute value. Stable across runs, so the same place name always maps
/// to the same seed. Not suitable for anything security related.
pub fn seed_hash(text: &str) -> u32 {
    text.encode_utf16()
        .fold(0_i32, |hash, unit| {
            hash.wrapping_mul(31).wrapping_add(i32::from(unit))
        })
        .unsigned_abs()
}

/// Seed used by the placeholder generator.
pub fn placeholder_seed(text: &str) -> u32 {
    seed_hash(text) % 1000
}
