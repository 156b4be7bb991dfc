const COORD_SPAN: i32 = 400;
const COORD_HALF_SPAN: i32 = COORD_SPAN / 2;

/// Folds the UTF-16 code units of `id` into a wrapping 32-bit accumulator
/// (`hash * 31 + unit`). Stable across runs and platforms.
pub fn stable_hash(id: &str) -> i32 {
    id.encode_utf16().fold(0i32, |hash, unit| {
        hash.wrapping_mul(31).wrapping_add(i32::from(unit))
    })
}

/// Initial placement for a user id. Both axes land in `[-200, 199]`.
pub fn pseudo_random_coord(id: &str) -> (f32, f32) {
    let hash = stable_hash(id);
    let x = (hash >> 3).rem_euclid(COORD_SPAN) - COORD_HALF_SPAN;
    let y = (hash >> 5).rem_euclid(COORD_SPAN) - COORD_HALF_SPAN;
    (x as f32, y as f32)
}

pub fn id_suffix(id: &str, len: usize) -> &str {
    let start = id
        .char_indices()
        .rev()
        .nth(len.saturating_sub(1))
        .map(|(index, _)| index)
        .unwrap_or(0);
    &id[start..]
}
