//! Single-cycle pulse table.
//!
//! ```text
//!   1-w ┌──┐        ┌──┐
//!       │  │        │  │
//!    0 ─┼──┼────────┼──┼──
//!    -w │  └────────┘  └───
//!       |<-W·w->|
//! ```
//!
//! The high level is `1 - w` and the low level `-w`, so the mean over one
//! cycle is `w(1 - w) - (1 - w)w = 0`: a pulse of any width carries no DC.

/// `size` samples of a pulse with duty cycle `width`, rotated by `offset`
/// (a fraction of the cycle).
///
/// Sample `i` is high when `((i - size·offset) mod size) / size <= width`.
/// The modulo is Euclidean, so negative offsets rotate the other way without
/// changing the duty cycle.
pub fn pulse_table(width: f32, offset: f32, size: usize) -> Vec<f32> {
    if size == 0 {
        return Vec::new();
    }
    let cycle = size as f64;
    let width = width as f64;
    let high = (1.0 - width) as f32;
    let low = -width as f32;

    (0..size)
        .map(|i| {
            let phase = (i as f64 - cycle * offset as f64).rem_euclid(cycle) / cycle;
            if phase <= width {
                high
            } else {
                low
            }
        })
        .collect()
}
