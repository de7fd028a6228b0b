//! core/gaussian.rs — Gaussian curve evaluation and frequency axis generation.

/// Generate a linearly spaced frequency axis between `range.0` and `range.1`
/// (inclusive when the span divides evenly by `step`).
pub fn gen_freqs(range: (f32, f32), step: f32) -> Vec<f32> {
    assert!(step > 0.0);
    let (lo, hi) = range;
    if hi < lo {
        return Vec::new();
    }
    let n = ((hi - lo) / step).floor() as usize + 1;
    (0..n).map(|i| lo + i as f32 * step).collect()
}

/// Evaluate a Gaussian peak over `freqs`.
///
/// `ctr` is the center frequency, `hgt` the height above the aperiodic
/// component, `wid` the width parameter. Non-finite parameters yield NaN
/// samples, mirroring how missing peaks flow through the pipeline.
pub fn gaussian(freqs: &[f32], ctr: f32, hgt: f32, wid: f32) -> Vec<f32> {
    freqs
        .iter()
        .map(|&f| {
            let d = f - ctr;
            hgt * (-(d * d) / (2.0 * wid * wid)).exp()
        })
        .collect()
}
