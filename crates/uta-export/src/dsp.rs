//! Pre-encode processing.

/// Largest absolute sample value; non-finite samples are ignored.
pub fn peak_level(samples: &[f32]) -> f32 {
    samples
        .iter()
        .filter(|s| s.is_finite())
        .map(|s| s.abs())
        .fold(0.0, f32::max)
}

/// Scale `samples` up so their peak reaches `target`.
///
/// Silent input and input already at or above the target are left alone.
/// Returns the gain applied.
pub fn normalize_peak(samples: &mut [f32], target: f32) -> f32 {
    let peak = peak_level(samples);
    if peak <= 0.0 || peak >= target {
        return 1.0;
    }
    let gain = target / peak;
    for sample in samples.iter_mut() {
        *sample *= gain;
    }
    gain
}

/// Replace NaN and infinities with silence.
pub fn sanitize(samples: &mut [f32]) {
    for sample in samples.iter_mut() {
        if !sample.is_finite() {
            *sample = 0.0;
        }
    }
}
