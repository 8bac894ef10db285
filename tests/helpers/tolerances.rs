//! Tolerance constants for render testing.
//!
//! Different checks need different precision levels.

/// Floating point rounding differences (merge order, identical math).
pub const FLOAT_EPSILON: f32 = 1e-6;

/// Summation-order differences when notes overlap in time.
pub const MIX_EPSILON: f32 = 1e-5;

/// Silence threshold (~-80dB).
pub const SILENCE_THRESHOLD: f32 = 0.0001;

/// Residual after a note's tail, including DC-blocker decay (~-46dB).
pub const TAIL_THRESHOLD: f32 = 0.005;

/// Allowed relative pitch error of a steady note.
pub const PITCH_TOLERANCE_RATIO: f64 = 0.005;

/// Largest sample-to-sample jump that is not an audible click.
pub const CLICK_THRESHOLD: f32 = 0.1;

/// 16-bit quantization step size.
pub const INT16_EPSILON: f32 = 1.0 / 32768.0;
