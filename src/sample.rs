//! Numeric sample type
//!
//! Buffers, effects, signals and matchers are generic over [`Sample`], which
//! is implemented for `f32` and `f64`. Automation values and all parameter
//! math stay in `f64`.

use num_traits::Float;
use std::fmt::{Debug, Display};

/// A floating-point audio sample
pub trait Sample: Float + Default + Debug + Display + Send + Sync + 'static {
    /// Convert from a double-precision value (rounds for `f32`)
    fn from_f64(value: f64) -> Self;

    /// Widen to double precision
    fn as_f64(self) -> f64;
}

impl Sample for f32 {
    #[inline]
    fn from_f64(value: f64) -> Self {
        value as f32
    }

    #[inline]
    fn as_f64(self) -> f64 {
        self as f64
    }
}

impl Sample for f64 {
    #[inline]
    fn from_f64(value: f64) -> Self {
        value
    }

    #[inline]
    fn as_f64(self) -> f64 {
        self
    }
}
