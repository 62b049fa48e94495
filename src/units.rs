//! Unit helpers
//!
//! Decibel/ratio conversion plus small readability helpers for test code,
//! e.g. `with_duration(ms(75.0))` or `SineWave::new(khz(2.0))`.

use std::f64::consts::PI;

/// One full turn in radians
pub const TWO_PI: f64 = 2.0 * PI;

/// Level treated as silence: ratios below this are reported as this level
pub const SILENCE_DB: f64 = -120.0;

/// Ratios below this are considered silent
const SILENCE_RATIO: f64 = 1e-6;

/// Convert decibels to a linear amplitude ratio
///
/// Anything at or below [`SILENCE_DB`], including `-inf`, maps to exactly zero.
#[inline]
pub fn db_to_ratio(db: f64) -> f64 {
    if db <= SILENCE_DB {
        return 0.0;
    }

    10.0_f64.powf(db / 20.0)
}

/// Convert a linear amplitude ratio to decibels
///
/// Ratios below `1e-6` are clamped to [`SILENCE_DB`].
#[inline]
pub fn ratio_to_db(ratio: f64) -> f64 {
    if ratio < SILENCE_RATIO {
        return SILENCE_DB;
    }

    20.0 * ratio.log10()
}

/// Wrap a phase into `[0, 2π)`
#[inline]
pub fn wrap_phase(phase_radians: f64) -> f64 {
    let wrapped = phase_radians.rem_euclid(TWO_PI);

    // rem_euclid can round up to exactly 2π for tiny negative inputs
    if wrapped >= TWO_PI {
        0.0
    } else {
        wrapped
    }
}

/// Milliseconds to seconds
#[inline]
pub fn ms(milliseconds: f64) -> f64 {
    milliseconds / 1000.0
}

/// Seconds, spelled out
#[inline]
pub fn seconds(seconds: f64) -> f64 {
    seconds
}

/// Kilohertz to hertz
#[inline]
pub fn khz(kilohertz: f64) -> f64 {
    kilohertz * 1000.0
}

/// Hertz, spelled out
#[inline]
pub fn hz(hertz: f64) -> f64 {
    hertz
}

/// Degrees to radians
#[inline]
pub fn deg_to_rad(degrees: f64) -> f64 {
    degrees.to_radians()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_db_ratio_conversion() {
        assert_relative_eq!(db_to_ratio(0.0), 1.0);
        assert_relative_eq!(db_to_ratio(-6.0), 0.501_187_233_627_272_3, epsilon = 1e-12);
        assert_relative_eq!(ratio_to_db(0.5), -6.020_599_913_279_624, epsilon = 1e-12);
        assert_relative_eq!(ratio_to_db(db_to_ratio(-3.0)), -3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_silence_floor() {
        assert_eq!(db_to_ratio(f64::NEG_INFINITY), 0.0);
        assert_eq!(db_to_ratio(-120.0), 0.0);
        assert!(db_to_ratio(-119.0) > 0.0);
        assert_eq!(ratio_to_db(0.0), SILENCE_DB);
        assert_eq!(ratio_to_db(1e-7), SILENCE_DB);
    }

    #[test]
    fn test_wrap_phase() {
        assert_relative_eq!(wrap_phase(TWO_PI + 0.5), 0.5, epsilon = 1e-12);
        assert_relative_eq!(wrap_phase(-0.5), TWO_PI - 0.5, epsilon = 1e-12);
        assert_eq!(wrap_phase(0.0), 0.0);
        assert!(wrap_phase(-1e-18) < TWO_PI);
    }

    #[test]
    fn test_readability_helpers() {
        assert_relative_eq!(ms(75.0), 0.075);
        assert_relative_eq!(khz(2.5), 2500.0);
        assert_relative_eq!(deg_to_rad(180.0), PI);
    }
}
