//! Effects under test
//!
//! All effects implement the [`Effect`] trait. Envelopes attach to
//! parameters through [`Effect::with_envelope`]; signals own an
//! [`EffectChain`] that post-processes what they generate.

mod chain;
mod effect;
mod gain;
mod hard_clip;

pub use chain::EffectChain;
pub use effect::{Automation, AutomationValues, Effect, ParamId};
pub use gain::{GainDb, GainLinear};
pub use hard_clip::HardClip;

/// Parameter ids of the built-in effects
pub mod params {
    use super::ParamId;

    /// [`GainDb`](super::GainDb): gain in dB
    pub const GAIN_DB: ParamId = 0;

    /// [`GainLinear`](super::GainLinear): gain as a ratio
    pub const GAIN_LINEAR: ParamId = 0;

    /// [`HardClip`](super::HardClip): clipping threshold in dB
    pub const THRESHOLD_DB: ParamId = 0;
}
