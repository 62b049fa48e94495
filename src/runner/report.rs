//! Failure messages of test runs

use super::check::Check;
use crate::audio::AudioBuffer;
use crate::config::Precision;
use crate::sample::Sample;
use crate::units::ratio_to_db;

/// Where the evaluated audio sits within the run
#[derive(Debug, Clone, Copy)]
pub(crate) struct Position<'a> {
    pub label: &'a str,
    pub offset_frames: usize,
    pub sample_rate_hz: f64,
}

/// Build the report of a failed check
///
/// ```text
/// expect_true() failed at "label"
/// Condition: PeaksBelow (-3.00 dB)
/// Channel: 0
/// Frame: 1289
/// Timestamp: 0.0292 seconds
/// Sample value: 0.99998 (-0.00 dB)
/// Sample magnitude exceeds 0.70895 (-3.00 dB)
/// ```
///
/// Negated checks have no offending sample, so only the first two lines
/// are written for them.
pub(crate) fn failure_message<S: Sample>(
    check: &Check<S>,
    observed: &AudioBuffer<S>,
    position: Position<'_>,
    precision: &Precision,
) -> String {
    let mut message = format!("{} failed", check.call_name());

    if !position.label.is_empty() {
        message.push_str(&format!(" at \"{}\"", position.label));
    }

    message.push_str(&format!(
        "\nCondition: {}",
        check.matcher().describe(precision)
    ));

    if !check.should_pass() {
        return message;
    }

    if let Some(details) = check.matcher().failure_details(precision) {
        let frame = position.offset_frames + details.frame;
        let value = observed
            .get(details.channel, details.frame)
            .map_or(0.0, |s| s.as_f64());

        message.push_str(&format!(
            "\nChannel: {}\nFrame: {}\nTimestamp: {} seconds\nSample value: {} ({} dB)\n{}",
            details.channel,
            frame,
            precision.sec(frame as f64 / position.sample_rate_hz),
            precision.lin(value),
            precision.db(ratio_to_db(value.abs())),
            details.description
        ));
    }

    message
}
