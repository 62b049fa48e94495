//! SVG waveform plots
//!
//! Renders the input and output of a run as two stacked panels, one
//! polyline per channel, with a time axis in seconds. Signals longer than
//! the plot is wide are reduced to a min/max pair per pixel column.

use crate::audio::AudioBuffer;
use crate::error::Result;
use crate::sample::Sample;
use log::info;
use std::fs;
use std::path::Path;

const WIDTH: f64 = 1200.0;
const PANEL_HEIGHT: f64 = 280.0;
const MARGIN_LEFT: f64 = 60.0;
const MARGIN_RIGHT: f64 = 20.0;
const MARGIN_TOP: f64 = 30.0;
const PANEL_GAP: f64 = 60.0;
const NUM_TIME_TICKS: usize = 5;

const CHANNEL_COLOURS: [&str; 8] = [
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
];

/// Render input and output buffers as an SVG document
pub fn render_svg<S: Sample>(
    input: &AudioBuffer<S>,
    output: &AudioBuffer<S>,
    sample_rate_hz: f64,
) -> String {
    let height = MARGIN_TOP + 2.0 * PANEL_HEIGHT + PANEL_GAP + 40.0;
    let mut svg = format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">\n\
         <rect width=\"100%\" height=\"100%\" fill=\"white\"/>\n",
        w = WIDTH,
        h = height
    );

    svg.push_str(&render_panel("Input", input, sample_rate_hz, MARGIN_TOP));
    svg.push_str(&render_panel(
        "Output",
        output,
        sample_rate_hz,
        MARGIN_TOP + PANEL_HEIGHT + PANEL_GAP,
    ));
    svg.push_str("</svg>\n");
    svg
}

/// Write an SVG plot of a run's input and output to `path`
pub fn write_plot<S: Sample>(
    input: &AudioBuffer<S>,
    output: &AudioBuffer<S>,
    sample_rate_hz: f64,
    path: &Path,
) -> Result<()> {
    fs::write(path, render_svg(input, output, sample_rate_hz))?;
    info!("Wrote plot to {}", path.display());
    Ok(())
}

fn render_panel<S: Sample>(
    title: &str,
    buffer: &AudioBuffer<S>,
    sample_rate_hz: f64,
    top: f64,
) -> String {
    let plot_width = WIDTH - MARGIN_LEFT - MARGIN_RIGHT;
    let bottom = top + PANEL_HEIGHT;
    let middle = top + PANEL_HEIGHT / 2.0;

    // Symmetric amplitude range, at least [-1, 1]
    let amplitude = buffer
        .peak()
        .map(|p| p.as_f64())
        .unwrap_or(0.0)
        .max(1.0);

    let mut out = String::new();
    out.push_str(&format!(
        "<text x=\"{}\" y=\"{}\" font-family=\"sans-serif\" font-size=\"14\">{}</text>\n",
        MARGIN_LEFT,
        top - 8.0,
        title
    ));
    out.push_str(&format!(
        "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"none\" stroke=\"#444\"/>\n",
        MARGIN_LEFT, top, plot_width, PANEL_HEIGHT
    ));
    out.push_str(&format!(
        "<line x1=\"{}\" y1=\"{m}\" x2=\"{}\" y2=\"{m}\" stroke=\"#bbb\" stroke-dasharray=\"4 4\"/>\n",
        MARGIN_LEFT,
        MARGIN_LEFT + plot_width,
        m = middle
    ));

    for (label, y) in [
        (amplitude, top),
        (0.0, middle),
        (-amplitude, bottom),
    ] {
        out.push_str(&format!(
            "<text x=\"{}\" y=\"{}\" font-family=\"sans-serif\" font-size=\"11\" text-anchor=\"end\">{:.2}</text>\n",
            MARGIN_LEFT - 6.0,
            y + 4.0,
            label
        ));
    }

    let duration_seconds = buffer.num_frames() as f64 / sample_rate_hz;
    for tick in 0..=NUM_TIME_TICKS {
        let fraction = tick as f64 / NUM_TIME_TICKS as f64;
        let x = MARGIN_LEFT + fraction * plot_width;
        out.push_str(&format!(
            "<line x1=\"{x}\" y1=\"{}\" x2=\"{x}\" y2=\"{}\" stroke=\"#444\"/>\n",
            bottom,
            bottom + 5.0,
            x = x
        ));
        out.push_str(&format!(
            "<text x=\"{}\" y=\"{}\" font-family=\"sans-serif\" font-size=\"11\" text-anchor=\"middle\">{:.3} s</text>\n",
            x,
            bottom + 18.0,
            fraction * duration_seconds
        ));
    }

    let to_y = |value: f64| middle - (value / amplitude) * (PANEL_HEIGHT / 2.0);

    for (index, samples) in buffer.channels().enumerate() {
        let points = polyline_points(samples, plot_width)
            .into_iter()
            .map(|(x, v)| format!("{:.2},{:.2}", MARGIN_LEFT + x, to_y(v)))
            .collect::<Vec<_>>()
            .join(" ");

        out.push_str(&format!(
            "<polyline fill=\"none\" stroke=\"{}\" stroke-width=\"1\" points=\"{}\"/>\n",
            CHANNEL_COLOURS[index % CHANNEL_COLOURS.len()],
            points
        ));
    }

    out
}

/// (x offset, value) pairs for one channel
fn polyline_points<S: Sample>(samples: &[S], plot_width: f64) -> Vec<(f64, f64)> {
    let num_frames = samples.len();
    if num_frames == 0 {
        return Vec::new();
    }

    let x_of = |frame: usize| {
        if num_frames == 1 {
            0.0
        } else {
            frame as f64 / (num_frames - 1) as f64 * plot_width
        }
    };

    let columns = plot_width as usize;
    if num_frames <= columns {
        return samples
            .iter()
            .enumerate()
            .map(|(frame, s)| (x_of(frame), s.as_f64()))
            .collect();
    }

    let mut points = Vec::with_capacity(columns * 2);
    for column in 0..columns {
        let start = column * num_frames / columns;
        let end = ((column + 1) * num_frames / columns).max(start + 1);
        let slice = &samples[start..end.min(num_frames)];

        let (low, high) = slice.iter().fold((f64::MAX, f64::MIN), |(lo, hi), s| {
            let v = s.as_f64();
            (lo.min(v), hi.max(v))
        });

        let x = x_of(start);
        points.push((x, high));
        points.push((x, low));
    }

    points
}
