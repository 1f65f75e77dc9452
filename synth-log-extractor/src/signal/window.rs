//! Event-aligned window cutting
//!
//! Locates the channel samples recorded around one event occurrence and
//! produces the aligned (time, amplitude) sub-arrays the peak extractor
//! consumes. Gap samples are removed here so downstream code only ever sees
//! numeric, index-aligned arrays.

use crate::types::{EventEntry, ExtractError, Result};

/// Find the index of the recorded sample closest to `target`
///
/// Gap (`None`) samples are never candidates. Ties are broken by the lowest
/// index; targets outside the axis range clamp to the nearest endpoint.
///
/// # Errors
/// `ExtractError::EmptyAxis` if the axis is empty or every sample is missing.
pub fn nearest_index(axis: &[Option<f64>], target: f64) -> Result<usize> {
    let mut best: Option<(usize, f64)> = None;

    for (index, sample) in axis.iter().enumerate() {
        let Some(value) = sample else { continue };
        let distance = (value - target).abs();
        match best {
            Some((_, best_distance)) if distance >= best_distance => {}
            _ => best = Some((index, distance)),
        }
    }

    best.map(|(index, _)| index).ok_or(ExtractError::EmptyAxis)
}

/// Cut the (time, amplitude) window for one event occurrence
///
/// The window spans from the sample nearest `event_log[event_index].time` to
/// the sample nearest `event_log[event_index + span].time`, widened by
/// `buffer` samples on each side and clamped to the array bounds. Positions
/// where either the timestamp or the amplitude is missing are dropped, with
/// both arrays compacted in lockstep.
///
/// A window that filters down to zero samples is returned as such; the caller
/// decides whether that occurrence is worth keeping (it never is).
///
/// # Errors
/// * `ExtractError::EventIndexOutOfRange` if `event_index + span` is not a
///   valid event-log index.
/// * `ExtractError::EmptyAxis` if the time axis has no usable samples.
pub fn cut_section(
    time: &[Option<f64>],
    samples: &[Option<f64>],
    event_log: &[EventEntry],
    event_index: usize,
    span: usize,
    buffer: usize,
) -> Result<(Vec<f64>, Vec<f64>)> {
    let end_index = event_index + span;
    if end_index >= event_log.len() {
        return Err(ExtractError::EventIndexOutOfRange {
            index: event_index,
            span,
            len: event_log.len(),
        });
    }

    let a = nearest_index(time, event_log[event_index].time)?;
    let b = nearest_index(time, event_log[end_index].time)?;

    // Window [a - buffer, b + buffer), clamped to valid bounds
    let start = a.saturating_sub(buffer);
    let end = (b + buffer).min(time.len());

    let mut window_time = Vec::new();
    let mut window_amp = Vec::new();
    if start < end {
        for position in start..end {
            if let (Some(t), Some(v)) = (time[position], samples[position]) {
                window_time.push(t);
                window_amp.push(v);
            }
        }
    }

    Ok((window_time, window_amp))
}
