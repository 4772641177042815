//! Cross-station merging of temporally overlapping events.

use tracing::debug;

use crate::error::EventError;
use crate::event::Event;

/// Merges two events into a new multi-station event.
///
/// The window spans both inputs, stations are concatenated (`e1` first),
/// extrema are taken across both, and averages are weighted by each
/// event's duration in hours.
///
/// # Errors
///
/// Propagates [`EventError::InvalidWindow`] from [`Event::new`]; this cannot
/// happen for two valid inputs.
pub fn merge_pair(e1: &Event, e2: &Event) -> Result<Event, EventError> {
    let w1 = e1.duration_hours() as f64;
    let w2 = e2.duration_hours() as f64;

    let mut stations = Vec::with_capacity(e1.num_stations() + e2.num_stations());
    stations.extend_from_slice(e1.stations());
    stations.extend_from_slice(e2.stations());

    Event::new(
        e1.start_time().min(e2.start_time()),
        e1.end_time().max(e2.end_time()),
        stations,
        e1.reflectivity().combine(w1, e2.reflectivity(), w2),
        e1.rain_intensity().combine(w1, e2.rain_intensity(), w2),
    )
}

/// Collapses temporally overlapping events into multi-station events.
///
/// Events are stably sorted by start time, then folded left to right: an
/// event starting at or before the end of the last accumulated event is
/// merged into it, otherwise it starts a new entry. The result is sorted by
/// start time and no two entries overlap or touch.
///
/// # Errors
///
/// Returns [`EventError::EmptyInput`] if `events` is empty.
pub fn merge_overlapping(mut events: Vec<Event>) -> Result<Vec<Event>, EventError> {
    if events.is_empty() {
        return Err(EventError::EmptyInput);
    }
    let n_in = events.len();

    events.sort_by_key(|e| e.start_time());

    let merged = events
        .into_iter()
        .try_fold(Vec::<Event>::with_capacity(n_in), |mut acc, e| {
            match acc.last() {
                Some(last) if e.start_time() <= last.end_time() => {
                    let combined = merge_pair(last, &e)?;
                    if let Some(slot) = acc.last_mut() {
                        *slot = combined;
                    }
                }
                _ => acc.push(e),
            }
            Ok::<_, EventError>(acc)
        })?;

    debug!(n_in, n_out = merged.len(), "merged overlapping events");
    Ok(merged)
}
