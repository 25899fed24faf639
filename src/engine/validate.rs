use crate::model::*;

use super::EngineError;

pub(crate) const MISSING_BOOKING_FIELDS: &str =
    "booking requires valid start/end times and a room id";
pub(crate) const START_IN_PAST: &str = "cannot book a time in the past";
pub(crate) const END_NOT_AFTER_START: &str = "end time must be after start time";
pub(crate) const UNKNOWN_ROOM: &str = "room does not exist";
pub(crate) const MISSING_WINDOW: &str = "must supply both start and end time";
pub(crate) const MISSING_BOOKING_ID: &str = "booking id cannot be absent";
pub(crate) const ALREADY_STARTED: &str = "cannot cancel a booking that has started or ended";

/// Check a booking request before any lookup.
///
/// Order matters: absence first, then past start, then inverted interval.
/// A request that is both in the past and inverted reports the past start.
pub(crate) fn validate_booking_request(
    room_id: Option<&str>,
    start: Option<Ms>,
    end: Option<Ms>,
    now: Ms,
) -> Result<(&str, Span), EngineError> {
    let (Some(room_id), Some(start), Some(end)) = (non_empty(room_id), start, end) else {
        return Err(EngineError::InvalidArgument(MISSING_BOOKING_FIELDS));
    };
    if start < now {
        return Err(EngineError::InvalidArgument(START_IN_PAST));
    }
    if end <= start {
        return Err(EngineError::InvalidArgument(END_NOT_AFTER_START));
    }
    Ok((room_id, Span::new(start, end)))
}

/// Check a query window. Past windows are allowed.
pub(crate) fn validate_window(start: Option<Ms>, end: Option<Ms>) -> Result<Span, EngineError> {
    let (Some(start), Some(end)) = (start, end) else {
        return Err(EngineError::InvalidArgument(MISSING_WINDOW));
    };
    if end <= start {
        return Err(EngineError::InvalidArgument(END_NOT_AFTER_START));
    }
    Ok(Span::new(start, end))
}

pub(crate) fn validate_booking_id(booking_id: Option<&str>) -> Result<&str, EngineError> {
    non_empty(booking_id).ok_or(EngineError::InvalidArgument(MISSING_BOOKING_ID))
}

/// Empty strings count as absent.
fn non_empty(s: Option<&str>) -> Option<&str> {
    s.filter(|s| !s.is_empty())
}
