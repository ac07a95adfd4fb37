//! Listen event recording with synthesized timestamps.

use super::row::ValidRow;
use crate::listen_store::{EventType, ImportSession, NewEvent, Track, User};
use anyhow::{anyhow, Result};
use chrono::{
    DateTime, Datelike, LocalResult, NaiveDate, NaiveDateTime, Offset, TimeDelta, TimeZone,
};
use chrono_tz::Tz;
use rand::Rng;

/// Draw a local time inside `year`: month 1-12, day 1-28, hour 0-23,
/// minute 0-59, second 0.
///
/// The drawn wall-clock time is placed in `time_zone` with [`localize`].
pub fn synthesize_timestamp<R: Rng>(
    year: i32,
    time_zone: &Tz,
    rng: &mut R,
) -> Result<DateTime<Tz>> {
    let month: u32 = rng.random_range(1..=12);
    let day: u32 = rng.random_range(1..=28);
    let hour: u32 = rng.random_range(0..=23);
    let minute: u32 = rng.random_range(0..=59);

    let local = NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|date| date.and_hms_opt(hour, minute, 0))
        .ok_or_else(|| anyhow!("Invalid date {}-{}-{} {}:{}", year, month, day, hour, minute))?;

    Ok(localize(time_zone, &local))
}

/// Map a wall-clock time to an instant in `time_zone`.
///
/// Ambiguous times take the earlier instant. Times skipped by a DST gap are
/// read with the offset in force before the transition, which moves them
/// forward by the length of the gap.
pub fn localize(time_zone: &Tz, local: &NaiveDateTime) -> DateTime<Tz> {
    match time_zone.from_local_datetime(local) {
        LocalResult::Single(timestamp) => timestamp,
        LocalResult::Ambiguous(earliest, _) => earliest,
        LocalResult::None => {
            let offset_before = time_zone
                .offset_from_utc_datetime(&(*local - TimeDelta::days(1)))
                .fix()
                .local_minus_utc();
            time_zone.from_utc_datetime(&(*local - TimeDelta::seconds(i64::from(offset_before))))
        }
    }
}

/// Local civil date of `timestamp` as YYYYMMDD.
pub fn date_key(timestamp: &DateTime<Tz>) -> u32 {
    timestamp.year() as u32 * 10000 + timestamp.month() * 100 + timestamp.day()
}

/// Appends one event per valid row for a fixed user and event type.
pub struct EventRecorder<'a, R> {
    user: User,
    event_type: EventType,
    time_zone: Tz,
    rng: &'a mut R,
}

impl<'a, R: Rng> EventRecorder<'a, R> {
    pub fn new(user: User, event_type: EventType, time_zone: Tz, rng: &'a mut R) -> Self {
        EventRecorder {
            user,
            event_type,
            time_zone,
            rng,
        }
    }

    pub fn record(
        &mut self,
        session: &ImportSession,
        track: &Track,
        row: &ValidRow,
    ) -> Result<NewEvent> {
        let timestamp = synthesize_timestamp(row.year, &self.time_zone, &mut *self.rng)?;
        let event = NewEvent {
            ts: timestamp.timestamp(),
            date: date_key(&timestamp),
            user_id: self.user.id,
            track_id: track.id,
            event_type_id: self.event_type.id,
            is_organic: Some(!row.is_explicit),
        };
        session.insert_event(&event)?;
        Ok(event)
    }
}
