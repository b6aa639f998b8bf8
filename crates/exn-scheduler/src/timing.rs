//! Pure slot computation for the daily scheduling window.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};

use crate::error::TimingError;
use crate::runner::PendingRequest;

/// A daily scheduling window with a fixed interval between run slots.
///
/// Slots for a given day start at the window start and advance by
/// `interval_hours` until they leave the window; an instant landing exactly
/// on the window end is still a valid slot. All computation is pure, so every
/// scheduling decision recomputes the slots for "today" from scratch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    start: NaiveTime,
    end: NaiveTime,
    interval_hours: u32,
}

impl TimeWindow {
    /// Creates a window from wall-clock bounds and a slot interval.
    ///
    /// # Errors
    ///
    /// Returns [`TimingError::InvertedWindow`] unless `start < end`, and
    /// [`TimingError::ZeroInterval`] if `interval_hours` is zero.
    pub fn new(start: NaiveTime, end: NaiveTime, interval_hours: u32) -> Result<Self, TimingError> {
        if start >= end {
            return Err(TimingError::InvertedWindow { start, end });
        }
        if interval_hours == 0 {
            return Err(TimingError::ZeroInterval);
        }
        Ok(Self {
            start,
            end,
            interval_hours,
        })
    }

    /// The ordered slot instants for `reference_day`.
    ///
    /// The first slot is `reference_day` at the window start; each subsequent
    /// slot adds the interval. A slot equal to the window end is kept, one
    /// past it is dropped.
    #[must_use]
    pub fn compute_slots(&self, reference_day: NaiveDate) -> Vec<DateTime<Utc>> {
        let window_end = reference_day.and_time(self.end).and_utc();
        let step = Duration::hours(i64::from(self.interval_hours));

        let mut slots = Vec::new();
        let mut cursor = reference_day.and_time(self.start).and_utc();
        while cursor <= window_end {
            slots.push(cursor);
            cursor = cursor + step;
        }
        slots
    }

    /// The slots of `reference_day` with no matching pending request.
    ///
    /// A slot counts as scheduled only when a pending request's
    /// `earliest_begin_date` equals it exactly; there is no tolerance window.
    #[must_use]
    pub fn unscheduled_slots(
        &self,
        reference_day: NaiveDate,
        pending: &[PendingRequest],
    ) -> Vec<DateTime<Utc>> {
        let scheduled: Vec<DateTime<Utc>> =
            pending.iter().map(|r| r.earliest_begin_date).collect();

        self.compute_slots(reference_day)
            .into_iter()
            .filter(|slot| !scheduled.contains(slot))
            .collect()
    }

    /// The first unscheduled slot of `reference_day` strictly after `now`,
    /// or `None` when every remaining slot is past or already scheduled.
    #[must_use]
    pub fn next_slot_to_schedule(
        &self,
        reference_day: NaiveDate,
        pending: &[PendingRequest],
        now: DateTime<Utc>,
    ) -> Option<DateTime<Utc>> {
        self.unscheduled_slots(reference_day, pending)
            .into_iter()
            .find(|slot| *slot > now)
    }
}
