use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};

use crate::state::sample_table::SampleTable;
use crate::state::sliders::TimeSliders;

/// Length of a "whole day" window: 24 h minus one second.
pub const DAY_WINDOW_SECONDS: i64 = 24 * 3600 - 1;

/// First and last timestamp of a dataset. Slider offsets count whole seconds
/// from `start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DatasetBounds {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl DatasetBounds {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        if start <= end {
            Self { start, end }
        } else {
            Self { start: end, end: start }
        }
    }

    pub fn from_table(table: &SampleTable) -> Option<Self> {
        table.time_bounds().map(|(start, end)| Self::new(start, end))
    }

    pub fn total_seconds(&self) -> i64 {
        (self.end - self.start).num_seconds()
    }

    pub fn offset_of(&self, t: NaiveDateTime) -> i64 {
        (t - self.start).num_seconds()
    }

    pub fn time_at(&self, offset: i64) -> NaiveDateTime {
        self.start + Duration::seconds(offset)
    }

    pub fn first_day(&self) -> NaiveDate {
        self.start.date()
    }

    pub fn last_day(&self) -> NaiveDate {
        self.end.date()
    }
}

/// Which slider has to move first so neither assignment gets clamped by the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SliderOrder {
    StartFirst,
    EndFirst,
}

/// Target slider offsets for a picked calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub start_offset: i64,
    pub end_offset: i64,
    pub order: SliderOrder,
}

impl DateWindow {
    pub fn duration_seconds(&self) -> i64 {
        self.end_offset - self.start_offset
    }

    /// Move both sliders in the prescribed order.
    pub fn apply(&self, sliders: &mut TimeSliders) {
        match self.order {
            SliderOrder::StartFirst => {
                sliders.set_start(self.start_offset);
                sliders.set_end(self.end_offset);
            }
            SliderOrder::EndFirst => {
                sliders.set_end(self.end_offset);
                sliders.set_start(self.start_offset);
            }
        }
    }
}

/// Resolve a picked day into a one-day slider window.
///
/// The window starts at the picked day's midnight, or at the dataset start if
/// that is later, and lasts [`DAY_WINDOW_SECONDS`] unless the dataset ends
/// first. Moving backwards sets the start slider first; otherwise the end
/// slider goes first.
pub fn resolve(
    picked: NaiveDate,
    bounds: &DatasetBounds,
    current_start_offset: i64,
) -> DateWindow {
    let total = bounds.total_seconds();
    let midnight = picked.and_time(NaiveTime::MIN);

    let start_offset = bounds.offset_of(midnight.max(bounds.start)).min(total);
    let end_offset = (start_offset + DAY_WINDOW_SECONDS).min(total);

    let order = if start_offset < current_start_offset {
        SliderOrder::StartFirst
    } else {
        SliderOrder::EndFirst
    };

    DateWindow {
        start_offset,
        end_offset,
        order,
    }
}
