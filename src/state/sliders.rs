use chrono::{Duration, NaiveDateTime};

use crate::processing::remap;
use crate::state::sample_table::ValueDomain;

/// A slider reduced to plain data: its travel range and current position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SliderState {
    pub from: f64,
    pub to: f64,
    pub value: f64,
}

impl SliderState {
    pub fn new(from: f64, to: f64, value: f64) -> Self {
        let mut slider = Self { from, to, value };
        slider.set(value);
        slider
    }

    pub fn domain(&self) -> ValueDomain {
        ValueDomain::new(self.from, self.to)
    }

    /// Move the handle, clamped to the travel range.
    pub fn set(&mut self, value: f64) {
        self.value = self.domain().clamp(value);
    }
}

/// The lower/upper value-window handles. Both always share one domain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValueSliders {
    pub lower: SliderState,
    pub upper: SliderState,
}

impl ValueSliders {
    /// Handles at both ends of `domain`.
    pub fn new(domain: ValueDomain) -> Self {
        Self {
            lower: SliderState::new(domain.from, domain.to, domain.from),
            upper: SliderState::new(domain.from, domain.to, domain.to),
        }
    }

    pub fn domain(&self) -> ValueDomain {
        self.lower.domain()
    }

    /// The value window, ordered low to high whichever handle is on top.
    pub fn window(&self) -> (f64, f64) {
        let (a, b) = (self.lower.value, self.upper.value);
        (a.min(b), a.max(b))
    }

    /// Move both handles into `new_domain`, each keeping its relative position
    /// within the current domain. On a zero-width current domain the lower
    /// handle goes to the bottom and the upper handle to the top.
    pub fn rebase(&self, new_domain: ValueDomain) -> Self {
        let old_domain = self.domain();
        let lower = remap::remap_handle_or(old_domain, new_domain, self.lower.value, 0.0);
        let upper = remap::remap_handle_or(old_domain, new_domain, self.upper.value, 1.0);
        Self {
            lower: SliderState::new(new_domain.from, new_domain.to, lower),
            upper: SliderState::new(new_domain.from, new_domain.to, upper),
        }
    }
}

/// Start/end time sliders, in whole seconds since the dataset start.
///
/// Each slider clamps itself against the other's live value: a start at or
/// past the end snaps to `end - 1`, an end at or before the start snaps to
/// `start + 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeSliders {
    start: i64,
    end: i64,
    total: i64,
}

impl TimeSliders {
    pub fn new(total_seconds: i64) -> Self {
        let total = total_seconds.max(0);
        Self { start: 0, end: total, total }
    }

    pub fn start(&self) -> i64 {
        self.start
    }

    pub fn end(&self) -> i64 {
        self.end
    }

    pub fn total(&self) -> i64 {
        self.total
    }

    pub fn set_start(&mut self, seconds: i64) {
        let seconds = seconds.clamp(0, self.total);
        if seconds < self.end {
            self.start = seconds;
        } else {
            self.start = (self.end - 1).max(0);
        }
    }

    pub fn set_end(&mut self, seconds: i64) {
        let seconds = seconds.clamp(0, self.total);
        if seconds > self.start {
            self.end = seconds;
        } else {
            self.end = (self.start + 1).min(self.total);
        }
    }

    pub fn reset(&mut self) {
        self.start = 0;
        self.end = self.total;
    }

    pub fn start_time(&self, origin: NaiveDateTime) -> NaiveDateTime {
        origin + Duration::seconds(self.start)
    }

    pub fn end_time(&self, origin: NaiveDateTime) -> NaiveDateTime {
        origin + Duration::seconds(self.end)
    }
}
