use std::collections::BTreeSet;
use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// One of the measured circuits. Phase 4 is the optional aggregate meter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Phase {
    One,
    Two,
    Three,
    Four,
}

impl Phase {
    pub const ALL: [Phase; 4] = [Phase::One, Phase::Two, Phase::Three, Phase::Four];

    /// The three line phases every dataset must carry.
    pub const LINES: [Phase; 3] = [Phase::One, Phase::Two, Phase::Three];

    pub fn number(self) -> u8 {
        match self {
            Phase::One => 1,
            Phase::Two => 2,
            Phase::Three => 3,
            Phase::Four => 4,
        }
    }

    pub fn index(self) -> usize {
        self.number() as usize - 1
    }

    pub fn from_number(n: u8) -> Option<Phase> {
        match n {
            1 => Some(Phase::One),
            2 => Some(Phase::Two),
            3 => Some(Phase::Three),
            4 => Some(Phase::Four),
            _ => None,
        }
    }

    /// Whether this phase is the aggregate channel whose energy stands for the whole load.
    pub fn is_aggregate(self) -> bool {
        self == Phase::Four
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Phase {}", self.number())
    }
}

pub type PhaseSet = BTreeSet<Phase>;

/// Which physical quantity is being filtered and displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MeasurementKind {
    Voltage,
    Current,
    Power,
}

impl MeasurementKind {
    pub const ALL: [MeasurementKind; 3] = [
        MeasurementKind::Voltage,
        MeasurementKind::Current,
        MeasurementKind::Power,
    ];

    pub fn column_prefix(&self) -> &'static str {
        match self {
            MeasurementKind::Voltage => "voltagemoy",
            MeasurementKind::Current => "currentmoy",
            MeasurementKind::Power => "powermoy",
        }
    }

    pub fn unit(&self) -> &'static str {
        match self {
            MeasurementKind::Voltage => "V",
            MeasurementKind::Current => "A",
            MeasurementKind::Power => "W",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MeasurementKind::Voltage => "Voltage",
            MeasurementKind::Current => "Current",
            MeasurementKind::Power => "Power",
        }
    }

    /// Decimal places used when printing an average of this quantity.
    pub fn average_decimals(&self) -> usize {
        match self {
            MeasurementKind::Power => 0,
            _ => 2,
        }
    }
}

impl fmt::Display for MeasurementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A single measured column, e.g. `powermoy2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Column {
    pub kind: MeasurementKind,
    pub phase: Phase,
}

impl Column {
    pub fn new(kind: MeasurementKind, phase: Phase) -> Self {
        Self { kind, phase }
    }

    pub fn name(&self) -> String {
        format!("{}{}", self.kind.column_prefix(), self.phase.number())
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PhaseReading {
    pub voltage: f64,
    pub current: f64,
    pub power: f64,
}

impl PhaseReading {
    pub fn new(voltage: f64, current: f64, power: f64) -> Self {
        Self { voltage, current, power }
    }

    pub fn get(&self, kind: MeasurementKind) -> f64 {
        match kind {
            MeasurementKind::Voltage => self.voltage,
            MeasurementKind::Current => self.current,
            MeasurementKind::Power => self.power,
        }
    }
}

/// One row of the log: a timestamp and one reading per carried phase.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub timestamp: NaiveDateTime,
    /// Indexed by `Phase::index()`. Three or four entries.
    pub phases: Vec<PhaseReading>,
}

impl Sample {
    pub fn new(timestamp: NaiveDateTime, phases: Vec<PhaseReading>) -> Self {
        Self { timestamp, phases }
    }

    pub fn reading(&self, phase: Phase) -> Option<&PhaseReading> {
        self.phases.get(phase.index())
    }

    pub fn value(&self, column: Column) -> Option<f64> {
        self.reading(column.phase).map(|r| r.get(column.kind))
    }
}

/// Closed numeric interval `[from, to]` a value slider can travel over.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueDomain {
    pub from: f64,
    pub to: f64,
}

impl ValueDomain {
    pub fn new(from: f64, to: f64) -> Self {
        Self { from, to }
    }

    pub fn width(&self) -> f64 {
        self.to - self.from
    }

    pub fn is_degenerate(&self) -> bool {
        let width = self.width();
        width == 0.0 || !width.is_finite()
    }

    pub fn clamp(&self, value: f64) -> f64 {
        let (lo, hi) = if self.from <= self.to {
            (self.from, self.to)
        } else {
            (self.to, self.from)
        };
        value.clamp(lo, hi)
    }
}

/// The loaded measurement log. Never mutated once built; views borrow it.
#[derive(Debug, Clone, Default)]
pub struct SampleTable {
    samples: Vec<Sample>,
    phase_count: usize,
}

impl SampleTable {
    /// Build a table keeping the given row order.
    pub fn new(samples: Vec<Sample>) -> Self {
        let phase_count = samples
            .iter()
            .map(|s| s.phases.len())
            .min()
            .unwrap_or(0)
            .min(Phase::ALL.len());
        Self { samples, phase_count }
    }

    /// Build a table ordered by timestamp. Rows with equal timestamps keep their input order.
    pub fn sorted_by_time(mut samples: Vec<Sample>) -> Self {
        samples.sort_by_key(|s| s.timestamp);
        Self::new(samples)
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn get(&self, index: usize) -> Option<&Sample> {
        self.samples.get(index)
    }

    /// Phases present in every row.
    pub fn phases(&self) -> PhaseSet {
        Phase::ALL.iter().copied().take(self.phase_count).collect()
    }

    pub fn has_phase(&self, phase: Phase) -> bool {
        phase.index() < self.phase_count
    }

    /// Earliest and latest timestamp. Does not assume the rows are sorted.
    pub fn time_bounds(&self) -> Option<(NaiveDateTime, NaiveDateTime)> {
        let first = self.samples.first()?.timestamp;
        Some(self.samples.iter().fold((first, first), |(lo, hi), s| {
            (lo.min(s.timestamp), hi.max(s.timestamp))
        }))
    }

    /// Global min/max of `kind` over the visible phases this table carries.
    /// With no visible phase the whole set of carried phases is used.
    pub fn value_domain(&self, kind: MeasurementKind, visible: &PhaseSet) -> Option<ValueDomain> {
        let mut columns: Vec<Column> = visible
            .iter()
            .filter(|p| self.has_phase(**p))
            .map(|p| Column::new(kind, *p))
            .collect();
        if columns.is_empty() {
            columns = self.phases().into_iter().map(|p| Column::new(kind, p)).collect();
        }

        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for sample in &self.samples {
            for column in &columns {
                if let Some(v) = sample.value(*column) {
                    if v.is_finite() {
                        min = min.min(v);
                        max = max.max(v);
                    }
                }
            }
        }

        if min.is_finite() && max.is_finite() {
            Some(ValueDomain::new(min, max))
        } else {
            None
        }
    }
}
