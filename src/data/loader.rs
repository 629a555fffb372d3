use std::collections::HashMap;
use std::path::Path;

use thiserror::Error;

use crate::data::datetime::parse_log_time;
use crate::state::sample_table::{Column, MeasurementKind, Phase, PhaseReading, Sample, SampleTable};

/// Field delimiter of measurement logs.
pub const DELIMITER: u8 = b';';

/// Name of the timestamp column.
pub const TIME_COLUMN: &str = "time";

/// Failures that make a whole file unusable.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Cannot read file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Cannot read header: {0}")]
    Csv(#[from] csv::Error),

    #[error("Required column '{0}' is missing")]
    MissingColumn(String),

    #[error("No data found in file")]
    Empty,
}

/// Why a single row was left out.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RowError {
    #[error("expected {expected} fields, found {found}")]
    FieldCount { expected: usize, found: usize },

    #[error("unparsable timestamp '{0}'")]
    Timestamp(String),

    #[error("unparsable value '{value}' in column '{column}'")]
    Number { column: String, value: String },

    #[error("{0}")]
    Record(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct RejectedRow {
    /// 1-based line number in the input.
    pub line: u64,
    pub reason: RowError,
}

/// Where phase 4 readings came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase4Source {
    #[default]
    Absent,
    Measured,
    /// Voltage computed from phases 1-3, current and power measured.
    DerivedVoltage,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct LoadReport {
    pub accepted: usize,
    pub rejected: Vec<RejectedRow>,
    pub phase4: Phase4Source,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LoadOptions {
    pub derive_phase4_voltage: bool,
}

#[derive(Debug, Clone)]
pub struct LoadedTable {
    pub table: SampleTable,
    pub report: LoadReport,
}

/// Read a log from disk.
pub fn load_file(path: &Path, options: &LoadOptions) -> Result<LoadedTable, LoadError> {
    let content = std::fs::read(path)?;
    let text = decode_text(content);
    let loaded = parse_samples(&text, options)?;
    tracing::info!(
        "Loaded {} rows from {:?} ({} rejected)",
        loaded.report.accepted,
        path,
        loaded.report.rejected.len()
    );
    Ok(loaded)
}

/// UTF-8, falling back to Latin-1 (each byte maps to the same code point).
pub fn decode_text(content: Vec<u8>) -> String {
    match String::from_utf8(content) {
        Ok(text) => text,
        Err(e) => e.into_bytes().iter().map(|&b| b as char).collect(),
    }
}

/// Resolved positions of the columns a row is built from.
struct ColumnLayout {
    time: usize,
    /// `[voltage, current, power]` per carried phase; `None` voltage means derived.
    phases: Vec<[Option<usize>; 3]>,
    width: usize,
}

impl ColumnLayout {
    fn resolve(headers: &csv::StringRecord, options: &LoadOptions) -> Result<(Self, Phase4Source), LoadError> {
        let index: HashMap<String, usize> = headers
            .iter()
            .enumerate()
            .map(|(i, h)| (h.trim().to_lowercase(), i))
            .collect();
        let find = |name: &str| index.get(name).copied();
        let column = |kind, phase| find(&Column::new(kind, phase).name());

        let time = find(TIME_COLUMN).ok_or_else(|| LoadError::MissingColumn(TIME_COLUMN.to_string()))?;

        let mut phases = Vec::with_capacity(4);
        for phase in Phase::LINES {
            let mut slots = [None; 3];
            for (slot, kind) in slots.iter_mut().zip(MeasurementKind::ALL) {
                let name = Column::new(kind, phase).name();
                *slot = Some(find(&name).ok_or(LoadError::MissingColumn(name))?);
            }
            phases.push(slots);
        }

        let v4 = column(MeasurementKind::Voltage, Phase::Four);
        let c4 = column(MeasurementKind::Current, Phase::Four);
        let p4 = column(MeasurementKind::Power, Phase::Four);
        let phase4 = match (v4, c4, p4) {
            (Some(_), Some(_), Some(_)) => {
                phases.push([v4, c4, p4]);
                Phase4Source::Measured
            }
            (None, Some(_), Some(_)) if options.derive_phase4_voltage => {
                phases.push([None, c4, p4]);
                Phase4Source::DerivedVoltage
            }
            (None, None, None) => Phase4Source::Absent,
            _ => {
                tracing::warn!("Incomplete phase 4 columns, phase 4 ignored");
                Phase4Source::Absent
            }
        };

        Ok((
            Self {
                time,
                phases,
                width: headers.len(),
            },
            phase4,
        ))
    }

    fn parse_row(&self, record: &csv::StringRecord) -> Result<Sample, RowError> {
        if record.len() != self.width {
            return Err(RowError::FieldCount {
                expected: self.width,
                found: record.len(),
            });
        }

        let raw_time = record.get(self.time).unwrap_or_default();
        let timestamp =
            parse_log_time(raw_time).ok_or_else(|| RowError::Timestamp(raw_time.to_string()))?;

        let mut readings: Vec<PhaseReading> = Vec::with_capacity(self.phases.len());
        for (phase, slots) in Phase::ALL.iter().zip(&self.phases) {
            let mut values = [f64::NAN; 3];
            for ((value, slot), kind) in values.iter_mut().zip(slots).zip(MeasurementKind::ALL) {
                if let Some(idx) = slot {
                    *value = parse_value(record, *idx, Column::new(kind, *phase))?;
                }
            }
            if slots[0].is_none() {
                values[0] = derive_phase4_voltage(&readings);
            }
            readings.push(PhaseReading::new(values[0], values[1], values[2]));
        }

        Ok(Sample::new(timestamp, readings))
    }
}

fn parse_value(record: &csv::StringRecord, idx: usize, column: Column) -> Result<f64, RowError> {
    let raw = record.get(idx).unwrap_or_default();
    match raw.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(RowError::Number {
            column: column.name(),
            value: raw.to_string(),
        }),
    }
}

/// Mean of the phase 1-3 voltages rounded to two decimals.
pub fn derive_phase4_voltage(lines: &[PhaseReading]) -> f64 {
    let lines = &lines[..lines.len().min(3)];
    if lines.is_empty() {
        return f64::NAN;
    }
    let mean = lines.iter().map(|r| r.voltage).sum::<f64>() / lines.len() as f64;
    (mean * 100.0).round() / 100.0
}

/// Parse `;`-delimited log text into a time-sorted table.
///
/// Malformed rows are reported and skipped; a missing required column fails
/// the whole file.
pub fn parse_samples(text: &str, options: &LoadOptions) -> Result<LoadedTable, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(DELIMITER)
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers = reader.headers()?.clone();
    if headers.iter().all(|h| h.trim().is_empty()) {
        return Err(LoadError::Empty);
    }
    let (layout, phase4) = ColumnLayout::resolve(&headers, options)?;

    let mut samples = Vec::new();
    let mut rejected = Vec::new();
    for result in reader.records() {
        let (line, parsed) = match result {
            Ok(record) => {
                let line = record.position().map(|p| p.line()).unwrap_or_default();
                if record.iter().all(|f| f.trim().is_empty()) {
                    continue;
                }
                (line, layout.parse_row(&record))
            }
            Err(e) => {
                let line = e.position().map(|p| p.line()).unwrap_or_default();
                (line, Err(RowError::Record(e.to_string())))
            }
        };

        match parsed {
            Ok(sample) => samples.push(sample),
            Err(reason) => {
                tracing::warn!("Skipping line {line}: {reason}");
                rejected.push(RejectedRow { line, reason });
            }
        }
    }

    let report = LoadReport {
        accepted: samples.len(),
        rejected,
        phase4,
    };
    Ok(LoadedTable {
        table: SampleTable::sorted_by_time(samples),
        report,
    })
}
