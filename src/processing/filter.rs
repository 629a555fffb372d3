use chrono::NaiveDateTime;

use crate::state::sample_table::{Column, Sample, SampleTable};
use crate::state::selection::Selection;

/// Rows of a [`SampleTable`] matching a selection, as indices into the table.
/// Ordering follows the table.
#[derive(Debug, Clone)]
pub struct FilteredView<'a> {
    table: &'a SampleTable,
    indices: Vec<usize>,
}

impl<'a> FilteredView<'a> {
    pub fn empty(table: &'a SampleTable) -> Self {
        Self { table, indices: Vec::new() }
    }

    pub fn table(&self) -> &'a SampleTable {
        self.table
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a Sample> + '_ {
        let samples = self.table.samples();
        self.indices.iter().map(move |&i| &samples[i])
    }

    pub fn timestamps(&self) -> Vec<NaiveDateTime> {
        self.iter().map(|s| s.timestamp).collect()
    }

    /// Values of `column`, NaN where the table does not carry it.
    pub fn column(&self, column: Column) -> Vec<f64> {
        self.iter()
            .map(|s| s.value(column).unwrap_or(f64::NAN))
            .collect()
    }
}

/// Columns the value predicate checks: the current kind on each visible phase
/// the table actually carries.
pub fn value_filter_columns(table: &SampleTable, selection: &Selection) -> Vec<Column> {
    selection
        .visible_phases()
        .iter()
        .filter(|p| table.has_phase(**p))
        .map(|p| Column::new(selection.kind(), *p))
        .collect()
}

/// Apply `selection` to the whole table.
///
/// A row is kept when its timestamp is inside the time window and its value is
/// inside the value window on *every* visible phase's column. With no visible
/// phase only the time window applies.
pub fn filter<'a>(table: &'a SampleTable, selection: &Selection) -> FilteredView<'a> {
    let columns = value_filter_columns(table, selection);

    let indices = table
        .samples()
        .iter()
        .enumerate()
        .filter(|(_, s)| selection.contains_time(s.timestamp))
        .filter(|(_, s)| {
            columns.iter().all(|c| {
                s.value(*c)
                    .map(|v| selection.contains_value(v))
                    .unwrap_or(false)
            })
        })
        .map(|(i, _)| i)
        .collect();

    FilteredView { table, indices }
}

/// Time window only, bounds inclusive and swapped if reversed.
pub fn filter_time(
    table: &SampleTable,
    start: NaiveDateTime,
    end: NaiveDateTime,
) -> FilteredView<'_> {
    let (start, end) = if start <= end { (start, end) } else { (end, start) };
    let indices = table
        .samples()
        .iter()
        .enumerate()
        .filter(|(_, s)| start <= s.timestamp && s.timestamp <= end)
        .map(|(i, _)| i)
        .collect();

    FilteredView { table, indices }
}
