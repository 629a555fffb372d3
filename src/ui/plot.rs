use chrono::{NaiveDateTime, TimeDelta};
use egui::Color32;
use egui_plot::{HLine, Legend, Line, LineStyle, MarkerShape, Plot, PlotUi, Points};

use crate::data::datetime::{format_marker, seconds_between};
use crate::processing::statistics::ColumnStatistics;
use crate::state::sample_table::Phase;

/// Trace colors for phases 1-4: blue, red, green, grey.
pub const PHASE_COLORS: [[u8; 3]; 4] = [
    [0, 0, 255],
    [255, 0, 0],
    [0, 128, 0],
    [128, 128, 128],
];

/// Trend line color.
pub const SMOOTHING_COLOR: [u8; 3] = [128, 0, 128];

pub fn phase_color(phase: Phase) -> Color32 {
    let [r, g, b] = PHASE_COLORS[phase.index()];
    Color32::from_rgb(r, g, b)
}

pub fn smoothing_color() -> Color32 {
    let [r, g, b] = SMOOTHING_COLOR;
    Color32::from_rgb(r, g, b)
}

/// Plot points with x in seconds since `origin`. NaN values are dropped.
pub fn to_points(origin: NaiveDateTime, timestamps: &[NaiveDateTime], values: &[f64]) -> Vec<[f64; 2]> {
    timestamps
        .iter()
        .zip(values)
        .filter(|(_, v)| v.is_finite())
        .map(|(t, v)| [seconds_between(origin, *t), *v])
        .collect()
}

/// A plot whose x axis is seconds since `origin`, labelled as `dd/mm HH:MM:SS`.
pub fn show_time_plot(
    ui: &mut egui::Ui,
    id: impl std::hash::Hash,
    origin: NaiveDateTime,
    y_label: &str,
    add_contents: impl FnOnce(&mut PlotUi),
) {
    Plot::new(id)
        .legend(Legend::default())
        .y_axis_label(y_label)
        .x_axis_formatter(move |mark, _range| axis_label(origin, mark.value))
        .show(ui, add_contents);
}

/// Tick label for `seconds` past `origin`. Marks outside chrono's range keep the raw number.
pub fn axis_label(origin: NaiveDateTime, seconds: f64) -> String {
    TimeDelta::try_milliseconds((seconds * 1000.0) as i64)
        .and_then(|offset| origin.checked_add_signed(offset))
        .map(format_marker)
        .unwrap_or_else(|| format!("{seconds:.0}"))
}

/// Raw trace plus its dashed average line.
pub fn draw_trace(
    plot_ui: &mut PlotUi,
    name: &str,
    color: Color32,
    points: Vec<[f64; 2]>,
    mean: Option<f64>,
) {
    plot_ui.line(Line::new(points).name(name).color(color).width(1.0));
    if let Some(mean) = mean {
        plot_ui.hline(
            HLine::new(mean)
                .color(color.gamma_multiply(0.5))
                .style(LineStyle::dashed_loose()),
        );
    }
}

/// Max (purple) and min (yellow) markers.
pub fn draw_extrema(plot_ui: &mut PlotUi, origin: NaiveDateTime, stats: &ColumnStatistics) {
    let max = [seconds_between(origin, stats.max_timestamp), stats.max_value];
    let min = [seconds_between(origin, stats.min_timestamp), stats.min_value];
    plot_ui.points(
        Points::new(vec![max])
            .shape(MarkerShape::Circle)
            .radius(4.0)
            .filled(true)
            .color(smoothing_color()),
    );
    plot_ui.points(
        Points::new(vec![min])
            .shape(MarkerShape::Circle)
            .radius(4.0)
            .filled(true)
            .color(Color32::YELLOW),
    );
}
