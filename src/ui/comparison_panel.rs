use chrono::NaiveDate;

use crate::data::datetime::{format_display, parse_entry_time};
use crate::processing::date_window::{self, DatasetBounds};
use crate::processing::pipeline::{self, ViewModel};
use crate::processing::smoothing::SmoothingMode;
use crate::state::config::EngineConfig;
use crate::state::sample_table::{MeasurementKind, Phase, SampleTable};
use crate::state::selection::Selection;
use crate::state::sliders::{TimeSliders, ValueSliders};
use crate::ui::plot::{self, phase_color, smoothing_color};

/// One comparison window: all phases of a single measurement kind.
pub struct ComparisonPanelState {
    pub kind: MeasurementKind,
    pub open: bool,
    bounds: DatasetBounds,
    selection: Selection,
    time: TimeSliders,
    values: ValueSliders,
    start_entry: String,
    end_entry: String,
    smoothing_enabled: bool,
    smoothing_mode: SmoothingMode,
    smoothing_entry: String,
    calendar_date: NaiveDate,
    view: ViewModel,
}

impl ComparisonPanelState {
    /// `None` for an empty table.
    pub fn new(table: &SampleTable, kind: MeasurementKind, config: &EngineConfig) -> Option<Self> {
        let bounds = DatasetBounds::from_table(table)?;
        let selection = Selection::full_range(table, kind)?;
        let domain = table.value_domain(kind, selection.visible_phases())?;
        let smoothing_mode = config.smoothing.mode;
        let options = config.recompute_options(config.smoothing.enabled.then_some(smoothing_mode));
        let view = pipeline::recompute(table, &selection, &options);

        Some(Self {
            kind,
            open: true,
            bounds,
            time: TimeSliders::new(bounds.total_seconds()),
            values: ValueSliders::new(domain),
            start_entry: format_display(selection.time_start()),
            end_entry: format_display(selection.time_end()),
            smoothing_enabled: config.smoothing.enabled,
            smoothing_mode,
            smoothing_entry: smoothing_mode.size().to_string(),
            calendar_date: bounds.first_day(),
            selection,
            view,
        })
    }

    pub fn view(&self) -> &ViewModel {
        &self.view
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    fn recompute(&mut self, table: &SampleTable, config: &EngineConfig) {
        let smoothing = self.smoothing_enabled.then_some(self.smoothing_mode);
        self.view = pipeline::recompute(table, &self.selection, &config.recompute_options(smoothing));
    }

    fn sync_time_from_sliders(&mut self) {
        let start = self.time.start_time(self.bounds.start);
        let end = self.time.end_time(self.bounds.start);
        self.selection.set_time_window(start, end);
        self.start_entry = format_display(self.selection.time_start());
        self.end_entry = format_display(self.selection.time_end());
    }

    fn sync_values_from_sliders(&mut self) {
        let (min, max) = self.values.window();
        self.selection.set_value_window(min, max);
    }

    /// Phase visibility changed: rebase the value sliders onto the new domain
    /// before filtering again.
    fn set_phase_visible(&mut self, table: &SampleTable, phase: Phase, visible: bool) {
        self.selection.set_phase_visible(phase, visible);
        if let Some(domain) = table.value_domain(self.kind, self.selection.visible_phases()) {
            self.values = self.values.rebase(domain);
        }
        self.sync_values_from_sliders();
    }

    fn commit_start_entry(&mut self) {
        match parse_entry_time(&self.start_entry) {
            Some(t) => {
                self.time.set_start(self.bounds.offset_of(t));
                self.sync_time_from_sliders();
            }
            None => self.start_entry = format_display(self.selection.time_start()),
        }
    }

    fn commit_end_entry(&mut self) {
        match parse_entry_time(&self.end_entry) {
            Some(t) => {
                self.time.set_end(self.bounds.offset_of(t));
                self.sync_time_from_sliders();
            }
            None => self.end_entry = format_display(self.selection.time_end()),
        }
    }

    fn pick_date(&mut self, date: NaiveDate) {
        let window = date_window::resolve(date, &self.bounds, self.time.start());
        window.apply(&mut self.time);
        self.sync_time_from_sliders();
    }

    fn reset(&mut self, table: &SampleTable) {
        if let Some(selection) = Selection::full_range(table, self.kind) {
            self.selection = selection;
        }
        self.time.reset();
        if let Some(domain) = table.value_domain(self.kind, self.selection.visible_phases()) {
            self.values = ValueSliders::new(domain);
        }
        self.start_entry = format_display(self.selection.time_start());
        self.end_entry = format_display(self.selection.time_end());
    }
}

/// Draw a comparison window. Every change recomputes the view before the plot is drawn.
pub fn show_comparison_panel(
    ctx: &egui::Context,
    state: &mut ComparisonPanelState,
    table: &SampleTable,
    config: &EngineConfig,
) {
    let mut open = state.open;
    egui::Window::new(format!("{} Comparison - All Phases", state.kind))
        .id(egui::Id::new(("comparison", state.kind)))
        .open(&mut open)
        .default_size([1100.0, 700.0])
        .show(ctx, |ui| {
            let mut changed = false;

            changed |= show_time_controls(ui, state, table, config);
            ui.separator();
            changed |= show_phase_controls(ui, state, table);
            ui.separator();

            ui.horizontal(|ui| {
                ui.label(egui::RichText::new(state.view.points_label()).strong());
                ui.label(egui::RichText::new(state.view.elapsed_dhms_label()).strong());
                if let Some(energy) = state.view.energy_label() {
                    ui.label(egui::RichText::new(energy).strong());
                }
                ui.label(egui::RichText::new(state.view.max_label()).strong());
                ui.label(egui::RichText::new(state.view.min_label()).strong());
            });

            ui.horizontal(|ui| {
                changed |= show_value_sliders(ui, state);
                if changed {
                    state.recompute(table, config);
                }
                show_plot(ui, state);
            });
        });
    state.open = open;
}

fn show_time_controls(
    ui: &mut egui::Ui,
    state: &mut ComparisonPanelState,
    table: &SampleTable,
    config: &EngineConfig,
) -> bool {
    let mut changed = false;

    ui.horizontal(|ui| {
        ui.label("Start:");
        let start = ui.add(egui::TextEdit::singleline(&mut state.start_entry).desired_width(150.0));
        if start.lost_focus() {
            state.commit_start_entry();
            changed = true;
        }
        ui.label("End:");
        let end = ui.add(egui::TextEdit::singleline(&mut state.end_entry).desired_width(150.0));
        if end.lost_focus() {
            state.commit_end_entry();
            changed = true;
        }

        if ui.button("Reset").clicked() {
            state.reset(table);
            changed = true;
        }

        if config.calendar {
            let picker = ui.add(
                egui_extras::DatePickerButton::new(&mut state.calendar_date)
                    .id_salt(&format!("calendar_{}", state.kind)),
            );
            if picker.changed() {
                state.pick_date(state.calendar_date);
                changed = true;
            }
        }
    });

    let total = state.time.total();
    let mut start = state.time.start();
    let mut end = state.time.end();
    let start_resp = ui.add(
        egui::Slider::new(&mut start, 0..=total)
            .text("Start Time")
            .show_value(false),
    );
    if start_resp.changed() {
        state.time.set_start(start);
        state.sync_time_from_sliders();
        changed = true;
    }
    let end_resp = ui.add(
        egui::Slider::new(&mut end, 0..=total)
            .text("End Time")
            .show_value(false),
    );
    if end_resp.changed() {
        state.time.set_end(end);
        state.sync_time_from_sliders();
        changed = true;
    }

    changed
}

fn show_phase_controls(ui: &mut egui::Ui, state: &mut ComparisonPanelState, table: &SampleTable) -> bool {
    let mut changed = false;

    ui.horizontal(|ui| {
        ui.label("Visible Phases:");
        for phase in table.phases() {
            let mut visible = state.selection.is_phase_visible(phase);
            let text = egui::RichText::new(phase.to_string()).color(phase_color(phase));
            if ui.checkbox(&mut visible, text).changed() {
                state.set_phase_visible(table, phase, visible);
                changed = true;
            }
        }

        ui.separator();
        let label = egui::RichText::new("Moving average").color(smoothing_color());
        if ui.checkbox(&mut state.smoothing_enabled, label).changed() {
            changed = true;
        }
        let entry = ui.add(egui::TextEdit::singleline(&mut state.smoothing_entry).desired_width(40.0));
        if entry.lost_focus() {
            match state.smoothing_entry.trim().parse::<usize>() {
                Ok(size) => {
                    state.smoothing_mode = state.smoothing_mode.with_size(size);
                    changed = true;
                }
                Err(_) => state.smoothing_entry = state.smoothing_mode.size().to_string(),
            }
        }
        if state.smoothing_enabled {
            ui.label(egui::RichText::new(state.smoothing_mode.label()).weak());
        }
    });

    changed
}

fn show_value_sliders(ui: &mut egui::Ui, state: &mut ComparisonPanelState) -> bool {
    let mut changed = false;
    let domain = state.values.domain();
    let (lo, hi) = if domain.from <= domain.to {
        (domain.from, domain.to)
    } else {
        (domain.to, domain.from)
    };

    ui.vertical(|ui| {
        let mut upper = state.values.upper.value;
        ui.label(egui::RichText::new(format!("Max value: {upper:.2}")).strong());
        if ui.add(egui::Slider::new(&mut upper, lo..=hi).vertical().show_value(false)).changed() {
            state.values.upper.set(upper);
            changed = true;
        }

        let mut lower = state.values.lower.value;
        if ui.add(egui::Slider::new(&mut lower, lo..=hi).vertical().show_value(false)).changed() {
            state.values.lower.set(lower);
            changed = true;
        }
        ui.label(egui::RichText::new(format!("Min value: {lower:.2}")).strong());
    });

    if changed {
        state.sync_values_from_sliders();
    }
    changed
}

fn show_plot(ui: &mut egui::Ui, state: &ComparisonPanelState) {
    let view = &state.view;
    let origin = state.bounds.start;
    let y_label = format!("{} ({})", view.kind, view.kind.unit());

    ui.vertical(|ui| {
        if view.is_empty() {
            ui.label(egui::RichText::new("No data in the current selection").weak());
        }
        for trace in &view.traces {
            if let Some(stats) = &trace.statistics {
                ui.label(egui::RichText::new(stats.average_annotation()).color(phase_color(trace.phase)));
            }
        }

        plot::show_time_plot(ui, ("comparison_plot", view.kind), origin, &y_label, |plot_ui| {
            for trace in &view.traces {
                let color = phase_color(trace.phase);
                let points = plot::to_points(origin, &view.timestamps, &trace.values);
                let mean = trace.statistics.as_ref().map(|s| s.mean);
                plot::draw_trace(plot_ui, &trace.phase.to_string(), color, points, mean);

                if let Some(stats) = &trace.statistics {
                    plot::draw_extrema(plot_ui, origin, stats);
                }

                if let Some(smoothed) = &trace.smoothed {
                    let points = plot::to_points(origin, &view.timestamps, smoothed);
                    let name = format!("Moving average {}", trace.phase);
                    plot::draw_trace(plot_ui, &name, smoothing_color(), points, None);
                }
            }
        });
    });
}
