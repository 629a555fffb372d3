use crate::data::datetime::{format_display, parse_entry_time};
use crate::processing::date_window::DatasetBounds;
use crate::processing::filter;
use crate::processing::phase_report::{self, PhaseReport};
use crate::state::sample_table::{Column, MeasurementKind, Phase, SampleTable};
use crate::state::sliders::TimeSliders;
use crate::ui::plot::{self, phase_color};

/// A single-phase window: voltage, current and power over one time window.
pub struct PhasePanelState {
    pub phase: Phase,
    pub open: bool,
    bounds: DatasetBounds,
    time: TimeSliders,
    start_entry: String,
    end_entry: String,
    report: PhaseReport,
}

impl PhasePanelState {
    pub fn new(table: &SampleTable, phase: Phase) -> Option<Self> {
        let bounds = DatasetBounds::from_table(table)?;
        let report = phase_report::phase_report(table, phase, bounds.start, bounds.end);
        Some(Self {
            phase,
            open: true,
            time: TimeSliders::new(bounds.total_seconds()),
            start_entry: format_display(bounds.start),
            end_entry: format_display(bounds.end),
            bounds,
            report,
        })
    }

    pub fn report(&self) -> &PhaseReport {
        &self.report
    }

    fn refresh(&mut self, table: &SampleTable) {
        let start = self.time.start_time(self.bounds.start);
        let end = self.time.end_time(self.bounds.start);
        self.report = phase_report::phase_report(table, self.phase, start, end);
        self.start_entry = format_display(start);
        self.end_entry = format_display(end);
    }

    fn commit_entries(&mut self) {
        if let Some(t) = parse_entry_time(&self.start_entry) {
            self.time.set_start(self.bounds.offset_of(t));
        }
        if let Some(t) = parse_entry_time(&self.end_entry) {
            self.time.set_end(self.bounds.offset_of(t));
        }
    }
}

pub fn show_phase_panel(ctx: &egui::Context, state: &mut PhasePanelState, table: &SampleTable) {
    let mut open = state.open;
    egui::Window::new(format!("{} Analysis", state.phase))
        .id(egui::Id::new(("phase", state.phase)))
        .open(&mut open)
        .default_size([1000.0, 800.0])
        .show(ctx, |ui| {
            let mut changed = false;

            ui.horizontal(|ui| {
                ui.label("Start:");
                let start = ui.add(egui::TextEdit::singleline(&mut state.start_entry).desired_width(150.0));
                ui.label("End:");
                let end = ui.add(egui::TextEdit::singleline(&mut state.end_entry).desired_width(150.0));
                if start.lost_focus() || end.lost_focus() {
                    state.commit_entries();
                    changed = true;
                }
                if ui.button("Reset").clicked() {
                    state.time.reset();
                    changed = true;
                }
            });

            let total = state.time.total();
            let mut start = state.time.start();
            if ui
                .add(egui::Slider::new(&mut start, 0..=total).text("Start Time").show_value(false))
                .changed()
            {
                state.time.set_start(start);
                changed = true;
            }
            let mut end = state.time.end();
            if ui
                .add(egui::Slider::new(&mut end, 0..=total).text("End Time").show_value(false))
                .changed()
            {
                state.time.set_end(end);
                changed = true;
            }

            if changed {
                state.refresh(table);
            }

            ui.separator();
            show_report(ui, &state.report);
            ui.separator();
            show_plots(ui, state, table);
        });
    state.open = open;
}

fn show_report(ui: &mut egui::Ui, report: &PhaseReport) {
    egui::Grid::new(("phase_report", report.phase))
        .num_columns(3)
        .spacing([24.0, 4.0])
        .show(ui, |ui| {
            for kind in MeasurementKind::ALL {
                ui.label(report.average_label(kind));
                ui.label(report.max_label(kind));
                if kind == MeasurementKind::Power {
                    ui.label(report.power_min_label());
                }
                ui.end_row();
            }
            ui.label(egui::RichText::new(report.energy_label()).strong());
            ui.label(report.points_label());
            ui.label(report.elapsed_dhms_label());
            ui.end_row();
        });
}

fn show_plots(ui: &mut egui::Ui, state: &PhasePanelState, table: &SampleTable) {
    let phase = state.phase;
    let view = filter::filter_time(table, state.report.time_start, state.report.time_end);
    let timestamps = view.timestamps();
    let origin = state.bounds.start;
    let color = phase_color(phase);
    let height = (ui.available_height() / 3.0 - 8.0).max(120.0);

    for kind in MeasurementKind::ALL {
        let values = view.column(Column::new(kind, phase));
        let points = plot::to_points(origin, &timestamps, &values);
        let mean = state.report.statistics(kind).map(|s| s.mean);
        let y_label = format!("{} ({})", kind, kind.unit());
        let name = format!("{} {}", kind, phase);

        ui.allocate_ui(egui::vec2(ui.available_width(), height), |ui| {
            plot::show_time_plot(ui, ("phase_plot", phase, kind), origin, &y_label, |plot_ui| {
                plot::draw_trace(plot_ui, &name, color, points, mean);
            });
        });
    }
}
