use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::data::datetime::{format_display, points_label};
use crate::data::loader::{self, LoadError, LoadReport, LoadedTable, Phase4Source};
use crate::state::config::EngineConfig;
use crate::state::sample_table::{MeasurementKind, Phase, SampleTable};
use crate::ui::comparison_panel::{self, ComparisonPanelState};
use crate::ui::phase_panel::{self, PhasePanelState};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Extensions accepted from the file dialog and from drag and drop.
const LOG_EXTENSIONS: &[&str] = &["txt", "csv"];

/// Pending async file load result.
struct PendingLoad {
    path: PathBuf,
    result: Arc<Mutex<Option<Result<LoadedTable, LoadError>>>>,
}

/// Which panels open when a file finishes loading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelChoice {
    pub comparisons: Vec<(MeasurementKind, bool)>,
    pub phases: Vec<(Phase, bool)>,
}

impl Default for PanelChoice {
    fn default() -> Self {
        Self {
            comparisons: vec![
                (MeasurementKind::Voltage, false),
                (MeasurementKind::Current, false),
                (MeasurementKind::Power, true),
            ],
            phases: Phase::ALL.iter().map(|p| (*p, false)).collect(),
        }
    }
}

/// A loaded log and the panels looking at it.
pub struct Session {
    pub path: PathBuf,
    pub table: SampleTable,
    pub report: LoadReport,
    pub comparisons: Vec<ComparisonPanelState>,
    pub phases: Vec<PhasePanelState>,
}

impl Session {
    fn new(path: PathBuf, loaded: LoadedTable, choice: &PanelChoice, config: &EngineConfig) -> Self {
        let mut session = Self {
            path,
            table: loaded.table,
            report: loaded.report,
            comparisons: Vec::new(),
            phases: Vec::new(),
        };
        for (kind, wanted) in &choice.comparisons {
            if *wanted {
                session.open_comparison(*kind, config);
            }
        }
        for (phase, wanted) in &choice.phases {
            if *wanted {
                session.open_phase(*phase);
            }
        }
        session
    }

    fn open_comparison(&mut self, kind: MeasurementKind, config: &EngineConfig) {
        if let Some(panel) = self.comparisons.iter_mut().find(|p| p.kind == kind) {
            panel.open = true;
            return;
        }
        match ComparisonPanelState::new(&self.table, kind, config) {
            Some(panel) => self.comparisons.push(panel),
            None => tracing::warn!("No data to compare for {kind}"),
        }
    }

    fn open_phase(&mut self, phase: Phase) {
        if let Some(panel) = self.phases.iter_mut().find(|p| p.phase == phase) {
            panel.open = true;
            return;
        }
        if !self.table.has_phase(phase) {
            tracing::warn!("{phase} is not present in {:?}", self.path);
            return;
        }
        if let Some(panel) = PhasePanelState::new(&self.table, phase) {
            self.phases.push(panel);
        }
    }
}

/// The main PhaseScope application.
pub struct PhaseScopeApp {
    pub config: EngineConfig,
    pub session: Option<Session>,
    pub choice: PanelChoice,
    /// An error message shown in a modal window until dismissed.
    pub error_message: Option<String>,
    pub show_about: bool,
    pending_load: Option<PendingLoad>,
}

impl PhaseScopeApp {
    pub fn new(cc: &eframe::CreationContext<'_>, config: EngineConfig) -> Self {
        let ctx = &cc.egui_ctx;
        let mut style = (*ctx.style()).clone();
        style.text_styles.insert(egui::TextStyle::Body, egui::FontId::proportional(15.0));
        style.text_styles.insert(egui::TextStyle::Button, egui::FontId::proportional(14.5));
        style.text_styles.insert(egui::TextStyle::Heading, egui::FontId::proportional(22.0));
        style.spacing.button_padding = egui::vec2(10.0, 5.0);
        style.spacing.item_spacing = egui::vec2(8.0, 6.0);
        style.visuals.window_corner_radius = egui::CornerRadius::same(8);
        ctx.set_style(style);

        Self {
            config,
            session: None,
            choice: PanelChoice::default(),
            error_message: None,
            show_about: false,
            pending_load: None,
        }
    }

    fn open_file_dialog(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Measurement Logs", LOG_EXTENSIONS)
            .add_filter("All Files", &["*"])
            .pick_file()
        {
            self.load_file(&path);
        }
    }

    /// Parse a log on a worker thread so the UI stays responsive.
    fn load_file(&mut self, path: &Path) {
        let path_buf = path.to_path_buf();
        let options = self.config.load_options();
        let result: Arc<Mutex<Option<Result<LoadedTable, LoadError>>>> = Arc::new(Mutex::new(None));
        let result_clone = Arc::clone(&result);

        std::thread::spawn(move || {
            let loaded = loader::load_file(&path_buf, &options);
            if let Ok(mut slot) = result_clone.lock() {
                *slot = Some(loaded);
            }
        });

        self.pending_load = Some(PendingLoad {
            path: path.to_path_buf(),
            result,
        });
    }

    fn poll_pending_load(&mut self) {
        let Some(pending) = &self.pending_load else {
            return;
        };
        let finished = match pending.result.lock() {
            Ok(mut slot) => slot.take(),
            Err(_) => Some(Err(LoadError::Io(std::io::Error::other("loader thread panicked")))),
        };
        let Some(result) = finished else {
            return;
        };

        let path = pending.path.clone();
        self.pending_load = None;
        match result {
            Ok(loaded) if loaded.table.is_empty() => {
                tracing::error!("No usable rows in {:?}", path);
                self.error_message = Some(format!("No usable rows in {}", path.display()));
            }
            Ok(loaded) => {
                self.session = Some(Session::new(path, loaded, &self.choice, &self.config));
            }
            Err(e) => {
                tracing::error!("Failed to load file: {e}");
                self.error_message = Some(format!("Failed to load file: {e}"));
            }
        }
    }

    fn show_header(&mut self, ctx: &egui::Context) {
        let mut open_file = false;
        egui::TopBottomPanel::top("header")
            .frame(egui::Frame::side_top_panel(&ctx.style()).inner_margin(egui::Margin::symmetric(16, 8)))
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    let heading = ui.heading("PhaseScope");
                    heading.context_menu(|ui| {
                        if ui.button("About PhaseScope").clicked() {
                            self.show_about = true;
                            ui.close_menu();
                        }
                    });
                    ui.separator();

                    if ui.button("Open Log...").clicked() {
                        open_file = true;
                    }

                    ui.separator();
                    ui.label("Comparisons:");
                    for (kind, wanted) in &mut self.choice.comparisons {
                        ui.checkbox(wanted, kind.label());
                    }
                    ui.separator();
                    ui.label("Phases:");
                    for (phase, wanted) in &mut self.choice.phases {
                        ui.checkbox(wanted, phase.number().to_string());
                    }

                    if let Some(session) = &mut self.session {
                        if ui.button("Show").clicked() {
                            for (kind, wanted) in &self.choice.comparisons {
                                if *wanted {
                                    session.open_comparison(*kind, &self.config);
                                }
                            }
                            for (phase, wanted) in &self.choice.phases {
                                if *wanted {
                                    session.open_phase(*phase);
                                }
                            }
                        }
                    }

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        ui.small(format!("v{VERSION}"));
                    });
                });
            });

        if open_file {
            self.open_file_dialog();
        }
    }

    fn show_summary(&self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            let Some(session) = &self.session else {
                ui.centered_and_justified(|ui| {
                    ui.label(egui::RichText::new("Open or drop a measurement log to begin").weak());
                });
                return;
            };

            ui.heading(session.path.display().to_string());
            if let Some((start, end)) = session.table.time_bounds() {
                ui.label(format!("{} to {}", format_display(start), format_display(end)));
            }
            ui.label(points_label(session.table.len()));
            let phase4 = match session.report.phase4 {
                Phase4Source::Absent => "Phase 4: absent",
                Phase4Source::Measured => "Phase 4: measured",
                Phase4Source::DerivedVoltage => "Phase 4: voltage derived from phases 1-3",
            };
            ui.label(phase4);

            if !session.report.rejected.is_empty() {
                ui.separator();
                ui.label(
                    egui::RichText::new(format!("{} rows skipped", session.report.rejected.len()))
                        .color(egui::Color32::from_rgb(200, 120, 0)),
                );
                egui::ScrollArea::vertical().max_height(240.0).show(ui, |ui| {
                    for row in &session.report.rejected {
                        ui.monospace(format!("line {}: {}", row.line, row.reason));
                    }
                });
            }
        });
    }
}

impl eframe::App for PhaseScopeApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Collect dropped paths first to avoid borrowing ctx input across the load.
        let mut dropped_paths: Vec<PathBuf> = Vec::new();
        ctx.input(|i| {
            for file in &i.raw.dropped_files {
                if let Some(path) = &file.path {
                    let ext = path
                        .extension()
                        .and_then(|e| e.to_str())
                        .map(|e| e.to_lowercase())
                        .unwrap_or_default();
                    if LOG_EXTENSIONS.contains(&ext.as_str()) {
                        dropped_paths.push(path.clone());
                    }
                }
            }
        });
        if let Some(path) = dropped_paths.last() {
            self.load_file(path);
        }

        self.show_header(ctx);
        self.poll_pending_load();
        self.show_summary(ctx);

        if let Some(session) = &mut self.session {
            for panel in &mut session.comparisons {
                if panel.open {
                    comparison_panel::show_comparison_panel(ctx, panel, &session.table, &self.config);
                }
            }
            for panel in &mut session.phases {
                if panel.open {
                    phase_panel::show_phase_panel(ctx, panel, &session.table);
                }
            }
        }

        if self.pending_load.is_some() {
            egui::Window::new("Loading")
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
                .show(ctx, |ui| {
                    ui.horizontal(|ui| {
                        ui.spinner();
                        ui.label("Loading file...");
                    });
                });
            ctx.request_repaint();
        }

        if self.show_about {
            egui::Window::new("About PhaseScope")
                .open(&mut self.show_about)
                .collapsible(false)
                .resizable(false)
                .default_width(320.0)
                .show(ctx, |ui| {
                    ui.heading("PhaseScope");
                    ui.label(format!("Version: {VERSION}"));
                    ui.add_space(4.0);
                    ui.label("Viewer for multi-phase electrical measurement logs.");
                    ui.add_space(10.0);
                    ui.label("  \u{2022} Voltage, current and power comparisons");
                    ui.label("  \u{2022} Per-phase reports with energy totals");
                    ui.label("  \u{2022} Moving average trend lines");
                    ui.label("  \u{2022} Calendar day selection");
                });
        }

        let mut dismiss = false;
        if let Some(message) = &self.error_message {
            egui::Window::new("Error")
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
                .show(ctx, |ui| {
                    ui.label(egui::RichText::new(message).color(egui::Color32::from_rgb(220, 60, 60)));
                    if ui.button("OK").clicked() {
                        dismiss = true;
                    }
                });
        }
        if dismiss {
            self.error_message = None;
        }
    }
}
