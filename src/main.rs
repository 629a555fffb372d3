use std::path::Path;

use eframe::egui_wgpu;

use phasescope::app::PhaseScopeApp;
use phasescope::state::config::{EngineConfig, CONFIG_FILE_NAME};

fn main() -> eframe::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let config = match EngineConfig::load(Path::new(CONFIG_FILE_NAME)) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("{e}, using defaults");
            EngineConfig::default()
        }
    };
    tracing::info!(?config, "starting PhaseScope");

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("PhaseScope")
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([800.0, 600.0])
            .with_drag_and_drop(true),
        wgpu_options: egui_wgpu::WgpuConfiguration {
            present_mode: eframe::wgpu::PresentMode::AutoVsync,
            wgpu_setup: egui_wgpu::WgpuSetup::CreateNew(egui_wgpu::WgpuSetupCreateNew {
                instance_descriptor: eframe::wgpu::InstanceDescriptor {
                    backends: eframe::wgpu::Backends::DX12
                        | eframe::wgpu::Backends::VULKAN
                        | eframe::wgpu::Backends::GL,
                    ..Default::default()
                },
                power_preference: eframe::wgpu::PowerPreference::HighPerformance,
                ..Default::default()
            }),
            ..Default::default()
        },
        ..Default::default()
    };

    eframe::run_native(
        "PhaseScope",
        options,
        Box::new(|cc| Ok(Box::new(PhaseScopeApp::new(cc, config)))),
    )
}
