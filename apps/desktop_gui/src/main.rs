mod backend_bridge;
mod controller;
mod ui;

use clap::Parser;
use crossbeam_channel::bounded;
use eframe::egui;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::UiEvent;
use crate::ui::app::BoardroomApp;

/// Desktop front end for the boardroom simulation service.
#[derive(Parser)]
#[command(name = "boardroom-desktop", version)]
struct Args {
    /// Simulation service endpoint. Only needed when pointing at a local or
    /// staging deployment.
    #[arg(long, default_value = client_core::DEFAULT_ENDPOINT)]
    endpoint: String,
}

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let args = Args::parse();
    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(16);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(64);
    backend_bridge::runtime::launch(args.endpoint, cmd_rx, ui_tx);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Business Boardroom")
            .with_inner_size([860.0, 720.0])
            .with_min_inner_size([640.0, 520.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Business Boardroom",
        options,
        Box::new(|_cc| Ok(Box::new(BoardroomApp::new(cmd_tx, ui_rx)))),
    )
}
