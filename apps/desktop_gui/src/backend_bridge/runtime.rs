//! Worker thread owning the tokio runtime and the HTTP transport. Commands
//! arrive from the UI queue; outcomes go back as UI events.

use std::thread;

use client_core::{HttpSimulationTransport, SimulationTransport};
use crossbeam_channel::{Receiver, Sender};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::UiEvent;

pub fn launch(endpoint: String, cmd_rx: Receiver<BackendCommand>, ui_tx: Sender<UiEvent>) {
    thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                tracing::error!("failed to build backend runtime: {err}");
                let _ = ui_tx.try_send(UiEvent::BackendStartupFailed {
                    detail: err.to_string(),
                });
                return;
            }
        };

        runtime.block_on(async move {
            let transport = HttpSimulationTransport::new(endpoint);
            tracing::info!(endpoint = transport.endpoint(), "backend worker ready");

            while let Ok(cmd) = cmd_rx.recv() {
                match cmd {
                    BackendCommand::RunSimulation { request } => {
                        tracing::info!(
                            iterations = request.iterations.get(),
                            description_len = request.product_description.len(),
                            "backend: run_simulation"
                        );
                        match transport.execute(&request).await {
                            Ok(narrative) => {
                                let _ = ui_tx.try_send(UiEvent::SimulationCompleted { narrative });
                            }
                            Err(err) => {
                                tracing::error!("backend: run_simulation failed: {err}");
                                let _ = ui_tx.try_send(UiEvent::SimulationFailed {
                                    detail: err.to_string(),
                                });
                            }
                        }
                    }
                }
            }
        });
    });
}
