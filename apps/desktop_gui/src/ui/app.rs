use std::time::{Duration, Instant};

use client_core::{LifecycleState, RequestLifecycleController};
use crossbeam_channel::{Receiver, Sender, TryRecvError};
use eframe::egui;
use shared::domain::IterationCount;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::UiEvent;
use crate::controller::orchestration::dispatch_backend_command;
use crate::ui::markup::{parse_markup, MarkupSpan};

/// Cadence of the trailing-dot animation while a simulation is in flight.
const TICK_INTERVAL: Duration = Duration::from_millis(500);

#[derive(Clone, Copy)]
enum StatusBannerSeverity {
    Error,
}

#[derive(Clone)]
struct StatusBanner {
    severity: StatusBannerSeverity,
    message: String,
}

pub struct BoardroomApp {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    lifecycle: RequestLifecycleController,
    status: String,
    status_banner: Option<StatusBanner>,
    last_tick_at: Instant,
}

impl BoardroomApp {
    pub fn new(cmd_tx: Sender<BackendCommand>, ui_rx: Receiver<UiEvent>) -> Self {
        Self {
            cmd_tx,
            ui_rx,
            lifecycle: RequestLifecycleController::new(),
            status: "Ready".to_string(),
            status_banner: None,
            last_tick_at: Instant::now(),
        }
    }

    fn process_ui_events(&mut self) {
        loop {
            let event = match self.ui_rx.try_recv() {
                Ok(event) => event,
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    // Worker is gone; no completion will ever arrive, so the
                    // lifecycle must not stay pending.
                    if self.lifecycle.is_pending() {
                        self.lifecycle.resolve_failure();
                    }
                    self.status = "Backend worker disconnected; restart the app".to_string();
                    break;
                }
            };
            match event {
                UiEvent::SimulationCompleted { narrative } => {
                    self.lifecycle.resolve_success(narrative);
                    self.status = "Simulation complete".to_string();
                }
                UiEvent::SimulationFailed { detail } => {
                    tracing::debug!("simulation failed: {detail}");
                    self.lifecycle.resolve_failure();
                    self.status = "Simulation failed".to_string();
                }
                UiEvent::BackendStartupFailed { detail } => {
                    tracing::error!("backend worker startup failure: {detail}");
                    self.lifecycle.resolve_failure();
                    self.status = "Backend worker unavailable".to_string();
                    self.status_banner = Some(StatusBanner {
                        severity: StatusBannerSeverity::Error,
                        message: "The backend worker failed to start. Restart the app.".to_string(),
                    });
                }
            }
        }
    }

    fn try_submit(&mut self) {
        if let Some(request) = self.lifecycle.submit() {
            self.status = "Simulation running".to_string();
            self.last_tick_at = Instant::now();
            let queued = dispatch_backend_command(
                &self.cmd_tx,
                BackendCommand::RunSimulation { request },
                &mut self.status,
            );
            if !queued {
                // Nothing is in flight; the cycle must not stay pending.
                self.lifecycle.resolve_failure();
            }
        }
    }

    fn drive_pending_animation(&mut self, ctx: &egui::Context) {
        if self.lifecycle.is_pending() {
            if self.last_tick_at.elapsed() >= TICK_INTERVAL {
                self.lifecycle.advance_tick();
                self.last_tick_at = Instant::now();
            }
            ctx.request_repaint_after(Duration::from_millis(100));
        } else {
            // Backend events arrive on a channel; keep polling at a low rate.
            ctx.request_repaint_after(Duration::from_millis(250));
        }
    }

    fn show_status_banner(&mut self, ui: &mut egui::Ui) {
        if let Some(banner) = self.status_banner.clone() {
            let (fill, stroke) = match banner.severity {
                StatusBannerSeverity::Error => (
                    egui::Color32::from_rgb(111, 53, 53),
                    egui::Stroke::new(1.0, egui::Color32::from_rgb(175, 96, 96)),
                ),
            };

            egui::Frame::NONE
                .fill(fill)
                .stroke(stroke)
                .corner_radius(8.0)
                .inner_margin(egui::Margin::symmetric(10, 8))
                .show(ui, |ui| {
                    ui.horizontal_wrapped(|ui| {
                        ui.label(egui::RichText::new(&banner.message).color(egui::Color32::WHITE));
                        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                            if ui.button("Dismiss").clicked() {
                                self.status_banner = None;
                            }
                        });
                    });
                });
            ui.add_space(8.0);
        }
    }

    fn show_header(&self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.label(egui::RichText::new("👔").size(24.0));
            ui.vertical(|ui| {
                ui.heading("Business Boardroom");
                ui.weak("Pitch a product and let the boardroom talk it over.");
            });
        });
        ui.add_space(4.0);
        ui.horizontal(|ui| {
            ui.label("👔 CEO");
            ui.add_space(16.0);
            ui.label("🧃 Marketing Intern");
            ui.add_space(16.0);
            ui.label("📊 Marketing Strategist");
        });
    }

    fn show_input_form(&mut self, ui: &mut egui::Ui) {
        ui.label(egui::RichText::new("Product").strong());
        let mut description = self.lifecycle.description().to_string();
        ui.add(
            egui::TextEdit::multiline(&mut description)
                .id_salt("product_description")
                .hint_text("Enter product description...")
                .desired_rows(5)
                .desired_width(f32::INFINITY),
        );
        self.lifecycle.set_description(description);

        ui.add_space(6.0);
        ui.horizontal(|ui| {
            ui.label("Agent turns");
            let mut iterations = self.lifecycle.iterations();
            egui::ComboBox::from_id_salt("iteration_count")
                .selected_text(iterations.to_string())
                .show_ui(ui, |ui| {
                    for choice in IterationCount::choices() {
                        ui.selectable_value(&mut iterations, choice, choice.to_string());
                    }
                });
            self.lifecycle.set_iterations(iterations);

            let is_pending = self.lifecycle.is_pending();
            let button = egui::Button::new(egui::RichText::new("Try").strong())
                .min_size(egui::vec2(72.0, 28.0));
            if ui.add_enabled(!is_pending, button).clicked() {
                self.try_submit();
            }
            if is_pending {
                ui.spinner();
            }
        });
    }

    fn show_result_panel(&self, ui: &mut egui::Ui) {
        ui.label(egui::RichText::new("Result").strong());
        egui::Frame::NONE
            .stroke(egui::Stroke::new(
                1.0,
                ui.visuals().widgets.noninteractive.bg_stroke.color,
            ))
            .corner_radius(8.0)
            .inner_margin(egui::Margin::symmetric(12, 10))
            .show(ui, |ui| {
                ui.set_min_height(120.0);
                ui.set_width(ui.available_width());
                match self.lifecycle.state() {
                    LifecycleState::Idle => {
                        ui.weak("No simulation yet.");
                    }
                    LifecycleState::Pending => {
                        ui.label(egui::RichText::new(self.lifecycle.pending_indicator()).weak());
                    }
                    LifecycleState::Succeeded(narrative) => {
                        show_narrative(ui, &narrative.markup);
                    }
                    LifecycleState::Failed(message) => {
                        ui.colored_label(egui::Color32::from_rgb(220, 120, 120), message.as_str());
                    }
                }
            });
    }
}

fn show_narrative(ui: &mut egui::Ui, markup: &str) {
    for line in parse_markup(markup) {
        if line.is_empty() {
            ui.add_space(6.0);
            continue;
        }
        ui.horizontal_wrapped(|ui| {
            ui.spacing_mut().item_spacing.x = 0.0;
            for MarkupSpan { text, bold, italic } in line {
                let mut rich = egui::RichText::new(text);
                if bold {
                    rich = rich.strong();
                }
                if italic {
                    rich = rich.italics();
                }
                ui.label(rich);
            }
        });
    }
}

impl eframe::App for BoardroomApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();
        self.drive_pending_animation(ctx);

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                self.show_header(ui);
                ui.add_space(10.0);
                self.show_status_banner(ui);
                self.show_input_form(ui);
                ui.add_space(12.0);
                self.show_result_panel(ui);
                ui.add_space(10.0);
                ui.separator();
                ui.horizontal_wrapped(|ui| {
                    ui.small("Status:");
                    ui.small(egui::RichText::new(&self.status).weak());
                });
            });
        });
    }
}
