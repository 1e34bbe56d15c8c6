use crate::controller::{MonitorController, MonitorState};
use crate::region::RegionInputs;
use crate::types::ConnectionStatus;
use eframe::egui;

const WINDOW_TITLE: &str = "ADSB Monitor";
const REFRESH_INTERVAL: std::time::Duration = std::time::Duration::from_millis(500);

/// Operator form: endpoint and bounds in, status and transcript out.
pub struct MonitorForm {
    controller: MonitorController,
    endpoint: String,
    bounds: RegionInputs,
    error: Option<String>,
}

impl MonitorForm {
    #[must_use]
    pub fn new(controller: MonitorController, endpoint: String, bounds: RegionInputs) -> Self {
        Self {
            controller,
            endpoint,
            bounds,
            error: None,
        }
    }

    /// Starts a session from the current field contents, keeping any error for display.
    pub fn submit(&mut self) {
        match self.controller.start(&self.endpoint, &self.bounds) {
            Ok(()) => self.error = None,
            Err(err) => {
                log::error!("MonitorForm: {err}");
                self.error = Some(err.to_string());
            }
        }
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    #[must_use]
    pub fn controller(&self) -> &MonitorController {
        &self.controller
    }
}

impl eframe::App for MonitorForm {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::CentralPanel::default().show(ctx, |ui| {
            let running = self.controller.state() == MonitorState::Running;

            ui.horizontal(|ui| {
                ui.label("API Base URL:");
                ui.add_enabled(
                    !running,
                    egui::TextEdit::singleline(&mut self.endpoint).desired_width(400.0),
                );
            });

            let status = self.controller.status().get();
            ui.colored_label(status_color(status), format!("Status: {status}"));

            egui::Grid::new("region_bounds")
                .num_columns(4)
                .spacing([8.0, 4.0])
                .show(ui, |ui| {
                    bound_field(ui, running, "Min Latitude:", &mut self.bounds.min_lat);
                    bound_field(ui, running, "Max Latitude:", &mut self.bounds.max_lat);
                    ui.end_row();
                    bound_field(ui, running, "Min Longitude:", &mut self.bounds.min_lon);
                    bound_field(ui, running, "Max Longitude:", &mut self.bounds.max_lon);
                    ui.end_row();
                });

            ui.horizontal(|ui| {
                if ui
                    .add_enabled(!running, egui::Button::new("Start Monitoring"))
                    .clicked()
                {
                    self.submit();
                }
                if ui
                    .add_enabled(running, egui::Button::new("Stop Monitoring"))
                    .clicked()
                {
                    self.controller.stop();
                }
            });

            if let Some(error) = &self.error {
                ui.colored_label(egui::Color32::RED, error);
            }

            ui.separator();
            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .stick_to_bottom(true)
                .show(ui, |ui| {
                    for line in self.controller.transcript().read().iter() {
                        ui.monospace(line);
                    }
                });
        });

        // the worker updates shared state without waking the UI
        ctx.request_repaint_after(REFRESH_INTERVAL);
    }
}

fn bound_field(ui: &mut egui::Ui, locked: bool, label: &str, text: &mut String) {
    ui.label(label);
    ui.add_enabled(!locked, egui::TextEdit::singleline(text).desired_width(80.0));
}

#[must_use]
pub fn status_color(status: ConnectionStatus) -> egui::Color32 {
    match status {
        ConnectionStatus::Unknown => egui::Color32::BLACK,
        ConnectionStatus::Connected => egui::Color32::DARK_GREEN,
        ConnectionStatus::Disconnected => egui::Color32::RED,
    }
}

/// Opens the form window and blocks until it is closed.
///
/// # Errors
///
/// Returns the eframe error if the native window cannot be created.
pub fn run(
    controller: MonitorController,
    endpoint: String,
    bounds: RegionInputs,
) -> Result<(), eframe::Error> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(WINDOW_TITLE)
            .with_inner_size([720.0, 520.0]),
        ..Default::default()
    };
    eframe::run_native(
        WINDOW_TITLE,
        options,
        Box::new(move |_cc| Ok(Box::new(MonitorForm::new(controller, endpoint, bounds)))),
    )
}
