use crate::camera_app::core::{CameraState, Model, Msg};
use crate::config::Config;
use std::time::Duration;

const START_COLOR: egui::Color32 = egui::Color32::from_rgb(0x28, 0xa7, 0x45);
const STOP_COLOR: egui::Color32 = egui::Color32::from_rgb(0xdc, 0x35, 0x45);

pub fn start_stop_button(model: &Model) -> (&'static str, egui::Color32) {
    if model.processing {
        ("Stop", STOP_COLOR)
    } else {
        ("Start", START_COLOR)
    }
}

pub fn interval_label(interval: Duration) -> String {
    format!("{} ms", interval.as_millis())
}

/// Text shown in place of the video until a frame arrives.
pub fn preview_placeholder(model: &Model) -> Option<String> {
    if model.frame.is_some() {
        return None;
    }
    match &model.camera {
        CameraState::Initializing => Some("Initialising camera...".to_string()),
        CameraState::Available => Some(
            model
                .camera_error
                .clone()
                .unwrap_or_else(|| "Waiting for first frame...".to_string()),
        ),
        CameraState::Unavailable => Some(match &model.camera_error {
            Some(error) => format!("Camera unavailable: {}", error),
            None => "Camera unavailable".to_string(),
        }),
    }
}

/// Draws the whole window and returns the messages produced by user input.
pub fn render(
    ctx: &egui::Context,
    config: &Config,
    model: &Model,
    preview: Option<&egui::TextureHandle>,
) -> Vec<Msg> {
    let mut msgs = Vec::new();

    if let Some(alert) = &model.alert {
        egui::Window::new(alert.title.as_str())
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label(egui::RichText::new(&alert.text).color(STOP_COLOR));
                if ui.button("OK").clicked() {
                    msgs.push(Msg::AlertDismissed);
                }
            });
    }

    egui::TopBottomPanel::bottom("controls")
        .resizable(false)
        .show(ctx, |ui| {
            ui.add_space(8.0);
            render_io(ui, model, &mut msgs);
            ui.add_space(8.0);
            render_controls(ui, config, model, &mut msgs);
            ui.add_space(8.0);
        });

    egui::CentralPanel::default()
        .frame(egui::Frame::default().fill(egui::Color32::BLACK))
        .show(ctx, |ui| {
            ui.centered_and_justified(|ui| match (preview_placeholder(model), preview) {
                (None, Some(texture)) => {
                    ui.add(
                        egui::Image::new(egui::load::SizedTexture::from_handle(texture))
                            .maintain_aspect_ratio(true)
                            .max_size(ui.available_size()),
                    );
                }
                (placeholder, _) => {
                    ui.label(
                        egui::RichText::new(placeholder.unwrap_or_default())
                            .color(egui::Color32::WHITE)
                            .size(18.0),
                    );
                }
            });
        });

    msgs
}

fn render_io(ui: &mut egui::Ui, model: &Model, msgs: &mut Vec<Msg>) {
    ui.label("Base API:");
    let mut base_url = model.base_url.clone();
    if ui
        .add(egui::TextEdit::singleline(&mut base_url).desired_width(f32::INFINITY))
        .changed()
    {
        msgs.push(Msg::BaseUrlChanged(base_url));
    }

    ui.label("Instruction:");
    let mut instruction = model.instruction.clone();
    if ui
        .add_enabled(
            !model.processing,
            egui::TextEdit::singleline(&mut instruction).desired_width(f32::INFINITY),
        )
        .changed()
    {
        msgs.push(Msg::InstructionChanged(instruction));
    }

    ui.label("Response:");
    egui::ScrollArea::vertical()
        .max_height(72.0)
        .show(ui, |ui| {
            let mut response = model.response.as_str();
            ui.add(
                egui::TextEdit::multiline(&mut response)
                    .desired_rows(3)
                    .desired_width(f32::INFINITY),
            );
        });
}

fn render_controls(ui: &mut egui::Ui, config: &Config, model: &Model, msgs: &mut Vec<Msg>) {
    ui.horizontal(|ui| {
        ui.label("Interval between 2 requests:");

        ui.add_enabled_ui(!model.processing, |ui| {
            let mut selected = model.request_interval;
            egui::ComboBox::from_id_source("request_interval")
                .selected_text(interval_label(selected))
                .show_ui(ui, |ui| {
                    for choice in &config.request_interval_choices {
                        ui.selectable_value(&mut selected, *choice, interval_label(*choice));
                    }
                });
            if selected != model.request_interval {
                msgs.push(Msg::IntervalChanged(selected));
            }
        });

        ui.add_space(10.0);

        let (label, color) = start_stop_button(model);
        let button = egui::Button::new(egui::RichText::new(label).color(egui::Color32::WHITE))
            .fill(color)
            .min_size(egui::vec2(80.0, 0.0));
        if ui.add(button).clicked() {
            msgs.push(if model.processing {
                Msg::StopClicked
            } else {
                Msg::StartClicked
            });
        }

        if model.request_in_flight {
            ui.spinner();
        }
    });
}
