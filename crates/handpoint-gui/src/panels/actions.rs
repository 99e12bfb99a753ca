use handpoint_core::io::upload::ImageOrigin;
use handpoint_core::session::ViewMode;

use crate::app::HandpointApp;

pub fn show(ctx: &egui::Context, app: &mut HandpointApp) {
    egui::TopBottomPanel::top("actions").show(ctx, |ui| {
        ui.add_space(4.0);
        ui.horizontal(|ui| match app.controller.view_mode() {
            ViewMode::Upload => upload_actions(ui, app),
            ViewMode::Interact => interact_actions(ui, app),
            ViewMode::Result => result_actions(ui, app),
        });
        ui.add_space(4.0);
    });
}

fn upload_actions(ui: &mut egui::Ui, app: &mut HandpointApp) {
    if ui.button("Choose photo...").clicked() {
        app.pick_image(ImageOrigin::Gallery);
    }
    if ui.button("Take photo...").clicked() {
        app.pick_image(ImageOrigin::Camera);
    }
    file_label(ui, app);
}

fn interact_actions(ui: &mut egui::Ui, app: &mut HandpointApp) {
    let busy = app.controller.is_busy();
    if ui.add_enabled(!busy, egui::Button::new("Choose another...")).clicked() {
        app.pick_image(ImageOrigin::Gallery);
    }
    file_label(ui, app);
    ui.separator();
    if busy {
        ui.spinner();
        ui.label("Adding the hand...");
    } else {
        ui.label("Tap where the hand should point");
    }
}

fn result_actions(ui: &mut egui::Ui, app: &mut HandpointApp) {
    let busy = app.controller.is_busy() || app.ui_state.is_loading();

    if ui
        .add_enabled(!busy, egui::Button::new("Try different"))
        .on_hover_text("Same point, next hand overlay")
        .clicked()
    {
        app.try_different();
    }

    ui.separator();

    if ui.add_enabled(!busy, egui::Button::new("Save")).clicked() {
        app.save_result();
    }
    if ui
        .add_enabled(!busy, egui::Button::new("Save to..."))
        .clicked()
    {
        app.save_result_as();
    }
    ui.checkbox(&mut app.ui_state.open_after_save, "Open after saving");

    ui.separator();

    if ui.button("New image").clicked() {
        app.reset();
    }

    if busy {
        ui.spinner();
    }
}

fn file_label(ui: &mut egui::Ui, app: &HandpointApp) {
    let text = app
        .ui_state
        .file_name
        .as_deref()
        .unwrap_or("No file chosen");
    ui.label(egui::RichText::new(text).weak());
}
