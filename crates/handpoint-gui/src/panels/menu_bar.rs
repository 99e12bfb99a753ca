use handpoint_core::io::upload::ImageOrigin;
use handpoint_core::session::ViewMode;

use crate::app::HandpointApp;

pub fn show(ctx: &egui::Context, app: &mut HandpointApp) {
    egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
        egui::MenuBar::new().ui(ui, |ui| {
            ui.menu_button("File", |ui| {
                let open_shortcut = egui::KeyboardShortcut::new(egui::Modifiers::COMMAND, egui::Key::O);
                if ui.add(egui::Button::new("Open Photo...").shortcut_text(ctx.format_shortcut(&open_shortcut))).clicked() {
                    ui.close();
                    app.pick_image(ImageOrigin::Gallery);
                }

                if ui.button("Open Camera Capture...").clicked() {
                    ui.close();
                    app.pick_image(ImageOrigin::Camera);
                }

                let has_result = app.controller.view_mode() == ViewMode::Result;
                let save_shortcut = egui::KeyboardShortcut::new(egui::Modifiers::COMMAND, egui::Key::S);
                if ui.add_enabled(has_result, egui::Button::new("Save Result").shortcut_text(ctx.format_shortcut(&save_shortcut))).clicked() {
                    ui.close();
                    app.save_result();
                }

                if ui.add_enabled(has_result, egui::Button::new("Save Result To...")).clicked() {
                    ui.close();
                    app.save_result_as();
                }

                ui.separator();

                if ui.button("Import Config...").clicked() {
                    ui.close();
                    app.import_config();
                }

                if ui.button("Export Config...").clicked() {
                    ui.close();
                    app.export_config();
                }

                ui.separator();

                let quit_shortcut = egui::KeyboardShortcut::new(egui::Modifiers::COMMAND, egui::Key::Q);
                if ui.add(egui::Button::new("Quit").shortcut_text(ctx.format_shortcut(&quit_shortcut))).clicked() {
                    ui.close();
                    ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                }
            });

            ui.menu_button("Edit", |ui| {
                if ui.button("Start Over").clicked() {
                    ui.close();
                    app.reset();
                }
                ui.checkbox(&mut app.ui_state.open_after_save, "Open after saving");
            });

            ui.menu_button("Help", |ui| {
                if ui.button("About").clicked() {
                    ui.close();
                    app.show_about = true;
                }
            });
        });

        // Keyboard shortcuts (consumed outside menus)
        if ctx.input_mut(|i| i.consume_shortcut(&egui::KeyboardShortcut::new(egui::Modifiers::COMMAND, egui::Key::O))) {
            app.pick_image(ImageOrigin::Gallery);
        }
        if ctx.input_mut(|i| i.consume_shortcut(&egui::KeyboardShortcut::new(egui::Modifiers::COMMAND, egui::Key::S)))
            && app.controller.view_mode() == ViewMode::Result
        {
            app.save_result();
        }
        if ctx.input_mut(|i| i.consume_shortcut(&egui::KeyboardShortcut::new(egui::Modifiers::COMMAND, egui::Key::Q))) {
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
        }
    });
}
