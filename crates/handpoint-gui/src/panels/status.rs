use crate::app::HandpointApp;

pub fn show(ctx: &egui::Context, app: &mut HandpointApp) {
    egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
        ui.add_space(2.0);

        let busy_label = if app.controller.is_busy() {
            Some(format!(
                "Compositing overlay {}...",
                app.controller.session().overlay_index
            ))
        } else {
            app.ui_state.activity.map(|a| format!("{a}..."))
        };

        if let Some(label) = busy_label {
            ui.add(egui::ProgressBar::new(0.0).text(label).animate(true));
        } else {
            // Placeholder keeps the panel height stable
            ui.add(egui::ProgressBar::new(0.0).text(""));
        }

        // Log area, fixed at 4 lines and scrollable.
        let line_height = ui.text_style_height(&egui::TextStyle::Body);
        let spacing = ui.spacing().item_spacing.y;
        let log_height = line_height * 4.0 + spacing * 3.0;

        egui::ScrollArea::vertical()
            .max_height(log_height)
            .min_scrolled_height(log_height)
            .stick_to_bottom(true)
            .show(ui, |ui| {
                if app.ui_state.log_messages.is_empty() {
                    // Keep four blank lines so the panel does not jump.
                    for _ in 0..4 {
                        ui.label("");
                    }
                } else {
                    for msg in &app.ui_state.log_messages {
                        ui.label(msg);
                    }
                }
            });

        // Status line
        ui.horizontal(|ui| {
            let session = app.controller.session();
            ui.label(app.controller.view_mode().to_string());
            if let Some(ref image) = session.source_image {
                ui.separator();
                ui.label(format!("{}x{}", image.width, image.height));
            }
            if let Some(point) = session.last_click {
                ui.separator();
                ui.label(format!("Point {point}"));
            }
            ui.separator();
            ui.label(format!("Overlay: {}", session.overlay_index));
        });

        ui.add_space(2.0);
    });
}
