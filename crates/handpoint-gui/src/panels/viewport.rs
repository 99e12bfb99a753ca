use handpoint_core::session::ViewMode;

use crate::app::HandpointApp;

pub fn show(ctx: &egui::Context, app: &mut HandpointApp) {
    egui::CentralPanel::default().show(ctx, |ui| {
        let rect = ui.available_rect_before_wrap();
        paint_background(ui, rect);

        let view = app.controller.view_mode();
        let texture = match view {
            ViewMode::Upload => None,
            // Keep the source on screen until the composited image has downloaded.
            ViewMode::Result => app.viewport.result.as_ref().or(app.viewport.source.as_ref()),
            ViewMode::Interact => app.viewport.source.as_ref(),
        };
        let texture_info = texture.map(|t| (t.id(), t.size_vec2()));

        let Some((texture_id, tex_size)) = texture_info else {
            show_placeholder(ui, view);
            return;
        };

        let response = ui.allocate_rect(rect, egui::Sense::click());
        let img_rect = fit_rect(rect, tex_size);
        draw_image(ui, texture_id, img_rect);

        let busy = app.controller.is_busy();
        if busy {
            ui.painter()
                .rect_filled(img_rect, 0.0, egui::Color32::from_black_alpha(96));
        }

        if view == ViewMode::Interact && !busy {
            if response.hovered() {
                ctx.set_cursor_icon(egui::CursorIcon::Crosshair);
            }
            if response.clicked() {
                if let Some(pos) = response.interact_pointer_pos() {
                    if img_rect.contains(pos) {
                        app.tap(pos, img_rect);
                    }
                }
            }
        }
    });
}

fn paint_background(ui: &egui::Ui, rect: egui::Rect) {
    ui.painter()
        .rect_filled(rect, 0.0, egui::Color32::from_gray(30));
}

/// Largest rect with the image's aspect ratio that fits `rect`, centered.
/// Images smaller than the panel are shown at native size.
fn fit_rect(rect: egui::Rect, image_size: egui::Vec2) -> egui::Rect {
    let scale = (rect.width() / image_size.x)
        .min(rect.height() / image_size.y)
        .min(1.0);
    egui::Rect::from_center_size(rect.center(), image_size * scale)
}

fn draw_image(ui: &egui::Ui, texture_id: egui::TextureId, img_rect: egui::Rect) {
    let uv = egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0));
    ui.painter()
        .image(texture_id, img_rect, uv, egui::Color32::WHITE);
}

fn show_placeholder(ui: &mut egui::Ui, view: ViewMode) {
    let text = match view {
        ViewMode::Upload => "Choose or take a photo to get started",
        _ => "Loading image...",
    };
    ui.centered_and_justified(|ui| {
        ui.label(
            egui::RichText::new(text)
                .size(18.0)
                .color(egui::Color32::from_gray(120)),
        );
    });
}
