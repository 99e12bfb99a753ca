mod app;
mod convert;
mod messages;
mod panels;
mod share;
mod states;
mod worker;

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([960.0, 800.0])
            .with_min_inner_size([480.0, 480.0])
            .with_title("Handpoint"),
        ..Default::default()
    };

    eframe::run_native(
        "Handpoint",
        options,
        Box::new(|cc| Ok(Box::new(app::HandpointApp::new(&cc.egui_ctx)))),
    )
}
