/// Viewport display state.
#[derive(Default)]
pub struct ViewportState {
    /// The uploaded image as stored (after any downscale).
    pub source: Option<egui::TextureHandle>,
    /// The most recent composited result.
    pub result: Option<egui::TextureHandle>,
}

impl ViewportState {
    pub fn clear(&mut self) {
        self.source = None;
        self.result = None;
    }
}
