mod ui;
mod viewport;

pub use ui::{Activity, UIState};
pub use viewport::ViewportState;
