use std::fmt;

/// Background work the UI is waiting on (other than compositing, which the
/// controller tracks itself).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Activity {
    Downloading,
    Saving,
}

impl fmt::Display for Activity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Downloading => write!(f, "Downloading result"),
            Self::Saving => write!(f, "Saving"),
        }
    }
}

/// Overall UI state.
#[derive(Default)]
pub struct UIState {
    /// File input value shown next to the pickers.
    pub file_name: Option<String>,

    pub activity: Option<Activity>,

    /// Blocking message shown in a modal until dismissed.
    pub alert: Option<String>,

    /// Open the saved file with the system viewer after saving.
    pub open_after_save: bool,

    /// Log messages.
    pub log_messages: Vec<String>,
}

impl UIState {
    pub fn is_loading(&self) -> bool {
        self.activity.is_some()
    }

    pub fn add_log(&mut self, msg: String) {
        self.log_messages.push(msg);
    }

    pub fn show_alert(&mut self, msg: String) {
        self.add_log(format!("ERROR: {msg}"));
        self.alert = Some(msg);
    }
}
