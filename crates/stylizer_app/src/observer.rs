use stylizer_core::{AppViewModel, Phase};
use stylizer_logging::{stylizer_debug, stylizer_info};

/// Presentation-side listener for lifecycle changes.
pub trait Observer: Send + Sync {
    fn transition(&self, from: &Phase, to: &Phase);

    /// Called after any message that changed what should be on screen.
    fn render(&self, _view: &AppViewModel) {}
}

/// Writes transitions and status messages to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingObserver;

impl Observer for LoggingObserver {
    fn transition(&self, from: &Phase, to: &Phase) {
        stylizer_info!("{} -> {}", from, to);
    }

    fn render(&self, view: &AppViewModel) {
        if !view.status_message.is_empty() {
            stylizer_debug!("status: {}", view.status_message);
        }
    }
}
