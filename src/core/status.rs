use std::time::Duration;

/// How long a status message stays on screen.
pub const STATUS_DISMISS_AFTER: Duration = Duration::from_millis(3000);

/// Transient notification shown across the top of a list view.
///
/// Each `show` bumps the generation; a dismissal only hides the banner if
/// it was scheduled for the current generation, so an old timer cannot cut
/// a newer message short.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusBanner {
    message: Option<String>,
    generation: u64,
}

impl StatusBanner {
    /// Shows `message` and returns the generation to dismiss later.
    pub fn show(&mut self, message: impl Into<String>) -> u64 {
        self.generation += 1;
        self.message = Some(message.into());
        self.generation
    }

    pub fn dismiss(&mut self, generation: u64) {
        if generation == self.generation {
            self.message = None;
        }
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matching_dismissal_hides() {
        let mut banner = StatusBanner::default();
        let generation = banner.show("Goal Deleted");
        assert_eq!(banner.message(), Some("Goal Deleted"));
        banner.dismiss(generation);
        assert_eq!(banner.message(), None);
    }

    #[test]
    fn stale_dismissal_is_ignored() {
        let mut banner = StatusBanner::default();
        let first = banner.show("Goal Deleted");
        banner.show("Goal Deleted");
        banner.dismiss(first);
        assert_eq!(banner.message(), Some("Goal Deleted"));
    }
}
