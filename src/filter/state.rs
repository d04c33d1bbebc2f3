/// Active topic/region selection for the session.
///
/// At most one label per axis. Never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    pub topic: Option<String>,
    pub region: Option<String>,
}

impl FilterState {
    pub fn clear(&mut self) {
        self.topic = None;
        self.region = None;
    }
}

/// Disclosure progress for the active filter.
///
/// `page` is the 1-based index of the next page to disclose. It only grows
/// while a filter stays active and goes back to 1 on every filter change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrollState {
    pub page: usize,
    pub in_flight: bool,
}

impl Default for ScrollState {
    fn default() -> Self {
        Self {
            page: 1,
            in_flight: false,
        }
    }
}

impl ScrollState {
    pub fn restart(&mut self) {
        self.page = 1;
    }
}
