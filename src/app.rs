use crate::feed::{cards_from_payload, ArticleCard, FeedLoader, FeedPayload, FetchError};
use crate::filter::{FilterScrollController, ViewAdapter, ViewUpdate};
use crate::util::{validate_url_for_open, LinkError};
use chrono::{DateTime, Utc};
use reqwest::redirect::Policy;
use std::borrow::Cow;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use url::Url;

/// Layout units per terminal row when reporting scroll positions.
pub const ROW_UNITS: u32 = 20;

/// Rows taken by one card: badges, title, two summary lines, footer, gap.
pub const CARD_ROWS: usize = 6;

/// How long a status message stays up.
const STATUS_TTL: Duration = Duration::from_secs(3);

/// Replacement text when the payload has no articles.
pub const EMPTY_FEED_MESSAGE: &str = "⚠️ Нема достапни вести во моментов. Проверете подоцна.";

/// Build the HTTP client used for payload requests.
///
/// Follows at most 3 redirects and rejects redirect loops.
pub fn build_http_client(timeout: Duration) -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder()
        .redirect(create_redirect_policy())
        .pool_max_idle_per_host(2)
        .pool_idle_timeout(Duration::from_secs(30))
        .timeout(timeout)
        .build()
}

fn create_redirect_policy() -> Policy {
    Policy::custom(|attempt| {
        if attempt.previous().len() >= 3 {
            return attempt.error("Too many redirects (max 3)");
        }

        let url = attempt.url();
        if attempt.previous().iter().any(|prev| prev.as_str() == url.as_str()) {
            return attempt.error("Redirect loop detected");
        }

        tracing::debug!(
            from = %attempt.previous().last().map(|u| u.as_str()).unwrap_or("initial"),
            to = %url,
            hop = attempt.previous().len() + 1,
            "Following redirect"
        );

        attempt.follow()
    })
}

// ============================================================================
// Feed and List State
// ============================================================================

/// What the article area currently shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedState {
    /// First load has not finished yet.
    Loading,
    Ready {
        last_updated: Option<String>,
        article_count: usize,
    },
    /// Payload loaded but carried no articles.
    Empty,
    /// First load failed; the message is the technical detail.
    Failed { message: String },
}

/// Events sent by background tasks to the UI loop.
#[derive(Debug)]
pub enum AppEvent {
    FeedLoaded(Result<FeedPayload, FetchError>),
    /// A background task panicked instead of reporting a result.
    TaskPanicked { task: &'static str, error: String },
}

/// Display-side mirror of the controller's decisions.
///
/// Only ever changed through [`ViewAdapter::apply`].
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ListView {
    /// Shown flag per card, indexed like `App::cards`.
    pub visible: Vec<bool>,
    pub topic: Option<usize>,
    pub region: Option<usize>,
    /// Value of the loaded-articles counter.
    pub counter: usize,
    notices: Vec<&'static str>,
}

impl ListView {
    fn resize(&mut self, len: usize) {
        self.visible.clear();
        self.visible.resize(len, false);
    }

    /// Indices of shown cards, in card order.
    pub fn shown(&self) -> impl Iterator<Item = usize> + '_ {
        self.visible
            .iter()
            .enumerate()
            .filter(|(_, shown)| **shown)
            .map(|(idx, _)| idx)
    }
}

impl ViewAdapter for ListView {
    fn apply(&mut self, update: &ViewUpdate) {
        match update {
            ViewUpdate::Visibility { index, shown } => {
                if let Some(slot) = self.visible.get_mut(*index) {
                    *slot = *shown;
                }
            }
            ViewUpdate::TopicIndicator(active) => self.topic = *active,
            ViewUpdate::RegionIndicator(active) => self.region = *active,
            ViewUpdate::Counter(count) => self.counter = *count,
            ViewUpdate::Notice(text) => self.notices.push(*text),
        }
    }
}

// ============================================================================
// Application State
// ============================================================================

/// Central application state
pub struct App {
    pub controller: FilterScrollController,
    pub loader: Arc<FeedLoader>,

    // Data
    pub cards: Vec<ArticleCard>,
    pub feed_state: FeedState,
    pub view: ListView,
    /// Set after the first successful load; later loads reindex.
    pub loaded_once: bool,
    /// Handle to the running payload request, aborted on drop.
    pub load_handle: Option<tokio::task::JoinHandle<()>>,

    // UI State
    /// Position within the shown cards.
    pub selected: usize,
    /// First visible row of the card list.
    pub scroll_offset: usize,
    /// Card list height in rows, updated on render.
    pub viewport_rows: usize,
    pub show_help: bool,

    pub status_message: Option<(Cow<'static, str>, Instant)>,

    /// Dirty flag to skip unnecessary frame renders
    pub needs_redraw: bool,
}

impl App {
    pub fn new(controller: FilterScrollController, loader: Arc<FeedLoader>) -> Self {
        Self {
            controller,
            loader,
            cards: Vec::new(),
            feed_state: FeedState::Loading,
            view: ListView::default(),
            loaded_once: false,
            load_handle: None,
            selected: 0,
            scroll_offset: 0,
            viewport_rows: 0,
            show_help: false,
            status_message: None,
            needs_redraw: true,
        }
    }

    // ------------------------------------------------------------------------
    // Controller plumbing
    // ------------------------------------------------------------------------

    /// Drain controller decisions into the view. Returns true if anything
    /// changed.
    pub fn sync_view(&mut self) -> bool {
        let applied = self.controller.apply_updates(&mut self.view);
        for notice in std::mem::take(&mut self.view.notices) {
            self.set_status(notice);
        }
        if applied > 0 {
            self.clamp_selection();
            self.needs_redraw = true;
        }
        applied > 0
    }

    /// Run deferred controller steps due at `now`.
    pub fn run_due(&mut self, now: Instant) -> bool {
        if self.controller.run_due(now) > 0 {
            self.sync_view();
            // A disclosed page may still leave the viewport near the bottom.
            self.notify_scroll();
            true
        } else {
            false
        }
    }

    /// A payload request is running.
    pub fn is_loading(&self) -> bool {
        self.load_handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.controller.next_deadline()
    }

    /// Apply a finished payload load.
    pub fn handle_feed_loaded(&mut self, result: Result<FeedPayload, FetchError>, now: DateTime<Utc>) {
        self.load_handle = None;
        self.needs_redraw = true;

        let payload = match result {
            Ok(payload) => payload,
            Err(e) => {
                tracing::warn!(error = %e, source = %self.loader.source(), "News load failed");
                if self.loaded_once {
                    self.set_status(format!("Освежувањето не успеа: {}", e));
                } else {
                    self.feed_state = FeedState::Failed {
                        message: e.to_string(),
                    };
                }
                return;
            }
        };

        self.cards = cards_from_payload(&payload, now);
        self.view.resize(self.cards.len());
        let items = self.cards.iter().map(ArticleCard::to_item).collect();

        if self.loaded_once {
            self.controller.reindex(items);
            self.set_status(format!("Вчитани {} вести", self.cards.len()));
        } else {
            self.controller.initialize(items);
            self.loaded_once = true;
        }

        self.feed_state = if self.cards.is_empty() {
            FeedState::Empty
        } else {
            FeedState::Ready {
                last_updated: payload.last_updated.clone(),
                article_count: payload.display_count(),
            }
        };

        self.selected = 0;
        self.scroll_offset = 0;
        self.sync_view();
    }

    // ------------------------------------------------------------------------
    // Filter selection
    // ------------------------------------------------------------------------

    pub fn select_topic_at(&mut self, index: usize) {
        if self.controller.select_topic_at(index) {
            self.after_filter_change();
        }
    }

    /// Step to the next or previous topic, wrapping around.
    pub fn cycle_topic(&mut self, forward: bool) {
        let len = self.controller.topics().len();
        if let Some(next) = cycle_index(self.view.topic, len, forward) {
            self.select_topic_at(next);
        }
    }

    pub fn select_region_at(&mut self, index: usize) {
        if self.controller.select_region_at(index) {
            self.after_filter_change();
        }
    }

    pub fn cycle_region(&mut self, forward: bool) {
        let len = self.controller.regions().len();
        if let Some(next) = cycle_index(self.view.region, len, forward) {
            self.select_region_at(next);
        }
    }

    pub fn reset_filters(&mut self) {
        self.controller.reset_all();
        self.after_filter_change();
    }

    fn after_filter_change(&mut self) {
        self.selected = 0;
        self.scroll_offset = 0;
        self.sync_view();
    }

    // ------------------------------------------------------------------------
    // Navigation
    // ------------------------------------------------------------------------

    /// Number of cards currently shown.
    pub fn shown_len(&self) -> usize {
        self.view.shown().count()
    }

    /// Shown cards in display order.
    pub fn shown_cards(&self) -> Vec<&ArticleCard> {
        self.view
            .shown()
            .filter_map(|idx| self.cards.get(idx))
            .collect()
    }

    pub fn selected_card(&self) -> Option<&ArticleCard> {
        self.view
            .shown()
            .nth(self.selected)
            .and_then(|idx| self.cards.get(idx))
    }

    pub fn nav_up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
        self.after_move();
    }

    pub fn nav_down(&mut self) {
        let max_index = self.shown_len().saturating_sub(1);
        self.selected = self.selected.saturating_add(1).min(max_index);
        self.after_move();
    }

    /// Move by a screenful of cards.
    pub fn page_down(&mut self) {
        let step = self.cards_per_screen();
        let max_index = self.shown_len().saturating_sub(1);
        self.selected = self.selected.saturating_add(step).min(max_index);
        self.after_move();
    }

    pub fn page_up(&mut self) {
        self.selected = self.selected.saturating_sub(self.cards_per_screen());
        self.after_move();
    }

    pub fn nav_first(&mut self) {
        self.selected = 0;
        self.after_move();
    }

    pub fn nav_last(&mut self) {
        self.selected = self.shown_len().saturating_sub(1);
        self.after_move();
    }

    fn cards_per_screen(&self) -> usize {
        (self.viewport_rows / CARD_ROWS).max(1)
    }

    fn after_move(&mut self) {
        self.ensure_selected_visible();
        self.notify_scroll();
    }

    /// Keep the selection in range after the shown set changed.
    pub fn clamp_selection(&mut self) {
        let len = self.shown_len();
        if len == 0 {
            self.selected = 0;
            self.scroll_offset = 0;
            return;
        }
        self.selected = self.selected.min(len - 1);
        let max_offset = (len * CARD_ROWS).saturating_sub(self.viewport_rows);
        self.scroll_offset = self.scroll_offset.min(max_offset);
        self.ensure_selected_visible();
    }

    fn ensure_selected_visible(&mut self) {
        let top = self.selected * CARD_ROWS;
        let bottom = top + CARD_ROWS;
        if top < self.scroll_offset {
            self.scroll_offset = top;
        } else if self.viewport_rows > 0 && bottom > self.scroll_offset + self.viewport_rows {
            self.scroll_offset = bottom.saturating_sub(self.viewport_rows);
        }
    }

    /// Record the card list height from the last render.
    pub fn set_viewport_rows(&mut self, rows: usize) {
        if self.viewport_rows != rows {
            self.viewport_rows = rows;
            self.clamp_selection();
            self.notify_scroll();
        }
    }

    /// Report the scroll position to the controller in layout units.
    pub fn notify_scroll(&mut self) -> bool {
        let document_rows = self.shown_len() * CARD_ROWS;
        let viewport_bottom = self.scroll_offset + self.viewport_rows;
        let revealed = self.controller.on_scroll(
            rows_to_units(viewport_bottom),
            rows_to_units(document_rows),
        );
        if revealed {
            tracing::debug!(viewport_bottom, document_rows, "Next page requested");
        }
        revealed
    }

    // ------------------------------------------------------------------------
    // Links and status
    // ------------------------------------------------------------------------

    /// The selected card's link, validated for opening.
    pub fn selected_link(&self) -> Result<Url, LinkError> {
        match self.selected_card() {
            Some(card) => validate_url_for_open(&card.link),
            None => Err(LinkError::Missing),
        }
    }

    /// Set status message (will auto-expire after 3 seconds)
    pub fn set_status(&mut self, msg: impl Into<Cow<'static, str>>) {
        self.status_message = Some((msg.into(), Instant::now()));
        self.needs_redraw = true;
    }

    /// Clear status message if expired. Returns true if one was cleared.
    pub fn clear_expired_status(&mut self) -> bool {
        if let Some((_, time)) = &self.status_message {
            if time.elapsed() >= STATUS_TTL {
                self.status_message = None;
                return true;
            }
        }
        false
    }
}

impl Drop for App {
    fn drop(&mut self) {
        if let Some(handle) = self.load_handle.take() {
            handle.abort();
            tracing::debug!("Aborted news load task on App drop");
        }
    }
}

fn rows_to_units(rows: usize) -> u32 {
    u32::try_from(rows)
        .unwrap_or(u32::MAX)
        .saturating_mul(ROW_UNITS)
}

/// Next position when stepping through `len` controls from `current`.
///
/// With nothing active, forward starts at the first control and backward at
/// the last.
fn cycle_index(current: Option<usize>, len: usize, forward: bool) -> Option<usize> {
    if len == 0 {
        return None;
    }
    Some(match (current, forward) {
        (Some(idx), true) => (idx + 1) % len,
        (Some(idx), false) => (idx + len - 1) % len,
        (None, true) => 0,
        (None, false) => len - 1,
    })
}
