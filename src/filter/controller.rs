use super::regions::RegionAliasTable;
use super::schedule::Scheduler;
use super::state::{FilterState, ScrollState};
use super::visibility;
use std::time::Duration;
use tokio::time::Instant;

/// Items disclosed per page.
pub const DEFAULT_PAGE_SIZE: usize = 25;
/// Distance from the document bottom, in layout units, that triggers a page.
pub const DEFAULT_SCROLL_THRESHOLD: u32 = 500;
/// Delay applied to filter recomputation and page disclosure.
pub const DEFAULT_TRANSITION_DELAY: Duration = Duration::from_millis(300);
/// Region preselected when the article list is first captured.
pub const DEFAULT_REGION: &str = "Македонија";

/// Notice emitted by [`FilterScrollController::reset_all`].
pub const RESET_NOTICE: &str = "Сите системи се активирани! Филтрите се ресетирани.";

// ============================================================================
// Types
// ============================================================================

/// Tunables for a controller instance.
#[derive(Debug, Clone)]
pub struct ControllerSettings {
    pub page_size: usize,
    pub scroll_threshold: u32,
    pub transition_delay: Duration,
    pub default_region: String,
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            scroll_threshold: DEFAULT_SCROLL_THRESHOLD,
            transition_delay: DEFAULT_TRANSITION_DELAY,
            default_region: DEFAULT_REGION.to_string(),
        }
    }
}

/// One rendered news entry as seen by the filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleItem {
    /// Stable key assigned by the renderer (position in the feed).
    pub key: usize,
    /// All visible card text; region matching runs against this.
    pub text: String,
    /// First region alias target found in `text`, if any.
    ///
    /// Informational: matching always runs against `text`. Filter logs
    /// report how many matched items carry a tag.
    pub region_tag: Option<String>,
    pub shown: bool,
    /// Page that disclosed this item, while shown.
    pub page: Option<usize>,
}

impl ArticleItem {
    pub fn new(key: usize, text: impl Into<String>) -> Self {
        Self {
            key,
            text: text.into(),
            region_tag: None,
            shown: false,
            page: None,
        }
    }
}

/// A selectable topic or region control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Control {
    pub label: String,
    pub active: bool,
}

impl Control {
    fn new(label: String) -> Self {
        Self {
            label,
            active: false,
        }
    }
}

/// A display change decided by the controller.
///
/// Indicator updates carry the position of the active control, or `None`
/// when no control on that axis is active.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewUpdate {
    Visibility { index: usize, shown: bool },
    TopicIndicator(Option<usize>),
    RegionIndicator(Option<usize>),
    Counter(usize),
    Notice(&'static str),
}

/// Applies controller decisions to whatever displays the articles.
pub trait ViewAdapter {
    fn apply(&mut self, update: &ViewUpdate);
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum DeferredStep {
    /// Recompute the candidate set, hide everything, disclose page 1.
    ApplyFilter { match_text: Option<String> },
    /// Disclose the next page of the current candidate set.
    RevealPage,
}

// ============================================================================
// Controller
// ============================================================================

/// Topic/region filtering with paged disclosure.
///
/// Owns the captured items, the [`FilterState`] and the [`ScrollState`] for
/// one session. Filter recomputation and disclosure are deferred by
/// `transition_delay`; the host drives them with [`run_due`](Self::run_due)
/// or [`flush`](Self::flush). While any deferred step is pending the
/// in-flight flag is set and [`reveal_next_page`](Self::reveal_next_page)
/// does nothing.
///
/// Topic selection is tracked but never takes part in matching; only the
/// region axis decides visibility.
#[derive(Debug)]
pub struct FilterScrollController {
    settings: ControllerSettings,
    aliases: RegionAliasTable,
    topics: Vec<Control>,
    regions: Vec<Control>,
    items: Vec<ArticleItem>,
    /// Indices into `items` passing the active filter, in item order.
    candidates: Vec<usize>,
    filter: FilterState,
    scroll: ScrollState,
    scheduler: Scheduler<DeferredStep>,
    updates: Vec<ViewUpdate>,
}

impl FilterScrollController {
    pub fn new(
        settings: ControllerSettings,
        aliases: RegionAliasTable,
        topics: Vec<String>,
        regions: Vec<String>,
    ) -> Self {
        Self {
            settings,
            aliases,
            topics: topics.into_iter().map(Control::new).collect(),
            regions: regions.into_iter().map(Control::new).collect(),
            items: Vec::new(),
            candidates: Vec::new(),
            filter: FilterState::default(),
            scroll: ScrollState::default(),
            scheduler: Scheduler::new(),
            updates: Vec::new(),
        }
    }

    /// Capture the candidate set and apply the default filter.
    ///
    /// Replaces any previously captured items, so repeated calls never
    /// duplicate the set. Activates the last configured topic (without a
    /// recomputation of its own) and the default region, then schedules the
    /// region filter.
    pub fn initialize(&mut self, items: Vec<ArticleItem>) {
        self.capture(items);
        self.filter.clear();
        self.scroll = ScrollState::default();

        match self.topics.last().map(|c| c.label.clone()) {
            Some(topic) => self.activate_topic(&topic),
            None => self.updates.push(ViewUpdate::TopicIndicator(None)),
        }

        let region = self.settings.default_region.clone();
        self.activate_region(&region);
        let match_text = self.aliases.resolve(&region).to_string();
        self.schedule_filter(Some(match_text));

        tracing::info!(
            items = self.items.len(),
            region = %region,
            topic = ?self.filter.topic,
            "Filter controller initialized"
        );
    }

    /// Replace the captured items, keeping the current selection.
    ///
    /// Used when a feed reload delivers a new article list after
    /// [`initialize`](Self::initialize) already ran.
    pub fn reindex(&mut self, items: Vec<ArticleItem>) {
        self.capture(items);
        self.refresh_region_axis();
        tracing::info!(
            items = self.items.len(),
            region = ?self.filter.region,
            "Filter controller reindexed"
        );
    }

    /// Activate `topic` and re-apply the region axis.
    pub fn select_topic(&mut self, topic: &str) {
        self.activate_topic(topic);
        self.refresh_region_axis();
    }

    /// Activate `region`, filter by its alias and restart from page 1.
    pub fn select_region(&mut self, region: &str) {
        self.activate_region(region);
        let match_text = self.aliases.resolve(region).to_string();
        self.scroll.restart();
        self.schedule_filter(Some(match_text));
    }

    /// Select the topic control at `index`. Returns false if out of range.
    pub fn select_topic_at(&mut self, index: usize) -> bool {
        match self.topics.get(index).map(|c| c.label.clone()) {
            Some(label) => {
                self.select_topic(&label);
                true
            }
            None => false,
        }
    }

    /// Select the region control at `index`. Returns false if out of range.
    pub fn select_region_at(&mut self, index: usize) -> bool {
        match self.regions.get(index).map(|c| c.label.clone()) {
            Some(label) => {
                self.select_region(&label);
                true
            }
            None => false,
        }
    }

    /// Clear both axes, hide everything and disclose page 1 of the
    /// unfiltered set. The default region is not restored.
    pub fn reset_all(&mut self) {
        self.filter.clear();
        clear_active(&mut self.topics);
        clear_active(&mut self.regions);
        self.updates.push(ViewUpdate::TopicIndicator(None));
        self.updates.push(ViewUpdate::RegionIndicator(None));

        self.hide_all();
        self.scroll.restart();
        self.updates.push(ViewUpdate::Counter(0));
        self.schedule_filter(None);
        self.updates.push(ViewUpdate::Notice(RESET_NOTICE));

        tracing::info!(items = self.items.len(), "Filters reset");
    }

    /// Schedule disclosure of the next page of the filtered set.
    ///
    /// Returns false without doing anything when a disclosure is already in
    /// flight or the next page would start at or past the end of the
    /// filtered set.
    pub fn reveal_next_page(&mut self) -> bool {
        if self.scroll.in_flight {
            tracing::trace!(page = self.scroll.page, "Disclosure in flight, ignoring");
            return false;
        }
        let start = visibility::page_start(self.scroll.page, self.settings.page_size);
        if start >= self.candidates.len() {
            return false;
        }

        self.scroll.in_flight = true;
        self.scheduler
            .schedule(self.settings.transition_delay, DeferredStep::RevealPage);
        true
    }

    /// Scroll notification in layout units. Reveals the next page when the
    /// viewport bottom is within `scroll_threshold` of the document end.
    pub fn on_scroll(&mut self, viewport_bottom: u32, document_height: u32) -> bool {
        if visibility::near_bottom(
            viewport_bottom,
            document_height,
            self.settings.scroll_threshold,
        ) {
            self.reveal_next_page()
        } else {
            false
        }
    }

    /// Number of items currently shown.
    pub fn visible_count(&self) -> usize {
        self.items.iter().filter(|item| item.shown).count()
    }

    /// Run every deferred step due at or before `now`. Returns how many ran.
    pub fn run_due(&mut self, now: Instant) -> usize {
        let mut ran = 0;
        while let Some(step) = self.scheduler.pop_due(now) {
            self.run_step(step);
            ran += 1;
        }
        ran
    }

    /// Run every pending deferred step immediately, in order.
    pub fn flush(&mut self) -> usize {
        let mut ran = 0;
        while let Some(step) = self.scheduler.pop_next() {
            self.run_step(step);
            ran += 1;
        }
        ran
    }

    /// When the next deferred step becomes due.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.scheduler.next_due()
    }

    pub fn pending_steps(&self) -> usize {
        self.scheduler.len()
    }

    /// Drain the display changes accumulated since the last call.
    pub fn take_updates(&mut self) -> Vec<ViewUpdate> {
        std::mem::take(&mut self.updates)
    }

    /// Drain pending display changes into `adapter`.
    pub fn apply_updates<A: ViewAdapter>(&mut self, adapter: &mut A) -> usize {
        let updates = self.take_updates();
        for update in &updates {
            adapter.apply(update);
        }
        updates.len()
    }

    pub fn items(&self) -> &[ArticleItem] {
        &self.items
    }

    /// Shown items in item order.
    pub fn shown_items(&self) -> impl Iterator<Item = &ArticleItem> {
        self.items.iter().filter(|item| item.shown)
    }

    /// Size of the filtered candidate set.
    pub fn filtered_count(&self) -> usize {
        self.candidates.len()
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub fn scroll(&self) -> &ScrollState {
        &self.scroll
    }

    pub fn topics(&self) -> &[Control] {
        &self.topics
    }

    pub fn regions(&self) -> &[Control] {
        &self.regions
    }

    pub fn settings(&self) -> &ControllerSettings {
        &self.settings
    }

    pub fn aliases(&self) -> &RegionAliasTable {
        &self.aliases
    }

    // ------------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------------

    fn capture(&mut self, items: Vec<ArticleItem>) {
        let aliases = &self.aliases;
        let captured: Vec<ArticleItem> = items
            .into_iter()
            .map(|mut item| {
                item.region_tag = aliases.tag_for(&item.text);
                item.shown = false;
                item.page = None;
                item
            })
            .collect();

        self.items = captured;
        self.candidates.clear();
        for index in 0..self.items.len() {
            self.updates.push(ViewUpdate::Visibility {
                index,
                shown: false,
            });
        }
        self.updates.push(ViewUpdate::Counter(0));
    }

    fn activate_topic(&mut self, topic: &str) {
        let active = set_active(&mut self.topics, topic);
        self.filter.topic = Some(topic.to_string());
        self.updates.push(ViewUpdate::TopicIndicator(active));
        tracing::debug!(topic = %topic, "Active topic");
    }

    fn activate_region(&mut self, region: &str) {
        let active = set_active(&mut self.regions, region);
        self.filter.region = Some(region.to_string());
        self.updates.push(ViewUpdate::RegionIndicator(active));
        tracing::debug!(region = %region, "Active region");
    }

    /// Re-apply the active region, or the unfiltered set when none is active.
    fn refresh_region_axis(&mut self) {
        let match_text = self
            .filter
            .region
            .as_deref()
            .map(|region| self.aliases.resolve(region).to_string());
        self.scroll.restart();
        self.schedule_filter(match_text);
    }

    fn schedule_filter(&mut self, match_text: Option<String>) {
        self.scroll.in_flight = true;
        self.scheduler.schedule(
            self.settings.transition_delay,
            DeferredStep::ApplyFilter { match_text },
        );
    }

    fn run_step(&mut self, step: DeferredStep) {
        match step {
            DeferredStep::ApplyFilter { match_text } => self.apply_filter(match_text.as_deref()),
            DeferredStep::RevealPage => self.disclose_page(),
        }
        // A later step still queued keeps the flag raised.
        self.scroll.in_flight = !self.scheduler.is_empty();
    }

    fn apply_filter(&mut self, match_text: Option<&str>) {
        self.candidates =
            visibility::candidates(self.items.iter().map(|item| item.text.as_str()), match_text);
        self.hide_all();
        self.scroll.restart();
        self.disclose_page();

        tracing::debug!(
            match_text = ?match_text,
            matched = self.candidates.len(),
            tagged = self.tagged_candidates(),
            total = self.items.len(),
            "Filter applied"
        );
    }

    /// Candidates whose text carries a region alias target.
    fn tagged_candidates(&self) -> usize {
        self.candidates
            .iter()
            .filter(|&&index| self.items[index].region_tag.is_some())
            .count()
    }

    fn disclose_page(&mut self) {
        let page = self.scroll.page;
        if let Some(window) =
            visibility::page_window(page, self.settings.page_size, self.candidates.len())
        {
            for &index in &self.candidates[window] {
                let item = &mut self.items[index];
                if !item.shown {
                    item.shown = true;
                    item.page = Some(page);
                    self.updates.push(ViewUpdate::Visibility { index, shown: true });
                }
            }
            self.scroll.page = page.saturating_add(1);
            tracing::debug!(page, visible = self.visible_count(), "Page disclosed");
        }
        self.updates.push(ViewUpdate::Counter(self.visible_count()));
    }

    fn hide_all(&mut self) {
        for (index, item) in self.items.iter_mut().enumerate() {
            item.page = None;
            if item.shown {
                item.shown = false;
                self.updates.push(ViewUpdate::Visibility {
                    index,
                    shown: false,
                });
            }
        }
    }
}

/// Mark exactly the first control labelled `label` active.
fn set_active(controls: &mut [Control], label: &str) -> Option<usize> {
    let mut active = None;
    for (idx, control) in controls.iter_mut().enumerate() {
        control.active = active.is_none() && control.label == label;
        if control.active {
            active = Some(idx);
        }
    }
    active
}

fn clear_active(controls: &mut [Control]) {
    for control in controls.iter_mut() {
        control.active = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn labels(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn controller() -> FilterScrollController {
        FilterScrollController::new(
            ControllerSettings::default(),
            RegionAliasTable::default(),
            labels(&["Политика", "Спорт", "Најнови Вести"]),
            labels(&["Македонија", "Европа", "Азија"]),
        )
    }

    fn items(texts: &[&str]) -> Vec<ArticleItem> {
        texts
            .iter()
            .enumerate()
            .map(|(i, t)| ArticleItem::new(i, *t))
            .collect()
    }

    /// 60 items where every other one mentions the Balkans.
    fn mixed_items(balkan: usize, total: usize) -> Vec<ArticleItem> {
        (0..total)
            .map(|i| {
                let text = if i < balkan {
                    format!("Вест {} 🏔️ Балкан", i)
                } else {
                    format!("Вест {} 🌏 Азија", i)
                };
                ArticleItem::new(i, text)
            })
            .collect()
    }

    struct Recorder(Vec<ViewUpdate>);

    impl ViewAdapter for Recorder {
        fn apply(&mut self, update: &ViewUpdate) {
            self.0.push(update.clone());
        }
    }

    #[test]
    fn test_initialize_sets_defaults() {
        let mut c = controller();
        c.initialize(mixed_items(3, 5));

        assert_eq!(c.filter().topic.as_deref(), Some("Најнови Вести"));
        assert_eq!(c.filter().region.as_deref(), Some("Македонија"));
        assert_eq!(c.scroll().page, 1);
        assert!(c.scroll().in_flight);
        assert!(c.topics()[2].active);
        assert!(c.regions()[0].active);
        assert_eq!(c.visible_count(), 0);

        c.flush();
        assert_eq!(c.visible_count(), 3);
        assert!(!c.scroll().in_flight);
    }

    #[test]
    fn test_initialize_twice_does_not_duplicate() {
        let mut c = controller();
        c.initialize(mixed_items(3, 5));
        c.initialize(mixed_items(3, 5));
        c.flush();

        assert_eq!(c.items().len(), 5);
        assert_eq!(c.visible_count(), 3);
    }

    #[test]
    fn test_initialize_tags_regions() {
        let mut c = controller();
        c.initialize(items(&["🏔️ Балкан вест", "🌍 Свет вест"]));
        assert_eq!(c.items()[0].region_tag.as_deref(), Some("Балкан"));
        assert_eq!(c.items()[1].region_tag, None);
    }

    #[test]
    fn test_tagged_candidates_follow_filter() {
        let mut c = controller();
        c.initialize(items(&["🏔️ Балкан вест", "🌍 Свет вест", "Балкан и Азија"]));
        c.flush();
        assert_eq!(c.tagged_candidates(), 2);

        c.select_region("Свет");
        c.flush();
        assert_eq!(c.filtered_count(), 1);
        assert_eq!(c.tagged_candidates(), 0);
    }

    #[test]
    fn test_select_region_pages_filtered_set() {
        let mut c = controller();
        c.initialize(mixed_items(30, 60));
        c.flush();

        c.select_region("Македонија");
        c.flush();
        assert_eq!(c.filtered_count(), 30);
        assert_eq!(c.visible_count(), 25);

        assert!(c.reveal_next_page());
        c.flush();
        assert_eq!(c.visible_count(), 30);

        assert!(!c.reveal_next_page());
        assert_eq!(c.pending_steps(), 0);
        assert_eq!(c.visible_count(), 30);
    }

    #[test]
    fn test_select_region_alias_target() {
        let mut c = controller();
        c.initialize(items(&["...Балкан...", "...Азија..."]));
        c.select_region("Македонија");
        c.flush();

        assert!(c.items()[0].shown);
        assert!(!c.items()[1].shown);
    }

    #[test]
    fn test_unmapped_region_is_verbatim() {
        let mut c = controller();
        c.initialize(items(&["Океанија денес", "Балкан денес"]));
        c.select_region("Океанија");
        c.flush();

        assert!(c.items()[0].shown);
        assert!(!c.items()[1].shown);
        assert!(c.regions().iter().all(|r| !r.active));
    }

    #[test]
    fn test_region_change_restarts_paging() {
        let mut c = controller();
        c.initialize(mixed_items(60, 60));
        c.flush();
        c.reveal_next_page();
        c.flush();
        assert_eq!(c.scroll().page, 3);

        c.select_region("Европа");
        assert_eq!(c.scroll().page, 1);
        c.select_region("Македонија");
        c.flush();
        assert_eq!(c.scroll().page, 2);
        assert_eq!(c.visible_count(), 25);
        assert!(c.items().iter().filter(|i| i.shown).all(|i| i.page == Some(1)));
    }

    #[test]
    fn test_select_topic_keeps_region_filter() {
        let mut c = controller();
        c.initialize(mixed_items(10, 40));
        c.flush();

        c.select_topic("Спорт");
        c.flush();

        assert_eq!(c.filter().topic.as_deref(), Some("Спорт"));
        assert_eq!(c.filter().region.as_deref(), Some("Македонија"));
        assert_eq!(c.visible_count(), 10);
        assert_eq!(
            c.topics().iter().filter(|t| t.active).count(),
            1,
            "exactly one topic indicator"
        );
        assert!(c.topics()[1].active);
    }

    #[test]
    fn test_select_topic_without_region_shows_unfiltered() {
        let mut c = controller();
        c.initialize(mixed_items(10, 40));
        c.reset_all();
        c.flush();

        c.select_topic("Политика");
        c.flush();
        assert_eq!(c.filtered_count(), 40);
        assert_eq!(c.visible_count(), 25);
    }

    #[test]
    fn test_reset_all_discloses_unfiltered_page() {
        let mut c = controller();
        c.initialize(mixed_items(10, 40));
        c.flush();
        assert_eq!(c.visible_count(), 10);

        c.reset_all();
        assert_eq!(c.filter(), &FilterState::default());
        assert_eq!(c.visible_count(), 0);
        assert!(c.topics().iter().chain(c.regions()).all(|ctl| !ctl.active));

        c.flush();
        assert_eq!(c.visible_count(), 25);
        assert_eq!(c.filtered_count(), 40);
        assert_eq!(c.filter().region, None);
    }

    #[test]
    fn test_reveal_twice_while_in_flight_advances_once() {
        let mut c = controller();
        c.initialize(mixed_items(60, 60));
        c.flush();
        assert_eq!(c.scroll().page, 2);

        assert!(c.reveal_next_page());
        assert!(!c.reveal_next_page());
        assert_eq!(c.pending_steps(), 1);

        c.flush();
        assert_eq!(c.scroll().page, 3);
        assert_eq!(c.visible_count(), 50);
    }

    #[test]
    fn test_reveal_blocked_while_filter_pending() {
        let mut c = controller();
        c.initialize(mixed_items(60, 60));
        assert!(!c.reveal_next_page());
        assert!(!c.on_scroll(10_000, 100));
    }

    #[test]
    fn test_empty_set_reveal_is_noop() {
        let mut c = controller();
        c.initialize(Vec::new());
        c.flush();

        assert_eq!(c.visible_count(), 0);
        assert!(!c.reveal_next_page());
        assert!(!c.reveal_next_page());
        assert_eq!(c.scroll().page, 1);
    }

    #[test]
    fn test_on_scroll_threshold() {
        let mut c = controller();
        c.initialize(mixed_items(60, 60));
        c.flush();

        assert!(!c.on_scroll(1000, 2000));
        assert!(c.on_scroll(1600, 2000));
    }

    #[test]
    fn test_reindex_keeps_selection() {
        let mut c = controller();
        c.initialize(mixed_items(5, 10));
        c.flush();
        c.select_region("Азија");
        c.flush();

        c.reindex(mixed_items(2, 8));
        c.flush();
        assert_eq!(c.filter().region.as_deref(), Some("Азија"));
        assert_eq!(c.visible_count(), 6);
    }

    #[test]
    fn test_superseded_selection_last_write_wins() {
        let mut c = controller();
        c.initialize(mixed_items(5, 10));
        c.flush();

        c.select_region("Азија");
        c.select_region("Македонија");
        assert_eq!(c.pending_steps(), 2);

        c.flush();
        assert_eq!(c.filter().region.as_deref(), Some("Македонија"));
        assert_eq!(c.visible_count(), 5);
    }

    #[test]
    fn test_updates_reach_adapter() {
        let mut c = controller();
        c.initialize(items(&["Балкан", "Азија"]));
        c.take_updates();
        c.flush();

        let mut recorder = Recorder(Vec::new());
        c.apply_updates(&mut recorder);
        assert_eq!(
            recorder.0,
            vec![
                ViewUpdate::Visibility {
                    index: 0,
                    shown: true
                },
                ViewUpdate::Counter(1),
            ]
        );
        assert!(c.take_updates().is_empty());
    }

    #[test]
    fn test_reset_emits_notice() {
        let mut c = controller();
        c.initialize(items(&["Балкан"]));
        c.take_updates();
        c.reset_all();
        assert!(c
            .take_updates()
            .contains(&ViewUpdate::Notice(RESET_NOTICE)));
    }

    #[tokio::test]
    async fn test_run_due_waits_for_transition_delay() {
        tokio::time::pause();
        let mut c = controller();
        c.initialize(mixed_items(3, 5));

        tokio::time::advance(Duration::from_millis(100)).await;
        assert_eq!(c.run_due(Instant::now()), 0);
        assert_eq!(c.visible_count(), 0);

        tokio::time::advance(Duration::from_millis(200)).await;
        assert_eq!(c.run_due(Instant::now()), 1);
        assert_eq!(c.visible_count(), 3);
        assert_eq!(c.next_deadline(), None);
    }
}
