//! Topic/region filtering and paged disclosure of article items.
//!
//! - [`controller`] - [`FilterScrollController`], the session state machine
//! - [`visibility`] - pure candidate/page/scroll decisions
//! - [`regions`] - region label → match string aliases
//! - [`schedule`] - deferred steps driven by the host's clock
//! - [`state`] - [`FilterState`] and [`ScrollState`]
//!
//! # Example
//!
//! ```
//! use makedon_news::filter::{
//!     ArticleItem, ControllerSettings, FilterScrollController, RegionAliasTable,
//! };
//!
//! let mut controller = FilterScrollController::new(
//!     ControllerSettings::default(),
//!     RegionAliasTable::default(),
//!     vec!["Најнови Вести".to_string()],
//!     vec!["Македонија".to_string(), "Азија".to_string()],
//! );
//! controller.initialize(vec![
//!     ArticleItem::new(0, "🏔️ Балкан: вест"),
//!     ArticleItem::new(1, "🌏 Азија: вест"),
//! ]);
//! controller.flush();
//! assert_eq!(controller.visible_count(), 1);
//! ```

pub mod controller;
pub mod regions;
pub mod schedule;
pub mod state;
pub mod visibility;

pub use controller::{
    ArticleItem, Control, ControllerSettings, FilterScrollController, ViewAdapter, ViewUpdate,
    DEFAULT_PAGE_SIZE, DEFAULT_REGION, DEFAULT_SCROLL_THRESHOLD, DEFAULT_TRANSITION_DELAY,
    RESET_NOTICE,
};
pub use regions::{RegionAliasTable, DEFAULT_REGION_ALIASES};
pub use state::{FilterState, ScrollState};
