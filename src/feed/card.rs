//! Display cards materialized from article records.
//!
//! A card holds the cleaned, placeholder-filled strings the host shows, and
//! its concatenated text becomes the [`ArticleItem`] the filter matches on.

use crate::feed::payload::{ArticleRecord, FeedPayload};
use crate::filter::ArticleItem;
use crate::util::{collapse_whitespace, strip_control_chars};
use chrono::{DateTime, Datelike, NaiveDateTime, Utc};

pub const PLACEHOLDER_TITLE: &str = "Без наслов";
pub const PLACEHOLDER_SUMMARY: &str = "Ова е RSS вест. Кликнете за да прочитате повеќе...";
pub const PLACEHOLDER_SOURCE: &str = "Независен извор";
pub const PLACEHOLDER_LINK: &str = "#";
pub const PLACEHOLDER_TIME: &str = "Неодамна";
pub const DEFAULT_CATEGORY_ICON: &str = "📰";

/// Region badges that read differently from the payload value.
const REGION_DISPLAY: &[(&str, &str)] = &[("🌍 World", "🌍 Свет")];

const CATEGORY_ICONS: &[(&str, &str)] = &[
    ("Новости", "🌐"),
    ("Политика", "🏛️"),
    ("Економија", "📈"),
    ("Спорт", "⚽"),
    ("Култура", "🎭"),
    ("Наука", "🔬"),
    ("Забава", "🎬"),
];

const MONTHS_SHORT: [&str; 12] = [
    "јан.", "фев.", "мар.", "апр.", "мај", "јун.", "јул.", "авг.", "сеп.", "окт.", "ное.", "дек.",
];

/// One article ready for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleCard {
    /// Position in the payload; also the [`ArticleItem`] key.
    pub index: usize,
    pub region: String,
    pub category: String,
    pub category_icon: &'static str,
    pub title: String,
    pub summary: String,
    pub link: String,
    pub source: String,
    pub time: String,
}

impl ArticleCard {
    pub fn from_record(index: usize, record: &ArticleRecord, now: DateTime<Utc>) -> Self {
        let region = clean(record.region.as_deref()).unwrap_or_default();
        let region = region_display(&region).to_string();
        let category = clean(record.category.as_deref()).unwrap_or_default();

        Self {
            index,
            region,
            category_icon: category_icon(&category),
            category,
            title: clean(record.title.as_deref()).unwrap_or_else(|| PLACEHOLDER_TITLE.to_string()),
            summary: clean(record.summary.as_deref())
                .unwrap_or_else(|| PLACEHOLDER_SUMMARY.to_string()),
            link: clean(record.link.as_deref()).unwrap_or_else(|| PLACEHOLDER_LINK.to_string()),
            source: clean(record.source_name.as_deref())
                .unwrap_or_else(|| PLACEHOLDER_SOURCE.to_string()),
            time: format_relative_time(record.published.as_deref(), now),
        }
    }

    /// Whether the card points anywhere.
    pub fn has_link(&self) -> bool {
        self.link != PLACEHOLDER_LINK
    }

    /// Region and category badges, e.g. `🏔️ Балкан | 🏛️ Политика`.
    pub fn badges(&self) -> String {
        let category = if self.category.is_empty() {
            self.category_icon.to_string()
        } else {
            format!("{} {}", self.category_icon, self.category)
        };
        if self.region.is_empty() {
            category
        } else {
            format!("{} | {}", self.region, category)
        }
    }

    pub fn footer(&self) -> String {
        format!("📰 {}  🕐 {}", self.source, self.time)
    }

    /// All visible card text, one block per line.
    pub fn text(&self) -> String {
        [self.badges(), self.title.clone(), self.summary.clone(), self.footer()].join("\n")
    }

    pub fn to_item(&self) -> ArticleItem {
        ArticleItem::new(self.index, self.text())
    }
}

/// Cards for every article in `payload`, in payload order.
pub fn cards_from_payload(payload: &FeedPayload, now: DateTime<Utc>) -> Vec<ArticleCard> {
    payload
        .articles
        .iter()
        .enumerate()
        .map(|(index, record)| ArticleCard::from_record(index, record, now))
        .collect()
}

/// Strip control sequences and collapse whitespace; blank becomes `None`.
fn clean(value: Option<&str>) -> Option<String> {
    let value = value?;
    let cleaned = collapse_whitespace(&strip_control_chars(value));
    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned)
    }
}

fn region_display(region: &str) -> &str {
    REGION_DISPLAY
        .iter()
        .find(|(raw, _)| *raw == region)
        .map(|(_, shown)| *shown)
        .unwrap_or(region)
}

fn category_icon(category: &str) -> &'static str {
    CATEGORY_ICONS
        .iter()
        .find(|(name, _)| *name == category)
        .map(|(_, icon)| *icon)
        .unwrap_or(DEFAULT_CATEGORY_ICON)
}

/// Parse a published timestamp.
///
/// Accepts RFC 3339, RFC 2822 and naive `YYYY-MM-DD HH:MM:SS` /
/// `YYYY-MM-DDTHH:MM:SS[.f]` (read as UTC).
pub fn parse_published(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(value) {
        return Some(dt.with_timezone(&Utc));
    }
    ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .map(|naive| naive.and_utc())
}

/// Format a published timestamp relative to `now`.
///
/// - absent/blank → `Неодамна`
/// - under an hour → `Пред N мин`
/// - under a day → `Пред N час` / `Пред N часа`
/// - older → day and short month, e.g. `10 јан.`
/// - unparseable → the raw value
pub fn format_relative_time(published: Option<&str>, now: DateTime<Utc>) -> String {
    let Some(raw) = published.map(str::trim).filter(|s| !s.is_empty()) else {
        return PLACEHOLDER_TIME.to_string();
    };
    let Some(at) = parse_published(raw) else {
        return raw.to_string();
    };

    // Future dates (clock skew between aggregator and reader)
    let diff = (now - at).num_seconds().max(0);
    let mins = diff / 60;
    let hours = diff / 3600;

    if mins < 60 {
        format!("Пред {} мин", mins)
    } else if hours < 24 {
        let suffix = if hours == 1 { "" } else { "а" };
        format!("Пред {} час{}", hours, suffix)
    } else {
        let month = MONTHS_SHORT[at.month0() as usize];
        format!("{} {}", at.day(), month)
    }
}
