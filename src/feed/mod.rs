//! Loading the precomputed news payload and turning it into display cards.
//!
//! - [`payload`] - serde model of the news JSON document
//! - [`fetcher`] - [`FeedLoader`], one-shot retrieval from a URL or local file
//! - [`card`] - [`ArticleCard`] materialization with placeholders and
//!   relative timestamps

pub mod card;
pub mod fetcher;
pub mod payload;

pub use card::{cards_from_payload, format_relative_time, ArticleCard};
pub use fetcher::{FeedLoader, FeedSource, FetchError};
pub use payload::{parse_payload, ArticleRecord, FeedPayload};
