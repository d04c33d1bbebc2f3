//! Integration tests for the load path: HTTP payload, cards, controller.

use chrono::{TimeZone, Utc};
use makedon_news::app::{build_http_client, App, FeedState};
use makedon_news::feed::{cards_from_payload, FeedLoader, FeedSource};
use makedon_news::filter::{ControllerSettings, FilterScrollController, RegionAliasTable};
use pretty_assertions::assert_eq;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn payload_json(balkan: usize, asia: usize) -> String {
    let mut articles = Vec::new();
    for i in 0..balkan {
        articles.push(serde_json::json!({
            "title": format!("Балканска вест {}", i),
            "summary": "Краток опис.",
            "link": format!("https://example.com/b/{}", i),
            "source_name": "МИА",
            "category": "Политика",
            "region": "🏔️ Балкан",
            "published": "2025-01-10T08:00:00Z",
        }));
    }
    for i in 0..asia {
        articles.push(serde_json::json!({
            "title": format!("Азиска вест {}", i),
            "region": "🌏 Азија",
            "category": "Економија",
        }));
    }
    serde_json::json!({
        "last_updated": "2025-01-10 09:30:00",
        "article_count": balkan + asia,
        "articles": articles,
    })
    .to_string()
}

async fn serve(body: String) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/data/news.json"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("Content-Type", "application/json"),
        )
        .mount(&server)
        .await;
    server
}

fn loader_for(server: &MockServer) -> FeedLoader {
    let client = build_http_client(Duration::from_secs(5)).unwrap();
    FeedLoader::new(
        client,
        FeedSource::parse(&format!("{}/data/news.json", server.uri())),
    )
}

fn controller() -> FilterScrollController {
    FilterScrollController::new(
        ControllerSettings::default(),
        RegionAliasTable::default(),
        vec!["Светски Вести".to_string(), "Најнови Вести".to_string()],
        vec!["Македонија".to_string(), "Азија".to_string()],
    )
}

#[tokio::test]
async fn test_loaded_cards_drive_default_filter() {
    let server = serve(payload_json(30, 30)).await;
    let payload = loader_for(&server).fetch().await.unwrap();
    let now = Utc.with_ymd_and_hms(2025, 1, 10, 9, 0, 0).unwrap();

    let cards = cards_from_payload(&payload, now);
    assert_eq!(cards.len(), 60);
    assert_eq!(cards[0].time, "Пред 1 час");
    assert_eq!(cards[0].badges(), "🏔️ Балкан | 🏛️ Политика");

    let mut c = controller();
    c.initialize(cards.iter().map(|card| card.to_item()).collect());
    c.flush();

    assert_eq!(c.filtered_count(), 30);
    assert_eq!(c.visible_count(), 25);
    assert!(c.shown_items().all(|item| item.key < 30));
}

#[tokio::test]
async fn test_app_reload_keeps_selected_region() {
    let server = serve(payload_json(5, 40)).await;
    let loader = Arc::new(loader_for(&server));
    let mut app = App::new(controller(), Arc::clone(&loader));

    app.handle_feed_loaded(loader.fetch().await, Utc::now());
    app.controller.flush();
    app.sync_view();
    assert!(matches!(app.feed_state, FeedState::Ready { article_count: 45, .. }));
    assert_eq!(app.shown_len(), 5);

    app.select_region_at(1);
    app.controller.flush();
    app.sync_view();
    assert_eq!(app.shown_len(), 25);

    app.handle_feed_loaded(loader.fetch().await, Utc::now());
    app.controller.flush();
    app.sync_view();
    assert_eq!(app.controller.filter().region.as_deref(), Some("Азија"));
    assert_eq!(app.shown_len(), 25);
}

#[tokio::test]
async fn test_failed_first_load_marks_failed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;
    let loader = Arc::new(loader_for(&server));
    let mut app = App::new(controller(), Arc::clone(&loader));

    app.handle_feed_loaded(loader.fetch().await, Utc::now());
    match &app.feed_state {
        FeedState::Failed { message } => assert!(message.contains("503")),
        other => panic!("expected Failed, got {:?}", other),
    }
}
