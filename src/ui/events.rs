//! Background task spawning and completion events.

use crate::app::{App, AppEvent, FeedState};
use chrono::Utc;
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Handle application events from background tasks.
pub(super) fn handle_app_event(app: &mut App, event: AppEvent) {
    match event {
        AppEvent::FeedLoaded(result) => {
            app.handle_feed_loaded(result, Utc::now());
        }
        AppEvent::TaskPanicked { task, error } => {
            tracing::error!(task, error = %error, "Background task panicked");
            app.load_handle = None;
            if app.loaded_once {
                app.set_status(format!("Internal error in {} task", task));
            } else {
                app.feed_state = FeedState::Failed { message: error };
            }
            app.needs_redraw = true;
        }
    }
}

/// Start a payload load unless one is already running.
///
/// Returns false when a load was already in progress.
pub(super) fn spawn_load(app: &mut App, event_tx: &mpsc::Sender<AppEvent>) -> bool {
    if app.is_loading() {
        tracing::debug!("News load already in progress, skipping");
        return false;
    }

    let loader = Arc::clone(&app.loader);
    let tx = event_tx.clone();
    tracing::debug!(source = %loader.source(), "Spawning news load task");

    app.load_handle = Some(tokio::spawn(async move {
        let event = match catch_task_panic(loader.fetch()).await {
            Ok(result) => AppEvent::FeedLoaded(result),
            Err(panic_msg) => AppEvent::TaskPanicked {
                task: "news load",
                error: panic_msg,
            },
        };
        if let Err(e) = tx.send(event).await {
            tracing::warn!(error = %e, "Failed to send news load result (receiver dropped)");
        }
    }));
    true
}

/// Run `future`, turning a panic into an error message.
pub(super) async fn catch_task_panic<F, T>(future: F) -> Result<T, String>
where
    F: std::future::Future<Output = T>,
{
    AssertUnwindSafe(future).catch_unwind().await.map_err(|panic| {
        if let Some(s) = panic.downcast_ref::<&'static str>() {
            s.to_string()
        } else if let Some(s) = panic.downcast_ref::<String>() {
            s.clone()
        } else {
            "Unknown panic".to_string()
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::{FeedLoader, FeedSource, FetchError};
    use crate::filter::{ControllerSettings, FilterScrollController, RegionAliasTable};
    use std::path::PathBuf;
    use std::time::Duration;

    fn app_with_source(source: FeedSource) -> App {
        let controller = FilterScrollController::new(
            ControllerSettings::default(),
            RegionAliasTable::default(),
            vec!["Најнови Вести".to_string()],
            vec!["Македонија".to_string()],
        );
        let loader = FeedLoader::new(reqwest::Client::new(), source);
        App::new(controller, Arc::new(loader))
    }

    #[tokio::test]
    async fn test_catch_task_panic_ok() {
        assert_eq!(catch_task_panic(async { 7 }).await, Ok(7));
    }

    #[tokio::test]
    async fn test_catch_task_panic_message() {
        let result: Result<(), String> = catch_task_panic(async { panic!("boom") }).await;
        assert_eq!(result, Err("boom".to_string()));
    }

    #[tokio::test]
    async fn test_spawn_load_delivers_event() {
        let dir = std::env::temp_dir().join("makedon_events_test_load");
        std::fs::create_dir_all(&dir).unwrap();
        let file = dir.join("news.json");
        std::fs::write(&file, r#"{"articles": [{"title": "Вест", "region": "🏔️ Балкан"}]}"#)
            .unwrap();

        let mut app = app_with_source(FeedSource::Local(file));
        let (tx, mut rx) = mpsc::channel(4);
        assert!(spawn_load(&mut app, &tx));

        let event = tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .unwrap()
            .unwrap();
        handle_app_event(&mut app, event);

        assert!(app.loaded_once);
        assert_eq!(app.cards.len(), 1);
        assert!(!app.is_loading());

        std::fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn test_first_load_panic_marks_failed() {
        let mut app = app_with_source(FeedSource::Local(PathBuf::from("unused.json")));
        handle_app_event(
            &mut app,
            AppEvent::TaskPanicked {
                task: "news load",
                error: "boom".to_string(),
            },
        );
        assert_eq!(
            app.feed_state,
            FeedState::Failed {
                message: "boom".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_load_error_event_before_first_success() {
        let mut app = app_with_source(FeedSource::Local(PathBuf::from("unused.json")));
        handle_app_event(&mut app, AppEvent::FeedLoaded(Err(FetchError::Timeout)));
        assert!(matches!(app.feed_state, FeedState::Failed { .. }));
        assert!(!app.loaded_once);
    }
}
