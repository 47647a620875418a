use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;

use crate::utils::state::AppState;

/// Background task that periodically drops expired entries from the news
/// list cache so stale pages do not pile up between requests.
pub fn spawn_cache_sweeper(state: Arc<AppState>, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut tick = tokio::time::interval(every);
        loop {
            tick.tick().await;
            let before = state.news_cache.len();
            state.news_cache.retain(|_, entry| !entry.is_expired());
            let evicted = before - state.news_cache.len();
            if evicted > 0 {
                tracing::debug!("cache sweep evicted {evicted} entries");
            }
        }
    })
}
