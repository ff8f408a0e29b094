//! Deezer catalog client: free-text search and per-track detail lookups.

pub mod api;
pub mod models;

pub use api::CatalogClient;
pub use models::{TrackDetail, TrackSummary};

use std::future::Future;

/// The two catalog lookups the player depends on.
pub trait Catalog {
    fn search(
        &self,
        query: &str,
    ) -> impl Future<Output = anyhow::Result<Vec<TrackSummary>>> + Send;

    fn track(&self, id: u64) -> impl Future<Output = anyhow::Result<TrackDetail>> + Send;
}

impl Catalog for CatalogClient {
    fn search(
        &self,
        query: &str,
    ) -> impl Future<Output = anyhow::Result<Vec<TrackSummary>>> + Send {
        CatalogClient::search(self, query)
    }

    fn track(&self, id: u64) -> impl Future<Output = anyhow::Result<TrackDetail>> + Send {
        CatalogClient::track(self, id)
    }
}

/// What a finished search means for the results panel.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    Results(Vec<TrackSummary>),
    NoResults,
    Failed(String),
}

impl SearchOutcome {
    pub fn from_result(result: anyhow::Result<Vec<TrackSummary>>) -> Self {
        match result {
            Ok(tracks) if tracks.is_empty() => SearchOutcome::NoResults,
            Ok(mut tracks) => {
                tracks.truncate(api::MAX_RESULTS);
                SearchOutcome::Results(tracks)
            }
            Err(e) => SearchOutcome::Failed(format!("{e:#}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track(id: u64) -> TrackSummary {
        TrackSummary {
            id,
            title: format!("Track {id}"),
            short_title: None,
            artist_name: "Artist".to_string(),
            cover_small: None,
            cover_medium: None,
            cover_big: None,
            preview_url: String::new(),
        }
    }

    #[test]
    fn test_outcome_results_are_capped() {
        let tracks: Vec<_> = (0..15).map(track).collect();
        match SearchOutcome::from_result(Ok(tracks)) {
            SearchOutcome::Results(t) => {
                assert_eq!(t.len(), 10);
                assert_eq!(t[0].id, 0);
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn test_outcome_empty_is_not_an_error() {
        assert_eq!(SearchOutcome::from_result(Ok(vec![])), SearchOutcome::NoResults);
    }

    #[test]
    fn test_outcome_failure_keeps_context() {
        let err = anyhow::anyhow!("connection refused").context("search request");
        match SearchOutcome::from_result(Err(err)) {
            SearchOutcome::Failed(msg) => {
                assert!(msg.contains("search request"));
                assert!(msg.contains("connection refused"));
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn test_display_title_prefers_short_title() {
        let mut t = track(1);
        t.title = "Song (Live at Wembley)".into();
        assert_eq!(t.display_title(), "Song (Live at Wembley)");
        t.short_title = Some("Song".into());
        assert_eq!(t.display_title(), "Song");
        t.short_title = Some("  ".into());
        assert_eq!(t.display_title(), "Song (Live at Wembley)");
    }
}
