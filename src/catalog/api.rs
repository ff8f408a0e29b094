use crate::catalog::models::{
    SearchResponse, TrackDetail, TrackExtras, TrackSummary, WireTrack,
};
use crate::config::CatalogConfig;
use anyhow::Context;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use std::sync::Arc;
use std::time::Duration;

/// The catalog ranks hits itself; we only keep the head of the list.
pub const MAX_RESULTS: usize = 10;

#[derive(Debug)]
struct Inner {
    http: reqwest::Client,
    base_url: String,
    proxy: Option<String>,
}

#[derive(Debug, Clone)]
pub struct CatalogClient {
    inner: Arc<Inner>,
}

impl CatalogClient {
    pub fn new(cfg: &CatalogConfig) -> anyhow::Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("deezy/", env!("CARGO_PKG_VERSION"))),
        );
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(cfg.timeout_secs.max(1)))
            .build()
            .context("build reqwest client")?;

        Ok(Self {
            inner: Arc::new(Inner {
                http,
                base_url: cfg.base_url.trim_end_matches('/').to_string(),
                proxy: Some(cfg.proxy.trim().to_string()).filter(|p| !p.is_empty()),
            }),
        })
    }

    /// Free-text search, at most [`MAX_RESULTS`] hits in catalog order.
    pub async fn search(&self, query: &str) -> anyhow::Result<Vec<TrackSummary>> {
        let url = self.search_url(query);
        tracing::debug!(%url, "catalog search");
        let body = self.get_text(&url).await.context("search request")?;
        parse_search(&body)
    }

    /// Full track record, including lyrics when the catalog has them.
    pub async fn track(&self, id: u64) -> anyhow::Result<TrackDetail> {
        let url = self.track_url(id);
        tracing::debug!(%url, "catalog track detail");
        let body = self.get_text(&url).await.context("track request")?;
        parse_track(&body)
    }

    fn search_url(&self, query: &str) -> String {
        self.relay(&format!(
            "{}/search?q={}",
            self.inner.base_url,
            urlencoding::encode(query)
        ))
    }

    fn track_url(&self, id: u64) -> String {
        self.relay(&format!("{}/track/{id}", self.inner.base_url))
    }

    /// Route a catalog URL through the CORS relay when one is configured.
    fn relay(&self, target: &str) -> String {
        match &self.inner.proxy {
            Some(proxy) => format!("{proxy}{}", urlencoding::encode(target)),
            None => target.to_string(),
        }
    }

    async fn get_text(&self, url: &str) -> anyhow::Result<String> {
        let response = self
            .inner
            .http
            .get(url)
            .send()
            .await
            .context("send catalog request")?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("catalog http status: {status}");
        }
        response.text().await.context("read catalog response")
    }
}

pub(crate) fn parse_search(body: &str) -> anyhow::Result<Vec<TrackSummary>> {
    let resp: SearchResponse = serde_json::from_str(body).context("parse search json")?;
    if let Some(err) = resp.error {
        anyhow::bail!("catalog error: {} ({})", err.message, err.kind);
    }
    Ok(resp
        .data
        .into_iter()
        .take(MAX_RESULTS)
        .map(TrackSummary::from)
        .collect())
}

pub(crate) fn parse_track(body: &str) -> anyhow::Result<TrackDetail> {
    let v: serde_json::Value = serde_json::from_str(body).context("parse track json")?;
    let extras: TrackExtras =
        serde_json::from_value(v.clone()).context("decode track lyrics")?;
    if let Some(err) = extras.error {
        anyhow::bail!("catalog error: {} ({})", err.message, err.kind);
    }
    let track: WireTrack = serde_json::from_value(v).context("decode track")?;
    let lyrics = extras
        .lyrics
        .and_then(|l| l.lyrics)
        .filter(|text| !text.trim().is_empty());

    Ok(TrackDetail {
        track: track.into(),
        lyrics,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn wire_track(id: u64) -> serde_json::Value {
        json!({
            "id": id,
            "title": format!("Track {id} (Remastered)"),
            "title_short": format!("Track {id}"),
            "artist": { "id": 1, "name": "Artist" },
            "album": {
                "cover_small": "https://cdn.test/s.jpg",
                "cover_medium": "https://cdn.test/m.jpg",
                "cover_big": "https://cdn.test/b.jpg"
            },
            "preview": format!("https://cdn.test/{id}.mp3")
        })
    }

    fn client(proxy: Option<&str>) -> CatalogClient {
        CatalogClient::new(&CatalogConfig {
            base_url: "https://api.deezer.com/".to_string(),
            proxy: proxy.unwrap_or_default().to_string(),
            timeout_secs: 5,
        })
        .unwrap()
    }

    #[test]
    fn test_parse_search_caps_results() {
        let data: Vec<_> = (1..=25).map(wire_track).collect();
        let body = json!({ "data": data, "total": 25 }).to_string();

        let tracks = parse_search(&body).unwrap();
        assert_eq!(tracks.len(), MAX_RESULTS);
        assert_eq!(tracks[0].id, 1);
        assert_eq!(tracks[9].id, 10);
        assert_eq!(tracks[0].artist_name, "Artist");
        assert_eq!(tracks[0].cover_medium.as_deref(), Some("https://cdn.test/m.jpg"));
        assert_eq!(tracks[0].preview_url, "https://cdn.test/1.mp3");
        assert_eq!(tracks[0].display_title(), "Track 1");
    }

    #[test]
    fn test_parse_search_missing_data_is_empty() {
        assert!(parse_search(r#"{"total":0}"#).unwrap().is_empty());
        assert!(parse_search(r#"{"data":[],"total":0}"#).unwrap().is_empty());
    }

    #[test]
    fn test_parse_search_errors() {
        let err = parse_search(
            r#"{"error":{"type":"Exception","message":"Quota limit exceeded","code":4}}"#,
        )
        .unwrap_err();
        assert!(format!("{err:#}").contains("Quota limit exceeded"));

        assert!(parse_search("<html>bad gateway</html>").is_err());
    }

    #[test]
    fn test_parse_track_with_lyrics() {
        let mut v = wire_track(7);
        v["lyrics"] = json!({ "id": "1", "lyrics": "line one\nline two" });
        let detail = parse_track(&v.to_string()).unwrap();
        assert_eq!(detail.track.id, 7);
        assert_eq!(detail.lyrics.as_deref(), Some("line one\nline two"));
    }

    #[test]
    fn test_parse_track_without_lyrics() {
        let detail = parse_track(&wire_track(7).to_string()).unwrap();
        assert!(detail.lyrics.is_none());

        let mut blank = wire_track(8);
        blank["lyrics"] = json!({ "lyrics": "   " });
        assert!(parse_track(&blank.to_string()).unwrap().lyrics.is_none());
    }

    #[test]
    fn test_parse_track_error_object() {
        let body = r#"{"error":{"type":"DataException","message":"no data","code":800}}"#;
        assert!(parse_track(body).is_err());
    }

    #[test]
    fn test_urls_direct() {
        let c = client(None);
        assert_eq!(
            c.search_url("daft punk"),
            "https://api.deezer.com/search?q=daft%20punk"
        );
        assert_eq!(c.track_url(3135556), "https://api.deezer.com/track/3135556");
    }

    #[test]
    fn test_urls_through_relay() {
        let c = client(Some("https://corsproxy.io/?"));
        assert_eq!(
            c.track_url(42),
            "https://corsproxy.io/?https%3A%2F%2Fapi.deezer.com%2Ftrack%2F42"
        );
        let url = c.search_url("a b");
        assert!(url.starts_with("https://corsproxy.io/?https%3A%2F%2Fapi.deezer.com%2Fsearch"));
        // The query is encoded once for the catalog and again for the relay.
        assert!(url.ends_with("a%2520b"));
    }
}
