//! # Nafuda Lookup
//!
//! A [`MetadataLookup`] backed by the public TVmaze API. Searches rank the
//! returned shows by string similarity to the query, so a non-interactive
//! chooser can simply take the first candidate.
//!
//! ```no_run
//! use nafuda_core::{EpisodeLookup, Renamer};
//! use nafuda_lookup::TvMazeClient;
//!
//! let lookup = EpisodeLookup::new(TvMazeClient::new().unwrap());
//! let renamer = Renamer::with_default_config().unwrap().with_lookup(lookup);
//!
//! let episode = renamer.parse_tv("Doctor.Who.S01E01.mkv").unwrap();
//! println!("{}", renamer.render_tv(&episode).unwrap());
//! ```

use std::time::Duration;

use nafuda_core::lookup::{EpisodeInfo, LookupError, MetadataLookup, SeriesCandidate};
use reqwest::StatusCode;
use reqwest::Url;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;

pub const DEFAULT_BASE_URL: &str = "https://api.tvmaze.com";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Blocking TVmaze client.
#[derive(Debug, Clone)]
pub struct TvMazeClient {
    http: reqwest::blocking::Client,
    base_url: String,
}

impl TvMazeClient {
    /// Client for the public API with the default timeout.
    pub fn new() -> Result<Self, LookupError> {
        Self::with_options(DEFAULT_BASE_URL, DEFAULT_TIMEOUT)
    }

    /// Client for another TVmaze-compatible endpoint.
    pub fn with_options(base_url: &str, timeout: Duration) -> Result<Self, LookupError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("nafuda/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| LookupError::Transport(e.to_string()))?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str, params: &[(&str, &str)]) -> Result<Url, LookupError> {
        Url::parse_with_params(&format!("{}{path}", self.base_url), params)
            .map_err(|e| LookupError::Transport(format!("bad URL: {e}")))
    }

    /// GET a JSON document; `Ok(None)` for 404.
    fn get<T: DeserializeOwned>(&self, url: Url) -> Result<Option<T>, LookupError> {
        debug!(%url, "tvmaze request");
        let resp = self
            .http
            .get(url)
            .send()
            .map_err(|e| LookupError::Transport(e.to_string()))?;

        let status = resp.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(LookupError::Status(status.as_u16()));
        }

        let body = resp
            .text()
            .map_err(|e| LookupError::Transport(e.to_string()))?;
        decode(&body).map(Some)
    }
}

impl MetadataLookup for TvMazeClient {
    fn search(&self, series: &str) -> Result<Vec<SeriesCandidate>, LookupError> {
        let url = self.endpoint("/search/shows", &[("q", series)])?;
        let hits: Vec<SearchHit> = self.get(url)?.unwrap_or_default();
        Ok(rank_candidates(series, hits))
    }

    fn lookup_episode(
        &self,
        id: u64,
        season: u32,
        episode: u32,
    ) -> Result<Option<EpisodeInfo>, LookupError> {
        let (season, number) = (season.to_string(), episode.to_string());
        let url = self.endpoint(
            &format!("/shows/{id}/episodebynumber"),
            &[("season", &season), ("number", &number)],
        )?;
        let found: Option<Episode> = self.get(url)?;
        Ok(found.and_then(|e| e.name).map(|title| EpisodeInfo { title }))
    }
}

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct SearchHit {
    show: Show,
}

#[derive(Debug, Deserialize)]
struct Show {
    id: u64,
    name: String,
    premiered: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Episode {
    name: Option<String>,
}

fn decode<T: DeserializeOwned>(body: &str) -> Result<T, LookupError> {
    serde_json::from_str(body).map_err(|e| LookupError::Decode(e.to_string()))
}

/// Best match first; the display name carries the premiere year to tell
/// remakes apart.
fn rank_candidates(query: &str, hits: Vec<SearchHit>) -> Vec<SeriesCandidate> {
    let query = query.to_lowercase();
    let mut scored: Vec<(f64, SeriesCandidate)> = hits
        .into_iter()
        .filter(|hit| hit.show.id != 0)
        .map(|hit| {
            let score = strsim::jaro_winkler(&query, &hit.show.name.to_lowercase());
            let year = hit.show.premiered.as_deref().and_then(|p| p.get(..4));
            let display_name = match year {
                Some(year) => format!("{} ({year})", hit.show.name),
                None => hit.show.name,
            };
            (
                score,
                SeriesCandidate {
                    id: hit.show.id,
                    display_name,
                },
            )
        })
        .collect();

    scored.sort_by(|a, b| b.0.total_cmp(&a.0));
    scored.into_iter().map(|(_, candidate)| candidate).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEARCH_BODY: &str = r#"[
        {"score": 0.71, "show": {"id": 210, "name": "Doctor Who", "premiered": "2005-03-26", "language": "English"}},
        {"score": 0.90, "show": {"id": 766, "name": "Doctor Who Confidential", "premiered": "2005-03-26"}},
        {"score": 0.65, "show": {"id": 11, "name": "Doctor Who", "premiered": null}}
    ]"#;

    const EPISODE_BODY: &str = r#"{
        "id": 25007, "url": "https://www.tvmaze.com/episodes/25007/doctor-who-1x01-rose",
        "name": "Rose", "season": 1, "number": 1, "airdate": "2005-03-26"
    }"#;

    #[test]
    fn search_response_decodes() {
        let hits: Vec<SearchHit> = decode(SEARCH_BODY).unwrap();
        assert_eq!(hits.len(), 3);
        assert_eq!(hits[0].show.id, 210);
        assert_eq!(hits[2].show.premiered, None);
    }

    #[test]
    fn episode_response_decodes() {
        let episode: Episode = decode(EPISODE_BODY).unwrap();
        assert_eq!(episode.name.as_deref(), Some("Rose"));
    }

    #[test]
    fn malformed_body_is_a_decode_error() {
        let err = decode::<Vec<SearchHit>>("<html>").unwrap_err();
        assert!(matches!(err, LookupError::Decode(_)));
    }

    #[test]
    fn candidates_ranked_by_similarity() {
        let hits: Vec<SearchHit> = decode(SEARCH_BODY).unwrap();
        let ranked = rank_candidates("doctor who", hits);

        assert_eq!(ranked.len(), 3);
        assert_eq!(ranked[0].display_name, "Doctor Who (2005)");
        assert_eq!(ranked[1].display_name, "Doctor Who");
        assert_eq!(ranked[2].id, 766);
    }

    #[test]
    fn endpoints_are_built_from_base_url() {
        let client = TvMazeClient::with_options("http://localhost:8080/", DEFAULT_TIMEOUT).unwrap();
        assert_eq!(client.base_url(), "http://localhost:8080");

        let url = client.endpoint("/search/shows", &[("q", "Doctor Who")]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/search/shows?q=Doctor+Who");

        let url = client
            .endpoint("/shows/210/episodebynumber", &[("season", "1"), ("number", "2")])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:8080/shows/210/episodebynumber?season=1&number=2"
        );
    }

    #[test]
    fn unreachable_server_is_a_transport_error() {
        let client =
            TvMazeClient::with_options("http://127.0.0.1:9", Duration::from_millis(200)).unwrap();
        assert!(matches!(
            client.search("Doctor Who"),
            Err(LookupError::Transport(_))
        ));
    }
}
