/// TVMaze metadata provider implementation.
use super::normalize::{normalize_episode, normalize_show};
use super::{
    Episode, EpisodeLookupService, MetadataRetrievalError, Show, ShowId, ShowSearchService,
};
use crate::config::Config;
use serde_json::Value;

/// Metadata provider for the TVMaze API.
///
/// Searches shows through `/search/shows` and lists episodes through
/// `/shows/<id>/episodes`. Every call issues exactly one request; nothing is
/// cached between calls.
pub struct TvMazeProvider {
    client: reqwest::Client,
    base_url: String,
}

impl TvMazeProvider {
    /// Creates a new TVMaze provider from the given configuration.
    pub fn new(config: &Config) -> Result<Self, MetadataRetrievalError> {
        let base_url = config.base_url.trim_end_matches('/').to_string();

        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| MetadataRetrievalError::Network {
                url: base_url.clone(),
                status: None,
                message: format!("Failed to build HTTP client: {}", e),
            })?;

        Ok(Self { client, base_url })
    }

    /// Issues a GET request and parses the body as a JSON array.
    async fn fetch_array(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<Vec<Value>, MetadataRetrievalError> {
        tracing::debug!(url, ?query, "Requesting TVMaze resource");

        let network_error = |status: Option<u16>, message: String| MetadataRetrievalError::Network {
            url: url.to_string(),
            status,
            message,
        };

        let response = self
            .client
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|e| network_error(None, e.to_string()))?;

        // Ensure request was successful
        let status = response.status();
        if !status.is_success() {
            return Err(network_error(
                Some(status.as_u16()),
                format!(
                    "HTTP {} {}",
                    status.as_u16(),
                    status.canonical_reason().unwrap_or("Unknown")
                ),
            ));
        }

        let body = response
            .text()
            .await
            .map_err(|e| network_error(Some(status.as_u16()), e.to_string()))?;

        // Parse the JSON response
        let mut deserializer = serde_json::Deserializer::from_str(&body);
        let records: Vec<Value> = serde_path_to_error::deserialize(&mut deserializer).map_err(
            |e| MetadataRetrievalError::MalformedRecord {
                index: None,
                path: e.path().to_string(),
                reason: format!("Failed to parse API response: {}", e.into_inner()),
            },
        )?;

        // Only whitespace may follow the array
        deserializer
            .end()
            .map_err(|e| MetadataRetrievalError::MalformedRecord {
                index: None,
                path: ".".to_string(),
                reason: format!("Failed to parse API response: {}", e),
            })?;

        Ok(records)
    }
}

impl ShowSearchService for TvMazeProvider {
    async fn search_shows(&self, term: &str) -> Result<Vec<Show>, MetadataRetrievalError> {
        let url = format!("{}/search/shows", self.base_url);
        let results = self.fetch_array(&url, &[("q", term)]).await?;

        // Search results wrap each show record; the wrapper's score is ignored
        let shows = results
            .iter()
            .enumerate()
            .map(|(position, result)| {
                let record = result.get("show").ok_or_else(|| {
                    MetadataRetrievalError::MalformedRecord {
                        index: Some(position),
                        path: "show".to_string(),
                        reason: "search result carries no show record".to_string(),
                    }
                })?;
                normalize_show(record).map_err(|e| e.at_index(position))
            })
            .collect::<Result<Vec<_>, _>>()?;

        tracing::info!(term, count = shows.len(), "Show search completed");
        Ok(shows)
    }
}

impl EpisodeLookupService for TvMazeProvider {
    async fn lookup_episodes(&self, show_id: ShowId) -> Result<Vec<Episode>, MetadataRetrievalError> {
        let url = format!("{}/shows/{}/episodes", self.base_url, show_id);
        let records = self.fetch_array(&url, &[]).await?;

        let episodes = records
            .iter()
            .enumerate()
            .map(|(position, record)| normalize_episode(record).map_err(|e| e.at_index(position)))
            .collect::<Result<Vec<_>, _>>()?;

        tracing::info!(%show_id, count = episodes.len(), "Episode lookup completed");
        Ok(episodes)
    }
}
