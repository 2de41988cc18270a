/// TVMaze API record types for deserialization.
///
/// These structures mirror the subset of the TVMaze JSON the application
/// reads. Every other field is ignored.
use serde::Deserialize;
use serde_json::Value;

/// A show record, as nested in search results under `show`.
#[derive(Debug, Deserialize)]
pub(super) struct TvMazeShow {
    /// Unique show identifier
    pub id: u64,
    /// The name of the TV show
    pub name: String,
    /// Show summary in HTML format. Kept untyped: anything but a string
    /// counts as absent.
    #[serde(default)]
    pub summary: Option<Value>,
    /// Image variants, read leniently like `summary`
    #[serde(default)]
    pub image: Option<Value>,
}

/// A single episode from the episodes-by-show endpoint.
#[derive(Debug, Deserialize)]
pub(super) struct TvMazeEpisode {
    /// Unique episode identifier
    pub id: u64,
    /// Episode title
    pub name: String,
    /// Season number
    pub season: u32,
    /// Episode number within the season
    pub number: u32,
}
