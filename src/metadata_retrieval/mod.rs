/// Data structures and traits for TV show metadata retrieval.
///
/// This module provides the internal representation of shows and episodes as
/// they are surfaced to the UI, the error taxonomy of the remote fetches, and
/// the two service traits the interaction controller drives.
mod normalize;
mod tvmaze;
mod tvmaze_types;

pub use normalize::{MISSING_IMAGE_URL, normalize_episode, normalize_show};
pub use tvmaze::TvMazeProvider;

use std::fmt;
use std::future::Future;
use thiserror::Error;

/// Errors that can occur during metadata retrieval operations.
#[derive(Debug, Error)]
pub enum MetadataRetrievalError {
    /// The request could not be completed or returned a failure status
    #[error("Request to {url} failed: {message}")]
    Network {
        url: String,
        /// HTTP status code, if the server answered at all
        status: Option<u16>,
        message: String,
    },

    /// The response was readable but a record lacked required data
    #[error("Malformed record{}: {reason} (at `{path}`)", position_suffix(.index))]
    MalformedRecord {
        /// Position of the offending element in the response array
        index: Option<usize>,
        /// JSON path of the offending field within the record
        path: String,
        reason: String,
    },
}

impl MetadataRetrievalError {
    /// Returns true if the remote answered with 404 Not Found
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Network { status: Some(404), .. })
    }

    /// Attaches the position of the failing element to a malformed record error.
    pub(crate) fn at_index(self, position: usize) -> Self {
        match self {
            Self::MalformedRecord { path, reason, .. } => Self::MalformedRecord {
                index: Some(position),
                path,
                reason,
            },
            other => other,
        }
    }
}

fn position_suffix(index: &Option<usize>) -> String {
    index.map(|i| format!(" #{}", i)).unwrap_or_default()
}

/// Identifier of a show, as supplied by the remote catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShowId(pub u64);

impl fmt::Display for ShowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A television series as surfaced to the UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Show {
    /// Unique identifier of the show
    pub id: ShowId,
    /// The name of the show
    pub name: String,
    /// Summary as delivered by the remote, possibly containing HTML markup
    pub summary: String,
    /// Image URL, never empty
    pub image: String,
}

/// A single episode of a show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Episode {
    /// Unique identifier of the episode
    pub id: u64,
    /// The episode title
    pub name: String,
    /// The season this episode belongs to (starting at 1)
    pub season: u32,
    /// The episode number within the season (starting at 1)
    pub number: u32,
}

/// Searches the remote catalog for shows matching a free-text term.
pub trait ShowSearchService {
    /// Searches for shows matching `term`.
    ///
    /// The term is handed to the remote unmodified; matching semantics and
    /// ranking are defined by the remote. The returned shows keep the remote's
    /// order.
    ///
    /// # Errors
    ///
    /// Fails with `Network` if the request cannot complete, and with
    /// `MalformedRecord` if any element cannot be normalized. No partial
    /// result is ever returned.
    fn search_shows(
        &self,
        term: &str,
    ) -> impl Future<Output = Result<Vec<Show>, MetadataRetrievalError>>;
}

/// Looks up the episode listing of a single show.
pub trait EpisodeLookupService {
    /// Fetches all episodes of the show identified by `show_id`, in the order
    /// the remote delivers them.
    ///
    /// # Errors
    ///
    /// Same taxonomy and atomicity as [`ShowSearchService::search_shows`]. An
    /// unknown id surfaces as `Network` with a 404 status.
    fn lookup_episodes(
        &self,
        show_id: ShowId,
    ) -> impl Future<Output = Result<Vec<Episode>, MetadataRetrievalError>>;
}
