//! Normalization of raw TVMaze records
//!
//! Pure functions mapping untyped JSON records into the internal `Show` and
//! `Episode` shapes, applying the default-value policy for optional data.

use super::tvmaze_types::{TvMazeEpisode, TvMazeShow};
use super::{Episode, MetadataRetrievalError, Show, ShowId};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Image used for shows the catalog has no poster for.
pub const MISSING_IMAGE_URL: &str =
    "https://miro.medium.com/v2/resize:fit:479/0*5bRx6RbvKwCG5ig5.jpg";

/// Converts a raw show record into a `Show`.
///
/// `id`, `name` and `summary` are taken verbatim. A summary that is not a
/// string becomes the empty string. The medium image variant is used when it
/// is a non-empty string, otherwise [`MISSING_IMAGE_URL`].
///
/// # Errors
///
/// Returns `MalformedRecord` if `id` or `name` is absent or of the wrong shape.
/// Optional fields never fail normalization.
pub fn normalize_show(raw: &Value) -> Result<Show, MetadataRetrievalError> {
    let record: TvMazeShow = decode(raw)?;

    let image = record
        .image
        .as_ref()
        .and_then(|image| image.get("medium"))
        .and_then(Value::as_str)
        .filter(|url| !url.is_empty())
        .unwrap_or(MISSING_IMAGE_URL)
        .to_string();

    let summary = match record.summary {
        Some(Value::String(summary)) => summary,
        _ => String::new(),
    };

    Ok(Show {
        id: ShowId(record.id),
        name: record.name,
        summary,
        image,
    })
}

/// Converts a raw episode record into an `Episode`.
///
/// # Errors
///
/// Returns `MalformedRecord` if any of `id`, `name`, `season` or `number` is
/// absent or of the wrong shape, or if season or number is below 1.
pub fn normalize_episode(raw: &Value) -> Result<Episode, MetadataRetrievalError> {
    let record: TvMazeEpisode = decode(raw)?;

    for (field, value) in [("season", record.season), ("number", record.number)] {
        if value < 1 {
            return Err(MetadataRetrievalError::MalformedRecord {
                index: None,
                path: field.to_string(),
                reason: format!("expected a value of at least 1, got {}", value),
            });
        }
    }

    Ok(Episode {
        id: record.id,
        name: record.name,
        season: record.season,
        number: record.number,
    })
}

/// Deserializes a record, keeping the JSON path of the first offending field.
fn decode<T: DeserializeOwned>(raw: &Value) -> Result<T, MetadataRetrievalError> {
    serde_path_to_error::deserialize(raw).map_err(|e| MetadataRetrievalError::MalformedRecord {
        index: None,
        path: e.path().to_string(),
        reason: e.into_inner().to_string(),
    })
}
