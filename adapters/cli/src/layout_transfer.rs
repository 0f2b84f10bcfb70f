use base64::{engine::general_purpose::STANDARD_NO_PAD, Engine as _};
use horde_core::{ArenaBounds, ObstaclePlacement};
use horde_world::{query, World};
use serde::{Deserialize, Serialize};
use thiserror::Error;

const LAYOUT_DOMAIN: &str = "arena";
const LAYOUT_VERSION: &str = "v1";

/// Identifier prefix emitted before the encoded layout payload.
pub(crate) const LAYOUT_HEADER: &str = "arena:v1";
/// Delimiter used to separate the prefix, grid dimensions and payload.
const FIELD_DELIMITER: char = ':';

/// Arena grid and the obstacles placed on it.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct ArenaLayout {
    /// Number of tile columns in the arena.
    pub columns: u32,
    /// Number of tile rows in the arena.
    pub rows: u32,
    /// Obstacles placed on the grid.
    pub obstacles: Vec<ObstaclePlacement>,
}

impl ArenaLayout {
    /// Captures the arena currently loaded in `world`.
    #[must_use]
    pub(crate) fn capture(world: &World) -> Self {
        let bounds = query::bounds(world);
        Self {
            columns: u32::try_from(bounds.columns()).unwrap_or(0),
            rows: u32::try_from(bounds.rows()).unwrap_or(0),
            obstacles: query::obstacle_view(world)
                .iter()
                .map(|obstacle| ObstaclePlacement::new(obstacle.tile, obstacle.material))
                .collect(),
        }
    }

    /// Bounds of an arena covering exactly the layout's grid.
    #[must_use]
    pub(crate) fn bounds(&self) -> ArenaBounds {
        ArenaBounds::from_tiles(self.columns, self.rows)
    }

    /// Encodes the layout into a single-line string suitable for clipboard transfer.
    pub(crate) fn encode(&self) -> Result<String, LayoutTransferError> {
        let payload = SerializableLayout {
            obstacles: self.obstacles.clone(),
        };
        let json = serde_json::to_vec(&payload).map_err(LayoutTransferError::Serialize)?;
        let encoded = STANDARD_NO_PAD.encode(json);
        Ok(format!(
            "{LAYOUT_HEADER}:{}x{}:{encoded}",
            self.columns, self.rows
        ))
    }

    /// Decodes a layout from the provided string representation.
    pub(crate) fn decode(value: &str) -> Result<Self, LayoutTransferError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(LayoutTransferError::EmptyPayload);
        }

        let mut parts = trimmed.split(FIELD_DELIMITER);
        let domain = parts.next().ok_or(LayoutTransferError::MissingPrefix)?;
        let version = parts.next().ok_or(LayoutTransferError::MissingVersion)?;
        let dimensions = parts.next().ok_or(LayoutTransferError::MissingDimensions)?;
        let payload = parts.next().ok_or(LayoutTransferError::MissingPayload)?;

        if domain != LAYOUT_DOMAIN {
            return Err(LayoutTransferError::InvalidPrefix(domain.to_owned()));
        }
        if version != LAYOUT_VERSION {
            return Err(LayoutTransferError::UnsupportedVersion(version.to_owned()));
        }

        let (columns, rows) = parse_dimensions(dimensions)?;
        let bytes = STANDARD_NO_PAD
            .decode(payload.as_bytes())
            .map_err(LayoutTransferError::InvalidEncoding)?;
        let decoded: SerializableLayout =
            serde_json::from_slice(&bytes).map_err(LayoutTransferError::InvalidPayload)?;

        let layout = Self {
            columns,
            rows,
            obstacles: decoded.obstacles,
        };
        let bounds = layout.bounds();
        if let Some(outside) = layout
            .obstacles
            .iter()
            .find(|placement| !bounds.contains_tile(placement.tile))
        {
            return Err(LayoutTransferError::ObstacleOutOfBounds {
                column: outside.tile.column(),
                row: outside.tile.row(),
            });
        }

        Ok(layout)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
struct SerializableLayout {
    obstacles: Vec<ObstaclePlacement>,
}

/// Errors that can occur while encoding or decoding layout transfer strings.
#[derive(Debug, Error)]
pub(crate) enum LayoutTransferError {
    /// The provided string was empty or contained only whitespace.
    #[error("layout payload was empty")]
    EmptyPayload,
    /// The prefix segment was missing from the encoded layout.
    #[error("layout string is missing the prefix")]
    MissingPrefix,
    /// The encoded layout did not contain a version segment.
    #[error("layout string is missing the version")]
    MissingVersion,
    /// The encoded layout did not include grid dimensions.
    #[error("layout string is missing the grid dimensions")]
    MissingDimensions,
    /// The encoded layout did not include the payload segment.
    #[error("layout string is missing the payload")]
    MissingPayload,
    /// The encoded layout used an unexpected prefix segment.
    #[error("layout prefix '{0}' is not supported")]
    InvalidPrefix(String),
    /// The encoded layout used an unsupported version identifier.
    #[error("layout version '{0}' is not supported")]
    UnsupportedVersion(String),
    /// The grid dimensions could not be parsed from the encoded layout.
    #[error("could not parse grid dimensions '{0}'")]
    InvalidDimensions(String),
    /// The base64 payload could not be decoded.
    #[error("could not decode layout payload")]
    InvalidEncoding(#[source] base64::DecodeError),
    /// The decoded payload could not be deserialised.
    #[error("could not parse layout payload")]
    InvalidPayload(#[source] serde_json::Error),
    /// The layout could not be serialised.
    #[error("could not serialise layout")]
    Serialize(#[source] serde_json::Error),
    /// An obstacle lies outside the declared grid.
    #[error("obstacle at column {column}, row {row} lies outside the grid")]
    ObstacleOutOfBounds {
        /// Column of the offending obstacle.
        column: i32,
        /// Row of the offending obstacle.
        row: i32,
    },
}

fn parse_dimensions(dimensions: &str) -> Result<(u32, u32), LayoutTransferError> {
    let (columns, rows) = dimensions
        .split_once(['x', 'X'])
        .ok_or_else(|| LayoutTransferError::InvalidDimensions(dimensions.to_owned()))?;

    let columns = columns
        .trim()
        .parse::<u32>()
        .map_err(|_| LayoutTransferError::InvalidDimensions(dimensions.to_owned()))?;
    let rows = rows
        .trim()
        .parse::<u32>()
        .map_err(|_| LayoutTransferError::InvalidDimensions(dimensions.to_owned()))?;

    if columns == 0 || rows == 0 {
        return Err(LayoutTransferError::InvalidDimensions(
            dimensions.to_owned(),
        ));
    }

    Ok((columns, rows))
}
