//! Per-tile geometry records.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ExtractError;

// =============================================================================
// Dimensionality
// =============================================================================

/// Number of spatial axes shared by every tile of a mosaic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Dimensionality {
    Two,
    Three,
}

impl Dimensionality {
    pub const fn from_is_3d(is_3d: bool) -> Self {
        if is_3d {
            Dimensionality::Three
        } else {
            Dimensionality::Two
        }
    }

    /// Number of coordinates per tile.
    pub const fn axes(self) -> usize {
        match self {
            Dimensionality::Two => 2,
            Dimensionality::Three => 3,
        }
    }
}

impl From<Dimensionality> for u8 {
    fn from(dim: Dimensionality) -> Self {
        dim.axes() as u8
    }
}

impl TryFrom<u8> for Dimensionality {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            2 => Ok(Dimensionality::Two),
            3 => Ok(Dimensionality::Three),
            other => Err(format!("dimensionality must be 2 or 3, got {}", other)),
        }
    }
}

impl fmt::Display for Dimensionality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}D", self.axes())
    }
}

// =============================================================================
// TransformModel
// =============================================================================

/// Placement transform of a tile, chosen by dimensionality alone.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum TransformModel {
    #[serde(rename = "translation_2d")]
    Translation2D { translation: [f64; 2] },
    #[serde(rename = "translation_3d")]
    Translation3D { translation: [f64; 3] },
}

impl TransformModel {
    /// Identity translation for `dimensionality`.
    pub const fn identity(dimensionality: Dimensionality) -> Self {
        match dimensionality {
            Dimensionality::Two => TransformModel::Translation2D {
                translation: [0.0; 2],
            },
            Dimensionality::Three => TransformModel::Translation3D {
                translation: [0.0; 3],
            },
        }
    }

    pub const fn dimensionality(&self) -> Dimensionality {
        match self {
            TransformModel::Translation2D { .. } => Dimensionality::Two,
            TransformModel::Translation3D { .. } => Dimensionality::Three,
        }
    }

    pub fn translation(&self) -> &[f64] {
        match self {
            TransformModel::Translation2D { translation } => translation,
            TransformModel::Translation3D { translation } => translation,
        }
    }

    /// Map a point through the transform. Extra coordinates pass through.
    pub fn apply(&self, point: &[f64]) -> Vec<f64> {
        let translation = self.translation();
        point
            .iter()
            .enumerate()
            .map(|(i, p)| p + translation.get(i).copied().unwrap_or(0.0))
            .collect()
    }
}

// =============================================================================
// TileDescriptor
// =============================================================================

/// Reference to a tile's pixel data, resolved by whoever loads the pixels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageHandle {
    pub source: String,
    pub series_index: usize,
}

/// Geometry and identity of one tile.
///
/// `offset` is the estimated top-left corner in pixels, in axis order
/// X, Y[, Z]. `position` starts equal to `offset` and is only moved by
/// [`set_position`](TileDescriptor::set_position).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TileDescriptor {
    dimensionality: Dimensionality,
    series_index: usize,
    source: String,
    offset: Vec<f64>,
    position: Vec<f64>,
    model: TransformModel,
    #[serde(skip_serializing_if = "Option::is_none")]
    image: Option<ImageHandle>,
}

impl TileDescriptor {
    /// Build a descriptor from X, Y, Z coordinates, keeping as many as
    /// `dimensionality` has axes.
    pub fn new(
        dimensionality: Dimensionality,
        series_index: usize,
        source: impl Into<String>,
        coordinates: [f64; 3],
    ) -> Self {
        let offset = coordinates[..dimensionality.axes()].to_vec();
        Self {
            dimensionality,
            series_index,
            source: source.into(),
            position: offset.clone(),
            offset,
            model: TransformModel::identity(dimensionality),
            image: None,
        }
    }

    pub fn dimensionality(&self) -> Dimensionality {
        self.dimensionality
    }

    pub fn series_index(&self) -> usize {
        self.series_index
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn offset(&self) -> &[f64] {
        &self.offset
    }

    pub fn position(&self) -> &[f64] {
        &self.position
    }

    pub fn model(&self) -> &TransformModel {
        &self.model
    }

    pub fn image(&self) -> Option<&ImageHandle> {
        self.image.as_ref()
    }

    /// Move the tile. The new position must have one value per axis.
    pub fn set_position(&mut self, position: &[f64]) -> Result<(), ExtractError> {
        if position.len() != self.dimensionality.axes() {
            return Err(ExtractError::InvalidInput(format!(
                "tile {} is {} but the new position has {} coordinates",
                self.series_index,
                self.dimensionality,
                position.len()
            )));
        }
        self.position.copy_from_slice(position);
        Ok(())
    }

    pub fn attach_image(&mut self, image: ImageHandle) {
        self.image = Some(image);
    }
}
