//! Tile model.
//!
//! The extractor produces one [`TileDescriptor`] per series. The caller wraps
//! them in a [`Layout`] together with the [`FusionSettings`], and hands a
//! [`StitchRequest`] to the stitching stage.
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │           MetadataExtractor             │
//! └────────────────────┬────────────────────┘
//!                      │ Vec<TileDescriptor>
//!                      ▼
//! ┌─────────────────────────────────────────┐
//! │       Layout (+ FusionSettings)         │
//! └────────────────────┬────────────────────┘
//!                      │
//!          ┌───────────┴───────────┐
//!          ▼                       ▼
//! ┌─────────────────────┐ ┌─────────────────────┐
//! │  TileConfiguration  │ │    StitchRequest    │
//! │  (text file)        │ │    (JSON)           │
//! └─────────────────────┘ └─────────────────────┘
//! ```
//!
//! # Components
//!
//! - [`TileDescriptor`]: offset, position, transform model and source of one tile
//! - [`TransformModel`]: 2D or 3D translation, chosen by [`Dimensionality`]
//! - [`Layout`]: ordered tiles sharing one dimensionality
//! - [`TileConfiguration`]: tile configuration text rendering
//! - [`StitchRequest`]: layout plus the preview and overlap flags

mod configuration;
mod descriptor;
mod layout;

pub use configuration::TileConfiguration;
pub use descriptor::{Dimensionality, ImageHandle, TileDescriptor, TransformModel};
pub use layout::{FusionMethod, FusionSettings, Layout, StitchRequest};
