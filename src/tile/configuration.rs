//! Tile configuration text files.
//!
//! The format lists one tile per line after a dimensionality header:
//!
//! ```text
//! # Define the number of dimensions we are working on
//! dim = 2
//!
//! # Define the image coordinates
//! scan.tif; 0; (0.0, 0.0)
//! scan.tif; 1; (100.0, 0.0)
//! ```

use std::fmt;

use super::layout::Layout;

/// Renders a [`Layout`] as a tile configuration file.
#[derive(Debug, Clone, Copy)]
pub struct TileConfiguration<'a> {
    layout: &'a Layout,
}

impl<'a> TileConfiguration<'a> {
    pub fn new(layout: &'a Layout) -> Self {
        Self { layout }
    }

    pub fn render(layout: &Layout) -> String {
        TileConfiguration::new(layout).to_string()
    }
}

impl fmt::Display for TileConfiguration<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# Define the number of dimensions we are working on")?;
        writeln!(f, "dim = {}", self.layout.dimensionality().axes())?;
        writeln!(f)?;
        writeln!(f, "# Define the image coordinates")?;

        for tile in self.layout.tiles() {
            write!(f, "{}; {}; (", tile.source(), tile.series_index())?;
            for (i, value) in tile.offset().iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{:?}", value)?;
            }
            writeln!(f, ")")?;
        }

        Ok(())
    }
}
