//! Feature storage: where rectangles come from and transect layers go.
//!
//! [`FeatureStore`] is the narrow seam to a spatial data store. Two
//! implementations ship with the crate:
//!
//! - [`MemoryStore`]: layers held in memory, for embedding and tests.
//! - [`GeoJsonWorkspace`]: a directory of `<layer>.geojson` files.

mod geojson;
mod memory;

pub use geojson::GeoJsonWorkspace;
pub use memory::MemoryStore;

use crate::error::Result;
use crate::geometry::Rectangle;
use crate::transect::Transect;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Name of the record identifier field, shared by input and output layers.
pub const OBJECT_ID_FIELD: &str = "OBJECTID";

/// Coordinate system of a layer, identified by name (e.g. `EPSG:32633`).
///
/// The crate never transforms coordinates; it only carries the reference from
/// the input layer to the output layer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpatialReference(String);

impl SpatialReference {
    /// Create a reference from its name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The reference name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SpatialReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A rectangle fetched from a polygon layer.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceRectangle {
    /// The corner ring.
    pub rectangle: Rectangle,
    /// Spatial reference of the layer it came from.
    pub spatial_reference: Option<SpatialReference>,
}

/// Spatial data store holding polygon and line layers.
pub trait FeatureStore {
    /// Fetch the polygon whose `OBJECTID` equals `object_id` as a rectangle.
    ///
    /// Only the first ring of the first part is read.
    ///
    /// # Errors
    ///
    /// [`crate::Error::NotFound`] when the layer or the record is missing,
    /// [`crate::Error::InvalidArgument`] when the ring is not four corners.
    fn fetch_rectangle(&self, layer: &str, object_id: i64) -> Result<SourceRectangle>;

    /// Create an empty line layer named `name`.
    ///
    /// # Errors
    ///
    /// [`crate::Error::LayerExists`] when the layer exists and `overwrite` is false.
    fn create_line_layer(
        &mut self,
        name: &str,
        spatial_reference: Option<&SpatialReference>,
        overwrite: bool,
    ) -> Result<()>;

    /// Append one line record per transect, returning the number written.
    ///
    /// # Errors
    ///
    /// Fails when the layer has not been created or cannot be written.
    fn insert_lines(&mut self, name: &str, transects: &[Transect]) -> Result<usize>;

    /// True if a layer named `name` exists.
    fn exists(&self, name: &str) -> bool;

    /// Locator of the layer, as registered into a project map.
    fn layer_uri(&self, name: &str) -> String;
}
