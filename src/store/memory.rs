//! In-memory feature store.

use super::{FeatureStore, SourceRectangle, SpatialReference};
use crate::error::{Error, Result};
use crate::geometry::{Line, Point, Rectangle};
use crate::transect::Transect;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq)]
enum Records {
    Polygons(BTreeMap<i64, Vec<Point>>),
    Lines(Vec<(i64, Line)>),
}

#[derive(Debug, Clone, PartialEq)]
struct Layer {
    spatial_reference: Option<SpatialReference>,
    records: Records,
}

/// Layers kept in memory, keyed by name.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    layers: BTreeMap<String, Layer>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) a polygon record holding `ring` in layer `layer`.
    pub fn insert_polygon(
        &mut self,
        layer: &str,
        spatial_reference: Option<SpatialReference>,
        object_id: i64,
        ring: Vec<Point>,
    ) {
        let entry = self.layers.entry(layer.to_string()).or_insert_with(|| Layer {
            spatial_reference: spatial_reference.clone(),
            records: Records::Polygons(BTreeMap::new()),
        });
        if spatial_reference.is_some() {
            entry.spatial_reference = spatial_reference;
        }
        if let Records::Polygons(polys) = &mut entry.records {
            polys.insert(object_id, ring);
        } else {
            entry.records = Records::Polygons(BTreeMap::from([(object_id, ring)]));
        }
    }

    /// Convenience wrapper around [`MemoryStore::insert_polygon`] for a rectangle.
    pub fn insert_rectangle(
        &mut self,
        layer: &str,
        spatial_reference: Option<SpatialReference>,
        object_id: i64,
        rectangle: &Rectangle,
    ) {
        self.insert_polygon(layer, spatial_reference, object_id, rectangle.closed_ring().to_vec());
    }

    /// Line records of layer `name`, in insertion order, with their ids.
    #[must_use]
    pub fn lines(&self, name: &str) -> Option<&[(i64, Line)]> {
        match &self.layers.get(name)?.records {
            Records::Lines(lines) => Some(lines),
            Records::Polygons(_) => None,
        }
    }

    /// Spatial reference of layer `name`.
    #[must_use]
    pub fn spatial_reference(&self, name: &str) -> Option<&SpatialReference> {
        self.layers.get(name)?.spatial_reference.as_ref()
    }
}

impl FeatureStore for MemoryStore {
    fn fetch_rectangle(&self, layer: &str, object_id: i64) -> Result<SourceRectangle> {
        let not_found = || Error::NotFound {
            layer: layer.to_string(),
            id: object_id,
        };
        let stored = self.layers.get(layer).ok_or_else(not_found)?;
        let Records::Polygons(polys) = &stored.records else {
            return Err(not_found());
        };
        let ring = polys.get(&object_id).ok_or_else(not_found)?;
        Ok(SourceRectangle {
            rectangle: Rectangle::from_ring(ring)?,
            spatial_reference: stored.spatial_reference.clone(),
        })
    }

    fn create_line_layer(
        &mut self,
        name: &str,
        spatial_reference: Option<&SpatialReference>,
        overwrite: bool,
    ) -> Result<()> {
        if !overwrite && self.layers.contains_key(name) {
            return Err(Error::LayerExists(name.to_string()));
        }
        self.layers.insert(
            name.to_string(),
            Layer {
                spatial_reference: spatial_reference.cloned(),
                records: Records::Lines(Vec::new()),
            },
        );
        Ok(())
    }

    fn insert_lines(&mut self, name: &str, transects: &[Transect]) -> Result<usize> {
        let Some(Layer {
            records: Records::Lines(lines),
            ..
        }) = self.layers.get_mut(name)
        else {
            return Err(Error::OutputUnavailable(format!(
                "Line layer '{name}' has not been created."
            )));
        };
        let mut next_id = lines.last().map_or(1, |(id, _)| id + 1);
        for t in transects {
            lines.push((next_id, t.line));
            next_id += 1;
        }
        Ok(transects.len())
    }

    fn exists(&self, name: &str) -> bool {
        self.layers.contains_key(name)
    }

    fn layer_uri(&self, name: &str) -> String {
        format!("memory://{name}")
    }
}
