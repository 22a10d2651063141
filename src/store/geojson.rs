//! Directory-backed feature store using GeoJSON files.
//!
//! Each layer lives in `<dir>/<layer>.geojson` as a `FeatureCollection`.
//! The spatial reference travels in the legacy named `crs` member, which
//! desktop GIS packages still read and write.

use super::{FeatureStore, SourceRectangle, SpatialReference, OBJECT_ID_FIELD};
use crate::error::{Error, Result};
use crate::geometry::{Point, Rectangle};
use crate::transect::Transect;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

const EXTENSION: &str = "geojson";

/// `[x, y]` or `[x, y, z]`.
type Position = Vec<f64>;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct FeatureCollection {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    crs: Option<NamedCrs>,
    #[serde(default)]
    features: Vec<Feature>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct NamedCrs {
    #[serde(rename = "type")]
    kind: String,
    properties: CrsName,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CrsName {
    name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Feature {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<Value>,
    #[serde(default)]
    properties: Option<Map<String, Value>>,
    geometry: Option<Geometry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
enum Geometry {
    Point { coordinates: Position },
    MultiPoint { coordinates: Vec<Position> },
    LineString { coordinates: Vec<Position> },
    MultiLineString { coordinates: Vec<Vec<Position>> },
    Polygon { coordinates: Vec<Vec<Position>> },
    MultiPolygon { coordinates: Vec<Vec<Vec<Position>>> },
    GeometryCollection { geometries: Vec<Geometry> },
}

impl FeatureCollection {
    fn empty(name: &str, spatial_reference: Option<&SpatialReference>) -> Self {
        Self {
            kind: "FeatureCollection".to_string(),
            name: Some(name.to_string()),
            crs: spatial_reference.map(|sr| NamedCrs {
                kind: "name".to_string(),
                properties: CrsName {
                    name: sr.name().to_string(),
                },
            }),
            features: Vec::new(),
        }
    }

    fn spatial_reference(&self) -> Option<SpatialReference> {
        self.crs
            .as_ref()
            .map(|crs| SpatialReference::new(crs.properties.name.clone()))
    }

    fn next_object_id(&self) -> i64 {
        self.features
            .iter()
            .filter_map(Feature::object_id)
            .max()
            .map_or(1, |id| id + 1)
    }
}

impl Feature {
    fn new(object_id: i64, geometry: Geometry) -> Self {
        let mut properties = Map::new();
        properties.insert(OBJECT_ID_FIELD.to_string(), Value::from(object_id));
        Self {
            kind: "Feature".to_string(),
            id: None,
            properties: Some(properties),
            geometry: Some(geometry),
        }
    }

    /// `OBJECTID` property, falling back to the feature `id`.
    fn object_id(&self) -> Option<i64> {
        self.properties
            .as_ref()
            .and_then(|p| p.get(OBJECT_ID_FIELD))
            .or(self.id.as_ref())
            .and_then(Value::as_i64)
    }

    /// First ring of the first part, for polygon geometries.
    fn outer_ring(&self) -> Option<&[Position]> {
        match self.geometry.as_ref()? {
            Geometry::Polygon { coordinates } => coordinates.first().map(Vec::as_slice),
            Geometry::MultiPolygon { coordinates } => {
                coordinates.first()?.first().map(Vec::as_slice)
            }
            _ => None,
        }
    }
}

fn position(p: Point) -> Position {
    vec![p.x, p.y]
}

fn point(pos: &[f64]) -> Option<Point> {
    match *pos {
        [x, y, ..] => Some(Point::new(x, y)),
        _ => None,
    }
}

/// A directory of GeoJSON layers.
#[derive(Debug, Clone)]
pub struct GeoJsonWorkspace {
    root: PathBuf,
}

impl GeoJsonWorkspace {
    /// Workspace rooted at `root`. The directory is created on first write.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// File backing layer `name`. A name already carrying the extension is used as-is.
    #[must_use]
    pub fn layer_path(&self, name: &str) -> PathBuf {
        let file = Path::new(name);
        if file.extension().is_some_and(|ext| ext == EXTENSION) {
            self.root.join(file)
        } else {
            self.root.join(format!("{name}.{EXTENSION}"))
        }
    }

    /// Write a polygon layer holding `rectangles`, replacing any existing file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn write_rectangles(
        &self,
        name: &str,
        spatial_reference: Option<&SpatialReference>,
        rectangles: &[(i64, Rectangle)],
    ) -> Result<()> {
        let mut collection = FeatureCollection::empty(name, spatial_reference);
        collection.features = rectangles
            .iter()
            .map(|(id, rect)| {
                let ring = rect.closed_ring().iter().copied().map(position).collect();
                Feature::new(*id, Geometry::Polygon {
                    coordinates: vec![ring],
                })
            })
            .collect();
        self.write(name, &collection)
    }

    /// Read the line records of layer `name` as `(OBJECTID, points)` pairs.
    ///
    /// # Errors
    ///
    /// Returns an error if the layer is missing or malformed.
    pub fn read_lines(&self, name: &str) -> Result<Vec<(i64, Vec<Point>)>> {
        let collection = self.read(name)?;
        Ok(collection
            .features
            .iter()
            .filter_map(|f| match f.geometry.as_ref()? {
                Geometry::LineString { coordinates } => Some((
                    f.object_id().unwrap_or_default(),
                    coordinates.iter().filter_map(|c| point(c)).collect(),
                )),
                _ => None,
            })
            .collect())
    }

    /// Spatial reference recorded in layer `name`.
    ///
    /// # Errors
    ///
    /// Returns an error if the layer is missing or malformed.
    pub fn spatial_reference(&self, name: &str) -> Result<Option<SpatialReference>> {
        Ok(self.read(name)?.spatial_reference())
    }

    fn read(&self, name: &str) -> Result<FeatureCollection> {
        let path = self.layer_path(name);
        let content = fs::read_to_string(&path)?;
        serde_json::from_str(&content).map_err(|e| Error::GeoJson {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    fn write(&self, name: &str, collection: &FeatureCollection) -> Result<()> {
        let path = self.layer_path(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(collection).map_err(|e| Error::GeoJson {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        fs::write(&path, json)?;
        Ok(())
    }
}

impl FeatureStore for GeoJsonWorkspace {
    fn fetch_rectangle(&self, layer: &str, object_id: i64) -> Result<SourceRectangle> {
        let not_found = || Error::NotFound {
            layer: layer.to_string(),
            id: object_id,
        };
        let collection = match self.read(layer) {
            Err(Error::Io(e)) if e.kind() == io::ErrorKind::NotFound => return Err(not_found()),
            other => other?,
        };

        let feature = collection
            .features
            .iter()
            .find(|f| f.object_id() == Some(object_id))
            .ok_or_else(not_found)?;
        let ring = feature.outer_ring().ok_or_else(|| {
            Error::invalid(format!(
                "Feature {object_id} in layer '{layer}' is not a polygon."
            ))
        })?;
        let vertices = ring
            .iter()
            .map(|c| point(c))
            .collect::<Option<Vec<_>>>()
            .ok_or_else(|| Error::GeoJson {
                path: self.layer_path(layer).display().to_string(),
                message: format!(
                    "feature {object_id} has a position with fewer than two coordinates"
                ),
            })?;

        Ok(SourceRectangle {
            rectangle: Rectangle::from_ring(&vertices)?,
            spatial_reference: collection.spatial_reference(),
        })
    }

    fn create_line_layer(
        &mut self,
        name: &str,
        spatial_reference: Option<&SpatialReference>,
        overwrite: bool,
    ) -> Result<()> {
        if !overwrite && self.exists(name) {
            return Err(Error::LayerExists(name.to_string()));
        }
        let path = self.layer_path(name);
        tracing::debug!(path = %path.display(), "creating line layer");
        self.write(name, &FeatureCollection::empty(name, spatial_reference))
    }

    fn insert_lines(&mut self, name: &str, transects: &[Transect]) -> Result<usize> {
        let mut collection = match self.read(name) {
            Err(Error::Io(e)) if e.kind() == io::ErrorKind::NotFound => {
                return Err(Error::OutputUnavailable(format!(
                    "Line layer '{name}' has not been created."
                )))
            }
            other => other?,
        };

        let first_id = collection.next_object_id();
        collection
            .features
            .extend(transects.iter().zip(first_id..).map(|(t, id)| {
                Feature::new(id, Geometry::LineString {
                    coordinates: vec![position(t.start()), position(t.end())],
                })
            }));
        self.write(name, &collection)?;
        Ok(transects.len())
    }

    fn exists(&self, name: &str) -> bool {
        self.layer_path(name).is_file()
    }

    fn layer_uri(&self, name: &str) -> String {
        let path = self.layer_path(name);
        fs::canonicalize(&path).unwrap_or(path).display().to_string()
    }
}
