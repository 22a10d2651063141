//! Project documents and map registration.
//!
//! A project holds named maps, each listing the layers it displays. The
//! generated transect layer is appended to the active map once it exists.

use crate::error::{Error, Result};
use crate::store::FeatureStore;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Visual workspace that can display layers.
pub trait ProjectContext {
    /// Add the layer at `uri` to the active map.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutputUnavailable`] when there is no active map.
    fn add_layer(&mut self, uri: &str) -> Result<()>;
}

/// One map of a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapDefinition {
    /// Map name.
    pub name: String,
    /// Layer locators, in drawing order.
    #[serde(default)]
    pub layers: Vec<String>,
}

/// YAML project document.
///
/// ```yaml
/// version: 1
/// active_map: Survey
/// maps:
///   - name: Survey
///     layers:
///       - /data/plots.geojson
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectFile {
    /// Document version.
    #[serde(default = "default_version")]
    pub version: u32,
    /// Name of the map new layers are added to.
    #[serde(default)]
    pub active_map: Option<String>,
    /// All maps in the project.
    #[serde(default)]
    pub maps: Vec<MapDefinition>,
}

fn default_version() -> u32 {
    1
}

impl Default for ProjectFile {
    fn default() -> Self {
        Self {
            version: default_version(),
            active_map: None,
            maps: Vec::new(),
        }
    }
}

impl ProjectFile {
    /// Empty project without maps.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an empty map and make it active.
    #[must_use]
    pub fn with_map(mut self, name: &str) -> Self {
        self.maps.push(MapDefinition {
            name: name.to_string(),
            layers: Vec::new(),
        });
        self.active_map = Some(name.to_string());
        self
    }

    /// Loads a project from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutputUnavailable`] if the file cannot be read, or a
    /// parse error with line number.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            Error::OutputUnavailable(format!("Project '{}' not found ({e})", path.display()))
        })?;
        Self::parse(&content)
    }

    /// Parses a project from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns an error with line number if parsing fails.
    pub fn parse(yaml: &str) -> Result<Self> {
        serde_yaml_ng::from_str(yaml).map_err(|e| Error::from_yaml(&e))
    }

    /// Writes the project back as YAML.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let yaml = serde_yaml_ng::to_string(self).map_err(|e| Error::from_yaml(&e))?;
        fs::write(path, yaml)?;
        Ok(())
    }

    /// The active map, if the project has one and it exists.
    #[must_use]
    pub fn active_map(&self) -> Option<&MapDefinition> {
        let name = self.active_map.as_deref()?;
        self.maps.iter().find(|m| m.name == name)
    }

    fn active_map_mut(&mut self) -> Option<&mut MapDefinition> {
        let name = self.active_map.as_deref()?;
        self.maps.iter_mut().find(|m| m.name == name)
    }
}

impl ProjectContext for ProjectFile {
    fn add_layer(&mut self, uri: &str) -> Result<()> {
        let map = self
            .active_map_mut()
            .ok_or_else(|| Error::OutputUnavailable("The project has no active map.".to_string()))?;
        if !map.layers.iter().any(|l| l == uri) {
            map.layers.push(uri.to_string());
        }
        Ok(())
    }
}

/// Register layer `output` into the active map of `project`.
///
/// Returns the locator that was added.
///
/// # Errors
///
/// Returns [`Error::OutputUnavailable`] when the layer does not exist in
/// `store` (typically because creating it failed) or the project has no
/// active map.
pub fn add_to_map<S, P>(store: &S, project: &mut P, output: &str) -> Result<String>
where
    S: FeatureStore + ?Sized,
    P: ProjectContext + ?Sized,
{
    if !store.exists(output) {
        return Err(Error::OutputUnavailable(format!(
            "Unable to add {output} to the map. Ensure it was created successfully."
        )));
    }
    let uri = store.layer_uri(output);
    project.add_layer(&uri)?;
    tracing::info!(layer = output, %uri, "added layer to active map");
    Ok(uri)
}
