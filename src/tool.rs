//! The split-rectangle tool: fetch, generate, materialize.
//!
//! [`create_spaced_lines`] runs the whole pipeline against any
//! [`FeatureStore`]; registering the result into a map is a separate step,
//! [`crate::project::add_to_map`], so a missing project never loses the
//! generated layer.

use crate::error::{Error, Result};
use crate::geometry::Rectangle;
use crate::store::{FeatureStore, SpatialReference};
use crate::transect::{select_edges, Direction, EdgePair, Transect, TransectGenerator};

/// Caller input, as received from the command line or a host application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitRequest {
    /// Polygon layer holding the rectangle.
    pub rectangle_layer: String,
    /// `OBJECTID` of the rectangle within that layer.
    pub rectangle_id: i64,
    /// Name of the line layer to create.
    pub output_layer: String,
    /// Number of intervals; `line_count + 1` lines are produced.
    pub line_count: i64,
    /// `"horizontal"` or `"vertical"`.
    pub direction: String,
}

impl SplitRequest {
    /// Check the direction and the line count.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] for an unknown direction or a line
    /// count that is not a positive 32-bit integer.
    pub fn validate(&self) -> Result<(u32, Direction)> {
        let direction: Direction = self.direction.parse()?;
        let line_count = u32::try_from(self.line_count)
            .ok()
            .filter(|&n| n > 0)
            .ok_or_else(|| {
                Error::invalid(format!(
                    "The line count must be a positive integer, got {}.",
                    self.line_count
                ))
            })?;
        Ok((line_count, direction))
    }
}

/// Settings that used to be process-wide environment flags.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SplitOptions {
    /// Replace an existing output layer.
    pub overwrite: bool,
    /// Require a true rectangle, with this relative tolerance.
    pub strict_tolerance: Option<f64>,
}

impl Default for SplitOptions {
    fn default() -> Self {
        Self {
            overwrite: true,
            strict_tolerance: None,
        }
    }
}

/// What a successful run produced.
#[derive(Debug, Clone, PartialEq)]
pub struct SplitSummary {
    /// Name of the created layer.
    pub output_layer: String,
    /// The source rectangle.
    pub rectangle: Rectangle,
    /// Spatial reference shared by input and output.
    pub spatial_reference: Option<SpatialReference>,
    /// Edges that were interpolated.
    pub edges: EdgePair,
    /// Transects written, in sequence order.
    pub transects: Vec<Transect>,
}

/// Split the requested rectangle into transects and write them to a new layer.
///
/// Arguments are validated before the store is touched, and the output layer
/// is only created once generation has succeeded.
///
/// # Errors
///
/// [`Error::InvalidArgument`] for bad input, [`Error::NotFound`] when the
/// rectangle does not exist, and any store error from creating or filling
/// the output layer.
pub fn create_spaced_lines<S>(
    store: &mut S,
    request: &SplitRequest,
    options: &SplitOptions,
) -> Result<SplitSummary>
where
    S: FeatureStore + ?Sized,
{
    let (line_count, direction) = request.validate()?;

    let source = store.fetch_rectangle(&request.rectangle_layer, request.rectangle_id)?;
    tracing::debug!(
        layer = %request.rectangle_layer,
        id = request.rectangle_id,
        vertices = ?source.rectangle.vertices(),
        "fetched rectangle"
    );

    let mut generator = TransectGenerator::new(line_count).direction(direction);
    if let Some(tolerance) = options.strict_tolerance {
        generator = generator.strict(tolerance);
    }
    let transects = generator.generate(&source.rectangle)?;

    store.create_line_layer(
        &request.output_layer,
        source.spatial_reference.as_ref(),
        options.overwrite,
    )?;
    let written = store.insert_lines(&request.output_layer, &transects)?;
    tracing::info!(
        layer = %request.output_layer,
        lines = written,
        %direction,
        length = transects.first().map_or(0.0, |t| t.line.length()),
        "wrote transect layer"
    );

    Ok(SplitSummary {
        output_layer: request.output_layer.clone(),
        rectangle: source.rectangle,
        spatial_reference: source.spatial_reference,
        edges: select_edges(&source.rectangle, direction),
        transects,
    })
}
