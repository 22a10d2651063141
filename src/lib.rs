//! # Trueno-Transect
//!
//! Evenly spaced transect lines across rectangular survey polygons.
//!
//! Given the four corners of a rectangle, a line count `n` and a direction,
//! the generator interpolates along two opposite edges and emits `n + 1`
//! parallel segments, from one edge of the rectangle to the other. The
//! results are written as a new line layer next to the source polygons and
//! registered into the active map of a project.
//!
//! ## Quick Start
//!
//! ```rust
//! use trueno_transect::prelude::*;
//!
//! let plot = Rectangle::new([
//!     Point::new(0.0, 0.0),
//!     Point::new(10.0, 0.0),
//!     Point::new(10.0, 4.0),
//!     Point::new(0.0, 4.0),
//! ]);
//!
//! let lines = generate(&plot, 2, Direction::Horizontal)?;
//! assert_eq!(lines.len(), 3);
//! assert_eq!(lines[1].start(), Point::new(5.0, 0.0));
//! # Ok::<(), trueno_transect::Error>(())
//! ```
//!
//! ## Layers and projects
//!
//! - [`store::FeatureStore`]: where rectangles are read and transects written
//!   ([`store::GeoJsonWorkspace`] for a directory of GeoJSON files,
//!   [`store::MemoryStore`] in memory).
//! - [`project::ProjectContext`]: the map the output layer is added to.
//! - [`tool::create_spaced_lines`] and [`project::add_to_map`] tie them together.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
// Allow unwrap() in tests only - banned in production code (Cloudflare incident 2025-11-18)
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Core Modules
// ============================================================================

/// Geometric primitives (points, lines, rectangles).
pub mod geometry;

/// Transect generation.
pub mod transect;

// ============================================================================
// Collaborators
// ============================================================================

/// Feature stores (GeoJSON workspace, in-memory).
pub mod store;

/// Project documents and map registration.
pub mod project;

/// End-to-end split tool.
pub mod tool;

/// Configuration loading.
pub mod config;

// ============================================================================
// Error Types
// ============================================================================

/// Error types for trueno-transect operations.
pub mod error;

pub use error::{Error, Result};

// ============================================================================
// Prelude
// ============================================================================

/// Commonly used types and traits for convenient imports.
///
/// ```rust
/// use trueno_transect::prelude::*;
/// ```
pub mod prelude {
    pub use crate::config::Config;
    pub use crate::error::{Error, Result};
    pub use crate::geometry::{Line, Point, Rectangle};
    pub use crate::project::{add_to_map, ProjectContext, ProjectFile};
    pub use crate::store::{FeatureStore, GeoJsonWorkspace, MemoryStore, SpatialReference};
    pub use crate::tool::{create_spaced_lines, SplitOptions, SplitRequest, SplitSummary};
    pub use crate::transect::{generate, Direction, Transect, TransectGenerator};
}
