//! semgate apidiff - surface-level API comparison of jar archives
//!
//! Provides:
//! - A minimal class-file header reader
//! - Jar surface loading (visible classes, fields, methods)
//! - Glob-based exclusion matching
//! - `SurfaceComparator`, the concrete `ApiComparator`

pub mod classfile;
pub mod comparator;
pub mod exclusions;
pub mod surface;

#[cfg(any(test, feature = "fixtures"))]
pub mod fixtures;

pub use comparator::SurfaceComparator;
pub use exclusions::ExclusionMatcher;
pub use surface::{load_jar, JarSurface};
