//! Type definitions for paths.

/// A single step of a path: an object key or a decimal array index.
pub type PathStep = String;

/// A parsed path.
pub type Path = Vec<PathStep>;
