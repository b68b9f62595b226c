//! Scene document model and geometry flattening.
//!
//! This module contains the typed representation of the JSON scene format and
//! the pure transformations that turn it into GPU-upload-ready data:
//!
//! - `document` holds the top-level scene document: model geometry plus the
//!   view, projection, light and cursor parameters the editor writes
//! - `texture` holds the procedural texture definitions and the textured
//!   triangles that reference them
//! - `flatten` converts structured geometry into parallel flat attribute
//!   arrays (positions, colors, normals, UVs) ready for buffer upload

pub mod document;
pub mod flatten;
pub mod texture;
