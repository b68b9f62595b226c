//! The scene document: typed representation of the JSON scene format.
//!
//! Field names on the wire are fixed by the existing scene files; the serde
//! attributes below reproduce them exactly. Missing fields default, so
//! partial documents written by older editors still parse.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use anyhow::Context as _;
use serde::{Deserialize, Serialize};

use crate::data_structures::texture::SceneTexture;

/// 3D vector, used for both coordinates and RGB colors.
pub type Vec3 = [f32; 3];

/// 2D vector, used for UV texture coordinates.
pub type Vec2 = [f32; 2];

/// 3x3 matrix, row-major, used for the view rotation.
pub type Mat3 = [[f32; 3]; 3];

/// A vertex with position, color, and the editor's grouping index.
///
/// `set` groups endpoints for editor-side selection semantics and is carried
/// through untouched; it does not influence rendering.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Endpoint {
    #[serde(default)]
    pub position: Vec3,
    #[serde(default)]
    pub color: Vec3,
    #[serde(default)]
    pub set: i32,
}

/// A line segment: exactly two endpoints.
pub type Segment = [Endpoint; 2];

/// A triangle: exactly three endpoints. Document order defines the winding
/// used for normal computation.
pub type Triangle = [Endpoint; 3];

/// Model geometry: the segments and plain (untextured) triangles of a scene.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Model {
    #[serde(default)]
    pub segments: Vec<Segment>,
    #[serde(default)]
    pub triangles: Vec<Triangle>,
}

/// View parameters written by the editor. Consumed only as uniform inputs.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct View {
    #[serde(default)]
    pub focus_point: Vec3,
    #[serde(default)]
    pub rotation_matrix: Mat3,
    #[serde(default)]
    pub scale: f32,
    #[serde(default)]
    pub screen_shift: Vec3,
}

/// Camera projection parameters. Consumed only as uniform inputs.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Projection {
    #[serde(default)]
    pub z_near: f32,
    #[serde(default)]
    pub z_far: f32,
    #[serde(default)]
    pub zoom_y: f32,
}

/// Editor cursor state. Markers are optional endpoints.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Cursor {
    #[serde(default)]
    pub position: Vec3,
    #[serde(default)]
    pub marker1: Option<Endpoint>,
    #[serde(default)]
    pub marker2: Option<Endpoint>,
    #[serde(default)]
    pub color: Vec3,
    #[serde(default)]
    pub step: f32,
}

/// Scene light: direction of the diffuse light and the fraction of light
/// that is ambient.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Light {
    #[serde(default)]
    pub vector: Vec3,
    #[serde(default)]
    pub ambient_fraction: f32,
}

/// The currently selected endpoint set in the editor.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SetState {
    #[serde(default)]
    pub current: i32,
}

/// The top-level parsed scene document.
///
/// Read once from its serialized form and immutable through the flattening
/// pipeline. The flattened arrays derived from it are consumed by buffer
/// upload and may then be discarded; the GPU-side buffer is the durable copy.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneDocument {
    #[serde(default)]
    pub model: Model,
    #[serde(default)]
    pub view: View,
    #[serde(default)]
    pub projection: Projection,
    #[serde(default)]
    pub background_color: Vec3,
    #[serde(default)]
    pub cursor: Cursor,
    #[serde(default)]
    pub light: Light,
    #[serde(default)]
    pub clip_max_vector: Vec3,
    #[serde(default)]
    pub clip_min_vector: Vec3,
    #[serde(default)]
    pub set: SetState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub texture: Option<SceneTexture>,
}

impl SceneDocument {
    /// Parse a scene document from a JSON reader.
    pub fn from_reader(reader: impl Read) -> anyhow::Result<Self> {
        let document = serde_json::from_reader(reader).context("parsing scene document")?;
        Ok(document)
    }

    /// Read and parse a scene document from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("opening scene document {}", path.display()))?;
        Self::from_reader(BufReader::new(file))
    }

    /// Serialize the document back to JSON.
    pub fn to_json(&self) -> anyhow::Result<String> {
        let json = serde_json::to_string(self).context("serializing scene document")?;
        Ok(json)
    }
}
