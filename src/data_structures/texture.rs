//! Procedural texture definitions and textured triangles.

use serde::{Deserialize, Serialize};

use crate::data_structures::document::{Triangle, Vec2};

/// UV coordinates for the three endpoints of a textured triangle, aligned
/// positionally with the triangle's endpoints: entry `i` belongs to endpoint
/// `i`. Reordering one without the other corrupts rendering.
pub type TriangleUv = [Vec2; 3];

/// A procedural texture definition: four textual expressions over the free
/// variables `x` and `y`, one per color channel, each expected to evaluate
/// to a scalar in `[0, 1]`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TextureDefinition {
    #[serde(default)]
    pub label: String,
    #[serde(rename = "R", default)]
    pub r: String,
    #[serde(rename = "G", default)]
    pub g: String,
    #[serde(rename = "B", default)]
    pub b: String,
    #[serde(rename = "A", default)]
    pub a: String,
}

/// A triangle together with the UV coordinates of its endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TexturedTriangle {
    #[serde(default)]
    pub triangle: Triangle,
    #[serde(rename = "triangleUV", default)]
    pub triangle_uv: TriangleUv,
}

/// One texture definition with the triangles textured by it: the unit of
/// "one texture, many triangles". An element with no triangles is valid and
/// produces zero draw vertices.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TextureElement {
    #[serde(default)]
    pub def: TextureDefinition,
    #[serde(rename = "texturedTriangles", default)]
    pub textured_triangles: Vec<TexturedTriangle>,
}

/// The texture aggregate of a scene document. `index` is the editor's
/// element cursor and does not influence rendering.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SceneTexture {
    #[serde(default)]
    pub elements: Vec<TextureElement>,
    #[serde(default)]
    pub index: i32,
}
