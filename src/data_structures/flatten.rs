//! Geometry flattening: structured geometry to flat per-attribute arrays.
//!
//! All functions here are pure and total over well-formed input: no GPU
//! calls, no failure paths. Empty input slices yield empty output vectors;
//! callers are the ones responsible for not uploading zero-length buffers.
//!
//! Array shapes: 9 floats per triangle per attribute (3 vertices x 3
//! components) for positions, colors and normals; 6 floats per segment
//! (2 x 3) for positions and colors; 6 floats per textured triangle (3 x 2)
//! for UVs.

use cgmath::{InnerSpace, Vector3};

use crate::data_structures::document::{Model, Segment, Triangle};
use crate::data_structures::texture::TexturedTriangle;

/// Flat attribute arrays for the triangle pipeline, ready for buffer upload.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TriangleArrays {
    pub positions: Vec<f32>,
    pub colors: Vec<f32>,
    pub normals: Vec<f32>,
}

/// Flat attribute arrays for the segment pipeline.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SegmentArrays {
    pub positions: Vec<f32>,
    pub colors: Vec<f32>,
}

/// Triangle and segment arrays of one model, bundled.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BufferData {
    pub triangles: TriangleArrays,
    pub segments: SegmentArrays,
}

impl TriangleArrays {
    pub fn of(triangles: &[Triangle]) -> Self {
        Self {
            positions: triangle_positions(triangles),
            colors: triangle_colors(triangles),
            normals: triangle_normals(triangles),
        }
    }
}

impl SegmentArrays {
    pub fn of(segments: &[Segment]) -> Self {
        Self {
            positions: segment_positions(segments),
            colors: segment_colors(segments),
        }
    }
}

impl Model {
    /// Flatten both geometry kinds of this model.
    pub fn buffer_data(&self) -> BufferData {
        BufferData {
            triangles: TriangleArrays::of(&self.triangles),
            segments: SegmentArrays::of(&self.segments),
        }
    }
}

/// Positions of all triangle endpoints in document order, 9 floats per
/// triangle.
pub fn triangle_positions(triangles: &[Triangle]) -> Vec<f32> {
    let mut data = Vec::with_capacity(9 * triangles.len());
    for triangle in triangles {
        for endpoint in triangle {
            data.extend_from_slice(&endpoint.position);
        }
    }
    data
}

/// Colors of all triangle endpoints, same shape as [`triangle_positions`].
pub fn triangle_colors(triangles: &[Triangle]) -> Vec<f32> {
    let mut data = Vec::with_capacity(9 * triangles.len());
    for triangle in triangles {
        for endpoint in triangle {
            data.extend_from_slice(&endpoint.color);
        }
    }
    data
}

/// One normal per triangle, repeated for each of its three vertices (flat,
/// unsmoothed shading).
///
/// The normal is `normalize(cross(b - a, c - a))` for endpoint positions
/// `a, b, c` in document order. A degenerate triangle (collinear or
/// duplicate points) has a zero-length cross product and yields the zero
/// vector unnormalized instead of dividing by zero.
pub fn triangle_normals(triangles: &[Triangle]) -> Vec<f32> {
    let mut data = Vec::with_capacity(9 * triangles.len());
    for triangle in triangles {
        let a: Vector3<f32> = triangle[0].position.into();
        let b: Vector3<f32> = triangle[1].position.into();
        let c: Vector3<f32> = triangle[2].position.into();
        let mut normal = (b - a).cross(c - a);
        if normal.dot(normal) > 0.0 {
            normal = normal.normalize();
        }
        let normal: [f32; 3] = normal.into();
        for _ in 0..3 {
            data.extend_from_slice(&normal);
        }
    }
    data
}

/// Positions of all segment endpoints, 6 floats per segment.
pub fn segment_positions(segments: &[Segment]) -> Vec<f32> {
    let mut data = Vec::with_capacity(6 * segments.len());
    for segment in segments {
        for endpoint in segment {
            data.extend_from_slice(&endpoint.position);
        }
    }
    data
}

/// Colors of all segment endpoints, same shape as [`segment_positions`].
pub fn segment_colors(segments: &[Segment]) -> Vec<f32> {
    let mut data = Vec::with_capacity(6 * segments.len());
    for segment in segments {
        for endpoint in segment {
            data.extend_from_slice(&endpoint.color);
        }
    }
    data
}

/// UV coordinates of all textured-triangle endpoints, 6 floats per triangle,
/// independent of the geometric flattening of the underlying triangles.
pub fn uv_array(textured: &[TexturedTriangle]) -> Vec<f32> {
    let mut data = Vec::with_capacity(6 * textured.len());
    for textured_triangle in textured {
        for uv in &textured_triangle.triangle_uv {
            data.extend_from_slice(uv);
        }
    }
    data
}

/// Project out the geometric triangles, discarding UVs, for reuse by the
/// triangle flattening functions.
pub fn triangles_of(textured: &[TexturedTriangle]) -> Vec<Triangle> {
    textured.iter().map(|t| t.triangle).collect()
}
