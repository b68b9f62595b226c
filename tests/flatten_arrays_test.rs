use trivex::data_structures::document::{Endpoint, Segment, Triangle};
use trivex::data_structures::flatten::{
    BufferData, SegmentArrays, TriangleArrays, segment_colors, segment_positions, triangle_colors,
    triangle_normals, triangle_positions, triangles_of, uv_array,
};
use trivex::data_structures::texture::TexturedTriangle;

fn endpoint(position: [f32; 3], color: [f32; 3]) -> Endpoint {
    Endpoint {
        position,
        color,
        set: 0,
    }
}

fn triangle(a: [f32; 3], b: [f32; 3], c: [f32; 3]) -> Triangle {
    [
        endpoint(a, [1.0, 0.0, 0.0]),
        endpoint(b, [0.0, 1.0, 0.0]),
        endpoint(c, [0.0, 0.0, 1.0]),
    ]
}

#[test]
fn triangle_arrays_have_nine_floats_per_triangle() {
    for count in [0usize, 1, 2, 7] {
        let triangles: Vec<Triangle> = (0..count)
            .map(|i| {
                let base = i as f32;
                triangle([base, 0.0, 0.0], [base + 1.0, 0.0, 0.0], [base, 1.0, 0.0])
            })
            .collect();
        assert_eq!(triangle_positions(&triangles).len(), 9 * count);
        assert_eq!(triangle_colors(&triangles).len(), 9 * count);
        assert_eq!(triangle_normals(&triangles).len(), 9 * count);
    }
}

#[test]
fn segment_arrays_have_six_floats_per_segment() {
    for count in [0usize, 1, 5] {
        let segments: Vec<Segment> = (0..count)
            .map(|i| {
                let base = i as f32;
                [
                    endpoint([base, 0.0, 0.0], [1.0, 1.0, 1.0]),
                    endpoint([base, 1.0, 0.0], [0.5, 0.5, 0.5]),
                ]
            })
            .collect();
        assert_eq!(segment_positions(&segments).len(), 6 * count);
        assert_eq!(segment_colors(&segments).len(), 6 * count);
    }
}

#[test]
fn positions_and_colors_keep_document_order() {
    let segments = vec![[
        endpoint([1.0, 2.0, 3.0], [0.1, 0.2, 0.3]),
        endpoint([4.0, 5.0, 6.0], [0.4, 0.5, 0.6]),
    ]];
    assert_eq!(
        segment_positions(&segments),
        vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]
    );
    assert_eq!(segment_colors(&segments), vec![0.1, 0.2, 0.3, 0.4, 0.5, 0.6]);
}

#[test]
fn unit_triangle_normal_is_z_repeated_per_vertex() {
    let triangles = vec![triangle(
        [0.0, 0.0, 0.0],
        [1.0, 0.0, 0.0],
        [0.0, 1.0, 0.0],
    )];
    let normals = triangle_normals(&triangles);
    assert_eq!(
        normals,
        vec![0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0]
    );
}

#[test]
fn degenerate_triangle_yields_zero_normal_without_nan() {
    let triangles = vec![triangle(
        [0.0, 0.0, 0.0],
        [0.0, 0.0, 0.0],
        [1.0, 0.0, 0.0],
    )];
    let normals = triangle_normals(&triangles);
    assert_eq!(normals, vec![0.0; 9]);
    assert!(normals.iter().all(|n| n.is_finite()));
}

#[test]
fn empty_inputs_yield_empty_outputs() {
    assert!(triangle_positions(&[]).is_empty());
    assert!(triangle_colors(&[]).is_empty());
    assert!(triangle_normals(&[]).is_empty());
    assert!(segment_positions(&[]).is_empty());
    assert!(segment_colors(&[]).is_empty());
    assert!(uv_array(&[]).is_empty());
    assert!(triangles_of(&[]).is_empty());
    assert_eq!(TriangleArrays::of(&[]), TriangleArrays::default());
    assert_eq!(SegmentArrays::of(&[]), SegmentArrays::default());
}

#[test]
fn uv_array_has_six_floats_per_textured_triangle_in_order() {
    let textured = vec![
        TexturedTriangle {
            triangle: triangle([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
            triangle_uv: [[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]],
        },
        TexturedTriangle {
            triangle: triangle([0.0, 0.0, 1.0], [1.0, 0.0, 1.0], [0.0, 1.0, 1.0]),
            triangle_uv: [[0.5, 0.5], [0.75, 0.5], [0.5, 0.75]],
        },
    ];
    let uvs = uv_array(&textured);
    assert_eq!(uvs.len(), 6 * textured.len());
    assert_eq!(
        uvs,
        vec![0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 0.5, 0.5, 0.75, 0.5, 0.5, 0.75]
    );
}

#[test]
fn triangles_of_projects_geometry_and_keeps_endpoint_pairing() {
    let geometric = triangle([0.0, 0.0, 0.0], [2.0, 0.0, 0.0], [0.0, 2.0, 0.0]);
    let textured = vec![TexturedTriangle {
        triangle: geometric,
        triangle_uv: [[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]],
    }];
    let triangles = triangles_of(&textured);
    assert_eq!(triangles, vec![geometric]);
    // The geometric flattening of the projection matches flattening the
    // original triangles directly.
    assert_eq!(
        triangle_positions(&triangles),
        triangle_positions(&[geometric])
    );
}

#[test]
fn model_buffer_data_bundles_both_pipelines() {
    let model = trivex::data_structures::document::Model {
        segments: vec![[
            endpoint([0.0, 0.0, 0.0], [1.0, 1.0, 1.0]),
            endpoint([1.0, 0.0, 0.0], [1.0, 1.0, 1.0]),
        ]],
        triangles: vec![triangle(
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
        )],
    };
    let data: BufferData = model.buffer_data();
    assert_eq!(data.triangles.positions.len(), 9);
    assert_eq!(data.triangles.normals.len(), 9);
    assert_eq!(data.segments.positions.len(), 6);
}
