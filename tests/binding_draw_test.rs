mod common;

use common::stub::StubGpu;
use trivex::binding::{Binding, SegmentBinding, TriangleBinding, UniformState};
use trivex::data_structures::document::{Endpoint, Model, SceneDocument};
use trivex::data_structures::texture::{
    SceneTexture, TextureDefinition, TextureElement, TexturedTriangle,
};
use trivex::error::BindingError;
use trivex::pipelines::segment::SegmentShader;
use trivex::pipelines::textured::TexturedShader;
use trivex::pipelines::triangle::TriangleShader;
use trivex::texgen::TextureGenerator;

fn endpoint(position: [f32; 3]) -> Endpoint {
    Endpoint {
        position,
        color: [1.0, 1.0, 1.0],
        set: 0,
    }
}

fn textured_triangle() -> TexturedTriangle {
    TexturedTriangle {
        triangle: [
            endpoint([0.0, 0.0, 0.0]),
            endpoint([1.0, 0.0, 0.0]),
            endpoint([0.0, 1.0, 0.0]),
        ],
        triangle_uv: [[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]],
    }
}

fn definition(label: &str) -> TextureDefinition {
    TextureDefinition {
        label: label.to_string(),
        r: "x".to_string(),
        g: "y".to_string(),
        b: "0.0".to_string(),
        a: "1.0".to_string(),
    }
}

fn document_with_elements(elements: Vec<TextureElement>) -> SceneDocument {
    SceneDocument {
        texture: Some(SceneTexture {
            elements,
            index: 0,
        }),
        ..Default::default()
    }
}

#[test]
fn missing_texture_aggregate_is_a_construction_error() {
    let mut gpu = StubGpu::new();
    let mut generator = TextureGenerator::new();
    let shader = TexturedShader::new(&mut gpu).unwrap();
    let uniforms = UniformState::default();
    let document = SceneDocument::default();

    let result = Binding::new(&mut gpu, &mut generator, &shader, &uniforms, &document);

    assert!(matches!(result, Err(BindingError::MissingTexture)));
    // Detected eagerly: no element resources were created.
    assert_eq!(gpu.textures_created, 0);
}

#[test]
fn empty_element_has_zero_vertices_and_is_never_drawn() {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut gpu = StubGpu::new();
    let mut generator = TextureGenerator::new();
    let shader = TexturedShader::new(&mut gpu).unwrap();
    let uniforms = UniformState::default();
    let document = document_with_elements(vec![
        TextureElement {
            def: definition("full"),
            textured_triangles: vec![textured_triangle()],
        },
        TextureElement {
            def: definition("empty"),
            textured_triangles: Vec::new(),
        },
    ]);

    let binding = Binding::new(&mut gpu, &mut generator, &shader, &uniforms, &document).unwrap();
    assert_eq!(binding.elements[0].vertex_count, 3);
    assert_eq!(binding.elements[1].vertex_count, 0);

    let draws_before = gpu.draw_triangles_calls.len();
    let textures_bound_before = gpu.bound_textures.len();
    binding.draw(&mut gpu);

    // Exactly one element drew; the empty one bound nothing and drew
    // nothing.
    assert_eq!(gpu.draw_triangles_calls.len(), draws_before + 1);
    assert_eq!(gpu.draw_triangles_calls.last(), Some(&3));
    assert_eq!(gpu.bound_textures.len(), textures_bound_before + 1);
    assert_eq!(gpu.bound_textures.last(), Some(&binding.elements[0].texture));
}

#[test]
fn empty_element_uploads_no_geometry() {
    let mut gpu = StubGpu::new();
    let mut generator = TextureGenerator::new();
    let shader = TexturedShader::new(&mut gpu).unwrap();
    let uniforms = UniformState::default();
    let document = document_with_elements(vec![TextureElement {
        def: definition("empty"),
        textured_triangles: Vec::new(),
    }]);

    let uploads_before_construction = gpu.uploads.len();
    let binding = Binding::new(&mut gpu, &mut generator, &shader, &uniforms, &document).unwrap();

    // The only upload the construction may add is the generator's shared h
    // stream; the element's geometry buffers stay unloaded.
    assert!(gpu.uploads.len() <= uploads_before_construction + 1);
    assert_eq!(binding.elements[0].vertex_count, 0);
}

#[test]
fn frame_setup_pushes_camera_and_light_uniforms() {
    let mut gpu = StubGpu::new();
    let mut generator = TextureGenerator::new();
    let shader = TexturedShader::new(&mut gpu).unwrap();
    let mut uniforms = UniformState::default();
    uniforms.ambient = 0.25;
    uniforms.light = [0.0, 1.0, 0.0].into();
    let document = document_with_elements(vec![TextureElement {
        def: definition("full"),
        textured_triangles: vec![textured_triangle()],
    }]);

    let binding = Binding::new(&mut gpu, &mut generator, &shader, &uniforms, &document).unwrap();
    binding.draw_with_frame_setup(&mut gpu);

    assert!(gpu.uniform_mat4_writes.iter().any(|n| n == "projection"));
    assert!(gpu.uniform_mat4_writes.iter().any(|n| n == "view"));
    assert!(gpu.uniform_mat4_writes.iter().any(|n| n == "model"));
    assert!(
        gpu.uniform_vec3_writes
            .contains(&("light".to_string(), [0.0, 1.0, 0.0]))
    );
    assert!(
        gpu.uniform_f32_writes
            .contains(&("ambient".to_string(), 0.25))
    );
}

#[test]
fn triangle_binding_draws_flattened_model_triangles() {
    let mut gpu = StubGpu::new();
    let shader = TriangleShader::new(&mut gpu).unwrap();
    let uniforms = UniformState::default();
    let document = SceneDocument {
        model: Model {
            segments: Vec::new(),
            triangles: vec![
                [
                    endpoint([0.0, 0.0, 0.0]),
                    endpoint([1.0, 0.0, 0.0]),
                    endpoint([0.0, 1.0, 0.0]),
                ],
                [
                    endpoint([0.0, 0.0, 1.0]),
                    endpoint([1.0, 0.0, 1.0]),
                    endpoint([0.0, 1.0, 1.0]),
                ],
            ],
        },
        ..Default::default()
    };

    let binding = TriangleBinding::new(&mut gpu, &shader, &uniforms, &document);
    binding.draw_with_frame_setup(&mut gpu);

    assert_eq!(gpu.draw_triangles_calls, vec![6]);
    // position + color + normal buffers were bound.
    assert_eq!(gpu.bound_layouts.last().map(|l| l.len()), Some(3));
}

#[test]
fn segment_binding_draws_lines_and_skips_empty_models() {
    let mut gpu = StubGpu::new();
    let shader = SegmentShader::new(&mut gpu).unwrap();
    let uniforms = UniformState::default();

    let empty = SceneDocument::default();
    let binding = SegmentBinding::new(&mut gpu, &shader, &uniforms, &empty);
    binding.draw_with_frame_setup(&mut gpu);
    assert!(gpu.draw_lines_calls.is_empty());

    let document = SceneDocument {
        model: Model {
            segments: vec![[endpoint([0.0, 0.0, 0.0]), endpoint([1.0, 1.0, 1.0])]],
            triangles: Vec::new(),
        },
        ..Default::default()
    };
    let binding = SegmentBinding::new(&mut gpu, &shader, &uniforms, &document);
    binding.draw(&mut gpu);
    assert_eq!(gpu.draw_lines_calls, vec![2]);
}

#[test]
fn deleting_a_binding_releases_element_resources() {
    let mut gpu = StubGpu::new();
    let mut generator = TextureGenerator::new();
    let shader = TexturedShader::new(&mut gpu).unwrap();
    let uniforms = UniformState::default();
    let document = document_with_elements(vec![TextureElement {
        def: definition("full"),
        textured_triangles: vec![textured_triangle()],
    }]);

    let binding = Binding::new(&mut gpu, &mut generator, &shader, &uniforms, &document).unwrap();
    let texture = binding.elements[0].texture;
    binding.delete(&mut gpu);

    assert_eq!(gpu.deleted_buffers.len(), 3);
    assert_eq!(gpu.deleted_textures, vec![texture]);
}
