//! Synthesis of the texture generator program from a texture definition.
//!
//! The four channel expressions are spliced verbatim into generated WGSL,
//! each as the body of a scalar function of `(x, y)`. Because the splice is
//! textual, a definition whose concatenated expressions contain a statement
//! terminator (`;`) or block delimiter (`}`) is treated as hostile and
//! replaced wholesale with the constant opaque-black definition. This is a
//! character blacklist, not a parser; expression syntax beyond it is
//! whatever the shader language accepts, and a definition the shader
//! compiler rejects surfaces downstream as a recoverable
//! [`CompileError`](crate::error::CompileError).

use crate::data_structures::texture::TextureDefinition;
use crate::texgen::{TEX_MARGIN, TEX_SIZE};

/// Fragment stage of the generator program: forwards the interpolated color.
pub const GENERATOR_FRAGMENT_SHADER: &str = "\
@fragment
fn fs_main(in: PointOut) -> @location(0) vec4<f32> {
    return in.color;
}
";

/// Synthesize the vertex stage of the generator program.
///
/// Each invocation consumes one `h` grid coordinate, reads the current row
/// from the `v` uniform, remaps both to centered coordinates in `[-1, 1)`,
/// evaluates the four channel functions, and emits the result as both the
/// point's color and its device position, so each point rasterizes exactly
/// one pixel. The synthesis itself cannot fail; it always returns a string.
pub fn generator_vertex_shader(def: &TextureDefinition) -> String {
    let joined = [def.r.as_str(), def.g.as_str(), def.b.as_str(), def.a.as_str()].concat();
    let (r, g, b, a) = if joined.contains([';', '}']) {
        log::warn!(
            "texture definition `{}` contains unsafe characters, substituting opaque black",
            def.label
        );
        ("0.0", "0.0", "0.0", "1.0")
    } else {
        (
            def.r.as_str(),
            def.g.as_str(),
            def.b.as_str(),
            def.a.as_str(),
        )
    };
    format!(
        "\
const PI: f32 = 3.141592653589793;
const TEX_SIZE: f32 = {TEX_SIZE}.0;

fn R(x: f32, y: f32) -> f32 {{ return {r}; }}
fn G(x: f32, y: f32) -> f32 {{ return {g}; }}
fn B(x: f32, y: f32) -> f32 {{ return {b}; }}
fn A(x: f32, y: f32) -> f32 {{ return {a}; }}

struct PointOut {{
    @builtin(position) position: vec4<f32>,
    @location(0) color: vec4<f32>,
}}

@group(0) @binding(0) var<uniform> v: f32;

@vertex
fn vs_main(@location(0) h: f32) -> PointOut {{
    var out: PointOut;
    let hc = h - TEX_SIZE / 2.0;
    let vc = v - TEX_SIZE / 2.0;
    let x = 2.0 * hc / TEX_SIZE;
    let y = 2.0 * vc / TEX_SIZE;
    out.color = vec4<f32>(R(x, y), G(x, y), B(x, y), A(x, y));
    out.position = vec4<f32>(x, y, 0.0, 1.0);
    return out;
}}
"
    )
}

/// The `h` coordinate stream: `TEX_SIZE + TEX_MARGIN` sequential values
/// starting at -2, shared by every generated texture.
pub(crate) fn h_stream() -> Vec<f32> {
    (0..TEX_SIZE + TEX_MARGIN).map(|i| i as f32 - 2.0).collect()
}
