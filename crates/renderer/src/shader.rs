//! WGSL source for the sand warp pipeline.
//!
//! The vertex stage emits a full-surface quad as a four-vertex triangle strip
//! straight from `vertex_index`, so the pipeline has no vertex buffers. The
//! fragment stage displaces texture lookups around the drag point:
//!
//! ```text
//!   d       = frag_px - drag
//!   ripple  = sin(|d| * RIPPLE_FREQUENCY) * exp(-|d| / FALLOFF_PX)
//!   uv'     = clamp(uv + normalize(d) * ripple * intensity, 0, 1)
//! ```

pub const VERTEX_ENTRY: &str = "vertex_passthrough";
pub const FRAGMENT_ENTRY: &str = "sandShader";

pub const SAND_WARP_WGSL: &str = r#"
struct VertexOutput {
    @builtin(position) position: vec4<f32>,
    @location(0) uv: vec2<f32>,
};

const RIPPLE_FREQUENCY: f32 = 0.08;
const FALLOFF_PX: f32 = 120.0;

@group(0) @binding(0) var<uniform> drag: vec2<f32>;
@group(0) @binding(1) var<uniform> intensity: f32;

@group(1) @binding(0) var sand_texture: texture_2d<f32>;
@group(1) @binding(1) var sand_sampler: sampler;

@vertex
fn vertex_passthrough(@builtin(vertex_index) index: u32) -> VertexOutput {
    var corners = array<vec2<f32>, 4>(
        vec2<f32>(-1.0, -1.0),
        vec2<f32>(1.0, -1.0),
        vec2<f32>(-1.0, 1.0),
        vec2<f32>(1.0, 1.0),
    );
    let corner = corners[index];

    var out: VertexOutput;
    out.position = vec4<f32>(corner, 0.0, 1.0);
    out.uv = vec2<f32>((corner.x + 1.0) * 0.5, (1.0 - corner.y) * 0.5);
    return out;
}

@fragment
fn sandShader(input: VertexOutput) -> @location(0) vec4<f32> {
    let delta = input.position.xy - drag;
    let dist = length(delta);

    var direction = vec2<f32>(0.0, 0.0);
    if (dist > 0.0001) {
        direction = delta / dist;
    }

    let ripple = sin(dist * RIPPLE_FREQUENCY) * exp(-dist / FALLOFF_PX);
    let uv = clamp(input.uv + direction * ripple * intensity, vec2<f32>(0.0), vec2<f32>(1.0));
    return textureSample(sand_texture, sand_sampler, uv);
}
"#;

#[cfg(test)]
mod tests {
    use super::*;

    fn parse() -> naga::Module {
        naga::front::wgsl::parse_str(SAND_WARP_WGSL).expect("sand warp shader parses")
    }

    #[test]
    fn module_validates() {
        let module = parse();
        naga::valid::Validator::new(
            naga::valid::ValidationFlags::all(),
            naga::valid::Capabilities::empty(),
        )
        .validate(&module)
        .expect("sand warp shader validates");
    }

    #[test]
    fn exposes_both_entry_points() {
        let module = parse();
        let vertex = module
            .entry_points
            .iter()
            .find(|entry| entry.name == VERTEX_ENTRY)
            .expect("vertex entry point");
        assert_eq!(vertex.stage, naga::ShaderStage::Vertex);
        let fragment = module
            .entry_points
            .iter()
            .find(|entry| entry.name == FRAGMENT_ENTRY)
            .expect("fragment entry point");
        assert_eq!(fragment.stage, naga::ShaderStage::Fragment);
    }

    #[test]
    fn resource_slots_match_frame_layout() {
        use crate::frame::{
            INTENSITY_BINDING, OFFSET_BINDING, PARAMS_GROUP, SAMPLER_BINDING, TEXTURE_BINDING,
            TEXTURE_GROUP,
        };

        let module = parse();
        let slot = |name: &str| {
            module
                .global_variables
                .iter()
                .find(|(_, var)| var.name.as_deref() == Some(name))
                .and_then(|(_, var)| var.binding.clone())
                .map(|binding| (binding.group, binding.binding))
        };
        assert_eq!(slot("drag"), Some((PARAMS_GROUP, OFFSET_BINDING)));
        assert_eq!(slot("intensity"), Some((PARAMS_GROUP, INTENSITY_BINDING)));
        assert_eq!(slot("sand_texture"), Some((TEXTURE_GROUP, TEXTURE_BINDING)));
        assert_eq!(slot("sand_sampler"), Some((TEXTURE_GROUP, SAMPLER_BINDING)));
    }
}
