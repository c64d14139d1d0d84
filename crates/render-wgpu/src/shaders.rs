/// WGSL program for every maze draw.
///
/// Vertices are offset by `translation`, then transformed by `view` and
/// `projection`. Colour is `vertex colour * ambient`, blended toward a
/// player-light response by `surface_sensitivity` (0 leaves it unlit).
/// Normals arrive unnormalized and with mixed winding, so lighting uses
/// `abs(dot)`.
pub const MAZE_SHADER: &str = r#"
struct DrawUniforms {
    projection: mat4x4<f32>,
    view: mat4x4<f32>,
    player_light: vec3<f32>,
    surface_sensitivity: f32,
    ambient: vec3<f32>,
    translation: vec3<f32>,
};

@group(0) @binding(0)
var<uniform> u: DrawUniforms;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) color: vec3<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) world_position: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) color: vec3<f32>,
};

@vertex
fn vs_main(vertex: VertexInput) -> VertexOutput {
    let world = vertex.position + u.translation;

    var out: VertexOutput;
    out.clip_position = u.projection * u.view * vec4<f32>(world, 1.0);
    out.world_position = world;
    out.normal = vertex.normal;
    out.color = vertex.color;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let to_light = u.player_light - in.world_position;
    let dist = length(to_light);
    let n_len = length(in.normal);

    var lambert = 0.0;
    if (n_len > 0.0 && dist > 0.0) {
        lambert = abs(dot(in.normal / n_len, to_light / dist));
    }
    let falloff = 1.0 / (1.0 + 2.0 * dist * dist);
    let response = mix(1.0, 0.25 + 1.5 * lambert * falloff, u.surface_sensitivity);

    return vec4<f32>(in.color * u.ambient * response, 1.0);
}
"#;
