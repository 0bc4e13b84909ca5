/// WGSL shader for lit, normal-mapped meshes.
///
/// Lighting is ambient + hemisphere (blended on the world normal's up
/// component) + directional diffuse, with a small specular term shaped by
/// the material's roughness/clearcoat/reflectivity. The normal map is
/// applied through a screen-derivative cotangent frame, so meshes carry no
/// tangent attribute.
pub const MESH_SHADER: &str = r#"
struct Globals {
    view_proj: mat4x4<f32>,
    camera_pos: vec4<f32>,
    ambient: vec4<f32>,
    hemi_sky: vec4<f32>,
    hemi_ground: vec4<f32>,
    sun_dir: vec4<f32>,
    sun_color: vec4<f32>,
};

@group(0) @binding(0)
var<uniform> globals: Globals;

struct MeshUniforms {
    model: mat4x4<f32>,
    color: vec4<f32>,
    // x: roughness, y: metalness, z: clearcoat, w: reflectivity
    params: vec4<f32>,
    // x: normal map enabled
    flags: vec4<f32>,
};

@group(1) @binding(0)
var<uniform> mesh: MeshUniforms;
@group(1) @binding(1)
var normal_map: texture_2d<f32>;
@group(1) @binding(2)
var map_sampler: sampler;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) uv: vec2<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) world_pos: vec3<f32>,
    @location(1) world_normal: vec3<f32>,
    @location(2) uv: vec2<f32>,
};

@vertex
fn vs_main(vertex: VertexInput) -> VertexOutput {
    let world_pos = mesh.model * vec4<f32>(vertex.position, 1.0);
    var out: VertexOutput;
    out.clip_position = globals.view_proj * world_pos;
    out.world_pos = world_pos.xyz;
    out.world_normal = normalize((mesh.model * vec4<f32>(vertex.normal, 0.0)).xyz);
    out.uv = vertex.uv;
    return out;
}

// Tangent basis from screen-space derivatives (no tangent attribute needed).
fn perturb_normal(n: vec3<f32>, pos: vec3<f32>, uv: vec2<f32>, mapped: vec3<f32>) -> vec3<f32> {
    let dp1 = dpdx(pos);
    let dp2 = dpdy(pos);
    let duv1 = dpdx(uv);
    let duv2 = dpdy(uv);

    let dp2perp = cross(dp2, n);
    let dp1perp = cross(n, dp1);
    let t = dp2perp * duv1.x + dp1perp * duv2.x;
    let b = dp2perp * duv1.y + dp1perp * duv2.y;

    let det = max(dot(t, t), dot(b, b));
    if (det <= 1e-12) {
        return n;
    }
    let inv = inverseSqrt(det);
    return normalize(mat3x3<f32>(t * inv, b * inv, n) * mapped);
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let geom_n = normalize(in.world_normal);
    // Sampled unconditionally to keep control flow uniform
    let sampled = textureSample(normal_map, map_sampler, in.uv).xyz * 2.0 - 1.0;
    let mapped_n = perturb_normal(geom_n, in.world_pos, in.uv, sampled);
    let n = normalize(mix(geom_n, mapped_n, mesh.flags.x));

    let hemi_blend = n.y * 0.5 + 0.5;
    let hemi = mix(globals.hemi_ground.rgb, globals.hemi_sky.rgb, hemi_blend);
    let ndotl = max(dot(n, -globals.sun_dir.xyz), 0.0);
    let diffuse = globals.ambient.rgb + hemi + globals.sun_color.rgb * ndotl;

    let view_dir = normalize(globals.camera_pos.xyz - in.world_pos);
    let half_dir = normalize(view_dir - globals.sun_dir.xyz);
    let gloss = 1.0 - mesh.params.x;
    let spec_power = exp2(2.0 + gloss * 8.0);
    let spec_strength = mesh.params.w + mesh.params.z;
    let spec = pow(max(dot(n, half_dir), 0.0), spec_power) * spec_strength;

    let base = mix(mesh.color.rgb, mesh.color.rgb * 0.6, mesh.params.y * 0.5);
    let color = base * diffuse + globals.sun_color.rgb * spec;
    return vec4<f32>(color, 1.0);
}
"#;

/// WGSL shader for helper lines (world axes, directional light gizmo).
pub const LINE_SHADER: &str = r#"
struct Globals {
    view_proj: mat4x4<f32>,
    camera_pos: vec4<f32>,
    ambient: vec4<f32>,
    hemi_sky: vec4<f32>,
    hemi_ground: vec4<f32>,
    sun_dir: vec4<f32>,
    sun_color: vec4<f32>,
};

@group(0) @binding(0)
var<uniform> globals: Globals;

struct LineVertex {
    @location(0) position: vec3<f32>,
    @location(1) color: vec4<f32>,
};

struct LineOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) color: vec4<f32>,
};

@vertex
fn vs_line(vertex: LineVertex) -> LineOutput {
    var out: LineOutput;
    out.clip_position = globals.view_proj * vec4<f32>(vertex.position, 1.0);
    out.color = vertex.color;
    return out;
}

@fragment
fn fs_line(in: LineOutput) -> @location(0) vec4<f32> {
    return in.color;
}
"#;
