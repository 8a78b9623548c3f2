pub(crate) const MESH_SHADER: &str = r#"
const MAX_LIGHTS: u32 = 8u;

const KIND_AMBIENT: u32 = 0u;
const KIND_DIRECTIONAL: u32 = 1u;
const KIND_HEMISPHERE: u32 = 2u;
const KIND_POINT: u32 = 3u;
const KIND_SPOT: u32 = 4u;
const KIND_RECT_AREA: u32 = 5u;

struct GpuLight {
    color: vec4<f32>,
    position: vec4<f32>,
    direction: vec4<f32>,
    params: vec4<f32>,
    extra: vec4<f32>,
}

struct GlobalUniform {
    view_proj: mat4x4<f32>,
    camera_position: vec4<f32>,
    light_count: vec4<u32>,
    lights: array<GpuLight, 8>,
}

struct ObjectConstants {
    model: mat4x4<f32>,
    normal: mat3x4<f32>,
    color: vec4<f32>,
    material: vec4<f32>,
}

@group(0) @binding(0)
var<uniform> globals: GlobalUniform;

@group(1) @binding(0)
var<uniform> object: ObjectConstants;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
}

struct VertexOutput {
    @builtin(position) position: vec4<f32>,
    @location(0) world_pos: vec3<f32>,
    @location(1) normal: vec3<f32>,
}

@vertex
fn vs_main(input: VertexInput) -> VertexOutput {
    var out: VertexOutput;
    let world_position = object.model * vec4<f32>(input.position, 1.0);
    out.position = globals.view_proj * world_position;
    out.world_pos = world_position.xyz;

    let world_normal = mat3x3<f32>(
        object.normal[0].xyz,
        object.normal[1].xyz,
        object.normal[2].xyz
    ) * input.normal;

    out.normal = normalize(world_normal);
    return out;
}

fn distance_attenuation(dist: f32, cutoff: f32, decay: f32) -> f32 {
    var falloff = 1.0 / max(pow(max(dist, 1e-4), decay), 0.01);
    if (cutoff > 0.0) {
        let ratio = saturate(1.0 - pow(dist / cutoff, 4.0));
        falloff = falloff * ratio * ratio;
    }
    return falloff;
}

fn direct(
    normal: vec3<f32>,
    view_dir: vec3<f32>,
    light_dir: vec3<f32>,
    radiance: vec3<f32>,
    albedo: vec3<f32>,
    roughness: f32,
    metalness: f32,
) -> vec3<f32> {
    let n_dot_l = max(dot(normal, light_dir), 0.0);
    if (n_dot_l <= 0.0) {
        return vec3<f32>(0.0);
    }
    let half_dir = normalize(light_dir + view_dir);
    let alpha = max(roughness * roughness, 0.02);
    let shininess = min(2.0 / (alpha * alpha) - 2.0, 2048.0);
    let specular_color = mix(vec3<f32>(0.04), albedo, metalness);
    let diffuse_color = albedo * (1.0 - metalness);
    let specular = pow(max(dot(normal, half_dir), 0.0), shininess) * (shininess + 2.0) / 8.0;
    return (diffuse_color + specular_color * specular) * radiance * n_dot_l;
}

@fragment
fn fs_main(input: VertexOutput) -> @location(0) vec4<f32> {
    let normal = normalize(input.normal);
    let view_dir = normalize(globals.camera_position.xyz - input.world_pos);
    let albedo = object.color.rgb;
    let roughness = clamp(object.material.x, 0.0, 1.0);
    let metalness = clamp(object.material.y, 0.0, 1.0);

    var color = vec3<f32>(0.0);
    let count = min(globals.light_count.x, MAX_LIGHTS);
    for (var i = 0u; i < count; i = i + 1u) {
        let emitter = globals.lights[i];
        let kind = u32(emitter.position.w + 0.5);
        let radiance = emitter.color.rgb * emitter.color.w;

        if (kind == KIND_AMBIENT) {
            color += albedo * (1.0 - metalness) * radiance;
        } else if (kind == KIND_HEMISPHERE) {
            let weight = 0.5 * dot(normal, emitter.direction.xyz) + 0.5;
            let sky = emitter.color.rgb;
            let ground = emitter.extra.rgb;
            color += albedo * (1.0 - metalness) * mix(ground, sky, weight) * emitter.color.w;
        } else if (kind == KIND_DIRECTIONAL) {
            let light_dir = -emitter.direction.xyz;
            color += direct(normal, view_dir, light_dir, radiance, albedo, roughness, metalness);
        } else if (kind == KIND_POINT || kind == KIND_SPOT) {
            let to_light = emitter.position.xyz - input.world_pos;
            let dist = length(to_light);
            let light_dir = to_light / max(dist, 1e-4);
            var falloff = distance_attenuation(dist, emitter.direction.w, emitter.params.x);
            if (kind == KIND_SPOT) {
                let cos_theta = dot(-light_dir, emitter.direction.xyz);
                falloff = falloff * smoothstep(emitter.params.y, max(emitter.params.z, emitter.params.y + 1e-4), cos_theta);
            }
            color += direct(normal, view_dir, light_dir, radiance * falloff, albedo, roughness, metalness);
        } else if (kind == KIND_RECT_AREA) {
            // Closest point on the rectangle stands in for the whole emitter.
            let forward = emitter.direction.xyz;
            let right = emitter.extra.xyz;
            let up = cross(right, forward);
            let offset = input.world_pos - emitter.position.xyz;
            let half_width = emitter.params.x * 0.5;
            let half_height = emitter.params.y * 0.5;
            let closest = emitter.position.xyz
                + right * clamp(dot(offset, right), -half_width, half_width)
                + up * clamp(dot(offset, up), -half_height, half_height);
            let to_light = closest - input.world_pos;
            let dist = max(length(to_light), 1e-4);
            let light_dir = to_light / dist;
            let facing = max(dot(-light_dir, forward), 0.0);
            let area = emitter.params.x * emitter.params.y;
            let falloff = facing * area / (dist * dist + area);
            color += direct(normal, view_dir, light_dir, radiance * falloff, albedo, roughness, metalness);
        }
    }

    return vec4<f32>(color, object.color.a);
}
"#;

pub(crate) const LINE_SHADER: &str = r#"
struct GlobalUniform {
    view_proj: mat4x4<f32>,
}

@group(0) @binding(0)
var<uniform> globals: GlobalUniform;

struct LineInput {
    @location(0) position: vec3<f32>,
    @location(1) color: vec3<f32>,
}

struct LineOutput {
    @builtin(position) position: vec4<f32>,
    @location(0) color: vec3<f32>,
}

@vertex
fn vs_line(input: LineInput) -> LineOutput {
    var out: LineOutput;
    out.position = globals.view_proj * vec4<f32>(input.position, 1.0);
    out.color = input.color;
    return out;
}

@fragment
fn fs_line(input: LineOutput) -> @location(0) vec4<f32> {
    return vec4<f32>(input.color, 1.0);
}
"#;
