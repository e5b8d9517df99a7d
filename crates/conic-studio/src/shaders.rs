//! WGSL sources for the demo drawables.
//!
//! Every shader starts with the camera prelude, which mirrors the engine's
//! camera block (20 floats) and its cone-back projection.

const CAMERA: &str = r#"
struct Camera {
    cone_back: f32,
    ratio: f32,
    look_distance: f32,
    scale: f32,
    forward: vec3<f32>,
    upward: vec3<f32>,
    rightward: vec3<f32>,
    position: vec3<f32>,
};

@group(0) @binding(0) var<uniform> camera: Camera;

// Projects a world point to clip space. `half_size` is half the surface in pixels.
fn project(point: vec3<f32>, half_size: vec2<f32>) -> vec4<f32> {
    let v = point - camera.position;
    let look = camera.forward * camera.look_distance;
    let r = dot(v, look) / dot(look, look);
    let depth = r * camera.scale;
    if (depth <= -0.8 * camera.cone_back) {
        return vec4<f32>(0.0, 0.0, 2.0, 1.0);
    }
    let k = (camera.cone_back + 1.0) / (r + camera.cone_back);
    let x = -dot(v, camera.rightward) * k * camera.scale;
    let y = dot(v, camera.upward) * k * camera.scale;
    let d = depth + camera.cone_back;
    return vec4<f32>(x / half_size.x, y / half_size.y, d / (d + 1.0), 1.0);
}
"#;

const TRIANGLE: &str = r#"
struct Params {
    // half width, half height, time, highlight
    screen: vec4<f32>,
    offset: vec4<f32>,
};

@group(0) @binding(1) var<uniform> params: Params;

struct VertexOut {
    @builtin(position) clip: vec4<f32>,
    @location(0) color: vec4<f32>,
};

@vertex
fn vertex_main(@location(0) position: vec4<f32>, @location(1) color: vec4<f32>) -> VertexOut {
    var out: VertexOut;
    out.clip = project(position.xyz + params.offset.xyz, params.screen.xy);
    let glow = params.screen.w * (0.5 + 0.5 * sin(params.screen.z * 6.0));
    out.color = vec4<f32>(mix(color.rgb, vec3<f32>(1.0), glow * 0.6), color.a);
    return out;
}

@fragment
fn fragment_main(in: VertexOut) -> @location(0) vec4<f32> {
    return in.color;
}
"#;

const PARTICLES: &str = r#"
struct Params {
    screen: vec4<f32>,
};

struct Particle {
    // xyz position, w point size in pixels
    pos: vec4<f32>,
    // w angular speed around +Y
    vel: vec4<f32>,
};

@group(0) @binding(1) var<uniform> params: Params;
@group(1) @binding(0) var<storage, read> particles_in: array<Particle>;
@group(1) @binding(1) var<storage, read_write> particles_out: array<Particle>;

@compute @workgroup_size(64)
fn compute_main(@builtin(global_invocation_id) id: vec3<u32>) {
    let i = id.x;
    if (i >= arrayLength(&particles_in)) {
        return;
    }
    let p = particles_in[i];
    let a = p.vel.w * 0.016;
    let c = cos(a);
    let s = sin(a);
    let x = p.pos.x * c - p.pos.z * s;
    let z = p.pos.x * s + p.pos.z * c;
    particles_out[i] = Particle(vec4<f32>(x, p.pos.y, z, p.pos.w), p.vel);
}

struct VertexOut {
    @builtin(position) clip: vec4<f32>,
    @location(0) color: vec4<f32>,
    @location(1) corner: vec2<f32>,
};

@vertex
fn vertex_main(
    @location(0) pos: vec4<f32>,
    @location(1) vel: vec4<f32>,
    @location(2) corner: vec2<f32>,
) -> VertexOut {
    var out: VertexOut;
    let center = project(pos.xyz, params.screen.xy);
    out.clip = vec4<f32>(center.xy + corner * pos.w / params.screen.xy, center.z, 1.0);
    let tint = 0.5 + 0.5 * sin(vel.w * 3.0 + params.screen.z);
    out.color = vec4<f32>(0.35 + 0.4 * tint, 0.6, 1.0, 0.85);
    out.corner = corner;
    return out;
}

@fragment
fn fragment_main(in: VertexOut) -> @location(0) vec4<f32> {
    let d = length(in.corner);
    if (d > 1.0) {
        discard;
    }
    return vec4<f32>(in.color.rgb, in.color.a * (1.0 - d));
}
"#;

pub fn triangle() -> String {
    format!("{CAMERA}{TRIANGLE}")
}

pub fn particles() -> String {
    format!("{CAMERA}{PARTICLES}")
}
