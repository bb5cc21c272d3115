//! GLSL ES 3.00 sources for the WebGL2 pipeline.

/// Fullscreen triangle generated from `gl_VertexID`; no vertex buffers.
pub const VERTEX_SHADER: &str = r#"#version 300 es
void main() {
    vec2 p = vec2(float((gl_VertexID & 1) * 4 - 1), float((gl_VertexID >> 1) * 4 - 1));
    gl_Position = vec4(p, 0.0, 1.0);
}
"#;

/// Dot grid. `dotColor` and `bgColor` arrive in linear light; the output is
/// sRGB encoded because the default framebuffer is not.
pub const FRAGMENT_SHADER: &str = r#"#version 300 es
precision highp float;

uniform float time;
uniform vec2 resolution;
uniform vec3 dotColor;
uniform vec3 bgColor;
uniform sampler2D mouseTrail;
uniform float rotation;
uniform float gridSize;
uniform float dotOpacity;

out vec4 fragColor;

vec2 rotate(vec2 uv, float angle) {
    float s = sin(angle);
    float c = cos(angle);
    mat2 rotationMatrix = mat2(c, -s, s, c);
    return rotationMatrix * (uv - 0.5) + 0.5;
}

vec2 coverUv(vec2 uv) {
    vec2 s = resolution.xy / max(resolution.x, resolution.y);
    vec2 newUv = (uv - 0.5) * s + 0.5;
    return clamp(newUv, 0.0, 1.0);
}

float sdfCircle(vec2 p, float r) {
    return length(p - 0.5) - r;
}

vec3 linearToSrgb(vec3 c) {
    vec3 lo = c * 12.92;
    vec3 hi = 1.055 * pow(c, vec3(1.0 / 2.4)) - 0.055;
    return mix(lo, hi, step(vec3(0.0031308), c));
}

void main() {
    vec2 screenUv = gl_FragCoord.xy / resolution;
    vec2 uv = coverUv(screenUv);

    vec2 rotatedUv = rotate(uv, rotation);

    vec2 gridUv = fract(rotatedUv * gridSize);
    vec2 cellCenter = rotate((floor(rotatedUv * gridSize) + 0.5) / gridSize, -rotation);

    float screenMask = smoothstep(0.0, 1.0, 1.0 - uv.y);
    float focalDistance = length(uv - vec2(0.7, 1.1));
    float focalMask = smoothstep(0.5, 1.0, focalDistance);
    float combinedMask = screenMask * focalMask;

    float wave = sin(time * 2.0 + focalDistance * 10.0);
    float trail = texture(mouseTrail, cellCenter).r;
    float scaleInfluence = max(trail * 0.5, wave * 0.3);

    float dotSize = min(pow(focalDistance, 2.0) * 0.3, 0.3);
    float sdfDot = sdfCircle(gridUv, dotSize * (1.0 + scaleInfluence * 0.5));
    float smoothDot = smoothstep(0.05, 0.0, sdfDot);

    float opacityInfluence = max(trail * 50.0, wave * 0.5);

    vec3 composition = mix(bgColor, dotColor, smoothDot * combinedMask * dotOpacity * (1.0 + opacityInfluence));
    fragColor = vec4(linearToSrgb(clamp(composition, 0.0, 1.0)), 1.0);
}
"#;

/// Uniform names the host binds, in declaration order.
pub const UNIFORMS: [&str; 8] = [
    "time",
    "resolution",
    "dotColor",
    "bgColor",
    "mouseTrail",
    "rotation",
    "gridSize",
    "dotOpacity",
];
