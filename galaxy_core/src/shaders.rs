// Copyright 2026 the Galaxy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! GLSL ES 3.00 programs for both strategies.
//!
//! The procedural fragment program is assembled per mount so the layer count
//! and twinkle model are compile-time constants in the shader.

use alloc::format;
use alloc::string::String;

use crate::config::{RenderConfig, TwinkleModel};

/// Fullscreen-quad vertex program. `aPosition` spans clip space.
pub const PROCEDURAL_VERTEX: &str = r"#version 300 es
in vec2 aPosition;
out vec2 vUv;
void main() {
  vUv = aPosition * 0.5 + 0.5;
  gl_Position = vec4(aPosition, 0.0, 1.0);
}
";

const PROCEDURAL_FRAGMENT_BODY: &str = r"
precision highp float;

uniform float uTime;
uniform vec2 uResolution;
uniform vec2 uFocal;
uniform vec2 uRotation;
uniform float uStarSpeed;
uniform float uDensity;
uniform float uHueShift;
uniform float uSpeed;
uniform vec2 uMouse;
uniform float uGlowIntensity;
uniform float uSaturation;
uniform int uRepulsionMode;
uniform float uRepulsionAmount;
uniform float uTwinkleIntensity;
uniform float uRotationSpeed;
uniform float uMouseActiveFactor;
uniform float uPulseIntensity;
uniform float uGlitterChance;
uniform bool uTransparent;

in vec2 vUv;
out vec4 fragColor;

#define STAR_COLOR_CUTOFF 0.2
#define PERIOD 3.0
#define MAT45 mat2(0.7071, -0.7071, 0.7071, 0.7071)

float Hash21(vec2 p) {
  p = fract(p * vec2(123.34, 456.21));
  p += dot(p, p + 45.32);
  return fract(p.x * p.y);
}

float tri(float x) {
  return abs(fract(x) * 2.0 - 1.0);
}

float tris(float x) {
  float t = fract(x);
  return 1.0 - smoothstep(0.0, 1.0, abs(2.0 * t - 1.0));
}

float trisn(float x) {
  return 2.0 * tris(x) - 1.0;
}

float smoothNoise(float x) {
  return sin(x) * 0.5 + 0.5;
}

vec3 hsv2rgb(vec3 c) {
  vec4 K = vec4(1.0, 2.0 / 3.0, 1.0 / 3.0, 3.0);
  vec3 p = abs(fract(c.xxx + K.xyz) * 6.0 - K.www);
  return c.z * mix(K.xxx, clamp(p - K.xxx, 0.0, 1.0), c.y);
}

float Star(vec2 uv, float flare, float intensity) {
  float d = length(uv);
  float glow = uGlowIntensity * intensity;
  float m = (0.05 * glow) / d;
  float rays = smoothstep(0.0, 1.0, 1.0 - abs(uv.x * uv.y * 1000.0));
  m += rays * flare * glow;
  uv *= MAT45;
  rays = smoothstep(0.0, 1.0, 1.0 - abs(uv.x * uv.y * 1000.0));
  m += rays * 0.3 * flare * glow;
  m *= smoothstep(1.0, 0.2, d);
  return m;
}

vec3 StarColor(vec2 si, float seed) {
  float red = smoothstep(STAR_COLOR_CUTOFF, 1.0, Hash21(si + 1.0)) + STAR_COLOR_CUTOFF;
  float blu = smoothstep(STAR_COLOR_CUTOFF, 1.0, Hash21(si + 3.0)) + STAR_COLOR_CUTOFF;
  float grn = min(red, blu) * seed;
  vec3 base = vec3(red, grn, blu);
  float hue = atan(base.g - base.r, base.b - base.r) / (2.0 * 3.14159265) + 0.5;
  hue = fract(hue + uHueShift / 360.0);
  float sat = length(base - vec3(dot(base, vec3(0.299, 0.587, 0.114)))) * uSaturation;
  float val = max(max(base.r, base.g), base.b);
  return hsv2rgb(vec3(hue, sat, val));
}

vec3 StarLayer(vec2 uv) {
  vec3 col = vec3(0.0);
  vec2 gv = fract(uv) - 0.5;
  vec2 id = floor(uv);
  float t = uTime * uSpeed;

  for (int y = -1; y <= 1; y++) {
    for (int x = -1; x <= 1; x++) {
      vec2 offset = vec2(float(x), float(y));
      vec2 si = id + offset;
      float seed = Hash21(si);
      float size = fract(seed * 345.32);
      vec3 color = StarColor(si, seed);

#ifdef GLOSS
      float gloss = tri(uStarSpeed / (PERIOD * seed + 1.0));
      float flareSize = smoothstep(0.9, 1.0, size) * gloss;
      vec2 pad = vec2(tris(seed * 34.0 + t / 10.0), tris(seed * 38.0 + t / 30.0)) - 0.5;
      float star = Star(gv - offset - pad, flareSize, 1.0);
      float twinkle = trisn(t + seed * 6.2831) * 0.5 + 1.0;
      star *= mix(1.0, twinkle, uTwinkleIntensity);
      col += star * size * color;
#else
      vec2 staticPos = vec2(Hash21(si + 10.0) - 0.5, Hash21(si + 20.0) - 0.5) * 0.3;

      float glitter = 1.0;
      if (Hash21(si + 100.0) < uGlitterChance) {
        glitter = mix(0.3, 1.5, smoothNoise(t * (2.0 + seed * 3.0)) * 0.5 + 0.5);
      }
      float pulseFreq = 0.5 + Hash21(si + 200.0) * 1.5;
      float pulse = smoothNoise(t * pulseFreq + seed * 6.28) * 0.5 + 0.5;
      pulse = mix(1.0 - uPulseIntensity, 1.0 + uPulseIntensity, pulse);
      float intensity = glitter * pulse;

      float flareSize = smoothstep(0.9, 1.0, size) * intensity;
      float star = Star(gv - offset - staticPos, flareSize, intensity);
      float twinkle = smoothNoise(t * 0.3 + seed * 6.2831) * 0.5 + 0.5;
      star *= mix(1.0 - uTwinkleIntensity * 0.3, 1.0 + uTwinkleIntensity * 0.3, twinkle);
      col += star * size * color * intensity;
#endif
    }
  }
  return col;
}

void main() {
  vec2 focalPx = uFocal * uResolution;
  vec2 uv = (vUv * uResolution - focalPx) / uResolution.y;

  if (uRepulsionMode == 0) {
    float dist = length(uv);
    if (dist > 0.0) {
      uv += normalize(uv) * (uRepulsionAmount / (dist + 0.1)) * 0.05;
    }
  } else if (uRepulsionMode == 1) {
    vec2 mouseUV = (uMouse * uResolution - focalPx) / uResolution.y;
    vec2 delta = uv - mouseUV;
    float dist = length(delta);
    if (dist > 0.0) {
      uv += normalize(delta) * (uRepulsionAmount / (dist + 0.1)) * 0.05 * uMouseActiveFactor;
    }
  } else {
    uv += (uMouse - vec2(0.5)) * 0.1 * uMouseActiveFactor;
  }

  float angle = uTime * uRotationSpeed;
  uv = mat2(cos(angle), -sin(angle), sin(angle), cos(angle)) * uv;
  uv = mat2(uRotation.x, -uRotation.y, uRotation.y, uRotation.x) * uv;

  vec3 col = vec3(0.0);
  for (int k = 0; k < NUM_LAYER; k++) {
    float i = float(k) / float(NUM_LAYER);
#ifdef GLOSS
    float depth = fract(i + uStarSpeed * uSpeed);
    float scale = mix(20.0 * uDensity, 0.5 * uDensity, depth);
    float fade = depth * smoothstep(1.0, 0.9, depth);
#else
    float depth = fract(i);
    float scale = mix(15.0 * uDensity, 0.8 * uDensity, depth);
    float fade = (1.0 - depth) * smoothstep(0.0, 0.1, depth);
#endif
    col += StarLayer(uv * scale + i * 453.32) * fade;
  }

  float alpha = 1.0;
  if (uTransparent) {
    alpha = min(smoothstep(0.0, 0.3, length(col)), 1.0);
  }
  fragColor = vec4(col, alpha);
}
";

/// Assembles the procedural fragment program for `config`.
#[must_use]
pub fn procedural_fragment(config: &RenderConfig) -> String {
    let model = match config.twinkle {
        TwinkleModel::Glitter => "",
        TwinkleModel::Gloss => "#define GLOSS\n",
    };
    format!(
        "#version 300 es\n#define NUM_LAYER {}\n{model}{PROCEDURAL_FRAGMENT_BODY}",
        config.layer_count.clamp(1, 8)
    )
}

/// Point-cloud vertex program.
///
/// Attributes: `position` (unit ball), `random` (four seeds), `color`.
pub const POINT_CLOUD_VERTEX: &str = r"#version 300 es
in vec3 position;
in vec4 random;
in vec3 color;

uniform mat4 modelMatrix;
uniform mat4 viewMatrix;
uniform mat4 projectionMatrix;
uniform float uTime;
uniform float uSpread;
uniform float uBaseSize;
uniform float uSizeRandomness;

out vec4 vRandom;
out vec3 vColor;

void main() {
  vRandom = random;
  vColor = color;

  vec3 pos = position * uSpread;
  pos.z *= 10.0;

  vec4 mPos = modelMatrix * vec4(pos, 1.0);
  float t = uTime;
  mPos.x += sin(t * random.z + 6.28 * random.w) * mix(0.1, 1.5, random.x);
  mPos.y += sin(t * random.y + 6.28 * random.x) * mix(0.1, 1.5, random.w);
  mPos.z += sin(t * random.w + 6.28 * random.y) * mix(0.1, 1.5, random.z);

  vec4 mvPos = viewMatrix * mPos;
  if (uSizeRandomness == 0.0) {
    gl_PointSize = uBaseSize;
  } else {
    gl_PointSize = (uBaseSize * (1.0 + uSizeRandomness * (random.x - 0.5))) / length(mvPos.xyz);
  }
  gl_Position = projectionMatrix * mvPos;
}
";

/// Point-cloud fragment program: hard or soft circular sprites.
pub const POINT_CLOUD_FRAGMENT: &str = r"#version 300 es
precision highp float;

uniform float uTime;
uniform bool uAlphaParticles;

in vec4 vRandom;
in vec3 vColor;
out vec4 fragColor;

void main() {
  vec2 uv = gl_PointCoord.xy;
  float d = length(uv - vec2(0.5));
  vec3 wobble = vColor + 0.2 * sin(uv.yxx + uTime + vRandom.y * 6.28);

  if (uAlphaParticles) {
    fragColor = vec4(wobble, smoothstep(0.5, 0.4, d) * 0.8);
  } else {
    if (d > 0.5) {
      discard;
    }
    fragColor = vec4(wobble, 1.0);
  }
}
";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fragment_defines_follow_config() {
        let glitter = procedural_fragment(&RenderConfig::glitter());
        assert!(
            glitter.starts_with("#version 300 es\n"),
            "version must come first"
        );
        assert!(glitter.contains("#define NUM_LAYER 3\n"));
        assert!(!glitter.contains("#define GLOSS"));

        let gloss = procedural_fragment(&RenderConfig::gloss());
        assert!(gloss.contains("#define NUM_LAYER 4\n"));
        assert!(gloss.contains("#define GLOSS\n"));
    }

    #[test]
    fn point_cloud_attributes_are_declared() {
        for name in ["in vec3 position;", "in vec4 random;", "in vec3 color;"] {
            assert!(POINT_CLOUD_VERTEX.contains(name), "missing {name}");
        }
    }
}
