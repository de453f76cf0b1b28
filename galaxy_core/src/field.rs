// Copyright 2026 the Galaxy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! CPU evaluation of the procedural star field.
//!
//! [`StarField::shade`] computes the same color the procedural fragment
//! program produces for one pixel. It backs unit tests of the per-pixel math
//! and the debug crate's still-frame preview. The GLSL in
//! [`shaders`](crate::shaders) is the production path; keep the two in step.

use core::f32::consts::TAU;
use core::ops::{Add, Mul, Sub};
#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;

use crate::color::{fract, hsv_to_rgb, shift_hue};
use crate::config::{RenderConfig, Repulsion, TwinkleModel};

/// Floor added to the red and blue star channels.
pub const STAR_COLOR_CUTOFF: f32 = 0.2;

/// Gloss period of the star-speed phase.
const GLOSS_PERIOD: f32 = 3.0;

/// Offset between the grid origins of successive layers.
const LAYER_OFFSET: f32 = 453.32;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
struct V2 {
    x: f32,
    y: f32,
}

impl V2 {
    const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    fn splat(v: f32) -> Self {
        Self::new(v, v)
    }

    fn dot(self, rhs: Self) -> f32 {
        self.x * rhs.x + self.y * rhs.y
    }

    fn length(self) -> f32 {
        self.dot(self).sqrt()
    }

    fn normalize_or_zero(self) -> Self {
        let len = self.length();
        if len > 0.0 {
            self * (1.0 / len)
        } else {
            Self::default()
        }
    }

    fn floor(self) -> Self {
        Self::new(self.x.floor(), self.y.floor())
    }

    fn fract(self) -> Self {
        Self::new(fract(self.x), fract(self.y))
    }

    /// `mat2(r.x, -r.y, r.y, r.x) * self` in GLSL column-major terms.
    fn rotate(self, r: Self) -> Self {
        Self::new(r.x * self.x + r.y * self.y, -r.y * self.x + r.x * self.y)
    }
}

impl Add for V2 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for V2 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f32> for V2 {
    type Output = Self;

    fn mul(self, rhs: f32) -> Self {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

/// GLSL `smoothstep`, also valid for `edge0 > edge1`.
#[must_use]
pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

fn mix(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Deterministic hash of a grid cell to `[0, 1)`.
#[must_use]
pub fn hash21(x: f32, y: f32) -> f32 {
    let mut p = V2::new(fract(x * 123.34), fract(y * 456.21));
    let d = p.dot(p + V2::splat(45.32));
    p = p + V2::splat(d);
    fract(p.x * p.y)
}

/// Triangle wave in `[0, 1]` with period 1.
#[must_use]
pub fn tri(x: f32) -> f32 {
    (fract(x) * 2.0 - 1.0).abs()
}

/// Smoothed triangle wave in `[0, 1]`.
#[must_use]
pub fn tris(x: f32) -> f32 {
    let t = fract(x);
    1.0 - smoothstep(0.0, 1.0, (2.0 * t - 1.0).abs())
}

/// Smoothed triangle wave in `[-1, 1]`.
#[must_use]
pub fn trisn(x: f32) -> f32 {
    2.0 * tris(x) - 1.0
}

fn smooth_noise(x: f32) -> f32 {
    x.sin() * 0.5 + 0.5
}

fn rays(uv: V2) -> f32 {
    smoothstep(0.0, 1.0, 1.0 - (uv.x * uv.y * 1000.0).abs())
}

/// Per-frame inputs of the procedural program.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FieldFrame {
    /// Scaled animation time (`uTime`).
    pub time: f32,
    /// Star-speed phase (`uStarSpeed`).
    pub star_speed: f32,
    /// Drawing-buffer size in pixels.
    pub resolution: [f32; 2],
    /// Smoothed pointer in normalized surface coordinates.
    pub mouse: [f32; 2],
    /// Smoothed hover activity.
    pub mouse_active: f32,
}

impl FieldFrame {
    /// Derives the time uniforms from `elapsed_ms` of wall time.
    ///
    /// The glitter model advances at half the gloss model's rate; the
    /// star-speed phase is `elapsed_s * star_speed / 10`.
    #[must_use]
    pub fn at(config: &RenderConfig, elapsed_ms: f64, resolution: [f32; 2]) -> Self {
        #[expect(
            clippy::cast_possible_truncation,
            reason = "uniforms are single precision"
        )]
        let (time, star_speed) = (
            (elapsed_ms * config.twinkle.time_scale()) as f32,
            (elapsed_ms * 0.001 * f64::from(config.star_speed) / 10.0) as f32,
        );
        Self {
            time,
            star_speed,
            resolution,
            mouse: [0.5, 0.5],
            mouse_active: 0.0,
        }
    }

    /// Same frame with the pointer uniforms set.
    #[must_use]
    pub fn with_pointer(self, mouse: [f32; 2], mouse_active: f32) -> Self {
        Self {
            mouse,
            mouse_active,
            ..self
        }
    }
}

impl TwinkleModel {
    /// Milliseconds-to-`uTime` factor.
    #[must_use]
    pub const fn time_scale(self) -> f64 {
        match self {
            Self::Glitter => 0.0005,
            Self::Gloss => 0.001,
        }
    }
}

/// Displaces centered UVs according to the resolved repulsion mode.
///
/// `mouse_uv` is the pointer in the same centered space as `uv`;
/// `mouse_offset` is the pointer minus the surface center in normalized
/// coordinates.
#[must_use]
pub fn apply_repulsion(
    uv: [f32; 2],
    repulsion: Repulsion,
    mouse_uv: [f32; 2],
    mouse_offset: [f32; 2],
    active: f32,
) -> [f32; 2] {
    let uv = V2::new(uv[0], uv[1]);
    let out = match repulsion {
        Repulsion::AutoCenter(k) => {
            let dist = uv.length();
            uv + uv.normalize_or_zero() * (k / (dist + 0.1)) * 0.05
        }
        Repulsion::Mouse(strength) => {
            let delta = uv - V2::new(mouse_uv[0], mouse_uv[1]);
            let dist = delta.length();
            uv + delta.normalize_or_zero() * (strength / (dist + 0.1)) * 0.05 * active
        }
        Repulsion::Passive => uv + V2::new(mouse_offset[0], mouse_offset[1]) * 0.1 * active,
    };
    [out.x, out.y]
}

/// The procedural field for one config.
#[derive(Clone, Debug)]
pub struct StarField {
    model: TwinkleModel,
    layers: u32,
    density: f32,
    hue_shift: f32,
    saturation: f32,
    glow: f32,
    twinkle: f32,
    pulse: f32,
    glitter_chance: f32,
    speed: f32,
    rotation_speed: f32,
    rotation: V2,
    focal: V2,
    repulsion: Repulsion,
    transparent: bool,
}

impl StarField {
    /// Captures the field parameters of `config`.
    #[must_use]
    pub fn new(config: &RenderConfig) -> Self {
        Self {
            model: config.twinkle,
            layers: config.layer_count.max(1),
            density: config.density,
            hue_shift: config.hue_shift,
            saturation: config.saturation,
            glow: config.glow_intensity,
            twinkle: config.twinkle_intensity,
            pulse: config.pulse_intensity,
            glitter_chance: config.glitter_chance,
            speed: config.speed,
            rotation_speed: config.rotation_speed,
            rotation: V2::new(config.rotation[0], config.rotation[1]),
            focal: V2::new(config.focal[0], config.focal[1]),
            repulsion: config.repulsion(),
            transparent: config.transparent,
        }
    }

    /// Color and alpha at normalized surface coordinate `v_uv`.
    #[must_use]
    pub fn shade(&self, frame: &FieldFrame, v_uv: [f32; 2]) -> [f32; 4] {
        let res = V2::new(frame.resolution[0], frame.resolution[1].max(1.0));
        let focal_px = V2::new(self.focal.x * res.x, self.focal.y * res.y);
        let centered = |p: V2| (V2::new(p.x * res.x, p.y * res.y) - focal_px) * (1.0 / res.y);

        let mouse = V2::new(frame.mouse[0], frame.mouse[1]);
        let mouse_uv = centered(mouse);
        let uv = centered(V2::new(v_uv[0], v_uv[1]));
        let uv = apply_repulsion(
            [uv.x, uv.y],
            self.repulsion,
            [mouse_uv.x, mouse_uv.y],
            [mouse.x - 0.5, mouse.y - 0.5],
            frame.mouse_active,
        );
        let mut uv = V2::new(uv[0], uv[1]);

        let angle = frame.time * self.rotation_speed;
        uv = uv.rotate(V2::new(angle.cos(), angle.sin()));
        uv = uv.rotate(self.rotation);

        let mut col = [0.0_f32; 3];
        let n = self.layers as f32;
        for k in 0..self.layers {
            let i = k as f32 / n;
            let (scale, fade) = match self.model {
                TwinkleModel::Glitter => {
                    let depth = fract(i);
                    (
                        mix(15.0 * self.density, 0.8 * self.density, depth),
                        (1.0 - depth) * smoothstep(0.0, 0.1, depth),
                    )
                }
                TwinkleModel::Gloss => {
                    let depth = fract(i + frame.star_speed * self.speed);
                    (
                        mix(20.0 * self.density, 0.5 * self.density, depth),
                        depth * smoothstep(1.0, 0.9, depth),
                    )
                }
            };
            let layer = self.layer(frame, uv * scale + V2::splat(i * LAYER_OFFSET));
            for (c, l) in col.iter_mut().zip(layer) {
                *c += l * fade;
            }
        }

        let alpha = if self.transparent {
            let len = (col[0] * col[0] + col[1] * col[1] + col[2] * col[2]).sqrt();
            smoothstep(0.0, 0.3, len).min(1.0)
        } else {
            1.0
        };
        [col[0], col[1], col[2], alpha]
    }

    #[expect(
        clippy::approx_constant,
        reason = "mirrors the fragment program's literals"
    )]
    fn star(&self, uv: V2, flare: f32, intensity: f32) -> f32 {
        let d = uv.length();
        let glow = self.glow * intensity;
        let mut m = (0.05 * glow) / d;
        m += rays(uv) * flare * glow;
        let diag = V2::new(0.7071 * (uv.x - uv.y), 0.7071 * (uv.x + uv.y));
        m += rays(diag) * 0.3 * flare * glow;
        m * smoothstep(1.0, 0.2, d)
    }

    fn star_color(&self, si: V2, seed: f32) -> [f32; 3] {
        let red = smoothstep(STAR_COLOR_CUTOFF, 1.0, hash21(si.x + 1.0, si.y + 1.0))
            + STAR_COLOR_CUTOFF;
        let blu = smoothstep(STAR_COLOR_CUTOFF, 1.0, hash21(si.x + 3.0, si.y + 3.0))
            + STAR_COLOR_CUTOFF;
        let grn = red.min(blu) * seed;

        let hue = (grn - red).atan2(blu - red) / TAU + 0.5;
        let hue = shift_hue(hue, self.hue_shift);
        let luma = red * 0.299 + grn * 0.587 + blu * 0.114;
        let (dr, dg, db) = (red - luma, grn - luma, blu - luma);
        let chroma = (dr * dr + dg * dg + db * db).sqrt();
        let sat = chroma * self.saturation;
        let val = red.max(grn).max(blu);
        hsv_to_rgb(hue, sat, val).to_array()
    }

    #[expect(
        clippy::approx_constant,
        reason = "mirrors the fragment program's literals"
    )]
    fn layer(&self, frame: &FieldFrame, uv: V2) -> [f32; 3] {
        let gv = uv.fract() - V2::splat(0.5);
        let id = uv.floor();
        let t = frame.time * self.speed;
        let mut col = [0.0_f32; 3];

        for y in -1_i8..=1 {
            for x in -1_i8..=1 {
                let offset = V2::new(f32::from(x), f32::from(y));
                let si = id + offset;
                let seed = hash21(si.x, si.y);
                let size = fract(seed * 345.32);
                let color = self.star_color(si, seed);

                let (star, weight) = match self.model {
                    TwinkleModel::Glitter => {
                        let pos = V2::new(
                            hash21(si.x + 10.0, si.y + 10.0) - 0.5,
                            hash21(si.x + 20.0, si.y + 20.0) - 0.5,
                        ) * 0.3;

                        let glitters = hash21(si.x + 100.0, si.y + 100.0) < self.glitter_chance;
                        let glitter = if glitters {
                            let phase = smooth_noise(t * (2.0 + seed * 3.0)) * 0.5 + 0.5;
                            mix(0.3, 1.5, phase)
                        } else {
                            1.0
                        };
                        let freq = 0.5 + hash21(si.x + 200.0, si.y + 200.0) * 1.5;
                        let pulse = smooth_noise(t * freq + seed * 6.28) * 0.5 + 0.5;
                        let pulse = mix(1.0 - self.pulse, 1.0 + self.pulse, pulse);
                        let intensity = glitter * pulse;

                        let flare = smoothstep(0.9, 1.0, size) * intensity;
                        let twinkle = smooth_noise(t * 0.3 + seed * 6.2831) * 0.5 + 0.5;
                        let spread = self.twinkle * 0.3;
                        let twinkle = mix(1.0 - spread, 1.0 + spread, twinkle);
                        let lit = self.star(gv - offset - pos, flare, intensity);
                        (lit * twinkle, intensity)
                    }
                    TwinkleModel::Gloss => {
                        let gloss = tri(frame.star_speed / (GLOSS_PERIOD * seed + 1.0));
                        let flare = smoothstep(0.9, 1.0, size) * gloss;
                        let pad = V2::new(
                            tris(seed * 34.0 + t / 10.0),
                            tris(seed * 38.0 + t / 30.0),
                        ) - V2::splat(0.5);
                        let twinkle = trisn(t + seed * 6.2831) * 0.5 + 1.0;
                        let twinkle = mix(1.0, twinkle, self.twinkle);
                        (self.star(gv - offset - pad, flare, 1.0) * twinkle, 1.0)
                    }
                };

                for (c, channel) in col.iter_mut().zip(color) {
                    *c += star * size * channel * weight;
                }
            }
        }
        col
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    #[test]
    fn hash_is_deterministic_and_in_range() {
        for (x, y) in [(0.0, 0.0), (3.0, -7.0), (1234.0, 98.0), (-55.0, 12.0)] {
            let h = hash21(x, y);
            assert!((0.0..1.0).contains(&h), "hash21({x}, {y}) = {h}");
            assert_eq!(h, hash21(x, y), "same cell, same hash");
        }
        assert_ne!(hash21(1.0, 2.0), hash21(2.0, 1.0), "hash is not symmetric");
    }

    #[test]
    fn triangle_waves() {
        assert!((tri(0.0) - 1.0).abs() < EPS);
        assert!(tri(0.5).abs() < EPS);
        assert!(
            (tris(0.5) - 1.0).abs() < EPS,
            "smoothed peak at half period"
        );
        assert!(tris(0.0).abs() < EPS);
        assert!((trisn(0.0) + 1.0).abs() < EPS, "trisn spans -1..1");
    }

    #[test]
    fn smoothstep_supports_reversed_edges() {
        assert_eq!(smoothstep(1.0, 0.2, 0.0), 1.0);
        assert_eq!(smoothstep(1.0, 0.2, 1.5), 0.0);
        assert!((smoothstep(0.0, 1.0, 0.5) - 0.5).abs() < EPS);
    }

    #[test]
    fn auto_center_ignores_pointer() {
        let uv = [0.3, 0.1];
        let far_pointer = [-0.4, 0.4];
        let a = apply_repulsion(uv, Repulsion::AutoCenter(1.0), far_pointer, [0.2, 0.2], 1.0);
        let b = apply_repulsion(uv, Repulsion::AutoCenter(1.0), [0.0, 0.0], [0.0, 0.0], 0.0);
        assert_eq!(a, b, "auto-center output depends only on uv and factor");
        assert!(
            a[0] > uv[0] && a[1] > uv[1],
            "pushed away from center: {a:?}"
        );
    }

    #[test]
    fn mouse_repulsion_scales_with_activity() {
        let uv = [0.3, 0.0];
        let idle = apply_repulsion(uv, Repulsion::Mouse(2.0), [0.0, 0.0], [0.0, 0.0], 0.0);
        assert_eq!(idle, uv, "no displacement without hover activity");

        let pushed = apply_repulsion(uv, Repulsion::Mouse(2.0), [0.0, 0.0], [0.0, 0.0], 1.0);
        let expected = 0.3 + (2.0 / 0.4) * 0.05;
        assert!((pushed[0] - expected).abs() < EPS, "{pushed:?}");
    }

    #[test]
    fn passive_offset_follows_pointer() {
        let out = apply_repulsion([0.0, 0.0], Repulsion::Passive, [9.0, 9.0], [0.5, -0.5], 1.0);
        assert!(
            (out[0] - 0.05).abs() < EPS && (out[1] + 0.05).abs() < EPS,
            "{out:?}"
        );
    }

    #[test]
    fn shade_is_finite_and_alpha_bounded() {
        for config in [RenderConfig::glitter(), RenderConfig::gloss()] {
            let field = StarField::new(&config);
            let frame = FieldFrame::at(&config, 1234.0, [320.0, 200.0])
                .with_pointer([0.3, 0.6], 0.8);
            for j in 0..8 {
                for i in 0..8 {
                    let uv = [(i as f32 + 0.37) / 8.0, (j as f32 + 0.61) / 8.0];
                    let px = field.shade(&frame, uv);
                    assert!(
                        px.iter().all(|v| v.is_finite()),
                        "{:?} at {uv:?}: {px:?}",
                        config.twinkle
                    );
                    assert!((0.0..=1.0).contains(&px[3]), "alpha {}", px[3]);
                }
            }
        }
    }

    #[test]
    fn opaque_output_when_not_transparent() {
        let config = RenderConfig {
            transparent: false,
            ..RenderConfig::gloss()
        };
        let frame = FieldFrame::at(&config, 0.0, [100.0, 100.0]);
        assert_eq!(StarField::new(&config).shade(&frame, [0.1, 0.9])[3], 1.0);
    }

    #[test]
    fn time_scale_differs_per_model() {
        let glitter = FieldFrame::at(&RenderConfig::glitter(), 2000.0, [1.0, 1.0]);
        let gloss = FieldFrame::at(&RenderConfig::gloss(), 2000.0, [1.0, 1.0]);
        assert!((glitter.time - 1.0).abs() < EPS, "glitter: 2s → 1.0");
        assert!((gloss.time - 2.0).abs() < EPS, "gloss: 2s → 2.0");
        assert!((gloss.star_speed - 0.1).abs() < EPS, "2s × 0.5 / 10");
    }
}
