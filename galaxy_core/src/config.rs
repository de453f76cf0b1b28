// Copyright 2026 the Galaxy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Mount-time configuration.
//!
//! [`RenderConfig`] is the immutable snapshot a mounted instance renders
//! with. Hosts build it from a partial [`RenderOptions`] with
//! [`RenderConfig::from_options`], which picks a preset from the requested
//! strategy and twinkle model and overlays every field the caller set.
//! Changing visuals means remounting with a new config.

use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;

use crate::color::Rgb;

/// Upper bound on generated particles.
pub const MAX_PARTICLES: usize = 1_000_000;

/// Which rendering strategy draws the background.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// One fullscreen quad; stars are computed per pixel.
    #[default]
    Procedural,
    /// A GPU point cloud of CPU-generated particles.
    PointCloud,
}

/// How procedural stars vary in brightness over time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TwinkleModel {
    /// Static star positions with probabilistic glitter and a slow pulse.
    ///
    /// Three static parallax layers.
    #[default]
    Glitter,
    /// Period-based gloss tied to the star-speed phase, with drifting stars
    /// and layers that scroll in depth.
    ///
    /// Four parallax layers.
    Gloss,
}

/// The pointer interaction applied to procedural UVs, resolved from the
/// config by precedence.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Repulsion {
    /// Push stars away from the focal center, scaled by the factor.
    AutoCenter(f32),
    /// Push stars away from the smoothed pointer, scaled by the strength.
    Mouse(f32),
    /// Shift the field slightly with the pointer offset from center.
    Passive,
}

impl Repulsion {
    /// Integer code consumed by the fragment program's `uRepulsionMode`.
    #[must_use]
    pub const fn mode_code(self) -> i32 {
        match self {
            Self::AutoCenter(_) => 0,
            Self::Mouse(_) => 1,
            Self::Passive => 2,
        }
    }

    /// The scalar that goes with the mode (zero for passive).
    #[must_use]
    pub const fn amount(self) -> f32 {
        match self {
            Self::AutoCenter(k) | Self::Mouse(k) => k,
            Self::Passive => 0.0,
        }
    }
}

/// Every tunable of a mounted background.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderConfig {
    /// Rendering strategy.
    pub strategy: Strategy,

    // -- procedural field --------------------------------------------------
    /// Twinkle model for procedural stars.
    pub twinkle: TwinkleModel,
    /// Number of parallax layers (clamped to 1..=8).
    pub layer_count: u32,
    /// Grid density multiplier.
    pub density: f32,
    /// Hue rotation in degrees; any value, wrapped mod 360.
    pub hue_shift: f32,
    /// Saturation multiplier.
    pub saturation: f32,
    /// Star glow and flare strength.
    pub glow_intensity: f32,
    /// Twinkle amplitude (0 disables).
    pub twinkle_intensity: f32,
    /// Pulse amplitude for the glitter model.
    pub pulse_intensity: f32,
    /// Probability that a star glitters (glitter model).
    pub glitter_chance: f32,
    /// Global animation speed multiplier.
    pub speed: f32,
    /// Star-speed phase rate (gloss model depth scrolling).
    pub star_speed: f32,
    /// Continuous field rotation in radians per time unit.
    pub rotation_speed: f32,
    /// Static rotation as `(cos, sin)`.
    pub rotation: [f32; 2],
    /// Field origin in normalized surface coordinates.
    pub focal: [f32; 2],
    /// Whether pointer listeners are registered at all.
    pub mouse_interaction: bool,
    /// Push stars away from the pointer.
    pub mouse_repulsion: bool,
    /// Strength of pointer repulsion.
    pub repulsion_strength: f32,
    /// Strength of center repulsion; positive values take precedence over
    /// pointer repulsion.
    pub auto_center_repulsion: f32,
    /// Output alpha follows star brightness instead of being opaque.
    pub transparent: bool,

    // -- loop and interaction ----------------------------------------------
    /// Pointer smoothing factor per executed frame, in `(0, 1]`.
    pub pointer_lerp: f32,
    /// Frame-rate cap; `None` runs at display rate.
    pub max_fps: Option<f64>,

    // -- point cloud -------------------------------------------------------
    /// Number of particles to generate.
    pub particle_count: usize,
    /// World-space scale applied to unit-ball positions.
    pub particle_spread: f32,
    /// Base point size in pixels (before depth scaling).
    pub particle_base_size: f32,
    /// Per-particle size jitter; 0 draws constant-size points.
    pub size_randomness: f32,
    /// Palette particles pick their color from.
    pub particle_colors: Vec<Rgb>,
    /// Distance of the camera from the origin along +Z.
    pub camera_distance: f32,
    /// Soft-edged, translucent particles instead of hard discs.
    pub alpha_particles: bool,
    /// Translate the cloud away from the pointer.
    pub move_particles_on_hover: bool,
    /// Scale of the hover translation.
    pub particle_hover_factor: f32,
    /// Freeze the cloud's rotation.
    pub disable_rotation: bool,
}

impl RenderConfig {
    /// Procedural field with glitter and pulse twinkling, capped at 60 Hz.
    #[must_use]
    pub fn glitter() -> Self {
        Self {
            strategy: Strategy::Procedural,
            twinkle: TwinkleModel::Glitter,
            layer_count: 3,
            density: 1.0,
            hue_shift: 140.0,
            saturation: 0.0,
            glow_intensity: 0.3,
            twinkle_intensity: 0.5,
            pulse_intensity: 0.3,
            glitter_chance: 0.15,
            speed: 1.0,
            star_speed: 0.5,
            rotation_speed: 0.0,
            rotation: [1.0, 0.0],
            focal: [0.5, 0.5],
            mouse_interaction: true,
            mouse_repulsion: true,
            repulsion_strength: 2.0,
            auto_center_repulsion: 0.0,
            transparent: true,
            pointer_lerp: 0.03,
            max_fps: Some(60.0),
            ..Self::particle_defaults()
        }
    }

    /// Procedural field with gloss twinkling, drifting stars and depth
    /// scrolling, at display rate.
    #[must_use]
    pub fn gloss() -> Self {
        Self {
            twinkle: TwinkleModel::Gloss,
            layer_count: 4,
            twinkle_intensity: 0.3,
            rotation_speed: 0.1,
            pointer_lerp: 0.05,
            max_fps: None,
            ..Self::glitter()
        }
    }

    /// Point cloud of 200 white particles.
    #[must_use]
    pub fn particles() -> Self {
        Self {
            strategy: Strategy::PointCloud,
            speed: 0.1,
            mouse_interaction: true,
            pointer_lerp: 0.05,
            max_fps: None,
            ..Self::glitter()
        }
    }

    fn particle_defaults() -> Self {
        Self {
            strategy: Strategy::Procedural,
            twinkle: TwinkleModel::Glitter,
            layer_count: 3,
            density: 1.0,
            hue_shift: 0.0,
            saturation: 0.0,
            glow_intensity: 0.0,
            twinkle_intensity: 0.0,
            pulse_intensity: 0.0,
            glitter_chance: 0.0,
            speed: 1.0,
            star_speed: 0.0,
            rotation_speed: 0.0,
            rotation: [1.0, 0.0],
            focal: [0.5, 0.5],
            mouse_interaction: false,
            mouse_repulsion: false,
            repulsion_strength: 0.0,
            auto_center_repulsion: 0.0,
            transparent: true,
            pointer_lerp: 0.05,
            max_fps: None,
            particle_count: 200,
            particle_spread: 10.0,
            particle_base_size: 100.0,
            size_randomness: 1.0,
            particle_colors: vec![Rgb::WHITE],
            camera_distance: 20.0,
            alpha_particles: false,
            move_particles_on_hover: false,
            particle_hover_factor: 1.0,
            disable_rotation: false,
        }
    }

    /// Builds a config by overlaying `o` on the matching preset.
    ///
    /// The preset is [`particles`](Self::particles) for the point-cloud
    /// strategy, [`gloss`](Self::gloss) for the gloss twinkle model, and
    /// [`glitter`](Self::glitter) otherwise. Non-finite or out-of-range
    /// values keep the preset's value.
    #[must_use]
    pub fn from_options(o: &RenderOptions) -> Self {
        let mut c = match (o.strategy, o.twinkle) {
            (Some(Strategy::PointCloud), _) => Self::particles(),
            (_, Some(TwinkleModel::Gloss)) => Self::gloss(),
            _ => Self::glitter(),
        };
        if let Some(twinkle) = o.twinkle {
            c.twinkle = twinkle;
        }

        overlay(&mut c.density, o.density, positive);
        overlay(&mut c.hue_shift, o.hue_shift, any);
        overlay(&mut c.saturation, o.saturation, non_neg);
        overlay(&mut c.glow_intensity, o.glow_intensity, non_neg);
        overlay(&mut c.twinkle_intensity, o.twinkle_intensity, non_neg);
        overlay(&mut c.pulse_intensity, o.pulse_intensity, non_neg);
        overlay(&mut c.glitter_chance, o.glitter_chance, non_neg);
        overlay(&mut c.speed, o.speed, any);
        overlay(&mut c.star_speed, o.star_speed, any);
        overlay(&mut c.rotation_speed, o.rotation_speed, any);
        overlay(&mut c.repulsion_strength, o.repulsion_strength, any);
        overlay(&mut c.auto_center_repulsion, o.auto_center_repulsion, any);
        overlay(&mut c.pointer_lerp, o.pointer_lerp, |v| v > 0.0 && v <= 1.0);
        overlay(&mut c.particle_spread, o.particle_spread, any);
        overlay(&mut c.particle_base_size, o.particle_base_size, non_neg);
        overlay(&mut c.size_randomness, o.size_randomness, non_neg);
        overlay(&mut c.camera_distance, o.camera_distance, positive);
        overlay(&mut c.particle_hover_factor, o.particle_hover_factor, any);

        if let Some(layers) = o.layer_count {
            c.layer_count = layers.clamp(1, 8);
        }
        if let Some(rotation) = o.rotation.filter(|r| r.iter().all(|v| v.is_finite())) {
            c.rotation = rotation;
        }
        if let Some(focal) = o.focal.filter(|f| f.iter().all(|v| v.is_finite())) {
            c.focal = focal;
        }
        if let Some(max_fps) = o.max_fps {
            c.max_fps = (max_fps.is_finite() && max_fps > 0.0).then_some(max_fps);
        }
        if let Some(count) = o.particle_count {
            c.particle_count = count.clamp(1, MAX_PARTICLES);
        }
        if let Some(colors) = &o.particle_colors {
            let decoded: Vec<Rgb> = colors
                .iter()
                .map(|hex| Rgb::from_hex(hex).unwrap_or(Rgb::WHITE))
                .collect();
            if !decoded.is_empty() {
                c.particle_colors = decoded;
            }
        }

        let flags = [
            (&mut c.mouse_interaction, o.mouse_interaction),
            (&mut c.mouse_repulsion, o.mouse_repulsion),
            (&mut c.transparent, o.transparent),
            (&mut c.alpha_particles, o.alpha_particles),
            (&mut c.move_particles_on_hover, o.move_particles_on_hover),
            (&mut c.disable_rotation, o.disable_rotation),
        ];
        for (field, value) in flags {
            if let Some(v) = value {
                *field = v;
            }
        }
        c
    }

    /// Resolves the pointer interaction mode.
    ///
    /// Auto-center repulsion wins when its factor is positive, then pointer
    /// repulsion when enabled, then the passive parallax offset.
    #[must_use]
    pub fn repulsion(&self) -> Repulsion {
        if self.auto_center_repulsion > 0.0 {
            Repulsion::AutoCenter(self.auto_center_repulsion)
        } else if self.mouse_repulsion {
            Repulsion::Mouse(self.repulsion_strength)
        } else {
            Repulsion::Passive
        }
    }

    /// Whether pointer listeners should be registered for this config.
    #[must_use]
    pub fn wants_pointer(&self) -> bool {
        match self.strategy {
            Strategy::Procedural => self.mouse_interaction,
            Strategy::PointCloud => self.mouse_interaction && self.move_particles_on_hover,
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self::glitter()
    }
}

fn overlay(field: &mut f32, value: Option<f32>, accept: fn(f32) -> bool) {
    if let Some(v) = value
        && v.is_finite()
        && accept(v)
    {
        *field = v;
    }
}

fn any(_: f32) -> bool {
    true
}

fn non_neg(v: f32) -> bool {
    v >= 0.0
}

fn positive(v: f32) -> bool {
    v > 0.0
}

/// Caller-supplied overrides; every `None` keeps the preset value.
#[derive(Clone, Debug, Default, PartialEq)]
#[expect(
    missing_docs,
    reason = "each field overrides the RenderConfig field of the same name"
)]
pub struct RenderOptions {
    pub strategy: Option<Strategy>,
    pub twinkle: Option<TwinkleModel>,
    pub layer_count: Option<u32>,
    pub density: Option<f32>,
    pub hue_shift: Option<f32>,
    pub saturation: Option<f32>,
    pub glow_intensity: Option<f32>,
    pub twinkle_intensity: Option<f32>,
    pub pulse_intensity: Option<f32>,
    pub glitter_chance: Option<f32>,
    pub speed: Option<f32>,
    pub star_speed: Option<f32>,
    pub rotation_speed: Option<f32>,
    pub rotation: Option<[f32; 2]>,
    pub focal: Option<[f32; 2]>,
    pub mouse_interaction: Option<bool>,
    pub mouse_repulsion: Option<bool>,
    pub repulsion_strength: Option<f32>,
    pub auto_center_repulsion: Option<f32>,
    pub transparent: Option<bool>,
    pub pointer_lerp: Option<f32>,
    pub max_fps: Option<f64>,
    pub particle_count: Option<usize>,
    pub particle_spread: Option<f32>,
    pub particle_base_size: Option<f32>,
    pub size_randomness: Option<f32>,
    /// Hex strings; malformed entries decode to white.
    pub particle_colors: Option<Vec<String>>,
    pub camera_distance: Option<f32>,
    pub alpha_particles: Option<bool>,
    pub move_particles_on_hover: Option<bool>,
    pub particle_hover_factor: Option<f32>,
    pub disable_rotation: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn empty_options_give_glitter_preset() {
        let c = RenderConfig::from_options(&RenderOptions::default());
        assert_eq!(c, RenderConfig::glitter());
        assert_eq!(c.layer_count, 3);
        assert_eq!(c.max_fps, Some(60.0));
    }

    #[test]
    fn strategy_and_twinkle_pick_presets() {
        let gloss = RenderConfig::from_options(&RenderOptions {
            twinkle: Some(TwinkleModel::Gloss),
            ..RenderOptions::default()
        });
        assert_eq!(gloss.layer_count, 4);
        assert_eq!(gloss.rotation_speed, 0.1);

        let cloud = RenderConfig::from_options(&RenderOptions {
            strategy: Some(Strategy::PointCloud),
            ..RenderOptions::default()
        });
        assert_eq!(cloud.strategy, Strategy::PointCloud);
        assert_eq!(cloud.particle_count, 200);
        assert_eq!(cloud.speed, 0.1);
    }

    #[test]
    fn overrides_apply_and_invalid_values_are_ignored() {
        let c = RenderConfig::from_options(&RenderOptions {
            density: Some(-1.0),
            hue_shift: Some(400.0),
            camera_distance: Some(0.0),
            pointer_lerp: Some(f32::NAN),
            particle_count: Some(0),
            mouse_interaction: Some(false),
            ..RenderOptions::default()
        });
        assert_eq!(c.density, 1.0, "negative density rejected");
        assert_eq!(
            c.hue_shift, 400.0,
            "hue shift wraps later, any value accepted"
        );
        assert_eq!(c.camera_distance, 20.0, "zero camera distance rejected");
        assert_eq!(c.pointer_lerp, 0.03, "NaN lerp rejected");
        assert_eq!(c.particle_count, 1, "count clamped to at least one");
        assert!(!c.mouse_interaction);
    }

    #[test]
    fn palette_decodes_with_white_fallback() {
        let c = RenderConfig::from_options(&RenderOptions {
            particle_colors: Some(vec!["#ff0000".to_string(), "nope".to_string()]),
            ..RenderOptions::default()
        });
        assert_eq!(c.particle_colors, vec![Rgb::new(1.0, 0.0, 0.0), Rgb::WHITE]);

        let empty = RenderConfig::from_options(&RenderOptions {
            particle_colors: Some(Vec::new()),
            ..RenderOptions::default()
        });
        assert_eq!(
            empty.particle_colors,
            vec![Rgb::WHITE],
            "empty palette keeps default"
        );
    }

    #[test]
    fn auto_center_takes_precedence_over_mouse_repulsion() {
        let c = RenderConfig {
            auto_center_repulsion: 0.5,
            mouse_repulsion: true,
            ..RenderConfig::glitter()
        };
        assert_eq!(c.repulsion(), Repulsion::AutoCenter(0.5));

        let mouse = RenderConfig {
            auto_center_repulsion: 0.0,
            ..c.clone()
        };
        assert_eq!(mouse.repulsion(), Repulsion::Mouse(2.0));

        let passive = RenderConfig {
            mouse_repulsion: false,
            ..mouse
        };
        assert_eq!(passive.repulsion(), Repulsion::Passive);
    }

    #[test]
    fn point_cloud_only_listens_when_hover_is_enabled() {
        let mut c = RenderConfig::particles();
        assert!(!c.wants_pointer());
        c.move_particles_on_hover = true;
        assert!(c.wants_pointer());
        assert!(RenderConfig::glitter().wants_pointer());
    }
}
