// Copyright 2026 the Galaxy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Reading [`RenderOptions`] from a JS options object.
//!
//! Keys are camelCase. Missing, unknown or mistyped keys are ignored, so a
//! caller can pass `{ hueShift: "red" }` and get the preset hue.

use alloc::string::String;
use alloc::vec::Vec;

use js_sys::{Array, Reflect};
use wasm_bindgen::JsValue;

use galaxy_core::config::{MAX_PARTICLES, RenderOptions, Strategy, TwinkleModel};

/// Reads every recognized key of `options` into a [`RenderOptions`].
///
/// Non-object values produce the defaults.
#[must_use]
pub fn read_options(options: &JsValue) -> RenderOptions {
    if !options.is_object() {
        return RenderOptions::default();
    }
    let o = options;
    RenderOptions {
        strategy: string(o, "strategy").and_then(|s| parse_strategy(&s)),
        twinkle: string(o, "variant").and_then(|s| parse_variant(&s)),
        layer_count: count(o, "layerCount", 8).and_then(|n| u32::try_from(n).ok()),
        density: float(o, "density"),
        hue_shift: float(o, "hueShift"),
        saturation: float(o, "saturation"),
        glow_intensity: float(o, "glowIntensity"),
        twinkle_intensity: float(o, "twinkleIntensity"),
        pulse_intensity: float(o, "pulseIntensity"),
        glitter_chance: float(o, "glitterChance"),
        speed: float(o, "speed"),
        star_speed: float(o, "starSpeed"),
        rotation_speed: float(o, "rotationSpeed"),
        rotation: pair(o, "rotation"),
        focal: pair(o, "focal"),
        mouse_interaction: boolean(o, "mouseInteraction"),
        mouse_repulsion: boolean(o, "mouseRepulsion"),
        repulsion_strength: float(o, "repulsionStrength"),
        auto_center_repulsion: float(o, "autoCenterRepulsion"),
        transparent: boolean(o, "transparent"),
        pointer_lerp: float(o, "pointerLerp"),
        max_fps: number(o, "maxFps"),
        particle_count: count(o, "particleCount", MAX_PARTICLES),
        particle_spread: float(o, "particleSpread"),
        particle_base_size: float(o, "particleBaseSize"),
        size_randomness: float(o, "sizeRandomness"),
        particle_colors: strings(o, "particleColors"),
        camera_distance: float(o, "cameraDistance"),
        alpha_particles: boolean(o, "alphaParticles"),
        move_particles_on_hover: boolean(o, "moveParticlesOnHover"),
        particle_hover_factor: float(o, "particleHoverFactor"),
        disable_rotation: boolean(o, "disableRotation"),
    }
}

/// Whether `options.debug` asks for lifecycle messages on the console.
#[must_use]
pub fn wants_debug(options: &JsValue) -> bool {
    options.is_object() && boolean(options, "debug").unwrap_or(false)
}

/// `"procedural"` or `"particles"`.
pub(crate) fn parse_strategy(name: &str) -> Option<Strategy> {
    match name {
        "procedural" => Some(Strategy::Procedural),
        "particles" => Some(Strategy::PointCloud),
        _ => None,
    }
}

/// `"glitter"` or `"gloss"`.
pub(crate) fn parse_variant(name: &str) -> Option<TwinkleModel> {
    match name {
        "glitter" => Some(TwinkleModel::Glitter),
        "gloss" => Some(TwinkleModel::Gloss),
        _ => None,
    }
}

/// Rounds a JS number to a count in `1..=max`.
pub(crate) fn to_count(v: f64, max: usize) -> Option<usize> {
    if !v.is_finite() || v < 1.0 {
        return None;
    }
    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "positive and clamped below the target range"
    )]
    let n = v.round().min(max as f64) as usize;
    Some(n)
}

fn get(o: &JsValue, key: &str) -> Option<JsValue> {
    Reflect::get(o, &JsValue::from_str(key))
        .ok()
        .filter(|v| !v.is_undefined() && !v.is_null())
}

fn number(o: &JsValue, key: &str) -> Option<f64> {
    get(o, key)?.as_f64()
}

fn float(o: &JsValue, key: &str) -> Option<f32> {
    #[expect(
        clippy::cast_possible_truncation,
        reason = "uniforms are single precision"
    )]
    let v = number(o, key).map(|v| v as f32);
    v
}

fn count(o: &JsValue, key: &str, max: usize) -> Option<usize> {
    to_count(number(o, key)?, max)
}

fn boolean(o: &JsValue, key: &str) -> Option<bool> {
    get(o, key)?.as_bool()
}

fn string(o: &JsValue, key: &str) -> Option<String> {
    get(o, key)?.as_string()
}

fn pair(o: &JsValue, key: &str) -> Option<[f32; 2]> {
    let v = get(o, key)?;
    if !Array::is_array(&v) {
        return None;
    }
    let a = Array::from(&v);
    #[expect(
        clippy::cast_possible_truncation,
        reason = "uniforms are single precision"
    )]
    let pair = [a.get(0).as_f64()? as f32, a.get(1).as_f64()? as f32];
    Some(pair)
}

fn strings(o: &JsValue, key: &str) -> Option<Vec<String>> {
    let v = get(o, key)?;
    if !Array::is_array(&v) {
        return None;
    }
    Some(Array::from(&v).iter().filter_map(|s| s.as_string()).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strategy_and_variant_names() {
        assert_eq!(parse_strategy("particles"), Some(Strategy::PointCloud));
        assert_eq!(parse_strategy("procedural"), Some(Strategy::Procedural));
        assert_eq!(
            parse_strategy("Particles"),
            None,
            "names are case sensitive"
        );
        assert_eq!(parse_variant("gloss"), Some(TwinkleModel::Gloss));
        assert_eq!(parse_variant("sparkle"), None);
    }

    #[test]
    fn counts_round_and_clamp() {
        assert_eq!(to_count(199.6, 1000), Some(200));
        assert_eq!(to_count(5_000.0, 1000), Some(1000), "clamped to max");
        assert_eq!(to_count(0.0, 1000), None, "zero is rejected");
        assert_eq!(to_count(f64::NAN, 1000), None, "NaN is rejected");
    }
}
