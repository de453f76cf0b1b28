// Copyright 2026 the Galaxy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Fullscreen-quad star field.

use crate::backend::UniformValue::{Float, Int, Vec2};
use crate::backend::{Blend, GpuDevice, Primitive};
use crate::config::RenderConfig;
use crate::error::InitError;
use crate::field::FieldFrame;
use crate::interaction::InteractionState;
use crate::shaders;

use super::{GpuResources, set};

/// Two clip-space triangles covering the surface.
const QUAD: [[f32; 2]; 6] = [
    [-1.0, -1.0],
    [1.0, -1.0],
    [-1.0, 1.0],
    [-1.0, 1.0],
    [1.0, -1.0],
    [1.0, 1.0],
];

/// Uniforms rewritten every frame.
struct FrameUniforms<U> {
    time: Option<U>,
    star_speed: Option<U>,
    resolution: Option<U>,
    mouse: Option<U>,
    mouse_active: Option<U>,
}

/// Draws the procedural star field on one quad.
///
/// No per-star state exists on the CPU; everything visible is computed in
/// the fragment program from the grid-cell hashes.
pub struct ProceduralRenderer<D: GpuDevice> {
    config: RenderConfig,
    uniforms: FrameUniforms<D::Uniform>,
    resolution: [f32; 2],
    last_frame: Option<FieldFrame>,
}

impl<D: GpuDevice> ProceduralRenderer<D> {
    pub(super) fn new(
        config: &RenderConfig,
        device: &mut D,
        resources: &mut GpuResources<D>,
    ) -> Result<Self, InitError> {
        let fragment = shaders::procedural_fragment(config);
        let program = resources.program(device, shaders::PROCEDURAL_VERTEX, &fragment)?;
        let quad = resources.buffer(device, bytemuck::cast_slice(&QUAD), "quad buffer")?;

        let program = resources.program_at(program);
        device.use_program(program);
        device.bind_attribute(program, "aPosition", resources.buffer_at(quad), 2);

        let repulsion = config.repulsion();
        let statics = [
            ("uFocal", Vec2(config.focal)),
            ("uRotation", Vec2(config.rotation)),
            ("uDensity", Float(config.density)),
            ("uHueShift", Float(config.hue_shift)),
            ("uSpeed", Float(config.speed)),
            ("uGlowIntensity", Float(config.glow_intensity)),
            ("uSaturation", Float(config.saturation)),
            ("uRepulsionMode", Int(repulsion.mode_code())),
            ("uRepulsionAmount", Float(repulsion.amount())),
            ("uTwinkleIntensity", Float(config.twinkle_intensity)),
            ("uRotationSpeed", Float(config.rotation_speed)),
            ("uPulseIntensity", Float(config.pulse_intensity)),
            ("uGlitterChance", Float(config.glitter_chance)),
            ("uTransparent", Int(i32::from(config.transparent))),
        ];
        for (name, value) in statics {
            let location = device.uniform_location(program, name);
            set(device, location.as_ref(), value);
        }

        let uniforms = FrameUniforms {
            time: device.uniform_location(program, "uTime"),
            star_speed: device.uniform_location(program, "uStarSpeed"),
            resolution: device.uniform_location(program, "uResolution"),
            mouse: device.uniform_location(program, "uMouse"),
            mouse_active: device.uniform_location(program, "uMouseActiveFactor"),
        };
        let blend = if config.transparent {
            Blend::Additive
        } else {
            Blend::Off
        };
        device.set_blend(blend);

        Ok(Self {
            config: config.clone(),
            uniforms,
            resolution: [0.0, 0.0],
            last_frame: None,
        })
    }

    pub(super) fn resize(&mut self, device: &mut D, width: u32, height: u32) {
        let resolution = [width as f32, height as f32];
        self.resolution = resolution;
        set(device, self.uniforms.resolution.as_ref(), Vec2(resolution));
    }

    pub(super) fn draw(
        &mut self,
        device: &mut D,
        elapsed_ms: f64,
        interaction: &mut InteractionState,
    ) {
        let pointer = interaction.smoothed_pointer();
        #[expect(
            clippy::cast_possible_truncation,
            reason = "uniforms are single precision"
        )]
        let (mouse, active) = (
            [pointer.x as f32, pointer.y as f32],
            interaction.smoothed_active() as f32,
        );
        let frame = FieldFrame::at(&self.config, elapsed_ms, self.resolution)
            .with_pointer(mouse, active);

        let u = &self.uniforms;
        set(device, u.time.as_ref(), Float(frame.time));
        set(device, u.star_speed.as_ref(), Float(frame.star_speed));
        set(device, u.mouse.as_ref(), Vec2(frame.mouse));
        set(device, u.mouse_active.as_ref(), Float(frame.mouse_active));

        device.clear();
        device.draw(Primitive::Triangles, QUAD.len());
        self.last_frame = Some(frame);
    }

    /// Drawing-buffer size the resolution uniform was last set to.
    #[must_use]
    pub fn resolution(&self) -> [f32; 2] {
        self.resolution
    }

    /// Uniform values of the most recent draw.
    #[must_use]
    pub fn last_frame(&self) -> Option<&FieldFrame> {
        self.last_frame.as_ref()
    }
}

impl<D: GpuDevice> core::fmt::Debug for ProceduralRenderer<D> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ProceduralRenderer")
            .field("twinkle", &self.config.twinkle)
            .field("layers", &self.config.layer_count)
            .field("resolution", &self.resolution)
            .finish_non_exhaustive()
    }
}
