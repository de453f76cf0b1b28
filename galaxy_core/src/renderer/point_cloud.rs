// Copyright 2026 the Galaxy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Particle point cloud.
//!
//! Particles are uploaded once; each frame only rewrites the model matrix
//! and the time uniform. Per-particle drift happens in the vertex program.

use rand::Rng;

use crate::backend::UniformValue::{self, Float, Int};
use crate::backend::{Blend, GpuDevice, Primitive};
use crate::config::RenderConfig;
use crate::error::InitError;
use crate::interaction::InteractionState;
use crate::math::{Mat4, Vec3};
use crate::particles::ParticleCloud;
use crate::shaders;

use super::{GpuResources, set};

/// Vertical field of view of the camera, in degrees.
const FOV_Y_DEGREES: f32 = 15.0;

const NEAR: f32 = 0.1;
const FAR: f32 = 100.0;

struct Uniforms<U> {
    model: Option<U>,
    projection: Option<U>,
    time: Option<U>,
}

/// Draws a static particle buffer under a per-frame model transform.
pub struct PointCloudRenderer<D: GpuDevice> {
    uniforms: Uniforms<D::Uniform>,
    count: usize,
    speed: f32,
    hover: Option<f32>,
    rotate: bool,
    view: Mat4,
    projection: Mat4,
    model: Mat4,
    aspect: f32,
}

impl<D: GpuDevice> PointCloudRenderer<D> {
    pub(super) fn new<R: Rng + ?Sized>(
        config: &RenderConfig,
        device: &mut D,
        resources: &mut GpuResources<D>,
        rng: &mut R,
    ) -> Result<Self, InitError> {
        let cloud = ParticleCloud::generate(config.particle_count, &config.particle_colors, rng);

        let program = resources.program(
            device,
            shaders::POINT_CLOUD_VERTEX,
            shaders::POINT_CLOUD_FRAGMENT,
        )?;
        let positions = resources.buffer(device, cloud.position_bytes(), "position buffer")?;
        let randoms = resources.buffer(device, cloud.random_bytes(), "random buffer")?;
        let colors = resources.buffer(device, cloud.color_bytes(), "color buffer")?;

        let program = resources.program_at(program);
        device.use_program(program);
        device.bind_attribute(program, "position", resources.buffer_at(positions), 3);
        device.bind_attribute(program, "random", resources.buffer_at(randoms), 4);
        device.bind_attribute(program, "color", resources.buffer_at(colors), 3);

        let eye = Vec3::new(0.0, 0.0, config.camera_distance);
        let view = Mat4::look_at(eye, Vec3::ZERO, Vec3::Y);
        let statics = [
            ("viewMatrix", UniformValue::Mat4(view.to_cols_array())),
            ("uSpread", Float(config.particle_spread)),
            ("uBaseSize", Float(config.particle_base_size)),
            ("uSizeRandomness", Float(config.size_randomness)),
            ("uAlphaParticles", Int(i32::from(config.alpha_particles))),
        ];
        for (name, value) in statics {
            let location = device.uniform_location(program, name);
            set(device, location.as_ref(), value);
        }

        let uniforms = Uniforms {
            model: device.uniform_location(program, "modelMatrix"),
            projection: device.uniform_location(program, "projectionMatrix"),
            time: device.uniform_location(program, "uTime"),
        };
        device.set_blend(Blend::Alpha);

        Ok(Self {
            uniforms,
            count: cloud.len(),
            speed: config.speed,
            hover: config
                .move_particles_on_hover
                .then_some(config.particle_hover_factor),
            rotate: !config.disable_rotation,
            view,
            projection: Mat4::IDENTITY,
            model: Mat4::IDENTITY,
            aspect: 1.0,
        })
    }

    pub(super) fn resize(&mut self, device: &mut D, width: u32, height: u32) {
        let aspect = if height == 0 {
            1.0
        } else {
            width as f32 / height as f32
        };
        self.aspect = aspect;
        self.projection = Mat4::perspective(FOV_Y_DEGREES.to_radians(), aspect, NEAR, FAR);
        set(
            device,
            self.uniforms.projection.as_ref(),
            UniformValue::Mat4(self.projection.to_cols_array()),
        );
    }

    pub(super) fn draw(
        &mut self,
        device: &mut D,
        elapsed_ms: f64,
        interaction: &mut InteractionState,
    ) {
        let scaled_ms = elapsed_ms * f64::from(self.speed);

        let mut model = Mat4::IDENTITY;
        if let Some(factor) = self.hover {
            let p = interaction.smoothed_pointer();
            #[expect(
                clippy::cast_possible_truncation,
                reason = "matrix math is single precision"
            )]
            let (x, y) = (p.x as f32, p.y as f32);
            model = Mat4::from_translation(Vec3::new(-x * factor, -y * factor, 0.0));
        }
        if self.rotate {
            interaction.advance_rotation(scaled_ms);
            let r = interaction.rotation();
            model = model
                * Mat4::from_rotation_x(r.x)
                * Mat4::from_rotation_y(r.y)
                * Mat4::from_rotation_z(r.z);
        }
        self.model = model;

        #[expect(
            clippy::cast_possible_truncation,
            reason = "uniforms are single precision"
        )]
        let time = (scaled_ms * 0.001) as f32;
        let u = &self.uniforms;
        let cols = model.to_cols_array();
        set(device, u.model.as_ref(), UniformValue::Mat4(cols));
        set(device, u.time.as_ref(), Float(time));

        device.clear();
        device.draw(Primitive::Points, self.count);
    }

    /// Width over height of the current projection.
    #[must_use]
    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    /// Current projection matrix.
    #[must_use]
    pub fn projection(&self) -> Mat4 {
        self.projection
    }

    /// Fixed view matrix.
    #[must_use]
    pub fn view(&self) -> Mat4 {
        self.view
    }

    /// Model matrix of the most recent draw.
    #[must_use]
    pub fn model(&self) -> Mat4 {
        self.model
    }

    /// Number of particles drawn per frame.
    #[must_use]
    pub fn count(&self) -> usize {
        self.count
    }
}

impl<D: GpuDevice> core::fmt::Debug for PointCloudRenderer<D> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PointCloudRenderer")
            .field("count", &self.count)
            .field("aspect", &self.aspect)
            .field("rotate", &self.rotate)
            .finish_non_exhaustive()
    }
}
