// Copyright 2026 the Galaxy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The two rendering strategies and the GPU resources they own.
//!
//! [`Renderer::build`] is the factory: it picks the strategy from the
//! config, creates every GPU object through a [`GpuResources`] ledger and
//! returns a renderer ready to draw. If any step fails, the ledger still
//! holds whatever was created so the caller can release it.

mod point_cloud;
mod procedural;

pub use point_cloud::PointCloudRenderer;
pub use procedural::ProceduralRenderer;

use alloc::vec::Vec;
use rand::Rng;

use crate::backend::{GpuDevice, UniformValue};
use crate::config::{RenderConfig, Strategy};
use crate::error::{InitError, ShaderStage};
use crate::interaction::InteractionState;

/// Every GPU object created for one mount.
///
/// Objects are recorded as soon as they exist, so a failure halfway through
/// initialization leaves nothing unaccounted for.
pub struct GpuResources<D: GpuDevice> {
    shaders: Vec<D::Shader>,
    programs: Vec<D::Program>,
    buffers: Vec<D::Buffer>,
}

impl<D: GpuDevice> GpuResources<D> {
    /// Creates an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self {
            shaders: Vec::new(),
            programs: Vec::new(),
            buffers: Vec::new(),
        }
    }

    /// Number of live objects.
    #[must_use]
    pub fn len(&self) -> usize {
        self.shaders.len() + self.programs.len() + self.buffers.len()
    }

    /// Returns `true` if nothing is live.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Deletes every recorded object exactly once and returns how many were
    /// deleted. Calling it again deletes nothing.
    pub fn release(&mut self, device: &mut D) -> usize {
        let released = self.len();
        for buffer in self.buffers.drain(..) {
            device.delete_buffer(buffer);
        }
        for program in self.programs.drain(..) {
            device.delete_program(program);
        }
        for shader in self.shaders.drain(..) {
            device.delete_shader(shader);
        }
        released
    }

    /// Creates a static buffer and records it. The returned index is stable
    /// until [`release`](Self::release).
    fn buffer(
        &mut self,
        device: &mut D,
        data: &[u8],
        what: &'static str,
    ) -> Result<usize, InitError> {
        let buffer = device
            .create_buffer(data)
            .ok_or(InitError::ResourceAllocation(what))?;
        self.buffers.push(buffer);
        Ok(self.buffers.len() - 1)
    }

    fn shader(
        &mut self,
        device: &mut D,
        stage: ShaderStage,
        source: &str,
    ) -> Result<usize, InitError> {
        let what = match stage {
            ShaderStage::Vertex => "vertex shader",
            ShaderStage::Fragment => "fragment shader",
        };
        let shader = device
            .create_shader(stage, source)
            .ok_or(InitError::ResourceAllocation(what))?;
        self.shaders.push(shader);
        let index = self.shaders.len() - 1;
        device
            .compile_shader(&self.shaders[index])
            .map_err(|log| InitError::ShaderCompile { stage, log })?;
        Ok(index)
    }

    /// Compiles and links a program from two sources, recording every
    /// object it creates.
    fn program(
        &mut self,
        device: &mut D,
        vertex: &str,
        fragment: &str,
    ) -> Result<usize, InitError> {
        let vs = self.shader(device, ShaderStage::Vertex, vertex)?;
        let fs = self.shader(device, ShaderStage::Fragment, fragment)?;
        let program = device
            .create_program()
            .ok_or(InitError::ResourceAllocation("program"))?;
        self.programs.push(program);
        let index = self.programs.len() - 1;

        let program = &self.programs[index];
        device.attach_shader(program, &self.shaders[vs]);
        device.attach_shader(program, &self.shaders[fs]);
        device
            .link_program(program)
            .map_err(|log| InitError::ProgramLink { log })?;
        Ok(index)
    }

    fn program_at(&self, index: usize) -> &D::Program {
        &self.programs[index]
    }

    fn buffer_at(&self, index: usize) -> &D::Buffer {
        &self.buffers[index]
    }
}

impl<D: GpuDevice> Default for GpuResources<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: GpuDevice> core::fmt::Debug for GpuResources<D> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("GpuResources")
            .field("shaders", &self.shaders.len())
            .field("programs", &self.programs.len())
            .field("buffers", &self.buffers.len())
            .finish()
    }
}

/// One mounted strategy.
pub enum Renderer<D: GpuDevice> {
    /// Fullscreen quad with the per-pixel star field.
    Procedural(ProceduralRenderer<D>),
    /// CPU-generated particle cloud.
    PointCloud(PointCloudRenderer<D>),
}

impl<D: GpuDevice> Renderer<D> {
    /// Builds the renderer `config` selects.
    ///
    /// # Errors
    ///
    /// Any [`InitError`] from shader compilation, program linking or
    /// resource creation. Objects created before the failure stay in
    /// `resources`.
    pub fn build<R: Rng + ?Sized>(
        config: &RenderConfig,
        device: &mut D,
        resources: &mut GpuResources<D>,
        rng: &mut R,
    ) -> Result<Self, InitError> {
        Ok(match config.strategy {
            Strategy::Procedural => {
                Self::Procedural(ProceduralRenderer::new(config, device, resources)?)
            }
            Strategy::PointCloud => {
                Self::PointCloud(PointCloudRenderer::new(config, device, resources, rng)?)
            }
        })
    }

    /// Updates resolution-dependent state after the drawing buffer changed.
    pub fn resize(&mut self, device: &mut D, width: u32, height: u32) {
        match self {
            Self::Procedural(r) => r.resize(device, width, height),
            Self::PointCloud(r) => r.resize(device, width, height),
        }
    }

    /// Uploads the per-frame uniforms and issues one draw call.
    pub fn draw(&mut self, device: &mut D, elapsed_ms: f64, interaction: &mut InteractionState) {
        match self {
            Self::Procedural(r) => r.draw(device, elapsed_ms, interaction),
            Self::PointCloud(r) => r.draw(device, elapsed_ms, interaction),
        }
    }
}

impl<D: GpuDevice> core::fmt::Debug for Renderer<D> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Procedural(r) => f.debug_tuple("Procedural").field(r).finish(),
            Self::PointCloud(r) => f.debug_tuple("PointCloud").field(r).finish(),
        }
    }
}

/// Uploads `value` if the program uses the uniform.
fn set<D: GpuDevice>(device: &mut D, location: Option<&D::Uniform>, value: UniformValue) {
    if let Some(location) = location {
        device.set_uniform(location, value);
    }
}
