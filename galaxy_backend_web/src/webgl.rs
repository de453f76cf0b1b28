// Copyright 2026 the Galaxy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! [`GpuDevice`] over a `WebGL2RenderingContext`.

use alloc::string::String;

use web_sys::{
    WebGl2RenderingContext as Gl, WebGlBuffer, WebGlProgram, WebGlShader, WebGlUniformLocation,
};

use galaxy_core::backend::{Blend, GpuDevice, Primitive, UniformValue};
use galaxy_core::error::ShaderStage;

/// A WebGL2 context used as a Galaxy [`GpuDevice`].
#[derive(Debug, Clone)]
pub struct WebGlDevice {
    gl: Gl,
}

impl WebGlDevice {
    /// Wraps an existing context.
    #[must_use]
    pub fn new(gl: Gl) -> Self {
        Self { gl }
    }
}

fn to_i32(v: impl TryInto<i32>) -> i32 {
    v.try_into().unwrap_or(i32::MAX)
}

impl GpuDevice for WebGlDevice {
    type Shader = WebGlShader;
    type Program = WebGlProgram;
    type Buffer = WebGlBuffer;
    type Uniform = WebGlUniformLocation;

    fn create_shader(&mut self, stage: ShaderStage, source: &str) -> Option<WebGlShader> {
        let kind = match stage {
            ShaderStage::Vertex => Gl::VERTEX_SHADER,
            ShaderStage::Fragment => Gl::FRAGMENT_SHADER,
        };
        let shader = self.gl.create_shader(kind)?;
        self.gl.shader_source(&shader, source);
        Some(shader)
    }

    fn compile_shader(&mut self, shader: &WebGlShader) -> Result<(), String> {
        self.gl.compile_shader(shader);
        let ok = self
            .gl
            .get_shader_parameter(shader, Gl::COMPILE_STATUS)
            .as_bool()
            .unwrap_or(false);
        if ok {
            Ok(())
        } else {
            Err(self.gl.get_shader_info_log(shader).unwrap_or_default())
        }
    }

    fn delete_shader(&mut self, shader: WebGlShader) {
        self.gl.delete_shader(Some(&shader));
    }

    fn create_program(&mut self) -> Option<WebGlProgram> {
        self.gl.create_program()
    }

    fn attach_shader(&mut self, program: &WebGlProgram, shader: &WebGlShader) {
        self.gl.attach_shader(program, shader);
    }

    fn link_program(&mut self, program: &WebGlProgram) -> Result<(), String> {
        self.gl.link_program(program);
        let ok = self
            .gl
            .get_program_parameter(program, Gl::LINK_STATUS)
            .as_bool()
            .unwrap_or(false);
        if ok {
            Ok(())
        } else {
            Err(self.gl.get_program_info_log(program).unwrap_or_default())
        }
    }

    fn delete_program(&mut self, program: WebGlProgram) {
        self.gl.delete_program(Some(&program));
    }

    fn create_buffer(&mut self, data: &[u8]) -> Option<WebGlBuffer> {
        let buffer = self.gl.create_buffer()?;
        self.gl.bind_buffer(Gl::ARRAY_BUFFER, Some(&buffer));
        self.gl
            .buffer_data_with_u8_array(Gl::ARRAY_BUFFER, data, Gl::STATIC_DRAW);
        Some(buffer)
    }

    fn delete_buffer(&mut self, buffer: WebGlBuffer) {
        self.gl.delete_buffer(Some(&buffer));
    }

    fn use_program(&mut self, program: &WebGlProgram) {
        self.gl.use_program(Some(program));
    }

    fn uniform_location(
        &mut self,
        program: &WebGlProgram,
        name: &str,
    ) -> Option<WebGlUniformLocation> {
        self.gl.get_uniform_location(program, name)
    }

    fn bind_attribute(
        &mut self,
        program: &WebGlProgram,
        name: &str,
        buffer: &WebGlBuffer,
        components: i32,
    ) -> bool {
        // -1 when the program has no active attribute of that name.
        let Ok(index) = u32::try_from(self.gl.get_attrib_location(program, name)) else {
            return false;
        };
        self.gl.bind_buffer(Gl::ARRAY_BUFFER, Some(buffer));
        self.gl.enable_vertex_attrib_array(index);
        self.gl
            .vertex_attrib_pointer_with_i32(index, components, Gl::FLOAT, false, 0, 0);
        true
    }

    fn set_uniform(&mut self, location: &WebGlUniformLocation, value: UniformValue) {
        let loc = Some(location);
        match value {
            UniformValue::Float(v) => self.gl.uniform1f(loc, v),
            UniformValue::Int(v) => self.gl.uniform1i(loc, v),
            UniformValue::Vec2([x, y]) => self.gl.uniform2f(loc, x, y),
            UniformValue::Vec3([x, y, z]) => self.gl.uniform3f(loc, x, y, z),
            UniformValue::Mat4(m) => self.gl.uniform_matrix4fv_with_f32_array(loc, false, &m),
        }
    }

    fn viewport(&mut self, width: u32, height: u32) {
        self.gl.viewport(0, 0, to_i32(width), to_i32(height));
    }

    fn set_blend(&mut self, blend: Blend) {
        match blend {
            Blend::Off => self.gl.disable(Gl::BLEND),
            Blend::Additive => {
                self.gl.enable(Gl::BLEND);
                self.gl.blend_func(Gl::SRC_ALPHA, Gl::ONE);
            }
            Blend::Alpha => {
                self.gl.enable(Gl::BLEND);
                self.gl.blend_func(Gl::SRC_ALPHA, Gl::ONE_MINUS_SRC_ALPHA);
            }
        }
    }

    fn clear(&mut self) {
        self.gl.clear_color(0.0, 0.0, 0.0, 0.0);
        self.gl.clear(Gl::COLOR_BUFFER_BIT);
    }

    fn draw(&mut self, primitive: Primitive, count: usize) {
        let mode = match primitive {
            Primitive::Triangles => Gl::TRIANGLES,
            Primitive::Points => Gl::POINTS,
        };
        self.gl.draw_arrays(mode, 0, to_i32(count));
    }

    fn is_context_lost(&self) -> bool {
        self.gl.is_context_lost()
    }
}
