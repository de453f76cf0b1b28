// Copyright 2026 the Galaxy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Initialization failures.

use alloc::string::String;
use core::fmt;

/// Which program stage a shader belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    /// Vertex program.
    Vertex,
    /// Fragment program.
    Fragment,
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Vertex => "vertex",
            Self::Fragment => "fragment",
        })
    }
}

/// Why a mount did not reach the running state.
///
/// Every variant is detected synchronously while mounting. Resources created
/// before the failure are released before the error is returned.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InitError {
    /// No compatible rendering context is available.
    ContextUnavailable,
    /// The host has no measurable surface to draw into.
    InvalidSurface,
    /// A shader failed to compile; `log` is the driver's info log.
    ShaderCompile {
        /// Stage of the failing shader.
        stage: ShaderStage,
        /// Driver diagnostic text.
        log: String,
    },
    /// The program failed to link; `log` is the driver's info log.
    ProgramLink {
        /// Driver diagnostic text.
        log: String,
    },
    /// The device refused to create the named resource.
    ResourceAllocation(&'static str),
    /// `mount` was called on an instance that is not uninitialized.
    AlreadyMounted,
}

impl fmt::Display for InitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ContextUnavailable => f.write_str("no WebGL2 context available"),
            Self::InvalidSurface => f.write_str("container has no drawable surface"),
            Self::ShaderCompile { stage, log } => {
                write!(f, "{stage} shader failed to compile: {log}")
            }
            Self::ProgramLink { log } => write!(f, "program failed to link: {log}"),
            Self::ResourceAllocation(what) => write!(f, "failed to allocate {what}"),
            Self::AlreadyMounted => f.write_str("instance was already mounted"),
        }
    }
}

impl core::error::Error for InitError {}
