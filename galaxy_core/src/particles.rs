// Copyright 2026 the Galaxy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! CPU-side particle synthesis for the point-cloud strategy.
//!
//! Particles are generated once at mount and uploaded as three static vertex
//! buffers. They are never rewritten; all motion happens in the vertex
//! program.

use alloc::vec::Vec;
#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use rand::Rng;

use crate::color::Rgb;

/// Immutable particle attributes in upload layout.
#[derive(Clone, Debug, PartialEq)]
pub struct ParticleCloud {
    positions: Vec<[f32; 3]>,
    randoms: Vec<[f32; 4]>,
    colors: Vec<[f32; 3]>,
}

impl ParticleCloud {
    /// Generates `count` particles inside the unit ball.
    ///
    /// Each position is rejection-sampled from the cube `[-1, 1]³` until its
    /// squared length lies in `(0, 1]`, then scaled by the cube root of a
    /// fresh uniform draw. Every particle also gets four independent uniform
    /// seeds and a color picked uniformly from `palette` (white if empty).
    pub fn generate<R: Rng + ?Sized>(count: usize, palette: &[Rgb], rng: &mut R) -> Self {
        let mut positions = Vec::with_capacity(count);
        let mut randoms = Vec::with_capacity(count);
        let mut colors = Vec::with_capacity(count);

        for _ in 0..count {
            let p = loop {
                let p = [
                    rng.random::<f32>() * 2.0 - 1.0,
                    rng.random::<f32>() * 2.0 - 1.0,
                    rng.random::<f32>() * 2.0 - 1.0,
                ];
                let len2 = p[0] * p[0] + p[1] * p[1] + p[2] * p[2];
                if len2 > 0.0 && len2 <= 1.0 {
                    break p;
                }
            };
            let r = rng.random::<f32>().cbrt();
            positions.push([p[0] * r, p[1] * r, p[2] * r]);

            randoms.push([rng.random(), rng.random(), rng.random(), rng.random()]);

            let color = if palette.is_empty() {
                Rgb::WHITE
            } else {
                palette[rng.random_range(0..palette.len())]
            };
            colors.push(color.to_array());
        }

        Self {
            positions,
            randoms,
            colors,
        }
    }

    /// Number of particles.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Returns `true` if the cloud has no particles.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Unit-ball positions.
    #[must_use]
    pub fn positions(&self) -> &[[f32; 3]] {
        &self.positions
    }

    /// Per-particle seeds, each component uniform in `[0, 1)`.
    #[must_use]
    pub fn randoms(&self) -> &[[f32; 4]] {
        &self.randoms
    }

    /// Per-particle RGB colors.
    #[must_use]
    pub fn colors(&self) -> &[[f32; 3]] {
        &self.colors
    }

    /// Position buffer contents as bytes.
    #[must_use]
    pub fn position_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.positions)
    }

    /// Seed buffer contents as bytes.
    #[must_use]
    pub fn random_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.randoms)
    }

    /// Color buffer contents as bytes.
    #[must_use]
    pub fn color_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.colors)
    }
}
