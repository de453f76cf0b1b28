// Copyright 2026 the Galaxy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Still-frame previews of the procedural field.
//!
//! [`write_ppm`] evaluates [`StarField::shade`] for every pixel and writes a
//! binary PPM (`P6`). Rows are written top to bottom, so normalized `y` runs
//! from 1 at the first row to 0 at the last, matching the fragment program.

use std::io::{self, Write};

use galaxy_core::config::RenderConfig;
use galaxy_core::field::{FieldFrame, StarField};

/// Renders one frame of the procedural field at `elapsed_ms` into `writer`.
///
/// `pointer` is the smoothed pointer in normalized coordinates together with
/// its hover activity; `None` renders the field at rest. Transparent configs
/// are composited over black.
pub fn write_ppm(
    config: &RenderConfig,
    elapsed_ms: f64,
    width: u32,
    height: u32,
    pointer: Option<([f32; 2], f32)>,
    writer: &mut dyn Write,
) -> io::Result<()> {
    let field = StarField::new(config);
    let mut frame = FieldFrame::at(config, elapsed_ms, [width as f32, height as f32]);
    if let Some((mouse, active)) = pointer {
        frame = frame.with_pointer(mouse, active);
    }

    write!(writer, "P6\n{width} {height}\n255\n")?;
    let mut row = Vec::with_capacity(width as usize * 3);
    for y in 0..height {
        row.clear();
        let v = 1.0 - (y as f32 + 0.5) / height as f32;
        for x in 0..width {
            let u = (x as f32 + 0.5) / width as f32;
            let [r, g, b, a] = field.shade(&frame, [u, v]);
            row.extend([r, g, b].map(|c| to_byte(c * a)));
        }
        writer.write_all(&row)?;
    }
    Ok(())
}

fn to_byte(c: f32) -> u8 {
    #[expect(
        clippy::cast_possible_truncation,
        reason = "value is clamped to 0..=255 before the cast"
    )]
    let byte = (c.clamp(0.0, 1.0) * 255.0).round() as u8;
    byte
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_and_payload_size() {
        let mut out = Vec::new();
        write_ppm(&RenderConfig::glitter(), 1_000.0, 8, 4, None, &mut out).unwrap();
        let header = b"P6\n8 4\n255\n";
        assert!(out.starts_with(header), "PPM header");
        assert_eq!(out.len(), header.len() + 8 * 4 * 3, "three bytes per pixel");
    }

    #[test]
    fn byte_conversion_clamps() {
        assert_eq!(to_byte(-0.5), 0);
        assert_eq!(to_byte(2.0), 255);
        assert_eq!(to_byte(0.5), 128);
    }
}
