// Copyright (C) 2025 Dayton Fishell
// XO-CHIP display and pattern audio core
// This file is part of xochip-av.
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version. See the LICENSE file in the project root for details.
// SPDX-License-Identifier: GPL-3.0-or-later

//! Two-plane indexed display renderer.
//!
//! The emulation core keeps two bit planes; each cell's palette index is
//! `plane0 + 2 * plane1`. [`Renderer::render`] clears the target surface to
//! the background color and blits every cell as a solid square. Low
//! resolution content uses double-size cells so both modes fill a surface of
//! [`Renderer::target_size`].

pub mod palette;
pub mod planes;
pub mod surface;

pub use palette::Palette;
pub use planes::{PixelPlanes, PlaneSource};
pub use surface::{FrameBuffer, Surface};

use thiserror::Error;

/// Display resolution selected by the emulation core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayMode {
    /// 64×32 cells.
    #[default]
    Standard,
    /// 128×64 cells.
    HighRes,
}

impl DisplayMode {
    pub const fn from_hires(hires: bool) -> Self {
        if hires { Self::HighRes } else { Self::Standard }
    }

    /// Grid width and height in cells.
    pub const fn dimensions(self) -> (u32, u32) {
        match self {
            Self::Standard => (64, 32),
            Self::HighRes => (128, 64),
        }
    }

    pub const fn cell_count(self) -> usize {
        let (w, h) = self.dimensions();
        (w * h) as usize
    }

    /// Edge length of one cell on the surface for magnification `scale`.
    pub const fn cell_size(self, scale: u32) -> u32 {
        match self {
            Self::Standard => scale.saturating_mul(2),
            Self::HighRes => scale,
        }
    }
}

/// Rendering failures. Each one points at a bug in whatever produced the planes.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DisplayError {
    #[error("invalid color index {0}")]
    InvalidColor(u16),
    #[error("invalid color index {index} at cell {cell}")]
    InvalidCell { cell: usize, index: u16 },
    #[error("pixel planes hold {available} cells, {mode:?} mode needs {needed}")]
    PlaneTooShort {
        mode: DisplayMode,
        needed: usize,
        available: usize,
    },
}

/// Blits pixel planes onto a [`Surface`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Renderer {
    scale: u32,
}

impl Renderer {
    pub const DEFAULT_SCALE: u32 = 5;

    pub fn new(scale: u32) -> Self {
        Self { scale }
    }

    pub fn scale(&self) -> u32 {
        self.scale
    }

    /// Change magnification; takes effect on the next render.
    pub fn set_scale(&mut self, scale: u32) {
        log::debug!("render scale {} -> {}", self.scale, scale);
        self.scale = scale;
    }

    /// Surface size the host must provide, independent of mode.
    pub fn target_size(&self) -> (u32, u32) {
        (self.scale.saturating_mul(128), self.scale.saturating_mul(64))
    }

    /// Draw `planes` in `mode` onto `surface`, overwriting all of it.
    ///
    /// Cells are filled in ascending row-major order. An out-of-range color
    /// index stops the render at the offending cell.
    pub fn render<P, S>(
        &self,
        planes: &P,
        mode: DisplayMode,
        palette: &Palette,
        surface: &mut S,
    ) -> Result<(), DisplayError>
    where
        P: PlaneSource + ?Sized,
        S: Surface + ?Sized,
    {
        let needed = mode.cell_count();
        let available = planes.cells();
        if available < needed {
            return Err(DisplayError::PlaneTooShort {
                mode,
                needed,
                available,
            });
        }

        let (stride, _) = mode.dimensions();
        let size = mode.cell_size(self.scale);

        surface.clear(palette.background());
        for z in 0..needed {
            let index = planes.color_index(z);
            let color = palette
                .color(index)
                .map_err(|_| DisplayError::InvalidCell { cell: z, index })?;
            let x = z as u32 % stride;
            let y = z as u32 / stride;
            surface.fill_rect(
                x.saturating_mul(size),
                y.saturating_mul(size),
                size,
                size,
                color,
            );
        }
        Ok(())
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new(Self::DEFAULT_SCALE)
    }
}
