// Copyright (C) 2025 Dayton Fishell
// XO-CHIP display and pattern audio core
// This file is part of xochip-av.
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version. See the LICENSE file in the project root for details.
// SPDX-License-Identifier: GPL-3.0-or-later

use bitvec::prelude::*;

use super::DisplayMode;

/// Read access to a pair of pixel planes.
pub trait PlaneSource {
    /// Number of cells in the shorter of the two planes.
    fn cells(&self) -> usize;

    /// Value of plane `plane` (0 or 1) at cell `z`.
    fn cell(&self, plane: usize, z: usize) -> u8;

    /// Palette index of cell `z`, widened so out-of-range plane values
    /// cannot wrap back into `[0, 3]`.
    fn color_index(&self, z: usize) -> u16 {
        self.cell(0, z) as u16 + 2 * self.cell(1, z) as u16
    }
}

/// Two bit planes sized for the high-resolution grid.
///
/// Standard mode only uses the first 64×32 cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelPlanes {
    planes: [BitVec<u8, Lsb0>; 2],
}

impl PixelPlanes {
    pub const LEN: usize = DisplayMode::HighRes.cell_count();

    pub fn new() -> Self {
        Self {
            planes: [bitvec![u8, Lsb0; 0; Self::LEN], bitvec![u8, Lsb0; 0; Self::LEN]],
        }
    }

    pub fn get(&self, plane: usize, z: usize) -> bool {
        self.planes[plane & 1].get(z).is_some_and(|bit| *bit)
    }

    pub fn set(&mut self, plane: usize, z: usize, value: bool) {
        if let Some(mut bit) = self.planes[plane & 1].get_mut(z) {
            *bit = value;
        }
    }

    /// Set both planes at cell `z` from a palette index.
    pub fn set_index(&mut self, z: usize, index: u8) {
        self.set(0, z, index & 0x01 != 0);
        self.set(1, z, index & 0x02 != 0);
    }

    pub fn clear(&mut self) {
        self.planes.iter_mut().for_each(|plane| plane.fill(false));
    }

    pub fn plane(&self, plane: usize) -> &BitSlice<u8, Lsb0> {
        &self.planes[plane & 1]
    }
}

impl Default for PixelPlanes {
    fn default() -> Self {
        Self::new()
    }
}

impl PlaneSource for PixelPlanes {
    fn cells(&self) -> usize {
        Self::LEN
    }

    fn cell(&self, plane: usize, z: usize) -> u8 {
        self.get(plane, z) as u8
    }
}

/// Byte-per-pixel planes as kept by the emulation core.
impl PlaneSource for [&[u8]; 2] {
    fn cells(&self) -> usize {
        self[0].len().min(self[1].len())
    }

    fn cell(&self, plane: usize, z: usize) -> u8 {
        self[plane][z]
    }
}

impl PlaneSource for [Vec<u8>; 2] {
    fn cells(&self) -> usize {
        self[0].len().min(self[1].len())
    }

    fn cell(&self, plane: usize, z: usize) -> u8 {
        self[plane][z]
    }
}
