// Copyright (C) 2025 Dayton Fishell
// XO-CHIP display and pattern audio core
// This file is part of xochip-av.
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version. See the LICENSE file in the project root for details.
// SPDX-License-Identifier: GPL-3.0-or-later

//! Sound pattern parameter block.

use super::AudioError;
use super::waveform::Waveform;

/// Internal reference rate patterns are synthesized at, in Hz.
pub const INTERNAL_RATE: u32 = 4000;

/// Number of bytes in a pattern parameter block.
pub const PATTERN_LEN: usize = 7;

/// Hz per unit of the frequency parameter.
const FREQUENCY_STEP: u32 = 16;

/// Internal samples per unit of a length parameter.
const LENGTH_STEP: u32 = 4;

/// Raw 7-byte sound descriptor supplied by the emulation core.
///
/// | byte | meaning            |
/// |------|--------------------|
/// | 0    | base frequency / 16 Hz |
/// | 1    | attack length      |
/// | 2    | decay length       |
/// | 3    | hold length        |
/// | 4    | sustain level / 255 |
/// | 5    | release length     |
/// | 6    | waveform selector  |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SoundParameters([u8; PATTERN_LEN]);

impl SoundParameters {
    pub const fn new(bytes: [u8; PATTERN_LEN]) -> Self {
        Self(bytes)
    }

    /// Take the first seven bytes of `bytes`; anything after is ignored.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, AudioError> {
        let head = bytes
            .get(..PATTERN_LEN)
            .ok_or(AudioError::ShortPattern(bytes.len()))?;
        let mut raw = [0u8; PATTERN_LEN];
        raw.copy_from_slice(head);
        Ok(Self(raw))
    }

    pub fn bytes(&self) -> [u8; PATTERN_LEN] {
        self.0
    }

    /// Base frequency in Hz. Zero when the parameter is zero.
    pub fn base_frequency(&self) -> u32 {
        self.0[0] as u32 * FREQUENCY_STEP
    }

    pub fn attack(&self) -> u32 {
        self.0[1] as u32 * LENGTH_STEP
    }

    pub fn decay(&self) -> u32 {
        self.0[2] as u32 * LENGTH_STEP
    }

    pub fn hold(&self) -> u32 {
        self.0[3] as u32 * LENGTH_STEP
    }

    /// Sustain level in `[0, 1]`.
    pub fn sustain(&self) -> f32 {
        self.0[4] as f32 / 255.0
    }

    pub fn release(&self) -> u32 {
        self.0[5] as u32 * LENGTH_STEP
    }

    pub fn waveform(&self) -> Waveform {
        Waveform::from_selector(self.0[6])
    }

    /// Length of the whole envelope in internal samples.
    pub fn total_samples(&self) -> u32 {
        self.attack() + self.decay() + self.hold() + self.release()
    }
}

impl From<[u8; PATTERN_LEN]> for SoundParameters {
    fn from(bytes: [u8; PATTERN_LEN]) -> Self {
        Self::new(bytes)
    }
}

impl TryFrom<&[u8]> for SoundParameters {
    type Error = AudioError;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        Self::from_slice(bytes)
    }
}
