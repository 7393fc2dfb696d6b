// Copyright (C) 2025 Dayton Fishell
// XO-CHIP display and pattern audio core
// This file is part of xochip-av.
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version. See the LICENSE file in the project root for details.
// SPDX-License-Identifier: GPL-3.0-or-later

//! Periodic waveform shapes and the oscillator that steps through them.

use std::f64::consts::TAU;

use rand::Rng;

use super::params::INTERNAL_RATE;

/// Lowest frequency the oscillator runs at; a zero frequency parameter is
/// raised to this, the smallest step the parameter can otherwise express.
pub const MIN_FREQUENCY: u32 = 16;

/// Waveform table, in selector order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Waveform {
    Sawtooth = 0,
    Square = 1,
    Triangle = 2,
    Sine = 3,
    Noise = 4,
}

impl Waveform {
    pub const ALL: [Waveform; 5] = [
        Waveform::Sawtooth,
        Waveform::Square,
        Waveform::Triangle,
        Waveform::Sine,
        Waveform::Noise,
    ];

    /// Any selector value picks a waveform, wrapping modulo the table length.
    pub fn from_selector(selector: u8) -> Self {
        Self::ALL[selector as usize % Self::ALL.len()]
    }

    /// Unipolar shape in `[0, 1]` at phase `p` in `[0, 1)`.
    ///
    /// Sine is reported through the same mapping, `(sin(2πp) + 1) / 2`.
    pub fn shape<R: Rng + ?Sized>(self, p: f64, rng: &mut R) -> f64 {
        match self {
            Waveform::Sawtooth => p,
            Waveform::Square => {
                if p < 0.5 {
                    1.0
                } else {
                    0.0
                }
            }
            Waveform::Triangle => {
                if p < 0.5 {
                    2.0 * p
                } else {
                    2.0 - 2.0 * p
                }
            }
            Waveform::Sine => ((TAU * p).sin() + 1.0) / 2.0,
            Waveform::Noise => rng.random::<f64>(),
        }
    }

    /// Bipolar sample in `[-1, 1]` at phase `p`.
    pub fn sample<R: Rng + ?Sized>(self, p: f64, rng: &mut R) -> f64 {
        match self {
            // direct, so the result is an exact sine rather than a rescaled one
            Waveform::Sine => (TAU * p).sin(),
            _ => self.shape(p, rng) * 2.0 - 1.0,
        }
    }
}

/// A waveform running at a fixed frequency on the internal sample clock.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Oscillator {
    waveform: Waveform,
    period: f64,
}

impl Oscillator {
    pub fn new(waveform: Waveform, frequency: u32) -> Self {
        let frequency = if frequency == 0 {
            log::debug!("zero base frequency raised to {MIN_FREQUENCY} Hz");
            MIN_FREQUENCY
        } else {
            frequency
        };
        Self {
            waveform,
            period: INTERNAL_RATE as f64 / frequency as f64,
        }
    }

    pub fn waveform(&self) -> Waveform {
        self.waveform
    }

    /// Period length in internal samples.
    pub fn period(&self) -> f64 {
        self.period
    }

    /// Phase in `[0, 1)` at internal sample `t`.
    pub fn phase(&self, t: u32) -> f64 {
        (t as f64 % self.period) / self.period
    }

    pub fn sample<R: Rng + ?Sized>(&self, t: u32, rng: &mut R) -> f64 {
        self.waveform.sample(self.phase(t), rng)
    }
}
