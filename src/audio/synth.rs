// Copyright (C) 2025 Dayton Fishell
// XO-CHIP display and pattern audio core
// This file is part of xochip-av.
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version. See the LICENSE file in the project root for details.
// SPDX-License-Identifier: GPL-3.0-or-later

//! Pattern synthesis: envelope × oscillator on the 4 kHz internal clock,
//! then zero-order-hold upsampling to the device rate.

use std::sync::Arc;

use rand::Rng;

use super::envelope::Envelope;
use super::params::{INTERNAL_RATE, SoundParameters};
use super::waveform::Oscillator;

/// Finished mono buffer, samples in `[-1, 1]`.
///
/// Cloning shares the sample storage.
#[derive(Debug, Clone, PartialEq)]
pub struct PcmBuffer {
    samples: Arc<[f32]>,
    sample_rate: u32,
}

impl PcmBuffer {
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            samples: samples.into(),
            sample_rate,
        }
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Playback length in seconds.
    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f64 / self.sample_rate as f64
    }
}

/// Envelope-shaped oscillator evaluated on the internal clock.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Generator {
    envelope: Envelope,
    oscillator: Oscillator,
}

impl Generator {
    pub fn new(params: &SoundParameters) -> Self {
        Self {
            envelope: Envelope::from_params(params),
            oscillator: Oscillator::new(params.waveform(), params.base_frequency()),
        }
    }

    pub fn envelope(&self) -> &Envelope {
        &self.envelope
    }

    pub fn oscillator(&self) -> &Oscillator {
        &self.oscillator
    }

    /// Number of internal samples the pattern lasts.
    pub fn len(&self) -> u32 {
        self.envelope.len()
    }

    pub fn is_empty(&self) -> bool {
        self.envelope.is_empty()
    }

    pub fn sample<R: Rng + ?Sized>(&self, t: u32, rng: &mut R) -> f32 {
        let level = self.envelope.level(t);
        (level as f64 * self.oscillator.sample(t, rng)) as f32
    }
}

/// Number of device-rate samples produced for `internal` internal samples.
///
/// This is `ceil(internal * device_rate / INTERNAL_RATE)`, computed exactly.
pub fn resampled_len(internal: u32, device_rate: u32) -> usize {
    (internal as u64 * device_rate as u64).div_ceil(INTERNAL_RATE as u64) as usize
}

/// Internal sample held at output index `i`: `floor(i / (device_rate / INTERNAL_RATE))`.
fn source_index(i: usize, device_rate: u32) -> u32 {
    (i as u64 * INTERNAL_RATE as u64 / device_rate as u64) as u32
}

/// Synthesize `params` for a device running at `device_rate` Hz.
///
/// Noise patterns draw from the thread-local RNG.
pub fn synthesize(params: &SoundParameters, device_rate: u32) -> PcmBuffer {
    synthesize_with_rng(params, device_rate, &mut rand::rng())
}

/// [`synthesize`] with a caller-supplied RNG for the noise waveform.
pub fn synthesize_with_rng<R: Rng + ?Sized>(
    params: &SoundParameters,
    device_rate: u32,
    rng: &mut R,
) -> PcmBuffer {
    let generator = Generator::new(params);
    if generator.is_empty() || device_rate == 0 {
        log::debug!(
            "pattern {:02X?} at {} Hz synthesizes to nothing",
            params.bytes(),
            device_rate
        );
        return PcmBuffer::new(Vec::new(), device_rate);
    }

    let out_len = resampled_len(generator.len(), device_rate);
    let mut samples = Vec::with_capacity(out_len);

    // Zero-order hold: each internal sample is evaluated once and repeated
    // for every output index that maps back onto it.
    let mut held: Option<(u32, f32)> = None;
    for i in 0..out_len {
        let t = source_index(i, device_rate);
        let sample = match held {
            Some((source, value)) if source == t => value,
            _ => {
                let value = generator.sample(t, rng);
                held = Some((t, value));
                value
            }
        };
        samples.push(sample);
    }

    log::debug!(
        "pattern {:02X?}: {:?}, {} internal -> {} samples at {} Hz",
        params.bytes(),
        generator.oscillator().waveform(),
        generator.len(),
        samples.len(),
        device_rate
    );
    PcmBuffer::new(samples, device_rate)
}
