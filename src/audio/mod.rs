// Copyright (C) 2025 Dayton Fishell
// XO-CHIP display and pattern audio core
// This file is part of xochip-av.
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version. See the LICENSE file in the project root for details.
// SPDX-License-Identifier: GPL-3.0-or-later

//! Pattern audio: a 7-byte parameter block becomes a one-shot mono buffer.
//!
//! The pipeline is [`SoundParameters`] → [`Envelope`] × [`Oscillator`] on a
//! 4 kHz internal clock → zero-order-hold resampling to the device rate →
//! [`PcmBuffer`] → [`PlaybackController`].

pub mod envelope;
pub mod params;
pub mod playback;
pub mod synth;
pub mod waveform;

#[cfg(feature = "cpal-device")]
pub mod cpal_device;

pub use envelope::Envelope;
pub use params::{INTERNAL_RATE, PATTERN_LEN, SoundParameters};
pub use playback::{AudioDevice, PlaybackController};
pub use synth::{Generator, PcmBuffer, synthesize, synthesize_with_rng};
pub use waveform::{Oscillator, Waveform};

#[cfg(feature = "cpal-device")]
pub use cpal_device::CpalDevice;

use thiserror::Error;

/// Audio errors. Only malformed pattern blocks reach callers of
/// [`PlaybackController`]; device failures are logged and swallowed there.
#[derive(Debug, Error)]
pub enum AudioError {
    #[error("pattern block holds {0} bytes, {len} required", len = PATTERN_LEN)]
    ShortPattern(usize),
    #[error("no audio output device")]
    NoDevice,
    #[error("audio device error: {0}")]
    Device(String),
    #[cfg(feature = "cpal-device")]
    #[error(transparent)]
    Config(#[from] cpal::DefaultStreamConfigError),
    #[cfg(feature = "cpal-device")]
    #[error(transparent)]
    BuildStream(#[from] cpal::BuildStreamError),
    #[cfg(feature = "cpal-device")]
    #[error(transparent)]
    PlayStream(#[from] cpal::PlayStreamError),
}
