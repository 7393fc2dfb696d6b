// Copyright (C) 2025 Dayton Fishell
// XO-CHIP display and pattern audio core
// This file is part of xochip-av.
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version. See the LICENSE file in the project root for details.
// SPDX-License-Identifier: GPL-3.0-or-later

//! XO-CHIP display and pattern audio output
//!
//! This library turns interpreter state into host output: the two-plane
//! indexed display is blitted onto a raster surface, and 7-byte sound
//! patterns are synthesized into one-shot PCM buffers for an audio device.

pub mod audio;
pub mod display;
pub mod options;

// Re-export commonly used types
pub use audio::{
    AudioDevice, AudioError, PcmBuffer, PlaybackController, SoundParameters, Waveform,
};
pub use display::{
    DisplayError, DisplayMode, FrameBuffer, Palette, PixelPlanes, Renderer, Surface,
};
pub use options::{Color, Options, OptionsError, Quirks};
