// Copyright (C) 2025 Dayton Fishell
// XO-CHIP display and pattern audio core
// This file is part of xochip-av.
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version. See the LICENSE file in the project root for details.
// SPDX-License-Identifier: GPL-3.0-or-later

//! Host configuration: tick rate, display colors and interpreter quirk toggles.
//!
//! Only the colors are consumed inside this crate (by the display palette and
//! the sound indicator). The tick rate and quirks are carried for the
//! emulation core that owns them.

use std::fmt;
use std::str::FromStr;

use bitflags::bitflags;
use thiserror::Error;

/// 24-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0x00, 0x00, 0x00);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Pack as `0x00RRGGBB`.
    pub const fn to_u32(self) -> u32 {
        ((self.r as u32) << 16) | ((self.g as u32) << 8) | self.b as u32
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl FromStr for Color {
    type Err = OptionsError;

    /// Parse `#RRGGBB` or `#RGB`. The leading `#` is optional.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || OptionsError::InvalidColor(s.to_string());
        let hex = s.trim();
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16).map_err(|_| invalid())
        };
        match hex.len() {
            6 => Ok(Color::rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?)),
            3 => {
                // #abc expands to #aabbcc
                let r = channel(0..1)?;
                let g = channel(1..2)?;
                let b = channel(2..3)?;
                Ok(Color::rgb(r * 0x11, g * 0x11, b * 0x11))
            }
            _ => Err(invalid()),
        }
    }
}

bitflags! {
    /// Interpreter compatibility toggles owned by the emulation core.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Quirks: u8 {
        const SHIFT = 0x01;
        const LOAD_STORE = 0x02;
        const VF_ORDER = 0x04;
        const ENABLE_XO = 0x08;
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum OptionsError {
    #[error("invalid color {0:?}")]
    InvalidColor(String),
    #[cfg(feature = "serde-options")]
    #[error("malformed JSON options: {0}")]
    Json(#[from] serde_json::Error),
    #[cfg(feature = "serde-options")]
    #[error("malformed YAML options: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Options object shared between the host and the emulation core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    /// VM cycles executed per displayed frame.
    pub tick_rate: u32,
    pub fill_color: Color,
    pub fill_color2: Color,
    pub blend_color: Color,
    pub background_color: Color,
    pub buzz_color: Color,
    pub quiet_color: Color,
    pub quirks: Quirks,
}

impl Options {
    pub const DEFAULT_TICK_RATE: u32 = 20;

    pub fn new() -> Self {
        Self {
            tick_rate: Self::DEFAULT_TICK_RATE,
            fill_color: Color::rgb(0xFF, 0xCC, 0x00),
            fill_color2: Color::rgb(0xFF, 0x66, 0x00),
            blend_color: Color::rgb(0x66, 0x22, 0x00),
            background_color: Color::rgb(0x99, 0x66, 0x00),
            buzz_color: Color::rgb(0xFF, 0xAA, 0x00),
            quiet_color: Color::BLACK,
            quirks: Quirks::empty(),
        }
    }

    /// Color of the host's sound indicator for the current buzzer state.
    pub fn indicator_color(&self, buzzing: bool) -> Color {
        if buzzing {
            self.buzz_color
        } else {
            self.quiet_color
        }
    }
}

impl Default for Options {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "serde-options")]
pub use self::serialized::RawOptions;

#[cfg(feature = "serde-options")]
mod serialized {
    use serde::Deserialize;

    use super::{Color, Options, OptionsError, Quirks};

    /// Options as the host writes them: camelCase keys, every key optional.
    #[derive(Debug, Default, Deserialize)]
    #[serde(rename_all = "camelCase", default)]
    pub struct RawOptions {
        pub tickrate: Option<u32>,
        pub fill_color: Option<String>,
        pub fill_color2: Option<String>,
        pub blend_color: Option<String>,
        pub background_color: Option<String>,
        pub buzz_color: Option<String>,
        pub quiet_color: Option<String>,
        pub shift_quirks: Option<bool>,
        pub load_store_quirks: Option<bool>,
        pub vf_order_quirks: Option<bool>,
        #[serde(rename = "enableXO")]
        pub enable_xo: Option<bool>,
    }

    fn apply_color(slot: &mut Color, raw: Option<&str>) -> Result<(), OptionsError> {
        match raw {
            Some(text) if !text.is_empty() => {
                *slot = text.parse()?;
                Ok(())
            }
            _ => Ok(()),
        }
    }

    impl Options {
        /// Overwrite fields with every key that is present and truthy in `raw`.
        ///
        /// Absent, empty, zero or `false` entries leave the current value alone,
        /// so a quirk can be switched on by an options object but never off.
        pub fn unpack(&mut self, raw: &RawOptions) -> Result<(), OptionsError> {
            if let Some(rate) = raw.tickrate.filter(|&r| r != 0) {
                self.tick_rate = rate;
            }
            apply_color(&mut self.fill_color, raw.fill_color.as_deref())?;
            apply_color(&mut self.fill_color2, raw.fill_color2.as_deref())?;
            apply_color(&mut self.blend_color, raw.blend_color.as_deref())?;
            apply_color(&mut self.background_color, raw.background_color.as_deref())?;
            apply_color(&mut self.buzz_color, raw.buzz_color.as_deref())?;
            apply_color(&mut self.quiet_color, raw.quiet_color.as_deref())?;

            let toggles = [
                (raw.shift_quirks, Quirks::SHIFT),
                (raw.load_store_quirks, Quirks::LOAD_STORE),
                (raw.vf_order_quirks, Quirks::VF_ORDER),
                (raw.enable_xo, Quirks::ENABLE_XO),
            ];
            for (value, flag) in toggles {
                if value == Some(true) {
                    self.quirks.insert(flag);
                }
            }
            log::debug!(
                "options unpacked: tick rate {}, quirks {:?}",
                self.tick_rate,
                self.quirks
            );
            Ok(())
        }

        pub fn from_json(text: &str) -> Result<Self, OptionsError> {
            let raw: RawOptions = serde_json::from_str(text)?;
            let mut options = Options::new();
            options.unpack(&raw)?;
            Ok(options)
        }

        pub fn from_yaml(text: &str) -> Result<Self, OptionsError> {
            let raw: RawOptions = serde_yaml::from_str(text)?;
            let mut options = Options::new();
            options.unpack(&raw)?;
            Ok(options)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_long_and_short_hex() {
        assert_eq!("#FFCC00".parse::<Color>().unwrap(), Color::rgb(0xFF, 0xCC, 0x00));
        assert_eq!("662200".parse::<Color>().unwrap(), Color::rgb(0x66, 0x22, 0x00));
        assert_eq!("#fa0".parse::<Color>().unwrap(), Color::rgb(0xFF, 0xAA, 0x00));
    }

    #[test]
    fn rejects_malformed_colors() {
        assert!("#12345".parse::<Color>().is_err());
        assert!("#GG0000".parse::<Color>().is_err());
        assert!("".parse::<Color>().is_err());
    }

    #[test]
    fn color_display_round_trips_through_parse() {
        let color = Color::rgb(0x99, 0x66, 0x00);
        assert_eq!(color.to_string(), "#996600");
        assert_eq!(color.to_u32(), 0x996600);
    }

    #[test]
    fn indicator_follows_buzzer() {
        let options = Options::default();
        assert_eq!(options.indicator_color(true), options.buzz_color);
        assert_eq!(options.indicator_color(false), Color::BLACK);
    }

    #[cfg(feature = "serde-options")]
    #[test]
    fn unpack_only_overrides_present_keys() {
        let options = Options::from_json(
            r##"{ "tickrate": 500, "fillColor": "#FFFFFF", "vfOrderQuirks": true, "enableXO": true }"##,
        )
        .unwrap();
        assert_eq!(options.tick_rate, 500);
        assert_eq!(options.fill_color, Color::rgb(0xFF, 0xFF, 0xFF));
        assert_eq!(options.background_color, Options::default().background_color);
        assert_eq!(options.quirks, Quirks::VF_ORDER | Quirks::ENABLE_XO);
    }

    #[cfg(feature = "serde-options")]
    #[test]
    fn yaml_options_reject_bad_color() {
        let err = Options::from_yaml("blendColor: \"#zz\"\n").unwrap_err();
        assert!(matches!(err, OptionsError::InvalidColor(_)));
    }
}
