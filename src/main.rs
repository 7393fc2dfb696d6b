// Copyright (C) 2025 Dayton Fishell
// XO-CHIP display and pattern audio core
// This file is part of xochip-av.
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version. See the LICENSE file in the project root for details.
// SPDX-License-Identifier: GPL-3.0-or-later

// Renders a test card and plays a sound pattern.
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use xochip_av::audio::{PATTERN_LEN, synthesize};
use xochip_av::{DisplayMode, FrameBuffer, Options, Palette, PixelPlanes, Renderer, SoundParameters};

#[derive(Debug, Parser)]
#[command(name = "xochip-av", about = "XO-CHIP display and pattern audio demo")]
struct Args {
    /// Render the test card in 128x64 mode
    #[arg(long)]
    hires: bool,

    /// Display magnification
    #[arg(long, default_value_t = Renderer::DEFAULT_SCALE)]
    scale: u32,

    /// Save the rendered frame as a PNG
    #[arg(long)]
    png: Option<PathBuf>,

    /// Options file (JSON, or YAML with a .yaml/.yml extension)
    #[cfg(feature = "serde-options")]
    #[arg(long)]
    options: Option<PathBuf>,

    /// Pattern bytes: frequency attack decay hold sustain release waveform
    #[arg(num_args = 0..=PATTERN_LEN)]
    pattern: Vec<u8>,
}

#[cfg(feature = "serde-options")]
fn load_options(args: &Args) -> anyhow::Result<Options> {
    let Some(path) = &args.options else {
        return Ok(Options::default());
    };
    let text =
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let yaml = path
        .extension()
        .is_some_and(|ext| ext == "yaml" || ext == "yml");
    let options = if yaml {
        Options::from_yaml(&text)?
    } else {
        Options::from_json(&text)?
    };
    Ok(options)
}

#[cfg(not(feature = "serde-options"))]
fn load_options(_args: &Args) -> anyhow::Result<Options> {
    Ok(Options::default())
}

fn test_card(mode: DisplayMode) -> PixelPlanes {
    let (width, height) = mode.dimensions();
    let mut planes = PixelPlanes::new();
    for y in 0..height {
        for x in 0..width {
            // four vertical color bars with a checkered top row band
            let bar = (x * 4 / width) as u8;
            let index = if y < 4 && (x + y) % 2 == 0 { 0 } else { bar };
            planes.set_index((y * width + x) as usize, index);
        }
    }
    planes
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    println!("xochip-av v{}", env!("CARGO_PKG_VERSION"));
    println!("==============");
    println!();

    let options = load_options(&args)?;
    let palette = Palette::from_options(&options);
    let mode = DisplayMode::from_hires(args.hires);
    let renderer = Renderer::new(args.scale);

    let (width, height) = renderer.target_size();
    let mut frame = FrameBuffer::new(width, height);
    renderer.render(&test_card(mode), mode, &palette, &mut frame)?;
    println!("Rendered {:?} test card at {}x{}", mode, width, height);

    if let Some(path) = &args.png {
        frame
            .to_image()
            .save_with_format(path, image::ImageFormat::Png)
            .with_context(|| format!("writing {}", path.display()))?;
        println!("  Wrote {}", path.display());
    }

    let pattern = if args.pattern.is_empty() {
        vec![27, 2, 10, 40, 200, 60, 1]
    } else {
        args.pattern.clone()
    };
    let params = SoundParameters::from_slice(&pattern)?;
    println!();
    println!("Pattern {:?}", params.bytes());
    println!("  Waveform:   {:?}", params.waveform());
    println!("  Frequency:  {} Hz", params.base_frequency());
    println!("  Envelope:   {} samples @ 4 kHz", params.total_samples());

    play(&params)
}

#[cfg(feature = "cpal-device")]
fn play(params: &SoundParameters) -> anyhow::Result<()> {
    use xochip_av::audio::CpalDevice;
    use xochip_av::PlaybackController;

    let mut controller = PlaybackController::new(CpalDevice::open);
    let Some(rate) = controller.sample_rate() else {
        println!("  No audio device; skipping playback");
        return Ok(());
    };
    let buffer = synthesize(params, rate);
    let duration = buffer.duration_secs();
    println!("  Playing {} samples at {} Hz ({:.3}s)", buffer.len(), rate, duration);
    controller.play(buffer);
    std::thread::sleep(std::time::Duration::from_secs_f64(duration + 0.1));
    Ok(())
}

#[cfg(not(feature = "cpal-device"))]
fn play(params: &SoundParameters) -> anyhow::Result<()> {
    let buffer = synthesize(params, 44_100);
    println!(
        "  Synthesized {} samples at 44100 Hz ({:.3}s); build with `cpal-device` to hear it",
        buffer.len(),
        buffer.duration_secs()
    );
    Ok(())
}
