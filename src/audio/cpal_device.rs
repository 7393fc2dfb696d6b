//! [`AudioDevice`] backed by the default cpal output device.

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, SampleFormat, Stream, StreamConfig};

use super::AudioError;
use super::playback::AudioDevice;
use super::synth::PcmBuffer;

/// Output gain applied to every pattern.
pub const DEFAULT_VOLUME: f32 = 0.25;

pub struct CpalDevice {
    device: Device,
    config: StreamConfig,
    volume: f32,
}

/// One output stream per playing pattern; dropping it closes the stream.
pub struct CpalVoice {
    stream: Stream,
}

impl CpalDevice {
    /// Open the host's default output device at its native rate.
    pub fn open() -> Result<Self, AudioError> {
        let host = cpal::default_host();
        let device = host.default_output_device().ok_or(AudioError::NoDevice)?;
        let supported = device.default_output_config()?;
        if supported.sample_format() != SampleFormat::F32 {
            log::debug!(
                "default output format is {:?}, requesting f32",
                supported.sample_format()
            );
        }
        let config: StreamConfig = supported.config();
        log::info!(
            "audio output {}: {} Hz, {} channel(s)",
            device.name().unwrap_or_else(|_| "<unnamed>".to_string()),
            config.sample_rate.0,
            config.channels
        );
        Ok(Self {
            device,
            config,
            volume: DEFAULT_VOLUME,
        })
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
    }
}

impl AudioDevice for CpalDevice {
    type Voice = CpalVoice;

    fn sample_rate(&self) -> u32 {
        self.config.sample_rate.0
    }

    fn start(&mut self, buffer: PcmBuffer) -> Result<CpalVoice, AudioError> {
        let channels = self.config.channels.max(1) as usize;
        let volume = self.volume;
        let mut position = 0usize;

        let stream = self.device.build_output_stream(
            &self.config,
            move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                let samples = buffer.samples();
                for frame in data.chunks_mut(channels) {
                    // past the end: silence
                    let value = samples.get(position).map_or(0.0, |s| s * volume);
                    frame.fill(value);
                    if position < samples.len() {
                        position += 1;
                    }
                }
            },
            |err| log::error!("audio stream error: {err}"),
            None,
        )?;
        stream.play()?;
        Ok(CpalVoice { stream })
    }

    fn stop(&mut self, voice: CpalVoice) {
        if let Err(err) = voice.stream.pause() {
            log::debug!("pausing stream before drop failed: {err}");
        }
    }
}
