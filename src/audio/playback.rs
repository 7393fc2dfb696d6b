// Copyright (C) 2025 Dayton Fishell
// XO-CHIP display and pattern audio core
// This file is part of xochip-av.
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version. See the LICENSE file in the project root for details.
// SPDX-License-Identifier: GPL-3.0-or-later

//! Single-slot playback controller.
//!
//! At most one pattern is audible at a time: starting a new one stops the
//! current voice before the new buffer is handed to the device. The device is
//! opened lazily on first use and a failed open is remembered, so hosts
//! without audio pay for the attempt once and then get silent no-ops.

use std::fmt;

use super::AudioError;
use super::params::SoundParameters;
use super::synth::{PcmBuffer, synthesize};

/// A PCM sink that plays mono buffers once.
pub trait AudioDevice {
    /// Handle to a buffer that is playing.
    type Voice;

    /// Native output rate in Hz.
    fn sample_rate(&self) -> u32;

    /// Begin playing `buffer` once, without looping. Returns immediately.
    fn start(&mut self, buffer: PcmBuffer) -> Result<Self::Voice, AudioError>;

    /// Silence `voice`. Must not return until the voice is inaudible.
    fn stop(&mut self, voice: Self::Voice);
}

type Opener<D> = Box<dyn FnOnce() -> Result<D, AudioError>>;

enum DeviceState<D> {
    Pending(Opener<D>),
    Ready(D),
    Unavailable,
}

impl<D> DeviceState<D> {
    /// Open the device on first call; later calls reuse the outcome.
    fn get(&mut self) -> Option<&mut D> {
        *self = match std::mem::replace(self, DeviceState::Unavailable) {
            DeviceState::Pending(open) => match open() {
                Ok(device) => {
                    log::info!("audio device initialised");
                    DeviceState::Ready(device)
                }
                Err(err) => {
                    log::warn!("audio disabled: {err}");
                    DeviceState::Unavailable
                }
            },
            settled => settled,
        };
        match self {
            DeviceState::Ready(device) => Some(device),
            _ => None,
        }
    }
}

/// Owns the audio device and the one active voice.
pub struct PlaybackController<D: AudioDevice> {
    state: DeviceState<D>,
    current: Option<D::Voice>,
}

impl<D: AudioDevice> PlaybackController<D> {
    /// Open the device with `open` the first time it is needed.
    pub fn new<F>(open: F) -> Self
    where
        F: FnOnce() -> Result<D, AudioError> + 'static,
    {
        Self {
            state: DeviceState::Pending(Box::new(open)),
            current: None,
        }
    }

    pub fn with_device(device: D) -> Self {
        Self {
            state: DeviceState::Ready(device),
            current: None,
        }
    }

    /// A controller for hosts with no audio output; every call is a no-op.
    pub fn unavailable() -> Self {
        Self {
            state: DeviceState::Unavailable,
            current: None,
        }
    }

    /// Whether a device is usable, opening it if that has not been tried yet.
    pub fn is_available(&mut self) -> bool {
        self.state.get().is_some()
    }

    /// Native rate of the device, if one is available.
    pub fn sample_rate(&mut self) -> Option<u32> {
        self.state.get().map(|device| device.sample_rate())
    }

    pub fn is_playing(&self) -> bool {
        self.current.is_some()
    }

    pub fn device(&self) -> Option<&D> {
        match &self.state {
            DeviceState::Ready(device) => Some(device),
            _ => None,
        }
    }

    /// Replace whatever is playing with `buffer`.
    ///
    /// Empty buffers and missing devices are ignored. The previous voice is
    /// stopped before the new one starts.
    pub fn play(&mut self, buffer: PcmBuffer) {
        if buffer.is_empty() {
            log::debug!("ignoring empty pattern buffer");
            return;
        }
        let Some(device) = self.state.get() else {
            return;
        };
        if buffer.sample_rate() != device.sample_rate() {
            log::warn!(
                "buffer rendered for {} Hz played on a {} Hz device",
                buffer.sample_rate(),
                device.sample_rate()
            );
        }

        if let Some(voice) = self.current.take() {
            device.stop(voice);
        }
        match device.start(buffer) {
            Ok(voice) => self.current = Some(voice),
            Err(err) => log::warn!("failed to start pattern: {err}"),
        }
    }

    /// Decode a pattern block, synthesize it at the device rate and play it.
    ///
    /// Synthesis is skipped entirely when there is no device.
    pub fn play_pattern(&mut self, pattern: &[u8]) -> Result<(), AudioError> {
        let params = SoundParameters::from_slice(pattern)?;
        let Some(rate) = self.sample_rate() else {
            return Ok(());
        };
        self.play(synthesize(&params, rate));
        Ok(())
    }

    /// Silence the current voice, if any.
    pub fn stop(&mut self) {
        if let Some(voice) = self.current.take() {
            if let DeviceState::Ready(device) = &mut self.state {
                device.stop(voice);
            }
        }
    }
}

impl<D: AudioDevice> fmt::Debug for PlaybackController<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = match self.state {
            DeviceState::Pending(_) => "pending",
            DeviceState::Ready(_) => "ready",
            DeviceState::Unavailable => "unavailable",
        };
        f.debug_struct("PlaybackController")
            .field("device", &state)
            .field("playing", &self.current.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    #[derive(Debug, Clone, PartialEq)]
    enum Event {
        Start { id: u32, len: usize },
        Stop(u32),
    }

    #[derive(Default)]
    struct MockDevice {
        log: Rc<RefCell<Vec<Event>>>,
        next_id: u32,
        fail_start: bool,
    }

    impl AudioDevice for MockDevice {
        type Voice = u32;

        fn sample_rate(&self) -> u32 {
            8000
        }

        fn start(&mut self, buffer: PcmBuffer) -> Result<u32, AudioError> {
            if self.fail_start {
                return Err(AudioError::Device("busy".into()));
            }
            self.next_id += 1;
            self.log.borrow_mut().push(Event::Start {
                id: self.next_id,
                len: buffer.len(),
            });
            Ok(self.next_id)
        }

        fn stop(&mut self, voice: u32) {
            self.log.borrow_mut().push(Event::Stop(voice));
        }
    }

    fn buffer(len: usize) -> PcmBuffer {
        PcmBuffer::new(vec![0.5; len], 8000)
    }

    #[test]
    fn second_play_stops_first_before_starting() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut controller = PlaybackController::with_device(MockDevice {
            log: Rc::clone(&log),
            ..Default::default()
        });

        controller.play(buffer(10));
        controller.play(buffer(20));

        assert_eq!(
            *log.borrow(),
            vec![
                Event::Start { id: 1, len: 10 },
                Event::Stop(1),
                Event::Start { id: 2, len: 20 },
            ]
        );
        assert!(controller.is_playing());
    }

    #[test]
    fn empty_buffer_is_ignored() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut controller = PlaybackController::with_device(MockDevice {
            log: Rc::clone(&log),
            ..Default::default()
        });
        controller.play(buffer(5));
        controller.play(buffer(0));
        assert_eq!(*log.borrow(), vec![Event::Start { id: 1, len: 5 }]);
    }

    #[test]
    fn unavailable_controller_is_silent() {
        let mut controller = PlaybackController::<MockDevice>::unavailable();
        controller.play(buffer(10));
        controller.play_pattern(&[16, 1, 1, 1, 255, 1, 0]).unwrap();
        controller.stop();
        assert!(!controller.is_available());
        assert!(!controller.is_playing());
    }

    #[test]
    fn failed_open_is_not_retried() {
        let attempts = Rc::new(Cell::new(0));
        let counter = Rc::clone(&attempts);
        let mut controller = PlaybackController::<MockDevice>::new(move || {
            counter.set(counter.get() + 1);
            Err(AudioError::NoDevice)
        });

        for _ in 0..3 {
            controller.play(buffer(4));
        }
        assert!(!controller.is_available());
        assert_eq!(attempts.get(), 1);
    }

    #[test]
    fn device_opens_lazily() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let device_log = Rc::clone(&log);
        let mut controller = PlaybackController::new(move || {
            Ok(MockDevice {
                log: device_log,
                ..Default::default()
            })
        });
        assert!(controller.device().is_none());
        assert_eq!(controller.sample_rate(), Some(8000));
        assert!(controller.device().is_some());
    }

    #[test]
    fn opened_device_is_reused_across_calls() {
        let attempts = Rc::new(Cell::new(0));
        let counter = Rc::clone(&attempts);
        let mut controller = PlaybackController::new(move || {
            counter.set(counter.get() + 1);
            Ok(MockDevice::default())
        });
        for _ in 0..3 {
            assert!(controller.is_available());
            controller.play(buffer(2));
        }
        assert_eq!(attempts.get(), 1);
        assert!(controller.is_playing());
    }

    #[test]
    fn play_pattern_uses_device_rate() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut controller = PlaybackController::with_device(MockDevice {
            log: Rc::clone(&log),
            ..Default::default()
        });
        // 4 internal samples of hold, doubled to 8 kHz
        controller.play_pattern(&[16, 0, 0, 1, 255, 0, 1]).unwrap();
        assert_eq!(*log.borrow(), vec![Event::Start { id: 1, len: 8 }]);
    }

    #[test]
    fn play_pattern_rejects_short_block() {
        let mut controller = PlaybackController::with_device(MockDevice::default());
        let err = controller.play_pattern(&[1, 2]).unwrap_err();
        assert!(matches!(err, AudioError::ShortPattern(2)));
    }

    #[test]
    fn start_failure_leaves_slot_empty() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut controller = PlaybackController::with_device(MockDevice {
            log: Rc::clone(&log),
            ..Default::default()
        });
        controller.play(buffer(3));
        if let DeviceState::Ready(device) = &mut controller.state {
            device.fail_start = true;
        }
        controller.play(buffer(3));
        assert!(!controller.is_playing());
        assert_eq!(
            *log.borrow(),
            vec![Event::Start { id: 1, len: 3 }, Event::Stop(1)]
        );
    }

    #[test]
    fn explicit_stop_clears_slot() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut controller = PlaybackController::with_device(MockDevice {
            log: Rc::clone(&log),
            ..Default::default()
        });
        controller.play(buffer(3));
        controller.stop();
        controller.stop();
        assert!(!controller.is_playing());
        assert_eq!(
            *log.borrow(),
            vec![Event::Start { id: 1, len: 3 }, Event::Stop(1)]
        );
    }
}
