use super::params::SoundParameters;

/// Attack/decay/hold/release amplitude envelope.
///
/// Phase lengths are in internal samples. A zero-length phase is skipped, so
/// the level jumps straight to the next phase's starting value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Envelope {
    pub attack: u32,
    pub decay: u32,
    pub hold: u32,
    pub sustain: f32,
    pub release: u32,
}

fn lerp(a: f32, b: f32, amount: f32) -> f32 {
    a * (1.0 - amount) + b * amount
}

impl Envelope {
    pub fn from_params(params: &SoundParameters) -> Self {
        Self {
            attack: params.attack(),
            decay: params.decay(),
            hold: params.hold(),
            sustain: params.sustain(),
            release: params.release(),
        }
    }

    pub fn len(&self) -> u32 {
        self.attack + self.decay + self.hold + self.release
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Amplitude at internal sample `t`.
    pub fn level(&self, t: u32) -> f32 {
        let mut t = t;
        if t < self.attack {
            return t as f32 / self.attack as f32;
        }
        t -= self.attack;
        if t < self.decay {
            return lerp(1.0, self.sustain, t as f32 / self.decay as f32);
        }
        t -= self.decay;
        if t < self.hold {
            return self.sustain;
        }
        t -= self.hold;
        if t < self.release {
            return lerp(self.sustain, 0.0, t as f32 / self.release as f32);
        }
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(attack: u32, decay: u32, hold: u32, sustain: f32, release: u32) -> Envelope {
        Envelope {
            attack,
            decay,
            hold,
            sustain,
            release,
        }
    }

    #[test]
    fn phases_in_order() {
        let e = env(4, 4, 4, 0.5, 4);
        assert_eq!(e.len(), 16);
        assert_eq!(e.level(0), 0.0);
        assert_eq!(e.level(2), 0.5);
        assert_eq!(e.level(4), 1.0);
        assert_eq!(e.level(6), 0.75);
        assert_eq!(e.level(8), 0.5);
        assert_eq!(e.level(11), 0.5);
        assert_eq!(e.level(12), 0.5);
        assert_eq!(e.level(14), 0.25);
        assert_eq!(e.level(16), 0.0);
        assert_eq!(e.level(1000), 0.0);
    }

    #[test]
    fn zero_length_phases_never_produce_nan() {
        let e = env(0, 0, 4, 0.8, 0);
        for t in 0..8 {
            assert!(e.level(t).is_finite());
        }
        assert_eq!(e.level(0), 0.8);
        assert_eq!(e.level(4), 0.0);

        let empty = env(0, 0, 0, 1.0, 0);
        assert!(empty.is_empty());
        assert_eq!(empty.level(0), 0.0);
    }

    #[test]
    fn zero_attack_starts_decay_at_full_level() {
        let e = env(0, 4, 0, 0.0, 0);
        assert_eq!(e.level(0), 1.0);
        assert_eq!(e.level(2), 0.5);
    }
}
