//! Synthesised sound cues, played fire-and-forget.

use fundsp::prelude::*;
use rodio::buffer::SamplesBuffer;
use rodio::{OutputStream, OutputStreamHandle};
use tracing::warn;

use crate::error::{Error, Result};
use crate::session::Cue;

const SAMPLE_RATE: u32 = 44_100;

#[derive(Clone, Copy)]
enum Wave {
    Saw,
    Square,
    Sine,
}

/// Frequency sweep with a linear fade to silence.
fn sweep(wave: Wave, from_hz: f32, to_hz: f32, gain: f32, secs: f32) -> Vec<f32> {
    let freq = shared(from_hz);
    let mut synth: Box<dyn AudioUnit> = match wave {
        Wave::Saw => Box::new(var(&freq) >> saw()),
        Wave::Square => Box::new(var(&freq) >> square()),
        Wave::Sine => Box::new(var(&freq) >> sine::<f32>()),
    };
    synth.set_sample_rate(SAMPLE_RATE as f64);

    let n = (secs * SAMPLE_RATE as f32) as usize;
    (0..n)
        .map(|i| {
            let t = i as f32 / n as f32;
            freq.set_value(lerp(from_hz, to_hz, t));
            synth.get_mono() * lerp(gain, 0.0, t)
        })
        .collect()
}

fn jump_samples() -> Vec<f32> {
    sweep(Wave::Square, 300.0, 700.0, 0.12, 0.12)
}

fn duck_samples() -> Vec<f32> {
    sweep(Wave::Sine, 500.0, 250.0, 0.15, 0.10)
}

fn game_over_samples() -> Vec<f32> {
    // 400Hz down to 80Hz over half a second.
    sweep(Wave::Saw, 400.0, 80.0, 0.15, 0.5)
}

struct Output {
    // Dropping the stream silences the handle.
    _stream: OutputStream,
    handle: OutputStreamHandle,
}

pub struct Sounds {
    output: Option<Output>,
    jump: Vec<f32>,
    duck: Vec<f32>,
    game_over: Vec<f32>,
}

impl Sounds {
    pub fn open() -> Result<Self> {
        let (stream, handle) =
            OutputStream::try_default().map_err(|e| Error::Audio(e.to_string()))?;
        Ok(Self {
            output: Some(Output {
                _stream: stream,
                handle,
            }),
            ..Self::muted()
        })
    }

    /// Falls back to silence when no audio device is available.
    pub fn open_or_muted() -> Self {
        match Self::open() {
            Ok(sounds) => sounds,
            Err(err) => {
                warn!(%err, "running without sound");
                Self::muted()
            }
        }
    }

    pub fn muted() -> Self {
        Self {
            output: None,
            jump: jump_samples(),
            duck: duck_samples(),
            game_over: game_over_samples(),
        }
    }

    pub fn is_muted(&self) -> bool {
        self.output.is_none()
    }

    pub fn play(&self, cue: Cue) {
        let Some(output) = &self.output else {
            return;
        };
        let samples = match cue {
            Cue::Jump => &self.jump,
            Cue::Duck => &self.duck,
            Cue::GameOver => &self.game_over,
        };
        let source = SamplesBuffer::new(1, SAMPLE_RATE, samples.clone());
        if let Err(err) = output.handle.play_raw(source) {
            warn!(?cue, %err, "failed to play cue");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cue_lengths() {
        assert_eq!(jump_samples().len(), (0.12 * SAMPLE_RATE as f32) as usize);
        assert_eq!(game_over_samples().len(), SAMPLE_RATE as usize / 2);
    }

    #[test]
    fn duck_cue_is_a_falling_sine() {
        let samples = duck_samples();
        assert_eq!(samples.len(), (0.10 * SAMPLE_RATE as f32) as usize);

        // 500 -> 250 Hz over 0.1 s averages 375 Hz, about 75 sign changes.
        let crossings = samples
            .windows(2)
            .filter(|w| (w[0] < 0.0) != (w[1] < 0.0))
            .count();
        assert!((50..=100).contains(&crossings), "{crossings} crossings");
    }

    #[test]
    fn cues_are_audible_and_bounded() {
        for samples in [jump_samples(), duck_samples(), game_over_samples()] {
            assert!(samples.iter().any(|s| s.abs() > 0.01));
            assert!(samples.iter().all(|s| s.abs() <= 0.2));
        }
    }

    #[test]
    fn cues_fade_out() {
        let samples = game_over_samples();
        let tail = &samples[samples.len() - 100..];
        assert!(tail.iter().all(|s| s.abs() < 0.01));
    }

    #[test]
    fn muted_play_is_a_no_op() {
        let sounds = Sounds::muted();
        assert!(sounds.is_muted());
        sounds.play(Cue::Jump);
        sounds.play(Cue::GameOver);
    }
}
