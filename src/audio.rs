//! Audio system using Web Audio API
//!
//! Procedurally generated chiptune - no external files needed. One-shot sound
//! effects fire on game events; the background pattern runs on its own
//! wall-clock timer, independent of the render loop, so music tempo does not
//! depend on rendering performance.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Player left the ground
    Jump,
    /// Shuriken thrown
    Shoot,
    /// Adversary took a hit (didn't die)
    Hit,
    /// Adversary destroyed
    Explosion,
    /// Run ended
    GameOver,
}

/// Steps per pattern
pub const PATTERN_LEN: usize = 16;

/// Bass root per group of 4 steps: A2, F2, C3, G2
const BASS_PROGRESSION: [f32; 4] = [110.0, 87.31, 130.81, 98.0];

/// Lead melody per step, 0.0 = rest (A minor pentatonic noodling)
const LEAD_PATTERN: [f32; PATTERN_LEN] = [
    440.0, 0.0, 523.25, 587.33, 0.0, 659.25, 587.33, 0.0, //
    523.25, 0.0, 440.0, 0.0, 392.0, 440.0, 0.0, 0.0,
];

/// Audio manager: owns the context, synthesizes every tone
pub struct AudioManager {
    ctx: Option<AudioContext>,
    master_volume: f32,
    muted: bool,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioManager {
    pub fn new() -> Self {
        // May fail outside a secure context; the game runs silently then
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - audio disabled");
        }
        Self {
            ctx,
            master_volume: 0.8,
            muted: false,
        }
    }

    /// Resume audio context (required after user gesture)
    pub fn resume(&self) {
        if let Some(ctx) = &self.ctx {
            let _ = ctx.resume();
        }
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute all synthesis
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    pub fn muted(&self) -> bool {
        self.muted
    }

    fn effective_volume(&self) -> f32 {
        if self.muted { 0.0 } else { self.master_volume }
    }

    /// Play a one-shot sound effect. No-op while muted or without a context.
    pub fn play(&self, effect: SoundEffect) {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }
        let Some(ctx) = &self.ctx else { return };
        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }

        match effect {
            SoundEffect::Jump => {
                // Whoosh up
                self.tone(ctx, 200.0, OscillatorType::Triangle, vol * 0.3, 0.2, Some(600.0));
            }
            SoundEffect::Shoot => {
                // Quick downward zip
                self.tone(ctx, 900.0, OscillatorType::Square, vol * 0.2, 0.08, Some(300.0));
            }
            SoundEffect::Hit => {
                // Soft tap
                self.tone(ctx, 300.0, OscillatorType::Triangle, vol * 0.25, 0.05, None);
            }
            SoundEffect::Explosion => {
                // Boom plus a high crack
                self.tone(ctx, 100.0, OscillatorType::Sawtooth, vol * 0.5, 0.4, Some(30.0));
                self.tone(ctx, 1500.0, OscillatorType::Square, vol * 0.2, 0.1, None);
            }
            SoundEffect::GameOver => {
                // Sad descending run
                for (i, freq) in [400.0, 350.0, 300.0, 200.0].iter().enumerate() {
                    let delay = i as f64 * 0.2;
                    self.tone_at(ctx, *freq, OscillatorType::Sine, vol * 0.3, 0.3, None, delay);
                }
            }
        }
    }

    /// Play one sequencer step: bass root from the chord progression
    /// (changing every 4 steps) and the lead table note unless it rests.
    pub fn play_step(&self, step: u64) {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }
        let Some(ctx) = &self.ctx else { return };
        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }

        let slot = (step as usize) % PATTERN_LEN;
        let bass = BASS_PROGRESSION[(slot / 4) % BASS_PROGRESSION.len()];
        self.tone(ctx, bass, OscillatorType::Triangle, vol * 0.25, 0.22, None);

        let lead = LEAD_PATTERN[slot];
        if lead > 0.0 {
            self.tone(ctx, lead, OscillatorType::Square, vol * 0.12, 0.16, None);
        }
    }

    // === Synthesis ===

    /// Create an oscillator with gain envelope
    fn create_osc(
        &self,
        ctx: &AudioContext,
        freq: f32,
        osc_type: OscillatorType,
    ) -> Option<(OscillatorNode, GainNode)> {
        let osc = ctx.create_oscillator().ok()?;
        let gain = ctx.create_gain().ok()?;

        osc.set_type(osc_type);
        osc.frequency().set_value(freq);
        osc.connect_with_audio_node(&gain).ok()?;
        gain.connect_with_audio_node(&ctx.destination()).ok()?;

        Some((osc, gain))
    }

    /// Time-bounded tone: exponential amplitude decay from `vol` to
    /// near-silence over `dur` seconds, with an optional frequency slide.
    fn tone(
        &self,
        ctx: &AudioContext,
        freq: f32,
        osc_type: OscillatorType,
        vol: f32,
        dur: f64,
        slide_to: Option<f32>,
    ) {
        self.tone_at(ctx, freq, osc_type, vol, dur, slide_to, 0.0);
    }

    fn tone_at(
        &self,
        ctx: &AudioContext,
        freq: f32,
        osc_type: OscillatorType,
        vol: f32,
        dur: f64,
        slide_to: Option<f32>,
        delay: f64,
    ) {
        let Some((osc, gain)) = self.create_osc(ctx, freq, osc_type) else {
            return;
        };
        let t = ctx.current_time() + delay;

        gain.gain().set_value_at_time(vol, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + dur)
            .ok();
        if let Some(target) = slide_to {
            osc.frequency().set_value_at_time(freq, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(target, t + dur)
                .ok();
        }

        osc.start_with_when(t).ok();
        osc.stop_with_when(t + dur + 0.05).ok();
    }
}

/// Step sequencer on a fixed wall-clock interval. Muting stops the timer;
/// unmuting restarts it where the step counter left off.
pub struct Sequencer {
    audio: Rc<RefCell<AudioManager>>,
    step: Rc<Cell<u64>>,
    step_ms: i32,
    callback: Closure<dyn FnMut()>,
    interval_id: Option<i32>,
}

impl Sequencer {
    pub fn new(audio: Rc<RefCell<AudioManager>>, step_ms: i32) -> Self {
        let step = Rc::new(Cell::new(0u64));
        let callback: Closure<dyn FnMut()> = {
            let audio = audio.clone();
            let step = step.clone();
            Closure::new(move || {
                let current = step.get();
                step.set(current + 1);
                audio.borrow().play_step(current);
            })
        };
        Self {
            audio,
            step,
            step_ms,
            callback,
            interval_id: None,
        }
    }

    /// Begin (or resume) stepping. Idempotent while running.
    pub fn start(&mut self) {
        if self.interval_id.is_some() || self.audio.borrow().muted() {
            return;
        }
        let Some(window) = web_sys::window() else {
            return;
        };
        match window.set_interval_with_callback_and_timeout_and_arguments_0(
            self.callback.as_ref().unchecked_ref(),
            self.step_ms,
        ) {
            Ok(id) => self.interval_id = Some(id),
            Err(_) => log::warn!("Failed to schedule sequencer timer"),
        }
    }

    /// Cancel the pending timer
    pub fn stop(&mut self) {
        if let Some(id) = self.interval_id.take() {
            if let Some(window) = web_sys::window() {
                window.clear_interval_with_handle(id);
            }
        }
    }

    /// Restart the pattern from step zero (new session)
    pub fn reset(&mut self) {
        self.step.set(0);
    }

    pub fn running(&self) -> bool {
        self.interval_id.is_some()
    }
}

impl Drop for Sequencer {
    fn drop(&mut self) {
        self.stop();
    }
}
