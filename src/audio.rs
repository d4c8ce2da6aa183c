//! Audio system using the Web Audio API
//!
//! Procedurally generated sound effects - no external files needed.

use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

use crate::Settings;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Projectile fired
    Shoot,
    /// Enemy destroyed
    Explode,
    /// Enemy hit but not destroyed
    Damage,
    /// Power-up collected
    PowerUp,
    /// Player-enemy contact
    Death,
    /// Menu/start button
    Select,
}

/// Audio manager for the game
pub struct AudioManager {
    ctx: Option<AudioContext>,
    master_volume: f32,
    sfx_volume: f32,
    music_volume: f32,
    muted: bool,
    /// The looping background drone, kept so mute can silence it
    background: Option<(OscillatorNode, GainNode)>,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioManager {
    pub fn new() -> Self {
        // May fail outside a secure context
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - audio disabled");
        }
        Self {
            ctx,
            master_volume: 0.8,
            sfx_volume: 1.0,
            music_volume: 0.4,
            muted: false,
            background: None,
        }
    }

    pub fn apply_settings(&mut self, settings: &Settings) {
        self.master_volume = settings.master_volume.clamp(0.0, 1.0);
        self.sfx_volume = settings.sfx_volume.clamp(0.0, 1.0);
        self.music_volume = settings.music_volume.clamp(0.0, 1.0);
        self.set_muted(settings.muted);
    }

    /// Mute/unmute all audio, including the background loop
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
        if let Some((_, gain)) = &self.background {
            let vol = if muted {
                0.0
            } else {
                self.master_volume * self.music_volume
            };
            gain.gain().set_value(vol * 0.15);
        }
    }

    pub fn muted(&self) -> bool {
        self.muted
    }

    fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Start the background loop. Browsers require a user gesture first, so
    /// this is called from the first shoot input.
    pub fn start_background(&mut self) {
        if self.background.is_some() {
            return;
        }
        let Some(ctx) = &self.ctx else { return };
        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }
        let Some((osc, gain)) = self.create_osc(ctx, 55.0, OscillatorType::Triangle) else {
            return;
        };
        let vol = if self.muted {
            0.0
        } else {
            self.master_volume * self.music_volume
        };
        gain.gain().set_value(vol * 0.15);
        if osc.start().is_ok() {
            self.background = Some((osc, gain));
        }
    }

    /// Play a sound effect
    pub fn play(&self, effect: SoundEffect) {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }

        let Some(ctx) = &self.ctx else { return };

        // Resume context if suspended (browsers require a user gesture)
        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }

        match effect {
            SoundEffect::Shoot => self.play_shoot(ctx, vol),
            SoundEffect::Explode => self.play_explode(ctx, vol),
            SoundEffect::Damage => self.play_damage(ctx, vol),
            SoundEffect::PowerUp => self.play_power_up(ctx, vol),
            SoundEffect::Death => self.play_death(ctx, vol),
            SoundEffect::Select => self.play_select(ctx, vol),
        }
    }

    // === Sound generators ===

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

    /// Shoot - short bright blip
    fn play_shoot(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 880.0, OscillatorType::Square) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.2, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.08)
            .ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(440.0, t + 0.08)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.1).ok();
    }

    /// Explode - deep sawtooth sweep
    fn play_explode(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 220.0, OscillatorType::Sawtooth) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.5, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.35)
            .ok();
        osc.frequency().set_value_at_time(220.0, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(40.0, t + 0.35)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.4).ok();
    }

    /// Damage - dull thud
    fn play_damage(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 160.0, OscillatorType::Triangle) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.35, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.12)
            .ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(80.0, t + 0.12)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.15).ok();
    }

    /// Power-up - rising arpeggio
    fn play_power_up(&self, ctx: &AudioContext, vol: f32) {
        let t = ctx.current_time();
        for (i, freq) in [440.0, 660.0, 880.0].iter().enumerate() {
            let Some((osc, gain)) = self.create_osc(ctx, *freq, OscillatorType::Sine) else {
                continue;
            };
            let start = t + i as f64 * 0.07;
            gain.gain().set_value_at_time(vol * 0.3, start).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, start + 0.12)
                .ok();
            osc.start_with_when(start).ok();
            osc.stop_with_when(start + 0.15).ok();
        }
    }

    /// Death - long falling wail
    fn play_death(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 330.0, OscillatorType::Sawtooth) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.4, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.9)
            .ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(55.0, t + 0.9)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 1.0).ok();
    }

    /// Select - quick confirmation ping
    fn play_select(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 660.0, OscillatorType::Sine) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.25, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.1)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.12).ok();
    }
}
