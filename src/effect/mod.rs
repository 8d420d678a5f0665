//! Tick driven effects with compile-time known variants
//!
//! Every built-in effect is a small state struct implementing [`Effect`].
//! The per-channel state lives in an [`EffectSlot`] so switching effects
//! always starts from that effect's zero state.

mod blink;
mod chase;
mod comet;
mod fire;
mod rainbow;
mod solid;
mod sparkle;
mod wave;

use alloc::string::String;

pub use blink::{BlinkEffect, BreatheEffect};
pub use chase::{ColorWipeEffect, CyclicEffect, TheaterChaseEffect};
pub use comet::{CometEffect, MeteorEffect};
pub use fire::{FIRE_CELLS, FireEffect};
pub use rainbow::RainbowEffect;
pub use solid::SolidEffect;
pub use sparkle::{SparkleEffect, TwinkleEffect};
pub use wave::{GradientEffect, PulseEffect, RunningLightsEffect, WaveEffect};

use crate::{color::PixelColor, random::RandomSource};

const EFFECT_NAME_SOLID: &str = "SOLID";
const EFFECT_NAME_BLINK: &str = "BLINK";
const EFFECT_NAME_BREATHE: &str = "BREATHE";
const EFFECT_NAME_CYCLIC: &str = "CYCLIC";
const EFFECT_NAME_RAINBOW: &str = "RAINBOW";
const EFFECT_NAME_COLOR_WIPE: &str = "COLOR_WIPE";
const EFFECT_NAME_THEATER_CHASE: &str = "THEATER_CHASE";
const EFFECT_NAME_SPARKLE: &str = "SPARKLE";
const EFFECT_NAME_COMET: &str = "COMET";
const EFFECT_NAME_FIRE: &str = "FIRE";
const EFFECT_NAME_WAVE: &str = "WAVE";
const EFFECT_NAME_TWINKLE: &str = "TWINKLE";
const EFFECT_NAME_GRADIENT: &str = "GRADIENT";
const EFFECT_NAME_PULSE: &str = "PULSE";
const EFFECT_NAME_METEOR: &str = "METEOR";
const EFFECT_NAME_RUNNING_LIGHTS: &str = "RUNNING_LIGHTS";

/// Effect name that leaves the logical buffer to the caller
pub const EFFECT_NAME_RAW: &str = "RAW";
/// Effect name that runs the procedural callback of the effect config
pub const EFFECT_NAME_CUSTOM: &str = "CUSTOM";

const EFFECT_ID_SOLID: u8 = 0;
const EFFECT_ID_BLINK: u8 = 1;
const EFFECT_ID_BREATHE: u8 = 2;
const EFFECT_ID_CYCLIC: u8 = 3;
const EFFECT_ID_RAINBOW: u8 = 4;
const EFFECT_ID_COLOR_WIPE: u8 = 5;
const EFFECT_ID_THEATER_CHASE: u8 = 6;
const EFFECT_ID_SPARKLE: u8 = 7;
const EFFECT_ID_COMET: u8 = 8;
const EFFECT_ID_FIRE: u8 = 9;
const EFFECT_ID_WAVE: u8 = 10;
const EFFECT_ID_TWINKLE: u8 = 11;
const EFFECT_ID_GRADIENT: u8 = 12;
const EFFECT_ID_PULSE: u8 = 13;
const EFFECT_ID_METEOR: u8 = 14;
const EFFECT_ID_RUNNING_LIGHTS: u8 = 15;

/// Inputs of a single render call.
///
/// `interval` is the speed derived step interval in ticks. Effects ask
/// [`RenderContext::step`] whether their phase may advance on this tick.
pub struct RenderContext<'a> {
    pub color: PixelColor,
    pub brightness: u8,
    pub tick: u32,
    pub interval: u32,
    pub random: &'a mut dyn RandomSource,
    last_update_tick: &'a mut Option<u32>,
}

impl<'a> RenderContext<'a> {
    pub fn new(
        color: PixelColor,
        brightness: u8,
        tick: u32,
        interval: u32,
        random: &'a mut dyn RandomSource,
        last_update_tick: &'a mut Option<u32>,
    ) -> Self {
        Self {
            color,
            brightness,
            tick,
            interval,
            random,
            last_update_tick,
        }
    }

    /// Returns `true` and records the tick when at least `interval / divisor`
    /// ticks passed since the last step. A fresh state always steps.
    ///
    /// Uses wrapping subtraction so the tick counter may overflow.
    pub fn step(&mut self, divisor: u32) -> bool {
        let due = match *self.last_update_tick {
            None => true,
            Some(last) => self.tick.wrapping_sub(last) >= self.interval / divisor.max(1),
        };
        if due {
            *self.last_update_tick = Some(self.tick);
        }
        due
    }
}

pub trait Effect {
    /// Fraction of the speed interval between phase steps
    const DIVISOR: u32 = 1;

    /// Render a single frame into the logical buffer
    fn render(&mut self, ctx: &mut RenderContext<'_>, leds: &mut [PixelColor]);
}

/// Effect slot - enum containing the state of every built-in effect
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EffectSlot {
    Solid(SolidEffect),
    Blink(BlinkEffect),
    Breathe(BreatheEffect),
    Cyclic(CyclicEffect),
    Rainbow(RainbowEffect),
    ColorWipe(ColorWipeEffect),
    TheaterChase(TheaterChaseEffect),
    Sparkle(SparkleEffect),
    Comet(CometEffect),
    Fire(FireEffect),
    Wave(WaveEffect),
    Twinkle(TwinkleEffect),
    Gradient(GradientEffect),
    Pulse(PulseEffect),
    Meteor(MeteorEffect),
    RunningLights(RunningLightsEffect),
    /// Caller supplied effects keep their own state
    Procedural,
}

impl Default for EffectSlot {
    fn default() -> Self {
        Self::Solid(SolidEffect)
    }
}

/// Known built-in effect ids that can be requested.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum EffectId {
    Solid = EFFECT_ID_SOLID,
    Blink = EFFECT_ID_BLINK,
    Breathe = EFFECT_ID_BREATHE,
    Cyclic = EFFECT_ID_CYCLIC,
    Rainbow = EFFECT_ID_RAINBOW,
    ColorWipe = EFFECT_ID_COLOR_WIPE,
    TheaterChase = EFFECT_ID_THEATER_CHASE,
    Sparkle = EFFECT_ID_SPARKLE,
    Comet = EFFECT_ID_COMET,
    Fire = EFFECT_ID_FIRE,
    Wave = EFFECT_ID_WAVE,
    Twinkle = EFFECT_ID_TWINKLE,
    Gradient = EFFECT_ID_GRADIENT,
    Pulse = EFFECT_ID_PULSE,
    Meteor = EFFECT_ID_METEOR,
    RunningLights = EFFECT_ID_RUNNING_LIGHTS,
}

impl EffectId {
    /// Built-ins in registration order
    pub const ALL: [Self; 16] = [
        Self::Solid,
        Self::Blink,
        Self::Breathe,
        Self::Cyclic,
        Self::Rainbow,
        Self::ColorWipe,
        Self::TheaterChase,
        Self::Sparkle,
        Self::Comet,
        Self::Fire,
        Self::Wave,
        Self::Twinkle,
        Self::Gradient,
        Self::Pulse,
        Self::Meteor,
        Self::RunningLights,
    ];

    pub fn from_raw(value: u8) -> Option<Self> {
        Some(match value {
            EFFECT_ID_SOLID => Self::Solid,
            EFFECT_ID_BLINK => Self::Blink,
            EFFECT_ID_BREATHE => Self::Breathe,
            EFFECT_ID_CYCLIC => Self::Cyclic,
            EFFECT_ID_RAINBOW => Self::Rainbow,
            EFFECT_ID_COLOR_WIPE => Self::ColorWipe,
            EFFECT_ID_THEATER_CHASE => Self::TheaterChase,
            EFFECT_ID_SPARKLE => Self::Sparkle,
            EFFECT_ID_COMET => Self::Comet,
            EFFECT_ID_FIRE => Self::Fire,
            EFFECT_ID_WAVE => Self::Wave,
            EFFECT_ID_TWINKLE => Self::Twinkle,
            EFFECT_ID_GRADIENT => Self::Gradient,
            EFFECT_ID_PULSE => Self::Pulse,
            EFFECT_ID_METEOR => Self::Meteor,
            EFFECT_ID_RUNNING_LIGHTS => Self::RunningLights,
            _ => return None,
        })
    }

    pub fn to_slot(self) -> EffectSlot {
        match self {
            Self::Solid => EffectSlot::Solid(SolidEffect),
            Self::Blink => EffectSlot::Blink(BlinkEffect::default()),
            Self::Breathe => EffectSlot::Breathe(BreatheEffect::default()),
            Self::Cyclic => EffectSlot::Cyclic(CyclicEffect::default()),
            Self::Rainbow => EffectSlot::Rainbow(RainbowEffect::default()),
            Self::ColorWipe => EffectSlot::ColorWipe(ColorWipeEffect::default()),
            Self::TheaterChase => EffectSlot::TheaterChase(TheaterChaseEffect::default()),
            Self::Sparkle => EffectSlot::Sparkle(SparkleEffect),
            Self::Comet => EffectSlot::Comet(CometEffect::default()),
            Self::Fire => EffectSlot::Fire(FireEffect::default()),
            Self::Wave => EffectSlot::Wave(WaveEffect::default()),
            Self::Twinkle => EffectSlot::Twinkle(TwinkleEffect),
            Self::Gradient => EffectSlot::Gradient(GradientEffect::default()),
            Self::Pulse => EffectSlot::Pulse(PulseEffect::default()),
            Self::Meteor => EffectSlot::Meteor(MeteorEffect::default()),
            Self::RunningLights => EffectSlot::RunningLights(RunningLightsEffect::default()),
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Solid => EFFECT_NAME_SOLID,
            Self::Blink => EFFECT_NAME_BLINK,
            Self::Breathe => EFFECT_NAME_BREATHE,
            Self::Cyclic => EFFECT_NAME_CYCLIC,
            Self::Rainbow => EFFECT_NAME_RAINBOW,
            Self::ColorWipe => EFFECT_NAME_COLOR_WIPE,
            Self::TheaterChase => EFFECT_NAME_THEATER_CHASE,
            Self::Sparkle => EFFECT_NAME_SPARKLE,
            Self::Comet => EFFECT_NAME_COMET,
            Self::Fire => EFFECT_NAME_FIRE,
            Self::Wave => EFFECT_NAME_WAVE,
            Self::Twinkle => EFFECT_NAME_TWINKLE,
            Self::Gradient => EFFECT_NAME_GRADIENT,
            Self::Pulse => EFFECT_NAME_PULSE,
            Self::Meteor => EFFECT_NAME_METEOR,
            Self::RunningLights => EFFECT_NAME_RUNNING_LIGHTS,
        }
    }

    /// Human readable name for effect listings
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Solid => "Solid",
            Self::Blink => "Blink",
            Self::Breathe => "Breathe",
            Self::Cyclic => "Cyclic",
            Self::Rainbow => "Rainbow",
            Self::ColorWipe => "Color Wipe",
            Self::TheaterChase => "Theater Chase",
            Self::Sparkle => "Sparkle",
            Self::Comet => "Comet",
            Self::Fire => "Fire",
            Self::Wave => "Wave",
            Self::Twinkle => "Twinkle",
            Self::Gradient => "Gradient",
            Self::Pulse => "Pulse",
            Self::Meteor => "Meteor",
            Self::RunningLights => "Running Lights",
        }
    }

    /// Case-insensitive lookup
    pub fn parse_from_str(s: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|id| id.as_str().eq_ignore_ascii_case(s))
    }
}

impl EffectSlot {
    /// Render the current effect
    pub fn render(&mut self, ctx: &mut RenderContext<'_>, leds: &mut [PixelColor]) {
        match self {
            Self::Solid(effect) => effect.render(ctx, leds),
            Self::Blink(effect) => effect.render(ctx, leds),
            Self::Breathe(effect) => effect.render(ctx, leds),
            Self::Cyclic(effect) => effect.render(ctx, leds),
            Self::Rainbow(effect) => effect.render(ctx, leds),
            Self::ColorWipe(effect) => effect.render(ctx, leds),
            Self::TheaterChase(effect) => effect.render(ctx, leds),
            Self::Sparkle(effect) => effect.render(ctx, leds),
            Self::Comet(effect) => effect.render(ctx, leds),
            Self::Fire(effect) => effect.render(ctx, leds),
            Self::Wave(effect) => effect.render(ctx, leds),
            Self::Twinkle(effect) => effect.render(ctx, leds),
            Self::Gradient(effect) => effect.render(ctx, leds),
            Self::Pulse(effect) => effect.render(ctx, leds),
            Self::Meteor(effect) => effect.render(ctx, leds),
            Self::RunningLights(effect) => effect.render(ctx, leds),
            Self::Procedural => {}
        }
    }

    /// Get the effect ID for external observation
    pub fn id(&self) -> Option<EffectId> {
        Some(match self {
            Self::Solid(_) => EffectId::Solid,
            Self::Blink(_) => EffectId::Blink,
            Self::Breathe(_) => EffectId::Breathe,
            Self::Cyclic(_) => EffectId::Cyclic,
            Self::Rainbow(_) => EffectId::Rainbow,
            Self::ColorWipe(_) => EffectId::ColorWipe,
            Self::TheaterChase(_) => EffectId::TheaterChase,
            Self::Sparkle(_) => EffectId::Sparkle,
            Self::Comet(_) => EffectId::Comet,
            Self::Fire(_) => EffectId::Fire,
            Self::Wave(_) => EffectId::Wave,
            Self::Twinkle(_) => EffectId::Twinkle,
            Self::Gradient(_) => EffectId::Gradient,
            Self::Pulse(_) => EffectId::Pulse,
            Self::Meteor(_) => EffectId::Meteor,
            Self::RunningLights(_) => EffectId::RunningLights,
            Self::Procedural => return None,
        })
    }
}

/// Animation state owned by one channel.
///
/// Tagged with the upper-cased effect name it was created for; the engine
/// replaces it wholesale when the requested name changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EffectState {
    key: String,
    last_update_tick: Option<u32>,
    slot: EffectSlot,
}

impl EffectState {
    pub fn new(key: &str, slot: EffectSlot) -> Self {
        Self {
            key: key.to_ascii_uppercase(),
            last_update_tick: None,
            slot,
        }
    }

    /// Name the state belongs to, upper-cased
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn matches(&self, name: &str) -> bool {
        self.key.eq_ignore_ascii_case(name)
    }

    /// Tick of the most recent phase step, `None` before the first render
    pub fn last_update_tick(&self) -> Option<u32> {
        self.last_update_tick
    }

    pub fn slot(&self) -> &EffectSlot {
        &self.slot
    }

    /// Run one frame of the held effect.
    pub fn render(
        &mut self,
        color: PixelColor,
        brightness: u8,
        tick: u32,
        interval: u32,
        random: &mut dyn RandomSource,
        leds: &mut [PixelColor],
    ) {
        let mut ctx = RenderContext::new(
            color,
            brightness,
            tick,
            interval,
            random,
            &mut self.last_update_tick,
        );
        self.slot.render(&mut ctx, leds);
    }
}
