//! Effect registry and per-channel frame computation

use alloc::{
    string::{String, ToString},
    sync::Arc,
    vec::Vec,
};
use core::fmt;

use log::{debug, warn};

use crate::{
    color::PixelColor,
    config::{DEFAULT_UPDATE_RATE_HZ, EffectConfig, MAX_SPEED, clamp_speed},
    effect::{EFFECT_NAME_CUSTOM, EFFECT_NAME_RAW, EffectId, EffectSlot, EffectState, SolidEffect},
    random::RandomSource,
};

/// Caller supplied effect registered under a name.
///
/// Receives the logical buffer, the channel's effect config and the tick.
pub type RegisteredEffectFn = Arc<dyn Fn(&mut [PixelColor], &EffectConfig, u32) + Send + Sync>;

#[derive(Clone)]
enum EffectKind {
    Builtin(EffectId),
    Registered(RegisteredEffectFn),
}

#[derive(Clone)]
struct EffectEntry {
    name: String,
    display_name: String,
    kind: EffectKind,
}

/// Listing entry returned by [`EffectEngine::effects`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EffectInfo {
    pub id: String,
    pub display_name: String,
}

/// Registry of named effects.
///
/// The set of effects is fixed once built, so a running driver never sees
/// a half-updated registry.
#[derive(Clone)]
pub struct EffectEngine {
    entries: Vec<EffectEntry>,
    update_rate_hz: u32,
}

impl fmt::Debug for EffectEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EffectEngine")
            .field("effects", &self.entries.iter().map(|e| e.name.as_str()).collect::<Vec<_>>())
            .field("update_rate_hz", &self.update_rate_hz)
            .finish()
    }
}

/// Collects registrations before the engine is built
pub struct EffectEngineBuilder {
    entries: Vec<EffectEntry>,
    update_rate_hz: u32,
}

impl EffectEngineBuilder {
    fn new(update_rate_hz: u32) -> Self {
        let entries = EffectId::ALL
            .into_iter()
            .map(|id| EffectEntry {
                name: String::from(id.as_str()),
                display_name: String::from(id.display_name()),
                kind: EffectKind::Builtin(id),
            })
            .collect();
        Self {
            entries,
            update_rate_hz: update_rate_hz.max(1),
        }
    }

    /// Add or replace a named effect. Reserved names are refused.
    #[must_use]
    pub fn register<F>(mut self, name: &str, display_name: &str, effect: F) -> Self
    where
        F: Fn(&mut [PixelColor], &EffectConfig, u32) + Send + Sync + 'static,
    {
        if is_reserved(name) {
            warn!("effect name {name} is reserved, registration ignored");
            return self;
        }
        let entry = EffectEntry {
            name: name.to_ascii_uppercase(),
            display_name: display_name.to_string(),
            kind: EffectKind::Registered(Arc::new(effect)),
        };
        match self.position(name) {
            Some(index) => self.entries[index] = entry,
            None => self.entries.push(entry),
        }
        self
    }

    /// Remove a named effect; requests for it fall back to solid afterwards
    #[must_use]
    pub fn unregister(mut self, name: &str) -> Self {
        if let Some(index) = self.position(name) {
            self.entries.remove(index);
        }
        self
    }

    pub fn build(self) -> EffectEngine {
        debug!("effect engine built with {} effects", self.entries.len());
        EffectEngine {
            entries: self.entries,
            update_rate_hz: self.update_rate_hz,
        }
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.entries
            .iter()
            .position(|e| e.name.eq_ignore_ascii_case(name))
    }
}

fn is_reserved(name: &str) -> bool {
    name.eq_ignore_ascii_case(EFFECT_NAME_RAW) || name.eq_ignore_ascii_case(EFFECT_NAME_CUSTOM)
}

impl Default for EffectEngine {
    fn default() -> Self {
        Self::new(DEFAULT_UPDATE_RATE_HZ)
    }
}

impl EffectEngine {
    /// Engine with only the built-in effects
    pub fn new(update_rate_hz: u32) -> Self {
        Self::builder(update_rate_hz).build()
    }

    pub fn builder(update_rate_hz: u32) -> EffectEngineBuilder {
        EffectEngineBuilder::new(update_rate_hz)
    }

    pub fn update_rate_hz(&self) -> u32 {
        self.update_rate_hz
    }

    pub fn set_update_rate(&mut self, update_rate_hz: u32) {
        self.update_rate_hz = update_rate_hz.max(1);
    }

    /// Ticks per step at speed 10, never zero
    pub fn base_interval(&self) -> u32 {
        (self.update_rate_hz / 10).max(1)
    }

    /// Step interval in ticks: `base * (11 - speed)` with speed clamped to 1..=10
    pub fn interval(&self, speed: u8) -> u32 {
        self.base_interval() * u32::from(MAX_SPEED + 1 - clamp_speed(speed))
    }

    /// All registered effects in registration order
    pub fn effects(&self) -> Vec<EffectInfo> {
        self.entries
            .iter()
            .map(|e| EffectInfo {
                id: e.name.clone(),
                display_name: e.display_name.clone(),
            })
            .collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }

    fn lookup(&self, name: &str) -> Option<&EffectEntry> {
        self.entries
            .iter()
            .find(|e| e.name.eq_ignore_ascii_case(name))
    }

    /// Compute one frame of `config` into `leds`.
    ///
    /// `state` is replaced with a fresh one whenever the requested effect
    /// name differs from the one it was created for. `RAW` leaves the
    /// buffer alone; unknown names render as solid.
    pub fn compute(
        &self,
        leds: &mut [PixelColor],
        config: &EffectConfig,
        state: &mut Option<EffectState>,
        tick: u32,
        random: &mut dyn RandomSource,
    ) {
        let name = config.effect.as_str();
        if name.eq_ignore_ascii_case(EFFECT_NAME_RAW) || leds.is_empty() {
            return;
        }

        if name.eq_ignore_ascii_case(EFFECT_NAME_CUSTOM) {
            reset_if_changed(state, name, || EffectSlot::Procedural);
            match &config.custom {
                Some(custom) => custom(leds, tick),
                None => leds.fill(config.color),
            }
            return;
        }

        let entry = self.lookup(name);
        let state = reset_if_changed(state, name, || match entry.map(|e| &e.kind) {
            Some(EffectKind::Builtin(id)) => id.to_slot(),
            Some(EffectKind::Registered(_)) => EffectSlot::Procedural,
            None => EffectSlot::Solid(SolidEffect),
        });

        if let Some(EffectKind::Registered(effect)) = entry.map(|e| &e.kind) {
            effect(leds, config, tick);
            return;
        }
        state.render(
            config.color,
            config.brightness,
            tick,
            self.interval(config.speed),
            random,
            leds,
        );
    }
}

fn reset_if_changed<'s>(
    state: &'s mut Option<EffectState>,
    name: &str,
    slot: impl FnOnce() -> EffectSlot,
) -> &'s mut EffectState {
    if state.as_ref().is_some_and(|s| !s.matches(name)) {
        *state = None;
    }
    state.get_or_insert_with(|| {
        debug!("effect state reset for {name}");
        EffectState::new(name, slot())
    })
}
