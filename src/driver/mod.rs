//! Multi-channel orchestrator.
//!
//! A periodic thread renders every channel, applies the shared current
//! budget, encodes, and hands the frames to each channel's transmission
//! worker. All configuration calls go through the same lock as the tick,
//! so a tick never observes a half-applied change.

mod registry;

use std::{
    sync::{
        Arc, Mutex, MutexGuard, PoisonError,
        atomic::{AtomicBool, Ordering},
    },
    thread::{self, JoinHandle},
    time,
};

use embassy_time::Instant;
use log::{error, info, warn};

use self::registry::{ChannelEntry, ChannelRegistry};
use crate::{
    channel::{ChannelId, PixelChannel},
    color::PixelColor,
    config::{ChannelConfig, DriverConfig},
    engine::{EffectEngine, EffectInfo},
    error::{Error, Result},
    filter::CurrentLimiter,
    frame_scheduler::{FrameScheduler, period_for_rate},
    persistence::{self, NullStore, SettingsStore, StoredEffect},
    pipeline::{Completion, SentNotifier, TransmitLink, TransmitStats, TransportProvider},
    random::{RandomSource, XorShift32},
};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Everything one tick touches
struct DriverCore {
    config: DriverConfig,
    engine: EffectEngine,
    limiter: CurrentLimiter,
    registry: ChannelRegistry,
    random: Box<dyn RandomSource + Send>,
    tick: u32,
}

impl DriverCore {
    fn total_current_ma(&self) -> u32 {
        let per_component = self.config.current_per_component_ma;
        self.registry
            .iter()
            .map(|e| e.channel.predicted_current_ma(per_component))
            .sum()
    }

    /// Render, budget, encode and transmit every channel once.
    fn run_tick(&mut self) {
        let tick = self.tick;
        for entry in self.registry.iter_mut() {
            entry
                .channel
                .render(&self.engine, tick, self.random.as_mut());
        }

        let factor = self.limiter.scale_factor(self.total_current_ma());
        for entry in self.registry.iter_mut() {
            entry.channel.apply_scaling(factor);
        }

        for entry in self.registry.iter() {
            if let Some(link) = &entry.link {
                link.submit(|buf| entry.channel.encode(buf));
            }
        }

        self.tick = tick.wrapping_add(1);
    }

    /// Terminate every transmission worker; `start` reopens them.
    fn close_links(&mut self) {
        for entry in self.registry.iter_mut() {
            if let Some(mut link) = entry.link.take() {
                link.shutdown();
            }
        }
    }
}

struct Shared<P> {
    core: Mutex<DriverCore>,
    provider: Mutex<P>,
    store: Mutex<Box<dyn SettingsStore>>,
    running: AtomicBool,
}

impl<P: TransportProvider> Shared<P> {
    /// Configure a transport for `channel` and start its worker.
    fn open_link(&self, channel: &PixelChannel) -> Result<TransmitLink> {
        let completion = Arc::new(Completion::new());
        let notifier = SentNotifier::new(Arc::clone(&completion));
        let transport = lock(&self.provider)
            .configure(channel.config(), notifier)
            .map_err(|e| {
                error!(
                    "failed to configure transport for channel {} on pin {}: {e}",
                    channel.id(),
                    channel.config().pin
                );
                Error::from(e)
            })?;
        TransmitLink::spawn(channel.id(), transport, completion)
    }
}

/// Builder for [`PixelDriver`]
pub struct PixelDriverBuilder<P> {
    provider: P,
    config: DriverConfig,
    engine: Option<EffectEngine>,
    store: Box<dyn SettingsStore>,
    random: Box<dyn RandomSource + Send>,
}

impl<P: TransportProvider + 'static> PixelDriverBuilder<P> {
    #[must_use]
    pub fn with_config(mut self, config: DriverConfig) -> Self {
        self.config = config;
        self
    }

    /// Use an engine with caller registered effects
    #[must_use]
    pub fn with_engine(mut self, engine: EffectEngine) -> Self {
        self.engine = Some(engine);
        self
    }

    #[must_use]
    pub fn with_store(mut self, store: impl SettingsStore + 'static) -> Self {
        self.store = Box::new(store);
        self
    }

    /// Randomness for sparkle, twinkle, fire and meteor
    #[must_use]
    pub fn with_random(mut self, random: impl RandomSource + Send + 'static) -> Self {
        self.random = Box::new(random);
        self
    }

    pub fn build(self) -> PixelDriver<P> {
        let Self {
            provider,
            mut config,
            engine,
            store,
            random,
        } = self;
        config.update_rate_hz = config.update_rate_hz.max(1);
        let mut engine = engine.unwrap_or_default();
        engine.set_update_rate(config.update_rate_hz);
        info!("pixel driver initialized at {} Hz", config.update_rate_hz);

        PixelDriver {
            shared: Arc::new(Shared {
                core: Mutex::new(DriverCore {
                    limiter: CurrentLimiter::from_config(&config),
                    config,
                    engine,
                    registry: ChannelRegistry::default(),
                    random,
                    tick: 0,
                }),
                provider: Mutex::new(provider),
                store: Mutex::new(store),
                running: AtomicBool::new(false),
            }),
            task: Mutex::new(None),
        }
    }
}

/// Owns the channels, their workers and the periodic render thread.
pub struct PixelDriver<P: TransportProvider + 'static> {
    shared: Arc<Shared<P>>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl<P: TransportProvider + 'static> PixelDriver<P> {
    pub fn new(provider: P, config: DriverConfig) -> Self {
        Self::builder(provider).with_config(config).build()
    }

    pub fn builder(provider: P) -> PixelDriverBuilder<P> {
        PixelDriverBuilder {
            provider,
            config: DriverConfig::default(),
            engine: None,
            store: Box::new(NullStore),
            random: Box::new(XorShift32::default()),
        }
    }

    fn core(&self) -> MutexGuard<'_, DriverCore> {
        lock(&self.shared.core)
    }

    /// Register a strip and start its transmission worker.
    ///
    /// Stored settings for the new id are applied when present. A transport
    /// or worker failure only rejects this channel.
    pub fn add_channel(&self, config: ChannelConfig) -> Result<ChannelId> {
        let mut core = self.core();
        let id = core.registry.allocate_id();
        let mut channel = PixelChannel::new(id, config);

        let link = self.shared.open_link(&channel)?;

        let mut effect = channel.effect().clone();
        if persistence::restore(lock(&self.shared.store).as_mut(), id, &mut effect) {
            channel.set_effect(effect);
        }

        info!(
            "added channel {id}: pin {}, {} pixels, {:?}",
            channel.config().pin,
            channel.pixel_count(),
            channel.format()
        );
        core.registry.insert(ChannelEntry {
            channel,
            link: Some(link),
        });
        Ok(id)
    }

    /// Stop the channel's worker and forget the channel.
    pub fn remove_channel(&self, id: ChannelId) -> Result<()> {
        let entry = self
            .core()
            .registry
            .remove(id)
            .ok_or(Error::UnknownChannel(id))?;
        drop(entry);
        info!("removed channel {id}");
        Ok(())
    }

    pub fn channel_ids(&self) -> Vec<ChannelId> {
        self.core().registry.ids()
    }

    pub fn channel_count(&self) -> usize {
        self.core().registry.len()
    }

    /// Default target for single-channel operations
    pub fn main_channel(&self) -> Option<ChannelId> {
        self.core().registry.main()
    }

    /// Read access to a channel under the driver lock
    pub fn with_channel<R>(&self, id: ChannelId, f: impl FnOnce(&PixelChannel) -> R) -> Result<R> {
        let core = self.core();
        let entry = core.registry.get(id).ok_or(Error::UnknownChannel(id))?;
        Ok(f(&entry.channel))
    }

    /// Mutate a channel between ticks
    pub fn with_channel_mut<R>(
        &self,
        id: ChannelId,
        f: impl FnOnce(&mut PixelChannel) -> R,
    ) -> Result<R> {
        let mut core = self.core();
        let entry = core.registry.get_mut(id).ok_or(Error::UnknownChannel(id))?;
        Ok(f(&mut entry.channel))
    }

    fn for_each_channel(&self, mut f: impl FnMut(&mut PixelChannel)) {
        for entry in self.core().registry.iter_mut() {
            f(&mut entry.channel);
        }
    }

    pub fn set_all_effect(&self, effect: &str) {
        self.for_each_channel(|ch| ch.set_effect_id(effect));
    }

    pub fn set_all_color(&self, color: PixelColor) {
        self.for_each_channel(|ch| ch.set_color(color));
    }

    pub fn set_all_brightness(&self, brightness: u8) {
        self.for_each_channel(|ch| ch.set_brightness(brightness));
    }

    pub fn set_all_enabled(&self, enabled: bool) {
        self.for_each_channel(|ch| ch.set_enabled(enabled));
    }

    /// Total budget in mA, `None` lifts the limit
    pub fn set_current_limit(&self, limit_ma: Option<u32>) {
        let mut core = self.core();
        core.config.current_limit_ma = limit_ma;
        core.limiter.set_limit_ma(limit_ma);
        match limit_ma {
            Some(limit) => info!("current limit set to {limit} mA"),
            None => info!("current limit removed"),
        }
    }

    pub fn current_limit(&self) -> Option<u32> {
        self.core().limiter.limit_ma()
    }

    /// Change the tick rate; effect intervals and pacing follow immediately
    pub fn set_update_rate(&self, rate_hz: u32) {
        let rate = rate_hz.max(1);
        let mut core = self.core();
        core.config.update_rate_hz = rate;
        core.engine.set_update_rate(rate);
        info!("update rate set to {rate} Hz");
    }

    pub fn update_rate(&self) -> u32 {
        self.core().config.update_rate_hz
    }

    /// Predicted draw of all logical buffers, before limiting
    pub fn total_current_ma(&self) -> u32 {
        self.core().total_current_ma()
    }

    /// Predicted draw after the current limiting factor
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
    pub fn scaled_current_ma(&self) -> u32 {
        let core = self.core();
        let total = core.total_current_ma();
        (total as f32 * core.limiter.scale_factor(total)) as u32
    }

    pub fn current_scale_factor(&self) -> f32 {
        let core = self.core();
        core.limiter.scale_factor(core.total_current_ma())
    }

    pub fn effects(&self) -> Vec<EffectInfo> {
        self.core().engine.effects()
    }

    pub fn tick_count(&self) -> u32 {
        self.core().tick
    }

    pub fn transmit_stats(&self, id: ChannelId) -> Result<TransmitStats> {
        let core = self.core();
        let entry = core.registry.get(id).ok_or(Error::UnknownChannel(id))?;
        Ok(entry.link.as_ref().map(TransmitLink::stats).unwrap_or_default())
    }

    /// Persist the channel's effect, color, brightness, speed and enabled flag
    pub fn save_channel(&self, id: ChannelId) -> Result<()> {
        let stored = self.with_channel(id, |ch| StoredEffect::from_config(ch.effect()))?;
        let blob = stored.encode()?;
        lock(&self.shared.store).save(id, &blob).map_err(|e| {
            warn!("failed to save settings for channel {id}: {e}");
            Error::from(e)
        })
    }

    /// Run exactly one orchestrator period on the calling thread.
    pub fn tick_once(&self) {
        self.core().run_tick();
    }

    pub fn is_running(&self) -> bool {
        self.shared.running.load(Ordering::Acquire)
    }

    /// Reopen missing transmission workers and start the periodic thread.
    pub fn start(&self) -> Result<()> {
        if self.is_running() {
            return Ok(());
        }
        // a loop told to stop from inside a tick may still be draining
        if let Some(stale) = lock(&self.task).take() {
            if stale.join().is_err() {
                error!("driver thread panicked");
            }
        }
        if self.shared.running.swap(true, Ordering::AcqRel) {
            return Ok(());
        }

        {
            let mut core = self.core();
            for entry in core.registry.iter_mut() {
                if entry.link.is_none() {
                    match self.shared.open_link(&entry.channel) {
                        Ok(link) => entry.link = Some(link),
                        Err(e) => error!("channel {} stays dark: {e}", entry.channel.id()),
                    }
                }
            }
        }

        let shared = Arc::clone(&self.shared);
        let task = thread::Builder::new()
            .name("pixel-driver".into())
            .spawn(move || run_loop(&shared))
            .map_err(|e| {
                self.shared.running.store(false, Ordering::Release);
                error!("failed to spawn driver thread: {e}");
                Error::Spawn
            })?;
        *lock(&self.task) = Some(task);
        info!("pixel driver started");
        Ok(())
    }

    /// Stop the periodic thread and terminate every transmission worker.
    ///
    /// Safe to call repeatedly and while not running. Called from an effect
    /// callback it only requests the stop and returns: the tick in progress
    /// holds the driver lock, so the periodic thread finishes it and then
    /// drains the workers itself. [`start`](Self::start) and the other
    /// configuration calls would block on that lock and must not be used
    /// from a callback.
    pub fn stop(&self) {
        self.shared.running.store(false, Ordering::Release);
        let task = lock(&self.task).take();
        if let Some(task) = task {
            if task.thread().id() == thread::current().id() {
                *lock(&self.task) = Some(task);
                info!("pixel driver stop requested from its own thread");
                return;
            }
            if task.join().is_err() {
                error!("driver thread panicked");
            }
        }

        self.core().close_links();
        info!("pixel driver stopped");
    }

    /// Stop everything and drop all channels
    pub fn shutdown(&self) {
        self.stop();
        let removed = self.core().registry.drain();
        info!("pixel driver shut down, {} channels released", removed.len());
    }
}

impl<P: TransportProvider + 'static> Drop for PixelDriver<P> {
    fn drop(&mut self) {
        self.stop();
    }
}

fn run_loop<P>(shared: &Shared<P>) {
    let rate = lock(&shared.core).config.update_rate_hz;
    let mut scheduler = FrameScheduler::new(period_for_rate(rate));

    while shared.running.load(Ordering::Acquire) {
        {
            let mut core = lock(&shared.core);
            core.run_tick();
            let period = period_for_rate(core.config.update_rate_hz);
            if scheduler.frame_duration() != period {
                scheduler = FrameScheduler::new(period);
            }
        }

        let result = scheduler.tick(Instant::now());
        thread::sleep(time::Duration::from_micros(result.sleep_duration.as_micros()));
    }

    lock(&shared.core).close_links();
}
