//! Driver orchestration against a recording transport.

mod mock_transport;

mod tests {
    use std::{
        sync::{Arc, Mutex, OnceLock, Weak},
        thread,
        time::{Duration, Instant},
    };

    use myrtio_pixel_driver::{
        ChannelConfig, DriverConfig, EffectConfig, EffectEngine, Error, MemoryStore, PixelColor,
        PixelDriver, SettingsStore, StorageError, TransportError, TransportProvider,
        persistence::StoredEffect,
        pipeline::{
            Completion, SentNotifier, TEARDOWN_POLL_INTERVAL, TEARDOWN_POLLS, TransmitLink,
            TransmitStats,
        },
    };

    use crate::mock_transport::{MockProvider, WriteMode, wait_until};

    /// Store handle that stays inspectable after moving into the driver
    #[derive(Clone, Default)]
    struct SharedStore(Arc<Mutex<MemoryStore>>);

    impl SettingsStore for SharedStore {
        fn load(&mut self, id: u32) -> Option<Vec<u8>> {
            self.0.lock().unwrap().load(id)
        }

        fn save(&mut self, id: u32, blob: &[u8]) -> Result<(), StorageError> {
            self.0.lock().unwrap().save(id, blob)
        }
    }

    #[test]
    fn test_channels_and_main_promotion() {
        let driver = PixelDriver::new(MockProvider::new(), DriverConfig::default());
        assert_eq!(driver.main_channel(), None);

        let a = driver.add_channel(ChannelConfig::new(1, 4)).unwrap();
        let b = driver.add_channel(ChannelConfig::new(2, 4)).unwrap();
        let c = driver.add_channel(ChannelConfig::new(3, 4)).unwrap();
        assert_eq!((a, b, c), (0, 1, 2));
        assert_eq!(driver.main_channel(), Some(a));

        driver.remove_channel(a).unwrap();
        assert_eq!(driver.main_channel(), Some(b));
        assert_eq!(driver.channel_ids(), vec![b, c]);
        assert_eq!(driver.remove_channel(a), Err(Error::UnknownChannel(a)));

        let d = driver.add_channel(ChannelConfig::new(4, 4)).unwrap();
        assert_eq!(d, 3);
    }

    #[test]
    fn test_configure_failure_rejects_only_that_channel() {
        let provider = MockProvider::new().failing_pin(99);
        let recorder = provider.recorder();
        let driver = PixelDriver::new(provider, DriverConfig::default());

        let ok = driver.add_channel(ChannelConfig::new(1, 2)).unwrap();
        let failed = driver.add_channel(ChannelConfig::new(99, 2));
        assert_eq!(failed, Err(Error::Transport(TransportError::Config)));
        let next = driver.add_channel(ChannelConfig::new(2, 2)).unwrap();

        assert_eq!(driver.channel_ids(), vec![ok, next]);
        assert_eq!(next, 2);
        assert_eq!(recorder.lock().unwrap().configured, vec![1, 99, 2]);
    }

    #[test]
    fn test_tick_transmits_encoded_frame() {
        let provider = MockProvider::new();
        let recorder = provider.recorder();
        let driver = PixelDriver::new(provider, DriverConfig::default());
        let id = driver.add_channel(ChannelConfig::new(7, 5)).unwrap();
        driver
            .with_channel_mut(id, |ch| ch.set_color(PixelColor::rgb(0, 128, 255)))
            .unwrap();

        driver.tick_once();
        assert!(wait_until(|| !recorder.lock().unwrap().frames.is_empty()));

        let expected = driver
            .with_channel(id, |ch| {
                let mut frame = Vec::new();
                ch.encode(&mut frame);
                frame
            })
            .unwrap();
        let (pin, frame) = recorder.lock().unwrap().frames[0].clone();
        assert_eq!(pin, 7);
        assert_eq!(frame.len(), 5 * 9 + 17);
        assert_eq!(frame, expected);
        assert!(wait_until(|| driver.transmit_stats(id).unwrap().frames_completed == 1));
        assert_eq!(driver.tick_count(), 1);
    }

    #[test]
    fn test_current_limit_spans_channels() {
        let config = DriverConfig::default()
            .with_current_limit(Some(100))
            .with_system_reserve(20);
        let driver = PixelDriver::new(MockProvider::new(), config);
        let a = driver.add_channel(ChannelConfig::new(1, 1)).unwrap();
        let b = driver.add_channel(ChannelConfig::new(2, 1)).unwrap();
        driver.set_all_color(PixelColor::WHITE);

        driver.tick_once();
        assert_eq!(driver.total_current_ma(), 120);
        assert_eq!(driver.scaled_current_ma(), 80);
        assert!((driver.current_scale_factor() - 80.0 / 120.0).abs() < f32::EPSILON);
        for id in [a, b] {
            let scaled = driver.with_channel(id, |ch| ch.scaled_pixels()[0]).unwrap();
            assert_eq!(scaled, PixelColor::rgb(170, 170, 170));
        }

        driver.set_current_limit(None);
        assert_eq!(driver.current_limit(), None);
        driver.tick_once();
        let scaled = driver.with_channel(a, |ch| ch.scaled_pixels()[0]).unwrap();
        assert_eq!(scaled, PixelColor::WHITE);
    }

    #[test]
    fn test_disabled_channels_go_dark() {
        let driver = PixelDriver::new(MockProvider::new(), DriverConfig::default());
        let id = driver.add_channel(ChannelConfig::new(1, 3)).unwrap();
        driver.set_all_color(PixelColor::RED);
        driver.set_all_enabled(false);
        driver.tick_once();
        let dark = driver
            .with_channel(id, |ch| ch.scaled_pixels().iter().all(|p| p.is_black()))
            .unwrap();
        assert!(dark);
        assert_eq!(driver.total_current_ma(), 0);
    }

    #[test]
    fn test_failed_write_skips_frame_and_keeps_worker() {
        let provider = MockProvider::new().with_write_mode(WriteMode::Fail);
        let recorder = provider.recorder();
        let driver = PixelDriver::new(provider, DriverConfig::default());
        let id = driver.add_channel(ChannelConfig::new(1, 8)).unwrap();

        driver.tick_once();
        assert!(wait_until(|| driver.transmit_stats(id).unwrap().failures >= 1));
        driver.tick_once();
        assert!(wait_until(|| driver.transmit_stats(id).unwrap().failures >= 2));

        assert_eq!(driver.transmit_stats(id).unwrap().frames_completed, 0);
        assert!(recorder.lock().unwrap().frames.is_empty());
    }

    #[test]
    fn test_short_write_counts_as_failure() {
        let provider = MockProvider::new().with_write_mode(WriteMode::Short);
        let recorder = provider.recorder();
        let driver = PixelDriver::new(provider, DriverConfig::default());
        let id = driver.add_channel(ChannelConfig::new(1, 8)).unwrap();

        driver.tick_once();
        assert!(wait_until(|| driver.transmit_stats(id).unwrap().failures == 1));
        assert_eq!(driver.transmit_stats(id).unwrap().frames_completed, 0);
        assert_eq!(recorder.lock().unwrap().writes, 1);
        assert!(recorder.lock().unwrap().frames.is_empty());
    }

    #[test]
    fn test_shutdown_detaches_stuck_worker() {
        let mut provider = MockProvider::new().with_write_mode(WriteMode::Stall);
        let recorder = provider.recorder();
        let completion = Arc::new(Completion::new());
        let transport = provider
            .configure(
                &ChannelConfig::new(5, 8),
                SentNotifier::new(Arc::clone(&completion)),
            )
            .unwrap();
        let mut link = TransmitLink::spawn(0, transport, completion).unwrap();

        link.submit(|frame| frame.extend_from_slice(&[0xAA; 64]));
        assert!(wait_until(|| recorder.lock().unwrap().writes == 1));

        let started = Instant::now();
        assert!(!link.shutdown());
        let waited = started.elapsed();
        assert!(waited >= TEARDOWN_POLL_INTERVAL * TEARDOWN_POLLS);
        assert!(waited < Duration::from_millis(900));

        // already detached
        assert!(link.shutdown());
        assert_eq!(link.stats().frames_completed, 0);
    }

    #[test]
    fn test_stop_from_effect_callback() {
        let handle: Arc<OnceLock<Weak<PixelDriver<MockProvider>>>> = Arc::default();
        let engine = EffectEngine::builder(200)
            .register("HALT", "Halt", {
                let handle = Arc::clone(&handle);
                move |leds: &mut [PixelColor], _: &EffectConfig, _: u32| {
                    leds.fill(PixelColor::BLACK);
                    if let Some(driver) = handle.get().and_then(Weak::upgrade) {
                        driver.stop();
                    }
                }
            })
            .build();
        let driver = Arc::new(
            PixelDriver::builder(MockProvider::new())
                .with_config(DriverConfig::default().with_update_rate(200))
                .with_engine(engine)
                .build(),
        );
        assert!(handle.set(Arc::downgrade(&driver)).is_ok());
        let id = driver.add_channel(ChannelConfig::new(1, 4)).unwrap();
        driver.set_all_effect("HALT");

        driver.start().unwrap();
        assert!(wait_until(|| !driver.is_running()));
        let ticks = driver.tick_count();
        thread::sleep(Duration::from_millis(50));
        assert_eq!(driver.tick_count(), ticks);
        assert!(wait_until(|| {
            driver.transmit_stats(id).unwrap() == TransmitStats::default()
        }));

        driver.set_all_effect("SOLID");
        driver.start().unwrap();
        assert!(wait_until(|| driver.transmit_stats(id).unwrap().frames_completed >= 2));
        driver.stop();
        assert!(!driver.is_running());
    }

    #[test]
    fn test_start_stop_cycle() {
        let provider = MockProvider::new();
        let recorder = provider.recorder();
        let driver = PixelDriver::new(provider, DriverConfig::default().with_update_rate(200));
        let id = driver.add_channel(ChannelConfig::new(3, 4)).unwrap();

        driver.start().unwrap();
        assert!(driver.is_running());
        assert!(wait_until(|| driver.transmit_stats(id).unwrap().frames_completed >= 3));

        driver.stop();
        assert!(!driver.is_running());
        assert_eq!(driver.transmit_stats(id).unwrap(), TransmitStats::default());
        let ticks = driver.tick_count();
        thread::sleep(Duration::from_millis(50));
        assert_eq!(driver.tick_count(), ticks);
        driver.stop();

        driver.start().unwrap();
        assert_eq!(recorder.lock().unwrap().configured, vec![3, 3]);
        assert!(wait_until(|| driver.tick_count() > ticks + 2));
        driver.shutdown();
        assert_eq!(driver.channel_count(), 0);
    }

    #[test]
    fn test_settings_restored_and_saved() {
        let store = SharedStore::default();
        let stored = StoredEffect::from_config(
            &EffectConfig::new("BLINK")
                .with_color(PixelColor::RED)
                .with_brightness(77)
                .with_speed(9),
        );
        store.0.lock().unwrap().insert(0, stored.encode().unwrap());

        let driver = PixelDriver::builder(MockProvider::new())
            .with_store(store.clone())
            .build();
        let id = driver.add_channel(ChannelConfig::new(1, 2)).unwrap();
        let effect = driver.with_channel(id, |ch| ch.effect().clone()).unwrap();
        assert_eq!(effect.effect, "BLINK");
        assert_eq!(effect.color, PixelColor::RED);
        assert_eq!(effect.brightness, 77);
        assert_eq!(effect.speed, 9);

        driver.with_channel_mut(id, |ch| ch.set_brightness(12)).unwrap();
        driver.save_channel(id).unwrap();
        let blob = store.0.lock().unwrap().get(id).map(<[u8]>::to_vec).unwrap();
        assert_eq!(StoredEffect::decode(&blob).map(|s| s.brightness), Some(12));

        let other = driver.add_channel(ChannelConfig::new(2, 2)).unwrap();
        let effect = driver.with_channel(other, |ch| ch.effect().clone()).unwrap();
        assert_eq!(effect.effect, "SOLID");
    }

    #[test]
    fn test_rate_and_listing() {
        let driver = PixelDriver::new(MockProvider::new(), DriverConfig::default());
        assert_eq!(driver.update_rate(), 60);
        driver.set_update_rate(0);
        assert_eq!(driver.update_rate(), 1);
        assert_eq!(driver.effects().len(), 16);
        assert_eq!(driver.effects()[0].id, "SOLID");
    }
}
