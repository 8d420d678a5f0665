//! Recording transport for driver tests.
//!
//! Frames are captured when the worker disables the line after a complete
//! transfer, so every recorded frame is one the driver considers sent.

use std::{
    sync::{Arc, Mutex},
    thread,
    time::{Duration, Instant},
};

use myrtio_pixel_driver::{
    ChannelConfig, PixelTransport, SentNotifier, TransportError, TransportProvider,
};

#[derive(Debug, Default)]
pub struct Recorder {
    /// Pins passed to `configure`, in call order
    pub configured: Vec<u32>,
    /// Completed frames with the pin they went out on
    pub frames: Vec<(u32, Vec<u8>)>,
    /// Blocking writes entered, including ones that later fail
    pub writes: usize,
}

/// How `write` treats the bytes that did not fit the preload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    Complete,
    /// Fails outright with an I/O error
    Fail,
    /// Returns early having sent half of the bytes
    Short,
    /// Blocks for the whole timeout and sends nothing
    Stall,
}

pub struct MockProvider {
    pub recorder: Arc<Mutex<Recorder>>,
    failing_pins: Vec<u32>,
    preload_capacity: usize,
    write_mode: WriteMode,
}

#[allow(dead_code)]
impl MockProvider {
    pub fn new() -> Self {
        Self {
            recorder: Arc::default(),
            failing_pins: Vec::new(),
            preload_capacity: 16,
            write_mode: WriteMode::Complete,
        }
    }

    pub fn failing_pin(mut self, pin: u32) -> Self {
        self.failing_pins.push(pin);
        self
    }

    pub fn with_write_mode(mut self, mode: WriteMode) -> Self {
        self.write_mode = mode;
        self
    }

    pub fn recorder(&self) -> Arc<Mutex<Recorder>> {
        Arc::clone(&self.recorder)
    }
}

impl TransportProvider for MockProvider {
    type Transport = MockTransport;

    fn configure(
        &mut self,
        config: &ChannelConfig,
        notifier: SentNotifier,
    ) -> Result<MockTransport, TransportError> {
        self.recorder.lock().unwrap().configured.push(config.pin);
        if self.failing_pins.contains(&config.pin) {
            return Err(TransportError::Config);
        }
        Ok(MockTransport {
            pin: config.pin,
            recorder: Arc::clone(&self.recorder),
            notifier,
            preload_capacity: self.preload_capacity,
            write_mode: self.write_mode,
            pending: Vec::new(),
        })
    }
}

pub struct MockTransport {
    pin: u32,
    recorder: Arc<Mutex<Recorder>>,
    notifier: SentNotifier,
    preload_capacity: usize,
    write_mode: WriteMode,
    pending: Vec<u8>,
}

impl PixelTransport for MockTransport {
    fn preload(&mut self, bytes: &[u8]) -> Result<usize, TransportError> {
        let count = bytes.len().min(self.preload_capacity);
        self.pending.clear();
        self.pending.extend_from_slice(&bytes[..count]);
        Ok(count)
    }

    fn enable(&mut self) -> Result<(), TransportError> {
        self.notifier.on_sent(self.pending.len());
        Ok(())
    }

    fn disable(&mut self) -> Result<(), TransportError> {
        if !self.pending.is_empty() {
            let frame = std::mem::take(&mut self.pending);
            self.recorder.lock().unwrap().frames.push((self.pin, frame));
        }
        Ok(())
    }

    fn write(
        &mut self,
        bytes: &[u8],
        timeout: myrtio_pixel_driver::Duration,
    ) -> Result<usize, TransportError> {
        self.recorder.lock().unwrap().writes += 1;
        match self.write_mode {
            WriteMode::Complete => {
                self.pending.extend_from_slice(bytes);
                self.notifier.on_sent(bytes.len());
                Ok(bytes.len())
            }
            WriteMode::Fail => {
                self.pending.clear();
                Err(TransportError::Io)
            }
            WriteMode::Short => {
                let sent = bytes.len() / 2;
                self.pending.clear();
                self.notifier.on_sent(sent);
                Ok(sent)
            }
            WriteMode::Stall => {
                thread::sleep(Duration::from_micros(timeout.as_micros()));
                self.pending.clear();
                Ok(0)
            }
        }
    }
}

/// Poll `condition` until it holds or two seconds pass.
pub fn wait_until(mut condition: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + Duration::from_secs(2);
    while Instant::now() < deadline {
        if condition() {
            return true;
        }
        thread::sleep(Duration::from_millis(5));
    }
    condition()
}
