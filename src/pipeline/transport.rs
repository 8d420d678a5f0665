//! The seam to the serial peripheral that clocks the bitstream out.

use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use embassy_time::Duration;

use super::BinarySignal;
use crate::{config::ChannelConfig, error::TransportError};

/// One configured output line.
///
/// Completion is reported out of band through the [`SentNotifier`] handed
/// to [`TransportProvider::configure`], possibly several times per frame.
pub trait PixelTransport: Send {
    /// Queue as many leading bytes as fit without blocking. Returns the count.
    fn preload(&mut self, bytes: &[u8]) -> Result<usize, TransportError>;

    fn enable(&mut self) -> Result<(), TransportError>;

    fn disable(&mut self) -> Result<(), TransportError>;

    /// Blocking write of the remainder, bounded by `timeout`.
    fn write(&mut self, bytes: &[u8], timeout: Duration) -> Result<usize, TransportError>;
}

/// Creates transports for new channels.
pub trait TransportProvider: Send {
    type Transport: PixelTransport + 'static;

    fn configure(
        &mut self,
        config: &ChannelConfig,
        notifier: SentNotifier,
    ) -> Result<Self::Transport, TransportError>;
}

/// Completion bookkeeping of the frame currently in flight
#[derive(Default)]
pub struct Completion {
    bytes_sent: AtomicUsize,
    expected: AtomicUsize,
    signal: BinarySignal,
}

impl Completion {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prepare for a frame of `len` bytes
    pub(crate) fn arm(&self, len: usize) {
        self.signal.clear();
        self.expected.store(len, Ordering::Release);
        self.bytes_sent.store(0, Ordering::Release);
    }

    pub(crate) fn wait(&self) {
        self.signal.wait();
    }

    /// Wake a worker blocked on completion without any bytes sent
    pub(crate) fn interrupt(&self) {
        self.signal.raise();
    }

    pub fn bytes_sent(&self) -> usize {
        self.bytes_sent.load(Ordering::Acquire)
    }

    fn record(&self, bytes: usize) {
        let total = self.bytes_sent.fetch_add(bytes, Ordering::AcqRel) + bytes;
        if total >= self.expected.load(Ordering::Acquire) {
            self.signal.raise();
        }
    }
}

/// Handle the transport calls from its completion interrupt.
///
/// Only updates an atomic counter and raises a signal: it never blocks
/// and never allocates.
#[derive(Clone)]
pub struct SentNotifier {
    completion: Arc<Completion>,
}

impl SentNotifier {
    pub fn new(completion: Arc<Completion>) -> Self {
        Self { completion }
    }

    /// Report `bytes` physically shifted out.
    pub fn on_sent(&self, bytes: usize) {
        self.completion.record(bytes);
    }
}
