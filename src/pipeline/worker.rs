use std::{
    sync::{
        Arc, Mutex, PoisonError,
        atomic::{AtomicBool, AtomicU32, Ordering},
    },
    thread::{self, JoinHandle},
    time,
};

use embassy_time::Duration;
use log::{debug, error, warn};

use super::{BinarySignal, Completion, PixelTransport};
use crate::{
    channel::ChannelId,
    error::{Error, Result, TransportError},
};

/// Bound on the blocking write of the bytes that did not fit the preload
pub const WRITE_TIMEOUT: Duration = Duration::from_secs(1);

/// Teardown waits `TEARDOWN_POLLS * TEARDOWN_POLL_INTERVAL` for the worker
pub const TEARDOWN_POLLS: u32 = 50;
pub const TEARDOWN_POLL_INTERVAL: time::Duration = time::Duration::from_millis(10);

/// Counters kept by a transmission worker
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransmitStats {
    /// Frames the hardware reported as fully sent
    pub frames_completed: u32,
    /// Cycles skipped because the transport failed
    pub failures: u32,
}

struct LinkShared {
    frame: Mutex<Vec<u8>>,
    requested: BinarySignal,
    completion: Arc<Completion>,
    terminate: AtomicBool,
    frames_completed: AtomicU32,
    failures: AtomicU32,
}

/// Producer side of a channel's transmission worker.
///
/// The frame buffer is single-slot: a frame encoded while the previous one
/// is still being sent replaces it, and consecutive requests coalesce, so
/// a slow transport drops frames instead of queueing them.
pub struct TransmitLink {
    channel: ChannelId,
    shared: Arc<LinkShared>,
    worker: Option<JoinHandle<()>>,
}

impl TransmitLink {
    /// Start the worker thread that owns `transport`.
    pub fn spawn<T>(channel: ChannelId, transport: T, completion: Arc<Completion>) -> Result<Self>
    where
        T: PixelTransport + 'static,
    {
        let shared = Arc::new(LinkShared {
            frame: Mutex::new(Vec::new()),
            requested: BinarySignal::new(),
            completion,
            terminate: AtomicBool::new(false),
            frames_completed: AtomicU32::new(0),
            failures: AtomicU32::new(0),
        });

        let worker_shared = Arc::clone(&shared);
        let worker = thread::Builder::new()
            .name(format!("pixel-tx-{channel}"))
            .spawn(move || run_worker(channel, transport, &worker_shared))
            .map_err(|e| {
                error!("failed to spawn transmission worker for channel {channel}: {e}");
                Error::Spawn
            })?;
        debug!("transmission worker for channel {channel} started");

        Ok(Self {
            channel,
            shared,
            worker: Some(worker),
        })
    }

    /// Encode a fresh frame into the transmission buffer and request it to
    /// be sent. Never waits for the hardware.
    pub fn submit(&self, encode: impl FnOnce(&mut Vec<u8>)) {
        {
            let mut frame = self
                .shared
                .frame
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            encode(&mut frame);
        }
        self.shared.requested.raise();
    }

    pub fn stats(&self) -> TransmitStats {
        TransmitStats {
            frames_completed: self.shared.frames_completed.load(Ordering::Relaxed),
            failures: self.shared.failures.load(Ordering::Relaxed),
        }
    }

    /// Ask the worker to exit and wait a bounded time for it.
    ///
    /// Returns `false` when the worker did not stop in time; it is then
    /// detached and left to exit on its own.
    pub fn shutdown(&mut self) -> bool {
        let Some(worker) = self.worker.take() else {
            return true;
        };
        self.shared.terminate.store(true, Ordering::Release);
        self.shared.requested.raise();
        self.shared.completion.interrupt();

        for _ in 0..TEARDOWN_POLLS {
            if worker.is_finished() {
                if worker.join().is_err() {
                    error!("transmission worker for channel {} panicked", self.channel);
                }
                debug!("transmission worker for channel {} stopped", self.channel);
                return true;
            }
            thread::sleep(TEARDOWN_POLL_INTERVAL);
        }

        warn!(
            "transmission worker for channel {} did not terminate, detaching it",
            self.channel
        );
        false
    }
}

impl Drop for TransmitLink {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn run_worker<T: PixelTransport>(channel: ChannelId, mut transport: T, shared: &LinkShared) {
    let mut scratch = Vec::new();
    loop {
        shared.requested.wait();
        if shared.terminate.load(Ordering::Acquire) {
            break;
        }

        {
            let frame = shared.frame.lock().unwrap_or_else(PoisonError::into_inner);
            scratch.clear();
            scratch.extend_from_slice(&frame);
        }
        if scratch.is_empty() {
            continue;
        }

        // arming clears the completion signal, which may hold a teardown wake-up
        shared.completion.arm(scratch.len());
        if shared.terminate.load(Ordering::Acquire) {
            break;
        }

        let result = transmit_frame(channel, &mut transport, &scratch, shared);
        if shared.terminate.load(Ordering::Acquire) {
            break;
        }
        match result {
            Ok(()) => {
                shared.frames_completed.fetch_add(1, Ordering::Relaxed);
            }
            Err(e) => {
                shared.failures.fetch_add(1, Ordering::Relaxed);
                warn!("channel {channel}: frame skipped, {e}");
            }
        }
    }

    if let Err(e) = transport.disable() {
        debug!("channel {channel}: disable on exit failed, {e}");
    }
    debug!("transmission worker for channel {channel} exiting");
}

/// One transmit cycle on an armed completion: preload, enable, write the
/// rest, wait for the completion callback, disable.
fn transmit_frame<T: PixelTransport>(
    channel: ChannelId,
    transport: &mut T,
    frame: &[u8],
    shared: &LinkShared,
) -> core::result::Result<(), TransportError> {
    let preloaded = transport.preload(frame)?.min(frame.len());
    transport.enable()?;

    if preloaded < frame.len() {
        let rest = &frame[preloaded..];
        let written = match transport.write(rest, WRITE_TIMEOUT) {
            Ok(written) => written,
            Err(e) => {
                disable_after_failure(channel, transport);
                return Err(e);
            }
        };
        if written < rest.len() {
            debug!(
                "channel {channel}: write stopped after {written} of {} bytes",
                rest.len()
            );
            disable_after_failure(channel, transport);
            return Err(TransportError::Timeout);
        }
    }

    shared.completion.wait();
    transport.disable()
}

fn disable_after_failure<T: PixelTransport>(channel: ChannelId, transport: &mut T) {
    if let Err(e) = transport.disable() {
        debug!("channel {channel}: disable after failed write failed, {e}");
    }
}
