//! Per-channel transmission: a worker thread per strip that hands encoded
//! frames to the transport and waits for the hardware to finish them.
//!
//! Producer (orchestrator) and worker meet through two binary signals:
//! transmit-requested, raised after a fresh frame was encoded, and
//! transmit-complete, raised from the transport's completion callback once
//! every byte of the frame went out.

mod signal;
mod transport;
mod worker;

pub use signal::BinarySignal;
pub use transport::{Completion, PixelTransport, SentNotifier, TransportProvider};
pub use worker::{TEARDOWN_POLL_INTERVAL, TEARDOWN_POLLS, TransmitLink, TransmitStats, WRITE_TIMEOUT};
