#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod channel;
pub mod color;
pub mod config;
pub mod effect;
pub mod engine;
pub mod error;
pub mod filter;
pub mod frame_scheduler;
pub mod gamma;
pub mod math8;
pub mod persistence;
pub mod preview;
pub mod protocol;
pub mod random;

#[cfg(feature = "std")]
pub mod driver;
#[cfg(feature = "std")]
pub mod pipeline;

#[cfg(feature = "esp32-log")]
pub mod logger;

pub use channel::{ChannelId, PixelChannel};
pub use color::{Hsv, PixelColor, PixelFormat, Rgb};
pub use config::{ChannelConfig, DriverConfig, EffectConfig};
pub use effect::{EffectId, EffectSlot, EffectState};
pub use engine::{EffectEngine, EffectInfo};
pub use error::{Error, Result, StorageError, TransportError};
pub use filter::{CurrentLimiter, compute_scale_factor};
pub use frame_scheduler::FrameScheduler;
pub use persistence::{MemoryStore, SettingsStore};
pub use preview::PixelPreview;
pub use random::{RandomSource, XorShift32};

#[cfg(feature = "std")]
pub use driver::{PixelDriver, PixelDriverBuilder};
#[cfg(feature = "std")]
pub use pipeline::{PixelTransport, SentNotifier, TransportProvider};

pub use embassy_time::{Duration, Instant};
