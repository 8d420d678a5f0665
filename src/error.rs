//! Error types of the driver.
//!
//! Configuration input never produces an error; it is normalized instead.
//! What remains are hardware setup failures, which only affect the channel
//! being added, and storage failures.

use core::fmt;

use crate::channel::ChannelId;

/// Every fallible driver operation funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The transport could not be configured for a channel.
    Transport(TransportError),
    /// The transmission worker thread could not be created.
    Spawn,
    /// No channel with this id is registered.
    UnknownChannel(ChannelId),
    /// Settings could not be persisted.
    Storage(StorageError),
    /// Settings could not be serialized.
    Encode,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport(e) => write!(f, "transport: {e}"),
            Self::Spawn => write!(f, "failed to spawn transmission worker"),
            Self::UnknownChannel(id) => write!(f, "unknown channel {id}"),
            Self::Storage(e) => write!(f, "storage: {e}"),
            Self::Encode => write!(f, "settings encoding failed"),
        }
    }
}

impl core::error::Error for Error {}

/// Failures reported by a pixel transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportError {
    /// The peripheral rejected the pin, bit rate or format.
    Config,
    /// A bounded write did not finish in time.
    Timeout,
    /// Any other peripheral failure.
    Io,
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config => write!(f, "configuration rejected"),
            Self::Timeout => write!(f, "write timed out"),
            Self::Io => write!(f, "I/O failure"),
        }
    }
}

impl From<TransportError> for Error {
    fn from(e: TransportError) -> Self {
        Self::Transport(e)
    }
}

/// Failures reported by a settings store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageError {
    /// The backing store could not be opened.
    Unavailable,
    /// The blob could not be written or committed.
    Write,
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unavailable => write!(f, "store unavailable"),
            Self::Write => write!(f, "write failed"),
        }
    }
}

impl From<StorageError> for Error {
    fn from(e: StorageError) -> Self {
        Self::Storage(e)
    }
}

impl From<postcard::Error> for Error {
    fn from(_: postcard::Error) -> Self {
        Self::Encode
    }
}

pub type Result<T> = core::result::Result<T, Error>;
