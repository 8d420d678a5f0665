use embassy_sync::{blocking_mutex::raw::CriticalSectionRawMutex, signal::Signal};

/// Single-slot wake-up flag.
///
/// Raising never blocks or allocates and is safe from interrupt context.
/// Several raises before a wait coalesce into one.
pub struct BinarySignal {
    inner: Signal<CriticalSectionRawMutex, ()>,
}

impl BinarySignal {
    pub const fn new() -> Self {
        Self {
            inner: Signal::new(),
        }
    }

    pub fn raise(&self) {
        self.inner.signal(());
    }

    pub fn clear(&self) {
        self.inner.reset();
    }

    pub fn is_raised(&self) -> bool {
        self.inner.signaled()
    }

    /// Park the calling thread until the signal is raised, consuming it.
    pub fn wait(&self) {
        futures_lite::future::block_on(self.inner.wait());
    }
}

impl Default for BinarySignal {
    fn default() -> Self {
        Self::new()
    }
}
