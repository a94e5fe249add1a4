//! Watchdog feed hook.

use core::fmt;

/// Optional liveness callback invoked on every busy-wait iteration.
#[derive(Clone, Copy, Default)]
pub struct Watchdog<'d> {
    feed: Option<&'d dyn Fn()>,
}

impl<'d> Watchdog<'d> {
    /// No watchdog to feed.
    pub const fn none() -> Self {
        Self { feed: None }
    }

    /// Feed through `feed`.
    pub const fn new(feed: &'d dyn Fn()) -> Self {
        Self { feed: Some(feed) }
    }

    /// Whether a callback is installed.
    pub fn is_set(&self) -> bool {
        self.feed.is_some()
    }

    /// Invoke the callback, if any.
    #[inline]
    pub fn feed(&self) {
        if let Some(feed) = self.feed {
            feed();
        }
    }
}

impl<'d> From<Option<&'d dyn Fn()>> for Watchdog<'d> {
    fn from(feed: Option<&'d dyn Fn()>) -> Self {
        Self { feed }
    }
}

impl fmt::Debug for Watchdog<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Watchdog").field("set", &self.is_set()).finish()
    }
}
