//! Device-automation session boundary
//!
//! The automation driver (Appium or equivalent) is an external collaborator.
//! The locator never owns or mutates driver state; callers hold a session
//! handle and pass it explicitly where a helper needs it (for example
//! [`actions::find_and_tap`](crate::actions::find_and_tap)). The handle is
//! also where callers obtain the logical screen size the engine requires.

use async_trait::async_trait;

use crate::{error::LocatorResult, model::Dimension};

/// Handle to an open device-automation session
#[async_trait]
pub trait DeviceSession: Send + Sync {
    /// Logical screen size as the driver reports it
    async fn screen_size(&self) -> LocatorResult<Dimension>;

    /// Dismisses the on-screen keyboard if one is showing
    async fn hide_keyboard(&self) -> LocatorResult<()>;

    /// Taps at logical screen coordinates
    async fn tap(&self, x: f64, y: f64) -> LocatorResult<()>;

    /// Swipes from one logical point to another over `duration_ms`
    async fn swipe(&self, from: (f64, f64), to: (f64, f64), duration_ms: u64)
    -> LocatorResult<()>;
}

/// Mock session recording the calls made against it, for tests
#[derive(Debug, Default)]
pub struct MockSession {
    screen:       Option<Dimension>,
    taps:         std::sync::Mutex<Vec<(f64, f64)>>,
    swipes:       std::sync::Mutex<Vec<((f64, f64), (f64, f64), u64)>>,
    keyboard_ops: std::sync::atomic::AtomicU32,
}

impl MockSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the screen size the session reports
    pub fn with_screen(mut self, screen: Dimension) -> Self {
        self.screen = Some(screen);
        self
    }

    /// The taps performed so far, in order
    pub fn taps(&self) -> Vec<(f64, f64)> {
        self.taps.lock().expect("taps lock poisoned").clone()
    }

    /// The swipes performed so far, in order
    pub fn swipes(&self) -> Vec<((f64, f64), (f64, f64), u64)> {
        self.swipes.lock().expect("swipes lock poisoned").clone()
    }

    pub fn hide_keyboard_count(&self) -> u32 {
        self.keyboard_ops.load(std::sync::atomic::Ordering::SeqCst)
    }
}

#[async_trait]
impl DeviceSession for MockSession {
    async fn screen_size(&self) -> LocatorResult<Dimension> {
        Ok(self.screen.unwrap_or(Dimension::new(414, 736)))
    }

    async fn hide_keyboard(&self) -> LocatorResult<()> {
        self.keyboard_ops
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        Ok(())
    }

    async fn tap(&self, x: f64, y: f64) -> LocatorResult<()> {
        self.taps.lock().expect("taps lock poisoned").push((x, y));
        Ok(())
    }

    async fn swipe(
        &self,
        from: (f64, f64),
        to: (f64, f64),
        duration_ms: u64,
    ) -> LocatorResult<()> {
        self.swipes
            .lock()
            .expect("swipes lock poisoned")
            .push((from, to, duration_ms));
        Ok(())
    }
}
