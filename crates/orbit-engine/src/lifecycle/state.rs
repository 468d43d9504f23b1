use super::Release;

/// Loop state. There is no paused state; `Terminated` is final.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum LifecycleState {
    Running,
    Terminated,
}

/// Termination triggers observed during one iteration.
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq)]
pub struct TerminationSignals {
    /// Escape went down at any point since the previous check.
    pub escape_pressed: bool,

    /// The window system asked the window to close.
    pub close_requested: bool,
}

impl TerminationSignals {
    pub fn any(&self) -> bool {
        self.escape_pressed || self.close_requested
    }
}

/// Owns the loop's resources and decides when the loop ends.
///
/// The termination check runs once per iteration through
/// [`end_iteration`](Self::end_iteration). Resources are released exactly once:
/// on the transition to `Terminated`, or by [`shutdown`](Self::shutdown) if the
/// loop is torn down some other way.
#[derive(Debug)]
pub struct Lifecycle<R: Release> {
    state: LifecycleState,
    frames: u64,
    resources: Option<R>,
}

impl<R: Release> Lifecycle<R> {
    pub fn new(resources: R) -> Self {
        Self {
            state: LifecycleState::Running,
            frames: 0,
            resources: Some(resources),
        }
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == LifecycleState::Running
    }

    /// Frames completed while running.
    pub fn frames_rendered(&self) -> u64 {
        self.frames
    }

    /// Live resources; `None` once released.
    pub fn resources(&self) -> Option<&R> {
        self.resources.as_ref()
    }

    pub fn resources_mut(&mut self) -> Option<&mut R> {
        self.resources.as_mut()
    }

    /// Counts a completed frame. Ignored after termination.
    pub fn record_frame(&mut self) {
        if self.is_running() {
            self.frames += 1;
        }
    }

    /// End-of-iteration termination check.
    ///
    /// Any trigger moves `Running` to `Terminated` and releases the
    /// resources. Further calls have no effect.
    pub fn end_iteration(&mut self, signals: TerminationSignals) -> LifecycleState {
        if self.is_running() && signals.any() {
            log::info!(
                "terminating after {} frames (escape: {}, close: {})",
                self.frames,
                signals.escape_pressed,
                signals.close_requested
            );
            self.shutdown();
        }
        self.state
    }

    /// Terminates and releases resources if that has not happened yet.
    pub fn shutdown(&mut self) {
        self.state = LifecycleState::Terminated;
        if let Some(resources) = self.resources.take() {
            log::debug!("releasing GPU resources");
            resources.release();
        }
    }
}

impl<R: Release> Drop for Lifecycle<R> {
    fn drop(&mut self) {
        self.shutdown();
    }
}
