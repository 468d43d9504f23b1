use crate::device::Gpu;
use crate::error::EngineError;
use crate::lifecycle::Release;

use super::ctx::FrameCtx;

/// What a frame callback did, and whether the loop should go on.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    /// A frame reached the screen.
    Presented,
    /// Nothing was presented this iteration; keep going.
    Skipped,
    /// The loop cannot continue.
    Exit,
}

/// Application contract implemented by higher layers.
///
/// GPU resources are acquired once the device exists and are handed back on
/// every frame. The runtime owns them through a
/// [`Lifecycle`](crate::lifecycle::Lifecycle) and releases them exactly once.
pub trait App {
    type Resources: Release;

    /// Creates every GPU resource the loop needs. Any error is fatal.
    fn acquire(&mut self, gpu: &Gpu<'_>) -> Result<Self::Resources, EngineError>;

    /// Called once per loop iteration to compose and present a frame.
    fn on_frame(&mut self, resources: &mut Self::Resources, ctx: &mut FrameCtx<'_, '_>) -> AppControl;
}
