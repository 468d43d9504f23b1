use anyhow::{Context, Result};
use ouroboros::self_referencing;

use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use crate::core::{App, AppControl, FrameCtx};
use crate::device::{Gpu, GpuInit};
use crate::error::{EngineError, SetupError};
use crate::input::{InputFrame, InputState, Key, KeyEvent, KeyState};
use crate::lifecycle::{Lifecycle, LifecycleState, Release, TerminationSignals};
use crate::time::{FrameTime, MonotonicTicks};

/// Window/runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,

    /// Inner size in physical pixels.
    pub width: u32,
    pub height: u32,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "orbit".to_string(),
            width: 1024,
            height: 768,
        }
    }
}

/// Entry point for the runtime.
pub struct Runtime;

impl Runtime {
    /// Opens the window, acquires the app's resources and runs frames until
    /// escape or a close request.
    ///
    /// Returns `Err` if any setup step failed; `Ok` after a user-requested exit.
    pub fn run<A>(config: RuntimeConfig, gpu_init: GpuInit, app: A) -> Result<()>
    where
        A: App + 'static,
    {
        let event_loop =
            EventLoop::new().map_err(|e| EngineError::from(SetupError::WindowingInit(e)))?;
        let mut state = AppState::new(config, gpu_init, app);

        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        if let Some(err) = state.setup_error.take() {
            return Err(err.into());
        }

        log::info!("exited after {} frames", state.frames_rendered);
        Ok(())
    }
}

#[self_referencing]
struct WindowEntry {
    input_state: InputState,
    input_frame: InputFrame,
    close_requested: bool,

    window: Window,

    #[borrows(window)]
    #[covariant]
    gpu: Gpu<'this>,
}

struct AppState<A>
where
    A: App + 'static,
{
    config: RuntimeConfig,
    gpu_init: GpuInit,
    app: A,
    ticks: MonotonicTicks,

    // Field order is drop order: resources go before the surface and window.
    lifecycle: Option<Lifecycle<A::Resources>>,
    window: Option<WindowEntry>,

    surface_lost: bool,
    frames_rendered: u64,
    setup_error: Option<EngineError>,
}

impl<A> AppState<A>
where
    A: App + 'static,
{
    fn new(config: RuntimeConfig, gpu_init: GpuInit, app: A) -> Self {
        Self {
            config,
            gpu_init,
            app,
            ticks: MonotonicTicks::new(),
            lifecycle: None,
            window: None,
            surface_lost: false,
            frames_rendered: 0,
            setup_error: None,
        }
    }

    fn start(&mut self, event_loop: &ActiveEventLoop) -> Result<(), EngineError> {
        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(PhysicalSize::new(self.config.width, self.config.height))
            .with_resizable(false);

        let window = event_loop
            .create_window(attrs)
            .map_err(SetupError::WindowCreation)?;

        let gpu_init = self.gpu_init.clone();
        let entry = WindowEntryTryBuilder {
            input_state: InputState::default(),
            input_frame: InputFrame::default(),
            close_requested: false,
            window,
            gpu_builder: |w| pollster::block_on(Gpu::new(w, gpu_init)),
        }
        .try_build()?;

        let resources = entry.with_gpu(|gpu| self.app.acquire(gpu))?;

        self.lifecycle = Some(Lifecycle::new(resources));
        self.window = Some(entry);
        self.ticks = MonotonicTicks::new();
        Ok(())
    }

    /// Releases resources, then the surface/device, then the window.
    fn teardown(&mut self) {
        if let Some(mut lifecycle) = self.lifecycle.take() {
            self.frames_rendered = lifecycle.frames_rendered();
            lifecycle.shutdown();
        }
        if self.window.take().is_some() {
            log::debug!("window and GPU context closed");
        }
    }

    fn render(&mut self) {
        let (Some(entry), Some(lifecycle)) = (self.window.as_mut(), self.lifecycle.as_mut()) else {
            return;
        };
        if !lifecycle.is_running() {
            return;
        }

        let time = FrameTime {
            elapsed: self.ticks.elapsed_secs(),
        };

        let app = &mut self.app;
        let mut control = AppControl::Skipped;

        if let Some(resources) = lifecycle.resources_mut() {
            entry.with_mut(|fields| {
                let mut ctx = FrameCtx {
                    window: fields.window,
                    gpu: fields.gpu,
                    time,
                };
                control = app.on_frame(resources, &mut ctx);
            });
        }

        if settle_frame(lifecycle, control) {
            self.surface_lost = true;
        }
    }

    /// Single per-iteration termination check, after events were drained.
    fn check_termination(&mut self) -> LifecycleState {
        let Some(entry) = self.window.as_mut() else {
            return LifecycleState::Terminated;
        };

        let surface_lost = self.surface_lost;
        let signals = entry.with_mut(|fields| {
            collect_signals(
                fields.input_state,
                fields.input_frame,
                *fields.close_requested,
                surface_lost,
            )
        });

        match self.lifecycle.as_mut() {
            Some(lifecycle) => {
                let state = lifecycle.end_iteration(signals);
                self.frames_rendered = lifecycle.frames_rendered();
                state
            }
            None => LifecycleState::Terminated,
        }
    }
}

impl<A> ApplicationHandler for AppState<A>
where
    A: App + 'static,
{
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() || self.setup_error.is_some() {
            return;
        }

        match self.start(event_loop) {
            Ok(()) => {
                if let Some(entry) = &self.window {
                    entry.with_window(|w| w.request_redraw());
                }
            }
            Err(err) => {
                log::error!("setup failed: {err}");
                self.setup_error = Some(err);
                event_loop.exit();
            }
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            return;
        }

        match self.check_termination() {
            LifecycleState::Terminated => {
                self.teardown();
                event_loop.exit();
            }
            LifecycleState::Running => {
                event_loop.set_control_flow(ControlFlow::Wait);
                if let Some(entry) = &self.window {
                    entry.with_window(|w| w.request_redraw());
                }
            }
        }
    }

    fn window_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match &event {
            WindowEvent::RedrawRequested => self.render(),

            WindowEvent::CloseRequested => {
                if let Some(entry) = self.window.as_mut() {
                    entry.with_close_requested_mut(|c| *c = true);
                }
            }

            WindowEvent::KeyboardInput { event, .. } => {
                let ev = KeyEvent {
                    key: map_key(event.physical_key),
                    state: match event.state {
                        ElementState::Pressed => KeyState::Pressed,
                        ElementState::Released => KeyState::Released,
                    },
                };
                if let Some(entry) = self.window.as_mut() {
                    entry.with_mut(|fields| fields.input_state.apply_key(fields.input_frame, ev));
                }
            }

            WindowEvent::Focused(focused) => {
                if let Some(entry) = self.window.as_mut() {
                    entry.with_input_state_mut(|s| s.set_focused(*focused));
                }
            }

            WindowEvent::Resized(new_size) => {
                if let Some(entry) = self.window.as_mut() {
                    entry.with_gpu_mut(|gpu| gpu.resize(*new_size));
                }
            }

            WindowEvent::ScaleFactorChanged { .. } => {
                if let Some(entry) = self.window.as_mut() {
                    let new_size = entry.with_window(|w| w.inner_size());
                    entry.with_gpu_mut(|gpu| gpu.resize(new_size));
                }
            }

            _ => {}
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        self.teardown();
    }
}

/// Counts the frame if it was presented. Returns true if the loop must end.
fn settle_frame<R: Release>(lifecycle: &mut Lifecycle<R>, control: AppControl) -> bool {
    match control {
        AppControl::Presented => {
            lifecycle.record_frame();
            false
        }
        AppControl::Skipped => false,
        AppControl::Exit => true,
    }
}

/// Termination triggers seen since the previous check; clears `frame`.
///
/// Escape counts if it is held or was pressed at any point since the last
/// clear. A lost surface ends the loop the same way a close request does.
fn collect_signals(
    input: &InputState,
    frame: &mut InputFrame,
    close_requested: bool,
    surface_lost: bool,
) -> TerminationSignals {
    let signals = TerminationSignals {
        escape_pressed: input.key_pressed_since(frame, Key::Escape),
        close_requested: close_requested || surface_lost,
    };
    frame.clear();
    signals
}

fn map_key(pk: PhysicalKey) -> Key {
    match pk {
        PhysicalKey::Code(KeyCode::Escape) => Key::Escape,
        PhysicalKey::Code(other) => Key::Unknown(other as u32),
        // NativeKeyCode is not a u32 in winit 0.30.
        PhysicalKey::Unidentified(_) => Key::Unknown(0),
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;

    struct Counted(Rc<Cell<u32>>);

    impl Release for Counted {
        fn release(self) {
            self.0.set(self.0.get() + 1);
        }
    }

    fn key(state: KeyState) -> KeyEvent {
        KeyEvent {
            key: Key::Escape,
            state,
        }
    }

    #[test]
    fn quiet_iteration_has_no_signals() {
        let input = InputState::default();
        let mut frame = InputFrame::default();

        let signals = collect_signals(&input, &mut frame, false, false);
        assert_eq!(signals, TerminationSignals::default());
    }

    #[test]
    fn escape_tapped_between_checks_is_seen_once() {
        let mut input = InputState::default();
        let mut frame = InputFrame::default();
        input.apply_key(&mut frame, key(KeyState::Pressed));
        input.apply_key(&mut frame, key(KeyState::Released));

        let first = collect_signals(&input, &mut frame, false, false);
        assert!(first.escape_pressed);
        assert!(!first.close_requested);

        let second = collect_signals(&input, &mut frame, false, false);
        assert!(!second.escape_pressed);
    }

    #[test]
    fn surface_loss_reads_as_close() {
        let input = InputState::default();
        let mut frame = InputFrame::default();

        let signals = collect_signals(&input, &mut frame, false, true);
        assert!(signals.close_requested);
        assert!(!signals.escape_pressed);
    }

    #[test]
    fn escape_and_close_together_release_once() {
        let released = Rc::new(Cell::new(0));
        let mut lifecycle = Lifecycle::new(Counted(released.clone()));

        let mut input = InputState::default();
        let mut frame = InputFrame::default();
        input.apply_key(&mut frame, key(KeyState::Pressed));

        let signals = collect_signals(&input, &mut frame, true, false);
        assert!(signals.escape_pressed && signals.close_requested);

        assert_eq!(lifecycle.end_iteration(signals), LifecycleState::Terminated);
        let again = collect_signals(&input, &mut frame, true, true);
        assert_eq!(lifecycle.end_iteration(again), LifecycleState::Terminated);
        lifecycle.shutdown();
        drop(lifecycle);

        assert_eq!(released.get(), 1);
    }

    #[test]
    fn only_presented_frames_are_counted() {
        let mut lifecycle = Lifecycle::new(Counted(Rc::new(Cell::new(0))));

        assert!(!settle_frame(&mut lifecycle, AppControl::Presented));
        assert!(!settle_frame(&mut lifecycle, AppControl::Skipped));
        assert!(!settle_frame(&mut lifecycle, AppControl::Skipped));
        assert!(!settle_frame(&mut lifecycle, AppControl::Presented));
        assert_eq!(lifecycle.frames_rendered(), 2);

        assert!(settle_frame(&mut lifecycle, AppControl::Exit));
        assert_eq!(lifecycle.frames_rendered(), 2);
    }

    #[test]
    fn only_escape_has_a_name() {
        assert_eq!(map_key(PhysicalKey::Code(KeyCode::Escape)), Key::Escape);
        assert!(matches!(
            map_key(PhysicalKey::Code(KeyCode::Space)),
            Key::Unknown(_)
        ));
    }
}
