use blockhop_engine::{Assets, FixedTimestep, InputEvent, InputQueue, InputState, Renderer};

use crate::app::App;
use crate::config::Config;
use crate::error::AppError;

/// Drives an [`App`] from a host's event loop.
///
/// The host pushes input events as they arrive and calls [`Runner::tick`]
/// once per display frame with the elapsed time. Each fixed step takes its
/// own input snapshot, so a key press is seen by exactly one step even when
/// a slow frame runs several.
pub struct Runner<R: Renderer> {
    app: App,
    renderer: R,
    input: InputState,
    queue: InputQueue,
    timestep: FixedTimestep,
}

impl<R: Renderer> Runner<R> {
    pub fn new(config: Config, mut renderer: R, assets: Assets) -> Result<Self, AppError> {
        let timestep = FixedTimestep::new(config.fixed_dt as f32);
        let app = App::new(config, &mut renderer, assets)?;
        Ok(Self {
            app,
            renderer,
            input: InputState::new(),
            queue: InputQueue::new(),
            timestep,
        })
    }

    /// Runner whose assets come from [`Config::assets`].
    pub fn with_config(config: Config, renderer: R) -> Result<Self, AppError> {
        let assets = config.assets();
        Self::new(config, renderer, assets)
    }

    /// Push an input event into the queue.
    pub fn push_input(&mut self, event: InputEvent) {
        self.queue.push(event);
    }

    /// The window changed size.
    pub fn resize(&mut self, width: f64, height: f64) {
        self.app.layout(width, height);
    }

    /// Run one display frame: apply queued input, step the app, draw.
    /// Returns the exit code once the app has quit.
    pub fn tick(&mut self, dt: f32) -> Option<i32> {
        self.input.consume(&mut self.queue);

        let steps = self.timestep.accumulate(dt);
        for _ in 0..steps {
            let frame = self.input.snapshot();
            self.app.update(&frame);
            if let Some(code) = self.app.exit_code() {
                return Some(code);
            }
        }

        self.renderer.begin_frame();
        self.app.draw(&mut self.renderer);
        None
    }

    pub fn app(&self) -> &App {
        &self.app
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }
}
