#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    if let Err(err) = native::run() {
        eprintln!("Error: {err:?}");
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::any::Any;
    use std::panic::{self, AssertUnwindSafe};

    use anyhow::{Context, Result};
    use clap::Parser;
    use log::info;
    use winit::event_loop::EventLoop;

    use light_stage::app::{self, StageEvent};
    use light_stage::config::CliOptions;
    use light_stage::{
        Clock, HeadlessPresenter, ManualTime, Stage, StageConfig, StageError, Viewport,
    };

    pub fn run() -> Result<()> {
        let options = CliOptions::parse();
        let config = options.stage_config();

        if options.summary_only {
            return run_headless(&config, &options);
        }
        match run_interactive(config.clone()) {
            Ok(()) => Ok(()),
            Err(err) if can_fall_back(&err) => {
                eprintln!(
                    "{err:#}. Falling back to --summary-only mode (set DISPLAY or install a GPU driver to enable rendering)."
                );
                run_headless(&config, &options)
            }
            Err(err) => Err(err),
        }
    }

    fn run_headless(config: &StageConfig, options: &CliOptions) -> Result<()> {
        let time = ManualTime::new();
        let mut stage = Stage::new(
            config,
            Viewport::new(config.width, config.height, 1.0),
            Clock::with_source(time.clone()),
        );
        let mut presenter = HeadlessPresenter::new();
        stage.attach(&mut presenter);

        let frames = options.frames.max(1);
        for frame in 1..=frames {
            time.set(options.time * f64::from(frame) / f64::from(frames));
            stage
                .tick(&mut presenter)
                .with_context(|| format!("headless frame {frame} failed"))?;
        }
        info!("Rendered {} headless frame(s)", presenter.frames);

        let snapshot = stage.snapshot();
        if options.json {
            let json =
                serde_json::to_string_pretty(&snapshot).context("failed to serialize summary")?;
            println!("{json}");
        } else {
            println!("{snapshot}");
        }
        Ok(())
    }

    fn run_interactive(config: StageConfig) -> Result<()> {
        let default_hook = panic::take_hook();
        panic::set_hook(Box::new(|_| {}));
        let event_loop = panic::catch_unwind(AssertUnwindSafe(|| {
            EventLoop::<StageEvent>::with_user_event().build()
        }));
        panic::set_hook(default_hook);

        let event_loop = event_loop
            .map_err(|panic| StageError::Window {
                stage: "event loop",
                message: panic_message(panic),
            })?
            .map_err(|err| StageError::Window {
                stage: "event loop",
                message: err.to_string(),
            })?;
        app::run(config, event_loop)
    }

    /// Environments without a display or a GPU still get the headless summary.
    fn can_fall_back(err: &anyhow::Error) -> bool {
        err.chain().any(|cause| {
            matches!(
                cause.downcast_ref::<StageError>(),
                Some(StageError::Window { .. } | StageError::Adapter(_))
            )
        })
    }

    fn panic_message(panic: Box<dyn Any + Send>) -> String {
        match panic.downcast::<String>() {
            Ok(msg) => *msg,
            Err(panic) => match panic.downcast::<&'static str>() {
                Ok(msg) => (*msg).to_string(),
                Err(_) => "unknown panic".into(),
            },
        }
    }
}
