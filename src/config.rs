use serde::{Deserialize, Serialize};

use crate::viewport::DEFAULT_MAX_PIXEL_RATIO;

/// Start-up settings of a stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StageConfig {
    pub title: String,
    /// Initial logical width of the window.
    pub width: u32,
    /// Initial logical height of the window.
    pub height: u32,
    pub max_pixel_ratio: f64,
    pub enable_damping: bool,
    pub damping_factor: f32,
}

impl Default for StageConfig {
    fn default() -> Self {
        Self {
            title: "Light Stage".to_string(),
            width: 1280,
            height: 720,
            max_pixel_ratio: DEFAULT_MAX_PIXEL_RATIO,
            enable_damping: true,
            damping_factor: 0.05,
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub use cli::CliOptions;

#[cfg(not(target_arch = "wasm32"))]
mod cli {
    use clap::Parser;

    use super::StageConfig;

    #[derive(Parser, Debug, Clone)]
    #[command(name = "light-stage")]
    #[command(about = "Interactive lighting showcase", long_about = None)]
    pub struct CliOptions {
        /// Initial window width in logical pixels
        #[arg(long, default_value_t = 1280)]
        pub width: u32,

        /// Initial window height in logical pixels
        #[arg(long, default_value_t = 720)]
        pub height: u32,

        /// Run without a window and print the scene state
        #[arg(long)]
        pub summary_only: bool,

        /// Elapsed seconds simulated by the headless run
        #[arg(long, default_value_t = 0.0)]
        pub time: f64,

        /// Frames rendered by the headless run
        #[arg(long, default_value_t = 1)]
        pub frames: u32,

        /// Print the headless summary as JSON
        #[arg(long)]
        pub json: bool,

        /// Disable orbit damping
        #[arg(long)]
        pub no_damping: bool,
    }

    impl CliOptions {
        pub fn stage_config(&self) -> StageConfig {
            StageConfig {
                width: self.width.max(1),
                height: self.height.max(1),
                enable_damping: !self.no_damping,
                ..StageConfig::default()
            }
        }
    }
}
