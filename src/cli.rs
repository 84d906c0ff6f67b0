use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "Live camera preview with periodic image+text inference")]
pub struct Args {
    /// Optional TOML file overlaying the built-in defaults.
    #[arg(long, env = "CAM_RECO_CONFIG")]
    pub config: Option<PathBuf>,
    /// Base URL of the chat completions server.
    #[arg(long, env = "CAM_RECO_BASE_URL")]
    pub base_url: Option<String>,
    /// Initial instruction sent with every frame.
    #[arg(long)]
    pub instruction: Option<String>,
    /// Interval between two requests (100, 250, 500, 1000 or 2000).
    #[arg(long)]
    pub interval_ms: Option<u64>,
    /// Camera device index.
    #[arg(long)]
    pub camera_index: Option<i32>,
    /// Use the generated test pattern instead of a real camera.
    #[arg(long)]
    pub fake_camera: bool,
    /// Answer locally instead of calling the inference server.
    #[arg(long)]
    pub offline: bool,
}
