//! Server state and configuration.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::compositor::Compositor;
use crate::config::EngineConfig;
use crate::error::CollageError;
use crate::source::DefaultLoader;
use crate::text::FontBook;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to listen on (e.g., "0.0.0.0:8080")
    pub listen_addr: String,
    /// Directory of `.ttf`/`.otf` files to register at startup
    pub font_dir: Option<PathBuf>,
    pub engine: EngineConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: "127.0.0.1:8080".to_string(),
            font_dir: None,
            engine: EngineConfig::default(),
        }
    }
}

/// Application state shared across handlers.
pub struct AppState {
    pub config: ServerConfig,
    pub compositor: Compositor,
    /// Unix timestamp of server boot.
    pub boot_time: u64,
}

impl AppState {
    /// Build the compositor for remote callers: fonts from `font_dir`, and a
    /// loader that refuses local file paths.
    pub fn new(config: ServerConfig) -> Result<Self, CollageError> {
        let mut fonts = FontBook::new();
        if let Some(dir) = &config.font_dir {
            let count = fonts.load_dir(dir)?;
            tracing::info!(dir = %dir.display(), count, "fonts registered");
        }
        let loader = DefaultLoader::new()?.deny_files();
        let compositor = Compositor::with_loader(Arc::new(loader))
            .with_fonts(fonts)
            .with_config(config.engine);
        Ok(Self::with_compositor(config, compositor))
    }

    pub fn with_compositor(config: ServerConfig, compositor: Compositor) -> Self {
        let boot_time = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        Self {
            config,
            compositor,
            boot_time,
        }
    }
}
