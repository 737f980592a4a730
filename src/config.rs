//! Per-demo configuration.
//!
//! Demos take no command line arguments. Everything tunable lives in
//! [`DemoConfig`], which starts from sensible defaults and reads the asset
//! directory from the `LEARN_NGIN_ASSETS` environment variable.

use std::path::{Path, PathBuf};

/// Environment variable overriding [`DemoConfig::asset_dir`].
pub const ASSET_DIR_ENV: &str = "LEARN_NGIN_ASSETS";

const BUNDLED_ASSETS: &str = env!("LEARN_NGIN_BUNDLED_ASSETS");

#[derive(Clone, Debug)]
pub struct DemoConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub resizable: bool,
    pub backends: wgpu::Backends,
    pub power_preference: wgpu::PowerPreference,
    pub asset_dir: PathBuf,
}

impl Default for DemoConfig {
    fn default() -> Self {
        let asset_dir = std::env::var_os(ASSET_DIR_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| Path::new("./").join("assets"));
        Self {
            title: String::from("learn-ngin"),
            width: 800,
            height: 600,
            resizable: true,
            backends: wgpu::Backends::PRIMARY,
            power_preference: wgpu::PowerPreference::default(),
            asset_dir,
        }
    }
}

impl DemoConfig {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_asset_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.asset_dir = dir.into();
        self
    }

    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }

    /// Resolve an asset file name.
    ///
    /// The configured directory wins; the copy bundled by the build script is
    /// used when the configured directory lacks the file. If neither has it the
    /// configured path is returned so the subsequent load reports it.
    pub fn asset(&self, name: &str) -> PathBuf {
        let configured = self.asset_dir.join(name);
        if configured.exists() {
            return configured;
        }
        let bundled = Path::new(BUNDLED_ASSETS).join(name);
        if bundled.exists() {
            return bundled;
        }
        configured
    }
}
