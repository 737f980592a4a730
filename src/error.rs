//! Error taxonomy shared by the engine and every demo.
//!
//! All errors are terminal: the driver logs them and the process exits with
//! [`DemoError::exit_code`]. Per-frame hiccups (a frame that could not begin)
//! are never surfaced as errors.

use std::{fmt, path::PathBuf};

/// The bootstrap or assembly step that failed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InitStage {
    EventLoop,
    Window,
    Surface,
    Adapter,
    Device,
    SwapChain,
    Material,
    Renderable,
}

impl fmt::Display for InitStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            InitStage::EventLoop => "event loop",
            InitStage::Window => "window",
            InitStage::Surface => "surface",
            InitStage::Adapter => "adapter",
            InitStage::Device => "device",
            InitStage::SwapChain => "swap chain",
            InitStage::Material => "material",
            InitStage::Renderable => "renderable",
        };
        f.write_str(name)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DemoError {
    #[error("failed to create {stage}: {reason}")]
    Initialization { stage: InitStage, reason: String },

    #[error("failed to load asset {}: {reason}", path.display())]
    AssetLoad { path: PathBuf, reason: String },

    #[error("handle does not refer to a live {kind}")]
    InvalidHandle { kind: &'static str },
}

impl DemoError {
    pub fn init(stage: InitStage, reason: impl ToString) -> Self {
        Self::Initialization {
            stage,
            reason: reason.to_string(),
        }
    }

    pub fn asset(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::AssetLoad {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Process exit status for this failure. Every kind is fatal.
    pub fn exit_code(&self) -> u8 {
        1
    }
}

pub type Result<T> = std::result::Result<T, DemoError>;
