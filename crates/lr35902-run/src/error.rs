use std::path::PathBuf;

use lr35902_core::CpuError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RunError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {}: {source}", .path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error(transparent)]
    Cpu(#[from] CpuError),
}
