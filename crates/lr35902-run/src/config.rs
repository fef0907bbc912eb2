use std::path::Path;

use lr35902_core::Model;
use serde::{Deserialize, Serialize};

use crate::error::RunError;

const DEFAULT_ENTRY: u16 = 0x0100;
const DEFAULT_MAX_INSTRUCTIONS: u64 = 10_000_000;

/// Settings for one headless run, as read from a TOML file.
///
/// Every key is optional; command-line flags are layered on top by
/// [`crate::cli::Args::run_config`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub model: Model,
    /// Address the first byte of the program image is copied to.
    pub load_address: u16,
    /// Initial PC.
    pub entry: u16,
    pub max_instructions: u64,
    pub max_cycles: Option<u64>,
    /// End the run once the CPU is halted with no interrupt pending.
    pub stop_on_halt: bool,
    /// Print serial bytes as the program sends them.
    pub serial_echo: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            model: Model::Dmg,
            load_address: 0x0000,
            entry: DEFAULT_ENTRY,
            max_instructions: DEFAULT_MAX_INSTRUCTIONS,
            max_cycles: None,
            stop_on_halt: true,
            serial_echo: true,
        }
    }
}

impl RunConfig {
    pub fn load(path: &Path) -> Result<Self, RunError> {
        let text = std::fs::read_to_string(path).map_err(|source| RunError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&text).map_err(|source| RunError::Config {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(text: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().expect("create temp file");
        file.write_all(text.as_bytes()).expect("write config");
        file
    }

    #[test]
    fn empty_file_gives_defaults() {
        let file = write_config("");
        assert_eq!(RunConfig::load(file.path()).unwrap(), RunConfig::default());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let file = write_config(
            r#"
model = "cgb"
load_address = 256
max_cycles = 70224
serial_echo = false
"#,
        );
        let cfg = RunConfig::load(file.path()).unwrap();
        assert_eq!(cfg.model, Model::Cgb);
        assert_eq!(cfg.load_address, 0x0100);
        assert_eq!(cfg.max_cycles, Some(70224));
        assert!(!cfg.serial_echo);
        assert_eq!(cfg.entry, 0x0100);
        assert_eq!(cfg.max_instructions, 10_000_000);
        assert!(cfg.stop_on_halt);
    }

    #[test]
    fn unknown_model_is_a_config_error() {
        let file = write_config("model = \"gba\"\n");
        let err = RunConfig::load(file.path()).unwrap_err();
        assert!(matches!(err, RunError::Config { .. }), "{err}");
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = RunConfig::load(&dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, RunError::Io { .. }), "{err}");
    }

    #[test]
    fn serializes_back_to_toml() {
        let cfg = RunConfig {
            model: Model::Cgb,
            ..RunConfig::default()
        };
        let text = toml::to_string(&cfg).unwrap();
        assert!(text.contains("model = \"cgb\""), "{text}");
        assert_eq!(toml::from_str::<RunConfig>(&text).unwrap(), cfg);
    }
}
