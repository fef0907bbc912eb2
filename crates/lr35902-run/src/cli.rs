use std::path::PathBuf;

use clap::Parser;
use lr35902_core::Model;

use crate::config::RunConfig;
use crate::error::RunError;

#[derive(Parser, Debug)]
#[command(version, about = "Run a raw LR35902 program image without video or audio")]
pub struct Args {
    /// Path to the program image
    pub program: PathBuf,

    /// TOML file with run settings; flags below take precedence
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Force DMG mode
    #[arg(long, conflicts_with = "cgb")]
    pub dmg: bool,

    /// Force CGB mode
    #[arg(long, conflicts_with = "dmg")]
    pub cgb: bool,

    /// Address the image is loaded at (decimal, 0x-prefixed or $-prefixed hex)
    #[arg(long, value_parser = parse_address)]
    pub load_address: Option<u16>,

    /// Initial program counter
    #[arg(long, value_parser = parse_address)]
    pub entry: Option<u16>,

    /// Stop after this many steps
    #[arg(long)]
    pub max_instructions: Option<u64>,

    /// Stop once this many clock cycles have elapsed
    #[arg(long)]
    pub max_cycles: Option<u64>,

    /// Log filter, e.g. `debug` or `lr35902::cpu=trace`
    #[arg(long)]
    pub log_level: Option<String>,

    /// Print the final CPU state
    #[arg(long)]
    pub dump_state: bool,
}

/// Parse a 16-bit address written as decimal, `0x1234` or `$1234`.
pub fn parse_address(s: &str) -> Result<u16, String> {
    let hex = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .or_else(|| s.strip_prefix('$'));
    let parsed = match hex {
        Some(digits) => u16::from_str_radix(digits, 16),
        None => s.parse::<u16>(),
    };
    parsed.map_err(|e| format!("invalid address {s:?}: {e}"))
}

impl Args {
    /// Settings from `--config` (or the defaults), overridden by any flags
    /// given on the command line.
    pub fn run_config(&self) -> Result<RunConfig, RunError> {
        let mut cfg = match &self.config {
            Some(path) => RunConfig::load(path)?,
            None => RunConfig::default(),
        };

        if self.dmg {
            cfg.model = Model::Dmg;
        } else if self.cgb {
            cfg.model = Model::Cgb;
        }
        if let Some(addr) = self.load_address {
            cfg.load_address = addr;
        }
        if let Some(addr) = self.entry {
            cfg.entry = addr;
        }
        if let Some(max) = self.max_instructions {
            cfg.max_instructions = max;
        }
        if self.max_cycles.is_some() {
            cfg.max_cycles = self.max_cycles;
        }
        Ok(cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn address_forms() {
        assert_eq!(parse_address("336"), Ok(0x0150));
        assert_eq!(parse_address("0x150"), Ok(0x0150));
        assert_eq!(parse_address("0XFF80"), Ok(0xFF80));
        assert_eq!(parse_address("$c000"), Ok(0xC000));
        assert!(parse_address("0x10000").is_err());
        assert!(parse_address("ram").is_err());
    }

    #[test]
    fn model_flags_conflict() {
        let err = Args::try_parse_from(["lr35902-run", "a.gb", "--dmg", "--cgb"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
    }

    #[test]
    fn flags_without_config_file() {
        let args = Args::try_parse_from([
            "lr35902-run",
            "a.gb",
            "--cgb",
            "--load-address",
            "$0150",
            "--max-cycles",
            "1000",
        ])
        .unwrap();
        let cfg = args.run_config().unwrap();
        assert_eq!(cfg.model, Model::Cgb);
        assert_eq!(cfg.load_address, 0x0150);
        assert_eq!(cfg.max_cycles, Some(1000));
        assert_eq!(cfg.entry, 0x0100);
    }

    #[test]
    fn flags_override_config_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "model = \"cgb\"\nmax_instructions = 5\nentry = 512").unwrap();
        let path = file.path().to_str().unwrap().to_string();

        let args = Args::try_parse_from([
            "lr35902-run",
            "a.gb",
            "--config",
            &path,
            "--dmg",
            "--max-instructions",
            "50",
        ])
        .unwrap();
        let cfg = args.run_config().unwrap();
        assert_eq!(cfg.model, Model::Dmg);
        assert_eq!(cfg.max_instructions, 50);
        assert_eq!(cfg.entry, 0x0200, "untouched file values survive");
    }

    #[test]
    fn explicit_missing_config_is_an_error() {
        let args =
            Args::try_parse_from(["lr35902-run", "a.gb", "--config", "/nonexistent/run.toml"])
                .unwrap();
        assert!(matches!(args.run_config(), Err(RunError::Io { .. })));
    }
}
