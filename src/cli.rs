use clap::{Parser, ValueEnum};
use std::path::PathBuf;

// Build version with target info
const VERSION_INFO: &str = const_format::concatcp!(
    env!("CARGO_PKG_VERSION"), "\n",
    "Target: ", std::env::consts::ARCH, "-", std::env::consts::OS
);

/// Built-in datasets
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum DatasetKind {
    /// Creative works per year, one mark per kind
    Works,
    /// Personal milestones, one mark per title
    Timeline,
    /// No rows; mounts with controls disabled
    Empty,
}

impl DatasetKind {
    /// Label shown before the current key
    pub fn key_name(self) -> &'static str {
        "Year"
    }

    pub fn title(self) -> &'static str {
        match self {
            DatasetKind::Works => "Creative Works",
            DatasetKind::Timeline => "Personal Timeline",
            DatasetKind::Empty => "Empty",
        }
    }
}

/// Year-by-year animated visualization in the terminal
#[derive(Parser, Debug)]
#[command(author, version = VERSION_INFO, about, long_about = None)]
pub struct Args {
    /// Dataset to animate
    #[arg(value_enum, default_value = "works")]
    pub dataset: DatasetKind,

    /// Auto-play on startup
    #[arg(short = 'a', long = "autoplay")]
    pub autoplay: bool,

    /// Step interval in milliseconds (clamped to configured bounds)
    #[arg(short = 's', long = "speed", value_name = "MS")]
    pub speed_ms: Option<u64>,

    /// Start at index N (0-based, clamped)
    #[arg(long = "start", value_name = "N")]
    pub start_index: Option<i64>,

    /// Start in show-all mode
    #[arg(long = "all")]
    pub show_all: bool,

    /// Controller config JSON (overrides YEARPLAY_CONFIG)
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Write the effective config to FILE and exit
    #[arg(long = "dump-config", value_name = "FILE")]
    pub dump_config: Option<PathBuf>,

    /// Enable debug logging to file (default: yearplay.log)
    #[arg(short = 'l', long = "log", value_name = "LOG_FILE")]
    pub log_file: Option<Option<PathBuf>>,

    /// Increase logging verbosity (default: warn, -v: info, -vv: debug, -vvv+: trace)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbosity: u8,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::parse_from(["yearplay"]);
        assert_eq!(args.dataset, DatasetKind::Works);
        assert!(!args.autoplay);
        assert_eq!(args.verbosity, 0);
        assert!(args.log_file.is_none());
    }

    #[test]
    fn test_flags() {
        let args = Args::parse_from([
            "yearplay", "timeline", "-a", "--speed", "2000", "--start", "3", "-vv", "-l",
        ]);
        assert_eq!(args.dataset, DatasetKind::Timeline);
        assert!(args.autoplay);
        assert_eq!(args.speed_ms, Some(2000));
        assert_eq!(args.start_index, Some(3));
        assert_eq!(args.verbosity, 2);
        assert_eq!(args.log_file, Some(None));
    }

    #[test]
    fn test_verify_cli() {
        use clap::CommandFactory;
        Args::command().debug_assert();
    }
}
