//! Command-line arguments.

use std::path::PathBuf;

use clap::Parser;

use crate::Config;

/// Strata command-line arguments.
///
/// Values given here override settings loaded from `config.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "strata", about = "Volumetric terrain sandbox")]
pub struct CliArgs {
    /// Terrain seed.
    #[arg(long)]
    pub seed: Option<u32>,

    /// View distance in world units.
    #[arg(long)]
    pub view_distance: Option<f32>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Number of simulation ticks to run before exiting.
    #[arg(long, default_value_t = 120)]
    pub ticks: u32,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(seed) = args.seed {
            self.world.seed = seed;
        }
        if let Some(distance) = args.view_distance {
            self.view.view_distance = distance;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_override() {
        let mut config = Config::default();
        let args = CliArgs {
            seed: Some(9),
            log_level: Some("debug".to_string()),
            ..CliArgs::default()
        };
        config.apply_cli_overrides(&args);
        assert_eq!(config.world.seed, 9);
        assert_eq!(config.debug.log_level, "debug");
        // Non-overridden fields retain defaults
        assert_eq!(config.view.view_distance, 60.0);
    }

    #[test]
    fn test_cli_no_override() {
        let mut config = Config::default();
        config.apply_cli_overrides(&CliArgs::default());
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_parse_arguments() {
        let args = CliArgs::parse_from([
            "strata",
            "--seed",
            "5",
            "--view-distance",
            "24.5",
            "--ticks",
            "10",
            "--config",
            "/tmp/strata",
        ]);
        assert_eq!(args.seed, Some(5));
        assert_eq!(args.view_distance, Some(24.5));
        assert_eq!(args.ticks, 10);
        assert_eq!(args.config, Some(PathBuf::from("/tmp/strata")));
        assert_eq!(args.log_level, None);
    }

    #[test]
    fn test_ticks_default() {
        let args = CliArgs::parse_from(["strata"]);
        assert_eq!(args.ticks, 120);
    }
}
