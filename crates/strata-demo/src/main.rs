//! Headless Strata demo.
//!
//! Generates terrain from the configured seed and terrain parameters, then
//! runs a scripted player for `--ticks` fixed steps: falling under gravity,
//! walking, jumping and sculpting while drawing every frame into a counting sink.
//!
//! Run with `cargo run -p strata-demo -- --seed 7 --ticks 300`.

mod session;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use strata_config::{CliArgs, Config};
use strata_terrain::NoisePopulator;
use strata_voxel::World;
use tracing::info;

use crate::session::{Input, Session, TICK_SECONDS};

fn main() -> ExitCode {
    let args = CliArgs::parse();

    let Some(config_dir) = args.config.clone().or_else(Config::default_dir) else {
        eprintln!("No config directory available; pass --config <dir>");
        return ExitCode::FAILURE;
    };

    let mut config = Config::load_or_create(&config_dir).unwrap_or_else(|e| {
        eprintln!("Failed to load config: {e}, using defaults");
        Config::default()
    });
    config.apply_cli_overrides(&args);

    let log_dir: PathBuf = config_dir.join("logs");
    strata_log::init_logging(Some(&log_dir), cfg!(debug_assertions), Some(&config));

    info!(
        "Strata starting: seed {}, view distance {}, {} ticks",
        config.world.seed, config.view.view_distance, args.ticks
    );

    let populator = NoisePopulator::with_params(config.world.seed, config.world.terrain.clone());
    let world = World::new(populator);
    let mut session = Session::new(world, &config);

    let mut grounded_ticks = 0;
    let mut edits = 0;
    for n in 0..args.ticks {
        let stats = session.tick(Input::scripted(n), TICK_SECONDS);
        grounded_ticks += usize::from(stats.grounded);
        edits += usize::from(stats.edited.is_some());

        if n % 30 == 0 {
            info!(
                "tick {}: position {:.2?}, {} blocks drawn, {} triangles, {} resident",
                n,
                session.player.position,
                stats.drawn_blocks,
                stats.triangles,
                session.world.block_count()
            );
        }
    }

    info!(
        "Strata finished: {} ticks, {} grounded, {} edits, {} resident blocks",
        args.ticks,
        grounded_ticks,
        edits,
        session.world.block_count()
    );
    ExitCode::SUCCESS
}
