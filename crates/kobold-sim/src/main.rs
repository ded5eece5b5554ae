//! Headless Kobold simulation: runs the LOD ranking, camera rig and
//! inventory replication for a fixed number of frames and logs what happened.
//!
//! Run with: `cargo run -p kobold-sim -- --ticks 600 --consumers 64`

use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use kobold_config::{CliArgs, Config, default_config_dir};
use kobold_inventory::{EquipmentDatabase, Inventory};
use kobold_sim::{HeadlessHost, SimError, Simulation, default_equipment};
use tracing::{error, info, warn};

/// Fixed frame time of the headless loop.
const FRAME_DT: f32 = 1.0 / 60.0;

/// Frames between automatic camera mode changes.
const CAMERA_CYCLE_FRAMES: u32 = 150;

/// Frames between inventory changes and replication.
const INVENTORY_FRAMES: u32 = 90;

fn main() -> ExitCode {
    let args = CliArgs::parse();
    let config_dir = args.config.clone().unwrap_or_else(default_config_dir);

    let mut config = match Config::load_or_create(&config_dir) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("config unavailable ({err}), using defaults");
            Config::default()
        }
    };
    config.apply_cli_overrides(&args);

    let log_dir = config_dir.join("logs");
    kobold_log::init_logging(
        Some(&log_dir),
        cfg!(debug_assertions) && config.debug.file_logging,
        Some(&config),
    );

    match run(&config, &config_dir, &args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("simulation failed: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(config: &Config, config_dir: &Path, args: &CliArgs) -> Result<(), SimError> {
    let database_path = config_dir.join(&config.inventory.database);
    let database = if database_path.exists() {
        EquipmentDatabase::load(&database_path)?
    } else {
        warn!(
            path = %database_path.display(),
            "no equipment database, using built-in items"
        );
        default_equipment()?
    };
    let database = Arc::new(database);

    let mut sim = Simulation::new(config, Arc::clone(&database))?;
    sim.scatter_consumers(args.consumers, 0x6b6f_626f_6c64);

    let mut remote = Inventory::new(Arc::clone(&database));
    let mut remote_host = HeadlessHost::default();

    let mut swaps = 0usize;
    let mut pruned = 0usize;
    let mut skipped = 0u32;
    for frame in 1..=args.ticks {
        let report = sim.step(FRAME_DT);
        swaps += report.lod.pass.swaps;
        pruned += report.lod.pass.pruned;
        if report.lod.skipped {
            skipped += 1;
        }

        if frame % CAMERA_CYCLE_FRAMES == 0 {
            sim.camera_mut().cycle();
        }

        if frame % INVENTORY_FRAMES == 0
            && sim
                .toggle_equipment((frame / INVENTORY_FRAMES) as usize)?
                .is_some()
        {
            let bytes = sim.inventory_snapshot()?;
            remote.apply_snapshot_bytes(&bytes, &mut remote_host)?;
        }
    }

    let saved = sim.save_inventory()?;
    info!(
        ticks = sim.ticks(),
        consumers = sim.lod().consumer_count(),
        swaps,
        pruned,
        skipped,
        "LOD summary"
    );
    info!(
        camera = %sim.camera().mode(),
        equipped = sim.inventory().len(),
        replicated = remote.len(),
        save_bytes = saved.len(),
        "session summary"
    );
    Ok(())
}
