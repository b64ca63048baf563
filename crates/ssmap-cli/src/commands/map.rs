use crate::cli::MapArgs;
use crate::config::build_config;
use crate::error::Result;
use crate::utils::progress::CliProgressHandler;
use ssmap::core::io::pdb::PdbTrajectory;
use ssmap::core::io::table::write_map;
use ssmap::engine::progress::ProgressReporter;
use ssmap::workflows;
use std::io::BufWriter;
use tracing::{info, warn};

pub fn run(args: MapArgs) -> Result<()> {
    let config = build_config(&args.tool)?;
    let subset = workflows::single::load_selection(&args.structure, &config.selection)?;

    let trajectory_path = args.trajectory.as_deref().unwrap_or(&args.structure);
    info!("Reading frames from {:?}", trajectory_path);
    let trajectory = PdbTrajectory::open(trajectory_path)?;

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    eprintln!("Assigning secondary structure with {}...", config.tool);
    let map = workflows::trajectory::build_map(
        &subset,
        trajectory,
        config.tool,
        &config.assigner,
        &reporter,
    )
    .inspect_err(|_| progress_handler.clear())?;

    if map.is_empty() {
        warn!("The trajectory contained no frames. Writing an empty map.");
    }

    info!("Writing map to {:?}", &args.output);
    let file = std::fs::File::create(&args.output)?;
    write_map(&map, BufWriter::new(file), args.delimiter)?;
    eprintln!(
        "✓ {} residues x {} frames written to: {}",
        map.n_residues(),
        map.n_frames(),
        args.output.display()
    );
    Ok(())
}
