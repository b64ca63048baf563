use crate::cli::CompositionArgs;
use crate::config::build_config;
use crate::error::{CliError, Result};
use crate::utils::output::open_output;
use ssmap::core::analysis::{composition, composition_of};
use ssmap::core::io::table::{read_map, write_composition};
use ssmap::workflows;
use tracing::info;

pub fn run(args: CompositionArgs) -> Result<()> {
    let counts = if let Some(map_path) = &args.source.map {
        info!("Reading map from {:?}", map_path);
        let map = read_map(std::fs::File::open(map_path)?, args.delimiter)
            .map_err(|e| CliError::file_parsing(map_path, e))?;
        composition(&map, args.frame)?
    } else if let Some(structure) = &args.source.structure {
        let config = build_config(&args.tool)?;
        let records = workflows::single::run_file(
            structure,
            &config.selection,
            config.tool,
            &config.assigner,
        )?;
        composition_of(&records)
    } else {
        return Err(CliError::Argument(
            "Either --map or --structure must be given.".to_string(),
        ));
    };

    info!(residues = counts.total(), "Composition computed.");
    write_composition(&counts, open_output(args.output.as_deref())?)?;
    Ok(())
}
