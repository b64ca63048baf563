use crate::cli::ContentArgs;
use crate::config::build_config;
use crate::error::{CliError, Result};
use crate::utils::output::open_output;
use crate::utils::parser::ClassSelector;
use crate::utils::progress::CliProgressHandler;
use ssmap::core::analysis::{class_content, residue_content};
use ssmap::core::io::pdb::PdbTrajectory;
use ssmap::core::io::table::{read_map, write_series};
use ssmap::engine::progress::ProgressReporter;
use ssmap::workflows;
use tracing::info;

pub fn run(args: ContentArgs) -> Result<()> {
    let selector = args
        .class
        .parse::<ClassSelector>()
        .map_err(|e| CliError::Argument(e.to_string()))?;
    info!("Measuring the content of '{}'.", selector);

    let values = if let Some(map_path) = &args.source.map {
        info!("Reading map from {:?}", map_path);
        let map = read_map(std::fs::File::open(map_path)?, args.delimiter)
            .map_err(|e| CliError::file_parsing(map_path, e))?;
        if args.per_residue {
            residue_content(&selector, &map)
        } else {
            class_content(&selector, &map)
        }
    } else if let Some(structure) = &args.source.structure {
        let config = build_config(&args.tool)?;
        let subset = workflows::single::load_selection(structure, &config.selection)?;
        let trajectory =
            PdbTrajectory::open(args.trajectory.as_deref().unwrap_or(structure))?;

        let progress_handler = CliProgressHandler::new();
        let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

        let values = if args.per_residue {
            workflows::trajectory::build_map(
                &subset,
                trajectory,
                config.tool,
                &config.assigner,
                &reporter,
            )
            .map(|map| residue_content(&selector, &map))
        } else {
            workflows::trajectory::class_content(
                &selector,
                &subset,
                trajectory,
                config.tool,
                &config.assigner,
                &reporter,
            )
        };
        values.inspect_err(|_| progress_handler.clear())?
    } else {
        return Err(CliError::Argument(
            "Either --map or --structure must be given.".to_string(),
        ));
    };

    let index_label = if args.per_residue { "residue" } else { "frame" };
    write_series(
        &values,
        index_label,
        &selector.to_string(),
        open_output(args.output.as_deref())?,
    )?;
    Ok(())
}
