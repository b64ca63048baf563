use crate::cli::RunArgs;
use crate::config::build_config;
use crate::error::Result;
use crate::utils::output::open_output;
use ssmap::core::analysis::composition_of;
use ssmap::core::io::table::write_records;
use ssmap::core::taxonomy::SsGroup;
use ssmap::workflows;
use tracing::info;

pub fn run(args: RunArgs) -> Result<()> {
    let config = build_config(&args.tool)?;
    info!(
        "Using {} ({:?}) on selection '{}'.",
        config.tool,
        config.assigner.tool(config.tool).executable,
        config.selection
    );

    let subset = workflows::single::load_selection(&args.input, &config.selection)?;
    let records = workflows::single::run(&subset, config.tool, &config.assigner)?;

    let composition = composition_of(&records);
    info!(
        residues = composition.total(),
        helix = composition.group_count(SsGroup::Helix),
        strand = composition.group_count(SsGroup::Strand),
        "Secondary structure summary."
    );

    write_records(&records, open_output(args.output.as_deref())?)?;
    if let Some(path) = &args.output {
        eprintln!("✓ {} residue records written to: {}", records.len(), path.display());
    }
    Ok(())
}
