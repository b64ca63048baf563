use crate::cli::ParseArgs;
use crate::error::{CliError, Result};
use crate::utils::output::open_output;
use ssmap::core::io::table::write_records;
use tracing::info;

pub fn run(args: ParseArgs) -> Result<()> {
    info!("Reading {} output from {:?}", args.tool, &args.input);
    let text = std::fs::read_to_string(&args.input)?;
    let records = args
        .tool
        .parse(&text)
        .map_err(|e| CliError::file_parsing(&args.input, e))?;
    info!("Parsed {} residue records.", records.len());

    write_records(&records, open_output(args.output.as_deref())?)?;
    Ok(())
}
