use crate::core::io::pdb::PdbFile;
use crate::core::io::traits::StructureFile;
use crate::core::models::record::SecondaryStructureRecord;
use crate::core::models::structure::{AtomSelection, Structure};
use crate::core::parsers::AssignmentTool;
use crate::engine::assigner::{ExternalAssigner, SecondaryStructureAssigner};
use crate::engine::config::AssignerConfig;
use crate::engine::error::EngineError;
use std::path::Path;
use tracing::{info, instrument};

/// Assigns secondary structure to one snapshot with the given tool.
#[instrument(skip_all, name = "single_structure_workflow", fields(tool = %tool))]
pub fn run(
    snapshot: &Structure,
    tool: AssignmentTool,
    config: &AssignerConfig,
) -> Result<Vec<SecondaryStructureRecord>, EngineError> {
    run_with(snapshot, &ExternalAssigner::new(tool, config))
}

/// Like [`run`], with the assignment step supplied by the caller.
pub fn run_with<A>(
    snapshot: &Structure,
    assigner: &A,
) -> Result<Vec<SecondaryStructureRecord>, EngineError>
where
    A: SecondaryStructureAssigner + ?Sized,
{
    info!(atoms = snapshot.len(), "Assigning secondary structure.");
    let records = assigner.assign(snapshot)?;
    info!(residues = records.len(), "Assignment complete.");
    Ok(records)
}

/// Reads a PDB file, selects atoms and assigns the selection.
#[instrument(skip_all, name = "single_file_workflow", fields(path = %path.as_ref().display()))]
pub fn run_file<P: AsRef<Path>>(
    path: P,
    selection: &AtomSelection,
    tool: AssignmentTool,
    config: &AssignerConfig,
) -> Result<Vec<SecondaryStructureRecord>, EngineError> {
    let subset = load_selection(path, selection)?;
    run(&subset, tool, config)
}

/// Reads a PDB file and keeps the atoms matching `selection`.
pub fn load_selection<P: AsRef<Path>>(
    path: P,
    selection: &AtomSelection,
) -> Result<Structure, EngineError> {
    let structure = PdbFile::read_from_path(path)?;
    let subset = structure.select(selection);
    if subset.is_empty() {
        return Err(EngineError::EmptySelection {
            selection: selection.to_string(),
        });
    }
    info!(
        atoms = subset.len(),
        residues = subset.residue_count(),
        selection = %selection,
        "Selected atoms."
    );
    Ok(subset)
}
