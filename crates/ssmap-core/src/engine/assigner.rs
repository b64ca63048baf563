use super::config::AssignerConfig;
use super::error::EngineError;
use super::process::{ExecutionError, run_tool};
use crate::core::io::pdb::PdbFile;
use crate::core::io::traits::StructureFile;
use crate::core::models::record::SecondaryStructureRecord;
use crate::core::models::structure::Structure;
use crate::core::parsers::AssignmentTool;
use std::ffi::OsString;
use std::fs;
use tracing::debug;

const INPUT_FILE: &str = "input.pdb";
const DSSP_OUTPUT_FILE: &str = "output.dssp";

/// Assigns secondary structure to every residue of a structure snapshot.
pub trait SecondaryStructureAssigner {
    fn assign(&self, snapshot: &Structure) -> Result<Vec<SecondaryStructureRecord>, EngineError>;
}

impl<A: SecondaryStructureAssigner + ?Sized> SecondaryStructureAssigner for &A {
    fn assign(&self, snapshot: &Structure) -> Result<Vec<SecondaryStructureRecord>, EngineError> {
        (**self).assign(snapshot)
    }
}

/// Runs STRIDE or DSSP as a subprocess on a PDB copy of the snapshot.
///
/// Every call works in its own temporary directory, which is removed when
/// the call returns.
pub struct ExternalAssigner<'a> {
    tool: AssignmentTool,
    config: &'a AssignerConfig,
}

impl<'a> ExternalAssigner<'a> {
    pub fn new(tool: AssignmentTool, config: &'a AssignerConfig) -> Self {
        Self { tool, config }
    }
}

impl SecondaryStructureAssigner for ExternalAssigner<'_> {
    fn assign(&self, snapshot: &Structure) -> Result<Vec<SecondaryStructureRecord>, EngineError> {
        let workdir = tempfile::tempdir()?;
        let input = workdir.path().join(INPUT_FILE);
        PdbFile::write_to_path(snapshot, &input)?;

        let settings = self.config.tool(self.tool);
        let output = match self.tool {
            AssignmentTool::Stride => {
                run_tool(settings, [input.as_os_str()], self.config.timeout)?.stdout
            }
            AssignmentTool::Dssp => {
                let output_path = workdir.path().join(DSSP_OUTPUT_FILE);
                let args: [OsString; 4] = [
                    "--output-format".into(),
                    "dssp".into(),
                    input.clone().into_os_string(),
                    output_path.clone().into_os_string(),
                ];
                run_tool(settings, args, self.config.timeout)?;
                if !output_path.is_file() {
                    return Err(ExecutionError::MissingOutput {
                        tool: self.tool,
                        path: output_path,
                    }
                    .into());
                }
                fs::read_to_string(&output_path)?
            }
        };

        let records = self.tool.parse(&output)?;
        if records.is_empty() {
            return Err(ExecutionError::NoResidues { tool: self.tool }.into());
        }
        debug!(tool = %self.tool, residues = records.len(), "Assigned snapshot");
        Ok(records)
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::core::models::structure::Atom;
    use crate::engine::config::ToolSettings;
    use nalgebra::Point3;
    use std::path::{Path, PathBuf};
    use std::time::Duration;

    const STRIDE_OUTPUT: &str = "\
REM  |---Residue---|    |--Structure--|   |-Phi-|   |-Psi-|  |-Area-|      ~~~~
ASG  MET A    1    1    C          Coil    360.00    150.62     234.4      ~~~~
ASG  PHE A    2    2    H    AlphaHelix    -57.32    -47.12      98.1      ~~~~
";

    const DSSP_OUTPUT: &str = "\
  #  RESIDUE AA STRUCTURE BP1 BP2  ACC     N-H-->O    O-->H-N    N-H-->O    O-->H-N    TCO  KAPPA ALPHA  PHI   PSI    X-CA   Y-CA   Z-CA
    1    1 A M              0   0  209      0, 0.0     0, 0.0     0, 0.0     0, 0.0   0.000 360.0 360.0 360.0 150.6   22.5   17.4   32.1
    2    2 A F  H           0   0  100      0, 0.0     0, 0.0     0, 0.0     0, 0.0  -0.200  12.3  49.5 -62.1 -41.3   21.0   16.0   30.0
";

    fn snapshot() -> Structure {
        let atom = |index: usize, name: &str, residue_name: &str, residue_number: isize| Atom {
            index,
            serial: index + 1,
            name: name.to_string(),
            residue_name: residue_name.to_string(),
            chain_id: 'A',
            residue_number,
            insertion_code: None,
            element: name[..1].to_string(),
            position: Point3::new(index as f64, 0.0, 0.0),
        };
        Structure::new(vec![atom(0, "CA", "MET", 1), atom(1, "CA", "PHE", 2)])
    }

    fn canned(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, content).unwrap();
        path
    }

    fn shell_config(stride_script: &str, dssp_script: &str) -> AssignerConfig {
        let shell = |script: &str| ToolSettings {
            executable: PathBuf::from("sh"),
            extra_args: vec!["-c".to_string(), script.to_string(), "sh".to_string()],
        };
        AssignerConfig {
            stride: shell(stride_script),
            dssp: shell(dssp_script),
            timeout: Some(Duration::from_secs(30)),
        }
    }

    #[test]
    fn stride_output_is_read_from_stdout() {
        let dir = tempfile::tempdir().unwrap();
        let canned = canned(dir.path(), "out.stride", STRIDE_OUTPUT);
        // The input file must exist when the tool runs.
        let script = format!("test -f \"$1\" && cat '{}'", canned.display());
        let config = shell_config(&script, "exit 1");
        let records = ExternalAssigner::new(AssignmentTool::Stride, &config)
            .assign(&snapshot())
            .unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].code(), 'H');
        assert_eq!(records[0].area(), 234.4);
    }

    #[test]
    fn dssp_output_is_read_from_the_output_file() {
        let dir = tempfile::tempdir().unwrap();
        let canned = canned(dir.path(), "out.dssp", DSSP_OUTPUT);
        let script = format!(
            "[ \"$1\" = --output-format ] && [ \"$2\" = dssp ] && cp '{}' \"$4\"",
            canned.display()
        );
        let config = shell_config("exit 1", &script);
        let records = ExternalAssigner::new(AssignmentTool::Dssp, &config)
            .assign(&snapshot())
            .unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].code(), ' ');
        assert_eq!(records[1].kappa(), 12.3);
    }

    #[test]
    fn dssp_without_output_file_is_an_error() {
        let config = shell_config("exit 1", "exit 0");
        let err = ExternalAssigner::new(AssignmentTool::Dssp, &config)
            .assign(&snapshot())
            .unwrap_err();
        assert!(matches!(
            err,
            EngineError::Execution(ExecutionError::MissingOutput { .. })
        ));
    }

    #[test]
    fn output_without_residues_is_an_error() {
        let config = shell_config("echo 'REM nothing'", "exit 1");
        let err = ExternalAssigner::new(AssignmentTool::Stride, &config)
            .assign(&snapshot())
            .unwrap_err();
        assert!(matches!(
            err,
            EngineError::Execution(ExecutionError::NoResidues {
                tool: AssignmentTool::Stride
            })
        ));
    }

    #[test]
    fn failing_tool_is_surfaced() {
        let config = shell_config("echo 'bad input' >&2; exit 2", "exit 1");
        let err = ExternalAssigner::new(AssignmentTool::Stride, &config)
            .assign(&snapshot())
            .unwrap_err();
        assert!(matches!(
            err,
            EngineError::Execution(ExecutionError::Failed { ref stderr, .. }) if stderr == "bad input"
        ));
    }

    #[test]
    fn unparsable_output_is_a_parse_error() {
        let config = shell_config(
            "echo 'ASG  MET A    1    1    Z          Coil    360.00    150.62     234.4      ~~~~'",
            "exit 1",
        );
        let err = ExternalAssigner::new(AssignmentTool::Stride, &config)
            .assign(&snapshot())
            .unwrap_err();
        assert!(matches!(err, EngineError::Parse(_)));
    }
}
