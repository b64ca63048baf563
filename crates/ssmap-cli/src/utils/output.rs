use crate::error::Result;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Opens `path` for writing, or stdout when no path is given.
pub fn open_output(path: Option<&Path>) -> Result<Box<dyn Write>> {
    match path {
        Some(path) => Ok(Box::new(BufWriter::new(File::create(path)?))),
        None => Ok(Box::new(io::stdout().lock())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CliError;

    #[test]
    fn file_output_is_created() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        {
            let mut writer = open_output(Some(&path)).unwrap();
            writeln!(writer, "frame,content").unwrap();
        }
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "frame,content\n");
    }

    #[test]
    fn unwritable_path_is_an_io_error() {
        let err = open_output(Some(Path::new("/nonexistent/dir/out.csv")))
            .err()
            .unwrap();
        assert!(matches!(err, CliError::Io(_)));
    }
}
