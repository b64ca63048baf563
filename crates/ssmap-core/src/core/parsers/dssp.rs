use super::{AssignmentTool, ParseError, ParseErrorKind, parse_float, parse_int};
use crate::core::models::record::SecondaryStructureRecord;
use crate::core::taxonomy::SsClass;
use phf::{Map, phf_map};

const TABLE_HEADER: &str = "  #  RESIDUE";

// Shortest residue line that still contains the psi column.
const MIN_LINE_LENGTH: usize = 115;

const CHAIN_BREAK: u8 = b'!';

static THREE_LETTER_CODES: Map<char, &'static str> = phf_map! {
    'A' => "ALA", 'R' => "ARG", 'N' => "ASN", 'D' => "ASP", 'C' => "CYS",
    'Q' => "GLN", 'E' => "GLU", 'G' => "GLY", 'H' => "HIS", 'I' => "ILE",
    'L' => "LEU", 'K' => "LYS", 'M' => "MET", 'F' => "PHE", 'P' => "PRO",
    'S' => "SER", 'T' => "THR", 'W' => "TRP", 'Y' => "TYR", 'V' => "VAL",
};

/// Parses the residue table of a classic-format DSSP output.
///
/// Everything up to and including the `  #  RESIDUE` header is skipped, as
/// are chain break lines (`!` in the amino acid column).
pub fn parse(output: &str) -> Result<Vec<SecondaryStructureRecord>, ParseError> {
    let mut records = Vec::new();
    let mut in_table = false;
    for (idx, line) in output.lines().enumerate() {
        if !in_table {
            in_table = line.starts_with(TABLE_HEADER);
            continue;
        }
        if line.trim().is_empty() || line.as_bytes().get(13) == Some(&CHAIN_BREAK) {
            continue;
        }
        let record = parse_line(line).map_err(|kind| ParseError {
            tool: AssignmentTool::Dssp,
            line_number: idx + 1,
            line: line.to_string(),
            kind,
        })?;
        records.push(record);
    }
    Ok(records)
}

fn column(line: &str, start: usize, end: usize) -> &str {
    line.get(start..end).unwrap_or("")
}

fn column_char(line: &str, index: usize) -> char {
    line.as_bytes().get(index).map_or(' ', |&b| b as char)
}

fn parse_line(line: &str) -> Result<SecondaryStructureRecord, ParseErrorKind> {
    if line.len() < MIN_LINE_LENGTH {
        return Err(ParseErrorKind::LineTooShort {
            expected: MIN_LINE_LENGTH,
        });
    }

    let residue_number = parse_int("residue number (columns 6-10)", column(line, 5, 10))?;
    let chain_id = column(line, 11, 12).trim().to_string();
    let residue_name = three_letter_name(column_char(line, 13)).to_string();

    let code = column_char(line, 16);
    SsClass::from_code(code).map_err(|_| ParseErrorKind::UnknownCode(code.to_string()))?;

    let kappa = parse_float("kappa (columns 92-97)", column(line, 91, 97))?;
    let alpha = parse_float("alpha (columns 98-103)", column(line, 97, 103))?;
    let phi = parse_float("phi (columns 104-109)", column(line, 103, 109))?;
    let psi = parse_float("psi (columns 110-115)", column(line, 109, 115))?;

    let record = SecondaryStructureRecord::new(residue_name, chain_id, residue_number, code, phi, psi)
        .map_err(|e| ParseErrorKind::UnknownCode(e.0))?;
    Ok(record.with_virtual_angles(kappa, alpha))
}

fn three_letter_name(one_letter: char) -> &'static str {
    // Lower-case letters label the half-cystines of a disulfide bridge.
    if one_letter.is_ascii_lowercase() {
        return "CYS";
    }
    THREE_LETTER_CODES.get(&one_letter).copied().unwrap_or("UNK")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::taxonomy::classify;

    const HEADER: &str = "\
==== Secondary Structure Definition by the program DSSP, CMBI version 2.2.1 ==== DATE=2024-01-01        .
REFERENCE W. KABSCH AND C.SANDER, BIOPOLYMERS 22 (1983) 2577-2637                                              .
    5  1  0  0  0 TOTAL NUMBER OF RESIDUES, NUMBER OF CHAINS, NUMBER OF SS-BRIDGES(TOTAL,INTRACHAIN,INTERCHAIN)  .
  #  RESIDUE AA STRUCTURE BP1 BP2  ACC     N-H-->O    O-->H-N    N-H-->O    O-->H-N    TCO  KAPPA ALPHA  PHI   PSI    X-CA   Y-CA   Z-CA
";

    const MET: &str = "    1    1 A M              0   0  209      0, 0.0     0, 0.0     0, 0.0     0, 0.0   0.000 360.0 360.0 360.0 150.6   22.5   17.4   32.1";
    const PHE: &str = "    2    2 A F  H           0   0  100      0, 0.0     0, 0.0     0, 0.0     0, 0.0  -0.200  12.3  49.5 -62.1 -41.3   21.0   16.0   30.0";
    const CYS: &str = "    3    3 A a  E           0   0    5      0, 0.0     0, 0.0     0, 0.0     0, 0.0  -0.900  20.1-170.2-120.5 130.2   20.0   15.0   28.0";
    const BREAK: &str = "    4        !                                                                                                                          ";
    const UNKNOWN_CODE: &str = "    5   10 B c  Z           0   0   50      0, 0.0     0, 0.0     0, 0.0     0, 0.0   0.100  10.0  20.0 -80.0 150.0    1.0    2.0    3.0";

    fn output(lines: &[&str]) -> String {
        let mut text = HEADER.to_string();
        for line in lines {
            text.push_str(line);
            text.push('\n');
        }
        text
    }

    #[test]
    fn parses_residue_table_after_header() {
        let records = parse(&output(&[MET, PHE, CYS])).unwrap();
        assert_eq!(records.len(), 3);

        let met = &records[0];
        assert_eq!(met.residue_name(), "MET");
        assert_eq!(met.chain_id(), "A");
        assert_eq!(met.residue_number(), 1);
        assert_eq!(met.code(), ' ');
        assert_eq!((met.phi(), met.psi()), (360.0, 150.6));
        assert_eq!((met.kappa(), met.alpha(), met.area()), (360.0, 360.0, 0.0));

        let phe = &records[1];
        assert_eq!(phe.code(), 'H');
        assert_eq!((phe.phi(), phe.psi()), (-62.1, -41.3));
        assert_eq!((phe.kappa(), phe.alpha()), (12.3, 49.5));
    }

    #[test]
    fn blank_code_is_classified_as_loop() {
        let records = parse(&output(&[MET])).unwrap();
        assert_eq!(classify(&records[0]).unwrap(), "loop");
    }

    #[test]
    fn adjacent_numeric_columns_are_split_by_position() {
        let records = parse(&output(&[CYS])).unwrap();
        assert_eq!(records[0].alpha(), -170.2);
        assert_eq!(records[0].phi(), -120.5);
        assert_eq!(records[0].residue_name(), "CYS");
    }

    #[test]
    fn chain_break_lines_are_skipped() {
        let records = parse(&output(&[MET, BREAK, PHE])).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].residue_number(), 2);
    }

    #[test]
    fn unknown_code_is_reported_with_its_line() {
        let err = parse(&output(&[MET, UNKNOWN_CODE])).unwrap_err();
        assert_eq!(err.tool, AssignmentTool::Dssp);
        assert_eq!(err.line_number, 6);
        assert_eq!(err.line, UNKNOWN_CODE);
        assert_eq!(err.kind, ParseErrorKind::UnknownCode("Z".to_string()));
    }

    #[test]
    fn short_line_is_a_parse_error() {
        let err = parse(&output(&[&MET[..100]])).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::LineTooShort { expected: 115 });
    }

    #[test]
    fn output_without_table_header_has_no_records() {
        assert!(parse(MET).unwrap().is_empty());
    }

    #[test]
    fn one_letter_codes_map_to_three_letter_names() {
        assert_eq!(three_letter_name('W'), "TRP");
        assert_eq!(three_letter_name('b'), "CYS");
        assert_eq!(three_letter_name('X'), "UNK");
    }
}
