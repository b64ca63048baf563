use super::{AssignmentTool, ParseError, ParseErrorKind, parse_float, parse_int};
use crate::core::models::record::SecondaryStructureRecord;
use crate::core::taxonomy::SsClass;

const RECORD_TAG: &str = "ASG";

// ASG resname chain resnum ordinal code name phi psi area [~~~~]
const MIN_FIELDS: usize = 10;

/// Parses the `ASG` records of a STRIDE output.
pub fn parse(output: &str) -> Result<Vec<SecondaryStructureRecord>, ParseError> {
    let mut records = Vec::new();
    for (idx, line) in output.lines().enumerate() {
        if !line.starts_with(RECORD_TAG) {
            continue;
        }
        let record = parse_line(line).map_err(|kind| ParseError {
            tool: AssignmentTool::Stride,
            line_number: idx + 1,
            line: line.to_string(),
            kind,
        })?;
        records.push(record);
    }
    Ok(records)
}

fn parse_line(line: &str) -> Result<SecondaryStructureRecord, ParseErrorKind> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() < MIN_FIELDS {
        return Err(ParseErrorKind::TooFewFields {
            expected: MIN_FIELDS,
            found: fields.len(),
        });
    }

    let residue_number = parse_int("residue number", fields[3])?;
    let code = parse_code(fields[5])?;
    let phi = parse_float("phi", fields[7])?;
    let psi = parse_float("psi", fields[8])?;
    let area = parse_float("area", fields[9])?;

    let record = SecondaryStructureRecord::new(fields[1], fields[2], residue_number, code, phi, psi)
        .map_err(|e| ParseErrorKind::UnknownCode(e.0))?;
    Ok(record.with_area(area))
}

fn parse_code(field: &str) -> Result<char, ParseErrorKind> {
    let mut chars = field.chars();
    let code = match (chars.next(), chars.next()) {
        // STRIDE marks isolated bridges with a lower-case 'b'.
        (Some('b'), None) => 'B',
        (Some(c), None) => c,
        _ => return Err(ParseErrorKind::UnknownCode(field.to_string())),
    };
    SsClass::from_code(code).map_err(|_| ParseErrorKind::UnknownCode(field.to_string()))?;
    Ok(code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::taxonomy::classify;

    const OUTPUT: &str = "\
REM  -------------------- Secondary structure summary -------------------  ~~~~
CHN  /tmp/ssmap-input.pdb A                                                ~~~~
SEQ  1    MFKLVKNHVLNISLSAN                                               ~~~~
LOC  AlphaHelix   LYS     3 A      ASN      6 A                           ~~~~
REM                                                                        ~~~~
REM  |---Residue---|    |--Structure--|   |-Phi-|   |-Psi-|  |-Area-|      ~~~~
ASG  MET A    1    1    C          Coil    360.00    150.62     234.4      ~~~~
ASG  PHE A    2    2    C          Coil    -69.01    138.78     162.9      ~~~~
ASG  LYS A    3    3    H    AlphaHelix    -57.32    -47.12      98.1      ~~~~
ASG  LEU A    4    4    G      310Helix    -60.55    -25.40      10.0      ~~~~
ASG  VAL A    5    5    b        Bridge   -120.00    130.00      12.3      ~~~~
ASG  ASN A    6    6    T          Turn   -130.75    360.00     114.8      ~~~~
";

    #[test]
    fn parses_every_asg_record_in_order() {
        let records = parse(OUTPUT).unwrap();
        assert_eq!(records.len(), 6);
        let numbers: Vec<_> = records.iter().map(|r| r.residue_number()).collect();
        assert_eq!(numbers, vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn known_good_line_yields_literal_field_values() {
        let records = parse(OUTPUT).unwrap();
        let first = &records[0];
        assert_eq!(first.residue_name(), "MET");
        assert_eq!(first.chain_id(), "A");
        assert_eq!(first.residue_number(), 1);
        assert_eq!(first.code(), 'C');
        assert_eq!(first.phi(), 360.0);
        assert_eq!(first.psi(), 150.62);
        assert_eq!(first.area(), 234.4);
        assert_eq!(first.kappa(), 0.0);
        assert_eq!(first.alpha(), 0.0);
        assert_eq!(classify(first).unwrap(), "coil");
    }

    #[test]
    fn lowercase_bridge_code_is_normalized() {
        let records = parse(OUTPUT).unwrap();
        assert_eq!(records[4].code(), 'B');
        assert_eq!(classify(&records[4]).unwrap(), "beta bridge");
    }

    #[test]
    fn unknown_code_is_a_parse_error() {
        let output = "ASG  MET A    1    1    Z          Coil    360.00    150.62     234.4      ~~~~";
        let err = parse(output).unwrap_err();
        assert_eq!(err.line_number, 1);
        assert_eq!(err.line, output);
        assert_eq!(err.kind, ParseErrorKind::UnknownCode("Z".to_string()));
    }

    #[test]
    fn truncated_record_is_a_parse_error() {
        let output = "REM header\nASG  MET A    1    1    C          Coil    360.00";
        let err = parse(output).unwrap_err();
        assert_eq!(err.line_number, 2);
        assert!(matches!(
            err.kind,
            ParseErrorKind::TooFewFields {
                expected: 10,
                found: 8
            }
        ));
    }

    #[test]
    fn non_numeric_fields_are_parse_errors() {
        let bad_number = "ASG  MET A   1A    1    C          Coil    360.00    150.62     234.4      ~~~~";
        assert!(matches!(
            parse(bad_number).unwrap_err().kind,
            ParseErrorKind::InvalidInt { field: "residue number", .. }
        ));
        let bad_psi = "ASG  MET A    1    1    C          Coil    360.00    abc     234.4      ~~~~";
        assert!(matches!(
            parse(bad_psi).unwrap_err().kind,
            ParseErrorKind::InvalidFloat { field: "psi", .. }
        ));
    }

    #[test]
    fn output_without_records_is_empty() {
        assert!(parse("REM nothing here\n").unwrap().is_empty());
        assert!(parse("").unwrap().is_empty());
    }
}
