use std::fmt;
use std::path::Path;

use thiserror::Error;
use tracing::debug;

use crate::error::Error;
use crate::model::{Checkpoint, CheckpointHeader, Field};

/// Which of the three header lines a problem refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderField {
    Width,
    Height,
    SnapshotCount,
}

impl HeaderField {
    const ORDER: [HeaderField; 3] = [Self::Width, Self::Height, Self::SnapshotCount];
}

impl fmt::Display for HeaderField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Width => write!(f, "width"),
            Self::Height => write!(f, "height"),
            Self::SnapshotCount => write!(f, "snapshot count"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CheckpointParseError {
    #[error("invalid UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),
    #[error("line {line}: missing {field} header line")]
    MissingHeader { line: usize, field: HeaderField },
    #[error("line {line}: {field} must be a non-negative integer, found {value:?}")]
    InvalidHeader {
        line: usize,
        field: HeaderField,
        value: String,
    },
    #[error("{field} must be positive")]
    ZeroDimension { field: HeaderField },
    #[error("a {width}x{height} field does not fit in memory")]
    DimensionOverflow { width: usize, height: usize },
    #[error("header declares zero snapshots")]
    NoSnapshots,
    #[error("header declares {expected} snapshots but the body has {found} rows")]
    RowCountMismatch { expected: usize, found: usize },
    #[error("line {line}: expected {expected} comma-separated fields, found {found}")]
    FieldCountMismatch {
        line: usize,
        expected: usize,
        found: usize,
    },
    #[error("line {line}: row is not terminated by a delimiter (last field is {value:?})")]
    MissingTerminator { line: usize, value: String },
    #[error("line {line}, field {column}: {value:?} is not a finite number")]
    InvalidNumber {
        line: usize,
        column: usize,
        value: String,
    },
}

/// Read and parse a checkpoint file.
pub fn load(path: impl AsRef<Path>) -> Result<Checkpoint, Error> {
    let path = path.as_ref();
    let data = std::fs::read(path).map_err(|source| Error::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let checkpoint = parse_checkpoint(&data)?;
    debug!(
        path = %path.display(),
        snapshots = checkpoint.len(),
        "loaded checkpoint"
    );
    Ok(checkpoint)
}

/// Parse the flat checkpoint text format.
///
/// ```text
/// <width>
/// <height>
/// <snapshot count>
/// <t0>, v0, v1, ..., v(width*height-1) ,
/// <t1>, ...
/// ```
///
/// Each body row holds the snapshot time, then the field flattened
/// row-major (column fastest), then an empty field produced by the
/// writer's trailing delimiter. Fields may be padded with spaces.
pub fn parse_checkpoint(data: &[u8]) -> Result<Checkpoint, CheckpointParseError> {
    let text = std::str::from_utf8(data)?;
    let mut lines = text.lines().enumerate().map(|(i, l)| (i + 1, l));

    let mut dims = [0usize; 3];
    for (slot, field) in dims.iter_mut().zip(HeaderField::ORDER) {
        let (line, raw) = lines.next().ok_or(CheckpointParseError::MissingHeader {
            line: field as usize + 1,
            field,
        })?;
        let raw = raw.trim();
        *slot = raw
            .parse::<usize>()
            .map_err(|_| CheckpointParseError::InvalidHeader {
                line,
                field,
                value: raw.to_string(),
            })?;
    }
    let header = CheckpointHeader {
        width: dims[0],
        height: dims[1],
        snapshot_count: dims[2],
    };
    if header.width == 0 {
        return Err(CheckpointParseError::ZeroDimension {
            field: HeaderField::Width,
        });
    }
    if header.height == 0 {
        return Err(CheckpointParseError::ZeroDimension {
            field: HeaderField::Height,
        });
    }
    if header.checked_row_len().is_none() {
        return Err(CheckpointParseError::DimensionOverflow {
            width: header.width,
            height: header.height,
        });
    }
    if header.snapshot_count == 0 {
        return Err(CheckpointParseError::NoSnapshots);
    }
    debug!(
        width = header.width,
        height = header.height,
        snapshots = header.snapshot_count,
        "parsed checkpoint header"
    );

    let mut body: Vec<(usize, &str)> = lines.collect();
    // A run of newlines at EOF is not a row.
    while body.last().is_some_and(|(_, l)| l.trim().is_empty()) {
        body.pop();
    }
    if body.len() != header.snapshot_count {
        return Err(CheckpointParseError::RowCountMismatch {
            expected: header.snapshot_count,
            found: body.len(),
        });
    }

    let mut timestamps = Vec::with_capacity(header.snapshot_count);
    let mut fields = Vec::with_capacity(header.snapshot_count);
    for (line, row) in body {
        let (time, field) = parse_row(&header, line, row)?;
        timestamps.push(time);
        fields.push(field);
    }

    Ok(Checkpoint {
        header,
        timestamps,
        fields,
    })
}

fn parse_row(
    header: &CheckpointHeader,
    line: usize,
    row: &str,
) -> Result<(f64, Field), CheckpointParseError> {
    let tokens: Vec<&str> = row.split(',').collect();
    let mismatch = || CheckpointParseError::FieldCountMismatch {
        line,
        expected: header.row_len(),
        found: tokens.len(),
    };
    if tokens.len() != header.row_len() {
        return Err(mismatch());
    }
    let Some((placeholder, numeric)) = tokens.split_last() else {
        return Err(mismatch());
    };
    if !placeholder.trim().is_empty() {
        return Err(CheckpointParseError::MissingTerminator {
            line,
            value: placeholder.trim().to_string(),
        });
    }
    let Some((time, cells)) = numeric.split_first() else {
        return Err(mismatch());
    };

    let time = parse_number(line, 1, time)?;
    let values = cells
        .iter()
        .enumerate()
        .map(|(i, tok)| parse_number(line, i + 2, tok))
        .collect::<Result<Vec<f64>, _>>()?;
    let field = Field::from_flat(header.width, header.height, values).ok_or_else(mismatch)?;
    Ok((time, field))
}

fn parse_number(line: usize, column: usize, token: &str) -> Result<f64, CheckpointParseError> {
    let token = token.trim();
    token
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| CheckpointParseError::InvalidNumber {
            line,
            column,
            value: token.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn reshapes_rows_into_fields() {
        let input = b"2\n2\n2\n0.0,1,2,3,4,\n1.0,5,6,7,8,\n";
        let cp = parse_checkpoint(input).unwrap();
        assert_eq!(cp.timestamps, vec![0.0, 1.0]);
        assert_eq!(cp.fields[0].to_nested(), vec![vec![1.0, 2.0], vec![3.0, 4.0]]);
        assert_eq!(cp.fields[1].to_nested(), vec![vec![5.0, 6.0], vec![7.0, 8.0]]);
    }

    #[test]
    fn non_square_fields_scan_column_fastest() {
        // width 3, height 2
        let input = b"3\n2\n1\n0.25,1,2,3,4,5,6,\n";
        let cp = parse_checkpoint(input).unwrap();
        assert_eq!(cp.header.width, 3);
        assert_eq!(cp.header.height, 2);
        assert_eq!(
            cp.fields[0].to_nested(),
            vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]
        );
    }

    #[test]
    fn accepts_writer_spacing_and_crlf() {
        let input = b" 2 \r\n1\r\n1\r\n0.500000 , 300.000000 , 301.500000 ,\r\n";
        let cp = parse_checkpoint(input).unwrap();
        assert_eq!(cp.timestamps, vec![0.5]);
        assert_eq!(cp.fields[0].values(), &[300.0, 301.5]);
    }

    #[test]
    fn trailing_blank_lines_are_ignored() {
        let input = b"1\n1\n1\n0,5,\n\n\n";
        assert_eq!(parse_checkpoint(input).unwrap().len(), 1);
    }

    #[test]
    fn malformed_header_fails_before_body() {
        let err = parse_checkpoint(b"abc\n2\n2\nthis body is garbage\n").unwrap_err();
        assert_eq!(
            err,
            CheckpointParseError::InvalidHeader {
                line: 1,
                field: HeaderField::Width,
                value: "abc".into(),
            }
        );
    }

    #[test]
    fn negative_header_is_rejected() {
        let err = parse_checkpoint(b"2\n-1\n2\n").unwrap_err();
        assert!(matches!(
            err,
            CheckpointParseError::InvalidHeader {
                line: 2,
                field: HeaderField::Height,
                ..
            }
        ));
    }

    #[test]
    fn missing_header_line() {
        let err = parse_checkpoint(b"2\n2\n").unwrap_err();
        assert_eq!(
            err,
            CheckpointParseError::MissingHeader {
                line: 3,
                field: HeaderField::SnapshotCount,
            }
        );
    }

    #[test]
    fn zero_dimensions_and_counts_are_rejected() {
        assert_eq!(
            parse_checkpoint(b"0\n2\n1\n").unwrap_err(),
            CheckpointParseError::ZeroDimension {
                field: HeaderField::Width
            }
        );
        assert_eq!(
            parse_checkpoint(b"2\n2\n0\n").unwrap_err(),
            CheckpointParseError::NoSnapshots
        );
    }

    #[test]
    fn oversized_dimensions_are_rejected() {
        let input = format!("{}\n2\n1\n0.0,,\n", usize::MAX);
        assert_eq!(
            parse_checkpoint(input.as_bytes()).unwrap_err(),
            CheckpointParseError::DimensionOverflow {
                width: usize::MAX,
                height: 2,
            }
        );
        // The product alone fits but the two extra row fields do not.
        let input = format!("{}\n1\n1\n0.0,,\n", usize::MAX - 1);
        assert!(matches!(
            parse_checkpoint(input.as_bytes()).unwrap_err(),
            CheckpointParseError::DimensionOverflow { .. }
        ));
    }

    #[test]
    fn row_count_must_match_header() {
        let input = b"2\n2\n3\n0.0,1,2,3,4,\n1.0,5,6,7,8,\n";
        assert_eq!(
            parse_checkpoint(input).unwrap_err(),
            CheckpointParseError::RowCountMismatch {
                expected: 3,
                found: 2,
            }
        );
    }

    #[test]
    fn interior_blank_line_counts_as_a_row() {
        let input = b"1\n1\n2\n0,1,\n\n1,2,\n";
        assert!(matches!(
            parse_checkpoint(input).unwrap_err(),
            CheckpointParseError::RowCountMismatch { found: 3, .. }
        ));
    }

    #[test]
    fn field_count_must_match_dimensions() {
        let input = b"2\n2\n1\n0.0,1,2,3,\n";
        assert_eq!(
            parse_checkpoint(input).unwrap_err(),
            CheckpointParseError::FieldCountMismatch {
                line: 4,
                expected: 6,
                found: 5,
            }
        );
    }

    #[test]
    fn unterminated_row_is_rejected() {
        // Right number of fields, but the last one holds data.
        let input = b"2\n2\n1\n0.0,1,2,3,4\n";
        assert!(matches!(
            parse_checkpoint(input).unwrap_err(),
            CheckpointParseError::FieldCountMismatch { found: 5, .. }
        ));
        let input = b"1\n1\n1\n0.0,1,2\n";
        assert_eq!(
            parse_checkpoint(input).unwrap_err(),
            CheckpointParseError::MissingTerminator {
                line: 4,
                value: "2".into(),
            }
        );
    }

    #[test]
    fn non_numeric_and_non_finite_fields_are_rejected() {
        let err = parse_checkpoint(b"2\n1\n1\n0.0,1,x,\n").unwrap_err();
        assert_eq!(
            err,
            CheckpointParseError::InvalidNumber {
                line: 4,
                column: 3,
                value: "x".into(),
            }
        );
        let err = parse_checkpoint(b"2\n1\n1\n0.0,nan,1,\n").unwrap_err();
        assert!(matches!(
            err,
            CheckpointParseError::InvalidNumber { column: 2, .. }
        ));
        let err = parse_checkpoint(b"2\n1\n1\n,1,2,\n").unwrap_err();
        assert!(matches!(
            err,
            CheckpointParseError::InvalidNumber { column: 1, .. }
        ));
    }

    #[test]
    fn load_reports_missing_files_as_read_errors() {
        let dir = tempfile::tempdir().unwrap();
        let err = load(dir.path().join("absent.ckpt")).unwrap_err();
        assert!(matches!(err, Error::Read { .. }));
        assert!(err.is_io());
    }
}
