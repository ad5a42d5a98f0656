use std::path::Path;

use crate::groups::*;

pub fn simplify_file_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or(path)
        .to_string()
}

/// Parses a column given as spreadsheet letters (A, B, ..., Z, AA, ...) or as a
/// number starting at 1. Returns the index starting at 0.
pub fn parse_column(s: &str) -> Option<usize> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if s.chars().all(|c| c.is_ascii_alphabetic()) {
        let mut idx: usize = 0;
        for c in s.to_ascii_uppercase().chars() {
            idx = idx.checked_mul(26)?.checked_add((c as usize) - ('A' as usize) + 1)?;
        }
        return Some(idx - 1);
    }
    match s.parse::<usize>() {
        Ok(x) if x >= 1 => Some(x - 1),
        _ => None,
    }
}

/// The spreadsheet name of a column index starting at 0.
pub fn column_name(idx: usize) -> String {
    let mut n = idx + 1;
    let mut letters: Vec<char> = Vec::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push((b'A' + rem as u8) as char);
        n = (n - 1) / 26;
    }
    letters.iter().rev().collect()
}

// Spreadsheets store numbers as floats: 2.0 is accepted as 2.
fn parse_choice(cell: &str) -> Option<i64> {
    let s = cell.trim();
    if let Ok(x) = s.parse::<i64>() {
        return Some(x);
    }
    match s.parse::<f64>() {
        Ok(f) if f.is_finite() && f.fract() == 0.0 => Some(f as i64),
        _ => None,
    }
}

fn get_cell<'a>(row: &'a ParsedRow, idx: usize) -> GroupResult<&'a str> {
    row.cells
        .get(idx)
        .map(|s| s.as_str())
        .context(ColumnOutOfRangeSnafu {
            lineno: row.lineno,
            column: column_name(idx),
            width: row.cells.len(),
        })
}

fn get_choice(row: &ParsedRow, idx: usize) -> GroupResult<i64> {
    let cell = get_cell(row, idx)?;
    parse_choice(cell).context(CellFormatSnafu {
        lineno: row.lineno,
        column: column_name(idx),
        content: cell,
    })
}

pub fn rows_to_records(
    rows: &[ParsedRow],
    columns: &RecordColumns,
) -> BGroupResult<Vec<PreferenceRecord>> {
    let mut res: Vec<PreferenceRecord> = Vec::with_capacity(rows.len());
    for row in rows.iter() {
        let name = get_cell(row, columns.name)?.trim().to_string();
        let first_choice = get_choice(row, columns.first_choice)?;
        let second_choice = get_choice(row, columns.second_choice)?;
        debug!(
            "rows_to_records: lineno: {:?} name: {:?} choices: {:?} {:?}",
            row.lineno, name, first_choice, second_choice
        );
        res.push(PreferenceRecord {
            name,
            first_choice,
            second_choice,
        });
    }
    Ok(res)
}

#[cfg(test)]
mod tests {
    use super::*;

    const COLUMNS: RecordColumns = RecordColumns {
        name: 0,
        first_choice: 1,
        second_choice: 2,
    };

    fn row(lineno: usize, cells: &[&str]) -> ParsedRow {
        ParsedRow {
            lineno,
            cells: cells.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn columns() {
        assert_eq!(parse_column("A"), Some(0));
        assert_eq!(parse_column("c"), Some(2));
        assert_eq!(parse_column("Z"), Some(25));
        assert_eq!(parse_column("AA"), Some(26));
        assert_eq!(parse_column("AZ"), Some(51));
        assert_eq!(parse_column("1"), Some(0));
        assert_eq!(parse_column(" 12 "), Some(11));
        assert_eq!(parse_column("0"), None);
        assert_eq!(parse_column(""), None);
        assert_eq!(parse_column("B2"), None);
        assert_eq!(parse_column("-1"), None);
    }

    #[test]
    fn column_names() {
        assert_eq!(column_name(0), "A");
        assert_eq!(column_name(25), "Z");
        assert_eq!(column_name(26), "AA");
        assert_eq!(column_name(51), "AZ");
        assert_eq!(column_name(52), "BA");
    }

    #[test]
    fn choices() {
        assert_eq!(parse_choice("3"), Some(3));
        assert_eq!(parse_choice(" 2 "), Some(2));
        assert_eq!(parse_choice("2.0"), Some(2));
        assert_eq!(parse_choice("-1"), Some(-1));
        assert_eq!(parse_choice("2.5"), None);
        assert_eq!(parse_choice("two"), None);
        assert_eq!(parse_choice(""), None);
    }

    #[test]
    fn records_from_rows() {
        let rows = vec![row(1, &[" Anna ", "1", "2"]), row(2, &["Bob", "3.0", "1", "extra"])];
        let records = rows_to_records(&rows, &COLUMNS).unwrap();
        assert_eq!(
            records,
            vec![
                PreferenceRecord::new("Anna", 1, 2),
                PreferenceRecord::new("Bob", 3, 1)
            ]
        );
    }

    #[test]
    fn short_row() {
        let rows = vec![row(1, &["Anna", "1", "2"]), row(2, &["Bob", "1"])];
        let err = rows_to_records(&rows, &COLUMNS).unwrap_err();
        match *err {
            GroupError::ColumnOutOfRange {
                lineno,
                column,
                width,
            } => {
                assert_eq!(lineno, 2);
                assert_eq!(column, "C");
                assert_eq!(width, 2);
            }
            e => panic!("unexpected error {:?}", e),
        }
    }

    #[test]
    fn bad_choice_cell() {
        let rows = vec![row(4, &["Anna", "first", "2"])];
        let err = rows_to_records(&rows, &COLUMNS).unwrap_err();
        match *err {
            GroupError::CellFormat {
                lineno,
                column,
                content,
            } => {
                assert_eq!(lineno, 4);
                assert_eq!(column, "B");
                assert_eq!(content, "first");
            }
            e => panic!("unexpected error {:?}", e),
        }
    }

    #[test]
    fn file_names() {
        assert_eq!(simplify_file_name("/tmp/x/basic.csv"), "basic.csv");
        assert_eq!(simplify_file_name("basic.csv"), "basic.csv");
    }
}
