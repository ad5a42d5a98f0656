// Primitives for reading CSV files.

use crate::groups::*;

/// Reads all the rows of a comma-separated file, starting at `first_row` (starting at 1).
///
/// Rows of different lengths are accepted here, the columns are checked when
/// the records are extracted.
pub fn read_csv_rows(path: &str, first_row: usize) -> BGroupResult<Vec<ParsedRow>> {
    let rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .context(CsvOpenSnafu { path })?;

    let mut res: Vec<ParsedRow> = Vec::new();
    for (idx, line_r) in rdr.into_records().enumerate() {
        let line = line_r.context(CsvLineParseSnafu {})?;
        let lineno = line
            .position()
            .map(|p| p.line() as usize)
            .unwrap_or(idx + 1);
        if lineno < first_row {
            debug!("read_csv_rows: skipping line {:?}", lineno);
            continue;
        }
        let cells: Vec<String> = line.iter().map(|s| s.to_string()).collect();
        debug!("read_csv_rows: lineno: {:?} row: {:?}", lineno, &cells);
        res.push(ParsedRow { lineno, cells });
    }
    Ok(res)
}
