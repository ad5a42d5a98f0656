// Primitives for reading spreadsheets (Excel and OpenDocument).

use calamine::{open_workbook_auto, DataType, Reader};

use crate::groups::*;

pub fn read_spreadsheet_rows(
    path: &str,
    worksheet_name_o: Option<&str>,
    first_row: usize,
) -> BGroupResult<Vec<ParsedRow>> {
    debug!(
        "read_spreadsheet_rows: path: {:?} worksheet: {:?}",
        path, worksheet_name_o
    );
    let mut workbook = open_workbook_auto(path).context(OpeningExcelSnafu { path })?;

    let wrange = match worksheet_name_o {
        // A worksheet name was provided, use it.
        Some(worksheet_name) => workbook
            .worksheet_range(worksheet_name)
            .context(MissingWorksheetSnafu {
                name: worksheet_name,
                path,
            })?
            .context(ReadingWorksheetSnafu { path })?,
        None => {
            debug!(
                "read_spreadsheet_rows: using the first of {:?}",
                workbook.sheet_names()
            );
            workbook
                .worksheet_range_at(0)
                .context(EmptyExcelSnafu { path })?
                .context(ReadingWorksheetSnafu { path })?
        }
    };

    // The range only covers the used cells: it may not start at A1.
    let (row_offset, col_offset) = wrange
        .start()
        .map(|(r, c)| (r as usize, c as usize))
        .unwrap_or((0, 0));

    let mut res: Vec<ParsedRow> = Vec::new();
    for (idx, row) in wrange.rows().enumerate() {
        let lineno = row_offset + idx + 1;
        if lineno < first_row {
            continue;
        }
        let mut cells: Vec<String> = vec![String::new(); col_offset];
        cells.extend(row.iter().map(cell_to_string));
        debug!("read_spreadsheet_rows: lineno: {:?} row: {:?}", lineno, &cells);
        res.push(ParsedRow { lineno, cells });
    }
    Ok(res)
}

fn cell_to_string(cell: &DataType) -> String {
    match cell {
        DataType::String(s) => s.clone(),
        DataType::Int(i) => i.to_string(),
        DataType::Float(f) if f.is_finite() && f.fract() == 0.0 => format!("{}", *f as i64),
        DataType::Float(f) => f.to_string(),
        DataType::Bool(b) => b.to_string(),
        DataType::Empty => "".to_string(),
        // Dates and cell errors are never valid choices, keep something readable for the messages.
        other => format!("{:?}", other),
    }
}
