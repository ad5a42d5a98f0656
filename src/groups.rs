use log::{debug, info, warn};

use group_allocation::*;
use snafu::{prelude::*, Snafu};

use std::fs;
use std::path::{Path, PathBuf};

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use serde_json::json;
use serde_json::Value as JSValue;
use text_diff::print_diff;

use crate::args::Args;
use crate::groups::config_reader::*;

pub mod config_reader;
mod io_common;
mod io_csv;
mod io_excel;
mod io_output;

#[derive(Debug, Snafu)]
pub enum GroupError {
    #[snafu(display("Error opening file {path}: {source}"))]
    OpeningExcel {
        source: calamine::Error,
        path: String,
    },
    #[snafu(display("The spreadsheet {path} does not contain any worksheet"))]
    EmptyExcel { path: String },
    #[snafu(display("The worksheet {name:?} does not exist in {path}"))]
    MissingWorksheet { name: String, path: String },
    #[snafu(display("Error reading worksheet of {path}: {source}"))]
    ReadingWorksheet {
        source: calamine::Error,
        path: String,
    },
    #[snafu(display("Error opening file {path}: {source}"))]
    OpeningJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing JSON: {source}"))]
    ParsingJson { source: serde_json::Error },
    #[snafu(display("Expected a positive number for {name}"))]
    ParsingJsonNumber { name: String },
    #[snafu(display("Invalid column {column:?}: use a letter (A, B, ...) or a number starting at 1"))]
    InvalidColumn { column: String },
    #[snafu(display("Missing setting {name}"))]
    MissingSetting { name: String },
    #[snafu(display("Missing parent directory"))]
    MissingParentDir {},
    #[snafu(display("Cannot read {path}: csv, xls, xlsx, xlsm, xlsb and ods files are accepted"))]
    UnsupportedFileType { path: String },
    #[snafu(display("Error opening file {path}: {source}"))]
    CsvOpen { source: csv::Error, path: String },
    #[snafu(display("Error reading CSV line: {source}"))]
    CsvLineParse { source: csv::Error },
    #[snafu(display("Row {lineno}, column {column}: expected a group number, found {content:?}"))]
    CellFormat {
        lineno: usize,
        column: String,
        content: String,
    },
    #[snafu(display("Row {lineno} has {width} columns, column {column} is out of range"))]
    ColumnOutOfRange {
        lineno: usize,
        column: String,
        width: usize,
    },
    #[snafu(display("{source}"))]
    Allocation { source: AllocationErrors },
    #[snafu(display("Error writing file {path}: {source}"))]
    WritingOutput { source: csv::Error, path: String },
    #[snafu(display("Error writing file {path}: {source}"))]
    WritingFile {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Difference detected between calculated summary and reference summary"))]
    ReferenceMismatch {},

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type GroupResult<T> = Result<T, GroupError>;

pub type BGroupResult<T> = Result<T, Box<GroupError>>;

/// The formats the record source can read.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum InputType {
    Csv,
    /// xls, xlsx, xlsm, xlsb
    Excel,
    Ods,
}

impl InputType {
    pub fn from_provider(provider: &str) -> Option<InputType> {
        match provider.to_lowercase().as_str() {
            "csv" => Some(InputType::Csv),
            "excel" | "xls" | "xlsx" | "xlsm" | "xlsb" => Some(InputType::Excel),
            "ods" => Some(InputType::Ods),
            _ => None,
        }
    }

    pub fn from_path(path: &str) -> Option<InputType> {
        let ext = Path::new(path).extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "csv" => Some(InputType::Csv),
            "xls" | "xlsx" | "xlsm" | "xlsb" => Some(InputType::Excel),
            "ods" => Some(InputType::Ods),
            _ => None,
        }
    }
}

/// A row of the input, before the fields are interpreted.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ParsedRow {
    /// The row number in the file, starting at 1.
    pub lineno: usize,
    pub cells: Vec<String>,
}

impl ParsedRow {
    fn is_blank(&self) -> bool {
        self.cells.iter().all(|c| c.trim().is_empty())
    }
}

/// Reads the records described by the input source.
///
/// The rows are shuffled with `rng` first, unless the source asks to keep the input order.
pub fn read_records<R: Rng + ?Sized>(
    source: &InputSource,
    rng: &mut R,
) -> BGroupResult<Vec<PreferenceRecord>> {
    let path = source.file_path.clone();
    let input_type = source.input_type()?;
    let first_row = source.first_data_row_index()?;
    let columns = source.record_columns()?;
    info!(
        "Attempting to read {:?} file {:?} from row {}",
        input_type, path, first_row
    );

    let rows = match input_type {
        InputType::Csv => io_csv::read_csv_rows(&path, first_row)?,
        InputType::Excel | InputType::Ods => io_excel::read_spreadsheet_rows(
            &path,
            source.excel_worksheet_name.as_deref(),
            first_row,
        )?,
    };

    let mut rows: Vec<ParsedRow> = rows
        .into_iter()
        .filter(|r| {
            if r.is_blank() {
                debug!("read_records: skipping blank row {}", r.lineno);
                false
            } else {
                true
            }
        })
        .collect();
    info!("Read {} rows from {:?}", rows.len(), path);

    if source.randomize_input_order() {
        rows.shuffle(rng);
    }

    io_common::rows_to_records(&rows, &columns)
}

fn build_summary_js(config: &PrefConfig, rules: &AllocationRules, res: &AllocationResult) -> JSValue {
    let stats = res.stats();
    let results: Vec<JSValue> = res
        .grouping
        .iter()
        .map(|g| json!({"group": g.id, "members": g.members}))
        .collect();
    json!({
        "config": {
            "input": io_common::simplify_file_name(&config.input_source.file_path),
            "groupsCount": rules.n_choices,
            "maxPerGroup": rules.max_per_group,
            "records": res.placements.len(),
        },
        "results": results,
        "placements": {
            "firstChoice": stats.first_choice,
            "secondChoice": stats.second_choice,
            "random": stats.random,
        }
    })
}

fn check_reference(reference_path: &str, pretty_js_stats: &str) -> BGroupResult<()> {
    let summary_ref = read_summary(reference_path)?;
    info!("summary: {:?}", summary_ref);
    let pretty_js_summary_ref =
        serde_json::to_string_pretty(&summary_ref).context(ParsingJsonSnafu {})?;
    if pretty_js_summary_ref != pretty_js_stats {
        warn!("Found differences with the reference string");
        print_diff(pretty_js_summary_ref.as_str(), pretty_js_stats, "\n");
        return Err(Box::new(ReferenceMismatchSnafu {}.build()));
    }
    Ok(())
}

/// Runs one complete allocation: reads the input, assigns the groups and writes the output.
///
/// Returns the message to show to the user.
pub fn run_allocation(args: &Args) -> BGroupResult<String> {
    let config = load_config(args)?;
    info!("config: {:?}", config);

    let rules = config.rules.allocation_rules()?;
    let allocator = GroupAllocator::new(&rules).context(AllocationSnafu {})?;

    let mut rng = match config.rules.random_seed()? {
        Some(seed) => {
            info!("Using random seed {}", seed);
            StdRng::seed_from_u64(seed)
        }
        None => StdRng::from_entropy(),
    };

    let records = read_records(&config.input_source, &mut rng)?;
    debug!("records: {:?}", records);

    let result = allocator
        .allocate(&records, &mut rng)
        .context(AllocationSnafu {})?;

    let summary_js = build_summary_js(&config, &rules, &result);
    let pretty_js_stats = serde_json::to_string_pretty(&summary_js).context(ParsingJsonSnafu {})?;

    // The reference summary, if provided for comparison
    if let Some(reference_path) = &args.reference {
        check_reference(reference_path, &pretty_js_stats)?;
    }

    let out = config.output_path();
    let message = match io_output::OutputType::from_path(&out) {
        io_output::OutputType::Stdout => {
            println!("{}", pretty_js_stats);
            "Summary written to the standard output".to_string()
        }
        io_output::OutputType::Json => {
            let location = io_output::write_summary_json(&out, &pretty_js_stats)?;
            format!("File created successfully at {}", location.display())
        }
        io_output::OutputType::Csv => {
            let location = io_output::write_grouping_csv(&out, &result.grouping)?;
            format!("File created successfully at {}", location.display())
        }
    };
    Ok(message)
}

#[cfg(test)]
fn test_wrapper(test_name: &str) -> BGroupResult<String> {
    let _ = env_logger::builder().is_test(true).try_init();
    let test_dir: PathBuf = [env!("CARGO_MANIFEST_DIR"), "tests", "data", test_name]
        .iter()
        .collect();
    let out: PathBuf = std::env::temp_dir().join(format!("prefgroups_{}_results.csv", test_name));
    let args = Args {
        config: Some(
            test_dir
                .join(format!("{}_config.json", test_name))
                .display()
                .to_string(),
        ),
        reference: Some(
            test_dir
                .join(format!("{}_expected_summary.json", test_name))
                .display()
                .to_string(),
        ),
        out: Some(out.display().to_string()),
        ..Args::default()
    };
    info!("Running test {}", test_name);
    run_allocation(&args)
}
