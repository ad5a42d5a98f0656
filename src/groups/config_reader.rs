use crate::groups::{io_common::parse_column, *};

use serde::{Deserialize, Serialize};
use serde_json::Value as JSValue;

pub const DEFAULT_OUTPUT_PATH: &str = "results.csv";

#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputSettings {
    #[serde(rename = "outputPath")]
    pub output_path: Option<String>,
}

#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct InputSource {
    pub provider: Option<String>,
    #[serde(rename = "filePath", default)]
    pub file_path: String,
    #[serde(rename = "excelWorksheetName")]
    pub excel_worksheet_name: Option<String>,
    #[serde(rename = "nameColumnIndex")]
    pub _name_column_index: Option<JSValue>,
    #[serde(rename = "firstChoiceColumnIndex")]
    pub _first_choice_column_index: Option<JSValue>,
    #[serde(rename = "secondChoiceColumnIndex")]
    pub _second_choice_column_index: Option<JSValue>,
    #[serde(rename = "firstDataRowIndex")]
    pub _first_data_row_index: Option<JSValue>,
    #[serde(rename = "randomizeInputOrder")]
    pub randomize_input_order: Option<bool>,
}

/// The position of the three fields of a record, starting at 0.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub struct RecordColumns {
    pub name: usize,
    pub first_choice: usize,
    pub second_choice: usize,
}

impl InputSource {
    pub fn record_columns(&self) -> GroupResult<RecordColumns> {
        Ok(RecordColumns {
            name: read_column(&self._name_column_index, 0)?,
            first_choice: read_column(&self._first_choice_column_index, 1)?,
            second_choice: read_column(&self._second_choice_column_index, 2)?,
        })
    }

    /// The first row containing a record. The index starts at 1 to respect most
    /// conventions in the excel world, and 0 is accepted as 1.
    pub fn first_data_row_index(&self) -> GroupResult<usize> {
        match &self._first_data_row_index {
            None | Some(JSValue::Null) => Ok(1),
            Some(_) => {
                let x = read_js_int(&self._first_data_row_index, "firstDataRowIndex")?;
                Ok(x.max(1))
            }
        }
    }

    pub fn randomize_input_order(&self) -> bool {
        self.randomize_input_order.unwrap_or(true)
    }

    pub fn input_type(&self) -> GroupResult<InputType> {
        if let Some(provider) = &self.provider {
            return InputType::from_provider(provider).context(UnsupportedFileTypeSnafu {
                path: self.file_path.clone(),
            });
        }
        InputType::from_path(&self.file_path).context(UnsupportedFileTypeSnafu {
            path: self.file_path.clone(),
        })
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct AllocationSettings {
    #[serde(rename = "groupsCount")]
    pub groups_count: Option<u32>,
    #[serde(rename = "maxPerGroup")]
    pub max_per_group: Option<u32>,
    #[serde(rename = "randomSeed")]
    pub _random_seed: Option<JSValue>,
    #[serde(rename = "processingOrder")]
    pub processing_order: Option<String>,
}

impl AllocationSettings {
    pub fn allocation_rules(&self) -> GroupResult<AllocationRules> {
        let n_choices = self.groups_count.context(MissingSettingSnafu {
            name: "groupsCount",
        })?;
        let max_per_group = self.max_per_group.context(MissingSettingSnafu {
            name: "maxPerGroup",
        })?;
        let processing_order = match self.processing_order.as_deref() {
            None | Some("lastToFirst") => ProcessingOrder::LastToFirst,
            Some("firstToLast") => ProcessingOrder::FirstToLast,
            Some(x) => {
                whatever!("unknown processing order: {:?}", x)
            }
        };
        Ok(AllocationRules {
            n_choices,
            max_per_group,
            processing_order,
        })
    }

    pub fn random_seed(&self) -> GroupResult<Option<u64>> {
        match &self._random_seed {
            None | Some(JSValue::Null) => Ok(None),
            Some(JSValue::Number(n)) => n
                .as_u64()
                .map(Some)
                .context(ParsingJsonNumberSnafu { name: "randomSeed" }),
            Some(JSValue::String(s)) => s
                .trim()
                .parse::<u64>()
                .ok()
                .map(Some)
                .context(ParsingJsonNumberSnafu { name: "randomSeed" }),
            _ => None.context(ParsingJsonNumberSnafu { name: "randomSeed" }),
        }
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct PrefConfig {
    #[serde(rename = "outputSettings", default)]
    pub output_settings: OutputSettings,
    #[serde(rename = "inputSource", default)]
    pub input_source: InputSource,
    #[serde(default)]
    pub rules: AllocationSettings,
}

impl PrefConfig {
    pub fn output_path(&self) -> String {
        self.output_settings
            .output_path
            .clone()
            .unwrap_or_else(|| DEFAULT_OUTPUT_PATH.to_string())
    }

    /// Replaces the values of the configuration with the ones passed on the command line.
    pub fn apply_args(&mut self, args: &Args) {
        let src = &mut self.input_source;
        if let Some(input) = &args.input {
            src.file_path = input.clone();
        }
        if let Some(input_type) = &args.input_type {
            src.provider = Some(input_type.clone());
        }
        if let Some(name) = &args.excel_worksheet_name {
            src.excel_worksheet_name = Some(name.clone());
        }
        if let Some(c) = &args.name_column {
            src._name_column_index = Some(JSValue::String(c.clone()));
        }
        if let Some(c) = &args.first_choice_column {
            src._first_choice_column_index = Some(JSValue::String(c.clone()));
        }
        if let Some(c) = &args.second_choice_column {
            src._second_choice_column_index = Some(JSValue::String(c.clone()));
        }
        if let Some(row) = args.first_data_row {
            src._first_data_row_index = Some(JSValue::from(row));
        }
        if args.keep_input_order {
            src.randomize_input_order = Some(false);
        }

        if let Some(out) = &args.out {
            self.output_settings.output_path = Some(out.clone());
        }

        let rules = &mut self.rules;
        if let Some(g) = args.groups {
            rules.groups_count = Some(g);
        }
        if let Some(m) = args.max_per_group {
            rules.max_per_group = Some(m);
        }
        if let Some(seed) = args.seed {
            rules._random_seed = Some(JSValue::from(seed));
        }
    }
}

pub fn read_config(path: &str) -> BGroupResult<PrefConfig> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let mut config: PrefConfig =
        serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;

    // Paths in the file are relative to the file itself.
    let root_p = Path::new(path).parent().context(MissingParentDirSnafu {})?;
    let src = &mut config.input_source;
    if !src.file_path.is_empty() {
        src.file_path = resolve_path(root_p, &src.file_path);
    }
    if let Some(out) = &config.output_settings.output_path {
        if out != "stdout" {
            config.output_settings.output_path = Some(resolve_path(root_p, out));
        }
    }
    Ok(config)
}

/// Builds the configuration of a run from the optional configuration file and the command line.
pub fn load_config(args: &Args) -> BGroupResult<PrefConfig> {
    let mut config = match &args.config {
        Some(path) => {
            info!("Reading configuration file {:?}", path);
            read_config(path)?
        }
        None => PrefConfig::default(),
    };
    config.apply_args(args);
    if config.input_source.file_path.is_empty() {
        return Err(Box::new(MissingSettingSnafu { name: "filePath" }.build()));
    }
    Ok(config)
}

pub fn read_summary(path: &str) -> BGroupResult<JSValue> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let js: JSValue = serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
    debug!("read_summary: {:?}", js);
    Ok(js)
}

fn resolve_path(root: &Path, p: &str) -> String {
    let p2: PathBuf = [root, Path::new(p)].iter().collect();
    p2.as_path().display().to_string()
}

fn read_js_int(x: &Option<JSValue>, name: &str) -> GroupResult<usize> {
    match x {
        Some(JSValue::Number(n)) => n
            .as_u64()
            .map(|x| x as usize)
            .context(ParsingJsonNumberSnafu { name }),
        Some(JSValue::String(s)) => s
            .trim()
            .parse::<usize>()
            .ok()
            .context(ParsingJsonNumberSnafu { name }),
        _ => None.context(ParsingJsonNumberSnafu { name }),
    }
}

// Columns are either spreadsheet letters or numbers starting at 1.
fn read_column(x: &Option<JSValue>, default: usize) -> GroupResult<usize> {
    match x {
        None | Some(JSValue::Null) => Ok(default),
        Some(JSValue::Number(n)) => match n.as_u64() {
            Some(c) if c >= 1 => Ok((c - 1) as usize),
            _ => InvalidColumnSnafu {
                column: n.to_string(),
            }
            .fail(),
        },
        Some(JSValue::String(s)) => parse_column(s).context(InvalidColumnSnafu { column: s }),
        Some(v) => InvalidColumnSnafu {
            column: v.to_string(),
        }
        .fail(),
    }
}
