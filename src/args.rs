use clap::Parser;

/// This program assigns people to groups based on their first and second choice.
#[derive(Parser, Debug, Clone, Default)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path, optional) A JSON file describing the input, the rules and the output.
    /// The other flags override the values of this file.
    #[clap(short, long, value_parser)]
    pub config: Option<String>,

    /// (file path, optional) The file containing the names and choices (csv, xls, xlsx, ods).
    /// Setting this option overrides the path that may be specified with the --config option.
    #[clap(short, long, value_parser)]
    pub input: Option<String>,

    /// (csv, excel or ods) The type of the input. By default, it is deduced from the file extension.
    #[clap(long, value_parser)]
    pub input_type: Option<String>,

    /// (file path, 'stdout' or empty) Where to write the groups. A path ending with .json
    /// receives a JSON summary, anything else a CSV table. Defaults to results.csv.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (file path) A reference file containing a JSON summary. If provided, the program
    /// checks that the computed summary matches the reference.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    /// The number of groups people can choose between.
    #[clap(short, long, value_parser)]
    pub groups: Option<u32>,

    /// The maximum number of people in a group.
    #[clap(short, long, value_parser)]
    pub max_per_group: Option<u32>,

    /// (letter or number, default A) The column containing the names.
    #[clap(long, value_parser)]
    pub name_column: Option<String>,

    /// (letter or number, default B) The column containing the first choice.
    #[clap(long, value_parser)]
    pub first_choice_column: Option<String>,

    /// (letter or number, default C) The column containing the second choice.
    #[clap(long, value_parser)]
    pub second_choice_column: Option<String>,

    /// (default 1) The number of the first row containing a person.
    #[clap(long, value_parser)]
    pub first_data_row: Option<usize>,

    /// When using a spreadsheet, the name of the worksheet to use. Defaults to the first one.
    #[clap(long, value_parser)]
    pub excel_worksheet_name: Option<String>,

    /// If passed as an argument, the rows are processed in the order of the file instead of being shuffled.
    #[clap(long, takes_value = false)]
    pub keep_input_order: bool,

    /// The seed of the random generator, for reproducible runs.
    #[clap(long, value_parser)]
    pub seed: Option<u64>,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
