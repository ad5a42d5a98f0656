// Writing the groups.

use crate::groups::*;

#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum OutputType {
    /// One column per group.
    Csv,
    /// The JSON summary, written to a file.
    Json,
    /// The JSON summary, printed.
    Stdout,
}

impl OutputType {
    pub fn from_path(path: &str) -> OutputType {
        if path == "stdout" {
            return OutputType::Stdout;
        }
        match Path::new(path).extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => OutputType::Json,
            _ => OutputType::Csv,
        }
    }
}

fn absolute_location(path: &str) -> BGroupResult<PathBuf> {
    let location = fs::canonicalize(path).context(WritingFileSnafu { path })?;
    Ok(location)
}

/// Writes the groups side by side: a header row `Group <id>`, then the members
/// of each group below its header. Shorter groups are padded with empty cells.
///
/// Returns the absolute location of the file.
pub fn write_grouping_csv(path: &str, grouping: &Grouping) -> BGroupResult<PathBuf> {
    let mut wtr = csv::Writer::from_path(path).context(WritingOutputSnafu { path })?;

    let header: Vec<String> = grouping.iter().map(|g| format!("Group {}", g.id)).collect();
    wtr.write_record(&header)
        .context(WritingOutputSnafu { path })?;

    for idx in 0..grouping.largest_group() {
        let line: Vec<&str> = grouping
            .iter()
            .map(|g| g.members.get(idx).map(|s| s.as_str()).unwrap_or(""))
            .collect();
        wtr.write_record(&line)
            .context(WritingOutputSnafu { path })?;
    }
    wtr.flush().context(WritingFileSnafu { path })?;
    info!("Wrote {} groups to {:?}", grouping.len(), path);
    absolute_location(path)
}

pub fn write_summary_json(path: &str, pretty_js: &str) -> BGroupResult<PathBuf> {
    fs::write(path, pretty_js).context(WritingFileSnafu { path })?;
    info!("Wrote summary to {:?}", path);
    absolute_location(path)
}
