use serde::{Deserialize, Deserializer};
use std::io::Read;

use super::RosterImportError;

#[derive(Debug)]
pub(crate) struct RosterRow {
    pub(crate) line: u64,
    pub(crate) name: String,
    pub(crate) department: String,
}

/// Rows with both cells empty are skipped; a row with only one of them filled is an error.
pub(crate) fn parse_rows<R: Read>(reader: R) -> Result<Vec<RosterRow>, RosterImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);
    let headers = csv_reader.headers()?.clone();
    let mut rows = Vec::new();

    for record in csv_reader.records() {
        let record = record?;
        let line = record.position().map(|position| position.line()).unwrap_or_default();
        let row: CsvRow = record.deserialize(Some(&headers))?;

        let (name, department) = match (row.name, row.department) {
            (Some(name), Some(department)) => (name, department),
            (None, None) => continue,
            (None, Some(_)) => {
                return Err(RosterImportError::MissingField {
                    line,
                    column: "Name",
                })
            }
            (Some(_), None) => {
                return Err(RosterImportError::MissingField {
                    line,
                    column: "Department",
                })
            }
        };

        rows.push(RosterRow {
            line,
            name,
            department,
        });
    }

    Ok(rows)
}

#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(rename = "Name", default, deserialize_with = "empty_string_as_none")]
    name: Option<String>,
    #[serde(
        rename = "Department",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    department: Option<String>,
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}
