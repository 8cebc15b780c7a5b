use std::fs;
use std::path::Path;
use log::{info, warn};
use serde::Deserialize;

use crate::error::InputError;

#[derive(Debug, Deserialize, Clone)]
pub struct InputRecord {
    #[serde(rename = "Company", alias = "company", alias = "Company Name", alias = "company name", alias = "Business Name")]
    pub company: String,
}

/// Loads company names: `.csv` files by their `Company` column, anything else
/// as one name per line. Blank names are dropped.
pub fn load_names<P: AsRef<Path>>(filename: P) -> Result<Vec<String>, InputError> {
    let path = filename.as_ref();

    if !path.is_file() {
        return Err(InputError::NotFound(path.to_path_buf()));
    }

    let is_csv = path.extension().map_or(false, |ext| ext.eq_ignore_ascii_case("csv"));
    let names = if is_csv { load_csv(path)? } else { load_lines(path)? };

    if names.is_empty() {
        return Err(InputError::Empty(path.to_path_buf()));
    }

    info!("Loaded {} company names from {:?}", names.len(), path);
    Ok(names)
}

fn load_lines(path: &Path) -> Result<Vec<String>, InputError> {
    let content = fs::read_to_string(path).map_err(|source| InputError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}

fn load_csv(path: &Path) -> Result<Vec<String>, InputError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|source| InputError::Csv {
            path: path.to_path_buf(),
            source,
        })?;

    let mut names = Vec::new();
    for result in rdr.deserialize::<InputRecord>() {
        match result {
            Ok(record) if !record.company.trim().is_empty() => names.push(record.company.trim().to_string()),
            Ok(_) => {}
            Err(e) if e.is_io_error() => {
                return Err(InputError::Csv {
                    path: path.to_path_buf(),
                    source: e,
                })
            }
            Err(e) => warn!("Skipping malformed CSV record in {:?}: {}", path, e),
        }
    }
    Ok(names)
}
