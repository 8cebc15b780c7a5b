use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;
use log::info;

use crate::error::ExportError;
use crate::extractor::ResultRecord;

/// Writes the records to `output_path`: CSV when the extension is `.csv`,
/// pretty-printed JSON otherwise. Missing parent directories are created.
pub fn export_results<P: AsRef<Path>>(records: &[ResultRecord], output_path: P) -> Result<(), ExportError> {
    let path = output_path.as_ref();
    let io_err = |source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_err)?;
    }

    let file = File::create(path).map_err(io_err)?;
    let is_csv = path.extension().map_or(false, |ext| ext.eq_ignore_ascii_case("csv"));

    if is_csv {
        let mut wtr = csv::Writer::from_writer(file);
        for record in records {
            wtr.serialize(record)?;
        }
        wtr.flush().map_err(io_err)?;
    } else {
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, records)?;
        writer.write_all(b"\n").map_err(io_err)?;
        writer.flush().map_err(io_err)?;
    }

    info!("Exported {} record(s) to {:?}", records.len(), path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample() -> Vec<ResultRecord> {
        vec![
            ResultRecord {
                title: "Acme Corp | LinkedIn".to_string(),
                link: "https://www.linkedin.com/company/acme".to_string(),
                search_query: "Acme".to_string(),
            },
            ResultRecord {
                title: "Globex, Inc.".to_string(),
                link: "https://www.linkedin.com/company/globex".to_string(),
                search_query: "Globex".to_string(),
            },
        ]
    }

    #[test]
    fn writes_json_into_new_directory() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out").join("results.json");

        export_results(&sample(), &path).unwrap();

        let written: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        let items = written.as_array().unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0]["title"], "Acme Corp | LinkedIn");
        assert_eq!(items[1]["searchQuery"], "Globex");
    }

    #[test]
    fn writes_csv_with_headers() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("results.csv");

        export_results(&sample(), &path).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let mut lines = content.lines();
        assert_eq!(lines.next(), Some("title,link,searchQuery"));
        assert_eq!(lines.next(), Some("Acme Corp | LinkedIn,https://www.linkedin.com/company/acme,Acme"));
        assert_eq!(lines.next(), Some("\"Globex, Inc.\",https://www.linkedin.com/company/globex,Globex"));
    }

    #[test]
    fn empty_results_are_an_empty_array() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("empty.json");
        export_results(&[], &path).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap().trim(), "[]");
    }
}
