//! CSV input of raw values and CSV/JSON export of binned frequency tables.

use crate::frequency::cumulative_relative_frequency;
use crate::models::Parsed;
use anyhow::{Context, Result, anyhow};
use csv::{ReaderBuilder, WriterBuilder};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Read one numeric column from a CSV file with a header row.
///
/// `column` selects by header name; `None` takes the first column. Empty
/// cells are skipped, anything else that is not a number is an error.
pub fn load_values<P: AsRef<Path>>(path: P, column: Option<&str>) -> Result<Vec<f64>> {
    let path = path.as_ref();
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("opening {}", path.display()))?;
    let index = match column {
        Some(name) => rdr
            .headers()?
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| anyhow!("column {name:?} not found in {}", path.display()))?,
        None => 0,
    };
    let mut values = Vec::new();
    for (row, record) in rdr.records().enumerate() {
        let record = record?;
        let Some(cell) = record.get(index) else {
            continue;
        };
        if cell.is_empty() {
            continue;
        }
        let v: f64 = cell
            .parse()
            .with_context(|| format!("row {}: {cell:?} is not a number", row + 2))?;
        values.push(v);
    }
    Ok(values)
}

/// Save a binned table as CSV with header.
pub fn save_table_csv<P: AsRef<Path>>(table: &Parsed, path: P) -> Result<()> {
    let mut wtr = WriterBuilder::new().from_path(path)?;
    wtr.serialize(("bottom", "top", "frequency", "cumulative_relative_frequency"))?;
    for (i, (class, frequency)) in table.classes.iter().zip(&table.frequencies).enumerate() {
        wtr.serialize((
            class.bottom,
            class.top,
            frequency,
            cumulative_relative_frequency(&table.frequencies, i),
        ))?;
    }
    wtr.flush()?;
    Ok(())
}

/// Save a binned table as pretty JSON (`{"Classes": [...], "Frequencies": [...]}`).
pub fn save_table_json<P: AsRef<Path>>(table: &Parsed, path: P) -> Result<()> {
    let mut f = File::create(path)?;
    let s = serde_json::to_string_pretty(table)?;
    f.write_all(s.as_bytes())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Class;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn reads_named_and_default_columns() {
        let dir = tempdir().unwrap();
        let p = dir.path().join("v.csv");
        fs::write(&p, "name,score\na, 12\nb,\nc,30.5\n").unwrap();
        assert_eq!(load_values(&p, Some("score")).unwrap(), vec![12.0, 30.5]);
        assert!(load_values(&p, None).is_err());
        assert!(load_values(&p, Some("age")).is_err());
    }

    #[test]
    fn write_csv_and_json() {
        let dir = tempdir().unwrap();
        let csvp = dir.path().join("t.csv");
        let jsonp = dir.path().join("t.json");
        let table = Parsed::new(vec![Class::new(0.0, 5.0), Class::new(5.0, 10.0)], vec![1, 3]);
        save_table_csv(&table, &csvp).unwrap();
        save_table_json(&table, &jsonp).unwrap();

        let csv_text = fs::read_to_string(&csvp).unwrap();
        let mut lines = csv_text.lines();
        assert_eq!(
            lines.next(),
            Some("bottom,top,frequency,cumulative_relative_frequency")
        );
        assert_eq!(lines.next(), Some("0.0,5.0,1,0.25"));
        assert_eq!(lines.next(), Some("5.0,10.0,3,1.0"));

        let back: Parsed = serde_json::from_str(&fs::read_to_string(&jsonp).unwrap()).unwrap();
        assert_eq!(back, table);
    }
}
