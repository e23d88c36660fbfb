//! Bar input: reads closes from CSV.
//!
//! A `close` column is required. An optional `date` column (YYYY-MM-DD) is
//! carried through for display. Any other columns are ignored. Bar indexes
//! are assigned in file order.

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use robb_core::PriceBar;
use serde::Deserialize;
use std::io::Read;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(default)]
    date: Option<String>,
    close: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoadedBar {
    pub bar: PriceBar,
    pub date: Option<NaiveDate>,
}

pub fn load_bars(path: &Path) -> Result<Vec<LoadedBar>> {
    let file =
        std::fs::File::open(path).with_context(|| format!("open bars file {}", path.display()))?;
    read_bars(file).with_context(|| format!("read bars from {}", path.display()))
}

pub fn read_bars<R: Read>(reader: R) -> Result<Vec<LoadedBar>> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut bars = Vec::new();

    for (i, row) in rdr.deserialize::<CsvRow>().enumerate() {
        let row = row.with_context(|| format!("row {}", i + 1))?;
        let date = row
            .date
            .as_deref()
            .filter(|d| !d.is_empty())
            .map(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d"))
            .transpose()
            .with_context(|| format!("row {}: bad date", i + 1))?;

        let bar = PriceBar::new(i as u64, row.close);
        if !bar.is_valid() {
            bail!("row {}: close must be positive and finite, got {}", i + 1, row.close);
        }
        bars.push(LoadedBar { bar, date });
    }

    Ok(bars)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn reads_close_only() {
        let bars = read_bars("close\n101.5\n100.25\n".as_bytes()).unwrap();
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].bar, PriceBar::new(0, 101.5));
        assert_eq!(bars[1].bar, PriceBar::new(1, 100.25));
        assert_eq!(bars[0].date, None);
    }

    #[test]
    fn reads_dates_and_ignores_extra_columns() {
        let csv = "date,open,high,low,close,volume\n2024-01-02,1,2,0.5,1.5,100\n";
        let bars = read_bars(csv.as_bytes()).unwrap();
        assert_eq!(bars[0].date, NaiveDate::from_ymd_opt(2024, 1, 2));
        assert_eq!(bars[0].bar.close, 1.5);
    }

    #[test]
    fn rejects_bad_rows() {
        assert!(read_bars("close\nabc\n".as_bytes()).is_err());
        assert!(read_bars("close\n-1\n".as_bytes()).is_err());
        assert!(read_bars("date,close\n01/02/2024,10\n".as_bytes()).is_err());
        assert!(read_bars("open\n10\n".as_bytes()).is_err());
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "close\n10\n11\n12\n").unwrap();
        let bars = load_bars(file.path()).unwrap();
        assert_eq!(bars.len(), 3);
        assert_eq!(bars[2].bar.index, 2);
    }
}
