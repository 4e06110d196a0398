//! Extraction and export of significant (region, measurement) cells.
//!
//! A cell is significant iff its p-value is strictly below the threshold;
//! a p-value exactly equal to the threshold is excluded. Per measurement,
//! the significant cells are kept in region order and formatted as
//! `"<region>, <t-value>, <p-value>"` entries with both numbers rounded to
//! five decimals, the format the downstream review spreadsheets expect.

use csv::WriterBuilder;
use ndarray::ArrayView2;

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::error::{Result, RoistatsError};
use crate::util::round_to;


/// The conventional two-sided significance threshold.
pub const DEFAULT_ALPHA: f64 = 0.05;


/// Per-measurement lists of significant region entries. Lists may have
/// different lengths across measurements.
#[derive(Debug, Clone, PartialEq)]
pub struct SignificanceReport {
    pub labels: Vec<String>,
    pub columns: Vec<Vec<String>>,
}

impl SignificanceReport {

    /// The entries for the measurement with the given label.
    pub fn column(&self, label: &str) -> Option<&[String]> {
        self.labels
            .iter()
            .position(|l| l == label)
            .map(|j| self.columns[j].as_slice())
    }

    /// Whether no cell at all was significant.
    pub fn is_empty(&self) -> bool {
        self.columns.iter().all(|c| c.is_empty())
    }

    /// The length of the longest column, i.e. the number of data rows the
    /// CSV export will have.
    pub fn num_rows(&self) -> usize {
        self.columns.iter().map(|c| c.len()).max().unwrap_or(0)
    }

    /// Write the report as CSV: a header row of measurement labels, then
    /// the ragged columns transposed row-wise, short columns padded with
    /// empty cells up to the longest one.
    pub fn write_to<W: Write>(&self, writer: W) -> Result<()> {
        let mut wtr = WriterBuilder::new().from_writer(writer);
        wtr.write_record(&self.labels)?;
        for row in 0..self.num_rows() {
            let record: Vec<&str> = self
                .columns
                .iter()
                .map(|c| c.get(row).map(|s| s.as_str()).unwrap_or(""))
                .collect();
            wtr.write_record(&record)?;
        }
        wtr.flush()?;
        Ok(())
    }

    /// Write the report to a CSV file.
    pub fn write_csv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path)?;
        self.write_to(file)
    }
}


/// Collect the significant cells of a matrix pair into per-measurement entry lists.
///
/// A cell (i, j) is included iff `p_values[i, j] < alpha` (strict). Entries
/// are appended in increasing region index order, so each list follows the
/// region order of the matrices, not p-value magnitude. `labels` and
/// `regions` must match the matrix dimensions.
pub fn extract_significant(
    t_values: ArrayView2<f64>,
    p_values: ArrayView2<f64>,
    labels: &[String],
    regions: &[String],
    alpha: f64,
) -> Result<SignificanceReport> {
    if t_values.dim() != p_values.dim() {
        return Err(RoistatsError::ShapeMismatch(
            t_values.len(),
            p_values.len(),
            String::from("t-value versus p-value matrix"),
        ));
    }
    if t_values.nrows() != regions.len() {
        return Err(RoistatsError::ShapeMismatch(
            t_values.nrows(),
            regions.len(),
            String::from("region label list"),
        ));
    }
    if t_values.ncols() != labels.len() {
        return Err(RoistatsError::ShapeMismatch(
            t_values.ncols(),
            labels.len(),
            String::from("measurement label list"),
        ));
    }

    let mut columns: Vec<Vec<String>> = vec![Vec::new(); labels.len()];
    for i in 0..t_values.nrows() {
        for j in 0..t_values.ncols() {
            if p_values[[i, j]] < alpha {
                // {:?} renders f64 with a trailing '.0' for whole numbers,
                // matching the established report format ("1.0", not "1").
                columns[j].push(format!(
                    "{}, {:?}, {:?}",
                    regions[i],
                    round_to(t_values[[i, j]], 5),
                    round_to(p_values[[i, j]], 5)
                ));
            }
        }
    }

    Ok(SignificanceReport {
        labels: labels.to_vec(),
        columns,
    })
}


#[cfg(test)]
mod test {
    use super::*;
    use ndarray::array;

    fn labels(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| String::from(*n)).collect()
    }

    #[test]
    fn significant_cells_are_listed_per_measurement_in_region_order() {
        let t = array![[1.0, -5.0], [0.02, 3.0]];
        let p = array![[0.01, 0.2], [0.04, 0.5]];
        let regions = labels(&["bankssts", "caudalanteriorcingulate"]);
        let meas = labels(&["FA", "MD"]);

        let report = extract_significant(t.view(), p.view(), &meas, &regions, 0.05).unwrap();

        assert_eq!(
            Some(
                &[
                    String::from("bankssts, 1.0, 0.01"),
                    String::from("caudalanteriorcingulate, 0.02, 0.04"),
                ][..]
            ),
            report.column("FA")
        );
        // large statistics do not matter, only the p-value does
        assert!(report.column("MD").unwrap().is_empty());
        assert_eq!(2, report.num_rows());
    }

    #[test]
    fn the_alpha_boundary_is_strict() {
        let t = array![[1.0], [1.0]];
        let p = array![[0.05], [0.049999]];
        let regions = labels(&["bankssts", "insula"]);
        let meas = labels(&["FA"]);

        let report = extract_significant(t.view(), p.view(), &meas, &regions, 0.05).unwrap();

        let col = report.column("FA").unwrap();
        assert_eq!(1, col.len());
        assert_eq!("insula, 1.0, 0.05", col[0]); // 0.049999 rounds to 0.05 for display
    }

    #[test]
    fn entries_follow_region_order_not_p_value_magnitude() {
        let t = array![[1.0], [2.0], [3.0]];
        let p = array![[0.04], [0.001], [0.02]];
        let regions = labels(&["a", "b", "c"]);
        let meas = labels(&["FA"]);

        let report = extract_significant(t.view(), p.view(), &meas, &regions, 0.05).unwrap();
        let col = report.column("FA").unwrap();
        assert_eq!("a, 1.0, 0.04", col[0]);
        assert_eq!("b, 2.0, 0.001", col[1]);
        assert_eq!("c, 3.0, 0.02", col[2]);
    }

    #[test]
    fn mismatched_shapes_are_rejected() {
        let t = array![[1.0], [2.0]];
        let p = array![[0.01]];
        let regions = labels(&["a", "b"]);
        let meas = labels(&["FA"]);
        assert!(extract_significant(t.view(), p.view(), &meas, &regions, 0.05).is_err());

        let p = array![[0.01], [0.02]];
        let short_regions = labels(&["a"]);
        assert!(extract_significant(t.view(), p.view(), &meas, &short_regions, 0.05).is_err());

        let no_meas: Vec<String> = Vec::new();
        assert!(extract_significant(t.view(), p.view(), &no_meas, &regions, 0.05).is_err());
    }

    #[test]
    fn csv_export_pads_ragged_columns_with_empty_cells() {
        let t = array![[1.0, 2.0], [3.0, 4.0]];
        let p = array![[0.01, 0.2], [0.02, 0.03]];
        let regions = labels(&["bankssts", "insula"]);
        let meas = labels(&["FA", "MD"]);

        let report = extract_significant(t.view(), p.view(), &meas, &regions, 0.05).unwrap();
        let mut out: Vec<u8> = Vec::new();
        report.write_to(&mut out).unwrap();
        let out = String::from_utf8(out).unwrap();

        let lines: Vec<&str> = out.lines().collect();
        assert_eq!("FA,MD", lines[0]);
        assert_eq!("\"bankssts, 1.0, 0.01\",\"insula, 4.0, 0.03\"", lines[1]);
        assert_eq!("\"insula, 3.0, 0.02\",", lines[2]);
    }
}
