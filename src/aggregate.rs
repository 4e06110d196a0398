//! Assembly of per-measurement coefficient tables into atlas-shaped matrices.
//!
//! One [`AggregationContext`] owns a pair of dense regions-by-measurements
//! matrices (t-values and p-values) for a single independent variable and
//! atlas. A context is populated by one pass over a directory of
//! coefficient tables and is then consumed read-only by the significance
//! filter and the heatmap renderer. Comparing two independent variables or
//! two comparison levels means populating two contexts.

use log::debug;
use ndarray::{Array2, ArrayView2};
use ndarray_stats::QuantileExt;

use std::fs;
use std::path::Path;

use crate::atlas::Atlas;
use crate::coefs::{CoefSchema, CoefTable};
use crate::error::{Result, RoistatsError};
use crate::measures::MeasurementIndex;
use crate::sig::{extract_significant, SignificanceReport};


/// A regions-by-measurements matrix pair under construction for one
/// independent variable.
///
/// Cells start at zero. A column that no input file supplied stays all-zero,
/// which is indistinguishable from true zero statistics in the matrix
/// itself; the context therefore tracks a per-column populated flag, and
/// [`AggregationContext::assert_complete`] turns "zero by omission" into a
/// hard error before any artifact is emitted.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregationContext {
    atlas: Atlas,
    measurements: MeasurementIndex,
    t: Array2<f64>,
    p: Array2<f64>,
    populated: Vec<bool>,
    region_labels: Option<Vec<String>>,
}

impl AggregationContext {

    /// Create an empty context with all-zero R x N matrices, R from the
    /// atlas and N from the measurement index.
    pub fn new(atlas: Atlas, measurements: MeasurementIndex) -> AggregationContext {
        let shape = (atlas.region_count, measurements.len());
        AggregationContext {
            atlas,
            measurements,
            t: Array2::zeros(shape),
            p: Array2::zeros(shape),
            populated: vec![false; shape.1],
            region_labels: None,
        }
    }

    pub fn atlas(&self) -> &Atlas {
        &self.atlas
    }

    pub fn measurements(&self) -> &MeasurementIndex {
        &self.measurements
    }

    /// The matrix shape (regions, measurements).
    pub fn shape(&self) -> (usize, usize) {
        (self.atlas.region_count, self.measurements.len())
    }

    /// Write one measurement column of both matrices.
    ///
    /// Both value slices must hold exactly one value per atlas region, in
    /// canonical region order. Nothing is written on error.
    pub fn set_column(&mut self, col: usize, t_values: &[f64], p_values: &[f64]) -> Result<()> {
        if col >= self.measurements.len() {
            return Err(RoistatsError::ShapeMismatch(
                self.measurements.len(),
                col,
                String::from("measurement column index"),
            ));
        }
        let r = self.atlas.region_count;
        if t_values.len() != r {
            return Err(RoistatsError::ShapeMismatch(
                r,
                t_values.len(),
                format!("t-value column {}", col),
            ));
        }
        if p_values.len() != r {
            return Err(RoistatsError::ShapeMismatch(
                r,
                p_values.len(),
                format!("p-value column {}", col),
            ));
        }

        for (i, (&t, &p)) in t_values.iter().zip(p_values.iter()).enumerate() {
            self.t[[i, col]] = t;
            self.p[[i, col]] = p;
        }
        self.populated[col] = true;
        Ok(())
    }

    /// Populate the matrices from a directory of coefficient tables.
    ///
    /// Every file whose name resolves to a measurement (token-boundary
    /// prefix match) is loaded and written to its column; other files are
    /// skipped, since a results directory typically mixes tables for
    /// several atlases. For categorical independent variables, `level`
    /// selects the comparison level to extract from each table. Region
    /// labels are recorded from the first matched file.
    ///
    /// Files are visited in filename order, so re-running over an unchanged
    /// directory reproduces the matrices exactly. Returns the number of
    /// files consumed.
    pub fn populate_from_dir<P: AsRef<Path>>(
        &mut self,
        dir: P,
        schema: &CoefSchema,
        level: Option<&str>,
    ) -> Result<usize> {
        let mut filenames: Vec<String> = Vec::new();
        for entry in fs::read_dir(&dir)? {
            let entry = entry?;
            if entry.file_type()?.is_file() {
                filenames.push(entry.file_name().to_string_lossy().to_string());
            }
        }
        filenames.sort();

        let mut num_matched: usize = 0;
        for filename in &filenames {
            let col = match self.measurements.match_filename(filename) {
                Some(col) => col,
                None => continue,
            };

            let path = dir.as_ref().join(filename);
            let table = CoefTable::from_file(&path, schema)?;
            let table = match level {
                Some(name) => table.level(name)?,
                None => table,
            };

            if table.len() != self.atlas.region_count {
                return Err(RoistatsError::ShapeMismatch(
                    self.atlas.region_count,
                    table.len(),
                    format!("coefficient table '{}'", filename),
                ));
            }

            debug!("matched coefficient table '{}' to measurement column {}", filename, col);
            self.set_column(col, &table.t_values, &table.p_values)?;
            if self.region_labels.is_none() {
                self.region_labels = Some(table.regions.clone());
            }
            num_matched += 1;
        }
        Ok(num_matched)
    }

    /// Whether every measurement column has been populated.
    pub fn is_complete(&self) -> bool {
        self.populated.iter().all(|&p| p)
    }

    /// The names of the measurements whose columns were never set.
    pub fn unset_measurements(&self) -> Vec<&str> {
        self.measurements
            .names()
            .iter()
            .enumerate()
            .filter(|(col, _)| !self.populated[*col])
            .map(|(_, name)| name.as_str())
            .collect()
    }

    /// Fail with a diagnostic naming every unset measurement, so a run with
    /// missing input aborts instead of emitting artifacts with silently
    /// zero-filled columns.
    pub fn assert_complete(&self) -> Result<()> {
        if self.is_complete() {
            Ok(())
        } else {
            Err(RoistatsError::IncompleteAggregation(
                self.unset_measurements().iter().map(|s| String::from(*s)).collect(),
            ))
        }
    }

    /// The t-value matrix, regions x measurements.
    pub fn t_values(&self) -> ArrayView2<f64> {
        self.t.view()
    }

    /// The p-value matrix, regions x measurements.
    pub fn p_values(&self) -> ArrayView2<f64> {
        self.p.view()
    }

    /// The raw region labels as stored in the input files, if any file has
    /// been matched yet.
    pub fn regions(&self) -> Option<&[String]> {
        self.region_labels.as_deref()
    }

    /// The region labels with the atlas prefix stripped, for display.
    pub fn canonical_regions(&self) -> Result<Vec<String>> {
        match &self.region_labels {
            Some(labels) => self.atlas.strip_labels(labels),
            None => Err(RoistatsError::IncompleteAggregation(
                self.measurements.names().to_vec(),
            )),
        }
    }

    /// A color range symmetric around zero that covers every t-value.
    pub fn value_range(&self) -> (f64, f64) {
        let lo = self.t.min().ok().copied().unwrap_or(0.0);
        let hi = self.t.max().ok().copied().unwrap_or(0.0);
        let m = lo.abs().max(hi.abs());
        (-m, m)
    }

    /// Extract the significant cells of a fully populated context.
    ///
    /// Fails if any column is unset: an unset column's p-values are all
    /// zero and would otherwise show up as maximally significant.
    pub fn significant(&self, alpha: f64) -> Result<SignificanceReport> {
        self.assert_complete()?;
        let regions = self.canonical_regions()?;
        extract_significant(
            self.t.view(),
            self.p.view(),
            self.measurements.display_labels(),
            &regions,
            alpha,
        )
    }
}
