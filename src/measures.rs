//! The ordered mapping from measurement names to matrix columns.
//!
//! A measurement is one structural imaging parameter (e.g. a diffusion
//! metric like `dmri_dti.full.fa.gm_cort.desikan` or a morphometric one
//! like `smri_thick_cort.desikan`) and occupies one column of the
//! aggregation matrices. Coefficient table files are assigned to
//! measurements by filename, so the name set must be unambiguous under
//! the matching rule.

use std::fmt;

use crate::error::{Result, RoistatsError};


/// Check whether `name` claims `candidate` at a token boundary: `candidate`
/// must start with `name`, and the following character (if any) must not be
/// alphanumeric. This keeps a measurement like `dmri_rsi.nd` from falsely
/// claiming a file named `dmri_rsi.nds2.gm_cort.desikan_lm.csv`.
fn matches_at_boundary(name: &str, candidate: &str) -> bool {
    if !candidate.starts_with(name) {
        return false;
    }
    match candidate[name.len()..].chars().next() {
        Some(c) => !c.is_alphanumeric(),
        None => true,
    }
}


/// An ordered mapping from measurement names to contiguous column indices `[0, N)`.
///
/// Construction validates that the names are unique and that no name is a
/// token-boundary prefix of another, so every input filename resolves to at
/// most one measurement.
#[derive(Debug, Clone, PartialEq)]
pub struct MeasurementIndex {
    names: Vec<String>,
    display_labels: Vec<String>,
}

impl MeasurementIndex {

    /// Build an index from an ordered list of measurement names. The list
    /// position of each name is its matrix column.
    pub fn new<S: AsRef<str>>(names: &[S]) -> Result<MeasurementIndex> {
        let names: Vec<String> = names.iter().map(|n| String::from(n.as_ref())).collect();
        for (i, a) in names.iter().enumerate() {
            for b in names.iter().skip(i + 1) {
                if a == b {
                    return Err(RoistatsError::DuplicateMeasurementName(a.clone()));
                }
                if matches_at_boundary(a, b) {
                    return Err(RoistatsError::AmbiguousMeasurementName(a.clone(), b.clone()));
                }
                if matches_at_boundary(b, a) {
                    return Err(RoistatsError::AmbiguousMeasurementName(b.clone(), a.clone()));
                }
            }
        }
        let display_labels = names.clone();
        Ok(MeasurementIndex { names, display_labels })
    }

    /// Replace the display labels used for plot axes and report headers
    /// (e.g. `"FA (GM)"` for `dmri_dti.full.fa.gm_cort.desikan`). One label
    /// per measurement, in column order.
    pub fn with_display_labels<S: AsRef<str>>(mut self, labels: &[S]) -> Result<MeasurementIndex> {
        if labels.len() != self.names.len() {
            return Err(RoistatsError::ShapeMismatch(
                self.names.len(),
                labels.len(),
                String::from("measurement display labels"),
            ));
        }
        self.display_labels = labels.iter().map(|l| String::from(l.as_ref())).collect();
        Ok(self)
    }

    /// The number of measurements N.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// The measurement names in column order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// The display labels in column order.
    pub fn display_labels(&self) -> &[String] {
        &self.display_labels
    }

    /// The column index of the given measurement name, if it is part of this index.
    pub fn column(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    /// Resolve a coefficient table filename to a measurement column.
    ///
    /// A file belongs to measurement `m` if its name starts with `m`'s name
    /// and the match ends at a token boundary. The constructor guarantees
    /// at most one measurement can match.
    pub fn match_filename(&self, filename: &str) -> Option<usize> {
        self.names
            .iter()
            .position(|n| matches_at_boundary(n, filename))
    }
}

impl fmt::Display for MeasurementIndex {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Measurement index with {} measurements.", self.names.len())
    }
}
