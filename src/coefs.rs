//! Reading of per-measurement regression coefficient tables.
//!
//! The upstream regression tool writes one CSV file per measurement, with
//! one row per atlas region. Each row carries the region identifier, the
//! t-value and the two-sided p-value of the regression coefficient, and,
//! for categorical independent variables, a comparison-level column naming
//! the factor level the row belongs to.

use csv::ReaderBuilder;
use flate2::bufread::GzDecoder;

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::error::{Result, RoistatsError};
use crate::util::is_gz_file;


/// The column names a coefficient table is required (or allowed) to carry.
///
/// The defaults are the headers written by the upstream regression output:
/// `dep_var` for the region identifier, `t value` and `Pr(>|t|)` for the
/// statistic, and `parameter_comp` for the optional comparison level.
#[derive(Debug, Clone, PartialEq)]
pub struct CoefSchema {
    pub region: String,
    pub statistic: String,
    pub p_value: String,
    pub level: String,
}

impl Default for CoefSchema {
    fn default() -> CoefSchema {
        CoefSchema {
            region: String::from("dep_var"),
            statistic: String::from("t value"),
            p_value: String::from("Pr(>|t|)"),
            level: String::from("parameter_comp"),
        }
    }
}


/// All rows of one coefficient table, columns split into parallel vectors.
///
/// Row order is the file's row order, which by upstream convention is the
/// canonical region order of the atlas. The loader does not verify that
/// ordering across files; it is an invariant of the data producer.
#[derive(Debug, Clone, PartialEq)]
pub struct CoefTable {
    pub source: String,
    pub regions: Vec<String>,
    /// Comparison level per row, present only if the file has a level column.
    pub levels: Option<Vec<String>>,
    pub t_values: Vec<f64>,
    pub p_values: Vec<f64>,
}

impl CoefTable {

    /// Read a coefficient table from a CSV file.
    /// If the file's name ends with ".gz", the file is assumed to need GZip decoding.
    pub fn from_file<P: AsRef<Path>>(path: P, schema: &CoefSchema) -> Result<CoefTable> {
        let gz = is_gz_file(&path);
        let source = path.as_ref().to_string_lossy().to_string();
        let file = BufReader::new(File::open(&path)?);
        if gz {
            CoefTable::from_reader(GzDecoder::new(file), schema, &source)
        } else {
            CoefTable::from_reader(file, schema, &source)
        }
    }

    /// Read a coefficient table from the given byte stream. The `source`
    /// string is used in error diagnostics only.
    pub fn from_reader<S>(input: S, schema: &CoefSchema, source: &str) -> Result<CoefTable>
    where
        S: Read,
    {
        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .flexible(false)
            .from_reader(input);

        let headers = rdr.headers()?.clone();
        let col_pos = |name: &str| -> Result<usize> {
            headers
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| RoistatsError::MissingColumn(String::from(name), String::from(source)))
        };

        let region_col = col_pos(&schema.region)?;
        let stat_col = col_pos(&schema.statistic)?;
        let p_col = col_pos(&schema.p_value)?;
        let level_col = headers.iter().position(|h| h == schema.level);

        let mut regions: Vec<String> = Vec::new();
        let mut levels: Vec<String> = Vec::new();
        let mut t_values: Vec<f64> = Vec::new();
        let mut p_values: Vec<f64> = Vec::new();

        for (row, record) in rdr.records().enumerate() {
            let record = record?;
            let parse_cell = |col: usize, name: &str| -> Result<f64> {
                record[col].trim().parse::<f64>().map_err(|_| {
                    RoistatsError::InvalidCellValue(String::from(name), row, String::from(source))
                })
            };
            regions.push(String::from(&record[region_col]));
            t_values.push(parse_cell(stat_col, &schema.statistic)?);
            p_values.push(parse_cell(p_col, &schema.p_value)?);
            if let Some(col) = level_col {
                levels.push(String::from(&record[col]));
            }
        }

        let table = CoefTable {
            source: String::from(source),
            regions,
            levels: level_col.map(|_| levels),
            t_values,
            p_values,
        };

        Ok(table)
    }

    /// The number of rows in the table.
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Whether the table carries a comparison-level column.
    pub fn has_levels(&self) -> bool {
        self.levels.is_some()
    }

    /// Restrict the table to the rows whose comparison level equals `name`.
    ///
    /// Level comparison is exact string equality. A single table encoding a
    /// three-level categorical factor can be split into its two
    /// non-reference comparisons by calling this twice with different names.
    /// Fails if the table has no level column.
    pub fn level(&self, name: &str) -> Result<CoefTable> {
        let levels = self.levels.as_ref().ok_or_else(|| {
            RoistatsError::MissingColumn(String::from("comparison level"), self.source.clone())
        })?;

        let mut regions: Vec<String> = Vec::new();
        let mut kept_levels: Vec<String> = Vec::new();
        let mut t_values: Vec<f64> = Vec::new();
        let mut p_values: Vec<f64> = Vec::new();

        for (i, level) in levels.iter().enumerate() {
            if level == name {
                regions.push(self.regions[i].clone());
                kept_levels.push(level.clone());
                t_values.push(self.t_values[i]);
                p_values.push(self.p_values[i]);
            }
        }

        Ok(CoefTable {
            source: self.source.clone(),
            regions,
            levels: Some(kept_levels),
            t_values,
            p_values,
        })
    }
}
