//! Aggregation of per-brain-region regression results into atlas-shaped matrices.
//!
//! This crate reads the per-measurement CSV coefficient tables written by an
//! upstream mass-univariate regression (one t-value and p-value per atlas
//! region), assembles them into fixed-shape regions-by-measurements
//! matrices, extracts the significant cells into per-measurement lists, and
//! renders the matrices as diverging-colormap heatmaps.

pub mod aggregate;
pub mod atlas;
pub mod coefs;
pub mod error;
pub mod heatmap;
pub mod measures;
pub mod sig;
pub mod util;

pub use aggregate::AggregationContext;
pub use atlas::Atlas;
pub use coefs::{CoefSchema, CoefTable};
pub use error::{Result, RoistatsError};
pub use heatmap::{render, render_pair, HeatmapOptions};
pub use measures::MeasurementIndex;
pub use sig::{extract_significant, SignificanceReport, DEFAULT_ALPHA};
