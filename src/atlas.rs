//! Anatomical parcellations (atlases) and region label handling.
//!
//! An atlas defines a fixed, ordered list of brain regions. The coefficient
//! tables consumed by this crate store one row per region, always in the
//! same canonical order, and prefix each region label with the atlas name
//! (e.g. `desikan_bankssts`). The [`Atlas`] struct carries the expected
//! region count and the delimiter used to strip that prefix for display.

use std::fmt;

use crate::error::{Result, RoistatsError};
use crate::util::substr_after;


/// An anatomical parcellation scheme with a fixed number of regions.
#[derive(Debug, Clone, PartialEq)]
pub struct Atlas {
    pub name: String,
    pub region_count: usize,
    pub label_delimiter: String,
}

impl Atlas {

    /// Create an atlas with an arbitrary region count and label delimiter.
    pub fn new(name: &str, region_count: usize, label_delimiter: &str) -> Atlas {
        Atlas {
            name: String::from(name),
            region_count,
            label_delimiter: String::from(label_delimiter),
        }
    }

    /// The Desikan-Killiany cortical surface parcellation, 71 regions as
    /// tabulated by the upstream regression output (both hemispheres plus
    /// whole-cortex summary rows).
    pub fn desikan() -> Atlas {
        Atlas::new("desikan", 71, "desikan_")
    }

    /// The AtlasTrack white matter fiber tract atlas, 42 tracts.
    pub fn fiber_atlas() -> Atlas {
        Atlas::new("fiber.at", 42, "fiber.at_")
    }

    /// The FreeSurfer ASEG subcortical segmentation, 30 structures.
    pub fn aseg() -> Atlas {
        Atlas::new("aseg", 30, "aseg_")
    }

    /// Strip the atlas prefix from a region label.
    ///
    /// Returns the part of the label after the first occurrence of the
    /// atlas delimiter. A label without the delimiter is an error: silently
    /// mapping it to an empty string would lose the region name in every
    /// downstream report.
    ///
    /// # Examples
    ///
    /// ```
    /// let atlas = roistats::Atlas::desikan();
    /// assert_eq!("bankssts", atlas.strip_label("dmri_dti.full.fa.gm_cort.desikan_bankssts").unwrap());
    /// ```
    pub fn strip_label(&self, label: &str) -> Result<String> {
        match substr_after(label, &self.label_delimiter) {
            Some(suffix) => Ok(String::from(suffix)),
            None => Err(RoistatsError::MissingLabelDelimiter(
                String::from(label),
                self.label_delimiter.clone(),
            )),
        }
    }

    /// Strip the atlas prefix from every label in a list, preserving order.
    pub fn strip_labels(&self, labels: &[String]) -> Result<Vec<String>> {
        labels.iter().map(|l| self.strip_label(l)).collect()
    }
}

impl fmt::Display for Atlas {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Atlas '{}' with {} regions.", self.name, self.region_count)
    }
}
