//! Utility functions used in the other roistats modules.

use std::path::Path;

/// Check whether the file extension ends with ".gz".
pub fn is_gz_file<P>(path: P) -> bool
where
    P: AsRef<Path>,
{
    path.as_ref()
        .file_name()
        .map(|a| a.to_string_lossy().ends_with(".gz"))
        .unwrap_or(false)
}


/// Return the part of `s` after the first occurrence of `delim`, or `None` if `delim` does not occur in `s`.
///
/// This backs the atlas-prefix stripping of region labels, see [`crate::Atlas::strip_label`].
pub fn substr_after<'a>(s: &'a str, delim: &str) -> Option<&'a str> {
    s.find(delim).map(|pos| &s[pos + delim.len()..])
}


/// Round `x` to the given number of decimal places.
pub fn round_to(x: f64, places: u32) -> f64 {
    let factor = 10_f64.powi(places as i32);
    (x * factor).round() / factor
}


#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn gz_file_names_are_recognized() {
        assert!(is_gz_file("some/dir/table.csv.gz"));
        assert!(!is_gz_file("some/dir/table.csv"));
        assert!(!is_gz_file("some/dir"));
    }

    #[test]
    fn substr_after_returns_the_label_suffix() {
        assert_eq!(Some("bankssts"), substr_after("desikan_bankssts", "desikan_"));
        assert_eq!(Some("fimbria"), substr_after("subcort.aseg_fimbria", "aseg_"));
    }

    #[test]
    fn substr_after_reports_a_missing_delimiter() {
        assert_eq!(None, substr_after("bankssts", "desikan_"));
    }

    #[test]
    fn rounding_keeps_five_decimals() {
        assert_eq!(0.04999, round_to(0.049994, 5));
        assert_eq!(0.05, round_to(0.049996, 5));
        assert_eq!(-2.33333, round_to(-2.333332, 5));
    }
}
