use quick_error::quick_error;
use std::io::Error as IOError;

quick_error! {
    /// Error type for all error variants originated by this crate.
    #[derive(Debug)]
    pub enum RoistatsError {
        /// A required column is missing from a coefficient table.
        MissingColumn(column: String, path: String) {
            display("Expected column '{}' not found in coefficient table '{}'", column, path)
        }

        /// A cell that should hold a statistic or p-value could not be parsed as a number.
        InvalidCellValue(column: String, row: usize, path: String) {
            display("Cell in column '{}', data row {} of '{}' is not a valid number", column, row, path)
        }

        /// A row or column count disagrees with the declared atlas region count or measurement count.
        ShapeMismatch(expected: usize, found: usize, context: String) {
            display("Shape mismatch in {}: expected {} values, found {}", context, expected, found)
        }

        /// One measurement name is a token-boundary prefix of another, so filename
        /// dispatch could assign a file to either of them.
        AmbiguousMeasurementName(shorter: String, longer: String) {
            display("Measurement name '{}' is a prefix of '{}', filename matching would be ambiguous", shorter, longer)
        }

        /// A measurement name occurs more than once in an index.
        DuplicateMeasurementName(name: String) {
            display("Duplicate measurement name '{}'", name)
        }

        /// A region label does not contain the atlas delimiter it should be stripped of.
        MissingLabelDelimiter(label: String, delimiter: String) {
            display("Region label '{}' does not contain the delimiter '{}'", label, delimiter)
        }

        /// A strict snapshot was requested while some measurement columns were never populated.
        IncompleteAggregation(unset: Vec<String>) {
            display("Aggregation incomplete, no input file matched measurement(s): {}", unset.join(", "))
        }

        /// The plotting backend failed while rendering a heatmap.
        Render(msg: String) {
            display("Heatmap rendering failed: {}", msg)
        }

        /// I/O Error
        Io(err: IOError) {
            from()
            source(err)
        }

        /// CSV parsing or writing error
        Csv(err: csv::Error) {
            from()
            source(err)
        }
    }
}

/// Alias type for results originated from this crate.
pub type Result<T> = ::std::result::Result<T, RoistatsError>;
