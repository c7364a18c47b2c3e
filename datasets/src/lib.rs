//! `cuvee-datasets` loads the wine-quality tables used throughout the
//! workspace.
//!
//! The upstream dataset is published as two semicolon-delimited CSV files,
//! one for red and one for white wines, sharing the same schema: eleven
//! numeric physico-chemical measurements plus an integer `quality` score
//! between 3 and 9. [`winequality`] fetches both files over HTTPS and
//! concatenates them into a single [`Dataset`]; [`winequality_sample`]
//! returns a small bundled excerpt for tests and offline use.
//!
//! ```ignore
//! let dataset = cuvee_datasets::winequality_sample();
//! let (train, valid) = dataset.split_with_ratio(0.8);
//! ```

use std::io::Read;
use std::path::Path;

use csv::ReaderBuilder;
use flate2::read::GzDecoder;
use ndarray::{concatenate, Array2, Axis};
use ndarray_csv::Array2Reader;

use cuvee::Dataset;

mod error;

pub use error::{DatasetsError, Result};

/// Canonical location of the red wine table
pub const WINEQUALITY_RED_URL: &str =
    "https://archive.ics.uci.edu/ml/machine-learning-databases/wine-quality/winequality-red.csv";

/// Canonical location of the white wine table
pub const WINEQUALITY_WHITE_URL: &str =
    "https://archive.ics.uci.edu/ml/machine-learning-databases/wine-quality/winequality-white.csv";

/// Name of the target column in the upstream tables
pub const TARGET_COLUMN: &str = "quality";

/// A delimited numeric table with named columns, the raw form of a dataset
#[derive(Debug, Clone)]
struct Table {
    headers: Vec<String>,
    values: Array2<f64>,
}

impl Table {
    /// Parse a semicolon-delimited table from a reader
    fn from_reader<R: Read>(reader: R) -> Result<Table> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .delimiter(b';')
            .from_reader(reader);

        let headers = reader
            .headers()?
            .iter()
            .map(|name| name.trim().to_string())
            .collect();
        let values = reader.deserialize_array2_dynamic()?;

        Ok(Table { headers, values })
    }

    /// Append the rows of `other`, which must share the schema
    fn stack(self, other: Table) -> Result<Table> {
        if self.headers != other.headers {
            return Err(DatasetsError::SchemaMismatch {
                left: self.headers,
                right: other.headers,
            });
        }

        let values = concatenate(Axis(0), &[self.values.view(), other.values.view()])?;

        Ok(Table {
            headers: self.headers,
            values,
        })
    }

    /// Separate the target column from the feature columns
    fn into_dataset(self, origin: &str) -> Result<Dataset<f64>> {
        let target_index = self
            .headers
            .iter()
            .position(|name| name == TARGET_COLUMN)
            .ok_or_else(|| DatasetsError::MissingTargetColumn {
                path: origin.to_string(),
                column: TARGET_COLUMN.to_string(),
            })?;

        let feature_indices = (0..self.headers.len())
            .filter(|&index| index != target_index)
            .collect::<Vec<_>>();

        let records = self.values.select(Axis(1), &feature_indices);
        let targets = self.values.column(target_index).to_owned();
        let feature_names = feature_indices
            .iter()
            .map(|&index| self.headers[index].clone())
            .collect::<Vec<_>>();

        Ok(Dataset::new(records, targets).with_feature_names(feature_names))
    }
}

fn fetch_table(url: &str) -> Result<Table> {
    let response = reqwest::blocking::get(url)?.error_for_status()?;
    let body = response.bytes()?;

    Table::from_reader(body.as_ref())
}

fn merge(red: Table, white: Table, origin: &str) -> Result<Dataset<f64>> {
    red.stack(white)?.into_dataset(origin)
}

/// Fetch the red and white wine-quality tables from their canonical
/// locations and concatenate them into one dataset
///
/// Both downloads are plain blocking requests without retries; any transport
/// or parsing failure propagates to the caller.
pub fn winequality() -> Result<Dataset<f64>> {
    winequality_from_urls(WINEQUALITY_RED_URL, WINEQUALITY_WHITE_URL)
}

/// Fetch the wine-quality tables from the given locations
pub fn winequality_from_urls(red_url: &str, white_url: &str) -> Result<Dataset<f64>> {
    let red = fetch_table(red_url)?;
    let white = fetch_table(white_url)?;

    merge(red, white, red_url)
}

/// Read the wine-quality tables from local files
pub fn winequality_from_paths(red: &Path, white: &Path) -> Result<Dataset<f64>> {
    let red_table = Table::from_reader(std::fs::File::open(red)?)?;
    let white_table = Table::from_reader(std::fs::File::open(white)?)?;

    merge(red_table, white_table, &red.display().to_string())
}

/// Read in a bundled excerpt of the wine-quality dataset
///
/// The excerpt ships with the crate, so this loader involves no I/O and
/// cannot fail; it backs tests and offline runs of the workflow.
pub fn winequality_sample() -> Dataset<f64> {
    let red = include_bytes!("../data/winequality-red-sample.csv.gz");
    let white = include_bytes!("../data/winequality-white-sample.csv.gz");

    let red = Table::from_reader(GzDecoder::new(&red[..])).unwrap();
    let white = Table::from_reader(GzDecoder::new(&white[..])).unwrap();

    merge(red, white, "bundled sample").unwrap()
}
