//! CSV file sink
//!
//! Writes one file per destination inside the output directory with the
//! header `title,description,price,rating,num_of_reviews`.

use crate::output::traits::{OutputError, OutputResult, ProductSink};
use crate::product::{Product, CSV_HEADER};
use csv::WriterBuilder;
use std::path::PathBuf;

/// Sink writing `<directory>/<destination>` CSV files
#[derive(Debug, Clone)]
pub struct CsvSink {
    directory: PathBuf,
}

impl CsvSink {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }
}

impl ProductSink for CsvSink {
    fn write(&self, destination: &str, products: &[Product]) -> OutputResult<PathBuf> {
        let bytes = render_csv(destination, products)?;

        std::fs::create_dir_all(&self.directory)?;
        let path = self.directory.join(destination);
        std::fs::write(&path, bytes).map_err(|source| OutputError::Write {
            path: path.clone(),
            source,
        })?;

        tracing::debug!("Wrote {} records to {}", products.len(), path.display());
        Ok(path)
    }
}

/// Serializes the header and all rows in memory
///
/// The header is written explicitly so an empty page still produces it.
pub fn render_csv(destination: &str, products: &[Product]) -> OutputResult<Vec<u8>> {
    let serialize_error = |source| OutputError::Serialize {
        destination: destination.to_string(),
        source,
    };

    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());

    writer.write_record(CSV_HEADER).map_err(serialize_error)?;
    for product in products {
        writer.serialize(product).map_err(serialize_error)?;
    }

    writer
        .into_inner()
        .map_err(|e| OutputError::Io(e.into_error()))
}
