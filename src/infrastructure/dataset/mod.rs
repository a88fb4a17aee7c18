//! Dataset wrapper, local loading and encoding

mod codec;
mod dataset;
mod loader;
mod serializer;

pub use codec::{DataFormat, read_csv, read_parquet, write_csv, write_parquet};
pub use dataset::{Dataset, pull_dataset};
pub use loader::DatasetLoader;
pub use serializer::{SAMPLE_ROWS, serialize_table};
