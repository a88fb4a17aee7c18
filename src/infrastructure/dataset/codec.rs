//! Parquet and CSV encoding of frames

use std::io::Cursor;

use polars::prelude::*;

use crate::domain::DomainError;

/// On-disk format of a dataset's data file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataFormat {
    Parquet,
    Csv,
}

impl DataFormat {
    pub fn from_source_type(source_type: &str) -> Option<Self> {
        match source_type {
            "parquet" => Some(Self::Parquet),
            "csv" => Some(Self::Csv),
            _ => None,
        }
    }

    pub fn from_extension(path: &std::path::Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        Self::from_source_type(&ext)
    }

    pub fn read(&self, bytes: Vec<u8>) -> Result<DataFrame, DomainError> {
        match self {
            Self::Parquet => read_parquet(bytes),
            Self::Csv => read_csv(bytes),
        }
    }
}

pub fn read_parquet(bytes: Vec<u8>) -> Result<DataFrame, DomainError> {
    ParquetReader::new(Cursor::new(bytes))
        .finish()
        .map_err(|e| DomainError::serialization(format!("Failed to read parquet: {}", e)))
}

pub fn write_parquet(frame: &DataFrame) -> Result<Vec<u8>, DomainError> {
    let mut frame = frame.clone();
    let mut buf = Vec::new();

    ParquetWriter::new(&mut buf)
        .finish(&mut frame)
        .map_err(|e| DomainError::serialization(format!("Failed to write parquet: {}", e)))?;

    Ok(buf)
}

pub fn read_csv(bytes: Vec<u8>) -> Result<DataFrame, DomainError> {
    CsvReadOptions::default()
        .with_has_header(true)
        .into_reader_with_file_handle(Cursor::new(bytes))
        .finish()
        .map_err(|e| DomainError::serialization(format!("Failed to read csv: {}", e)))
}

pub fn write_csv(frame: &DataFrame) -> Result<String, DomainError> {
    let mut frame = frame.clone();
    let mut buf = Vec::new();

    CsvWriter::new(&mut buf)
        .include_header(true)
        .finish(&mut frame)
        .map_err(|e| DomainError::serialization(format!("Failed to write csv: {}", e)))?;

    String::from_utf8(buf)
        .map_err(|e| DomainError::serialization(format!("CSV output is not UTF-8: {}", e)))
}
