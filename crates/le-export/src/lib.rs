//! le-export: everything written for the simulator before it runs.
//!
//! - buffer: fixed-length per-reach yearly export buffers
//! - exporter: one MessagePack record file per year slice
//! - control: plain-text statement, coefficient and control files

pub mod buffer;
pub mod control;
pub mod exporter;

pub use buffer::{EXPORT_BUFFER_LEN, ExportBuffer, HEADER_SLOTS, start_offset};
pub use exporter::{
    build_year_record, export_concentrations, read_year_record, record_file_name,
};

use std::path::PathBuf;

pub type ExportResult<T> = Result<T, ExportError>;

#[derive(thiserror::Error, Debug)]
pub enum ExportError {
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("MessagePack encode error: {0}")]
    Encode(#[from] rmp_serde::encode::Error),

    #[error("MessagePack decode error: {0}")]
    Decode(#[from] rmp_serde::decode::Error),

    #[error("Invalid export data: {0}")]
    Core(#[from] le_core::LeError),
}
