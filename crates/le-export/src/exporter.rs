//! Yearly concentration records for the simulator.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use le_core::{YearSlice, YearSlices};
use le_project::HourlySeries;

use crate::buffer::{ExportBuffer, start_offset};
use crate::{ExportError, ExportResult};

pub fn record_file_name(year: i32) -> String {
    format!("rummen_{year}.msgpack")
}

/// One export buffer per reach, in series reach order.
pub fn build_year_record(
    series: &HourlySeries,
    slices: &YearSlices,
    slice: &YearSlice,
) -> ExportResult<Vec<ExportBuffer>> {
    let offset = start_offset(slice, slices.start());
    series
        .reaches()
        .iter()
        .enumerate()
        .map(|(i, reach)| {
            let values = series.reach_slice(i, slice.hours.clone());
            ExportBuffer::pack(*reach, offset, values.iter().copied()).map_err(ExportError::from)
        })
        .collect()
}

/// Write one MessagePack record per year slice into `dir`.
///
/// Returns the written paths in slice order.
pub fn export_concentrations(
    dir: &Path,
    series: &HourlySeries,
    slices: &YearSlices,
) -> ExportResult<Vec<PathBuf>> {
    let mut written = Vec::with_capacity(slices.len());
    for slice in slices.iter() {
        let record = build_year_record(series, slices, &slice)?;
        let path = dir.join(record_file_name(slice.year));
        write_record(&path, &record)?;
        tracing::debug!(
            path = %path.display(),
            year = slice.year,
            hours = slice.len(),
            reaches = record.len(),
            "exported concentration record"
        );
        written.push(path);
    }
    Ok(written)
}

fn write_record(path: &Path, record: &[ExportBuffer]) -> ExportResult<()> {
    let file = File::create(path).map_err(|source| ExportError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    let mut writer = BufWriter::new(file);
    // One flat array of slots per reach.
    let slots: Vec<&[f64]> = record.iter().map(ExportBuffer::as_slice).collect();
    rmp_serde::encode::write(&mut writer, &slots)?;
    writer.flush().map_err(|source| ExportError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(())
}

/// Read an exported record back.
pub fn read_year_record(path: &Path) -> ExportResult<Vec<ExportBuffer>> {
    let file = File::open(path).map_err(|source| ExportError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let slots: Vec<Vec<f64>> = rmp_serde::decode::from_read(BufReader::new(file))?;
    slots
        .into_iter()
        .map(|s| ExportBuffer::from_slots(s).map_err(ExportError::from))
        .collect()
}
