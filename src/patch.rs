//! Patching — copy a container while stripping one layer of accidental
//! UTF-8 double-encoding from every selected record, all or nothing.

use std::fs;
use std::io::{Read, Seek};
use std::path::Path;
use tracing::{info, warn};

use crate::container::{ContainerReader, ContainerWriter};
use crate::destrip::destrip;
use crate::error::{Error, Result};
use crate::range::SelectedRange;

/// Destrip every record in `range` from `source` into a new container at
/// `output`, carrying the source header and metadata over.  On any failure
/// the incomplete output file is closed and deleted, so either a fully
/// committed container exists at `output` or no file exists there at all.
pub fn patch<R: Read + Seek>(
    source: &mut ContainerReader<R>,
    range: SelectedRange,
    output: &Path,
) -> Result<()> {
    if output.exists() {
        return Err(Error::Precondition(
            "Output file must not already exist".to_string(),
        ));
    }

    let mut writer = ContainerWriter::create(output, source.header())?;
    match copy_destripped(source, range, &mut writer) {
        Ok(()) => {
            info!(records = range.len(), output = %output.display(), "patched container");
            Ok(())
        }
        Err(err) => {
            // Release the output handle before deleting the partial file.
            drop(writer);
            if let Err(remove_err) = fs::remove_file(output) {
                warn!(
                    output = %output.display(),
                    error = %remove_err,
                    "failed to remove incomplete patch output"
                );
            }
            Err(err)
        }
    }
}

fn copy_destripped<R: Read + Seek, W: std::io::Write + Seek>(
    source: &mut ContainerReader<R>,
    range: SelectedRange,
    writer: &mut ContainerWriter<W>,
) -> Result<()> {
    for index in range.iter() {
        let record = source.record(index)?;
        let stripped = destrip(&record).map_err(|err| Error::RecordTranscode {
            record: index,
            source: err,
        })?;
        writer.add(&stripped)?;
    }
    if let Some(metadata) = source.metadata() {
        writer.set_metadata(metadata.to_vec());
    }
    writer.commit()?;
    Ok(())
}
