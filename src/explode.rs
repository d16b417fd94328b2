//! Container explosion — write each selected record to its own file in an
//! output directory.

use std::fs;
use std::io::{Read, Seek};
use std::path::Path;
use tracing::info;

use crate::container::ContainerReader;
use crate::error::Result;
use crate::range::SelectedRange;

/// Write the raw bytes of every record in `range` to `directory/<index>`,
/// with a `.txt` suffix when `text` is set.  With `include_metadata`, the
/// metadata byte string (if present) lands in `directory/metadata`.  The
/// directory is created with parents if absent; existing files at the same
/// names are overwritten.
pub fn explode<R: Read + Seek>(
    container: &mut ContainerReader<R>,
    range: SelectedRange,
    directory: &Path,
    include_metadata: bool,
    text: bool,
) -> Result<()> {
    fs::create_dir_all(directory)?;
    let suffix = if text { ".txt" } else { "" };
    for index in range.iter() {
        let bytes = container.record(index)?;
        fs::write(directory.join(format!("{index}{suffix}")), bytes)?;
    }
    if include_metadata {
        if let Some(metadata) = container.metadata() {
            fs::write(directory.join(format!("metadata{suffix}")), metadata)?;
        }
    }
    info!(
        records = range.len(),
        directory = %directory.display(),
        "exploded container"
    );
    Ok(())
}
