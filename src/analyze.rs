//! Top-level actions — exactly one per invocation, each carrying only the
//! fields it needs.

use std::io::Write;
use std::path::PathBuf;
use tracing::debug;

use crate::container::ContainerReader;
use crate::error::Result;
use crate::explode::explode;
use crate::implode::implode;
use crate::patch::patch;
use crate::range::SelectedRange;
use crate::render::{render_record, DisplayOptions, RecordLabel};

/// The selected top-level action.
#[derive(Debug, Clone)]
pub enum Action {
    Dump(DumpAction),
    Explode(ExplodeAction),
    Implode(ImplodeAction),
    Patch(PatchAction),
}

/// Render selected records (and optionally metadata) to the output sink, or
/// print a bare record count in count-only mode.
#[derive(Debug, Clone)]
pub struct DumpAction {
    pub input: PathBuf,
    pub options: DisplayOptions,
    pub metadata: bool,
    pub lower: Option<u64>,
    pub upper: Option<u64>,
}

/// Write each selected record to its own file in a directory.
#[derive(Debug, Clone)]
pub struct ExplodeAction {
    pub input: PathBuf,
    pub directory: PathBuf,
    pub text: bool,
    pub metadata: bool,
    pub lower: Option<u64>,
    pub upper: Option<u64>,
}

/// Build a container from a directory of numbered record files.  Implode has
/// no input container, only an input directory.
#[derive(Debug, Clone)]
pub struct ImplodeAction {
    pub directory: PathBuf,
    pub header: String,
    pub output: PathBuf,
}

/// Strip one layer of UTF-8 double-encoding from every selected record into
/// a fresh container.
#[derive(Debug, Clone)]
pub struct PatchAction {
    pub input: PathBuf,
    pub output: PathBuf,
    pub lower: Option<u64>,
    pub upper: Option<u64>,
}

/// Run one action.  Dump output (record lines or the bare count) goes to
/// `out`; the other actions only touch the file system.
pub fn run(action: &Action, out: &mut dyn Write) -> Result<()> {
    match action {
        Action::Dump(dump) => {
            if !dump.options.any() {
                return Ok(());
            }
            let mut container = ContainerReader::open(&dump.input)?;
            let range =
                SelectedRange::select(dump.lower, dump.upper, container.record_count());
            debug!(records = container.record_count(), selected = range.len(), "dump");

            if dump.options.count_only() {
                writeln!(out, "{}", range.len())?;
                return Ok(());
            }
            for index in range.iter() {
                let bytes = container.record(index)?;
                render_record(&bytes, RecordLabel::Record(index), dump.options, out)?;
            }
            if dump.metadata {
                if let Some(metadata) = container.metadata() {
                    render_record(metadata, RecordLabel::Metadata, dump.options, out)?;
                }
            }
            Ok(())
        }
        Action::Explode(action) => {
            let mut container = ContainerReader::open(&action.input)?;
            let range =
                SelectedRange::select(action.lower, action.upper, container.record_count());
            explode(
                &mut container,
                range,
                &action.directory,
                action.metadata,
                action.text,
            )
        }
        Action::Implode(action) => implode(&action.directory, &action.header, &action.output),
        Action::Patch(action) => {
            let mut container = ContainerReader::open(&action.input)?;
            let range =
                SelectedRange::select(action.lower, action.upper, container.record_count());
            patch(&mut container, range, &action.output)
        }
    }
}
