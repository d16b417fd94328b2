//! Directory implosion — validate a directory of numbered record files and
//! write them into a newly created container.
//!
//! A valid implode directory contains files named `0`, `1`, … (optionally
//! with a `.txt` suffix), forming a contiguous zero-based sequence, plus at
//! most one of `metadata` / `metadata.txt`.  Validation is pure and runs to
//! completion before the output container is created, so a failed implode
//! leaves nothing behind.

use regex::Regex;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;
use tracing::info;

use crate::container::ContainerWriter;
use crate::error::{Error, Result};

fn entry_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?i)^(\d+)(\.txt)?$").unwrap())
}

/// A validated implode directory listing: record file names in ordinal
/// order, plus the metadata entry if present.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct DirectoryPlan {
    pub records: Vec<String>,
    pub metadata: Option<String>,
}

/// Classify and order a directory listing without touching the file system.
pub(crate) fn classify_entries(names: &[String]) -> Result<DirectoryPlan> {
    let mut names: Vec<String> = names.to_vec();

    let metadata = if let Some(pos) = names.iter().position(|n| n == "metadata") {
        if names.iter().any(|n| n == "metadata.txt") {
            return Err(Error::Validation(
                "Directory must not contain both 'metadata' and 'metadata.txt'.".to_string(),
            ));
        }
        Some(names.remove(pos))
    } else if let Some(pos) = names.iter().position(|n| n == "metadata.txt") {
        Some(names.remove(pos))
    } else {
        None
    };

    // (ordinal, digit string, file name) per remaining entry.
    let mut entries = Vec::with_capacity(names.len());
    for name in names {
        let digits = entry_pattern()
            .captures(&name)
            .and_then(|captures| captures.get(1))
            .map(|m| m.as_str().to_string());
        let ordinal = digits.as_deref().and_then(|d| d.parse::<u64>().ok());
        match (digits, ordinal) {
            (Some(digits), Some(ordinal)) => entries.push((ordinal, digits, name)),
            _ => {
                return Err(Error::Validation(format!(
                    "Unexpected file '{name}'. Implode directory entries must be numeric, \
                     or numeric+'.txt', and contiguous, starting at 0. Zero or one of \
                     'metadata' or 'metadata.txt' is also supported."
                )))
            }
        }
    }
    entries.sort_by_key(|&(ordinal, _, _)| ordinal);

    // The sorted ordinals must read 0, 1, …, n-1 exactly.
    for (position, (ordinal, digits, _)) in entries.iter().enumerate() {
        let position = position as u64;
        if *ordinal != position {
            if position > 0 && *ordinal == position - 1 {
                return Err(Error::Validation(format!(
                    "Directory must not contain both {digits} and {digits}.txt"
                )));
            }
            return Err(Error::Validation(format!(
                "Cannot find file '{position}' or '{position}.txt'."
            )));
        }
    }

    Ok(DirectoryPlan {
        records: entries.into_iter().map(|(_, _, name)| name).collect(),
        metadata,
    })
}

/// Implode `directory` into a new container at `output` with `header`.
pub fn implode(directory: &Path, header: &str, output: &Path) -> Result<()> {
    if output.exists() {
        return Err(Error::Precondition(
            "Output file must not already exist".to_string(),
        ));
    }

    let mut names = Vec::new();
    for entry in fs::read_dir(directory)? {
        names.push(entry?.file_name().to_string_lossy().into_owned());
    }
    let plan = classify_entries(&names)?;
    info!(
        records = plan.records.len(),
        metadata = plan.metadata.is_some(),
        output = %output.display(),
        "imploding directory"
    );

    let mut writer = ContainerWriter::create(output, header)?;
    for name in &plan.records {
        writer.add(&fs::read(directory.join(name))?)?;
    }
    if let Some(name) = &plan.metadata {
        writer.set_metadata(fs::read(directory.join(name))?);
    }
    writer.commit()?;
    Ok(())
}
