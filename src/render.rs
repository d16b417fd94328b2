//! Record rendering — format a record (or the metadata pseudo-record) as
//! text lines according to the requested display options.

use std::io::{self, Write};

/// Which per-record output lines a dump run produces.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DisplayOptions {
    /// Emit `Record=<n>` / `Metadata` before each record.
    pub counts: bool,
    /// Emit `Size=<byte length>` before each record.
    pub sizes: bool,
    /// Hex-dump record contents, 16 bytes per row.
    pub binary: bool,
    /// Decode records as UTF-8; with `binary`, adds a printable-ASCII column.
    pub text: bool,
}

impl DisplayOptions {
    /// True when `counts` is the only active option.  The run then prints a
    /// single selected-record count and renders no records at all.
    pub fn count_only(&self) -> bool {
        self.counts && !self.sizes && !self.binary && !self.text
    }

    pub fn any(&self) -> bool {
        self.counts || self.sizes || self.binary || self.text
    }
}

/// Identifies the record being rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordLabel {
    Metadata,
    Record(u64),
}

/// Render one record to `out` as an ordered sequence of lines.
pub fn render_record(
    bytes: &[u8],
    label: RecordLabel,
    options: DisplayOptions,
    out: &mut dyn Write,
) -> io::Result<()> {
    if options.counts {
        match label {
            RecordLabel::Metadata => writeln!(out, "Metadata")?,
            RecordLabel::Record(index) => writeln!(out, "Record={index}")?,
        }
    }
    if options.sizes {
        writeln!(out, "Size={}", bytes.len())?;
    }
    if options.binary {
        let total_size = bytes.len() as u64;
        for (row, chunk) in bytes.chunks(16).enumerate() {
            write_binary_row((row * 16) as u64, total_size, chunk, options.text, out)?;
        }
    } else if options.text {
        out.write_all(String::from_utf8_lossy(bytes).as_bytes())?;
    }
    Ok(())
}

/// One row of up to 16 bytes in hex, preceded by the hexadecimal start
/// position within the record and followed by a linefeed.  The prefix width
/// is selected by the total record size so every row of a record aligns.
/// Missing byte slots in a short final chunk render as `--`.
fn write_binary_row(
    start: u64,
    total_size: u64,
    chunk: &[u8],
    with_text: bool,
    out: &mut dyn Write,
) -> io::Result<()> {
    let mut row = if total_size > 0x1000_0000 {
        format!("{start:016X}: ")
    } else if total_size > 0x1000 {
        format!("{start:08X}: ")
    } else {
        format!("{start:04X}: ")
    };
    for i in 0..16 {
        if i == 8 {
            row.push(' '); // river between the two groups of eight
        }
        match chunk.get(i) {
            Some(byte) => row.push_str(&format!(" {byte:02X}")),
            None => row.push_str(" --"),
        }
    }
    if with_text {
        row.push_str("  ");
        for (i, byte) in chunk.iter().enumerate() {
            if i == 8 {
                row.push(' ');
            }
            row.push(match byte {
                0x20..=0x7E => *byte as char,
                _ => '.',
            });
        }
    }
    row.push('\n');
    out.write_all(row.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render_to_string(bytes: &[u8], label: RecordLabel, options: DisplayOptions) -> String {
        let mut out = Vec::new();
        render_record(bytes, label, options, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn counts_and_sizes_lines() {
        let options = DisplayOptions { counts: true, sizes: true, ..Default::default() };
        assert_eq!(
            render_to_string(b"abc", RecordLabel::Record(7), options),
            "Record=7\nSize=3\n"
        );
        assert_eq!(
            render_to_string(b"abc", RecordLabel::Metadata, options),
            "Metadata\nSize=3\n"
        );
    }

    #[test]
    fn binary_rows_pad_with_dashes() {
        let options = DisplayOptions { binary: true, ..Default::default() };
        let rendered = render_to_string(b"ABCDEFGHIJKLMNOPQRST", RecordLabel::Record(0), options);
        assert_eq!(
            rendered,
            "0000:  41 42 43 44 45 46 47 48  49 4A 4B 4C 4D 4E 4F 50\n\
             0010:  51 52 53 54 -- -- -- --  -- -- -- -- -- -- -- --\n"
        );
    }

    #[test]
    fn binary_with_text_column() {
        let options = DisplayOptions { binary: true, text: true, ..Default::default() };
        let mut bytes = b"Hello, world!".to_vec();
        bytes.push(0x01); // non-printable
        let rendered = render_to_string(&bytes, RecordLabel::Record(0), options);
        assert_eq!(
            rendered,
            "0000:  48 65 6C 6C 6F 2C 20 77  6F 72 6C 64 21 01 -- --  Hello, w orld!.\n"
        );
    }

    #[test]
    fn prefix_width_follows_record_size() {
        let options = DisplayOptions { binary: true, ..Default::default() };

        let small = render_to_string(&[0u8; 1], RecordLabel::Record(0), options);
        assert!(small.starts_with("0000: "));

        let medium = render_to_string(&vec![0u8; 0x1001], RecordLabel::Record(0), options);
        assert!(medium.starts_with("00000000: "));
        assert!(medium.contains("\n00001000: "));
    }

    #[test]
    fn text_only_is_verbatim_utf8() {
        let options = DisplayOptions { text: true, ..Default::default() };
        assert_eq!(
            render_to_string("héllo\n".as_bytes(), RecordLabel::Record(0), options),
            "héllo\n"
        );
    }

    #[test]
    fn empty_record_in_binary_mode_renders_no_rows() {
        let options = DisplayOptions { binary: true, sizes: true, ..Default::default() };
        assert_eq!(
            render_to_string(b"", RecordLabel::Record(0), options),
            "Size=0\n"
        );
    }
}
