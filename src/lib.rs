pub mod analyze;
pub mod container;
pub mod destrip;
pub mod error;
pub mod explode;
pub mod header;
pub mod implode;
pub mod patch;
pub mod range;
pub mod render;

pub use analyze::Action;
pub use container::{ContainerReader, ContainerWriter};
pub use destrip::{destrip, TranscodeError};
pub use error::{Error, Result};
pub use header::sniff_header;
pub use range::SelectedRange;
pub use render::{render_record, DisplayOptions, RecordLabel};
