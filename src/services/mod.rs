pub mod block_cursor;
pub mod docx_reader;
pub mod moodle_extractor;
pub mod version_generator;
pub mod word_extractor;

pub use block_cursor::BlockCursor;
pub use docx_reader::DocxReader;
pub use moodle_extractor::MoodleExtractor;
pub use version_generator::{VersionGenerator, VersionRequest};
pub use word_extractor::WordExtractor;
