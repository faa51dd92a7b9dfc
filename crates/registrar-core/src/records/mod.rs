//! CSV record import and export

pub mod reader;
pub mod upload;
pub mod writer;

pub use reader::{load_records_from_csv, normalize_header, Record};
pub use upload::{load_records_from_uploaded_csv, UploadedFile};
pub use writer::{render_value, serialize_to_csv, CsvItem};
