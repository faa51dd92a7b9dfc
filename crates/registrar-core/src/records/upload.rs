//! Uploaded CSV files

use std::io::Read;

use crate::error::Result;
use crate::records::reader::{load_records_from_csv, Record};

/// File received in an upload request
pub trait UploadedFile {
    /// Read the entire file contents
    fn read_all(&mut self) -> std::io::Result<Vec<u8>>;
}

impl<R: Read> UploadedFile for R {
    fn read_all(&mut self) -> std::io::Result<Vec<u8>> {
        let mut contents = Vec::new();
        self.read_to_end(&mut contents)?;
        Ok(contents)
    }
}

/// Load records from an uploaded CSV file.
///
/// The upload must be UTF-8; invalid bytes fail with
/// [`crate::Error::Decode`], not a validation error. See
/// [`load_records_from_csv`] for the record rules.
pub fn load_records_from_uploaded_csv<F>(
    file: &mut F,
    field_names: &[&str],
    optional_fields: &[&str],
) -> Result<Vec<Record>>
where
    F: UploadedFile + ?Sized,
{
    let contents = file.read_all()?;
    let text = std::str::from_utf8(&contents)?;
    load_records_from_csv(text, field_names, optional_fields)
}
