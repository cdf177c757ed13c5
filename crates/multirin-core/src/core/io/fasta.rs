use crate::core::alignment::msa::{AlignmentError, SequenceAlignment};
use crate::core::io::traits::InputFile;
use std::io::{self, BufRead, Cursor, Read};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FastaError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Malformed FASTA: {0}")]
    Parse(String),
    #[error("Invalid alignment: {0}")]
    Alignment(#[from] AlignmentError),
}

/// Aligned FASTA reader backed by `needletail`.
///
/// Each record starts with a `>` header whose first whitespace-delimited token is the
/// structure identifier; the aligned sequence may span any number of following lines.
pub struct FastaFile;

impl InputFile for FastaFile {
    type Output = SequenceAlignment;
    type Error = FastaError;

    fn read_from(reader: &mut impl BufRead) -> Result<SequenceAlignment, FastaError> {
        let mut buffer = Vec::new();
        reader.read_to_end(&mut buffer)?;

        // needletail sniffs the format from the first byte and rejects empty input.
        let Some(start) = buffer.iter().position(|b| !b.is_ascii_whitespace()) else {
            return Err(AlignmentError::Empty.into());
        };
        buffer.drain(..start);

        let mut fastx = needletail::parse_fastx_reader(Cursor::new(buffer))
            .map_err(|e| FastaError::Parse(e.to_string()))?;

        let mut records: Vec<(String, String)> = Vec::new();
        while let Some(record) = fastx.next() {
            let record = record.map_err(|e| FastaError::Parse(e.to_string()))?;
            let header = String::from_utf8_lossy(record.id());
            let id = header.split_whitespace().next().unwrap_or_default().to_string();
            let sequence = String::from_utf8_lossy(&record.seq()).into_owned();
            records.push((id, sequence));
        }

        Ok(SequenceAlignment::new(records)?)
    }
}

impl SequenceAlignment {
    /// Reads an aligned FASTA document from a buffered reader.
    pub fn from_fasta_reader(reader: &mut impl BufRead) -> Result<Self, FastaError> {
        FastaFile::read_from(reader)
    }

    /// Reads an aligned FASTA file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, FastaError> {
        FastaFile::read_from_path(path)
    }
}
