use super::msa::{AlignedSequence, GAP_SYMBOL, SequenceAlignment};
use thiserror::Error;
use tracing::trace;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MappingError {
    #[error("Structure '{0}' has no record in the sequence alignment")]
    UnknownStructure(String),
    #[error("Residue {residue} of structure '{structure}' does not match any alignment column")]
    ResidueNotFound { structure: String, residue: isize },
    #[error("Column {column} is outside the alignment (1..={num_columns})")]
    ColumnOutOfRange { column: usize, num_columns: usize },
    #[error(
        "Aligned sequence of '{structure}' has more residues than the {available} residue numbers supplied"
    )]
    ResidueListExhausted { structure: String, available: usize },
}

/// Result of translating an alignment column back to a structure's numbering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnMapping {
    /// The column holds a residue of the structure.
    Residue(isize),
    /// The column is a gap in the structure's row.
    Unmapped {
        column: usize,
        /// Residue at the nearest non-gap column; ties go to the preceding side.
        nearest_residue: Option<isize>,
    },
}

impl ColumnMapping {
    pub fn residue(&self) -> Option<isize> {
        match self {
            ColumnMapping::Residue(number) => Some(*number),
            ColumnMapping::Unmapped { .. } => None,
        }
    }
}

/// Translates between structure-local residue numbers and 1-based alignment columns.
///
/// `residue_numbers` is always the structure's ordered list of polymer residue
/// numbers (see [`Structure::residue_numbers`](crate::core::models::structure::Structure::residue_numbers));
/// the k-th non-gap symbol of the aligned row corresponds to its k-th entry.
#[derive(Debug, Clone, Copy)]
pub struct AlignmentIndexMapper<'a> {
    alignment: &'a SequenceAlignment,
}

impl<'a> AlignmentIndexMapper<'a> {
    pub fn new(alignment: &'a SequenceAlignment) -> Self {
        Self { alignment }
    }

    pub fn alignment(&self) -> &'a SequenceAlignment {
        self.alignment
    }

    fn row(&self, structure: &str) -> Result<&'a AlignedSequence, MappingError> {
        self.alignment
            .get(structure)
            .ok_or_else(|| MappingError::UnknownStructure(structure.to_string()))
    }

    /// Column at which `residue` sits in the structure's aligned row.
    ///
    /// # Errors
    ///
    /// Returns [`MappingError`] if the structure is not aligned, the residue never
    /// lines up with a non-gap column, or the row holds more residues than
    /// `residue_numbers` before the residue is reached.
    pub fn to_alignment_column(
        &self,
        structure: &str,
        residue_numbers: &[isize],
        residue: isize,
    ) -> Result<usize, MappingError> {
        let row = self.row(structure)?;
        let mut seq_index = 0;

        for (offset, &symbol) in row.symbols().iter().enumerate() {
            if symbol == GAP_SYMBOL {
                continue;
            }
            seq_index += 1;
            let current = residue_numbers.get(seq_index - 1).copied().ok_or_else(|| {
                MappingError::ResidueListExhausted {
                    structure: structure.to_string(),
                    available: residue_numbers.len(),
                }
            })?;
            if current == residue {
                trace!(structure, residue, column = offset + 1, "Mapped residue to column");
                return Ok(offset + 1);
            }
        }

        Err(MappingError::ResidueNotFound {
            structure: structure.to_string(),
            residue,
        })
    }

    /// Residue number at `column` of the structure's aligned row.
    ///
    /// Gap columns yield [`ColumnMapping::Unmapped`] carrying the nearest flanking residue.
    pub fn to_residue_number(
        &self,
        structure: &str,
        column: usize,
        residue_numbers: &[isize],
    ) -> Result<ColumnMapping, MappingError> {
        let row = self.row(structure)?;
        let symbols = row.symbols();
        if column == 0 || column > symbols.len() {
            return Err(MappingError::ColumnOutOfRange {
                column,
                num_columns: symbols.len(),
            });
        }

        let residue_at = |index: usize| -> Result<isize, MappingError> {
            let seq_index = symbols[..=index]
                .iter()
                .filter(|&&s| s != GAP_SYMBOL)
                .count();
            residue_numbers
                .get(seq_index - 1)
                .copied()
                .ok_or_else(|| MappingError::ResidueListExhausted {
                    structure: structure.to_string(),
                    available: residue_numbers.len(),
                })
        };

        let index = column - 1;
        if symbols[index] != GAP_SYMBOL {
            return residue_at(index).map(ColumnMapping::Residue);
        }

        let preceding = symbols[..index].iter().rposition(|&s| s != GAP_SYMBOL);
        let following = symbols[index + 1..]
            .iter()
            .position(|&s| s != GAP_SYMBOL)
            .map(|offset| index + 1 + offset);

        let nearest = match (preceding, following) {
            (Some(before), Some(after)) if after - index < index - before => Some(after),
            (Some(before), _) => Some(before),
            (None, after) => after,
        };

        let nearest_residue = nearest.map(residue_at).transpose()?;
        Ok(ColumnMapping::Unmapped {
            column,
            nearest_residue,
        })
    }
}
