use std::collections::HashMap;
use thiserror::Error;

/// Gap character of an aligned sequence.
pub const GAP_SYMBOL: u8 = b'-';

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AlignmentError {
    #[error("Alignment contains no sequences")]
    Empty,
    #[error("Alignment record has an empty identifier")]
    EmptyId,
    #[error("Duplicate alignment record for '{0}'")]
    DuplicateId(String),
    #[error("Aligned sequence '{id}' has length {found}, expected {expected}")]
    InconsistentLength {
        id: String,
        expected: usize,
        found: usize,
    },
    #[error("Aligned sequence '{id}' holds non-ASCII symbol '{symbol}'")]
    NonAsciiSymbol { id: String, symbol: char },
}

/// One row of a multiple sequence alignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlignedSequence {
    pub id: String,
    symbols: Vec<u8>,
}

impl AlignedSequence {
    fn new(id: &str, sequence: &str) -> Self {
        Self {
            id: id.to_string(),
            symbols: sequence
                .bytes()
                .filter(|b| !b.is_ascii_whitespace())
                .map(|b| b.to_ascii_uppercase())
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Aligned symbols, gaps included, in column order.
    pub fn symbols(&self) -> &[u8] {
        &self.symbols
    }

    /// Whether the 1-based `column` holds a gap. Columns outside the row are `None`.
    pub fn is_gap(&self, column: usize) -> Option<bool> {
        column
            .checked_sub(1)
            .and_then(|index| self.symbols.get(index))
            .map(|&symbol| symbol == GAP_SYMBOL)
    }

    /// Number of residues, i.e. non-gap symbols.
    pub fn residue_count(&self) -> usize {
        self.symbols.iter().filter(|&&s| s != GAP_SYMBOL).count()
    }

    /// The row with gaps removed.
    pub fn ungapped(&self) -> String {
        self.symbols
            .iter()
            .filter(|&&s| s != GAP_SYMBOL)
            .map(|&s| s as char)
            .collect()
    }
}

/// A multiple sequence alignment keyed by structure identifier.
///
/// Every row has the same length `L`; columns are numbered `1..=L` and form the
/// shared coordinate system of the aggregated network tensor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceAlignment {
    records: Vec<AlignedSequence>,
    index: HashMap<String, usize>,
    num_columns: usize,
}

impl SequenceAlignment {
    /// Builds an alignment from `(identifier, aligned sequence)` pairs, preserving order.
    ///
    /// Whitespace inside sequences is ignored and symbols are upper-cased.
    ///
    /// # Errors
    ///
    /// Returns an error if there are no records, an identifier is empty or repeated,
    /// a row holds a non-ASCII symbol, or the rows differ in length.
    pub fn new<I, S, T>(records: I) -> Result<Self, AlignmentError>
    where
        I: IntoIterator<Item = (S, T)>,
        S: AsRef<str>,
        T: AsRef<str>,
    {
        let mut rows = Vec::new();
        let mut index = HashMap::new();

        for (id, sequence) in records {
            let id = id.as_ref().trim();
            if id.is_empty() {
                return Err(AlignmentError::EmptyId);
            }
            if index.contains_key(id) {
                return Err(AlignmentError::DuplicateId(id.to_string()));
            }
            if let Some(symbol) = sequence.as_ref().chars().find(|c| !c.is_ascii()) {
                return Err(AlignmentError::NonAsciiSymbol {
                    id: id.to_string(),
                    symbol,
                });
            }
            index.insert(id.to_string(), rows.len());
            rows.push(AlignedSequence::new(id, sequence.as_ref()));
        }

        let num_columns = rows.first().ok_or(AlignmentError::Empty)?.len();
        if let Some(row) = rows.iter().find(|row| row.len() != num_columns) {
            return Err(AlignmentError::InconsistentLength {
                id: row.id.clone(),
                expected: num_columns,
                found: row.len(),
            });
        }

        Ok(Self {
            records: rows,
            index,
            num_columns,
        })
    }

    /// Alignment length `L`.
    pub fn num_columns(&self) -> usize {
        self.num_columns
    }

    pub fn num_sequences(&self) -> usize {
        self.records.len()
    }

    pub fn get(&self, id: &str) -> Option<&AlignedSequence> {
        self.index.get(id).map(|&i| &self.records[i])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.records.iter().map(|row| row.id.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &AlignedSequence> {
        self.records.iter()
    }

    /// Rows for the given identifiers, in alignment order. Unknown identifiers are skipped.
    ///
    /// Returns `None` when none of the identifiers are present.
    pub fn subset<'a, I>(&self, ids: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let wanted: std::collections::HashSet<&str> = ids.into_iter().collect();
        let rows: Vec<_> = self
            .records
            .iter()
            .filter(|row| wanted.contains(row.id.as_str()))
            .map(|row| (row.id.clone(), row.to_string()))
            .collect();
        Self::new(rows).ok()
    }
}

impl std::fmt::Display for AlignedSequence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let row: String = self.symbols.iter().map(|&s| s as char).collect();
        f.write_str(&row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_builds_alignment_and_normalizes_symbols() {
        let alignment =
            SequenceAlignment::new([("2SHV", "ac-DE"), ("1ALI", "ACG d e")]).unwrap();
        assert_eq!(alignment.num_columns(), 5);
        assert_eq!(alignment.num_sequences(), 2);
        assert_eq!(alignment.get("2SHV").unwrap().symbols(), b"AC-DE");
        assert_eq!(alignment.get("1ALI").unwrap().symbols(), b"ACGDE");
        assert_eq!(alignment.ids().collect::<Vec<_>>(), vec!["2SHV", "1ALI"]);
    }

    #[test]
    fn new_rejects_inconsistent_lengths() {
        let err = SequenceAlignment::new([("A", "ACDE"), ("B", "AC")]).unwrap_err();
        assert_eq!(
            err,
            AlignmentError::InconsistentLength {
                id: "B".to_string(),
                expected: 4,
                found: 2
            }
        );
    }

    #[test]
    fn new_rejects_empty_duplicate_and_blank_ids() {
        let empty: Vec<(&str, &str)> = Vec::new();
        assert_eq!(SequenceAlignment::new(empty).unwrap_err(), AlignmentError::Empty);
        assert_eq!(
            SequenceAlignment::new([("A", "AC"), ("A", "AC")]).unwrap_err(),
            AlignmentError::DuplicateId("A".to_string())
        );
        assert_eq!(
            SequenceAlignment::new([("  ", "AC")]).unwrap_err(),
            AlignmentError::EmptyId
        );
    }

    #[test]
    fn new_rejects_non_ascii_rows() {
        // Both rows are five characters long, but "AÅ-DE" is six bytes.
        let err = SequenceAlignment::new([("2SHV", "AC-DE"), ("1ALI", "A\u{c5}-DE")]).unwrap_err();
        assert_eq!(
            err,
            AlignmentError::NonAsciiSymbol {
                id: "1ALI".to_string(),
                symbol: '\u{c5}'
            }
        );
    }

    #[test]
    fn aligned_sequence_gap_queries() {
        let alignment = SequenceAlignment::new([("X", "A--CD")]).unwrap();
        let row = alignment.get("X").unwrap();
        assert_eq!(row.is_gap(1), Some(false));
        assert_eq!(row.is_gap(2), Some(true));
        assert_eq!(row.is_gap(0), None);
        assert_eq!(row.is_gap(6), None);
        assert_eq!(row.residue_count(), 3);
        assert_eq!(row.ungapped(), "ACD");
    }

    #[test]
    fn subset_keeps_requested_rows_in_alignment_order() {
        let alignment =
            SequenceAlignment::new([("A", "AC-"), ("B", "A-C"), ("C", "ACC")]).unwrap();
        let subset = alignment.subset(["C", "A", "missing"]).unwrap();
        assert_eq!(subset.ids().collect::<Vec<_>>(), vec!["A", "C"]);
        assert_eq!(subset.get("A").unwrap().symbols(), b"AC-");
        assert!(alignment.subset(["missing"]).is_none());
    }
}
