use crate::core::io::traits::InputFile;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::io::{self, BufRead};
use thiserror::Error;

/// Name of the column holding the structure identifier.
pub const ID_COLUMN: &str = "ID";

#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Metadata table has no 'ID' column")]
    MissingIdColumn,
    #[error("Duplicate metadata row for structure '{0}'")]
    DuplicateId(String),
    #[error("Unknown metadata column '{0}'")]
    UnknownClassifier(String),
    #[error("Column '{classifier}' has no group '{group}'")]
    UnknownGroup { classifier: String, group: String },
    #[error("Invalid value bins: {0}")]
    InvalidBins(String),
    #[error("Value '{value}' of structure '{id}' in column '{column}' is not a number")]
    NonNumericValue {
        id: String,
        column: String,
        value: String,
    },
}

/// Equal-width bins closed on the right: `(lower, lower + width]`, `(lower + width, lower + 2 * width]`, ...
///
/// Edges run from `lower` up to the first multiple of `width` that reaches `upper`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValueBins {
    width: f64,
    lower: f64,
    upper: f64,
}

impl ValueBins {
    pub fn new(width: f64, lower: f64, upper: f64) -> Result<Self, MetadataError> {
        if !(width.is_finite() && lower.is_finite() && upper.is_finite()) {
            return Err(MetadataError::InvalidBins(
                "bounds and width must be finite".to_string(),
            ));
        }
        if width <= 0.0 {
            return Err(MetadataError::InvalidBins(format!(
                "width {width} must be greater than zero"
            )));
        }
        if upper <= lower {
            return Err(MetadataError::InvalidBins(format!(
                "upper bound {upper} must exceed lower bound {lower}"
            )));
        }
        Ok(Self {
            width,
            lower,
            upper,
        })
    }

    /// Edges snapped to nine decimals so fractional widths give clean labels.
    fn edges(&self) -> Vec<f64> {
        let snap = |value: f64| (value * 1e9).round() / 1e9;
        let count = snap((self.upper + self.width - self.lower) / self.width).ceil() as usize;
        (0..count)
            .map(|k| snap(self.lower + k as f64 * self.width))
            .collect()
    }

    /// Label `"{left}-{right}"` of the bin holding `value`, if any.
    pub fn label_of(&self, value: f64) -> Option<String> {
        self.edges()
            .windows(2)
            .find(|edge| edge[0] < value && value <= edge[1])
            .map(|edge| format!("{}-{}", edge[0], edge[1]))
    }
}

/// Per-structure attribute table keyed by the `ID` column.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StructureMetadata {
    columns: Vec<String>,
    rows: Vec<(String, HashMap<String, String>)>,
    index: HashMap<String, usize>,
}

impl StructureMetadata {
    /// Column names in file order, `ID` included.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().map(|(id, _)| id.as_str())
    }

    pub fn value(&self, id: &str, column: &str) -> Option<&str> {
        self.index
            .get(id)
            .and_then(|&i| self.rows[i].1.get(column))
            .map(String::as_str)
    }

    /// Structure identifiers grouped by their value in `classifier`, in row order.
    ///
    /// Rows with an empty value are left out.
    pub fn groups_by(&self, classifier: &str) -> Result<BTreeMap<String, Vec<String>>, MetadataError> {
        if !self.columns.iter().any(|c| c == classifier) {
            return Err(MetadataError::UnknownClassifier(classifier.to_string()));
        }

        let mut groups: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for (id, values) in &self.rows {
            match values.get(classifier).map(|v| v.trim()) {
                Some(group) if !group.is_empty() => {
                    groups.entry(group.to_string()).or_default().push(id.clone())
                }
                _ => {}
            }
        }
        Ok(groups)
    }

    /// Structure identifiers grouped by the bin their numeric `classifier` value falls in.
    ///
    /// Rows with an empty value or a value outside every bin are left out.
    pub fn groups_by_bins(
        &self,
        classifier: &str,
        bins: &ValueBins,
    ) -> Result<BTreeMap<String, Vec<String>>, MetadataError> {
        let mut binned: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for (value, ids) in self.groups_by(classifier)? {
            let number: f64 = value
                .parse()
                .map_err(|_| MetadataError::NonNumericValue {
                    id: ids.first().cloned().unwrap_or_default(),
                    column: classifier.to_string(),
                    value: value.clone(),
                })?;
            if let Some(label) = bins.label_of(number) {
                binned.entry(label).or_default().extend(ids);
            }
        }
        for ids in binned.values_mut() {
            ids.sort_by_key(|id| self.index.get(id).copied());
        }
        Ok(binned)
    }

    /// The rows whose identifier is in `ids`, in table order.
    pub fn subset<'a, I>(&self, ids: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let wanted: HashSet<&str> = ids.into_iter().collect();
        let rows: Vec<_> = self
            .rows
            .iter()
            .filter(|(id, _)| wanted.contains(id.as_str()))
            .cloned()
            .collect();
        let index = rows
            .iter()
            .enumerate()
            .map(|(i, (id, _))| (id.clone(), i))
            .collect();
        Self {
            columns: self.columns.clone(),
            rows,
            index,
        }
    }
}

/// CSV reader for [`StructureMetadata`].
pub struct MetadataFile;

impl InputFile for MetadataFile {
    type Output = StructureMetadata;
    type Error = MetadataError;

    fn read_from(reader: &mut impl BufRead) -> Result<StructureMetadata, MetadataError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let columns: Vec<String> = csv_reader.headers()?.iter().map(str::to_string).collect();
        if !columns.iter().any(|c| c == ID_COLUMN) {
            return Err(MetadataError::MissingIdColumn);
        }

        let mut metadata = StructureMetadata {
            columns,
            ..StructureMetadata::default()
        };

        for result in csv_reader.deserialize::<HashMap<String, String>>() {
            let mut values = result?;
            let id = values.remove(ID_COLUMN).unwrap_or_default();
            if id.is_empty() {
                continue;
            }
            if metadata.index.contains_key(&id) {
                return Err(MetadataError::DuplicateId(id));
            }
            metadata.index.insert(id.clone(), metadata.rows.len());
            metadata.rows.push((id, values));
        }

        Ok(metadata)
    }
}
