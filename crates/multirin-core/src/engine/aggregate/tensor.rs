use crate::engine::error::DataIntegrityError;
use ndarray::{Array2, Array3, ArrayView2, Axis, s};
use std::collections::HashSet;

/// Dense `(structure, column, column)` array of aggregated contact weights.
///
/// Alignment column `c` (1-based) is stored at index `c - 1` of the two trailing axes,
/// so `data[[s, a - 1, b - 1]]` is the weight between columns `a` and `b` of structure `s`.
/// Transformations return new tensors and leave the receiver untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct MultiNetworkTensor {
    structure_ids: Vec<String>,
    data: Array3<f64>,
}

impl MultiNetworkTensor {
    /// An all-zero tensor for the given structures over `num_columns` alignment columns.
    pub fn zeros(structure_ids: Vec<String>, num_columns: usize) -> Self {
        let data = Array3::zeros((structure_ids.len(), num_columns, num_columns));
        Self {
            structure_ids,
            data,
        }
    }

    /// Stacks per-structure `num_columns x num_columns` slices in the given order.
    ///
    /// Returns `None` if the counts disagree or a slice has the wrong shape.
    pub fn from_slices(
        structure_ids: Vec<String>,
        slices: Vec<Array2<f64>>,
        num_columns: usize,
    ) -> Option<Self> {
        if structure_ids.len() != slices.len()
            || slices.iter().any(|m| m.dim() != (num_columns, num_columns))
        {
            return None;
        }

        let mut tensor = Self::zeros(structure_ids, num_columns);
        for (index, slice) in slices.iter().enumerate() {
            tensor.assign_slice(index, slice);
        }
        Some(tensor)
    }

    pub(crate) fn assign_slice(&mut self, index: usize, slice: &Array2<f64>) {
        self.data.index_axis_mut(Axis(0), index).assign(slice);
    }

    pub fn structure_ids(&self) -> &[String] {
        &self.structure_ids
    }

    pub fn num_structures(&self) -> usize {
        self.structure_ids.len()
    }

    pub fn num_columns(&self) -> usize {
        self.data.dim().1
    }

    /// The raw array, 0-based on every axis.
    pub fn data(&self) -> &Array3<f64> {
        &self.data
    }

    pub fn position(&self, structure_id: &str) -> Option<usize> {
        self.structure_ids.iter().position(|id| id == structure_id)
    }

    pub fn slice(&self, structure_id: &str) -> Option<ArrayView2<'_, f64>> {
        self.position(structure_id)
            .map(|index| self.data.index_axis(Axis(0), index))
    }

    /// Weight between two 1-based alignment columns of one structure.
    pub fn get(&self, structure_id: &str, column_a: usize, column_b: usize) -> Option<f64> {
        let index = self.position(structure_id)?;
        let a = column_a.checked_sub(1)?;
        let b = column_b.checked_sub(1)?;
        self.data.get([index, a, b]).copied()
    }

    /// Largest cell of the whole tensor, 0 when empty.
    pub fn max(&self) -> f64 {
        max_of(self.data.iter())
    }

    /// Divides every slice by its own maximum and multiplies by `scale`.
    ///
    /// All-zero slices stay zero.
    pub fn normalized_per_structure(&self, scale: f64) -> Self {
        let mut data = self.data.clone();
        for mut slice in data.axis_iter_mut(Axis(0)) {
            let max = max_of(slice.iter());
            if max > 0.0 {
                slice.mapv_inplace(|v| v / max * scale);
            }
        }
        Self {
            structure_ids: self.structure_ids.clone(),
            data,
        }
    }

    /// Divides the tensor by its global maximum and multiplies by `scale`.
    ///
    /// A tensor whose maximum is not positive is returned unchanged.
    pub fn scaled_globally(&self, scale: f64) -> Self {
        let max = self.max();
        if max <= 0.0 {
            return self.clone();
        }
        Self {
            structure_ids: self.structure_ids.clone(),
            data: self.data.mapv(|v| v / max * scale),
        }
    }

    /// Replaces NaN and infinite cells with 0.
    pub fn sanitized(&self) -> Self {
        Self {
            structure_ids: self.structure_ids.clone(),
            data: self.data.mapv(|v| if v.is_finite() { v } else { 0.0 }),
        }
    }

    /// Zeroes every cell below `percent`% of the tensor's global maximum.
    pub fn remove_weak_edges(&self, percent: f64) -> Self {
        let cutoff = weak_edge_cutoff(self.max(), percent);
        Self {
            structure_ids: self.structure_ids.clone(),
            data: self.data.mapv(|v| if v < cutoff { 0.0 } else { v }),
        }
    }

    /// First invariant violation of every slice: symmetry, zero diagonal, finite values.
    pub fn check_integrity(&self) -> Vec<DataIntegrityError> {
        self.structure_ids
            .iter()
            .zip(self.data.axis_iter(Axis(0)))
            .filter_map(|(id, slice)| check_slice(id, slice).err())
            .collect()
    }

    /// The structures present in `ids`, kept in tensor order.
    pub fn subset<'a, I>(&self, ids: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let wanted: HashSet<&str> = ids.into_iter().collect();
        self.select(|id| wanted.contains(id))
    }

    /// The tensor with the structures in `ids` removed.
    pub fn without<'a, I>(&self, ids: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let unwanted: HashSet<&str> = ids.into_iter().collect();
        self.select(|id| !unwanted.contains(id))
    }

    fn select<F>(&self, keep: F) -> Self
    where
        F: Fn(&str) -> bool,
    {
        let indices: Vec<usize> = self
            .structure_ids
            .iter()
            .enumerate()
            .filter(|(_, id)| keep(id))
            .map(|(index, _)| index)
            .collect();

        Self {
            structure_ids: indices
                .iter()
                .map(|&i| self.structure_ids[i].clone())
                .collect(),
            data: self.data.select(Axis(0), &indices),
        }
    }
}

/// Zeroes every cell of `matrix` below `percent`% of its maximum.
pub fn remove_weak_edges(matrix: &Array2<f64>, percent: f64) -> Array2<f64> {
    let cutoff = weak_edge_cutoff(max_of(matrix.iter()), percent);
    matrix.mapv(|v| if v < cutoff { 0.0 } else { v })
}

fn weak_edge_cutoff(max: f64, percent: f64) -> f64 {
    max * percent.clamp(0.0, 100.0) / 100.0
}

fn max_of<'a>(values: impl Iterator<Item = &'a f64>) -> f64 {
    values
        .copied()
        .filter(|v| v.is_finite())
        .fold(0.0, f64::max)
}

fn check_slice(structure: &str, slice: ArrayView2<'_, f64>) -> Result<(), DataIntegrityError> {
    let n = slice.nrows();
    for row in 0..n {
        let diagonal = slice[[row, row]];
        if !diagonal.is_finite() {
            return Err(DataIntegrityError::NonFinite {
                structure: structure.to_string(),
                row: row + 1,
                column: row + 1,
            });
        }
        if diagonal != 0.0 {
            return Err(DataIntegrityError::NonZeroDiagonal {
                structure: structure.to_string(),
                column: row + 1,
                value: diagonal,
            });
        }
        for (offset, &value) in slice.slice(s![row, row + 1..]).iter().enumerate() {
            let column = row + 1 + offset;
            let mirrored = slice[[column, row]];
            if !value.is_finite() || !mirrored.is_finite() {
                return Err(DataIntegrityError::NonFinite {
                    structure: structure.to_string(),
                    row: row + 1,
                    column: column + 1,
                });
            }
            if value != mirrored {
                return Err(DataIntegrityError::Asymmetric {
                    structure: structure.to_string(),
                    row: row + 1,
                    column: column + 1,
                    value,
                    mirrored,
                });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn tensor() -> MultiNetworkTensor {
        MultiNetworkTensor::from_slices(
            vec!["A".to_string(), "B".to_string(), "C".to_string()],
            vec![
                array![[0.0, 2.0, 0.0], [2.0, 0.0, 4.0], [0.0, 4.0, 0.0]],
                array![[0.0, 0.0, 1.0], [0.0, 0.0, 0.0], [1.0, 0.0, 0.0]],
                Array2::zeros((3, 3)),
            ],
            3,
        )
        .unwrap()
    }

    #[test]
    fn from_slices_checks_shapes() {
        assert!(
            MultiNetworkTensor::from_slices(vec!["A".to_string()], vec![Array2::zeros((2, 2))], 3)
                .is_none()
        );
        assert!(MultiNetworkTensor::from_slices(vec!["A".to_string()], vec![], 3).is_none());
        let empty = MultiNetworkTensor::from_slices(vec![], vec![], 4).unwrap();
        assert_eq!(empty.data().dim(), (0, 4, 4));
        assert_eq!(empty.max(), 0.0);
    }

    #[test]
    fn get_uses_one_based_columns() {
        let tensor = tensor();
        assert_eq!(tensor.get("A", 2, 3), Some(4.0));
        assert_eq!(tensor.get("A", 3, 2), Some(4.0));
        assert_eq!(tensor.get("A", 0, 1), None);
        assert_eq!(tensor.get("A", 4, 1), None);
        assert_eq!(tensor.get("Z", 1, 1), None);
        assert_eq!(tensor.num_columns(), 3);
        assert_eq!(tensor.slice("B").unwrap()[[0, 2]], 1.0);
    }

    #[test]
    fn per_structure_normalization_scales_each_max_to_scale() {
        let raw = tensor();
        let normalized = raw.normalized_per_structure(10.0);
        for id in ["A", "B"] {
            let max = normalized
                .slice(id)
                .unwrap()
                .iter()
                .copied()
                .fold(0.0, f64::max);
            assert!((max - 10.0).abs() < 1e-9);
        }
        assert!((normalized.get("A", 1, 2).unwrap() - 5.0).abs() < 1e-9);
        assert!(normalized.slice("C").unwrap().iter().all(|&v| v == 0.0));
        // The source tensor is untouched.
        assert_eq!(raw.get("A", 2, 3), Some(4.0));
    }

    #[test]
    fn global_scaling_uses_tensor_max() {
        let scaled = tensor().scaled_globally(20.0);
        assert!((scaled.get("A", 2, 3).unwrap() - 20.0).abs() < 1e-9);
        assert!((scaled.get("B", 1, 3).unwrap() - 5.0).abs() < 1e-9);

        let zeros = MultiNetworkTensor::zeros(vec!["Z".to_string()], 2);
        assert_eq!(zeros.scaled_globally(10.0), zeros);
    }

    #[test]
    fn sanitized_replaces_non_finite_cells() {
        let tensor = MultiNetworkTensor::from_slices(
            vec!["A".to_string()],
            vec![array![[0.0, f64::NAN], [f64::INFINITY, 0.0]]],
            2,
        )
        .unwrap();
        assert!(!tensor.check_integrity().is_empty());
        let clean = tensor.sanitized();
        assert!(clean.data().iter().all(|v| *v == 0.0));
        assert!(clean.check_integrity().is_empty());
    }

    #[test]
    fn check_integrity_reports_violating_structures() {
        let tensor = MultiNetworkTensor::from_slices(
            vec!["SYM".to_string(), "ASYM".to_string(), "DIAG".to_string()],
            vec![
                array![[0.0, 1.0], [1.0, 0.0]],
                array![[0.0, 1.0], [2.0, 0.0]],
                array![[0.0, 0.0], [0.0, 3.0]],
            ],
            2,
        )
        .unwrap();
        let errors = tensor.check_integrity();
        assert_eq!(errors.len(), 2);
        assert_eq!(
            errors[0],
            DataIntegrityError::Asymmetric {
                structure: "ASYM".to_string(),
                row: 1,
                column: 2,
                value: 1.0,
                mirrored: 2.0
            }
        );
        assert_eq!(
            errors[1],
            DataIntegrityError::NonZeroDiagonal {
                structure: "DIAG".to_string(),
                column: 2,
                value: 3.0
            }
        );
        assert_eq!(errors[1].structure(), "DIAG");
    }

    #[test]
    fn subset_and_without_keep_tensor_order() {
        let tensor = tensor();
        let subset = tensor.subset(["C", "A", "missing"]);
        assert_eq!(subset.structure_ids(), &["A", "C"]);
        assert_eq!(subset.get("A", 2, 3), Some(4.0));
        assert_eq!(subset.data().dim(), (2, 3, 3));

        let rest = tensor.without(["A"]);
        assert_eq!(rest.structure_ids(), &["B", "C"]);
        assert_eq!(rest.get("B", 1, 3), Some(1.0));
    }

    #[test]
    fn remove_weak_edges_zeroes_cells_below_cutoff() {
        let matrix = array![[0.0, 1.0, 5.0], [1.0, 0.0, 10.0], [5.0, 10.0, 0.0]];
        let pruned = remove_weak_edges(&matrix, 50.0);
        assert_eq!(pruned, array![[0.0, 0.0, 5.0], [0.0, 0.0, 10.0], [5.0, 10.0, 0.0]]);
        let cutoff = 10.0 * 0.5;
        assert!(pruned.iter().all(|&v| v == 0.0 || v >= cutoff));
        assert_eq!(remove_weak_edges(&matrix, 0.0), matrix);
    }

    #[test]
    fn tensor_weak_edge_removal_uses_global_maximum() {
        let pruned = tensor().remove_weak_edges(30.0);
        // Global max is 4, so the cutoff is 1.2.
        assert_eq!(pruned.get("A", 1, 2), Some(2.0));
        assert_eq!(pruned.get("B", 1, 3), Some(0.0));
    }
}
