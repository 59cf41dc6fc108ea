//! Mean, sample standard deviation and standard error of the mean
//!
//! Values are grouped into named datasets. Each dataset is summarised on its
//! own; switching the active dataset never touches the others.

use serde::Serialize;

/// Summary of one list of values
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct SampleSummary {
    pub n: usize,
    /// Σv, zero for an empty list
    pub sum: f64,
    pub mean: Option<f64>,
    /// Bessel-corrected (n − 1) standard deviation
    pub sample_std_dev: Option<f64>,
    /// sample_std_dev / √n
    pub standard_error: Option<f64>,
}

/// Summarise `values`
///
/// `mean` needs at least one value; the standard deviation and standard error
/// need at least two.
pub fn summarize(values: &[f64]) -> SampleSummary {
    let n = values.len();
    if n == 0 {
        return SampleSummary::default();
    }

    let count = n as f64;
    let sum: f64 = values.iter().sum();
    let mean = sum / count;

    let (sample_std_dev, standard_error) = if n >= 2 {
        let ss: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
        let sd = (ss / (count - 1.0)).sqrt();
        (Some(sd), Some(sd / count.sqrt()))
    } else {
        (None, None)
    };

    SampleSummary {
        n,
        sum,
        mean: Some(mean),
        sample_std_dev,
        standard_error,
    }
}

/// Identifier of a value inside a dataset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ValueId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SampleValue {
    pub id: ValueId,
    pub v: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SampleDataset {
    pub id: u64,
    pub name: String,
    pub values: Vec<SampleValue>,
}

impl SampleDataset {
    fn new(id: u64, index: usize) -> Self {
        Self {
            id,
            name: format!("Dataset {}", index),
            values: Vec::new(),
        }
    }

    pub fn raw_values(&self) -> Vec<f64> {
        self.values.iter().map(|s| s.v).collect()
    }

    pub fn summary(&self) -> SampleSummary {
        summarize(&self.raw_values())
    }
}

/// Tab-like collection of datasets with one active at a time
///
/// Never empty: there is always at least one dataset.
#[derive(Debug, Clone)]
pub struct Datasets {
    datasets: Vec<SampleDataset>,
    active: usize,
    next_id: u64,
}

impl Default for Datasets {
    fn default() -> Self {
        Self::new()
    }
}

impl Datasets {
    pub fn new() -> Self {
        let mut datasets = Self {
            datasets: Vec::new(),
            active: 0,
            next_id: 0,
        };
        let id = datasets.allocate();
        datasets.datasets.push(SampleDataset::new(id, 1));
        datasets
    }

    fn allocate(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    pub fn len(&self) -> usize {
        self.datasets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.datasets.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SampleDataset> {
        self.datasets.iter()
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    pub fn active(&self) -> &SampleDataset {
        &self.datasets[self.active]
    }

    fn active_mut(&mut self) -> &mut SampleDataset {
        &mut self.datasets[self.active]
    }

    /// Append a new auto-numbered dataset and make it active
    pub fn add_dataset(&mut self) -> usize {
        let id = self.allocate();
        let index = self.datasets.len();
        self.datasets.push(SampleDataset::new(id, index + 1));
        self.active = index;
        index
    }

    /// Switch the active dataset; out-of-range indexes are ignored
    pub fn select(&mut self, index: usize) -> bool {
        if index < self.datasets.len() {
            self.active = index;
            true
        } else {
            false
        }
    }

    /// Add a value to the active dataset; non-finite values are rejected
    pub fn add_value(&mut self, v: f64) -> Option<ValueId> {
        if !v.is_finite() {
            return None;
        }
        let id = ValueId(self.allocate());
        self.active_mut().values.push(SampleValue { id, v });
        Some(id)
    }

    pub fn edit_value(&mut self, id: ValueId, v: f64) -> bool {
        if !v.is_finite() {
            return false;
        }
        match self.active_mut().values.iter_mut().find(|s| s.id == id) {
            Some(sample) => {
                sample.v = v;
                true
            }
            None => false,
        }
    }

    pub fn delete_value(&mut self, id: ValueId) -> bool {
        let values = &mut self.active_mut().values;
        let before = values.len();
        values.retain(|s| s.id != id);
        values.len() != before
    }

    /// Empty the active dataset but keep it
    pub fn clear_active(&mut self) {
        self.active_mut().values.clear();
    }

    /// Back to a single fresh dataset
    pub fn reset_all(&mut self) {
        let id = self.allocate();
        self.datasets = vec![SampleDataset::new(id, 1)];
        self.active = 0;
    }

    pub fn summary(&self, index: usize) -> Option<SampleSummary> {
        self.datasets.get(index).map(SampleDataset::summary)
    }

    pub fn active_summary(&self) -> SampleSummary {
        self.active().summary()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summarize_empty() {
        assert_eq!(
            summarize(&[]),
            SampleSummary {
                n: 0,
                sum: 0.0,
                mean: None,
                sample_std_dev: None,
                standard_error: None,
            }
        );
    }

    #[test]
    fn test_summarize_single_value() {
        let s = summarize(&[7.5]);
        assert_eq!(s.n, 1);
        assert_eq!(s.mean, Some(7.5));
        assert!(s.sample_std_dev.is_none());
        assert!(s.standard_error.is_none());
    }

    #[test]
    fn test_summarize_known_values() {
        let s = summarize(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
        assert_eq!(s.n, 8);
        assert_eq!(s.sum, 40.0);
        assert_eq!(s.mean, Some(5.0));
        assert!((s.sample_std_dev.unwrap() - 2.138089935).abs() < 1e-6);
        assert!((s.standard_error.unwrap() - 0.755928946).abs() < 1e-6);
    }

    #[test]
    fn test_summarize_identical_values() {
        let s = summarize(&[3.0, 3.0, 3.0]);
        assert_eq!(s.sample_std_dev, Some(0.0));
        assert_eq!(s.standard_error, Some(0.0));
    }

    #[test]
    fn test_datasets_start_with_one() {
        let sets = Datasets::new();
        assert_eq!(sets.len(), 1);
        assert_eq!(sets.active().name, "Dataset 1");
        assert_eq!(sets.active_summary().n, 0);
    }

    #[test]
    fn test_add_dataset_numbers_and_activates() {
        let mut sets = Datasets::new();
        assert_eq!(sets.add_dataset(), 1);
        assert_eq!(sets.active_index(), 1);
        assert_eq!(sets.active().name, "Dataset 2");
    }

    #[test]
    fn test_datasets_are_independent() {
        let mut sets = Datasets::new();
        sets.add_value(1.0);
        sets.add_value(3.0);
        sets.add_dataset();
        sets.add_value(10.0);

        assert_eq!(sets.summary(0).unwrap().mean, Some(2.0));
        assert_eq!(sets.summary(1).unwrap().mean, Some(10.0));

        assert!(sets.select(0));
        assert_eq!(sets.active().values.len(), 2);
        assert_eq!(sets.summary(1).unwrap().n, 1);
        assert!(!sets.select(5));
        assert_eq!(sets.active_index(), 0);
    }

    #[test]
    fn test_edit_and_delete_values() {
        let mut sets = Datasets::new();
        let a = sets.add_value(1.0).unwrap();
        let b = sets.add_value(2.0).unwrap();
        assert!(sets.edit_value(a, 4.0));
        assert!(sets.delete_value(b));
        assert!(!sets.delete_value(ValueId(999)));
        assert!(!sets.edit_value(ValueId(999), 1.0));
        assert_eq!(sets.active().raw_values(), vec![4.0]);
    }

    #[test]
    fn test_rejects_non_finite_values() {
        let mut sets = Datasets::new();
        assert!(sets.add_value(f64::NAN).is_none());
        let a = sets.add_value(1.0).unwrap();
        assert!(!sets.edit_value(a, f64::INFINITY));
        assert_eq!(sets.active().raw_values(), vec![1.0]);
    }

    #[test]
    fn test_clear_keeps_dataset() {
        let mut sets = Datasets::new();
        let a = sets.add_value(1.0).unwrap();
        sets.delete_value(a);
        assert_eq!(sets.len(), 1);
        sets.add_value(2.0);
        sets.clear_active();
        assert_eq!(sets.len(), 1);
        assert_eq!(sets.active_summary().n, 0);
    }

    #[test]
    fn test_reset_all() {
        let mut sets = Datasets::new();
        sets.add_dataset();
        sets.add_dataset();
        sets.add_value(1.0);
        sets.reset_all();
        assert_eq!(sets.len(), 1);
        assert_eq!(sets.active_index(), 0);
        assert_eq!(sets.active().name, "Dataset 1");
        assert!(sets.active().values.is_empty());
    }
}
