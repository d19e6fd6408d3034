use std::collections::HashMap;

use tracing::debug;

use crate::error::{FuzzyError, FuzzyResult};
use crate::label::Label;

/// The current crisp value of one input variable
#[derive(Clone, Debug, PartialEq)]
pub struct DataPoint {
    label: Label,
    value: f64,
}

impl DataPoint {
    pub fn label(&self) -> &Label {
        &self.label
    }

    pub fn value(&self) -> f64 {
        self.value
    }
}

fn check_finite(value: f64) -> FuzzyResult<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(FuzzyError::NotFinite(value))
    }
}

/// Crisp facts keyed by variable label, one entry per input variable
#[derive(Clone, Debug, Default)]
pub struct Database {
    data: HashMap<Label, DataPoint>,
    // Insertion order, so snapshots are deterministic
    order: Vec<Label>,
}

impl Database {
    pub fn new() -> Self {
        Database::default()
    }

    /// Fails if `label` is already present.
    pub fn add_variable(&mut self, label: impl AsRef<str>, value: f64) -> FuzzyResult<()> {
        let label = Label::new(label)?;
        let value = check_finite(value)?;

        if self.data.contains_key(&label) {
            return Err(FuzzyError::DuplicateVariable(label));
        }

        debug!(%label, value, "adding variable");

        self.order.push(label.clone());
        self.data.insert(label.clone(), DataPoint { label, value });

        Ok(())
    }

    /// Fails if `label` is absent.
    pub fn update(&mut self, label: impl AsRef<str>, value: f64) -> FuzzyResult<()> {
        let label = Label::new(label)?;
        let value = check_finite(value)?;
        let data_point = self
            .data
            .get_mut(&label)
            .ok_or_else(|| FuzzyError::MissingVariable(label.clone()))?;

        debug!(%label, old = data_point.value, new = value, "updating variable");

        data_point.value = value;

        Ok(())
    }

    /// Fails if `label` is absent.
    pub fn get_data(&self, label: &Label) -> FuzzyResult<&DataPoint> {
        self.data
            .get(label)
            .ok_or_else(|| FuzzyError::MissingVariable(label.clone()))
    }

    pub fn contains_variable(&self, label: impl AsRef<str>) -> bool {
        Label::new(label).map_or(false, |label| self.data.contains_key(&label))
    }

    /// Removes `label` if present.
    pub fn delete_variable(&mut self, label: impl AsRef<str>) -> Option<DataPoint> {
        let label = Label::new(label).ok()?;
        let removed = self.data.remove(&label)?;

        debug!(%label, "deleting variable");

        self.order.retain(|l| *l != label);

        Some(removed)
    }

    pub fn delete_all(&mut self) {
        debug!(count = self.data.len(), "deleting all variables");

        self.data.clear();
        self.order.clear();
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Every current fact in insertion order
    pub fn data_points(&self) -> Vec<DataPoint> {
        self.order
            .iter()
            .filter_map(|label| self.data.get(label))
            .cloned()
            .collect()
    }
}

#[test]
fn test_round_trip() {
    let mut db = Database::new();
    let label = Label::new("Pressure").unwrap();

    db.add_variable(&label, 3000.).unwrap();
    db.update(&label, 3001.).unwrap();

    assert_eq!(db.get_data(&label).unwrap().value(), 3001.);
    assert!(db.contains_variable("pressure"));

    let removed = db.delete_variable(&label).unwrap();

    assert_eq!(removed.label(), &label);
    assert!(!db.contains_variable(&label));
    assert!(db.is_empty());
}

#[test]
fn test_missing_and_duplicate() {
    let mut db = Database::new();
    let label = Label::new("speed").unwrap();

    db.add_variable("Speed", 0.).unwrap();

    assert_eq!(db.add_variable("speed", 1.), Err(FuzzyError::DuplicateVariable(label.clone())));
    // The failed add left the original value alone
    assert_eq!(db.get_data(&label).unwrap().value(), 0.);

    let other = Label::new("torque").unwrap();

    assert_eq!(db.update(&other, 1.), Err(FuzzyError::MissingVariable(other.clone())));
    assert_eq!(db.get_data(&other), Err(FuzzyError::MissingVariable(other.clone())));
    assert_eq!(db.delete_variable(&other), None);
    assert!(matches!(db.update(&label, f64::NAN), Err(FuzzyError::NotFinite(_))));
    assert!(db.add_variable("", 1.).is_err());
    assert!(!db.contains_variable(""));
}

#[test]
fn test_snapshot_order() {
    let mut db = Database::new();

    db.add_variable("b", 2.).unwrap();
    db.add_variable("a", 1.).unwrap();
    db.add_variable("c", 3.).unwrap();
    db.delete_variable("a");

    let labels: Vec<String> = db.data_points().iter().map(|d| d.label().to_string()).collect();

    assert_eq!(labels, vec!["b", "c"]);
    assert_eq!(db.len(), 2);

    db.delete_all();

    assert!(db.is_empty());
    assert!(db.data_points().is_empty());
}
