use std::collections::HashMap;
use std::sync::Arc;

use slotmap::{new_key_type, SlotMap};
use tracing::debug;

use crate::error::{FuzzyError, FuzzyResult};
use crate::label::Label;
use crate::rules::FuzzyRule;

new_key_type! {
    /// A rule key
    pub struct RuleKey;
}

/// The active rules, unique by label
#[derive(Clone, Debug, Default)]
pub struct Rulebase {
    rules: SlotMap<RuleKey, Arc<FuzzyRule>>,
    by_label: HashMap<Label, RuleKey>,
    // Insertion order; slot order changes once keys get reused
    order: Vec<RuleKey>,
}

impl Rulebase {
    pub fn new() -> Self {
        Rulebase::default()
    }

    /// Fails if a rule with the same label is already present.
    pub fn add_rule(&mut self, rule: FuzzyRule) -> FuzzyResult<RuleKey> {
        if self.by_label.contains_key(rule.label()) {
            return Err(FuzzyError::DuplicateRule(rule.label().clone()));
        }

        debug!(rule = %rule.label(), "adding rule");

        let label = rule.label().clone();
        let key = self.rules.insert(Arc::new(rule));

        self.by_label.insert(label, key);
        self.order.push(key);

        Ok(key)
    }

    /// Fails if no rule has this label.
    pub fn get_rule(&self, label: &Label) -> FuzzyResult<&FuzzyRule> {
        self.by_label
            .get(label)
            .and_then(|key| self.rules.get(*key))
            .map(|rule| &**rule)
            .ok_or_else(|| FuzzyError::MissingRule(label.clone()))
    }

    pub fn get_rule_by_key(&self, key: RuleKey) -> Option<&FuzzyRule> {
        self.rules.get(key).map(|rule| &**rule)
    }

    pub fn contains_rule(&self, label: &Label) -> bool {
        self.by_label.contains_key(label)
    }

    /// Fails if no rule has this label.
    pub fn delete_rule(&mut self, label: &Label) -> FuzzyResult<FuzzyRule> {
        let key = self
            .by_label
            .remove(label)
            .ok_or_else(|| FuzzyError::MissingRule(label.clone()))?;

        debug!(rule = %label, "deleting rule");

        self.order.retain(|k| *k != key);

        let rule = self
            .rules
            .remove(key)
            .ok_or_else(|| FuzzyError::MissingRule(label.clone()))?;

        Ok(Arc::try_unwrap(rule).unwrap_or_else(|shared| FuzzyRule::clone(&shared)))
    }

    pub fn delete_all(&mut self) {
        debug!(count = self.rules.len(), "deleting all rules");

        self.rules.clear();
        self.by_label.clear();
        self.order.clear();
    }

    /// Snapshot of every rule in insertion order. Later changes to the
    /// rulebase don't affect it.
    pub fn get_all_rules(&self) -> Vec<Arc<FuzzyRule>> {
        self.order
            .iter()
            .filter_map(|key| self.rules.get(*key))
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

#[cfg(test)]
fn rule(label: &str) -> FuzzyRule {
    use crate::grammar::{service, Conclusion};
    use crate::rules::Condition;

    let service = service();

    FuzzyRule::builder(label)
        .unwrap()
        .when(Condition::when(service.is("good").unwrap()).build().unwrap())
        .then(Conclusion::new(&service, "good").unwrap())
        .build()
        .unwrap()
}

#[test]
fn test_add_get_delete() {
    let mut rules = Rulebase::new();
    let label = Label::new("first").unwrap();
    let key = rules.add_rule(rule("First")).unwrap();

    assert_eq!(rules.get_rule(&label).unwrap().label(), &label);
    assert_eq!(rules.get_rule_by_key(key).unwrap().label(), &label);
    assert!(rules.contains_rule(&label));
    assert_eq!(rules.add_rule(rule("first")), Err(FuzzyError::DuplicateRule(label.clone())));
    assert_eq!(rules.len(), 1);

    let removed = rules.delete_rule(&label).unwrap();

    assert_eq!(removed.label(), &label);
    assert!(rules.is_empty());
    assert_eq!(rules.get_rule_by_key(key), None);
    assert_eq!(rules.get_rule(&label), Err(FuzzyError::MissingRule(label.clone())));
    assert_eq!(rules.delete_rule(&label), Err(FuzzyError::MissingRule(label)));
}

#[test]
fn test_snapshot() {
    let mut rules = Rulebase::new();

    rules.add_rule(rule("a")).unwrap();
    rules.add_rule(rule("b")).unwrap();
    rules.add_rule(rule("c")).unwrap();
    rules.delete_rule(&Label::new("a").unwrap()).unwrap();
    // Reuses a's slot
    rules.add_rule(rule("d")).unwrap();

    let snapshot = rules.get_all_rules();
    let labels: Vec<&str> = snapshot.iter().map(|rule| rule.label().as_str()).collect();

    assert_eq!(labels, vec!["b", "c", "d"]);

    rules.delete_all();

    assert!(rules.is_empty());
    assert_eq!(snapshot.len(), 3);
}
