use std::fmt;

use crate::defuzz::Output;
use crate::label::Label;

/// The crisp results of one `execute` call, one per output subject in the
/// order subjects first appeared among the rules.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Outputs(Vec<Output>);

impl Outputs {
    pub(crate) fn new(outputs: Vec<Output>) -> Self {
        Outputs(outputs)
    }

    /// The crisp value inferred for `subject`, if any rule concluded on it
    pub fn get(&self, subject: &Label) -> Option<f64> {
        self.0
            .iter()
            .find(|output| &output.subject == subject)
            .map(|output| output.value)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Output> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_vec(self) -> Vec<Output> {
        self.0
    }
}

impl<'a> IntoIterator for &'a Outputs {
    type Item = &'a Output;
    type IntoIter = std::slice::Iter<'a, Output>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl IntoIterator for Outputs {
    type Item = Output;
    type IntoIter = std::vec::IntoIter<Output>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl fmt::Display for Outputs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, output) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }

            write!(f, "{output}")?;
        }

        Ok(())
    }
}

#[test]
fn test_lookup() {
    let tip = Label::new("tip").unwrap();
    let outputs = Outputs::new(vec![
        Output {
            subject: tip.clone(),
            value: 13.,
        },
        Output {
            subject: Label::new("bonus").unwrap(),
            value: 2.5,
        },
    ]);

    assert_eq!(outputs.get(&tip), Some(13.));
    assert_eq!(outputs.get(&Label::new("fee").unwrap()), None);
    assert_eq!(outputs.len(), 2);
    assert_eq!(outputs.to_string(), "tip = 13, bonus = 2.5");
    assert_eq!(outputs.iter().map(|o| o.subject.as_str()).collect::<Vec<_>>(), vec!["tip", "bonus"]);
}
