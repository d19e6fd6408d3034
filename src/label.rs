use std::fmt;
use std::str::FromStr;

use crate::error::{FuzzyError, FuzzyResult};

/// Longest identifier accepted once whitespace has been stripped
pub const MAX_LABEL_LEN: usize = 64;

fn normalize(raw: &str) -> FuzzyResult<String> {
    let normalized: String = raw
        .chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect();

    if normalized.is_empty() {
        return Err(FuzzyError::EmptyLabel);
    }

    if normalized.chars().count() > MAX_LABEL_LEN {
        return Err(FuzzyError::LabelTooLong {
            label: normalized,
            max: MAX_LABEL_LEN,
        });
    }

    Ok(normalized)
}

macro_rules! normalized_identifier {
    ($(#[$outer:meta])* $name:ident) => {
        $(#[$outer])*
        #[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
        pub struct $name(String);

        impl $name {
            /// Lower-cases `raw` and strips all whitespace from it.
            pub fn new(raw: impl AsRef<str>) -> FuzzyResult<Self> {
                normalize(raw.as_ref()).map(Self)
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl FromStr for $name {
            type Err = FuzzyError;

            fn from_str(s: &str) -> FuzzyResult<Self> {
                Self::new(s)
            }
        }

        impl TryFrom<&str> for $name {
            type Error = FuzzyError;

            fn try_from(s: &str) -> FuzzyResult<Self> {
                Self::new(s)
            }
        }

        impl TryFrom<String> for $name {
            type Error = FuzzyError;

            fn try_from(s: String) -> FuzzyResult<Self> {
                Self::new(s)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

normalized_identifier! {
    /// Names a linguistic variable, a rule or a database entry
    Label
}

normalized_identifier! {
    /// Names one fuzzy set inside a linguistic variable, ie "frozen" in "WaterTemp IS frozen"
    FuzzyState
}

#[test]
fn test_normalization() {
    let label = Label::new("  Water Temp\t").unwrap();

    assert_eq!(label.as_str(), "watertemp");
    assert_eq!(label, Label::new("WATERTEMP").unwrap());
    assert_eq!(label.to_string(), "watertemp");

    let state: FuzzyState = "Frozen".parse().unwrap();

    assert_eq!(state, FuzzyState::new("frozen").unwrap());
}

#[test]
fn test_invalid_labels() {
    assert_eq!(Label::new(""), Err(FuzzyError::EmptyLabel));
    assert_eq!(FuzzyState::new(" \n "), Err(FuzzyError::EmptyLabel));
    assert!(matches!(
        Label::new("x".repeat(MAX_LABEL_LEN + 1)),
        Err(FuzzyError::LabelTooLong { max: MAX_LABEL_LEN, .. })
    ));
    assert!(Label::new("x".repeat(MAX_LABEL_LEN)).is_ok());
}
