//! core::merge
//!
//! Combine invocation options with persisted settings and schema defaults.
//!
//! # Precedence
//!
//! For every key the schema declares, the final value is taken from the
//! first source that has one:
//!
//! 1. The classified invocation options
//! 2. The persisted setting for that key
//! 3. The schema's declared default
//!
//! A key with none of these is absent from the result. Persisted values
//! for keys the schema does not declare are ignored.
//!
//! Order sensitivity is settled during classification; the merger treats
//! classified keys uniformly.

use std::collections::BTreeMap;

use super::classify::{classify, ClassifyError};
use super::schema::{OptionBag, OptionSchema, OptionValue};

/// Merge persisted values and invocation tokens into the final option bag.
///
/// # Errors
///
/// Propagates any [`ClassifyError`] from classifying `invocation_tokens`.
///
/// # Example
///
/// ```
/// use std::collections::BTreeMap;
/// use lets::core::merge::merge;
/// use lets::core::schema::{OptionDef, OptionSchema, OptionValue};
///
/// let schema = OptionSchema::new(vec![
///     OptionDef::toggle("clean"),
///     OptionDef::keyed("flavor").with_default("debug"),
/// ])
/// .unwrap();
///
/// let mut persisted = BTreeMap::new();
/// persisted.insert("flavor".to_string(), OptionValue::text("release"));
///
/// let bag = merge(&schema, &persisted, &["clean".to_string()]).unwrap();
/// assert!(bag.flag("clean"));
/// assert_eq!(bag.text("flavor"), Some("release"));
/// ```
pub fn merge(
    schema: &OptionSchema,
    persisted: &BTreeMap<String, OptionValue>,
    invocation_tokens: &[String],
) -> Result<OptionBag, ClassifyError> {
    let invoked = classify(invocation_tokens, schema)?;
    Ok(overlay(schema, persisted, &invoked))
}

/// Apply the three-tier override chain to already-classified options.
pub fn overlay(
    schema: &OptionSchema,
    persisted: &BTreeMap<String, OptionValue>,
    invoked: &OptionBag,
) -> OptionBag {
    schema
        .iter()
        .filter_map(|def| {
            invoked
                .get(&def.key)
                .or_else(|| persisted.get(&def.key))
                .or(def.default.as_ref())
                .map(|value| (def.key.clone(), value.clone()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::schema::OptionDef;

    fn tokens(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    fn persisted(pairs: &[(&str, &str)]) -> BTreeMap<String, OptionValue> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), OptionValue::text(*v)))
            .collect()
    }

    mod precedence {
        use super::*;

        fn schema() -> OptionSchema {
            OptionSchema::new(vec![OptionDef::keyed("k").with_default("v3")]).unwrap()
        }

        #[test]
        fn invocation_beats_everything() {
            let bag = merge(&schema(), &persisted(&[("k", "v2")]), &tokens(&["k", "v1"])).unwrap();
            assert_eq!(bag.text("k"), Some("v1"));
        }

        #[test]
        fn persisted_beats_default() {
            let bag = merge(&schema(), &persisted(&[("k", "v2")]), &[]).unwrap();
            assert_eq!(bag.text("k"), Some("v2"));
        }

        #[test]
        fn default_is_last_resort() {
            let bag = merge(&schema(), &BTreeMap::new(), &[]).unwrap();
            assert_eq!(bag.text("k"), Some("v3"));
        }

        #[test]
        fn nothing_leaves_key_absent() {
            let schema = OptionSchema::new(vec![OptionDef::keyed("k")]).unwrap();
            let bag = merge(&schema, &BTreeMap::new(), &[]).unwrap();
            assert!(!bag.contains("k"));
            assert!(bag.is_empty());
        }
    }

    mod scenario {
        use super::*;

        fn schema() -> OptionSchema {
            OptionSchema::new(vec![
                OptionDef::toggle("clean"),
                OptionDef::keyed("flavor").with_default("debug"),
            ])
            .unwrap()
        }

        #[test]
        fn clean_with_persisted_flavor() {
            let bag = merge(&schema(), &persisted(&[("flavor", "debug")]), &tokens(&["clean"]))
                .unwrap();
            assert_eq!(bag.get("clean"), Some(&OptionValue::Flag(true)));
            assert_eq!(bag.text("flavor"), Some("debug"));
            assert_eq!(bag.len(), 2);
        }

        #[test]
        fn flavor_override_without_clean() {
            let bag = merge(
                &schema(),
                &persisted(&[("flavor", "debug")]),
                &tokens(&["flavor", "release"]),
            )
            .unwrap();
            assert!(!bag.contains("clean"));
            assert_eq!(bag.text("flavor"), Some("release"));
        }
    }

    #[test]
    fn undeclared_persisted_keys_are_ignored() {
        let schema = OptionSchema::new(vec![OptionDef::toggle("clean")]).unwrap();
        let bag = merge(&schema, &persisted(&[("flavor", "release")]), &[]).unwrap();
        assert!(bag.is_empty());
    }

    #[test]
    fn classification_errors_bubble_up() {
        let schema = OptionSchema::new(vec![OptionDef::toggle("clean")]).unwrap();
        let err = merge(&schema, &BTreeMap::new(), &tokens(&["--bogus"])).unwrap_err();
        assert_eq!(err, ClassifyError::UnrecognizedOption("--bogus".into()));
    }

    #[test]
    fn persisted_false_toggle_survives_without_invocation() {
        let schema = OptionSchema::new(vec![OptionDef::toggle("clean")]).unwrap();
        let mut stored = BTreeMap::new();
        stored.insert("clean".to_string(), OptionValue::Flag(false));
        let bag = merge(&schema, &stored, &[]).unwrap();
        assert_eq!(bag.get("clean"), Some(&OptionValue::Flag(false)));

        let bag = merge(&schema, &stored, &tokens(&["clean"])).unwrap();
        assert!(bag.flag("clean"));
    }
}
