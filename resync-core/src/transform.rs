//! Upstream → local content rewriting.
//!
//! A [`RuleSet`] is an ordered list of regex substitutions applied to the
//! whole file content. Every match of a rule is replaced, and each rule sees
//! the output of the rules before it.

use std::borrow::Cow;

use regex::Regex;

use crate::config::RuleSpec;
use crate::error::ConfigError;

/// One compiled `(pattern, replacement)` pair.
///
/// The replacement supports `$1` / `${name}` capture expansion; `$$` is a
/// literal dollar sign.
#[derive(Debug, Clone)]
pub struct TransformRule {
    pattern: Regex,
    replacement: String,
}

impl TransformRule {
    pub fn new(pattern: &str, replacement: impl Into<String>) -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: Regex::new(pattern)?,
            replacement: replacement.into(),
        })
    }

    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    pub fn replacement(&self) -> &str {
        &self.replacement
    }

    fn apply<'a>(&self, content: &'a str) -> Cow<'a, str> {
        self.pattern.replace_all(content, self.replacement.as_str())
    }
}

/// Ordered rule list. Order is significant.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<TransformRule>,
}

impl RuleSet {
    pub fn new(rules: Vec<TransformRule>) -> Self {
        Self { rules }
    }

    /// Compile rules from their configured form, preserving order.
    pub fn from_specs(specs: &[RuleSpec]) -> Result<Self, ConfigError> {
        let rules = specs
            .iter()
            .enumerate()
            .map(|(index, spec)| {
                TransformRule::new(&spec.pattern, spec.replacement.clone()).map_err(|source| {
                    ConfigError::InvalidPattern {
                        index,
                        pattern: spec.pattern.clone(),
                        source,
                    }
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { rules })
    }

    /// Rewrite `content` through every rule in order.
    pub fn transform(&self, content: &str) -> String {
        let mut current = content.to_owned();
        for rule in &self.rules {
            let rewritten = match rule.apply(&current) {
                Cow::Borrowed(_) => None,
                Cow::Owned(rewritten) => Some(rewritten),
            };
            if let Some(rewritten) = rewritten {
                current = rewritten;
            }
        }
        current
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TransformRule> {
        self.rules.iter()
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn rules(pairs: &[(&str, &str)]) -> RuleSet {
        let specs: Vec<RuleSpec> = pairs
            .iter()
            .map(|(p, r)| RuleSpec {
                pattern: p.to_string(),
                replacement: r.to_string(),
            })
            .collect();
        RuleSet::from_specs(&specs).expect("compile rules")
    }

    #[rstest]
    #[case("use cocoindex_utils::prelude;", "use recoco_utils::prelude;")]
    #[case(
        "cocoindex_utils::a(); cocoindex_utils::b();",
        "recoco_utils::a(); recoco_utils::b();"
    )]
    #[case(
        "use cocoindex_extra_text::split;\nuse cocoindex_utils::x;\n",
        "use recoco_splitters::split;\nuse recoco_utils::x;\n"
    )]
    #[case("fn untouched() {}", "fn untouched() {}")]
    fn default_style_rules_rewrite_every_occurrence(#[case] input: &str, #[case] expected: &str) {
        let set = rules(&[
            ("cocoindex_utils", "recoco_utils"),
            ("cocoindex_extra_text", "recoco_splitters"),
        ]);
        assert_eq!(set.transform(input), expected);
    }

    #[test]
    fn later_rules_see_earlier_output() {
        let set = rules(&[("alpha", "beta"), ("beta", "gamma")]);
        assert_eq!(set.transform("alpha beta"), "gamma gamma");

        let reversed = rules(&[("beta", "gamma"), ("alpha", "beta")]);
        assert_eq!(reversed.transform("alpha beta"), "beta gamma");
    }

    #[test]
    fn patterns_match_across_lines() {
        let set = rules(&[(r"(?s)/\* begin \*/.*?/\* end \*/", "/* stripped */")]);
        let input = "a\n/* begin */\nline 1\nline 2\n/* end */\nb\n";
        assert_eq!(set.transform(input), "a\n/* stripped */\nb\n");
    }

    #[test]
    fn capture_groups_expand_in_replacement() {
        let set = rules(&[(r"cocoindex_(\w+)", "recoco_$1")]);
        assert_eq!(set.transform("cocoindex_utils"), "recoco_utils");
    }

    #[test]
    fn transform_is_pure_and_reaches_fixed_point() {
        let set = rules(&[("cocoindex_utils", "recoco_utils")]);
        let input = "use cocoindex_utils::*;";
        let once = set.transform(input);
        assert_eq!(set.transform(input), once);
        assert_eq!(set.transform(&once), once);
    }

    #[test]
    fn empty_rule_set_is_identity() {
        let set = RuleSet::default();
        assert!(set.is_empty());
        assert_eq!(set.transform("anything"), "anything");
    }

    #[test]
    fn invalid_pattern_reports_rule_index() {
        let specs = vec![
            RuleSpec {
                pattern: "ok".into(),
                replacement: "fine".into(),
            },
            RuleSpec {
                pattern: "(unclosed".into(),
                replacement: "x".into(),
            },
        ];
        let err = RuleSet::from_specs(&specs).unwrap_err();
        match err {
            ConfigError::InvalidPattern { index, pattern, .. } => {
                assert_eq!(index, 1);
                assert_eq!(pattern, "(unclosed");
            }
            other => panic!("expected invalid pattern, got {other:?}"),
        }
    }
}
