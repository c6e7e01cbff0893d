//! Convention checks over parsed metric families.
//!
//! A [`Linter`] is an ordered list of [`Rule`]s. Every rule is a plain function
//! over one family, so rules can be enabled, disabled and tested on their own.

use std::fmt;

use thiserror::Error;

use crate::prom::MetricFamily;

mod rules;
pub use self::rules::BUILTIN_RULES;

/// One lint finding against a metric family.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Problem {
    pub metric: String,
    pub text: String,
}

impl Problem {
    pub fn new(family: &MetricFamily, text: impl Into<String>) -> Self {
        Problem {
            metric: family.name.clone(),
            text: text.into(),
        }
    }
}

impl fmt::Display for Problem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.metric, self.text)
    }
}

pub type RuleFn = fn(&MetricFamily) -> Vec<Problem>;

#[derive(Clone, Copy)]
pub struct Rule {
    pub name: &'static str,
    pub description: &'static str,
    pub check: RuleFn,
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule").field("name", &self.name).finish()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LintConfig {
    /// Names of built-in rules that should not run.
    pub disabled_rules: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LintConfigError {
    #[error("unknown lint rule {0:?}")]
    UnknownRule(String),
}

#[derive(Debug, Clone)]
pub struct Linter {
    rules: Vec<Rule>,
}

impl Default for Linter {
    fn default() -> Self {
        Linter::new(BUILTIN_RULES.to_vec())
    }
}

impl Linter {
    pub fn new(rules: Vec<Rule>) -> Self {
        Linter { rules }
    }

    /// Build a linter with every built-in rule except the disabled ones.
    pub fn from_config(config: &LintConfig) -> Result<Self, LintConfigError> {
        for name in &config.disabled_rules {
            if !BUILTIN_RULES.iter().any(|rule| rule.name == name) {
                return Err(LintConfigError::UnknownRule(name.clone()));
            }
        }
        let rules = BUILTIN_RULES
            .iter()
            .filter(|rule| !config.disabled_rules.iter().any(|d| d == rule.name))
            .copied()
            .collect();
        Ok(Linter::new(rules))
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Run every rule over every family.
    ///
    /// Problems come out in family order, then rule order. An empty result
    /// means the input is clean.
    pub fn lint(&self, families: &[MetricFamily]) -> Vec<Problem> {
        let problems: Vec<Problem> = families
            .iter()
            .flat_map(|family| self.rules.iter().flat_map(move |rule| (rule.check)(family)))
            .collect();
        log::debug!(
            "ran {} rules over {} families: {} problems",
            self.rules.len(),
            families.len(),
            problems.len()
        );
        problems
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prom::{parse, MetricType, Sample};

    fn no_help_counter() -> MetricFamily {
        MetricFamily::new("requests", MetricType::Counter).with_sample(Sample::new("requests", 1.0))
    }

    #[test]
    fn problems_follow_family_then_rule_order() {
        let families = parse("# TYPE b_count gauge\nb_count 1\n# TYPE a counter\na 1\n").unwrap();
        let problems: Vec<String> = Linter::default()
            .lint(&families)
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(
            problems,
            vec![
                "b_count no help text",
                "b_count non-histogram and non-summary metrics should not have \"_count\" suffix",
                "a no help text",
                "a counter metrics should have \"_total\" suffix",
            ]
        );
    }

    #[test]
    fn lint_is_deterministic() {
        let families = parse("fooBar_ms{someLabel=\"x\"} 1\nbar:baz_total 2\n").unwrap();
        let linter = Linter::default();
        assert_eq!(linter.lint(&families), linter.lint(&families));
    }

    #[test]
    fn disabled_rules_do_not_run() {
        let config = LintConfig {
            disabled_rules: vec!["help".to_string()],
        };
        let linter = Linter::from_config(&config).unwrap();
        assert_eq!(linter.rules().len(), BUILTIN_RULES.len() - 1);
        let problems = linter.lint(&[no_help_counter()]);
        assert_eq!(
            problems,
            vec![Problem {
                metric: "requests".to_string(),
                text: "counter metrics should have \"_total\" suffix".to_string(),
            }]
        );
    }

    #[test]
    fn unknown_rule_in_config_is_rejected() {
        let config = LintConfig {
            disabled_rules: vec!["no-such-rule".to_string()],
        };
        assert_eq!(
            Linter::from_config(&config).unwrap_err(),
            LintConfigError::UnknownRule("no-such-rule".to_string())
        );
    }

    #[test]
    fn custom_rule_list() {
        fn always(family: &MetricFamily) -> Vec<Problem> {
            vec![Problem::new(family, "always complains")]
        }
        let linter = Linter::new(vec![Rule {
            name: "always",
            description: "test rule",
            check: always,
        }]);
        let problems = linter.lint(&[no_help_counter()]);
        assert_eq!(problems.len(), 1);
        assert_eq!(problems[0].to_string(), "requests always complains");
    }

    #[test]
    fn no_families_means_no_problems() {
        assert!(Linter::default().lint(&[]).is_empty());
    }

    #[test]
    fn builtin_rule_names_are_unique() {
        for (i, rule) in BUILTIN_RULES.iter().enumerate() {
            assert!(
                BUILTIN_RULES[i + 1..].iter().all(|r| r.name != rule.name),
                "duplicate rule {}",
                rule.name
            );
        }
    }
}
