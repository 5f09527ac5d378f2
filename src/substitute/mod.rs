//! Replacing the template's name with the new project's name.
//!
//! Every variant of the old name maps to the same variant of the new name.
//! Matching is longest-rule-first and single-pass: once a rule fires, the
//! text it inserted is never scanned again, so `starter-webapp-frontend`
//! can never be rewritten twice and overlapping variants cannot collide.

use crate::naming::{NameStyle, NameVariantSet};
use crate::template::TemplateFile;

/// One `old -> new` replacement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    /// Text searched for.
    pub old: String,
    /// Text written in its place.
    pub new: String,
    /// Where the rule came from, for logging.
    pub origin: RuleOrigin,
}

/// Source of a [`Rule`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleOrigin {
    /// A naming-convention variant of the project name.
    Name(NameStyle),
    /// The template's description.
    Description,
}

/// An ordered table of replacement rules.
#[derive(Debug, Clone, Default)]
pub struct Substitution {
    rules: Vec<Rule>,
}

impl Substitution {
    /// Builds the rules mapping every variant in `old` to its counterpart in
    /// `new`.
    #[must_use]
    pub fn new(old: &NameVariantSet, new: &NameVariantSet) -> Self {
        let rules = old
            .iter()
            .map(|(style, old_spelling)| Rule {
                old: old_spelling.to_string(),
                new: new.get(style).to_string(),
                origin: RuleOrigin::Name(style),
            })
            .collect();
        Self::from_rules(rules)
    }

    /// Adds a rule replacing the template description.
    #[must_use]
    pub fn with_description(self, old: &str, new: &str) -> Self {
        let mut rules = self.rules;
        rules.push(Rule {
            old: old.to_string(),
            new: new.to_string(),
            origin: RuleOrigin::Description,
        });
        Self::from_rules(rules)
    }

    /// Orders rules longest-first, keeps the first rule for each distinct
    /// `old` string and drops empty and identity rules.
    fn from_rules(mut rules: Vec<Rule>) -> Self {
        // Stable: equal-length rules keep their priority order.
        rules.sort_by(|a, b| b.old.len().cmp(&a.old.len()));
        let mut kept: Vec<Rule> = Vec::with_capacity(rules.len());
        for rule in rules {
            if kept.iter().any(|k| k.old == rule.old) {
                continue;
            }
            kept.push(rule);
        }
        kept.retain(|r| !r.old.is_empty() && r.old != r.new);
        Self { rules: kept }
    }

    /// The active rules, in matching order.
    #[must_use]
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Applies every rule to `text` in one left-to-right pass.
    ///
    /// Returns `None` when nothing matched.
    #[must_use]
    pub fn apply(&self, text: &str) -> Option<String> {
        if self.rules.is_empty() {
            return None;
        }
        let mut out = String::with_capacity(text.len());
        let mut rest = text;
        let mut changed = false;

        while let Some(c) = rest.chars().next() {
            if let Some(rule) = self.rules.iter().find(|r| rest.starts_with(r.old.as_str())) {
                out.push_str(&rule.new);
                rest = &rest[rule.old.len()..];
                changed = true;
            } else {
                out.push(c);
                rest = &rest[c.len_utf8()..];
            }
        }

        changed.then_some(out)
    }

    /// Substitutes a file's text. Binary files pass through untouched.
    ///
    /// Returns the file and whether its contents changed.
    #[must_use]
    pub fn apply_file(&self, mut file: TemplateFile) -> (TemplateFile, bool) {
        let Some(replaced) = file.text().and_then(|text| self.apply(text)) else {
            return (file, false);
        };
        tracing::debug!(path = %file.relative_path.display(), "substituted");
        file.contents = replaced.into_bytes();
        (file, true)
    }
}
