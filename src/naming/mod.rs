//! Project names: sanitization, validation and naming-convention variants.

use std::collections::BTreeMap;
use std::fmt;

use crate::error::ScaffoldError;

/// A naming convention a project name can be spelled in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum NameStyle {
    /// `blog-platform`
    Kebab,
    /// `blog_platform`
    Snake,
    /// `Blog Platform`
    Title,
    /// `BlogPlatform`
    Pascal,
}

impl NameStyle {
    /// Every style, in substitution priority order.
    pub const ALL: [NameStyle; 4] = [Self::Kebab, Self::Snake, Self::Title, Self::Pascal];

    /// Lowercase label used in output.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Kebab => "kebab",
            Self::Snake => "snake",
            Self::Title => "title",
            Self::Pascal => "pascal",
        }
    }
}

/// Lowercases `raw`, replaces every character outside `[a-z0-9_-]` with a
/// hyphen, collapses hyphen runs and trims leading/trailing `-` and `_`.
#[must_use]
pub fn sanitize_name(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.to_lowercase().chars() {
        let c = if c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '-' {
            c
        } else {
            '-'
        };
        if c == '-' && out.ends_with('-') {
            continue;
        }
        out.push(c);
    }
    out.trim_matches(|c| c == '-' || c == '_').to_string()
}

/// Checks that `name` is a usable project name.
///
/// # Errors
///
/// Returns [`ScaffoldError::InvalidName`] unless the name is non-empty,
/// starts with a lowercase letter, ends with a letter or digit, and contains
/// only lowercase letters, digits, hyphens and underscores.
pub fn validate_name(name: &str) -> Result<(), ScaffoldError> {
    let invalid = |reason: &str| ScaffoldError::InvalidName {
        name: name.to_string(),
        reason: reason.to_string(),
    };

    let Some(first) = name.chars().next() else {
        return Err(invalid("name is empty"));
    };
    if !first.is_ascii_lowercase() {
        return Err(invalid("must start with a lowercase letter"));
    }
    let allowed = |c: char| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_';
    if let Some(bad) = name.chars().find(|c| !allowed(*c)) {
        return Err(invalid(&format!(
            "contains {bad:?}; only lowercase letters, digits, '-' and '_' are allowed"
        )));
    }
    if name.ends_with(['-', '_']) {
        return Err(invalid("must end with a letter or digit"));
    }
    Ok(())
}

/// A sanitized, validated project name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProjectName(String);

impl ProjectName {
    /// Sanitizes and validates raw user input.
    ///
    /// # Errors
    ///
    /// Returns [`ScaffoldError::InvalidName`] if sanitization leaves an
    /// empty or still-invalid name.
    pub fn parse(raw: &str) -> Result<Self, ScaffoldError> {
        let sanitized = sanitize_name(raw);
        validate_name(&sanitized).map_err(|err| match err {
            ScaffoldError::InvalidName { reason, .. } => ScaffoldError::InvalidName {
                name: raw.to_string(),
                reason: format!("sanitized to {sanitized:?}, which {reason}"),
            },
            other => other,
        })?;
        Ok(Self(sanitized))
    }

    /// Validates an already-sanitized name without altering it.
    ///
    /// # Errors
    ///
    /// Returns [`ScaffoldError::InvalidName`] if the name is not valid as-is.
    pub fn strict(name: &str) -> Result<Self, ScaffoldError> {
        validate_name(name)?;
        Ok(Self(name.to_string()))
    }

    /// The name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn words(&self) -> impl Iterator<Item = &str> {
        self.0.split(['-', '_']).filter(|w| !w.is_empty())
    }
}

impl fmt::Display for ProjectName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// The spelling of one project name in every [`NameStyle`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameVariantSet {
    variants: BTreeMap<NameStyle, String>,
}

impl NameVariantSet {
    /// Derives all variants from a project name.
    #[must_use]
    pub fn derive(name: &ProjectName) -> Self {
        let words: Vec<&str> = name.words().collect();
        let mut variants = BTreeMap::new();
        variants.insert(NameStyle::Kebab, words.join("-"));
        variants.insert(NameStyle::Snake, words.join("_"));
        let capitalized: Vec<String> = words.iter().map(|w| capitalize(w)).collect();
        variants.insert(NameStyle::Title, capitalized.join(" "));
        variants.insert(NameStyle::Pascal, capitalized.concat());
        Self { variants }
    }

    /// Replaces one variant with an explicit spelling. Empty spellings are
    /// ignored.
    #[must_use]
    pub fn with_override(mut self, style: NameStyle, spelling: impl Into<String>) -> Self {
        let spelling = spelling.into();
        if !spelling.is_empty() {
            self.variants.insert(style, spelling);
        }
        self
    }

    /// The spelling for `style`.
    #[must_use]
    pub fn get(&self, style: NameStyle) -> &str {
        self.variants.get(&style).map_or("", String::as_str)
    }

    /// Iterates `(style, spelling)` pairs in priority order.
    pub fn iter(&self) -> impl Iterator<Item = (NameStyle, &str)> {
        self.variants.iter().map(|(style, s)| (*style, s.as_str()))
    }
}
