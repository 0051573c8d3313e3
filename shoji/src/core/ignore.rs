use regex::Regex;

use super::{ConfigError, IgnoreRuleConfig, WindowIdentity};

/// A compiled (class name, caption) pattern pair.
#[derive(Debug, Clone)]
pub struct IgnoreRule {
    class_name: Regex,
    caption: Regex,
}

impl IgnoreRule {
    pub fn new(class_name: &str, caption: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            class_name: compile(class_name)?,
            caption: compile(caption)?,
        })
    }

    /// Patterns are unanchored: they match anywhere in the text.
    pub fn matches(&self, class_name: &str, caption: &str) -> bool {
        self.class_name.is_match(class_name) && self.caption.is_match(caption)
    }
}

fn compile(pattern: &str) -> Result<Regex, ConfigError> {
    Regex::new(pattern).map_err(|source| ConfigError::InvalidPattern {
        pattern: pattern.to_string(),
        source,
    })
}

/// Windows that must never have their message pipeline intercepted.
/// Immutable once built.
#[derive(Debug, Clone, Default)]
pub struct IgnoreList {
    rules: Vec<IgnoreRule>,
}

impl IgnoreList {
    pub fn from_config(rules: &[IgnoreRuleConfig]) -> Result<Self, ConfigError> {
        let rules = rules
            .iter()
            .map(|r| IgnoreRule::new(&r.class_name, &r.caption))
            .collect::<Result<Vec<_>, _>>()?;
        tracing::info!("Loaded {} subclassing ignore rule(s)", rules.len());
        Ok(Self { rules })
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn is_ignored(&self, window: &WindowIdentity) -> bool {
        self.rules
            .iter()
            .any(|rule| rule.matches(&window.class_name, &window.caption))
    }
}
