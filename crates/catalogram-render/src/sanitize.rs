//! Identifier sanitization for the target notations.
//!
//! Sanitization is a pure function of the raw name and the rule set. Two
//! different raw names may sanitize to the same identifier; collisions are
//! not detected or disambiguated.

use std::fmt;
use std::str::FromStr;

use crate::error::RenderError;

/// Token substituted when nothing of a name survives sanitization.
pub const FALLBACK_NAME: &str = "UNKNOWN";

/// Caller-selected identifier quoting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum QuotingRule {
    #[default]
    None,
    QuoteAll,
}

impl QuotingRule {
    pub const ALL: [QuotingRule; 2] = [QuotingRule::None, QuotingRule::QuoteAll];

    pub fn as_str(self) -> &'static str {
        match self {
            QuotingRule::None => "none",
            QuotingRule::QuoteAll => "quote-all",
        }
    }
}

impl fmt::Display for QuotingRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for QuotingRule {
    type Err = RenderError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "none" => Ok(QuotingRule::None),
            "quote-all" | "quote_all" => Ok(QuotingRule::QuoteAll),
            other => Err(RenderError::UnsupportedFormatOption(format!(
                "unknown quoting rule '{other}'"
            ))),
        }
    }
}

/// Per-format identifier rules.
#[derive(Clone, Copy)]
pub struct IdentifierRules {
    allowed: fn(char) -> bool,
    quote: Option<char>,
    fallback: &'static str,
    letter_start: bool,
}

impl IdentifierRules {
    /// Keep characters in the allowed class, replacing runs of others with `_`.
    pub const fn stripping(allowed: fn(char) -> bool) -> Self {
        Self {
            allowed,
            quote: None,
            fallback: FALLBACK_NAME,
            letter_start: false,
        }
    }

    /// Wrap the raw name in `quote`, removing embedded quote characters.
    pub const fn quoting(quote: char) -> Self {
        Self {
            allowed: is_printable,
            quote: Some(quote),
            fallback: FALLBACK_NAME,
            letter_start: false,
        }
    }

    /// Prefix `_` when a stripped identifier would start with a digit.
    pub const fn letter_start(self) -> Self {
        Self {
            letter_start: true,
            ..self
        }
    }

    /// Rules for a notation that supports quoting identifiers with `quote`.
    pub fn for_rule(rule: QuotingRule, allowed: fn(char) -> bool, quote: char) -> Self {
        match rule {
            QuotingRule::None => Self::stripping(allowed),
            QuotingRule::QuoteAll => Self::quoting(quote),
        }
    }

    pub fn sanitize(&self, raw: &str) -> String {
        sanitize(raw, self)
    }

    /// Sanitize each name and join with `", "`.
    pub fn sanitize_list<S: AsRef<str>>(&self, names: &[S]) -> String {
        names
            .iter()
            .map(|name| self.sanitize(name.as_ref()))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Debug for IdentifierRules {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdentifierRules")
            .field("quote", &self.quote)
            .field("fallback", &self.fallback)
            .field("letter_start", &self.letter_start)
            .finish_non_exhaustive()
    }
}

/// Turn an arbitrary catalog name into an identifier valid under `rules`.
pub fn sanitize(raw: &str, rules: &IdentifierRules) -> String {
    match rules.quote {
        Some(quote) => {
            let inner: String = raw
                .chars()
                .filter(|&ch| ch != quote && (rules.allowed)(ch))
                .collect();
            let inner = if inner.is_empty() {
                rules.fallback
            } else {
                inner.as_str()
            };
            format!("{quote}{inner}{quote}")
        }
        None => {
            let mut safe = String::with_capacity(raw.len());
            let mut pending_separator = false;
            for ch in raw.chars() {
                if (rules.allowed)(ch) {
                    if pending_separator && !safe.is_empty() {
                        safe.push('_');
                    }
                    pending_separator = false;
                    safe.push(ch);
                } else {
                    pending_separator = true;
                }
            }
            if safe.is_empty() {
                return rules.fallback.to_string();
            }
            if rules.letter_start && safe.starts_with(|ch: char| ch.is_numeric()) {
                safe.insert(0, '_');
            }
            safe
        }
    }
}

/// Letters, digits and underscore.
pub fn is_word_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}

pub fn is_printable(ch: char) -> bool {
    !ch.is_control()
}

/// Collapse free text onto one line, joining non-blank lines with a space.
pub fn single_line(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Drop every occurrence of the given characters.
pub fn remove_chars(text: &str, forbidden: &[char]) -> String {
    text.chars().filter(|ch| !forbidden.contains(ch)).collect()
}

/// Optional free text, treating blank strings as absent.
pub fn non_blank(text: Option<&str>) -> Option<&str> {
    text.filter(|value| !value.trim().is_empty())
}

/// Data type name without its size or precision suffix.
pub fn base_type_name(data_type: &str) -> String {
    let mut depth = 0_usize;
    let mut base = String::with_capacity(data_type.len());
    for ch in data_type.chars() {
        match ch {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            _ if depth == 0 => base.push(ch),
            _ => {}
        }
    }
    base.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const WORDS: IdentifierRules = IdentifierRules::stripping(is_word_char);

    #[test]
    fn replaces_disallowed_runs_with_single_separator() {
        assert_eq!(WORDS.sanitize("APP.USERS"), "APP_USERS");
        assert_eq!(WORDS.sanitize("order -- items"), "order_items");
        assert_eq!(WORDS.sanitize("_internal"), "_internal");
        assert_eq!(WORDS.sanitize("..trailing.."), "trailing");
    }

    #[test]
    fn falls_back_when_nothing_survives() {
        assert_eq!(WORDS.sanitize(""), FALLBACK_NAME);
        assert_eq!(WORDS.sanitize("!@#$%"), FALLBACK_NAME);
        assert_eq!(IdentifierRules::quoting('"').sanitize("\"\""), "\"UNKNOWN\"");
    }

    #[test]
    fn letter_start_prefixes_leading_digit() {
        let rules = IdentifierRules::stripping(is_word_char).letter_start();
        assert_eq!(rules.sanitize("1st"), "_1st");
        assert_eq!(rules.sanitize("..2nd place"), "_2nd_place");
        assert_eq!(rules.sanitize("first1"), "first1");
        assert_eq!(rules.sanitize("_1"), "_1");
        assert_eq!(rules.sanitize("!!"), FALLBACK_NAME);
        assert_eq!(WORDS.sanitize("1st"), "1st");
    }

    #[test]
    fn keeps_unicode_letters() {
        assert_eq!(WORDS.sanitize("Straße.Größe"), "Straße_Größe");
    }

    #[test]
    fn quote_all_removes_embedded_quotes() {
        let rules = IdentifierRules::for_rule(QuotingRule::QuoteAll, is_word_char, '"');
        assert_eq!(rules.sanitize("O\"BRIEN"), "\"OBRIEN\"");
        assert_eq!(rules.sanitize("APP.USERS"), "\"APP.USERS\"");
    }

    #[test]
    fn sanitize_is_deterministic() {
        let rules = IdentifierRules::for_rule(QuotingRule::None, is_word_char, '"');
        assert_eq!(rules.sanitize("a b"), rules.sanitize("a b"));
    }

    #[test]
    fn parses_quoting_rules() {
        assert_eq!("none".parse::<QuotingRule>().unwrap(), QuotingRule::None);
        assert_eq!(
            "Quote-All".parse::<QuotingRule>().unwrap(),
            QuotingRule::QuoteAll
        );
        assert!(matches!(
            "quote-some".parse::<QuotingRule>(),
            Err(RenderError::UnsupportedFormatOption(_))
        ));
    }

    #[test]
    fn strips_type_size() {
        assert_eq!(base_type_name("character varying(255)"), "character varying");
        assert_eq!(base_type_name("numeric(10, 2)"), "numeric");
        assert_eq!(base_type_name("INTEGER"), "INTEGER");
    }

    #[test]
    fn flattens_multiline_text() {
        assert_eq!(single_line("first\n  second\r\n\nthird "), "first second third");
    }
}
