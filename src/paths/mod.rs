//! Path selection for the `paths` and `ignore_paths` source options.
//!
//! A pattern selects a file when it matches as a shell glob or when it names
//! a directory containing the file. Globs use filesystem semantics: `*` and
//! `?` never cross a `/`, so `terraform/*.tf` does not reach into
//! subdirectories, while `terraform/` selects everything beneath it.
//!
//! The accepted dialect is the shell one: `*` matches within one path
//! segment however many stars are written, `[^...]` negates a class, and a
//! backslash makes the next character literal. Patterns are rewritten into
//! the `glob` crate's syntax when compiled.

use std::fmt;
use std::iter::Peekable;
use std::str::Chars;

use glob::{MatchOptions, Pattern};

use crate::error::ConfigError;


const SEPARATOR: char = '/';

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// Compiled `paths` / `ignore_paths` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    raw: String,
    glob: Pattern,
}

impl PathPattern {
    /// Compiles a pattern.
    ///
    /// Runs of `*` behave like a single `*`, so `**` never descends into
    /// subdirectories. `\*` matches a literal star.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidPattern`] when the glob is malformed,
    /// for example an unterminated `[` class or a trailing backslash.
    pub fn parse(pattern: &str) -> Result<Self, ConfigError> {
        let invalid = |message: String| ConfigError::InvalidPattern {
            pattern: pattern.to_owned(),
            message,
        };
        let translated = to_glob_syntax(pattern).map_err(invalid)?;
        let glob = Pattern::new(&translated).map_err(|error| invalid(error.to_string()))?;
        Ok(Self {
            raw: pattern.to_owned(),
            glob,
        })
    }

    /// Returns the pattern as written in the source configuration.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.raw.as_str()
    }

    /// Returns true when `path` matches the glob or lies inside the
    /// directory the pattern names.
    #[must_use]
    pub fn matches(&self, path: &str) -> bool {
        self.glob.matches_with(path, MATCH_OPTIONS) || is_inside_path(&self.raw, path)
    }
}

impl fmt::Display for PathPattern {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.raw)
    }
}

/// Rewrites a shell pattern into `glob` crate syntax.
fn to_glob_syntax(pattern: &str) -> Result<String, String> {
    let mut translated = String::with_capacity(pattern.len());
    let mut chars = pattern.chars().peekable();
    while let Some(current) = chars.next() {
        match current {
            '*' => {
                while chars.next_if_eq(&'*').is_some() {}
                translated.push('*');
            }
            '\\' => {
                let escaped = chars
                    .next()
                    .ok_or_else(|| "pattern ends with a backslash".to_owned())?;
                push_literal(&mut translated, escaped);
            }
            '[' => push_class(&mut chars, &mut translated)?,
            other => translated.push(other),
        }
    }
    Ok(translated)
}

/// `glob` has no escape character; metacharacters become one-member classes.
fn push_literal(translated: &mut String, literal: char) {
    if matches!(literal, '*' | '?' | '[') {
        translated.push('[');
        translated.push(literal);
        translated.push(']');
    } else {
        translated.push(literal);
    }
}

/// Translates a character class whose opening `[` was already consumed.
///
/// `glob` negates with `!` and has no escapes: a literal `]` must come first
/// and a literal `-` last.
fn push_class(chars: &mut Peekable<Chars<'_>>, translated: &mut String) -> Result<(), String> {
    let negated = chars.next_if_eq(&'^').is_some();
    let mut members = String::new();
    let mut literal_bracket = false;
    let mut literal_dash = false;
    loop {
        match chars.next() {
            None => return Err("unterminated character class".to_owned()),
            Some(']') => break,
            Some('\\') => match chars.next() {
                None => return Err("pattern ends with a backslash".to_owned()),
                Some(']') => literal_bracket = true,
                Some('-') => literal_dash = true,
                Some(escaped) => members.push(escaped),
            },
            Some(member) => members.push(member),
        }
    }
    if members.is_empty() && !literal_bracket && !literal_dash {
        return Err("empty character class".to_owned());
    }
    if !negated && !literal_bracket && !literal_dash && members == "!" {
        translated.push('!');
        return Ok(());
    }
    if !negated && !literal_bracket && members.starts_with('!') && !members.starts_with("!-") {
        members.remove(0);
        members.push('!');
    }

    translated.push('[');
    if negated {
        translated.push('!');
    }
    if literal_bracket {
        translated.push(']');
    }
    translated.push_str(&members);
    if literal_dash {
        translated.push('-');
    }
    translated.push(']');
    Ok(())
}

/// Checks whether `child` is `parent` itself or lies beneath it.
///
/// `foo/bar/baz` is inside `foo/bar`, but `foo/barbar` is not. `foo` is not
/// inside `foo/`: a trailing separator on the parent only ever matches
/// descendants.
#[must_use]
pub fn is_inside_path(parent: &str, child: &str) -> bool {
    if parent == child {
        return true;
    }
    child.strip_prefix(parent).is_some_and(|rest| {
        parent.ends_with(SEPARATOR) || rest.starts_with(SEPARATOR)
    })
}

/// Keeps the paths selected by `pattern`, preserving order.
#[must_use]
pub fn select_matching<'a, I>(paths: I, pattern: &PathPattern) -> Vec<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    paths
        .into_iter()
        .filter(|path| pattern.matches(path))
        .collect()
}

/// Keeps the paths not selected by `pattern`, preserving order.
#[must_use]
pub fn select_non_matching<'a, I>(paths: I, pattern: &PathPattern) -> Vec<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    paths
        .into_iter()
        .filter(|path| !pattern.matches(path))
        .collect()
}
