//! Terminal matchers.
//!
//! Every terminal of a grammar is, from the point of view of the recognizer,
//! an opaque capability: given the whole input and a byte offset, it reports
//! where a match starting at that offset ends (if it matches at all). The
//! matchers here never carry mutable state, so one grammar can be shared
//! freely across threads.

use std::collections::BTreeSet;
use std::sync::Arc;

use regex::Regex;

pub trait Recognizer: Send + Sync {
    /// Returns the end offset of the match beginning at `at`, if any.
    ///
    /// `at` is always on a char boundary of `input`; the returned offset must
    /// be one as well.
    fn accept(&self, input: &str, at: usize) -> Option<usize>;
}

impl<F> Recognizer for F where F: Fn(&str, usize) -> Option<usize> + Send + Sync {
    fn accept(&self, input: &str, at: usize) -> Option<usize> {
        self(input, at)
    }
}

/// A named, user-supplied terminal matcher.
///
/// Two blackboxes are the same terminal iff they have the same name.
#[derive(Clone)]
pub struct Blackbox {
    name: String,
    recognizer: Arc<dyn Recognizer>,
}

impl Blackbox {
    pub fn new(name: impl Into<String>, recognizer: impl Recognizer + 'static) -> Self {
        Blackbox { name: name.into(), recognizer: Arc::new(recognizer) }
    }

    /// A blackbox matching exactly one character satisfying `pred`.
    pub fn predicate(name: impl Into<String>, pred: impl Fn(char) -> bool + Send + Sync + 'static) -> Self {
        Blackbox::new(name, move |input: &str, at: usize| {
            let c = input[at..].chars().next()?;
            if pred(c) { Some(at + c.len_utf8()) } else { None }
        })
    }

    pub fn name(&self) -> &str { &self.name }

    pub(crate) fn accept(&self, input: &str, at: usize) -> Option<usize> {
        self.recognizer.accept(input, at)
    }
}

impl std::fmt::Debug for Blackbox {
    fn fmt(&self, w: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(w, "blackbox[{}]", self.name)
    }
}

impl PartialEq for Blackbox {
    fn eq(&self, other: &Self) -> bool { self.name == other.name }
}

impl Eq for Blackbox {}

impl std::hash::Hash for Blackbox {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) { self.name.hash(state) }
}

/// Single-character classes.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub enum CharClass {
    Letters,
    Digits,
    Alphanumerics,
    Whitespace,
    Punctuation,
    /// Any of the listed characters.
    Set(BTreeSet<char>),
    /// Inclusive range.
    Range(char, char),
}

impl CharClass {
    pub fn contains(&self, c: char) -> bool {
        match self {
            CharClass::Letters => c.is_alphabetic(),
            CharClass::Digits => c.is_ascii_digit(),
            CharClass::Alphanumerics => c.is_alphanumeric(),
            CharClass::Whitespace => c.is_whitespace(),
            CharClass::Punctuation => c.is_ascii_punctuation(),
            CharClass::Set(cs) => cs.contains(&c),
            CharClass::Range(lo, hi) => *lo <= c && c <= *hi,
        }
    }

    pub(crate) fn accept(&self, input: &str, at: usize) -> Option<usize> {
        let c = input[at..].chars().next()?;
        if self.contains(c) { Some(at + c.len_utf8()) } else { None }
    }
}

impl From<&str> for CharClass {
    fn from(chars: &str) -> Self { CharClass::Set(chars.chars().collect()) }
}

/// A regular-expression terminal.
///
/// The expression is matched anchored at the offset being tried, but with
/// the rest of the input visible, so look-around assertions such as `\b` see
/// the real neighbouring characters.
#[derive(Clone, Debug)]
pub struct Pattern(Regex);

impl Pattern {
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        Regex::new(pattern).map(Pattern)
    }

    pub fn as_str(&self) -> &str { self.0.as_str() }

    pub(crate) fn accept(&self, input: &str, at: usize) -> Option<usize> {
        // The leftmost match at or after `at` starts at `at` whenever any
        // match starting there exists.
        self.0.find_at(input, at)
            .filter(|m| m.start() == at)
            .map(|m| m.end())
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool { self.as_str() == other.as_str() }
}

impl Eq for Pattern {}

impl std::hash::Hash for Pattern {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) { self.as_str().hash(state) }
}

#[cfg(test)]
#[path = "tests/blackbox.rs"]
mod tests_for_blackbox;
