use crate::blackbox::{Blackbox, CharClass, Pattern};
use crate::normal::Normal;
use crate::GrammarError;

use std::collections::HashSet;

use derive_more::{Display, From};
use once_cell::sync::OnceCell;

// A grammar G is a tuple (Sigma, Delta, A_0, R), where
//   Sigma is a set of terminal matchers,
//   Delta is a finite set of non-terminals,
//   A_0 in Delta is the start non-terminal, and
//   R is a list of productions A -> X_1 ... X_k with A in Delta and each X_i
//   in Sigma or Delta.
//
// The order of R is significant only for picking the "first" of several
// syntax trees; it never affects membership.

#[derive(PartialEq, Eq, PartialOrd, Ord, Clone, Hash, Debug, Display, From)]
pub struct NonTerm(pub(crate) String);

impl NonTerm {
    pub fn name(&self) -> &str { &self.0 }
}

impl From<&str> for NonTerm { fn from(a: &str) -> Self { Self(a.into()) } }

impl AsRef<str> for NonTerm { fn as_ref(&self) -> &str { &self.0 } }

#[derive(PartialEq, Eq, Clone, Hash, Debug)]
pub enum Term {
    Lit(String),
    Class(CharClass),
    Pattern(Pattern),
    Blackbox(Blackbox),
}

impl Term {
    /// End offset of a non-empty match starting at `at`.
    pub(crate) fn accept(&self, input: &str, at: usize) -> Option<usize> {
        let end = match self {
            Term::Lit(s) => if input[at..].starts_with(s.as_str()) { Some(at + s.len()) } else { None },
            Term::Class(class) => class.accept(input, at),
            Term::Pattern(p) => p.accept(input, at),
            Term::Blackbox(bb) => bb.accept(input, at),
        };
        end.filter(|&end| end > at)
    }

    /// The empty literal is the only terminal that matches the empty string.
    pub(crate) fn is_empty(&self) -> bool {
        matches!(self, Term::Lit(s) if s.is_empty())
    }
}

impl From<char> for Term { fn from(c: char) -> Self { Self::Lit(c.into()) } }
impl From<&str> for Term { fn from(s: &str) -> Self { Self::Lit(s.into()) } }
impl From<CharClass> for Term { fn from(c: CharClass) -> Self { Self::Class(c) } }
impl From<Pattern> for Term { fn from(p: Pattern) -> Self { Self::Pattern(p) } }
impl From<Blackbox> for Term { fn from(bb: Blackbox) -> Self { Self::Blackbox(bb) } }

#[derive(PartialEq, Eq, Clone, Hash, Debug, From)]
pub enum Symbol {
    NonTerm(NonTerm),
    Term(Term),
}

impl Symbol {
    pub fn class(class: CharClass) -> Self { Symbol::Term(Term::Class(class)) }

    pub fn pattern(pattern: &str) -> Result<Self, regex::Error> {
        Pattern::new(pattern).map(|p| Symbol::Term(Term::Pattern(p)))
    }

    pub fn blackbox(bb: Blackbox) -> Self { Symbol::Term(Term::Blackbox(bb)) }

    pub(crate) fn nonterm(&self) -> Option<&NonTerm> {
        if let Symbol::NonTerm(nt) = self { Some(nt) } else { None }
    }
}

/// Non-terminal symbol.
pub fn n(name: &str) -> Symbol { Symbol::NonTerm(name.into()) }

/// Literal terminal symbol.
pub fn t(lit: &str) -> Symbol { Symbol::Term(lit.into()) }

#[derive(PartialEq, Eq, Clone, Hash, Debug)]
pub struct Production {
    pub(crate) lhs: NonTerm,
    pub(crate) rhs: Vec<Symbol>,
}

impl Production {
    pub fn new(lhs: impl Into<NonTerm>, rhs: Vec<Symbol>) -> Self {
        Production { lhs: lhs.into(), rhs }
    }

    /// `lhs -> ε`
    pub fn empty(lhs: impl Into<NonTerm>) -> Self {
        Production::new(lhs, vec![])
    }

    /// One production per alternative, in the given order.
    pub fn alternatives(lhs: impl Into<NonTerm>, alts: impl IntoIterator<Item=Vec<Symbol>>) -> Vec<Self> {
        let lhs = lhs.into();
        alts.into_iter().map(|rhs| Production { lhs: lhs.clone(), rhs }).collect()
    }

    pub fn lhs(&self) -> &NonTerm { &self.lhs }
    pub fn rhs(&self) -> &[Symbol] { &self.rhs }
}

/// A context-free grammar.
///
/// The Chomsky normal form used for recognition is computed on first use and
/// then shared by every subsequent call, from any thread.
#[derive(Clone, Debug)]
pub struct Grammar {
    pub(crate) start: NonTerm,
    pub(crate) productions: Vec<Production>,
    normal: OnceCell<Normal>,
}

impl Grammar {
    pub fn new(productions: impl IntoIterator<Item=Production>, start: impl Into<NonTerm>) -> Result<Self, GrammarError> {
        let start = start.into();
        let productions: Vec<Production> = productions.into_iter().collect();
        check_defined(&productions, &start)?;
        Ok(Grammar { start, productions, normal: OnceCell::new() })
    }

    pub fn start(&self) -> &NonTerm { &self.start }

    pub fn productions(&self) -> &[Production] { &self.productions }

    pub fn nonterms(&self) -> HashSet<NonTerm> {
        self.productions.iter().map(|p| p.lhs.clone()).collect()
    }

    /// Productions of `nonterm`, in declaration order.
    pub fn alternatives<'g>(&'g self, nonterm: &'g NonTerm) -> impl Iterator<Item=&'g Production> + 'g {
        self.productions.iter().filter(move |p| &p.lhs == nonterm)
    }

    /// The normalized grammar; computed at most once per `Grammar`.
    pub fn normalized(&self) -> &Normal {
        self.normal.get_or_init(|| Normal::new(self))
    }

    /// Decides whether `word` is in the language of this grammar.
    pub fn contains(&self, word: &str) -> bool {
        crate::Parser::recognizes(self, word)
    }
}

/// Every right-hand side may only mention non-terminals that have at least
/// one production, and the start symbol must be one of them.
pub(crate) fn check_defined(productions: &[Production], start: &NonTerm) -> Result<(), GrammarError> {
    let defined: HashSet<&NonTerm> = productions.iter().map(|p| &p.lhs).collect();
    if !defined.contains(start) {
        return Err(GrammarError::MissingStart(start.clone()));
    }
    for p in productions {
        for nt in p.rhs.iter().filter_map(Symbol::nonterm) {
            if !defined.contains(nt) {
                return Err(GrammarError::Undefined { nonterm: nt.clone(), referrer: p.lhs.clone() });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "tests/grammar.rs"]
mod tests_for_grammar;
