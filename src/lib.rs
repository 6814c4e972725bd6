//! Context-free grammar recognition and syntax-tree reconstruction.
//!
//! A [`Grammar`] is normalized into Chomsky normal form (see [`normal`]),
//! words are recognized with the CYK algorithm (see [`cyk`]), and the
//! resulting table is walked backwards to rebuild one or all syntax trees in
//! terms of the grammar's own non-terminals (see [`forest`]).
//!
//! ```text
//! S ::= '(' S ')' | ''
//!
//! "(())"  =>  S("(" S("(" S() ")") ")")
//! ```

use std::ops::Range;

use derive_more::Display;
use thiserror::Error;

pub mod blackbox;
pub mod cyk;
mod display;
pub mod forest;
pub mod grammar;
pub mod linear;
pub mod node;
pub mod normal;
mod parser;
pub mod rendering;

pub use blackbox::{Blackbox, CharClass, Pattern, Recognizer};
pub use grammar::{n, t, Grammar, NonTerm, Production, Symbol, Term};
pub use linear::LinearGrammar;
pub use node::SyntaxTree;
pub use normal::Normal;
pub use parser::{AmbiguousGrammarParser, Parser};
pub use rendering::Rendered;

/// A syntax tree over the non-terminals of a grammar, whose leaves are byte
/// ranges of the parsed input.
pub type ParseTree = SyntaxTree<NonTerm, Range<usize>>;

#[derive(Clone, PartialEq, Eq, Debug, Error)]
pub enum GrammarError {
    #[error("start symbol `{0}` has no productions")]
    MissingStart(NonTerm),
    #[error("non-terminal `{nonterm}` is referenced by `{referrer}` but has no productions")]
    Undefined { nonterm: NonTerm, referrer: NonTerm },
    #[error("production `{0}` has more than one non-terminal on its right-hand side")]
    NotLinear(Production),
}

/// Raised when a word is not in the language of a grammar.
///
/// The range is a best-effort pointer at where recognition gave up; for
/// general context-free grammars there is no precise notion of that.
#[derive(Clone, PartialEq, Eq, Debug, Error)]
#[error("{reason} at {}..{} of {input:?}", .range.start, .range.end)]
pub struct SyntaxError {
    pub input: String,
    pub range: Range<usize>,
    pub reason: Reason,
}

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Display)]
pub enum Reason {
    /// The input is empty but the start symbol is not nilable.
    #[display(fmt = "empty input not allowed")]
    EmptyNotAllowed,
    /// No terminal of the grammar matches this part of the input.
    #[display(fmt = "unknown token")]
    UnknownToken,
    /// Every character is matched by some terminal, but no derivation of the
    /// start symbol spans the whole input.
    #[display(fmt = "unmatched pattern")]
    UnmatchedPattern,
}
