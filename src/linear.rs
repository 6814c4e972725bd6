//! Linear grammars: every right-hand side holds at most one non-terminal.
//!
//! Such a grammar needs neither normalization nor a CYK table. A span is
//! derived by `A -> u B v` iff `u` matches at its start, `v` matches up to
//! its end, and `B` derives what lies between, which is a strictly shorter
//! span unless `u` and `v` both match nothing.

use std::collections::HashMap;

use crate::grammar::{check_defined, NonTerm, Production, Symbol, Term};
use crate::GrammarError;

#[derive(Clone, Debug)]
struct Shape {
    lhs: usize,
    prefix: Vec<Term>,
    nonterm: Option<usize>,
    suffix: Vec<Term>,
}

#[derive(Clone, Debug)]
pub struct LinearGrammar {
    start: NonTerm,
    productions: Vec<Production>,
    shapes: Vec<Shape>,
    start_id: usize,
}

impl LinearGrammar {
    pub fn new(productions: impl IntoIterator<Item=Production>, start: impl Into<NonTerm>) -> Result<Self, GrammarError> {
        let start = start.into();
        let productions: Vec<Production> = productions.into_iter().collect();
        check_defined(&productions, &start)?;

        let mut ids: HashMap<&NonTerm, usize> = HashMap::new();
        for p in &productions {
            let next = ids.len();
            ids.entry(&p.lhs).or_insert(next);
        }

        let mut shapes = Vec::with_capacity(productions.len());
        for p in &productions {
            let mut nonterms = p.rhs.iter().enumerate().filter_map(|(j, sym)| sym.nonterm().map(|nt| (j, nt)));
            let split = nonterms.next();
            if nonterms.next().is_some() {
                return Err(GrammarError::NotLinear(p.clone()));
            }
            let terms = |syms: &[Symbol]| -> Vec<Term> {
                syms.iter().filter_map(|sym| match sym {
                    Symbol::Term(t) if !t.is_empty() => Some(t.clone()),
                    _ => None,
                }).collect()
            };
            let shape = match split {
                None => Shape { lhs: ids[&p.lhs], prefix: terms(&p.rhs), nonterm: None, suffix: vec![] },
                Some((j, nt)) => Shape {
                    lhs: ids[&p.lhs],
                    prefix: terms(&p.rhs[..j]),
                    nonterm: Some(ids[nt]),
                    suffix: terms(&p.rhs[j + 1..]),
                },
            };
            shapes.push(shape);
        }

        let start_id = ids[&start];
        Ok(LinearGrammar { start, productions, shapes, start_id })
    }

    pub fn start(&self) -> &NonTerm { &self.start }

    pub fn productions(&self) -> &[Production] { &self.productions }

    /// Decides whether `word` is in the language of this grammar.
    pub fn contains(&self, word: &str) -> bool {
        let bounds: Vec<usize> = word.char_indices().map(|(b, _)| b)
            .chain(std::iter::once(word.len()))
            .collect();
        let n = bounds.len() - 1;
        let count = self.shapes.iter().map(|s| s.lhs + 1).max().unwrap_or(0);
        let mut spans = Spans { width: n + 1, derives: vec![false; (n + 1) * (n + 1) * count], count };

        for len in 0..=n {
            for i in 0..=n - len {
                let j = i + len;
                loop {
                    let mut changed = false;
                    for shape in &self.shapes {
                        if !spans.get(i, j, shape.lhs) && self.derives(shape, word, &bounds, i, j, &spans) {
                            spans.set(i, j, shape.lhs);
                            changed = true;
                        }
                    }
                    if !changed {
                        break;
                    }
                }
            }
        }
        spans.get(0, n, self.start_id)
    }

    fn derives(&self, shape: &Shape, word: &str, bounds: &[usize], i: usize, j: usize, spans: &Spans) -> bool {
        let Some(k) = run(&shape.prefix, word, bounds, i, j) else { return false };
        match shape.nonterm {
            None => k == j,
            Some(nt) => (k..=j).any(|m| {
                spans.get(k, m, nt) && run(&shape.suffix, word, bounds, m, j) == Some(j)
            }),
        }
    }
}

/// Which non-terminals derive each span `(i, j)` of characters.
struct Spans {
    width: usize,
    derives: Vec<bool>,
    count: usize,
}

impl Spans {
    fn get(&self, i: usize, j: usize, nt: usize) -> bool {
        self.derives[(i * self.width + j) * self.count + nt]
    }

    fn set(&mut self, i: usize, j: usize, nt: usize) {
        self.derives[(i * self.width + j) * self.count + nt] = true;
    }
}

/// Matches `terms` one after the other from character `i`, never going past
/// character `j`; returns the character reached.
fn run(terms: &[Term], word: &str, bounds: &[usize], i: usize, j: usize) -> Option<usize> {
    let mut at = bounds[i];
    for t in terms {
        let end = t.accept(word, at)?;
        if end > bounds[j] {
            return None;
        }
        at = end;
    }
    bounds.binary_search(&at).ok()
}

impl std::fmt::Display for LinearGrammar {
    fn fmt(&self, w: &mut std::fmt::Formatter) -> std::fmt::Result {
        let lines: Vec<String> = self.productions.iter().map(|p| p.to_string()).collect();
        write!(w, "{}", lines.join("\n"))
    }
}

#[cfg(test)]
#[path = "tests/linear.rs"]
mod tests_for_linear;
