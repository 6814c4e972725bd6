//! The CYK recognizer.
//!
//! The table is triangular: cell `(i, l)` describes the substring of `l`
//! characters starting at character `i`, and maps every CNF non-terminal
//! deriving that substring to the ways it does so. Terminals may match more
//! than one character, so the base case can land in cells with `l > 1`.

use crate::normal::{Body, Normal, NtId, RuleId, START};
use crate::{Reason, SyntaxError};

use linear_map::LinearMap;

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub(crate) enum Back {
    /// `rule` is `A -> t` and `t` matched the whole span.
    Term(RuleId),
    /// `rule` is `A -> B C`, `B` spanning the first `k` characters.
    Split(RuleId, usize),
}

type CellMap<K, V> = LinearMap<K, V>;

pub(crate) type Cell = CellMap<NtId, Vec<Back>>;

/// How many backpointers to keep per non-terminal and cell.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Mode {
    /// Only the first one found; enough to decide membership and to rebuild
    /// one tree.
    First,
    /// All of them, for rebuilding every tree.
    Exhaustive,
}

#[derive(Debug)]
pub struct Table {
    /// Byte offset of every character of the input, followed by its length.
    pub(crate) bounds: Vec<usize>,
    cells: Vec<Cell>,
    /// Whether some terminal match covers each character.
    covered: Vec<bool>,
    mode: Mode,
}

impl Table {
    fn new(bounds: Vec<usize>, mode: Mode) -> Self {
        let n = bounds.len() - 1;
        let cells = (0..n * (n + 1) / 2).map(|_| Cell::new()).collect();
        Table { covered: vec![false; n], bounds, cells, mode }
    }

    /// Number of characters in the input.
    pub fn len(&self) -> usize { self.bounds.len() - 1 }

    pub fn is_empty(&self) -> bool { self.len() == 0 }

    pub fn mode(&self) -> Mode { self.mode }

    fn index(&self, i: usize, l: usize) -> usize {
        let n = self.len();
        assert!(l >= 1 && i + l <= n, "cell ({i}, {l}) outside of input of length {n}");
        (l - 1) * (2 * n - l + 2) / 2 + i
    }

    pub(crate) fn cell(&self, i: usize, l: usize) -> &Cell {
        &self.cells[self.index(i, l)]
    }

    /// Byte range of the span `(i, l)`.
    pub(crate) fn span(&self, i: usize, l: usize) -> std::ops::Range<usize> {
        self.bounds[i]..self.bounds[i + l]
    }

    fn record(&mut self, i: usize, l: usize, nt: NtId, back: Back) {
        let mode = self.mode;
        let index = self.index(i, l);
        let cell = &mut self.cells[index];
        match cell.get_mut(&nt) {
            Some(backs) => if mode == Mode::Exhaustive { backs.push(back) },
            None => { cell.insert(nt, vec![back]); }
        }
    }

    /// True iff the isolated start symbol derives the whole input.
    pub fn accepts(&self, normal: &Normal) -> bool {
        match self.len() {
            0 => normal.accepts_empty,
            n => self.cell(0, n).contains_key(&START),
        }
    }

    /// Explains why the input was rejected; only meaningful when
    /// [`Table::accepts`] is false.
    pub(crate) fn diagnose(&self, input: &str) -> SyntaxError {
        let n = self.len();
        let (range, reason) = if n == 0 {
            (0..0, Reason::EmptyNotAllowed)
        } else if let Some(i) = self.covered.iter().position(|c| !c) {
            (self.span(i, 1), Reason::UnknownToken)
        } else {
            let furthest = (1..=n).rev().find(|&l| !self.cell(0, l).is_empty()).unwrap_or(0);
            (self.bounds[furthest]..input.len(), Reason::UnmatchedPattern)
        };
        SyntaxError { input: input.to_string(), range, reason }
    }
}

/// Fills the CYK table for `input`.
pub fn recognize(normal: &Normal, input: &str, mode: Mode) -> Table {
    let bounds: Vec<usize> = input.char_indices().map(|(b, _)| b)
        .chain(std::iter::once(input.len()))
        .collect();
    let mut table = Table::new(bounds, mode);
    let n = table.len();

    for i in 0..n {
        let at = table.bounds[i];
        for (t, term) in normal.terms.iter().enumerate() {
            if normal.by_term[t].is_empty() {
                continue;
            }
            let Some(end) = term.accept(input, at) else { continue };
            let Ok(j) = table.bounds.binary_search(&end) else { continue };
            for c in &mut table.covered[i..j] {
                *c = true;
            }
            for &rule in &normal.by_term[t] {
                table.record(i, j - i, normal.rules[rule].lhs, Back::Term(rule));
            }
        }
    }

    let mut found: Vec<(NtId, Back)> = vec![];
    for l in 2..=n {
        for i in 0..=n - l {
            for k in 1..l {
                let right = table.cell(i + k, l - k);
                for (&b, _) in table.cell(i, k).iter() {
                    for &rule in &normal.by_left[b] {
                        let Body::Pair(_, c) = normal.rules[rule].body else { continue };
                        if right.contains_key(&c) {
                            found.push((normal.rules[rule].lhs, Back::Split(rule, k)));
                        }
                    }
                }
            }
            for (nt, back) in found.drain(..) {
                table.record(i, l, nt, back);
            }
        }
    }
    table
}

#[cfg(test)]
#[path = "tests/cyk.rs"]
mod tests_for_cyk;
