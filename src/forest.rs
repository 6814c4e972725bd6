//! Rebuilding syntax trees from a filled CYK table.
//!
//! The table speaks about CNF non-terminals; the trees handed out speak only
//! about the grammar's own. Walking down from the start symbol, every rule's
//! [`Origin`] says how to get back:
//!
//! * chain links and terminal wrappers contribute their children straight to
//!   the enclosing node;
//! * a derived rule becomes a node of its variant's production, with the
//!   positions dropped as nilable filled in by their empty derivations, and
//!   is then wrapped in one node per unit production of each route from the
//!   rule's left-hand side to the variant's;
//! * the isolated start symbol disappears, leaving the grammar's own start.
//!
//! What each `(start, length, non-terminal)` contributes is computed once, so
//! subtrees shared between derivations are built once. The subtrees live in
//! an arena where structurally equal ones share an id, which is also how
//! duplicate derivations are recognized.
//!
//! A table filled in [`Mode::First`] gets the canonical choice only: the
//! unit route recorded in the rule and, for every nilable symbol, the
//! production that first proved it nilable. An exhaustive table gets every
//! unit route and every empty derivation in which no non-terminal is its own
//! descendant, the canonical one first.

use std::collections::{HashMap, HashSet};
use std::ops::Range;
use std::rc::Rc;

use crate::cyk::{Back, Mode, Table};
use crate::grammar::{Grammar, NonTerm, Symbol};
use crate::node::SyntaxTree;
use crate::normal::{Body, NtId, Origin, RuleId, Source, VariantId, START};
use crate::ParseTree;

type FragId = usize;

#[derive(Clone, PartialEq, Eq, Hash, Debug)]
enum Frag {
    Leaf(Range<usize>),
    Node(NonTerm, Vec<FragId>),
}

#[derive(Default, Debug)]
struct Arena {
    frags: Vec<Frag>,
    ids: HashMap<Frag, FragId>,
}

impl Arena {
    fn intern(&mut self, frag: Frag) -> FragId {
        if let Some(&id) = self.ids.get(&frag) {
            return id;
        }
        let id = self.frags.len();
        self.frags.push(frag.clone());
        self.ids.insert(frag, id);
        id
    }

    fn tree(&self, id: FragId) -> ParseTree {
        match &self.frags[id] {
            Frag::Leaf(range) => SyntaxTree::Leaf(range.clone()),
            Frag::Node(nt, children) => {
                SyntaxTree::Node(nt.clone(), children.iter().map(|&c| self.tree(c)).collect())
            }
        }
    }
}

/// One way for a non-terminal to span a cell: the subtrees it adds to the
/// enclosing node's children, each paired with the byte offset it ends at.
type Seq = Vec<(FragId, usize)>;

/// Every syntax tree of the start symbol recorded in `table`, in the order
/// the derivations were found, without duplicates.
///
/// A table filled in [`Mode::First`] holds exactly one derivation per cell
/// and non-terminal, and so yields at most one tree.
/// A table that does not accept its input yields none.
pub fn trees(grammar: &Grammar, table: &Table) -> Vec<ParseTree> {
    let normal = grammar.normalized();
    let mut x = Extractor {
        grammar,
        table,
        arena: Arena::default(),
        memo: HashMap::new(),
        routes: HashMap::new(),
        empties: HashMap::new(),
    };
    let roots: Vec<FragId> = match table.len() {
        0 if normal.accepts_empty => x.empties(&Symbol::NonTerm(grammar.start.clone()), 0).to_vec(),
        0 => vec![],
        n => x.alternatives(0, n, START).iter().map(|seq| seq[0].0).collect(),
    };
    roots.into_iter().map(|id| x.arena.tree(id)).collect()
}

struct Extractor<'a> {
    grammar: &'a Grammar,
    table: &'a Table,
    arena: Arena,
    memo: HashMap<(usize, usize, NtId), Rc<Vec<Seq>>>,
    routes: HashMap<(NtId, NtId), Rc<Vec<Vec<VariantId>>>>,
    empties: HashMap<(NonTerm, usize), Rc<Vec<FragId>>>,
}

impl<'a> Extractor<'a> {
    fn alternatives(&mut self, i: usize, l: usize, nt: NtId) -> Rc<Vec<Seq>> {
        if let Some(hit) = self.memo.get(&(i, l, nt)) {
            return hit.clone();
        }
        let (grammar, table) = (self.grammar, self.table);
        let normal = grammar.normalized();
        let backs: &[Back] = table.cell(i, l).get(&nt).map(|v| &v[..]).unwrap_or(&[]);

        let mut seqs = vec![];
        let mut seen = HashSet::new();
        for &back in backs {
            match back {
                Back::Term(rule) => {
                    let span = table.span(i, l);
                    let end = span.end;
                    let leaf = self.arena.intern(Frag::Leaf(span));
                    self.produce(rule, vec![(leaf, end)], i, &mut seqs, &mut seen);
                }
                Back::Split(rule, k) => {
                    let Body::Pair(b, c) = normal.rules[rule].body else {
                        unreachable!("split recorded for terminal rule {}", rule)
                    };
                    let lefts = self.alternatives(i, k, b);
                    let rights = self.alternatives(i + k, l - k, c);
                    for left in lefts.iter() {
                        for right in rights.iter() {
                            let kept = left.iter().chain(right.iter()).copied().collect();
                            self.produce(rule, kept, i, &mut seqs, &mut seen);
                        }
                    }
                }
            }
        }

        let seqs = Rc::new(seqs);
        self.memo.insert((i, l, nt), seqs.clone());
        seqs
    }

    /// Applies the provenance of `rule` to the subtrees of its kept symbols.
    fn produce(&mut self, rule: RuleId, kept: Seq, i: usize, seqs: &mut Vec<Seq>, seen: &mut HashSet<Seq>) {
        let grammar = self.grammar;
        let normal = grammar.normalized();
        let produced = match &normal.rules[rule].origin {
            Origin::Tail | Origin::Wrap => vec![kept],
            Origin::Derived { units, variant } => {
                let start = self.table.bounds[i];
                let end = kept.last().map_or(start, |&(_, end)| end);
                let routes = self.routes(normal.rules[rule].lhs, normal.variants[*variant].lhs, units);
                let nodes = self.expand(*variant, &kept, start);
                let mut produced = vec![];
                for route in routes.iter() {
                    for &node in &nodes {
                        let mut wrapped = vec![node];
                        for &u in route.iter().rev() {
                            wrapped = wrapped.into_iter()
                                .flat_map(|inner| self.expand(u, &[(inner, end)], start))
                                .collect();
                        }
                        produced.extend(wrapped.into_iter().map(|node| vec![(node, end)]));
                    }
                }
                produced
            }
        };
        for seq in produced {
            if seen.insert(seq.clone()) {
                seqs.push(seq);
            }
        }
    }

    /// The unit routes from `from` to `to` to rebuild, `canonical` first.
    fn routes(&mut self, from: NtId, to: NtId, canonical: &[VariantId]) -> Rc<Vec<Vec<VariantId>>> {
        if let Some(hit) = self.routes.get(&(from, to)) {
            return hit.clone();
        }
        let mut routes = vec![canonical.to_vec()];
        if self.table.mode() == Mode::Exhaustive {
            let others = self.grammar.normalized().unit_routes(from, to);
            routes.extend(others.into_iter().filter(|route| route != canonical));
        }
        let routes = Rc::new(routes);
        self.routes.insert((from, to), routes.clone());
        routes
    }

    /// Builds the nodes of variant `v`'s production out of the subtrees of
    /// its kept positions, one per way of re-inserting the dropped ones.
    fn expand(&mut self, v: VariantId, kept: &[(FragId, usize)], start: usize) -> Vec<FragId> {
        let grammar = self.grammar;
        let normal = grammar.normalized();
        let variant = &normal.variants[v];
        let p = match variant.source {
            Source::Isolation => return vec![kept[0].0],
            Source::Production(p) => p,
        };
        let production = &grammar.productions[p];
        let mut options = Vec::with_capacity(production.rhs.len());
        let mut kept = kept.iter();
        let mut at = start;
        for (j, sym) in production.rhs.iter().enumerate() {
            if variant.kept.binary_search(&j).is_ok() {
                let Some(&(frag, end)) = kept.next() else {
                    unreachable!("variant {} kept more positions than it was given", v)
                };
                options.push(vec![frag]);
                at = end;
            } else {
                options.push(self.empties(sym, at).to_vec());
            }
        }
        product(&options).into_iter()
            .map(|children| self.arena.intern(Frag::Node(production.lhs.clone(), children)))
            .collect()
    }

    /// The empty derivations of a nilable symbol, placed at `at`.
    fn empties(&mut self, sym: &Symbol, at: usize) -> Rc<Vec<FragId>> {
        let nt = match sym {
            Symbol::Term(_) => return Rc::new(vec![self.arena.intern(Frag::Leaf(at..at))]),
            Symbol::NonTerm(nt) => nt,
        };
        let key = (nt.clone(), at);
        if let Some(hit) = self.empties.get(&key) {
            return hit.clone();
        }
        let found = Rc::new(self.empty_derivations(nt, at, &mut vec![]));
        self.empties.insert(key, found.clone());
        found
    }

    /// Empty derivations of `nt` in which none of `ancestors` occurs, the
    /// one built from its nilability proof first.
    fn empty_derivations(&mut self, nt: &NonTerm, at: usize, ancestors: &mut Vec<NonTerm>) -> Vec<FragId> {
        let grammar = self.grammar;
        let normal = grammar.normalized();
        let Some(&proof) = normal.empty_proofs.get(nt) else {
            unreachable!("`{}` was dropped but is not nilable", nt)
        };
        let mut candidates = vec![proof];
        if self.table.mode() == Mode::Exhaustive {
            candidates.extend((0..grammar.productions.len())
                .filter(|&p| p != proof && grammar.productions[p].lhs == *nt));
        }

        ancestors.push(nt.clone());
        let mut found = vec![];
        for p in candidates {
            let mut options = vec![];
            for sym in &grammar.productions[p].rhs {
                options.push(match sym {
                    Symbol::Term(t) if t.is_empty() => vec![self.arena.intern(Frag::Leaf(at..at))],
                    Symbol::NonTerm(child)
                        if normal.empty_proofs.contains_key(child) && !ancestors.contains(child) =>
                    {
                        self.empty_derivations(child, at, ancestors)
                    }
                    Symbol::Term(_) | Symbol::NonTerm(_) => vec![],
                });
            }
            for children in product(&options) {
                let id = self.arena.intern(Frag::Node(nt.clone(), children));
                if !found.contains(&id) {
                    found.push(id);
                }
            }
        }
        ancestors.pop();
        found
    }
}

/// Every way of picking one entry from each of `options`, in order.
fn product(options: &[Vec<FragId>]) -> Vec<Vec<FragId>> {
    options.iter().fold(vec![vec![]], |picked, choices| {
        picked.iter()
            .flat_map(|prefix| choices.iter().map(move |&c| {
                let mut next = prefix.clone();
                next.push(c);
                next
            }))
            .collect()
    })
}

#[cfg(test)]
#[path = "tests/forest.rs"]
mod tests_for_forest;
