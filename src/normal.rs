//! Chomsky normal form, with enough provenance to undo it.
//!
//! Every rule of a [`Normal`] grammar is either `A -> B C` or `A -> t`; the
//! empty word is handled out-of-band by [`Normal::accepts_empty`]. The
//! transformation runs in the usual order:
//!
//! 1. the start symbol is isolated behind a fresh `S' -> S`;
//! 2. nilable symbols are dropped in every combination, producing *variants*
//!    of each production (a variant remembers which right-hand-side positions
//!    it kept);
//! 3. unit variants `A -> B` are collapsed: every non-terminal gets a copy of
//!    the non-unit variants of each non-terminal in its unit closure;
//! 4. terminals in longer right-hand sides are wrapped in a non-terminal of
//!    their own;
//! 5. right-hand sides longer than two are right-folded into chains;
//! 6. non-generating and unreachable rules are pruned.
//!
//! The non-terminals introduced by steps 1, 4 and 5 are [`NtKind`] variants
//! rather than names, so they can never clash with the grammar's own, and the
//! [`Origin`] of each rule tells the forest extractor how to splice them back
//! out of a syntax tree.

use std::collections::{HashMap, VecDeque};

use crate::grammar::{Grammar, NonTerm, Symbol, Term};

pub(crate) type NtId = usize;
pub(crate) type RuleId = usize;
pub(crate) type TermId = usize;
pub(crate) type VariantId = usize;

/// The isolated start symbol `S'` is always the first non-terminal.
pub(crate) const START: NtId = 0;

#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub(crate) enum NtKind {
    Start,
    Source(NonTerm),
    /// Kept symbols `k..` of a variant, for `k >= 1`.
    Tail(VariantId, usize),
    /// Stands in for a terminal inside a pair.
    Wrap(TermId),
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub(crate) enum Source {
    /// `S' -> S`
    Isolation,
    /// Index into the grammar's productions.
    Production(usize),
}

/// A production with some of its nilable positions dropped.
#[derive(Clone, Debug)]
pub(crate) struct Variant {
    pub(crate) lhs: NtId,
    pub(crate) source: Source,
    /// Right-hand-side positions that derive a non-empty part of the input.
    pub(crate) kept: Vec<usize>,
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub(crate) enum Body {
    Term(TermId),
    Pair(NtId, NtId),
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub(crate) enum Origin {
    /// `variant` reached from the rule's left-hand side through the unit
    /// variants `units`, outermost first. This is the route a breadth-first
    /// search finds; [`Normal::unit_routes`] lists the others.
    Derived { units: Vec<VariantId>, variant: VariantId },
    /// Link of a right-folded chain.
    Tail,
    /// Terminal wrapper.
    Wrap,
}

#[derive(Clone, Debug)]
pub(crate) struct Rule {
    pub(crate) lhs: NtId,
    pub(crate) body: Body,
    pub(crate) origin: Origin,
}

/// A grammar in Chomsky normal form, derived from a [`Grammar`].
#[derive(Clone, Debug)]
pub struct Normal {
    pub(crate) nts: Vec<NtKind>,
    pub(crate) terms: Vec<Term>,
    pub(crate) variants: Vec<Variant>,
    pub(crate) rules: Vec<Rule>,
    pub(crate) accepts_empty: bool,
    /// For every nilable non-terminal, the production that first proved it
    /// nilable. Following these never loops.
    pub(crate) empty_proofs: HashMap<NonTerm, usize>,
    /// Unit variants by left-hand side, with the non-terminal they lead to.
    pub(crate) units: Vec<Vec<(VariantId, NtId)>>,
    /// Pair rules, indexed by the left non-terminal of their body.
    pub(crate) by_left: Vec<Vec<RuleId>>,
    /// Terminal rules, indexed by their terminal.
    pub(crate) by_term: Vec<Vec<RuleId>>,
}

impl Normal {
    pub(crate) fn new(grammar: &Grammar) -> Self {
        let mut b = Builder::new(grammar);
        let start = b.nt(NtKind::Start);
        assert_eq!(start, START);
        for p in &grammar.productions {
            b.nt(NtKind::Source(p.lhs.clone()));
        }

        let empty_proofs = empty_proofs(grammar);
        let nilable = |sym: &Symbol| match sym {
            Symbol::NonTerm(nt) => empty_proofs.contains_key(nt),
            Symbol::Term(t) => t.is_empty(),
        };

        b.variants.push(Variant { lhs: START, source: Source::Isolation, kept: vec![0] });
        for (p, prod) in grammar.productions.iter().enumerate() {
            let lhs = b.source_id(&prod.lhs);
            for kept in kept_subsets(&prod.rhs, &nilable) {
                b.variants.push(Variant { lhs, source: Source::Production(p), kept });
            }
        }

        let count = b.nts.len();
        let mut units: Vec<Vec<(VariantId, NtId)>> = vec![vec![]; count];
        let mut bodies: Vec<Vec<VariantId>> = vec![vec![]; count];
        for (v, variant) in b.variants.iter().enumerate() {
            match b.unit_target(variant) {
                Some(target) => units[variant.lhs].push((v, target)),
                None => bodies[variant.lhs].push(v),
            }
        }

        for lhs in 0..count {
            b.collapse(lhs, &units, &bodies);
        }

        let accepts_empty = empty_proofs.contains_key(&grammar.start);
        let Builder { nts, terms, variants, rules, .. } = b;
        let rules = prune(nts.len(), rules);

        let mut by_left = vec![vec![]; nts.len()];
        let mut by_term = vec![vec![]; terms.len()];
        for (id, rule) in rules.iter().enumerate() {
            match rule.body {
                Body::Pair(left, _) => by_left[left].push(id),
                Body::Term(t) => by_term[t].push(id),
            }
        }

        Normal { nts, terms, variants, rules, accepts_empty, empty_proofs, units, by_left, by_term }
    }

    /// True iff the empty word is in the language.
    pub fn accepts_empty(&self) -> bool { self.accepts_empty }

    /// Number of rules.
    pub fn len(&self) -> usize { self.rules.len() }

    pub fn is_empty(&self) -> bool { self.rules.is_empty() && !self.accepts_empty }

    /// The source non-terminal `nt` stands for, if it is not synthesized.
    pub(crate) fn source(&self, nt: NtId) -> Option<&NonTerm> {
        match &self.nts[nt] {
            NtKind::Source(name) => Some(name),
            NtKind::Start | NtKind::Tail(..) | NtKind::Wrap(_) => None,
        }
    }

    /// Every chain of unit variants leading from `from` to `to` that visits
    /// no non-terminal twice, in declaration order.
    pub(crate) fn unit_routes(&self, from: NtId, to: NtId) -> Vec<Vec<VariantId>> {
        fn go(
            normal: &Normal,
            at: NtId,
            to: NtId,
            route: &mut Vec<VariantId>,
            on_route: &mut [bool],
            out: &mut Vec<Vec<VariantId>>,
        ) {
            if at == to {
                out.push(route.clone());
                return;
            }
            for &(u, next) in &normal.units[at] {
                if on_route[next] {
                    continue;
                }
                on_route[next] = true;
                route.push(u);
                go(normal, next, to, route, on_route, out);
                route.pop();
                on_route[next] = false;
            }
        }
        let mut on_route = vec![false; self.nts.len()];
        on_route[from] = true;
        let mut out = vec![];
        go(self, from, to, &mut vec![], &mut on_route, &mut out);
        out
    }
}

struct Builder<'g> {
    grammar: &'g Grammar,
    nts: Vec<NtKind>,
    nt_ids: HashMap<NtKind, NtId>,
    terms: Vec<Term>,
    term_ids: HashMap<Term, TermId>,
    variants: Vec<Variant>,
    rules: Vec<Rule>,
}

impl<'g> Builder<'g> {
    fn new(grammar: &'g Grammar) -> Self {
        Builder {
            grammar,
            nts: vec![],
            nt_ids: HashMap::new(),
            terms: vec![],
            term_ids: HashMap::new(),
            variants: vec![],
            rules: vec![],
        }
    }

    fn nt(&mut self, kind: NtKind) -> NtId {
        if let Some(&id) = self.nt_ids.get(&kind) {
            return id;
        }
        let id = self.nts.len();
        self.nts.push(kind.clone());
        self.nt_ids.insert(kind, id);
        id
    }

    fn source_id(&self, nt: &NonTerm) -> NtId {
        self.nt_ids[&NtKind::Source(nt.clone())]
    }

    fn term(&mut self, term: &Term) -> TermId {
        if let Some(&id) = self.term_ids.get(term) {
            return id;
        }
        let id = self.terms.len();
        self.terms.push(term.clone());
        self.term_ids.insert(term.clone(), id);
        id
    }

    fn kept_symbols(&self, v: VariantId) -> Vec<Symbol> {
        let variant = &self.variants[v];
        match variant.source {
            Source::Isolation => vec![Symbol::NonTerm(self.grammar.start.clone())],
            Source::Production(p) => {
                let rhs = &self.grammar.productions[p].rhs;
                variant.kept.iter().map(|&j| rhs[j].clone()).collect()
            }
        }
    }

    fn unit_target(&self, variant: &Variant) -> Option<NtId> {
        match variant.source {
            Source::Isolation => Some(self.source_id(&self.grammar.start)),
            Source::Production(p) => match variant.kept[..] {
                [j] => self.grammar.productions[p].rhs[j].nonterm().map(|nt| self.source_id(nt)),
                _ => None,
            },
        }
    }

    /// Emits a rule for `lhs` for every non-unit variant of every non-terminal
    /// in its unit closure, once per variant. The closure is walked breadth
    /// first, and each rule records the route it was first reached by.
    fn collapse(&mut self, lhs: NtId, units: &[Vec<(VariantId, NtId)>], bodies: &[Vec<VariantId>]) {
        let mut seen = vec![false; units.len()];
        seen[lhs] = true;
        let mut queue = VecDeque::from([(lhs, vec![])]);
        while let Some((at, route)) = queue.pop_front() {
            for &v in &bodies[at] {
                self.emit(lhs, route.clone(), v);
            }
            for &(u, next) in &units[at] {
                if !seen[next] {
                    seen[next] = true;
                    let mut longer = route.clone();
                    longer.push(u);
                    queue.push_back((next, longer));
                }
            }
        }
    }

    fn emit(&mut self, lhs: NtId, units: Vec<VariantId>, v: VariantId) {
        let symbols = self.kept_symbols(v);
        let body = match &symbols[..] {
            [Symbol::Term(t)] => Body::Term(self.term(t)),
            [first, second] => Body::Pair(self.wrap(first), self.wrap(second)),
            [first, _, _, ..] => {
                let head = self.wrap(first);
                Body::Pair(head, self.chain(v, &symbols))
            }
            [Symbol::NonTerm(_)] | [] => unreachable!("variant {} is not a body", v),
        };
        self.rules.push(Rule { lhs, body, origin: Origin::Derived { units, variant: v } });
    }

    fn wrap(&mut self, sym: &Symbol) -> NtId {
        match sym {
            Symbol::NonTerm(nt) => self.source_id(nt),
            Symbol::Term(t) => {
                let term = self.term(t);
                let kind = NtKind::Wrap(term);
                if let Some(&id) = self.nt_ids.get(&kind) {
                    return id;
                }
                let id = self.nt(kind);
                self.rules.push(Rule { lhs: id, body: Body::Term(term), origin: Origin::Wrap });
                id
            }
        }
    }

    /// Right-folds kept symbols `1..` of variant `v` and returns the head of
    /// the chain. Chains are shared by every rule built from the same variant.
    fn chain(&mut self, v: VariantId, symbols: &[Symbol]) -> NtId {
        if let Some(&id) = self.nt_ids.get(&NtKind::Tail(v, 1)) {
            return id;
        }
        let r = symbols.len();
        let links: Vec<NtId> = (1..r - 1).map(|k| self.nt(NtKind::Tail(v, k))).collect();
        for k in 1..r - 1 {
            let head = self.wrap(&symbols[k]);
            let rest = if k + 1 == r - 1 { self.wrap(&symbols[r - 1]) } else { links[k] };
            self.rules.push(Rule { lhs: links[k - 1], body: Body::Pair(head, rest), origin: Origin::Tail });
        }
        links[0]
    }
}

fn empty_proofs(grammar: &Grammar) -> HashMap<NonTerm, usize> {
    let mut proofs = HashMap::new();
    loop {
        let mut changed = false;
        for (p, prod) in grammar.productions.iter().enumerate() {
            if proofs.contains_key(&prod.lhs) {
                continue;
            }
            let nilable = prod.rhs.iter().all(|sym| match sym {
                Symbol::NonTerm(nt) => proofs.contains_key(nt),
                Symbol::Term(t) => t.is_empty(),
            });
            if nilable {
                proofs.insert(prod.lhs.clone(), p);
                changed = true;
            }
        }
        if !changed {
            return proofs;
        }
    }
}

/// Every non-empty choice of positions to keep, keeping all first. Empty
/// literals are always dropped; nilable non-terminals may go either way.
fn kept_subsets(rhs: &[Symbol], nilable: &impl Fn(&Symbol) -> bool) -> Vec<Vec<usize>> {
    fn go(j: usize, rhs: &[Symbol], nilable: &impl Fn(&Symbol) -> bool, kept: &mut Vec<usize>, out: &mut Vec<Vec<usize>>) {
        if j == rhs.len() {
            if !kept.is_empty() {
                out.push(kept.clone());
            }
            return;
        }
        match &rhs[j] {
            Symbol::Term(t) if t.is_empty() => go(j + 1, rhs, nilable, kept, out),
            sym => {
                kept.push(j);
                go(j + 1, rhs, nilable, kept, out);
                kept.pop();
                if nilable(sym) {
                    go(j + 1, rhs, nilable, kept, out);
                }
            }
        }
    }
    let mut out = vec![];
    go(0, rhs, nilable, &mut vec![], &mut out);
    out
}

/// Drops rules that mention a non-terminal deriving no terminal string, then
/// rules whose left-hand side cannot be reached from the start symbol.
fn prune(count: usize, rules: Vec<Rule>) -> Vec<Rule> {
    let mut generating = vec![false; count];
    let productive = |rule: &Rule, generating: &[bool]| match rule.body {
        Body::Term(_) => true,
        Body::Pair(b, c) => generating[b] && generating[c],
    };
    loop {
        let mut changed = false;
        for rule in &rules {
            if !generating[rule.lhs] && productive(rule, &generating) {
                generating[rule.lhs] = true;
                changed = true;
            }
        }
        if !changed {
            break;
        }
    }
    let rules: Vec<Rule> = rules.into_iter().filter(|r| productive(r, &generating)).collect();

    let mut by_lhs = vec![vec![]; count];
    for (id, rule) in rules.iter().enumerate() {
        by_lhs[rule.lhs].push(id);
    }
    let mut reachable = vec![false; count];
    reachable[START] = true;
    let mut stack = vec![START];
    while let Some(a) = stack.pop() {
        for &id in &by_lhs[a] {
            if let Body::Pair(b, c) = rules[id].body {
                for x in [b, c] {
                    if !reachable[x] {
                        reachable[x] = true;
                        stack.push(x);
                    }
                }
            }
        }
    }
    rules.into_iter().filter(|r| reachable[r.lhs]).collect()
}

#[cfg(test)]
#[path = "tests/normal.rs"]
mod tests_for_normal;
