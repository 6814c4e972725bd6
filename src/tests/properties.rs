// Randomized grammars over non-terminals `A`, `B`, `C` and terminals `a`,
// `b` and the empty literal, checked against the bounded language computed
// by brute force.

use std::collections::{BTreeSet, HashMap};

use proptest::prelude::*;

use super::*;

const MAX_LEN: usize = 4;

fn symbol() -> impl Strategy<Value = Symbol> {
    prop_oneof![
        prop::sample::select(vec!["A", "B", "C"]).prop_map(n),
        prop::sample::select(vec!["a", "b", ""]).prop_map(t),
    ]
}

fn alternatives() -> impl Strategy<Value = Vec<Vec<Symbol>>> {
    prop::collection::vec(prop::collection::vec(symbol(), 0..=3), 1..=3)
}

fn random_grammar() -> impl Strategy<Value = Grammar> {
    (alternatives(), alternatives(), alternatives()).prop_map(|(a, b, c)| {
        let productions = Production::alternatives("A", a).into_iter()
            .chain(Production::alternatives("B", b))
            .chain(Production::alternatives("C", c));
        Grammar::new(productions, "A").unwrap()
    })
}

/// Every word of at most `max` characters each non-terminal derives.
fn bounded_language(g: &Grammar, max: usize) -> HashMap<NonTerm, BTreeSet<String>> {
    let mut lang: HashMap<NonTerm, BTreeSet<String>> =
        g.nonterms().into_iter().map(|nt| (nt, BTreeSet::new())).collect();
    loop {
        let mut changed = false;
        for p in g.productions() {
            let mut words = BTreeSet::from([String::new()]);
            for sym in p.rhs() {
                let parts: BTreeSet<String> = match sym {
                    Symbol::NonTerm(nt) => lang[nt].clone(),
                    Symbol::Term(Term::Lit(s)) => BTreeSet::from([s.clone()]),
                    Symbol::Term(other) => panic!("unexpected terminal {}", other),
                };
                words = words.iter()
                    .flat_map(|w| parts.iter().map(move |p| format!("{}{}", w, p)))
                    .filter(|w| w.len() <= max)
                    .collect();
            }
            let known = lang.get_mut(p.lhs()).unwrap();
            for w in words {
                changed |= known.insert(w);
            }
        }
        if !changed {
            return lang;
        }
    }
}

fn words(max: usize) -> Vec<String> {
    let mut all = vec![String::new()];
    let mut last = vec![String::new()];
    for _ in 0..max {
        last = last.iter().flat_map(|w| ["a", "b"].map(|c| format!("{}{}", w, c))).collect();
        all.extend(last.iter().cloned());
    }
    all
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn recognition_matches_bounded_language(g in random_grammar()) {
        let lang = bounded_language(&g, MAX_LEN);
        let expected = &lang[g.start()];
        for word in words(MAX_LEN) {
            prop_assert_eq!(g.contains(&word), expected.contains(&word), "{:?} in\n{}", word, g);
        }
    }

    #[test]
    fn first_tree_is_a_derivation(g in random_grammar()) {
        for word in words(MAX_LEN) {
            if let Ok(tree) = g.syntax_tree(&word) {
                assert_derives(&g, &tree, &word);
            }
        }
    }

    #[test]
    fn all_trees_agree_with_first(g in random_grammar()) {
        for word in words(2) {
            match (g.syntax_tree(&word), g.all_syntax_trees(&word)) {
                (Ok(first), Ok(all)) => {
                    prop_assert_eq!(&first, &all[0]);
                    for tree in &all {
                        assert_derives(&g, tree, &word);
                    }
                    let distinct: std::collections::HashSet<&ParseTree> = all.iter().collect();
                    prop_assert_eq!(distinct.len(), all.len());
                }
                (Err(a), Err(b)) => prop_assert_eq!(a, b),
                (first, all) => prop_assert!(false, "{:?} vs {:?}", first, all),
            }
        }
    }
}
