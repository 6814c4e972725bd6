// This is actually defined at `crate::blackbox::tests_for_blackbox`

use crate::blackbox::*;
use crate::tests::*;
use crate::{n, AmbiguousGrammarParser, Parser, Production, Rendered, Symbol};

#[test]
fn char_classes() {
    assert!(CharClass::Letters.contains('é'));
    assert!(!CharClass::Letters.contains('1'));
    assert!(CharClass::Digits.contains('7'));
    assert!(CharClass::Alphanumerics.contains('7'));
    assert!(CharClass::Whitespace.contains('\t'));
    assert!(CharClass::Punctuation.contains(';'));
    assert!(CharClass::from("xyz").contains('y'));
    assert!(!CharClass::from("xyz").contains('a'));
    assert!(CharClass::Range('a', 'f').contains('f'));
    assert!(!CharClass::Range('a', 'f').contains('g'));
}

#[test]
fn class_accepts_one_char() {
    assert_eq!(CharClass::Letters.accept("aé1", 1), Some(3));
    assert_eq!(CharClass::Letters.accept("aé1", 3), None);
    assert_eq!(CharClass::Letters.accept("a", 1), None);
}

#[test]
fn pattern_is_anchored_at_offset() {
    let p = Pattern::new("[0-9]+").unwrap();
    assert_eq!(p.accept("ab123c", 2), Some(5));
    assert_eq!(p.accept("ab123c", 3), Some(5));
    assert_eq!(p.accept("ab123c", 0), None);
}

#[test]
fn pattern_sees_context() {
    let p = Pattern::new(r"\bvar\b").unwrap();
    assert_eq!(p.accept("var x", 0), Some(3));
    assert_eq!(p.accept("avar x", 1), None);
    assert_eq!(p.accept("varx", 0), None);
}

#[test]
fn pattern_identity_is_its_text() {
    assert_eq!(Pattern::new("a+").unwrap(), Pattern::new("a+").unwrap());
    assert_ne!(Pattern::new("a+").unwrap(), Pattern::new("a*").unwrap());
    assert_eq!(Pattern::new("a+").unwrap().as_str(), "a+");
}

#[test]
fn blackbox_identity_is_its_name() {
    let a = Blackbox::predicate("vowel", |c| "aeiou".contains(c));
    let b = Blackbox::predicate("vowel", |c| c == 'x');
    let c = Blackbox::predicate("consonant", |c| c.is_alphabetic() && !"aeiou".contains(c));
    assert_eq!(a, b);
    assert_ne!(a, c);
    assert_eq!(format!("{:?}", a), "blackbox[vowel]");
    assert_eq!(a.name(), "vowel");
}

#[test]
fn blackbox_terminals() {
    // Runs of 'x' of any length, as a single terminal.
    let xs = Blackbox::new("xs", |input: &str, at: usize| {
        let len = input[at..].chars().take_while(|&c| c == 'x').count();
        Some(at + len)
    });
    let g = grammar(vec![
        Production::alternatives("S", [
            vec![Symbol::blackbox(xs), n("Y")],
            vec![n("Y")],
        ]),
        vec![Production::new("Y", vec![Symbol::blackbox(Blackbox::predicate("y", |c| c == 'y'))])],
    ], "S");

    assert!(g.recognizes("xxxy"));
    assert!(g.recognizes("y"));
    assert!(!g.recognizes("xxx"));
    assert!(!g.recognizes("xxyy"));

    let trees = g.all_syntax_trees("xxxy").unwrap();
    assert_eq!(trees.len(), 1);
    assert_eq!(trees[0].rendered("xxxy"), r#"S("xxx" Y("y"))"#);
}
