// This is actually defined at `crate::forest::tests_for_forest`

use crate::cyk::{recognize, Mode};
use crate::forest::*;
use crate::tests::*;
use crate::{n, t, AmbiguousGrammarParser, Grammar, NonTerm, Parser, ParseTree, Production, Rendered, SyntaxTree};
use expect_test::expect;
use std::collections::HashSet;

fn render_all(g: &Grammar, input: &str) -> Vec<String> {
    g.all_syntax_trees(input).unwrap().iter().map(|tree| tree.rendered(input)).collect()
}

fn keys(tree: &ParseTree, accum: &mut Vec<NonTerm>) {
    if let SyntaxTree::Node(k, children) = tree {
        accum.push(k.clone());
        for child in children {
            keys(child, accum);
        }
    }
}

fn catalan() -> Grammar {
    grammar(vec![Production::alternatives("S", [vec![n("S"), n("S")], vec![t("a")]])], "S")
}

#[test]
fn brackets_nest() {
    let g = brackets();
    assert_eq!(g.syntax_tree("()").unwrap().rendered("()"), r#"S("(" S() ")")"#);
    assert_eq!(g.syntax_tree("{{}}").unwrap().rendered("{{}}"), r#"S("{" S("{" S() "}") "}")"#);
    expect![[r#"S("(" S("[" S("{" S() "}") "]") ")")"#]]
        .assert_eq(&g.syntax_tree("([{}])").unwrap().rendered("([{}])"));
}

#[test]
fn empty_word() {
    let g = brackets();
    let tree = g.syntax_tree("").unwrap();
    assert_eq!(tree, SyntaxTree::Node("S".into(), vec![]));
    assert_eq!(g.all_syntax_trees("").unwrap(), vec![tree]);
}

#[test]
fn dropped_positions_are_reinserted() {
    let g = grammar(vec![
        vec![Production::new("S", vec![n("A"), t("x")])],
        vec![Production::new("A", vec![n("B"), n("B")])],
        Production::alternatives("B", [vec![t("")], vec![t("b")]]),
    ], "S");
    assert_eq!(render_all(&g, "x"), vec![r#"S(A(B("") B("")) "x")"#]);
    assert_eq!(render_all(&g, "bx"), vec![
        r#"S(A(B("b") B("")) "x")"#,
        r#"S(A(B("") B("b")) "x")"#,
    ]);
    assert_eq!(render_all(&g, "bbx"), vec![r#"S(A(B("b") B("b")) "x")"#]);

    // Empty leaves sit where the dropped symbol would have been.
    let trees = g.all_syntax_trees("bx").unwrap();
    assert_eq!(trees[0].leaves(), vec![&(0..1), &(1..1), &(1..2)]);
    assert_eq!(trees[1].leaves(), vec![&(0..0), &(0..1), &(1..2)]);
}

#[test]
fn units_are_rewrapped() {
    let g = grammar(vec![
        Production::alternatives("S", [vec![n("A")], vec![t("b")]]),
        Production::alternatives("A", [vec![t("a")], vec![n("S"), t("c")]]),
    ], "S");
    assert_eq!(render_all(&g, "a"), vec![r#"S(A("a"))"#]);
    assert_eq!(render_all(&g, "bcc"), vec![r#"S(A(S(A(S("b") "c")) "c"))"#]);
}

#[test]
fn every_unit_route_is_a_tree() {
    let g = grammar(vec![
        Production::alternatives("X0", [vec![n("X1")], vec![n("X2")], vec![t("a")]]),
        Production::alternatives("X1", [vec![n("X0")], vec![n("X2")], vec![t("a")]]),
        Production::alternatives("X2", [vec![n("X0")], vec![n("X1")], vec![t("a")]]),
    ], "X0");
    assert_eq!(g.syntax_tree("a").unwrap().rendered("a"), r#"X0("a")"#);
    expect![[r#"
        X0("a")
        X0(X1("a"))
        X0(X2(X1("a")))
        X0(X2("a"))
        X0(X1(X2("a")))"#]].assert_eq(&g.all_syntax_trees("a").unwrap().rendered("a"));
}

#[test]
fn every_empty_derivation_is_a_tree() {
    let g = grammar(vec![
        vec![Production::new("S", vec![n("X"), t("a")])],
        Production::alternatives("X", [vec![], vec![n("Y")]]),
        vec![Production::empty("Y")],
    ], "S");
    assert_eq!(g.syntax_tree("a").unwrap().rendered("a"), r#"S(X() "a")"#);
    assert_eq!(render_all(&g, "a"), vec![r#"S(X() "a")"#, r#"S(X(Y()) "a")"#]);

    let g = grammar(vec![
        Production::alternatives("S", [vec![n("A")], vec![n("B")]]),
        vec![Production::empty("A")],
        vec![Production::empty("B")],
    ], "S");
    assert_eq!(g.syntax_tree("").unwrap().rendered(""), "S(A())");
    assert_eq!(render_all(&g, ""), vec!["S(A())", "S(B())"]);
}

#[test]
fn empty_derivations_never_nest_themselves() {
    // `S ::= S` and `S ::= T`, `T ::= S` would give infinitely many trees.
    let g = grammar(vec![
        Production::alternatives("S", [vec![n("S")], vec![n("T")], vec![]]),
        Production::alternatives("T", [vec![n("S")], vec![]]),
    ], "S");
    assert_eq!(render_all(&g, ""), vec!["S()", "S(T())"]);
}

#[test]
fn ambiguity_is_exhaustive() {
    let g = ambiguous();
    assert_eq!(g.all_syntax_trees("aabcc").unwrap().len(), 2);
    assert_eq!(g.all_syntax_trees("ccaab").unwrap().len(), 4);

    let g = catalan();
    assert_eq!(g.all_syntax_trees("a").unwrap().len(), 1);
    assert_eq!(g.all_syntax_trees("aaa").unwrap().len(), 2);
    assert_eq!(g.all_syntax_trees("aaaa").unwrap().len(), 5);
    assert_eq!(g.all_syntax_trees("aaaaaa").unwrap().len(), 42);
}

#[test]
fn smaller_splits_come_first() {
    expect![[r#"
        S(S("a") S(S("a") S("a")))
        S(S(S("a") S("a")) S("a"))"#]].assert_eq(&catalan().all_syntax_trees("aaa").unwrap().rendered("aaa"));
}

#[test]
fn first_tree_leads_all_trees() {
    let cases: Vec<(Grammar, Vec<&str>)> = vec![
        (brackets(), vec!["", "()", "[{}]"]),
        (pairs(), vec!["(){()}", "{}()()"]),
        (ambiguous(), vec!["aabcc", "ccaab"]),
        (catalan(), vec!["aaaa"]),
        (arithmetic(), vec!["-a+b*c", "(a)"]),
    ];
    for (g, words) in cases {
        for word in words {
            let first = g.syntax_tree(word).unwrap();
            let all = g.all_syntax_trees(word).unwrap();
            assert_eq!(first, all[0], "{:?}", word);
        }
    }
}

#[test]
fn trees_derive_their_input() {
    let cases: Vec<(Grammar, Vec<&str>)> = vec![
        (brackets(), vec!["", "()", "[{}]", "([()])"]),
        (pairs(), vec!["(){()}"]),
        (ambiguous(), vec!["aabcc", "ccaab"]),
        (arithmetic(), vec!["(-a+b)*-(b+a)", "x1+y22"]),
        (declarations(), vec!["let hello = 42.1337", "var x: Int = (1 + y) * -2"]),
    ];
    for (g, words) in cases {
        let nonterms = g.nonterms();
        for word in words {
            let trees = g.all_syntax_trees(word).unwrap();
            assert!(!trees.is_empty());
            for tree in &trees {
                assert_derives(&g, tree, word);
                let mut seen = vec![];
                keys(tree, &mut seen);
                assert!(seen.iter().all(|k| nonterms.contains(k)));
            }
            let unique: HashSet<&ParseTree> = trees.iter().collect();
            assert_eq!(unique.len(), trees.len());
        }
    }
}

#[test]
fn arithmetic_trees() {
    let g = arithmetic();
    expect![[r#"S(X("(") U(S("a") Y(")")))"#]].assert_eq(&g.syntax_tree("(a)").unwrap().rendered("(a)"));
    expect![[r#"
        S(Neg("-") S(S("a") V(Op("+") S("b"))))
        S(S(Neg("-") S("a")) V(Op("+") S("b")))"#]].assert_eq(&render_all(&g, "-a+b").join("\n"));
}

#[test]
fn rejected_tables_yield_nothing() {
    let g = pairs();
    let table = recognize(g.normalized(), "(){", Mode::Exhaustive);
    assert!(trees(&g, &table).is_empty());
    let table = recognize(g.normalized(), "", Mode::Exhaustive);
    assert!(trees(&g, &table).is_empty());
}

#[test]
fn syntax_errors() {
    let g = pairs();
    let err = g.syntax_tree("(x)").unwrap_err();
    assert_eq!(err.reason, crate::Reason::UnknownToken);
    assert_eq!(err.input, "(x)");
    assert!(g.all_syntax_trees("").is_err());
    assert!(!g.recognizes("(("));
}

#[test]
fn declaration_outline() {
    let g = declarations();
    let input = r#"let hello = "World""#;
    assert_eq!(g.all_syntax_trees(input).unwrap().len(), 1);

    let punctuation = ["Whitespace", "OpenParenthesis", "CloseParenthesis", "Assignment", "Colon"];
    let structural = [
        "BinaryOperationStart",
        "ParenthesisExpressionBegin",
        "VarNameAssignment",
        "VarNameAssignmentRest",
        "VarNameType",
        "VarTypeBegin",
    ];
    let outline = g.syntax_tree(input).unwrap()
        .filter(&|k| !punctuation.contains(&k.name()))
        .unwrap()
        .compressed()
        .explode(&|k| structural.contains(&k.name()))
        .remove(0)
        .compressed()
        .map_leaves(&|r| &input[r]);
    expect![[r#"VarDeclaration(VarDeclarationKeyword("let") VarName("hello") ValueExpression("\"World\""))"#]]
        .assert_eq(&outline.to_string());
}
