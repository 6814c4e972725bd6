use crate::cyk::{self, Mode};
use crate::forest;
use crate::grammar::Grammar;
use crate::{ParseTree, SyntaxError};

pub trait Parser {
    /// One syntax tree of `input`: for ambiguous grammars, the first in
    /// [`AmbiguousGrammarParser::all_syntax_trees`] order.
    fn syntax_tree(&self, input: &str) -> Result<ParseTree, SyntaxError>;

    fn recognizes(&self, input: &str) -> bool {
        self.syntax_tree(input).is_ok()
    }
}

pub trait AmbiguousGrammarParser: Parser {
    /// Every syntax tree of `input`, without duplicates; never empty.
    fn all_syntax_trees(&self, input: &str) -> Result<Vec<ParseTree>, SyntaxError>;
}

fn parse(grammar: &Grammar, input: &str, mode: Mode) -> Result<Vec<ParseTree>, SyntaxError> {
    let table = cyk::recognize(grammar.normalized(), input, mode);
    if !table.accepts(grammar.normalized()) {
        return Err(table.diagnose(input));
    }
    Ok(forest::trees(grammar, &table))
}

impl Parser for Grammar {
    fn syntax_tree(&self, input: &str) -> Result<ParseTree, SyntaxError> {
        let mut trees = parse(self, input, Mode::First)?;
        match trees.len() {
            1 => Ok(trees.remove(0)),
            k => unreachable!("first-derivation table yielded {} trees for {:?}", k, input),
        }
    }

    fn recognizes(&self, input: &str) -> bool {
        let normal = self.normalized();
        cyk::recognize(normal, input, Mode::First).accepts(normal)
    }
}

impl AmbiguousGrammarParser for Grammar {
    fn all_syntax_trees(&self, input: &str) -> Result<Vec<ParseTree>, SyntaxError> {
        parse(self, input, Mode::Exhaustive)
    }
}
