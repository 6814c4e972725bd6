use crate::ParseTree;
use crate::node::SyntaxTree;

pub trait Rendered {
    /// Renders against the `input` that was parsed, so leaves show text
    /// rather than byte ranges.
    fn rendered(&self, input: &str) -> String;
}

impl Rendered for ParseTree {
    fn rendered(&self, input: &str) -> String {
        match self {
            SyntaxTree::Leaf(range) => format!("{:?}", &input[range.clone()]),
            SyntaxTree::Node(nt, children) => {
                let content: Vec<String> = children.iter().map(|c| c.rendered(input)).collect();
                format!("{}({})", nt, content.join(" "))
            }
        }
    }
}

impl Rendered for [ParseTree] {
    fn rendered(&self, input: &str) -> String {
        self.iter()
            .map(|t| t.rendered(input))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
