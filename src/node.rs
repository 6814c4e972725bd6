mod tree;

/// A syntax tree: inner nodes are keyed by a non-terminal, leaves hold a
/// piece of the input (for parse trees, its byte range).
#[derive(Clone, PartialEq, Eq, Hash)]
pub enum SyntaxTree<K, L> {
    Node(K, Vec<SyntaxTree<K, L>>),
    Leaf(L),
}

// const NONTERM_BRACKETS: (char, char) = ('⟨', '⟩');
const NONTERM_BRACKETS: (char, char) = ('(', ')');

impl<K, L> SyntaxTree<K, L> {
    fn fmt_map(
        &self,
        w: &mut std::fmt::Formatter,
        key: &impl Fn(&K, &mut std::fmt::Formatter) -> std::fmt::Result,
        leaf: &impl Fn(&L, &mut std::fmt::Formatter) -> std::fmt::Result) -> std::fmt::Result
    {
        match self {
            SyntaxTree::Leaf(l) => leaf(l, w),
            SyntaxTree::Node(k, children) => {
                let bd = NONTERM_BRACKETS;
                key(k, w)?;
                write!(w, "{}", bd.0)?;
                for (i, child) in children.iter().enumerate() {
                    if i > 0 {
                        write!(w, " ")?;
                    }
                    child.fmt_map(w, key, leaf)?;
                }
                write!(w, "{}", bd.1)
            }
        }
    }
}

impl<K: std::fmt::Debug, L: std::fmt::Debug> std::fmt::Debug for SyntaxTree<K, L> {
    fn fmt(&self, w: &mut std::fmt::Formatter) -> std::fmt::Result {
        self.fmt_map(w, &|k, w| write!(w, "{:?}", k), &|l, w| write!(w, "{:?}", l))
    }
}

impl<K: std::fmt::Display, L: std::fmt::Debug> std::fmt::Display for SyntaxTree<K, L> {
    fn fmt(&self, w: &mut std::fmt::Formatter) -> std::fmt::Result {
        self.fmt_map(w, &|k, w| write!(w, "{}", k), &|l, w| write!(w, "{:?}", l))
    }
}

impl<K, L> SyntaxTree<K, L> {
    pub fn key(&self) -> Option<&K> {
        if let SyntaxTree::Node(k, _) = self { Some(k) } else { None }
    }

    pub fn children(&self) -> &[SyntaxTree<K, L>] {
        if let SyntaxTree::Node(_, children) = self { children } else { &[] }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, SyntaxTree::Leaf(_))
    }
}
