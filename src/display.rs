use crate::blackbox::CharClass;
use crate::grammar::{Grammar, NonTerm, Production, Symbol, Term};
use crate::normal::{Body, Normal, NtId, NtKind};

impl std::fmt::Display for CharClass {
    fn fmt(&self, w: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            CharClass::Letters => write!(w, "[:alpha:]"),
            CharClass::Digits => write!(w, "[:digit:]"),
            CharClass::Alphanumerics => write!(w, "[:alnum:]"),
            CharClass::Whitespace => write!(w, "[:space:]"),
            CharClass::Punctuation => write!(w, "[:punct:]"),
            CharClass::Set(cs) => {
                let content: String = cs.iter().collect();
                write!(w, "[{}]", content)
            }
            CharClass::Range(lo, hi) => write!(w, "[{}-{}]", lo, hi),
        }
    }
}

impl std::fmt::Display for Term {
    fn fmt(&self, w: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Term::Lit(s) => write!(w, "'{}'", s),
            Term::Class(class) => write!(w, "{}", class),
            Term::Pattern(p) => write!(w, "/{}/", p.as_str()),
            Term::Blackbox(bb) => write!(w, "{:?}", bb),
        }
    }
}

impl std::fmt::Display for Symbol {
    fn fmt(&self, w: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Symbol::NonTerm(NonTerm(name)) => write!(w, "{}", name),
            Symbol::Term(t) => write!(w, "{}", t),
        }
    }
}

struct RightSide<'a>(&'a [Symbol]);

impl std::fmt::Display for RightSide<'_> {
    fn fmt(&self, w: &mut std::fmt::Formatter) -> std::fmt::Result {
        if self.0.is_empty() {
            return write!(w, "''");
        }
        for (i, sym) in self.0.iter().enumerate() {
            if i > 0 {
                write!(w, " ")?;
            }
            write!(w, "{}", sym)?;
        }
        Ok(())
    }
}

impl std::fmt::Display for Production {
    fn fmt(&self, w: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(w, "{} ::= {}", self.lhs, RightSide(&self.rhs))
    }
}

/// One line per non-terminal, in order of first appearance, listing its
/// alternatives; the start symbol's line comes first.
impl std::fmt::Display for Grammar {
    fn fmt(&self, w: &mut std::fmt::Formatter) -> std::fmt::Result {
        let mut order: Vec<&NonTerm> = vec![&self.start];
        for p in &self.productions {
            if !order.contains(&&p.lhs) {
                order.push(&p.lhs);
            }
        }
        for (i, nt) in order.into_iter().enumerate() {
            if i > 0 {
                writeln!(w)?;
            }
            write!(w, "{} ::=", nt)?;
            for (j, p) in self.alternatives(nt).enumerate() {
                if j > 0 {
                    write!(w, " |")?;
                }
                write!(w, " {}", RightSide(&p.rhs))?;
            }
        }
        Ok(())
    }
}

struct Name<'a>(&'a Normal, NtId);

impl std::fmt::Display for Name<'_> {
    fn fmt(&self, w: &mut std::fmt::Formatter) -> std::fmt::Result {
        let Name(normal, nt) = *self;
        match &normal.nts[nt] {
            NtKind::Start => write!(w, "<start>"),
            NtKind::Source(NonTerm(name)) => write!(w, "{}", name),
            NtKind::Tail(v, k) => write!(w, "<v{}.{}>", v, k),
            NtKind::Wrap(t) => write!(w, "<{}>", normal.terms[*t]),
        }
    }
}

/// One line per rule, in rule order; the empty word, if accepted, comes
/// first as `<start> ::= ''`.
impl std::fmt::Display for Normal {
    fn fmt(&self, w: &mut std::fmt::Formatter) -> std::fmt::Result {
        let mut lines = vec![];
        if self.accepts_empty {
            lines.push("<start> ::= ''".to_string());
        }
        for rule in &self.rules {
            let body = match rule.body {
                Body::Term(t) => format!("{}", self.terms[t]),
                Body::Pair(b, c) => format!("{} {}", Name(self, b), Name(self, c)),
            };
            lines.push(format!("{} ::= {}", Name(self, rule.lhs), body));
        }
        write!(w, "{}", lines.join("\n"))
    }
}
