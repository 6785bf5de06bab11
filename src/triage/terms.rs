use regex::Regex;

/// Literal terms match by substring against an already-lowercased
/// haystack; patterns match unanchored and carry their own flags.
#[derive(Debug, Clone)]
pub enum Term {
    Literal(&'static str),
    Pattern(Regex),
}

impl Term {
    pub fn pattern(source: &str) -> Self {
        Term::Pattern(Regex::new(source).expect("valid term pattern"))
    }

    fn matches(&self, haystack: &str) -> bool {
        match self {
            Term::Literal(needle) => haystack.contains(needle),
            Term::Pattern(re) => re.is_match(haystack),
        }
    }
}

pub fn matches_any(terms: &[Term], haystack: &str) -> bool {
    terms.iter().any(|term| term.matches(haystack))
}
