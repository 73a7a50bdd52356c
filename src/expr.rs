//! The expression tree (spec §3) and its canonical textual rendering (§4.6).

use std::fmt;
use std::sync::Arc;

/// A predicate over one element of the input sequence, supplied by a
/// [`crate::TokenFactory`]. `Arc`, not `Rc`: a compiled regular
/// expression must be shareable read-only across threads (spec §5).
pub type Predicate<T> = Arc<dyn Fn(&T) -> bool + Send + Sync>;

/// A node in the parsed expression tree. Immutable after construction.
pub enum Expression<T> {
    /// A token pattern: the predicate the factory produced, plus the
    /// original bracketed text (`<word>`, `[digit]`, ...) for round-tripping.
    Leaf { predicate: Predicate<T>, source: String },
    /// `^`
    StartAnchor,
    /// `$`
    EndAnchor,
    /// `(...)` — capturing, anonymous.
    MatchingGroup(Vec<Expression<T>>),
    /// `(<name>:...)` — capturing, named.
    NamedGroup(String, Vec<Expression<T>>),
    /// `(?:...)` — non-capturing.
    NonMatchingGroup(Vec<Expression<T>>),
    /// `a | b`, right-leaning for N-ary chains (§4.1).
    Alternation(Box<Expression<T>>, Box<Expression<T>>),
    /// `a?`
    Option(Box<Expression<T>>),
    /// `a*`
    Star(Box<Expression<T>>),
    /// `a+`
    Plus(Box<Expression<T>>),
    /// `a{min,max}`
    MinMax(Box<Expression<T>>, usize, usize),
}

impl<T> Expression<T> {
    /// Smallest number of input elements this expression could consume
    /// on some path to its exit (§4.2). Used to prune impossible start
    /// positions in `find`.
    pub(crate) fn min_match_len(&self) -> usize {
        match self {
            Self::Leaf { .. } => 1,
            Self::StartAnchor | Self::EndAnchor => 0,
            Self::MatchingGroup(children)
            | Self::NonMatchingGroup(children)
            | Self::NamedGroup(_, children) => children.iter().map(Self::min_match_len).sum(),
            Self::Alternation(a, b) => a.min_match_len().min(b.min_match_len()),
            Self::Option(_) | Self::Star(_) => 0,
            Self::Plus(c) => c.min_match_len(),
            Self::MinMax(c, min, _) => min * c.min_match_len(),
        }
    }
}

// A hand-written `Clone`, not `#[derive(Clone)]`: deriving would add a
// `T: Clone` bound to every impl even though the only data that
// mentions `T` at all is behind `Arc<dyn Fn(&T) -> bool + ...>`, which
// is `Clone` regardless of what `T` is.
impl<T> Clone for Expression<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Leaf { predicate, source } => Self::Leaf {
                predicate: Arc::clone(predicate),
                source: source.clone(),
            },
            Self::StartAnchor => Self::StartAnchor,
            Self::EndAnchor => Self::EndAnchor,
            Self::MatchingGroup(c) => Self::MatchingGroup(c.clone()),
            Self::NamedGroup(name, c) => Self::NamedGroup(name.clone(), c.clone()),
            Self::NonMatchingGroup(c) => Self::NonMatchingGroup(c.clone()),
            Self::Alternation(a, b) => Self::Alternation(a.clone(), b.clone()),
            Self::Option(c) => Self::Option(c.clone()),
            Self::Star(c) => Self::Star(c.clone()),
            Self::Plus(c) => Self::Plus(c.clone()),
            Self::MinMax(c, min, max) => Self::MinMax(c.clone(), *min, *max),
        }
    }
}

impl<T> fmt::Debug for Expression<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Predicates aren't `Debug`; render via the canonical text form.
        write!(f, "Expression({self})")
    }
}

fn render_children<T>(f: &mut fmt::Formatter<'_>, children: &[Expression<T>]) -> fmt::Result {
    for (i, c) in children.iter().enumerate() {
        if i > 0 {
            write!(f, " ")?;
        }
        write!(f, "{c}")?;
    }
    Ok(())
}

impl<T> fmt::Display for Expression<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Leaf { source, .. } => write!(f, "{source}"),
            Self::StartAnchor => write!(f, "^"),
            Self::EndAnchor => write!(f, "$"),
            Self::MatchingGroup(children) => {
                write!(f, "(")?;
                render_children(f, children)?;
                write!(f, ")")
            }
            Self::NamedGroup(name, children) => {
                write!(f, "({name}:")?;
                render_children(f, children)?;
                write!(f, ")")
            }
            Self::NonMatchingGroup(children) => {
                write!(f, "(?:")?;
                render_children(f, children)?;
                write!(f, ")")
            }
            Self::Alternation(a, b) => write!(f, "{a} | {b}"),
            Self::Option(c) => write!(f, "{}?", Parenthesized(c)),
            Self::Star(c) => write!(f, "{}*", Parenthesized(c)),
            Self::Plus(c) => write!(f, "{}+", Parenthesized(c)),
            Self::MinMax(c, min, max) => write!(f, "{}{{{min},{max}}}", Parenthesized(c)),
        }
    }
}

/// Wraps a quantifier's child in `(?:...)` when it isn't already a
/// single atom, so `(<a>|<b>)+` round-trips instead of rendering as
/// the ambiguous `<a>|<b>+`.
struct Parenthesized<'e, T>(&'e Expression<T>);

impl<T> fmt::Display for Parenthesized<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Expression::Leaf { .. }
            | Expression::StartAnchor
            | Expression::EndAnchor
            | Expression::MatchingGroup(_)
            | Expression::NamedGroup(_, _)
            | Expression::NonMatchingGroup(_)
            | Expression::Option(_)
            | Expression::Star(_)
            | Expression::Plus(_)
            | Expression::MinMax(_, _, _) => write!(f, "{}", self.0),
            Expression::Alternation(_, _) => write!(f, "(?:{})", self.0),
        }
    }
}
