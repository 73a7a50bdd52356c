use std::fmt;

/// A failure while turning surface syntax into an [`crate::expr::Expression`] tree.
///
/// Carries enough of the offending input to build a useful diagnostic:
/// the byte offset into the original pattern string and the fragment
/// of text the parser was looking at when it gave up.
#[derive(Debug)]
pub enum TokenizationError {
    /// A `(`, `<` or `[` was never closed.
    UnmatchedOpen { offset: usize, open: char },
    /// A `)` appeared with no matching `(`.
    UnmatchedClose { offset: usize },
    /// A `|` appeared with no atom before it, or at the very start of
    /// the pattern / a group.
    DanglingAlternation { offset: usize },
    /// A `?`, `*`, `+` or `{m,n}` had no preceding atom to quantify.
    QuantifierWithoutAtom { offset: usize, fragment: String },
    /// `{m,n}` with `m > n`.
    InvalidBounds { offset: usize, min: usize, max: usize },
    /// A character that isn't part of the grammar in §4.1.
    UnknownSymbol { offset: usize, found: char },
    /// The pattern ended mid-construct (e.g. `<word` with no `>`).
    UnexpectedEnd { offset: usize },
    /// `()`, `(?:)` or `(<name>:)` — groups' children must be non-empty (§3).
    EmptyGroup { offset: usize },
    /// The token factory rejected a token body.
    Factory {
        offset: usize,
        token: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl fmt::Display for TokenizationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnmatchedOpen { offset, open } => {
                write!(f, "unmatched '{open}' at offset {offset}")
            }
            Self::UnmatchedClose { offset } => {
                write!(f, "unmatched ')' at offset {offset}")
            }
            Self::DanglingAlternation { offset } => {
                write!(f, "'|' with no preceding atom at offset {offset}")
            }
            Self::QuantifierWithoutAtom { offset, fragment } => {
                write!(f, "quantifier '{fragment}' with no preceding atom at offset {offset}")
            }
            Self::InvalidBounds { offset, min, max } => {
                write!(f, "invalid bounds {{{min},{max}}} at offset {offset}: min must be <= max")
            }
            Self::UnknownSymbol { offset, found } => {
                write!(f, "unknown symbol '{found}' at offset {offset}")
            }
            Self::UnexpectedEnd { offset } => {
                write!(f, "pattern ended unexpectedly at offset {offset}")
            }
            Self::EmptyGroup { offset } => {
                write!(f, "empty group at offset {offset}: groups must contain at least one atom")
            }
            Self::Factory { offset, token, source } => {
                write!(f, "token factory rejected '{token}' at offset {offset}: {source}")
            }
        }
    }
}

impl std::error::Error for TokenizationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Factory { source, .. } => Some(source.as_ref()),
            _ => None,
        }
    }
}
