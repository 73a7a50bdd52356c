//! Recursive-descent parser for spec §4.1's grammar.
//!
//! Two precedence levels, both implemented directly rather than via a
//! general Pratt table — the grammar only has two infix operators:
//! implicit concatenation (highest precedence, no token of its own)
//! and `|` (lowest precedence, right-associative). Parsing alternation
//! as "one or more concat-sequences separated by `|`, folded from the
//! right" is what produces the right-leaning `Alternation(A,
//! Alternation(B, C))` shape spec §4.1/§9 calls for, with no rebalancing
//! pass needed afterwards.

mod lexer;

use lexer::Scanner;

use crate::error::TokenizationError;
use crate::expr::Expression;
use crate::TokenFactory;

enum GroupKind {
    Capturing,
    Named(String),
    NonCapturing,
}

/// Parses `source` into the top-level sequence of atoms a pattern
/// produces (to be wrapped in an implicit `MatchingGroup` at compile
/// time, per spec §4.1).
pub(crate) fn parse<T>(
    source: &str,
    factory: &dyn TokenFactory<T>,
) -> Result<Vec<Expression<T>>, TokenizationError> {
    let mut scanner = Scanner::new(source);
    let body = parse_body(&mut scanner, factory)?;
    scanner.skip_whitespace();
    if scanner.peek().is_some() {
        // parse_concat_seq only ever stops at '|' (consumed by
        // parse_body's alternation loop), EOF, or ')' — anything left
        // over here is a ')' with no matching '('.
        return Err(TokenizationError::UnmatchedClose { offset: scanner.pos() });
    }
    Ok(body)
}

/// `concat_seq ('|' concat_seq)*`, folded right-associatively.
fn parse_body<T>(
    scanner: &mut Scanner<'_>,
    factory: &dyn TokenFactory<T>,
) -> Result<Vec<Expression<T>>, TokenizationError> {
    let first = parse_concat_seq(scanner, factory)?;
    if first.is_empty() && scanner.peek() == Some('|') {
        return Err(TokenizationError::DanglingAlternation { offset: scanner.pos() });
    }

    let mut alternatives = vec![first];
    while scanner.peek() == Some('|') {
        let bar_offset = scanner.pos();
        scanner.bump();
        let seq = parse_concat_seq(scanner, factory)?;
        if seq.is_empty() {
            return Err(TokenizationError::DanglingAlternation { offset: bar_offset });
        }
        alternatives.push(seq);
    }

    if alternatives.len() == 1 {
        return Ok(alternatives.into_iter().next().unwrap());
    }

    let mut rev = alternatives.into_iter().rev();
    let mut acc = wrap_alternative(rev.next().unwrap());
    for seq in rev {
        acc = Expression::Alternation(Box::new(wrap_alternative(seq)), Box::new(acc));
    }
    Ok(vec![acc])
}

/// An alternation operand is a single `Expression`; a multi-atom
/// concat-sequence is wrapped in a semantically-transparent
/// `NonMatchingGroup` so it can stand as one node.
fn wrap_alternative<T>(mut seq: Vec<Expression<T>>) -> Expression<T> {
    if seq.len() == 1 {
        seq.pop().unwrap()
    } else {
        Expression::NonMatchingGroup(seq)
    }
}

/// Zero or more quantified atoms, stopping at `|`, `)`, or end of input.
fn parse_concat_seq<T>(
    scanner: &mut Scanner<'_>,
    factory: &dyn TokenFactory<T>,
) -> Result<Vec<Expression<T>>, TokenizationError> {
    let mut atoms = Vec::new();
    loop {
        scanner.skip_whitespace();
        match scanner.peek() {
            None | Some('|') | Some(')') => break,
            _ => atoms.push(parse_quantified_atom(scanner, factory)?),
        }
    }
    Ok(atoms)
}

fn parse_quantified_atom<T>(
    scanner: &mut Scanner<'_>,
    factory: &dyn TokenFactory<T>,
) -> Result<Expression<T>, TokenizationError> {
    let mut atom = parse_atom(scanner, factory)?;
    loop {
        match scanner.peek() {
            Some('?') => {
                scanner.bump();
                atom = Expression::Option(Box::new(atom));
            }
            Some('*') => {
                scanner.bump();
                atom = Expression::Star(Box::new(atom));
            }
            Some('+') => {
                scanner.bump();
                atom = Expression::Plus(Box::new(atom));
            }
            Some('{') => {
                let (min, max) = parse_bounds(scanner)?;
                atom = Expression::MinMax(Box::new(atom), min, max);
            }
            _ => break,
        }
    }
    Ok(atom)
}

fn parse_atom<T>(
    scanner: &mut Scanner<'_>,
    factory: &dyn TokenFactory<T>,
) -> Result<Expression<T>, TokenizationError> {
    let offset = scanner.pos();
    match scanner.peek() {
        Some('^') => {
            scanner.bump();
            Ok(Expression::StartAnchor)
        }
        Some('$') => {
            scanner.bump();
            Ok(Expression::EndAnchor)
        }
        Some('<') => parse_token(scanner, factory, '<', '>'),
        Some('[') => parse_token(scanner, factory, '[', ']'),
        Some('(') => parse_group(scanner, factory),
        Some(c @ ('?' | '*' | '+' | '{')) => {
            scanner.bump();
            Err(TokenizationError::QuantifierWithoutAtom { offset, fragment: c.to_string() })
        }
        Some(found) => Err(TokenizationError::UnknownSymbol { offset, found }),
        None => Err(TokenizationError::UnexpectedEnd { offset }),
    }
}

fn parse_token<T>(
    scanner: &mut Scanner<'_>,
    factory: &dyn TokenFactory<T>,
    open: char,
    close: char,
) -> Result<Expression<T>, TokenizationError> {
    let offset = scanner.pos();
    let inner = scanner
        .scan_bracketed(open, close)
        .map_err(|(offset, open)| TokenizationError::UnmatchedOpen { offset, open })?;
    let predicate = factory(&inner).map_err(|source| TokenizationError::Factory {
        offset,
        token: inner.clone(),
        source,
    })?;
    Ok(Expression::Leaf { predicate, source: format!("{open}{inner}{close}") })
}

fn parse_group<T>(
    scanner: &mut Scanner<'_>,
    factory: &dyn TokenFactory<T>,
) -> Result<Expression<T>, TokenizationError> {
    let open_offset = scanner.pos();
    scanner.bump();

    let kind = if scanner.try_consume_non_capturing_prefix() {
        GroupKind::NonCapturing
    } else if let Some(name) = scanner.try_consume_named_prefix() {
        GroupKind::Named(name)
    } else {
        GroupKind::Capturing
    };

    let children = parse_body(scanner, factory)?;
    if children.is_empty() {
        return Err(TokenizationError::EmptyGroup { offset: open_offset });
    }

    match scanner.bump() {
        Some(')') => {}
        _ => return Err(TokenizationError::UnmatchedOpen { offset: open_offset, open: '(' }),
    }

    Ok(match kind {
        GroupKind::Capturing => Expression::MatchingGroup(children),
        GroupKind::Named(name) => Expression::NamedGroup(name, children),
        GroupKind::NonCapturing => Expression::NonMatchingGroup(children),
    })
}

/// `{m,n}` or `{m}` (shorthand for `{m,m}`).
fn parse_bounds(scanner: &mut Scanner<'_>) -> Result<(usize, usize), TokenizationError> {
    let offset = scanner.pos();
    scanner.bump(); // '{'
    let min = parse_integer(scanner, offset)?;
    let max = if scanner.peek() == Some(',') {
        scanner.bump();
        parse_integer(scanner, offset)?
    } else {
        min
    };
    match scanner.bump() {
        Some('}') => {}
        _ => return Err(TokenizationError::UnexpectedEnd { offset }),
    }
    if min > max {
        return Err(TokenizationError::InvalidBounds { offset, min, max });
    }
    Ok((min, max))
}

fn parse_integer(scanner: &mut Scanner<'_>, bounds_offset: usize) -> Result<usize, TokenizationError> {
    let mut digits = String::new();
    while matches!(scanner.peek(), Some(c) if c.is_ascii_digit()) {
        digits.push(scanner.bump().unwrap());
    }
    digits
        .parse()
        .map_err(|_| TokenizationError::UnexpectedEnd { offset: bounds_offset })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::literal::literal_word_factory;

    fn parse_words(source: &str) -> Result<Vec<Expression<String>>, TokenizationError> {
        parse(source, &literal_word_factory())
    }

    #[test]
    fn empty_pattern_parses_to_empty_body() {
        assert_eq!(parse_words("").unwrap().len(), 0);
    }

    #[test]
    fn concat_of_tokens() {
        let body = parse_words("<the> <cat>").unwrap();
        assert_eq!(body.len(), 2);
        assert_eq!(body[0].to_string(), "<the>");
        assert_eq!(body[1].to_string(), "<cat>");
    }

    #[test]
    fn alternation_is_right_associative() {
        let body = parse_words("<a>|<b>|<c>").unwrap();
        assert_eq!(body.len(), 1);
        assert_eq!(body[0].to_string(), "<a> | <b> | <c>");
        match &body[0] {
            Expression::Alternation(a, rest) => {
                assert_eq!(a.to_string(), "<a>");
                assert!(matches!(**rest, Expression::Alternation(_, _)));
            }
            _ => panic!("expected alternation"),
        }
    }

    #[test]
    fn alternation_spans_whole_operand_sequences() {
        let body = parse_words("<a> <b> | <c>").unwrap();
        assert_eq!(body.len(), 1);
        match &body[0] {
            Expression::Alternation(a, b) => {
                assert!(matches!(**a, Expression::NonMatchingGroup(_)));
                assert!(matches!(**b, Expression::Leaf { .. }));
            }
            _ => panic!("expected alternation"),
        }
    }

    #[test]
    fn quantifiers_bind_tighter_than_alternation() {
        let body = parse_words("<a>* | <b>").unwrap();
        match &body[0] {
            Expression::Alternation(a, _) => assert!(matches!(**a, Expression::Star(_))),
            _ => panic!("expected alternation"),
        }
    }

    #[test]
    fn named_and_non_capturing_groups() {
        let body = parse_words("(<name>:<hi>) (?:<a>|<b>)").unwrap();
        assert!(matches!(body[0], Expression::NamedGroup(ref n, _) if n == "name"));
        assert!(matches!(body[1], Expression::NonMatchingGroup(_)));
    }

    #[test]
    fn plain_group_starting_with_a_token_is_not_misread_as_named() {
        let body = parse_words("(<a> <b>)").unwrap();
        assert!(matches!(body[0], Expression::MatchingGroup(ref c) if c.len() == 2));
    }

    #[test]
    fn bounded_quantifier() {
        let body = parse_words("<a>{2,3}").unwrap();
        assert!(matches!(body[0], Expression::MinMax(_, 2, 3)));
    }

    #[test]
    fn dangling_leading_bar_is_an_error() {
        assert!(matches!(
            parse_words("|<a>"),
            Err(TokenizationError::DanglingAlternation { offset: 0 })
        ));
    }

    #[test]
    fn dangling_trailing_bar_is_an_error() {
        assert!(matches!(parse_words("<a>|"), Err(TokenizationError::DanglingAlternation { .. })));
    }

    #[test]
    fn quantifier_without_atom_is_an_error() {
        assert!(matches!(parse_words("*<a>"), Err(TokenizationError::QuantifierWithoutAtom { .. })));
    }

    #[test]
    fn inverted_bounds_are_an_error() {
        assert!(matches!(
            parse_words("<a>{3,2}"),
            Err(TokenizationError::InvalidBounds { min: 3, max: 2, .. })
        ));
    }

    #[test]
    fn unmatched_open_paren_is_an_error() {
        assert!(matches!(parse_words("(<a>"), Err(TokenizationError::UnmatchedOpen { open: '(', .. })));
    }

    #[test]
    fn unmatched_open_token_bracket_is_an_error() {
        assert!(matches!(parse_words("<a"), Err(TokenizationError::UnmatchedOpen { open: '<', .. })));
    }

    #[test]
    fn unmatched_close_paren_is_an_error() {
        assert!(matches!(parse_words("<a>)"), Err(TokenizationError::UnmatchedClose { .. })));
    }

    #[test]
    fn empty_group_is_an_error() {
        assert!(matches!(parse_words("()"), Err(TokenizationError::EmptyGroup { .. })));
    }

    #[test]
    fn nested_non_capturing_star_of_alternation() {
        let body = parse_words("(?:(<a>|<b>)+)*").unwrap();
        assert!(matches!(body[0], Expression::Star(_)));
    }

    #[test]
    fn anchors_mid_pattern_parse_fine() {
        let body = parse_words("<a> ^ <b>").unwrap();
        assert_eq!(body.len(), 3);
        assert!(matches!(body[1], Expression::StartAnchor));
    }
}
