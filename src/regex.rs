//! `RegularExpression<T>`: the public facade (spec §6).

use std::fmt;
use std::hash::{Hash, Hasher};

use crate::error::TokenizationError;
use crate::expr::Expression;
use crate::graph_display::DiGraph;
use crate::group::{CapturedGroup, GroupId, Match};
use crate::matcher::{self, RawMatch};
use crate::nfa::{self, Nfa, State, Transition};
use crate::parse;
use crate::table::Table;
use crate::TokenFactory;

/// A compiled pattern over sequences of `T`. Immutable after
/// construction and `Send + Sync` as long as `T`'s token predicates
/// are (spec §5).
pub struct RegularExpression<T> {
    body: Vec<Expression<T>>,
    nfa: Nfa<T>,
    group_names: Vec<Option<String>>,
    min_match_len: usize,
}

impl<T> RegularExpression<T> {
    /// Parses `source` with `factory` and builds its automaton.
    pub fn compile(source: &str, factory: &dyn TokenFactory<T>) -> Result<Self, TokenizationError> {
        let body = parse::parse(source, factory)?;
        Ok(Self::from_body(body))
    }

    /// Builds a `RegularExpression` directly from an already-constructed
    /// tree, bypassing the parser and any token factory entirely. There
    /// is no "missing factory" failure mode here: every `Leaf` in `body`
    /// already carries a materialized predicate (the caller built it),
    /// so no factory is ever invoked at match time (spec §7's "usage
    /// error" family doesn't arise in this design — see DESIGN.md).
    pub fn compile_tree(body: Vec<Expression<T>>) -> Self {
        Self::from_body(body)
    }

    fn from_body(body: Vec<Expression<T>>) -> Self {
        let min_match_len = body.iter().map(Expression::min_match_len).sum();
        let nfa::Compiled { nfa, group_names } = nfa::compile(&body);
        Self { body, nfa, group_names, min_match_len }
    }

    /// Does the pattern match starting exactly at the front of `tokens`?
    pub fn looking_at(&self, tokens: &[T]) -> Option<Match> {
        self.looking_at_from(tokens, 0)
    }

    /// Does the pattern match starting exactly at `start`? `^`/`$` are
    /// checked against `tokens`' absolute start/end, not `start` itself.
    pub fn looking_at_from(&self, tokens: &[T], start: usize) -> Option<Match> {
        matcher::looking_at(&self.nfa, self.group_names.len(), tokens, start).map(|m| self.record(m))
    }

    /// The first match at or after index 0.
    pub fn find(&self, tokens: &[T]) -> Option<Match> {
        self.find_from(tokens, 0)
    }

    /// The first match at or after `start`.
    pub fn find_from(&self, tokens: &[T], start: usize) -> Option<Match> {
        matcher::find(&self.nfa, self.group_names.len(), self.min_match_len, tokens, start)
            .map(|m| self.record(m))
    }

    /// All non-overlapping matches, left to right. Empty matches are
    /// dropped (but still advance the search past themselves so an
    /// all-optional pattern can't loop forever — spec §4.3/§9).
    pub fn find_all(&self, tokens: &[T]) -> Vec<Match> {
        matcher::find_all(&self.nfa, self.group_names.len(), self.min_match_len, tokens)
            .into_iter()
            .map(|m| self.record(m))
            .collect()
    }

    /// True iff the whole of `tokens` is consumed by one match.
    pub fn matches(&self, tokens: &[T]) -> bool {
        self.looking_at(tokens).is_some_and(|m| m.end == tokens.len())
    }

    /// Sugar for `find(tokens).is_some()`.
    pub fn apply(&self, tokens: &[T]) -> bool {
        self.find(tokens).is_some()
    }

    /// Group names by parse-order index (`None` for anonymous groups).
    pub fn group_names(&self) -> &[Option<String>] {
        &self.group_names
    }

    /// A Graphviz rendering of the compiled automaton, for the CLI's
    /// `debug svg` subcommand (not part of spec.md's testable surface).
    pub fn to_graph(&self) -> DiGraph {
        (&self.nfa).into()
    }

    /// A pretty-printed transition table of the compiled automaton,
    /// for the CLI's `debug table` subcommand.
    pub fn transition_table(&self) -> String {
        let headers = ["Type", "State", "Label", "e1", "e2"].map(String::from);
        let mut data = Vec::with_capacity(self.nfa.transitions.len());

        for (index, transition) in self.nfa.transitions.iter().enumerate() {
            let state = State(index);
            let mut ty = if state == self.nfa.start {
                "Start:"
            } else if state == self.nfa.accept {
                "Accept:"
            } else {
                ""
            }
            .to_string();

            let mut label = String::new();
            let mut e1 = String::new();
            let mut e2 = String::new();

            match transition {
                Transition::Match(_, e) => {
                    label = "match".to_string();
                    e1 = e.to_string();
                }
                Transition::Split(a, b) => {
                    e1 = a.map(|s| s.to_string()).unwrap_or_default();
                    e2 = b.map(|s| s.to_string()).unwrap_or_default();
                }
                Transition::Anchor(kind, e) => {
                    ty = "A:".to_string();
                    label = match kind {
                        crate::nfa::AnchorKind::Start => "^".to_string(),
                        crate::nfa::AnchorKind::End => "$".to_string(),
                    };
                    e1 = e.to_string();
                }
                Transition::Group(marker, e) => {
                    ty = "G:".to_string();
                    label = format!(
                        "{:?} {}{}",
                        marker.boundary,
                        marker.index,
                        marker.name.as_deref().unwrap_or("")
                    );
                    e1 = e.to_string();
                }
                Transition::Accept => {}
            }

            data.push([ty, state.to_string(), label, e1, e2]);
        }

        Table::<5>::new(headers, data).to_string()
    }

    fn record(&self, raw: RawMatch) -> Match {
        let groups = raw
            .captures
            .ranges()
            .iter()
            .enumerate()
            .filter_map(|(index, range)| {
                range.map(|(start, end)| CapturedGroup {
                    id: GroupId { index, name: self.group_names[index].clone() },
                    range: start..end,
                })
            })
            .collect();
        Match { start: raw.start, end: raw.end, groups }
    }
}

impl<T> fmt::Display for RegularExpression<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, child) in self.body.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{child}")?;
        }
        Ok(())
    }
}

impl<T> fmt::Debug for RegularExpression<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RegularExpression({self})")
    }
}

impl<T> PartialEq for RegularExpression<T> {
    fn eq(&self, other: &Self) -> bool {
        self.to_string() == other.to_string()
    }
}

impl<T> Eq for RegularExpression<T> {}

impl<T> Hash for RegularExpression<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.to_string().hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::literal::literal_word_factory;

    fn compile(source: &str) -> RegularExpression<String> {
        RegularExpression::compile(source, &literal_word_factory()).unwrap()
    }

    fn words(s: &str) -> Vec<String> {
        s.split_whitespace().map(String::from).collect()
    }

    #[test]
    fn scenario_1_exact_concat() {
        let re = compile("<the> <cat>");
        let tokens = words("the cat");
        assert!(re.matches(&tokens));
        let m = re.find(&tokens).unwrap();
        assert_eq!((m.start, m.end), (0, 2));
    }

    #[test]
    fn scenario_2_optional_middle_atom() {
        let re = compile("<a> <b>? <c>");
        let tokens = words("a c");
        let m = re.find(&tokens).unwrap();
        assert_eq!((m.start, m.end), (0, 2));
        assert!(m.groups.is_empty());
    }

    #[test]
    fn scenario_3_alternation_plus_and_find_all() {
        let re = compile("(<a> | <b>)+");
        let tokens = words("a b a c a");
        let m = re.find(&tokens).unwrap();
        assert_eq!((m.start, m.end), (0, 3));
        let all = re.find_all(&tokens);
        let ranges: Vec<_> = all.iter().map(|m| (m.start, m.end)).collect();
        assert_eq!(ranges, vec![(0, 3), (4, 5)]);
    }

    #[test]
    fn scenario_4_anchors() {
        let re = compile("^<a> <b>$");
        assert!(re.matches(&words("a b")));
        assert!(re.find(&words("x a b")).is_none());
    }

    #[test]
    fn scenario_5_greedy_minmax() {
        let re = compile("(<x>){2,3}");
        let m = re.find(&words("x x x x")).unwrap();
        assert_eq!((m.start, m.end), (0, 3));
    }

    #[test]
    fn scenario_6_named_group() {
        let re = compile("(<name>:<hi>) <there>");
        let m = re.find(&words("hi there")).unwrap();
        assert_eq!((m.start, m.end), (0, 2));
        let named = m.named_group("name").unwrap();
        assert_eq!(named.range, 0..1);
    }

    #[test]
    fn matches_implies_find_spans_whole_input() {
        let re = compile("<a> <b>*");
        let tokens = words("a b b b");
        assert!(re.matches(&tokens));
        let m = re.find(&tokens).unwrap();
        assert_eq!((m.start, m.end), (0, tokens.len()));
    }

    #[test]
    fn find_all_ranges_are_non_overlapping_and_ordered() {
        let re = compile("<a>");
        let tokens = words("a x a x a");
        let all = re.find_all(&tokens);
        let mut last_end = 0;
        for m in &all {
            assert!(m.start >= last_end);
            last_end = m.end;
        }
        assert_eq!(all.len(), 3);
    }

    #[test]
    fn empty_pattern_matches_empty_range_and_find_all_is_empty() {
        let re = compile("");
        let tokens = words("a b c");
        let m = re.looking_at(&tokens).unwrap();
        assert_eq!((m.start, m.end), (0, 0));
        assert!(re.find_all(&tokens).is_empty());
    }

    #[test]
    fn render_round_trips_up_to_alternation_associativity() {
        let re = compile("<a> (<b>|<c>)* ^");
        let rendered = re.to_string();
        let reparsed = compile(&rendered);
        assert_eq!(rendered, reparsed.to_string());
    }

    #[test]
    fn equality_and_hash_are_keyed_on_canonical_text() {
        use std::collections::HashSet;
        let a = compile("<a> <b>");
        let b = compile("<a>  <b>"); // differs only in whitespace, not canonical text
        assert_eq!(a, b);
        let mut set = HashSet::new();
        set.insert(a.to_string());
        assert!(set.contains(&b.to_string()));
    }

    #[test]
    fn mid_pattern_anchor_is_unsatisfiable_on_nonempty_input() {
        let re = compile("<a> ^ <b>");
        assert!(re.find(&words("a b")).is_none());
        assert!(re.find(&words("b")).is_none());
    }

    #[test]
    fn nested_group_in_star_of_alternation_round_trips() {
        let re = compile("(?:(<a>|<b>)+)*");
        assert!(re.matches(&words("a b a")));
        assert!(re.matches(&words("")));
    }
}
