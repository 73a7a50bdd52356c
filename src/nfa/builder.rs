//! Thompson construction (spec.md §4.2): expression tree -> NFA.
//!
//! Construction runs in two passes. `annotate` walks the parsed tree
//! once and assigns each capturing group its parse-order index (the
//! tree itself carries no index field — groups are numbered by
//! opening-paren order, which is a property of the *position* in the
//! tree, not of any one node). That produces a [`Numbered`] tree where
//! group identity is baked in. `Builder::build_expr` then turns a
//! `Numbered` tree into fragments; a `MinMax` quantifier clones its
//! already-annotated child for each of its repeated copies, so every
//! copy shares the same group index and only the last traversal's
//! capture survives, per §4.4.

use super::state::State;
use super::transition::{AnchorKind, Boundary, GroupMarker, Transition};
use crate::expr::{Expression, Predicate};

/// The compiled automaton: an arena of transitions plus the two states
/// every fragment is ultimately patched between.
pub struct Nfa<T> {
    pub(crate) transitions: Vec<Transition<T>>,
    pub(crate) start: State,
    pub(crate) accept: State,
}

impl<T> Nfa<T> {
    pub(crate) fn get(&self, s: State) -> &Transition<T> {
        &self.transitions[s]
    }
}

/// Output of [`compile`]: the automaton plus the names of its groups,
/// indexed by parse-order index (`None` for anonymous groups).
pub struct Compiled<T> {
    pub nfa: Nfa<T>,
    pub group_names: Vec<Option<String>>,
}

/// `Expression<T>` with capturing-group nodes decorated with their
/// final parse-order index. Built once by `annotate`; `Builder` may
/// then clone and build the same subtree multiple times (for `MinMax`)
/// without re-numbering anything.
enum Numbered<T> {
    Leaf(Predicate<T>),
    StartAnchor,
    EndAnchor,
    Group {
        index: usize,
        name: Option<String>,
        children: Vec<Numbered<T>>,
    },
    NonCapturing(Vec<Numbered<T>>),
    Alternation(Box<Numbered<T>>, Box<Numbered<T>>),
    Option(Box<Numbered<T>>),
    Star(Box<Numbered<T>>),
    Plus(Box<Numbered<T>>),
    MinMax(Box<Numbered<T>>, usize, usize),
}

// Hand-written, for the same reason as `Expression`'s: the only
// `T`-touching field is an `Arc<dyn Fn(&T) -> bool + ...>`, already
// `Clone` regardless of `T`.
impl<T> Clone for Numbered<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Leaf(p) => Self::Leaf(p.clone()),
            Self::StartAnchor => Self::StartAnchor,
            Self::EndAnchor => Self::EndAnchor,
            Self::Group { index, name, children } => Self::Group {
                index: *index,
                name: name.clone(),
                children: children.clone(),
            },
            Self::NonCapturing(c) => Self::NonCapturing(c.clone()),
            Self::Alternation(a, b) => Self::Alternation(a.clone(), b.clone()),
            Self::Option(c) => Self::Option(c.clone()),
            Self::Star(c) => Self::Star(c.clone()),
            Self::Plus(c) => Self::Plus(c.clone()),
            Self::MinMax(c, min, max) => Self::MinMax(c.clone(), *min, *max),
        }
    }
}

fn annotate<T>(
    exprs: &[Expression<T>],
    counter: &mut usize,
    names: &mut Vec<Option<String>>,
) -> Vec<Numbered<T>> {
    exprs.iter().map(|e| annotate_one(e, counter, names)).collect()
}

fn annotate_one<T>(
    expr: &Expression<T>,
    counter: &mut usize,
    names: &mut Vec<Option<String>>,
) -> Numbered<T> {
    match expr {
        Expression::Leaf { predicate, .. } => Numbered::Leaf(predicate.clone()),
        Expression::StartAnchor => Numbered::StartAnchor,
        Expression::EndAnchor => Numbered::EndAnchor,
        Expression::MatchingGroup(children) => {
            let index = claim(counter, names, None);
            Numbered::Group {
                index,
                name: None,
                children: annotate(children, counter, names),
            }
        }
        Expression::NamedGroup(name, children) => {
            let index = claim(counter, names, Some(name.clone()));
            Numbered::Group {
                index,
                name: Some(name.clone()),
                children: annotate(children, counter, names),
            }
        }
        Expression::NonMatchingGroup(children) => {
            Numbered::NonCapturing(annotate(children, counter, names))
        }
        Expression::Alternation(a, b) => Numbered::Alternation(
            Box::new(annotate_one(a, counter, names)),
            Box::new(annotate_one(b, counter, names)),
        ),
        Expression::Option(c) => Numbered::Option(Box::new(annotate_one(c, counter, names))),
        Expression::Star(c) => Numbered::Star(Box::new(annotate_one(c, counter, names))),
        Expression::Plus(c) => Numbered::Plus(Box::new(annotate_one(c, counter, names))),
        Expression::MinMax(c, min, max) => {
            Numbered::MinMax(Box::new(annotate_one(c, counter, names)), *min, *max)
        }
    }
}

fn claim(counter: &mut usize, names: &mut Vec<Option<String>>, name: Option<String>) -> usize {
    let index = *counter;
    *counter += 1;
    if names.len() <= index {
        names.resize(index + 1, None);
    }
    names[index] = name;
    index
}

/// A fragment under construction: its entry state, and the list of
/// "dangling" out-edges still pointing at a sentinel that `patch` must
/// redirect before the fragment is wired into anything else.
struct Frag {
    start: State,
    out: Vec<State>,
}

struct Builder<T> {
    nfa: Nfa<T>,
}

impl<T> Builder<T> {
    fn new() -> Self {
        let mut nfa = Nfa {
            transitions: Vec::new(),
            start: State(0),
            accept: State(0),
        };
        nfa.transitions.push(Transition::Accept);
        Self { nfa }
    }

    fn push(&mut self, t: Transition<T>) -> State {
        self.nfa.transitions.push(t);
        State(self.nfa.transitions.len() - 1)
    }

    /// A `Match` state whose out-edge dangles (points at itself).
    fn match_state(&mut self, predicate: Predicate<T>) -> State {
        let s = State(self.nfa.transitions.len());
        self.push(Transition::Match(predicate, s))
    }

    fn anchor_state(&mut self, kind: AnchorKind) -> State {
        let s = State(self.nfa.transitions.len());
        self.push(Transition::Anchor(kind, s))
    }

    fn group_state(&mut self, marker: GroupMarker) -> State {
        let s = State(self.nfa.transitions.len());
        self.push(Transition::Group(marker, s))
    }

    fn split_state(&mut self, a: Option<State>, b: Option<State>) -> State {
        self.push(Transition::Split(a, b))
    }

    /// Redirects every dangling out-edge of `frag` to `to`.
    fn patch(&mut self, frag: &Frag, to: State) {
        for &out in &frag.out {
            match &mut self.nfa.transitions[out] {
                Transition::Match(_, e) | Transition::Anchor(_, e) | Transition::Group(_, e) => {
                    *e = to;
                }
                Transition::Split(_, e2) => *e2 = Some(to),
                Transition::Accept => unreachable!("accept state is never a dangling out-edge"),
            }
        }
    }

    fn build_concat(&mut self, children: &[Numbered<T>]) -> Frag {
        let mut iter = children.iter();
        let mut acc = self.build_expr(iter.next().expect("group/body children are non-empty"));
        for child in iter {
            let next = self.build_expr(child);
            self.patch(&acc, next.start);
            acc = Frag { start: acc.start, out: next.out };
        }
        acc
    }

    fn build_expr(&mut self, expr: &Numbered<T>) -> Frag {
        match expr {
            Numbered::Leaf(predicate) => {
                let s = self.match_state(predicate.clone());
                Frag { start: s, out: vec![s] }
            }
            Numbered::StartAnchor => {
                let s = self.anchor_state(AnchorKind::Start);
                Frag { start: s, out: vec![s] }
            }
            Numbered::EndAnchor => {
                let s = self.anchor_state(AnchorKind::End);
                Frag { start: s, out: vec![s] }
            }
            Numbered::Group { index, name, children } => {
                let body = self.build_concat(children);
                let open = self.group_state(GroupMarker {
                    index: *index,
                    name: name.clone(),
                    boundary: Boundary::Open,
                });
                // `open`'s out-edge was left dangling; point it at the body.
                self.patch(&Frag { start: open, out: vec![open] }, body.start);
                let close = self.group_state(GroupMarker {
                    index: *index,
                    name: name.clone(),
                    boundary: Boundary::Close,
                });
                self.patch(&body, close);
                Frag { start: open, out: vec![close] }
            }
            Numbered::NonCapturing(children) => self.build_concat(children),
            Numbered::Alternation(a, b) => {
                let fa = self.build_expr(a);
                let fb = self.build_expr(b);
                let split = self.split_state(Some(fa.start), Some(fb.start));
                let mut out = fa.out;
                out.extend(fb.out);
                Frag { start: split, out }
            }
            Numbered::Option(c) => {
                let f = self.build_expr(c);
                let split = self.split_state(Some(f.start), None);
                let mut out = f.out;
                out.push(split);
                Frag { start: split, out }
            }
            Numbered::Star(c) => {
                let f = self.build_expr(c);
                let split = self.split_state(Some(f.start), None);
                self.patch(&f, split);
                Frag { start: split, out: vec![split] }
            }
            Numbered::Plus(c) => {
                let f = self.build_expr(c);
                let split = self.split_state(Some(f.start), None);
                self.patch(&f, split);
                Frag { start: f.start, out: vec![split] }
            }
            Numbered::MinMax(c, min, max) => self.build_minmax(c, *min, *max),
        }
    }

    /// `m` mandatory copies of `child` followed by `n - m` copies each
    /// wrapped in `Option`, concatenated. `{0,0}` is a pure epsilon.
    fn build_minmax(&mut self, child: &Numbered<T>, min: usize, max: usize) -> Frag {
        if max == 0 {
            let s = self.split_state(None, None);
            return Frag { start: s, out: vec![s] };
        }
        let mut parts = Vec::with_capacity(max);
        for _ in 0..min {
            parts.push(self.build_expr(child));
        }
        for _ in min..max {
            let wrapped = Numbered::Option(Box::new(child.clone()));
            parts.push(self.build_expr(&wrapped));
        }
        let mut iter = parts.into_iter();
        let mut acc = iter.next().expect("max > 0");
        for next in iter {
            self.patch(&acc, next.start);
            acc = Frag { start: acc.start, out: next.out };
        }
        acc
    }
}

/// Compiles a parsed body (the top-level sequence of atoms a pattern
/// parses to) into an [`Nfa`]. An empty body (the empty pattern)
/// compiles to a single epsilon edge straight from start to accept.
pub(crate) fn compile<T>(body: &[Expression<T>]) -> Compiled<T> {
    let mut counter = 0usize;
    let mut group_names = Vec::new();
    let numbered = annotate(body, &mut counter, &mut group_names);

    let mut builder = Builder::new();
    let frag = if numbered.is_empty() {
        let s = builder.split_state(None, None);
        Frag { start: s, out: vec![s] }
    } else {
        builder.build_concat(&numbered)
    };
    builder.nfa.start = frag.start;
    let accept = builder.nfa.accept;
    builder.patch(&frag, accept);

    Compiled { nfa: builder.nfa, group_names }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn leaf(ch: char) -> Expression<char> {
        Expression::Leaf {
            predicate: Arc::new(move |c: &char| *c == ch),
            source: format!("<{ch}>"),
        }
    }

    fn matches(nfa: &Nfa<char>, input: &[char]) -> bool {
        // Minimal, allocation-heavy but obviously-correct simulation
        // used only to sanity-check construction shape in these unit
        // tests; the real matcher lives in `crate::matcher`.
        fn eps_closure<T>(nfa: &Nfa<T>, state: State, into: &mut Vec<State>, seen: &mut Vec<bool>) {
            if seen[state.0] {
                return;
            }
            seen[state.0] = true;
            match nfa.get(state) {
                Transition::Split(a, b) => {
                    if let Some(a) = a {
                        eps_closure(nfa, *a, into, seen);
                    }
                    if let Some(b) = b {
                        eps_closure(nfa, *b, into, seen);
                    }
                }
                Transition::Anchor(_, e) | Transition::Group(_, e) => {
                    eps_closure(nfa, *e, into, seen);
                }
                Transition::Match(_, _) | Transition::Accept => into.push(state),
            }
        }

        let mut current = Vec::new();
        eps_closure(nfa, nfa.start, &mut current, &mut vec![false; nfa.transitions.len()]);

        for ch in input {
            let mut next = Vec::new();
            let mut seen = vec![false; nfa.transitions.len()];
            for &s in &current {
                if let Transition::Match(pred, out) = nfa.get(s) {
                    if pred(ch) {
                        eps_closure(nfa, *out, &mut next, &mut seen);
                    }
                }
            }
            current = next;
        }
        current.iter().any(|s| matches!(nfa.get(*s), Transition::Accept))
    }

    #[test]
    fn concat_matches_exact_sequence() {
        let body = vec![leaf('a'), leaf('b')];
        let compiled = compile(&body);
        assert!(matches(&compiled.nfa, &['a', 'b']));
        assert!(!matches(&compiled.nfa, &['a']));
        assert!(!matches(&compiled.nfa, &['a', 'b', 'c']));
    }

    #[test]
    fn star_matches_zero_or_more() {
        let body = vec![Expression::Star(Box::new(leaf('a')))];
        let compiled = compile(&body);
        assert!(matches(&compiled.nfa, &[]));
        assert!(matches(&compiled.nfa, &['a']));
        assert!(matches(&compiled.nfa, &['a', 'a', 'a']));
        assert!(!matches(&compiled.nfa, &['a', 'b']));
    }

    #[test]
    fn plus_requires_at_least_one() {
        let body = vec![Expression::Plus(Box::new(leaf('a')))];
        let compiled = compile(&body);
        assert!(!matches(&compiled.nfa, &[]));
        assert!(matches(&compiled.nfa, &['a']));
        assert!(matches(&compiled.nfa, &['a', 'a']));
    }

    #[test]
    fn alternation_accepts_either_branch() {
        let body = vec![Expression::Alternation(Box::new(leaf('a')), Box::new(leaf('b')))];
        let compiled = compile(&body);
        assert!(matches(&compiled.nfa, &['a']));
        assert!(matches(&compiled.nfa, &['b']));
        assert!(!matches(&compiled.nfa, &['c']));
    }

    #[test]
    fn minmax_repeats_same_group_index() {
        let group = Expression::MatchingGroup(vec![leaf('a')]);
        let body = vec![Expression::MinMax(Box::new(group), 2, 3)];
        let mut counter = 0usize;
        let mut names = Vec::new();
        let numbered = annotate(&body, &mut counter, &mut names);
        // Only one group in the source tree, so only one index claimed,
        // regardless of how many times MinMax will build its body.
        assert_eq!(counter, 1);
        match &numbered[0] {
            Numbered::MinMax(inner, 2, 3) => {
                assert!(matches!(**inner, Numbered::Group { index: 0, .. }));
            }
            _ => panic!("expected MinMax"),
        }

        let compiled = compile(&body);
        assert!(matches(&compiled.nfa, &['a', 'a']));
        assert!(matches(&compiled.nfa, &['a', 'a', 'a']));
        assert!(!matches(&compiled.nfa, &['a']));
        assert!(!matches(&compiled.nfa, &['a', 'a', 'a', 'a']));
    }

    #[test]
    fn minmax_zero_zero_is_epsilon() {
        let body = vec![Expression::MinMax(Box::new(leaf('a')), 0, 0)];
        let compiled = compile(&body);
        assert!(matches(&compiled.nfa, &[]));
        assert!(!matches(&compiled.nfa, &['a']));
    }

    #[test]
    fn empty_body_matches_empty_input_only() {
        let body: Vec<Expression<char>> = vec![];
        let compiled = compile(&body);
        assert!(matches(&compiled.nfa, &[]));
    }
}
