//! NFA simulation (spec §4.3–§4.5): ε-closure, capture tracking, and
//! the `lookingAt`/`find`/`findAll` search loops the public facade in
//! `regex.rs` is built on.

use std::rc::Rc;

use crate::nfa::{AnchorKind, Boundary, Nfa, State, Transition};

/// Per-path capture state. Cheap to fork (`Clone` is a couple of `Rc`
/// bumps) so every branch of the NFA can carry its own without
/// allocating a fresh `Vec` per state; `Rc::make_mut` copies the
/// backing vector only the first time a given path actually records
/// a group boundary.
#[derive(Clone)]
pub(crate) struct CaptureState {
    opens: Rc<Vec<Option<usize>>>,
    closed: Rc<Vec<Option<(usize, usize)>>>,
}

impl CaptureState {
    fn new(num_groups: usize) -> Self {
        Self {
            opens: Rc::new(vec![None; num_groups]),
            closed: Rc::new(vec![None; num_groups]),
        }
    }

    fn open(&mut self, index: usize, position: usize) {
        Rc::make_mut(&mut self.opens)[index] = Some(position);
    }

    /// Re-traversing a group (inside `Star`/`Plus`/`MinMax`) overwrites
    /// the previous close, so only the last traversal's range survives
    /// (§4.4).
    fn close(&mut self, index: usize, position: usize) {
        let start = self.opens[index].expect("group closed before it was opened");
        Rc::make_mut(&mut self.closed)[index] = Some((start, position));
    }

    pub(crate) fn ranges(&self) -> &[Option<(usize, usize)>] {
        &self.closed
    }
}

/// The outcome of a successful `lookingAt`: where the match ends, and
/// the capture state of the path that produced it.
pub(crate) struct RawMatch {
    pub start: usize,
    pub end: usize,
    pub captures: CaptureState,
}

/// Tracks which states have already been visited during the *current*
/// ε-closure step without clearing a `Vec<bool>` before every step:
/// each state remembers the step counter at which it was last seen,
/// and a step is "new" simply by bumping the counter.
struct Step {
    seen_at: Vec<u32>,
    current: u32,
}

impl Step {
    fn new(num_states: usize) -> Self {
        Self { seen_at: vec![0; num_states], current: 0 }
    }

    fn advance(&mut self) {
        self.current += 1;
    }

    /// Returns `true` the first time a state is visited this step.
    fn visit(&mut self, state: State) -> bool {
        if self.seen_at[state.0] == self.current {
            false
        } else {
            self.seen_at[state.0] = self.current;
            true
        }
    }
}

/// Folds a newly-reached accept into `best`, keeping the longer end
/// position and, on ties, whichever was recorded first (the higher
/// priority path per §4.5 — ties only arise within a single closure
/// step, where recording order already reflects priority).
fn record_best(best: &mut Option<(usize, CaptureState)>, position: usize, captures: CaptureState) {
    let replace = match best {
        Some((end, _)) => position > *end,
        None => true,
    };
    if replace {
        *best = Some((position, captures));
    }
}

/// ε-closure from `state`, honoring anchors against the whole sequence
/// and recording group boundaries into forked capture states. States
/// behind a `Match` edge land in `frontier`; reaching `Accept` updates
/// `best`. Branch order matters: `Split`'s first branch is explored
/// (and thus wins ties) before its second, matching the greedy
/// preference built into the automaton (§4.5).
#[allow(clippy::too_many_arguments)]
fn close_state<T>(
    nfa: &Nfa<T>,
    state: State,
    captures: CaptureState,
    position: usize,
    len: usize,
    step: &mut Step,
    frontier: &mut Vec<(State, CaptureState)>,
    best: &mut Option<(usize, CaptureState)>,
) {
    if !step.visit(state) {
        return;
    }
    match nfa.get(state) {
        Transition::Split(a, b) => {
            if let Some(a) = a {
                close_state(nfa, *a, captures.clone(), position, len, step, frontier, best);
            }
            if let Some(b) = b {
                close_state(nfa, *b, captures, position, len, step, frontier, best);
            }
        }
        Transition::Anchor(kind, next) => {
            let satisfied = match kind {
                AnchorKind::Start => position == 0,
                AnchorKind::End => position == len,
            };
            if satisfied {
                close_state(nfa, *next, captures, position, len, step, frontier, best);
            }
        }
        Transition::Group(marker, next) => {
            let mut captures = captures;
            match marker.boundary {
                Boundary::Open => captures.open(marker.index, position),
                Boundary::Close => captures.close(marker.index, position),
            }
            close_state(nfa, *next, captures, position, len, step, frontier, best);
        }
        Transition::Match(_, _) => frontier.push((state, captures)),
        Transition::Accept => record_best(best, position, captures),
    }
}

/// Implements §4.3's `lookingAt`: does the pattern match starting
/// exactly at `start`? Anchors are checked against the whole sequence
/// (`0` and `tokens.len()`), not relative to `start`.
pub(crate) fn looking_at<T>(
    nfa: &Nfa<T>,
    num_groups: usize,
    tokens: &[T],
    start: usize,
) -> Option<RawMatch> {
    let len = tokens.len();
    if start > len {
        return None;
    }
    let mut step = Step::new(nfa.transitions.len());
    let mut best = None;

    let mut current = Vec::new();
    step.advance();
    close_state(nfa, nfa.start, CaptureState::new(num_groups), start, len, &mut step, &mut current, &mut best);

    let mut i = start;
    while !current.is_empty() && i < len {
        let mut next = Vec::new();
        step.advance();
        for (state, captures) in &current {
            if let Transition::Match(predicate, target) = nfa.get(*state) {
                if predicate(&tokens[i]) {
                    close_state(nfa, *target, captures.clone(), i + 1, len, &mut step, &mut next, &mut best);
                }
            }
        }
        current = next;
        i += 1;
    }

    best.map(|(end, captures)| RawMatch { start, end, captures })
}

/// §4.3's `find`: the first `lookingAt` success at or after `start`,
/// skipping positions too close to the end to reach `min_len`.
pub(crate) fn find<T>(
    nfa: &Nfa<T>,
    num_groups: usize,
    min_len: usize,
    tokens: &[T],
    start: usize,
) -> Option<RawMatch> {
    let len = tokens.len();
    let last = len.checked_sub(min_len)?;
    if start > last {
        return None;
    }
    (start..=last).find_map(|i| looking_at(nfa, num_groups, tokens, i))
}

/// §4.3's `findAll`: repeated `find`, dropping empty matches from the
/// result but still stepping the cursor past them so patterns whose
/// atoms are all optional can't loop forever.
pub(crate) fn find_all<T>(
    nfa: &Nfa<T>,
    num_groups: usize,
    min_len: usize,
    tokens: &[T],
) -> Vec<RawMatch> {
    let len = tokens.len();
    let mut results = Vec::new();
    let mut cursor = 0;
    while cursor <= len {
        match find(nfa, num_groups, min_len, tokens, cursor) {
            None => break,
            Some(m) => {
                cursor = if m.end > m.start { m.end } else { m.end + 1 };
                if m.end > m.start {
                    results.push(m);
                }
            }
        }
    }
    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::Expression;
    use crate::nfa::compile;
    use std::sync::Arc;

    fn leaf(ch: char) -> Expression<char> {
        Expression::Leaf {
            predicate: Arc::new(move |c: &char| *c == ch),
            source: format!("<{ch}>"),
        }
    }

    #[test]
    fn looking_at_finds_exact_concat() {
        let body = vec![leaf('a'), leaf('b')];
        let compiled = compile(&body);
        let m = looking_at(&compiled.nfa, compiled.group_names.len(), &['a', 'b'], 0).unwrap();
        assert_eq!((m.start, m.end), (0, 2));
    }

    #[test]
    fn star_is_greedy() {
        let body = vec![Expression::Star(Box::new(leaf('a')))];
        let compiled = compile(&body);
        let tokens = ['a', 'a', 'a', 'b'];
        let m = looking_at(&compiled.nfa, 0, &tokens, 0).unwrap();
        assert_eq!(m.end, 3);
    }

    #[test]
    fn find_skips_to_first_viable_start() {
        let body = vec![leaf('b'), leaf('c')];
        let compiled = compile(&body);
        let tokens = ['a', 'a', 'b', 'c'];
        let m = find(&compiled.nfa, 0, body.iter().map(Expression::min_match_len).sum(), &tokens, 0).unwrap();
        assert_eq!((m.start, m.end), (2, 4));
    }

    #[test]
    fn start_anchor_is_checked_against_whole_sequence_not_start_index() {
        let body = vec![Expression::StartAnchor, leaf('b')];
        let compiled = compile(&body);
        let tokens = ['a', 'b'];
        // lookingAt(tokens, 1): even though we start scanning at index
        // 1, '^' only ever traverses when position == 0.
        assert!(looking_at(&compiled.nfa, 0, &tokens, 1).is_none());
        let tokens2 = ['b'];
        assert!(looking_at(&compiled.nfa, 0, &tokens2, 0).is_some());
    }

    #[test]
    fn end_anchor_rejects_non_terminal_position() {
        let body = vec![leaf('a'), Expression::EndAnchor];
        let compiled = compile(&body);
        assert!(looking_at(&compiled.nfa, 0, &['a', 'b'], 0).is_none());
        assert!(looking_at(&compiled.nfa, 0, &['a'], 0).is_some());
    }

    #[test]
    fn group_capture_records_range() {
        let group = Expression::MatchingGroup(vec![leaf('a'), leaf('b')]);
        let body = vec![group, leaf('c')];
        let compiled = compile(&body);
        let m = looking_at(&compiled.nfa, compiled.group_names.len(), &['a', 'b', 'c'], 0).unwrap();
        assert_eq!(m.captures.ranges()[0], Some((0, 2)));
    }

    #[test]
    fn option_skipped_group_has_no_capture() {
        let group = Expression::Option(Box::new(Expression::MatchingGroup(vec![leaf('a')])));
        let body = vec![group, leaf('b')];
        let compiled = compile(&body);
        let m = looking_at(&compiled.nfa, compiled.group_names.len(), &['b'], 0).unwrap();
        assert_eq!(m.captures.ranges()[0], None);
    }

    #[test]
    fn repeated_group_keeps_last_traversal() {
        let group = Expression::MatchingGroup(vec![leaf('a')]);
        let body = vec![Expression::Plus(Box::new(group))];
        let compiled = compile(&body);
        let m = looking_at(&compiled.nfa, compiled.group_names.len(), &['a', 'a', 'a'], 0).unwrap();
        assert_eq!(m.captures.ranges()[0], Some((2, 3)));
    }

    #[test]
    fn find_all_drops_empties_but_advances() {
        let body = vec![Expression::Option(Box::new(leaf('a')))];
        let compiled = compile(&body);
        let tokens = ['b', 'a', 'b'];
        let results = find_all(&compiled.nfa, 0, 0, &tokens);
        assert_eq!(results.len(), 1);
        assert_eq!((results[0].start, results[0].end), (1, 2));
    }
}
