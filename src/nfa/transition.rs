use super::state::State;
use crate::expr::Predicate;

/// Which end of a group a `Group` edge marks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Boundary {
    Open,
    Close,
}

/// `^` or `$`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorKind {
    Start,
    End,
}

/// A capturing group's identity, attached to the `Group` edges that
/// bracket its body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupMarker {
    pub index: usize,
    pub name: Option<String>,
    pub boundary: Boundary,
}

/// One arena-indexed transition. Every fragment-building rule in
/// spec.md §4.2 bottoms out in one of these.
///
/// `Match`/`Anchor`/`Group` carry a single successor state that starts
/// out pointing back at the state itself (a "dangling" sentinel,
/// mirroring the teacher's `new_label_state` trick) until `patch`
/// overwrites it with the real successor. `Split`'s two successors are
/// `Option<State>` for the same reason, except when one side is known
/// immediately (e.g. the loop-back edge of a `Star`).
#[derive(Clone)]
pub enum Transition<T> {
    /// Consumes one element if the predicate accepts it.
    Match(Predicate<T>, State),
    /// Epsilon branch. Traversal order matters: the first branch is
    /// preferred (§4.5) — it is explored before the second whenever
    /// both are reachable.
    Split(Option<State>, Option<State>),
    /// Zero-width assertion against the whole input sequence.
    Anchor(AnchorKind, State),
    /// Epsilon edge that opens or closes a capturing group.
    Group(GroupMarker, State),
    /// The single global accept state.
    Accept,
}
