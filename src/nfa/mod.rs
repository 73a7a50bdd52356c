//! The compiled automaton: Thompson-construction NFA over `Transition<T>`
//! edges (spec §4.2), addressed by [`State`] indices into a flat arena.

mod builder;
mod state;
mod transition;

pub(crate) use builder::{compile, Compiled, Nfa};
pub use state::State;
pub use transition::{AnchorKind, Boundary, GroupMarker, Transition};
