/// Index into an [`crate::nfa::Nfa`]'s transition arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct State(pub usize);

impl std::fmt::Display for State {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl<T> std::ops::Index<State> for Vec<T> {
    type Output = T;

    fn index(&self, index: State) -> &Self::Output {
        &self[index.0]
    }
}

impl<T> std::ops::IndexMut<State> for Vec<T> {
    fn index_mut(&mut self, index: State) -> &mut Self::Output {
        &mut self[index.0]
    }
}
