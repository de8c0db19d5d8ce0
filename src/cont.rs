use std::fmt::{self, Debug};

/// Forward-building statement continuation: an ordered list of
/// rest-of-statements transforms. Steps can be added but never inspected or
/// removed; `apply` folds them over a terminal statement so that the step
/// pushed first contributes the first statement of the result.
pub struct Cont<S> {
    steps: Vec<Box<dyn FnOnce(S) -> S>>,
}

impl<S> Cont<S> {
    pub(crate) fn push(&mut self, f: impl FnOnce(S) -> S + 'static) {
        self.steps.push(Box::new(f));
    }

    pub fn apply(self, terminal: S) -> S {
        self.steps.into_iter().rev().fold(terminal, |rest, f| f(rest))
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

impl<S> Default for Cont<S> {
    fn default() -> Self {
        Cont { steps: Vec::new() }
    }
}

impl<S> Debug for Cont<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Cont({} steps)", self.steps.len())
    }
}
