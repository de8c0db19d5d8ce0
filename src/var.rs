/// A binding-site reference. `Foreign` bindings come from outside the unit
/// being generated (built-ins, runtime imports) and are assumed always
/// resolvable, so tracking and rename resolution leave them alone.
/// `Internal` wraps a name plus auxiliary data and delegates to the name.
#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub enum Var<N, A> {
    Foreign(N),
    Internal(N, A),
}

impl<N, A> Var<N, A> {
    pub fn name(&self) -> Option<&N> {
        match self {
            Var::Foreign(_) => None,
            Var::Internal(n, _) => Some(n),
        }
    }
}

/// One trackable item: something that contributes zero or one name to a
/// dependency or locality tracker.
pub trait Track<N> {
    fn track(self, out: &mut Vec<N>);
}

impl<N: Clone> Track<N> for &N {
    fn track(self, out: &mut Vec<N>) {
        out.push(self.clone());
    }
}

impl<N: Clone, A> Track<N> for &Var<N, A> {
    fn track(self, out: &mut Vec<N>) {
        if let Var::Internal(n, _) = self {
            out.push(n.clone());
        }
    }
}
