use crate::cont::Cont;
use crate::var::{Track, Var};
use itertools::Itertools;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use std::hash::Hash;

/// State of one in-flight generation pass. Exclusively owned by the pass
/// that created it; nested passes get their own record through `isolate`.
pub struct Gen<'c, N, S, C> {
    config: &'c C,
    module_name: &'c str,
    dependencies: Vec<N>,
    locals: Vec<N>,
    continuation: Cont<S>,
    bind_stack: SmallVec<[N; 4]>,
    renames: FxHashMap<N, N>,
    fresh: u32,
}

/// What a completed pass produced. The accumulated name sequences are
/// deduplicated here, keeping first-occurrence order so downstream emission
/// stays deterministic.
#[derive(Debug)]
pub struct GenOutput<R, N, S> {
    pub result: R,
    pub dependencies: Vec<N>,
    pub locals: Vec<N>,
    pub continuation: Cont<S>,
}

impl<'c, N: Clone + Eq + Hash, S, C> Gen<'c, N, S, C> {
    pub fn run<R>(
        config: &'c C,
        module_name: &'c str,
        computation: impl FnOnce(&mut Self) -> R,
    ) -> GenOutput<R, N, S> {
        let mut gen = Gen {
            config,
            module_name,
            dependencies: Vec::new(),
            locals: Vec::new(),
            continuation: Cont::default(),
            bind_stack: SmallVec::new(),
            renames: FxHashMap::default(),
            fresh: 0,
        };
        let result = computation(&mut gen);
        log::debug!(
            "generated {}: {} dependencies, {} locals, {} statement steps",
            gen.module_name,
            gen.dependencies.len(),
            gen.locals.len(),
            gen.continuation.len()
        );
        GenOutput {
            result,
            dependencies: gen.dependencies.into_iter().unique().collect(),
            locals: gen.locals.into_iter().unique().collect(),
            continuation: gen.continuation,
        }
    }

    pub fn config(&self) -> &'c C {
        self.config
    }

    pub fn module_name(&self) -> &'c str {
        self.module_name
    }

    pub fn when_config(
        &mut self,
        predicate: impl FnOnce(&C) -> bool,
        action: impl FnOnce(&mut Self),
    ) {
        if predicate(self.config) {
            action(self);
        }
    }

    pub fn depend_on(&mut self, item: impl Track<N>) {
        item.track(&mut self.dependencies);
    }

    pub fn depend_on_all<T: Track<N>>(&mut self, items: impl IntoIterator<Item = T>) {
        for item in items {
            item.track(&mut self.dependencies);
        }
    }

    pub fn add_local(&mut self, item: impl Track<N>) {
        item.track(&mut self.locals);
    }

    pub fn add_local_all<T: Track<N>>(&mut self, items: impl IntoIterator<Item = T>) {
        for item in items {
            item.track(&mut self.locals);
        }
    }

    /// Later `extend`s emit later: after `extend(f1)` then `extend(f2)`, the
    /// applied continuation yields f1's statement, then f2's, then the
    /// terminal.
    pub fn extend(&mut self, f: impl FnOnce(S) -> S + 'static) {
        self.continuation.push(f);
    }

    pub fn push_bind(&mut self, v: N) {
        self.bind_stack.push(v);
    }

    pub fn pop_bind(&mut self) -> N {
        self.bind_stack
            .pop()
            .expect("pop_bind: no active binding (mismatched push/pop)")
    }

    pub fn current_binding(&self) -> &N {
        self.bind_stack
            .last()
            .expect("current_binding: no active binding")
    }

    pub fn with_bind<R>(&mut self, v: N, action: impl FnOnce(&mut Self) -> R) -> R {
        self.push_bind(v);
        let r = action(self);
        self.pop_bind();
        r
    }

    /// Maps `from` to `to` for the duration of `action`, then restores the
    /// exact prior state of the entry (a shadowed mapping comes back, an
    /// absent one is removed again).
    pub fn with_rename<R>(&mut self, from: N, to: N, action: impl FnOnce(&mut Self) -> R) -> R {
        let shadowed = self.renames.insert(from.clone(), to);
        let r = action(self);
        match shadowed {
            Some(prev) => self.renames.insert(from.clone(), prev),
            None => self.renames.remove(&from),
        };
        r
    }

    /// Follows rename mappings transitively; a name with no mapping resolves
    /// to itself. A chain longer than the table proves a cycle, which is a
    /// bug in the calling translation logic.
    pub fn resolve(&self, n: &N) -> N {
        let mut cur = n;
        let mut hops = 0;
        while let Some(next) = self.renames.get(cur) {
            hops += 1;
            assert!(hops <= self.renames.len(), "resolve: cyclic rename chain");
            cur = next;
        }
        cur.clone()
    }

    pub fn resolve_var<A: Clone>(&self, v: &Var<N, A>) -> Var<N, A> {
        match v {
            Var::Foreign(n) => Var::Foreign(n.clone()),
            Var::Internal(n, a) => Var::Internal(self.resolve(n), a.clone()),
        }
    }

    pub fn fresh_id(&mut self) -> u32 {
        self.fresh += 1;
        self.fresh - 1
    }

    /// Runs `computation` as a self-contained nested pass: same module and
    /// config, a snapshot of the current renames, the current binding as the
    /// base of its bind stack, and empty trackers. Its dependencies and
    /// locals flow back into this pass; its continuation does not, and is
    /// returned instead so the caller can embed the nested statements where
    /// it wants them.
    pub fn isolate<R>(&mut self, computation: impl FnOnce(&mut Self) -> R) -> (R, Cont<S>) {
        log::trace!("isolated sub-generation in {}", self.module_name);
        let mut inner = Gen {
            config: self.config,
            module_name: self.module_name,
            dependencies: Vec::new(),
            locals: Vec::new(),
            continuation: Cont::default(),
            bind_stack: self.bind_stack.last().cloned().into_iter().collect(),
            renames: self.renames.clone(),
            fresh: self.fresh,
        };
        let result = computation(&mut inner);
        self.dependencies.append(&mut inner.dependencies);
        self.locals.append(&mut inner.locals);
        self.fresh = inner.fresh;
        (result, inner.continuation)
    }
}
