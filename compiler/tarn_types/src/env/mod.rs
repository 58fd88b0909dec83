//! Substitution environments.
//!
//! An [`Env`] maps type parameters (by declaration identity) to the types
//! they stand for in one generic instantiation. [`EnvChain`] composes
//! environments without copying them, innermost first, for nested generic
//! contexts such as a generic method inside a generic class.

mod subst;

use crate::{DefnGraph, DefnId, Idx, SpecId, TypeKind, TypeStore};

pub use subst::subst;

static EMPTY_ENV: Env = Env::new();
static ROOT_CHAIN: EnvChain<'static> = EnvChain::Root;

/// Ordered `(type parameter, type)` bindings.
///
/// Iteration follows insertion order. Equality is set equality: two
/// environments are equal when they bind the same parameters to the same
/// types, whatever the order.
#[derive(Clone, Debug, Default)]
pub struct Env {
    bindings: Vec<(DefnId, Idx)>,
}

impl Env {
    pub const fn new() -> Self {
        Env {
            bindings: Vec::new(),
        }
    }

    /// Shared empty environment.
    #[inline]
    pub fn empty() -> &'static Env {
        &EMPTY_ENV
    }

    pub fn from_pairs(pairs: impl IntoIterator<Item = (DefnId, Idx)>) -> Self {
        let mut env = Env::new();
        for (param, ty) in pairs {
            env.insert(param, ty);
        }
        env
    }

    /// Bind `param` to `ty`. Rebinding keeps the original position.
    pub fn insert(&mut self, param: DefnId, ty: Idx) {
        match self.bindings.iter_mut().find(|(p, _)| *p == param) {
            Some(slot) => slot.1 = ty,
            None => self.bindings.push((param, ty)),
        }
    }

    /// The type bound to `param`.
    pub fn find(&self, param: DefnId) -> Option<Idx> {
        self.bindings
            .iter()
            .find_map(|&(p, ty)| (p == param).then_some(ty))
    }

    pub fn iter(&self) -> impl Iterator<Item = (DefnId, Idx)> + '_ {
        self.bindings.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Order-independent fingerprint, usable as a hash key.
    pub fn key(&self) -> EnvKey {
        let mut sorted = self.bindings.clone();
        sorted.sort_unstable();
        EnvKey(sorted.into_boxed_slice())
    }

    /// Environment that realizes specialization `spec`: each parameter of
    /// the generic is bound to the matching argument, after the argument
    /// has been transformed through `outer`.
    pub fn for_specialization(
        store: &mut TypeStore,
        defns: &DefnGraph,
        spec: SpecId,
        outer: &EnvChain<'_>,
    ) -> Env {
        let specialized = store.spec(spec).clone();
        let params = defns.all_type_params(specialized.generic);
        debug_assert_eq!(params.len(), specialized.args.len());
        let bindings = params
            .into_iter()
            .zip(specialized.args.iter())
            .map(|(param, &arg)| (param, subst(store, arg, outer)))
            .collect();
        Env { bindings }
    }
}

impl PartialEq for Env {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|(p, ty)| other.find(p) == Some(ty))
    }
}

impl Eq for Env {}

/// Sorted snapshot of an [`Env`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct EnvKey(Box<[(DefnId, Idx)]>);

/// Non-owning composition of environments.
///
/// Lookups search the innermost link first and end at the `Root` sentinel.
#[derive(Copy, Clone, Debug)]
pub enum EnvChain<'a> {
    Root,
    Link {
        env: &'a Env,
        parent: &'a EnvChain<'a>,
    },
}

impl<'a> EnvChain<'a> {
    /// Chain holding a single environment.
    pub fn new(env: &'a Env) -> Self {
        EnvChain::Link {
            env,
            parent: &ROOT_CHAIN,
        }
    }

    /// Chain with no bindings.
    pub fn root() -> &'static EnvChain<'static> {
        &ROOT_CHAIN
    }

    /// Extend this chain with an inner environment.
    pub fn push(&'a self, env: &'a Env) -> EnvChain<'a> {
        EnvChain::Link { env, parent: self }
    }

    /// The binding of `param` in the innermost environment that has one.
    pub fn find(&self, param: DefnId) -> Option<Idx> {
        let mut current = self;
        loop {
            match current {
                EnvChain::Root => return None,
                EnvChain::Link { env, parent } => {
                    if let Some(ty) = env.find(param) {
                        return Some(ty);
                    }
                    current = parent;
                }
            }
        }
    }

    /// Number of environments in the chain.
    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut current = self;
        while let EnvChain::Link { parent, .. } = current {
            depth += 1;
            current = parent;
        }
        depth
    }

    /// Materialize the chain as one environment, inner bindings winning.
    pub fn flatten(&self) -> Env {
        let mut links = Vec::new();
        let mut current = self;
        while let EnvChain::Link { env, parent } = current {
            links.push(*env);
            current = parent;
        }
        let mut flat = Env::new();
        for env in links.into_iter().rev() {
            for (param, ty) in env.iter() {
                flat.insert(param, ty);
            }
        }
        flat
    }
}

/// Resolve a type to the declaration it names and the environment it is
/// seen through.
///
/// - `Nominal`: the declaration, seen through `env` unchanged
/// - `Specialized`: the generic, seen through its realizing environment
/// - `Alias` / `Modified`: resolved through their target / base
/// - `TypeVar` bound in `env`: resolved through the binding
///
/// Everything else names no declaration.
pub fn resolve_nominal(
    store: &mut TypeStore,
    defns: &DefnGraph,
    ty: Idx,
    env: &Env,
) -> Option<(DefnId, Env)> {
    let mut ty = ty;
    let mut env = env.clone();
    // Bounded by the number of alias declarations; a longer walk means an
    // alias cycle.
    for _ in 0..=defns.len() {
        match *store.kind(ty) {
            TypeKind::Nominal { defn, .. } => return Some((defn, env)),
            TypeKind::Specialized(spec) => {
                let generic = store.spec(spec).generic;
                let inner = Env::for_specialization(store, defns, spec, &EnvChain::new(&env));
                return Some((generic, inner));
            }
            TypeKind::Alias(defn) => {
                ty = defns.get(defn).as_type()?.aliased?;
            }
            TypeKind::Modified { base, .. } => ty = base,
            TypeKind::TypeVar(param) => {
                ty = env.find(param)?;
                env = Env::new();
            }
            TypeKind::Void
            | TypeKind::Bool
            | TypeKind::Int { .. }
            | TypeKind::Float { .. }
            | TypeKind::Tuple(_)
            | TypeKind::Union(_)
            | TypeKind::Function { .. }
            | TypeKind::Contingent(_)
            | TypeKind::Inferred(_) => return None,
        }
    }
    tracing::debug!(?ty, "alias chain does not terminate");
    None
}
