//! Inheritance-aware member lookup.
//!
//! Lookups start from a [`Stem`]: a module, a type declaration seen through
//! an environment, a type parameter (searched through its bounds), an
//! arbitrary type, or a list of stems searched in order.
//!
//! # Shadowing
//!
//! A type's own members shadow inherited ones by name: if the type declares
//! any member called `x`, lookup of `x` returns exactly the local set and
//! never consults a base. Only when the local scope has no `x` is every
//! `extends` edge searched, depth-first, and all results accumulated.
//! Static filtering happens after that decision, so a local instance member
//! still hides an inherited static one from a static context.

use rustc_hash::FxHashSet;
use tarn_ir::Name;

use crate::env::resolve_nominal;
use crate::guard::ensure_sufficient_stack;
use crate::{DefnGraph, DefnId, DefnKind, Env, EnvKey, Idx, TypeKind, TypeStore};

/// Where a lookup starts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Stem {
    Module(DefnId),
    /// Type declaration seen through an environment binding its parameters.
    Type(DefnId, Env),
    /// Type parameter; searched through its bounds.
    TypeParam(DefnId),
    /// Any type; resolved to one of the other stems first.
    Ty(Idx, Env),
    List(Vec<Stem>),
}

/// A member found by lookup, with the environment binding the declaring
/// type's parameters as seen from the stem.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MemberRef {
    pub defn: DefnId,
    pub env: Env,
}

/// Scopes already searched by one lookup. The same declaration reached
/// through different environments is a different scope.
type Visited = FxHashSet<(DefnId, EnvKey)>;

/// Member lookup over one declaration graph.
pub struct NameLookup<'a> {
    store: &'a mut TypeStore,
    defns: &'a DefnGraph,
}

impl<'a> NameLookup<'a> {
    pub fn new(store: &'a mut TypeStore, defns: &'a DefnGraph) -> Self {
        NameLookup { store, defns }
    }

    /// Append every member called `name` visible from `stem` to `results`
    /// and return how many were added.
    ///
    /// With `from_static`, instance functions and fields are dropped from
    /// the answer.
    #[tracing::instrument(level = "trace", skip_all, fields(?name))]
    pub fn lookup(
        &mut self,
        name: Name,
        stem: &Stem,
        from_static: bool,
        results: &mut Vec<MemberRef>,
    ) -> usize {
        let before = results.len();
        let mut visited = Visited::default();
        self.lookup_in(name, stem, from_static, results, &mut visited);
        results.len() - before
    }

    /// Lookup on a type declaration, honoring shadowing.
    pub fn lookup_inherited(
        &mut self,
        name: Name,
        ty: DefnId,
        env: &Env,
        from_static: bool,
        results: &mut Vec<MemberRef>,
    ) -> usize {
        let before = results.len();
        let mut visited = Visited::default();
        self.inherited(name, ty, env, from_static, results, &mut visited);
        results.len() - before
    }

    /// Visit every name visible from `stem` exactly once, together with the
    /// members that win for it.
    pub fn for_all_names(&mut self, stem: &Stem, mut visit: impl FnMut(Name, &[MemberRef])) {
        let mut names = Vec::new();
        let mut seen = FxHashSet::default();
        let mut visited = Visited::default();
        self.collect_names(stem, &mut names, &mut seen, &mut visited);

        let mut members = Vec::new();
        for name in names {
            members.clear();
            self.lookup(name, stem, false, &mut members);
            visit(name, &members);
        }
    }

    /// The stem a type resolves to, if it has members at all.
    pub fn stem_for(&mut self, ty: Idx, env: &Env) -> Option<Stem> {
        let mut ty = ty;
        let mut bound_env = None;
        for _ in 0..=self.defns.len() {
            let env = bound_env.as_ref().unwrap_or(env);
            match *self.store.kind(ty) {
                TypeKind::Modified { base, .. } => ty = base,
                TypeKind::Alias(defn) => ty = self.defns.get(defn).as_type()?.aliased?,
                TypeKind::TypeVar(param) => match env.find(param) {
                    Some(bound) => {
                        ty = bound;
                        bound_env = Some(Env::new());
                    }
                    None => return Some(Stem::TypeParam(param)),
                },
                TypeKind::Nominal { .. } | TypeKind::Specialized(_) => {
                    let (defn, env) = resolve_nominal(self.store, self.defns, ty, env)?;
                    return Some(Stem::Type(defn, env));
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
        None
    }

    fn lookup_in(
        &mut self,
        name: Name,
        stem: &Stem,
        from_static: bool,
        results: &mut Vec<MemberRef>,
        visited: &mut Visited,
    ) {
        match stem {
            Stem::Module(module) => {
                if !visited.insert((*module, EnvKey::default())) {
                    return;
                }
                let Some(symbols) = self.defns.get(*module).symbols() else {
                    return;
                };
                for &defn in symbols.get(name) {
                    self.push_member(defn, Env::empty(), from_static, results);
                }
            }
            Stem::Type(ty, env) => self.inherited(name, *ty, env, from_static, results, visited),
            Stem::TypeParam(param) => {
                if !visited.insert((*param, EnvKey::default())) {
                    return;
                }
                for bound in self.bounds(*param) {
                    if let Some(stem) = self.stem_for(bound, Env::empty()) {
                        self.lookup_in(name, &stem, from_static, results, visited);
                    }
                }
            }
            Stem::Ty(ty, env) => {
                if let Some(stem) = self.stem_for(*ty, env) {
                    self.lookup_in(name, &stem, from_static, results, visited);
                }
            }
            Stem::List(stems) => {
                for stem in stems {
                    self.lookup_in(name, stem, from_static, results, visited);
                }
            }
        }
    }

    fn inherited(
        &mut self,
        name: Name,
        ty: DefnId,
        env: &Env,
        from_static: bool,
        results: &mut Vec<MemberRef>,
        visited: &mut Visited,
    ) {
        if !visited.insert((ty, env.key())) {
            return;
        }
        let defns = self.defns;
        let Some(type_defn) = defns.get(ty).as_type() else {
            return;
        };

        let local = type_defn.symbols.get(name);
        if !local.is_empty() {
            for &defn in local {
                self.push_member(defn, env, from_static, results);
            }
            return;
        }

        for &edge in &type_defn.extends {
            let Some((base, base_env)) = resolve_nominal(self.store, defns, edge, env) else {
                continue;
            };
            ensure_sufficient_stack(|| {
                self.inherited(name, base, &base_env, from_static, results, visited);
            });
        }
    }

    fn push_member(
        &self,
        defn: DefnId,
        env: &Env,
        from_static: bool,
        results: &mut Vec<MemberRef>,
    ) {
        if from_static && is_instance_member(self.defns, defn) {
            return;
        }
        let member = MemberRef {
            defn,
            env: env.clone(),
        };
        if !results.contains(&member) {
            results.push(member);
        }
    }

    fn collect_names(
        &mut self,
        stem: &Stem,
        names: &mut Vec<Name>,
        seen: &mut FxHashSet<Name>,
        visited: &mut Visited,
    ) {
        match stem {
            Stem::Module(module) => {
                if let Some(symbols) = self.defns.get(*module).symbols() {
                    for name in symbols.names() {
                        add_name(name, names, seen);
                    }
                }
            }
            Stem::Type(ty, env) => {
                if !visited.insert((*ty, env.key())) {
                    return;
                }
                let defns = self.defns;
                let Some(type_defn) = defns.get(*ty).as_type() else {
                    return;
                };
                for name in type_defn.symbols.names() {
                    add_name(name, names, seen);
                }
                for &edge in &type_defn.extends {
                    if let Some((base, base_env)) = resolve_nominal(self.store, defns, edge, env) {
                        let base = Stem::Type(base, base_env);
                        ensure_sufficient_stack(|| {
                            self.collect_names(&base, names, seen, visited);
                        });
                    }
                }
            }
            Stem::TypeParam(param) => {
                if !visited.insert((*param, EnvKey::default())) {
                    return;
                }
                for bound in self.bounds(*param) {
                    if let Some(stem) = self.stem_for(bound, Env::empty()) {
                        self.collect_names(&stem, names, seen, visited);
                    }
                }
            }
            Stem::Ty(ty, env) => {
                if let Some(stem) = self.stem_for(*ty, env) {
                    self.collect_names(&stem, names, seen, visited);
                }
            }
            Stem::List(stems) => {
                for stem in stems {
                    self.collect_names(stem, names, seen, visited);
                }
            }
        }
    }

    fn bounds(&self, param: DefnId) -> Vec<Idx> {
        self.defns
            .get(param)
            .as_type_param()
            .map(|p| p.bounds.clone())
            .unwrap_or_default()
    }
}

fn add_name(name: Name, names: &mut Vec<Name>, seen: &mut FxHashSet<Name>) {
    if seen.insert(name) {
        names.push(name);
    }
}

/// Functions and let/var fields that need an instance to be used.
fn is_instance_member(defns: &DefnGraph, defn: DefnId) -> bool {
    let defn = defns.get(defn);
    matches!(defn.kind, DefnKind::Function | DefnKind::Let | DefnKind::Var) && !defn.is_static()
}

#[cfg(test)]
mod tests;
