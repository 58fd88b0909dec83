//! Type relations: equality, subtyping, conversion ranking and structural
//! conformance.
//!
//! # Design
//!
//! Every predicate compares two [`Operand`]s, each a type seen through the
//! qualifiers applied to it and the environment binding its type variables.
//! Before comparing shapes, operands are normalized:
//!
//! - `Modified` wrappers are folded into the operand's qualifiers
//! - `Alias` types are replaced by their target
//! - bound `TypeVar`s are replaced by their binding
//! - `Specialized` types are peeled into the generic's nominal type seen
//!   through the specialization's environment
//!
//! The predicates are mutually recursive and the graphs they walk may be
//! cyclic, so every non-trivial query goes through one guarded entry point:
//! answers are memoized by `(query, operands, environment fingerprints)`,
//! re-entering a query that is still in progress answers with the query's
//! cycle assumption, and nesting is bounded by [`RelationConfig::max_depth`].

mod conform;
mod convert;
mod equal;
mod subtype;

use std::borrow::Cow;

use rustc_hash::{FxHashMap, FxHashSet};

use crate::guard::{ensure_sufficient_stack, DepthGuard};
use crate::{
    DefnBody, DefnGraph, DefnId, Env, EnvChain, EnvKey, Idx, InvariantViolation, Qualifiers,
    TypeFlags, TypeKind, TypeStore,
};

pub use convert::ConversionRank;

/// Tuning knobs for a [`TypeRelation`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RelationConfig {
    /// Maximum nesting of relation queries before giving up with
    /// [`InvariantViolation::RecursionLimit`].
    pub max_depth: u32,
    /// Cache answers across queries made through the same relation.
    pub memoize: bool,
}

/// Default nesting budget. Cycles are cut by the in-progress set and the
/// native stack grows on demand, so this only stops runaway walks over
/// malformed graphs. Matches the recursion depth `ensure_sufficient_stack`
/// is sized for.
pub const DEFAULT_MAX_DEPTH: u32 = 100_000;

impl Default for RelationConfig {
    fn default() -> Self {
        RelationConfig {
            max_depth: DEFAULT_MAX_DEPTH,
            memoize: true,
        }
    }
}

/// On-demand type resolution for functions whose type upstream passes have
/// not computed yet.
///
/// The returned type is written into the function's write-once type cell,
/// so each function is resolved at most once.
pub trait TypeResolver {
    fn resolve_function_type(
        &mut self,
        store: &mut TypeStore,
        defns: &DefnGraph,
        func: DefnId,
    ) -> Option<Idx>;
}

/// A type as seen from one side of a relation.
#[derive(Copy, Clone, Debug)]
pub struct Operand<'e> {
    pub ty: Idx,
    pub quals: Qualifiers,
    pub env: &'e Env,
}

impl<'e> Operand<'e> {
    /// Unqualified `ty` seen through `env`.
    pub fn new(ty: Idx, env: &'e Env) -> Self {
        Operand {
            ty,
            quals: Qualifiers::empty(),
            env,
        }
    }

    #[must_use]
    pub fn with_quals(mut self, quals: Qualifiers) -> Self {
        self.quals = quals;
        self
    }
}

impl Operand<'static> {
    /// Unqualified `ty` with no bindings.
    pub fn plain(ty: Idx) -> Self {
        Operand::new(ty, Env::empty())
    }
}

/// Normalized operand. The environment is owned when normalization had to
/// build one (peeling a specialization).
#[derive(Clone, Debug)]
struct Norm<'e> {
    ty: Idx,
    quals: Qualifiers,
    env: Cow<'e, Env>,
}

impl Norm<'_> {
    fn operand(&self) -> Operand<'_> {
        Operand {
            ty: self.ty,
            quals: self.quals,
            env: &self.env,
        }
    }

    /// The same type without its qualifiers.
    fn base(&self) -> Operand<'_> {
        Operand::new(self.ty, &self.env)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
enum Query {
    Equal,
    Subtype,
    Convert,
    Conform,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
enum Subject {
    Type(Idx, Qualifiers),
    Defn(DefnId),
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct QueryKey {
    query: Query,
    dst: (Subject, EnvKey),
    src: (Subject, EnvKey),
}

impl QueryKey {
    fn types(query: Query, dst: Operand<'_>, src: Operand<'_>) -> Self {
        QueryKey {
            query,
            dst: (Subject::Type(dst.ty, dst.quals), dst.env.key()),
            src: (Subject::Type(src.ty, src.quals), src.env.key()),
        }
    }

    fn defns(query: Query, dst: DefnId, dst_env: &Env, src: DefnId, src_env: &Env) -> Self {
        QueryKey {
            query,
            dst: (Subject::Defn(dst), dst_env.key()),
            src: (Subject::Defn(src), src_env.key()),
        }
    }
}

/// Memoized answer.
#[derive(Copy, Clone, Debug)]
enum Answer {
    Bool(bool),
    Rank(ConversionRank),
}

/// Answer types the relation memoizes.
trait Memoized: Copy {
    fn into_answer(self) -> Answer;
    fn from_answer(answer: Answer) -> Option<Self>;
}

impl Memoized for bool {
    fn into_answer(self) -> Answer {
        Answer::Bool(self)
    }

    fn from_answer(answer: Answer) -> Option<Self> {
        match answer {
            Answer::Bool(b) => Some(b),
            Answer::Rank(_) => None,
        }
    }
}

impl Memoized for ConversionRank {
    fn into_answer(self) -> Answer {
        Answer::Rank(self)
    }

    fn from_answer(answer: Answer) -> Option<Self> {
        match answer {
            Answer::Rank(rank) => Some(rank),
            Answer::Bool(_) => None,
        }
    }
}

/// Relation engine over one store and declaration graph.
///
/// A relation interns the types it derives while peeling specializations,
/// so it holds the store mutably. The memo lives as long as the relation;
/// create a new one after the declaration graph changes.
pub struct TypeRelation<'a> {
    store: &'a mut TypeStore,
    defns: &'a DefnGraph,
    resolver: Option<&'a mut dyn TypeResolver>,
    config: RelationConfig,
    memo: FxHashMap<QueryKey, Answer>,
    active: FxHashSet<QueryKey>,
    depth: DepthGuard,
    /// Cycle assumptions made so far. Answers that depended on one are only
    /// cached once the outermost query completes.
    assumptions: u32,
}

impl<'a> TypeRelation<'a> {
    pub fn new(store: &'a mut TypeStore, defns: &'a DefnGraph) -> Self {
        Self::with_config(store, defns, RelationConfig::default())
    }

    pub fn with_config(
        store: &'a mut TypeStore,
        defns: &'a DefnGraph,
        config: RelationConfig,
    ) -> Self {
        TypeRelation {
            store,
            defns,
            resolver: None,
            config,
            memo: FxHashMap::default(),
            active: FxHashSet::default(),
            depth: DepthGuard::new(config.max_depth),
            assumptions: 0,
        }
    }

    /// Install a resolver for function types left unset by upstream passes.
    #[must_use]
    pub fn with_resolver(mut self, resolver: &'a mut dyn TypeResolver) -> Self {
        self.resolver = Some(resolver);
        self
    }

    #[inline]
    pub fn store(&self) -> &TypeStore {
        self.store
    }

    #[inline]
    pub fn store_mut(&mut self) -> &mut TypeStore {
        self.store
    }

    #[inline]
    pub fn defns(&self) -> &'a DefnGraph {
        self.defns
    }

    pub fn config(&self) -> RelationConfig {
        self.config
    }

    /// Number of memoized answers.
    pub fn memo_len(&self) -> usize {
        self.memo.len()
    }

    /// Run `compute` for `key` with memoization, cycle and depth guards.
    ///
    /// Re-entering `key` while it is in progress answers `on_cycle`.
    fn cached<T: Memoized>(
        &mut self,
        key: QueryKey,
        on_cycle: T,
        compute: impl FnOnce(&mut Self) -> Result<T, InvariantViolation>,
    ) -> Result<T, InvariantViolation> {
        if self.config.memoize {
            if let Some(hit) = self.memo.get(&key).copied().and_then(T::from_answer) {
                return Ok(hit);
            }
        }
        if self.active.contains(&key) {
            tracing::debug!(?key, "cycle in type relation");
            self.assumptions += 1;
            return Ok(on_cycle);
        }

        self.depth.enter()?;
        self.active.insert(key.clone());
        let assumptions = self.assumptions;
        let result = ensure_sufficient_stack(|| compute(self));
        self.active.remove(&key);
        self.depth.exit();

        let value = result?;
        let assumed = self.assumptions != assumptions;
        if self.config.memoize && (!assumed || self.active.is_empty()) {
            self.memo.insert(key, value.into_answer());
        }
        Ok(value)
    }

    /// Fold qualifier wrappers, aliases, bound type variables and
    /// specializations out of `op`.
    fn normalize<'e>(&mut self, op: Operand<'e>) -> Result<Norm<'e>, InvariantViolation> {
        let mut ty = op.ty;
        let mut quals = op.quals;
        let mut env = Cow::Borrowed(op.env);

        // Each step either removes a wrapper or follows a declaration edge;
        // a longer walk can only come from an alias cycle.
        let mut steps = 0u32;
        loop {
            if steps > self.config.max_depth {
                tracing::debug!(?ty, "normalization did not terminate");
                return Err(InvariantViolation::RecursionLimit {
                    limit: self.config.max_depth,
                });
            }
            steps += 1;

            match *self.store.kind(ty) {
                TypeKind::Modified { base, quals: q } => {
                    quals |= q;
                    ty = base;
                }
                TypeKind::Alias(defn) => {
                    ty = self
                        .defns
                        .get(defn)
                        .as_type()
                        .and_then(|t| t.aliased)
                        .ok_or(InvariantViolation::MissingAliasTarget { defn })?;
                }
                TypeKind::TypeVar(param) => match env.find(param) {
                    Some(bound) => {
                        ty = bound;
                        env = Cow::Borrowed(Env::empty());
                    }
                    None => break,
                },
                TypeKind::Specialized(spec) => {
                    let generic = self.store.spec(spec).generic;
                    let defns = self.defns;
                    let generic_ty = match &defns.get(generic).body {
                        DefnBody::Type(t) => Some(t.ty),
                        DefnBody::Function(_) => self.function_type(generic),
                        DefnBody::Module(_) | DefnBody::Value(_) | DefnBody::TypeParam(_) => None,
                    };
                    // A generic function whose type is still unknown stays
                    // opaque: equal only to itself.
                    let Some(generic_ty) = generic_ty else {
                        break;
                    };
                    let inner =
                        Env::for_specialization(self.store, defns, spec, &EnvChain::new(&env));
                    ty = generic_ty;
                    env = Cow::Owned(inner);
                }
                TypeKind::Void
                | TypeKind::Bool
                | TypeKind::Int { .. }
                | TypeKind::Float { .. }
                | TypeKind::Tuple(_)
                | TypeKind::Union(_)
                | TypeKind::Function { .. }
                | TypeKind::Nominal { .. }
                | TypeKind::Contingent(_)
                | TypeKind::Inferred(_) => break,
            }
        }

        if quals.is_provisional() {
            return Err(InvariantViolation::ProvisionalQualifier { ty: op.ty });
        }
        Ok(Norm { ty, quals, env })
    }

    /// Identical handles that no environment or qualifier can tell apart.
    fn trivially_equal(&self, dst: Operand<'_>, src: Operand<'_>) -> bool {
        if dst.ty != src.ty || dst.quals != src.quals || dst.quals.is_provisional() {
            return false;
        }
        let flags = self.store.flags(dst.ty);
        if flags.contains(TypeFlags::HAS_QUALIFIER) {
            return false;
        }
        !flags.is_env_sensitive() || dst.env == src.env
    }

    /// The function type of `func`, resolving it on demand.
    fn function_type(&mut self, func: DefnId) -> Option<Idx> {
        let defns = self.defns;
        let function = defns.get(func).as_function()?;
        if let Some(ty) = function.ty() {
            return Some(ty);
        }
        let resolver = self.resolver.as_deref_mut()?;
        let ty = resolver.resolve_function_type(self.store, defns, func)?;
        tracing::debug!(?func, ?ty, "resolved function type on demand");
        function.set_ty(ty);
        function.ty()
    }

    /// The type of a value or function member, resolving functions on demand.
    fn member_type(&mut self, member: DefnId) -> Option<Idx> {
        let defns = self.defns;
        let defn = defns.get(member);
        if defn.as_function().is_some() {
            self.function_type(member)
        } else {
            defn.declared_type()
        }
    }
}
