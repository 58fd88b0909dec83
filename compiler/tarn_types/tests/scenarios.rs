//! Contract tests for the Tarn type core.
//!
//! Each test pins one behavior callers rely on, exercised only through the
//! public API.
//!
//! - `store_*` - canonicalization of derived types
//! - `lookup_*` - member lookup and shadowing
//! - `relation_*` - equality and subtyping laws

#![allow(clippy::unwrap_used, clippy::expect_used)]

use pretty_assertions::assert_eq;
use tarn_ir::StringInterner;
use tarn_types::{
    DefnGraph, DefnHeader, DefnKind, Env, Idx, InvariantViolation, MemberRef, NameLookup,
    NominalKind, Operand, Stem, TypeKind, TypeRelation, TypeStore,
};

// =============================================================================
// Store
// =============================================================================

/// Contract: unions are sets; member order never creates a new type
#[test]
fn store_union_is_canonical() {
    let mut store = TypeStore::new();
    let first = store.union(&[Idx::I16, Idx::I32]).unwrap();
    let second = store.union(&[Idx::I32, Idx::I16]).unwrap();

    assert_eq!(first, second);
    assert_eq!(
        *store.kind(first),
        TypeKind::Union(vec![Idx::I16, Idx::I32].into_boxed_slice())
    );
}

/// Contract: tuples are sequences; each order is its own type
#[test]
fn store_tuple_preserves_order() {
    let mut store = TypeStore::new();
    let first = store.tuple(&[Idx::I16, Idx::I32]);
    let second = store.tuple(&[Idx::I32, Idx::I16]);

    assert_ne!(first, second);
    assert_eq!(
        *store.kind(first),
        TypeKind::Tuple(vec![Idx::I16, Idx::I32].into_boxed_slice())
    );
    assert_eq!(
        *store.kind(second),
        TypeKind::Tuple(vec![Idx::I32, Idx::I16].into_boxed_slice())
    );
}

/// Contract: one specialization per (generic, arguments) pair
#[test]
fn store_specialization_is_canonical() {
    let names = StringInterner::new();
    let mut store = TypeStore::new();
    let mut defns = DefnGraph::new();
    let a = defns.add_type(
        &mut store,
        DefnHeader::new(names.intern("A")),
        NominalKind::Class,
    );
    defns.add_type_param(&mut store, a, names.intern("S"), &[]);
    defns.add_type_param(&mut store, a, names.intern("T"), &[]);

    let first = store.specialize(&defns, a, &[Idx::I16, Idx::I32]).unwrap();
    let again = store.specialize(&defns, a, &[Idx::I16, Idx::I32]).unwrap();
    let other = store.specialize(&defns, a, &[Idx::I32, Idx::I32]).unwrap();

    assert_eq!(first, again);
    assert_ne!(first, other);
}

/// Contract: specializing with the wrong number of arguments is reported
#[test]
fn store_specialization_checks_arity() {
    let names = StringInterner::new();
    let mut store = TypeStore::new();
    let mut defns = DefnGraph::new();
    let a = defns.add_type(
        &mut store,
        DefnHeader::new(names.intern("A")),
        NominalKind::Class,
    );
    defns.add_type_param(&mut store, a, names.intern("S"), &[]);
    defns.add_type_param(&mut store, a, names.intern("T"), &[]);

    assert_eq!(
        store.specialize(&defns, a, &[Idx::I16, Idx::I32, Idx::BOOL]),
        Err(InvariantViolation::ArityMismatch {
            generic: a,
            expected: 2,
            found: 3,
        })
    );
}

// =============================================================================
// Lookup
// =============================================================================

fn lookup(
    store: &mut TypeStore,
    defns: &DefnGraph,
    names: &StringInterner,
    name: &str,
    stem: &Stem,
) -> Vec<MemberRef> {
    let mut results = Vec::new();
    NameLookup::new(store, defns).lookup(names.intern(name), stem, false, &mut results);
    results
}

/// Contract: a module's names are found once and unknown names not at all
#[test]
fn lookup_module_constant() {
    let names = StringInterner::new();
    let mut store = TypeStore::new();
    let mut defns = DefnGraph::new();
    let m = defns.add_module(DefnHeader::new(names.intern("M")));
    let x = defns.add_value(
        DefnHeader::new(names.intern("x")).in_scope(m),
        DefnKind::Const,
        Some(Idx::I32),
    );

    let stem = Stem::Module(m);
    let found = lookup(&mut store, &defns, &names, "x", &stem);
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].defn, x);
    assert!(lookup(&mut store, &defns, &names, "y", &stem).is_empty());

    let mut visited = 0;
    NameLookup::new(&mut store, &defns).for_all_names(&stem, |_, _| visited += 1);
    assert_eq!(visited, 1);
}

/// Contract: a derived type's own member shadows the inherited one
#[test]
fn lookup_shadowing() {
    let names = StringInterner::new();
    let mut store = TypeStore::new();
    let mut defns = DefnGraph::new();
    let base = defns.add_type(
        &mut store,
        DefnHeader::new(names.intern("Base")),
        NominalKind::Class,
    );
    let derived = defns.add_type(
        &mut store,
        DefnHeader::new(names.intern("Derived")),
        NominalKind::Class,
    );
    let base_ty = defns.get(base).declared_type().unwrap();
    defns.add_extends(derived, base_ty);
    let base_x = defns.add_value(
        DefnHeader::new(names.intern("x")).in_scope(base),
        DefnKind::Let,
        Some(Idx::I32),
    );

    let stem = Stem::Type(derived, Env::new());
    let before = lookup(&mut store, &defns, &names, "x", &stem);
    assert_eq!(before.len(), 1);
    assert_eq!(before[0].defn, base_x);

    let derived_x = defns.add_value(
        DefnHeader::new(names.intern("x")).in_scope(derived),
        DefnKind::Let,
        Some(Idx::I64),
    );
    let after = lookup(&mut store, &defns, &names, "x", &stem);
    assert_eq!(after.len(), 1);
    assert_eq!(after[0].defn, derived_x);
}

// =============================================================================
// Relations
// =============================================================================

/// Contract: primitive equality is identity of kind and width
#[test]
fn relation_primitive_equality() {
    let mut store = TypeStore::new();
    let defns = DefnGraph::new();
    let mut relation = TypeRelation::new(&mut store, &defns);

    assert!(relation.types_equal(Idx::I16, Idx::I16).unwrap());
    assert!(!relation.types_equal(Idx::I16, Idx::I32).unwrap());
    assert!(!relation.types_equal(Idx::F32, Idx::F64).unwrap());
}

/// Contract: every type is equal to and a subtype of itself
#[test]
fn relation_reflexivity() {
    let names = StringInterner::new();
    let mut store = TypeStore::new();
    let mut defns = DefnGraph::new();
    let class = defns.add_type(
        &mut store,
        DefnHeader::new(names.intern("C")),
        NominalKind::Class,
    );
    let class_ty = defns.get(class).declared_type().unwrap();
    let tuple = store.tuple(&[class_ty, Idx::F32]);
    let union = store.union(&[tuple, Idx::U16]).unwrap();

    let mut relation = TypeRelation::new(&mut store, &defns);
    for ty in [Idx::VOID, Idx::BOOL, class_ty, tuple, union] {
        assert!(relation.types_equal(ty, ty).unwrap());
        assert!(relation
            .is_subtype_type(Operand::plain(ty), Operand::plain(ty))
            .unwrap());
    }
    assert!(relation
        .is_subtype(class, Env::empty(), class, Env::empty())
        .unwrap());
}

/// Contract: subtyping is transitive along declared inheritance
#[test]
fn relation_transitivity() {
    let names = StringInterner::new();
    let mut store = TypeStore::new();
    let mut defns = DefnGraph::new();
    let mut chain = Vec::new();
    for name in ["A", "B", "C", "D"] {
        let defn = defns.add_type(
            &mut store,
            DefnHeader::new(names.intern(name)),
            NominalKind::Class,
        );
        if let Some(&parent) = chain.last() {
            let parent_ty = defns.get(parent).declared_type().unwrap();
            defns.add_extends(defn, parent_ty);
        }
        chain.push(defn);
    }

    let empty = Env::empty();
    let mut relation = TypeRelation::new(&mut store, &defns);
    for (i, &sub) in chain.iter().enumerate() {
        for (j, &sup) in chain.iter().enumerate() {
            assert_eq!(
                relation.is_subtype(sub, empty, sup, empty).unwrap(),
                i >= j,
                "subtype({i}, {j})"
            );
        }
    }
}
