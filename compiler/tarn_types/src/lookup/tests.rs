#![allow(clippy::unwrap_used, clippy::expect_used)]

use pretty_assertions::assert_eq;
use tarn_ir::StringInterner;

use super::*;
use crate::{DefnHeader, Modifiers, NominalKind};

struct Fixture {
    names: StringInterner,
    store: TypeStore,
    defns: DefnGraph,
}

impl Fixture {
    fn new() -> Self {
        Fixture {
            names: StringInterner::new(),
            store: TypeStore::new(),
            defns: DefnGraph::new(),
        }
    }

    fn class(&mut self, name: &str) -> DefnId {
        let header = DefnHeader::new(self.names.intern(name));
        self.defns.add_type(&mut self.store, header, NominalKind::Class)
    }

    fn extend(&mut self, derived: DefnId, base: DefnId) {
        let base_ty = self.defns.get(base).declared_type().unwrap();
        self.defns.add_extends(derived, base_ty);
    }

    fn field(&mut self, owner: DefnId, name: &str) -> DefnId {
        let header = DefnHeader::new(self.names.intern(name)).in_scope(owner);
        self.defns.add_value(header, DefnKind::Let, Some(Idx::I32))
    }

    fn method(&mut self, owner: DefnId, name: &str, modifiers: Modifiers) -> DefnId {
        let header = DefnHeader::new(self.names.intern(name))
            .in_scope(owner)
            .with_modifiers(modifiers);
        self.defns.add_function(header, None)
    }

    fn lookup(&mut self, name: &str, stem: &Stem, from_static: bool) -> Vec<DefnId> {
        let name = self.names.intern(name);
        let mut results = Vec::new();
        let added = NameLookup::new(&mut self.store, &self.defns).lookup(
            name,
            stem,
            from_static,
            &mut results,
        );
        assert_eq!(added, results.len());
        results.into_iter().map(|m| m.defn).collect()
    }
}

fn type_stem(defn: DefnId) -> Stem {
    Stem::Type(defn, Env::new())
}

#[test]
fn module_lookup_returns_every_overload() {
    let mut f = Fixture::new();
    let module = f.defns.add_module(DefnHeader::new(f.names.intern("m")));
    let first = f.defns.add_function(
        DefnHeader::new(f.names.intern("print")).in_scope(module),
        None,
    );
    let second = f.defns.add_function(
        DefnHeader::new(f.names.intern("print")).in_scope(module),
        None,
    );

    let stem = Stem::Module(module);
    assert_eq!(f.lookup("print", &stem, false), vec![first, second]);
    assert!(f.lookup("missing", &stem, false).is_empty());
}

#[test]
fn local_members_shadow_inherited_ones() {
    let mut f = Fixture::new();
    let base = f.class("Base");
    let derived = f.class("Derived");
    f.extend(derived, base);
    f.field(base, "x");
    let base_y = f.field(base, "y");
    let derived_x = f.field(derived, "x");

    let stem = type_stem(derived);
    assert_eq!(f.lookup("x", &stem, false), vec![derived_x]);
    assert_eq!(f.lookup("y", &stem, false), vec![base_y]);
}

#[test]
fn lookup_accumulates_across_every_base() {
    let mut f = Fixture::new();
    let left = f.class("Left");
    let right = f.class("Right");
    let both = f.class("Both");
    f.extend(both, left);
    f.extend(both, right);
    let from_left = f.method(left, "run", Modifiers::empty());
    let from_right = f.method(right, "run", Modifiers::empty());

    assert_eq!(
        f.lookup("run", &type_stem(both), false),
        vec![from_left, from_right]
    );
}

#[test]
fn static_filter_applies_after_shadowing() {
    let mut f = Fixture::new();
    let base = f.class("Base");
    let derived = f.class("Derived");
    f.extend(derived, base);
    let base_make = f.method(base, "make", Modifiers::STATIC);
    f.method(derived, "make", Modifiers::empty());
    let base_count = f.method(base, "count", Modifiers::STATIC);
    f.field(base, "size");

    let stem = type_stem(derived);
    // The local instance method hides the inherited static one.
    assert!(f.lookup("make", &stem, true).is_empty());
    assert_eq!(f.lookup("make", &type_stem(base), true), vec![base_make]);
    assert_eq!(f.lookup("count", &stem, true), vec![base_count]);
    assert!(f.lookup("size", &stem, true).is_empty());
    assert_eq!(f.lookup("size", &stem, false).len(), 1);
}

#[test]
fn inherited_members_carry_the_base_environment() {
    let mut f = Fixture::new();
    let base = f.class("Base");
    let t = f.defns.add_type_param(&mut f.store, base, f.names.intern("T"), &[]);
    let value = f.field(base, "value");
    let derived = f.class("Derived");
    let base_bool = f
        .store
        .specialized_type(&f.defns, base, &[Idx::BOOL])
        .unwrap();
    f.defns.add_extends(derived, base_bool);

    let name = f.names.intern("value");
    let mut results = Vec::new();
    NameLookup::new(&mut f.store, &f.defns).lookup_inherited(
        name,
        derived,
        Env::empty(),
        false,
        &mut results,
    );
    assert_eq!(
        results,
        vec![MemberRef {
            defn: value,
            env: Env::from_pairs([(t, Idx::BOOL)]),
        }]
    );
}

#[test]
fn type_params_search_their_bounds() {
    let mut f = Fixture::new();
    let shape = f.class("Shape");
    let area = f.method(shape, "area", Modifiers::empty());
    let holder = f.class("Holder");
    let shape_ty = f.defns.get(shape).declared_type().unwrap();
    let t = f
        .defns
        .add_type_param(&mut f.store, holder, f.names.intern("T"), &[shape_ty]);
    let t_ty = f.defns.param_var(t).unwrap();

    assert_eq!(f.lookup("area", &Stem::TypeParam(t), false), vec![area]);
    assert_eq!(
        f.lookup("area", &Stem::Ty(t_ty, Env::new()), false),
        vec![area]
    );
}

#[test]
fn type_stems_resolve_through_wrappers() {
    let mut f = Fixture::new();
    let boxed = f.class("Box");
    let t = f.defns.add_type_param(&mut f.store, boxed, f.names.intern("T"), &[]);
    let get = f.method(boxed, "get", Modifiers::empty());
    let spec = f
        .store
        .specialized_type(&f.defns, boxed, &[Idx::U8])
        .unwrap();
    let constant = f.store.const_type(spec, false);

    let mut lookup = NameLookup::new(&mut f.store, &f.defns);
    assert_eq!(
        lookup.stem_for(constant, Env::empty()),
        Some(Stem::Type(boxed, Env::from_pairs([(t, Idx::U8)])))
    );
    assert_eq!(lookup.stem_for(Idx::I32, Env::empty()), None);
    assert_eq!(lookup.stem_for(Idx::VOID, Env::empty()), None);

    assert_eq!(f.lookup("get", &Stem::Ty(constant, Env::new()), false), vec![get]);
}

#[test]
fn list_stems_are_searched_in_order() {
    let mut f = Fixture::new();
    let module = f.defns.add_module(DefnHeader::new(f.names.intern("m")));
    let global = f.defns.add_value(
        DefnHeader::new(f.names.intern("x")).in_scope(module),
        DefnKind::Const,
        Some(Idx::I32),
    );
    let class = f.class("C");
    let member = f.field(class, "x");

    let stem = Stem::List(vec![type_stem(class), Stem::Module(module)]);
    assert_eq!(f.lookup("x", &stem, false), vec![member, global]);
}

#[test]
fn cyclic_extends_terminates() {
    let mut f = Fixture::new();
    let a = f.class("A");
    let b = f.class("B");
    f.extend(a, b);
    f.extend(b, a);
    let only = f.field(b, "only");

    assert!(f.lookup("nothing", &type_stem(a), false).is_empty());
    assert_eq!(f.lookup("only", &type_stem(a), false), vec![only]);

    let mut seen = Vec::new();
    NameLookup::new(&mut f.store, &f.defns).for_all_names(&type_stem(a), |name, _| {
        seen.push(name);
    });
    assert_eq!(seen, vec![f.names.intern("only")]);
}

#[test]
fn for_all_names_visits_each_name_once_with_winners() {
    let mut f = Fixture::new();
    let base = f.class("Base");
    let derived = f.class("Derived");
    f.extend(derived, base);
    f.field(base, "x");
    let base_y = f.field(base, "y");
    let derived_x = f.field(derived, "x");
    let derived_z = f.method(derived, "z", Modifiers::empty());

    let mut visited = Vec::new();
    NameLookup::new(&mut f.store, &f.defns).for_all_names(&type_stem(derived), |name, members| {
        visited.push((name, members.iter().map(|m| m.defn).collect::<Vec<_>>()));
    });

    let name = |s| f.names.intern(s);
    assert_eq!(
        visited,
        vec![
            (name("x"), vec![derived_x]),
            (name("z"), vec![derived_z]),
            (name("y"), vec![base_y]),
        ]
    );
}
