use super::*;
use pretty_assertions::assert_eq;

#[test]
fn empty_string_is_name_zero() {
    let interner = StringInterner::new();
    assert_eq!(interner.intern(""), Name::EMPTY);
    assert_eq!(interner.lookup(Name::EMPTY), "");
}

#[test]
fn interning_is_idempotent() {
    let interner = StringInterner::new();
    let a = interner.intern("Derived");
    let b = interner.intern("Derived");
    let c = interner.intern("Base");

    assert_eq!(a, b);
    assert_ne!(a, c);
    assert_eq!(interner.lookup(a), "Derived");
    assert_eq!(interner.lookup(c), "Base");
}

#[test]
fn get_does_not_insert() {
    let interner = StringInterner::new();
    let before = interner.len();
    assert_eq!(interner.get("never_seen"), None);
    assert_eq!(interner.len(), before);

    let name = interner.intern("never_seen");
    assert_eq!(interner.get("never_seen"), Some(name));
}

#[test]
fn common_identifiers_are_pre_interned() {
    let interner = StringInterner::new();
    assert!(interner.get("Self").is_some());
    assert!(interner.get("self").is_some());
    assert!(interner.get("Object").is_none());
    assert!(!interner.is_empty());
}

#[test]
fn unknown_name_renders_placeholder() {
    let interner = StringInterner::new();
    assert_eq!(interner.lookup(Name::from_raw(u32::MAX)), "<unknown>");
}

#[test]
fn shared_interner_clones_share_storage() {
    let shared = SharedInterner::new();
    let other = shared.clone();
    let name = shared.intern("shared");
    assert_eq!(other.get("shared"), Some(name));
}
