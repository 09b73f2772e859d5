use super::*;
use pretty_assertions::assert_eq;

fn names(list: &[Name]) -> Vec<&str> {
    list.iter().map(Name::as_str).collect()
}

#[test]
fn test_declare_own_stores_placeholder() {
    let scope = ScopeRef::root();
    assert_eq!(scope.declare_own("x", None), Value::Undefined);
    assert!(scope.has_own("x"));
    assert_eq!(scope.get_own("x"), Some(Value::Undefined));
    assert_eq!(scope.get_own("y"), None);
}

#[test]
fn test_redeclare_keeps_position() {
    let scope = ScopeRef::root();
    scope.declare_own("a", Some(Value::Number(1.0)));
    scope.declare_own("b", None);
    scope.declare_own("a", Some(Value::Number(2.0)));
    assert_eq!(names(&scope.own_names()), vec!["a", "b"]);
    assert_eq!(scope.get("a"), Some(Value::Number(2.0)));
}

#[test]
fn test_shadowing() {
    let parent = ScopeRef::root();
    parent.declare_own("n", Some(Value::Number(1.0)));
    let child = parent.new_child();
    child.declare_own("n", Some(Value::Number(2.0)));

    assert_eq!(parent.get_own("n"), Some(Value::Number(1.0)));
    assert_eq!(child.get("n"), Some(Value::Number(2.0)));
    assert!(child.resolve("n").unwrap().scope.ptr_eq(&child));
}

#[test]
fn test_set_writes_nearest_owner() {
    let root = ScopeRef::root();
    root.declare_own("x", Some(Value::Number(1.0)));
    let child = root.new_child();

    child.set("x", Value::Number(5.0));
    assert!(!child.has_own("x"));
    assert_eq!(root.get_own("x"), Some(Value::Number(5.0)));
}

#[test]
fn test_set_declares_unbound_name_locally() {
    let root = ScopeRef::root();
    let child = root.new_child();
    child.set("fresh", Value::Bool(true));
    assert!(child.has_own("fresh"));
    assert!(!root.has("fresh"));
}

#[test]
fn test_reference_writes_through() {
    let root = ScopeRef::root();
    root.declare_own("x", None);
    let child = root.new_child();
    let reference = child.resolve("x").unwrap();
    reference.set(Value::string("v"));
    assert_eq!(root.get_own("x"), Some(Value::string("v")));
    assert_eq!(reference.get(), Some(Value::string("v")));
}

#[test]
fn test_all_names_innermost_first_with_duplicates() {
    let root = ScopeRef::root();
    root.declare_own("a", None);
    root.declare_own("b", None);
    let mid = root.new_child();
    mid.declare_own("c", None);
    let leaf = mid.new_child();
    leaf.declare_own("b", None);
    leaf.declare_own("d", None);

    assert_eq!(names(&leaf.all_names()), vec!["b", "d", "c", "a", "b"]);
    assert_eq!(leaf.count_reachable(), 4);
    assert_eq!(leaf.count_own(), 2);
}

#[test]
fn test_removal_variants() {
    let root = ScopeRef::root();
    let mid = root.new_child();
    let leaf = mid.new_child();
    for scope in [&root, &mid, &leaf] {
        scope.declare_own("x", None);
    }

    assert!(!leaf.remove_own("y"));
    assert!(leaf.remove_own("x"));
    assert!(mid.has_own("x") && root.has_own("x"));

    leaf.declare_own("x", None);
    assert!(leaf.remove_nearest("x"));
    assert!(!leaf.has_own("x"));
    assert!(mid.has_own("x"));

    leaf.declare_own("x", None);
    assert_eq!(leaf.remove_all("x"), 3);
    assert!(!leaf.has("x"));
    assert_eq!(leaf.remove_all("x"), 0);
}

#[test]
fn test_structure_queries() {
    let root = ScopeRef::named("global");
    let a = root.new_child();
    let b = root.new_child();
    let leaf = a.new_child();

    assert_eq!(root.children(), vec![a.clone(), b.clone()]);
    assert!(root.has_child(&a));
    assert!(!root.has_child(&leaf));
    assert_eq!(leaf.depth(), 2);
    assert_eq!(root.depth(), 0);
    assert_eq!(root.name().unwrap(), "global");
    assert!(leaf.parent().unwrap().ptr_eq(&a));
}

#[test]
fn test_attach_moves_between_parents() {
    let root = ScopeRef::root();
    let a = root.new_child();
    let b = root.new_child();
    let leaf = a.new_child();

    assert_eq!(b.attach_child(&leaf), Ok(true));
    assert!(b.has_child(&leaf));
    assert!(a.children().is_empty());
    assert_eq!(b.attach_child(&leaf), Ok(false));
    assert_eq!(b.children().len(), 1);
}

#[test]
fn test_attach_rejects_cycles() {
    let root = ScopeRef::root();
    let child = root.new_child();
    let grandchild = child.new_child();

    assert_eq!(root.attach_child(&root), Err(StructuralError::ScopeCycle));
    assert_eq!(grandchild.attach_child(&root), Err(StructuralError::ScopeCycle));
    assert_eq!(grandchild.attach_child(&child), Err(StructuralError::ScopeCycle));
    assert!(child.parent().unwrap().ptr_eq(&root));
}

#[test]
fn test_detach_child() {
    let root = ScopeRef::root();
    let child = root.new_child();
    assert!(root.detach_child(&child));
    assert!(child.parent().is_none());
    assert!(!root.detach_child(&child));
    assert!(root.children().is_empty());
}

#[test]
fn test_children_are_not_kept_alive_by_parent() {
    let root = ScopeRef::root();
    let child = root.new_child();
    let weak = child.downgrade();
    assert_eq!(root.children().len(), 1);
    drop(child);
    assert!(weak.upgrade().is_none());
    assert!(root.children().is_empty());
}

#[test]
fn test_child_keeps_parent_alive() {
    let child = ScopeRef::root().new_child();
    let parent = child.parent().unwrap();
    parent.declare_own("kept", None);
    drop(parent);
    assert!(child.has("kept"));
}

#[test]
fn test_nearest_dynamic_context() {
    let root = ScopeRef::root();
    let call = root.new_child();
    call.mark_dynamic_context();
    let block = call.new_child();
    let arrow_call = block.new_child();

    assert!(arrow_call
        .nearest_dynamic_context()
        .unwrap()
        .ptr_eq(&call));
    assert!(call.nearest_dynamic_context().unwrap().ptr_eq(&call));
    assert!(root.nearest_dynamic_context().is_none());
    assert!(!block.is_dynamic_context_owner());
}

#[test]
fn test_owner_metadata() {
    let scope = ScopeRef::root();
    assert_eq!(scope.owner(), None);
    scope.set_owner(Some(NodeId::new(4)));
    assert_eq!(scope.owner(), Some(NodeId::new(4)));
    scope.set_name(Some(Name::new("fn")));
    assert_eq!(scope.name().unwrap(), "fn");
}

// === Property tests ===

#[allow(
    clippy::disallowed_types,
    reason = "proptest macros internally use Arc"
)]
mod proptest_scope {
    use super::*;
    use proptest::prelude::*;

    fn ident() -> impl Strategy<Value = String> {
        "[a-e]"
    }

    proptest! {
        #[test]
        fn declare_then_get_own(name in ident(), n in any::<i32>()) {
            let scope = ScopeRef::root();
            scope.declare_own(name.as_str(), Some(Value::from(n)));
            prop_assert!(scope.has_own(&name));
            prop_assert_eq!(scope.get_own(&name), Some(Value::from(n)));
        }

        #[test]
        fn child_declaration_never_touches_parent(
            name in ident(),
            outer in any::<i32>(),
            inner in any::<i32>(),
        ) {
            let parent = ScopeRef::root();
            parent.declare_own(name.as_str(), Some(Value::from(outer)));
            let child = parent.new_child();
            child.declare_own(name.as_str(), Some(Value::from(inner)));
            prop_assert_eq!(parent.get_own(&name), Some(Value::from(outer)));
            prop_assert_eq!(child.get(&name), Some(Value::from(inner)));
        }

        #[test]
        fn all_names_lists_leaf_before_ancestors(
            levels in proptest::collection::vec(proptest::collection::vec(ident(), 0..4), 1..5),
        ) {
            let mut scope = ScopeRef::root();
            for (i, level) in levels.iter().enumerate() {
                if i > 0 {
                    scope = scope.new_child();
                }
                for name in level {
                    scope.declare_own(name.as_str(), None);
                }
            }

            let mut expected = Vec::new();
            for level in levels.iter().rev() {
                let mut own: Vec<&str> = Vec::new();
                for name in level {
                    if !own.contains(&name.as_str()) {
                        own.push(name);
                    }
                }
                expected.extend(own);
            }
            let all = scope.all_names();
            prop_assert_eq!(names(&all), expected);
        }

        #[test]
        fn remove_all_counts_owning_scopes(depth in 1usize..6, owners in any::<u8>()) {
            let mut chain = vec![ScopeRef::root()];
            for _ in 1..depth {
                let next = chain[chain.len() - 1].new_child();
                chain.push(next);
            }
            let mut expected = 0;
            for (i, scope) in chain.iter().enumerate() {
                if owners & (1 << i) != 0 {
                    scope.declare_own("x", None);
                    expected += 1;
                }
            }
            let leaf = &chain[chain.len() - 1];
            prop_assert_eq!(leaf.remove_all("x"), expected);
            prop_assert!(!leaf.has("x"));
        }
    }
}
