use std::collections::HashSet;
use std::sync::OnceLock;

use crate::capture::capture_conversion;
use crate::containment::containing_argument_rows;
use crate::erasure::{erased_class, erasure};
use crate::subst::{substitute, Substitution};
use crate::{ClassKind, ClassType, Type, TypeEnv, TypeError};

/// The direct (non-transitive) supertypes of `ty` (JLS 4.10), deduplicated,
/// in deterministic order.
///
/// Parameterized types additionally yield their raw type and the synthetic
/// wildcard-containment variants, so the reflexive/transitive closure reaches
/// types like `List<? extends Object>` from `List<String>`.
///
/// Wildcards have no modeled supertypes; asking is an error rather than a
/// silent empty answer.
pub fn direct_supertypes(env: &dyn TypeEnv, ty: &Type) -> Result<Vec<Type>, TypeError> {
    direct_supertypes_impl(env, ty, true)
}

/// `expand_wildcards` disables step 3 (containment expansion). The nominal
/// variant is what the containment enumeration itself walks; letting it see
/// the synthetic rows would make the enumeration feed itself.
fn direct_supertypes_impl(
    env: &dyn TypeEnv,
    ty: &Type,
    expand_wildcards: bool,
) -> Result<Vec<Type>, TypeError> {
    match ty {
        Type::Primitive(_) => Ok(vec![]),
        Type::Wildcard(_) => Err(TypeError::InvalidShape {
            operation: "direct supertypes",
            found: ty.shape_name(),
        }),
        Type::TypeVar(id) => {
            let bounds = env
                .type_param(*id)
                .map(|tp| tp.upper_bounds.clone())
                .unwrap_or_default();
            if bounds.is_empty() {
                Ok(vec![env.well_known().object_type()])
            } else {
                Ok(bounds)
            }
        }
        Type::Capture(cv) => Ok(vec![cv.upper_bound.clone()]),
        Type::Intersection(parts) => {
            if parts.is_empty() {
                Ok(vec![env.well_known().object_type()])
            } else {
                Ok(parts.clone())
            }
        }
        Type::Array(component) => array_supertypes(env, component, expand_wildcards),
        Type::Class(ct) if ct.args.is_empty() => raw_supertypes(env, ct),
        Type::Class(ct) => parameterized_supertypes(env, ct, expand_wildcards),
    }
}

fn array_supertypes(
    env: &dyn TypeEnv,
    component: &Type,
    expand_wildcards: bool,
) -> Result<Vec<Type>, TypeError> {
    let wk = env.well_known();
    let is_object = matches!(component, Type::Class(ct) if ct.def == wk.object && ct.args.is_empty());
    if is_object || matches!(component, Type::Primitive(_)) {
        return Ok(vec![
            wk.object_type(),
            Type::class(wk.cloneable, vec![]),
            Type::class(wk.serializable, vec![]),
        ]);
    }
    let supers = direct_supertypes_impl(env, component, expand_wildcards)?;
    Ok(supers.into_iter().map(Type::array).collect())
}

fn raw_supertypes(env: &dyn TypeEnv, ct: &ClassType) -> Result<Vec<Type>, TypeError> {
    let wk = env.well_known();
    if ct.def == wk.object {
        return Ok(vec![]);
    }
    let Some(decl) = env.class(ct.def) else {
        // Foreign id with no metadata: best effort, nothing to report.
        return Ok(vec![]);
    };

    let mut out = Vec::new();
    let raw_use_of_generic = !decl.type_params.is_empty();
    for declared in decl.super_class.iter().chain(decl.interfaces.iter()) {
        debug_assert!(
            matches!(declared, Type::Class(_)),
            "declared supertypes must be class or parameterized types"
        );
        // A raw use erases its supertypes; a non-generic leaf keeps their
        // declared (possibly parameterized) shape.
        let supertype = if raw_use_of_generic {
            erasure(env, declared)
        } else {
            declared.clone()
        };
        push_unique(&mut out, supertype);
    }
    if decl.kind == ClassKind::Interface && decl.interfaces.is_empty() {
        push_unique(&mut out, wk.object_type());
    }
    if out.is_empty() {
        // Classes with no declared superclass still extend Object.
        push_unique(&mut out, wk.object_type());
    }
    Ok(out)
}

fn parameterized_supertypes(
    env: &dyn TypeEnv,
    ct: &ClassType,
    expand_wildcards: bool,
) -> Result<Vec<Type>, TypeError> {
    let Some(decl) = env.class(ct.def) else {
        return Ok(vec![]);
    };
    debug_assert_eq!(
        decl.type_params.len(),
        ct.args.len(),
        "argument count must match the declared parameter count"
    );

    let mut out = Vec::new();

    // Wildcard arguments are captured before substitution so the fresh
    // variables, not the wildcards, flow into the supertype instantiations.
    let captured = capture_conversion(env, &Type::Class(ct.clone()));
    let captured_args = match &captured {
        Type::Class(cap) => cap.args.as_slice(),
        _ => ct.args.as_slice(),
    };
    let mut theta = Substitution::new();
    for (formal, actual) in decl.type_params.iter().zip(captured_args) {
        theta.insert(*formal, actual.clone());
    }
    for declared in decl.super_class.iter().chain(decl.interfaces.iter()) {
        push_unique(&mut out, substitute(declared, &theta));
    }
    if decl.kind == ClassKind::Interface && decl.interfaces.is_empty() {
        push_unique(&mut out, env.well_known().object_type());
    }

    // The raw type is a supertype of every instantiation.
    push_unique(&mut out, Type::class(ct.def, vec![]));

    if expand_wildcards {
        for row in containing_argument_rows(env, &ct.args) {
            if row == ct.args {
                continue;
            }
            push_unique(
                &mut out,
                Type::Class(ClassType {
                    def: ct.def,
                    args: row,
                    owner: ct.owner.clone(),
                }),
            );
        }
    }
    Ok(out)
}

/// The reflexive/transitive supertype closure of `ty`.
pub fn supertypes(env: &dyn TypeEnv, ty: &Type) -> Result<Vec<Type>, TypeError> {
    supertypes_where(env, ty, |_| true)
}

/// Supertype closure filtered by an acceptance predicate. Rejected types are
/// still expanded, so their own supertypes remain reachable.
pub fn supertypes_where(
    env: &dyn TypeEnv,
    ty: &Type,
    mut accept: impl FnMut(&Type) -> bool,
) -> Result<Vec<Type>, TypeError> {
    closure(env, ty, true, &mut accept)
}

/// Closure over the declared hierarchy only (no synthetic containment rows).
pub(crate) fn nominal_supertypes(env: &dyn TypeEnv, ty: &Type) -> Result<Vec<Type>, TypeError> {
    closure(env, ty, false, &mut |_| true)
}

/// Subtype check against the declared hierarchy only. Capture conversion
/// decides bound comparability with this variant; the expanded closure
/// capture-converts its own containment rows, so consulting it from inside
/// a conversion would re-enter the expansion in progress.
pub(crate) fn nominal_is_subtype(env: &dyn TypeEnv, sub: &Type, sup: &Type) -> bool {
    if sub == sup {
        return true;
    }
    match nominal_supertypes(env, sub) {
        Ok(closure) => closure.contains(sup),
        Err(_) => false,
    }
}

fn closure(
    env: &dyn TypeEnv,
    ty: &Type,
    expand_wildcards: bool,
    accept: &mut dyn FnMut(&Type) -> bool,
) -> Result<Vec<Type>, TypeError> {
    // Keyed on structural equality, not identity: recursive generic bounds
    // (`F extends Comparable<F>`) revisit equal-but-distinct instantiations.
    let mut seen: HashSet<Type> = HashSet::new();
    let mut out = Vec::new();
    let mut stack = vec![ty.clone()];
    while let Some(current) = stack.pop() {
        if !seen.insert(current.clone()) {
            continue;
        }
        let direct = direct_supertypes_impl(env, &current, expand_wildcards)?;
        if accept(&current) {
            out.push(current);
        }
        for supertype in direct.into_iter().rev() {
            if !seen.contains(&supertype) {
                stack.push(supertype);
            }
        }
    }
    Ok(out)
}

/// Whether `sup` is a (reflexive, transitive) supertype of `sub`.
/// Unsupported shapes answer `false` rather than erroring.
pub fn is_supertype(env: &dyn TypeEnv, sup: &Type, sub: &Type) -> bool {
    if sup == sub {
        return true;
    }
    match supertypes(env, sub) {
        Ok(closure) => closure.contains(sup),
        Err(_) => false,
    }
}

pub fn is_subtype(env: &dyn TypeEnv, sub: &Type, sup: &Type) -> bool {
    is_supertype(env, sup, sub)
}

pub(crate) fn push_unique(out: &mut Vec<Type>, ty: Type) {
    if !out.contains(&ty) {
        out.push(ty);
    }
}

/// A completed supertype closure with memoized leaf-kind partitions.
///
/// The partitions are computed at most once and shared by later readers; the
/// set itself is immutable after construction, so a `SupertypeSet` behind a
/// shared reference is safe for concurrent queries.
#[derive(Debug)]
pub struct SupertypeSet {
    types: Vec<Type>,
    classes: OnceLock<Vec<Type>>,
    interfaces: OnceLock<Vec<Type>>,
    most_specific_class: OnceLock<Option<Type>>,
}

impl SupertypeSet {
    pub fn compute(env: &dyn TypeEnv, ty: &Type) -> Result<SupertypeSet, TypeError> {
        Ok(SupertypeSet {
            types: supertypes(env, ty)?,
            classes: OnceLock::new(),
            interfaces: OnceLock::new(),
            most_specific_class: OnceLock::new(),
        })
    }

    pub fn types(&self) -> &[Type] {
        &self.types
    }

    pub fn contains(&self, ty: &Type) -> bool {
        self.types.contains(ty)
    }

    /// Members that erase to a class declaration, an array, or a primitive.
    pub fn classes(&self, env: &dyn TypeEnv) -> &[Type] {
        self.classes.get_or_init(|| {
            self.types
                .iter()
                .filter(|t| !erases_to_interface(env, t))
                .cloned()
                .collect()
        })
    }

    /// Members that erase to an interface declaration.
    pub fn interfaces(&self, env: &dyn TypeEnv) -> &[Type] {
        self.interfaces.get_or_init(|| {
            self.types
                .iter()
                .filter(|t| erases_to_interface(env, t))
                .cloned()
                .collect()
        })
    }

    /// The most specialized member of the class partition: the one every
    /// other class member is a supertype of.
    pub fn most_specific_class(&self, env: &dyn TypeEnv) -> Option<&Type> {
        self.most_specific_class
            .get_or_init(|| {
                let classes = self.classes(env);
                classes
                    .iter()
                    .find(|candidate| {
                        classes
                            .iter()
                            .all(|other| is_supertype(env, other, candidate))
                    })
                    .cloned()
            })
            .as_ref()
    }
}

fn erases_to_interface(env: &dyn TypeEnv, ty: &Type) -> bool {
    erased_class(env, ty)
        .and_then(|id| env.class(id))
        .is_some_and(|def| def.kind == ClassKind::Interface)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ClassDef, TypeStore};

    #[test]
    fn object_and_primitives_have_no_supertypes() {
        let store = TypeStore::with_minimal_jdk();
        let object = store.well_known().object_type();
        assert_eq!(direct_supertypes(&store, &object).unwrap(), vec![]);
        assert_eq!(direct_supertypes(&store, &Type::int()).unwrap(), vec![]);
    }

    #[test]
    fn wildcard_supertypes_are_rejected() {
        let store = TypeStore::with_minimal_jdk();
        assert_eq!(
            direct_supertypes(&store, &Type::wildcard()),
            Err(TypeError::InvalidShape {
                operation: "direct supertypes",
                found: "wildcard",
            })
        );
        assert!(!is_supertype(
            &store,
            &store.well_known().object_type(),
            &Type::wildcard()
        ));
    }

    #[test]
    fn raw_use_of_a_generic_declaration_erases_its_supertypes() {
        let store = TypeStore::with_minimal_jdk();
        let wk = *store.well_known();
        let raw_list = Type::class(wk.list, vec![]);
        let supers = direct_supertypes(&store, &raw_list).unwrap();
        assert_eq!(supers, vec![Type::class(wk.collection, vec![])]);
    }

    #[test]
    fn non_generic_leaf_keeps_parameterized_supertypes() {
        let store = TypeStore::with_minimal_jdk();
        let wk = *store.well_known();
        let integer = Type::class(wk.integer, vec![]);
        let supers = direct_supertypes(&store, &integer).unwrap();
        assert!(supers.contains(&Type::class(wk.number, vec![])));
        assert!(supers.contains(&Type::class(wk.comparable, vec![integer.clone()])));
    }

    #[test]
    fn interface_without_superinterfaces_gets_object() {
        let store = TypeStore::with_minimal_jdk();
        let wk = *store.well_known();
        let cloneable = Type::class(wk.cloneable, vec![]);
        assert_eq!(
            direct_supertypes(&store, &cloneable).unwrap(),
            vec![store.well_known().object_type()]
        );
    }

    #[test]
    fn primitive_and_object_arrays_have_the_fixed_marker_supertypes() {
        let store = TypeStore::with_minimal_jdk();
        let wk = *store.well_known();
        let expected = vec![
            store.well_known().object_type(),
            Type::class(wk.cloneable, vec![]),
            Type::class(wk.serializable, vec![]),
        ];
        assert_eq!(
            direct_supertypes(&store, &Type::array(Type::int())).unwrap(),
            expected
        );
        assert_eq!(
            direct_supertypes(&store, &Type::array(store.well_known().object_type())).unwrap(),
            expected
        );
    }

    #[test]
    fn reference_arrays_lift_component_supertypes() {
        let store = TypeStore::with_minimal_jdk();
        let wk = *store.well_known();
        let string_array = Type::array(Type::class(wk.string, vec![]));
        let supers = direct_supertypes(&store, &string_array).unwrap();
        assert!(supers.contains(&Type::array(store.well_known().object_type())));
        assert!(supers.contains(&Type::array(Type::class(wk.char_sequence, vec![]))));
    }

    #[test]
    fn closure_is_reflexive_and_transitive() {
        let store = TypeStore::with_minimal_jdk();
        let wk = *store.well_known();
        let integer = Type::class(wk.integer, vec![]);
        let closure = supertypes(&store, &integer).unwrap();
        for expected in [
            integer.clone(),
            Type::class(wk.number, vec![]),
            Type::class(wk.comparable, vec![integer.clone()]),
            Type::class(wk.serializable, vec![]),
            store.well_known().object_type(),
        ] {
            assert!(closure.contains(&expected), "missing {expected:?}");
        }
        assert!(is_supertype(&store, &integer, &integer));
    }

    #[test]
    fn predicate_prunes_without_cutting_traversal() {
        let store = TypeStore::with_minimal_jdk();
        let wk = *store.well_known();
        let integer = Type::class(wk.integer, vec![]);
        // Accept only raw leaves; Comparable<Integer> is pruned but the raw
        // Comparable reachable through it must survive.
        let raw_only = supertypes_where(&store, &integer, |t| {
            matches!(t, Type::Class(ct) if ct.args.is_empty())
        })
        .unwrap();
        assert!(raw_only.contains(&Type::class(wk.comparable, vec![])));
        assert!(!raw_only
            .iter()
            .any(|t| matches!(t, Type::Class(ct) if !ct.args.is_empty())));
    }

    #[test]
    fn containment_rows_expand_to_a_finite_closure() {
        let store = TypeStore::with_minimal_jdk();
        let wk = *store.well_known();
        let string = Type::class(wk.string, vec![]);
        let list_string = Type::class(wk.list, vec![string.clone()]);

        // The synthetic rows capture-convert during expansion; the closure
        // still has to bottom out.
        let closure = supertypes(&store, &list_string).unwrap();
        assert!(closure.contains(&list_string));
        assert!(closure.contains(&Type::class(wk.collection, vec![string.clone()])));
        assert!(closure.contains(&Type::class(
            wk.list,
            vec![Type::wildcard_extends(string)]
        )));
        assert!(closure.contains(&Type::class(wk.list, vec![Type::wildcard()])));
        assert!(closure.contains(&store.well_known().object_type()));
    }

    #[test]
    fn recursive_bound_terminates_and_dedups() {
        let mut store = TypeStore::with_minimal_jdk();
        let wk = *store.well_known();
        // F extends Comparable<F>: allocate first, then close the loop.
        let f = store.add_type_param("F", vec![store.well_known().object_type()]);
        store.define_type_param(f, vec![Type::class(wk.comparable, vec![Type::TypeVar(f)])]);

        let closure = supertypes(&store, &Type::TypeVar(f)).unwrap();
        let comparable_f = Type::class(wk.comparable, vec![Type::TypeVar(f)]);
        assert_eq!(
            closure.iter().filter(|t| **t == comparable_f).count(),
            1,
            "Comparable<F> must appear exactly once"
        );
        assert!(closure.contains(&store.well_known().object_type()));
    }

    #[test]
    fn most_specific_class_is_memoized_and_deepest() {
        let store = TypeStore::with_minimal_jdk();
        let wk = *store.well_known();
        let integer = Type::class(wk.integer, vec![]);
        let set = SupertypeSet::compute(&store, &integer).unwrap();
        assert_eq!(set.most_specific_class(&store), Some(&integer));
        // Second read hits the memoized cell.
        assert_eq!(set.most_specific_class(&store), Some(&integer));
        assert!(set
            .interfaces(&store)
            .contains(&Type::class(wk.serializable, vec![])));
    }

    #[test]
    fn missing_metadata_is_best_effort() {
        let mut store = TypeStore::with_minimal_jdk();
        let orphan = store.add_class(ClassDef {
            name: "com.example.Orphan".to_string(),
            kind: ClassKind::Class,
            type_params: vec![],
            super_class: None,
            interfaces: vec![],
        });
        // No declared superclass still reaches Object.
        let supers = direct_supertypes(&store, &Type::class(orphan, vec![])).unwrap();
        assert_eq!(supers, vec![store.well_known().object_type()]);
    }
}
