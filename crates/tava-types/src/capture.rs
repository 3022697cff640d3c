use crate::format::{intersection_component_rank, type_sort_key};
use crate::subst::{substitute, Substitution};
use crate::supertypes::nominal_is_subtype;
use crate::{ClassType, Type, TypeEnv, TypeError, WildcardBound};

/// Capture conversion for parameterized types containing wildcards (JLS
/// 5.1.10): each wildcard slot becomes a fresh capture variable bounded by
/// the wildcard and the substituted formal bound.
///
/// Conversion is shallow: already-concrete arguments (including nested
/// wildcard-bearing types) pass through untouched. Anything that is not a
/// wildcard-bearing parameterized type is returned unchanged.
pub fn capture_conversion(env: &dyn TypeEnv, ty: &Type) -> Type {
    let Type::Class(ct) = ty else {
        return ty.clone();
    };
    if ct.args.iter().all(|a| !a.is_wildcard()) {
        return ty.clone();
    }
    let Some(decl) = env.class(ct.def) else {
        return ty.clone();
    };
    debug_assert_eq!(
        decl.type_params.len(),
        ct.args.len(),
        "argument count must match the declared parameter count"
    );

    let object = env.well_known().object_type();
    let formal_bounds: Vec<Type> = decl
        .type_params
        .iter()
        .map(|tp| {
            env.type_param(*tp)
                .and_then(|d| d.upper_bounds.first().cloned())
                .unwrap_or_else(|| object.clone())
        })
        .collect();

    // Formal bounds may mention earlier parameters, so theta grows as each
    // position is converted.
    let mut theta = Substitution::new();
    let mut new_args = Vec::with_capacity(ct.args.len());
    for (idx, arg) in ct.args.iter().enumerate() {
        let formal_bound = formal_bounds
            .get(idx)
            .cloned()
            .unwrap_or_else(|| object.clone());
        let converted = match arg {
            Type::Wildcard(WildcardBound::Unbounded) => {
                Type::capture(substitute(&formal_bound, &theta), None)
            }
            Type::Wildcard(WildcardBound::Extends(upper)) => {
                let declared = substitute(&formal_bound, &theta);
                Type::capture(glb(env, upper, &declared), None)
            }
            Type::Wildcard(WildcardBound::Super(lower)) => Type::capture(
                substitute(&formal_bound, &theta),
                Some((**lower).clone()),
            ),
            other => other.clone(),
        };
        if let Some(formal) = decl.type_params.get(idx) {
            theta.insert(*formal, converted.clone());
        }
        new_args.push(converted);
    }

    Type::Class(ClassType {
        def: ct.def,
        args: new_args,
        owner: ct.owner.clone(),
    })
}

/// Greatest lower bound of two bounds: the more specific of the two when they
/// are comparable, otherwise their canonical intersection.
///
/// Comparability is decided against the declared hierarchy. `glb` runs inside
/// capture conversion, which the expanded supertype closure calls on every
/// containment row; a full subtype query here would recurse back into that
/// same expansion.
pub fn glb(env: &dyn TypeEnv, a: &Type, b: &Type) -> Type {
    if a == b || nominal_is_subtype(env, a, b) {
        return a.clone();
    }
    if nominal_is_subtype(env, b, a) {
        return b.clone();
    }
    make_intersection(env, vec![a.clone(), b.clone()])
}

/// Least upper bound. Deliberately not computed; callers get an explicit
/// error instead of a wrong answer.
pub fn lub(_env: &dyn TypeEnv, _a: &Type, _b: &Type) -> Result<Type, TypeError> {
    Err(TypeError::Unsupported {
        operation: "least upper bound",
    })
}

/// Build an intersection: flatten nested intersections, drop duplicates, and
/// order components canonically so equal bound sets always produce equal
/// types. A single surviving component collapses to that component.
pub fn make_intersection(env: &dyn TypeEnv, parts: Vec<Type>) -> Type {
    let mut flat: Vec<Type> = Vec::with_capacity(parts.len());
    flatten_into(parts, &mut flat);
    flat.sort_by_cached_key(|t| (intersection_component_rank(env, t), type_sort_key(env, t)));
    match flat.len() {
        0 => env.well_known().object_type(),
        1 => flat.remove(0),
        _ => Type::Intersection(flat),
    }
}

fn flatten_into(parts: Vec<Type>, flat: &mut Vec<Type>) {
    for part in parts {
        match part {
            Type::Intersection(inner) => flatten_into(inner, flat),
            other => {
                if !flat.contains(&other) {
                    flat.push(other);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TypeStore;

    #[test]
    fn glb_prefers_the_more_specific_side() {
        let store = TypeStore::with_minimal_jdk();
        let wk = *store.well_known();
        let number = Type::class(wk.number, vec![]);
        let integer = Type::class(wk.integer, vec![]);
        let object = Type::class(wk.object, vec![]);

        assert_eq!(glb(&store, &integer, &number), integer);
        assert_eq!(glb(&store, &number, &integer), integer);
        assert_eq!(glb(&store, &number, &object), number);
    }

    #[test]
    fn glb_of_incomparable_bounds_is_a_canonical_intersection() {
        let store = TypeStore::with_minimal_jdk();
        let wk = *store.well_known();
        let number = Type::class(wk.number, vec![]);
        let cloneable = Type::class(wk.cloneable, vec![]);

        let forward = glb(&store, &number, &cloneable);
        let backward = glb(&store, &cloneable, &number);
        assert_eq!(forward, backward);
        // Class component sorts ahead of the interface component.
        assert_eq!(
            forward,
            Type::Intersection(vec![number, cloneable])
        );
    }

    #[test]
    fn lub_is_explicitly_unsupported() {
        let store = TypeStore::with_minimal_jdk();
        let wk = *store.well_known();
        assert_eq!(
            lub(
                &store,
                &Type::class(wk.integer, vec![]),
                &Type::class(wk.long, vec![])
            ),
            Err(TypeError::Unsupported {
                operation: "least upper bound",
            })
        );
    }

    #[test]
    fn make_intersection_flattens_and_collapses() {
        let store = TypeStore::with_minimal_jdk();
        let wk = *store.well_known();
        let number = Type::class(wk.number, vec![]);
        let cloneable = Type::class(wk.cloneable, vec![]);
        let serializable = Type::class(wk.serializable, vec![]);

        let nested = Type::Intersection(vec![cloneable.clone(), serializable.clone()]);
        let made = make_intersection(&store, vec![number.clone(), nested, cloneable.clone()]);
        let Type::Intersection(parts) = made else {
            panic!("expected an intersection");
        };
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], number.clone());

        assert_eq!(make_intersection(&store, vec![number.clone()]), number);
    }
}
