use crate::supertypes::{is_subtype, nominal_supertypes, push_unique};
use crate::{Type, TypeEnv, WildcardBound};

/// Type-argument containment (JLS 4.5.1): whether the set of types denoted by
/// `inner` is covered by `outer`.
pub fn contains(env: &dyn TypeEnv, outer: &Type, inner: &Type) -> bool {
    if outer == inner {
        return true;
    }
    let object = env.well_known().object_type();
    match (outer, inner) {
        (Type::Wildcard(WildcardBound::Unbounded), _) => true,
        (Type::Wildcard(WildcardBound::Extends(s)), Type::Wildcard(WildcardBound::Extends(t))) => {
            is_subtype(env, t, s)
        }
        (Type::Wildcard(WildcardBound::Extends(s)), Type::Wildcard(_)) => {
            // `?` and `? super T` fit only under `? extends Object`.
            **s == object
        }
        (Type::Wildcard(WildcardBound::Extends(s)), t) => is_subtype(env, t, s),
        (Type::Wildcard(WildcardBound::Super(s)), Type::Wildcard(WildcardBound::Super(t))) => {
            is_subtype(env, s, t)
        }
        (Type::Wildcard(WildcardBound::Super(_)), Type::Wildcard(_)) => false,
        (Type::Wildcard(WildcardBound::Super(s)), t) => is_subtype(env, s, t),
        _ => false,
    }
}

/// Every type argument that contains `arg`, deduplicated structurally. The
/// result always holds `arg` itself and the unbounded wildcard.
///
/// Upper-bounded entries are enumerated over the *nominal* supertype closure
/// of the bound; the synthetic containment rows must not feed back into this
/// enumeration or it would never bottom out.
pub fn containing_type_arguments(env: &dyn TypeEnv, arg: &Type) -> Vec<Type> {
    let mut out = Vec::new();
    push_unique(&mut out, arg.clone());
    match arg {
        Type::Wildcard(WildcardBound::Unbounded) => {}
        Type::Wildcard(WildcardBound::Extends(upper)) => {
            for sup in nominal_closure_or_empty(env, upper) {
                push_unique(&mut out, Type::wildcard_extends(sup));
            }
        }
        Type::Wildcard(WildcardBound::Super(_)) => {
            // The subtypes of the lower bound are not enumerable; only the
            // trivially-covering entries remain.
            push_unique(
                &mut out,
                Type::wildcard_extends(env.well_known().object_type()),
            );
        }
        concrete => {
            for sup in nominal_closure_or_empty(env, concrete) {
                push_unique(&mut out, Type::wildcard_extends(sup));
            }
            // A capture cannot serve as a lower bound: expanding `? super c`
            // would capture-convert into a capture lower-bounded by another
            // capture.
            if !matches!(concrete, Type::Capture(_)) {
                push_unique(&mut out, Type::wildcard_super(concrete.clone()));
            }
        }
    }
    push_unique(&mut out, Type::wildcard());
    out
}

fn nominal_closure_or_empty(env: &dyn TypeEnv, ty: &Type) -> Vec<Type> {
    nominal_supertypes(env, ty).unwrap_or_default()
}

/// The Cartesian product of `containing_type_arguments` across positions:
/// one row per synthetic argument list (the original list is among them).
pub fn containing_argument_rows(env: &dyn TypeEnv, args: &[Type]) -> Vec<Vec<Type>> {
    let per_position: Vec<Vec<Type>> = args
        .iter()
        .map(|arg| containing_type_arguments(env, arg))
        .collect();
    let mut rows: Vec<Vec<Type>> = vec![Vec::new()];
    for options in &per_position {
        let mut next = Vec::with_capacity(rows.len() * options.len());
        for row in &rows {
            for option in options {
                let mut extended = row.clone();
                extended.push(option.clone());
                next.push(extended);
            }
        }
        rows = next;
    }
    rows
}
