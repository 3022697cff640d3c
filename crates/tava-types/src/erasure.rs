use crate::{ClassId, Type, TypeEnv, WildcardBound};

/// The erasure of `ty`: the nominal leaf obtained by discarding generic and
/// bound information (JLS 4.6).
///
/// Total and idempotent. Bound chains are acyclic by construction, so the
/// recursion through variable bounds terminates; anything without a usable
/// bound erases to `Object`.
pub fn erasure(env: &dyn TypeEnv, ty: &Type) -> Type {
    match ty {
        Type::Primitive(_) => ty.clone(),
        Type::Class(ct) => Type::class(ct.def, vec![]),
        Type::Array(component) => Type::array(erasure(env, component)),
        Type::TypeVar(id) => match env.type_param(*id).and_then(|tp| tp.upper_bounds.first()) {
            Some(bound) => erasure(env, bound),
            None => env.well_known().object_type(),
        },
        Type::Capture(cv) => erasure(env, &cv.upper_bound),
        Type::Wildcard(WildcardBound::Extends(upper)) => erasure(env, upper),
        Type::Wildcard(_) => env.well_known().object_type(),
        Type::Intersection(parts) => match parts.first() {
            Some(first) => erasure(env, first),
            None => env.well_known().object_type(),
        },
    }
}

/// The declaration the erasure of `ty` names, if it names one at all
/// (primitives and arrays do not).
pub fn erased_class(env: &dyn TypeEnv, ty: &Type) -> Option<ClassId> {
    match erasure(env, ty) {
        Type::Class(ct) => Some(ct.def),
        _ => None,
    }
}
