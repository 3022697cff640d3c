use std::collections::HashMap;

use crate::{CaptureVar, ClassType, Type, TypeVarId, WildcardBound};

/// A substitution ("theta") from formal type parameters to actual arguments.
pub type Substitution = HashMap<TypeVarId, Type>;

/// Apply `subst` to `ty`, recursing through every position a type variable
/// can occur in. Variables with no mapping pass through unchanged.
pub fn substitute(ty: &Type, subst: &Substitution) -> Type {
    if subst.is_empty() {
        return ty.clone();
    }
    match ty {
        Type::Primitive(_) => ty.clone(),
        Type::TypeVar(id) => subst.get(id).cloned().unwrap_or_else(|| ty.clone()),
        Type::Class(ct) => Type::Class(ClassType {
            def: ct.def,
            args: ct.args.iter().map(|a| substitute(a, subst)).collect(),
            owner: ct
                .owner
                .as_ref()
                .map(|o| Box::new(substitute(o, subst))),
        }),
        Type::Array(component) => Type::array(substitute(component, subst)),
        Type::Wildcard(bound) => Type::Wildcard(match bound {
            WildcardBound::Unbounded => WildcardBound::Unbounded,
            WildcardBound::Extends(upper) => {
                WildcardBound::Extends(Box::new(substitute(upper, subst)))
            }
            WildcardBound::Super(lower) => {
                WildcardBound::Super(Box::new(substitute(lower, subst)))
            }
        }),
        Type::Capture(cv) => Type::Capture(Box::new(CaptureVar {
            upper_bound: substitute(&cv.upper_bound, subst),
            lower_bound: cv.lower_bound.as_ref().map(|l| substitute(l, subst)),
        })),
        Type::Intersection(parts) => {
            Type::Intersection(parts.iter().map(|p| substitute(p, subst)).collect())
        }
    }
}
