use std::collections::HashSet;

use crate::erasure::{erased_class, erasure};
use crate::supertypes::nominal_supertypes;
use crate::{ClassType, Type, TypeEnv, WildcardBound};

/// An assignability policy: may a value of type `payload` flow into a slot of
/// type `receiver`?
///
/// Policies dispatch on the structural shape pair of the two sides. Shape
/// pairs a policy does not handle answer `false`, so each implementation only
/// spells out the combinations it supports.
pub trait AssignabilityRules {
    fn is_assignable(&self, env: &dyn TypeEnv, receiver: &Type, payload: &Type) -> bool;
}

/// Assignability under the covariant default policy (JLS assignment
/// compatibility, boxing enabled).
pub fn is_assignable(env: &dyn TypeEnv, receiver: &Type, payload: &Type) -> bool {
    CovariantAssignability::default().is_assignable(env, receiver, payload)
}

pub fn assignable_with(
    env: &dyn TypeEnv,
    receiver: &Type,
    payload: &Type,
    rules: &dyn AssignabilityRules,
) -> bool {
    rules.is_assignable(env, receiver, payload)
}

/// Strict structural equality, except that wildcards keep their inherent
/// covariance: if either side is a wildcard the comparison defers to the
/// covariant rules. This is the policy used for generic argument comparison.
#[derive(Clone, Copy, Debug, Default)]
pub struct InvariantAssignability;

impl AssignabilityRules for InvariantAssignability {
    fn is_assignable(&self, env: &dyn TypeEnv, receiver: &Type, payload: &Type) -> bool {
        if receiver.is_wildcard() || payload.is_wildcard() {
            return CovariantAssignability::default().is_assignable(env, receiver, payload);
        }
        receiver == payload
    }
}

/// JLS assignment compatibility: hierarchy-covariant for reference types,
/// invariant in generic arguments outside wildcards.
#[derive(Clone, Copy, Debug)]
pub struct CovariantAssignability {
    /// Normalize primitives to their wrapper declarations before leaf
    /// comparison. Array components are never boxed.
    pub boxing: bool,
}

impl Default for CovariantAssignability {
    fn default() -> CovariantAssignability {
        CovariantAssignability { boxing: true }
    }
}

impl AssignabilityRules for CovariantAssignability {
    fn is_assignable(&self, env: &dyn TypeEnv, receiver: &Type, payload: &Type) -> bool {
        if receiver == payload {
            return true;
        }
        match (receiver, payload) {
            // Wildcard receivers accept by containment.
            (Type::Wildcard(WildcardBound::Unbounded), _) => true,
            (
                Type::Wildcard(WildcardBound::Extends(u)),
                Type::Wildcard(WildcardBound::Extends(t)),
            ) => self.is_assignable(env, u, t),
            (Type::Wildcard(WildcardBound::Extends(u)), Type::Wildcard(_)) => {
                // `?` and `? super T` only fit under `? extends Object`.
                **u == env.well_known().object_type()
            }
            (Type::Wildcard(WildcardBound::Extends(u)), p) => self.is_assignable(env, u, p),
            (
                Type::Wildcard(WildcardBound::Super(l)),
                Type::Wildcard(WildcardBound::Super(t)),
            ) => self.is_assignable(env, t, l),
            (Type::Wildcard(WildcardBound::Super(_)), Type::Wildcard(_)) => false,
            (Type::Wildcard(WildcardBound::Super(l)), p) => self.is_assignable(env, p, l),
            // A wildcard payload is known only through its upper bound.
            (r, Type::Wildcard(w)) => {
                let upper = w
                    .upper()
                    .cloned()
                    .unwrap_or_else(|| env.well_known().object_type());
                self.is_assignable(env, r, &upper)
            }
            // An intersection receiver requires all parts, an intersection
            // payload offers any part.
            (Type::Intersection(parts), p) => {
                parts.iter().all(|part| self.is_assignable(env, part, p))
            }
            (r, Type::Intersection(parts)) => {
                parts.iter().any(|part| self.is_assignable(env, r, part))
            }
            (r @ (Type::TypeVar(_) | Type::Capture(_)), p) => {
                self.variable_receiver(env, r, p, &mut HashSet::new())
            }
            (r, p @ (Type::TypeVar(_) | Type::Capture(_))) => {
                self.variable_payload(env, r, p, &mut HashSet::new())
            }
            _ => self.concrete(env, receiver, payload),
        }
    }
}

impl CovariantAssignability {
    /// A variable receiver is reachable only through the payload's bound
    /// chain, or through a lower bound on a captured `? super` slot.
    fn variable_receiver(
        &self,
        env: &dyn TypeEnv,
        receiver: &Type,
        payload: &Type,
        seen: &mut HashSet<Type>,
    ) -> bool {
        if receiver == payload {
            return true;
        }
        if !seen.insert(payload.clone()) {
            return false;
        }
        if let Type::Capture(cv) = receiver {
            if let Some(lower) = &cv.lower_bound {
                if self.is_assignable(env, lower, payload) {
                    return true;
                }
            }
        }
        match payload {
            Type::TypeVar(_) | Type::Capture(_) => upper_bounds(env, payload)
                .iter()
                .any(|bound| self.variable_receiver(env, receiver, bound, seen)),
            _ => false,
        }
    }

    /// A variable payload is assignable wherever one of its upper bounds is.
    fn variable_payload(
        &self,
        env: &dyn TypeEnv,
        receiver: &Type,
        payload: &Type,
        seen: &mut HashSet<Type>,
    ) -> bool {
        if !seen.insert(payload.clone()) {
            return false;
        }
        upper_bounds(env, payload).iter().any(|bound| match bound {
            Type::TypeVar(_) | Type::Capture(_) => {
                self.variable_payload(env, receiver, bound, seen)
            }
            _ => self.is_assignable(env, receiver, bound),
        })
    }

    /// Both sides are primitives, classes, or arrays.
    fn concrete(&self, env: &dyn TypeEnv, receiver: &Type, payload: &Type) -> bool {
        let receiver = self.normalize(env, receiver);
        let payload = self.normalize(env, payload);
        if receiver == payload {
            return true;
        }
        match (&receiver, &payload) {
            (Type::Class(rc), Type::Class(pc)) => {
                if rc.args.is_empty() {
                    if pc.args.is_empty() {
                        self.leaf_assignable(env, &receiver, &payload)
                    } else {
                        // Erasure first, then the payload's raw supertypes.
                        let erased = erasure(env, &payload);
                        self.leaf_assignable(env, &receiver, &erased)
                            || self.leaf_assignable(env, &receiver, &payload)
                    }
                } else if !pc.args.is_empty() {
                    self.parameterized_assignable(env, rc, &payload)
                } else {
                    false
                }
            }
            (Type::Class(rc), Type::Array(_)) if rc.args.is_empty() => {
                self.leaf_assignable(env, &receiver, &payload)
            }
            (Type::Array(rcomp), Type::Array(pcomp)) => match (&**rcomp, &**pcomp) {
                (Type::Primitive(a), Type::Primitive(b)) => a == b,
                (Type::Primitive(_), _) | (_, Type::Primitive(_)) => false,
                (r, p) => self.is_assignable(env, r, p),
            },
            (Type::Primitive(a), Type::Primitive(b)) => a == b,
            _ => false,
        }
    }

    fn normalize(&self, env: &dyn TypeEnv, ty: &Type) -> Type {
        match ty {
            Type::Primitive(p) if self.boxing => Type::class(env.well_known().boxed(*p), vec![]),
            other => other.clone(),
        }
    }

    fn leaf_assignable(&self, env: &dyn TypeEnv, receiver: &Type, payload: &Type) -> bool {
        if receiver == payload {
            return true;
        }
        nominal_supertypes(env, payload)
            .map(|closure| closure.contains(receiver))
            .unwrap_or(false)
    }

    /// Scan the payload's declared hierarchy for an instantiation of the
    /// receiver's declaration, then compare arguments invariantly (wildcard
    /// arguments keep covariant containment through the invariant policy).
    fn parameterized_assignable(
        &self,
        env: &dyn TypeEnv,
        receiver: &ClassType,
        payload: &Type,
    ) -> bool {
        let Ok(supers) = nominal_supertypes(env, payload) else {
            return false;
        };
        supers.iter().any(|sup| match sup {
            Type::Class(sc)
                if sc.def == receiver.def
                    && !sc.args.is_empty()
                    && sc.args.len() == receiver.args.len() =>
            {
                receiver
                    .args
                    .iter()
                    .zip(&sc.args)
                    .all(|(ra, sa)| InvariantAssignability.is_assignable(env, ra, sa))
            }
            _ => false,
        })
    }
}

/// CDI-style bean-type matching, layered on the covariant rules: required
/// and bean types match only on identical declarations, raw types pair with
/// `Object`-bounded instantiations, and variable or wildcard arguments match
/// by bound containment rather than variance.
#[derive(Clone, Copy, Debug, Default)]
pub struct BeanTypeAssignability;

impl AssignabilityRules for BeanTypeAssignability {
    fn is_assignable(&self, env: &dyn TypeEnv, required: &Type, bean: &Type) -> bool {
        if required == bean {
            return true;
        }
        let cov = CovariantAssignability::default();
        match (required, bean) {
            (Type::TypeVar(_) | Type::Capture(_) | Type::Wildcard(_), _)
            | (_, Type::TypeVar(_) | Type::Capture(_) | Type::Wildcard(_)) => {
                cov.is_assignable(env, required, bean)
            }
            (Type::Intersection(parts), _) => {
                parts.iter().all(|part| self.is_assignable(env, part, bean))
            }
            (_, Type::Intersection(parts)) => parts
                .iter()
                .any(|part| self.is_assignable(env, required, part)),
            // Array element types must be identical.
            (Type::Array(rcomp), Type::Array(bcomp)) => rcomp == bcomp,
            (Type::Class(rc), Type::Class(bc)) => {
                if rc.def != bc.def {
                    return false;
                }
                match (rc.args.is_empty(), bc.args.is_empty()) {
                    (true, true) => true,
                    // A raw side pairs with an instantiation whose arguments
                    // carry no information beyond Object.
                    (true, false) => bc.args.iter().all(|a| is_unbounded_like(env, a)),
                    (false, true) => rc.args.iter().all(|a| is_unbounded_like(env, a)),
                    (false, false) => rc
                        .args
                        .iter()
                        .zip(&bc.args)
                        .all(|(ra, ba)| self.parameters_match(env, ra, ba)),
                }
            }
            _ => false,
        }
    }
}

impl BeanTypeAssignability {
    fn parameters_match(&self, env: &dyn TypeEnv, required: &Type, bean: &Type) -> bool {
        if required == bean {
            return true;
        }
        let cov = CovariantAssignability::default();
        match (required, bean) {
            (Type::Wildcard(w), b) if b.is_variable() => {
                let bound = first_upper_bound(env, b);
                let upper_ok = match w.upper() {
                    Some(u) => {
                        cov.is_assignable(env, u, &bound) || cov.is_assignable(env, &bound, u)
                    }
                    None => true,
                };
                let lower_ok = w
                    .lower()
                    .map_or(true, |l| cov.is_assignable(env, &bound, l));
                upper_ok && lower_ok
            }
            (Type::Wildcard(w), b) if !b.is_wildcard() => {
                let upper_ok = w.upper().map_or(true, |u| cov.is_assignable(env, u, b));
                let lower_ok = w.lower().map_or(true, |l| cov.is_assignable(env, b, l));
                upper_ok && lower_ok
            }
            (r, b) if r.is_variable() && b.is_variable() => {
                // Bound-set containment: every bound the required variable
                // imposes is covered by some bound of the bean variable.
                upper_bounds(env, r).iter().all(|rb| {
                    upper_bounds(env, b)
                        .iter()
                        .any(|bb| cov.is_assignable(env, bb, rb))
                })
            }
            (r, b) if !r.is_variable() && !r.is_wildcard() && b.is_variable() => {
                upper_bounds(env, b)
                    .iter()
                    .all(|bb| cov.is_assignable(env, bb, r))
            }
            (r, b)
                if !r.is_variable()
                    && !r.is_wildcard()
                    && !b.is_variable()
                    && !b.is_wildcard() =>
            {
                r == b
                    || (erased_class(env, r).is_some()
                        && erased_class(env, r) == erased_class(env, b)
                        && self.is_assignable(env, r, b))
            }
            _ => false,
        }
    }
}

fn upper_bounds(env: &dyn TypeEnv, ty: &Type) -> Vec<Type> {
    match ty {
        Type::TypeVar(id) => {
            let bounds = env
                .type_param(*id)
                .map(|tp| tp.upper_bounds.clone())
                .unwrap_or_default();
            if bounds.is_empty() {
                vec![env.well_known().object_type()]
            } else {
                bounds
            }
        }
        Type::Capture(cv) => vec![cv.upper_bound.clone()],
        other => vec![other.clone()],
    }
}

fn first_upper_bound(env: &dyn TypeEnv, ty: &Type) -> Type {
    upper_bounds(env, ty)
        .into_iter()
        .next()
        .unwrap_or_else(|| env.well_known().object_type())
}

fn is_unbounded_like(env: &dyn TypeEnv, arg: &Type) -> bool {
    let object = env.well_known().object_type();
    match arg {
        Type::Wildcard(WildcardBound::Unbounded) => true,
        Type::Wildcard(WildcardBound::Extends(upper)) => **upper == object,
        Type::Class(_) => *arg == object,
        Type::TypeVar(_) => upper_bounds(env, arg) == vec![object],
        Type::Capture(cv) => cv.lower_bound.is_none() && cv.upper_bound == object,
        _ => false,
    }
}
