//! A nominal model of Java's generic type algebra.
//!
//! The crate answers three questions about types drawn from a class table:
//! what are a type's direct supertypes, what is its full supertype closure,
//! and may a value of one type flow into a slot of another under a chosen
//! variance policy. Types are plain values; every operation takes the class
//! table through the [`TypeEnv`] trait, so callers decide where declarations
//! live.
//!
//! The semantics follow the Java Language Specification where it speaks:
//! direct supertypes (4.10), erasure (4.6), capture conversion (5.1.10), and
//! type-argument containment (4.5.1). Assignability is pluggable through
//! [`AssignabilityRules`], with invariant, covariant, and bean-type policies
//! built in.

#![forbid(unsafe_code)]

mod assignability;
mod capture;
mod containment;
mod erasure;
mod error;
mod format;
mod store;
mod subst;
mod supertypes;
mod ty;

pub use assignability::{
    assignable_with, is_assignable, AssignabilityRules, BeanTypeAssignability,
    CovariantAssignability, InvariantAssignability,
};
pub use capture::{capture_conversion, glb, lub, make_intersection};
pub use containment::{containing_argument_rows, containing_type_arguments, contains};
pub use erasure::{erased_class, erasure};
pub use error::TypeError;
pub use format::{format_type, intersection_component_rank, type_sort_key};
pub use store::{ClassDef, ClassKind, TypeEnv, TypeParamDef, TypeStore, WellKnownTypes};
pub use subst::{substitute, Substitution};
pub use supertypes::{
    direct_supertypes, is_subtype, is_supertype, supertypes, supertypes_where, SupertypeSet,
};
pub use ty::{
    CaptureVar, ClassId, ClassType, PrimitiveType, Shape, Type, TypeVarId, WildcardBound,
};
