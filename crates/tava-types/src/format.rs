use std::fmt::Write;

use crate::{ClassKind, Type, TypeEnv, WildcardBound};

/// Render `ty` the way Java source would spell it, with fully qualified
/// declaration names.
///
/// The output is canonical and stable across runs: structurally equal types
/// format identically, which lets the formatter double as a deterministic
/// sort key.
pub fn format_type(env: &dyn TypeEnv, ty: &Type) -> String {
    let mut out = String::new();
    write_type(env, ty, &mut out);
    out
}

fn write_type(env: &dyn TypeEnv, ty: &Type, out: &mut String) {
    match ty {
        Type::Primitive(p) => out.push_str(p.name()),
        Type::Class(ct) => {
            let name = env
                .class(ct.def)
                .map(|def| def.name.as_str())
                .unwrap_or("<unknown>");
            if let Some(owner) = &ct.owner {
                write_type(env, owner, out);
                out.push('.');
                out.push_str(simple_name(name));
            } else {
                out.push_str(name);
            }
            if !ct.args.is_empty() {
                out.push('<');
                for (idx, arg) in ct.args.iter().enumerate() {
                    if idx > 0 {
                        out.push_str(", ");
                    }
                    write_type(env, arg, out);
                }
                out.push('>');
            }
        }
        Type::Array(component) => {
            write_type(env, component, out);
            out.push_str("[]");
        }
        Type::TypeVar(id) => match env.type_param(*id) {
            Some(def) => out.push_str(&def.name),
            None => {
                let _ = write!(out, "<tv#{}>", id.index());
            }
        },
        Type::Capture(cv) => {
            out.push_str("capture of ");
            if let Some(lower) = &cv.lower_bound {
                out.push_str("? super ");
                write_type(env, lower, out);
            } else if cv.upper_bound == env.well_known().object_type() {
                out.push('?');
            } else {
                out.push_str("? extends ");
                write_type(env, &cv.upper_bound, out);
            }
        }
        Type::Wildcard(WildcardBound::Unbounded) => out.push('?'),
        Type::Wildcard(WildcardBound::Extends(upper)) => {
            out.push_str("? extends ");
            write_type(env, upper, out);
        }
        Type::Wildcard(WildcardBound::Super(lower)) => {
            out.push_str("? super ");
            write_type(env, lower, out);
        }
        Type::Intersection(parts) => {
            for (idx, part) in parts.iter().enumerate() {
                if idx > 0 {
                    out.push_str(" & ");
                }
                write_type(env, part, out);
            }
        }
    }
}

fn simple_name(name: &str) -> &str {
    name.rsplit(['.', '$']).next().unwrap_or(name)
}

/// Deterministic ordering key; used wherever iteration order must not depend
/// on construction order.
pub fn type_sort_key(env: &dyn TypeEnv, ty: &Type) -> String {
    format_type(env, ty)
}

/// Canonical intersection ordering: classes first, then arrays, then
/// interfaces, then variables (Java spells intersections class-first).
pub fn intersection_component_rank(env: &dyn TypeEnv, ty: &Type) -> u8 {
    match ty {
        Type::Class(ct) => match env.class(ct.def).map(|def| def.kind) {
            Some(ClassKind::Class) => 0,
            Some(ClassKind::Interface) => 2,
            None => 4,
        },
        Type::Primitive(_) | Type::Array(_) => 1,
        Type::TypeVar(_) | Type::Capture(_) => 3,
        _ => 4,
    }
}
