use serde::{Deserialize, Serialize};

/// Identifies a class or interface declaration inside a [`crate::TypeStore`].
///
/// Declarations are identity-stable: two `ClassId`s are equal exactly when they
/// name the same declaration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ClassId(pub(crate) u32);

impl ClassId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Identifies a declared type parameter inside a [`crate::TypeStore`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TypeVarId(pub(crate) u32);

impl TypeVarId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// The eight Java primitive types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PrimitiveType {
    Boolean,
    Byte,
    Char,
    Short,
    Int,
    Long,
    Float,
    Double,
}

impl PrimitiveType {
    pub fn name(self) -> &'static str {
        match self {
            PrimitiveType::Boolean => "boolean",
            PrimitiveType::Byte => "byte",
            PrimitiveType::Char => "char",
            PrimitiveType::Short => "short",
            PrimitiveType::Int => "int",
            PrimitiveType::Long => "long",
            PrimitiveType::Float => "float",
            PrimitiveType::Double => "double",
        }
    }

    pub const ALL: [PrimitiveType; 8] = [
        PrimitiveType::Boolean,
        PrimitiveType::Byte,
        PrimitiveType::Char,
        PrimitiveType::Short,
        PrimitiveType::Int,
        PrimitiveType::Long,
        PrimitiveType::Float,
        PrimitiveType::Double,
    ];
}

/// A use of a class or interface declaration.
///
/// `args.is_empty()` on a generic declaration is a *raw* use (`List` rather
/// than `List<String>`). A non-empty `args` must have exactly the
/// declaration's parameter count.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClassType {
    pub def: ClassId,
    pub args: Vec<Type>,
    /// Enclosing instance type for nested declarations (`Outer<X>.Inner<Y>`).
    pub owner: Option<Box<Type>>,
}

/// A use-site wildcard. At most one bound in either direction; `Unbounded`
/// behaves like `? extends Object` but is a distinct structural value.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WildcardBound {
    Unbounded,
    Extends(Box<Type>),
    Super(Box<Type>),
}

/// A fresh type variable produced by capture conversion.
///
/// Exactly one upper bound (never a wildcard) and at most one lower bound
/// (never a wildcard, never another capture). Captures are structural values:
/// two captures with equal bounds compare equal, which is what the
/// structurally-keyed seen sets in the closure algorithms rely on.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CaptureVar {
    pub upper_bound: Type,
    pub lower_bound: Option<Type>,
}

/// A Java type. The enum is closed: every algorithm in this crate matches
/// exhaustively over it, so adding a variant surfaces every dispatch site
/// that needs a decision.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Type {
    Primitive(PrimitiveType),
    Class(ClassType),
    Array(Box<Type>),
    TypeVar(TypeVarId),
    Capture(Box<CaptureVar>),
    Wildcard(WildcardBound),
    /// Synthetic conjunction of bounds (`Number & Runnable`), ordered and
    /// non-empty. Only produced by analysis, never by declarations.
    Intersection(Vec<Type>),
}

/// Structural category used to drive assignability dispatch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Shape {
    /// Primitive, raw class use, or array whose component is itself a leaf.
    Leaf,
    /// Array whose component mentions generics (`List<String>[]`, `T[]`).
    GenericArray,
    Parameterized,
    /// Declared type variable or capture.
    Variable,
    Wildcard,
    Intersection,
}

impl Shape {
    pub fn name(self) -> &'static str {
        match self {
            Shape::Leaf => "leaf",
            Shape::GenericArray => "generic array",
            Shape::Parameterized => "parameterized",
            Shape::Variable => "type variable",
            Shape::Wildcard => "wildcard",
            Shape::Intersection => "intersection",
        }
    }
}

impl Type {
    pub fn class(def: ClassId, args: Vec<Type>) -> Type {
        Type::Class(ClassType {
            def,
            args,
            owner: None,
        })
    }

    pub fn class_with_owner(def: ClassId, args: Vec<Type>, owner: Type) -> Type {
        Type::Class(ClassType {
            def,
            args,
            owner: Some(Box::new(owner)),
        })
    }

    pub fn array(component: Type) -> Type {
        Type::Array(Box::new(component))
    }

    pub fn wildcard() -> Type {
        Type::Wildcard(WildcardBound::Unbounded)
    }

    pub fn wildcard_extends(upper: Type) -> Type {
        Type::Wildcard(WildcardBound::Extends(Box::new(upper)))
    }

    pub fn wildcard_super(lower: Type) -> Type {
        Type::Wildcard(WildcardBound::Super(Box::new(lower)))
    }

    pub fn capture(upper_bound: Type, lower_bound: Option<Type>) -> Type {
        debug_assert!(
            !matches!(upper_bound, Type::Wildcard(_)),
            "capture upper bound must not be a wildcard"
        );
        debug_assert!(
            !matches!(
                lower_bound,
                Some(Type::Wildcard(_)) | Some(Type::Capture(_))
            ),
            "capture lower bound must not be a wildcard or another capture"
        );
        Type::Capture(Box::new(CaptureVar {
            upper_bound,
            lower_bound,
        }))
    }

    pub fn int() -> Type {
        Type::Primitive(PrimitiveType::Int)
    }

    pub fn is_wildcard(&self) -> bool {
        matches!(self, Type::Wildcard(_))
    }

    pub fn is_variable(&self) -> bool {
        matches!(self, Type::TypeVar(_) | Type::Capture(_))
    }

    /// True for types that name a class object at runtime: primitives, raw
    /// class uses, and arrays of such.
    pub fn is_leaf(&self) -> bool {
        match self {
            Type::Primitive(_) => true,
            Type::Class(ct) => ct.args.is_empty(),
            Type::Array(component) => component.is_leaf(),
            _ => false,
        }
    }

    pub fn shape(&self) -> Shape {
        match self {
            Type::Primitive(_) => Shape::Leaf,
            Type::Class(ct) if ct.args.is_empty() => Shape::Leaf,
            Type::Class(_) => Shape::Parameterized,
            Type::Array(component) => {
                if component.is_leaf() {
                    Shape::Leaf
                } else {
                    Shape::GenericArray
                }
            }
            Type::TypeVar(_) | Type::Capture(_) => Shape::Variable,
            Type::Wildcard(_) => Shape::Wildcard,
            Type::Intersection(_) => Shape::Intersection,
        }
    }

    pub fn shape_name(&self) -> &'static str {
        self.shape().name()
    }
}

impl WildcardBound {
    /// The effective upper bound; `None` means `Object`.
    pub fn upper(&self) -> Option<&Type> {
        match self {
            WildcardBound::Extends(upper) => Some(upper),
            WildcardBound::Unbounded | WildcardBound::Super(_) => None,
        }
    }

    pub fn lower(&self) -> Option<&Type> {
        match self {
            WildcardBound::Super(lower) => Some(lower),
            _ => None,
        }
    }
}
