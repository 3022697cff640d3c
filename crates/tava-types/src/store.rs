use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{ClassId, PrimitiveType, Type, TypeVarId};

/// Whether a declaration is a class or an interface.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClassKind {
    Class,
    Interface,
}

/// Declaration metadata for a class or interface.
///
/// Only the hierarchy-relevant surface is modeled: members are a concern of
/// other layers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassDef {
    /// Fully qualified binary name (`java.util.List`).
    pub name: String,
    pub kind: ClassKind,
    pub type_params: Vec<TypeVarId>,
    pub super_class: Option<Type>,
    pub interfaces: Vec<Type>,
}

/// A declared type parameter. Bounds are ordered; the first bound is never a
/// wildcard. An empty bound list is read as `{Object}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeParamDef {
    pub name: String,
    pub upper_bounds: Vec<Type>,
}

/// Ids of the declarations every algorithm needs to be able to name.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WellKnownTypes {
    pub object: ClassId,
    pub cloneable: ClassId,
    pub serializable: ClassId,
    pub char_sequence: ClassId,
    pub string: ClassId,
    pub number: ClassId,
    pub comparable: ClassId,
    pub iterable: ClassId,
    pub collection: ClassId,
    pub list: ClassId,
    pub boolean: ClassId,
    pub byte: ClassId,
    pub character: ClassId,
    pub short: ClassId,
    pub integer: ClassId,
    pub long: ClassId,
    pub float: ClassId,
    pub double: ClassId,
}

impl WellKnownTypes {
    /// The wrapper declaration for a primitive (`int` -> `java.lang.Integer`).
    pub fn boxed(&self, primitive: PrimitiveType) -> ClassId {
        match primitive {
            PrimitiveType::Boolean => self.boolean,
            PrimitiveType::Byte => self.byte,
            PrimitiveType::Char => self.character,
            PrimitiveType::Short => self.short,
            PrimitiveType::Int => self.integer,
            PrimitiveType::Long => self.long,
            PrimitiveType::Float => self.float,
            PrimitiveType::Double => self.double,
        }
    }

    pub fn object_type(&self) -> Type {
        Type::class(self.object, vec![])
    }
}

/// The host type-introspection facility.
///
/// All algorithms take `&dyn TypeEnv` so callers can back them with whatever
/// declaration source they have; [`TypeStore`] is the in-memory reference
/// implementation.
pub trait TypeEnv {
    fn class(&self, id: ClassId) -> Option<&ClassDef>;

    fn type_param(&self, id: TypeVarId) -> Option<&TypeParamDef>;

    fn lookup_class(&self, name: &str) -> Option<ClassId>;

    fn well_known(&self) -> &WellKnownTypes;
}

/// In-memory declaration store.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TypeStore {
    classes: Vec<ClassDef>,
    type_params: Vec<TypeParamDef>,
    by_name: HashMap<String, ClassId>,
    well_known: WellKnownTypes,
}

impl TypeStore {
    /// A store seeded with the `java.lang`/`java.util` declarations the
    /// subtyping scenarios in this crate's tests rely on.
    pub fn with_minimal_jdk() -> TypeStore {
        let mut store = TypeStore {
            classes: Vec::new(),
            type_params: Vec::new(),
            by_name: HashMap::new(),
            // Patched below once the declarations exist.
            well_known: WellKnownTypes {
                object: ClassId(0),
                cloneable: ClassId(0),
                serializable: ClassId(0),
                char_sequence: ClassId(0),
                string: ClassId(0),
                number: ClassId(0),
                comparable: ClassId(0),
                iterable: ClassId(0),
                collection: ClassId(0),
                list: ClassId(0),
                boolean: ClassId(0),
                byte: ClassId(0),
                character: ClassId(0),
                short: ClassId(0),
                integer: ClassId(0),
                long: ClassId(0),
                float: ClassId(0),
                double: ClassId(0),
            },
        };

        let object = store.add_class(ClassDef {
            name: "java.lang.Object".to_string(),
            kind: ClassKind::Class,
            type_params: vec![],
            super_class: None,
            interfaces: vec![],
        });
        let object_ty = Type::class(object, vec![]);

        let iface = |name: &str| ClassDef {
            name: name.to_string(),
            kind: ClassKind::Interface,
            type_params: vec![],
            super_class: None,
            interfaces: vec![],
        };

        let serializable = store.add_class(iface("java.io.Serializable"));
        let cloneable = store.add_class(iface("java.lang.Cloneable"));
        let char_sequence = store.add_class(iface("java.lang.CharSequence"));
        store.add_class(iface("java.lang.Runnable"));

        let comparable_t = store.add_type_param("T", vec![object_ty.clone()]);
        let comparable = store.add_class(ClassDef {
            name: "java.lang.Comparable".to_string(),
            kind: ClassKind::Interface,
            type_params: vec![comparable_t],
            super_class: None,
            interfaces: vec![],
        });

        let string = store.add_class(ClassDef {
            name: "java.lang.String".to_string(),
            kind: ClassKind::Class,
            type_params: vec![],
            super_class: Some(object_ty.clone()),
            interfaces: vec![],
        });
        // String implements Comparable<String>; patch in the self-reference.
        let string_ty = Type::class(string, vec![]);
        store.classes[string.index()].interfaces = vec![
            Type::class(char_sequence, vec![]),
            Type::class(comparable, vec![string_ty]),
            Type::class(serializable, vec![]),
        ];

        let number = store.add_class(ClassDef {
            name: "java.lang.Number".to_string(),
            kind: ClassKind::Class,
            type_params: vec![],
            super_class: Some(object_ty.clone()),
            interfaces: vec![Type::class(serializable, vec![])],
        });

        let wrapper = |store: &mut TypeStore, name: &str, super_class: ClassId| {
            let id = store.add_class(ClassDef {
                name: name.to_string(),
                kind: ClassKind::Class,
                type_params: vec![],
                super_class: Some(Type::class(super_class, vec![])),
                interfaces: vec![],
            });
            let self_ty = Type::class(id, vec![]);
            let mut interfaces = vec![Type::class(comparable, vec![self_ty])];
            if super_class == object {
                // Numeric wrappers inherit Serializable through Number.
                interfaces.push(Type::class(serializable, vec![]));
            }
            store.classes[id.index()].interfaces = interfaces;
            id
        };

        let boolean = wrapper(&mut store, "java.lang.Boolean", object);
        let byte = wrapper(&mut store, "java.lang.Byte", number);
        let character = wrapper(&mut store, "java.lang.Character", object);
        let short = wrapper(&mut store, "java.lang.Short", number);
        let integer = wrapper(&mut store, "java.lang.Integer", number);
        let long = wrapper(&mut store, "java.lang.Long", number);
        let float = wrapper(&mut store, "java.lang.Float", number);
        let double = wrapper(&mut store, "java.lang.Double", number);

        let iterable_t = store.add_type_param("T", vec![object_ty.clone()]);
        let iterable = store.add_class(ClassDef {
            name: "java.lang.Iterable".to_string(),
            kind: ClassKind::Interface,
            type_params: vec![iterable_t],
            super_class: None,
            interfaces: vec![],
        });

        let collection_e = store.add_type_param("E", vec![object_ty.clone()]);
        let collection = store.add_class(ClassDef {
            name: "java.util.Collection".to_string(),
            kind: ClassKind::Interface,
            type_params: vec![collection_e],
            super_class: None,
            interfaces: vec![Type::class(iterable, vec![Type::TypeVar(collection_e)])],
        });

        let list_e = store.add_type_param("E", vec![object_ty.clone()]);
        let list = store.add_class(ClassDef {
            name: "java.util.List".to_string(),
            kind: ClassKind::Interface,
            type_params: vec![list_e],
            super_class: None,
            interfaces: vec![Type::class(collection, vec![Type::TypeVar(list_e)])],
        });

        let array_list_e = store.add_type_param("E", vec![object_ty.clone()]);
        store.add_class(ClassDef {
            name: "java.util.ArrayList".to_string(),
            kind: ClassKind::Class,
            type_params: vec![array_list_e],
            super_class: Some(object_ty),
            interfaces: vec![Type::class(list, vec![Type::TypeVar(array_list_e)])],
        });

        store.well_known = WellKnownTypes {
            object,
            cloneable,
            serializable,
            char_sequence,
            string,
            number,
            comparable,
            iterable,
            collection,
            list,
            boolean,
            byte,
            character,
            short,
            integer,
            long,
            float,
            double,
        };
        store
    }

    /// Register a declaration; its name becomes resolvable through
    /// [`TypeEnv::lookup_class`].
    pub fn add_class(&mut self, def: ClassDef) -> ClassId {
        let id = ClassId(u32::try_from(self.classes.len()).expect("too many classes"));
        self.by_name.insert(def.name.clone(), id);
        self.classes.push(def);
        id
    }

    /// Allocate a type parameter. For self-referential bounds
    /// (`F extends Comparable<F>`), allocate with placeholder bounds first and
    /// finish with [`TypeStore::define_type_param`].
    pub fn add_type_param(
        &mut self,
        name: impl Into<String>,
        upper_bounds: Vec<Type>,
    ) -> TypeVarId {
        let id = TypeVarId(u32::try_from(self.type_params.len()).expect("too many type params"));
        self.type_params.push(TypeParamDef {
            name: name.into(),
            upper_bounds,
        });
        id
    }

    /// Replace the bounds of an already-allocated type parameter.
    pub fn define_type_param(&mut self, id: TypeVarId, upper_bounds: Vec<Type>) {
        if let Some(def) = self.type_params.get_mut(id.index()) {
            def.upper_bounds = upper_bounds;
        }
    }

    pub fn class_mut(&mut self, id: ClassId) -> Option<&mut ClassDef> {
        self.classes.get_mut(id.index())
    }

    /// Exact-name lookup (no `java.lang` defaulting).
    pub fn class_id(&self, name: &str) -> Option<ClassId> {
        self.by_name.get(name).copied()
    }
}

impl Default for TypeStore {
    fn default() -> TypeStore {
        TypeStore::with_minimal_jdk()
    }
}

impl TypeEnv for TypeStore {
    fn class(&self, id: ClassId) -> Option<&ClassDef> {
        self.classes.get(id.index())
    }

    fn type_param(&self, id: TypeVarId) -> Option<&TypeParamDef> {
        self.type_params.get(id.index())
    }

    fn lookup_class(&self, name: &str) -> Option<ClassId> {
        if let Some(id) = self.by_name.get(name) {
            return Some(*id);
        }
        // Simple names resolve against the implicit java.lang import.
        if !name.contains('.') {
            return self.by_name.get(&format!("java.lang.{name}")).copied();
        }
        None
    }

    fn well_known(&self) -> &WellKnownTypes {
        &self.well_known
    }
}
