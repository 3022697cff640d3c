use tava_types::{is_subtype, PrimitiveType, SupertypeSet, Type, TypeEnv, TypeStore};

#[test]
fn default_type_store_supports_well_known_subtyping_queries() {
    let env = TypeStore::default();

    // Ensure implicit `java.lang.*` lookup works for core types.
    let object = env
        .lookup_class("Object")
        .expect("TypeStore::default should define java.lang.Object");
    let cloneable = env
        .lookup_class("Cloneable")
        .expect("TypeStore::default should define java.lang.Cloneable");
    let serializable = env
        .lookup_class("java.io.Serializable")
        .expect("TypeStore::default should define java.io.Serializable");

    // `int[] <: Object | Cloneable | Serializable` requires `env.well_known()`.
    let int_array = Type::Array(Box::new(Type::Primitive(PrimitiveType::Int)));
    assert!(is_subtype(&env, &int_array, &Type::class(object, vec![])));
    assert!(is_subtype(
        &env,
        &int_array,
        &Type::class(cloneable, vec![])
    ));
    assert!(is_subtype(
        &env,
        &int_array,
        &Type::class(serializable, vec![])
    ));
}

#[test]
fn supertype_set_partitions_the_closure() {
    let env = TypeStore::with_minimal_jdk();
    let array_list = env
        .lookup_class("java.util.ArrayList")
        .expect("TypeStore::default should define java.util.ArrayList");
    let string = Type::class(env.well_known().string, vec![]);
    let subject = Type::class(array_list, vec![string]);

    let set = SupertypeSet::compute(&env, &subject).expect("closure of a class type");
    assert!(set.contains(&subject));
    assert!(set.contains(&env.well_known().object_type()));

    // ArrayList<String> itself is the deepest class member.
    assert_eq!(set.most_specific_class(&env), Some(&subject));
    // List, Collection and Iterable all land in the interface partition.
    let list = Type::class(env.well_known().list, vec![]);
    assert!(set.interfaces(&env).contains(&list));
    assert!(!set.classes(&env).contains(&list));
}
