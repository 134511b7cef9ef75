#[cfg(test)]
mod tests {
    use std::collections::{ BTreeMap, BTreeSet, HashMap, HashSet, VecDeque };

    use crate::config::TesterConfig;
    use crate::implementations::random_factory::RandomValueFactory;
    use crate::models::value::{ PropertyType, TypeDescriptor };
    use crate::tests::fixtures::*;
    use crate::traits::value_factory::ValueFactory;

    fn assert_generates<T: PropertyType>(factory: &mut RandomValueFactory) {
        let ty = TypeDescriptor::of::<T>();
        assert!(factory.can_create_instance(&ty), "{} should be supported", ty.name());
        let first = factory.create_random_value(&ty).expect("first value");
        let second = factory.create_random_value(&ty).expect("second value");
        assert!(first.is::<T>() && second.is::<T>(), "{} produced the wrong type", ty.name());
        assert_ne!(first, second, "{} produced the same value twice", ty.name());
    }

    #[test]
    fn test_primitives_are_distinguishable() {
        setup();
        let mut factory = RandomValueFactory::with_seed(1);
        assert_generates::<bool>(&mut factory);
        assert_generates::<char>(&mut factory);
        assert_generates::<i8>(&mut factory);
        assert_generates::<i16>(&mut factory);
        assert_generates::<i32>(&mut factory);
        assert_generates::<i64>(&mut factory);
        assert_generates::<i128>(&mut factory);
        assert_generates::<isize>(&mut factory);
        assert_generates::<u8>(&mut factory);
        assert_generates::<u16>(&mut factory);
        assert_generates::<u32>(&mut factory);
        assert_generates::<u64>(&mut factory);
        assert_generates::<u128>(&mut factory);
        assert_generates::<usize>(&mut factory);
        assert_generates::<f32>(&mut factory);
        assert_generates::<f64>(&mut factory);
        assert_generates::<String>(&mut factory);
    }

    #[test]
    fn test_containers_are_distinguishable() {
        setup();
        let mut factory = RandomValueFactory::with_seed(2);
        assert_generates::<Option<bool>>(&mut factory);
        assert_generates::<Vec<String>>(&mut factory);
        assert_generates::<VecDeque<u8>>(&mut factory);
        assert_generates::<BTreeSet<i64>>(&mut factory);
        assert_generates::<HashSet<String>>(&mut factory);
        assert_generates::<BTreeMap<u32, Option<String>>>(&mut factory);
        assert_generates::<HashMap<String, Vec<bool>>>(&mut factory);
        assert_generates::<Vec<Vec<Priority>>>(&mut factory);
    }

    #[test]
    fn test_enumerations_alternate() {
        setup();
        let mut factory = RandomValueFactory::with_seed(3);
        let ty = TypeDescriptor::of::<Priority>();
        let mut previous = factory.create_random_value(&ty).expect("variant");
        for _ in 0..20 {
            let next = factory.create_random_value(&ty).expect("variant");
            assert_ne!(previous, next);
            previous = next;
        }
    }

    #[test]
    fn test_unsupported_types() {
        let mut factory = RandomValueFactory::with_seed(4);
        assert!(!factory.can_create_instance(&TypeDescriptor::of::<Handle>()));
        assert!(!factory.can_create_instance(&TypeDescriptor::of::<Vec<Handle>>()));
        assert!(!factory.can_create_instance(&TypeDescriptor::of::<BTreeMap<String, Handle>>()));
        assert!(!factory.can_create_instance(&TypeDescriptor::of::<Unit>()));

        let err = factory.create_random_value(&TypeDescriptor::of::<Handle>()).unwrap_err();
        assert!(err.is_generator_invalid());
    }

    #[test]
    fn test_override_applies_to_nested_elements() {
        setup();
        let mut factory = RandomValueFactory::with_seed(5).with_override(HandleFactory::default());
        assert!(factory.can_create_instance(&TypeDescriptor::of::<Handle>()));
        assert!(factory.can_create_instance(&TypeDescriptor::of::<Vec<Handle>>()));

        let handles = factory
            .create_random_value(&TypeDescriptor::of::<Vec<Handle>>())
            .expect("handles")
            .downcast::<Vec<Handle>>()
            .expect("vector of handles");
        assert!(!handles.is_empty());
        assert!(handles.iter().all(|handle| handle.0 > 0));
    }

    #[test]
    fn test_override_takes_precedence_for_builtin_types() {
        let mut factory = RandomValueFactory::with_seed(6).with_override(ConstantStringFactory("fixed"));
        let names = factory
            .create_random_value(&TypeDescriptor::of::<Vec<String>>())
            .expect("names")
            .downcast::<Vec<String>>()
            .expect("vector of strings");
        assert!(names.iter().all(|name| name == "fixed"));
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let ty = TypeDescriptor::of::<BTreeMap<String, i32>>();
        let mut left = RandomValueFactory::with_seed(42);
        let mut right = RandomValueFactory::with_seed(42);
        for _ in 0..5 {
            assert_eq!(left.create_random_value(&ty).unwrap(), right.create_random_value(&ty).unwrap());
        }
    }

    #[test]
    fn test_begin_run_forgets_previous_values() {
        let ty = TypeDescriptor::of::<bool>();
        let mut factory = RandomValueFactory::with_seed(8);

        let mut previous = factory.create_random_value(&ty).unwrap();
        for _ in 0..16 {
            let next = factory.create_random_value(&ty).unwrap();
            assert_ne!(previous, next);
            previous = next;
        }

        // without the memory of the last draw, repeats come back
        let mut repeated = false;
        for _ in 0..64 {
            factory.begin_run();
            let next = factory.create_random_value(&ty).unwrap();
            repeated |= next == previous;
            previous = next;
        }
        assert!(repeated);
    }

    #[test]
    fn test_config_limits_sizes() {
        let config = TesterConfig {
            seed: Some(9),
            max_collection_len: 2,
            max_string_len: 3,
            ..TesterConfig::default()
        };
        let mut factory = RandomValueFactory::from_config(&config);
        for _ in 0..20 {
            let words = factory
                .create_random_value(&TypeDescriptor::of::<Vec<String>>())
                .unwrap()
                .downcast::<Vec<String>>()
                .unwrap();
            assert!((1..=2).contains(&words.len()));
            assert!(words.iter().all(|word| (1..=3).contains(&word.len())));
        }
    }
}
