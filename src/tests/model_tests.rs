#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::io::Write;
    use std::rc::Rc;

    use crate::config::{ ConfigError, TesterConfig };
    use crate::errors::AccessError;
    use crate::models::property::{ IgnoredProperties, PropertySelector };
    use crate::models::value::{ TypeDescriptor, TypeShape, Value };
    use crate::property;
    use crate::tests::fixtures::*;
    use crate::traits::inspectable::Inspectable;
    use crate::traits::notify::{ NotifyPropertyChanged, PropertyChangedEvent };

    #[test]
    fn test_selector_resolves_field_and_getter_access() {
        assert_eq!(property!(DummyGood => name).property_name().unwrap(), "name");
        assert_eq!(property!(DummyDerived => full_name()).property_name().unwrap(), "full_name");
        assert_eq!(PropertySelector::new("subject . count").property_name().unwrap(), "count");
        assert_eq!(PropertySelector::new("count").property_name().unwrap(), "count");
        assert_eq!(PropertySelector::new("self.r#type").property_name().unwrap(), "type");
    }

    #[test]
    fn test_selector_rejects_anything_but_a_single_access() {
        for expression in ["", "a.b.c", "subject.name + 1", "subject.items(0)", "subject.", ".name", "1.5", "subject._"] {
            let err = PropertySelector::new(expression).property_name().unwrap_err();
            assert!(err.is_argument_error(), "`{}` should be rejected", expression);
        }
    }

    #[test]
    fn test_ignored_properties_set_semantics() {
        let mut ignored: IgnoredProperties = ["a", "b"].into_iter().collect();
        assert!(!ignored.add("a"));
        assert!(ignored.add("c"));
        assert_eq!(ignored.iter().collect::<Vec<_>>(), vec!["a", "b", "c"]);
        assert!(ignored.remove("b"));
        assert!(!ignored.contains("b"));
        ignored.clear();
        assert!(ignored.is_empty());
    }

    #[test]
    fn test_value_equality_and_downcast() {
        let value = Value::new(vec![1_u8, 2, 3]);
        assert_eq!(value, Value::new(vec![1_u8, 2, 3]));
        assert_ne!(value, Value::new(vec![1_u16, 2, 3]));
        assert_eq!(value.downcast_ref::<Vec<u8>>(), Some(&vec![1, 2, 3]));

        let value = value.downcast::<String>().unwrap_err();
        assert_eq!(value.downcast::<Vec<u8>>().unwrap(), vec![1, 2, 3]);
        assert_eq!(format!("{:?}", Value::new("hi".to_string())), "\"hi\"");
    }

    #[test]
    fn test_descriptors_are_closed_types() {
        let ty = TypeDescriptor::of::<Option<Vec<String>>>();
        match ty.shape() {
            TypeShape::Optional { inner, .. } => match inner.shape() {
                TypeShape::Collection { element, .. } => assert!(element.is::<String>()),
                other => panic!("expected a collection, got {:?}", other),
            },
            other => panic!("expected an optional, got {:?}", other),
        }
        assert!(ty.accepts(&Value::new(Some(vec!["x".to_string()]))));
        assert!(!ty.accepts(&Value::new(Some(vec![1_i32]))));
    }

    #[test]
    fn test_property_table_access_errors() {
        let mut subject = DummyOddities::default();
        assert_eq!(subject.get_property("item").unwrap_err(), AccessError::Indexed("item".to_string()));
        assert_eq!(subject.get_property("secret").unwrap_err(), AccessError::NotReadable("secret".to_string()));
        assert_eq!(subject.get_property("nope").unwrap_err(), AccessError::UnknownProperty("nope".to_string()));
        assert!(matches!(
            subject.set_property("secret", Value::new(5_i32)).unwrap_err(),
            AccessError::TypeMismatch { .. }
        ));

        let mut read_only = DummyReadOnly::default();
        assert_eq!(
            read_only.set_property("id", Value::new(1_u32)).unwrap_err(),
            AccessError::NotWritable("id".to_string())
        );
    }

    #[test]
    fn test_property_table_round_trip_through_values() {
        let mut subject = DummyGood::default();
        subject.set_property("tags", Value::new(vec!["x".to_string()])).unwrap();
        assert_eq!(subject.tags, vec!["x".to_string()]);
        assert_eq!(subject.get_property("tags").unwrap(), Value::new(vec!["x".to_string()]));

        let names: Vec<String> = subject
            .properties()
            .into_iter()
            .filter(|property| property.writable)
            .map(|property| property.name)
            .collect();
        assert_eq!(names.len(), 8);
        assert!(!names.contains(&"id".to_string()));
    }

    #[test]
    fn test_property_changed_event_subscriptions() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut event = PropertyChangedEvent::new();

        let log = Rc::clone(&seen);
        let id = event.subscribe(Box::new(move |name: &str| log.borrow_mut().push(name.to_string())));
        event.raise("first");
        assert!(event.unsubscribe(id));
        assert!(!event.unsubscribe(id));
        event.raise("second");

        assert_eq!(*seen.borrow(), vec!["first".to_string()]);
        assert_eq!(event.subscriber_count(), 0);
    }

    #[test]
    fn test_config_from_yaml() {
        let config = TesterConfig::from_yaml_str(
            "seed: 17\nmax_collection_len: 0\nignored_properties:\n  - name\n  - tags\n"
        ).unwrap();

        assert_eq!(config.seed, Some(17));
        assert_eq!(config.max_collection_len, 1);
        assert_eq!(config.max_string_len, TesterConfig::default().max_string_len);
        assert_eq!(config.ignored_properties, vec!["name".to_string(), "tags".to_string()]);
    }

    #[test]
    fn test_config_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "max_string_len: 5").unwrap();

        let config = TesterConfig::from_file(file.path()).unwrap();
        assert_eq!(config.max_string_len, 5);
        assert_eq!(config.seed, None);

        let missing = TesterConfig::from_file(std::path::Path::new("/definitely/not/here.yaml"));
        assert!(matches!(missing, Err(ConfigError::FileReadError(_))));
        assert!(matches!(TesterConfig::from_yaml_str("seed: [1"), Err(ConfigError::ParseError(_))));
    }
}
