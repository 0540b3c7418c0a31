//! Registry integration tests.

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use servient_core::form::Form;
    use servient_core::{DynamicThing, Lookup, Placement, SearchOrder, StaticThing, Thing};
    use servient_model::{OperationSet, OperationType, ServientError};

    use crate::{READ_WRITE, greeting};

    const FIXED: &[Form<'static>] = &[
        Form::new("/name", OperationType::ReadProperty.into_set()).with_handler(&greeting),
        Form::new("/oh", OperationType::SubscribeEvent.into_set()),
    ];

    #[test]
    fn test_should_reject_every_mutation_of_static_registry() {
        let mut thing = StaticThing::new(FIXED);
        let read = OperationType::ReadProperty.into_set();
        assert!(!thing.is_mutable());
        assert_eq!(
            thing.insert_or_replace(Form::new("/new", read)).unwrap_err(),
            ServientError::NotAllowed
        );
        assert_eq!(
            thing.replace("/name", read, Form::new("/name", read)).unwrap_err(),
            ServientError::NotAllowed
        );
        assert_eq!(thing.remove("/name", read).unwrap_err(), ServientError::NotAllowed);
        assert_eq!(thing.len(), 2);
    }

    #[test]
    fn test_should_size_registry_from_byte_region() {
        let capacity = DynamicThing::slots_for(4 * std::mem::size_of::<Form<'static>>() + 1);
        assert_eq!(capacity, 4);

        let mut slots = vec![Form::VACANT; capacity];
        let mut thing = DynamicThing::from_forms(&mut slots, FIXED, Lookup::default()).unwrap();
        assert_eq!(thing.len(), 2);
        assert_eq!(thing.capacity(), 4);

        thing.insert_or_replace(Form::new("/a", READ_WRITE)).unwrap();
        thing.insert_or_replace(Form::new("/b", READ_WRITE)).unwrap();
        let err = thing.insert_or_replace(Form::new("/c", READ_WRITE)).unwrap_err();
        assert!(matches!(err, ServientError::NotEnoughMemory { .. }));
        assert_eq!(thing.len(), 4);

        // A full registry still accepts replacements.
        assert_eq!(
            thing
                .insert_or_replace(Form::new("/a", OperationType::WriteProperty.into_set()))
                .unwrap(),
            Placement::Replaced(2)
        );
    }

    #[test]
    fn test_should_honor_configured_search_order() {
        let read = OperationType::ReadProperty.into_set();
        let forms = [
            Form::new("/value", read).with_handler(&greeting),
            Form::new("/value", READ_WRITE),
        ];

        let oldest = StaticThing::new(&forms);
        assert!(oldest.find("/value", read).unwrap().handler.is_some());

        let newest =
            StaticThing::with_lookup(&forms, Lookup::new().with_order(SearchOrder::NewestFirst));
        assert!(newest.find("/value", read).unwrap().handler.is_none());
    }

    #[test]
    fn test_should_compare_targets_with_injected_function() {
        fn ignore_case(registered: &str, requested: &str) -> std::cmp::Ordering {
            registered
                .to_ascii_lowercase()
                .cmp(&requested.to_ascii_lowercase())
        }

        let thing = StaticThing::with_lookup(FIXED, Lookup::new().with_compare(ignore_case));
        assert_eq!(
            thing.find("/NAME", OperationType::ReadProperty.into()).unwrap().target,
            "/name"
        );
        assert_eq!(
            StaticThing::new(FIXED)
                .find("/NAME", OperationType::ReadProperty.into())
                .unwrap_err(),
            ServientError::NotFound
        );
    }

    proptest! {
        #[test]
        fn prop_removed_form_is_no_longer_found(count in 1usize..6, victim in 0usize..6) {
            let targets = ["/t0", "/t1", "/t2", "/t3", "/t4", "/t5"];
            let victim = victim % count;
            let mut slots = [Form::VACANT; 6];
            let mut thing = DynamicThing::new(&mut slots);
            for target in &targets[..count] {
                thing.insert_or_replace(Form::new(*target, READ_WRITE)).unwrap();
            }

            let read: OperationSet = OperationType::ReadProperty.into();
            let removed = thing.remove(targets[victim], read).unwrap();
            prop_assert_eq!(removed.target, targets[victim]);
            prop_assert_eq!(thing.len(), count - 1);
            prop_assert_eq!(
                thing.find(targets[victim], read).unwrap_err(),
                ServientError::NotFound
            );
            for target in targets[..count].iter().filter(|t| **t != targets[victim]) {
                prop_assert!(thing.find(target, read).is_ok());
            }
        }
    }
}
