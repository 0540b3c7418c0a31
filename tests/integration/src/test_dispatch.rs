//! Dispatch integration tests.

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use servient_core::form::Form;
    use servient_core::{DynamicThing, Payload, Request, StaticThing, Thing, process_request};
    use servient_model::{ContentFormat, OperationType, ResponseStatus};

    use crate::{READ_WRITE, bool_property, greeting, init_tracing};

    #[test]
    fn test_should_route_status_requests_end_to_end() {
        init_tracing();
        let on = Cell::new(true);
        let forms = [
            Form::new("/status", READ_WRITE)
                .with_handler(&bool_property)
                .with_context(&on),
            Form::new("/oh", OperationType::SubscribeEvent.into_set()),
        ];
        let thing = StaticThing::new(&forms);

        let mut buf = [0u8; 32];
        let response = process_request(
            &thing,
            Request::new("/status", OperationType::ReadProperty, Payload::writable(&mut buf)),
        );
        assert_eq!(response.status, ResponseStatus::Ok);
        assert_eq!(response.payload.as_bytes(), b"true");
        assert_eq!(response.payload.content_format(), ContentFormat::JSON);

        let cases = [
            ("/status", OperationType::InvokeAction, ResponseStatus::NotAllowed),
            ("/missing", OperationType::ReadProperty, ResponseStatus::NotFound),
            ("/oh", OperationType::SubscribeEvent, ResponseStatus::NotSupported),
        ];
        for (target, op, expected) in cases {
            let mut buf = [0u8; 32];
            let response =
                process_request(&thing, Request::new(target, op, Payload::writable(&mut buf)));
            assert_eq!(response.status, expected, "{target} {op}");
            assert!(response.payload.is_empty());
        }
    }

    #[test]
    fn test_should_write_through_request_payload() {
        let on = Cell::new(false);
        let forms = [Form::new("/status", READ_WRITE)
            .with_handler(&bool_property)
            .with_context(&on)];
        let thing = StaticThing::new(&forms);

        let mut buf = [0u8; 32];
        let mut payload = Payload::writable(&mut buf);
        payload.append(b"true").unwrap();
        let response = process_request(
            &thing,
            Request::new("/status", OperationType::WriteProperty, payload),
        );
        assert_eq!(response.status, ResponseStatus::Ok);
        assert!(on.get());
    }

    #[test]
    fn test_should_follow_registry_changes_between_requests() {
        let mut slots = [Form::VACANT; 4];
        let mut thing = DynamicThing::new(&mut slots);
        let read = OperationType::ReadProperty.into_set();
        thing.insert_or_replace(Form::new("/greeting", read)).unwrap();

        let serve = |thing: &DynamicThing<'_, '_>| {
            let mut buf = [0u8; 16];
            let request =
                Request::new("/greeting", OperationType::ReadProperty, Payload::writable(&mut buf));
            let response = process_request(thing, request);
            response.status
        };

        assert_eq!(serve(&thing), ResponseStatus::NotSupported);
        thing
            .insert_or_replace(Form::new("/greeting", read).with_handler(&greeting))
            .unwrap();
        assert_eq!(thing.len(), 1);
        assert_eq!(serve(&thing), ResponseStatus::Ok);
        thing.remove("/greeting", read).unwrap();
        assert_eq!(serve(&thing), ResponseStatus::NotFound);
    }
}
