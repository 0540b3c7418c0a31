//! Servient loop integration tests.

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use servient_core::form::Form;
    use servient_core::{DynamicThing, ServientConfig, StaticThing, Thing};
    use servient_model::OperationType;

    use crate::{READ_WRITE, bool_property, greeting, serve_lines};

    #[test]
    fn test_should_serve_line_session() {
        let on = Cell::new(false);
        let forms = [
            Form::new("/status", READ_WRITE)
                .with_handler(&bool_property)
                .with_context(&on),
            Form::new("/name", OperationType::ReadProperty.into_set()).with_handler(&greeting),
            Form::new("/oh", OperationType::SubscribeEvent.into_set()),
        ];

        let output = serve_lines(
            StaticThing::new(&forms),
            "readproperty /status\n\
             writeproperty /status true\n\
             readproperty /status\n\
             readproperty /name\n\
             invokeaction /status\n\
             readproperty /missing\n\
             subscribeevent /oh\n",
            128,
        );

        assert_eq!(
            output,
            "0 OK false\n\
             0 OK\n\
             0 OK true\n\
             0 OK hello\n\
             1 NOT_ALLOWED\n\
             2 NOT_FOUND\n\
             14 NOT_SUPPORTED\n"
        );
        assert!(on.get());
    }

    #[test]
    fn test_should_answer_malformed_lines_and_keep_serving() {
        let forms =
            [Form::new("/name", OperationType::ReadProperty.into_set()).with_handler(&greeting)];
        let output = serve_lines(
            StaticThing::new(&forms),
            "frobnicate /name\n\
             readproperty\n\
             \n\
             readproperty /name\n\
             writeproperty /name this-payload-does-not-fit-into-the-scratch-buffer\n",
            48,
        );
        assert_eq!(output, "1 NOT_ALLOWED\n2 NOT_FOUND\n0 OK hello\n5 INTERNAL_ERROR\n");
    }

    #[test]
    fn test_should_serve_registry_sized_from_config() {
        let config = ServientConfig::builder().forms_buffer_bytes(512).build();
        config.validate().unwrap();

        let on = Cell::new(true);
        let mut slots = vec![Form::VACANT; config.forms_capacity()];
        let mut thing = DynamicThing::new(&mut slots);
        thing
            .insert_or_replace(
                Form::new("/status", READ_WRITE)
                    .with_handler(&bool_property)
                    .with_context(&on),
            )
            .unwrap();

        let output = serve_lines(thing, "readproperty /status\n", config.scratch_buffer_bytes);
        assert_eq!(output, "0 OK true\n");
    }
}
