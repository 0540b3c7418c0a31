//! Scratch memory integration tests.

#[cfg(test)]
mod tests {
    use servient_core::{Payload, ProtocolBinding};
    use servient_model::{OperationType, ServientError};

    use crate::memory_binding;

    #[test]
    fn test_should_carve_target_and_payload_from_one_scratch_buffer() {
        let mut scratch = [0u8; 256];
        let mut payload = Payload::writable(&mut scratch);
        let mut target = Payload::receiver();
        payload.split(&mut target, 96).unwrap();
        assert_eq!(payload.capacity(), 160);
        assert_eq!(target.capacity(), 96);

        target.append_text("/status").unwrap();
        payload.append(b"true").unwrap();
        assert_eq!(target.as_text().unwrap(), "/status");
        assert_eq!(payload.as_bytes(), b"true");

        drop((payload, target));
        assert_eq!(&scratch[..4], b"true");
        assert_eq!(&scratch[160..167], b"/status");
    }

    #[test]
    fn test_should_leave_segments_untouched_on_failed_split() {
        let mut scratch = [0u8; 16];
        let mut left = Payload::writable(&mut scratch);
        left.append(b"0123456789").unwrap();
        let mut right = Payload::receiver();

        let err = left.split(&mut right, 7).unwrap_err();
        assert_eq!(err, ServientError::not_enough_memory(7, 6));
        assert_eq!(left.capacity(), 16);
        assert_eq!(left.len(), 10);
        assert_eq!(right.capacity(), 0);

        let mut read_only = Payload::read_only(b"fixed");
        assert_eq!(
            left.split(&mut read_only, 1).unwrap_err(),
            ServientError::NotAllowed
        );
        assert_eq!(read_only.as_bytes(), b"fixed");
    }

    #[test]
    fn test_should_decode_request_into_split_scratch() {
        let mut binding = memory_binding("writeproperty /status {\"on\":true}\n", 24);
        let mut scratch = [0u8; 128];
        let request = binding
            .receive(Payload::writable(&mut scratch))
            .unwrap()
            .unwrap();
        assert_eq!(request.operation, OperationType::WriteProperty);
        assert_eq!(request.target, "/status");
        assert_eq!(request.payload.capacity(), 104);
        assert_eq!(request.payload.as_text().unwrap(), "{\"on\":true}");
    }
}
