use uiot_telemetry::{metrics, new_message_id, record_classification, record_message_received};

#[test]
fn message_ids_are_unique() {
    let first = new_message_id();
    let second = new_message_id();
    assert!(!first.is_empty());
    assert_ne!(first, second);
}

#[test]
fn counters_accumulate() {
    let before = metrics().snapshot();
    record_message_received();
    record_classification(3, 2);
    let after = metrics().snapshot();
    assert!(after.messages_received >= before.messages_received + 1);
    assert!(after.devices_classified >= before.devices_classified + 3);
    assert!(after.devices_dropped >= before.devices_dropped + 2);
}
