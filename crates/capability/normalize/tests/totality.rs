use domain::{FanMode, HvacMode};
use uiot_normalize::{
    alarm, contact, curtain_alarm, fan_speed, human_activity, label, presence, thermostat_mode,
    work_mode,
};

const UNKNOWN_INPUTS: [&str; 5] = ["", "UNKNOWN", "Cool", "42", "havePerson "];

#[test]
fn every_normalizer_falls_back_on_unknown_input() {
    for input in UNKNOWN_INPUTS {
        assert_eq!(thermostat_mode(input), HvacMode::Auto, "{input:?}");
        assert_eq!(fan_speed(input), FanMode::Auto, "{input:?}");
        assert_eq!(presence(input), label::ABSENT, "{input:?}");
        assert_eq!(human_activity(input), label::NO_SIGNATURE, "{input:?}");
        assert_eq!(contact(input), label::OPEN, "{input:?}");
        assert_eq!(alarm(input), label::ALARM, "{input:?}");
        assert_eq!(curtain_alarm(input), label::NORMAL, "{input:?}");
        assert_eq!(work_mode(input), label::SECURITY, "{input:?}");
    }
}

#[test]
fn sensor_labels_for_known_values() {
    assert_eq!(presence("havePerson"), label::PRESENT);
    assert_eq!(presence("someone"), label::PRESENT);
    assert_eq!(presence("noPerson"), label::ABSENT);
    assert_eq!(human_activity("inactivity"), label::STILL);
    assert_eq!(human_activity("noFeatures"), label::NO_SIGNATURE);
    assert_eq!(human_activity("active"), label::ACTIVE);
    assert_eq!(contact("close"), label::CLOSED);
    assert_eq!(contact("open"), label::OPEN);
    assert_eq!(alarm("normal"), label::NORMAL);
    assert_eq!(alarm("fire"), label::ALARM);
    assert_eq!(curtain_alarm("out"), label::AWAY);
    assert_eq!(curtain_alarm("intrude"), label::INTRUSION);
    assert_eq!(work_mode("sensor"), label::SENSOR);
}
