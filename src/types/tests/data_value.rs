use crate::types::*;

#[test]
fn defaults() {
    let dv = DataValue::null();
    assert!(dv.is_null());
    assert_eq!(*dv.value(), Variant::Empty);
    // A missing status is taken as good
    assert_eq!(dv.status(), StatusCode::Good);
    assert!(dv.is_valid());
    assert!(dv.source_timestamp().is_null());
    assert!(dv.server_timestamp().is_null());
    assert_eq!(dv.source_picoseconds(), 0);
    assert_eq!(dv.server_picoseconds(), 0);
    assert_eq!(DataValue::default(), dv);
}

#[test]
fn constructors() {
    let dv = DataValue::new(42i32);
    assert_eq!(*dv.value(), Variant::Int32(42));
    assert_eq!(dv.status, Some(StatusCode::Good));
    assert!(dv.source_timestamp.is_none());

    let dv = DataValue::value_only("text");
    assert_eq!(*dv.value(), Variant::from("text"));
    assert!(dv.status.is_none());

    let dv = DataValue::from((Variant::from(1.5f64), StatusCode::UncertainInitialValue));
    assert_eq!(dv.status(), StatusCode::UncertainInitialValue);
    assert!(!dv.is_valid());
    assert!(!dv.is_null());

    let dv = DataValue::from(true);
    assert_eq!(*dv.value(), Variant::Boolean(true));
}

#[test]
fn new_now() {
    let before = DateTime::now();
    let dv = DataValue::new_now(10u16);
    assert_eq!(dv.source_timestamp, dv.server_timestamp);
    assert!(dv.source_timestamp() >= before);
    assert_eq!(dv.source_picoseconds, Some(0));
    assert_eq!(dv.server_picoseconds, Some(0));
    assert_eq!(dv.status(), StatusCode::Good);
}

#[test]
fn builders() {
    let source = DateTime::ymd(2022, 1, 1).unwrap();
    let server = DateTime::ymd(2022, 1, 2).unwrap();
    let dv = DataValue::value_only(1u8)
        .with_status(StatusCode::BadNodeIdUnknown)
        .with_source_timestamp(source, Some(7))
        .with_server_timestamp(server, None);
    assert_eq!(dv.status(), StatusCode::BadNodeIdUnknown);
    assert_eq!(dv.source_timestamp(), source);
    assert_eq!(dv.source_picoseconds(), 7);
    assert_eq!(dv.server_timestamp(), server);
    assert_eq!(dv.server_picoseconds, Some(0));
}

#[test]
fn set_value() {
    let mut dv = DataValue::new(1i32);
    dv.set_value(None);
    assert_eq!(dv.value, Some(Variant::Empty));
    assert!(dv.is_null());

    let source = DateTime::ymd(2022, 3, 4).unwrap();
    let server = DateTime::now();
    dv.set_value_at("later", &source, &server);
    assert_eq!(*dv.value(), Variant::from("later"));
    assert_eq!(dv.source_timestamp(), source);
    assert_eq!(dv.server_timestamp(), server);
}

#[test]
fn display() {
    let dv = DataValue::new(5i32);
    assert_eq!(dv.to_string(), "DataValue(value=5, status=Good)");
    assert_eq!(
        DataValue::null().to_string(),
        "DataValue(value=null, status=Good)"
    );

    let source = DateTime::ymd(2022, 1, 1).unwrap();
    let dv = DataValue::new(5i32).with_source_timestamp(source, Some(3));
    assert_eq!(
        dv.to_string(),
        "DataValue(value=5, status=Good, sourceTimestamp=2022-01-01T00:00:00+00:00, sourcePicoseconds=3)"
    );
}
