use crate::types::*;

#[test]
fn severity() {
    assert_eq!(StatusCode::Good.severity(), StatusCode::SEVERITY_GOOD);
    assert_eq!(StatusCode::UncertainInitialValue.severity(), StatusCode::SEVERITY_UNCERTAIN);
    assert_eq!(StatusCode::BadNodeIdUnknown.severity(), StatusCode::SEVERITY_BAD);
    assert!(StatusCode::BadNodeIdUnknown.is_not_good());
    assert!(StatusCode::BadNodeIdUnknown.is_not_uncertain());
    assert!(StatusCode::GoodClamped.is_not_bad());
    assert_eq!(StatusCode::BadNodeIdUnknown.sub_code(), 0x0034_0000);
}

#[test]
fn matching_ignores_info_bits() {
    let code = StatusCode::BadNodeIdUnknown
        .with_structure_changed(true)
        .with_historian_bits(StatusCode::HISTORIAN_BITS_PARTIAL);
    assert_ne!(code, StatusCode::BadNodeIdUnknown);
    assert!(code.is_status_code(StatusCode::BadNodeIdUnknown));
    assert!(code.equals_status_code(0x8034_0000));
    assert!(!code.is_status_code(StatusCode::BadTimeout));
    assert_eq!(code.status(), StatusCode::BadNodeIdUnknown);
}

#[test]
fn flag_bits() {
    let code = StatusCode::Good.with_semantics_changed(true);
    assert!(code.is_semantics_changed());
    assert!(!code.is_structure_changed());
    assert!(!code.with_semantics_changed(false).is_semantics_changed());

    let code = StatusCode::UncertainInitialValue.with_limit_bits(StatusCode::LIMIT_BITS_HIGH);
    assert_eq!(code.limit_bits(), StatusCode::LIMIT_BITS_HIGH);
    assert_eq!(code.info_type(), StatusCode::INFO_TYPE_DATA_VALUE);
    assert_eq!(code.status(), StatusCode::UncertainInitialValue);

    let code = StatusCode::Good.with_overflow(true);
    assert!(code.is_overflow());
    assert_eq!(code.info_type(), StatusCode::INFO_TYPE_DATA_VALUE);
    assert!(!StatusCode::Good.is_overflow());

    let code = StatusCode::Good
        .with_historian_bits(StatusCode::HISTORIAN_BITS_INTERPOLATED)
        .with_historian_bits(StatusCode::HISTORIAN_BITS_MULTI_VALUE);
    assert_eq!(code.historian_bits(), StatusCode::HISTORIAN_BITS_MULTI_VALUE);
}

#[test]
fn names() {
    assert_eq!(StatusCode::BadTimeout.name(), "BadTimeout");
    assert_eq!(StatusCode::BadTimeout.to_string(), "BadTimeout");
    assert!(!StatusCode::BadTimeout.description().is_empty());
    assert_eq!(format!("{:?}", StatusCode::BadTimeout), "BadTimeout (0x800A0000)");

    let unknown = StatusCode::from_bits(0x8FFF_0000);
    assert_eq!(unknown.name(), "0x8FFF0000");
    assert_eq!(unknown.description(), "");

    let code = StatusCode::Good.with_structure_changed(true);
    assert_eq!(code.to_string(), "Good+STRUCTURE_CHANGED");
}

#[test]
fn raw_bits() {
    let code = StatusCode::from(0x8034_0401u32);
    assert_eq!(code.bits(), 0x8034_0401);
    assert_eq!(u32::from(code), 0x8034_0401);
    assert_eq!(StatusCode::default(), StatusCode::Good);
}

#[test]
fn as_error() {
    fn fails() -> Result<(), StatusCode> {
        Err(StatusCode::BadInvalidArgument)
    }
    let err: Box<dyn std::error::Error> = Box::new(fails().unwrap_err());
    assert_eq!(err.to_string(), "BadInvalidArgument");
    let io_err: std::io::Error = StatusCode::BadInvalidArgument.into();
    assert!(io_err.to_string().contains("BadInvalidArgument"));
}
