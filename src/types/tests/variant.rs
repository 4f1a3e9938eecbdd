use std::any::Any;
use std::convert::TryFrom;

use crate::types::*;

#[test]
fn is_numeric() {
    assert!(Variant::from(10i8).is_numeric());
    assert!(Variant::from(10u8).is_numeric());
    assert!(Variant::from(10i16).is_numeric());
    assert!(Variant::from(10u16).is_numeric());
    assert!(Variant::from(10i32).is_numeric());
    assert!(Variant::from(10u32).is_numeric());
    assert!(Variant::from(10i64).is_numeric());
    assert!(Variant::from(10u64).is_numeric());
    assert!(Variant::from(10f32).is_numeric());
    assert!(Variant::from(10f64).is_numeric());

    assert_eq!(Variant::from("foo").is_numeric(), false);
    assert_eq!(Variant::from(true).is_numeric(), false);
    assert_eq!(Variant::from(true).is_number(), true);
    assert_eq!(Variant::from(true).is_numeric(), false);
    assert_eq!(Variant::from(vec![1i32, 2]).is_numeric(), false);
}

#[test]
fn size() {
    // Test that the variant is boxing enough data to keep the stack size down to some manageable
    // amount.
    use std::mem;
    let vsize = mem::size_of::<Variant>();
    println!("Variant size = {}", vsize);
    assert!(vsize <= 32);
}

#[test]
fn variant_type_id() {
    let types = [
        (Variant::Empty, VariantTypeId::Empty),
        (Variant::from(()), VariantTypeId::Empty),
        (Variant::from(true), VariantTypeId::Boolean),
        (Variant::from(0i8), VariantTypeId::SByte),
        (Variant::from(0u8), VariantTypeId::Byte),
        (Variant::from(0i16), VariantTypeId::Int16),
        (Variant::from(0u16), VariantTypeId::UInt16),
        (Variant::from(0i32), VariantTypeId::Int32),
        (Variant::from(0u32), VariantTypeId::UInt32),
        (Variant::from(0i64), VariantTypeId::Int64),
        (Variant::from(0u64), VariantTypeId::UInt64),
        (Variant::from(0f32), VariantTypeId::Float),
        (Variant::from(0f64), VariantTypeId::Double),
        (Variant::from(UAString::null()), VariantTypeId::String),
        (Variant::from(ByteString::null()), VariantTypeId::ByteString),
        (Variant::xml_element("<a/>"), VariantTypeId::XmlElement),
        (Variant::from(QualifiedName::null()), VariantTypeId::QualifiedName),
        (Variant::from(LocalizedText::null()), VariantTypeId::LocalizedText),
        (Variant::from(NodeId::null()), VariantTypeId::NodeId),
        (Variant::from(ExpandedNodeId::null()), VariantTypeId::ExpandedNodeId),
        (Variant::from(ExtensionObject::null()), VariantTypeId::ExtensionObject),
        (Variant::from(Guid::null()), VariantTypeId::Guid),
        (Variant::from(DateTime::null()), VariantTypeId::DateTime),
        (Variant::from(StatusCode::Good), VariantTypeId::StatusCode),
        (Variant::from(DataValue::null()), VariantTypeId::DataValue),
        (Variant::from(DiagnosticInfo::null()), VariantTypeId::DiagnosticInfo),
        (Variant::from(vec![1i32]), VariantTypeId::Array),
    ];
    for (v, t) in types.iter() {
        assert_eq!(v.type_id(), *t);
    }
    assert_eq!(Variant::default(), Variant::Empty);
}

#[test]
fn data_type() {
    assert_eq!(Variant::from(1i32).data_type(), Some(NodeId::numeric(0, 6)));
    assert_eq!(Variant::from("x").data_type(), Some(NodeId::numeric(0, 12)));
    assert_eq!(Variant::from(vec![1.0f64]).data_type(), Some(NodeId::numeric(0, 11)));
    assert_eq!(Variant::Empty.data_type(), None);
    let mixed = Variant::try_from(vec![Variant::from(1i32), Variant::from("a")]).unwrap();
    assert_eq!(mixed.data_type(), Some(NodeId::numeric(0, 24)));
}

#[test]
fn bytes_are_a_byte_string() {
    let v = Variant::from(vec![1u8, 2, 3]);
    assert_eq!(v.type_id(), VariantTypeId::ByteString);
    assert!(!v.is_array());
    let v = Variant::from(&[1u8, 2, 3][..]);
    assert_eq!(v, Variant::from(ByteString::from(vec![1u8, 2, 3])));

    let v = Variant::from(vec![vec![1u8], vec![2u8, 3]]);
    assert!(v.is_array_of_type(VariantTypeId::ByteString));
    assert_eq!(v.composite_type(), VariantTypeId::ByteString);
}

#[test]
fn single_dimension_array() {
    let v = Variant::from(vec![1i32, 2, 3]);
    assert!(v.is_array());
    assert!(v.is_array_of_type(VariantTypeId::Int32));
    assert!(!v.is_array_of_type(VariantTypeId::UInt32));
    assert_eq!(v.composite_type(), VariantTypeId::Int32);
    assert_eq!(v.dimension(), 1);
    assert_eq!(v.array_dimensions(), Some(vec![3]));
    assert_eq!(v.to_string(), "[1, 2, 3]");

    let values = <Vec<i32>>::try_from(&v).unwrap();
    assert_eq!(values, vec![1, 2, 3]);
    assert_eq!(
        <Vec<u32>>::try_from(&v).unwrap_err(),
        StatusCode::BadTypeMismatch
    );
    assert!(<Vec<i32>>::try_from(&Variant::from(1i32)).is_err());

    let strings = Variant::from(&["a".to_string(), "b".to_string()][..]);
    assert!(strings.is_array_of_type(VariantTypeId::String));
}

#[test]
fn array_type_must_match() {
    let values = vec![Variant::from(1i32), Variant::from(2u32)];
    assert_eq!(
        Variant::try_from((VariantTypeId::Int32, values.clone())).unwrap_err(),
        StatusCode::BadInvalidArgument
    );
    // A mixed array takes anything but another array
    let mixed = Variant::try_from(values).unwrap();
    assert!(mixed.is_array());
    assert_eq!(mixed.composite_type(), VariantTypeId::Variant);
    assert!(Variant::try_from(vec![Variant::from(1i32), Variant::from(vec![1i32])]).is_err());
    // Arrays of empty or array elements do not exist
    assert!(Array::new_single(VariantTypeId::Empty, Vec::<Variant>::new()).is_err());
    assert!(Array::new_single(VariantTypeId::Array, Vec::<Variant>::new()).is_err());
}

#[test]
fn multi_dimension_array() {
    let values: Vec<Variant> = (0i32..6).map(Variant::from).collect::<Vec<Variant>>();
    let v = Variant::try_from((VariantTypeId::Int32, values.clone(), vec![2u32, 3])).unwrap();
    assert_eq!(v.dimension(), 2);
    assert_eq!(v.array_dimensions(), Some(vec![2, 3]));
    let array = v.as_array().unwrap();
    assert_eq!(array.get(&[0, 0]), Some(&Variant::from(0i32)));
    assert_eq!(array.get(&[1, 0]), Some(&Variant::from(3i32)));
    assert_eq!(array.get(&[1, 2]), Some(&Variant::from(5i32)));
    assert_eq!(array.get(&[2, 0]), None);
    assert_eq!(array.get(&[0]), None);

    // The product of the dimensions must be the number of values
    assert!(Variant::try_from((VariantTypeId::Int32, values.clone(), vec![4u32, 2])).is_err());
    assert!(Variant::try_from((VariantTypeId::Int32, values, Vec::new())).is_err());
}

#[test]
fn nested_array() {
    let rows = vec![
        Nested::list(vec![Nested::value(1i32), Nested::value(2i32)]),
        Nested::list(vec![Nested::value(3i32), Nested::value(4i32)]),
        Nested::list(vec![Nested::value(5i32), Nested::value(6i32)]),
    ];
    let array = Array::from_nested(VariantTypeId::Int32, rows).unwrap();
    assert_eq!(array.dimensions(), &[3, 2]);
    assert_eq!(array.get(&[2, 1]), Some(&Variant::from(6i32)));

    let ragged = vec![
        Nested::list(vec![Nested::value(1i32), Nested::value(2i32)]),
        Nested::list(vec![Nested::value(3i32)]),
    ];
    assert_eq!(
        Array::from_nested(VariantTypeId::Int32, ragged).unwrap_err(),
        StatusCode::BadInvalidArgument
    );

    let flat = Array::from_nested(VariantTypeId::Int32, vec![Nested::value(1i32)]).unwrap();
    assert!(!flat.has_dimensions());
    assert_eq!(flat.rank(), 1);
}

#[test]
fn from_any() {
    let cases: Vec<(Box<dyn Any>, Variant)> = vec![
        (Box::new(5i32), Variant::Int32(5)),
        (Box::new(true), Variant::Boolean(true)),
        (Box::new("str"), Variant::from("str")),
        (Box::new("string".to_string()), Variant::from("string")),
        (Box::new(vec![1u8, 2]), Variant::from(vec![1u8, 2])),
        (Box::new(vec![1u16, 2]), Variant::from(vec![1u16, 2])),
        (Box::new(NodeId::numeric(1, 1)), Variant::from(NodeId::numeric(1, 1))),
        (Box::new(()), Variant::Empty),
    ];
    for (value, expected) in cases.iter() {
        assert_eq!(Variant::from_any(value.as_ref()).unwrap(), *expected);
    }

    let mixed = Variant::from_any(&vec![Variant::from(1i32), Variant::from("a")]).unwrap();
    assert_eq!(mixed.composite_type(), VariantTypeId::Variant);

    // Variants do not nest and unknown types are refused
    assert_eq!(
        Variant::from_any(&Variant::from(1i32)).unwrap_err(),
        StatusCode::BadInvalidArgument
    );
    assert!(Variant::from_any(&1usize).is_err());
    assert!(Variant::from_any(&vec![1usize]).is_err());
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Direction {
    Forward = 0,
    Inverse = 1,
}

impl Enumeration for Direction {
    fn value(&self) -> i32 {
        *self as i32
    }
}

#[test]
fn enumeration() {
    assert_eq!(Variant::from_enumeration(Direction::Inverse), Variant::Int32(1));
    assert_eq!(Variant::from_enumeration(Direction::Forward), Variant::Int32(0));
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Range {
    low: f64,
    high: f64,
}

impl Structure for Range {
    fn type_id() -> NodeId {
        NodeId::numeric(0, 884)
    }
}

#[allow(dead_code)]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Other {
    name: String,
}

impl Structure for Other {
    fn type_id() -> NodeId {
        NodeId::numeric(1, 1000)
    }
}

#[test]
fn structure() {
    let range = Range {
        low: -10.0,
        high: 10.0,
    };
    let v = Variant::from_structure(&range).unwrap();
    assert_eq!(v.type_id(), VariantTypeId::ExtensionObject);
    assert_eq!(v.to_structure::<Range>().unwrap(), range);
    assert_eq!(
        v.to_structure::<Other>().unwrap_err(),
        StatusCode::BadDataTypeIdUnknown
    );
    assert_eq!(
        Variant::from(1i32).to_structure::<Range>().unwrap_err(),
        StatusCode::BadTypeMismatch
    );
}

#[test]
fn display() {
    assert_eq!(Variant::Empty.to_string(), "null");
    assert_eq!(Variant::from(1.5f64).to_string(), "1.5");
    assert_eq!(Variant::from("abc").to_string(), "abc");
    assert_eq!(Variant::from(NodeId::numeric(2, 7)).to_string(), "ns=2;i=7");
    assert_eq!(Variant::from(StatusCode::BadTimeout).to_string(), "BadTimeout");
    let mixed = Variant::try_from(vec![Variant::from(1i32), Variant::Empty]).unwrap();
    assert_eq!(mixed.to_string(), "[1, null]");
}
