// OPCUA for Rust
// SPDX-License-Identifier: MPL-2.0
// Copyright (C) 2017-2022 Adam Lock

//! Contains the implementation of `Variant`.

use std::{any::Any, convert::TryFrom, fmt};

use crate::types::{
    array::*,
    byte_string::ByteString,
    data_value::DataValue,
    date_time::DateTime,
    diagnostic_info::DiagnosticInfo,
    expanded_node_id::ExpandedNodeId,
    extension_object::{ExtensionObject, Structure},
    guid::Guid,
    localized_text::LocalizedText,
    node_id::NodeId,
    qualified_name::QualifiedName,
    status_code::StatusCode,
    string::{UAString, XmlElement},
};

pub use crate::types::variant_type_id::VariantTypeId;

/// An enumerated type whose values travel as their underlying `Int32`.
pub trait Enumeration: Copy {
    fn value(&self) -> i32;
}

/// A `Variant` holds built-in OPC UA data types, including single and multi dimensional arrays,
/// data values and extension objects.
///
/// As variants may be passed around a lot on the stack, Boxes are used for more complex types to
/// keep the size of this type down a bit, especially when used in arrays.
///
/// A variant never holds another variant directly. Mixed values are expressed as an array whose
/// element type is `VariantTypeId::Variant`.
#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub enum Variant {
    /// Empty type has no value. It is equivalent to a Null value (part 6 5.1.6)
    Empty,
    /// Boolean
    Boolean(bool),
    /// Signed byte
    SByte(i8),
    /// Unsigned byte
    Byte(u8),
    /// Signed 16-bit int
    Int16(i16),
    /// Unsigned 16-bit int
    UInt16(u16),
    /// Signed 32-bit int
    Int32(i32),
    /// Unsigned 32-bit int
    UInt32(u32),
    /// Signed 64-bit int
    Int64(i64),
    /// Unsigned 64-bit int
    UInt64(u64),
    /// Float
    Float(f32),
    /// Double
    Double(f64),
    /// String
    String(UAString),
    /// DateTime
    DateTime(DateTime),
    /// Guid
    Guid(Box<Guid>),
    /// StatusCode
    StatusCode(StatusCode),
    /// ByteString
    ByteString(ByteString),
    /// XmlElement
    XmlElement(XmlElement),
    /// QualifiedName
    QualifiedName(Box<QualifiedName>),
    /// LocalizedText
    LocalizedText(Box<LocalizedText>),
    /// NodeId
    NodeId(Box<NodeId>),
    /// ExpandedNodeId
    ExpandedNodeId(Box<ExpandedNodeId>),
    /// ExtensionObject
    ExtensionObject(Box<ExtensionObject>),
    /// DataValue
    DataValue(Box<DataValue>),
    /// DiagnosticInfo
    DiagnosticInfo(Box<DiagnosticInfo>),
    /// Single dimension array which can contain any scalar type, all the same type. Nested
    /// arrays will be rejected.
    /// To represent matrices or nested arrays, set the `dimensions` on the array.
    Array(Box<Array>),
}

impl From<()> for Variant {
    fn from(_: ()) -> Self {
        Variant::Empty
    }
}

impl From<bool> for Variant {
    fn from(v: bool) -> Self {
        Variant::Boolean(v)
    }
}

impl From<u8> for Variant {
    fn from(v: u8) -> Self {
        Variant::Byte(v)
    }
}

impl From<i8> for Variant {
    fn from(v: i8) -> Self {
        Variant::SByte(v)
    }
}

impl From<i16> for Variant {
    fn from(v: i16) -> Self {
        Variant::Int16(v)
    }
}

impl From<u16> for Variant {
    fn from(v: u16) -> Self {
        Variant::UInt16(v)
    }
}

impl From<i32> for Variant {
    fn from(v: i32) -> Self {
        Variant::Int32(v)
    }
}

impl From<u32> for Variant {
    fn from(v: u32) -> Self {
        Variant::UInt32(v)
    }
}

impl From<i64> for Variant {
    fn from(v: i64) -> Self {
        Variant::Int64(v)
    }
}

impl From<u64> for Variant {
    fn from(v: u64) -> Self {
        Variant::UInt64(v)
    }
}

impl From<f32> for Variant {
    fn from(v: f32) -> Self {
        Variant::Float(v)
    }
}

impl From<f64> for Variant {
    fn from(v: f64) -> Self {
        Variant::Double(v)
    }
}

impl<'a> From<&'a str> for Variant {
    fn from(v: &'a str) -> Self {
        Variant::String(UAString::from(v))
    }
}

impl From<String> for Variant {
    fn from(v: String) -> Self {
        Variant::String(UAString::from(v))
    }
}

impl From<UAString> for Variant {
    fn from(v: UAString) -> Self {
        Variant::String(v)
    }
}

impl From<DateTime> for Variant {
    fn from(v: DateTime) -> Self {
        Variant::DateTime(v)
    }
}

impl From<Guid> for Variant {
    fn from(v: Guid) -> Self {
        Variant::Guid(Box::new(v))
    }
}

impl From<StatusCode> for Variant {
    fn from(v: StatusCode) -> Self {
        Variant::StatusCode(v)
    }
}

impl From<ByteString> for Variant {
    fn from(v: ByteString) -> Self {
        Variant::ByteString(v)
    }
}

/// Bytes are always a scalar byte string, never an array of `Byte`.
impl From<Vec<u8>> for Variant {
    fn from(v: Vec<u8>) -> Self {
        Variant::ByteString(ByteString::from(v))
    }
}

impl<'a> From<&'a [u8]> for Variant {
    fn from(v: &'a [u8]) -> Self {
        Variant::ByteString(ByteString::from(v))
    }
}

impl From<QualifiedName> for Variant {
    fn from(v: QualifiedName) -> Self {
        Variant::QualifiedName(Box::new(v))
    }
}

impl From<LocalizedText> for Variant {
    fn from(v: LocalizedText) -> Self {
        Variant::LocalizedText(Box::new(v))
    }
}

impl From<NodeId> for Variant {
    fn from(v: NodeId) -> Self {
        Variant::NodeId(Box::new(v))
    }
}

impl From<ExpandedNodeId> for Variant {
    fn from(v: ExpandedNodeId) -> Self {
        Variant::ExpandedNodeId(Box::new(v))
    }
}

impl From<ExtensionObject> for Variant {
    fn from(v: ExtensionObject) -> Self {
        Variant::ExtensionObject(Box::new(v))
    }
}

impl From<DataValue> for Variant {
    fn from(v: DataValue) -> Self {
        Variant::DataValue(Box::new(v))
    }
}

impl From<DiagnosticInfo> for Variant {
    fn from(v: DiagnosticInfo) -> Self {
        Variant::DiagnosticInfo(Box::new(v))
    }
}

impl From<Array> for Variant {
    fn from(v: Array) -> Self {
        Variant::Array(Box::new(v))
    }
}

/// Values of mixed type become an array of element type `Variant`. Fails if any value is
/// itself an array.
impl TryFrom<Vec<Variant>> for Variant {
    type Error = StatusCode;

    fn try_from(v: Vec<Variant>) -> Result<Self, Self::Error> {
        Ok(Variant::from(Array::new_single(VariantTypeId::Variant, v)?))
    }
}

impl TryFrom<(VariantTypeId, Vec<Variant>)> for Variant {
    type Error = StatusCode;

    fn try_from(v: (VariantTypeId, Vec<Variant>)) -> Result<Self, Self::Error> {
        Ok(Variant::from(Array::new_single(v.0, v.1)?))
    }
}

impl TryFrom<(VariantTypeId, Vec<Variant>, Vec<u32>)> for Variant {
    type Error = StatusCode;

    fn try_from(v: (VariantTypeId, Vec<Variant>, Vec<u32>)) -> Result<Self, Self::Error> {
        Ok(Variant::from(Array::new_multi(v.0, v.1, v.2)?))
    }
}

macro_rules! from_array_to_variant_impl {
    ($vtype: ident, $rtype: ty) => {
        impl<'a> From<&'a [$rtype]> for Variant {
            fn from(v: &'a [$rtype]) -> Self {
                Variant::from(v.to_vec())
            }
        }

        impl From<Vec<$rtype>> for Variant {
            fn from(v: Vec<$rtype>) -> Self {
                let values: Vec<Variant> = v.into_iter().map(Variant::from).collect();
                Variant::Array(Box::new(Array::from_typed_values(VariantTypeId::$vtype, values)))
            }
        }
    };
}

from_array_to_variant_impl!(String, String);
from_array_to_variant_impl!(String, UAString);
from_array_to_variant_impl!(Boolean, bool);
from_array_to_variant_impl!(SByte, i8);
from_array_to_variant_impl!(Int16, i16);
from_array_to_variant_impl!(UInt16, u16);
from_array_to_variant_impl!(Int32, i32);
from_array_to_variant_impl!(UInt32, u32);
from_array_to_variant_impl!(Int64, i64);
from_array_to_variant_impl!(UInt64, u64);
from_array_to_variant_impl!(Float, f32);
from_array_to_variant_impl!(Double, f64);
from_array_to_variant_impl!(DateTime, DateTime);
from_array_to_variant_impl!(Guid, Guid);
from_array_to_variant_impl!(StatusCode, StatusCode);
from_array_to_variant_impl!(ByteString, ByteString);
from_array_to_variant_impl!(QualifiedName, QualifiedName);
from_array_to_variant_impl!(LocalizedText, LocalizedText);
from_array_to_variant_impl!(NodeId, NodeId);
from_array_to_variant_impl!(ExpandedNodeId, ExpandedNodeId);
from_array_to_variant_impl!(ExtensionObject, ExtensionObject);
from_array_to_variant_impl!(DataValue, DataValue);
from_array_to_variant_impl!(DiagnosticInfo, DiagnosticInfo);

/// An array of byte strings, e.g. from a list of byte buffers.
impl From<Vec<Vec<u8>>> for Variant {
    fn from(v: Vec<Vec<u8>>) -> Self {
        Variant::from(v.into_iter().map(ByteString::from).collect::<Vec<_>>())
    }
}

/// This macro tries to return a `Vec<foo>` from a `Variant::Array<Variant::Foo>>`, e.g.
/// an array of `Variant::Int32` becomes a `Vec<i32>`.
macro_rules! try_from_variant_to_array_impl {
    ($rtype: ident, $vtype: ident) => {
        impl TryFrom<&Variant> for Vec<$rtype> {
            type Error = StatusCode;

            fn try_from(value: &Variant) -> Result<Self, Self::Error> {
                match value {
                    Variant::Array(ref array) => array
                        .values()
                        .iter()
                        .map(|v| match v {
                            Variant::$vtype(v) => Ok(*v),
                            _ => Err(StatusCode::BadTypeMismatch),
                        })
                        .collect(),
                    _ => Err(StatusCode::BadTypeMismatch),
                }
            }
        }
    };
}

// These are implementations of TryFrom which will attempt to transform a single dimension array
// in a Variant to the respective Vec<T> defined in the macro. All the variants must be of the correct
// type or the impl will return with an error.

try_from_variant_to_array_impl!(bool, Boolean);
try_from_variant_to_array_impl!(i8, SByte);
try_from_variant_to_array_impl!(u8, Byte);
try_from_variant_to_array_impl!(i16, Int16);
try_from_variant_to_array_impl!(u16, UInt16);
try_from_variant_to_array_impl!(i32, Int32);
try_from_variant_to_array_impl!(u32, UInt32);
try_from_variant_to_array_impl!(i64, Int64);
try_from_variant_to_array_impl!(u64, UInt64);
try_from_variant_to_array_impl!(f32, Float);
try_from_variant_to_array_impl!(f64, Double);

impl Default for Variant {
    fn default() -> Self {
        Variant::Empty
    }
}

/// This implementation is mainly for debugging / convenience purposes, to eliminate some of the
/// noise in common types from using the Debug trait.
impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Variant::Empty => write!(f, "null"),
            Variant::SByte(v) => write!(f, "{}", v),
            Variant::Byte(v) => write!(f, "{}", v),
            Variant::Int16(v) => write!(f, "{}", v),
            Variant::UInt16(v) => write!(f, "{}", v),
            Variant::Int32(v) => write!(f, "{}", v),
            Variant::UInt32(v) => write!(f, "{}", v),
            Variant::Int64(v) => write!(f, "{}", v),
            Variant::UInt64(v) => write!(f, "{}", v),
            Variant::Float(v) => write!(f, "{}", v),
            Variant::Double(v) => write!(f, "{}", v),
            Variant::Boolean(v) => write!(f, "{}", v),
            Variant::String(ref v) => write!(f, "{}", v),
            Variant::XmlElement(ref v) => write!(f, "{}", v),
            Variant::Guid(ref v) => write!(f, "{}", v),
            Variant::DateTime(ref v) => write!(f, "{}", v),
            Variant::StatusCode(ref v) => write!(f, "{}", v),
            Variant::ByteString(ref v) => write!(f, "{}", v),
            Variant::QualifiedName(ref v) => write!(f, "{}", v),
            Variant::LocalizedText(ref v) => write!(f, "{}", v),
            Variant::NodeId(ref v) => write!(f, "{}", v),
            Variant::ExpandedNodeId(ref v) => write!(f, "{}", v),
            Variant::DataValue(ref v) => write!(f, "{}", v),
            Variant::Array(ref array) => {
                write!(f, "[")?;
                for (i, v) in array.values().iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", v)?;
                }
                write!(f, "]")
            }
            value => write!(f, "{:?}", value),
        }
    }
}

/// Tries each listed type in turn, converting the first that matches.
macro_rules! downcast_to_variant {
    ($value: expr, $($t: ty),* $(,)?) => {
        $(
            if let Some(v) = $value.downcast_ref::<$t>() {
                return Ok(Variant::from(v.clone()));
            }
        )*
    };
}

impl Variant {
    /// Constructs a variant from a dynamically typed value. The type of the value must be one of
    /// the built-in types, or a `Vec` of one, otherwise the call fails with
    /// `BadInvalidArgument`. A `Variant` is rejected because variants do not nest, but a
    /// `Vec<Variant>` becomes an array of mixed values.
    pub fn from_any(value: &dyn Any) -> Result<Variant, StatusCode> {
        if value.is::<Variant>() {
            error!("A variant cannot hold another variant directly");
            return Err(StatusCode::BadInvalidArgument);
        }
        if let Some(v) = value.downcast_ref::<Vec<Variant>>() {
            return Array::new_single(VariantTypeId::Variant, v.clone()).map(Variant::from);
        }
        if let Some(v) = value.downcast_ref::<&'static str>() {
            return Ok(Variant::from(*v));
        }
        downcast_to_variant!(
            value,
            (),
            bool,
            i8,
            u8,
            i16,
            u16,
            i32,
            u32,
            i64,
            u64,
            f32,
            f64,
            String,
            UAString,
            DateTime,
            Guid,
            StatusCode,
            ByteString,
            QualifiedName,
            LocalizedText,
            NodeId,
            ExpandedNodeId,
            ExtensionObject,
            DataValue,
            DiagnosticInfo,
            Array,
            Vec<u8>,
            Vec<Vec<u8>>,
            Vec<bool>,
            Vec<i8>,
            Vec<i16>,
            Vec<u16>,
            Vec<i32>,
            Vec<u32>,
            Vec<i64>,
            Vec<u64>,
            Vec<f32>,
            Vec<f64>,
            Vec<String>,
            Vec<UAString>,
            Vec<DateTime>,
            Vec<Guid>,
            Vec<StatusCode>,
            Vec<ByteString>,
            Vec<QualifiedName>,
            Vec<LocalizedText>,
            Vec<NodeId>,
            Vec<ExpandedNodeId>,
            Vec<ExtensionObject>,
            Vec<DataValue>,
            Vec<DiagnosticInfo>,
        );
        error!("Cannot construct a variant from a value of an unsupported type");
        Err(StatusCode::BadInvalidArgument)
    }

    /// Constructs a variant holding the underlying `Int32` of an enumerated value.
    pub fn from_enumeration<E>(value: E) -> Variant
    where
        E: Enumeration,
    {
        Variant::Int32(value.value())
    }

    /// Constructs a variant holding a structure inside an extension object.
    pub fn from_structure<T>(value: &T) -> Result<Variant, StatusCode>
    where
        T: Structure,
    {
        ExtensionObject::from_structure(value).map(Variant::from)
    }

    /// Extracts a structure from a variant holding an extension object.
    pub fn to_structure<T>(&self) -> Result<T, StatusCode>
    where
        T: Structure,
    {
        match self {
            Variant::ExtensionObject(ref v) => v.to_structure(),
            _ => Err(StatusCode::BadTypeMismatch),
        }
    }

    /// Constructs an xml element. `UAString` and `XmlElement` share a representation so this
    /// cannot be a `From`.
    pub fn xml_element<T>(value: T) -> Variant
    where
        T: Into<XmlElement>,
    {
        Variant::XmlElement(value.into())
    }

    pub fn type_id(&self) -> VariantTypeId {
        match self {
            Variant::Empty => VariantTypeId::Empty,
            Variant::Boolean(_) => VariantTypeId::Boolean,
            Variant::SByte(_) => VariantTypeId::SByte,
            Variant::Byte(_) => VariantTypeId::Byte,
            Variant::Int16(_) => VariantTypeId::Int16,
            Variant::UInt16(_) => VariantTypeId::UInt16,
            Variant::Int32(_) => VariantTypeId::Int32,
            Variant::UInt32(_) => VariantTypeId::UInt32,
            Variant::Int64(_) => VariantTypeId::Int64,
            Variant::UInt64(_) => VariantTypeId::UInt64,
            Variant::Float(_) => VariantTypeId::Float,
            Variant::Double(_) => VariantTypeId::Double,
            Variant::String(_) => VariantTypeId::String,
            Variant::DateTime(_) => VariantTypeId::DateTime,
            Variant::Guid(_) => VariantTypeId::Guid,
            Variant::ByteString(_) => VariantTypeId::ByteString,
            Variant::XmlElement(_) => VariantTypeId::XmlElement,
            Variant::NodeId(_) => VariantTypeId::NodeId,
            Variant::ExpandedNodeId(_) => VariantTypeId::ExpandedNodeId,
            Variant::StatusCode(_) => VariantTypeId::StatusCode,
            Variant::QualifiedName(_) => VariantTypeId::QualifiedName,
            Variant::LocalizedText(_) => VariantTypeId::LocalizedText,
            Variant::ExtensionObject(_) => VariantTypeId::ExtensionObject,
            Variant::DataValue(_) => VariantTypeId::DataValue,
            Variant::DiagnosticInfo(_) => VariantTypeId::DiagnosticInfo,
            Variant::Array(_) => VariantTypeId::Array,
        }
    }

    /// The element type of the value. For a scalar this is its own type, for an array it is
    /// the type of the elements, however many dimensions the array has.
    pub fn composite_type(&self) -> VariantTypeId {
        match self {
            Variant::Array(array) => array.value_type(),
            _ => self.type_id(),
        }
    }

    /// The built-in data type of the elements as a node id in namespace 0
    pub fn data_type(&self) -> Option<NodeId> {
        self.composite_type()
            .data_type_id()
            .map(|id| NodeId::numeric(0, id))
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Variant::Empty)
    }

    /// Test if the variant holds an array
    pub fn is_array(&self) -> bool {
        matches!(self, Variant::Array(_))
    }

    pub fn is_array_of_type(&self, variant_type: VariantTypeId) -> bool {
        // A non-numeric value in the array means it is not numeric
        match self {
            Variant::Array(array) => values_are_of_type(array.values(), variant_type),
            _ => false,
        }
    }

    /// Tests and returns true if the variant holds a numeric type
    pub fn is_numeric(&self) -> bool {
        self.type_id().is_numeric()
    }

    /// Tests if the variant holds a number. A boolean counts as a number, 1 or 0.
    pub fn is_number(&self) -> bool {
        self.is_numeric() || matches!(self, Variant::Boolean(_))
    }

    /// Tests if the variant holds a scalar value with a natural order.
    pub fn is_comparable(&self) -> bool {
        self.type_id().is_comparable()
    }

    /// The dimensions of an array value, `None` for a scalar. A one dimensional array reports
    /// its length.
    pub fn array_dimensions(&self) -> Option<Vec<u32>> {
        match self {
            Variant::Array(array) if array.has_dimensions() => Some(array.dimensions().to_vec()),
            Variant::Array(array) => Some(vec![array.len() as u32]),
            _ => None,
        }
    }

    /// The number of dimensions, 0 for a scalar.
    pub fn dimension(&self) -> usize {
        match self {
            Variant::Array(array) => array.rank(),
            _ => 0,
        }
    }

    /// Converts the numeric type to a double or returns None
    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            Variant::SByte(value) => Some(value as f64),
            Variant::Byte(value) => Some(value as f64),
            Variant::Int16(value) => Some(value as f64),
            Variant::UInt16(value) => Some(value as f64),
            Variant::Int32(value) => Some(value as f64),
            Variant::UInt32(value) => Some(value as f64),
            Variant::Int64(value) => {
                // NOTE: Int64 could overflow
                Some(value as f64)
            }
            Variant::UInt64(value) => {
                // NOTE: UInt64 could overflow
                Some(value as f64)
            }
            Variant::Float(value) => Some(value as f64),
            Variant::Double(value) => Some(value),
            _ => None,
        }
    }

    /// Converts the integer type to an i128, which holds every integer type without loss.
    pub(crate) fn as_i128(&self) -> Option<i128> {
        match *self {
            Variant::SByte(value) => Some(value as i128),
            Variant::Byte(value) => Some(value as i128),
            Variant::Int16(value) => Some(value as i128),
            Variant::UInt16(value) => Some(value as i128),
            Variant::Int32(value) => Some(value as i128),
            Variant::UInt32(value) => Some(value as i128),
            Variant::Int64(value) => Some(value as i128),
            Variant::UInt64(value) => Some(value as i128),
            _ => None,
        }
    }

    /// Returns the array held by the variant, if it is one
    pub fn as_array(&self) -> Option<&Array> {
        match self {
            Variant::Array(array) => Some(array),
            _ => None,
        }
    }
}
