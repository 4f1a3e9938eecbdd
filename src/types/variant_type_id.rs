// OPCUA for Rust
// SPDX-License-Identifier: MPL-2.0
// Copyright (C) 2017-2024 Adam Lock

use std::fmt;

/// The variant type id is the type of the variant but without its payload.
///
/// `Variant` only appears as the element type of an array whose elements are of mixed type.
/// `Array` is the type of a variant holding an array, the element type is held by the array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VariantTypeId {
    // Null / Empty
    Empty,
    // Scalar types
    Boolean,
    SByte,
    Byte,
    Int16,
    UInt16,
    Int32,
    UInt32,
    Int64,
    UInt64,
    Float,
    Double,
    String,
    DateTime,
    Guid,
    StatusCode,
    ByteString,
    XmlElement,
    QualifiedName,
    LocalizedText,
    NodeId,
    ExpandedNodeId,
    ExtensionObject,
    Variant,
    DataValue,
    DiagnosticInfo,
    Array,
}

impl fmt::Display for VariantTypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl VariantTypeId {
    /// Tests and returns true if the type is numeric
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            VariantTypeId::SByte
                | VariantTypeId::Byte
                | VariantTypeId::Int16
                | VariantTypeId::UInt16
                | VariantTypeId::Int32
                | VariantTypeId::UInt32
                | VariantTypeId::Int64
                | VariantTypeId::UInt64
                | VariantTypeId::Float
                | VariantTypeId::Double
        )
    }

    /// Tests if the type is one of the integer types
    pub fn is_integer(&self) -> bool {
        self.is_numeric() && !matches!(self, VariantTypeId::Float | VariantTypeId::Double)
    }

    /// Tests if values of the type have a natural order
    pub fn is_comparable(&self) -> bool {
        self.is_numeric()
            || matches!(
                self,
                VariantTypeId::Boolean
                    | VariantTypeId::String
                    | VariantTypeId::DateTime
                    | VariantTypeId::Guid
                    | VariantTypeId::StatusCode
                    | VariantTypeId::ByteString
                    | VariantTypeId::NodeId
                    | VariantTypeId::ExpandedNodeId
            )
    }

    /// Tests if the type may be the element type of an array
    pub fn is_valid_element_type(&self) -> bool {
        !matches!(self, VariantTypeId::Empty | VariantTypeId::Array)
    }

    /// The numeric id of the built-in data type in namespace 0, OPC UA part 6 table 1. Arrays and
    /// the empty type have none.
    pub fn data_type_id(&self) -> Option<u32> {
        let id = match self {
            VariantTypeId::Boolean => 1,
            VariantTypeId::SByte => 2,
            VariantTypeId::Byte => 3,
            VariantTypeId::Int16 => 4,
            VariantTypeId::UInt16 => 5,
            VariantTypeId::Int32 => 6,
            VariantTypeId::UInt32 => 7,
            VariantTypeId::Int64 => 8,
            VariantTypeId::UInt64 => 9,
            VariantTypeId::Float => 10,
            VariantTypeId::Double => 11,
            VariantTypeId::String => 12,
            VariantTypeId::DateTime => 13,
            VariantTypeId::Guid => 14,
            VariantTypeId::ByteString => 15,
            VariantTypeId::XmlElement => 16,
            VariantTypeId::NodeId => 17,
            VariantTypeId::ExpandedNodeId => 18,
            VariantTypeId::StatusCode => 19,
            VariantTypeId::QualifiedName => 20,
            VariantTypeId::LocalizedText => 21,
            VariantTypeId::ExtensionObject => 22,
            VariantTypeId::DataValue => 23,
            VariantTypeId::Variant => 24,
            VariantTypeId::DiagnosticInfo => 25,
            VariantTypeId::Empty | VariantTypeId::Array => return None,
        };
        Some(id)
    }

    /// Returns a data precedence rank for scalar types, OPC UA part 4 table 119. This is used
    /// when operators are comparing values of differing types. The type with
    /// the highest precedence dictates how values are converted in order to be compared.
    pub fn precedence(&self) -> u8 {
        match self {
            VariantTypeId::Double => 1,
            VariantTypeId::Float => 2,
            VariantTypeId::Int64 => 3,
            VariantTypeId::UInt64 => 4,
            VariantTypeId::Int32 => 5,
            VariantTypeId::UInt32 => 6,
            VariantTypeId::StatusCode => 7,
            VariantTypeId::Int16 => 8,
            VariantTypeId::UInt16 => 9,
            VariantTypeId::SByte => 10,
            VariantTypeId::Byte => 11,
            VariantTypeId::Boolean => 12,
            VariantTypeId::Guid => 13,
            VariantTypeId::String => 14,
            VariantTypeId::ExpandedNodeId => 15,
            VariantTypeId::NodeId => 16,
            VariantTypeId::LocalizedText => 17,
            VariantTypeId::QualifiedName => 18,
            _ => 100,
        }
    }
}
