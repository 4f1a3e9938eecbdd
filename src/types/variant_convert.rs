// OPCUA for Rust
// SPDX-License-Identifier: MPL-2.0
// Copyright (C) 2017-2022 Adam Lock

//! Implicit conversions, typed accessors and comparisons of `Variant` values.
//!
//! Conversions follow OPC UA Part 4 table 118. A conversion that the table marks as explicit
//! or as an error is refused with `BadTypeMismatch`.

use std::{cmp::Ordering, str::FromStr};

use crate::types::{
    expanded_node_id::ExpandedNodeId,
    guid::Guid,
    localized_text::LocalizedText,
    node_id::NodeId,
    status_code::StatusCode,
    string::UAString,
    variant::{Variant, VariantTypeId},
    OPCUA_NAMESPACE,
};

/// Converts an integer held as `i128` into the target integer variant, failing if it does not fit.
macro_rules! integer_to {
    ($v: expr, $t: ty) => {
        <$t>::try_from($v)
            .map(Variant::from)
            .map_err(|_| StatusCode::BadTypeMismatch)
    };
}

/// Parses a string into the target variant, failing if it is malformed.
macro_rules! parse_to {
    ($v: expr, $t: ty) => {
        <$t>::from_str($v)
            .map(Variant::from)
            .map_err(|_| StatusCode::BadTypeMismatch)
    };
}

impl Variant {
    /// Performs an IMPLICIT conversion from one type to another. Converting to the variant's own
    /// type returns a clone. Widening numeric conversions always succeed, narrowing ones only
    /// when the value fits, and strings convert to numbers, booleans and ids when they parse.
    pub fn convert(&self, target_type: VariantTypeId) -> Result<Variant, StatusCode> {
        if self.type_id() == target_type {
            return Ok(self.clone());
        }
        let result = match self {
            Variant::Boolean(v) => match target_type {
                VariantTypeId::StatusCode => Err(StatusCode::BadTypeMismatch),
                // true == 1, false == 0
                _ => Variant::from(*v as u8).convert_integer(target_type),
            },
            Variant::SByte(_)
            | Variant::Byte(_)
            | Variant::Int16(_)
            | Variant::UInt16(_)
            | Variant::Int32(_)
            | Variant::UInt32(_)
            | Variant::Int64(_)
            | Variant::UInt64(_) => self.convert_integer(target_type),
            Variant::Float(v) => match target_type {
                VariantTypeId::Double => Ok(Variant::from(*v as f64)),
                _ => Err(StatusCode::BadTypeMismatch),
            },
            Variant::StatusCode(v) => match target_type {
                VariantTypeId::Int32 => Ok(Variant::from(v.bits() as i32)),
                VariantTypeId::Int64 => Ok(Variant::from(v.bits() as i64)),
                VariantTypeId::UInt32 => Ok(Variant::from(v.bits())),
                VariantTypeId::UInt64 => Ok(Variant::from(v.bits() as u64)),
                _ => Err(StatusCode::BadTypeMismatch),
            },
            Variant::String(v) => Self::convert_string(v, target_type),
            Variant::NodeId(v) => match target_type {
                VariantTypeId::ExpandedNodeId => Ok(Variant::from(ExpandedNodeId::from(v.as_ref()))),
                VariantTypeId::String => Ok(Variant::from(v.to_string())),
                _ => Err(StatusCode::BadTypeMismatch),
            },
            Variant::ExpandedNodeId(v) => match target_type {
                VariantTypeId::String => Ok(Variant::from(v.to_string())),
                // Only a local id without a foreign namespace uri degenerates to a node id
                VariantTypeId::NodeId
                    if v.is_local()
                        && (!v.has_namespace_uri() || v.namespace_uri().as_ref() == OPCUA_NAMESPACE) =>
                {
                    Ok(Variant::from(v.node_id().clone()))
                }
                _ => Err(StatusCode::BadTypeMismatch),
            },
            Variant::LocalizedText(v) => match target_type {
                VariantTypeId::String => Ok(Variant::from(v.text.clone())),
                _ => Err(StatusCode::BadTypeMismatch),
            },
            Variant::QualifiedName(v) => match target_type {
                // The namespace index is dropped
                VariantTypeId::String => Ok(Variant::from(v.name.clone())),
                VariantTypeId::LocalizedText if v.is_null() => {
                    Ok(Variant::from(LocalizedText::null()))
                }
                VariantTypeId::LocalizedText => Ok(Variant::from(LocalizedText {
                    locale: UAString::from(""),
                    text: v.name.clone(),
                })),
                _ => Err(StatusCode::BadTypeMismatch),
            },
            Variant::Guid(v) => match target_type {
                VariantTypeId::String => Ok(Variant::from(v.to_string())),
                _ => Err(StatusCode::BadTypeMismatch),
            },
            // Arrays, Double, DateTime, ByteString and the structured types only convert to
            // themselves
            _ => Err(StatusCode::BadTypeMismatch),
        };
        if result.is_err() {
            trace!("No implicit conversion of {:?} to {}", self, target_type);
        }
        result
    }

    fn convert_integer(&self, target_type: VariantTypeId) -> Result<Variant, StatusCode> {
        let v = self.as_i128().ok_or(StatusCode::BadTypeMismatch)?;
        match target_type {
            VariantTypeId::Boolean => Ok(Variant::from(v != 0)),
            VariantTypeId::SByte => integer_to!(v, i8),
            VariantTypeId::Byte => integer_to!(v, u8),
            VariantTypeId::Int16 => integer_to!(v, i16),
            VariantTypeId::UInt16 => integer_to!(v, u16),
            VariantTypeId::Int32 => integer_to!(v, i32),
            VariantTypeId::UInt32 => integer_to!(v, u32),
            VariantTypeId::Int64 => integer_to!(v, i64),
            VariantTypeId::UInt64 => integer_to!(v, u64),
            VariantTypeId::Float => Ok(Variant::from(v as f32)),
            VariantTypeId::Double => Ok(Variant::from(v as f64)),
            VariantTypeId::StatusCode => match self {
                // The 16-bit value is treated as the top 16 bits of the status code
                Variant::UInt16(v) => Ok(Variant::from(StatusCode::from_bits((*v as u32) << 16))),
                Variant::UInt32(v) => Ok(Variant::from(StatusCode::from_bits(*v))),
                _ => Err(StatusCode::BadTypeMismatch),
            },
            _ => Err(StatusCode::BadTypeMismatch),
        }
    }

    fn convert_string(v: &UAString, target_type: VariantTypeId) -> Result<Variant, StatusCode> {
        if v.is_empty() {
            return Err(StatusCode::BadTypeMismatch);
        }
        let s = v.as_ref().trim();
        match target_type {
            VariantTypeId::Boolean => parse_boolean(s)
                .map(Variant::from)
                .ok_or(StatusCode::BadTypeMismatch),
            VariantTypeId::SByte => parse_to!(s, i8),
            VariantTypeId::Byte => parse_to!(s, u8),
            VariantTypeId::Int16 => parse_to!(s, i16),
            VariantTypeId::UInt16 => parse_to!(s, u16),
            VariantTypeId::Int32 => parse_to!(s, i32),
            VariantTypeId::UInt32 => parse_to!(s, u32),
            VariantTypeId::Int64 => parse_to!(s, i64),
            VariantTypeId::UInt64 => parse_to!(s, u64),
            VariantTypeId::Float => parse_to!(s, f32),
            VariantTypeId::Double => parse_to!(s, f64),
            VariantTypeId::Guid => parse_to!(s, Guid),
            VariantTypeId::NodeId => parse_to!(s, NodeId),
            VariantTypeId::ExpandedNodeId => parse_to!(s, ExpandedNodeId),
            VariantTypeId::LocalizedText => Ok(Variant::from(LocalizedText::from(s))),
            _ => Err(StatusCode::BadTypeMismatch),
        }
    }

    /// Returns the value as a boolean. Booleans are returned as is, numbers are true when non
    /// zero and the strings "true", "1", "false" and "0" (in any case) are parsed. Anything else
    /// is a `BadTypeMismatch`.
    pub fn boolean_value(&self) -> Result<bool, StatusCode> {
        match self {
            Variant::Boolean(v) => Ok(*v),
            Variant::String(v) if !v.is_null() => {
                parse_boolean(v.as_ref()).ok_or_else(|| {
                    error!("Cannot read \"{}\" as a boolean", v);
                    StatusCode::BadTypeMismatch
                })
            }
            _ => self.as_f64().map(|v| v != 0.0).ok_or_else(|| {
                error!("Cannot read {:?} as a boolean", self);
                StatusCode::BadTypeMismatch
            }),
        }
    }

    /// Returns the number as a signed byte. Wider integers are truncated like a numeric cast.
    /// Floating point values go through an int first, so they saturate at the int range and
    /// are then truncated.
    pub fn byte_value(&self) -> Result<i8, StatusCode> {
        self.number().map(|n| n.as_i32() as i8)
    }

    /// Returns the number as a short, truncated the same way as `byte_value`.
    pub fn short_value(&self) -> Result<i16, StatusCode> {
        self.number().map(|n| n.as_i32() as i16)
    }

    /// Returns the number as an int. Wider integers are truncated, floating point values are
    /// rounded toward zero and saturate at the int range. NaN is 0.
    pub fn int_value(&self) -> Result<i32, StatusCode> {
        self.number().map(|n| n.as_i32())
    }

    /// Returns the number as a long. Floating point values are rounded toward zero and
    /// saturate at the long range.
    pub fn long_value(&self) -> Result<i64, StatusCode> {
        self.number().map(|n| n.as_i64())
    }

    pub fn float_value(&self) -> Result<f32, StatusCode> {
        self.number().map(|n| n.as_f64() as f32)
    }

    pub fn double_value(&self) -> Result<f64, StatusCode> {
        self.number().map(|n| n.as_f64())
    }

    fn number(&self) -> Result<Number, StatusCode> {
        self.as_number().ok_or_else(|| {
            error!("{:?} is not a number", self);
            StatusCode::BadTypeMismatch
        })
    }

    /// Reads the value as a number. A boolean is 1 or 0.
    fn as_number(&self) -> Option<Number> {
        if let Variant::Boolean(v) = self {
            Some(Number::Integer(*v as i128))
        } else if let Some(v) = self.as_i128() {
            Some(Number::Integer(v))
        } else {
            self.as_f64().map(Number::Real)
        }
    }

    /// Compares two values. Empty sorts before anything else, numbers of any type (booleans
    /// included) compare by their floating point value and other values must be of the same
    /// comparable type or convert implicitly from one to the other. Values with no order fail
    /// with `BadTypeMismatch`.
    pub fn compare_to(&self, other: &Variant) -> Result<Ordering, StatusCode> {
        match (self, other) {
            (Variant::Empty, Variant::Empty) => return Ok(Ordering::Equal),
            (Variant::Empty, _) => return Ok(Ordering::Less),
            (_, Variant::Empty) => return Ok(Ordering::Greater),
            _ => {}
        }
        if let (Some(a), Some(b)) = (self.as_number(), other.as_number()) {
            return Ok(a.as_f64().total_cmp(&b.as_f64()));
        }
        if !self.is_comparable() || !other.is_comparable() {
            error!("Values {:?} and {:?} have no order", self, other);
            return Err(StatusCode::BadTypeMismatch);
        }
        if self.type_id() == other.type_id() {
            return Self::compare_same_type(self, other);
        }
        // Convert toward the type of higher precedence, then try the other way
        let (lhs, rhs) = (self.type_id(), other.type_id());
        let converted = if lhs.precedence() <= rhs.precedence() {
            other
                .convert(lhs)
                .map(|o| (self.clone(), o))
                .or_else(|_| self.convert(rhs).map(|s| (s, other.clone())))
        } else {
            self.convert(rhs)
                .map(|s| (s, other.clone()))
                .or_else(|_| other.convert(lhs).map(|o| (self.clone(), o)))
        };
        match converted {
            Ok((a, b)) => a.compare_to(&b),
            Err(err) => {
                error!("Values {:?} and {:?} cannot be compared", self, other);
                Err(err)
            }
        }
    }

    fn compare_same_type(a: &Variant, b: &Variant) -> Result<Ordering, StatusCode> {
        let ordering = match (a, b) {
            (Variant::Boolean(a), Variant::Boolean(b)) => a.cmp(b),
            (Variant::String(a), Variant::String(b)) => a.as_ref().cmp(b.as_ref()),
            (Variant::DateTime(a), Variant::DateTime(b)) => a.cmp(b),
            (Variant::Guid(a), Variant::Guid(b)) => a.as_bytes().cmp(b.as_bytes()),
            (Variant::StatusCode(a), Variant::StatusCode(b)) => a.bits().cmp(&b.bits()),
            (Variant::ByteString(a), Variant::ByteString(b)) => a.cmp(b),
            (Variant::NodeId(a), Variant::NodeId(b)) => a.cmp(b),
            (Variant::ExpandedNodeId(a), Variant::ExpandedNodeId(b)) => a.cmp(b),
            _ => return Err(StatusCode::BadTypeMismatch),
        };
        Ok(ordering)
    }

    /// Tests if two values are equal after conversion. Empty equals nothing, not even Empty.
    /// Values of the same type use their own equality, numbers compare by floating point value
    /// and otherwise one value is converted to the other's type in either direction. Fails with
    /// `BadTypeMismatch` when neither conversion exists.
    pub fn value_equals(&self, other: &Variant) -> Result<bool, StatusCode> {
        if self.is_empty() || other.is_empty() {
            return Ok(false);
        }
        if self.type_id() == other.type_id() {
            return Ok(self == other);
        }
        if let (Some(a), Some(b)) = (self.as_number(), other.as_number()) {
            return Ok(a.as_f64() == b.as_f64());
        }
        if let Ok(converted) = other.convert(self.type_id()) {
            Ok(*self == converted)
        } else if let Ok(converted) = self.convert(other.type_id()) {
            Ok(converted == *other)
        } else {
            error!("Values {:?} and {:?} cannot be compared for equality", self, other);
            Err(StatusCode::BadTypeMismatch)
        }
    }
}

/// A number read out of a variant, keeping integers exact until the final cast.
enum Number {
    Integer(i128),
    Real(f64),
}

impl Number {
    /// Integers wrap, reals saturate
    fn as_i32(&self) -> i32 {
        match *self {
            Number::Integer(v) => v as i32,
            Number::Real(v) => v as i32,
        }
    }

    fn as_i64(&self) -> i64 {
        match *self {
            Number::Integer(v) => v as i64,
            Number::Real(v) => v as i64,
        }
    }

    fn as_f64(&self) -> f64 {
        match *self {
            Number::Integer(v) => v as f64,
            Number::Real(v) => v,
        }
    }
}

fn parse_boolean(s: &str) -> Option<bool> {
    if s.eq_ignore_ascii_case("true") || s == "1" {
        Some(true)
    } else if s.eq_ignore_ascii_case("false") || s == "0" {
        Some(false)
    } else {
        None
    }
}
