// OPCUA for Rust
// SPDX-License-Identifier: MPL-2.0
// Copyright (C) 2017-2022 Adam Lock

use std::convert::TryFrom;

use crate::types::{variant::Variant, variant_type_id::VariantTypeId};
use crate::types::StatusCode;

/// An array is a vector of values with an optional number of dimensions.
///
/// The values are always held flat. A multi dimensional array keeps its dimensions alongside and
/// the product of the dimensions always equals the number of values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ArrayFields")]
pub struct Array {
    // Type of elements in the array
    value_type: VariantTypeId,

    /// Values are stored sequentially
    values: Vec<Variant>,

    /// Multi dimension array which can contain any scalar type, all the same type. Nested
    /// arrays are rejected. Higher rank dimensions are serialized first. For example an array
    /// with dimensions [2,2,2] is written in this order - [0,0,0], [0,0,1], [0,1,0], [0,1,1],
    /// [1,0,0], [1,0,1], [1,1,0], [1,1,1].
    dimensions: Vec<u32>,
}

/// Deserialized form of an `Array`, checked by the constructors before it becomes one.
#[derive(Deserialize)]
struct ArrayFields {
    value_type: VariantTypeId,
    values: Vec<Variant>,
    #[serde(default)]
    dimensions: Vec<u32>,
}

impl TryFrom<ArrayFields> for Array {
    type Error = StatusCode;

    fn try_from(fields: ArrayFields) -> Result<Self, Self::Error> {
        if fields.dimensions.is_empty() {
            Array::new_single(fields.value_type, fields.values)
        } else {
            Array::new_multi(fields.value_type, fields.values, fields.dimensions)
        }
    }
}

/// A value or a list of nested values, used to build a multi dimensional array from nested
/// data such as rows of a matrix.
#[derive(Debug, Clone, PartialEq)]
pub enum Nested {
    Value(Variant),
    List(Vec<Nested>),
}

impl Nested {
    pub fn value<T>(v: T) -> Nested
    where
        T: Into<Variant>,
    {
        Nested::Value(v.into())
    }

    pub fn list<I>(items: I) -> Nested
    where
        I: IntoIterator<Item = Nested>,
    {
        Nested::List(items.into_iter().collect())
    }
}

impl Array {
    /// Creates a one dimensional array. Every value must be of the value type, or the value
    /// type must be `Variant`.
    pub fn new_single<V>(value_type: VariantTypeId, values: V) -> Result<Array, StatusCode>
    where
        V: Into<Vec<Variant>>,
    {
        let values = values.into();
        Self::validate_array_type_to_values(value_type, &values)?;
        Ok(Array {
            value_type,
            values,
            dimensions: Vec::new(),
        })
    }

    /// Builds an array from values produced by converting a typed `Vec`, so they are known to
    /// be of the value type.
    pub(crate) fn from_typed_values(value_type: VariantTypeId, values: Vec<Variant>) -> Array {
        Array {
            value_type,
            values,
            dimensions: Vec::new(),
        }
    }

    /// Creates a multi dimensional array from flat values. The product of the dimensions must
    /// equal the number of values.
    pub fn new_multi<V, D>(
        value_type: VariantTypeId,
        values: V,
        dimensions: D,
    ) -> Result<Array, StatusCode>
    where
        V: Into<Vec<Variant>>,
        D: Into<Vec<u32>>,
    {
        let values = values.into();
        let dimensions = dimensions.into();
        Self::validate_array_type_to_values(value_type, &values)?;
        let length = dimensions
            .iter()
            .try_fold(1usize, |acc, d| acc.checked_mul(*d as usize));
        if dimensions.is_empty() || length != Some(values.len()) {
            error!(
                "Array dimensions {:?} do not match the number of values {}",
                dimensions,
                values.len()
            );
            return Err(StatusCode::BadInvalidArgument);
        }
        Ok(Array {
            value_type,
            values,
            dimensions,
        })
    }

    /// Creates an array from nested lists. The dimensions are found by walking down the first
    /// element of each level and every list at the same depth must have the same length.
    pub fn from_nested(value_type: VariantTypeId, nested: Vec<Nested>) -> Result<Array, StatusCode> {
        let mut dimensions = vec![nested.len() as u32];
        let mut level = nested.first();
        while let Some(Nested::List(items)) = level {
            dimensions.push(items.len() as u32);
            level = items.first();
        }

        let mut values = Vec::new();
        Self::flatten(nested, &dimensions, &mut values)?;
        if dimensions.len() == 1 {
            Self::new_single(value_type, values)
        } else {
            Self::new_multi(value_type, values, dimensions)
        }
    }

    fn flatten(
        items: Vec<Nested>,
        dimensions: &[u32],
        values: &mut Vec<Variant>,
    ) -> Result<(), StatusCode> {
        if items.len() != dimensions[0] as usize {
            error!(
                "Nested array is ragged, expected {} items, found {}",
                dimensions[0],
                items.len()
            );
            return Err(StatusCode::BadInvalidArgument);
        }
        for item in items {
            match (item, dimensions.len()) {
                (Nested::Value(v), 1) => values.push(v),
                (Nested::List(list), n) if n > 1 => Self::flatten(list, &dimensions[1..], values)?,
                _ => {
                    error!("Nested array mixes values and lists at the same depth");
                    return Err(StatusCode::BadInvalidArgument);
                }
            }
        }
        Ok(())
    }

    /// This is a runtime check to ensure the type of the array also matches the types of the
    /// variants in the array.
    fn validate_array_type_to_values(
        value_type: VariantTypeId,
        values: &[Variant],
    ) -> Result<(), StatusCode> {
        if !value_type.is_valid_element_type() {
            error!("Invalid array type {} supplied", value_type);
            Err(StatusCode::BadInvalidArgument)
        } else if value_type == VariantTypeId::Variant {
            // Mixed arrays hold any scalar but never another array
            if values.iter().any(|v| v.is_array()) {
                error!("Variant array contains a nested array");
                Err(StatusCode::BadInvalidArgument)
            } else {
                Ok(())
            }
        } else if !values_are_of_type(values, value_type) {
            Err(StatusCode::BadInvalidArgument)
        } else {
            Ok(())
        }
    }

    pub fn value_type(&self) -> VariantTypeId {
        self.value_type
    }

    pub fn values(&self) -> &[Variant] {
        &self.values
    }

    pub fn into_values(self) -> Vec<Variant> {
        self.values
    }

    /// The declared dimensions, empty for a one dimensional array.
    pub fn dimensions(&self) -> &[u32] {
        &self.dimensions
    }

    pub fn has_dimensions(&self) -> bool {
        !self.dimensions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The number of dimensions, at least 1.
    pub fn rank(&self) -> usize {
        self.dimensions.len().max(1)
    }

    /// Looks up a value by its index in each dimension.
    pub fn get(&self, index: &[u32]) -> Option<&Variant> {
        let dimensions = if self.has_dimensions() {
            self.dimensions.clone()
        } else {
            vec![self.values.len() as u32]
        };
        if index.len() != dimensions.len() {
            return None;
        }
        let mut offset = 0usize;
        for (i, d) in index.iter().zip(dimensions.iter()) {
            if i >= d {
                return None;
            }
            offset = offset * (*d as usize) + *i as usize;
        }
        self.values.get(offset)
    }
}

/// Check that all elements in the slice of arrays are the same type.
pub fn values_are_of_type(values: &[Variant], expected_type: VariantTypeId) -> bool {
    // Ensure all remaining elements are the same type as the first element
    let found_unexpected = values.iter().any(|v| v.type_id() != expected_type);
    if found_unexpected {
        error!(
            "Variant array's type is expected to be {:?} but found other types in it",
            expected_type
        );
    };
    !found_unexpected
}
