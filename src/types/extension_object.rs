// OPCUA for Rust
// SPDX-License-Identifier: MPL-2.0
// Copyright (C) 2017-2022 Adam Lock

//! Contains the implementation of `ExtensionObject` and the `Structure` trait for values that
//! travel inside one.

use serde::{de::DeserializeOwned, Serialize};

use super::{byte_string::ByteString, node_id::NodeId, status_code::StatusCode, string::XmlElement};

/// A structured type that can be placed in a `Variant`. The value is carried inside an
/// `ExtensionObject` identified by the structure's data type id.
pub trait Structure: Serialize + DeserializeOwned {
    /// The node id of the structure's data type.
    fn type_id() -> NodeId;
}

/// Enumeration that holds the kinds of encoding that an ExtensionObject data may be encoded with.
#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub enum ExtensionObjectEncoding {
    /// For an extension object with nothing encoded with it
    None,
    /// For an extension object with data encoded in a ByteString
    ByteString(ByteString),
    /// For an extension object with data encoded in an XML string
    XmlElement(XmlElement),
    /// For an extension object with data held as a JSON value
    Json(serde_json::Value),
}

/// An extension object holds a serialized object identified by its node id.
#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct ExtensionObject {
    pub node_id: NodeId,
    pub body: ExtensionObjectEncoding,
}

impl Default for ExtensionObject {
    fn default() -> Self {
        Self::null()
    }
}

impl ExtensionObject {
    /// Creates a null extension object, i.e. one with no value or payload
    pub fn null() -> ExtensionObject {
        ExtensionObject {
            node_id: NodeId::null(),
            body: ExtensionObjectEncoding::None,
        }
    }

    /// Tests for null node id.
    pub fn is_null(&self) -> bool {
        self.node_id.is_null()
    }

    /// Tests for empty body.
    pub fn is_empty(&self) -> bool {
        self.is_null() || matches!(self.body, ExtensionObjectEncoding::None)
    }

    /// Creates an extension object holding opaque bytes for the given data type.
    pub fn from_bytes<N>(node_id: N, bytes: ByteString) -> ExtensionObject
    where
        N: Into<NodeId>,
    {
        ExtensionObject {
            node_id: node_id.into(),
            body: ExtensionObjectEncoding::ByteString(bytes),
        }
    }

    /// Creates an extension object with the structure as its payload. The body is a JSON value.
    pub fn from_structure<T>(structure: &T) -> Result<ExtensionObject, StatusCode>
    where
        T: Structure,
    {
        let body = serde_json::to_value(structure).map_err(|err| {
            error!("Cannot serialize structure {}, error = {}", T::type_id(), err);
            StatusCode::BadEncodingError
        })?;
        Ok(ExtensionObject {
            node_id: T::type_id(),
            body: ExtensionObjectEncoding::Json(body),
        })
    }

    /// Extracts a structure from the payload. The node id must match the structure's data
    /// type and the body must be JSON.
    pub fn to_structure<T>(&self) -> Result<T, StatusCode>
    where
        T: Structure,
    {
        if self.node_id != T::type_id() {
            error!(
                "Extension object type {} does not match structure type {}",
                self.node_id,
                T::type_id()
            );
            return Err(StatusCode::BadDataTypeIdUnknown);
        }
        match self.body {
            ExtensionObjectEncoding::Json(ref value) => {
                serde_json::from_value(value.clone()).map_err(|err| {
                    error!("Cannot deserialize structure {}, error = {}", self.node_id, err);
                    StatusCode::BadDecodingError
                })
            }
            _ => {
                error!("to_structure called on an extension object without a JSON body");
                Err(StatusCode::BadDecodingError)
            }
        }
    }
}
