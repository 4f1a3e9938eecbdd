// OPCUA for Rust
// SPDX-License-Identifier: MPL-2.0
// Copyright (C) 2017-2022 Adam Lock

//! The OPC UA built-in types. Identity types (`NodeId`, `ExpandedNodeId`, `QualifiedName`,
//! `LocalizedText`), value types (`Variant`, `DataValue`, `StatusCode`, `DateTime`) and the
//! tables that map namespace / server indices to URIs.

/// The standard OPC UA namespace held at index 0 of every namespace table.
pub const OPCUA_NAMESPACE: &str = "http://opcfoundation.org/UA/";

/// Maximum length in characters of a string identifier, or in bytes of an opaque identifier.
pub const MAX_IDENTIFIER_LENGTH: usize = 4096;

pub use crate::types::{
    array::*, byte_string::ByteString, data_value::DataValue, date_time::*,
    diagnostic_info::DiagnosticInfo, expanded_node_id::ExpandedNodeId, extension_object::*,
    guid::Guid, localized_text::LocalizedText, namespace_table::*, node_id::*,
    qualified_name::QualifiedName, status_code::*, string::*, variant::*,
    variant_type_id::VariantTypeId,
};

pub mod array;
pub mod byte_string;
pub mod data_value;
pub mod date_time;
pub mod diagnostic_info;
pub mod expanded_node_id;
pub mod extension_object;
pub mod guid;
pub mod localized_text;
pub mod namespace_table;
pub mod node_id;
pub mod qualified_name;
pub mod status_code;
pub mod status_codes;
pub mod string;
pub mod variant;
pub mod variant_convert;
pub mod variant_type_id;

#[cfg(test)]
mod tests;
