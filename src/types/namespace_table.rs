// OPCUA for Rust
// SPDX-License-Identifier: MPL-2.0
// Copyright (C) 2017-2022 Adam Lock

//! Tables that map namespace and server indices to their URIs.

use std::{fmt, ops::Deref, ops::DerefMut};

use crate::core::bijection_map::BijectionMap;
use crate::types::{
    expanded_node_id::ExpandedNodeId, node_id::NodeId, status_code::StatusCode, OPCUA_NAMESPACE,
};

/// A one to one table of indices and URIs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UriTable {
    index_uri_map: BijectionMap<u32, String>,
}

impl fmt::Display for UriTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, uri) in self.to_vec().iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            match uri {
                Some(uri) => write!(f, "{}", uri)?,
                None => write!(f, "null")?,
            }
        }
        write!(f, "]")
    }
}

impl UriTable {
    pub fn new() -> UriTable {
        UriTable::default()
    }

    /// Adds the URI at the next free index, i.e. one past the highest index in use. If the URI
    /// is already in the table its existing index is returned.
    pub fn add(&mut self, uri: &str) -> u32 {
        if let Some(index) = self.get_index(uri) {
            return index;
        }
        let index = self.next_index();
        self.index_uri_map.map(index, uri.to_string());
        index
    }

    /// Adds the URI at the given index. If the URI is already in the table its existing index is
    /// returned. Fails if the index already holds a different URI.
    pub fn add_at(&mut self, index: u32, uri: &str) -> Result<u32, StatusCode> {
        if let Some(existing) = self.get_index(uri) {
            return Ok(existing);
        }
        if let Some(existing) = self.get_uri(index) {
            error!(
                "Index {} already holds uri {}, cannot add {}",
                index, existing, uri
            );
            return Err(StatusCode::BadInvalidArgument);
        }
        self.index_uri_map.map(index, uri.to_string());
        Ok(index)
    }

    /// Adds every URI at its position in the array.
    pub fn add_all(&mut self, uris: &[&str]) -> Result<(), StatusCode> {
        for (index, uri) in uris.iter().enumerate() {
            self.add_at(index as u32, uri)?;
        }
        Ok(())
    }

    pub fn get_uri(&self, index: u32) -> Option<&str> {
        self.index_uri_map.get_right(&index).map(|uri| uri.as_str())
    }

    pub fn get_index(&self, uri: &str) -> Option<u32> {
        self.index_uri_map.get_left(&uri.to_string()).copied()
    }

    pub fn remove_index(&mut self, index: u32) -> Option<String> {
        self.index_uri_map.remove_with_left(&index)
    }

    pub fn remove_uri(&mut self, uri: &str) -> Option<u32> {
        self.index_uri_map.remove_with_right(&uri.to_string())
    }

    /// The URIs in index order. Unused indices below the highest index are `None`.
    pub fn to_vec(&self) -> Vec<Option<String>> {
        (0..self.next_index())
            .map(|i| self.get_uri(i).map(|uri| uri.to_string()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.index_uri_map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index_uri_map.is_empty()
    }

    fn next_index(&self) -> u32 {
        self.index_uri_map
            .iter()
            .map(|(i, _)| *i + 1)
            .max()
            .unwrap_or(0)
    }
}

/// The namespace table of a server. Index 0 always holds the standard OPC UA namespace.
#[derive(Debug, Clone, PartialEq)]
pub struct NamespaceTable {
    uris: UriTable,
}

impl Default for NamespaceTable {
    fn default() -> Self {
        Self::new()
    }
}

impl Deref for NamespaceTable {
    type Target = UriTable;

    fn deref(&self) -> &UriTable {
        &self.uris
    }
}

impl DerefMut for NamespaceTable {
    fn deref_mut(&mut self) -> &mut UriTable {
        &mut self.uris
    }
}

impl fmt::Display for NamespaceTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.uris.fmt(f)
    }
}

impl NamespaceTable {
    pub fn new() -> NamespaceTable {
        let mut uris = UriTable::new();
        uris.index_uri_map.map(0, OPCUA_NAMESPACE.to_string());
        NamespaceTable { uris }
    }

    /// Creates a table from a namespace array, each URI at its position in the array
    pub fn from_array(namespaces: &[&str]) -> Result<NamespaceTable, StatusCode> {
        let mut table = NamespaceTable::new();
        table.add_all(namespaces)?;
        Ok(table)
    }

    /// Makes an expanded node id that names its namespace by URI. An index with no URI in the
    /// table keeps the index.
    pub fn to_expanded_node_id(&self, node_id: &NodeId) -> ExpandedNodeId {
        match self.get_uri(u32::from(node_id.namespace())) {
            Some(uri) => ExpandedNodeId::with_uri(0, uri, node_id.identifier().clone())
                .unwrap_or_else(|_| ExpandedNodeId::from(node_id)),
            None => ExpandedNodeId::from(node_id),
        }
    }

    /// Resolves an expanded node id to a node id in this table's index space. Fails with
    /// `BadInvalidArgument` if the id refers to another server, or `BadNotFound` if its
    /// namespace URI is not in the table.
    pub fn to_node_id(&self, expanded_node_id: &ExpandedNodeId) -> Result<NodeId, StatusCode> {
        if expanded_node_id.is_null() {
            return Ok(NodeId::null());
        }
        if !expanded_node_id.is_local() {
            error!(
                "Cannot convert {} with a server index to a node id",
                expanded_node_id
            );
            return Err(StatusCode::BadInvalidArgument);
        }
        let namespace = self.resolve_namespace(expanded_node_id).ok_or_else(|| {
            error!(
                "Namespace uri {} of {} is not in the namespace table",
                expanded_node_id.namespace_uri(),
                expanded_node_id
            );
            StatusCode::BadNotFound
        })?;
        NodeId::new(namespace, expanded_node_id.identifier().clone())
    }

    /// Tests if a node id and an expanded node id identify the same node, resolving the
    /// expanded node id's namespace URI through this table.
    pub fn node_id_equals(&self, node_id: &NodeId, expanded_node_id: &ExpandedNodeId) -> bool {
        if node_id.is_null() || expanded_node_id.is_null() {
            return node_id.is_null() && expanded_node_id.is_null();
        }
        expanded_node_id.is_local()
            && node_id.identifier() == expanded_node_id.identifier()
            && self.resolve_namespace(expanded_node_id) == Some(node_id.namespace())
    }

    /// Tests if two expanded node ids identify the same node, resolving namespace URIs through
    /// this table.
    pub fn expanded_node_id_equals(&self, a: &ExpandedNodeId, b: &ExpandedNodeId) -> bool {
        if a.is_null() || b.is_null() {
            return a.is_null() && b.is_null();
        }
        a.server_index() == b.server_index()
            && a.identifier() == b.identifier()
            && self.namespace_equals(a, b)
    }

    /// Tests if two expanded node ids are in the same namespace. An unknown URI never matches.
    pub fn namespace_equals(&self, a: &ExpandedNodeId, b: &ExpandedNodeId) -> bool {
        match (self.resolve_namespace(a), self.resolve_namespace(b)) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }

    fn resolve_namespace(&self, expanded_node_id: &ExpandedNodeId) -> Option<u16> {
        if expanded_node_id.has_namespace_uri() {
            self.get_index(expanded_node_id.namespace_uri().as_ref())
                .and_then(|i| u16::try_from(i).ok())
        } else {
            Some(expanded_node_id.namespace())
        }
    }
}

/// The server table maps server indices, as used by remote expanded node ids, to server URIs.
/// Index 0 is the local server.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ServerTable {
    uris: UriTable,
}

impl Deref for ServerTable {
    type Target = UriTable;

    fn deref(&self) -> &UriTable {
        &self.uris
    }
}

impl DerefMut for ServerTable {
    fn deref_mut(&mut self) -> &mut UriTable {
        &mut self.uris
    }
}

impl fmt::Display for ServerTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.uris.fmt(f)
    }
}

impl ServerTable {
    /// Creates a table whose index 0 is the local server's URI
    pub fn new(local_server_uri: &str) -> ServerTable {
        let mut uris = UriTable::new();
        uris.add(local_server_uri);
        ServerTable { uris }
    }

    /// Creates a table from a server array, each URI at its position in the array
    pub fn from_array(servers: &[&str]) -> Result<ServerTable, StatusCode> {
        let mut table = ServerTable::default();
        table.add_all(servers)?;
        Ok(table)
    }

    /// The URI of the server an expanded node id refers to
    pub fn server_uri(&self, expanded_node_id: &ExpandedNodeId) -> Option<&str> {
        self.get_uri(expanded_node_id.server_index())
    }
}
