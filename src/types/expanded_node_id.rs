// OPCUA for Rust
// SPDX-License-Identifier: MPL-2.0
// Copyright (C) 2017-2022 Adam Lock

//! Contains the implementation of `ExpandedNodeId`.

use std::{
    self,
    cmp::Ordering,
    fmt,
    hash::{Hash, Hasher},
    str::FromStr,
};

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::types::{
    node_id::{IdType, Identifier, NodeId},
    status_code::StatusCode,
    string::*,
    OPCUA_NAMESPACE,
};

/// A NodeId that allows the namespace URI to be specified instead of an index, and which may
/// refer to a node on another server through a server index.
///
/// A namespace URI, when present, takes precedence over the namespace index. Non-null ids in
/// namespace 0 always carry the standard OPC UA namespace URI.
#[derive(Debug, Clone)]
pub struct ExpandedNodeId {
    node_id: NodeId,
    namespace_uri: UAString,
    server_index: u32,
}

impl PartialEq for ExpandedNodeId {
    fn eq(&self, other: &Self) -> bool {
        match (self.is_null(), other.is_null()) {
            (true, true) => return true,
            (false, false) => {}
            _ => return false,
        }
        if self.has_namespace_uri() {
            if self.namespace_uri.as_ref() != other.namespace_uri.as_ref() {
                return false;
            }
        } else if other.has_namespace_uri() || self.namespace() != other.namespace() {
            return false;
        }
        self.server_index == other.server_index && self.identifier() == other.identifier()
    }
}

impl Eq for ExpandedNodeId {}

impl Hash for ExpandedNodeId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        if self.is_null() {
            u32::MAX.hash(state);
        } else {
            self.server_index.hash(state);
            if self.has_namespace_uri() {
                self.namespace_uri.as_ref().hash(state);
            } else {
                self.namespace().hash(state);
            }
            self.identifier().hash(state);
        }
    }
}

/// Cross type equality holds only when the expanded id is local and has no namespace URI other
/// than the standard one, i.e. when it degenerates into a plain node id.
fn node_id_equals(node_id: &NodeId, expanded: &ExpandedNodeId) -> bool {
    match (node_id.is_null(), expanded.is_null()) {
        (true, true) => true,
        (false, false) => {
            if !expanded.is_local() {
                false
            } else if expanded.has_namespace_uri()
                && expanded.namespace_uri.as_ref() != OPCUA_NAMESPACE
            {
                false
            } else {
                node_id.namespace() == expanded.namespace()
                    && node_id.identifier() == expanded.identifier()
            }
        }
        _ => false,
    }
}

impl PartialEq<ExpandedNodeId> for NodeId {
    fn eq(&self, other: &ExpandedNodeId) -> bool {
        node_id_equals(self, other)
    }
}

impl PartialEq<NodeId> for ExpandedNodeId {
    fn eq(&self, other: &NodeId) -> bool {
        node_id_equals(other, self)
    }
}

impl PartialOrd for ExpandedNodeId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Null ids sort first, then by server index, namespace (URIs after indices), identifier type
/// and value.
impl Ord for ExpandedNodeId {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.is_null(), other.is_null()) {
            (true, true) => return Ordering::Equal,
            (true, false) => return Ordering::Less,
            (false, true) => return Ordering::Greater,
            _ => {}
        }
        let namespace_order = match (self.has_namespace_uri(), other.has_namespace_uri()) {
            (true, true) => self.namespace_uri.as_ref().cmp(other.namespace_uri.as_ref()),
            (false, false) => self.namespace().cmp(&other.namespace()),
            (false, true) => Ordering::Less,
            (true, false) => Ordering::Greater,
        };
        self.server_index
            .cmp(&other.server_index)
            .then(namespace_order)
            .then_with(|| self.identifier().cmp(other.identifier()))
    }
}

impl<'a> From<&'a NodeId> for ExpandedNodeId {
    fn from(value: &'a NodeId) -> Self {
        Self::from(value.clone())
    }
}

impl From<NodeId> for ExpandedNodeId {
    fn from(node_id: NodeId) -> Self {
        Self::local_or_remote(0, node_id)
    }
}

impl fmt::Display for ExpandedNodeId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if !self.is_local() {
            write!(f, "svr={};", self.server_index)?;
        }
        if self.has_namespace_uri() && !self.is_standard_namespace() {
            // The % and ; chars have to be escaped out in the uri
            let namespace_uri = self
                .namespace_uri
                .as_ref()
                .replace('%', "%25")
                .replace(';', "%3b");
            write!(f, "nsu={};{}", namespace_uri, self.identifier())
        } else {
            write!(f, "{}", self.node_id)
        }
    }
}

impl FromStr for ExpandedNodeId {
    type Err = StatusCode;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        use regex::Regex;

        // Parses a node from a string using the format specified in 5.3.1.11 part 6
        //
        // [svr=<serverindex>;][ns=<namespaceindex>;|nsu=<uri>;]<type>=<value>
        //
        // The keys are case insensitive and may appear in any order before the identifier.

        lazy_static! {
            static ref RE: Regex = Regex::new(r"^(?i:(?P<k>svr|nsu|ns))=(?P<v>[^;]*);").unwrap();
        }

        let invalid = || {
            error!("Cannot parse expanded node id from string {}", s);
            StatusCode::BadInvalidArgument
        };

        let mut server_index = 0u32;
        let mut namespace = 0u16;
        let mut namespace_uri: Option<String> = None;

        let mut rest = s;
        while let Some(captures) = RE.captures(rest) {
            let (k, v) = match (captures.name("k"), captures.name("v")) {
                (Some(k), Some(v)) => (k.as_str().to_ascii_lowercase(), v.as_str()),
                _ => return Err(invalid()),
            };
            match k.as_str() {
                "svr" => server_index = v.parse::<u32>().map_err(|_| invalid())?,
                "ns" => namespace = v.parse::<u16>().map_err(|_| invalid())?,
                _ => {
                    // The % and ; chars need to be unescaped
                    namespace_uri = Some(v.replace("%3b", ";").replace("%3B", ";").replace("%25", "%"))
                }
            }
            rest = &rest[captures.get(0).map(|m| m.end()).unwrap_or(rest.len())..];
        }

        let identifier = Identifier::from_str(rest).map_err(|_| invalid())?;
        match namespace_uri {
            Some(namespace_uri) => ExpandedNodeId::with_uri(server_index, &namespace_uri, identifier),
            None => ExpandedNodeId::new(server_index, namespace, identifier),
        }
    }
}

impl Serialize for ExpandedNodeId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for ExpandedNodeId {
    fn deserialize<D>(deserializer: D) -> Result<ExpandedNodeId, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        ExpandedNodeId::from_str(&s)
            .map_err(|_| de::Error::custom(format!("Invalid expanded node id {}", s)))
    }
}

impl Default for ExpandedNodeId {
    fn default() -> Self {
        ExpandedNodeId::null()
    }
}

impl ExpandedNodeId {
    /// Creates an expanded node id from a server index, namespace index and identifier value.
    pub fn new<T>(server_index: u32, namespace: u16, value: T) -> Result<ExpandedNodeId, StatusCode>
    where
        T: Into<Identifier>,
    {
        Ok(Self::local_or_remote(server_index, NodeId::new(namespace, value)?))
    }

    /// Creates an expanded node id that identifies its namespace by URI. The URI must not be
    /// empty.
    pub fn with_uri<T>(
        server_index: u32,
        namespace_uri: &str,
        value: T,
    ) -> Result<ExpandedNodeId, StatusCode>
    where
        T: Into<Identifier>,
    {
        if namespace_uri.is_empty() {
            error!("Expanded node id namespace uri is empty");
            return Err(StatusCode::BadInvalidArgument);
        }
        Ok(ExpandedNodeId {
            node_id: NodeId::new(0, value)?,
            namespace_uri: UAString::from(namespace_uri),
            server_index,
        })
    }

    /// Creates an expanded node id for a node id on the given server.
    pub fn remote(server_index: u32, node_id: NodeId) -> ExpandedNodeId {
        Self::local_or_remote(server_index, node_id)
    }

    fn local_or_remote(server_index: u32, node_id: NodeId) -> ExpandedNodeId {
        // Non-null ids in namespace 0 belong to the standard namespace
        let namespace_uri = if node_id.namespace() == 0 && !node_id.identifier().is_null_value() {
            UAString::from(OPCUA_NAMESPACE)
        } else {
            UAString::null()
        };
        ExpandedNodeId {
            node_id,
            namespace_uri,
            server_index,
        }
    }

    pub fn null() -> ExpandedNodeId {
        Self::from(NodeId::null())
    }

    /// Tests if this is a null id. A null id is local, has no namespace URI beyond the standard
    /// one and holds a null node id.
    pub fn is_null(&self) -> bool {
        self.is_local()
            && (!self.has_namespace_uri() || self.is_standard_namespace())
            && self.node_id.is_null()
    }

    /// Tests if the id refers to the local server, i.e. server index 0
    pub fn is_local(&self) -> bool {
        self.server_index == 0
    }

    /// Tests if the id refers to something outside of the local index space, i.e. it has a
    /// namespace URI or refers to another server.
    pub fn is_absolute(&self) -> bool {
        self.has_namespace_uri() || !self.is_local()
    }

    /// The namespace index and identifier. The namespace index is only meaningful when there is
    /// no namespace URI.
    pub fn node_id(&self) -> &NodeId {
        &self.node_id
    }

    pub fn namespace(&self) -> u16 {
        self.node_id.namespace()
    }

    pub fn namespace_uri(&self) -> &UAString {
        &self.namespace_uri
    }

    pub fn has_namespace_uri(&self) -> bool {
        !self.namespace_uri.is_empty()
    }

    pub fn server_index(&self) -> u32 {
        self.server_index
    }

    pub fn identifier(&self) -> &Identifier {
        self.node_id.identifier()
    }

    pub fn id_type(&self) -> IdType {
        self.node_id.id_type()
    }

    fn is_standard_namespace(&self) -> bool {
        self.node_id.namespace() == 0 && self.namespace_uri.as_ref() == OPCUA_NAMESPACE
    }
}
