// OPCUA for Rust
// SPDX-License-Identifier: MPL-2.0
// Copyright (C) 2017-2022 Adam Lock

//! Contains the implementation of `NodeId` and its `Identifier`.

use std::{
    self,
    cmp::Ordering,
    fmt,
    hash::{Hash, Hasher},
    str::FromStr,
    sync::atomic::{self, AtomicU32},
};

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::types::{
    byte_string::ByteString, guid::Guid, status_code::StatusCode, string::*,
    MAX_IDENTIFIER_LENGTH,
};

/// The type of an identifier. The discriminant is the order used when sorting node ids.
#[derive(Eq, PartialEq, Clone, Copy, Debug, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum IdType {
    Numeric = 0,
    String = 1,
    Guid = 2,
    Opaque = 3,
}

/// The kind of identifier, numeric, string, guid or byte
///
/// A null string compares equal to an empty string, and likewise for byte strings.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum Identifier {
    Numeric(u32),
    String(UAString),
    Guid(Guid),
    ByteString(ByteString),
}

impl PartialEq for Identifier {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Identifier::Numeric(a), Identifier::Numeric(b)) => a == b,
            (Identifier::String(a), Identifier::String(b)) => a.as_ref() == b.as_ref(),
            (Identifier::Guid(a), Identifier::Guid(b)) => a == b,
            (Identifier::ByteString(a), Identifier::ByteString(b)) => a.as_ref() == b.as_ref(),
            _ => false,
        }
    }
}

impl Eq for Identifier {}

impl Hash for Identifier {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id_type().hash(state);
        match self {
            Identifier::Numeric(v) => v.hash(state),
            Identifier::String(v) => v.as_ref().hash(state),
            Identifier::Guid(v) => v.hash(state),
            Identifier::ByteString(v) => v.as_ref().hash(state),
        }
    }
}

impl PartialOrd for Identifier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Identifiers sort by type first, then by value. Byte strings sort lexicographically.
impl Ord for Identifier {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Identifier::Numeric(a), Identifier::Numeric(b)) => a.cmp(b),
            (Identifier::String(a), Identifier::String(b)) => a.as_ref().cmp(b.as_ref()),
            (Identifier::Guid(a), Identifier::Guid(b)) => a.cmp(b),
            (Identifier::ByteString(a), Identifier::ByteString(b)) => a.as_ref().cmp(b.as_ref()),
            _ => self.id_type().cmp(&other.id_type()),
        }
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Identifier::Numeric(v) => write!(f, "i={}", *v),
            Identifier::String(v) => write!(f, "s={}", v.as_ref()),
            Identifier::Guid(v) => write!(f, "g={}", v),
            Identifier::ByteString(v) => write!(f, "b={}", v.as_base64()),
        }
    }
}

impl FromStr for Identifier {
    type Err = StatusCode;

    /// Parses `<t>=<value>` where t is one of `i`, `s`, `g` or `b`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (k, v) = match s.split_once('=') {
            Some(kv) => kv,
            None => {
                error!("Identifier {} has no type prefix", s);
                return Err(StatusCode::BadInvalidArgument);
            }
        };
        let identifier = match k {
            "i" => v.parse::<u32>().map(Identifier::Numeric).ok(),
            "s" => Some(Identifier::from(v)),
            "g" => Guid::from_str(v).map(Identifier::Guid).ok(),
            "b" => ByteString::from_base64(v).map(Identifier::ByteString),
            _ => None,
        };
        match identifier {
            Some(identifier) => identifier.validate().map(|_| identifier),
            None => {
                error!("Identifier {} cannot be parsed", s);
                Err(StatusCode::BadInvalidArgument)
            }
        }
    }
}

impl From<u32> for Identifier {
    fn from(v: u32) -> Self {
        Identifier::Numeric(v)
    }
}

impl<'a> From<&'a str> for Identifier {
    fn from(v: &'a str) -> Self {
        Identifier::from(UAString::from(v))
    }
}

impl From<&String> for Identifier {
    fn from(v: &String) -> Self {
        Identifier::from(UAString::from(v))
    }
}

impl From<String> for Identifier {
    fn from(v: String) -> Self {
        Identifier::from(UAString::from(v))
    }
}

impl From<UAString> for Identifier {
    fn from(v: UAString) -> Self {
        Identifier::String(v)
    }
}

impl From<Guid> for Identifier {
    fn from(v: Guid) -> Self {
        Identifier::Guid(v)
    }
}

impl From<ByteString> for Identifier {
    fn from(v: ByteString) -> Self {
        Identifier::ByteString(v)
    }
}

impl Identifier {
    pub fn id_type(&self) -> IdType {
        match self {
            Identifier::Numeric(_) => IdType::Numeric,
            Identifier::String(_) => IdType::String,
            Identifier::Guid(_) => IdType::Guid,
            Identifier::ByteString(_) => IdType::Opaque,
        }
    }

    /// Tests if the value is the null value for its type, i.e. 0, an empty or null string,
    /// the nil guid, or empty or null bytes.
    pub fn is_null_value(&self) -> bool {
        match self {
            Identifier::Numeric(v) => *v == 0,
            Identifier::String(v) => v.is_empty(),
            Identifier::Guid(v) => v.is_null(),
            Identifier::ByteString(v) => v.is_null_or_empty(),
        }
    }

    /// Checks the value is within the identifier length limit.
    fn validate(&self) -> Result<(), StatusCode> {
        match self {
            Identifier::String(v) if v.char_count() > MAX_IDENTIFIER_LENGTH => {
                error!(
                    "String identifier of {} chars exceeds the limit of {}",
                    v.char_count(),
                    MAX_IDENTIFIER_LENGTH
                );
                Err(StatusCode::BadInvalidArgument)
            }
            Identifier::ByteString(v) if v.len() > MAX_IDENTIFIER_LENGTH => {
                error!(
                    "Opaque identifier of {} bytes exceeds the limit of {}",
                    v.len(),
                    MAX_IDENTIFIER_LENGTH
                );
                Err(StatusCode::BadInvalidArgument)
            }
            _ => Ok(()),
        }
    }
}

/// An identifier for a node in the address space of an OPC UA Server.
///
/// Every identifier type has a null value (0, empty string, nil guid, empty bytes). A node id
/// holding one of those in namespace 0 is null, and all null node ids are equal to each other.
#[derive(Clone, Debug)]
pub struct NodeId {
    namespace: u16,
    identifier: Identifier,
}

impl PartialEq for NodeId {
    fn eq(&self, other: &Self) -> bool {
        match (self.is_null(), other.is_null()) {
            (true, true) => true,
            (false, false) => {
                self.namespace == other.namespace && self.identifier == other.identifier
            }
            _ => false,
        }
    }
}

impl Eq for NodeId {}

impl Hash for NodeId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        if self.is_null() {
            // Every null id hashes alike
            u16::MAX.hash(state);
        } else {
            self.namespace.hash(state);
            self.identifier.hash(state);
        }
    }
}

impl PartialOrd for NodeId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Null ids sort first, then by namespace, identifier type and value.
impl Ord for NodeId {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.is_null(), other.is_null()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
            (false, false) => self
                .namespace
                .cmp(&other.namespace)
                .then_with(|| self.identifier.cmp(&other.identifier)),
        }
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.namespace != 0 {
            write!(f, "ns={};{}", self.namespace, self.identifier)
        } else {
            write!(f, "{}", self.identifier)
        }
    }
}

impl FromStr for NodeId {
    type Err = StatusCode;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        use regex::Regex;

        // Parses a node from a string using the format specified in 5.3.1.10 part 6
        //
        // ns=<namespaceindex>;<type>=<value>
        //
        // Where type:
        //   i = NUMERIC
        //   s = STRING
        //   g = GUID
        //   b = OPAQUE (ByteString)
        //
        // If namespace == 0, the ns=0; will be omitted

        lazy_static! {
            // Contains capture groups "ns" and "t" for namespace and type respectively
            static ref RE: Regex = Regex::new(r"(?s)^(ns=(?P<ns>[0-9]+);)?(?P<t>[isgb]=.*)$").unwrap();
        }

        let captures = RE.captures(s).ok_or_else(|| {
            error!("Cannot parse node id from string {}", s);
            StatusCode::BadInvalidArgument
        })?;

        let namespace = if let Some(ns) = captures.name("ns") {
            ns.as_str().parse::<u16>().map_err(|_| {
                error!("Namespace index in node id {} is out of range", s);
                StatusCode::BadInvalidArgument
            })?
        } else {
            0
        };

        let t = captures
            .name("t")
            .ok_or(StatusCode::BadInvalidArgument)?;
        let identifier = Identifier::from_str(t.as_str()).map_err(|err| {
            error!("Cannot parse node id from string {}", s);
            err
        })?;
        Ok(NodeId {
            namespace,
            identifier,
        })
    }
}

// Node ids go out in their string form, e.g. "ns=1;s=Hello"

impl Serialize for NodeId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for NodeId {
    fn deserialize<D>(deserializer: D) -> Result<NodeId, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        NodeId::from_str(&s).map_err(|_| de::Error::custom(format!("Invalid node id {}", s)))
    }
}

impl From<&NodeId> for NodeId {
    fn from(v: &NodeId) -> Self {
        v.clone()
    }
}

impl From<NodeId> for String {
    fn from(value: NodeId) -> Self {
        value.to_string()
    }
}

impl From<(u16, u32)> for NodeId {
    fn from(v: (u16, u32)) -> Self {
        NodeId::numeric(v.0, v.1)
    }
}

impl From<(u16, Guid)> for NodeId {
    fn from(v: (u16, Guid)) -> Self {
        NodeId {
            namespace: v.0,
            identifier: Identifier::Guid(v.1),
        }
    }
}

static NEXT_NODE_ID_NUMERIC: AtomicU32 = AtomicU32::new(1000);

impl Default for NodeId {
    fn default() -> Self {
        NodeId::null()
    }
}

impl NodeId {
    /// Constructs a new NodeId from anything that can be turned into Identifier
    /// u32, Guid, ByteString or String. Fails if a string or byte string value is longer than
    /// the identifier limit.
    pub fn new<T>(namespace: u16, value: T) -> Result<NodeId, StatusCode>
    where
        T: Into<Identifier>,
    {
        let identifier = value.into();
        identifier.validate()?;
        Ok(NodeId {
            namespace,
            identifier,
        })
    }

    /// Constructs a NodeId from a wider namespace index, failing if the index does not fit
    /// in 16 bits.
    pub fn from_index<T>(namespace: u32, value: T) -> Result<NodeId, StatusCode>
    where
        T: Into<Identifier>,
    {
        let namespace = u16::try_from(namespace).map_err(|_| {
            error!("Namespace index {} is out of range", namespace);
            StatusCode::BadInvalidArgument
        })?;
        NodeId::new(namespace, value)
    }

    /// Constructs a numeric node id
    pub const fn numeric(namespace: u16, value: u32) -> NodeId {
        NodeId {
            namespace,
            identifier: Identifier::Numeric(value),
        }
    }

    /// Test if the node id is null, i.e. namespace 0 and the null value of its identifier type
    pub fn is_null(&self) -> bool {
        self.namespace == 0 && self.identifier.is_null_value()
    }

    /// Returns a null node id
    pub const fn null() -> NodeId {
        NodeId::null_numeric()
    }

    pub const fn null_numeric() -> NodeId {
        NodeId::numeric(0, 0)
    }

    pub fn null_string() -> NodeId {
        NodeId {
            namespace: 0,
            identifier: Identifier::String(UAString::from("")),
        }
    }

    pub fn null_guid() -> NodeId {
        NodeId {
            namespace: 0,
            identifier: Identifier::Guid(Guid::null()),
        }
    }

    pub fn null_opaque() -> NodeId {
        NodeId {
            namespace: 0,
            identifier: Identifier::ByteString(ByteString::from(Vec::new())),
        }
    }

    /// Creates a node id holding a new random guid
    pub fn random_guid(namespace: u16) -> NodeId {
        NodeId::from((namespace, Guid::new()))
    }

    // Creates a numeric node id with an id incrementing up from 1000
    pub fn next_numeric(namespace: u16) -> NodeId {
        NodeId::numeric(
            namespace,
            NEXT_NODE_ID_NUMERIC.fetch_add(1, atomic::Ordering::SeqCst),
        )
    }

    pub fn namespace(&self) -> u16 {
        self.namespace
    }

    pub fn identifier(&self) -> &Identifier {
        &self.identifier
    }

    pub fn id_type(&self) -> IdType {
        self.identifier.id_type()
    }

    /// Returns the numeric value if the node id is numeric
    pub fn as_u32(&self) -> Option<u32> {
        match self.identifier {
            Identifier::Numeric(v) => Some(v),
            _ => None,
        }
    }

    /// Test if the node id is numeric
    pub fn is_numeric(&self) -> bool {
        matches!(self.identifier, Identifier::Numeric(_))
    }

    /// Test if the node id is a string
    pub fn is_string(&self) -> bool {
        matches!(self.identifier, Identifier::String(_))
    }

    /// Test if the node id is a guid
    pub fn is_guid(&self) -> bool {
        matches!(self.identifier, Identifier::Guid(_))
    }

    /// Test if the node id us a byte string
    pub fn is_byte_string(&self) -> bool {
        matches!(self.identifier, Identifier::ByteString(_))
    }
}
