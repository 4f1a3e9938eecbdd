// OPCUA for Rust
// SPDX-License-Identifier: MPL-2.0
// Copyright (C) 2017-2022 Adam Lock

//! Contains the definition of `QualifiedName`.

use std::{fmt, str::FromStr};

use crate::types::string::*;

/// An identifier for a node in a UA server address space qualified with a complete namespace
/// string.
///
/// Examples:
///
/// ```text
/// ns=0;s=Name
/// ns=1;s=Name
/// ```
///
/// Two qualified names are only equal when the namespace index and the name both match. A null
/// name is not equal to an empty name.
#[derive(PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Clone, Serialize, Deserialize)]
pub struct QualifiedName {
    /// The namespace index
    pub namespace_index: u16,
    /// The name.
    pub name: UAString,
}

impl Default for QualifiedName {
    fn default() -> Self {
        Self::null()
    }
}

impl<'a> From<&'a str> for QualifiedName {
    fn from(value: &'a str) -> Self {
        Self {
            namespace_index: 0,
            name: UAString::from(value),
        }
    }
}

impl From<&String> for QualifiedName {
    fn from(value: &String) -> Self {
        Self {
            namespace_index: 0,
            name: UAString::from(value),
        }
    }
}

impl From<String> for QualifiedName {
    fn from(value: String) -> Self {
        Self {
            namespace_index: 0,
            name: UAString::from(value),
        }
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.namespace_index > 0 {
            write!(f, "{}:{}", self.namespace_index, self.name)
        } else {
            write!(f, "{}", self.name)
        }
    }
}

impl FromStr for QualifiedName {
    type Err = ();

    /// Parses `<ns>:<name>`. When the prefix is not a valid namespace index, the whole input is
    /// taken as the name in namespace 0. This never fails.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parsed = s
            .split_once(':')
            .and_then(|(ns, name)| ns.parse::<u16>().ok().map(|ns| QualifiedName::new(ns, name)));
        Ok(parsed.unwrap_or_else(|| QualifiedName::from(s)))
    }
}

impl QualifiedName {
    pub fn new<T>(namespace_index: u16, name: T) -> QualifiedName
    where
        T: Into<UAString>,
    {
        QualifiedName {
            namespace_index,
            name: name.into(),
        }
    }

    pub fn null() -> QualifiedName {
        QualifiedName {
            namespace_index: 0,
            name: UAString::null(),
        }
    }

    pub fn is_null(&self) -> bool {
        self.namespace_index == 0 && self.name.is_null()
    }

    /// True if the name is null, or the name part is an empty string
    pub fn is_null_or_empty(&self) -> bool {
        self.is_null() || self.name.is_empty()
    }

    /// The browse name of the default binary encoding of a structure.
    pub fn default_binary_encoding() -> QualifiedName {
        QualifiedName::from("Default Binary")
    }

    /// The browse name of the default XML encoding of a structure.
    pub fn default_xml_encoding() -> QualifiedName {
        QualifiedName::from("Default XML")
    }
}

#[test]
fn qualified_name_parse() {
    let q = QualifiedName::from_str("2:Temperature").unwrap();
    assert_eq!(q, QualifiedName::new(2, "Temperature"));
    assert_eq!(q.to_string(), "2:Temperature");

    let q = QualifiedName::from_str("Temperature").unwrap();
    assert_eq!(q, QualifiedName::new(0, "Temperature"));
    assert_eq!(q.to_string(), "Temperature");

    // Not a namespace index so the whole string is the name
    let q = QualifiedName::from_str("urn:thing").unwrap();
    assert_eq!(q, QualifiedName::new(0, "urn:thing"));

    // Only the first separator counts
    let q = QualifiedName::from_str("1:a:b").unwrap();
    assert_eq!(q, QualifiedName::new(1, "a:b"));
}

#[test]
fn qualified_name_null() {
    assert!(QualifiedName::null().is_null());
    assert!(QualifiedName::null().is_null_or_empty());
    assert!(!QualifiedName::from("").is_null());
    assert!(QualifiedName::from("").is_null_or_empty());
    assert!(!QualifiedName::new(1, UAString::null()).is_null());
    assert_ne!(QualifiedName::null(), QualifiedName::from(""));
    assert_ne!(QualifiedName::new(1, "x"), QualifiedName::new(2, "x"));
}
