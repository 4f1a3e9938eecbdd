use std::collections::HashSet;
use std::str::FromStr;

use crate::types::*;

#[test]
fn parse_and_display() {
    let cases = [
        ("i=85", ExpandedNodeId::new(0, 0, 85u32).unwrap()),
        ("ns=1;s=Tank", ExpandedNodeId::new(0, 1, "Tank").unwrap()),
        ("svr=2;ns=1;i=7", ExpandedNodeId::remote(2, NodeId::numeric(1, 7))),
        (
            "nsu=urn:factory;s=Tank",
            ExpandedNodeId::with_uri(0, "urn:factory", "Tank").unwrap(),
        ),
        (
            "svr=3;nsu=urn:factory;i=9",
            ExpandedNodeId::with_uri(3, "urn:factory", 9u32).unwrap(),
        ),
    ];
    for (s, expected) in cases.iter() {
        let id = ExpandedNodeId::from_str(s).unwrap();
        assert_eq!(id, *expected);
        assert_eq!(id.to_string(), *s);
    }
}

#[test]
fn parse_keys_in_any_case_and_order() {
    let expected = ExpandedNodeId::remote(1, NodeId::numeric(2, 3));
    assert_eq!(ExpandedNodeId::from_str("SVR=1;NS=2;i=3").unwrap(), expected);
    assert_eq!(ExpandedNodeId::from_str("ns=2;svr=1;i=3").unwrap(), expected);
    assert_eq!(expected.to_string(), "svr=1;ns=2;i=3");
}

#[test]
fn uri_escaping() {
    let id = ExpandedNodeId::with_uri(0, "urn:a;b%c", 1u32).unwrap();
    let s = id.to_string();
    assert_eq!(s, "nsu=urn:a%3bb%25c;i=1");
    let parsed = ExpandedNodeId::from_str(&s).unwrap();
    assert_eq!(parsed.namespace_uri().as_ref(), "urn:a;b%c");
    assert_eq!(parsed, id);
}

#[test]
fn parse_invalid() {
    for s in ["", "svr=x;i=1", "nsu=;i=1", "ns=1;", "foo=1;i=1", "ns=70000;i=1"] {
        assert!(ExpandedNodeId::from_str(s).is_err(), "{} should not parse", s);
    }
}

#[test]
fn empty_uri_rejected() {
    assert_eq!(
        ExpandedNodeId::with_uri(0, "", 1u32).unwrap_err(),
        StatusCode::BadInvalidArgument
    );
}

#[test]
fn standard_namespace() {
    // A namespace 0 id carries the standard namespace uri but prints as a plain node id
    let id = ExpandedNodeId::from(NodeId::numeric(0, 85));
    assert!(id.has_namespace_uri());
    assert_eq!(id.namespace_uri().as_ref(), OPCUA_NAMESPACE);
    assert_eq!(id.to_string(), "i=85");
    assert_eq!(id, ExpandedNodeId::with_uri(0, OPCUA_NAMESPACE, 85u32).unwrap());
    assert!(!ExpandedNodeId::from(NodeId::numeric(1, 85)).has_namespace_uri());
}

#[test]
fn null_ids() {
    assert!(ExpandedNodeId::null().is_null());
    assert!(ExpandedNodeId::new(0, 0, 0u32).unwrap().is_null());
    assert!(ExpandedNodeId::from(NodeId::null_string()).is_null());
    assert_eq!(ExpandedNodeId::null(), ExpandedNodeId::from(NodeId::null_guid()));
    assert!(!ExpandedNodeId::null().has_namespace_uri());
    assert!(!ExpandedNodeId::remote(1, NodeId::null()).is_null());
    assert!(!ExpandedNodeId::with_uri(0, "urn:x", 0u32).unwrap().is_null());
}

#[test]
fn local_and_absolute() {
    let local = ExpandedNodeId::from(NodeId::numeric(1, 5));
    assert!(local.is_local());
    assert!(!local.is_absolute());

    let remote = ExpandedNodeId::remote(4, NodeId::numeric(1, 5));
    assert!(!remote.is_local());
    assert!(remote.is_absolute());
    assert_eq!(remote.server_index(), 4);

    let with_uri = ExpandedNodeId::with_uri(0, "urn:x", 5u32).unwrap();
    assert!(with_uri.is_local());
    assert!(with_uri.is_absolute());
}

#[test]
fn equals_node_id() {
    let node_id = NodeId::numeric(1, 5);
    assert_eq!(node_id, ExpandedNodeId::new(0, 1, 5u32).unwrap());
    assert_eq!(ExpandedNodeId::new(0, 1, 5u32).unwrap(), node_id);
    assert_ne!(node_id, ExpandedNodeId::remote(1, NodeId::numeric(1, 5)));
    assert_ne!(node_id, ExpandedNodeId::with_uri(0, "urn:x", 5u32).unwrap());
    assert_eq!(NodeId::numeric(0, 85), ExpandedNodeId::from(NodeId::numeric(0, 85)));
    assert_eq!(NodeId::null_string(), ExpandedNodeId::null());
}

#[test]
fn hash_consistent_with_eq() {
    let mut set = HashSet::new();
    set.insert(ExpandedNodeId::from_str("i=85").unwrap());
    set.insert(ExpandedNodeId::from(NodeId::numeric(0, 85)));
    set.insert(ExpandedNodeId::null());
    set.insert(ExpandedNodeId::from(NodeId::null_string()));
    set.insert(ExpandedNodeId::remote(1, NodeId::numeric(0, 85)));
    assert_eq!(set.len(), 3);
}

#[test]
fn ordering() {
    let mut ids = vec![
        ExpandedNodeId::remote(1, NodeId::numeric(0, 1)),
        ExpandedNodeId::with_uri(0, "urn:b", 1u32).unwrap(),
        ExpandedNodeId::new(0, 2, 1u32).unwrap(),
        ExpandedNodeId::null(),
        ExpandedNodeId::with_uri(0, "urn:a", 1u32).unwrap(),
    ];
    ids.sort();
    assert!(ids[0].is_null());
    assert_eq!(ids[1], ExpandedNodeId::new(0, 2, 1u32).unwrap());
    assert_eq!(ids[2].namespace_uri().as_ref(), "urn:a");
    assert_eq!(ids[3].namespace_uri().as_ref(), "urn:b");
    assert_eq!(ids[4].server_index(), 1);
}
