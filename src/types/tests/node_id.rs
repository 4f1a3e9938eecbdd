use std::collections::HashSet;
use std::str::FromStr;

use crate::types::*;

#[test]
fn parse_and_display() {
    let cases = [
        ("i=2253", NodeId::numeric(0, 2253)),
        ("ns=1;i=10", NodeId::numeric(1, 10)),
        ("ns=2;s=Hello World", NodeId::new(2, "Hello World").unwrap()),
        ("s=Semi;colon", NodeId::new(0, "Semi;colon").unwrap()),
        (
            "ns=3;g=72962b91-fa75-4ae6-8d28-b404dc7daf63",
            NodeId::new(3, Guid::from_str("72962b91-fa75-4ae6-8d28-b404dc7daf63").unwrap())
                .unwrap(),
        ),
        (
            "ns=4;b=AQID",
            NodeId::new(4, ByteString::from(vec![1u8, 2, 3])).unwrap(),
        ),
    ];
    for (s, expected) in cases.iter() {
        let node_id = NodeId::from_str(s).unwrap();
        assert_eq!(node_id, *expected);
        assert_eq!(node_id.to_string(), *s);
    }
}

#[test]
fn parse_invalid() {
    for s in [
        "",
        "x=1",
        "ns=1",
        "ns=abc;i=1",
        "ns=65536;i=1",
        "i=-1",
        "i=4294967296",
        "g=not-a-guid",
        "ns=1;i=1;",
    ] {
        assert_eq!(
            NodeId::from_str(s).unwrap_err(),
            StatusCode::BadInvalidArgument,
            "{} should not parse",
            s
        );
    }
}

#[test]
fn identifier_length_limit() {
    let longest = "x".repeat(MAX_IDENTIFIER_LENGTH);
    assert!(NodeId::new(1, longest.as_str()).is_ok());
    let too_long = "x".repeat(MAX_IDENTIFIER_LENGTH + 1);
    assert_eq!(
        NodeId::new(1, too_long.as_str()).unwrap_err(),
        StatusCode::BadInvalidArgument
    );
    let too_many_bytes = ByteString::from(vec![0u8; MAX_IDENTIFIER_LENGTH + 1]);
    assert!(NodeId::new(1, too_many_bytes).is_err());
}

#[test]
fn namespace_index_range() {
    assert_eq!(
        NodeId::from_index(65535, 1u32).unwrap(),
        NodeId::numeric(65535, 1)
    );
    assert_eq!(
        NodeId::from_index(65536, 1u32).unwrap_err(),
        StatusCode::BadInvalidArgument
    );
}

#[test]
fn null_ids() {
    let nulls = [
        NodeId::null(),
        NodeId::null_numeric(),
        NodeId::null_string(),
        NodeId::null_guid(),
        NodeId::null_opaque(),
        NodeId::new(0, UAString::null()).unwrap(),
    ];
    for a in nulls.iter() {
        assert!(a.is_null());
        for b in nulls.iter() {
            assert_eq!(a, b);
        }
    }
    // A null identifier outside namespace 0 is not null
    assert!(!NodeId::numeric(1, 0).is_null());
    assert_ne!(NodeId::numeric(1, 0), NodeId::null());
    assert!(!NodeId::numeric(0, 1).is_null());
}

#[test]
fn hash_consistent_with_eq() {
    let mut set = HashSet::new();
    set.insert(NodeId::null());
    set.insert(NodeId::null_string());
    set.insert(NodeId::null_guid());
    set.insert(NodeId::numeric(1, 1));
    set.insert(NodeId::numeric(1, 1));
    set.insert(NodeId::new(1, "1").unwrap());
    assert_eq!(set.len(), 3);
}

#[test]
fn ordering() {
    let mut ids = vec![
        NodeId::new(1, "b").unwrap(),
        NodeId::numeric(2, 1),
        NodeId::new(1, "a").unwrap(),
        NodeId::numeric(1, 5),
        NodeId::null_string(),
        NodeId::new(1, ByteString::from(vec![2u8])).unwrap(),
        NodeId::new(1, ByteString::from(vec![1u8, 9])).unwrap(),
    ];
    ids.sort();
    assert!(ids[0].is_null());
    assert_eq!(ids[1], NodeId::numeric(1, 5));
    assert_eq!(ids[2], NodeId::new(1, "a").unwrap());
    assert_eq!(ids[3], NodeId::new(1, "b").unwrap());
    assert_eq!(ids[4], NodeId::new(1, ByteString::from(vec![1u8, 9])).unwrap());
    assert_eq!(ids[5], NodeId::new(1, ByteString::from(vec![2u8])).unwrap());
    assert_eq!(ids[6], NodeId::numeric(2, 1));
}

#[test]
fn accessors() {
    let node_id = NodeId::new(5, "Pump").unwrap();
    assert_eq!(node_id.namespace(), 5);
    assert_eq!(node_id.id_type(), IdType::String);
    assert!(node_id.is_string());
    assert!(!node_id.is_numeric());
    assert_eq!(node_id.as_u32(), None);
    assert_eq!(NodeId::numeric(0, 85).as_u32(), Some(85));

    let guid_id = NodeId::random_guid(1);
    assert!(guid_id.is_guid());
    assert_ne!(guid_id, NodeId::random_guid(1));
}

#[test]
fn next_numeric() {
    let a = NodeId::next_numeric(1);
    let b = NodeId::next_numeric(1);
    assert!(a.as_u32().unwrap() >= 1000);
    assert!(b.as_u32().unwrap() > a.as_u32().unwrap());
}
