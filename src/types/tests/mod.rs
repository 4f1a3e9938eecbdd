mod data_value;
mod expanded_node_id;
mod node_id;
mod status_code;
mod variant;

use std::fmt::Debug;

use ::serde::{de::DeserializeOwned, Serialize};

/// Serializes the value to JSON and back, checking the result matches.
pub fn json_round_trip<T>(value: T) -> T
where
    T: Serialize + DeserializeOwned + Debug + PartialEq,
{
    let json = serde_json::to_string(&value).unwrap();
    println!("json = {}", json);
    let new_value: T = serde_json::from_str(&json).unwrap();
    assert_eq!(value, new_value);
    new_value
}
