// OPCUA for Rust
// SPDX-License-Identifier: MPL-2.0
// Copyright (C) 2017-2022 Adam Lock

//! Contains the implementation of `DataValue`.

use std::fmt;

use crate::types::{
    byte_string::ByteString, date_time::*, guid::Guid, localized_text::LocalizedText,
    node_id::NodeId, qualified_name::QualifiedName, status_code::StatusCode, string::UAString,
    variant::Variant,
};

/// A data value is a value of a variable in the OPC UA server and contains information about its
/// value, status and change timestamps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataValue {
    /// The value. BaseDataType
    pub value: Option<Variant>,
    /// The status associated with the value.
    pub status: Option<StatusCode>,
    /// The source timestamp associated with the value.
    pub source_timestamp: Option<DateTime>,
    /// The number of 10 picosecond intervals for the SourceTimestamp.
    /// If the source timestamp is missing the picoseconds are ignored.
    pub source_picoseconds: Option<i16>,
    /// The Server timestamp associated with the value.
    pub server_timestamp: Option<DateTime>,
    /// The number of 10 picosecond intervals for the ServerTimestamp.
    /// If the Server timestamp is missing the picoseconds are ignored.
    pub server_picoseconds: Option<i16>,
}

// Conversions of the common scalars straight into a value-only data value.

impl From<bool> for DataValue {
    fn from(v: bool) -> Self {
        Self::from(Variant::from(v))
    }
}

impl From<u8> for DataValue {
    fn from(v: u8) -> Self {
        Self::from(Variant::from(v))
    }
}

impl From<i8> for DataValue {
    fn from(v: i8) -> Self {
        Self::from(Variant::from(v))
    }
}

impl From<i16> for DataValue {
    fn from(v: i16) -> Self {
        Self::from(Variant::from(v))
    }
}

impl From<u16> for DataValue {
    fn from(v: u16) -> Self {
        Self::from(Variant::from(v))
    }
}

impl From<i32> for DataValue {
    fn from(v: i32) -> Self {
        Self::from(Variant::from(v))
    }
}

impl From<u32> for DataValue {
    fn from(v: u32) -> Self {
        Self::from(Variant::from(v))
    }
}

impl From<i64> for DataValue {
    fn from(v: i64) -> Self {
        Self::from(Variant::from(v))
    }
}

impl From<u64> for DataValue {
    fn from(v: u64) -> Self {
        Self::from(Variant::from(v))
    }
}

impl From<f32> for DataValue {
    fn from(v: f32) -> Self {
        Self::from(Variant::from(v))
    }
}

impl From<f64> for DataValue {
    fn from(v: f64) -> Self {
        Self::from(Variant::from(v))
    }
}

impl<'a> From<&'a str> for DataValue {
    fn from(v: &'a str) -> Self {
        Self::from(Variant::from(v))
    }
}

impl From<String> for DataValue {
    fn from(v: String) -> Self {
        Self::from(Variant::from(v))
    }
}

impl From<UAString> for DataValue {
    fn from(v: UAString) -> Self {
        Self::from(Variant::from(v))
    }
}

impl From<DateTime> for DataValue {
    fn from(v: DateTime) -> Self {
        Self::from(Variant::from(v))
    }
}

impl From<Guid> for DataValue {
    fn from(v: Guid) -> Self {
        Self::from(Variant::from(v))
    }
}

impl From<StatusCode> for DataValue {
    fn from(v: StatusCode) -> Self {
        Self::from(Variant::from(v))
    }
}

impl From<ByteString> for DataValue {
    fn from(v: ByteString) -> Self {
        Self::from(Variant::from(v))
    }
}

impl From<QualifiedName> for DataValue {
    fn from(v: QualifiedName) -> Self {
        Self::from(Variant::from(v))
    }
}

impl From<LocalizedText> for DataValue {
    fn from(v: LocalizedText) -> Self {
        Self::from(Variant::from(v))
    }
}

impl From<NodeId> for DataValue {
    fn from(v: NodeId) -> Self {
        Self::from(Variant::from(v))
    }
}
//... (see above)

impl From<Variant> for DataValue {
    fn from(v: Variant) -> Self {
        DataValue::value_only(v)
    }
}

impl From<(Variant, StatusCode)> for DataValue {
    fn from(v: (Variant, StatusCode)) -> Self {
        DataValue {
            value: Some(v.0),
            status: Some(v.1),
            source_timestamp: None,
            source_picoseconds: None,
            server_timestamp: None,
            server_picoseconds: None,
        }
    }
}

impl Default for DataValue {
    fn default() -> Self {
        Self::null()
    }
}

impl fmt::Display for DataValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DataValue(value={}, status={}", self.value(), self.status())?;
        if let Some(ref t) = self.source_timestamp {
            write!(f, ", sourceTimestamp={}", t)?;
        }
        if let Some(p) = self.source_picoseconds {
            write!(f, ", sourcePicoseconds={}", p)?;
        }
        if let Some(ref t) = self.server_timestamp {
            write!(f, ", serverTimestamp={}", t)?;
        }
        if let Some(p) = self.server_picoseconds {
            write!(f, ", serverPicoseconds={}", p)?;
        }
        write!(f, ")")
    }
}

impl DataValue {
    /// Creates a `DataValue` from the supplied value with a Good status and no timestamps.
    pub fn new<V>(value: V) -> DataValue
    where
        V: Into<Variant>,
    {
        DataValue {
            value: Some(value.into()),
            status: Some(StatusCode::Good),
            source_timestamp: None,
            source_picoseconds: None,
            server_timestamp: None,
            server_picoseconds: None,
        }
    }

    /// Creates a `DataValue` from the supplied value with nothing else.
    pub fn value_only<V>(value: V) -> DataValue
    where
        V: Into<Variant>,
    {
        DataValue {
            value: Some(value.into()),
            ..Self::null()
        }
    }

    /// Creates a `DataValue` from the supplied value AND a timestamp for now. Both the source and
    /// server timestamps are set to the same instant.
    pub fn new_now<V>(value: V) -> DataValue
    where
        V: Into<Variant>,
    {
        let now = DateTime::now();
        DataValue {
            value: Some(value.into()),
            status: Some(StatusCode::Good),
            source_timestamp: Some(now),
            source_picoseconds: Some(0),
            server_timestamp: Some(now),
            server_picoseconds: Some(0),
        }
    }

    /// Creates an empty DataValue
    pub fn null() -> DataValue {
        DataValue {
            value: None,
            status: None,
            source_timestamp: None,
            source_picoseconds: None,
            server_timestamp: None,
            server_picoseconds: None,
        }
    }

    pub fn with_status(mut self, status: StatusCode) -> DataValue {
        self.status = Some(status);
        self
    }

    /// Sets the source timestamp. Missing picoseconds are treated as zero.
    pub fn with_source_timestamp(mut self, timestamp: DateTime, picoseconds: Option<i16>) -> DataValue {
        self.source_timestamp = Some(timestamp);
        self.source_picoseconds = Some(picoseconds.unwrap_or(0));
        self
    }

    /// Sets the server timestamp. Missing picoseconds are treated as zero.
    pub fn with_server_timestamp(mut self, timestamp: DateTime, picoseconds: Option<i16>) -> DataValue {
        self.server_timestamp = Some(timestamp);
        self.server_picoseconds = Some(picoseconds.unwrap_or(0));
        self
    }

    /// Returns the value, or `Variant::Empty` if there is none
    pub fn value(&self) -> &Variant {
        const EMPTY: &Variant = &Variant::Empty;
        self.value.as_ref().unwrap_or(EMPTY)
    }

    /// Replaces the value. `None` stores an empty variant.
    pub fn set_value(&mut self, value: Option<Variant>) {
        self.value = Some(value.unwrap_or(Variant::Empty));
    }

    /// Sets the value of the data value, updating the timestamps at the same point
    pub fn set_value_at<V>(
        &mut self,
        value: V,
        source_timestamp: &DateTime,
        server_timestamp: &DateTime,
    ) where
        V: Into<Variant>,
    {
        self.value = Some(value.into());
        self.source_timestamp = Some(*source_timestamp);
        self.source_picoseconds = Some(0);
        self.server_timestamp = Some(*server_timestamp);
        self.server_picoseconds = Some(0);
    }

    /// Returns the status code or Good if there is no code on the value
    pub fn status(&self) -> StatusCode {
        self.status.map_or(StatusCode::Good, |s| s)
    }

    /// Returns the source timestamp or a null date time
    pub fn source_timestamp(&self) -> DateTime {
        self.source_timestamp.unwrap_or_else(DateTime::null)
    }

    pub fn source_picoseconds(&self) -> i16 {
        self.source_picoseconds.unwrap_or(0)
    }

    /// Returns the server timestamp or a null date time
    pub fn server_timestamp(&self) -> DateTime {
        self.server_timestamp.unwrap_or_else(DateTime::null)
    }

    pub fn server_picoseconds(&self) -> i16 {
        self.server_picoseconds.unwrap_or(0)
    }

    /// Tests if the data value holds no value, i.e. the variant is empty or missing
    pub fn is_null(&self) -> bool {
        self.value().is_empty()
    }

    /// Test if the value held by this data value is known to be good
    /// Anything other than Good is assumed to be invalid.
    pub fn is_valid(&self) -> bool {
        self.status().is_good()
    }
}
