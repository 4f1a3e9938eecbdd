// OPCUA for Rust
// SPDX-License-Identifier: MPL-2.0
// Copyright (C) 2017-2022 Adam Lock

//! Contains the hand implemented part of the StatusCode type. The other file, `status_codes.rs`
//! contains the table of named codes.
//!
//! A status code is a packed 32-bit word laid out as follows:
//!
//! ```text
//!  31..30   severity (00 good, 01 uncertain, 10 bad)
//!  29..28   reserved
//!  27..16   sub code
//!  15       structure changed
//!  14       semantics changed
//!  13..12   reserved
//!  11..10   info type (01 = data value)
//!  9..0     info bits, limit bits 9..8, overflow bit 7, historian bits 4..0
//! ```

use std::{
    error::Error,
    fmt,
    fmt::Formatter,
    io,
};

use serde::{
    de::{self, Visitor},
    Deserialize, Deserializer, Serialize, Serializer,
};

use crate::types::status_codes;

bitflags! {
    /// The informational bits of a status code, i.e. everything below the sub code.
    pub struct StatusCodeBits: u32 {
        const STRUCTURE_CHANGED       = 0b1000_0000_0000_0000;
        const SEMANTICS_CHANGED       = 0b0100_0000_0000_0000;
        // Info type bits 10:11
        const INFO_TYPE_DATA_VALUE    = 0b0000_0100_0000_0000;
        // Limit bits 8:9
        const LIMIT_LOW               = 0b0000_0001_0000_0000;
        const LIMIT_HIGH              = 0b0000_0010_0000_0000;
        const LIMIT_CONSTANT          = 0b0000_0011_0000_0000;
        // Overflow bit 7
        const OVERFLOW                = 0b0000_0000_1000_0000;
        // Historian bits 0:4
        const HISTORICAL_CALCULATED   = 0b0000_0000_0000_0001;
        const HISTORICAL_INTERPOLATED = 0b0000_0000_0000_0010;
        const HISTORICAL_RESERVED     = 0b0000_0000_0000_0011;
        const HISTORICAL_PARTIAL      = 0b0000_0000_0000_0100;
        const HISTORICAL_EXTRA_DATA   = 0b0000_0000_0000_1000;
        const HISTORICAL_MULTI_VALUE  = 0b0000_0000_0001_0000;
    }
}

/// A numeric identifier for an error or condition that is associated with a value or an
/// operation.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StatusCode(u32);

impl StatusCode {
    pub const SEVERITY_MASK: u32 = 0xC000_0000;
    pub const SEVERITY_GOOD: u32 = 0x0000_0000;
    pub const SEVERITY_UNCERTAIN: u32 = 0x4000_0000;
    pub const SEVERITY_BAD: u32 = 0x8000_0000;

    pub const RESERVED1_MASK: u32 = 0x3000_0000;
    pub const SUB_CODE_MASK: u32 = 0x0FFF_0000;

    pub const STRUCTURE_CHANGED_MASK: u32 = 0x8000;
    pub const SEMANTICS_CHANGED_MASK: u32 = 0x4000;
    pub const RESERVED2_MASK: u32 = 0x3000;

    pub const INFO_TYPE_MASK: u32 = 0x0C00;
    pub const INFO_TYPE_DATA_VALUE: u32 = 0x0400;
    pub const INFO_BITS_MASK: u32 = 0x03FF;

    pub const LIMIT_BITS_MASK: u32 = 0x0300;
    pub const LIMIT_BITS_NONE: u32 = 0x0000;
    pub const LIMIT_BITS_LOW: u32 = 0x0100;
    pub const LIMIT_BITS_HIGH: u32 = 0x0200;
    pub const LIMIT_BITS_CONSTANT: u32 = 0x0300;

    /// The overflow test looks at the data value info type bit as well as the overflow bit.
    pub const OVERFLOW_MASK: u32 = 0x0480;
    pub const OVERFLOW_BIT: u32 = 0x0080;

    pub const HISTORIAN_BITS_MASK: u32 = 0x001F;
    pub const HISTORIAN_BITS_RAW: u32 = 0x0000;
    pub const HISTORIAN_BITS_CALCULATED: u32 = 0x0001;
    pub const HISTORIAN_BITS_INTERPOLATED: u32 = 0x0002;
    pub const HISTORIAN_BITS_RESERVED: u32 = 0x0003;
    pub const HISTORIAN_BITS_PARTIAL: u32 = 0x0004;
    pub const HISTORIAN_BITS_EXTRA_DATA: u32 = 0x0008;
    pub const HISTORIAN_BITS_MULTI_VALUE: u32 = 0x0010;

    /// Mask used when matching a code against a symbolic constant.
    pub const STATUS_MASK: u32 = Self::SEVERITY_MASK | Self::SUB_CODE_MASK;
    /// Mask of everything that is not part of the status itself.
    pub const BIT_MASK: u32 = 0x0000_FFFF;

    /// Creates a status code from its raw 32-bit value. All bits are retained.
    pub const fn from_bits(bits: u32) -> StatusCode {
        StatusCode(bits)
    }

    /// Returns the raw 32-bit value.
    pub const fn bits(&self) -> u32 {
        self.0
    }

    /// Returns the bit flags of the status code, i.e. it masks out the actual status code value
    pub fn bitflags(&self) -> StatusCodeBits {
        StatusCodeBits::from_bits_truncate(self.0 & Self::BIT_MASK)
    }

    /// Returns the status only, i.e. it masks out any bit flags that come with the status code
    pub fn status(&self) -> StatusCode {
        StatusCode(self.0 & Self::STATUS_MASK)
    }

    /// Tests if the status code is good (severity bits 00)
    pub fn is_good(&self) -> bool {
        self.0 & Self::SEVERITY_MASK == Self::SEVERITY_GOOD
    }

    /// Tests if the status code is bad (severity bits 10)
    pub fn is_bad(&self) -> bool {
        self.0 & Self::SEVERITY_MASK == Self::SEVERITY_BAD
    }

    /// Tests if the status code is uncertain (severity bits 01)
    pub fn is_uncertain(&self) -> bool {
        self.0 & Self::SEVERITY_MASK == Self::SEVERITY_UNCERTAIN
    }

    pub fn is_not_good(&self) -> bool {
        !self.is_good()
    }

    pub fn is_not_bad(&self) -> bool {
        !self.is_bad()
    }

    pub fn is_not_uncertain(&self) -> bool {
        !self.is_uncertain()
    }

    /// Tests the overflow condition. Either the info type is data value or the overflow bit is
    /// set.
    pub fn is_overflow(&self) -> bool {
        self.0 & Self::OVERFLOW_MASK != 0
    }

    pub fn is_structure_changed(&self) -> bool {
        self.0 & Self::STRUCTURE_CHANGED_MASK != 0
    }

    pub fn is_semantics_changed(&self) -> bool {
        self.0 & Self::SEMANTICS_CHANGED_MASK != 0
    }

    pub fn severity(&self) -> u32 {
        self.0 & Self::SEVERITY_MASK
    }

    pub fn sub_code(&self) -> u32 {
        self.0 & Self::SUB_CODE_MASK
    }

    pub fn info_type(&self) -> u32 {
        self.0 & Self::INFO_TYPE_MASK
    }

    pub fn limit_bits(&self) -> u32 {
        self.0 & Self::LIMIT_BITS_MASK
    }

    pub fn historian_bits(&self) -> u32 {
        self.0 & Self::HISTORIAN_BITS_MASK
    }

    /// Tests if this code has the same severity and sub code as the other, ignoring info bits.
    /// Use this to match a received code against one of the named constants.
    pub fn is_status_code(&self, other: StatusCode) -> bool {
        self.0 & Self::STATUS_MASK == other.0 & Self::STATUS_MASK
    }

    /// Same as `is_status_code` but against a raw value.
    pub fn equals_status_code(&self, other: u32) -> bool {
        self.0 & Self::STATUS_MASK == other & Self::STATUS_MASK
    }

    pub fn with_structure_changed(self, value: bool) -> StatusCode {
        self.with_bits(Self::STRUCTURE_CHANGED_MASK, value)
    }

    pub fn with_semantics_changed(self, value: bool) -> StatusCode {
        self.with_bits(Self::SEMANTICS_CHANGED_MASK, value)
    }

    /// Sets the info type to data value and applies the limit bits. Other bits are retained.
    pub fn with_limit_bits(self, limit_bits: u32) -> StatusCode {
        let bits = self.0 & !Self::LIMIT_BITS_MASK;
        StatusCode(bits | Self::INFO_TYPE_DATA_VALUE | (limit_bits & Self::LIMIT_BITS_MASK))
    }

    pub fn with_overflow(self, value: bool) -> StatusCode {
        let code = self.with_bits(Self::OVERFLOW_BIT, value);
        if value {
            StatusCode(code.0 | Self::INFO_TYPE_DATA_VALUE)
        } else {
            code
        }
    }

    pub fn with_historian_bits(self, historian_bits: u32) -> StatusCode {
        let bits = self.0 & !Self::HISTORIAN_BITS_MASK;
        StatusCode(bits | (historian_bits & Self::HISTORIAN_BITS_MASK))
    }

    fn with_bits(self, mask: u32, value: bool) -> StatusCode {
        if value {
            StatusCode(self.0 | mask)
        } else {
            StatusCode(self.0 & !mask)
        }
    }

    /// The symbolic name of the status, or its hex value if it is not one of the named codes.
    pub fn name(&self) -> String {
        match status_codes::lookup(self.0 & Self::STATUS_MASK) {
            Some((name, _)) => name.to_string(),
            None => format!("0x{:08X}", self.0 & Self::STATUS_MASK),
        }
    }

    /// A description of the status, or an empty string if it is not one of the named codes.
    pub fn description(&self) -> &'static str {
        status_codes::lookup(self.0 & Self::STATUS_MASK)
            .map(|(_, description)| description)
            .unwrap_or("")
    }
}

impl Default for StatusCode {
    fn default() -> Self {
        StatusCode::Good
    }
}

impl From<u32> for StatusCode {
    fn from(value: u32) -> Self {
        StatusCode(value)
    }
}

impl From<StatusCode> for u32 {
    fn from(value: StatusCode) -> Self {
        value.0
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        // Displays the StatusCode as it's name, or its name+bitflags
        let bits = self.bitflags();
        if bits.is_empty() {
            write!(f, "{}", self.name())
        } else {
            write!(f, "{}+{:?}", self.name(), bits)
        }
    }
}

impl fmt::Debug for StatusCode {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{} (0x{:08X})", self, self.0)
    }
}

impl Error for StatusCode {}

impl From<StatusCode> for io::Error {
    fn from(e: StatusCode) -> io::Error {
        io::Error::new(io::ErrorKind::Other, format!("StatusCode {}", e))
    }
}

// Serialize / Deserialize are manually implemented so the code goes out as its raw value.

impl Serialize for StatusCode {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u32(self.0)
    }
}

struct StatusCodeVisitor;

impl<'de> Visitor<'de> for StatusCodeVisitor {
    type Value = u32;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("an unsigned 32-bit integer")
    }

    fn visit_u32<E>(self, value: u32) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(value)
    }

    fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        u32::try_from(value).map_err(|_| E::custom(format!("status code {} out of range", value)))
    }
}

impl<'de> Deserialize<'de> for StatusCode {
    fn deserialize<D>(deserializer: D) -> Result<Self, <D as Deserializer<'de>>::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(StatusCode(deserializer.deserialize_u32(StatusCodeVisitor)?))
    }
}

#[test]
fn status_code() {
    assert!(StatusCode::Good.is_good());
    assert!(!StatusCode::Good.is_bad());
    assert!(!StatusCode::Good.is_uncertain());

    assert!(StatusCode::UncertainLastUsableValue.is_uncertain());
    assert!(!StatusCode::UncertainLastUsableValue.is_bad());
    assert!(!StatusCode::UncertainLastUsableValue.is_good());

    assert!(StatusCode::BadDecodingError.is_bad());
    assert!(!StatusCode::BadDecodingError.is_uncertain());
    assert!(!StatusCode::BadDecodingError.is_good());

    let code = StatusCode::BadDecodingError.with_historian_bits(StatusCode::HISTORIAN_BITS_CALCULATED);
    assert_eq!(code.status(), StatusCode::BadDecodingError);
    assert_eq!(code.bitflags(), StatusCodeBits::HISTORICAL_CALCULATED);
}
