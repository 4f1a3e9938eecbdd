// OPCUA for Rust
// SPDX-License-Identifier: MPL-2.0
// Copyright (C) 2017-2022 Adam Lock

//! Contains the definition of `DiagnosticInfo`.

use crate::types::{status_code::StatusCode, string::UAString};

bitflags! {
    /// Which of the optional fields of a `DiagnosticInfo` are present.
    pub struct DiagnosticInfoMask: u8 {
        const HAS_SYMBOLIC_ID = 0x01;
        const HAS_NAMESPACE = 0x02;
        const HAS_LOCALIZED_TEXT = 0x04;
        const HAS_LOCALE = 0x08;
        const HAS_ADDITIONAL_INFO = 0x10;
        const HAS_INNER_STATUS_CODE = 0x20;
        const HAS_INNER_DIAGNOSTIC_INFO = 0x40;
    }
}

/// Diagnostic information. The symbolic id, namespace uri, locale and localized text fields are
/// indices into a string table that accompanies the response carrying the diagnostic.
#[derive(PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct DiagnosticInfo {
    /// A symbolic name for the status code.
    pub symbolic_id: Option<i32>,
    /// A namespace that qualifies the symbolic id.
    pub namespace_uri: Option<i32>,
    /// The locale used for the localized text.
    pub locale: Option<i32>,
    /// A human readable summary of the status code.
    pub localized_text: Option<i32>,
    /// Detailed application specific diagnostic information.
    pub additional_info: Option<UAString>,
    /// A status code provided by an underlying system.
    pub inner_status_code: Option<StatusCode>,
    /// Diagnostic info associated with the inner status code.
    pub inner_diagnostic_info: Option<Box<DiagnosticInfo>>,
}

impl DiagnosticInfo {
    pub fn null() -> DiagnosticInfo {
        DiagnosticInfo::default()
    }

    pub fn is_null(&self) -> bool {
        self.encoding_mask().is_empty()
    }

    pub fn encoding_mask(&self) -> DiagnosticInfoMask {
        let mut encoding_mask = DiagnosticInfoMask::empty();
        if self.symbolic_id.is_some() {
            encoding_mask |= DiagnosticInfoMask::HAS_SYMBOLIC_ID;
        }
        if self.namespace_uri.is_some() {
            encoding_mask |= DiagnosticInfoMask::HAS_NAMESPACE;
        }
        if self.locale.is_some() {
            encoding_mask |= DiagnosticInfoMask::HAS_LOCALE;
        }
        if self.localized_text.is_some() {
            encoding_mask |= DiagnosticInfoMask::HAS_LOCALIZED_TEXT;
        }
        if self.additional_info.is_some() {
            encoding_mask |= DiagnosticInfoMask::HAS_ADDITIONAL_INFO;
        }
        if self.inner_status_code.is_some() {
            encoding_mask |= DiagnosticInfoMask::HAS_INNER_STATUS_CODE;
        }
        if self.inner_diagnostic_info.is_some() {
            encoding_mask |= DiagnosticInfoMask::HAS_INNER_DIAGNOSTIC_INFO;
        }
        encoding_mask
    }

    /// Walks the chain of inner diagnostics, returning how deep it goes.
    pub fn depth(&self) -> usize {
        let mut depth = 1;
        let mut current = self;
        while let Some(ref inner) = current.inner_diagnostic_info {
            depth += 1;
            current = inner;
        }
        depth
    }
}

#[test]
fn diagnostic_info_mask() {
    let d = DiagnosticInfo::null();
    assert!(d.is_null());
    assert_eq!(d.depth(), 1);

    let d = DiagnosticInfo {
        symbolic_id: Some(2),
        inner_status_code: Some(StatusCode::BadTimeout),
        inner_diagnostic_info: Some(Box::new(DiagnosticInfo {
            additional_info: Some(UAString::from("socket closed")),
            ..Default::default()
        })),
        ..Default::default()
    };
    assert!(!d.is_null());
    assert_eq!(
        d.encoding_mask(),
        DiagnosticInfoMask::HAS_SYMBOLIC_ID
            | DiagnosticInfoMask::HAS_INNER_STATUS_CODE
            | DiagnosticInfoMask::HAS_INNER_DIAGNOSTIC_INFO
    );
    assert_eq!(d.depth(), 2);
}
