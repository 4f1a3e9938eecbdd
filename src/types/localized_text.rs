// OPCUA for Rust
// SPDX-License-Identifier: MPL-2.0
// Copyright (C) 2017-2022 Adam Lock

//! Contains the definition of `LocalizedText`.
use std::fmt;

use regex::Regex;

use crate::types::string::*;

lazy_static! {
    // <language>[-<country/region>], e.g. "en", "en-US", "zh-CHS". Empty means no locale.
    static ref LOCALE_RE: Regex = Regex::new(r"^(([a-z]{2})(-([A-Z]{2,3}))?)?$").unwrap();
}

/// A human readable text with an optional locale identifier.
#[derive(PartialEq, Eq, Hash, Default, Debug, Clone, Serialize, Deserialize)]
pub struct LocalizedText {
    /// The locale. Null or empty if there is none
    pub locale: UAString,
    /// The text in the specified locale.
    pub text: UAString,
}

impl<'a> From<&'a str> for LocalizedText {
    fn from(value: &'a str) -> Self {
        Self {
            locale: UAString::null(),
            text: UAString::from(value),
        }
    }
}

impl From<&String> for LocalizedText {
    fn from(value: &String) -> Self {
        Self::from(value.as_str())
    }
}

impl From<String> for LocalizedText {
    fn from(value: String) -> Self {
        Self {
            locale: UAString::null(),
            text: UAString::from(value),
        }
    }
}

impl fmt::Display for LocalizedText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.locale.is_null() {
            write!(f, "{}", self.text)
        } else {
            write!(f, "({}) {}", self.locale, self.text)
        }
    }
}

impl LocalizedText {
    pub fn new(locale: &str, text: &str) -> LocalizedText {
        LocalizedText {
            locale: UAString::from(locale),
            text: UAString::from(text),
        }
    }

    /// Text in the "en" locale
    pub fn english(text: &str) -> LocalizedText {
        LocalizedText::new("en", text)
    }

    pub fn null() -> LocalizedText {
        LocalizedText {
            locale: UAString::null(),
            text: UAString::null(),
        }
    }

    pub fn is_null(&self) -> bool {
        self.locale.is_null() && self.text.is_null()
    }

    /// Tests if a locale id has the form `<language>[-<country/region>]`, or is empty.
    pub fn is_valid_locale(locale: &str) -> bool {
        LOCALE_RE.is_match(locale)
    }
}

#[test]
fn localized_text_display() {
    assert_eq!(LocalizedText::from("Hello").to_string(), "Hello");
    assert_eq!(LocalizedText::english("Hello").to_string(), "(en) Hello");
    assert_eq!(LocalizedText::new("de-DE", "Hallo").to_string(), "(de-DE) Hallo");
}

#[test]
fn localized_text_locale() {
    assert!(LocalizedText::is_valid_locale(""));
    assert!(LocalizedText::is_valid_locale("en"));
    assert!(LocalizedText::is_valid_locale("en-US"));
    assert!(LocalizedText::is_valid_locale("zh-CHS"));
    assert!(!LocalizedText::is_valid_locale("EN"));
    assert!(!LocalizedText::is_valid_locale("en-us"));
    assert!(!LocalizedText::is_valid_locale("english"));
}
