//! E-mail, phone and URL extraction.

use crate::models::document::Contacts;

use super::FieldExtractor;
use super::patterns::{EMAIL, PHONE, URL};

/// E-mail extractor; values are lower-cased.
pub struct EmailExtractor;

impl FieldExtractor for EmailExtractor {
    type Output = String;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        EMAIL.find(text).map(|m| m.as_str().to_lowercase())
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        unique(EMAIL.find_iter(text).map(|m| m.as_str().to_lowercase()))
    }
}

/// Phone extractor; values keep only digits and `+`.
pub struct PhoneExtractor;

impl PhoneExtractor {
    fn normalize(raw: &str) -> String {
        raw.chars().filter(|c| c.is_ascii_digit() || *c == '+').collect()
    }
}

impl FieldExtractor for PhoneExtractor {
    type Output = String;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        PHONE.find(text).map(|m| Self::normalize(m.as_str()))
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        unique(PHONE.find_iter(text).map(|m| Self::normalize(m.as_str())))
    }
}

/// URL extractor.
pub struct UrlExtractor;

impl FieldExtractor for UrlExtractor {
    type Output = String;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        URL.find(text).map(|m| m.as_str().to_string())
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        unique(URL.find_iter(text).map(|m| m.as_str().to_string()))
    }
}

fn unique(values: impl Iterator<Item = String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for value in values {
        if !out.contains(&value) {
            out.push(value);
        }
    }
    out
}

/// Extract all contact details, in encounter order.
pub fn extract_contacts(text: &str) -> Contacts {
    Contacts {
        emails: EmailExtractor.extract_all(text),
        phones: PhoneExtractor.extract_all(text),
        urls: UrlExtractor.extract_all(text),
    }
}
