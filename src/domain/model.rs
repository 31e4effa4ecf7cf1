use serde::{Deserialize, Serialize};

/// An opaque lookup key (a CPF), already trimmed of surrounding whitespace.
pub type Identifier = String;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LookupResult {
    Found(String),
    NotFound,
}

impl LookupResult {
    pub fn is_found(&self) -> bool {
        matches!(self, LookupResult::Found(_))
    }

    /// The found phone, or `placeholder` when the lookup came back empty.
    pub fn display_phone<'a>(&'a self, placeholder: &'a str) -> &'a str {
        match self {
            LookupResult::Found(phone) => phone,
            LookupResult::NotFound => placeholder,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportRow {
    pub identifier: Identifier,
    pub phone: String,
}

impl ReportRow {
    pub fn from_lookup(identifier: Identifier, result: &LookupResult, placeholder: &str) -> Self {
        Self {
            phone: result.display_phone(placeholder).to_string(),
            identifier,
        }
    }
}

/// Pairs of identifiers and their lookup results, in input order.
pub type BatchResult = Vec<(Identifier, LookupResult)>;
