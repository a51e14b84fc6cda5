//! Identifiers that may be given either as a numeric id or as a name.

use serde::{Deserialize, Serialize, Serializer};

/// A user-supplied reference to a provider object: numeric id or symbolic name.
///
/// Deserializes from a JSON integer or a JSON string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IntOrName {
    Id(i64),
    Name(String),
}

impl From<i64> for IntOrName {
    fn from(id: i64) -> Self {
        IntOrName::Id(id)
    }
}

impl From<&str> for IntOrName {
    fn from(name: &str) -> Self {
        IntOrName::Name(name.to_string())
    }
}

impl From<String> for IntOrName {
    fn from(name: String) -> Self {
        IntOrName::Name(name)
    }
}

/// API-facing reference: the unused field stays zero or empty.
///
/// Serialized as the id when it is non-zero, otherwise as the name. A
/// reference with neither set goes out as an empty name and is left for the
/// provider to reject.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ResourceRef {
    pub id: i64,
    pub name: String,
}

impl ResourceRef {
    pub fn by_id(id: i64) -> Self {
        Self {
            id,
            name: String::new(),
        }
    }

    pub fn by_name(name: impl Into<String>) -> Self {
        Self {
            id: 0,
            name: name.into(),
        }
    }
}

impl Serialize for ResourceRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.id != 0 {
            serializer.serialize_i64(self.id)
        } else {
            serializer.serialize_str(&self.name)
        }
    }
}

/// Restructure a union identifier into the reference the provider API takes.
///
/// Pure and total; no validation happens here.
pub fn resolve(value: &IntOrName) -> ResourceRef {
    match value {
        IntOrName::Id(id) => ResourceRef::by_id(*id),
        IntOrName::Name(name) => ResourceRef::by_name(name.clone()),
    }
}
