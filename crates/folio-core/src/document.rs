//! The portfolio document.
//!
//! One [`PortfolioDocument`] holds all editable site content. Every known
//! section is typed and optional; absent sections are not serialized. Each
//! struct keeps fields it does not know in a flattened `extra` map, so content
//! written by a newer editor survives a round-trip through this crate.
//!
//! Two top-level fields are not content: `adminPassword`, the admin credential
//! override, and `web3formsKey`, the contact-form relay key. The storage
//! identity field (`_id`) is never part of a document; it is stripped on the
//! way in.
//!
//! The server stores and returns submitted bodies as raw JSON objects and
//! only looks at the reserved fields, through [`check_reserved_fields`] and
//! [`stored_override`]. The typed view is for editing.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use folio_storage::{ID_FIELD, JsonObject};

use crate::error::DocumentError;

/// Wire name of the admin credential override.
pub const ADMIN_PASSWORD_FIELD: &str = "adminPassword";

/// Wire name of the contact-form relay key.
pub const FORM_KEY_FIELD: &str = "web3formsKey";

/// The single persisted portfolio record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioDocument {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub personal: Option<Personal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub social: Option<Social>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub about: Option<About>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skills: Option<Vec<SkillCategory>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub projects: Option<Vec<Project>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub education: Option<Vec<Education>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub experience: Option<Vec<Experience>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub services: Option<Vec<Service>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_sections: Option<Vec<CustomSection>>,
    /// Admin credential override. Takes precedence over the configured
    /// default when present and non-empty.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_password: Option<String>,
    /// Access key for the third-party contact form relay.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub web3forms_key: Option<String>,
    #[serde(flatten)]
    pub extra: JsonObject,
}

/// Identifier of a list item. Editors have written both numbers and strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ItemId {
    Number(i64),
    Text(String),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Personal {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resume: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub university: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(flatten)]
    pub extra: JsonObject,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Social {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub github: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub facebook: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instagram: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub twitter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(flatten)]
    pub extra: JsonObject,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct About {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub highlights: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<Vec<Stat>>,
    #[serde(flatten)]
    pub extra: JsonObject,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Stat {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(flatten)]
    pub extra: JsonObject,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SkillCategory {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<Skill>>,
    #[serde(flatten)]
    pub extra: JsonObject,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Skill {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Proficiency, usually 0 to 100. Any JSON number is kept as written.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<serde_json::Number>,
    #[serde(flatten)]
    pub extra: JsonObject,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Project {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<ItemId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub github: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub live: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub featured: Option<bool>,
    #[serde(flatten)]
    pub extra: JsonObject,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Education {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<ItemId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub degree: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub institution: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub achievements: Option<Vec<String>>,
    #[serde(flatten)]
    pub extra: JsonObject,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Experience {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<ItemId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub responsibilities: Option<Vec<String>>,
    #[serde(flatten)]
    pub extra: JsonObject,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Service {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<ItemId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(flatten)]
    pub extra: JsonObject,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CustomSection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<ItemId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// `grid` or `list`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layout: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<CustomItem>>,
    #[serde(flatten)]
    pub extra: JsonObject,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CustomItem {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<ItemId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(flatten)]
    pub extra: JsonObject,
}

impl PortfolioDocument {
    /// Parse and validate a document from an arbitrary JSON value.
    ///
    /// Any storage identity field is dropped.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::Invalid`] if `value` is not an object or does
    /// not match the schema.
    pub fn from_value(value: Value) -> Result<Self, DocumentError> {
        match value {
            Value::Object(body) => Self::from_object(body),
            other => Err(DocumentError::Invalid {
                reason: format!("expected an object, got {}", json_kind(&other)),
            }),
        }
    }

    /// Parse and validate a document from a JSON object.
    ///
    /// Any storage identity field is dropped.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::Invalid`] if the object does not match the
    /// schema.
    pub fn from_object(mut body: JsonObject) -> Result<Self, DocumentError> {
        body.remove(ID_FIELD);
        let document: Self =
            serde_json::from_value(Value::Object(body)).map_err(|e| DocumentError::Invalid {
                reason: e.to_string(),
            })?;
        document.validate()?;
        Ok(document)
    }

    /// Serialize to a JSON object. Absent sections are omitted.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::Encoding`] if serialization fails.
    pub fn to_object(&self) -> Result<JsonObject, DocumentError> {
        match serde_json::to_value(self) {
            Ok(Value::Object(body)) => Ok(body),
            Ok(other) => Err(DocumentError::Encoding {
                reason: format!("document serialized to {}", json_kind(&other)),
            }),
            Err(e) => Err(DocumentError::Encoding {
                reason: e.to_string(),
            }),
        }
    }

    /// Pretty-printed JSON, for export.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::Encoding`] if serialization fails.
    pub fn to_pretty_json(&self) -> Result<String, DocumentError> {
        serde_json::to_string_pretty(self).map_err(|e| DocumentError::Encoding {
            reason: e.to_string(),
        })
    }

    /// Check constraints the type system does not express.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::Invalid`] naming the first violation.
    pub fn validate(&self) -> Result<(), DocumentError> {
        if self.extra.contains_key(ID_FIELD) {
            return Err(DocumentError::Invalid {
                reason: format!("'{ID_FIELD}' is reserved for storage"),
            });
        }
        Ok(())
    }

    /// The stored admin credential override, if present and non-empty.
    #[must_use]
    pub fn credential_override(&self) -> Option<&str> {
        self.admin_password.as_deref().filter(|p| !p.is_empty())
    }

    /// Shallow merge: every top-level field present in `overlay` replaces the
    /// same field in `self`; fields absent from `overlay` are kept.
    ///
    /// # Errors
    ///
    /// Returns a [`DocumentError`] if either side fails to serialize or the
    /// result fails validation.
    pub fn merged_with(&self, overlay: &Self) -> Result<Self, DocumentError> {
        let mut base = self.to_object()?;
        base.extend(overlay.to_object()?);
        Self::from_object(base)
    }

    /// Replace one whole top-level section.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::Section`] if `section` is the storage
    /// identity field, or [`DocumentError::Invalid`] if the new value does
    /// not fit the section's schema.
    pub fn with_section(&self, section: &str, value: Value) -> Result<Self, DocumentError> {
        if section == ID_FIELD {
            return Err(DocumentError::Section {
                section: section.to_owned(),
                reason: "reserved for storage".to_owned(),
            });
        }

        let mut body = self.to_object()?;
        body.insert(section.to_owned(), value);
        Self::from_object(body)
    }

    /// Set a single field inside an object section, creating the section if
    /// it does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::Section`] if the section exists but is not an
    /// object, or [`DocumentError::Invalid`] if the result does not fit the
    /// schema.
    pub fn with_nested_field(
        &self,
        section: &str,
        key: &str,
        value: Value,
    ) -> Result<Self, DocumentError> {
        let body = self.to_object()?;
        let mut fields = match body.get(section) {
            None | Some(Value::Null) => JsonObject::new(),
            Some(Value::Object(fields)) => fields.clone(),
            Some(other) => {
                return Err(DocumentError::Section {
                    section: section.to_owned(),
                    reason: format!("section is {}, not an object", json_kind(other)),
                });
            }
        };
        fields.insert(key.to_owned(), value);
        self.with_section(section, Value::Object(fields))
    }
}

/// Check the reserved top-level fields of a raw body.
///
/// `adminPassword` and `web3formsKey` must be strings or `null` when present.
/// Every other field is left to the client.
///
/// # Errors
///
/// Returns [`DocumentError::Invalid`] naming the offending field.
pub fn check_reserved_fields(body: &JsonObject) -> Result<(), DocumentError> {
    for field in [ADMIN_PASSWORD_FIELD, FORM_KEY_FIELD] {
        match body.get(field) {
            None | Some(Value::Null | Value::String(_)) => {}
            Some(other) => {
                return Err(DocumentError::Invalid {
                    reason: format!("'{field}' must be a string, got {}", json_kind(other)),
                });
            }
        }
    }
    Ok(())
}

/// The credential override in a raw stored body, if it is a non-empty string.
#[must_use]
pub fn stored_override(body: &JsonObject) -> Option<&str> {
    body.get(ADMIN_PASSWORD_FIELD)
        .and_then(Value::as_str)
        .filter(|p| !p.is_empty())
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
