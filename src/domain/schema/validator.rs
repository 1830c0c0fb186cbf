//! Shape validation of raw JSON against an explicit field list
//!
//! A schema enumerates every field the system reads, whether it must be
//! present, and its primitive type. Validation stops at the first violation
//! and reports its path; nothing is deserialized unless the whole object
//! matches.

use std::fmt;
use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::domain::DomainError;

/// Primitive and structural types a field may have
#[derive(Debug, Clone, PartialEq)]
pub enum FieldType {
    String,
    /// Any JSON number
    Number,
    /// A JSON number without a fractional part
    Integer,
    Boolean,
    Array(Box<FieldType>),
    Object(Vec<Field>),
    /// Present with any value
    Any,
}

impl FieldType {
    pub fn array_of(item: FieldType) -> Self {
        Self::Array(Box::new(item))
    }

    fn matches_primitive(&self, value: &Value) -> bool {
        match self {
            Self::String => value.is_string(),
            Self::Number => value.is_number(),
            Self::Integer => value.is_i64() || value.is_u64(),
            Self::Boolean => value.is_boolean(),
            Self::Array(_) => value.is_array(),
            Self::Object(_) => value.is_object(),
            Self::Any => true,
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String => write!(f, "string"),
            Self::Number => write!(f, "number"),
            Self::Integer => write!(f, "integer"),
            Self::Boolean => write!(f, "boolean"),
            Self::Array(item) => write!(f, "array of {}", item),
            Self::Object(_) => write!(f, "object"),
            Self::Any => write!(f, "any value"),
        }
    }
}

/// How a field may be present in the payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    /// Key must exist with a non-null value
    Required,
    /// Key must exist, value may be null
    Nullable,
    /// Key may be missing; when present it must not be null
    Optional,
}

/// A single named field of an object schema
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: &'static str,
    pub field_type: FieldType,
    pub presence: Presence,
}

impl Field {
    pub fn required(name: &'static str, field_type: FieldType) -> Self {
        Self {
            name,
            field_type,
            presence: Presence::Required,
        }
    }

    pub fn nullable(name: &'static str, field_type: FieldType) -> Self {
        Self {
            name,
            field_type,
            presence: Presence::Nullable,
        }
    }

    pub fn optional(name: &'static str, field_type: FieldType) -> Self {
        Self {
            name,
            field_type,
            presence: Presence::Optional,
        }
    }
}

/// Object schema whose successful validation yields a `T`
#[derive(Debug, Clone)]
pub struct Schema<T> {
    name: &'static str,
    fields: Vec<Field>,
    _target: PhantomData<fn() -> T>,
}

impl<T: DeserializeOwned> Schema<T> {
    pub fn new(name: &'static str, fields: Vec<Field>) -> Self {
        Self {
            name,
            fields,
            _target: PhantomData,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Validates `raw` and converts it into `T`
    pub fn validate(&self, raw: &Value) -> Result<T, DomainError> {
        check_object(raw, &self.fields, "")?;

        serde_json::from_value(raw.clone()).map_err(|e| {
            DomainError::validation(self.name, format!("Failed to decode payload: {}", e))
        })
    }
}

/// Validates untrusted JSON against `schema`, all-or-nothing
pub fn validate<T: DeserializeOwned>(raw: &Value, schema: &Schema<T>) -> Result<T, DomainError> {
    schema.validate(raw)
}

fn join_path(parent: &str, name: &str) -> String {
    if parent.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", parent, name)
    }
}

fn display_path(path: &str) -> &str {
    if path.is_empty() { "$" } else { path }
}

fn check_object(value: &Value, fields: &[Field], path: &str) -> Result<(), DomainError> {
    let object = value.as_object().ok_or_else(|| {
        DomainError::validation(display_path(path), format!("expected object, got {}", kind(value)))
    })?;

    for field in fields {
        let field_path = join_path(path, field.name);

        match (object.get(field.name), field.presence) {
            (None, Presence::Optional) => {}
            (None, _) => {
                return Err(DomainError::validation(field_path, "required field is missing"));
            }
            (Some(Value::Null), Presence::Nullable) => {}
            (Some(Value::Null), _) => {
                return Err(DomainError::validation(
                    field_path,
                    format!("expected {}, got null", field.field_type),
                ));
            }
            (Some(inner), _) => check_value(inner, &field.field_type, &field_path)?,
        }
    }

    Ok(())
}

fn check_value(value: &Value, field_type: &FieldType, path: &str) -> Result<(), DomainError> {
    if !field_type.matches_primitive(value) {
        return Err(DomainError::validation(
            path,
            format!("expected {}, got {}", field_type, kind(value)),
        ));
    }

    match (field_type, value) {
        (FieldType::Array(item), Value::Array(items)) => {
            for (index, element) in items.iter().enumerate() {
                check_value(element, item, &format!("{}[{}]", path, index))?;
            }
            Ok(())
        }
        (FieldType::Object(fields), _) => check_object(value, fields, path),
        _ => Ok(()),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Language {
        name: String,
        percent: f64,
    }

    #[derive(Debug, Deserialize, PartialEq)]
    struct Payload {
        login: String,
        name: Option<String>,
        followers: u64,
        topics: Option<Vec<String>>,
        languages: Vec<Language>,
    }

    fn schema() -> Schema<Payload> {
        Schema::new(
            "payload",
            vec![
                Field::required("login", FieldType::String),
                Field::nullable("name", FieldType::String),
                Field::required("followers", FieldType::Integer),
                Field::optional("topics", FieldType::array_of(FieldType::String)),
                Field::required(
                    "languages",
                    FieldType::array_of(FieldType::Object(vec![
                        Field::required("name", FieldType::String),
                        Field::required("percent", FieldType::Number),
                    ])),
                ),
            ],
        )
    }

    fn valid() -> Value {
        json!({
            "login": "octocat",
            "name": null,
            "followers": 12,
            "extra": {"ignored": true},
            "languages": [{"name": "Rust", "percent": 61.5}]
        })
    }

    #[test]
    fn test_valid_payload_decodes() {
        let payload = validate(&valid(), &schema()).unwrap();

        assert_eq!(payload.login, "octocat");
        assert_eq!(payload.name, None);
        assert_eq!(payload.topics, None);
        assert_eq!(payload.languages[0].percent, 61.5);
    }

    #[test]
    fn test_missing_required_field() {
        let mut raw = valid();
        raw.as_object_mut().unwrap().remove("login");

        let err = validate(&raw, &schema()).unwrap_err();
        assert!(matches!(err, DomainError::Validation { ref path, .. } if path == "login"));
    }

    #[test]
    fn test_nullable_field_must_still_be_present() {
        let mut raw = valid();
        raw.as_object_mut().unwrap().remove("name");

        let err = validate(&raw, &schema()).unwrap_err();
        assert!(matches!(err, DomainError::Validation { ref path, .. } if path == "name"));
    }

    #[test]
    fn test_optional_field_rejects_null() {
        let mut raw = valid();
        raw["topics"] = Value::Null;

        let err = validate(&raw, &schema()).unwrap_err();
        assert!(matches!(err, DomainError::Validation { ref path, .. } if path == "topics"));
    }

    #[test]
    fn test_integer_rejects_fraction() {
        let mut raw = valid();
        raw["followers"] = json!(1.5);

        let err = validate(&raw, &schema()).unwrap_err();
        assert!(err.to_string().contains("expected integer"));
    }

    #[test]
    fn test_reports_first_violating_nested_path() {
        let mut raw = valid();
        raw["languages"] = json!([
            {"name": "Rust", "percent": 50},
            {"name": "Go", "percent": "lots"},
            {"name": 3, "percent": "none"}
        ]);

        let err = validate(&raw, &schema()).unwrap_err();
        match err {
            DomainError::Validation { path, message } => {
                assert_eq!(path, "languages[1].percent");
                assert_eq!(message, "expected number, got string");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_array_element_type_checked() {
        let mut raw = valid();
        raw["topics"] = json!(["cli", 7]);

        let err = validate(&raw, &schema()).unwrap_err();
        assert!(matches!(err, DomainError::Validation { ref path, .. } if path == "topics[1]"));
    }

    #[test]
    fn test_non_object_root() {
        let err = validate(&json!([1, 2]), &schema()).unwrap_err();
        assert!(matches!(err, DomainError::Validation { ref path, .. } if path == "$"));
    }
}
