//! Request and response types for the PetFriends API.

use crate::error::{ApiError, ApiResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Key returned by `GET /api/key`, sent back in the `auth_key` header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthKey {
    pub key: String,
}

impl AuthKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }

    /// A key the service has never issued. Used to exercise rejection paths.
    pub fn invalid() -> Self {
        Self::new("123")
    }
}

/// Which pets to list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PetListFilter {
    #[default]
    All,
    /// Only pets owned by the caller
    MyPets,
}

impl PetListFilter {
    /// Value of the `filter` query parameter
    pub fn as_query(&self) -> &'static str {
        match self {
            PetListFilter::All => "",
            PetListFilter::MyPets => "my_pets",
        }
    }
}

/// A form value sent for a pet attribute.
///
/// The service expects text everywhere; `Number` lets negative scenarios
/// send a value of the wrong type on purpose.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PetField {
    Text(String),
    Number(i64),
}

impl PetField {
    /// Wire encoding of the value inside a form field
    pub fn to_form_value(&self) -> String {
        match self {
            PetField::Text(text) => text.clone(),
            PetField::Number(number) => number.to_string(),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            PetField::Text(text) => Some(text),
            PetField::Number(_) => None,
        }
    }
}

impl fmt::Display for PetField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PetField::Text(text) => write!(f, "{text:?}"),
            PetField::Number(number) => write!(f, "{number}"),
        }
    }
}

impl From<&str> for PetField {
    fn from(value: &str) -> Self {
        PetField::Text(value.to_string())
    }
}

impl From<String> for PetField {
    fn from(value: String) -> Self {
        PetField::Text(value)
    }
}

impl From<i64> for PetField {
    fn from(value: i64) -> Self {
        PetField::Number(value)
    }
}

impl From<i32> for PetField {
    fn from(value: i32) -> Self {
        PetField::Number(i64::from(value))
    }
}

/// Attributes submitted when creating or updating a pet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPet {
    pub name: PetField,
    pub animal_type: PetField,
    pub age: PetField,
}

impl NewPet {
    pub fn new(
        name: impl Into<PetField>,
        animal_type: impl Into<PetField>,
        age: impl Into<PetField>,
    ) -> Self {
        Self {
            name: name.into(),
            animal_type: animal_type.into(),
            age: age.into(),
        }
    }

    /// Form fields in the order the service documents them
    pub fn form_fields(&self) -> [(&'static str, String); 3] {
        [
            ("name", self.name.to_form_value()),
            ("animal_type", self.animal_type.to_form_value()),
            ("age", self.age.to_form_value()),
        ]
    }
}

impl fmt::Display for NewPet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "name={} animal_type={} age={}",
            self.name, self.animal_type, self.age
        )
    }
}

/// Pet record as returned by the service
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Pet {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub animal_type: String,
    #[serde(default)]
    pub age: String,
    #[serde(default)]
    pub pet_photo: String,
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub created_at: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct PetList {
    #[serde(default)]
    pets: Vec<Pet>,
}

/// Body of a response: JSON when it parses, raw text otherwise.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ResponseBody {
    Json(serde_json::Value),
    Text(String),
}

impl ResponseBody {
    pub fn parse(raw: String) -> Self {
        match serde_json::from_str(&raw) {
            Ok(value) => ResponseBody::Json(value),
            Err(_) => ResponseBody::Text(raw),
        }
    }
}

impl fmt::Display for ResponseBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResponseBody::Json(value) => write!(f, "{value}"),
            ResponseBody::Text(text) => write!(f, "{text}"),
        }
    }
}

/// Status code and parsed body, returned by every client operation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiResponse {
    pub status: u16,
    pub body: ResponseBody,
}

impl ApiResponse {
    pub fn new(status: u16, body: ResponseBody) -> Self {
        Self { status, body }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Whether the body, as text, contains `needle`.
    ///
    /// JSON bodies are matched against their compact serialization.
    pub fn contains(&self, needle: &str) -> bool {
        match &self.body {
            ResponseBody::Text(text) => text.contains(needle),
            ResponseBody::Json(value) => value.to_string().contains(needle),
        }
    }

    pub fn json(&self) -> Option<&serde_json::Value> {
        match &self.body {
            ResponseBody::Json(value) => Some(value),
            ResponseBody::Text(_) => None,
        }
    }

    /// Top-level string field of a JSON object body
    pub fn str_field(&self, name: &str) -> Option<&str> {
        self.json()?.get(name)?.as_str()
    }

    /// Key from a successful `GET /api/key` response
    pub fn auth_key(&self) -> Option<AuthKey> {
        if !self.is_success() {
            return None;
        }
        self.str_field("key").map(AuthKey::new)
    }

    /// Pets from a successful listing response
    pub fn pets(&self) -> ApiResult<Vec<Pet>> {
        let value = self.json().ok_or_else(|| {
            ApiError::response_parsing_error(format!(
                "Expected a JSON pet list, got status {} with text body",
                self.status
            ))
        })?;

        let list: PetList = serde_json::from_value(value.clone()).map_err(|e| {
            ApiError::response_parsing_error(format!("Invalid pet list: {e}"))
        })?;
        Ok(list.pets)
    }
}
