//! Test helper utilities for petfriends-contract integration tests
//!
//! Provides a stateful fake of the PetFriends service built on wiremock, so
//! the client and the contract suite can be exercised end to end without
//! network access.
//!
//! IMPORTANT: These helpers are test-only and should NEVER be used in production code.

// Allow dead code in test utilities - functions are used across different test files
#![allow(dead_code)]

use petfriends_contract::{
    ClientConfig, Credentials, PetFriendsClient, RetryPolicy, SuiteConfig,
};
use serde_json::{json, Value};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use wiremock::matchers::any;
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

pub const VALID_EMAIL: &str = "owner@example.com";
pub const VALID_PASSWORD: &str = "correct-horse";
pub const INVALID_EMAIL: &str = "ghost@example.com";
pub const INVALID_PASSWORD: &str = "nope";
pub const ISSUED_KEY: &str = "ea738148a1f19838e1c5d1413877f3691a3731380e733e877b0ae729";
pub const OWNER_ID: &str = "owner-1";

pub const USER_NOT_FOUND_PAGE: &str = "<!doctype html>\n<html lang=en>\n<title>403 Forbidden</title>\n\
<h1>Forbidden</h1>\n<p>This user wasn&#x27;t found in database</p>\n";
pub const FORBIDDEN_PAGE: &str = "<!doctype html>\n<html lang=en>\n<title>403 Forbidden</title>\n\
<h1>Forbidden</h1>\n<p>Please provide &#x27;auth_key&#x27; Header</p>\n";
pub const BAD_REQUEST_PAGE: &str = "<!doctype html>\n<html lang=en>\n<title>400 Bad Request</title>\n\
<h1>Bad Request</h1>\n<p>The browser (or proxy) sent a request that this server could not understand.</p>\n";

// ============================================================================
// Configuration helpers
// ============================================================================

/// Fast retry policy for tests (avoids long waits)
pub fn create_fast_test_retry_policy() -> RetryPolicy {
    RetryPolicy {
        max_attempts: 2,
        initial_delay: Duration::from_millis(10),
        max_delay: Duration::from_millis(50),
        backoff_multiplier: 2.0,
        request_timeout: Duration::from_secs(5),
        total_timeout: Duration::from_secs(10),
    }
}

pub fn create_test_client(base_url: &str) -> PetFriendsClient {
    PetFriendsClient::new(ClientConfig {
        base_url: base_url.to_string(),
        retry_policy: create_fast_test_retry_policy(),
    })
    .expect("Failed to create test client")
}

pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/images")
}

pub fn create_test_suite_config() -> SuiteConfig {
    SuiteConfig::new(
        Credentials::new(VALID_EMAIL, VALID_PASSWORD),
        Credentials::new(INVALID_EMAIL, INVALID_PASSWORD),
    )
    .with_fixtures_dir(fixtures_dir())
}

// ============================================================================
// Multipart parsing
// ============================================================================

#[derive(Debug, Clone)]
pub struct FormPart {
    pub name: String,
    pub filename: Option<String>,
    pub content_type: Option<String>,
    pub value: String,
}

/// Decode a multipart/form-data request body. `Respond` is synchronous, so
/// the in-memory body is driven through multer on a local executor.
pub fn parse_multipart(request: &Request) -> Option<Vec<FormPart>> {
    let content_type = request.headers.get("content-type")?.to_str().ok()?;
    let boundary = multer::parse_boundary(content_type).ok()?;
    futures::executor::block_on(read_form_parts(request.body.clone(), boundary))
}

async fn read_form_parts(body: Vec<u8>, boundary: String) -> Option<Vec<FormPart>> {
    let stream = futures::stream::once(async move { Ok::<_, std::io::Error>(body) });
    let mut multipart = multer::Multipart::new(stream, boundary);

    let mut parts = Vec::new();
    while let Some(field) = multipart.next_field().await.ok()? {
        let name = field.name().unwrap_or_default().to_string();
        let filename = field.file_name().map(str::to_string);
        let content_type = field
            .content_type()
            .map(|mime| mime.essence_str().to_string());
        let bytes = field.bytes().await.ok()?;

        parts.push(FormPart {
            name,
            filename,
            content_type,
            value: String::from_utf8_lossy(&bytes).into_owned(),
        });
    }
    Some(parts)
}

fn text_field<'a>(parts: &'a [FormPart], name: &str) -> Option<&'a str> {
    parts
        .iter()
        .find(|part| part.name == name && part.filename.is_none())
        .map(|part| part.value.as_str())
}

fn is_image(part: &FormPart) -> bool {
    matches!(
        part.content_type.as_deref(),
        Some("image/jpeg") | Some("image/png")
    )
}

// ============================================================================
// Fake PetFriends service
// ============================================================================

#[derive(Debug, Clone)]
pub struct StoredPet {
    pub id: String,
    pub name: String,
    pub animal_type: String,
    pub age: String,
    pub pet_photo: String,
    pub user_id: String,
}

impl StoredPet {
    fn to_json(&self) -> Value {
        json!({
            "id": self.id,
            "name": self.name,
            "animal_type": self.animal_type,
            "age": self.age,
            "pet_photo": self.pet_photo,
            "user_id": self.user_id,
            "created_at": "1700000000.0",
        })
    }
}

#[derive(Debug, Default)]
struct FakeState {
    pets: Vec<StoredPet>,
    next_id: u64,
}

/// In-memory PetFriends service
///
/// Mirrors the observable contract: HTML 403 pages for refused keys,
/// 400 for wrongly typed fields and non-image photos, JSON for success.
/// `enforce_update_auth = false` reproduces the suspected service defect
/// where updates go through with an invalid key.
#[derive(Debug, Clone)]
pub struct FakePetFriends {
    state: Arc<Mutex<FakeState>>,
    enforce_update_auth: bool,
}

impl FakePetFriends {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(FakeState::default())),
            enforce_update_auth: true,
        }
    }

    pub fn ignoring_update_auth() -> Self {
        Self {
            enforce_update_auth: false,
            ..Self::new()
        }
    }

    /// Mount on a fresh mock server
    pub async fn start(self) -> (MockServer, Self) {
        let server = MockServer::start().await;
        Mock::given(any())
            .respond_with(self.clone())
            .mount(&server)
            .await;
        (server, self)
    }

    pub fn pets(&self) -> Vec<StoredPet> {
        self.state.lock().expect("fake state poisoned").pets.clone()
    }

    /// Add a pet owned by someone else
    pub fn seed_foreign_pet(&self, name: &str) {
        let mut state = self.state.lock().expect("fake state poisoned");
        state.next_id += 1;
        let id = format!("foreign-{}", state.next_id);
        state.pets.push(StoredPet {
            id,
            name: name.to_string(),
            animal_type: "кот".to_string(),
            age: "3".to_string(),
            pet_photo: String::new(),
            user_id: "someone-else".to_string(),
        });
    }

    fn header<'a>(request: &'a Request, name: &str) -> Option<&'a str> {
        request.headers.get(name).and_then(|value| value.to_str().ok())
    }

    fn authorized(request: &Request) -> bool {
        Self::header(request, "auth_key") == Some(ISSUED_KEY)
    }

    fn get_api_key(&self, request: &Request) -> ResponseTemplate {
        let email = Self::header(request, "email");
        let password = Self::header(request, "password");
        if email == Some(VALID_EMAIL) && password == Some(VALID_PASSWORD) {
            ResponseTemplate::new(200).set_body_json(json!({ "key": ISSUED_KEY }))
        } else {
            ResponseTemplate::new(403).set_body_string(USER_NOT_FOUND_PAGE)
        }
    }

    fn list_pets(&self, request: &Request) -> ResponseTemplate {
        let only_mine = request
            .url
            .query_pairs()
            .any(|(key, value)| key == "filter" && value == "my_pets");

        let state = self.state.lock().expect("fake state poisoned");
        let pets: Vec<Value> = state
            .pets
            .iter()
            .filter(|pet| !only_mine || pet.user_id == OWNER_ID)
            .map(StoredPet::to_json)
            .collect();
        ResponseTemplate::new(200).set_body_json(json!({ "pets": pets }))
    }

    /// Validate name/animal_type/age the way the service does
    fn pet_fields(parts: &[FormPart]) -> Option<(String, String, String)> {
        let name = text_field(parts, "name")?;
        let animal_type = text_field(parts, "animal_type")?;
        let age = text_field(parts, "age")?;

        let is_number = |value: &str| value.trim().parse::<f64>().is_ok();
        if name.is_empty() || is_number(name) || animal_type.is_empty() || is_number(animal_type)
        {
            return None;
        }
        if age.trim().parse::<u32>().is_err() {
            return None;
        }
        Some((name.to_string(), animal_type.to_string(), age.to_string()))
    }

    fn create_pet(&self, request: &Request, with_photo: bool) -> ResponseTemplate {
        let Some(parts) = parse_multipart(request) else {
            return ResponseTemplate::new(400).set_body_string(BAD_REQUEST_PAGE);
        };
        let Some((name, animal_type, age)) = Self::pet_fields(&parts) else {
            return ResponseTemplate::new(400).set_body_string(BAD_REQUEST_PAGE);
        };

        let mut pet_photo = String::new();
        if with_photo {
            match parts.iter().find(|part| part.name == "pet_photo") {
                Some(photo) if is_image(photo) => {
                    pet_photo = format!("photo:{}", photo.filename.clone().unwrap_or_default());
                }
                _ => return ResponseTemplate::new(400).set_body_string(BAD_REQUEST_PAGE),
            }
        }

        let mut state = self.state.lock().expect("fake state poisoned");
        state.next_id += 1;
        let pet = StoredPet {
            id: format!("pet-{}", state.next_id),
            name,
            animal_type,
            age,
            pet_photo,
            user_id: OWNER_ID.to_string(),
        };
        let body = pet.to_json();
        state.pets.push(pet);
        ResponseTemplate::new(200).set_body_json(body)
    }

    fn set_photo(&self, request: &Request, pet_id: &str) -> ResponseTemplate {
        let photo = parse_multipart(request)
            .and_then(|parts| parts.into_iter().find(|part| part.name == "pet_photo"));
        let Some(photo) = photo.filter(is_image) else {
            return ResponseTemplate::new(400).set_body_string(BAD_REQUEST_PAGE);
        };

        let mut state = self.state.lock().expect("fake state poisoned");
        match state
            .pets
            .iter_mut()
            .find(|pet| pet.id == pet_id && pet.user_id == OWNER_ID)
        {
            Some(pet) => {
                pet.pet_photo = format!("photo:{}", photo.filename.unwrap_or_default());
                ResponseTemplate::new(200).set_body_json(pet.to_json())
            }
            None => ResponseTemplate::new(400).set_body_string(BAD_REQUEST_PAGE),
        }
    }

    fn update_pet(&self, request: &Request, pet_id: &str) -> ResponseTemplate {
        let Some((name, animal_type, age)) =
            parse_multipart(request).and_then(|parts| Self::pet_fields(&parts))
        else {
            return ResponseTemplate::new(400).set_body_string(BAD_REQUEST_PAGE);
        };

        let mut state = self.state.lock().expect("fake state poisoned");
        match state.pets.iter_mut().find(|pet| pet.id == pet_id) {
            Some(pet) => {
                pet.name = name;
                pet.animal_type = animal_type;
                pet.age = age;
                ResponseTemplate::new(200).set_body_json(pet.to_json())
            }
            None => ResponseTemplate::new(400).set_body_string(BAD_REQUEST_PAGE),
        }
    }

    fn delete_pet(&self, pet_id: &str) -> ResponseTemplate {
        let mut state = self.state.lock().expect("fake state poisoned");
        state
            .pets
            .retain(|pet| !(pet.id == pet_id && pet.user_id == OWNER_ID));
        ResponseTemplate::new(200).set_body_string("")
    }
}

impl Default for FakePetFriends {
    fn default() -> Self {
        Self::new()
    }
}

impl Respond for FakePetFriends {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let method = request.method.as_str().to_string();
        let path = request.url.path().to_string();

        if method == "GET" && path == "/api/key" {
            return self.get_api_key(request);
        }

        let is_update = method == "PUT" && path.starts_with("/api/pets/");
        let skip_auth = is_update && !self.enforce_update_auth;
        if !skip_auth && !Self::authorized(request) {
            return ResponseTemplate::new(403).set_body_string(FORBIDDEN_PAGE);
        }

        match (method.as_str(), path.as_str()) {
            ("GET", "/api/pets") => self.list_pets(request),
            ("POST", "/api/create_pet_simple") => self.create_pet(request, false),
            ("POST", "/api/pets") => self.create_pet(request, true),
            ("POST", p) if p.starts_with("/api/pets/set_photo/") => {
                self.set_photo(request, &p["/api/pets/set_photo/".len()..])
            }
            ("PUT", p) if p.starts_with("/api/pets/") => {
                self.update_pet(request, &p["/api/pets/".len()..])
            }
            ("DELETE", p) if p.starts_with("/api/pets/") => {
                self.delete_pet(&p["/api/pets/".len()..])
            }
            _ => ResponseTemplate::new(404).set_body_string("Not Found"),
        }
    }
}
