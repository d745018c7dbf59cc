//! PetFriends API client
//!
//! Every operation returns an [`ApiResponse`] holding the status code and
//! the parsed body, whatever the status. Callers decide which statuses are
//! acceptable; `Err` is reserved for cases where the service could not be
//! asked or its answer could not be read.

use crate::config::ClientConfig;
use crate::error::{ApiError, ApiResult};
use crate::logging::{log_debug, log_error};
use crate::retry::RetryExecutor;
use crate::types::{ApiResponse, AuthKey, NewPet, PetListFilter, ResponseBody};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::RequestBuilder;
use std::path::Path;
use std::time::Instant;

const AUTH_KEY_HEADER: &str = "auth_key";
const PHOTO_FIELD: &str = "pet_photo";

/// Operations exposed by the PetFriends REST API
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PetFriendsApi: Send + Sync {
    /// `GET /api/key` with `email` and `password` headers
    async fn get_api_key(&self, email: &str, password: &str) -> ApiResult<ApiResponse>;

    /// `GET /api/pets?filter=...`
    async fn get_list_of_pets(
        &self,
        auth_key: &AuthKey,
        filter: PetListFilter,
    ) -> ApiResult<ApiResponse>;

    /// `POST /api/create_pet_simple`, no photo
    async fn create_pet_simple(&self, auth_key: &AuthKey, pet: &NewPet)
        -> ApiResult<ApiResponse>;

    /// `POST /api/pets` with a photo file
    async fn add_new_pet(
        &self,
        auth_key: &AuthKey,
        pet: &NewPet,
        photo: &Path,
    ) -> ApiResult<ApiResponse>;

    /// `POST /api/pets/set_photo/{pet_id}`
    async fn set_photo(
        &self,
        auth_key: &AuthKey,
        pet_id: &str,
        photo: &Path,
    ) -> ApiResult<ApiResponse>;

    /// `PUT /api/pets/{pet_id}`
    async fn update_pet_info(
        &self,
        auth_key: &AuthKey,
        pet_id: &str,
        pet: &NewPet,
    ) -> ApiResult<ApiResponse>;

    /// `DELETE /api/pets/{pet_id}`
    async fn delete_pet(&self, auth_key: &AuthKey, pet_id: &str) -> ApiResult<ApiResponse>;
}

/// A photo loaded into memory so it can be re-sent on retry
#[derive(Debug, Clone)]
struct PhotoFile {
    file_name: String,
    mime: &'static str,
    bytes: Vec<u8>,
}

impl PhotoFile {
    async fn load(path: &Path) -> ApiResult<Self> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| ApiError::fixture_error(path, e.to_string()))?;

        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .ok_or_else(|| ApiError::fixture_error(path, "path has no file name"))?;

        Ok(Self {
            file_name,
            mime: mime_for(path),
            bytes,
        })
    }

    fn to_part(&self) -> ApiResult<Part> {
        Part::bytes(self.bytes.clone())
            .file_name(self.file_name.clone())
            .mime_str(self.mime)
            .map_err(|e| ApiError::fixture_error(&self.file_name, format!("Invalid MIME type: {e}")))
    }
}

/// MIME type announced for a photo, derived from its extension
pub(crate) fn mime_for(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .map(|ext| ext.to_string_lossy().to_ascii_lowercase());

    match extension.as_deref() {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        _ => "application/octet-stream",
    }
}

fn pet_form(pet: &NewPet) -> Form {
    pet.form_fields()
        .into_iter()
        .fold(Form::new(), |form, (name, value)| form.text(name, value))
}

/// HTTP client for the PetFriends service
#[derive(Debug)]
pub struct PetFriendsClient {
    client: reqwest::Client,
    base_url: String,
    retry_executor: RetryExecutor,
}

impl PetFriendsClient {
    /// Create a client from validated configuration
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::ConfigurationError`] if the configuration is
    /// invalid or the HTTP client cannot be initialized.
    pub fn new(config: ClientConfig) -> ApiResult<Self> {
        config.validate()?;

        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| ApiError::configuration_error(format!("HTTP client init failed: {e}")))?;

        log_debug!(
            base_url = %config.base_url,
            max_attempts = config.retry_policy.max_attempts,
            request_timeout_ms = config.retry_policy.request_timeout.as_millis(),
            "PetFriends client initialized"
        );

        Ok(Self {
            client,
            base_url: config.normalized_base_url().to_string(),
            retry_executor: RetryExecutor::new(config.retry_policy),
        })
    }

    /// Create a client from `PETFRIENDS_*` environment variables
    pub fn from_env() -> ApiResult<Self> {
        Self::new(ClientConfig::from_env()?)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Run a request through the retry executor. `build` is called once per
    /// attempt because multipart bodies cannot be reused.
    async fn send<B>(&self, operation: &'static str, build: B) -> ApiResult<ApiResponse>
    where
        B: Fn() -> ApiResult<RequestBuilder>,
    {
        self.retry_executor
            .execute(|| {
                let request = build();
                async move { self.execute_single_request(operation, request?).await }
            })
            .await
    }

    /// Send a request exactly once. Used for calls that create pets, where
    /// a retried attempt could leave a duplicate behind.
    async fn send_once(
        &self,
        operation: &'static str,
        request: ApiResult<RequestBuilder>,
    ) -> ApiResult<ApiResponse> {
        let request = request?;
        self.retry_executor
            .execute_once(|| self.execute_single_request(operation, request))
            .await
    }

    async fn execute_single_request(
        &self,
        operation: &'static str,
        request: RequestBuilder,
    ) -> ApiResult<ApiResponse> {
        let start_time = Instant::now();
        let response = request.send().await.map_err(|e| {
            log_error!(
                operation = operation,
                error = %e,
                "HTTP request failed"
            );
            if e.is_builder() {
                ApiError::configuration_error(format!("Invalid {operation} request: {e}"))
            } else if e.is_timeout() {
                ApiError::timeout(start_time.elapsed().as_secs())
            } else {
                ApiError::request_failed(format!("{operation} failed: {e}"), Some(Box::new(e)))
            }
        })?;

        let status = response.status().as_u16();
        let raw_body = response.text().await.map_err(|e| {
            ApiError::response_parsing_error(format!("Failed to read {operation} response: {e}"))
        })?;

        log_debug!(
            operation = operation,
            status = status,
            body_len = raw_body.len(),
            duration_ms = start_time.elapsed().as_millis(),
            "PetFriends response received"
        );

        Ok(ApiResponse::new(status, ResponseBody::parse(raw_body)))
    }
}

#[async_trait]
impl PetFriendsApi for PetFriendsClient {
    async fn get_api_key(&self, email: &str, password: &str) -> ApiResult<ApiResponse> {
        let url = self.url("/api/key");
        self.send("get_api_key", || {
            Ok(self
                .client
                .get(&url)
                .header("email", email)
                .header("password", password))
        })
        .await
    }

    async fn get_list_of_pets(
        &self,
        auth_key: &AuthKey,
        filter: PetListFilter,
    ) -> ApiResult<ApiResponse> {
        let url = self.url("/api/pets");
        self.send("get_list_of_pets", || {
            Ok(self
                .client
                .get(&url)
                .header(AUTH_KEY_HEADER, &auth_key.key)
                .query(&[("filter", filter.as_query())]))
        })
        .await
    }

    async fn create_pet_simple(
        &self,
        auth_key: &AuthKey,
        pet: &NewPet,
    ) -> ApiResult<ApiResponse> {
        let request = self
            .client
            .post(self.url("/api/create_pet_simple"))
            .header(AUTH_KEY_HEADER, &auth_key.key)
            .multipart(pet_form(pet));
        self.send_once("create_pet_simple", Ok(request)).await
    }

    async fn add_new_pet(
        &self,
        auth_key: &AuthKey,
        pet: &NewPet,
        photo: &Path,
    ) -> ApiResult<ApiResponse> {
        let photo = PhotoFile::load(photo).await?;
        let request = photo.to_part().map(|part| {
            self.client
                .post(self.url("/api/pets"))
                .header(AUTH_KEY_HEADER, &auth_key.key)
                .multipart(pet_form(pet).part(PHOTO_FIELD, part))
        });
        self.send_once("add_new_pet", request).await
    }

    async fn set_photo(
        &self,
        auth_key: &AuthKey,
        pet_id: &str,
        photo: &Path,
    ) -> ApiResult<ApiResponse> {
        let photo = PhotoFile::load(photo).await?;
        let url = self.url(&format!("/api/pets/set_photo/{pet_id}"));
        self.send("set_photo", || {
            let form = Form::new().part(PHOTO_FIELD, photo.to_part()?);
            Ok(self
                .client
                .post(&url)
                .header(AUTH_KEY_HEADER, &auth_key.key)
                .multipart(form))
        })
        .await
    }

    async fn update_pet_info(
        &self,
        auth_key: &AuthKey,
        pet_id: &str,
        pet: &NewPet,
    ) -> ApiResult<ApiResponse> {
        let url = self.url(&format!("/api/pets/{pet_id}"));
        self.send("update_pet_info", || {
            Ok(self
                .client
                .put(&url)
                .header(AUTH_KEY_HEADER, &auth_key.key)
                .multipart(pet_form(pet)))
        })
        .await
    }

    async fn delete_pet(&self, auth_key: &AuthKey, pet_id: &str) -> ApiResult<ApiResponse> {
        let url = self.url(&format!("/api/pets/{pet_id}"));
        self.send("delete_pet", || {
            Ok(self
                .client
                .delete(&url)
                .header(AUTH_KEY_HEADER, &auth_key.key))
        })
        .await
    }
}
