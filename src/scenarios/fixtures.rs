//! Setup and teardown helpers shared by scenarios.

use super::outcome::Outcome;
use super::Step;
use crate::client::PetFriendsApi;
use crate::config::SuiteConfig;
use crate::logging::{log_debug, log_warn};
use crate::types::{AuthKey, NewPet};
use std::path::PathBuf;

pub const VALID_PHOTO: &str = "dog.jpg";
/// Not an image; the service must refuse it as a pet photo
pub const INVALID_PHOTO: &str = "lol.txt";

/// Resolve a fixture file, failing the precondition if it is missing
pub(crate) fn fixture_path(config: &SuiteConfig, file_name: &str) -> Step<PathBuf> {
    let path = config.fixtures_dir.join(file_name);
    if path.is_file() {
        Ok(path)
    } else {
        Err(Outcome::precondition_failed(format!(
            "fixture {} does not exist",
            path.display()
        )))
    }
}

/// Fetch a key for the valid account
pub(crate) async fn valid_key<A>(api: &A, config: &SuiteConfig) -> Step<AuthKey>
where
    A: PetFriendsApi + ?Sized,
{
    let response = api
        .get_api_key(&config.valid.email, &config.valid.password)
        .await?;

    response.auth_key().ok_or_else(|| {
        Outcome::precondition_failed(format!(
            "could not obtain an auth key for {}: status {}",
            config.valid.email, response.status
        ))
    })
}

/// A pet created for the duration of one case
#[derive(Debug, Clone)]
pub(crate) struct FixturePet {
    pub id: String,
}

impl FixturePet {
    /// Create a uniquely named pet owned by the valid account
    pub async fn create<A>(api: &A, key: &AuthKey) -> Step<Self>
    where
        A: PetFriendsApi + ?Sized,
    {
        let name = format!("fixture-{}", uuid::Uuid::new_v4().simple());
        let pet = NewPet::new(name.as_str(), "кот", "3");
        let response = api.create_pet_simple(key, &pet).await?;

        let id = match response.str_field("id") {
            Some(id) if response.status == 200 && !id.is_empty() => id.to_string(),
            _ => {
                return Err(Outcome::precondition_failed(format!(
                    "could not create fixture pet: status {}",
                    response.status
                )))
            }
        };

        log_debug!(pet_id = %id, pet_name = %name, "Fixture pet created");
        Ok(Self { id })
    }

    pub async fn remove<A>(self, api: &A, key: &AuthKey)
    where
        A: PetFriendsApi + ?Sized,
    {
        delete_quietly(api, key, &self.id).await;
    }
}

/// Delete a pet, logging instead of failing when the service refuses
pub(crate) async fn delete_quietly<A>(api: &A, key: &AuthKey, pet_id: &str)
where
    A: PetFriendsApi + ?Sized,
{
    match api.delete_pet(key, pet_id).await {
        Ok(response) if response.is_success() => {
            log_debug!(pet_id = %pet_id, "Pet removed during teardown");
        }
        Ok(response) => {
            log_warn!(
                pet_id = %pet_id,
                status = response.status,
                "Teardown could not delete pet"
            );
        }
        Err(error) => {
            log_warn!(pet_id = %pet_id, error = %error, "Teardown delete request failed");
        }
    }
}
