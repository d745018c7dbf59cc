use super::fixtures::{self, FixturePet, INVALID_PHOTO, VALID_PHOTO};
use super::outcome::Outcome;
use super::{Case, Scenario, Step};
use crate::client::PetFriendsApi;
use crate::config::{Credentials, SuiteConfig};
use crate::logging::{log_info, log_warn};
use crate::report::{CaseReport, SuiteReport};
use crate::types::{ApiResponse, AuthKey, NewPet, PetListFilter};
use chrono::Utc;
use std::path::Path;
use std::time::Instant;

/// Body fragment the service sends when a key request is refused.
/// The apostrophe arrives HTML-escaped.
pub const USER_NOT_FOUND_MESSAGE: &str = "This user wasn&#x27;t found in database";

/// Runs scenarios against any [`PetFriendsApi`] implementation
pub struct ContractSuite<'a, A: PetFriendsApi + ?Sized> {
    api: &'a A,
    config: &'a SuiteConfig,
}

impl<'a, A> ContractSuite<'a, A>
where
    A: PetFriendsApi + ?Sized,
{
    pub fn new(api: &'a A, config: &'a SuiteConfig) -> Self {
        Self { api, config }
    }

    /// Run every scenario whose name contains `filter`, or all of them
    pub async fn run(&self, filter: Option<&str>) -> SuiteReport {
        let started_at = Utc::now();
        let mut cases = Vec::new();

        for scenario in Scenario::ALL
            .iter()
            .filter(|scenario| filter.map_or(true, |f| scenario.matches(f)))
        {
            cases.extend(self.run_scenario(*scenario).await);
        }

        let report = SuiteReport::new(started_at, Utc::now(), cases);
        let summary = report.summary();
        log_info!(
            total = summary.total,
            passed = summary.passed,
            failed = summary.failed,
            precondition_failed = summary.precondition_failed,
            known_issues = summary.known_issues,
            errored = summary.errored,
            "Contract suite finished"
        );
        report
    }

    pub async fn run_scenario(&self, scenario: Scenario) -> Vec<CaseReport> {
        let mut reports = Vec::new();
        for case in scenario.cases() {
            reports.push(self.run_case(&case).await);
        }
        reports
    }

    pub async fn run_case(&self, case: &Case) -> CaseReport {
        let started_at = Utc::now();
        let start = Instant::now();

        let outcome = self.check(case).await.unwrap_or_else(|outcome| outcome);

        let label = case.label();
        if outcome.is_failure() {
            log_warn!(case = %label, outcome = %outcome, "Case did not pass");
        } else {
            log_info!(case = %label, outcome = ?outcome.kind(), "Case finished");
        }

        CaseReport {
            scenario: case.scenario,
            case: label,
            outcome,
            started_at,
            duration_ms: start.elapsed().as_millis() as u64,
        }
    }

    async fn check(&self, case: &Case) -> Step<Outcome> {
        match (case.scenario, &case.pet) {
            (Scenario::GetApiKeyForInvalidEmail, _) => {
                self.key_request_rejected(&self.config.invalid).await
            }
            (Scenario::GetApiKeyForValidEmailAndInvalidPassword, _) => {
                let credentials = Credentials::new(
                    self.config.valid.email.as_str(),
                    self.config.invalid.password.as_str(),
                );
                self.key_request_rejected(&credentials).await
            }
            (Scenario::GetAllPetsWithInvalidKey, _) => {
                self.listing_rejected(PetListFilter::All).await
            }
            (Scenario::GetMyPetsWithInvalidKey, _) => {
                self.listing_rejected(PetListFilter::MyPets).await
            }
            (Scenario::CreatePetSimpleWithValidData, Some(pet)) => {
                self.simple_creation_accepted(pet).await
            }
            (Scenario::CreatePetSimpleWithInvalidKey, Some(pet)) => {
                let response = self
                    .api
                    .create_pet_simple(&AuthKey::invalid(), pet)
                    .await?;
                Ok(Outcome::expect_status(&response, 403))
            }
            (Scenario::AddNewPetWithInvalidPhoto, Some(pet)) => {
                self.creation_with_invalid_photo_rejected(pet).await
            }
            (Scenario::SuccessfulSetPhoto, _) => self.photo_set_on_owned_pet().await,
            (Scenario::CreatePetSimpleWithInvalidAnimalType, Some(pet))
            | (Scenario::CreatePetSimpleWithInvalidName, Some(pet)) => {
                self.simple_creation_rejected(pet).await
            }
            (Scenario::UnsuccessfulUpdatePetInfoWithInvalidKey, _) => {
                self.update_with_invalid_key_rejected().await
            }
            (scenario, None) => Err(Outcome::precondition_failed(format!(
                "{scenario} requires pet parameters"
            ))),
        }
    }

    async fn key_request_rejected(&self, credentials: &Credentials) -> Step<Outcome> {
        let response = self
            .api
            .get_api_key(&credentials.email, &credentials.password)
            .await?;

        if response.status != 403 {
            return Ok(Outcome::expect_status(&response, 403));
        }
        if !response.contains(USER_NOT_FOUND_MESSAGE) {
            return Ok(Outcome::failed(format!(
                "403 body does not mention {USER_NOT_FOUND_MESSAGE:?}"
            )));
        }
        Ok(Outcome::Passed)
    }

    async fn listing_rejected(&self, filter: PetListFilter) -> Step<Outcome> {
        let response = self
            .api
            .get_list_of_pets(&AuthKey::invalid(), filter)
            .await?;
        Ok(Outcome::expect_status(&response, 403))
    }

    async fn simple_creation_accepted(&self, pet: &NewPet) -> Step<Outcome> {
        let key = fixtures::valid_key(self.api, self.config).await?;
        let response = self.api.create_pet_simple(&key, pet).await?;
        self.remove_created(&key, &response).await;

        if response.status != 200 {
            return Ok(Outcome::expect_status(&response, 200));
        }

        let expected = pet.name.as_text();
        let echoed = response.str_field("name");
        if expected.is_some() && echoed == expected {
            Ok(Outcome::Passed)
        } else {
            Ok(Outcome::failed(format!(
                "expected name {}, response has {echoed:?}",
                pet.name
            )))
        }
    }

    async fn simple_creation_rejected(&self, pet: &NewPet) -> Step<Outcome> {
        let key = fixtures::valid_key(self.api, self.config).await?;
        let response = self.api.create_pet_simple(&key, pet).await?;
        self.remove_created(&key, &response).await;
        Ok(Outcome::expect_status(&response, 400))
    }

    async fn creation_with_invalid_photo_rejected(&self, pet: &NewPet) -> Step<Outcome> {
        let photo = fixtures::fixture_path(self.config, INVALID_PHOTO)?;
        let key = fixtures::valid_key(self.api, self.config).await?;
        let response = self.api.add_new_pet(&key, pet, &photo).await?;
        self.remove_created(&key, &response).await;
        Ok(Outcome::expect_status(&response, 400))
    }

    async fn photo_set_on_owned_pet(&self) -> Step<Outcome> {
        let photo = fixtures::fixture_path(self.config, VALID_PHOTO)?;
        let key = fixtures::valid_key(self.api, self.config).await?;
        let fixture = FixturePet::create(self.api, &key).await?;

        let outcome = self.set_photo_on_my_pet(&key, &fixture, &photo).await;
        fixture.remove(self.api, &key).await;
        outcome
    }

    async fn set_photo_on_my_pet(
        &self,
        key: &AuthKey,
        fixture: &FixturePet,
        photo: &Path,
    ) -> Step<Outcome> {
        let listing = self
            .api
            .get_list_of_pets(key, PetListFilter::MyPets)
            .await?;
        if listing.status != 200 {
            return Err(Outcome::precondition_failed(format!(
                "could not list my pets: status {}",
                listing.status
            )));
        }

        // Only the case's own pet may be touched
        let my_pets = listing.pets()?;
        if my_pets.is_empty() {
            return Err(Outcome::precondition_failed("There is no my pets"));
        }
        if !my_pets.iter().any(|pet| pet.id == fixture.id) {
            return Err(Outcome::precondition_failed(format!(
                "fixture pet {} is missing from my pets",
                fixture.id
            )));
        }

        let response = self.api.set_photo(key, &fixture.id, photo).await?;
        Ok(Outcome::expect_status(&response, 200))
    }

    async fn update_with_invalid_key_rejected(&self) -> Step<Outcome> {
        let key = fixtures::valid_key(self.api, self.config).await?;
        let fixture = FixturePet::create(self.api, &key).await?;

        let update = NewPet::new("Мурзик", "Котэ", "5");
        let result = self
            .api
            .update_pet_info(&AuthKey::invalid(), &fixture.id, &update)
            .await;
        fixture.remove(self.api, &key).await;

        let response = result?;
        if response.status == 403 {
            return Ok(Outcome::Passed);
        }
        // Only an accepted update matches the suspected auth bypass
        if !response.is_success() {
            return Ok(Outcome::expect_status(&response, 403));
        }

        log_warn!(
            observed = response.status,
            "Update with an invalid auth key was not refused with 403"
        );
        Ok(Outcome::KnownIssue {
            expected: 403,
            observed: response.status,
            note: "service is suspected not to enforce the auth key on pet updates".to_string(),
        })
    }

    /// Delete a pet the service created despite the case expecting it not to,
    /// or after a positive case has checked it.
    async fn remove_created(&self, key: &AuthKey, response: &ApiResponse) {
        if !response.is_success() {
            return;
        }
        if let Some(id) = response.str_field("id") {
            fixtures::delete_quietly(self.api, key, id).await;
        }
    }
}
