//! The PetFriends contract suite
//!
//! Each [`Scenario`] checks one part of the service contract. Scenarios that
//! are parametrised over pet attributes expand into several [`Case`]s, one
//! per combination. Every case gets its credentials from [`SuiteConfig`],
//! creates whatever pets it needs and deletes them afterwards, so cases can
//! run in any order.
//!
//! ```rust,no_run
//! use petfriends_contract::{ContractSuite, PetFriendsClient, SuiteConfig};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let client = PetFriendsClient::from_env()?;
//! let config = SuiteConfig::from_env()?;
//! let report = ContractSuite::new(&client, &config).run(None).await;
//! println!("{report}");
//! # Ok(())
//! # }
//! ```
//!
//! [`SuiteConfig`]: crate::config::SuiteConfig

pub mod fixtures;
pub mod grid;
pub mod outcome;
pub mod suite;

pub use outcome::{Outcome, OutcomeKind};
pub use suite::ContractSuite;

use crate::types::NewPet;
use serde::Serialize;
use std::fmt;

/// Intermediate result inside a case: `Err` short-circuits with an outcome
pub(crate) type Step<T> = Result<T, Outcome>;

/// Every check in the suite
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Scenario {
    GetApiKeyForInvalidEmail,
    GetApiKeyForValidEmailAndInvalidPassword,
    GetAllPetsWithInvalidKey,
    GetMyPetsWithInvalidKey,
    CreatePetSimpleWithValidData,
    CreatePetSimpleWithInvalidKey,
    AddNewPetWithInvalidPhoto,
    SuccessfulSetPhoto,
    CreatePetSimpleWithInvalidAnimalType,
    CreatePetSimpleWithInvalidName,
    UnsuccessfulUpdatePetInfoWithInvalidKey,
}

impl Scenario {
    pub const ALL: [Scenario; 11] = [
        Scenario::GetApiKeyForInvalidEmail,
        Scenario::GetApiKeyForValidEmailAndInvalidPassword,
        Scenario::GetAllPetsWithInvalidKey,
        Scenario::GetMyPetsWithInvalidKey,
        Scenario::CreatePetSimpleWithValidData,
        Scenario::CreatePetSimpleWithInvalidKey,
        Scenario::AddNewPetWithInvalidPhoto,
        Scenario::SuccessfulSetPhoto,
        Scenario::CreatePetSimpleWithInvalidAnimalType,
        Scenario::CreatePetSimpleWithInvalidName,
        Scenario::UnsuccessfulUpdatePetInfoWithInvalidKey,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Scenario::GetApiKeyForInvalidEmail => "get_api_key_for_invalid_email",
            Scenario::GetApiKeyForValidEmailAndInvalidPassword => {
                "get_api_key_for_valid_email_and_invalid_password"
            }
            Scenario::GetAllPetsWithInvalidKey => "get_all_pets_with_invalid_key",
            Scenario::GetMyPetsWithInvalidKey => "get_my_pets_with_invalid_key",
            Scenario::CreatePetSimpleWithValidData => "create_pet_simple_with_valid_data",
            Scenario::CreatePetSimpleWithInvalidKey => "create_pet_simple_with_invalid_key",
            Scenario::AddNewPetWithInvalidPhoto => "add_new_pet_with_invalid_photo",
            Scenario::SuccessfulSetPhoto => "successful_set_photo",
            Scenario::CreatePetSimpleWithInvalidAnimalType => {
                "create_pet_simple_with_invalid_animal_type"
            }
            Scenario::CreatePetSimpleWithInvalidName => "create_pet_simple_with_invalid_name",
            Scenario::UnsuccessfulUpdatePetInfoWithInvalidKey => {
                "unsuccessful_update_pet_info_with_invalid_key"
            }
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Scenario::GetApiKeyForInvalidEmail => {
                "Key request with an unknown email returns 403 and a not-found message"
            }
            Scenario::GetApiKeyForValidEmailAndInvalidPassword => {
                "Key request with a valid email and wrong password returns 403 and a not-found message"
            }
            Scenario::GetAllPetsWithInvalidKey => "Listing all pets with an invalid key returns 403",
            Scenario::GetMyPetsWithInvalidKey => "Listing my pets with an invalid key returns 403",
            Scenario::CreatePetSimpleWithValidData => {
                "Simplified creation with valid data returns 200 and echoes the name"
            }
            Scenario::CreatePetSimpleWithInvalidKey => {
                "Simplified creation with an invalid key returns 403"
            }
            Scenario::AddNewPetWithInvalidPhoto => {
                "Full creation with a non-image photo returns 400"
            }
            Scenario::SuccessfulSetPhoto => "Setting a photo on an owned pet returns 200",
            Scenario::CreatePetSimpleWithInvalidAnimalType => {
                "Simplified creation with a numeric animal type returns 400"
            }
            Scenario::CreatePetSimpleWithInvalidName => {
                "Simplified creation with a numeric name returns 400"
            }
            Scenario::UnsuccessfulUpdatePetInfoWithInvalidKey => {
                "Updating a pet with an invalid key returns 403 (service is suspected not to enforce this)"
            }
        }
    }

    /// Parameter sets this scenario runs with; `None` for unparametrised ones
    fn parameters(&self) -> Option<Vec<NewPet>> {
        match self {
            Scenario::CreatePetSimpleWithValidData
            | Scenario::CreatePetSimpleWithInvalidKey
            | Scenario::AddNewPetWithInvalidPhoto => Some(grid::valid_pets()),
            Scenario::CreatePetSimpleWithInvalidAnimalType => {
                Some(grid::pets_with_numeric_animal_type())
            }
            Scenario::CreatePetSimpleWithInvalidName => Some(grid::pets_with_numeric_name()),
            _ => None,
        }
    }

    /// Expand into runnable cases
    pub fn cases(&self) -> Vec<Case> {
        match self.parameters() {
            Some(pets) => pets
                .into_iter()
                .map(|pet| Case {
                    scenario: *self,
                    pet: Some(pet),
                })
                .collect(),
            None => vec![Case {
                scenario: *self,
                pet: None,
            }],
        }
    }

    /// Case-insensitive substring match on the scenario name
    pub fn matches(&self, filter: &str) -> bool {
        self.name().contains(&filter.to_lowercase())
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One runnable combination of a scenario and its parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Case {
    pub scenario: Scenario,
    pub pet: Option<NewPet>,
}

impl Case {
    pub fn label(&self) -> String {
        match &self.pet {
            Some(pet) => format!("{}[{pet}]", self.scenario),
            None => self.scenario.to_string(),
        }
    }
}

/// All cases in catalogue order
pub fn all_cases() -> Vec<Case> {
    Scenario::ALL.iter().flat_map(Scenario::cases).collect()
}
