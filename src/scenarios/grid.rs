//! Parameter grids for the pet-creation scenarios.

use crate::types::{NewPet, PetField};

pub const VALID_NAMES: [&str; 2] = ["Вася", "Петя"];
pub const VALID_ANIMAL_TYPES: [&str; 2] = ["кот", "пёс"];
pub const AGES: [&str; 2] = ["1", "15"];
/// Numbers sent where the service expects text
pub const WRONG_TYPE_VALUES: [i64; 2] = [2, 10];

fn text_fields(values: &[&str]) -> Vec<PetField> {
    values.iter().map(|value| PetField::from(*value)).collect()
}

fn number_fields(values: &[i64]) -> Vec<PetField> {
    values.iter().map(|value| PetField::from(*value)).collect()
}

/// Cartesian product of names × animal types × ages
pub fn pet_grid(names: &[PetField], animal_types: &[PetField], ages: &[PetField]) -> Vec<NewPet> {
    let mut pets = Vec::with_capacity(names.len() * animal_types.len() * ages.len());
    for name in names {
        for animal_type in animal_types {
            for age in ages {
                pets.push(NewPet {
                    name: name.clone(),
                    animal_type: animal_type.clone(),
                    age: age.clone(),
                });
            }
        }
    }
    pets
}

pub fn valid_pets() -> Vec<NewPet> {
    pet_grid(
        &text_fields(&VALID_NAMES),
        &text_fields(&VALID_ANIMAL_TYPES),
        &text_fields(&AGES),
    )
}

pub fn pets_with_numeric_animal_type() -> Vec<NewPet> {
    pet_grid(
        &text_fields(&VALID_NAMES),
        &number_fields(&WRONG_TYPE_VALUES),
        &text_fields(&AGES),
    )
}

pub fn pets_with_numeric_name() -> Vec<NewPet> {
    pet_grid(
        &number_fields(&WRONG_TYPE_VALUES),
        &text_fields(&VALID_ANIMAL_TYPES),
        &text_fields(&AGES),
    )
}
