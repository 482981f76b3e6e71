use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::db::models::{Character, Quest};
use crate::game::repository::RepositoryError;
use crate::validate::{require_text, Validate};

pub const MAX_NAME_LEN: usize = 60;

/// Setting a character belongs to. Decides which classes and quests apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Genre {
    Fantasy,
    #[serde(rename = "Sci-Fi")]
    SciFi,
}

/// One entry of the class dropdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ClassOption {
    pub value: &'static str,
    pub label: &'static str,
}

const FANTASY_CLASSES: &[ClassOption] = &[
    ClassOption {
        value: "wizard",
        label: "Wizard",
    },
    ClassOption {
        value: "rogue",
        label: "Rogue",
    },
    ClassOption {
        value: "warrior",
        label: "Warrior",
    },
];

const SCI_FI_CLASSES: &[ClassOption] = &[
    ClassOption {
        value: "soldier",
        label: "Soldier",
    },
    ClassOption {
        value: "engineer",
        label: "Engineer",
    },
    ClassOption {
        value: "scientist",
        label: "Scientist",
    },
];

impl Genre {
    pub const ALL: [Genre; 2] = [Genre::Fantasy, Genre::SciFi];

    pub fn as_str(&self) -> &'static str {
        match self {
            Genre::Fantasy => "Fantasy",
            Genre::SciFi => "Sci-Fi",
        }
    }

    pub fn parse(s: &str) -> Option<Genre> {
        Genre::ALL.into_iter().find(|g| g.as_str() == s.trim())
    }

    pub fn class_options(&self) -> &'static [ClassOption] {
        match self {
            Genre::Fantasy => FANTASY_CLASSES,
            Genre::SciFi => SCI_FI_CLASSES,
        }
    }

    pub fn offers_class(&self, key: &str) -> bool {
        self.class_options().iter().any(|o| o.value == key)
    }
}

impl fmt::Display for Genre {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Body of `POST /api/game/create`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateCharacterRequest {
    pub genre: String,
    pub name: String,
    pub class: String,
}

impl Validate for CreateCharacterRequest {
    fn validate(&self) -> Result<(), String> {
        require_text("name", &self.name, MAX_NAME_LEN)?;
        let genre = Genre::parse(&self.genre)
            .ok_or_else(|| format!("unknown genre '{}'", self.genre))?;
        if !genre.offers_class(self.class.trim()) {
            return Err(format!(
                "class '{}' is not available for {}",
                self.class, genre
            ));
        }
        Ok(())
    }
}

/// Reply to a successful creation: the new character, its class display
/// name and the scenarios the player may start with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatedCharacter {
    pub character: Character,
    pub class: String,
    pub scenarios: Vec<Quest>,
}

/// Body of `POST /api/character/addquest`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddQuestRequest {
    pub character_id: i64,
    pub quest_id: i64,
}

impl Validate for AddQuestRequest {
    fn validate(&self) -> Result<(), String> {
        Ok(())
    }
}

/// Body of `POST /api/outcome`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordOutcomeRequest {
    pub name: String,
    pub description: String,
}

impl Validate for RecordOutcomeRequest {
    fn validate(&self) -> Result<(), String> {
        require_text("name", &self.name, 120)?;
        require_text("description", &self.description, 4000)
    }
}

#[derive(Debug, Error)]
pub enum GameError {
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("{0}")]
    Invalid(String),

    #[error(transparent)]
    Store(#[from] RepositoryError),
}
