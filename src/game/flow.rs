// Two-step creation form as an explicit state machine. Pure: it decides
// which requests to send and what to remember, the caller performs them.
use thiserror::Error;

use crate::db::models::{Character, CharacterClass, Quest};
use crate::game::attributes::{resolve, UpdateAttributesRequest};
use crate::game::domain::{AddQuestRequest, CreateCharacterRequest, CreatedCharacter};
use crate::validate::Validate;

pub const STORAGE_CHARACTER_ID: &str = "characterId";
pub const STORAGE_QUEST_ID: &str = "questId";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FlowError {
    #[error("No scenario selected")]
    NoScenarioSelected,

    #[error("Selected scenario not found")]
    UnknownScenario,

    #[error("Class {got} does not belong to character (expects {expected})")]
    ClassMismatch { expected: i64, got: i64 },

    #[error("Invalid character form: {0}")]
    InvalidForm(String),

    #[error("Cannot {action} from {state} state")]
    InvalidTransition {
        action: &'static str,
        state: &'static str,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum CreationFlow {
    /// Collecting genre, name and class
    Creating,

    /// Character exists; waiting for the player to pick a scenario
    SelectingScenario {
        character: Character,
        class_name: String,
        scenarios: Vec<Quest>,
    },
}

/// Values the browser keeps for the game page, both as strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredSelection {
    pub character_id: String,
    pub quest_id: String,
}

impl StoredSelection {
    pub fn entries(&self) -> [(&'static str, &str); 2] {
        [
            (STORAGE_CHARACTER_ID, self.character_id.as_str()),
            (STORAGE_QUEST_ID, self.quest_id.as_str()),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeUpdate {
    pub character_id: i64,
    pub body: UpdateAttributesRequest,
}

impl AttributeUpdate {
    pub fn path(&self) -> String {
        format!("/api/character/update/{}", self.character_id)
    }
}

/// Everything that happens when the player starts the game. The two
/// requests are independent and may be sent concurrently.
#[derive(Debug, Clone, PartialEq)]
pub struct LaunchPlan {
    pub quest: Quest,
    pub storage: StoredSelection,
    pub add_quest: AddQuestRequest,
    pub update: AttributeUpdate,
}

/// A refused launch hands the untouched flow back with the reason.
#[derive(Debug, Clone, PartialEq)]
pub struct Rejected {
    pub flow: CreationFlow,
    pub error: FlowError,
}

impl Default for CreationFlow {
    fn default() -> Self {
        Self::new()
    }
}

impl CreationFlow {
    pub fn new() -> Self {
        Self::Creating
    }

    pub fn state_name(&self) -> &'static str {
        match self {
            Self::Creating => "Creating",
            Self::SelectingScenario { .. } => "SelectingScenario",
        }
    }

    /// Build the create request from the form fields.
    pub fn submit(
        &self,
        genre: &str,
        name: &str,
        class: &str,
    ) -> Result<CreateCharacterRequest, FlowError> {
        if !matches!(self, Self::Creating) {
            return Err(self.invalid("submit the character form"));
        }
        let request = CreateCharacterRequest {
            genre: genre.to_string(),
            name: name.to_string(),
            class: class.to_string(),
        };
        request.validate().map_err(FlowError::InvalidForm)?;
        Ok(request)
    }

    /// Transition: Creating → SelectingScenario
    pub fn receive(self, created: CreatedCharacter) -> Result<Self, FlowError> {
        match self {
            Self::Creating => Ok(Self::SelectingScenario {
                character: created.character,
                class_name: created.class,
                scenarios: created.scenarios,
            }),
            other => Err(other.invalid("receive a created character")),
        }
    }

    /// Consume the selection and produce the launch plan. Attributes are
    /// resolved here, once, from `class` and the character's current stats.
    pub fn launch(
        self,
        selected: Option<i64>,
        class: &CharacterClass,
    ) -> Result<LaunchPlan, Rejected> {
        let (character, class_name, scenarios) = match self {
            Self::SelectingScenario {
                character,
                class_name,
                scenarios,
            } => (character, class_name, scenarios),
            creating @ Self::Creating => {
                let error = creating.invalid("launch");
                return Err(Rejected {
                    flow: creating,
                    error,
                });
            }
        };

        let picked = match selected {
            None => Err(FlowError::NoScenarioSelected),
            Some(id) => scenarios
                .iter()
                .find(|q| q.id == id)
                .cloned()
                .ok_or(FlowError::UnknownScenario),
        }
        .and_then(|quest| {
            if class.id == character.class_id {
                Ok(quest)
            } else {
                Err(FlowError::ClassMismatch {
                    expected: character.class_id,
                    got: class.id,
                })
            }
        });

        let quest = match picked {
            Ok(quest) => quest,
            Err(error) => {
                tracing::debug!(character_id = character.id, %error, "Launch refused");
                return Err(Rejected {
                    flow: Self::SelectingScenario {
                        character,
                        class_name,
                        scenarios,
                    },
                    error,
                });
            }
        };

        let resolved = resolve(&class.base.into(), &character.attributes.into());
        let character_id = character.id;

        Ok(LaunchPlan {
            storage: StoredSelection {
                character_id: character_id.to_string(),
                quest_id: quest.id.to_string(),
            },
            add_quest: AddQuestRequest {
                character_id,
                quest_id: quest.id,
            },
            update: AttributeUpdate {
                character_id,
                body: resolved.into(),
            },
            quest,
        })
    }

    fn invalid(&self, action: &'static str) -> FlowError {
        FlowError::InvalidTransition {
            action,
            state: self.state_name(),
        }
    }
}
