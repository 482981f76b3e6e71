use crate::db::models::{Character, CharacterClass, CharacterDetail, ClassName, Outcome};
use crate::game::attributes::Attributes;
use crate::game::domain::{CreateCharacterRequest, CreatedCharacter, GameError, Genre};
use crate::game::repository::{DynCharacterRepository, NewCharacter};

/// How many outcomes the homepage shows.
pub const LATEST_OUTCOME_LIMIT: u32 = 5;

/// Character lifecycle: creation, lookup, attribute updates and deletion.
/// Every mutation checks that its target exists first.
#[derive(Clone)]
pub struct CharacterService {
    pub(crate) repo: DynCharacterRepository,
}

impl CharacterService {
    pub fn new(repo: DynCharacterRepository) -> Self {
        Self { repo }
    }

    pub async fn list(&self) -> Result<Vec<Character>, GameError> {
        Ok(self.repo.list_characters().await?)
    }

    pub async fn get(&self, id: i64) -> Result<CharacterDetail, GameError> {
        let character = self
            .repo
            .find_character(id)
            .await?
            .ok_or(GameError::NotFound("Character"))?;
        let quests = self.repo.quests_for_character(id).await?;
        let class_name = self
            .repo
            .find_class(character.class_id)
            .await?
            .map(|c| c.name)
            .unwrap_or_default();

        Ok(CharacterDetail {
            character,
            quests,
            character_class: ClassName { name: class_name },
        })
    }

    /// Create a character for `user_id` with zeroed stats and offer the
    /// scenarios of its genre.
    pub async fn create(
        &self,
        user_id: i64,
        request: &CreateCharacterRequest,
    ) -> Result<CreatedCharacter, GameError> {
        let genre = Genre::parse(&request.genre)
            .ok_or_else(|| GameError::Invalid(format!("unknown genre '{}'", request.genre)))?;
        let class = self
            .repo
            .find_class_by_key(genre, request.class.trim())
            .await?
            .ok_or_else(|| {
                GameError::Invalid(format!(
                    "class '{}' is not available for {}",
                    request.class, genre
                ))
            })?;

        let character = self
            .repo
            .insert_character(&NewCharacter {
                user_id,
                class_id: class.id,
                name: request.name.trim().to_string(),
                genre,
            })
            .await?;
        tracing::info!(
            character_id = character.id,
            user_id,
            class = %class.key,
            "Character created"
        );

        let scenarios = self.repo.quests_for_genre(genre).await?;

        Ok(CreatedCharacter {
            character,
            class: class.name,
            scenarios,
        })
    }

    /// Replace all six stats with `attributes`. Values are stored as given;
    /// callers send the already-resolved totals.
    pub async fn update_attributes(
        &self,
        id: i64,
        attributes: Attributes,
    ) -> Result<Character, GameError> {
        let mut character = self
            .repo
            .find_character(id)
            .await?
            .ok_or(GameError::NotFound("Character"))?;

        if !self.repo.save_attributes(id, &attributes).await? {
            // Deleted between the lookup and the write
            return Err(GameError::NotFound("Character"));
        }
        tracing::info!(character_id = id, "Character attributes updated");

        character.attributes = attributes;
        Ok(character)
    }

    pub async fn delete(&self, id: i64) -> Result<(), GameError> {
        if self.repo.find_character(id).await?.is_none() {
            return Err(GameError::NotFound("Character"));
        }
        if !self.repo.delete_character(id).await? {
            return Err(GameError::NotFound("Character"));
        }
        tracing::info!(character_id = id, "Character deleted");
        Ok(())
    }

    pub async fn class(&self, id: i64) -> Result<CharacterClass, GameError> {
        self.repo
            .find_class(id)
            .await?
            .ok_or(GameError::NotFound("Character class"))
    }

    pub async fn latest_outcomes(&self) -> Result<Vec<Outcome>, GameError> {
        Ok(self.repo.latest_outcomes(LATEST_OUTCOME_LIMIT).await?)
    }

    pub async fn outcomes_for_user(&self, user_id: i64) -> Result<Vec<Outcome>, GameError> {
        Ok(self.repo.outcomes_for_user(user_id).await?)
    }

    pub async fn record_outcome(
        &self,
        user_id: i64,
        name: &str,
        description: &str,
    ) -> Result<Outcome, GameError> {
        let outcome = self
            .repo
            .insert_outcome(user_id, name.trim(), description.trim())
            .await?;
        tracing::info!(outcome_id = outcome.id, user_id, "Outcome recorded");
        Ok(outcome)
    }
}
