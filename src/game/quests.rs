use crate::db::models::CharacterQuest;
use crate::game::domain::GameError;
use crate::game::service::CharacterService;

impl CharacterService {
    /// Bind a quest to a character. Both must exist; nothing is written
    /// otherwise. Repeating the call for the same pair is a no-op.
    ///
    /// This runs independently of the attribute update the client sends
    /// alongside it, so it never reads or touches the character's stats.
    pub async fn associate_quest(
        &self,
        character_id: i64,
        quest_id: i64,
    ) -> Result<CharacterQuest, GameError> {
        let character = self.repo.find_character(character_id).await?;
        let quest = self.repo.find_quest(quest_id).await?;
        if character.is_none() || quest.is_none() {
            tracing::debug!(character_id, quest_id, "Association target missing");
            return Err(GameError::NotFound("Character or Quest"));
        }

        let (link, created) = self.repo.link_quest(character_id, quest_id).await?;
        if created {
            tracing::info!(character_id, quest_id, "Quest associated");
        } else {
            tracing::debug!(character_id, quest_id, "Quest already associated");
        }
        Ok(link)
    }
}
