// Repository pattern - every game-data query lives here
use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension, Row, TransactionBehavior};
use std::sync::Arc;
use thiserror::Error;

use crate::db::models::{Character, CharacterClass, CharacterQuest, Outcome, Quest};
use crate::game::attributes::Attributes;
use crate::game::domain::Genre;
use crate::state::DbPool;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Database error: {0}")]
    Database(#[from] r2d2::Error),

    #[error("SQL error: {0}")]
    Sql(#[from] rusqlite::Error),
}

/// Fields supplied when a character is first created.
#[derive(Debug, Clone)]
pub struct NewCharacter {
    pub user_id: i64,
    pub class_id: i64,
    pub name: String,
    pub genre: Genre,
}

#[async_trait]
pub trait CharacterRepository: Send + Sync {
    async fn list_characters(&self) -> Result<Vec<Character>, RepositoryError>;

    async fn find_character(&self, id: i64) -> Result<Option<Character>, RepositoryError>;

    async fn insert_character(&self, new: &NewCharacter) -> Result<Character, RepositoryError>;

    /// Overwrite all six stats. Returns false when no row matched.
    async fn save_attributes(
        &self,
        id: i64,
        attributes: &Attributes,
    ) -> Result<bool, RepositoryError>;

    /// Remove a character and its quest links in one transaction.
    /// Returns false when no row matched.
    async fn delete_character(&self, id: i64) -> Result<bool, RepositoryError>;

    async fn find_class(&self, id: i64) -> Result<Option<CharacterClass>, RepositoryError>;

    async fn find_class_by_key(
        &self,
        genre: Genre,
        key: &str,
    ) -> Result<Option<CharacterClass>, RepositoryError>;

    async fn find_quest(&self, id: i64) -> Result<Option<Quest>, RepositoryError>;

    async fn quests_for_genre(&self, genre: Genre) -> Result<Vec<Quest>, RepositoryError>;

    async fn quests_for_character(&self, character_id: i64)
        -> Result<Vec<Quest>, RepositoryError>;

    /// Link a quest to a character. Idempotent: an existing link is
    /// returned unchanged. The flag is true when a row was written.
    async fn link_quest(
        &self,
        character_id: i64,
        quest_id: i64,
    ) -> Result<(CharacterQuest, bool), RepositoryError>;

    /// Most recent outcomes first, at most `limit` of them.
    async fn latest_outcomes(&self, limit: u32) -> Result<Vec<Outcome>, RepositoryError>;

    async fn outcomes_for_user(&self, user_id: i64) -> Result<Vec<Outcome>, RepositoryError>;

    async fn insert_outcome(
        &self,
        user_id: i64,
        name: &str,
        description: &str,
    ) -> Result<Outcome, RepositoryError>;
}

/// SQLite implementation
pub struct SqliteCharacterRepository {
    pub(crate) pool: DbPool,
}

impl SqliteCharacterRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

const CHARACTER_COLUMNS: &str = "id, user_id, class_id, name, genre, strength, agility, \
     constitution, wisdom, intelligence, charisma, created_at";

const CLASS_COLUMNS: &str =
    "id, genre, key, name, strength, agility, constitution, wisdom, intelligence, charisma";

const OUTCOME_COLUMNS: &str = "id, user_id, name, description, created_at";

fn attributes_from(row: &Row<'_>, first: usize) -> rusqlite::Result<Attributes> {
    Ok(Attributes {
        strength: row.get(first)?,
        agility: row.get(first + 1)?,
        constitution: row.get(first + 2)?,
        wisdom: row.get(first + 3)?,
        intelligence: row.get(first + 4)?,
        charisma: row.get(first + 5)?,
    })
}

fn character_from_row(row: &Row<'_>) -> rusqlite::Result<Character> {
    Ok(Character {
        id: row.get(0)?,
        user_id: row.get(1)?,
        class_id: row.get(2)?,
        name: row.get(3)?,
        genre: row.get(4)?,
        attributes: attributes_from(row, 5)?,
        created_at: row.get(11)?,
    })
}

fn class_from_row(row: &Row<'_>) -> rusqlite::Result<CharacterClass> {
    Ok(CharacterClass {
        id: row.get(0)?,
        genre: row.get(1)?,
        key: row.get(2)?,
        name: row.get(3)?,
        base: attributes_from(row, 4)?,
    })
}

fn quest_from_row(row: &Row<'_>) -> rusqlite::Result<Quest> {
    Ok(Quest {
        id: row.get(0)?,
        genre: row.get(1)?,
        name: row.get(2)?,
        description: row.get(3)?,
    })
}

fn outcome_from_row(row: &Row<'_>) -> rusqlite::Result<Outcome> {
    Ok(Outcome {
        id: row.get(0)?,
        user_id: row.get(1)?,
        name: row.get(2)?,
        description: row.get(3)?,
        created_at: row.get(4)?,
    })
}

fn load_character(conn: &Connection, id: i64) -> rusqlite::Result<Option<Character>> {
    conn.query_row(
        &format!("SELECT {} FROM characters WHERE id = ?1", CHARACTER_COLUMNS),
        params![id],
        character_from_row,
    )
    .optional()
}

#[async_trait]
impl CharacterRepository for SqliteCharacterRepository {
    async fn list_characters(&self) -> Result<Vec<Character>, RepositoryError> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM characters ORDER BY id",
            CHARACTER_COLUMNS
        ))?;
        let characters = stmt
            .query_map([], character_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(characters)
    }

    async fn find_character(&self, id: i64) -> Result<Option<Character>, RepositoryError> {
        let conn = self.pool.get()?;
        Ok(load_character(&conn, id)?)
    }

    async fn insert_character(&self, new: &NewCharacter) -> Result<Character, RepositoryError> {
        let conn = self.pool.get()?;
        conn.execute(
            "INSERT INTO characters (user_id, class_id, name, genre) VALUES (?1, ?2, ?3, ?4)",
            params![new.user_id, new.class_id, new.name, new.genre.as_str()],
        )?;
        let id = conn.last_insert_rowid();
        load_character(&conn, id)?.ok_or(RepositoryError::Sql(rusqlite::Error::QueryReturnedNoRows))
    }

    async fn save_attributes(
        &self,
        id: i64,
        attributes: &Attributes,
    ) -> Result<bool, RepositoryError> {
        let conn = self.pool.get()?;
        let rows = conn.execute(
            "UPDATE characters SET strength = ?2, agility = ?3, constitution = ?4,
                 wisdom = ?5, intelligence = ?6, charisma = ?7
             WHERE id = ?1",
            params![
                id,
                attributes.strength,
                attributes.agility,
                attributes.constitution,
                attributes.wisdom,
                attributes.intelligence,
                attributes.charisma
            ],
        )?;
        Ok(rows > 0)
    }

    async fn delete_character(&self, id: i64) -> Result<bool, RepositoryError> {
        let mut conn = self.pool.get()?;

        // Rolls back on drop unless committed
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        tx.execute(
            "DELETE FROM character_quests WHERE character_id = ?1",
            params![id],
        )?;
        let rows = tx.execute("DELETE FROM characters WHERE id = ?1", params![id])?;
        tx.commit()?;

        Ok(rows > 0)
    }

    async fn find_class(&self, id: i64) -> Result<Option<CharacterClass>, RepositoryError> {
        let conn = self.pool.get()?;
        let class = conn
            .query_row(
                &format!("SELECT {} FROM character_classes WHERE id = ?1", CLASS_COLUMNS),
                params![id],
                class_from_row,
            )
            .optional()?;
        Ok(class)
    }

    async fn find_class_by_key(
        &self,
        genre: Genre,
        key: &str,
    ) -> Result<Option<CharacterClass>, RepositoryError> {
        let conn = self.pool.get()?;
        let class = conn
            .query_row(
                &format!(
                    "SELECT {} FROM character_classes WHERE genre = ?1 AND key = ?2",
                    CLASS_COLUMNS
                ),
                params![genre.as_str(), key],
                class_from_row,
            )
            .optional()?;
        Ok(class)
    }

    async fn find_quest(&self, id: i64) -> Result<Option<Quest>, RepositoryError> {
        let conn = self.pool.get()?;
        let quest = conn
            .query_row(
                "SELECT id, genre, name, description FROM quests WHERE id = ?1",
                params![id],
                quest_from_row,
            )
            .optional()?;
        Ok(quest)
    }

    async fn quests_for_genre(&self, genre: Genre) -> Result<Vec<Quest>, RepositoryError> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(
            "SELECT id, genre, name, description FROM quests WHERE genre = ?1 ORDER BY id",
        )?;
        let quests = stmt
            .query_map(params![genre.as_str()], quest_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(quests)
    }

    async fn quests_for_character(
        &self,
        character_id: i64,
    ) -> Result<Vec<Quest>, RepositoryError> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(
            "SELECT q.id, q.genre, q.name, q.description
             FROM character_quests cq
             JOIN quests q ON q.id = cq.quest_id
             WHERE cq.character_id = ?1
             ORDER BY cq.id",
        )?;
        let quests = stmt
            .query_map(params![character_id], quest_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(quests)
    }

    async fn link_quest(
        &self,
        character_id: i64,
        quest_id: i64,
    ) -> Result<(CharacterQuest, bool), RepositoryError> {
        let conn = self.pool.get()?;
        let inserted = conn.execute(
            "INSERT INTO character_quests (character_id, quest_id) VALUES (?1, ?2)
             ON CONFLICT(character_id, quest_id) DO NOTHING",
            params![character_id, quest_id],
        )?;
        let link = conn.query_row(
            "SELECT id, character_id, quest_id, created_at FROM character_quests
             WHERE character_id = ?1 AND quest_id = ?2",
            params![character_id, quest_id],
            |row| {
                Ok(CharacterQuest {
                    id: row.get(0)?,
                    character_id: row.get(1)?,
                    quest_id: row.get(2)?,
                    created_at: row.get(3)?,
                })
            },
        )?;
        Ok((link, inserted > 0))
    }

    async fn latest_outcomes(&self, limit: u32) -> Result<Vec<Outcome>, RepositoryError> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM outcomes ORDER BY created_at DESC, id DESC LIMIT ?1",
            OUTCOME_COLUMNS
        ))?;
        let outcomes = stmt
            .query_map(params![limit], outcome_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(outcomes)
    }

    async fn outcomes_for_user(&self, user_id: i64) -> Result<Vec<Outcome>, RepositoryError> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM outcomes WHERE user_id = ?1 ORDER BY created_at DESC, id DESC",
            OUTCOME_COLUMNS
        ))?;
        let outcomes = stmt
            .query_map(params![user_id], outcome_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(outcomes)
    }

    async fn insert_outcome(
        &self,
        user_id: i64,
        name: &str,
        description: &str,
    ) -> Result<Outcome, RepositoryError> {
        let conn = self.pool.get()?;
        conn.execute(
            "INSERT INTO outcomes (user_id, name, description) VALUES (?1, ?2, ?3)",
            params![user_id, name, description],
        )?;
        let id = conn.last_insert_rowid();
        let outcome = conn.query_row(
            &format!("SELECT {} FROM outcomes WHERE id = ?1", OUTCOME_COLUMNS),
            params![id],
            outcome_from_row,
        )?;
        Ok(outcome)
    }
}

/// Type alias for Arc-wrapped repository (for AppState)
pub type DynCharacterRepository = Arc<dyn CharacterRepository>;
