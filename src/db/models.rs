use serde::{Deserialize, Serialize};

use crate::game::Attributes;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub created_at: String,
}

/// Archetype template. Seeded by migration and never written at runtime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterClass {
    pub id: i64,
    pub genre: String,
    pub key: String,
    pub name: String,
    #[serde(flatten)]
    pub base: Attributes,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Character {
    pub id: i64,
    pub user_id: i64,
    pub class_id: i64,
    pub name: String,
    pub genre: String,
    #[serde(flatten)]
    pub attributes: Attributes,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quest {
    pub id: i64,
    pub genre: String,
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CharacterQuest {
    pub id: i64,
    pub character_id: i64,
    pub quest_id: i64,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassName {
    pub name: String,
}

/// A character together with its quests and the name of its class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterDetail {
    #[serde(flatten)]
    pub character: Character,
    pub quests: Vec<Quest>,
    pub character_class: ClassName,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outcome {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub description: String,
    pub created_at: String,
}
