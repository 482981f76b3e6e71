use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use std::sync::Arc;

use crate::config::Config;
use crate::game::{CharacterService, SqliteCharacterRepository};

pub type DbPool = Pool<SqliteConnectionManager>;

#[derive(Clone)]
pub struct AppState {
    pub db: DbPool,
    pub config: Config,
    pub characters: CharacterService,
}

impl AppState {
    pub fn new(db: DbPool, config: Config) -> Self {
        let repo = Arc::new(SqliteCharacterRepository::new(db.clone()));
        Self {
            db,
            config,
            characters: CharacterService::new(repo),
        }
    }
}
