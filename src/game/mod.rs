pub mod attributes;
pub mod domain;
pub mod flow;
pub mod quests;
pub mod repository;
pub mod service;

pub use attributes::{resolve, Attributes, PartialAttributes, UpdateAttributesRequest};
pub use domain::{
    AddQuestRequest, CreateCharacterRequest, CreatedCharacter, GameError, Genre,
    RecordOutcomeRequest,
};
pub use flow::{CreationFlow, FlowError, LaunchPlan};
pub use repository::{CharacterRepository, DynCharacterRepository, SqliteCharacterRepository};
pub use service::CharacterService;
