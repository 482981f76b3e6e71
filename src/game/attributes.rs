use serde::{Deserialize, Serialize};

use crate::validate::Validate;

/// The six character statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attributes {
    pub strength: i64,
    pub agility: i64,
    pub constitution: i64,
    pub wisdom: i64,
    pub intelligence: i64,
    pub charisma: i64,
}

impl Attributes {
    pub const ZERO: Attributes = Attributes {
        strength: 0,
        agility: 0,
        constitution: 0,
        wisdom: 0,
        intelligence: 0,
        charisma: 0,
    };

    /// Stat-wise sum. Saturates instead of wrapping.
    pub fn plus(&self, other: &Attributes) -> Attributes {
        Attributes {
            strength: self.strength.saturating_add(other.strength),
            agility: self.agility.saturating_add(other.agility),
            constitution: self.constitution.saturating_add(other.constitution),
            wisdom: self.wisdom.saturating_add(other.wisdom),
            intelligence: self.intelligence.saturating_add(other.intelligence),
            charisma: self.charisma.saturating_add(other.charisma),
        }
    }
}

/// Possibly-incomplete stat block. Absent stats count as zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartialAttributes {
    pub strength: Option<i64>,
    pub agility: Option<i64>,
    pub constitution: Option<i64>,
    pub wisdom: Option<i64>,
    pub intelligence: Option<i64>,
    pub charisma: Option<i64>,
}

impl PartialAttributes {
    pub fn or_zero(&self) -> Attributes {
        Attributes {
            strength: self.strength.unwrap_or(0),
            agility: self.agility.unwrap_or(0),
            constitution: self.constitution.unwrap_or(0),
            wisdom: self.wisdom.unwrap_or(0),
            intelligence: self.intelligence.unwrap_or(0),
            charisma: self.charisma.unwrap_or(0),
        }
    }
}

impl From<Attributes> for PartialAttributes {
    fn from(a: Attributes) -> Self {
        Self {
            strength: Some(a.strength),
            agility: Some(a.agility),
            constitution: Some(a.constitution),
            wisdom: Some(a.wisdom),
            intelligence: Some(a.intelligence),
            charisma: Some(a.charisma),
        }
    }
}

/// Effective attributes: class base plus the character's own values.
pub fn resolve(class_base: &PartialAttributes, character: &PartialAttributes) -> Attributes {
    class_base.or_zero().plus(&character.or_zero())
}

/// Body of `POST /api/character/update/{id}`. All six stats are required;
/// their values are taken as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateAttributesRequest {
    pub strength: i64,
    pub agility: i64,
    pub constitution: i64,
    pub wisdom: i64,
    pub intelligence: i64,
    pub charisma: i64,
}

// Values are deliberately not range-checked.
impl Validate for UpdateAttributesRequest {
    fn validate(&self) -> Result<(), String> {
        Ok(())
    }
}

impl From<UpdateAttributesRequest> for Attributes {
    fn from(r: UpdateAttributesRequest) -> Self {
        Attributes {
            strength: r.strength,
            agility: r.agility,
            constitution: r.constitution,
            wisdom: r.wisdom,
            intelligence: r.intelligence,
            charisma: r.charisma,
        }
    }
}

impl From<Attributes> for UpdateAttributesRequest {
    fn from(a: Attributes) -> Self {
        UpdateAttributesRequest {
            strength: a.strength,
            agility: a.agility,
            constitution: a.constitution,
            wisdom: a.wisdom,
            intelligence: a.intelligence,
            charisma: a.charisma,
        }
    }
}
