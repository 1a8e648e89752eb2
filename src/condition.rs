//! Render conditions: the visibility gate attached to an element.
//!
//! An element's `conditions` is a short list of atoms. Each atom is a
//! data-presence placeholder (`<player-prefix>`), an environment render
//! condition (`backgroundImage`) or the `NOT` marker. The list is folded left
//! to right: `NOT` negates the next atom only, and every other atom replaces
//! the running result. The last evaluated atom decides; there is no AND/OR.

use serde::{Deserialize, Serialize};

use crate::data::DataContext;
use crate::placeholder::Placeholder;

/// Environment-derived conditions that aren't tied to a placeholder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RenderCondition {
    /// The design has a canvas background image.
    BackgroundImage,
    /// The player has more than one character.
    AltCharacters,
}

impl RenderCondition {
    pub fn name(self) -> &'static str {
        match self {
            RenderCondition::BackgroundImage => "backgroundImage",
            RenderCondition::AltCharacters => "altCharacters",
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        match name {
            "backgroundImage" => Some(RenderCondition::BackgroundImage),
            "altCharacters" => Some(RenderCondition::AltCharacters),
            _ => None,
        }
    }

    fn holds(self, data: &DataContext) -> bool {
        match self {
            RenderCondition::BackgroundImage => {
                data.background_image.is_some_and(|src| !src.is_empty())
            }
            RenderCondition::AltCharacters => data.characters().len() > 1,
        }
    }
}

/// One entry of an element's `conditions` list. Serialized as a plain string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ConditionAtom {
    Not,
    Data(Placeholder),
    Render(RenderCondition),
    /// Anything unrecognized. Evaluates to false and is written back as-is.
    Unknown(String),
}

impl From<String> for ConditionAtom {
    fn from(s: String) -> Self {
        if s == "NOT" {
            return ConditionAtom::Not;
        }
        if let Some(p) = Placeholder::from_token(&s) {
            return ConditionAtom::Data(p);
        }
        if let Some(r) = RenderCondition::from_name(&s) {
            return ConditionAtom::Render(r);
        }
        ConditionAtom::Unknown(s)
    }
}

impl From<&str> for ConditionAtom {
    fn from(s: &str) -> Self {
        ConditionAtom::from(s.to_string())
    }
}

impl From<ConditionAtom> for String {
    fn from(atom: ConditionAtom) -> Self {
        match atom {
            ConditionAtom::Not => "NOT".to_string(),
            ConditionAtom::Data(p) => p.token(),
            ConditionAtom::Render(r) => r.name().to_string(),
            ConditionAtom::Unknown(s) => s,
        }
    }
}

impl ConditionAtom {
    fn truth(&self, data: &DataContext) -> bool {
        match self {
            ConditionAtom::Data(p) => p.is_present(data),
            ConditionAtom::Render(r) => r.holds(data),
            ConditionAtom::Unknown(s) => {
                log::warn!("unknown render condition {s:?}, treating as false");
                false
            }
            ConditionAtom::Not => false,
        }
    }
}

/// Evaluate an element's condition list. Absent or empty lists pass.
pub fn evaluate(conditions: Option<&[ConditionAtom]>, data: &DataContext) -> bool {
    let Some(atoms) = conditions else {
        return true;
    };

    let mut result = true;
    let mut negate = false;
    for atom in atoms {
        if matches!(atom, ConditionAtom::Not) {
            negate = true;
            continue;
        }
        let value = atom.truth(data);
        result = if negate { !value } else { value };
        negate = false;
    }
    result
}
