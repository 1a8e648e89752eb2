//! Tournament and player records supplied by the host.
//!
//! These are read-only inputs to a build pass: the engine borrows them for
//! condition evaluation, placeholder substitution and data-driven leaves
//! (character art, flags, tournament icon). Fetching them is the host's job.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterData {
    pub name: String,
    /// Costume / skin index.
    #[serde(default)]
    pub variant: u32,
    /// Full character art URL.
    pub image: String,
    /// Stock icon URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerData {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    /// Final standing, 1-based.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placement: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pronouns: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub twitter: Option<String>,
    /// Flag image of the account's country.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country_flag: Option<String>,
    /// Flag image chosen in the editor for this player.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_flag: Option<String>,
    #[serde(default)]
    pub characters: Vec<CharacterData>,
}

impl PlayerData {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TournamentData {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entrants: Option<u32>,
    /// Tournament icon URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

/// Everything a design is populated with: one tournament and its standings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DesignData {
    pub tournament: TournamentData,
    #[serde(default)]
    pub players: Vec<PlayerData>,
}

/// Borrowed view of the records one build pass is populated with.
#[derive(Debug, Clone, Copy, Default)]
pub struct DataContext<'a> {
    pub player: Option<&'a PlayerData>,
    pub tournament: Option<&'a TournamentData>,
    /// Canvas background image, when the design sets one.
    pub background_image: Option<&'a str>,
}

impl<'a> DataContext<'a> {
    pub fn new(player: Option<&'a PlayerData>, tournament: Option<&'a TournamentData>) -> Self {
        Self {
            player,
            tournament,
            background_image: None,
        }
    }

    pub fn characters(&self) -> &'a [CharacterData] {
        self.player.map_or(&[], |p| p.characters.as_slice())
    }
}

/// English ordinal for a placement: 1st, 2nd, 3rd, 4th, 11th, 21st...
pub fn ordinal(n: u32) -> String {
    let suffix = match (n % 10, n % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{n}{suffix}")
}
