//! Placeholder tokens and their substitution in text content.
//!
//! A placeholder is a bracketed token such as `<tournament-name>`. Text is
//! resolved in one left-to-right pass: each recognized token is replaced by
//! its value from the current player/tournament, anything else (unknown
//! tokens, tokens whose data is missing, stray brackets) is copied through
//! literally. Substituted values are never re-scanned, so a player named
//! `<player-name>` stays exactly that.

use std::borrow::Cow;

use crate::data::{ordinal, DataContext};

/// A recognized data token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Placeholder {
    PlayerName,
    PlayerPrefix,
    PlayerPlacement,
    PlayerPronouns,
    PlayerTwitter,
    PlayerCharacter,
    TournamentName,
    TournamentEvent,
    TournamentDate,
    TournamentLocation,
    TournamentEntrants,
    TournamentIcon,
}

impl Placeholder {
    pub const ALL: [Placeholder; 12] = [
        Placeholder::PlayerName,
        Placeholder::PlayerPrefix,
        Placeholder::PlayerPlacement,
        Placeholder::PlayerPronouns,
        Placeholder::PlayerTwitter,
        Placeholder::PlayerCharacter,
        Placeholder::TournamentName,
        Placeholder::TournamentEvent,
        Placeholder::TournamentDate,
        Placeholder::TournamentLocation,
        Placeholder::TournamentEntrants,
        Placeholder::TournamentIcon,
    ];

    /// The token name, without brackets.
    pub fn name(self) -> &'static str {
        match self {
            Placeholder::PlayerName => "player-name",
            Placeholder::PlayerPrefix => "player-prefix",
            Placeholder::PlayerPlacement => "player-placement",
            Placeholder::PlayerPronouns => "player-pronouns",
            Placeholder::PlayerTwitter => "player-twitter",
            Placeholder::PlayerCharacter => "player-character",
            Placeholder::TournamentName => "tournament-name",
            Placeholder::TournamentEvent => "tournament-event",
            Placeholder::TournamentDate => "tournament-date",
            Placeholder::TournamentLocation => "tournament-location",
            Placeholder::TournamentEntrants => "tournament-entrants",
            Placeholder::TournamentIcon => "tournament-icon",
        }
    }

    /// The bracketed token as written in designs.
    pub fn token(self) -> String {
        format!("<{}>", self.name())
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|p| p.name() == name)
    }

    /// Parse a bracketed token like `<player-name>`.
    pub fn from_token(token: &str) -> Option<Self> {
        token
            .strip_prefix('<')
            .and_then(|t| t.strip_suffix('>'))
            .and_then(Self::from_name)
    }

    /// The value this token stands for, or `None` when the backing data is
    /// absent.
    pub fn resolve(self, data: &DataContext) -> Option<String> {
        let player = data.player;
        let tournament = data.tournament;
        match self {
            Placeholder::PlayerName => player.map(|p| p.name.clone()),
            Placeholder::PlayerPrefix => player.and_then(|p| p.prefix.clone()),
            Placeholder::PlayerPlacement => player.and_then(|p| p.placement).map(ordinal),
            Placeholder::PlayerPronouns => player.and_then(|p| p.pronouns.clone()),
            Placeholder::PlayerTwitter => player.and_then(|p| p.twitter.clone()),
            Placeholder::PlayerCharacter => data.characters().first().map(|c| c.name.clone()),
            Placeholder::TournamentName => tournament.map(|t| t.name.clone()),
            Placeholder::TournamentEvent => tournament.and_then(|t| t.event_name.clone()),
            Placeholder::TournamentDate => tournament.and_then(|t| t.date.clone()),
            Placeholder::TournamentLocation => tournament.and_then(|t| t.location.clone()),
            Placeholder::TournamentEntrants => {
                tournament.and_then(|t| t.entrants).map(|n| n.to_string())
            }
            Placeholder::TournamentIcon => tournament.and_then(|t| t.icon.clone()),
        }
    }

    /// Data presence: the token resolves to something other than whitespace.
    pub fn is_present(self, data: &DataContext) -> bool {
        self.resolve(data)
            .is_some_and(|value| !value.trim().is_empty())
    }
}

fn is_token_char(c: char) -> bool {
    c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'
}

/// Substitute every recognized token in `text`.
///
/// Borrows the input when nothing was replaced.
pub fn resolve_placeholders<'t>(text: &'t str, data: &DataContext) -> Cow<'t, str> {
    if !text.contains('<') {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len());
    let mut replaced = false;
    let mut rest = text;

    while let Some(open) = rest.find('<') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let name_len = after
            .char_indices()
            .find(|&(_, c)| !is_token_char(c))
            .map_or(after.len(), |(i, _)| i);

        if name_len > 0 && after[name_len..].starts_with('>') {
            let name = &after[..name_len];
            match Placeholder::from_name(name).and_then(|p| p.resolve(data)) {
                Some(value) => {
                    out.push_str(&value);
                    replaced = true;
                }
                None => {
                    out.push('<');
                    out.push_str(name);
                    out.push('>');
                }
            }
            rest = &after[name_len + 1..];
        } else {
            // Not a token: keep the bracket and rescan right after it.
            out.push('<');
            rest = after;
        }
    }
    out.push_str(rest);

    if replaced {
        Cow::Owned(out)
    } else {
        Cow::Borrowed(text)
    }
}
