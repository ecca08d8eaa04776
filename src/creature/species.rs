use serde::{Deserialize, Serialize};

/// Closed set of roles. Every role-dependent branch matches on this enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Species {
    /// Top predator. Always hunting, never breeds, retreats home when wounded.
    Pursuer,
    /// Plant eater. Multiplies by splitting, can stab pursuers from behind.
    Forager,
    /// Pack animal. Breeds sexually, flocks, holds territory.
    Roamer,
}

pub const ALL_SPECIES: [Species; 3] = [Species::Pursuer, Species::Forager, Species::Roamer];

impl Species {
    /// Resolve a free-form tag such as "レッド族" or "green tribe".
    /// Unknown tags fall back to `Forager`.
    pub fn from_tag(tag: &str) -> Self {
        let tag = tag.to_lowercase();
        let has = |words: &[&str]| words.iter().any(|w| tag.contains(w));

        if has(&["green", "グリーン", "緑"]) {
            Species::Forager
        } else if has(&["red", "レッド", "赤"]) {
            Species::Pursuer
        } else if has(&["blue", "ブルー", "青", "native", "ネイティブ"]) {
            Species::Roamer
        } else {
            Species::Forager
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Species::Pursuer => "pursuer",
            Species::Forager => "forager",
            Species::Roamer => "roamer",
        }
    }

    /// Whether `self` can catch and damage `other` on contact.
    pub fn can_catch(self, other: Species) -> bool {
        matches!(
            (self, other),
            (Species::Pursuer, Species::Forager) | (Species::Roamer, Species::Forager)
        )
    }

    /// Whether `self` can stab `other` from its rear arc.
    pub fn can_backstab(self, other: Species) -> bool {
        matches!((self, other), (Species::Forager, Species::Pursuer))
    }

    pub fn flees_from(self, other: Species) -> bool {
        other.can_catch(self)
    }

    pub fn eats_plants(self) -> bool {
        matches!(self, Species::Forager)
    }

    pub fn can_breed(self) -> bool {
        matches!(self, Species::Roamer)
    }

    pub fn can_split(self) -> bool {
        matches!(self, Species::Forager)
    }

    pub fn retreats_when_wounded(self) -> bool {
        matches!(self, Species::Pursuer)
    }

    pub fn tracks_attackers(self) -> bool {
        matches!(self, Species::Forager)
    }

    /// Loses energy every tick regardless of activity.
    pub fn hungers(self) -> bool {
        matches!(self, Species::Roamer)
    }

    /// Flocking, territory and idle wander apply only to the pack role.
    pub fn is_pack(self) -> bool {
        matches!(self, Species::Roamer)
    }
}

impl std::fmt::Display for Species {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
