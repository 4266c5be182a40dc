// Champion reference catalog: identity, role eligibility, damage type.
//
// Loaded once from CSV and looked up by id throughout. Champions are
// immutable reference data; the draft state only ever stores their ids.

use std::collections::HashMap;
use std::fmt;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::DataError;

/// Stable champion identifier (lowercase slug, e.g. "jinx").
pub type ChampionId = String;

/// The five lanes. Used both for player identity and champion eligibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Top,
    Jungle,
    Mid,
    Adc,
    Support,
}

/// Canonical role order; pick slot `i` on a team belongs to `ROLE_ORDER[i]`.
pub const ROLE_ORDER: [Role; 5] = [Role::Top, Role::Jungle, Role::Mid, Role::Adc, Role::Support];

impl Role {
    /// Parse a role string. Accepts common abbreviations:
    /// "TOP", "JGL"/"JUNGLE"/"JG", "MID"/"MIDDLE", "ADC"/"BOT"/"BOTTOM",
    /// "SUP"/"SUPP"/"SUPPORT".
    pub fn from_str_role(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "TOP" => Some(Role::Top),
            "JGL" | "JG" | "JUNGLE" => Some(Role::Jungle),
            "MID" | "MIDDLE" => Some(Role::Mid),
            "ADC" | "BOT" | "BOTTOM" => Some(Role::Adc),
            "SUP" | "SUPP" | "SUPPORT" => Some(Role::Support),
            _ => None,
        }
    }

    /// Display string for this role.
    pub fn display_str(&self) -> &'static str {
        match self {
            Role::Top => "TOP",
            Role::Jungle => "JGL",
            Role::Mid => "MID",
            Role::Adc => "ADC",
            Role::Support => "SUP",
        }
    }

    /// Index of this role in the canonical pick-slot order.
    pub fn slot_index(&self) -> usize {
        match self {
            Role::Top => 0,
            Role::Jungle => 1,
            Role::Mid => 2,
            Role::Adc => 3,
            Role::Support => 4,
        }
    }

    /// The role owning pick slot `index`, or `None` past the roster size.
    pub fn from_slot_index(index: usize) -> Option<Self> {
        ROLE_ORDER.get(index).copied()
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_str())
    }
}

/// Primary damage profile of a champion's kit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DamageType {
    /// Predominantly physical damage.
    Ad,
    /// Predominantly magic damage.
    Ap,
    /// Meaningful amounts of both.
    Mixed,
    /// Kit built around true damage.
    True,
}

impl DamageType {
    pub fn from_str_damage(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "AD" | "PHYSICAL" => Some(DamageType::Ad),
            "AP" | "MAGIC" => Some(DamageType::Ap),
            "MIXED" | "HYBRID" => Some(DamageType::Mixed),
            "TRUE" => Some(DamageType::True),
            _ => None,
        }
    }

    pub fn display_str(&self) -> &'static str {
        match self {
            DamageType::Ad => "AD",
            DamageType::Ap => "AP",
            DamageType::Mixed => "Mixed",
            DamageType::True => "True",
        }
    }
}

/// A single champion's reference record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Champion {
    pub id: ChampionId,
    /// Display name (e.g. "Jinx").
    pub name: String,
    /// Lanes this champion can credibly fill. Never empty.
    pub roles: Vec<Role>,
    /// Primary damage type, when known.
    pub damage_type: Option<DamageType>,
}

impl Champion {
    pub fn plays(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }
}

/// The full champion catalog, keyed by id.
#[derive(Debug, Clone, Default)]
pub struct ChampionCatalog {
    by_id: HashMap<ChampionId, Champion>,
}

impl ChampionCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from a list of champions. Later duplicates of an id
    /// replace earlier ones.
    pub fn from_champions(champions: Vec<Champion>) -> Self {
        let by_id = champions.into_iter().map(|c| (c.id.clone(), c)).collect();
        ChampionCatalog { by_id }
    }

    pub fn get(&self, id: &str) -> Option<&Champion> {
        self.by_id.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.by_id.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    /// All champions sorted by display name. The stable iteration order is
    /// what makes downstream scoring deterministic.
    pub fn all_sorted(&self) -> Vec<&Champion> {
        let mut all: Vec<&Champion> = self.by_id.values().collect();
        all.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        all
    }

    /// Display name for an id, falling back to the id itself.
    pub fn name_of<'a>(&'a self, id: &'a str) -> &'a str {
        self.get(id).map(|c| c.name.as_str()).unwrap_or(id)
    }
}

// ---------------------------------------------------------------------------
// CSV loading
// ---------------------------------------------------------------------------

/// Raw champions.csv row. `roles` is a '|'-separated list; `damage_type`
/// may be empty.
#[derive(Debug, Deserialize)]
struct RawChampionRow {
    id: String,
    name: String,
    roles: String,
    #[serde(default)]
    damage_type: String,
}

fn load_champions_from_reader<R: Read>(rdr: R) -> Result<Vec<Champion>, csv::Error> {
    let mut reader = csv::Reader::from_reader(rdr);
    let mut champions = Vec::new();
    for result in reader.deserialize::<RawChampionRow>() {
        let raw = match result {
            Ok(raw) => raw,
            Err(e) => {
                warn!("skipping malformed champion row: {}", e);
                continue;
            }
        };

        let id = raw.id.trim().to_lowercase();
        if id.is_empty() {
            warn!("skipping champion row with empty id (name '{}')", raw.name);
            continue;
        }

        let roles: Vec<Role> = raw
            .roles
            .split('|')
            .filter_map(|s| {
                let s = s.trim();
                if s.is_empty() {
                    return None;
                }
                let role = Role::from_str_role(s);
                if role.is_none() {
                    warn!("champion '{}': unknown role '{}'", id, s);
                }
                role
            })
            .collect();
        if roles.is_empty() {
            warn!("skipping champion '{}': no valid roles", id);
            continue;
        }

        let damage_type = {
            let s = raw.damage_type.trim();
            if s.is_empty() {
                None
            } else {
                let parsed = DamageType::from_str_damage(s);
                if parsed.is_none() {
                    warn!("champion '{}': unknown damage type '{}'", id, s);
                }
                parsed
            }
        };

        champions.push(Champion {
            id,
            name: raw.name.trim().to_string(),
            roles,
            damage_type,
        });
    }
    Ok(champions)
}

/// Load the champion catalog from a CSV file.
pub fn load_catalog(path: &Path) -> Result<ChampionCatalog, DataError> {
    let file = std::fs::File::open(path).map_err(|e| DataError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    let champions = load_champions_from_reader(file).map_err(|e| DataError::Csv {
        path: path.to_path_buf(),
        source: e,
    })?;
    if champions.is_empty() {
        return Err(DataError::Validation(format!(
            "champion catalog {} contains no usable rows",
            path.display()
        )));
    }
    Ok(ChampionCatalog::from_champions(champions))
}
