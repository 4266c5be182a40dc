// Static knowledge tables: counter matchups, synergy pairs, meta tiers, and
// champion trait tags. The values are content supplied by the surrounding
// layers (scraped or curated upstream); the engine only consumes them
// through the lookup methods here.

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::champions::ChampionId;
use super::DataError;

// ---------------------------------------------------------------------------
// Meta tiers
// ---------------------------------------------------------------------------

/// Patch-strength tier for a champion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MetaTier {
    S,
    A,
    B,
    C,
    D,
}

impl MetaTier {
    pub fn from_str_tier(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "S" => Some(MetaTier::S),
            "A" => Some(MetaTier::A),
            "B" => Some(MetaTier::B),
            "C" => Some(MetaTier::C),
            "D" => Some(MetaTier::D),
            _ => None,
        }
    }

    /// Scoring multiplier in [0, 1] applied to the meta weight.
    pub fn factor(&self) -> f64 {
        match self {
            MetaTier::S => 1.0,
            MetaTier::A => 0.75,
            MetaTier::B => 0.5,
            MetaTier::C => 0.25,
            MetaTier::D => 0.0,
        }
    }

    pub fn display_str(&self) -> &'static str {
        match self {
            MetaTier::S => "S",
            MetaTier::A => "A",
            MetaTier::B => "B",
            MetaTier::C => "C",
            MetaTier::D => "D",
        }
    }
}

// ---------------------------------------------------------------------------
// Power spikes and trait tags
// ---------------------------------------------------------------------------

/// Game-time window where a champion is unusually strong.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SpikeWindow {
    Early,
    Mid,
    Late,
}

impl SpikeWindow {
    pub fn from_str_window(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "EARLY" => Some(SpikeWindow::Early),
            "MID" => Some(SpikeWindow::Mid),
            "LATE" => Some(SpikeWindow::Late),
            _ => None,
        }
    }

    pub fn display_str(&self) -> &'static str {
        match self {
            SpikeWindow::Early => "early",
            SpikeWindow::Mid => "mid",
            SpikeWindow::Late => "late",
        }
    }
}

/// Tactical trait tags for a champion, consumed by the composition analyzer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChampionTraits {
    pub spikes: Vec<SpikeWindow>,
    pub engage: bool,
    pub disengage: bool,
    pub poke: bool,
    /// Single-target catch threat (hooks, long-range CC).
    pub pick: bool,
    pub splitpush: bool,
}

// ---------------------------------------------------------------------------
// KnowledgeBase
// ---------------------------------------------------------------------------

/// All knowledge tables bundled for the engine. Safe to share read-only
/// across sessions.
#[derive(Debug, Clone, Default)]
pub struct KnowledgeBase {
    /// attacker id -> (victim id, strength in (0, 1]).
    counters: HashMap<ChampionId, Vec<(ChampionId, f64)>>,
    /// champion id -> (partner id, strength in (0, 1]); stored both ways.
    synergies: HashMap<ChampionId, Vec<(ChampionId, f64)>>,
    meta: HashMap<ChampionId, MetaTier>,
    traits: HashMap<ChampionId, ChampionTraits>,
}

impl KnowledgeBase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `attacker` has a favorable matchup into `victim`.
    pub fn add_counter(&mut self, attacker: &str, victim: &str, strength: f64) {
        self.counters
            .entry(attacker.to_string())
            .or_default()
            .push((victim.to_string(), strength));
    }

    /// Record a synergy pair; lookup works from either champion.
    pub fn add_synergy(&mut self, a: &str, b: &str, strength: f64) {
        self.synergies
            .entry(a.to_string())
            .or_default()
            .push((b.to_string(), strength));
        self.synergies
            .entry(b.to_string())
            .or_default()
            .push((a.to_string(), strength));
    }

    pub fn set_meta(&mut self, id: &str, tier: MetaTier) {
        self.meta.insert(id.to_string(), tier);
    }

    pub fn set_traits(&mut self, id: &str, traits: ChampionTraits) {
        self.traits.insert(id.to_string(), traits);
    }

    /// Strength of `attacker`'s matchup into `victim`, if known.
    pub fn counter_strength(&self, attacker: &str, victim: &str) -> Option<f64> {
        self.counters
            .get(attacker)?
            .iter()
            .find(|(v, _)| v == victim)
            .map(|(_, s)| *s)
    }

    /// Strength of the synergy between two champions, if known.
    pub fn synergy_strength(&self, a: &str, b: &str) -> Option<f64> {
        self.synergies
            .get(a)?
            .iter()
            .find(|(p, _)| p == b)
            .map(|(_, s)| *s)
    }

    pub fn meta_tier(&self, id: &str) -> Option<MetaTier> {
        self.meta.get(id).copied()
    }

    pub fn traits(&self, id: &str) -> Option<&ChampionTraits> {
        self.traits.get(id)
    }

    /// Whether any matchup data exists at all. Used to surface a
    /// degraded-data warning rather than silently scoring zeros.
    pub fn has_matchup_data(&self) -> bool {
        !self.counters.is_empty()
    }
}

// ---------------------------------------------------------------------------
// CSV loading
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct RawMatchupRow {
    champion: String,
    counters: String,
    strength: f64,
}

#[derive(Debug, Deserialize)]
struct RawSynergyRow {
    champion_a: String,
    champion_b: String,
    strength: f64,
}

#[derive(Debug, Deserialize)]
struct RawMetaRow {
    champion: String,
    tier: String,
}

#[derive(Debug, Deserialize)]
struct RawTraitRow {
    champion: String,
    #[serde(default)]
    spikes: String,
    #[serde(default)]
    tools: String,
}

fn clamp_strength(raw: f64, context: &str) -> Option<f64> {
    if !raw.is_finite() || raw <= 0.0 {
        warn!("{context}: strength {raw} out of range, skipping");
        return None;
    }
    Some(raw.min(1.0))
}

fn load_matchups_from_reader<R: Read>(rdr: R, kb: &mut KnowledgeBase) -> Result<(), csv::Error> {
    let mut reader = csv::Reader::from_reader(rdr);
    for result in reader.deserialize::<RawMatchupRow>() {
        match result {
            Ok(raw) => {
                let attacker = raw.champion.trim().to_lowercase();
                let victim = raw.counters.trim().to_lowercase();
                if attacker.is_empty() || victim.is_empty() {
                    warn!("skipping matchup row with empty champion id");
                    continue;
                }
                if let Some(s) = clamp_strength(raw.strength, "matchup") {
                    kb.add_counter(&attacker, &victim, s);
                }
            }
            Err(e) => warn!("skipping malformed matchup row: {}", e),
        }
    }
    Ok(())
}

fn load_synergies_from_reader<R: Read>(rdr: R, kb: &mut KnowledgeBase) -> Result<(), csv::Error> {
    let mut reader = csv::Reader::from_reader(rdr);
    for result in reader.deserialize::<RawSynergyRow>() {
        match result {
            Ok(raw) => {
                let a = raw.champion_a.trim().to_lowercase();
                let b = raw.champion_b.trim().to_lowercase();
                if a.is_empty() || b.is_empty() || a == b {
                    warn!("skipping degenerate synergy row ({a}, {b})");
                    continue;
                }
                if let Some(s) = clamp_strength(raw.strength, "synergy") {
                    kb.add_synergy(&a, &b, s);
                }
            }
            Err(e) => warn!("skipping malformed synergy row: {}", e),
        }
    }
    Ok(())
}

fn load_meta_from_reader<R: Read>(rdr: R, kb: &mut KnowledgeBase) -> Result<(), csv::Error> {
    let mut reader = csv::Reader::from_reader(rdr);
    for result in reader.deserialize::<RawMetaRow>() {
        match result {
            Ok(raw) => {
                let id = raw.champion.trim().to_lowercase();
                match MetaTier::from_str_tier(raw.tier.trim()) {
                    Some(tier) if !id.is_empty() => kb.set_meta(&id, tier),
                    _ => warn!("skipping meta row '{}': unknown tier '{}'", id, raw.tier),
                }
            }
            Err(e) => warn!("skipping malformed meta row: {}", e),
        }
    }
    Ok(())
}

fn load_traits_from_reader<R: Read>(rdr: R, kb: &mut KnowledgeBase) -> Result<(), csv::Error> {
    let mut reader = csv::Reader::from_reader(rdr);
    for result in reader.deserialize::<RawTraitRow>() {
        match result {
            Ok(raw) => {
                let id = raw.champion.trim().to_lowercase();
                if id.is_empty() {
                    warn!("skipping trait row with empty champion id");
                    continue;
                }
                let mut traits = ChampionTraits::default();
                for token in raw.spikes.split('|') {
                    let token = token.trim();
                    if token.is_empty() {
                        continue;
                    }
                    match SpikeWindow::from_str_window(token) {
                        Some(w) if !traits.spikes.contains(&w) => traits.spikes.push(w),
                        Some(_) => {}
                        None => warn!("champion '{}': unknown spike window '{}'", id, token),
                    }
                }
                traits.spikes.sort();
                for token in raw.tools.split('|') {
                    match token.trim().to_uppercase().as_str() {
                        "" => {}
                        "ENGAGE" => traits.engage = true,
                        "DISENGAGE" => traits.disengage = true,
                        "POKE" => traits.poke = true,
                        "PICK" => traits.pick = true,
                        "SPLITPUSH" => traits.splitpush = true,
                        other => warn!("champion '{}': unknown tool tag '{}'", id, other),
                    }
                }
                kb.set_traits(&id, traits);
            }
            Err(e) => warn!("skipping malformed trait row: {}", e),
        }
    }
    Ok(())
}

/// Paths to the four knowledge CSV files.
pub struct KnowledgePaths<'a> {
    pub matchups: &'a Path,
    pub synergies: &'a Path,
    pub meta: &'a Path,
    pub traits: &'a Path,
}

fn open(path: &Path) -> Result<std::fs::File, DataError> {
    std::fs::File::open(path).map_err(|e| DataError::Io {
        path: path.to_path_buf(),
        source: e,
    })
}

fn csv_err(path: &Path) -> impl FnOnce(csv::Error) -> DataError + '_ {
    move |e| DataError::Csv {
        path: path.to_path_buf(),
        source: e,
    }
}

/// Load all four knowledge tables into one `KnowledgeBase`.
pub fn load_knowledge(paths: &KnowledgePaths<'_>) -> Result<KnowledgeBase, DataError> {
    let mut kb = KnowledgeBase::new();
    load_matchups_from_reader(open(paths.matchups)?, &mut kb).map_err(csv_err(paths.matchups))?;
    load_synergies_from_reader(open(paths.synergies)?, &mut kb)
        .map_err(csv_err(paths.synergies))?;
    load_meta_from_reader(open(paths.meta)?, &mut kb).map_err(csv_err(paths.meta))?;
    load_traits_from_reader(open(paths.traits)?, &mut kb).map_err(csv_err(paths.traits))?;
    Ok(kb)
}
