// Per-player champion pools: historical games and win rate per champion.
//
// This is the comfort-factor input. Pools come from an upstream stats
// provider and are supplied here as already-fetched CSV; a missing player
// or missing pool degrades the engine's comfort factor to zero, it never
// fails a request.

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::champions::ChampionId;
use super::DataError;

/// One champion in a player's pool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoolEntry {
    pub champion_id: ChampionId,
    pub games: u32,
    /// Win percentage in [0, 100].
    pub win_rate: f64,
}

/// All known player pools, keyed by player id.
#[derive(Debug, Clone, Default)]
pub struct PlayerPools {
    by_player: HashMap<String, Vec<PoolEntry>>,
}

impl PlayerPools {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, player_id: &str, entry: PoolEntry) {
        self.by_player
            .entry(player_id.to_string())
            .or_default()
            .push(entry);
    }

    /// A player's full pool, if any data exists for them.
    pub fn pool_for(&self, player_id: &str) -> Option<&[PoolEntry]> {
        self.by_player.get(player_id).map(|v| v.as_slice())
    }

    /// A player's history on one specific champion.
    pub fn entry_for(&self, player_id: &str, champion_id: &str) -> Option<&PoolEntry> {
        self.by_player
            .get(player_id)?
            .iter()
            .find(|e| e.champion_id == champion_id)
    }

    pub fn player_count(&self) -> usize {
        self.by_player.len()
    }
}

// ---------------------------------------------------------------------------
// CSV loading
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct RawPoolRow {
    player_id: String,
    champion: String,
    games: u32,
    win_rate: f64,
}

fn load_pools_from_reader<R: Read>(rdr: R) -> Result<PlayerPools, csv::Error> {
    let mut reader = csv::Reader::from_reader(rdr);
    let mut pools = PlayerPools::new();
    for result in reader.deserialize::<RawPoolRow>() {
        match result {
            Ok(raw) => {
                let player_id = raw.player_id.trim().to_string();
                let champion_id = raw.champion.trim().to_lowercase();
                if player_id.is_empty() || champion_id.is_empty() {
                    warn!("skipping pool row with empty player or champion id");
                    continue;
                }
                if !raw.win_rate.is_finite() || !(0.0..=100.0).contains(&raw.win_rate) {
                    warn!(
                        "skipping pool row {player_id}/{champion_id}: win rate {} out of range",
                        raw.win_rate
                    );
                    continue;
                }
                pools.insert(
                    &player_id,
                    PoolEntry {
                        champion_id,
                        games: raw.games,
                        win_rate: raw.win_rate,
                    },
                );
            }
            Err(e) => warn!("skipping malformed pool row: {}", e),
        }
    }
    Ok(pools)
}

/// Load player pools from a CSV file.
pub fn load_pools(path: &Path) -> Result<PlayerPools, DataError> {
    let file = std::fs::File::open(path).map_err(|e| DataError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    load_pools_from_reader(file).map_err(|e| DataError::Csv {
        path: path.to_path_buf(),
        source: e,
    })
}
