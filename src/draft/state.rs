// Draft state: team ban/pick slots, the action log, and the cursor into the
// fixed sequence. All mutation goes through `apply`, `undo`, and `reset`;
// the availability resolver is a pure read over the same state.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::data::champions::{ChampionId, Role};
use super::sequence::{step_at, ActionType, DraftStep, Side, DRAFT_LEN};

/// Ban and pick slots per team.
pub const TEAM_SLOTS: usize = 5;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Failures from the mutating draft operations.
///
/// The first four variants are the recoverable invalid-action class: the
/// state machine is left untouched and the caller re-renders. The
/// `SequenceDesync` variant is a defensive invariant violation that should
/// never occur; callers must treat it as fatal for the session.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DraftError {
    #[error("draft is already complete")]
    DraftComplete,

    #[error("champion id is empty")]
    EmptyChampionId,

    #[error("unknown champion `{0}`")]
    UnknownChampion(String),

    #[error("champion `{0}` has already been banned or picked")]
    ChampionUnavailable(String),

    #[error("sequence desync at step {step}: {side} {action} has no open slot")]
    SequenceDesync {
        step: usize,
        side: Side,
        action: ActionType,
    },
}

impl DraftError {
    /// Whether this error invalidates the session (bookkeeping bug) rather
    /// than rejecting a single user action.
    pub fn is_fatal(&self) -> bool {
        matches!(self, DraftError::SequenceDesync { .. })
    }
}

// ---------------------------------------------------------------------------
// Team state
// ---------------------------------------------------------------------------

/// One player on a team's roster, aligned with a pick slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DraftPlayer {
    pub id: String,
    pub name: String,
    pub role: Role,
}

/// One team's half of the draft.
///
/// Slots fill strictly in the order the sequence assigns them to this team
/// and are never overwritten except through `undo`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamDraftState {
    pub team_name: String,
    pub bans: [Option<ChampionId>; TEAM_SLOTS],
    pub picks: [Option<ChampionId>; TEAM_SLOTS],
    /// Roster in pick-slot order (TOP, JGL, MID, ADC, SUP). May be empty
    /// when roster data is unavailable; the engine degrades accordingly.
    pub players: Vec<DraftPlayer>,
}

impl TeamDraftState {
    pub fn new(team_name: impl Into<String>, players: Vec<DraftPlayer>) -> Self {
        TeamDraftState {
            team_name: team_name.into(),
            bans: Default::default(),
            picks: Default::default(),
            players,
        }
    }

    fn slots(&self, action: ActionType) -> &[Option<ChampionId>; TEAM_SLOTS] {
        match action {
            ActionType::Ban => &self.bans,
            ActionType::Pick => &self.picks,
        }
    }

    fn slots_mut(&mut self, action: ActionType) -> &mut [Option<ChampionId>; TEAM_SLOTS] {
        match action {
            ActionType::Ban => &mut self.bans,
            ActionType::Pick => &mut self.picks,
        }
    }

    /// Index of the first empty slot in the given array.
    pub fn first_empty(&self, action: ActionType) -> Option<usize> {
        self.slots(action).iter().position(|s| s.is_none())
    }

    /// Number of committed picks.
    pub fn pick_count(&self) -> usize {
        self.picks.iter().filter(|s| s.is_some()).count()
    }

    /// Committed pick champion ids, in slot order.
    pub fn committed_picks(&self) -> impl Iterator<Item = &ChampionId> {
        self.picks.iter().flatten()
    }

    /// Committed ban champion ids, in slot order.
    pub fn committed_bans(&self) -> impl Iterator<Item = &ChampionId> {
        self.bans.iter().flatten()
    }

    /// The player occupying a pick slot, if roster data is present.
    pub fn player_at(&self, slot: usize) -> Option<&DraftPlayer> {
        self.players.get(slot)
    }

    fn clear_champion(&mut self, action: ActionType, champion_id: &str) -> bool {
        let slots = self.slots_mut(action);
        if let Some(slot) = slots
            .iter()
            .position(|s| s.as_deref() == Some(champion_id))
        {
            slots[slot] = None;
            true
        } else {
            false
        }
    }

    fn clear(&mut self) {
        self.bans = Default::default();
        self.picks = Default::default();
    }
}

// ---------------------------------------------------------------------------
// Action log
// ---------------------------------------------------------------------------

/// One applied draft action. Append-only; `undo` pops the latest entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DraftAction {
    pub step_index: usize,
    pub side: Side,
    pub action: ActionType,
    pub champion_id: ChampionId,
    pub recorded_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// DraftSession
// ---------------------------------------------------------------------------

/// A single logical draft: both team states, the cursor, and the action log.
///
/// Invariants maintained by every operation:
/// - `actions.len() == cursor`
/// - a champion id appears in at most one slot across all four arrays
/// - `is_complete()` iff `cursor == DRAFT_LEN`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DraftSession {
    pub blue: TeamDraftState,
    pub red: TeamDraftState,
    cursor: usize,
    actions: Vec<DraftAction>,
}

impl DraftSession {
    pub fn new(blue: TeamDraftState, red: TeamDraftState) -> Self {
        DraftSession {
            blue,
            red,
            cursor: 0,
            actions: Vec::new(),
        }
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn actions(&self) -> &[DraftAction] {
        &self.actions
    }

    pub fn team(&self, side: Side) -> &TeamDraftState {
        match side {
            Side::Blue => &self.blue,
            Side::Red => &self.red,
        }
    }

    fn team_mut(&mut self, side: Side) -> &mut TeamDraftState {
        match side {
            Side::Blue => &mut self.blue,
            Side::Red => &mut self.red,
        }
    }

    /// The step the draft is waiting on, or `None` once all 20 are applied.
    pub fn current_step(&self) -> Option<&'static DraftStep> {
        step_at(self.cursor)
    }

    pub fn is_complete(&self) -> bool {
        self.cursor >= DRAFT_LEN
    }

    // -- Availability resolver -------------------------------------------

    /// Every champion id currently occupying a ban or pick slot on either
    /// team. Recomputed from state on each call; at this data size a cache
    /// would only add an invalidation obligation.
    pub fn excluded_set(&self) -> HashSet<&str> {
        self.blue
            .committed_bans()
            .chain(self.blue.committed_picks())
            .chain(self.red.committed_bans())
            .chain(self.red.committed_picks())
            .map(|id| id.as_str())
            .collect()
    }

    /// Whether a champion is still selectable.
    pub fn is_available(&self, champion_id: &str) -> bool {
        !self.excluded_set().contains(champion_id)
    }

    // -- Mutations --------------------------------------------------------

    /// Apply the current step with the given champion.
    ///
    /// On success the matching team's first empty slot is filled, the action
    /// is appended to the log, and the cursor advances. On any error the
    /// session is left exactly as it was.
    pub fn apply(&mut self, champion_id: &str) -> Result<(), DraftError> {
        let step = *self.current_step().ok_or(DraftError::DraftComplete)?;

        if champion_id.is_empty() {
            return Err(DraftError::EmptyChampionId);
        }
        if !self.is_available(champion_id) {
            return Err(DraftError::ChampionUnavailable(champion_id.to_string()));
        }

        let team = self.team_mut(step.side);
        let slot = team
            .first_empty(step.action)
            .ok_or(DraftError::SequenceDesync {
                step: step.index,
                side: step.side,
                action: step.action,
            })?;

        team.slots_mut(step.action)[slot] = Some(champion_id.to_string());
        self.actions.push(DraftAction {
            step_index: step.index,
            side: step.side,
            action: step.action,
            champion_id: champion_id.to_string(),
            recorded_at: Utc::now(),
        });
        self.cursor += 1;

        Ok(())
    }

    /// Undo the most recent action. Returns the popped action, or `None`
    /// when there is nothing to undo (a safe no-op, so UI undo spam is
    /// harmless).
    pub fn undo(&mut self) -> Option<DraftAction> {
        let action = self.actions.pop()?;
        let team = self.team_mut(action.side);
        if !team.clear_champion(action.action, &action.champion_id) {
            // Log bookkeeping and slot contents disagree. Restore the log
            // entry so the cursor/log invariant holds and surface loudly.
            warn!(
                "undo found no slot holding `{}` for {} {}",
                action.champion_id, action.side, action.action
            );
            self.actions.push(action);
            return None;
        }
        self.cursor -= 1;
        Some(action)
    }

    /// Clear all slots and the log, returning the session to step 0.
    /// Team names and rosters are kept.
    pub fn reset(&mut self) {
        self.blue.clear();
        self.red.clear();
        self.actions.clear();
        self.cursor = 0;
    }

    // -- Derived queries --------------------------------------------------

    /// The role whose pick slot is next to fill for `side`, per the fixed
    /// TOP/JGL/MID/ADC/SUP slot order.
    pub fn next_pick_role(&self, side: Side) -> Option<Role> {
        let slot = self.team(side).first_empty(ActionType::Pick)?;
        Role::from_slot_index(slot)
    }

    /// The player whose pick slot is next to fill for `side`, when roster
    /// data exists.
    pub fn next_pick_player(&self, side: Side) -> Option<&DraftPlayer> {
        let slot = self.team(side).first_empty(ActionType::Pick)?;
        self.team(side).player_at(slot)
    }
}
