// The fixed 20-step competitive pick/ban order.
//
// This table is the single source of truth for whose turn it is and what
// kind of action is expected at any cursor position. It is static data and
// never changes at runtime; everything else in the draft module derives its
// turn logic from `step_at`.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Which side of the draft a team occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Side {
    Blue,
    Red,
}

impl Side {
    /// The opposing side.
    pub fn opponent(&self) -> Side {
        match self {
            Side::Blue => Side::Red,
            Side::Red => Side::Blue,
        }
    }

    /// Display string for logs and prompts.
    pub fn display_str(&self) -> &'static str {
        match self {
            Side::Blue => "Blue",
            Side::Red => "Red",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_str())
    }
}

/// Whether a draft step removes a champion from the pool or claims it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionType {
    Ban,
    Pick,
}

impl ActionType {
    pub fn display_str(&self) -> &'static str {
        match self {
            ActionType::Ban => "Ban",
            ActionType::Pick => "Pick",
        }
    }
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_str())
    }
}

/// One entry in the draft order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DraftStep {
    /// Position in the overall sequence (0..20).
    pub index: usize,
    /// The team acting at this step.
    pub side: Side,
    /// Ban or pick.
    pub action: ActionType,
    /// Human-readable phase label (e.g. "Ban Phase 1").
    pub phase: &'static str,
}

/// Total number of actions in a complete draft.
pub const DRAFT_LEN: usize = 20;

const fn step(index: usize, side: Side, action: ActionType, phase: &'static str) -> DraftStep {
    DraftStep {
        index,
        side,
        action,
        phase,
    }
}

/// The standard professional draft order:
/// ban phase 1 (B R R B B R), pick phase 1 (B R R B B R),
/// ban phase 2 (R B B R), pick phase 2 (R B B R).
static SEQUENCE: [DraftStep; DRAFT_LEN] = [
    step(0, Side::Blue, ActionType::Ban, "Ban Phase 1"),
    step(1, Side::Red, ActionType::Ban, "Ban Phase 1"),
    step(2, Side::Red, ActionType::Ban, "Ban Phase 1"),
    step(3, Side::Blue, ActionType::Ban, "Ban Phase 1"),
    step(4, Side::Blue, ActionType::Ban, "Ban Phase 1"),
    step(5, Side::Red, ActionType::Ban, "Ban Phase 1"),
    step(6, Side::Blue, ActionType::Pick, "Pick Phase 1"),
    step(7, Side::Red, ActionType::Pick, "Pick Phase 1"),
    step(8, Side::Red, ActionType::Pick, "Pick Phase 1"),
    step(9, Side::Blue, ActionType::Pick, "Pick Phase 1"),
    step(10, Side::Blue, ActionType::Pick, "Pick Phase 1"),
    step(11, Side::Red, ActionType::Pick, "Pick Phase 1"),
    step(12, Side::Red, ActionType::Ban, "Ban Phase 2"),
    step(13, Side::Blue, ActionType::Ban, "Ban Phase 2"),
    step(14, Side::Blue, ActionType::Ban, "Ban Phase 2"),
    step(15, Side::Red, ActionType::Ban, "Ban Phase 2"),
    step(16, Side::Red, ActionType::Pick, "Pick Phase 2"),
    step(17, Side::Blue, ActionType::Pick, "Pick Phase 2"),
    step(18, Side::Blue, ActionType::Pick, "Pick Phase 2"),
    step(19, Side::Red, ActionType::Pick, "Pick Phase 2"),
];

/// Look up the step at a cursor position.
///
/// Returns `None` for any index outside `[0, DRAFT_LEN)`. Callers use the
/// `None` case to detect draft completion; out-of-range lookups are normal,
/// not an error.
pub fn step_at(index: usize) -> Option<&'static DraftStep> {
    SEQUENCE.get(index)
}

/// The full sequence, for iteration in summaries and tests.
pub fn full_sequence() -> &'static [DraftStep; DRAFT_LEN] {
    &SEQUENCE
}
