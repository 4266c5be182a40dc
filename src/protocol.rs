// Wire types shared between the WebSocket client and the app loop.
//
// Requests and responses are JSON with a SCREAMING_SNAKE_CASE "type" tag.
// Everything here is plain data; behavior lives in the app handlers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::data::champions::Role;
use crate::draft::sequence::{ActionType, Side};
use crate::draft::state::{DraftError, DraftSession, TeamDraftState};
use crate::engine::composition::CompositionAnalysis;
use crate::engine::recommend::{DegradedData, Recommendation};

// ---------------------------------------------------------------------------
// Client requests
// ---------------------------------------------------------------------------

/// Operations a client may invoke on a draft session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClientRequest {
    ApplyAction {
        session_id: String,
        champion_id: String,
    },
    UndoAction {
        session_id: String,
    },
    ResetDraft {
        session_id: String,
    },
    GetRecommendations {
        session_id: String,
    },
    GetCompositionAnalysis {
        session_id: String,
    },
}

impl ClientRequest {
    pub fn session_id(&self) -> &str {
        match self {
            ClientRequest::ApplyAction { session_id, .. }
            | ClientRequest::UndoAction { session_id }
            | ClientRequest::ResetDraft { session_id }
            | ClientRequest::GetRecommendations { session_id }
            | ClientRequest::GetCompositionAnalysis { session_id } => session_id,
        }
    }
}

// ---------------------------------------------------------------------------
// Server messages
// ---------------------------------------------------------------------------

/// Error classes surfaced to the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    /// Action rejected; session state is unchanged.
    InvalidAction,
    /// Invariant violation; the session must be reset before further use.
    SequenceDesync,
    /// The request could not be parsed or addressed.
    BadRequest,
}

impl ErrorKind {
    pub fn from_draft_error(err: &DraftError) -> Self {
        if err.is_fatal() {
            ErrorKind::SequenceDesync
        } else {
            ErrorKind::InvalidAction
        }
    }
}

/// Messages pushed back to the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ServerMessage {
    StateUpdate {
        session_id: String,
        state: StateSnapshot,
        is_complete: bool,
    },
    Recommendations {
        session_id: String,
        recommendations: Vec<Recommendation>,
        warnings: Vec<DegradedData>,
        /// Latest narrative text for this session, empty until generated.
        analysis_text: String,
        composition_summary: CompositionSummary,
    },
    CompositionAnalysis {
        session_id: String,
        blue: Option<CompositionAnalysis>,
        red: Option<CompositionAnalysis>,
    },
    Error {
        session_id: String,
        kind: ErrorKind,
        message: String,
    },
    NarrativeToken {
        session_id: String,
        text: String,
    },
    NarrativeComplete {
        session_id: String,
    },
    NarrativeError {
        session_id: String,
        message: String,
    },
}

/// Both teams' analyses, either side absent until it has a pick.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompositionSummary {
    pub blue: Option<CompositionAnalysis>,
    pub red: Option<CompositionAnalysis>,
}

// ---------------------------------------------------------------------------
// State snapshots
// ---------------------------------------------------------------------------

/// The step the draft is waiting on, flattened for the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepInfo {
    pub index: usize,
    pub side: Side,
    pub action: ActionType,
    pub phase: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerInfo {
    pub id: String,
    pub name: String,
    pub role: Role,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamSnapshot {
    pub team_name: String,
    pub bans: Vec<Option<String>>,
    pub picks: Vec<Option<String>>,
    pub players: Vec<PlayerInfo>,
}

impl TeamSnapshot {
    fn from_team(team: &TeamDraftState) -> Self {
        TeamSnapshot {
            team_name: team.team_name.clone(),
            bans: team.bans.to_vec(),
            picks: team.picks.to_vec(),
            players: team
                .players
                .iter()
                .map(|p| PlayerInfo {
                    id: p.id.clone(),
                    name: p.name.clone(),
                    role: p.role,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionInfo {
    pub step_index: usize,
    pub side: Side,
    pub action: ActionType,
    pub champion_id: String,
    pub recorded_at: DateTime<Utc>,
}

/// The complete externally visible state of one draft session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateSnapshot {
    pub cursor: usize,
    pub next_step: Option<StepInfo>,
    pub blue: TeamSnapshot,
    pub red: TeamSnapshot,
    pub actions: Vec<ActionInfo>,
}

impl StateSnapshot {
    pub fn from_session(session: &DraftSession) -> Self {
        StateSnapshot {
            cursor: session.cursor(),
            next_step: session.current_step().map(|s| StepInfo {
                index: s.index,
                side: s.side,
                action: s.action,
                phase: s.phase.to_string(),
            }),
            blue: TeamSnapshot::from_team(&session.blue),
            red: TeamSnapshot::from_team(&session.red),
            actions: session
                .actions()
                .iter()
                .map(|a| ActionInfo {
                    step_index: a.step_index,
                    side: a.side,
                    action: a.action,
                    champion_id: a.champion_id.clone(),
                    recorded_at: a.recorded_at,
                })
                .collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// LLM streaming events
// ---------------------------------------------------------------------------

/// Events emitted by the narrative client's streaming task.
#[derive(Debug, Clone, PartialEq)]
pub enum LlmEvent {
    Token {
        text: String,
        generation: u64,
    },
    Complete {
        full_text: String,
        input_tokens: u32,
        output_tokens: u32,
        generation: u64,
    },
    Error {
        message: String,
        generation: u64,
    },
}

impl LlmEvent {
    pub fn generation(&self) -> u64 {
        match self {
            LlmEvent::Token { generation, .. }
            | LlmEvent::Complete { generation, .. }
            | LlmEvent::Error { generation, .. } => *generation,
        }
    }
}
