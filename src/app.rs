// Application state and orchestration logic.
//
// The central event loop that coordinates WebSocket requests from the draft
// client and streaming events from the narrative generator. All mutable
// session state is owned here and touched only from this single task, which
// is what serializes apply/undo/reset per session; the engine calls are pure
// reads over that state.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::data::champions::ChampionCatalog;
use crate::data::knowledge::KnowledgeBase;
use crate::data::pools::PlayerPools;
use crate::draft::state::{DraftSession, TeamDraftState};
use crate::engine::composition::analyze_team;
use crate::engine::recommend::recommend;
use crate::llm::client::LlmClient;
use crate::llm::{prompt, NarrativeGenerator};
use crate::protocol::{
    ClientRequest, CompositionSummary, ErrorKind, LlmEvent, ServerMessage, StateSnapshot,
};
use crate::ws_server::WsEvent;

// ---------------------------------------------------------------------------
// Session bookkeeping
// ---------------------------------------------------------------------------

/// One tracked draft session. A `fault` marks the session invalidated by a
/// sequence desync; every operation except reset is refused until then.
struct SessionEntry {
    session: DraftSession,
    fault: Option<String>,
}

// ---------------------------------------------------------------------------
// AppState
// ---------------------------------------------------------------------------

/// The complete application state.
pub struct AppState {
    pub config: Config,
    pub catalog: Arc<ChampionCatalog>,
    pub knowledge: Arc<KnowledgeBase>,
    pub pools: Arc<PlayerPools>,
    sessions: HashMap<String, SessionEntry>,
    /// Narrative client for streaming draft reviews. Wrapped in Arc for
    /// sharing with spawned tasks.
    pub llm_client: Arc<LlmClient>,
    /// Sender for LLM events; spawned tasks use a clone of this sender to
    /// stream tokens back to the main event loop.
    pub llm_tx: mpsc::Sender<LlmEvent>,
    /// Monotonically increasing counter identifying the current LLM task.
    /// Events from stale generations are discarded in `handle_llm_event`.
    pub llm_generation: u64,
    narrative_text: String,
    /// Session the current narrative belongs to.
    narrative_session: Option<String>,
    current_llm_task: Option<tokio::task::JoinHandle<()>>,
    /// Outbound channel to the connected client, when one exists.
    reply: Option<mpsc::Sender<String>>,
}

impl AppState {
    pub fn new(
        config: Config,
        catalog: Arc<ChampionCatalog>,
        knowledge: Arc<KnowledgeBase>,
        pools: Arc<PlayerPools>,
        llm_client: LlmClient,
        llm_tx: mpsc::Sender<LlmEvent>,
    ) -> Self {
        AppState {
            config,
            catalog,
            knowledge,
            pools,
            sessions: HashMap::new(),
            llm_client: Arc::new(llm_client),
            llm_tx,
            llm_generation: 0,
            narrative_text: String::new(),
            narrative_session: None,
            current_llm_task: None,
            reply: None,
        }
    }

    /// Look up a session, creating it from the configured team rosters on
    /// first use. Sessions share nothing mutable with each other.
    fn entry<'a>(
        sessions: &'a mut HashMap<String, SessionEntry>,
        config: &Config,
        session_id: &str,
    ) -> &'a mut SessionEntry {
        sessions
            .entry(session_id.to_string())
            .or_insert_with(|| {
                info!("creating draft session '{}'", session_id);
                let blue_players = config.teams.blue.to_draft_players().unwrap_or_else(|e| {
                    warn!("blue roster invalid, starting without players: {e}");
                    Vec::new()
                });
                let red_players = config.teams.red.to_draft_players().unwrap_or_else(|e| {
                    warn!("red roster invalid, starting without players: {e}");
                    Vec::new()
                });
                SessionEntry {
                    session: DraftSession::new(
                        TeamDraftState::new(config.teams.blue.name.clone(), blue_players),
                        TeamDraftState::new(config.teams.red.name.clone(), red_players),
                    ),
                    fault: None,
                }
            })
    }

    // -----------------------------------------------------------------
    // Request dispatch
    // -----------------------------------------------------------------

    /// Parse and handle one raw client message.
    pub fn handle_message(&mut self, raw: &str) -> ServerMessage {
        match serde_json::from_str::<ClientRequest>(raw) {
            Ok(request) => self.handle_request(request),
            Err(e) => {
                warn!("unparseable client message: {e}");
                ServerMessage::Error {
                    session_id: String::new(),
                    kind: ErrorKind::BadRequest,
                    message: format!("could not parse request: {e}"),
                }
            }
        }
    }

    /// Handle one validated client request.
    pub fn handle_request(&mut self, request: ClientRequest) -> ServerMessage {
        let session_id = request.session_id().to_string();

        // A desynced session refuses everything but reset.
        if !matches!(request, ClientRequest::ResetDraft { .. }) {
            if let Some(fault) = self
                .sessions
                .get(&session_id)
                .and_then(|e| e.fault.clone())
            {
                return ServerMessage::Error {
                    session_id,
                    kind: ErrorKind::SequenceDesync,
                    message: format!("session invalidated ({fault}); reset required"),
                };
            }
        }

        match request {
            ClientRequest::ApplyAction {
                session_id,
                champion_id,
            } => self.apply_action(&session_id, &champion_id),
            ClientRequest::UndoAction { session_id } => self.undo_action(&session_id),
            ClientRequest::ResetDraft { session_id } => self.reset_draft(&session_id),
            ClientRequest::GetRecommendations { session_id } => {
                self.get_recommendations(&session_id)
            }
            ClientRequest::GetCompositionAnalysis { session_id } => {
                self.get_composition_analysis(&session_id)
            }
        }
    }

    // -----------------------------------------------------------------
    // Operations
    // -----------------------------------------------------------------

    /// Apply the current step with a champion, returning the new state.
    pub fn apply_action(&mut self, session_id: &str, champion_id: &str) -> ServerMessage {
        if !self.catalog.contains(champion_id) {
            return ServerMessage::Error {
                session_id: session_id.to_string(),
                kind: ErrorKind::InvalidAction,
                message: format!("unknown champion `{champion_id}`"),
            };
        }

        let entry = Self::entry(&mut self.sessions, &self.config, session_id);
        match entry.session.apply(champion_id) {
            Ok(_) => {
                let is_complete = entry.session.is_complete();
                let state = StateSnapshot::from_session(&entry.session);
                debug!(
                    "session '{}': applied {} at step {}",
                    session_id,
                    champion_id,
                    state.cursor - 1
                );
                if is_complete && self.config.llm.auto_review {
                    self.start_narrative(session_id);
                }
                ServerMessage::StateUpdate {
                    session_id: session_id.to_string(),
                    state,
                    is_complete,
                }
            }
            Err(err) => {
                if err.is_fatal() {
                    error!("session '{}' desynced: {err}", session_id);
                    entry.fault = Some(err.to_string());
                }
                ServerMessage::Error {
                    session_id: session_id.to_string(),
                    kind: ErrorKind::from_draft_error(&err),
                    message: err.to_string(),
                }
            }
        }
    }

    /// Undo the latest action. A no-op (still answering with the current
    /// state) when there is nothing to undo.
    pub fn undo_action(&mut self, session_id: &str) -> ServerMessage {
        let entry = Self::entry(&mut self.sessions, &self.config, session_id);
        match entry.session.undo() {
            Some(action) => {
                debug!(
                    "session '{}': undid {} from step {}",
                    session_id, action.champion_id, action.step_index
                );
            }
            None => debug!("session '{}': undo with empty log, no-op", session_id),
        }
        let state = StateSnapshot::from_session(&entry.session);
        let is_complete = entry.session.is_complete();
        ServerMessage::StateUpdate {
            session_id: session_id.to_string(),
            state,
            is_complete,
        }
    }

    /// Reset the session to step 0. Clears any desync fault and discards a
    /// narrative belonging to the old draft.
    pub fn reset_draft(&mut self, session_id: &str) -> ServerMessage {
        let entry = Self::entry(&mut self.sessions, &self.config, session_id);
        entry.session.reset();
        entry.fault = None;
        let state = StateSnapshot::from_session(&entry.session);

        if self.narrative_session.as_deref() == Some(session_id) {
            self.cancel_narrative();
        }
        info!("session '{}' reset", session_id);

        ServerMessage::StateUpdate {
            session_id: session_id.to_string(),
            state,
            is_complete: false,
        }
    }

    /// Recompute recommendations from the session's current state. Never
    /// serves scores older than the last applied action.
    pub fn get_recommendations(&mut self, session_id: &str) -> ServerMessage {
        let entry = Self::entry(&mut self.sessions, &self.config, session_id);
        let report = recommend(
            &entry.session,
            &self.catalog,
            &self.knowledge,
            &self.pools,
            &self.config.engine,
        );
        let composition_summary = CompositionSummary {
            blue: analyze_team(&entry.session.blue, &self.catalog, &self.knowledge),
            red: analyze_team(&entry.session.red, &self.catalog, &self.knowledge),
        };
        let analysis_text = if self.narrative_session.as_deref() == Some(session_id) {
            self.narrative_text.clone()
        } else {
            String::new()
        };

        ServerMessage::Recommendations {
            session_id: session_id.to_string(),
            recommendations: report.recommendations,
            warnings: report.warnings,
            analysis_text,
            composition_summary,
        }
    }

    /// Per-team composition analysis; a side is absent until it has a pick.
    pub fn get_composition_analysis(&mut self, session_id: &str) -> ServerMessage {
        let entry = Self::entry(&mut self.sessions, &self.config, session_id);
        ServerMessage::CompositionAnalysis {
            session_id: session_id.to_string(),
            blue: analyze_team(&entry.session.blue, &self.catalog, &self.knowledge),
            red: analyze_team(&entry.session.red, &self.catalog, &self.knowledge),
        }
    }

    // -----------------------------------------------------------------
    // Narrative orchestration
    // -----------------------------------------------------------------

    /// Kick off a streaming draft review for a completed session, replacing
    /// any narrative task still in flight.
    fn start_narrative(&mut self, session_id: &str) {
        self.cancel_narrative();
        self.llm_generation += 1;
        let generation = self.llm_generation;
        self.narrative_session = Some(session_id.to_string());

        let Some(entry) = self.sessions.get(session_id) else {
            return;
        };
        let blue = analyze_team(&entry.session.blue, &self.catalog, &self.knowledge);
        let red = analyze_team(&entry.session.red, &self.catalog, &self.knowledge);
        let user_prompt = prompt::build_draft_review_prompt(
            &entry.session,
            blue.as_ref(),
            red.as_ref(),
            &self.catalog,
        );
        let system = prompt::system_prompt();
        let max_tokens = self.config.llm.max_tokens;
        let client = Arc::clone(&self.llm_client);
        let tx = self.llm_tx.clone();

        info!(
            "session '{}': starting draft review (generation {})",
            session_id, generation
        );
        self.current_llm_task = Some(tokio::spawn(async move {
            if let Err(e) = client
                .stream_message(&system, &user_prompt, max_tokens, tx, generation)
                .await
            {
                warn!("narrative stream failed: {e}");
            }
        }));
    }

    /// Abort any in-flight narrative task and clear its output. Bumping the
    /// generation makes late events from the old task unmatchable.
    fn cancel_narrative(&mut self) {
        if let Some(task) = self.current_llm_task.take() {
            task.abort();
        }
        self.llm_generation += 1;
        self.narrative_text.clear();
        self.narrative_session = None;
    }

    /// Fold a streaming event into narrative state, returning the message
    /// to push to the client. Stale-generation events return `None`.
    pub fn handle_llm_event(&mut self, event: LlmEvent) -> Option<ServerMessage> {
        if event.generation() != self.llm_generation {
            debug!(
                "discarding stale LLM event (generation {} != {})",
                event.generation(),
                self.llm_generation
            );
            return None;
        }
        let session_id = self.narrative_session.clone()?;

        match event {
            LlmEvent::Token { text, .. } => {
                self.narrative_text.push_str(&text);
                Some(ServerMessage::NarrativeToken { session_id, text })
            }
            LlmEvent::Complete {
                full_text,
                input_tokens,
                output_tokens,
                ..
            } => {
                info!(
                    "draft review complete ({} in / {} out tokens)",
                    input_tokens, output_tokens
                );
                self.narrative_text = full_text;
                self.current_llm_task = None;
                Some(ServerMessage::NarrativeComplete { session_id })
            }
            LlmEvent::Error { message, .. } => {
                warn!("draft review failed: {message}");
                self.current_llm_task = None;
                Some(ServerMessage::NarrativeError {
                    session_id,
                    message,
                })
            }
        }
    }

    // -----------------------------------------------------------------
    // Outbound
    // -----------------------------------------------------------------

    async fn send(&mut self, message: ServerMessage) {
        let Some(reply) = self.reply.clone() else {
            debug!("no client connected, dropping outbound message");
            return;
        };
        match serde_json::to_string(&message) {
            Ok(json) => {
                if reply.send(json).await.is_err() {
                    warn!("client reply channel closed");
                    self.reply = None;
                }
            }
            Err(e) => error!("failed to serialize server message: {e}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Event loop
// ---------------------------------------------------------------------------

/// Run the application loop until both input channels close.
pub async fn run(
    mut ws_rx: mpsc::Receiver<WsEvent>,
    mut llm_rx: mpsc::Receiver<LlmEvent>,
    mut state: AppState,
) -> anyhow::Result<()> {
    loop {
        tokio::select! {
            ws_event = ws_rx.recv() => match ws_event {
                Some(WsEvent::Connected { addr, reply }) => {
                    info!("client connected from {addr}");
                    state.reply = Some(reply);
                }
                Some(WsEvent::Disconnected) => {
                    info!("client disconnected");
                    state.reply = None;
                }
                Some(WsEvent::Message(raw)) => {
                    let response = state.handle_message(&raw);
                    state.send(response).await;
                }
                None => {
                    info!("WebSocket channel closed, shutting down app loop");
                    break;
                }
            },
            llm_event = llm_rx.recv() => match llm_event {
                Some(event) => {
                    if let Some(message) = state.handle_llm_event(event) {
                        state.send(message).await;
                    }
                }
                None => {
                    info!("LLM channel closed, shutting down app loop");
                    break;
                }
            },
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{
        CredentialsConfig, DataPaths, EngineConfig, LlmConfig, PlayerEntry, TeamSection,
        TeamsConfig,
    };
    use crate::data::champions::{Champion, DamageType, ROLE_ORDER};

    fn players(prefix: &str) -> Vec<PlayerEntry> {
        ROLE_ORDER
            .iter()
            .map(|role| PlayerEntry {
                id: format!("{prefix}_{}", role.display_str().to_lowercase()),
                name: format!("{prefix}-{}", role.display_str()),
                role: role.display_str().to_string(),
            })
            .collect()
    }

    fn test_config() -> Config {
        Config {
            teams: TeamsConfig {
                blue: TeamSection {
                    name: "Blue".into(),
                    players: players("blue"),
                },
                red: TeamSection {
                    name: "Red".into(),
                    players: players("red"),
                },
            },
            engine: EngineConfig::default(),
            credentials: CredentialsConfig::default(),
            ws_port: 0,
            llm: LlmConfig {
                model: "test-model".into(),
                max_tokens: 256,
                auto_review: false,
            },
            data_paths: DataPaths {
                champions: String::new(),
                matchups: String::new(),
                synergies: String::new(),
                meta: String::new(),
                traits: String::new(),
                pools: String::new(),
            },
        }
    }

    /// 25 champions, five per role, so a full 20-action draft always has
    /// candidates left over.
    fn test_catalog() -> ChampionCatalog {
        let mut champions = Vec::new();
        for role in ROLE_ORDER {
            for i in 0..5 {
                let id = format!("{}{}", role.display_str().to_lowercase(), i);
                champions.push(Champion {
                    id: id.clone(),
                    name: id.to_uppercase(),
                    roles: vec![role],
                    damage_type: Some(if i % 2 == 0 {
                        DamageType::Ad
                    } else {
                        DamageType::Ap
                    }),
                });
            }
        }
        ChampionCatalog::from_champions(champions)
    }

    fn test_state() -> AppState {
        let (llm_tx, _llm_rx) = mpsc::channel(16);
        AppState::new(
            test_config(),
            Arc::new(test_catalog()),
            Arc::new(KnowledgeBase::new()),
            Arc::new(PlayerPools::new()),
            LlmClient::Disabled,
            llm_tx,
        )
    }

    fn apply(state: &mut AppState, sid: &str, champion: &str) -> ServerMessage {
        state.handle_request(ClientRequest::ApplyAction {
            session_id: sid.into(),
            champion_id: champion.into(),
        })
    }

    #[test]
    fn apply_returns_state_update() {
        let mut state = test_state();
        let msg = apply(&mut state, "s1", "top0");
        match msg {
            ServerMessage::StateUpdate {
                session_id,
                state,
                is_complete,
            } => {
                assert_eq!(session_id, "s1");
                assert!(!is_complete);
                assert_eq!(state.cursor, 1);
                assert_eq!(state.blue.bans[0].as_deref(), Some("top0"));
            }
            other => panic!("expected StateUpdate, got {other:?}"),
        }
    }

    #[test]
    fn unknown_champion_rejected() {
        let mut state = test_state();
        let msg = apply(&mut state, "s1", "not_a_champion");
        match msg {
            ServerMessage::Error { kind, message, .. } => {
                assert_eq!(kind, ErrorKind::InvalidAction);
                assert!(message.contains("unknown champion"));
            }
            other => panic!("expected Error, got {other:?}"),
        }
    }

    #[test]
    fn duplicate_champion_rejected_and_state_unchanged() {
        let mut state = test_state();
        apply(&mut state, "s1", "top0");
        let msg = apply(&mut state, "s1", "top0");
        assert!(matches!(
            msg,
            ServerMessage::Error {
                kind: ErrorKind::InvalidAction,
                ..
            }
        ));
        // Cursor did not advance.
        let msg = state.handle_request(ClientRequest::UndoAction {
            session_id: "s1".into(),
        });
        match msg {
            ServerMessage::StateUpdate { state, .. } => assert_eq!(state.cursor, 0),
            other => panic!("expected StateUpdate, got {other:?}"),
        }
    }

    #[test]
    fn undo_on_fresh_session_is_noop() {
        let mut state = test_state();
        let msg = state.handle_request(ClientRequest::UndoAction {
            session_id: "s1".into(),
        });
        match msg {
            ServerMessage::StateUpdate {
                state, is_complete, ..
            } => {
                assert_eq!(state.cursor, 0);
                assert!(!is_complete);
            }
            other => panic!("expected StateUpdate, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn full_draft_completes_and_21st_apply_fails() {
        let mut state = test_state();
        // Four of the five champions per role cover all 20 steps and leave
        // the fifth available for the failing 21st apply.
        let ids: Vec<String> = (0..4)
            .flat_map(|i| {
                ["top", "jgl", "mid", "adc", "sup"]
                    .into_iter()
                    .map(move |role| format!("{role}{i}"))
            })
            .collect();

        let mut last_complete = false;
        for id in &ids {
            match apply(&mut state, "s1", id) {
                ServerMessage::StateUpdate { is_complete, .. } => last_complete = is_complete,
                other => panic!("apply({id}) failed: {other:?}"),
            }
        }
        assert!(last_complete);

        let msg = apply(&mut state, "s1", "sup4");
        assert!(matches!(
            msg,
            ServerMessage::Error {
                kind: ErrorKind::InvalidAction,
                ..
            }
        ));
    }

    #[test]
    fn recommendations_reflect_latest_state() {
        let mut state = test_state();
        let msg = state.handle_request(ClientRequest::GetRecommendations {
            session_id: "s1".into(),
        });
        let first_ids: Vec<String> = match msg {
            ServerMessage::Recommendations {
                recommendations, ..
            } => recommendations
                .iter()
                .map(|r| r.champion_id.clone())
                .collect(),
            other => panic!("expected Recommendations, got {other:?}"),
        };
        assert!(!first_ids.is_empty());

        // Ban the top suggestion; it must disappear from the next call.
        let banned = first_ids[0].clone();
        apply(&mut state, "s1", &banned);
        let msg = state.handle_request(ClientRequest::GetRecommendations {
            session_id: "s1".into(),
        });
        match msg {
            ServerMessage::Recommendations {
                recommendations, ..
            } => {
                assert!(recommendations.iter().all(|r| r.champion_id != banned));
            }
            other => panic!("expected Recommendations, got {other:?}"),
        }
    }

    #[test]
    fn composition_analysis_needs_a_pick() {
        let mut state = test_state();
        let msg = state.handle_request(ClientRequest::GetCompositionAnalysis {
            session_id: "s1".into(),
        });
        match msg {
            ServerMessage::CompositionAnalysis { blue, red, .. } => {
                assert!(blue.is_none());
                assert!(red.is_none());
            }
            other => panic!("expected CompositionAnalysis, got {other:?}"),
        }

        // Run through the bans, then blue's first pick.
        for id in ["top1", "top2", "jgl1", "jgl2", "mid1", "mid2"] {
            apply(&mut state, "s1", id);
        }
        apply(&mut state, "s1", "top0");
        let msg = state.handle_request(ClientRequest::GetCompositionAnalysis {
            session_id: "s1".into(),
        });
        match msg {
            ServerMessage::CompositionAnalysis { blue, red, .. } => {
                let blue = blue.expect("blue has a pick");
                assert_eq!(blue.picks_analyzed, 1);
                assert!(red.is_none());
            }
            other => panic!("expected CompositionAnalysis, got {other:?}"),
        }
    }

    #[test]
    fn sessions_are_isolated() {
        let mut state = test_state();
        apply(&mut state, "s1", "top0");
        // The same champion is free in a different session.
        let msg = apply(&mut state, "s2", "top0");
        assert!(matches!(msg, ServerMessage::StateUpdate { .. }));
    }

    #[test]
    fn reset_clears_session() {
        let mut state = test_state();
        apply(&mut state, "s1", "top0");
        apply(&mut state, "s1", "top1");
        let msg = state.handle_request(ClientRequest::ResetDraft {
            session_id: "s1".into(),
        });
        match msg {
            ServerMessage::StateUpdate {
                state, is_complete, ..
            } => {
                assert_eq!(state.cursor, 0);
                assert!(!is_complete);
                assert!(state.blue.bans.iter().all(|b| b.is_none()));
            }
            other => panic!("expected StateUpdate, got {other:?}"),
        }
    }

    #[test]
    fn malformed_message_yields_bad_request() {
        let mut state = test_state();
        let msg = state.handle_message("{\"type\":\"nonsense\"");
        assert!(matches!(
            msg,
            ServerMessage::Error {
                kind: ErrorKind::BadRequest,
                ..
            }
        ));
    }

    #[test]
    fn stale_llm_events_discarded() {
        let mut state = test_state();
        state.llm_generation = 5;
        state.narrative_session = Some("s1".into());
        let stale = LlmEvent::Token {
            text: "old".into(),
            generation: 4,
        };
        assert!(state.handle_llm_event(stale).is_none());

        let current = LlmEvent::Token {
            text: "fresh".into(),
            generation: 5,
        };
        match state.handle_llm_event(current) {
            Some(ServerMessage::NarrativeToken { text, .. }) => assert_eq!(text, "fresh"),
            other => panic!("expected NarrativeToken, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn completed_draft_with_auto_review_starts_narrative() {
        let mut state = test_state();
        state.config.llm.auto_review = true;

        let ids: Vec<String> = (0..4)
            .flat_map(|i| {
                ["top", "jgl", "mid", "adc", "sup"]
                    .into_iter()
                    .map(move |role| format!("{role}{i}"))
            })
            .collect();
        for id in &ids {
            apply(&mut state, "s1", id);
        }

        assert!(state.current_llm_task.is_some());
        assert_eq!(state.narrative_session.as_deref(), Some("s1"));

        // The disabled client reports an error event for this generation.
        let generation = state.llm_generation;
        let msg = state.handle_llm_event(LlmEvent::Error {
            message: "Narrative generation not configured".into(),
            generation,
        });
        assert!(matches!(
            msg,
            Some(ServerMessage::NarrativeError { .. })
        ));
    }

    #[test]
    fn narrative_text_surfaces_in_recommendations() {
        let mut state = test_state();
        state.narrative_session = Some("s1".into());
        state.narrative_text = "Blue drafted for late game.".into();

        let msg = state.handle_request(ClientRequest::GetRecommendations {
            session_id: "s1".into(),
        });
        match msg {
            ServerMessage::Recommendations { analysis_text, .. } => {
                assert_eq!(analysis_text, "Blue drafted for late game.");
            }
            other => panic!("expected Recommendations, got {other:?}"),
        }

        // Another session sees no narrative.
        let msg = state.handle_request(ClientRequest::GetRecommendations {
            session_id: "s2".into(),
        });
        match msg {
            ServerMessage::Recommendations { analysis_text, .. } => {
                assert!(analysis_text.is_empty());
            }
            other => panic!("expected Recommendations, got {other:?}"),
        }
    }
}
