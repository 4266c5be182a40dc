// Prompt templates for the post-draft narrative.
//
// Constructs a compact, structured prompt from the finished draft so the
// model narrates trade-offs and win conditions instead of recomputing
// numbers the engine already produced.

use crate::data::champions::ChampionCatalog;
use crate::draft::sequence::ActionType;
use crate::draft::state::{DraftSession, TeamDraftState};
use crate::engine::composition::CompositionAnalysis;

// ---------------------------------------------------------------------------
// System prompt
// ---------------------------------------------------------------------------

/// Return the static system prompt for draft review calls.
pub fn system_prompt() -> String {
    "You are a League of Legends draft analyst reviewing a completed professional-style pick/ban phase.\n\
     \n\
     You will receive both teams' final rosters, their ban history, and pre-computed composition \
     analysis (damage split, power spikes, archetype, strengths, weaknesses).\n\
     \n\
     Provide:\n\
     1. READ: The strategic identity each side drafted toward\n\
     2. WIN CONDITIONS: How each team wins the game from this draft\n\
     3. SWING PICKS: The one or two picks or bans that most shaped the draft\n\
     4. EDGE: Which side you favor on paper and why\n\
     \n\
     Be concise and direct. Use the pre-computed numbers provided, do NOT recompute percentages. \
     Focus on interactions and timing the numbers don't capture."
        .to_string()
}

// ---------------------------------------------------------------------------
// Draft review prompt
// ---------------------------------------------------------------------------

/// Build the user prompt for reviewing a finished (or abandoned) draft.
///
/// Includes the full action order, both rosters with player assignments,
/// and each side's composition analysis when available.
pub fn build_draft_review_prompt(
    session: &DraftSession,
    blue_analysis: Option<&CompositionAnalysis>,
    red_analysis: Option<&CompositionAnalysis>,
    catalog: &ChampionCatalog,
) -> String {
    let mut prompt = String::with_capacity(2048);

    prompt.push_str("## DRAFT ORDER\n");
    for action in session.actions() {
        prompt.push_str(&format!(
            "{:2}. {} {}: {}\n",
            action.step_index + 1,
            session.team(action.side).team_name,
            match action.action {
                ActionType::Ban => "bans",
                ActionType::Pick => "picks",
            },
            catalog.name_of(&action.champion_id),
        ));
    }
    prompt.push('\n');

    format_team(&mut prompt, &session.blue, blue_analysis, catalog);
    format_team(&mut prompt, &session.red, red_analysis, catalog);

    prompt
}

fn format_team(
    prompt: &mut String,
    team: &TeamDraftState,
    analysis: Option<&CompositionAnalysis>,
    catalog: &ChampionCatalog,
) {
    prompt.push_str(&format!("## {}\n", team.team_name.to_uppercase()));

    prompt.push_str("Roster: ");
    let mut entries = Vec::new();
    for (slot, pick) in team.picks.iter().enumerate() {
        let champion = pick
            .as_deref()
            .map(|id| catalog.name_of(id).to_string())
            .unwrap_or_else(|| "(open)".to_string());
        match team.player_at(slot) {
            Some(player) => entries.push(format!(
                "{} {} on {}",
                player.role.display_str(),
                player.name,
                champion
            )),
            None => entries.push(champion),
        }
    }
    prompt.push_str(&entries.join(" | "));
    prompt.push('\n');

    let bans: Vec<&str> = team
        .committed_bans()
        .map(|id| catalog.name_of(id))
        .collect();
    prompt.push_str(&format!("Bans: {}\n", bans.join(", ")));

    if let Some(a) = analysis {
        prompt.push_str(&format!(
            "Archetype: {} | Damage: {}% AP / {}% AD / {}% true\n",
            a.archetype.display_str(),
            a.damage.ap,
            a.damage.ad,
            a.damage.true_dmg,
        ));
        if !a.spikes.is_empty() {
            let windows: Vec<&str> = a.spikes.iter().map(|s| s.display_str()).collect();
            prompt.push_str(&format!("Power spikes: {}\n", windows.join(", ")));
        }
        if !a.strengths.is_empty() {
            prompt.push_str(&format!("Strengths: {}\n", a.strengths.join("; ")));
        }
        if !a.weaknesses.is_empty() {
            prompt.push_str(&format!("Weaknesses: {}\n", a.weaknesses.join("; ")));
        }
    } else {
        prompt.push_str("No composition analysis available.\n");
    }
    prompt.push('\n');
}
