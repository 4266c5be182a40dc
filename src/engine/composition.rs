// Team composition analysis: damage profile, power-spike windows, archetype
// classification, and templated strengths/weaknesses.
//
// Pure derivation over a team's committed picks. Recomputed on demand, never
// incrementally maintained; partial analysis is valid from the first pick.

use serde::{Deserialize, Serialize};

use crate::data::champions::{ChampionCatalog, DamageType};
use crate::data::knowledge::{KnowledgeBase, SpikeWindow};
use crate::draft::state::TeamDraftState;

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// Percentage split of the team's committed damage. Always sums to 100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DamageProfile {
    pub ap: u32,
    pub ad: u32,
    pub true_dmg: u32,
}

impl DamageProfile {
    pub fn total(&self) -> u32 {
        self.ap + self.ad + self.true_dmg
    }
}

/// Strategic identity of a five-champion composition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Archetype {
    Teamfight,
    Poke,
    Pick,
    Splitpush,
    Balanced,
}

impl Archetype {
    pub fn display_str(&self) -> &'static str {
        match self {
            Archetype::Teamfight => "Teamfight",
            Archetype::Poke => "Poke",
            Archetype::Pick => "Pick",
            Archetype::Splitpush => "Splitpush",
            Archetype::Balanced => "Balanced",
        }
    }
}

/// The full derived analysis for one team.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositionAnalysis {
    pub team_name: String,
    /// Number of committed picks the analysis covers (1..=5).
    pub picks_analyzed: usize,
    pub archetype: Archetype,
    pub damage: DamageProfile,
    /// Windows where at least two champions spike together, in game order.
    pub spikes: Vec<SpikeWindow>,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    /// Champion names carrying engage tools.
    pub engage_tools: Vec<String>,
    /// Champion names carrying disengage tools.
    pub disengage_tools: Vec<String>,
}

// ---------------------------------------------------------------------------
// Damage profile
// ---------------------------------------------------------------------------

/// Bucketing rule: an AD/AP/true champion contributes its whole pick to its
/// bucket; a mixed-damage champion (or one with no damage data) splits
/// evenly between AP and AD. Rounding is largest-remainder so the three
/// percentages always sum to exactly 100.
fn damage_profile<'a>(
    picks: impl Iterator<Item = &'a String>,
    catalog: &ChampionCatalog,
) -> (DamageProfile, usize) {
    let mut shares = [0.0f64; 3]; // ap, ad, true
    let mut count = 0usize;
    for id in picks {
        count += 1;
        match catalog.get(id).and_then(|c| c.damage_type) {
            Some(DamageType::Ap) => shares[0] += 1.0,
            Some(DamageType::Ad) => shares[1] += 1.0,
            Some(DamageType::True) => shares[2] += 1.0,
            Some(DamageType::Mixed) | None => {
                shares[0] += 0.5;
                shares[1] += 0.5;
            }
        }
    }
    if count == 0 {
        return (
            DamageProfile {
                ap: 0,
                ad: 0,
                true_dmg: 0,
            },
            0,
        );
    }

    let exact: Vec<f64> = shares.iter().map(|s| s / count as f64 * 100.0).collect();
    let mut floors: Vec<u32> = exact.iter().map(|p| p.floor() as u32).collect();
    let mut leftover = 100 - floors.iter().sum::<u32>();

    // Hand out the remaining points by largest fractional remainder;
    // index order (AP, AD, true) breaks exact ties.
    let mut order: Vec<usize> = (0..3).collect();
    order.sort_by(|&a, &b| {
        let ra = exact[a] - exact[a].floor();
        let rb = exact[b] - exact[b].floor();
        rb.total_cmp(&ra).then(a.cmp(&b))
    });
    for &i in &order {
        if leftover == 0 {
            break;
        }
        floors[i] += 1;
        leftover -= 1;
    }

    (
        DamageProfile {
            ap: floors[0],
            ad: floors[1],
            true_dmg: floors[2],
        },
        count,
    )
}

// ---------------------------------------------------------------------------
// Archetype classification
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
struct ToolCounts {
    engage: usize,
    disengage: usize,
    poke: usize,
    pick: usize,
    splitpush: usize,
}

/// Rule order is a tie-break policy, not just a heuristic; first match wins:
/// 1. three or more engage tools        -> Teamfight
/// 2. poke >= 2 with at most one engage -> Poke
/// 3. pick threats >= 2                 -> Pick
/// 4. splitpushers >= 2                 -> Splitpush
/// 5. engage >= 2                       -> Teamfight
/// 6. otherwise                         -> Balanced
fn classify_archetype(tools: &ToolCounts) -> Archetype {
    if tools.engage >= 3 {
        Archetype::Teamfight
    } else if tools.poke >= 2 && tools.engage <= 1 {
        Archetype::Poke
    } else if tools.pick >= 2 {
        Archetype::Pick
    } else if tools.splitpush >= 2 {
        Archetype::Splitpush
    } else if tools.engage >= 2 {
        Archetype::Teamfight
    } else {
        Archetype::Balanced
    }
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

/// Analyze one team's committed picks. Returns `None` until the team has at
/// least one pick; never mutates anything.
pub fn analyze_team(
    team: &TeamDraftState,
    catalog: &ChampionCatalog,
    knowledge: &KnowledgeBase,
) -> Option<CompositionAnalysis> {
    let (damage, picks_analyzed) = damage_profile(team.committed_picks(), catalog);
    if picks_analyzed == 0 {
        return None;
    }

    let mut tools = ToolCounts::default();
    let mut engage_tools = Vec::new();
    let mut disengage_tools = Vec::new();
    let mut spike_counts = [0usize; 3]; // early, mid, late

    for id in team.committed_picks() {
        let name = catalog.name_of(id).to_string();
        let Some(traits) = knowledge.traits(id) else {
            continue;
        };
        if traits.engage {
            tools.engage += 1;
            engage_tools.push(name.clone());
        }
        if traits.disengage {
            tools.disengage += 1;
            disengage_tools.push(name.clone());
        }
        if traits.poke {
            tools.poke += 1;
        }
        if traits.pick {
            tools.pick += 1;
        }
        if traits.splitpush {
            tools.splitpush += 1;
        }
        for spike in &traits.spikes {
            match spike {
                SpikeWindow::Early => spike_counts[0] += 1,
                SpikeWindow::Mid => spike_counts[1] += 1,
                SpikeWindow::Late => spike_counts[2] += 1,
            }
        }
    }

    // A team exhibits a spike window when at least two champions share it.
    let mut spikes = Vec::new();
    for (i, window) in [SpikeWindow::Early, SpikeWindow::Mid, SpikeWindow::Late]
        .iter()
        .enumerate()
    {
        if spike_counts[i] >= 2 {
            spikes.push(*window);
        }
    }

    let archetype = classify_archetype(&tools);
    let (strengths, weaknesses) =
        describe(&damage, &tools, &spikes, archetype, picks_analyzed);

    Some(CompositionAnalysis {
        team_name: team.team_name.clone(),
        picks_analyzed,
        archetype,
        damage,
        spikes,
        strengths,
        weaknesses,
        engage_tools,
        disengage_tools,
    })
}

// ---------------------------------------------------------------------------
// Strengths / weaknesses templating
// ---------------------------------------------------------------------------

fn describe(
    damage: &DamageProfile,
    tools: &ToolCounts,
    spikes: &[SpikeWindow],
    archetype: Archetype,
    picks_analyzed: usize,
) -> (Vec<String>, Vec<String>) {
    let mut strengths = Vec::new();
    let mut weaknesses = Vec::new();

    if tools.engage >= 2 {
        strengths.push(format!(
            "Multiple engage tools ({}) to start fights on demand",
            tools.engage
        ));
    } else if tools.engage == 0 {
        weaknesses.push("No frontline engage to start fights".to_string());
    }

    if tools.disengage >= 2 {
        strengths.push("Layered disengage against dive compositions".to_string());
    } else if tools.disengage == 0 && picks_analyzed >= 3 {
        weaknesses.push("No disengage if the enemy forces fights".to_string());
    }

    for spike in spikes {
        strengths.push(format!("Shared {}-game power spike", spike.display_str()));
    }
    if spikes.is_empty() && picks_analyzed >= 4 {
        weaknesses.push("No shared power-spike window to play around".to_string());
    }

    // Damage-balance judgments only make sense once a couple of picks are in.
    if picks_analyzed >= 2 {
        if damage.ap == 0 {
            weaknesses.push("No AP damage; full armor stacking shuts this team down".to_string());
        }
        if damage.ad == 0 {
            weaknesses.push("No AD damage; magic resist itemization is efficient against this team".to_string());
        }
        if damage.ap >= 25 && damage.ad >= 25 {
            strengths.push(format!(
                "Balanced damage profile ({}% AP / {}% AD)",
                damage.ap, damage.ad
            ));
        }
    }

    if archetype == Archetype::Splitpush && tools.engage == 0 {
        weaknesses.push("Splitpush identity with no engage to punish answers".to_string());
    }

    (strengths, weaknesses)
}
