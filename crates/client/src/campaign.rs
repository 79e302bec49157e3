//! Demo campaign: an overworld of battles fought AI against AI.
use anyhow::{Result, bail};
use tracing::{info, warn};

use tactics_content::units;
use tactics_core::{
    BattleDescriptor, DialogTrigger, Outcome, Phase, Position, Side, TerrainTable, TileCode,
};
use tactics_runtime::{BattleSession, GameContext, Overworld, OverworldNode, PresentationPort};

use crate::config::SimConfig;
use crate::presentation::LogPresentation;

/// Upper bound on AI decisions per battle before the run is declared stuck.
const STEP_BUDGET: usize = 10_000;

/// Result of one fought battle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BattleRecord {
    pub node: String,
    pub outcome: Outcome,
    pub turns: u32,
}

/// Overworld used by the simulator.
///
/// ```text
/// camp ── ford ── keep
///    └─── marsh
/// ```
pub fn demo_world() -> Result<Overworld> {
    let mut world = Overworld::new(OverworldNode::new("camp", "Camp"))
        .with_node(OverworldNode::new("ford", "River Ford").with_battle(ford()))
        .with_node(OverworldNode::new("marsh", "Marsh").with_battle(marsh()))
        .with_node(OverworldNode::new("keep", "Old Keep").with_battle(keep()));
    world.link("camp", "ford")?;
    world.link("camp", "marsh")?;
    world.link("ford", "keep")?;
    Ok(world)
}

/// Recruits the starting party into `ctx`.
pub fn recruit_party(ctx: &mut GameContext) {
    for key in [units::MELEE, units::RANGED, units::HEALER, units::BUILDER] {
        ctx.recruit(key);
    }
}

/// Fights every reachable battle until the world is cleared or a battle
/// is lost.
pub fn run(ctx: &mut GameContext, world: &Overworld, sim: &SimConfig) -> Result<Vec<BattleRecord>> {
    world.complete(world.start(), ctx.flags_mut())?;

    let mut records = Vec::new();
    while let Some(node) = next_battle(world, ctx) {
        let mut descriptor = world.enter(&node, ctx.flags())?.clone();
        descriptor.limits.max_turns = Some(
            descriptor
                .limits
                .max_turns
                .map_or(sim.max_turns, |turns| turns.min(sim.max_turns)),
        );

        info!(node = %node, "entering battle");
        let session = ctx
            .begin_battle(&descriptor, LogPresentation::default())?
            .with_seed(sim.seed);
        let (outcome, turns) = play(session)?;

        ctx.record_outcome(&node, outcome);
        records.push(BattleRecord {
            node: node.clone(),
            outcome,
            turns,
        });

        if outcome == Outcome::Defeat {
            warn!(node = %node, "campaign lost");
            break;
        }
        world.complete(&node, ctx.flags_mut())?;
    }
    Ok(records)
}

fn next_battle(world: &Overworld, ctx: &GameContext) -> Option<String> {
    world.reachable(ctx.flags()).into_iter().find(|id| {
        !world.is_completed(id, ctx.flags())
            && world.node(id).is_some_and(|node| node.battle.is_some())
    })
}

/// Runs a battle with both teams on the AI.
pub fn play<P: PresentationPort>(mut session: BattleSession<P>) -> Result<(Outcome, u32)> {
    let player = session.state().player_team();
    session.set_auto_control(player, true);
    session.start()?;

    for _ in 0..STEP_BUDGET {
        if let Some(outcome) = session.outcome() {
            return Ok((outcome, session.turn()));
        }
        if session.is_busy() {
            session.acknowledge();
            continue;
        }
        if session.step().is_none() && session.outcome().is_none() {
            bail!("battle stalled in {} on turn {}", session.phase(), session.turn());
        }
    }
    bail!("battle exceeded {STEP_BUDGET} steps")
}

fn rocks(width: u32, height: u32, cells: &[Position]) -> Vec<Vec<TileCode>> {
    let rock = TileCode::new(TerrainTable::GROUND_FLOOR, TerrainTable::DECORATION_ROCK);
    (0..height as i32)
        .map(|y| {
            (0..width as i32)
                .map(|x| {
                    if cells.contains(&Position::new(x, y)) {
                        rock
                    } else {
                        TileCode::OPEN
                    }
                })
                .collect()
        })
        .collect()
}

fn ford() -> BattleDescriptor {
    BattleDescriptor {
        terrain: rocks(9, 7, &[Position::new(4, 0), Position::new(4, 1), Position::new(4, 5)]),
        deploy_cells: (1..6).map(|y| Position::new(0, y)).collect(),
        max_deploy: Some(3),
        dialogs: vec![DialogTrigger {
            turn: 1,
            phase: Phase::Player,
            message: "Cross before the bandits regroup.".to_string(),
        }],
        ..BattleDescriptor::new(9, 7)
            .with_spawn(units::MELEE, Position::new(7, 2), Side::Enemy, 1)
            .with_spawn(units::BASE, Position::new(7, 4), Side::Enemy, 1)
            .with_spawn(units::RANGED, Position::new(8, 3), Side::Enemy, 2)
    }
}

fn marsh() -> BattleDescriptor {
    BattleDescriptor {
        deploy_cells: vec![Position::new(0, 0), Position::new(1, 0), Position::new(0, 1)],
        ..BattleDescriptor::new(6, 6)
            .with_spawn(units::SCOUT, Position::new(5, 5), Side::Enemy, 1)
            .with_spawn(units::BASE, Position::new(4, 5), Side::Enemy, 1)
    }
}

fn keep() -> BattleDescriptor {
    BattleDescriptor {
        terrain: rocks(10, 8, &[Position::new(5, 3), Position::new(5, 4)]),
        deploy_cells: (0..8).map(|y| Position::new(0, y)).collect(),
        dialogs: vec![DialogTrigger {
            turn: 3,
            phase: Phase::Enemy,
            message: "The gate opens.".to_string(),
        }],
        ..BattleDescriptor::new(10, 8)
            .with_spawn(units::BRUTE, Position::new(7, 3), Side::Enemy, 1)
            .with_spawn(units::HEALER, Position::new(9, 1), Side::Enemy, 1)
            .with_spawn(units::BUILDER, Position::new(9, 6), Side::Enemy, 1)
            .with_spawn(units::MELEE, Position::new(9, 4), Side::Enemy, 3)
    }
}
