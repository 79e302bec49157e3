use std::sync::Arc;

use tactics_content::{UnitRegistry, units};
use tactics_core::{
    BattleDescriptor, GameConfig, Outcome, Phase, Position, PresentationIntent, Side,
    TurnLimits,
};
use tactics_runtime::{
    BattleSession, GameContext, NullPresentation, Overworld, OverworldNode, PresentationPort,
    RecordingPresentation,
};

const STEP_LIMIT: usize = 5_000;

fn skirmish() -> BattleDescriptor {
    BattleDescriptor {
        limits: TurnLimits {
            max_turns: Some(15),
            ..TurnLimits::default()
        },
        ..BattleDescriptor::new(8, 8)
            .with_spawn(units::MELEE, Position::new(1, 2), Side::Ally, 1)
            .with_spawn(units::RANGED, Position::new(0, 4), Side::Ally, 1)
            .with_spawn(units::HEALER, Position::new(1, 5), Side::Ally, 1)
            .with_spawn(units::MELEE, Position::new(6, 3), Side::Enemy, 1)
            .with_spawn(units::SCOUT, Position::new(6, 5), Side::Enemy, 1)
            .with_spawn(units::BASE, Position::new(7, 1), Side::Enemy, 3)
    }
}

/// Runs both teams on the AI until the battle ends.
fn run<P: PresentationPort>(session: &mut BattleSession<P>) -> usize {
    let player = session.state().player_team();
    session.set_auto_control(player, true);
    session.start().expect("starts");

    let mut steps = 0;
    while session.outcome().is_none() && steps < STEP_LIMIT {
        if session.is_busy() {
            session.acknowledge();
            continue;
        }
        session.step();
        steps += 1;
    }
    steps
}

fn new_session(seed: u64) -> BattleSession<RecordingPresentation> {
    BattleSession::new(
        &skirmish(),
        Arc::new(UnitRegistry::standard()),
        GameConfig::default(),
        &[],
        RecordingPresentation::new().holding(),
    )
    .expect("valid descriptor")
    .with_seed(seed)
}

#[test]
fn ai_versus_ai_reaches_an_outcome() {
    let mut session = new_session(11);
    let steps = run(&mut session);
    assert!(steps < STEP_LIMIT, "battle did not finish");
    assert_eq!(session.phase(), Phase::End);
    assert!(!session.unsaved());
    assert!(session.state().turn <= 16);

    let intents = &session.port().intents;
    assert!(intents.iter().any(|i| matches!(i, PresentationIntent::Damage { .. })));
    assert!(intents.iter().any(|i| matches!(i, PresentationIntent::BattleEnded { .. })));
}

#[test]
fn same_seed_replays_the_same_battle() {
    let mut first = new_session(5);
    let mut second = new_session(5);
    run(&mut first);
    run(&mut second);
    assert_eq!(first.state(), second.state());
    assert_eq!(first.port().intents, second.port().intents);
}

#[test]
fn manual_team_waits_for_orders() {
    let mut session = BattleSession::new(
        &skirmish(),
        Arc::new(UnitRegistry::standard()),
        GameConfig::default(),
        &[],
        NullPresentation,
    )
    .expect("valid descriptor");
    session.start().expect("starts");
    assert!(session.step().is_none());
    assert!(session.end_turn());
    assert_eq!(session.phase(), Phase::Enemy);

    while session.phase() == Phase::Enemy {
        assert!(session.step().is_some());
    }
    assert!(session.step().is_none() || session.outcome().is_some());
}

#[test]
fn json_descriptor_feeds_the_engine_unchanged() {
    let json = r#"{
        "width": 5,
        "height": 5,
        "spawns": [
            { "at": { "x": 1, "y": 2 }, "turn": 1, "unit": "testmelee", "side": "Ally" },
            { "at": { "x": 3, "y": 2 }, "turn": 1, "unit": "no-such-unit", "side": "Enemy" }
        ],
        "limits": { "max_turns": 5, "default_victory": true },
        "dialogs": [ { "turn": 1, "phase": "Player", "message": "Hold the bridge" } ]
    }"#;
    let descriptor: BattleDescriptor = serde_json::from_str(json).expect("valid json");
    assert_eq!(descriptor.limits.min_turns, 0);

    let mut session = BattleSession::new(
        &descriptor,
        Arc::new(UnitRegistry::standard()),
        GameConfig::default(),
        &[],
        RecordingPresentation::new(),
    )
    .expect("valid descriptor");
    session.start().expect("starts");

    let kinds: Vec<&str> = session.state().pieces().map(|p| p.kind.as_str()).collect();
    assert_eq!(kinds, [units::MELEE, units::BASE]);
    assert!(session.port().intents.contains(&PresentationIntent::Dialog {
        message: "Hold the bridge".to_string(),
    }));
}

#[test]
fn campaign_progress_flows_through_the_context() {
    let mut ctx = GameContext::standard(GameConfig::default());
    ctx.recruit(units::MELEE);
    ctx.recruit(units::RANGED);

    let mut world = Overworld::new(OverworldNode::new("camp", "Camp"))
        .with_node(OverworldNode::new("ford", "Ford").with_battle(skirmish()));
    world.link("camp", "ford").expect("nodes exist");
    world.complete("camp", ctx.flags_mut()).expect("known node");

    let descriptor = world.enter("ford", ctx.flags()).expect("open").clone();
    let mut session = ctx
        .begin_battle(&descriptor, NullPresentation)
        .expect("valid descriptor")
        .with_seed(2);
    run(&mut session);

    let outcome = session.outcome().expect("finished");
    ctx.record_outcome("ford", outcome);
    if outcome == Outcome::Victory {
        world.complete("ford", ctx.flags_mut()).expect("known node");
        assert!(ctx.flags().is_set("battle.ford.won"));
    }
    assert_eq!(ctx.flags().get("battles.fought"), 1);
}
