use std::sync::Arc;

use tactics_content::{UnitRegistry, units};
use tactics_core::{
    BattleDescriptor, BattleState, Container, GameConfig, Phase, PieceId, Position,
    PresentationIntent, Side,
};
use tactics_runtime::{BattleSession, Key, RecordingPresentation, Selection};

fn registry() -> Arc<UnitRegistry> {
    Arc::new(UnitRegistry::standard())
}

fn duel() -> BattleDescriptor {
    BattleDescriptor::new(7, 7)
        .with_spawn(units::MELEE, Position::new(1, 3), Side::Ally, 1)
        .with_spawn(units::MELEE, Position::new(5, 3), Side::Enemy, 1)
}

fn session(
    descriptor: &BattleDescriptor,
    port: RecordingPresentation,
) -> BattleSession<RecordingPresentation> {
    BattleSession::new(descriptor, registry(), GameConfig::default(), &[], port)
        .expect("valid descriptor")
}

fn member(state: &BattleState, side: Side) -> PieceId {
    state
        .pieces()
        .find(|piece| state.side_of(piece.id) == Some(side))
        .map(|piece| piece.id)
        .expect("piece on side")
}

#[test]
fn click_move_aim_and_strike() {
    let mut session = session(&duel(), RecordingPresentation::new());
    assert_eq!(session.start().expect("starts"), Phase::Player);
    let hero = member(session.state(), Side::Ally);
    let foe = member(session.state(), Side::Enemy);

    assert!(session.piece_event(hero, false));
    assert_eq!(session.selection(), Selection::Unit(hero));
    assert!(session.state().board.painted().count() > 1);

    assert!(session.position_event(Position::new(4, 3), None));
    assert_eq!(session.state().piece(hero).and_then(|p| p.anchor), Some(Position::new(4, 3)));

    assert!(session.keydown(Key::Skill(0)));
    assert_eq!(session.selection(), Selection::Skill { unit: hero, index: 0 });
    assert_eq!(session.mouse_over(Position::new(5, 3), None), [Position::new(5, 3)]);
    assert!(session.mouse_over(Position::new(0, 0), None).is_empty());

    assert!(session.position_event(Position::new(5, 3), None));
    let foe_piece = session.state().piece(foe).expect("foe exists");
    assert_eq!(foe_piece.hp, 5);
    assert_eq!(foe_piece.anchor, Some(Position::new(6, 3)));
    // The foe retaliated while still adjacent.
    assert_eq!(session.state().piece(hero).map(|p| p.hp), Some(6));
    assert_eq!(session.selection(), Selection::None);
    assert_eq!(session.state().board.painted().count(), 0);
}

#[test]
fn right_click_walks_the_selection_back_and_undoes_moves() {
    let mut session = session(&duel(), RecordingPresentation::new());
    session.start().expect("starts");
    let hero = member(session.state(), Side::Ally);

    session.piece_event(hero, false);
    assert!(session.position_event(Position::new(2, 3), None));
    assert!(session.keydown(Key::Skill(0)));

    assert!(session.right_click());
    assert_eq!(session.selection(), Selection::Unit(hero));

    assert!(session.right_click());
    assert_eq!(session.state().piece(hero).and_then(|p| p.anchor), Some(Position::new(1, 3)));
    assert_eq!(session.selection(), Selection::Unit(hero));

    assert!(session.right_click());
    assert_eq!(session.selection(), Selection::None);
    assert!(!session.right_click());
}

#[test]
fn enemy_pieces_cannot_be_selected() {
    let mut session = session(&duel(), RecordingPresentation::new());
    session.start().expect("starts");
    let foe = member(session.state(), Side::Enemy);
    assert!(!session.piece_event(foe, false));
    assert_eq!(session.selection(), Selection::None);
}

#[test]
fn input_is_ignored_while_presentation_is_pending() {
    let mut session = session(&duel(), RecordingPresentation::new().holding());
    session.start().expect("starts");
    assert!(session.is_busy());
    assert!(!session.accepts_input());

    let hero = member(session.state(), Side::Ally);
    assert!(!session.piece_event(hero, false));
    assert!(!session.keydown(Key::EndTurn));
    assert_eq!(session.phase(), Phase::Player);

    session.acknowledge();
    assert!(session.piece_event(hero, false));
    assert!(session.position_event(Position::new(2, 3), None));
    assert!(session.is_busy());
    assert!(!session.submit_move(hero, Position::new(3, 3)));
}

#[test]
fn presentation_receives_intents_after_they_happen() {
    let mut session = session(&duel(), RecordingPresentation::new());
    session.start().expect("starts");
    let hero = member(session.state(), Side::Ally);
    session.port_mut().take();

    assert!(session.submit_move(hero, Position::new(3, 3)));
    let intents = session.port_mut().take();
    assert!(matches!(
        intents.as_slice(),
        [PresentationIntent::Move { piece, path }]
            if *piece == hero && path.last() == Some(&Position::new(3, 3))
    ));
    assert!(session.state().intents().is_empty());
}

#[test]
fn keys_map_from_scene_names() {
    assert_eq!(Key::from_name("1"), Some(Key::Skill(0)));
    assert_eq!(Key::from_name("9"), Some(Key::Skill(8)));
    assert_eq!(Key::from_name("0"), None);
    assert_eq!(Key::from_name("Escape"), Some(Key::Cancel));
    assert_eq!(Key::from_name("Enter"), Some(Key::EndTurn));
    assert_eq!(Key::from_name("q"), None);
}

#[test]
fn deployment_by_drag_and_drop() {
    let descriptor = BattleDescriptor {
        deploy_cells: vec![Position::new(0, 0), Position::new(0, 1)],
        max_deploy: Some(1),
        ..BattleDescriptor::new(6, 6).with_spawn(units::MELEE, Position::new(5, 5), Side::Enemy, 1)
    };
    let units = registry();
    let party = [
        tactics_core::UnitOracle::template_or_base(units.as_ref(), units::RANGED),
        tactics_core::UnitOracle::template_or_base(units.as_ref(), units::HEALER),
    ];
    let mut session = BattleSession::new(
        &descriptor,
        units,
        GameConfig::default(),
        &party,
        RecordingPresentation::new(),
    )
    .expect("valid descriptor");
    assert_eq!(session.start().expect("starts"), Phase::Deploy);
    assert_eq!(session.active_team(), None);

    let roster: Vec<PieceId> = session.state().bench().collect();
    assert_eq!(roster.len(), 2);

    assert!(session.piece_event(roster[0], true));
    assert_eq!(session.mouse_over(Position::new(0, 0), Some(roster[0])), [Position::new(0, 0)]);
    assert!(session.position_event(Position::new(0, 0), Some(roster[0])));
    // Limit of one: the second unit only fits by replacing the first.
    assert!(!session.position_event(Position::new(0, 1), Some(roster[1])));
    assert!(session.position_event(Position::new(0, 0), Some(roster[1])));
    assert_eq!(session.state().bench().collect::<Vec<_>>(), vec![roster[0]]);

    assert!(session.container_event(Container::Roster, Some(roster[1])));
    assert_eq!(session.state().deployed_count(), 0);
    assert!(!session.container_event(Container::Board, Some(roster[1])));

    assert!(session.position_event(Position::new(0, 1), Some(roster[1])));
    assert!(session.keydown(Key::EndTurn));
    assert_eq!(session.phase(), Phase::Player);
    assert!(session.unsaved());
}
