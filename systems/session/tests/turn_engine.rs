use std::collections::{BTreeMap, BTreeSet};

use snakes_ladders_core::{
    BoardConfig, ChanceQuestion, Choice, Event, GameState, InvalidState, Phase, Rejection,
    TileIndex, Warp, WarpKind,
};
use snakes_ladders_system_dice::ScriptedDice;
use snakes_ladders_system_session::TurnEngine;

fn tile(value: u32) -> TileIndex {
    TileIndex::new(value).expect("tile on board")
}

fn scripted(config: BoardConfig, rolls: &[u8]) -> TurnEngine<ScriptedDice> {
    TurnEngine::new(
        config,
        ScriptedDice::from_values(rolls).expect("valid roll script"),
    )
}

fn board(setbacks: &[(u32, u32)], chance_tiles: &[u32]) -> BoardConfig {
    let setbacks: BTreeMap<TileIndex, TileIndex> = setbacks
        .iter()
        .map(|&(from, to)| (tile(from), tile(to)))
        .collect();
    let chance_tiles: BTreeSet<TileIndex> = chance_tiles.iter().map(|&value| tile(value)).collect();
    BoardConfig::new(
        setbacks,
        BTreeMap::new(),
        chance_tiles,
        ChanceQuestion::new("Pick the second", vec!["first", "second"], 1),
    )
    .expect("valid board")
}

#[test]
fn first_roll_of_five_lands_on_chance_tile() {
    let mut engine = scripted(BoardConfig::reference(), &[5]);

    let outcome = engine.take_turn(false).expect("idle engine accepts a roll");

    assert_eq!(outcome.roll.get(), 5);
    assert_eq!(outcome.landed(), Some(tile(6)));
    assert!(outcome.triggered_chance());
    assert_eq!(outcome.state.phase(), Phase::AwaitingChance);
    assert_eq!(outcome.state.roll_count, 1);
}

#[test]
fn landing_on_setback_source_slides_down() {
    // 1 -> 7 -> 13 -> 19 -> 25 -> 31 -> 36 (shortcut to 44) -> 47 (setback to 26)
    let mut engine = scripted(BoardConfig::reference(), &[6, 6, 6, 6, 6, 5, 3]);
    for _ in 0..6 {
        let outcome = engine.take_turn(false).expect("no chance tile on this path");
        assert!(!outcome.triggered_chance());
    }
    assert_eq!(engine.snapshot().position, tile(44));

    let outcome = engine.take_turn(false).expect("idle engine accepts a roll");

    assert_eq!(outcome.landed(), Some(tile(47)));
    assert_eq!(
        outcome.warp(),
        Some(Warp {
            kind: WarpKind::Setback,
            from: tile(47),
            to: tile(26),
        })
    );
    assert_eq!(outcome.state.position, tile(26));
    assert_eq!(
        outcome.state.last_event,
        Some(Event::WarpApplied {
            kind: WarpKind::Setback,
            from: tile(47),
            to: tile(26),
        })
    );
}

#[test]
fn correct_answer_removes_the_highest_setback() {
    let mut engine = scripted(board(&[(47, 26), (98, 78)], &[6]), &[5]);
    let _ = engine.take_turn(false).expect("roll onto chance tile");

    let outcome = engine
        .answer_chance(Choice::new(1))
        .expect("question is pending");

    assert!(outcome.correct);
    assert_eq!(outcome.removed_setback, Some(tile(98)));
    assert!(outcome.state.free_roll_granted);
    assert_eq!(
        engine.setbacks(),
        vec![Warp {
            kind: WarpKind::Setback,
            from: tile(47),
            to: tile(26),
        }]
    );
}

#[test]
fn rolling_while_question_pending_is_rejected_without_drawing() {
    let mut engine = scripted(board(&[], &[6]), &[5, 1]);
    let _ = engine.take_turn(false).expect("roll onto chance tile");
    let before = engine.snapshot();

    let error = engine.take_turn(false).expect_err("question must be answered first");

    assert_eq!(error.reason, Rejection::ChancePending);
    assert_eq!(engine.snapshot(), before);

    let _ = engine
        .answer_chance(Choice::new(0))
        .expect("question is pending");
    let outcome = engine.take_turn(false).expect("idle again");
    assert_eq!(outcome.roll.get(), 1, "rejected turn must not consume a roll");
}

#[test]
fn answering_without_question_is_rejected() {
    let mut engine = scripted(BoardConfig::reference(), &[1]);

    let error = engine
        .answer_chance(Choice::new(0))
        .expect_err("nothing to answer");

    assert_eq!(error.reason, Rejection::NoChancePending);
    assert_eq!(engine.snapshot(), GameState::initial());
}

#[test]
fn free_roll_is_spent_by_exactly_one_turn() {
    let mut engine = scripted(board(&[], &[6, 12]), &[5, 6, 1]);
    let _ = engine.take_turn(false).expect("roll onto first chance tile");
    let _ = engine
        .answer_chance(Choice::new(1))
        .expect("question is pending");

    let free = engine.take_next_turn().expect("free roll");
    assert_eq!(free.state.position, tile(12));
    assert_eq!(free.state.roll_count, 1, "free roll is not counted");
    assert!(!free.state.free_roll_granted);

    let _ = engine
        .answer_chance(Choice::new(1))
        .expect("second chance tile asks again");
    assert!(engine.snapshot().free_roll_granted);

    let free_again = engine.take_turn(true).expect("free roll");
    assert!(!free_again.state.free_roll_granted);

    let _ = engine.take_next_turn();
    assert_eq!(engine.snapshot().roll_count, 2);
}

#[test]
fn won_game_rejects_rolls_until_reset() {
    let mut engine = scripted(BoardConfig::reference(), &[6]);
    let mut guard = 0;
    while engine.phase() != Phase::Won && guard < 500 {
        match engine.phase() {
            Phase::AwaitingChance => {
                let _ = engine
                    .answer_chance(Choice::new(2))
                    .expect("question is pending");
            }
            _ => {
                let _ = engine.take_next_turn().expect("idle engine accepts a roll");
            }
        }
        guard += 1;
    }

    assert_eq!(engine.phase(), Phase::Won);
    assert_eq!(engine.snapshot().position, TileIndex::GOAL);
    assert!(matches!(
        engine.history().last(),
        Some(Event::GameWon { .. })
    ));
    assert_eq!(
        engine.take_turn(false).map(|_| ()),
        Err(InvalidState::from(Rejection::GameOver))
    );

    engine.reset();

    assert_eq!(engine.snapshot(), GameState::initial());
    assert_eq!(engine.setbacks().len(), 10);
    assert!(engine.history().is_empty());
    assert!(engine.take_turn(false).is_ok());
}

#[test]
fn board_views_match_configuration() {
    let engine = TurnEngine::seeded(BoardConfig::reference(), 7);

    assert_eq!(engine.shortcuts().len(), 9);
    assert_eq!(engine.setbacks().len(), 10);
    assert_eq!(engine.chance_tiles().len(), 16);
    assert_eq!(engine.question().options().len(), 3);
}

#[test]
fn wrong_answer_is_reported_from_the_resolution_event() {
    let mut engine = scripted(board(&[(47, 26)], &[6]), &[5]);
    let _ = engine.take_turn(false).expect("roll onto chance tile");

    let outcome = engine
        .answer_chance(Choice::new(0))
        .expect("question is pending");

    assert!(!outcome.correct);
    assert_eq!(outcome.removed_setback, None);
    assert_eq!(
        outcome.events,
        vec![Event::ChanceResolved {
            correct: false,
            removed_setback: None,
        }]
    );
    assert!(!outcome.state.free_roll_granted);
    assert_eq!(engine.setbacks().len(), 1);
}
