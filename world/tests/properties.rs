use proptest::prelude::*;
use snakes_ladders_core::{BoardConfig, Choice, Command, DieFace, Event, Phase, TileIndex};
use snakes_ladders_world::{self as world, query, World};

fn take_turn(world: &mut World, face: u8, free_roll: bool) -> Vec<Event> {
    let mut events = Vec::new();
    world::apply(
        world,
        Command::TakeTurn {
            roll: DieFace::new(face).expect("generated face"),
            free_roll,
        },
        &mut events,
    );
    events
}

fn answer(world: &mut World, index: usize) -> Vec<Event> {
    let mut events = Vec::new();
    world::apply(
        world,
        Command::AnswerChance {
            choice: Choice::new(index),
        },
        &mut events,
    );
    events
}

proptest! {
    #[test]
    fn landing_tile_never_moves_back_or_passes_goal(
        rolls in prop::collection::vec(1_u8..=6, 1..150),
        answers in prop::collection::vec(0_usize..3, 150),
    ) {
        let mut world = World::new(BoardConfig::reference());

        for (face, choice) in rolls.into_iter().zip(answers) {
            let before = query::snapshot(&world);
            if before.phase() == Phase::Won {
                break;
            }

            for event in take_turn(&mut world, face, before.free_roll_granted) {
                if let Event::RollResult { landed, .. } = event {
                    prop_assert!(landed >= before.position);
                    prop_assert!(landed.get() <= before.position.get() + u32::from(face));
                    prop_assert!(landed <= TileIndex::GOAL);
                }
            }

            if query::phase(&world) == Phase::AwaitingChance {
                let _ = answer(&mut world, choice);
            }
        }
    }

    #[test]
    fn each_turn_applies_at_most_one_warp(
        rolls in prop::collection::vec(1_u8..=6, 1..150),
    ) {
        let mut world = World::new(BoardConfig::reference());

        for face in rolls {
            match query::phase(&world) {
                Phase::Won => break,
                Phase::AwaitingChance => {
                    let _ = answer(&mut world, 0);
                }
                Phase::Idle => {}
            }

            let events = take_turn(&mut world, face, false);
            let warps = events
                .iter()
                .filter(|event| matches!(event, Event::WarpApplied { .. }))
                .count();
            prop_assert!(warps <= 1);

            if let Some(Event::WarpApplied { to, .. }) = events
                .iter()
                .find(|event| matches!(event, Event::WarpApplied { .. }))
            {
                prop_assert_eq!(query::snapshot(&world).position, *to);
            }
        }
    }

    #[test]
    fn win_is_reported_exactly_when_goal_is_reached(
        rolls in prop::collection::vec(1_u8..=6, 1..300),
    ) {
        let mut world = World::new(BoardConfig::reference());
        let mut wins = 0;

        for face in rolls {
            if query::phase(&world) == Phase::AwaitingChance {
                wins += answer(&mut world, 2)
                    .iter()
                    .filter(|event| matches!(event, Event::GameWon { .. }))
                    .count();
            }
            wins += take_turn(&mut world, face, false)
                .iter()
                .filter(|event| matches!(event, Event::GameWon { .. }))
                .count();

            let state = query::snapshot(&world);
            prop_assert_eq!(state.finished, state.position.is_goal() && !state.pending_chance);
        }

        let state = query::snapshot(&world);
        prop_assert_eq!(wins, usize::from(state.finished));
    }

    #[test]
    fn granted_free_roll_is_consumed_by_the_next_turn(
        face in 1_u8..=6,
        free_roll in any::<bool>(),
    ) {
        let mut world = World::new(BoardConfig::reference());
        let _ = take_turn(&mut world, 5, false);
        let _ = answer(&mut world, 2);
        prop_assert!(query::snapshot(&world).free_roll_granted);

        let _ = take_turn(&mut world, face, free_roll);

        prop_assert!(!query::snapshot(&world).free_roll_granted);
    }
}
