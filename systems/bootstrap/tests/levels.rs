use std::time::Duration;

use tile_trail_core::{CellCoord, Command, Event, GameMode, StopCause};
use tile_trail_system_bootstrap::Bootstrap;
use tile_trail_world::{self as world, query, World};

const FRAME: Duration = Duration::from_millis(50);

fn play(world: &mut World, max_frames: usize) -> Vec<Event> {
    let mut events = Vec::new();
    world::apply(world, Command::Start, &mut events);
    for _ in 0..max_frames {
        world::apply(world, Command::Tick { dt: FRAME }, &mut events);
        if query::game_mode(world).is_terminal() {
            break;
        }
    }
    events
}

#[test]
fn every_level_loads_into_edit_mode() {
    let bootstrap = Bootstrap;
    for level in bootstrap.levels() {
        let world = bootstrap
            .level(level.name())
            .unwrap_or_else(|error| panic!("{} failed to load: {error}", level.name()));
        assert_eq!(query::game_mode(&world), GameMode::Edit, "{}", level.name());
        assert_eq!(query::board(&world).width(), level.width());
        assert_eq!(query::board(&world).height(), level.height());
    }
}

#[test]
fn ready_made_levels_are_solvable_without_edits() {
    for name in ["straight", "diagonal", "knot"] {
        let mut world = Bootstrap.level(name).expect("level loads");
        let _ = play(&mut world, 2_000);
        assert_eq!(query::game_mode(&world), GameMode::Win, "{name}");
    }
}

#[test]
fn knot_uses_the_corner_connector() {
    let mut world = Bootstrap.level("knot").expect("level loads");
    let events = play(&mut world, 2_000);

    let corners = events
        .iter()
        .filter(|event| matches!(event, Event::MoverEnteredCorner { .. }))
        .count();
    assert_eq!(corners, 1);
}

#[test]
fn switchback_needs_rotations() {
    let bootstrap = Bootstrap;

    let mut untouched = bootstrap.level("switchback").expect("level loads");
    let events = play(&mut untouched, 2_000);
    assert_eq!(query::game_mode(&untouched), GameMode::Lose);
    assert!(events.iter().any(|event| matches!(
        event,
        Event::MoverStopped {
            cause: StopCause::NoConnector,
            ..
        }
    )));

    let mut solved = bootstrap.level("switchback").expect("level loads");
    let mut events = Vec::new();
    for (cell, amount) in [(CellCoord::new(1, 0), 2), (CellCoord::new(1, 1), -2)] {
        world::apply(&mut solved, Command::RotateTile { cell, amount }, &mut events);
    }
    let _ = play(&mut solved, 2_000);
    assert_eq!(query::game_mode(&solved), GameMode::Win);
}
