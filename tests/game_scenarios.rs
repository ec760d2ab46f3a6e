//! End-to-end scenarios for the simulation core

use tron_grid::game::{
    Board, CollisionType, ConfigError, Game, GameConfig, Heading, Outcome, Player, PlayerColor,
    Position,
};

fn place(name: &str, x: i32, y: i32) -> Player {
    Player::new(name, PlayerColor::White, Position::new(x, y))
}

/// Snapshot of everything a tick may change
fn snapshot(game: &Game) -> Vec<(Position, Vec<Position>, bool)> {
    game.players()
        .iter()
        .map(|p| (p.position(), p.trail().to_vec(), p.is_alive()))
        .collect()
}

#[test]
fn head_on_collision_on_default_board_is_a_tie() {
    let mut game = Game::new(&GameConfig::new(20, 20, 2)).unwrap();
    assert_eq!(game.players()[0].position(), Position::new(5, 5));
    assert_eq!(game.players()[1].position(), Position::new(15, 15));

    game.turn(0, Heading::Right);
    game.turn(1, Heading::Left);
    for _ in 0..5 {
        assert!(game.tick());
    }
    assert_eq!(game.players()[0].position(), Position::new(10, 5));
    assert_eq!(game.players()[1].position(), Position::new(10, 15));

    game.turn(0, Heading::Down);
    game.turn(1, Heading::Up);
    for _ in 0..4 {
        assert!(game.tick());
    }
    let report = game.tick_report();

    assert_eq!(
        report.eliminated,
        vec![(0, CollisionType::HeadOn), (1, CollisionType::HeadOn)]
    );
    assert!(!report.in_progress);
    assert!(game.is_over());
    assert_eq!(game.winner(), Ok(Outcome::Tie));
    assert_eq!(game.players()[0].position(), Position::new(10, 10));
}

#[test]
fn simultaneous_elimination_ignores_roster_order() {
    let board = Board::new(20, 20).unwrap();

    let run = |players: Vec<Player>, headings: [Heading; 3]| {
        let mut game = Game::from_parts(board, players).unwrap();
        for (index, heading) in headings.into_iter().enumerate() {
            game.turn(index, heading);
        }
        game.tick();
        game.players()
            .iter()
            .map(|p| (p.name().to_string(), p.is_alive()))
            .collect::<std::collections::BTreeMap<_, _>>()
    };

    let forward = run(
        vec![place("A", 4, 4), place("B", 6, 4), place("C", 15, 15)],
        [Heading::Right, Heading::Left, Heading::Up],
    );
    let reversed = run(
        vec![place("C", 15, 15), place("B", 6, 4), place("A", 4, 4)],
        [Heading::Up, Heading::Left, Heading::Right],
    );

    assert_eq!(forward, reversed);
    assert!(!forward["A"]);
    assert!(!forward["B"]);
    assert!(forward["C"]);
}

#[test]
fn leaving_the_board_eliminates_on_that_tick() {
    for (start, heading) in [
        (Position::new(0, 10), Heading::Left),
        (Position::new(19, 10), Heading::Right),
        (Position::new(10, 0), Heading::Up),
        (Position::new(10, 19), Heading::Down),
    ] {
        let board = Board::new(20, 20).unwrap();
        let mut game = Game::from_parts(
            board,
            vec![
                Player::new("Edge", PlayerColor::Red, start),
                place("Safe", 5, 5),
            ],
        )
        .unwrap();
        game.turn(0, heading);
        game.turn(1, Heading::Down);

        let report = game.tick_report();

        assert_eq!(report.eliminated, vec![(0, CollisionType::Wall)]);
        match game.winner() {
            Ok(Outcome::Winner { index, player }) => {
                assert_eq!(index, 1);
                assert_eq!(player.name(), "Safe");
            }
            other => panic!("expected a winner, got {other:?}"),
        }
    }
}

#[test]
fn entering_another_players_trail_is_fatal() {
    let board = Board::new(20, 20).unwrap();
    let mut game = Game::from_parts(
        board,
        vec![place("Cutter", 8, 2), place("Wall", 6, 5), place("Idle", 18, 18)],
    )
    .unwrap();
    game.turn(0, Heading::Down);
    game.turn(1, Heading::Right);
    game.turn(2, Heading::Left);

    assert!(game.tick());
    assert!(game.tick());
    // Wall has just left (8,5) as Cutter arrives there
    let report = game.tick_report();

    assert_eq!(game.players()[0].position(), Position::new(8, 5));
    assert_eq!(report.eliminated, vec![(0, CollisionType::Trail)]);
    assert!(report.in_progress);
}

#[test]
fn doubling_back_into_own_trail_is_fatal() {
    let board = Board::new(20, 20).unwrap();
    let mut game =
        Game::from_parts(board, vec![place("Looper", 5, 5), place("Other", 15, 15)]).unwrap();
    game.turn(0, Heading::Right);
    game.turn(1, Heading::Up);
    assert!(game.tick());

    game.turn(0, Heading::Left);
    let report = game.tick_report();

    assert_eq!(report.eliminated, vec![(0, CollisionType::Trail)]);
    assert!(matches!(
        game.winner(),
        Ok(Outcome::Winner { index: 1, .. })
    ));
}

#[test]
fn eliminated_players_stay_eliminated() {
    let board = Board::new(20, 20).unwrap();
    let mut game = Game::from_parts(
        board,
        vec![place("A", 0, 0), place("B", 10, 10), place("C", 3, 12)],
    )
    .unwrap();
    game.turn(0, Heading::Up);
    game.turn(1, Heading::Right);
    game.turn(2, Heading::Right);

    let mut was_dead = vec![false; 3];
    for _ in 0..30 {
        game.tick();
        for (index, player) in game.players().iter().enumerate() {
            if was_dead[index] {
                assert!(!player.is_alive());
            }
            was_dead[index] = !player.is_alive();
        }
    }
    assert!(game.is_over());
}

#[test]
fn no_tick_runs_until_every_live_player_moves() {
    let mut game = Game::new(&GameConfig::new(20, 20, 2)).unwrap();
    game.turn(1, Heading::Left);
    let before = snapshot(&game);

    for _ in 0..1000 {
        assert!(game.tick());
    }

    assert_eq!(snapshot(&game), before);
    assert_eq!(game.players()[0].position(), Position::new(5, 5));
    assert!(game.players()[0].trail().is_empty());
    assert!(!game.is_over());
    assert_eq!(game.ticks(), 0);
}

#[test]
fn finished_game_ignores_further_ticks() {
    let board = Board::new(20, 20).unwrap();
    let mut game =
        Game::from_parts(board, vec![place("A", 0, 4), place("B", 12, 12)]).unwrap();
    game.turn(0, Heading::Left);
    game.turn(1, Heading::Up);
    assert!(!game.tick());

    game.turn(1, Heading::Down);
    let before = snapshot(&game);
    for _ in 0..50 {
        assert!(!game.tick());
    }
    assert_eq!(snapshot(&game), before);
}

#[test]
fn construction_rejects_bad_configuration() {
    assert!(matches!(
        Game::new(&GameConfig::new(20, 20, 1)),
        Err(ConfigError::PlayerCount { count: 1, .. })
    ));
    assert!(matches!(
        Game::new(&GameConfig::new(20, 20, 5)),
        Err(ConfigError::PlayerCount { count: 5, .. })
    ));
    assert!(matches!(
        Game::new(&GameConfig::new(19, 20, 2)),
        Err(ConfigError::MapSize { width: 19, .. })
    ));

    let mut short_roster = GameConfig::new(20, 20, 4);
    short_roster.players.truncate(3);
    assert!(matches!(
        Game::new(&short_roster),
        Err(ConfigError::MissingPlayerSettings { .. })
    ));
}
