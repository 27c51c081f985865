//! End-to-end scenarios across the board model, the engine, the worker and
//! the game controller.

use std::time::{Duration, Instant};

use kinrow::board::{Board, BoardConfig, Move, Placement, Player, Pos};
use kinrow::engine::{AIEngine, EngineConfig};
use kinrow::error::WorkerError;
use kinrow::game::{GameController, GameMode, Phase};
use kinrow::rules::{check_win, outcome_after, GameStatus};
use kinrow::search::{SearchType, Searcher};
use kinrow::worker::{SearchRequest, SearchRequestMessage, SearchResponseMessage, SearchWorker};

// =============================================================================
// Helper functions
// =============================================================================

fn quick() -> EngineConfig {
    EngineConfig {
        time_budget_ms: 100,
        max_depth: 6,
    }
}

/// Full 6x7 board without four in a row anywhere.
const DRAWN_ROWS: [&str; 6] = [
    "XXOOXXO",
    "OOXXOOX",
    "XXOOXXO",
    "OOXXOOX",
    "XXOOXXO",
    "OOXXOOX",
];

/// Alternating drop order that builds `DRAWN_ROWS` without an earlier win.
const DRAWN_ORDER: [u8; 42] = [
    3, 3, 3, 3, 3, 3, 2, 2, 2, 2, 2, 2, 6, 4, 4, 4, 4, 4, 4, 1, 1, 1, 1, 1, 1, 5, 5, 5, 5, 5, 5,
    0, 0, 0, 0, 0, 0, 6, 6, 6, 6, 6,
];

/// Mid-game Gomoku position with no immediate tactics.
fn open_gomoku() -> Board {
    let mut board = Board::new(BoardConfig::gomoku());
    board.place(Pos::new(7, 7), Player::First);
    board.place(Pos::new(8, 8), Player::Second);
    board.place(Pos::new(6, 8), Player::First);
    board
}

// =============================================================================
// Win detection
// =============================================================================

#[test]
fn gravity_four_drops_in_column_three_win() {
    let mut game =
        GameController::new(BoardConfig::connect_four(), GameMode::PvP, quick()).unwrap();
    for col in [3, 0, 3, 0, 3, 0] {
        game.play(Move::column(col)).unwrap();
        assert_eq!(game.status(), GameStatus::InProgress);
    }
    game.play(Move::column(3)).unwrap();

    assert_eq!(game.status(), GameStatus::Won(Player::First));
    assert_eq!(game.phase(), Phase::GameOver);
    assert_eq!(
        game.winning_line(),
        Some(&[Pos::new(2, 3), Pos::new(3, 3), Pos::new(4, 3), Pos::new(5, 3)][..])
    );
}

#[test]
fn gomoku_horizontal_five_wins_at_last_stone() {
    let mut board = Board::new(BoardConfig::gomoku());
    for col in 7..=11 {
        board.place(Pos::new(7, col), Player::First);
    }
    assert!(check_win(&board, Some(Pos::new(7, 11)), Player::First));
    assert!(!check_win(&board, Some(Pos::new(7, 11)), Player::Second));
    assert_eq!(
        outcome_after(&board, Pos::new(7, 11), Player::First),
        GameStatus::Won(Player::First)
    );
}

#[test]
fn long_line_needed_on_small_board_never_wins() {
    let config = BoardConfig::new(3, 3, 4, Placement::FreePlacement).unwrap();
    let mut game = GameController::new(config, GameMode::PvP, quick()).unwrap();
    for (row, col) in [(0, 0), (1, 0), (0, 1), (1, 1), (0, 2), (1, 2), (2, 0), (2, 1), (2, 2)] {
        game.play(Move::place(row, col)).unwrap();
    }
    assert_eq!(game.status(), GameStatus::Draw);
}

// =============================================================================
// Draws and full boards
// =============================================================================

#[test]
fn full_gravity_board_is_a_draw_with_no_move() {
    let board = Board::from_rows(BoardConfig::connect_four(), &DRAWN_ROWS).unwrap();
    assert!(board.is_full());
    assert_eq!(board.legal_moves().count(), 0);
    assert_eq!(outcome_after(&board, Pos::new(0, 6), Player::Second), GameStatus::Draw);

    let result = Searcher::new().search_timed(&board, Player::First, 8, 200);
    assert_eq!(result.best_move, None);
    assert_eq!(result.search_type, SearchType::NoMoves);
}

#[test]
fn hot_seat_game_fills_board_to_a_draw() {
    let mut game =
        GameController::new(BoardConfig::connect_four(), GameMode::PvP, quick()).unwrap();
    for col in DRAWN_ORDER {
        game.play(Move::column(col)).unwrap();
    }
    assert_eq!(game.status(), GameStatus::Draw);
    assert_eq!(game.phase(), Phase::GameOver);
    assert_eq!(game.board().to_string(), DRAWN_ROWS.join("\n"));
    assert!(game.winning_line().is_none());
}

// =============================================================================
// Search guarantees
// =============================================================================

#[test]
fn single_winning_move_found_with_tiny_budget() {
    let board = Board::from_rows(BoardConfig::connect_four(), &[
        ".......",
        ".......",
        ".......",
        "......O",
        "......O",
        "XXX...O",
    ])
    .unwrap();
    let result = Searcher::new().search_timed(&board, Player::First, 12, 1);
    assert_eq!(result.best_move, Some(Move::column(3)));
    assert!(result.is_winning());
}

#[test]
fn search_respects_wall_clock_budget() {
    let board = open_gomoku();
    for budget in [50, 200] {
        let start = Instant::now();
        let result = Searcher::new().search_timed(&board, Player::Second, 64, budget);
        let elapsed = start.elapsed();

        assert!(result.best_move.is_some());
        assert!(result.depth >= 1);
        assert!(
            elapsed < Duration::from_millis(budget + 250),
            "budget {budget}ms took {elapsed:?}"
        );
    }
}

#[test]
fn engine_move_is_always_legal() {
    let mut board = open_gomoku();
    let mut engine = AIEngine::with_config(EngineConfig {
        time_budget_ms: 50,
        max_depth: 4,
    });
    let mut player = Player::Second;
    for _ in 0..6 {
        let mv = engine.get_move(&board, player).unwrap();
        assert!(board.legal_moves().any(|legal| legal == mv));
        board = board.apply(mv, player).unwrap();
        player = player.opponent();
    }
}

// =============================================================================
// Worker and controller
// =============================================================================

#[test]
fn cancel_before_result_leaves_game_untouched() {
    let mut game =
        GameController::new(BoardConfig::gomoku(), GameMode::PvE { human: Player::First }, EngineConfig {
            time_budget_ms: 10_000,
            max_depth: 32,
        })
        .unwrap();
    game.play(Move::place(7, 7)).unwrap();
    assert_eq!(game.phase(), Phase::AiSearching);
    let before = game.state().clone();

    // Nothing arrives while the engine works on its long budget
    assert!(!game.poll());
    assert_eq!(game.state(), &before);

    game.reset();
    assert_eq!(game.phase(), Phase::Idle);
    assert!(game.board().is_board_empty());
    assert!(!game.wait_for_ai(Duration::from_millis(50)));
}

#[test]
fn cancelled_request_delivers_nothing() {
    let board = open_gomoku();
    let snapshot = board.clone();
    let mut worker = SearchWorker::spawn().unwrap();

    let handle = worker
        .submit(SearchRequest::new(board.clone(), Player::Second, EngineConfig {
            time_budget_ms: 10_000,
            max_depth: 32,
        }))
        .unwrap();
    handle.cancel();

    assert!(matches!(handle.wait(), Err(WorkerError::Cancelled)));
    assert_eq!(board, snapshot);
}

#[test]
fn engine_reply_arrives_through_poll() {
    let mut game = GameController::new(
        BoardConfig::connect_four(),
        GameMode::PvE {
            human: Player::First,
        },
        quick(),
    )
    .unwrap();
    game.play(Move::column(3)).unwrap();

    let start = Instant::now();
    while game.is_ai_thinking() {
        game.poll();
        assert!(start.elapsed() < Duration::from_secs(5));
        std::thread::sleep(Duration::from_millis(5));
    }
    assert_eq!(game.phase(), Phase::PlayerTurn);
    assert_eq!(game.turn(), Player::First);
    assert_eq!(game.history().len(), 2);
}

#[test]
fn full_game_against_engine_terminates() {
    let mut game = GameController::new(
        BoardConfig::connect_four(),
        GameMode::PvE {
            human: Player::Second,
        },
        EngineConfig {
            time_budget_ms: 30,
            max_depth: 4,
        },
    )
    .unwrap();

    while game.phase() != Phase::GameOver {
        if game.is_human_turn() && !game.is_ai_thinking() {
            let mv = game.board().legal_moves().next().unwrap();
            game.play(mv).unwrap();
        } else {
            game.wait_for_ai(Duration::from_secs(5));
        }
        assert!(game.history().len() <= 42);
    }

    match game.status() {
        GameStatus::Won(_) => assert!(game.winning_line().is_some()),
        GameStatus::Draw => assert!(game.board().is_full()),
        GameStatus::InProgress => unreachable!(),
    }
}

#[test]
fn json_request_round_trip_through_worker() {
    let json = r#"{
        "board": [
            [null, null, null, null, null],
            [null, "O",  null, null, null],
            [null, "X",  "X",  "X",  null],
            [null, "O",  null, null, null],
            [null, null, null, null, null]
        ],
        "rows": 5, "cols": 5, "winLength": 4,
        "player": "X", "timeBudgetMs": 200, "placement": "free"
    }"#;
    let request = SearchRequestMessage::from_json(json)
        .unwrap()
        .into_request()
        .unwrap();
    let board = request.board.clone();

    let mut worker = SearchWorker::spawn().unwrap();
    let result = worker.submit(request).unwrap().wait().unwrap();
    let best_move = result.best_move.map(|mv| board.landing(mv).unwrap());

    let response = SearchResponseMessage { best_move };
    let reply = response.to_json().unwrap();
    assert!(
        reply == r#"{"move":{"row":2,"col":0}}"# || reply == r#"{"move":{"row":2,"col":4}}"#,
        "unexpected reply {reply}"
    );
}
