//! Determinism tests.
//!
//! A game is a pure function of its seed and the actions applied to it.
//! These tests replay scripted sessions and automated playtests and compare
//! every result and the final snapshot bytes.

use std::rc::Rc;

use life_cards::actions::{
    ActionData, ActionPayload, ActionProcessor, ActionResult, CHALLENGE, DRAW_CARDS, END_TURN,
    PUBLISH_CHALLENGES,
};
use life_cards::cards::Card;
use life_cards::core::{CardId, Difficulty, GameConfig};
use life_cards::game::{Game, GameSnapshot};
use life_cards::playtest::{PlaytestConfig, PlaytestRunner};
use life_cards::telemetry::RecordingObserver;
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn first_published(result: &ActionResult) -> Card {
    match &result.data {
        Some(ActionData::Challenges(cards)) => cards[0].clone(),
        other => panic!("expected published challenges, got {:?}", other),
    }
}

/// Play a fixed script: each turn take the first published challenge with
/// every positive hand card, refill two cards, end the turn.
fn scripted_session(config: GameConfig, turns: u32) -> (Vec<ActionResult>, GameSnapshot) {
    let mut game = Game::new(config).unwrap();
    let processor = ActionProcessor::new();
    let mut results = Vec::new();

    for _ in 0..turns {
        if game.is_terminal() {
            break;
        }
        let published = processor.execute(PUBLISH_CHALLENGES, &mut game, ActionPayload::Count(3));
        let challenge = first_published(&published);
        results.push(published);
        let played: Vec<CardId> = game
            .hand()
            .iter()
            .filter(|c| c.power().value() > 0)
            .map(Card::id)
            .collect();
        results.push(processor.execute(
            CHALLENGE,
            &mut game,
            ActionPayload::Challenge { challenge, played },
        ));
        results.push(processor.execute(DRAW_CARDS, &mut game, ActionPayload::Count(2)));
        results.push(processor.execute(END_TURN, &mut game, ActionPayload::Empty));
    }
    (results, game.snapshot())
}

// =============================================================================
// Scripted sessions
// =============================================================================

#[test]
fn test_same_seed_same_results() {
    init_tracing();
    let config = GameConfig::new().with_seed(1234).with_difficulty(Difficulty::Hard);

    let (results_a, snapshot_a) = scripted_session(config.clone(), 15);
    let (results_b, snapshot_b) = scripted_session(config, 15);

    assert!(!results_a.is_empty());
    assert_eq!(results_a, results_b);
    assert_eq!(snapshot_a, snapshot_b);
    assert_eq!(snapshot_a.to_bytes().unwrap(), snapshot_b.to_bytes().unwrap());
}

#[test]
fn test_different_seeds_diverge() {
    let (_, a) = scripted_session(GameConfig::new().with_seed(1), 5);
    let (_, b) = scripted_session(GameConfig::new().with_seed(2), 5);
    assert_ne!(a.to_bytes().unwrap(), b.to_bytes().unwrap());
}

#[test]
fn test_snapshot_bytes_restore() {
    let (_, snapshot) = scripted_session(GameConfig::new().with_seed(77), 6);
    let bytes = snapshot.to_bytes().unwrap();
    assert_eq!(GameSnapshot::from_bytes(&bytes).unwrap(), snapshot);
}

#[test]
fn test_observer_does_not_change_outcome() {
    let config = GameConfig::new().with_seed(9);
    let (plain, _) = scripted_session(config.clone(), 8);

    let observer = Rc::new(RecordingObserver::new());
    let processor = ActionProcessor::new().with_observer(observer.clone());
    let mut game = Game::new(config).unwrap();
    let mut observed = Vec::new();
    for _ in 0..8 {
        if game.is_terminal() {
            break;
        }
        let published = processor.execute(PUBLISH_CHALLENGES, &mut game, ActionPayload::Count(3));
        let challenge = first_published(&published);
        observed.push(published);
        let played: Vec<CardId> = game
            .hand()
            .iter()
            .filter(|c| c.power().value() > 0)
            .map(Card::id)
            .collect();
        observed.push(processor.execute(
            CHALLENGE,
            &mut game,
            ActionPayload::Challenge { challenge, played },
        ));
        observed.push(processor.execute(DRAW_CARDS, &mut game, ActionPayload::Count(2)));
        observed.push(processor.execute(END_TURN, &mut game, ActionPayload::Empty));
    }

    assert_eq!(plain, observed);
    assert_eq!(observer.actions().len(), observed.len());
}

// =============================================================================
// Playtests
// =============================================================================

#[test]
fn test_playtest_reproducible() {
    init_tracing();
    let config = PlaytestConfig::new().with_games(4).with_seed_offset(17).with_max_turns(40);

    let first = PlaytestRunner::new(config.clone()).run().unwrap();
    let second = PlaytestRunner::new(config).run().unwrap();

    assert_eq!(first, second);
    for (a, b) in first.games.iter().zip(&second.games) {
        assert_eq!(
            a.final_snapshot.to_bytes().unwrap(),
            b.final_snapshot.to_bytes().unwrap()
        );
    }
}

#[test]
fn test_playtest_report_serializes() {
    let config = PlaytestConfig::new().with_games(1).with_max_turns(5);
    let report = PlaytestRunner::new(config).run().unwrap();

    let json = serde_json::to_string(&report).unwrap();
    let back: life_cards::playtest::PlaytestReport = serde_json::from_str(&json).unwrap();
    assert_eq!(back, report);
}
