//! Playtest runner.
//!
//! Plays whole games through the `ActionProcessor`, exactly as a
//! presentation layer would, and summarizes how they went.

use serde::{Deserialize, Serialize};
use tracing::info;

use super::strategy::{GreedyStrategy, Strategy};
use crate::actions::{
    ActionData, ActionPayload, ActionProcessor, ActionResult, BUY_INSURANCE, CHALLENGE,
    DISCARD_CARDS, DRAW_CARDS, END_TURN, PUBLISH_CHALLENGES,
};
use crate::core::{GameConfig, LifeStage, Result};
use crate::game::{Game, GameSnapshot, GameStatus};
use crate::zones::MAX_DRAW;

/// Configuration for a playtest run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlaytestConfig {
    /// Number of games to play.
    pub games: usize,

    /// Added to the game seed for each game (combined with the game index).
    pub seed_offset: u64,

    /// Turns after which an unfinished game is abandoned.
    pub max_turns: u32,

    /// Challenges published each turn.
    pub challenges_per_turn: usize,

    /// Template for every game; its seed is the base seed.
    pub game: GameConfig,
}

impl Default for PlaytestConfig {
    fn default() -> Self {
        Self {
            games: 10,
            seed_offset: 0,
            max_turns: 100,
            challenges_per_turn: 3,
            game: GameConfig::default(),
        }
    }
}

impl PlaytestConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_games(mut self, games: usize) -> Self {
        self.games = games;
        self
    }

    pub fn with_seed_offset(mut self, offset: u64) -> Self {
        self.seed_offset = offset;
        self
    }

    pub fn with_max_turns(mut self, max: u32) -> Self {
        self.max_turns = max;
        self
    }

    pub fn with_challenges_per_turn(mut self, count: usize) -> Self {
        self.challenges_per_turn = count;
        self
    }

    pub fn with_game_config(mut self, game: GameConfig) -> Self {
        self.game = game;
        self
    }

    /// Seed for the game at `index`.
    #[must_use]
    pub fn seed_for(&self, index: usize) -> u64 {
        self.game
            .seed
            .wrapping_add(self.seed_offset)
            .wrapping_add(index as u64)
    }
}

/// How one game ended.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSummary {
    pub seed: u64,
    pub status: GameStatus,
    pub turns: u32,
    pub score: u32,
    pub vitality: u32,
    pub stage: LifeStage,
    pub challenges_won: u32,
    pub challenges_lost: u32,
    pub insurance_bought: u32,
    pub actions: u32,
    pub failed_actions: u32,
    /// Final state, for byte-level comparison across runs.
    pub final_snapshot: GameSnapshot,
}

/// Summaries of every game in a run, in play order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaytestReport {
    pub games: Vec<GameSummary>,
}

impl PlaytestReport {
    #[must_use]
    pub fn wins(&self) -> usize {
        self.count(GameStatus::Completed)
    }

    #[must_use]
    pub fn losses(&self) -> usize {
        self.count(GameStatus::GameOver)
    }

    /// Games abandoned at the turn limit.
    #[must_use]
    pub fn unfinished(&self) -> usize {
        self.count(GameStatus::InProgress)
    }

    fn count(&self, status: GameStatus) -> usize {
        self.games.iter().filter(|g| g.status == status).count()
    }

    #[must_use]
    pub fn win_rate(&self) -> f64 {
        if self.games.is_empty() {
            0.0
        } else {
            self.wins() as f64 / self.games.len() as f64
        }
    }

    #[must_use]
    pub fn mean_turns(&self) -> f64 {
        if self.games.is_empty() {
            return 0.0;
        }
        let total: u64 = self.games.iter().map(|g| u64::from(g.turns)).sum();
        total as f64 / self.games.len() as f64
    }
}

#[derive(Default)]
struct Tally {
    challenges_won: u32,
    challenges_lost: u32,
    insurance_bought: u32,
    actions: u32,
    failed_actions: u32,
}

impl Tally {
    fn record(&mut self, result: &ActionResult) {
        self.actions += 1;
        if !result.success {
            self.failed_actions += 1;
        }
    }
}

/// Runs playtest games with a strategy.
pub struct PlaytestRunner<S: Strategy = GreedyStrategy> {
    processor: ActionProcessor,
    strategy: S,
    config: PlaytestConfig,
}

impl PlaytestRunner<GreedyStrategy> {
    /// Runner using the greedy strategy.
    pub fn new(config: PlaytestConfig) -> Self {
        Self::with_strategy(config, GreedyStrategy)
    }
}

impl<S: Strategy> PlaytestRunner<S> {
    pub fn with_strategy(config: PlaytestConfig, strategy: S) -> Self {
        Self {
            processor: ActionProcessor::new(),
            strategy,
            config,
        }
    }

    /// Use a custom processor (e.g. one with an observer attached).
    #[must_use]
    pub fn with_processor(mut self, processor: ActionProcessor) -> Self {
        self.processor = processor;
        self
    }

    #[must_use]
    pub fn config(&self) -> &PlaytestConfig {
        &self.config
    }

    /// Play every configured game.
    pub fn run(&self) -> Result<PlaytestReport> {
        let mut report = PlaytestReport::default();
        for index in 0..self.config.games {
            let seed = self.config.seed_for(index);
            report.games.push(self.play_game(seed)?);
        }
        info!(
            games = report.games.len(),
            wins = report.wins(),
            losses = report.losses(),
            unfinished = report.unfinished(),
            "playtest finished"
        );
        Ok(report)
    }

    /// Play one game from `seed` to the end or the turn limit.
    pub fn play_game(&self, seed: u64) -> Result<GameSummary> {
        let mut game = Game::new(self.config.game.clone().with_seed(seed))?;
        let mut tally = Tally::default();

        while !game.is_terminal() && game.turn() <= self.config.max_turns {
            self.play_turn(&mut game, &mut tally)?;
        }

        info!(
            seed,
            status = ?game.status(),
            turns = game.turn(),
            score = game.score(),
            "playtest game finished"
        );
        Ok(GameSummary {
            seed,
            status: game.status(),
            turns: game.turn(),
            score: game.score(),
            vitality: game.vitality(),
            stage: game.stage(),
            challenges_won: tally.challenges_won,
            challenges_lost: tally.challenges_lost,
            insurance_bought: tally.insurance_bought,
            actions: tally.actions,
            failed_actions: tally.failed_actions,
            final_snapshot: game.snapshot(),
        })
    }

    fn play_turn(&self, game: &mut Game, tally: &mut Tally) -> Result<()> {
        let discards = self.strategy.choose_discards(game);
        if !discards.is_empty() {
            let result = self.processor.execute(DISCARD_CARDS, game, ActionPayload::Cards(discards));
            tally.record(&result);
        }

        let published = self.processor.execute(
            PUBLISH_CHALLENGES,
            game,
            ActionPayload::Count(self.config.challenges_per_turn),
        );
        tally.record(&published);
        let choices = match published.data {
            Some(ActionData::Challenges(cards)) => cards,
            _ => Vec::new(),
        };
        if let Some(index) = self.strategy.choose_challenge(game, &choices) {
            let challenge = choices[index].clone();
            let played = self.strategy.choose_played(game, &challenge);
            let result = self.processor.execute(
                CHALLENGE,
                game,
                ActionPayload::Challenge { challenge, played },
            );
            tally.record(&result);
            if let Some(ActionData::Challenge(outcome)) = &result.data {
                if outcome.success {
                    tally.challenges_won += 1;
                } else {
                    tally.challenges_lost += 1;
                }
            }
        }
        if game.is_terminal() {
            return Ok(());
        }

        for card in self.strategy.choose_purchases(game) {
            let result = self.processor.execute(BUY_INSURANCE, game, ActionPayload::Insurance(card));
            tally.record(&result);
            if result.success {
                tally.insurance_bought += 1;
            }
        }

        let missing = game
            .config()
            .starting_hand_size
            .saturating_sub(game.hand().len());
        if missing > 0 {
            let result = self.processor.execute(
                DRAW_CARDS,
                game,
                ActionPayload::Count(missing.min(MAX_DRAW)),
            );
            tally.record(&result);
        }

        let result = self.processor.execute(END_TURN, game, ActionPayload::Empty);
        tally.record(&result);
        Ok(())
    }
}
