//! Automated playtesting.
//!
//! Runs many seeded games back to back through the public action API and
//! reports how they ended. Useful for balancing difficulty settings and as
//! a determinism regression check: the same configuration always produces
//! the same report.
//!
//! ## Usage
//!
//! ```
//! use life_cards::playtest::{PlaytestConfig, PlaytestRunner};
//!
//! let config = PlaytestConfig::default().with_games(2).with_max_turns(20);
//! let report = PlaytestRunner::new(config).run().unwrap();
//! assert_eq!(report.games.len(), 2);
//! ```

pub mod runner;
pub mod strategy;

pub use runner::{GameSummary, PlaytestConfig, PlaytestReport, PlaytestRunner};
pub use strategy::{GreedyStrategy, Strategy};
