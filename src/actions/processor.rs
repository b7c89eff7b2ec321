//! Action dispatch.
//!
//! `ActionProcessor::execute` is the only entry point a presentation layer
//! needs. Every outcome, including unknown actions and rejected payloads,
//! comes back as an `ActionResult`. A failed action leaves the game exactly
//! as it was.

use std::rc::Rc;

use rustc_hash::FxHashMap;
use tracing::debug;

use super::handlers::{builtin_handlers, ActionHandler};
use super::result::{ActionData, ActionPayload, ActionRecord, ActionResult, Applied};
use crate::core::{GameError, Result};
use crate::game::Game;
use crate::telemetry::GameObserver;

/// Dispatches named actions to their handlers.
///
/// ## Usage
///
/// ```
/// use life_cards::actions::{ActionPayload, ActionProcessor};
/// use life_cards::core::GameConfig;
/// use life_cards::game::Game;
///
/// let mut game = Game::new(GameConfig::default()).unwrap();
/// let processor = ActionProcessor::new();
///
/// let result = processor.execute("draw_cards", &mut game, ActionPayload::Count(1));
/// assert!(result.success);
///
/// let result = processor.execute("teleport", &mut game, ());
/// assert_eq!(result.error.as_deref(), Some("unknown action type: teleport"));
/// ```
pub struct ActionProcessor {
    handlers: FxHashMap<&'static str, Box<dyn ActionHandler>>,
    observer: Option<Rc<dyn GameObserver>>,
}

impl ActionProcessor {
    /// Processor with every built-in action registered.
    #[must_use]
    pub fn new() -> Self {
        let mut processor = Self::empty();
        for handler in builtin_handlers() {
            processor.register(handler);
        }
        processor
    }

    /// Processor with no actions registered.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            handlers: FxHashMap::default(),
            observer: None,
        }
    }

    /// Register a handler, replacing any handler with the same name.
    pub fn register(&mut self, handler: Box<dyn ActionHandler>) {
        if self.handlers.insert(handler.name(), handler).is_some() {
            debug!("replaced an existing action handler");
        }
    }

    /// Attach an observer that sees every executed action.
    #[must_use]
    pub fn with_observer(mut self, observer: Rc<dyn GameObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Registered action names, sorted.
    #[must_use]
    pub fn action_names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.handlers.keys().copied().collect();
        names.sort_unstable();
        names
    }

    #[must_use]
    pub fn has_action(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    /// Run the action `name` against `game`.
    pub fn execute(
        &self,
        name: &str,
        game: &mut Game,
        payload: impl Into<ActionPayload>,
    ) -> ActionResult {
        let result = match self.dispatch(name, game, payload.into()) {
            Ok(applied) => ActionResult::ok(applied),
            Err(err) => {
                debug!(action = name, error = %err, "action rejected");
                ActionResult::failure(&err)
            }
        };

        if let Some(observer) = &self.observer {
            observer.on_action(&ActionRecord::new(name, game.turn(), &result));
            if let Some(ActionData::Turn(report)) = &result.data {
                observer.on_turn(report);
            }
        }
        result
    }

    fn dispatch(&self, name: &str, game: &mut Game, payload: ActionPayload) -> Result<Applied> {
        let handler = self
            .handlers
            .get(name)
            .ok_or_else(|| GameError::UnknownAction(name.to_string()))?;

        game.ensure_in_progress()?;
        handler.validate(&payload, game)?;

        let before = game.clone();
        match handler.apply(payload, game) {
            Ok(applied) => {
                debug!(
                    action = name,
                    effects = applied.effects.len(),
                    turn = game.turn(),
                    "action applied"
                );
                Ok(applied)
            }
            Err(err) => {
                *game = before;
                Err(err)
            }
        }
    }
}

impl Default for ActionProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ActionProcessor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActionProcessor")
            .field("actions", &self.action_names())
            .field("observed", &self.observer.is_some())
            .finish()
    }
}
