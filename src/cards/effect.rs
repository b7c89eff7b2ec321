//! Effect descriptors carried by cards.
//!
//! An effect is a tag plus an optional value and description. Tags are
//! open-ended: the action processor interprets the ones it knows about
//! (`Shield`, `Heal`, `Draw`, `PowerUp`) and every other tag is display-only.

use serde::{Deserialize, Serialize};

/// Effect tag.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectTag {
    /// Draw extra cards at end of turn.
    Draw,
    /// Restore vitality after a won challenge.
    Heal,
    /// Flavor for cards that raise power; power itself lives on the card.
    PowerUp,
    /// Insurance coverage applies to challenge-failure penalties.
    Shield,
    /// Any tag the engine does not interpret.
    Other(String),
}

impl EffectTag {
    /// Short name for display and logs.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            EffectTag::Draw => "draw",
            EffectTag::Heal => "heal",
            EffectTag::PowerUp => "power_up",
            EffectTag::Shield => "shield",
            EffectTag::Other(name) => name,
        }
    }
}

/// One effect on a card.
///
/// ```
/// use life_cards::cards::{Effect, EffectTag};
///
/// let shield = Effect::new(EffectTag::Shield).with_value(3).with_description("Absorbs 3");
/// assert_eq!(shield.value_or(0), 3);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Effect {
    pub tag: EffectTag,
    pub value: Option<i32>,
    pub description: Option<String>,
}

impl Effect {
    /// Create an effect with no value or description.
    #[must_use]
    pub fn new(tag: EffectTag) -> Self {
        Self {
            tag,
            value: None,
            description: None,
        }
    }

    #[must_use]
    pub fn with_value(mut self, value: i32) -> Self {
        self.value = Some(value);
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn shield() -> Self {
        Self::new(EffectTag::Shield)
    }

    pub fn heal(amount: i32) -> Self {
        Self::new(EffectTag::Heal).with_value(amount)
    }

    pub fn draw(count: i32) -> Self {
        Self::new(EffectTag::Draw).with_value(count)
    }

    pub fn power_up(amount: i32) -> Self {
        Self::new(EffectTag::PowerUp).with_value(amount)
    }

    /// Get the value, or `default` if unset.
    #[must_use]
    pub fn value_or(&self, default: i32) -> i32 {
        self.value.unwrap_or(default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builders() {
        let effect = Effect::heal(2).with_description("Rest");
        assert_eq!(effect.tag, EffectTag::Heal);
        assert_eq!(effect.value, Some(2));
        assert_eq!(effect.description.as_deref(), Some("Rest"));
        assert_eq!(Effect::shield().value_or(7), 7);
    }

    #[test]
    fn test_tag_names() {
        assert_eq!(EffectTag::PowerUp.name(), "power_up");
        assert_eq!(EffectTag::Other("sparkle".into()).name(), "sparkle");
    }

    #[test]
    fn test_serialization() {
        let effect = Effect::new(EffectTag::Other("luck".into())).with_value(1);
        let json = serde_json::to_string(&effect).unwrap();
        let back: Effect = serde_json::from_str(&json).unwrap();
        assert_eq!(effect, back);
    }
}
