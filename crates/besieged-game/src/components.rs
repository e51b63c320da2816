//! Plain data components for the tower-defense game.
//!
//! Components with a restricted domain validate on construction and in their
//! setters; a rejected value leaves the previous one in place.

use besieged_core::Color;
use besieged_ecs::ValidationError;
use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::card::CardType;

fn non_negative(field: &'static str, value: i32) -> Result<i32, ValidationError> {
    if value < 0 {
        return Err(ValidationError::Negative {
            field,
            value: value.into(),
        });
    }
    Ok(value)
}

/// Hit points of an enemy or the village.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "HealthRepr")]
pub struct Health {
    health: i32,
    max_health: i32,
}

impl Health {
    /// Full health at `max_health`.
    pub fn new(max_health: i32) -> Result<Self, ValidationError> {
        let max_health = non_negative("max_health", max_health)?;
        Ok(Self {
            health: max_health,
            max_health,
        })
    }

    pub fn health(&self) -> i32 {
        self.health
    }

    pub fn max_health(&self) -> i32 {
        self.max_health
    }

    pub fn set_health(&mut self, health: i32) -> Result<(), ValidationError> {
        let health = non_negative("health", health)?;
        if health > self.max_health {
            return Err(ValidationError::AboveMaximum {
                field: "health",
                value: health.into(),
                max: self.max_health.into(),
            });
        }
        self.health = health;
        Ok(())
    }

    /// Subtract `amount`, stopping at zero. Returns the remaining health.
    pub fn take_damage(&mut self, amount: i32) -> Result<i32, ValidationError> {
        let amount = non_negative("damage", amount)?;
        self.health = self.health.saturating_sub(amount).max(0);
        Ok(self.health)
    }

    pub fn restore(&mut self) {
        self.health = self.max_health;
    }

    pub fn is_dead(&self) -> bool {
        self.health == 0
    }
}

/// Price of a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "CostRepr")]
pub struct Cost {
    pub(crate) cost: i32,
}

impl Cost {
    pub fn new(cost: i32) -> Result<Self, ValidationError> {
        Ok(Self {
            cost: non_negative("cost", cost)?,
        })
    }

    pub fn cost(&self) -> i32 {
        self.cost
    }

    pub fn set_cost(&mut self, cost: i32) -> Result<(), ValidationError> {
        self.cost = non_negative("cost", cost)?;
        Ok(())
    }
}

/// A money balance, or the reward an enemy pays out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "MoneyRepr")]
pub struct Money {
    amount: i32,
}

impl Money {
    pub fn new(amount: i32) -> Result<Self, ValidationError> {
        Ok(Self {
            amount: non_negative("money", amount)?,
        })
    }

    pub fn amount(&self) -> i32 {
        self.amount
    }

    pub fn credit(&mut self, amount: i32) -> Result<(), ValidationError> {
        let amount = non_negative("credit", amount)?;
        self.amount = self.amount.saturating_add(amount);
        Ok(())
    }

    /// Withdraw `amount`. Fails without changing the balance if it would go negative.
    pub fn debit(&mut self, amount: i32) -> Result<(), ValidationError> {
        let amount = non_negative("debit", amount)?;
        self.amount = non_negative("money", self.amount - amount)?;
        Ok(())
    }
}

// Wire shapes of the validated components. Decoding goes through the same
// checks as the constructors.

#[derive(Deserialize)]
struct HealthRepr {
    health: i32,
    max_health: i32,
}

impl TryFrom<HealthRepr> for Health {
    type Error = ValidationError;

    fn try_from(repr: HealthRepr) -> Result<Self, Self::Error> {
        let mut health = Health::new(repr.max_health)?;
        health.set_health(repr.health)?;
        Ok(health)
    }
}

#[derive(Deserialize)]
struct CostRepr {
    cost: i32,
}

impl TryFrom<CostRepr> for Cost {
    type Error = ValidationError;

    fn try_from(repr: CostRepr) -> Result<Self, Self::Error> {
        Cost::new(repr.cost)
    }
}

#[derive(Deserialize)]
struct MoneyRepr {
    amount: i32,
}

impl TryFrom<MoneyRepr> for Money {
    type Error = ValidationError;

    fn try_from(repr: MoneyRepr) -> Result<Self, Self::Error> {
        Money::new(repr.amount)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub position: Vec2,
    pub z_index: i32,
}

impl Position {
    pub fn new(position: Vec2) -> Self {
        Self {
            position,
            z_index: 0,
        }
    }
}

/// On-screen text, e.g. the HUD in the corner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Text {
    pub text: String,
    pub font_scale: Vec2,
    pub color: Color,
}

impl Text {
    pub fn new(text: impl Into<String>, font_scale: Vec2) -> Self {
        Self {
            text: text.into(),
            font_scale,
            color: Color::BLACK,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sprite {
    pub texture: String,
    pub size: Vec2,
    pub z_index: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sound {
    pub sound: String,
}

/// A card placed on the board at a tile coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacedCard {
    pub x: i32,
    pub y: i32,
    pub card_type: CardType,
}

/// Marks the village the enemies are marching on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Village;

/// Damage queued against an entity, consumed by the damage system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingDamage(pub i32);
