//! Tower cards and the factory that turns them into entities.

use besieged_ecs::{Entity, Registry};
use glam::Vec2;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::components::{Cost, PlacedCard, Position, Sound, Sprite};

/// Size of a card sprite in UV units.
pub const CARD_SIZE: Vec2 = Vec2::new(0.02, 0.02);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardType {
    Ice,
    Fire,
    Technology,
    Lightning,
    Bow,
    Magic,
}

impl CardType {
    pub const ALL: [CardType; 6] = [
        CardType::Ice,
        CardType::Fire,
        CardType::Technology,
        CardType::Lightning,
        CardType::Bow,
        CardType::Magic,
    ];

    pub fn price(self) -> i32 {
        match self {
            CardType::Lightning => 500,
            _ => 100,
        }
    }

    pub fn texture(self) -> &'static str {
        match self {
            CardType::Ice => "cards/ice.png",
            CardType::Fire => "cards/fire.png",
            CardType::Technology => "cards/technology.png",
            CardType::Lightning => "cards/lightning.png",
            CardType::Bow => "cards/bow.png",
            CardType::Magic => "cards/magic.png",
        }
    }

    pub fn sound(self) -> &'static str {
        "sfx/card_placed.ogg"
    }
}

/// Create a card entity at `position`.
///
/// The entity is not admitted anywhere; the caller decides whether it is
/// replicated or local.
pub fn create_card(registry: &Registry, card_type: CardType, position: Vec2) -> Entity {
    let card = Entity::new();
    card.bind(registry)
        .insert(PlacedCard {
            x: position.x as i32,
            y: position.y as i32,
            card_type,
        })
        .insert(Position::new(position))
        .insert(Sprite {
            texture: card_type.texture().to_string(),
            size: CARD_SIZE,
            z_index: 0,
        })
        .insert(Sound {
            sound: card_type.sound().to_string(),
        })
        .insert(Cost {
            cost: card_type.price(),
        });
    debug!(%card, ?card_type, "Created card");
    card
}
