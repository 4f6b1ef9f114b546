//! Game zones (Library, Hand, Graveyard, Battlefield, Stack)

use crate::core::{CardId, PlayerId};
use serde::{Deserialize, Serialize};

/// Different zones where cards can exist
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Zone {
    Library,
    Hand,
    Battlefield,
    Graveyard,
    /// Cards being played; tracked by the tabletop's stack, not a `CardZone`
    Stack,
}

/// An ordered collection of cards
///
/// The last card of a library is its top.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardZone {
    pub zone_type: Zone,

    /// `None` for the shared battlefield
    pub owner: Option<PlayerId>,

    pub cards: Vec<CardId>,
}

impl CardZone {
    pub fn new(zone_type: Zone, owner: Option<PlayerId>) -> Self {
        CardZone {
            zone_type,
            owner,
            cards: Vec::new(),
        }
    }

    pub fn add(&mut self, card_id: CardId) {
        self.cards.push(card_id);
    }

    pub fn remove(&mut self, card_id: CardId) -> bool {
        if let Some(pos) = self.cards.iter().position(|&id| id == card_id) {
            // Order-preserving so battlefield and hand iteration stay deterministic.
            self.cards.remove(pos);
            true
        } else {
            false
        }
    }

    pub fn contains(&self, card_id: CardId) -> bool {
        self.cards.contains(&card_id)
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = CardId> + '_ {
        self.cards.iter().copied()
    }

    /// Draw from top (for Library)
    pub fn draw_top(&mut self) -> Option<CardId> {
        self.cards.pop()
    }

    pub fn peek_top(&self) -> Option<CardId> {
        self.cards.last().copied()
    }

    /// Reorder cards so position `i` holds the card previously at `indexes[i]`
    ///
    /// Indexes that are out of range or repeated leave the zone unchanged and
    /// return false.
    pub fn reorder(&mut self, indexes: &[usize]) -> bool {
        if indexes.len() != self.cards.len() {
            return false;
        }
        let mut seen = vec![false; indexes.len()];
        for &i in indexes {
            if i >= seen.len() || seen[i] {
                return false;
            }
            seen[i] = true;
        }
        self.cards = indexes.iter().map(|&i| self.cards[i]).collect();
        true
    }
}

/// The zones a single player owns
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerZones {
    pub library: CardZone,
    pub hand: CardZone,
    pub graveyard: CardZone,
}

impl PlayerZones {
    pub fn new(player_id: PlayerId) -> Self {
        PlayerZones {
            library: CardZone::new(Zone::Library, Some(player_id)),
            hand: CardZone::new(Zone::Hand, Some(player_id)),
            graveyard: CardZone::new(Zone::Graveyard, Some(player_id)),
        }
    }

    pub fn get_zone(&self, zone: Zone) -> Option<&CardZone> {
        match zone {
            Zone::Library => Some(&self.library),
            Zone::Hand => Some(&self.hand),
            Zone::Graveyard => Some(&self.graveyard),
            Zone::Battlefield | Zone::Stack => None,
        }
    }

    pub fn get_zone_mut(&mut self, zone: Zone) -> Option<&mut CardZone> {
        match zone {
            Zone::Library => Some(&mut self.library),
            Zone::Hand => Some(&mut self.hand),
            Zone::Graveyard => Some(&mut self.graveyard),
            Zone::Battlefield | Zone::Stack => None,
        }
    }
}
