//! Tabletop: the mutable root of a match

use crate::core::{
    Action, Card, CardId, Creature, EntityStore, Player, PlayerId, PlayerName, TurnId,
};
use crate::game::combat::{AttackingDecision, BlockingDecision};
use crate::game::phase::{Phase, Step};
use crate::game::strategy::Strategy;
use crate::zones::{CardZone, Zone};
use crate::{JudgeError, Result};

/// An action waiting on the stack
#[derive(Debug, Clone)]
pub struct StackItem {
    pub action: Action,
}

/// Complete state of one two-player match
///
/// Owned by the simulator for the lifetime of the match and lent to the
/// judges by `&mut` for each call.
#[derive(Debug)]
pub struct Tabletop {
    pub cards: EntityStore<Card>,
    players: [Player; 2],

    /// Index into `players` of the player whose turn it is
    active_idx: usize,

    /// `None` before the first phase
    pub phase: Option<Phase>,
    pub step: Option<Step>,
    pub turn_id: TurnId,

    pub priority: Option<PlayerId>,
    pub consecutive_passes: u8,

    pub battlefield: CardZone,
    pub stack: Vec<StackItem>,

    pub attacking: AttackingDecision,
    pub blocking: BlockingDecision,

    pub winner: Option<PlayerId>,

    next_entity_id: u32,
}

impl Tabletop {
    /// Create a tabletop with two fresh players (ids 0 and 1)
    pub fn new_two_player(
        player1_name: impl Into<PlayerName>,
        player2_name: impl Into<PlayerName>,
        starting_life: i32,
    ) -> Self {
        let p1 = Player::new(PlayerId::new(0), player1_name, starting_life);
        let p2 = Player::new(PlayerId::new(1), player2_name, starting_life);
        Self::with_players([p1, p2])
    }

    /// Create a tabletop from already-built players
    ///
    /// The first player starts as the active player.
    pub fn from_players(players: Vec<Player>) -> Result<Self> {
        let count = players.len();
        let players: [Player; 2] = players
            .try_into()
            .map_err(|_| JudgeError::InvalidPlayerCount(count))?;
        Ok(Self::with_players(players))
    }

    fn with_players(players: [Player; 2]) -> Self {
        let next_entity_id = players
            .iter()
            .map(|p| p.id.as_u32() + 1)
            .max()
            .unwrap_or(0);

        Tabletop {
            cards: EntityStore::new(),
            players,
            active_idx: 0,
            phase: None,
            step: None,
            turn_id: TurnId::PRE_GAME,
            priority: None,
            consecutive_passes: 0,
            battlefield: CardZone::new(Zone::Battlefield, None),
            stack: Vec::new(),
            attacking: AttackingDecision::None,
            blocking: BlockingDecision::None,
            winner: None,
            next_entity_id,
        }
    }

    pub fn players(&self) -> &[Player; 2] {
        &self.players
    }

    fn player_idx(&self, id: PlayerId) -> Result<usize> {
        self.players
            .iter()
            .position(|p| p.id == id)
            .ok_or(JudgeError::EntityNotFound(id.as_u32()))
    }

    pub fn player(&self, id: PlayerId) -> Result<&Player> {
        let idx = self.player_idx(id)?;
        Ok(&self.players[idx])
    }

    pub fn player_mut(&mut self, id: PlayerId) -> Result<&mut Player> {
        let idx = self.player_idx(id)?;
        Ok(&mut self.players[idx])
    }

    pub fn active_player(&self) -> &Player {
        &self.players[self.active_idx]
    }

    pub fn non_active_player(&self) -> &Player {
        &self.players[1 - self.active_idx]
    }

    pub fn active_player_id(&self) -> PlayerId {
        self.active_player().id
    }

    pub fn non_active_player_id(&self) -> PlayerId {
        self.non_active_player().id
    }

    pub fn is_active(&self, id: PlayerId) -> bool {
        self.active_player_id() == id
    }

    pub fn opponent_of(&self, id: PlayerId) -> Result<PlayerId> {
        let idx = self.player_idx(id)?;
        Ok(self.players[1 - idx].id)
    }

    /// Make `id` the active player
    pub fn set_active_player(&mut self, id: PlayerId) -> Result<()> {
        self.active_idx = self.player_idx(id)?;
        Ok(())
    }

    pub fn swap_active(&mut self) {
        self.active_idx = 1 - self.active_idx;
    }

    pub fn set_strategy(&mut self, id: PlayerId, strategy: Box<dyn Strategy>) -> Result<()> {
        self.player_mut(id)?.strategy = Some(strategy);
        Ok(())
    }

    pub fn card(&self, id: CardId) -> Result<&Card> {
        self.cards.get(id)
    }

    pub fn card_mut(&mut self, id: CardId) -> Result<&mut Card> {
        self.cards.get_mut(id)
    }

    /// Creature view of a card, if it is a creature
    pub fn creature(&self, id: CardId) -> Result<Option<Creature<'_>>> {
        Ok(Creature::view(self.card(id)?, self.turn_id))
    }

    pub fn next_card_id(&mut self) -> CardId {
        let id = CardId::new(self.next_entity_id);
        self.next_entity_id += 1;
        id
    }

    /// Create a card owned by `owner` and place it in `zone`
    pub fn create_card(
        &mut self,
        owner: PlayerId,
        zone: Zone,
        build: impl FnOnce(CardId) -> Card,
    ) -> Result<CardId> {
        self.player_idx(owner)?;
        let id = self.next_card_id();
        let mut card = build(id);
        card.owner = owner;
        card.controller = owner;
        self.cards.insert(id, card);
        self.place_card(id, owner, zone);
        Ok(id)
    }

    fn place_card(&mut self, card_id: CardId, owner: PlayerId, zone: Zone) {
        match zone {
            Zone::Battlefield => self.battlefield.add(card_id),
            Zone::Stack => {}
            _ => {
                if let Ok(player) = self.player_mut(owner) {
                    if let Some(cards) = player.zones.get_zone_mut(zone) {
                        cards.add(card_id);
                    }
                }
            }
        }
    }

    /// Move a card between zones
    ///
    /// Player zones are always the owner's. Entering the battlefield records
    /// the entry turn; leaving it clears tapped state and damage.
    pub fn move_card(&mut self, card_id: CardId, from: Zone, to: Zone) -> Result<()> {
        let owner = self.card(card_id)?.owner;

        let removed = match from {
            Zone::Battlefield => self.battlefield.remove(card_id),
            // Stack items are popped by the caller before the card moves on
            Zone::Stack => true,
            _ => self
                .player_mut(owner)?
                .zones
                .get_zone_mut(from)
                .is_some_and(|zone| zone.remove(card_id)),
        };

        if !removed {
            return Err(JudgeError::InvalidAction(format!(
                "Card {card_id} not found in {from:?}"
            )));
        }

        let turn = self.turn_id;
        let card = self.card_mut(card_id)?;
        if from == Zone::Battlefield {
            card.reset_permanent_state();
        }
        if to == Zone::Battlefield {
            card.entered_turn = Some(turn);
        }

        self.place_card(card_id, owner, to);
        Ok(())
    }

    /// Draw the top card of a player's library into their hand
    ///
    /// Returns `None` if the library is empty.
    pub fn draw_card(&mut self, player_id: PlayerId) -> Result<Option<CardId>> {
        let player = self.player_mut(player_id)?;
        let Some(card_id) = player.zones.library.draw_top() else {
            return Ok(None);
        };
        player.zones.hand.add(card_id);
        Ok(Some(card_id))
    }

    /// Untap every permanent controlled by `player_id`
    pub fn untap_all(&mut self, player_id: PlayerId) -> Result<()> {
        let ids: Vec<CardId> = self.battlefield.iter().collect();
        for id in ids {
            let card = self.card_mut(id)?;
            if card.controller == player_id {
                card.untap();
            }
        }
        Ok(())
    }

    /// Remove damage from every permanent
    pub fn clear_damage(&mut self) -> Result<()> {
        let ids: Vec<CardId> = self.battlefield.iter().collect();
        for id in ids {
            self.card_mut(id)?.damage = 0;
        }
        Ok(())
    }

    pub fn empty_mana_pools(&mut self) {
        for player in &mut self.players {
            player.empty_mana_pool();
        }
    }

    /// Permanents on the battlefield controlled by `player_id`, in battlefield order
    pub fn permanents_of(&self, player_id: PlayerId) -> impl Iterator<Item = &Card> + '_ {
        self.battlefield
            .iter()
            .filter_map(|id| self.cards.get(id).ok())
            .filter(move |card| card.controller == player_id)
    }

    /// Whether `player_id` has an action waiting on the stack
    pub fn has_pending_action(&self, player_id: PlayerId) -> bool {
        self.stack.iter().any(|item| item.action.owner == player_id)
    }
}
