//! Combat scenarios played through full turns
//!
//! Each scenario seats scripted players, runs one turn and compares the
//! resulting board with the expected one.

use mtg_judge::config::GameConfig;
use mtg_judge::core::{Card, CardId, CardType, PlayerId};
use mtg_judge::game::{Combat, RoundJudge, ScriptedStrategy, Tabletop, TurnExecutor};
use mtg_judge::zones::Zone;
use similar_asserts::assert_eq;

fn creature(owner: PlayerId, name: &'static str, power: i32, toughness: i32) -> impl FnOnce(CardId) -> Card {
    move |id| {
        Card::new(id, name, owner)
            .with_type(CardType::Creature)
            .with_power_toughness(power, toughness)
    }
}

fn strings(names: &[&str]) -> Vec<String> {
    names.iter().map(|name| name.to_string()).collect()
}

struct Scenario {
    tabletop: Tabletop,
    alice: PlayerId,
    bob: PlayerId,
}

impl Scenario {
    fn new() -> Self {
        let mut tabletop = Tabletop::new_two_player("Alice", "Bob", 20);
        let alice = tabletop.active_player_id();
        let bob = tabletop.non_active_player_id();
        // One card each so the first draw succeeds
        for player in [alice, bob] {
            tabletop
                .create_card(player, Zone::Library, |id| {
                    Card::new(id, "Island", player).with_type(CardType::Land)
                })
                .unwrap();
        }
        Scenario { tabletop, alice, bob }
    }

    fn add(&mut self, owner: PlayerId, name: &'static str, power: i32, toughness: i32) -> CardId {
        self.tabletop
            .create_card(owner, Zone::Battlefield, creature(owner, name, power, toughness))
            .unwrap()
    }

    fn play_turn(&mut self, attack: &[CardId], blocks: Vec<Combat>) {
        let attacker = ScriptedStrategy::new().attack_with(attack.iter().copied());
        let defender = if blocks.is_empty() {
            ScriptedStrategy::new()
        } else {
            ScriptedStrategy::new().block_with(blocks)
        };
        self.tabletop.set_strategy(self.alice, Box::new(attacker)).unwrap();
        self.tabletop.set_strategy(self.bob, Box::new(defender)).unwrap();

        RoundJudge::from_config(&GameConfig::default())
            .execute_next_turn(&mut self.tabletop)
            .unwrap();
    }

    fn graveyard(&self, player: PlayerId) -> Vec<String> {
        self.tabletop
            .player(player)
            .unwrap()
            .zones
            .graveyard
            .iter()
            .map(|id| self.tabletop.card(id).unwrap().name.to_string())
            .collect()
    }

    /// Battlefield as "Name P/T", with a "tapped" suffix for tapped cards
    fn board(&self) -> Vec<String> {
        self.tabletop
            .battlefield
            .iter()
            .map(|id| {
                let card = self.tabletop.card(id).unwrap();
                let mut line = format!(
                    "{} {}/{}",
                    card.name,
                    card.power.unwrap_or(0),
                    card.toughness.unwrap_or(0)
                );
                if card.tapped {
                    line.push_str(" tapped");
                }
                line
            })
            .collect()
    }
}

#[test]
fn test_small_blocker_dies_and_attacker_survives() {
    let mut scenario = Scenario::new();
    let bears = scenario.add(scenario.alice, "Grizzly Bears", 2, 2);
    let wall = scenario.add(scenario.bob, "Wall of Wood", 1, 2);

    scenario.play_turn(&[bears], vec![Combat::new(bears, [wall])]);

    assert_eq!(scenario.graveyard(scenario.bob), strings(&["Wall of Wood"]));
    assert_eq!(scenario.board(), strings(&["Grizzly Bears 2/2 tapped"]));
    assert_eq!(scenario.tabletop.card(wall).unwrap().damage, 0);
    assert_eq!(scenario.tabletop.player(scenario.bob).unwrap().life, 20);
}

#[test]
fn test_trade() {
    let mut scenario = Scenario::new();
    let ogre = scenario.add(scenario.alice, "Gray Ogre", 2, 2);
    let bears = scenario.add(scenario.bob, "Grizzly Bears", 2, 2);

    scenario.play_turn(&[ogre], vec![Combat::new(ogre, [bears])]);

    assert_eq!(scenario.graveyard(scenario.alice), strings(&["Gray Ogre"]));
    assert_eq!(scenario.graveyard(scenario.bob), strings(&["Grizzly Bears"]));
    assert!(scenario.board().is_empty());
}

#[test]
fn test_double_block_assigns_in_declaration_order() {
    let mut scenario = Scenario::new();
    let giant = scenario.add(scenario.alice, "Hill Giant", 3, 3);
    let first = scenario.add(scenario.bob, "Goblin Piker", 2, 1);
    let second = scenario.add(scenario.bob, "Horned Turtle", 1, 4);

    scenario.play_turn(&[giant], vec![Combat::new(giant, [first, second])]);

    // Piker takes 1 and dies, turtle takes the other 2 and survives.
    // The giant takes 2 + 1 and dies
    assert_eq!(scenario.graveyard(scenario.alice), strings(&["Hill Giant"]));
    assert_eq!(scenario.graveyard(scenario.bob), strings(&["Goblin Piker"]));
    assert_eq!(scenario.board(), strings(&["Horned Turtle 1/4"]));
}

#[test]
fn test_blocked_and_unblocked_attackers() {
    let mut scenario = Scenario::new();
    let lions = scenario.add(scenario.alice, "Savannah Lions", 2, 1);
    let giant = scenario.add(scenario.alice, "Hill Giant", 3, 3);
    let turtle = scenario.add(scenario.bob, "Horned Turtle", 1, 4);

    scenario.play_turn(&[lions, giant], vec![Combat::new(giant, [turtle])]);

    assert_eq!(scenario.tabletop.player(scenario.bob).unwrap().life, 18);
    assert!(scenario.graveyard(scenario.bob).is_empty());
    assert_eq!(
        scenario.board(),
        strings(&["Savannah Lions 2/1 tapped", "Hill Giant 3/3 tapped", "Horned Turtle 1/4"])
    );
}

#[test]
fn test_lethal_attack_ends_the_turn() {
    let mut scenario = Scenario::new();
    scenario.tabletop.player_mut(scenario.bob).unwrap().life = 5;
    let wurm = scenario.add(scenario.alice, "Craw Wurm", 6, 4);

    scenario.play_turn(&[wurm], Vec::new());

    assert_eq!(scenario.tabletop.winner, Some(scenario.alice));
    assert_eq!(scenario.tabletop.player(scenario.bob).unwrap().life, -1);
}

#[test]
fn test_blocker_of_wrong_player_is_ignored() {
    let mut scenario = Scenario::new();
    let lions = scenario.add(scenario.alice, "Savannah Lions", 2, 1);
    let own = scenario.add(scenario.alice, "Eager Cadet", 1, 1);

    scenario.play_turn(&[lions], vec![Combat::new(lions, [own])]);

    assert_eq!(scenario.tabletop.player(scenario.bob).unwrap().life, 18);
    assert!(scenario.graveyard(scenario.alice).is_empty());
}
