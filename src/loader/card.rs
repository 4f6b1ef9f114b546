//! Card script loader
//!
//! Cards are written as `Key:Value` lines:
//!
//! ```text
//! Name:Llanowar Elves
//! ManaCost:G
//! Types:Creature Elf Druid
//! PT:1/1
//! A:AB$ Mana | Cost$ T | Produced$ G
//! ```
//!
//! Several cards may share one file, separated by blank lines.

use crate::core::{Card, CardId, CardName, CardType, Cost, ManaAbility, ManaCost, PlayerId};
use crate::{JudgeError, Result};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use std::fs;
use std::path::Path;

/// Card script parser
pub struct CardLoader;

impl CardLoader {
    pub fn load_from_file(path: &Path) -> Result<Vec<CardDefinition>> {
        let content = fs::read_to_string(path)?;
        Self::parse_many(&content)
    }

    /// Parse every card in `content`; cards are separated by blank lines
    pub fn parse_many(content: &str) -> Result<Vec<CardDefinition>> {
        let mut definitions = Vec::new();
        let mut block = String::new();

        for line in content.lines().chain(std::iter::once("")) {
            if line.trim().is_empty() {
                if !block.trim().is_empty() {
                    definitions.push(Self::parse(&block)?);
                }
                block.clear();
            } else {
                block.push_str(line);
                block.push('\n');
            }
        }

        Ok(definitions)
    }

    /// Parse a single card
    pub fn parse(content: &str) -> Result<CardDefinition> {
        let mut name = None;
        let mut mana_cost = ManaCost::new();
        let mut types = Vec::new();
        let mut power = None;
        let mut toughness = None;
        let mut mana_abilities = Vec::new();

        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let Some((key, value)) = line.split_once(':') else {
                continue;
            };
            let value = value.trim();

            match key.trim() {
                "Name" => name = Some(CardName::new(value)),
                "ManaCost" => {
                    mana_cost = ManaCost::parse(value)
                        .ok_or_else(|| JudgeError::InvalidDeckFormat(format!("Mana cost out of range: {value}")))?;
                }
                "Types" => {
                    for part in value.split_whitespace() {
                        let card_type = match part {
                            "Land" => CardType::Land,
                            "Creature" => CardType::Creature,
                            "Artifact" => CardType::Artifact,
                            "Enchantment" => CardType::Enchantment,
                            "Sorcery" => CardType::Sorcery,
                            "Instant" => CardType::Instant,
                            // Subtypes carry no rules here
                            _ => continue,
                        };
                        if !types.contains(&card_type) {
                            types.push(card_type);
                        }
                    }
                }
                "PT" => {
                    if let Some((p, t)) = value.split_once('/') {
                        power = p.trim().parse().ok();
                        toughness = t.trim().parse().ok();
                    }
                }
                "A" => {
                    if let Some(ability) = Self::parse_mana_ability(value) {
                        mana_abilities.push(ability);
                    }
                }
                _ => {}
            }
        }

        let name = name.ok_or_else(|| JudgeError::InvalidDeckFormat("Card without a Name line".to_string()))?;

        Ok(CardDefinition {
            name,
            mana_cost,
            types,
            power,
            toughness,
            mana_abilities,
        })
    }

    /// `AB$ Mana | Cost$ T | Produced$ G`; other abilities are ignored
    fn parse_mana_ability(script: &str) -> Option<ManaAbility> {
        let mut parts = script.split('|').map(str::trim);
        if parts.next()? != "AB$ Mana" {
            return None;
        }

        let mut cost = Cost::None;
        let mut produced = None;
        for part in parts {
            if let Some(value) = part.strip_prefix("Cost$") {
                cost = Cost::parse(value);
            } else if let Some(value) = part.strip_prefix("Produced$") {
                produced = Some(ManaCost::from_string(value.trim()).colored);
            }
        }

        Some(ManaAbility {
            cost,
            produces: produced?,
        })
    }
}

/// Card definition (not yet instantiated in a game)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardDefinition {
    pub name: CardName,
    pub mana_cost: ManaCost,
    pub types: Vec<CardType>,
    pub power: Option<i32>,
    pub toughness: Option<i32>,
    pub mana_abilities: Vec<ManaAbility>,
}

impl CardDefinition {
    /// Create a Card instance from this definition
    pub fn instantiate(&self, id: CardId, owner: PlayerId) -> Card {
        let mut card = Card::new(id, self.name.clone(), owner);
        card.mana_cost = self.mana_cost;
        card.types = SmallVec::from_slice(&self.types);
        card.power = self.power;
        card.toughness = self.toughness;
        card.mana_abilities = self.mana_abilities.iter().cloned().collect();
        card
    }
}

/// Card scripts compiled into the binary
const BUILTIN_CARDS: &str = "\
Name:Plains
Types:Basic Land Plains
A:AB$ Mana | Cost$ T | Produced$ W

Name:Island
Types:Basic Land Island
A:AB$ Mana | Cost$ T | Produced$ U

Name:Swamp
Types:Basic Land Swamp
A:AB$ Mana | Cost$ T | Produced$ B

Name:Mountain
Types:Basic Land Mountain
A:AB$ Mana | Cost$ T | Produced$ R

Name:Forest
Types:Basic Land Forest
A:AB$ Mana | Cost$ T | Produced$ G

Name:Mind Stone
ManaCost:2
Types:Artifact
A:AB$ Mana | Cost$ T | Produced$ C

Name:Eager Cadet
ManaCost:W
Types:Creature Human Soldier
PT:1/1

Name:Savannah Lions
ManaCost:W
Types:Creature Cat
PT:2/1

Name:Youthful Knight
ManaCost:1W
Types:Creature Human Knight
PT:2/1

Name:Standing Troops
ManaCost:2W
Types:Creature Human Soldier
PT:1/4

Name:Serra Angel
ManaCost:3WW
Types:Creature Angel
PT:4/4

Name:Merfolk of the Pearl Trident
ManaCost:U
Types:Creature Merfolk
PT:1/1

Name:Coral Merfolk
ManaCost:1U
Types:Creature Merfolk
PT:2/1

Name:Horned Turtle
ManaCost:2U
Types:Creature Turtle
PT:1/4

Name:Wall of Air
ManaCost:1UU
Types:Creature Wall
PT:1/5

Name:Air Elemental
ManaCost:3UU
Types:Creature Elemental
PT:4/4

Name:Walking Corpse
ManaCost:1B
Types:Creature Zombie
PT:2/2

Name:Hypnotic Specter
ManaCost:1BB
Types:Creature Specter
PT:2/2

Name:Feral Shadow
ManaCost:2B
Types:Creature Nightstalker
PT:2/1

Name:Serpent Warrior
ManaCost:2B
Types:Creature Snake Warrior
PT:3/3

Name:Bog Wraith
ManaCost:3B
Types:Creature Wraith
PT:3/3

Name:Raging Goblin
ManaCost:R
Types:Creature Goblin Berserker
PT:1/1

Name:Goblin Piker
ManaCost:1R
Types:Creature Goblin Warrior
PT:2/1

Name:Gray Ogre
ManaCost:2R
Types:Creature Ogre
PT:2/2

Name:Hill Giant
ManaCost:3R
Types:Creature Giant
PT:3/3

Name:Fire Elemental
ManaCost:3RR
Types:Creature Elemental
PT:5/4

Name:Llanowar Elves
ManaCost:G
Types:Creature Elf Druid
PT:1/1
A:AB$ Mana | Cost$ T | Produced$ G

Name:Grizzly Bears
ManaCost:1G
Types:Creature Bear
PT:2/2

Name:Centaur Courser
ManaCost:2G
Types:Creature Centaur Warrior
PT:3/3

Name:Giant Spider
ManaCost:3G
Types:Creature Spider
PT:2/4

Name:Craw Wurm
ManaCost:4GG
Types:Creature Wurm
PT:6/4
";

/// Card definitions by name
#[derive(Debug, Clone, Default)]
pub struct CardPool {
    cards: FxHashMap<String, CardDefinition>,
}

impl CardPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pool holding every built-in card
    pub fn builtin() -> Result<Self> {
        let mut pool = Self::new();
        pool.extend(CardLoader::parse_many(BUILTIN_CARDS)?);
        Ok(pool)
    }

    /// Add definitions; a later card replaces an earlier one of the same name
    pub fn extend(&mut self, definitions: impl IntoIterator<Item = CardDefinition>) {
        for definition in definitions {
            self.cards.insert(definition.name.as_str().to_string(), definition);
        }
    }

    pub fn get(&self, name: &str) -> Option<&CardDefinition> {
        self.cards.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.cards.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Color, ManaPool};

    #[test]
    fn test_parse_creature() {
        let content = r#"
Name:Grizzly Bears
ManaCost:1G
Types:Creature Bear
PT:2/2
Oracle:
"#;

        let card = CardLoader::parse(content).unwrap();
        assert_eq!(card.name.as_str(), "Grizzly Bears");
        assert_eq!(card.mana_cost.generic, 1);
        assert_eq!(card.mana_cost.colored.get(Color::Green), 1);
        assert_eq!(card.types, vec![CardType::Creature]);
        assert_eq!(card.power, Some(2));
        assert_eq!(card.toughness, Some(2));
        assert!(card.mana_abilities.is_empty());
    }

    #[test]
    fn test_parse_mana_ability() {
        let card = CardLoader::parse("Name:Mind Stone\nManaCost:2\nTypes:Artifact\nA:AB$ Mana | Cost$ T | Produced$ C").unwrap();
        assert_eq!(
            card.mana_abilities,
            vec![ManaAbility {
                cost: Cost::Tapping,
                produces: ManaPool::of(Color::Colorless, 1),
            }]
        );
    }

    #[test]
    fn test_non_mana_abilities_are_ignored() {
        let card = CardLoader::parse("Name:Shock\nManaCost:R\nTypes:Instant\nA:SP$ DealDamage | NumDmg$ 2").unwrap();
        assert!(card.mana_abilities.is_empty());
        assert_eq!(card.types, vec![CardType::Instant]);
    }

    #[test]
    fn test_missing_name() {
        assert!(matches!(
            CardLoader::parse("ManaCost:1G\nPT:2/2"),
            Err(JudgeError::InvalidDeckFormat(_))
        ));
    }

    #[test]
    fn test_oversized_mana_cost_is_rejected() {
        assert!(matches!(
            CardLoader::parse("Name:Colossus\nManaCost:300\nTypes:Artifact Creature\nPT:9/9"),
            Err(JudgeError::InvalidDeckFormat(_))
        ));
    }

    #[test]
    fn test_builtin_pool() {
        let pool = CardPool::builtin().unwrap();
        assert_eq!(pool.len(), 31);

        let elves = pool.get("Llanowar Elves").unwrap();
        assert_eq!(elves.mana_abilities.len(), 1);
        assert!(pool.get("Forest").unwrap().types.contains(&CardType::Land));
        assert!(!pool.contains("Black Lotus"));
    }

    #[test]
    fn test_instantiate() {
        let pool = CardPool::builtin().unwrap();
        let card = pool
            .get("Craw Wurm")
            .unwrap()
            .instantiate(CardId::new(7), PlayerId::new(1));
        assert_eq!(card.id, CardId::new(7));
        assert_eq!(card.owner, PlayerId::new(1));
        assert_eq!(card.controller, PlayerId::new(1));
        assert!(card.is_creature());
        assert_eq!(card.mana_cost.cmc(), 6);
        assert!(!card.tapped);
    }
}
