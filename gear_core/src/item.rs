use crate::stat::StatVector;
use crate::types::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// An equippable item as supplied by the inventory layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// Unique instance id
    pub id: ItemId,
    /// Display name
    pub name: String,
    /// Equipment slot this item occupies
    pub slot: SlotId,
    /// Tier (rarity)
    #[serde(default)]
    pub tier: Tier,
    #[serde(default)]
    pub is_exotic: bool,
    /// Power level
    #[serde(default)]
    pub power: u32,
    /// Elemental burn
    #[serde(default)]
    pub burn: BurnType,
    /// Rolled stats, keyed by stat hash
    #[serde(default)]
    pub stats: Vec<ItemStat>,
    /// Socket layout, if the item has one
    #[serde(default)]
    pub sockets: Option<Sockets>,
}

impl Item {
    /// Create a bare item with no stats or sockets
    pub fn new(id: impl Into<ItemId>, name: impl Into<String>, slot: impl Into<SlotId>) -> Self {
        Item {
            id: id.into(),
            name: name.into(),
            slot: slot.into(),
            tier: Tier::default(),
            is_exotic: false,
            power: 0,
            burn: BurnType::default(),
            stats: Vec::new(),
            sockets: None,
        }
    }

    pub fn with_tier(mut self, tier: Tier) -> Self {
        self.tier = tier;
        self.is_exotic = tier == Tier::Exotic;
        self
    }

    pub fn with_power(mut self, power: u32) -> Self {
        self.power = power;
        self
    }

    pub fn with_burn(mut self, burn: BurnType) -> Self {
        self.burn = burn;
        self
    }

    pub fn with_stat(mut self, stat_hash: StatHash, base: i32, value: i32) -> Self {
        self.stats.push(ItemStat {
            stat_hash,
            base,
            value,
        });
        self
    }

    /// Append a socket, creating the socket layout if needed
    pub fn with_socket(mut self, socket: Socket) -> Self {
        self.sockets
            .get_or_insert_with(Sockets::default)
            .sockets
            .push(socket);
        self
    }

    pub fn with_socket_category(mut self, category_hash: CategoryHash) -> Self {
        self.sockets
            .get_or_insert_with(Sockets::default)
            .categories
            .push(SocketCategory {
                category_hash,
                socket_indexes: Vec::new(),
            });
        self
    }

    /// Look up a rolled stat by hash
    pub fn stat(&self, stat_hash: StatHash) -> Option<&ItemStat> {
        self.stats.iter().find(|s| s.stat_hash == stat_hash)
    }

    /// Base values for the tracked stats (missing stats read as 0)
    pub fn base_vector(&self, defs: &[StatDef]) -> StatVector {
        defs.iter()
            .map(|d| self.stat(d.hash).map(|s| s.base).unwrap_or(0))
            .collect::<Vec<_>>()
            .into()
    }

    /// Current values for the tracked stats (missing stats read as 0)
    pub fn current_vector(&self, defs: &[StatDef]) -> StatVector {
        defs.iter()
            .map(|d| self.stat(d.hash).map(|s| s.value).unwrap_or(0))
            .collect::<Vec<_>>()
            .into()
    }

    /// All sockets (empty when the item has no socket layout)
    pub fn sockets(&self) -> &[Socket] {
        self.sockets
            .as_ref()
            .map(|s| s.sockets.as_slice())
            .unwrap_or(&[])
    }

    /// Number of socket categories on the item
    pub fn socket_category_count(&self) -> usize {
        self.sockets.as_ref().map_or(0, |s| s.categories.len())
    }

    /// Sockets offering a choice between several plugs
    pub fn selectable_sockets(&self) -> impl Iterator<Item = &Socket> {
        self.sockets().iter().filter(|s| s.is_selectable())
    }

    /// Whether any socket offers the given plug as an option
    pub fn has_perk(&self, plug_hash: PlugHash) -> bool {
        self.sockets()
            .iter()
            .any(|socket| socket.plug_options.iter().any(|p| p.hash == plug_hash))
    }
}

/// A rolled stat on an item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemStat {
    pub stat_hash: StatHash,
    /// Value before any plug bonuses
    pub base: i32,
    /// Value with the currently inserted plugs
    pub value: i32,
}

/// Socket layout of an item
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Sockets {
    #[serde(default)]
    pub categories: Vec<SocketCategory>,
    #[serde(default)]
    pub sockets: Vec<Socket>,
}

/// A grouping of sockets (e.g. perks, mods)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocketCategory {
    pub category_hash: CategoryHash,
    #[serde(default)]
    pub socket_indexes: Vec<usize>,
}

/// A single socket: the inserted plug and the plugs it may be swapped to
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Socket {
    #[serde(default)]
    pub plug: Option<Plug>,
    #[serde(default)]
    pub plug_options: Vec<Plug>,
}

impl Socket {
    /// A socket whose options are also its inserted plug (first option)
    pub fn with_options(plug_options: Vec<Plug>) -> Self {
        Socket {
            plug: plug_options.first().cloned(),
            plug_options,
        }
    }

    /// More than one option means the player can choose
    pub fn is_selectable(&self) -> bool {
        self.plug_options.len() > 1
    }
}

/// A plug (perk or mod) that can occupy a socket
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plug {
    pub hash: PlugHash,
    #[serde(default)]
    pub name: String,
    /// Item categories this plug belongs to
    #[serde(default)]
    pub category_hashes: Vec<CategoryHash>,
    /// Stat bonuses granted while inserted
    #[serde(default)]
    pub investment_stats: Vec<InvestmentStat>,
}

impl Plug {
    pub fn new(hash: PlugHash, name: impl Into<String>) -> Self {
        Plug {
            hash,
            name: name.into(),
            category_hashes: Vec::new(),
            investment_stats: Vec::new(),
        }
    }

    pub fn with_bonus(mut self, stat_hash: StatHash, value: i32) -> Self {
        self.investment_stats.push(InvestmentStat { stat_hash, value });
        self
    }

    pub fn with_category(mut self, category_hash: CategoryHash) -> Self {
        self.category_hashes.push(category_hash);
        self
    }

    pub fn has_category(&self, category_hash: CategoryHash) -> bool {
        self.category_hashes.contains(&category_hash)
    }

    /// Bonus to one stat; the first matching entry wins
    pub fn bonus(&self, stat_hash: StatHash) -> i32 {
        self.investment_stats
            .iter()
            .find(|s| s.stat_hash == stat_hash)
            .map(|s| s.value)
            .unwrap_or(0)
    }

    /// Bonuses projected onto the tracked stats
    pub fn bonus_vector(&self, defs: &[StatDef]) -> StatVector {
        defs.iter()
            .map(|d| self.bonus(d.hash))
            .collect::<Vec<_>>()
            .into()
    }
}

/// A stat bonus granted by a plug
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvestmentStat {
    pub stat_hash: StatHash,
    pub value: i32,
}

impl fmt::Display for Plug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.name.is_empty() {
            write!(f, "#{}", self.hash)
        } else {
            write!(f, "{}", self.name)
        }
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "══ {} ══", self.name)?;
        write!(f, "{} {} ({}) {}", self.tier, self.slot, self.burn, self.power)?;

        if !self.stats.is_empty() {
            writeln!(f)?;
            writeln!(f)?;
            write!(f, "Stats")?;
            for stat in &self.stats {
                writeln!(f)?;
                write!(f, "  #{}: {} (base {})", stat.stat_hash, stat.value, stat.base)?;
            }
        }

        let selectable: Vec<&Socket> = self.selectable_sockets().collect();
        if !selectable.is_empty() {
            writeln!(f)?;
            writeln!(f)?;
            write!(f, "Perks")?;
            for socket in selectable {
                let options: Vec<String> =
                    socket.plug_options.iter().map(|p| p.to_string()).collect();
                writeln!(f)?;
                write!(f, "  {}", options.join(" | "))?;
            }
        }

        Ok(())
    }
}
