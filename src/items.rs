//! Wearable items, player inventories, and equipped gear.
//!
//! Items are generated at startup and scattered across the world. Each one
//! occupies a single wear slot; wearing into an occupied slot displaces the
//! old piece back into the inventory.

use rand::Rng;

/// Body locations gear can occupy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WearSlot {
    Head,
    Chest,
    Arms,
    Hands,
    Waist,
    Legs,
    Boots,
}

impl WearSlot {
    pub const ALL: [WearSlot; 7] = [
        WearSlot::Head,
        WearSlot::Chest,
        WearSlot::Arms,
        WearSlot::Hands,
        WearSlot::Waist,
        WearSlot::Legs,
        WearSlot::Boots,
    ];

    pub fn index(self) -> usize {
        match self {
            WearSlot::Head => 0,
            WearSlot::Chest => 1,
            WearSlot::Arms => 2,
            WearSlot::Hands => 3,
            WearSlot::Waist => 4,
            WearSlot::Legs => 5,
            WearSlot::Boots => 6,
        }
    }

    fn base_names(self) -> &'static [&'static str] {
        match self {
            WearSlot::Head => &["Helmet", "Circlet", "Halo", "Helm", "Skull Cap", "Hood"],
            WearSlot::Chest => &[
                "Breast Plate",
                "Chain Mail",
                "Scale Mail",
                "Robes",
                "Tunic",
                "Vest",
            ],
            WearSlot::Arms => &["Sleeves", "Vambraces", "Arm Bands", "Arm Guards"],
            WearSlot::Hands => &["Gloves", "Gauntlets", "Mittens"],
            WearSlot::Waist => &["Belt", "Cord", "Sash", "Ribbon"],
            WearSlot::Legs => &["Legplates", "Greaves", "Pants", "Leggings"],
            WearSlot::Boots => &["Boots", "Sandals", "Shoes", "Plate Boots"],
        }
    }
}

const MATERIALS: &[&str] = &[
    "#yPyrite#n",
    "#WSteel#n",
    "#YGold#n",
    "#wGranite#n",
    "#wOnyx#n",
    "#WSilver#n",
    "#GEmerald#n",
    "#PTitanium#n",
    "#CCrystal#n",
    "#CDiamond#n",
    "#gMalachite#n",
    "#yLeather#n",
    "#CSilk#n",
    "#yBronze#n",
];

const MODIFIERS: &[&str] = &[
    "#Ya God#n",
    "#CHeaven#n",
    "#Ythe Blessed#n",
    "#Rthe King#n",
    "#Pa Seer#n",
    "#Gthe Lord#n",
    "#Wa Champion#n",
    "#ya Master#n",
];

/// A single wearable object.
#[derive(Debug, Clone)]
pub struct Item {
    pub id: u32,
    /// Full display name with color markup ("#WSteel#n Helmet of #Rthe King#n").
    pub name: String,
    /// Plain base name players type to reference the item ("Helmet").
    pub keyword: String,
    pub slot: WearSlot,
    pub level: u32,
}

impl Item {
    /// Markup color of the item's material, for the equipment drawing.
    pub fn tint(&self) -> &str {
        if self.name.len() >= 2 && self.name.starts_with('#') {
            &self.name[..2]
        } else {
            "#n"
        }
    }
}

/// Roll a random item for the world builder.
pub fn catalog_item(id: u32, rng: &mut impl Rng) -> Item {
    let slot = WearSlot::ALL[rng.gen_range(0..WearSlot::ALL.len())];
    let base = slot.base_names()[rng.gen_range(0..slot.base_names().len())];
    let material = MATERIALS[rng.gen_range(0..MATERIALS.len())];
    let modifier = MODIFIERS[rng.gen_range(0..MODIFIERS.len())];
    Item {
        id,
        name: format!("{material} {base} of {modifier}"),
        keyword: base.to_string(),
        slot,
        level: rng.gen_range(1..=20),
    }
}

/// Carried, unequipped items.
#[derive(Debug, Default)]
pub struct Inventory {
    items: Vec<Item>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, item: Item) {
        self.items.push(item);
    }

    /// Prefix match on the typed keyword, case-insensitively.
    pub fn find(&self, keyword: &str) -> Option<&Item> {
        let keyword = keyword.to_lowercase();
        self.items
            .iter()
            .find(|i| i.keyword.to_lowercase().starts_with(&keyword))
    }

    pub fn take(&mut self, id: u32) -> Option<Item> {
        let idx = self.items.iter().position(|i| i.id == id)?;
        Some(self.items.remove(idx))
    }

    /// Markup listing for the `inventory` command.
    pub fn display(&self) -> String {
        if self.items.is_empty() {
            return "(Empty)".to_string();
        }
        let mut out = String::new();
        for item in &self.items {
            out.push_str(&format!(
                "[#YItem#n: #y{:<20}#n]: {}#n\n\r",
                item.keyword, item.name
            ));
        }
        out
    }
}

/// Gear currently worn, one piece per slot.
#[derive(Debug, Default)]
pub struct Equipment {
    slots: [Option<Item>; 7],
}

impl Equipment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Equip `item`, returning the player message and any displaced piece.
    pub fn wear(&mut self, item: Item) -> (String, Option<Item>) {
        let idx = item.slot.index();
        let mut out = String::new();
        let displaced = self.slots[idx].take();
        if let Some(old) = &displaced {
            out.push_str(&format!("You remove {}.\n\r", old.name));
        }
        out.push_str(&format!("You equip {}.\n\r", item.name));
        self.slots[idx] = Some(item);
        (out, displaced)
    }

    /// Find a worn piece by keyword prefix.
    pub fn find(&self, keyword: &str) -> Option<&Item> {
        let keyword = keyword.to_lowercase();
        self.slots
            .iter()
            .flatten()
            .find(|i| i.keyword.to_lowercase().starts_with(&keyword))
    }

    /// Unequip the piece in `slot`, if any.
    pub fn remove(&mut self, slot: WearSlot) -> Option<Item> {
        self.slots[slot.index()].take()
    }

    pub fn worn(&self, slot: WearSlot) -> Option<&Item> {
        self.slots[slot.index()].as_ref()
    }

    /// The ASCII warrior, tinted by what is worn where.
    pub fn display(&self) -> String {
        let tint = |s: WearSlot| self.worn(s).map(|i| i.tint()).unwrap_or("#n").to_string();
        let label = |s: WearSlot| {
            self.worn(s)
                .map(|i| i.name.clone())
                .unwrap_or_else(|| "nothing.".to_string())
        };

        let head = tint(WearSlot::Head);
        let chest = tint(WearSlot::Chest);
        let arms = tint(WearSlot::Arms);
        let hands = tint(WearSlot::Hands);
        let waist = tint(WearSlot::Waist);
        let legs = tint(WearSlot::Legs);
        let boots = tint(WearSlot::Boots);

        let mut out = String::new();
        out.push_str(&format!("{head}         __     __#n\n\r"));
        out.push_str(&format!("{head}        / < ___ > \\#n\n\r"));
        out.push_str(&format!("{head}        '-._____.-'#n\n\r"));
        out.push_str(&format!(
            "{head}         ,#n| ^_^ |{head},\t\t#n[Head:\t{}#n]\n\r",
            label(WearSlot::Head)
        ));
        out.push_str("          ((())))\n\r");
        out.push_str("            | |  \n\r");
        out.push_str(&format!(
            "{arms}       ,{chest}############{arms}\\#n\t\t[Chest:\t{}#n]\n\r",
            label(WearSlot::Chest)
        ));
        out.push_str(&format!(
            "{arms}      /{chest}  #########{arms},  \\\t\t#n[Arms:\t{}#n]\n\r",
            label(WearSlot::Arms)
        ));
        out.push_str(&format!(
            "{arms}     /_<'{chest}#########{arms}'./_\\#n\t\t[Hands:\t{}#n]\n\r",
            label(WearSlot::Hands)
        ));
        out.push_str(&format!("{arms}    '_7_{chest} ######### {arms}_o_7#n\n\r"));
        out.push_str(&format!(
            "{hands}     (  \\{waist}[o-o-o-o]{hands}/  )#n\t\t[Belt:\t{}#n]\n\r",
            label(WearSlot::Waist)
        ));
        out.push_str(&format!("{hands}      \\|l{chest}#########{hands}l|/#n\n\r"));
        out.push_str(&format!("{chest}         ####_#### #n\n\r"));
        out.push_str(&format!("{legs}        /    |    \\ #n\n\r"));
        out.push_str(&format!(
            "{legs}        |    |    |#n\t\t[Legs:\t{}#n]\n\r",
            label(WearSlot::Legs)
        ));
        out.push_str(&format!(
            "{legs}        |{boots}_  _{legs}|{boots}_  _{boots}|#n\n\r"
        ));
        out.push_str(&format!("{boots}        |\\\\//|\\\\//|#n\n\r"));
        out.push_str(&format!(
            "{boots}        \\//\\\\|//\\\\/#n\t\t[Boots:\t{}#n]\n\r",
            label(WearSlot::Boots)
        ));
        out.push_str(&format!("{boots}      ___\\\\// \\\\//___#n\n\r"));
        out.push_str(&format!("{boots}     (((___X\\ /X___))) #n\n\r"));
        out.push_str("(Use the 'credits' command for ASCII Art author information)\n\r");
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn item(id: u32, keyword: &str, slot: WearSlot) -> Item {
        Item {
            id,
            name: format!("#WSteel#n {keyword} of #Rthe King#n"),
            keyword: keyword.to_string(),
            slot,
            level: 1,
        }
    }

    #[test]
    fn test_inventory_prefix_find() {
        let mut inv = Inventory::new();
        inv.add(item(1, "Helmet", WearSlot::Head));
        assert!(inv.find("hel").is_some());
        assert!(inv.find("HELMET").is_some());
        assert!(inv.find("boots").is_none());
    }

    #[test]
    fn test_inventory_display_empty() {
        assert_eq!(Inventory::new().display(), "(Empty)");
    }

    #[test]
    fn test_wear_displaces_old_piece() {
        let mut eq = Equipment::new();
        let (msg, old) = eq.wear(item(1, "Helmet", WearSlot::Head));
        assert!(old.is_none());
        assert!(msg.contains("You equip"));

        let (msg, old) = eq.wear(item(2, "Circlet", WearSlot::Head));
        assert_eq!(old.map(|i| i.id), Some(1));
        assert!(msg.contains("You remove"));
        assert!(msg.contains("You equip"));
        assert_eq!(eq.worn(WearSlot::Head).map(|i| i.id), Some(2));
    }

    #[test]
    fn test_remove_empties_slot() {
        let mut eq = Equipment::new();
        eq.wear(item(1, "Belt", WearSlot::Waist));
        assert!(eq.remove(WearSlot::Waist).is_some());
        assert!(eq.remove(WearSlot::Waist).is_none());
    }

    #[test]
    fn test_catalog_item_names_are_coherent() {
        let mut rng = StdRng::seed_from_u64(11);
        for id in 0..50 {
            let item = catalog_item(id, &mut rng);
            assert!(item.name.contains(&item.keyword));
            assert!((1..=20).contains(&item.level));
        }
    }

    #[test]
    fn test_tint_reads_leading_markup() {
        let it = item(1, "Helmet", WearSlot::Head);
        assert_eq!(it.tint(), "#W");
    }
}
