//! Block id constants and the block property registry

use serde::{Deserialize, Serialize};

/// Built-in block ids (classic block table, 0-49)
pub struct Block;

impl Block {
    pub const AIR: u8 = 0;
    pub const STONE: u8 = 1;
    pub const GRASS: u8 = 2;
    pub const DIRT: u8 = 3;
    pub const COBBLESTONE: u8 = 4;
    pub const WOOD: u8 = 5;
    pub const SAPLING: u8 = 6;
    pub const BEDROCK: u8 = 7;
    pub const WATER: u8 = 8;
    pub const STILL_WATER: u8 = 9;
    pub const LAVA: u8 = 10;
    pub const STILL_LAVA: u8 = 11;
    pub const SAND: u8 = 12;
    pub const GRAVEL: u8 = 13;
    pub const GOLD_ORE: u8 = 14;
    pub const IRON_ORE: u8 = 15;
    pub const COAL_ORE: u8 = 16;
    pub const LOG: u8 = 17;
    pub const LEAVES: u8 = 18;
    pub const SPONGE: u8 = 19;
    pub const GLASS: u8 = 20;

    // Cloth blocks (21-36)
    pub const RED: u8 = 21;
    pub const ORANGE: u8 = 22;
    pub const YELLOW: u8 = 23;
    pub const LIME: u8 = 24;
    pub const GREEN: u8 = 25;
    pub const TEAL: u8 = 26;
    pub const AQUA: u8 = 27;
    pub const CYAN: u8 = 28;
    pub const BLUE: u8 = 29;
    pub const INDIGO: u8 = 30;
    pub const VIOLET: u8 = 31;
    pub const MAGENTA: u8 = 32;
    pub const PINK: u8 = 33;
    pub const BLACK: u8 = 34;
    pub const GRAY: u8 = 35;
    pub const WHITE: u8 = 36;

    pub const DANDELION: u8 = 37;
    pub const ROSE: u8 = 38;
    pub const BROWN_MUSHROOM: u8 = 39;
    pub const RED_MUSHROOM: u8 = 40;
    pub const GOLD: u8 = 41;
    pub const IRON: u8 = 42;
    pub const DOUBLE_SLAB: u8 = 43;
    pub const SLAB: u8 = 44;
    pub const BRICK: u8 = 45;
    pub const TNT: u8 = 46;
    pub const BOOKSHELF: u8 = 47;
    pub const MOSSY_ROCKS: u8 = 48;
    pub const OBSIDIAN: u8 = 49;

    /// True for the four liquid ids (flowing and still variants)
    pub fn is_liquid(id: u8) -> bool {
        (Self::WATER..=Self::STILL_LAVA).contains(&id)
    }

    pub fn is_water(id: u8) -> bool {
        id == Self::WATER || id == Self::STILL_WATER
    }

    pub fn is_lava(id: u8) -> bool {
        id == Self::LAVA || id == Self::STILL_LAVA
    }
}

/// How a block occupies its cell physically
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Collide {
    /// Fills the cell (stone, dirt, ores)
    Solid,
    /// Fluid cell (water, lava)
    Liquid,
    /// Can be walked through (air, plants, flowers)
    WalkThrough,
}

/// Definition of a block type's physical properties
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BlockDef {
    pub id: u8,
    pub name: String,
    pub collide: Collide,
    /// Whether this block stops sunlight from reaching cells below it
    pub blocks_light: bool,
}

impl Default for BlockDef {
    fn default() -> Self {
        Self {
            id: 0,
            name: "unknown".to_string(),
            collide: Collide::Solid,
            blocks_light: true,
        }
    }
}

/// Registry of all block definitions
pub struct Blocks {
    defs: Vec<BlockDef>,
}

impl Blocks {
    pub fn new() -> Self {
        let mut blocks = Self { defs: Vec::new() };
        blocks.register_defaults();
        blocks
    }

    fn register_defaults(&mut self) {
        // Most classic blocks are opaque solids; register the full table with
        // a helper and override the exceptions below.
        let solids: &[(u8, &str)] = &[
            (Block::STONE, "stone"),
            (Block::GRASS, "grass"),
            (Block::DIRT, "dirt"),
            (Block::COBBLESTONE, "cobblestone"),
            (Block::WOOD, "wood"),
            (Block::BEDROCK, "bedrock"),
            (Block::SAND, "sand"),
            (Block::GRAVEL, "gravel"),
            (Block::GOLD_ORE, "gold_ore"),
            (Block::IRON_ORE, "iron_ore"),
            (Block::COAL_ORE, "coal_ore"),
            (Block::LOG, "log"),
            (Block::SPONGE, "sponge"),
            (Block::RED, "red_cloth"),
            (Block::ORANGE, "orange_cloth"),
            (Block::YELLOW, "yellow_cloth"),
            (Block::LIME, "lime_cloth"),
            (Block::GREEN, "green_cloth"),
            (Block::TEAL, "teal_cloth"),
            (Block::AQUA, "aqua_cloth"),
            (Block::CYAN, "cyan_cloth"),
            (Block::BLUE, "blue_cloth"),
            (Block::INDIGO, "indigo_cloth"),
            (Block::VIOLET, "violet_cloth"),
            (Block::MAGENTA, "magenta_cloth"),
            (Block::PINK, "pink_cloth"),
            (Block::BLACK, "black_cloth"),
            (Block::GRAY, "gray_cloth"),
            (Block::WHITE, "white_cloth"),
            (Block::GOLD, "gold"),
            (Block::IRON, "iron"),
            (Block::DOUBLE_SLAB, "double_slab"),
            (Block::BRICK, "brick"),
            (Block::TNT, "tnt"),
            (Block::BOOKSHELF, "bookshelf"),
            (Block::MOSSY_ROCKS, "mossy_rocks"),
            (Block::OBSIDIAN, "obsidian"),
        ];
        for &(id, name) in solids {
            self.register(BlockDef {
                id,
                name: name.to_string(),
                collide: Collide::Solid,
                blocks_light: true,
            });
        }

        self.register(BlockDef {
            id: Block::AIR,
            name: "air".to_string(),
            collide: Collide::WalkThrough,
            blocks_light: false,
        });

        // Liquids cast shadows (classic underwater darkness)
        for (id, name) in [
            (Block::WATER, "water"),
            (Block::STILL_WATER, "still_water"),
            (Block::LAVA, "lava"),
            (Block::STILL_LAVA, "still_lava"),
        ] {
            self.register(BlockDef {
                id,
                name: name.to_string(),
                collide: Collide::Liquid,
                blocks_light: true,
            });
        }

        // Plants let sunlight through and do not collide
        for (id, name) in [
            (Block::SAPLING, "sapling"),
            (Block::DANDELION, "dandelion"),
            (Block::ROSE, "rose"),
            (Block::BROWN_MUSHROOM, "brown_mushroom"),
            (Block::RED_MUSHROOM, "red_mushroom"),
        ] {
            self.register(BlockDef {
                id,
                name: name.to_string(),
                collide: Collide::WalkThrough,
                blocks_light: false,
            });
        }

        // Translucent or partial solids
        self.register(BlockDef {
            id: Block::GLASS,
            name: "glass".to_string(),
            collide: Collide::Solid,
            blocks_light: false,
        });
        self.register(BlockDef {
            id: Block::LEAVES,
            name: "leaves".to_string(),
            collide: Collide::Solid,
            blocks_light: false,
        });
        self.register(BlockDef {
            id: Block::SLAB,
            name: "slab".to_string(),
            collide: Collide::Solid,
            blocks_light: false,
        });
    }

    fn register(&mut self, def: BlockDef) {
        let id = def.id as usize;

        // Ensure vec is large enough
        if self.defs.len() <= id {
            self.defs.resize(id + 1, BlockDef::default());
        }

        self.defs[id] = def;
    }

    /// Get a block definition by id; unknown ids resolve to the id-0 entry
    pub fn get(&self, id: u8) -> &BlockDef {
        self.defs.get(id as usize).unwrap_or(&self.defs[0])
    }

    pub fn blocks_light(&self, id: u8) -> bool {
        self.get(id).blocks_light
    }

    pub fn collide(&self, id: u8) -> Collide {
        self.get(id).collide
    }
}

impl Default for Blocks {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_liquid_ids() {
        assert!(Block::is_liquid(Block::WATER));
        assert!(Block::is_liquid(Block::STILL_LAVA));
        assert!(!Block::is_liquid(Block::AIR));
        assert!(!Block::is_liquid(Block::SAND));
        assert!(Block::is_water(Block::STILL_WATER));
        assert!(!Block::is_water(Block::LAVA));
        assert!(Block::is_lava(Block::STILL_LAVA));
    }

    #[test]
    fn test_registry_defaults() {
        let blocks = Blocks::new();
        assert_eq!(blocks.get(Block::STONE).name, "stone");
        assert_eq!(blocks.collide(Block::WATER), Collide::Liquid);
        assert_eq!(blocks.collide(Block::SAPLING), Collide::WalkThrough);
        assert!(!blocks.blocks_light(Block::GLASS));
        assert!(!blocks.blocks_light(Block::LEAVES));
        assert!(blocks.blocks_light(Block::STILL_WATER));
    }

    #[test]
    fn test_unknown_id_resolves_to_air() {
        let blocks = Blocks::new();
        let def = blocks.get(200);
        assert_eq!(def.name, "air");
        assert_eq!(def.collide, Collide::WalkThrough);
    }
}
