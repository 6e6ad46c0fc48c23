//! Village map cottage positions (`village_positions`)

use std::collections::BTreeMap;

/// CSS offsets allowed on a cottage
pub const POSITION_PROPERTIES: [&str; 4] = ["top", "left", "right", "bottom"];

/// One cottage: property → percentage string, or `null` to clear it
pub type CottagePosition = BTreeMap<String, Option<String>>;

/// cottage key → position
pub type VillagePositions = BTreeMap<String, CottagePosition>;
