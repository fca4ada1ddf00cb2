//! Playable and NPC race IDs understood by the viewer.

use std::collections::BTreeMap;

use axum::Json;

/// Race name → viewer race ID.
pub const RACES: [(&str, u32); 30] = [
    ("Human", 1),
    ("Orc", 2),
    ("Dwarf", 3),
    ("Night Elf", 4),
    ("Undead", 5),
    ("Tauren", 6),
    ("Gnome", 7),
    ("Troll", 8),
    ("Goblin", 9),
    ("Blood Elf", 10),
    ("Draenei", 11),
    ("Fel Orc", 12),
    ("Naga", 13),
    ("Broken", 14),
    ("Skeleton", 15),
    ("Vrykul", 16),
    ("Tuskarr", 17),
    ("Forest Troll", 18),
    ("Taunka", 19),
    ("Northrend Skeleton", 20),
    ("Ice Troll", 21),
    ("Worgen", 22),
    ("Gilnean", 23),
    ("Pandaren (Neutral)", 24),
    ("Pandaren (Alliance)", 25),
    ("Pandaren (Horde)", 26),
    ("Nightborne", 27),
    ("Highmountain Tauren", 28),
    ("Void Elf", 29),
    ("Lightforged Draenei", 30),
];

/// The table as a name-sorted map.
pub fn race_table() -> BTreeMap<&'static str, u32> {
    RACES.into_iter().collect()
}

/// `GET /get-races`
pub async fn get_races() -> Json<BTreeMap<&'static str, u32>> {
    Json(race_table())
}
