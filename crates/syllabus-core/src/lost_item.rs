//! Lost-item location: three reduced numbers folded into a master number and
//! looked up in a static table of search hints.

use contracts::{
    CompassBearing, Interpretation, LostItemBreakdown, LostItemQuery, LostItemResult, Scheme,
};

use crate::letters::letter_map;
use crate::reduction::{digit_sum, letter_sum, reduce_digit_sum};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InterpretationRecord {
    pub direction: &'static str,
    pub bearing: CompassBearing,
    pub keywords: &'static [&'static str],
    pub room_type: &'static str,
    pub height: &'static str,
    pub containers: &'static str,
    pub materials: &'static str,
    pub specific_spots: &'static [&'static str],
    pub timing: &'static str,
    pub clues: &'static str,
    pub icon: &'static str,
}

impl From<&InterpretationRecord> for Interpretation {
    fn from(record: &InterpretationRecord) -> Self {
        let owned = |items: &[&str]| -> Vec<String> {
            items.iter().map(|item| item.to_string()).collect()
        };
        Self {
            direction: record.direction.to_string(),
            bearing: record.bearing,
            keywords: owned(record.keywords),
            room_type: record.room_type.to_string(),
            height: record.height.to_string(),
            containers: record.containers.to_string(),
            materials: record.materials.to_string(),
            specific_spots: owned(record.specific_spots),
            timing: record.timing.to_string(),
            clues: record.clues.to_string(),
            icon: record.icon.to_string(),
        }
    }
}

/// Entries for master numbers 1 through 9, in order.
const INTERPRETATIONS: [InterpretationRecord; 9] = [
    InterpretationRecord {
        direction: "East (Front)",
        bearing: CompassBearing::Degrees(90),
        keywords: &["New Beginnings", "Front", "Identity"],
        room_type: "Entryway, Front Rooms, Porch",
        height: "Eye Level / On Top",
        containers: "Obvious spots, near door, hooks",
        materials: "Metal, Electronics, New items",
        specific_spots: &[
            "Coat hooks",
            "Dresser top",
            "Car front seat",
            "Kitchen counter",
            "Front door table",
            "Bathroom sink",
        ],
        timing: "Sunrise / Morning",
        clues: "Look in the FIRST place you used it. It is likely near the front of the house or room.",
        icon: "🌅",
    },
    InterpretationRecord {
        direction: "North (Pairs)",
        bearing: CompassBearing::Degrees(0),
        keywords: &["Duality", "Comfort", "Water"],
        room_type: "Bedroom, Bathroom, Laundry",
        height: "Low to Middle",
        containers: "Drawers, Pairs (Shoeboxes), Soft containers",
        materials: "Fabrics, Cushions, Water/Reflective surfaces",
        specific_spots: &[
            "Between cushions",
            "Bedside table",
            "Under bed",
            "Laundry basket",
            "Near partner's items",
            "Inside a pocket",
        ],
        timing: "Evening / Night",
        clues: "It is hidden in something soft or paired. Check anywhere you sit for comfort.",
        icon: "🌙",
    },
    InterpretationRecord {
        direction: "Northeast (Social)",
        bearing: CompassBearing::Degrees(45),
        keywords: &["Communication", "Creativity", "Triangles"],
        room_type: "Living Room, Playroom, Study",
        height: "Middle (Table height)",
        containers: "Shelves, With books/papers, Stacks",
        materials: "Paper, Art supplies, Tech devices",
        specific_spots: &[
            "Coffee table",
            "Bookshelf",
            "Near TV/Remote",
            "Desk",
            "Craft area",
            "Magazine rack",
        ],
        timing: "Afternoon",
        clues: "It is where you communicate or relax. It may be sandwiched between other items (books, papers).",
        icon: "📐",
    },
    InterpretationRecord {
        direction: "West (Structure)",
        bearing: CompassBearing::Degrees(270),
        keywords: &["Stability", "Order", "Corners"],
        room_type: "Office, Garage, Storage",
        height: "Low / In Drawers",
        containers: "Boxes, Filing cabinets, Locked places",
        materials: "Wood, Earth, Stone, Heavy furniture",
        specific_spots: &[
            "Desk drawer",
            "Filing cabinet",
            "Room corners",
            "Toolbox",
            "Under heavy furniture",
            "Safe",
        ],
        timing: "Late Afternoon",
        clues: "It is inside something secure or structural. Check corners and organizational systems.",
        icon: "🔲",
    },
    InterpretationRecord {
        direction: "Center (Motion)",
        bearing: CompassBearing::Center,
        keywords: &["Change", "Scatter", "Transition"],
        room_type: "Hallways, Corridors, Car",
        height: "Scattered (High and Low)",
        containers: "Junk drawers, Bags, Pockets",
        materials: "Mixed materials, Plastic, Glass",
        specific_spots: &[
            "Kitchen island",
            "Hallway table",
            "Car console",
            "Handbag/Backpack",
            "Junk drawer",
            "Stairs",
        ],
        timing: "Midday / Rushed hours",
        clues: "You were likely distracted when you lost it. Check transition areas or 'dumping grounds' for items.",
        icon: "🌪️",
    },
    InterpretationRecord {
        direction: "Northwest (Service)",
        bearing: CompassBearing::Degrees(315),
        keywords: &["Home", "Nurture", "Family"],
        room_type: "Kitchen, Dining Room, Pet areas",
        height: "Waist height (Counters)",
        containers: "Bowls, Baskets, Comfortable spots",
        materials: "Copper, Ceramic, Food-related",
        specific_spots: &[
            "Dining table",
            "Pantry",
            "Near stove",
            "Pet bed",
            "Sofa",
            "Grocery bags",
        ],
        timing: "Meal times",
        clues: "It is in the heart of the home. Check where the family gathers or where food is prepared.",
        icon: "🏠",
    },
    InterpretationRecord {
        direction: "South (Hidden)",
        bearing: CompassBearing::Degrees(180),
        keywords: &["Secrets", "Privacy", "Reflection"],
        room_type: "Bathroom, Closet, Private Den",
        height: "High (Top shelves) or Hidden",
        containers: "Behind things, Robes, Cabinets",
        materials: "Glass, Mirror, Silver, Water",
        specific_spots: &[
            "Top shelf",
            "Medicine cabinet",
            "Behind mirror",
            "In a robe pocket",
            "Under a tub",
            "Private drawer",
        ],
        timing: "Quiet hours / Early Morning",
        clues: "It is hidden from view. Look near water or reflective surfaces. It wants to be found in silence.",
        icon: "🕯️",
    },
    InterpretationRecord {
        direction: "Southeast (Power)",
        bearing: CompassBearing::Degrees(135),
        keywords: &["Value", "Business", "Organization"],
        room_type: "Office, Master Closet, Safe",
        height: "Organized / Systematic",
        containers: "Wallets, Briefcases, Expensive containers",
        materials: "Leather, Gold, Durable materials",
        specific_spots: &[
            "With money/wallet",
            "Laptop bag",
            "Planner",
            "Office organizer",
            "Coat check",
            "Valuables box",
        ],
        timing: "Business hours",
        clues: "It is near other valuable things. Think about where you keep money or work documents.",
        icon: "💼",
    },
    InterpretationRecord {
        direction: "Southwest (Endings)",
        bearing: CompassBearing::Degrees(225),
        keywords: &["Completion", "Storage", "Past"],
        room_type: "Basement, Garage, Back porch",
        height: "Low / Floor",
        containers: "Recycling bins, Old boxes, Trash",
        materials: "Old items, Dust, Discarded things",
        specific_spots: &[
            "Recycling bin",
            "Laundry hamper (dirty)",
            "Car trunk",
            "Back of closet",
            "Storage unit",
            "Lost & Found",
        ],
        timing: "End of day",
        clues: "It may have been accidentally discarded. Check places associated with 'finishing' or 'leaving'.",
        icon: "🏁",
    },
];

/// Returned for master number 0, which only happens when every input strips to nothing.
pub const INDETERMINATE: InterpretationRecord = InterpretationRecord {
    direction: "Unknown (Still)",
    bearing: CompassBearing::Center,
    keywords: &["Silence", "Absence", "Re-ask"],
    room_type: "Wherever you are standing now",
    height: "Unknown",
    containers: "Unknown",
    materials: "Unknown",
    specific_spots: &[
        "Retrace your last three steps",
        "The place you first thought of",
    ],
    timing: "Ask again with the item's full name and the date it was lost",
    clues: "The inputs carried no letters or digits to count. Enter the item name and a YYYY-MM-DD date.",
    icon: "❔",
};

/// Table entry for a master number in 1..=9.
pub fn lookup(number: u32) -> Option<&'static InterpretationRecord> {
    match number {
        1..=9 => INTERPRETATIONS.get(number as usize - 1),
        _ => None,
    }
}

/// Like [`lookup`] but never fails: anything outside 1..=9 yields [`INDETERMINATE`].
pub fn interpretation_for(number: u32) -> &'static InterpretationRecord {
    lookup(number).unwrap_or(&INDETERMINATE)
}

pub fn compute_lost_item_result(
    item_name: &str,
    date_lost: &str,
    seeker_name: &str,
    scheme: Scheme,
) -> LostItemResult {
    let map = letter_map(scheme);

    let item_sum = letter_sum(item_name, map);
    let date_sum = digit_sum(date_lost);
    let seeker_sum = letter_sum(seeker_name, map);

    let item_number = reduce_digit_sum(item_sum);
    let date_number = reduce_digit_sum(date_sum);
    let seeker_number = reduce_digit_sum(seeker_sum);

    // Reduced components are summed, not the raw sums.
    let total_sum = item_number + date_number + seeker_number;
    let master_number = reduce_digit_sum(u64::from(total_sum));

    LostItemResult {
        item_number,
        date_number,
        seeker_number,
        master_number,
        breakdown: LostItemBreakdown {
            item_sum,
            date_sum,
            seeker_sum,
            total_sum,
        },
        interpretation: interpretation_for(master_number).into(),
    }
}

pub fn compute_for_query(query: &LostItemQuery) -> LostItemResult {
    compute_lost_item_result(
        &query.item_name,
        &query.date_lost,
        &query.seeker_name,
        query.scheme,
    )
}
