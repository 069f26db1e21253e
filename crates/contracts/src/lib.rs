//! v1 cross-boundary contracts for the calculation core, API, persistence, and CLI.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub mod config;
pub mod narrative;
pub mod serde_u64_string;

pub use config::{BoardConfig, ConfigError, NarrativeConfig, SyllabusConfig};
pub use narrative::{
    CharmDetail, CharmReading, CharmReadingRequest, NumerologyReading, NumerologyReadingRequest,
    PlacedCharm,
};

pub const SCHEMA_VERSION_V1: &str = "1.0";

// ---------------------------------------------------------------------------
// Letter schemes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum Scheme {
    #[default]
    Pythagorean,
    Chaldean,
}

impl Scheme {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pythagorean => "pythagorean",
            Self::Chaldean => "chaldean",
        }
    }

    /// Title-cased name used in report headings.
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Pythagorean => "Pythagorean",
            Self::Chaldean => "Chaldean",
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown scheme: {0} (expected pythagorean or chaldean)")]
pub struct UnknownScheme(pub String);

impl FromStr for Scheme {
    type Err = UnknownScheme;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "pythagorean" => Ok(Self::Pythagorean),
            "chaldean" => Ok(Self::Chaldean),
            other => Err(UnknownScheme(other.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Lost item finder
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LostItemQuery {
    pub item_name: String,
    /// Expected as `YYYY-MM-DD`; any non-digit characters are ignored.
    pub date_lost: String,
    #[serde(default)]
    pub seeker_name: String,
    #[serde(default)]
    pub scheme: Scheme,
}

impl LostItemQuery {
    /// Query text written to the calculation log.
    pub fn log_label(&self) -> String {
        format!("{} ({})", self.item_name, self.date_lost)
    }
}

/// Compass bearing of an interpretation. 0 = North, 90 = East.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CompassBearing {
    Degrees(u16),
    Center,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Interpretation {
    pub direction: String,
    pub bearing: CompassBearing,
    pub keywords: Vec<String>,
    pub room_type: String,
    pub height: String,
    pub containers: String,
    pub materials: String,
    pub specific_spots: Vec<String>,
    pub timing: String,
    pub clues: String,
    pub icon: String,
}

/// Raw letter/digit sums before reduction, plus the pre-reduction master total.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct LostItemBreakdown {
    pub item_sum: u64,
    pub date_sum: u64,
    pub seeker_sum: u64,
    /// Sum of the three reduced component numbers.
    pub total_sum: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LostItemResult {
    pub item_number: u32,
    pub date_number: u32,
    pub seeker_number: u32,
    pub master_number: u32,
    pub breakdown: LostItemBreakdown,
    pub interpretation: Interpretation,
}

// ---------------------------------------------------------------------------
// Numerology
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NumerologyQuery {
    pub name: String,
    pub birth_date: String,
    #[serde(default)]
    pub scheme: Scheme,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct NumerologyProfile {
    pub life_path: u32,
    pub destiny_number: u32,
    pub soul_urge: u32,
    pub destiny_sum: u64,
    pub soul_sum: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NumerologyReport {
    pub schema_version: String,
    pub name: String,
    pub scheme: Scheme,
    pub profile: NumerologyProfile,
    pub meaning: String,
    pub esoteric_insight: String,
    pub system_comparison: String,
}

// ---------------------------------------------------------------------------
// Charm casting board
// ---------------------------------------------------------------------------

/// One of the twelve 30 degree sectors of the casting board.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(into = "u8", try_from = "u8")]
pub enum House {
    I,
    II,
    III,
    IV,
    V,
    VI,
    VII,
    VIII,
    IX,
    X,
    XI,
    XII,
}

impl House {
    pub const ALL: [House; 12] = [
        House::I,
        House::II,
        House::III,
        House::IV,
        House::V,
        House::VI,
        House::VII,
        House::VIII,
        House::IX,
        House::X,
        House::XI,
        House::XII,
    ];

    /// 1-based house number.
    pub fn number(self) -> u8 {
        self as u8 + 1
    }

    /// House for a 0-based sector index; indices wrap modulo 12.
    pub fn from_sector(index: usize) -> Self {
        Self::ALL[index % 12]
    }

    pub fn numeral(self) -> &'static str {
        match self {
            House::I => "I",
            House::II => "II",
            House::III => "III",
            House::IV => "IV",
            House::V => "V",
            House::VI => "VI",
            House::VII => "VII",
            House::VIII => "VIII",
            House::IX => "IX",
            House::X => "X",
            House::XI => "XI",
            House::XII => "XII",
        }
    }

    pub fn theme(self) -> &'static str {
        match self {
            House::I => "Self",
            House::II => "Value",
            House::III => "Comm",
            House::IV => "Roots",
            House::V => "Creation",
            House::VI => "Routine",
            House::VII => "Union",
            House::VIII => "Alchemy",
            House::IX => "Expansion",
            House::X => "Public",
            House::XI => "Hopes",
            House::XII => "Unconscious",
        }
    }

    /// Longer description handed to the narrative service.
    pub fn meaning(self) -> &'static str {
        match self {
            House::I => "Self, Identity, Appearance.",
            House::II => "Values, Possessions, Resources.",
            House::III => "Communication, Siblings, Short Trips.",
            House::IV => "Home, Roots, Family.",
            House::V => "Creativity, Pleasure, Romance.",
            House::VI => "Health, Routine, Service.",
            House::VII => "Partnership, Marriage, Open Enemies.",
            House::VIII => "Transformation, Death, Shared Resources.",
            House::IX => "Philosophy, Travel, Higher Mind.",
            House::X => "Career, Public Standing, Authority.",
            House::XI => "Community, Friends, Hopes.",
            House::XII => "Subconscious, Hidden Things, Karma.",
        }
    }
}

impl From<House> for u8 {
    fn from(value: House) -> Self {
        value.number()
    }
}

impl TryFrom<u8> for House {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1..=12 => Ok(Self::ALL[usize::from(value - 1)]),
            other => Err(format!("house number out of range: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Zone {
    House { house: House },
    Void,
    Ether,
}

impl Zone {
    pub fn all() -> Vec<Zone> {
        let mut zones = House::ALL
            .iter()
            .map(|house| Zone::House { house: *house })
            .collect::<Vec<_>>();
        zones.push(Zone::Void);
        zones.push(Zone::Ether);
        zones
    }

    pub fn label(&self) -> String {
        match self {
            Zone::House { house } => format!("House {} ({})", house.numeral(), house.theme()),
            Zone::Void => "THE VOID (Center)".to_string(),
            Zone::Ether => "THE ETHER (Out of Bounds)".to_string(),
        }
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CharmPlacement {
    pub charm_id: String,
    pub name: String,
    pub icon: String,
    pub x: f64,
    pub y: f64,
    pub zone: Zone,
    pub zone_label: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CastRequest {
    pub intent: String,
    #[serde(default, with = "serde_u64_string::option")]
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CastReport {
    pub schema_version: String,
    pub intent: String,
    #[serde(with = "serde_u64_string")]
    pub seed: u64,
    pub steps: u32,
    pub landings: u32,
    pub placements: Vec<CharmPlacement>,
    pub reading: Option<CharmReading>,
}

// ---------------------------------------------------------------------------
// Calculation log and shared state
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CalculationModule {
    LostItem,
    Numerology,
    CharmCasting,
}

impl CalculationModule {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::LostItem => "LOST_ITEM",
            Self::Numerology => "NUMEROLOGY",
            Self::CharmCasting => "CHARM_CASTING",
        }
    }
}

impl fmt::Display for CalculationModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LogEntry {
    pub id: i64,
    pub module: String,
    pub query: String,
    pub result: Value,
    pub timestamp: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Location {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServiceStatus {
    pub schema_version: String,
    pub calculations_run: u64,
    pub narrative_enabled: bool,
}

impl fmt::Display for ServiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "schema={} calculations_run={} narrative_enabled={}",
            self.schema_version, self.calculations_run, self.narrative_enabled
        )
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    InvalidQuery,
    NotFound,
    ContractVersionUnsupported,
    SimulationDidNotSettle,
    InternalError,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApiError {
    pub schema_version: String,
    pub error_code: ErrorCode,
    pub message: String,
    pub details: Option<String>,
}

impl ApiError {
    pub fn new(error_code: ErrorCode, message: impl Into<String>, details: Option<String>) -> Self {
        Self {
            schema_version: SCHEMA_VERSION_V1.to_string(),
            error_code,
            message: message.into(),
            details,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scheme_parses_case_insensitively() {
        assert_eq!("Chaldean".parse::<Scheme>(), Ok(Scheme::Chaldean));
        assert_eq!(" PYTHAGOREAN ".parse::<Scheme>(), Ok(Scheme::Pythagorean));
        assert!("vedic".parse::<Scheme>().is_err());
    }

    #[test]
    fn lost_item_query_defaults_optional_fields() {
        let query: LostItemQuery =
            serde_json::from_str(r#"{"item_name":"Keys","date_lost":"2024-01-01"}"#)
                .expect("minimal query");
        assert_eq!(query.seeker_name, "");
        assert_eq!(query.scheme, Scheme::Pythagorean);
        assert_eq!(query.log_label(), "Keys (2024-01-01)");
    }

    #[test]
    fn zone_set_has_fourteen_distinct_labels() {
        let zones = Zone::all();
        assert_eq!(zones.len(), 14);
        let mut labels = zones.iter().map(Zone::label).collect::<Vec<_>>();
        labels.sort();
        labels.dedup();
        assert_eq!(labels.len(), 14);
        assert_eq!(
            Zone::House { house: House::VIII }.label(),
            "House VIII (Alchemy)"
        );
    }

    #[test]
    fn house_serializes_as_number() {
        let zone = Zone::House { house: House::XII };
        let encoded = serde_json::to_value(zone).expect("serialize zone");
        assert_eq!(encoded, serde_json::json!({"kind": "house", "house": 12}));

        let rejected = serde_json::from_str::<Zone>(r#"{"kind":"house","house":13}"#);
        assert!(rejected.is_err());
    }

    #[test]
    fn cast_request_accepts_string_or_missing_seed() {
        let with_seed: CastRequest =
            serde_json::from_str(r#"{"intent":"clarity","seed":"42"}"#).expect("string seed");
        assert_eq!(with_seed.seed, Some(42));

        let without: CastRequest =
            serde_json::from_str(r#"{"intent":"clarity"}"#).expect("no seed");
        assert_eq!(without.seed, None);
    }
}
