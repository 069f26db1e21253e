//! Payloads exchanged with the generative narrative service.

use serde::{Deserialize, Serialize};

use crate::{NumerologyProfile, Scheme};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlacedCharm {
    pub charm: String,
    pub zone: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CharmReadingRequest {
    pub intent: String,
    pub placements: Vec<PlacedCharm>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CharmDetail {
    pub charm: String,
    pub meaning: String,
}

/// Structured reading; field names follow the service's camelCase JSON.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CharmReading {
    pub synthesis: String,
    pub key_insight: String,
    pub charm_details: Vec<CharmDetail>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NumerologyReadingRequest {
    pub name: String,
    pub scheme: Scheme,
    pub profile: NumerologyProfile,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NumerologyReading {
    pub meaning: String,
    pub esoteric_insight: String,
}
