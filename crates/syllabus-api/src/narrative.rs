//! Generative narrative readings for casts and numerology profiles.
//!
//! Every failure path ends in `None`; callers substitute their own fallback text.

use async_trait::async_trait;
use contracts::{
    CharmReading, CharmReadingRequest, House, NarrativeConfig, NumerologyReading,
    NumerologyReadingRequest, Scheme, Zone,
};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, warn};

#[derive(Debug, thiserror::Error)]
pub enum NarrativeError {
    #[error("narrative request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("narrative service returned status {0}")]
    Status(u16),
    #[error("narrative service returned no text")]
    EmptyResponse,
    #[error("narrative payload did not match schema: {0}")]
    Decode(#[from] serde_json::Error),
}

#[async_trait]
pub trait NarrativeService: Send + Sync {
    async fn charm_reading(&self, request: &CharmReadingRequest) -> Option<CharmReading>;

    async fn numerology_reading(
        &self,
        request: &NumerologyReadingRequest,
    ) -> Option<NumerologyReading>;

    fn is_enabled(&self) -> bool {
        true
    }
}

/// Used when no API key is configured. Never produces a reading.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentNarrativeService;

#[async_trait]
impl NarrativeService for SilentNarrativeService {
    async fn charm_reading(&self, _request: &CharmReadingRequest) -> Option<CharmReading> {
        None
    }

    async fn numerology_reading(
        &self,
        _request: &NumerologyReadingRequest,
    ) -> Option<NumerologyReading> {
        None
    }

    fn is_enabled(&self) -> bool {
        false
    }
}

#[derive(Debug, Clone)]
pub struct GenerativeNarrativeService {
    client: Client,
    endpoint: String,
    model: String,
    api_key: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: Vec<RequestContent<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct RequestContent<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: &'static str,
    response_schema: Value,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

impl GenerativeNarrativeService {
    pub fn new(
        endpoint: impl Into<String>,
        model: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
            model: model.into(),
            api_key: api_key.into(),
        }
    }

    /// Reads the API key from the variable named in `config`. `None` when unset or blank.
    pub fn from_config(config: &NarrativeConfig) -> Option<Self> {
        let api_key = std::env::var(&config.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())?;
        Some(Self::new(&config.endpoint, &config.model, api_key))
    }

    fn url(&self) -> String {
        format!(
            "{}/{}:generateContent",
            self.endpoint.trim_end_matches('/'),
            self.model
        )
    }

    async fn generate_json<T: DeserializeOwned>(
        &self,
        prompt: &str,
        schema: Value,
    ) -> Result<T, NarrativeError> {
        let request = GenerateRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: prompt }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
                response_schema: schema,
            },
        };

        let response = self
            .client
            .post(self.url())
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(NarrativeError::Status(response.status().as_u16()));
        }

        let body: GenerateResponse = response.json().await?;
        let text = body
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .and_then(|content| content.parts.into_iter().next())
            .and_then(|part| part.text)
            .filter(|text| !text.trim().is_empty())
            .ok_or(NarrativeError::EmptyResponse)?;

        Ok(serde_json::from_str(&text)?)
    }

    async fn generate_or_none<T: DeserializeOwned>(
        &self,
        kind: &str,
        prompt: &str,
        schema: Value,
    ) -> Option<T> {
        match self.generate_json(prompt, schema).await {
            Ok(value) => {
                debug!(kind, model = %self.model, "narrative reading generated");
                Some(value)
            }
            Err(err) => {
                warn!(kind, model = %self.model, error = %err, "narrative service failed");
                None
            }
        }
    }
}

#[async_trait]
impl NarrativeService for GenerativeNarrativeService {
    async fn charm_reading(&self, request: &CharmReadingRequest) -> Option<CharmReading> {
        self.generate_or_none("charm", &charm_prompt(request), charm_reading_schema())
            .await
    }

    async fn numerology_reading(
        &self,
        request: &NumerologyReadingRequest,
    ) -> Option<NumerologyReading> {
        self.generate_or_none(
            "numerology",
            &numerology_prompt(request),
            numerology_reading_schema(),
        )
        .await
    }
}

pub fn charm_prompt(request: &CharmReadingRequest) -> String {
    let mut prompt = String::new();
    prompt.push_str("Act as an expert Charm Caster (Osteomancy/Lithomancy).\n");
    prompt.push_str(&format!("User Intent: \"{}\".\n\n", request.intent));
    prompt.push_str("The charms landed in the following configuration on the 12-House Casting Board:\n");
    for placed in &request.placements {
        prompt.push_str(&format!(
            "- The '{}' charm landed in '{}'.\n",
            placed.charm, placed.zone
        ));
    }

    prompt.push_str("\nBoard Sectors (Astrological Houses):\n");
    for house in House::ALL {
        prompt.push_str(&format!(
            "- House {}: {}\n",
            house.numeral(),
            house.meaning()
        ));
    }
    prompt.push_str(&format!(
        "- {}: Pure potential, chaos, or lack of focus.\n\n",
        Zone::Void.label()
    ));
    prompt.push_str("Synthesize these positions into a coherent reading.\n");
    prompt
}

pub fn numerology_prompt(request: &NumerologyReadingRequest) -> String {
    let profile = &request.profile;
    let context = match request.scheme {
        Scheme::Chaldean => {
            "Use Chaldean interpretations. Pay special attention to the compound numbers \
             (e.g. if the Destiny Sum was 23, interpret the vibration of 23/5). \
             Chaldean numerology is more mystical and karma-oriented."
        }
        Scheme::Pythagorean => {
            "Use Modern Pythagorean interpretations. Focus on the psychological profiles \
             and sequential growth patterns."
        }
    };

    format!(
        "Provide an esoteric numerological interpretation using the **{scheme}** system.\n\
         Subject: {name}\n\
         Life Path: {life_path} (Sum of birthdate)\n\
         Destiny Number (Expression): {destiny} (Derived from sum {destiny_sum})\n\
         Soul Urge: {soul} (Derived from sum {soul_sum})\n\n\
         Context:\n{context}\n\n\
         Provide a 'meaning' (synthesis of these numbers) and 'esotericInsight' \
         (deeper spiritual implication).\n",
        scheme = request.scheme.as_str().to_uppercase(),
        name = request.name,
        life_path = profile.life_path,
        destiny = profile.destiny_number,
        destiny_sum = profile.destiny_sum,
        soul = profile.soul_urge,
        soul_sum = profile.soul_sum,
    )
}

fn charm_reading_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "synthesis": { "type": "STRING" },
            "keyInsight": { "type": "STRING" },
            "charmDetails": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "charm": { "type": "STRING" },
                        "meaning": { "type": "STRING" }
                    },
                    "required": ["charm", "meaning"]
                }
            }
        },
        "required": ["synthesis", "keyInsight", "charmDetails"]
    })
}

fn numerology_reading_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "meaning": { "type": "STRING" },
            "esotericInsight": { "type": "STRING" }
        },
        "required": ["meaning", "esotericInsight"]
    })
}
