//! Charm casting: seven tokens released from the board center, simulated
//! until they all come to rest, then classified into board zones.

pub mod physics;
pub mod zone;

use contracts::{CharmPlacement, PlacedCharm};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

pub use physics::{step_token, CastToken, PhysicsConstants, StepEvent, TokenPhase};
pub use zone::{classify_zone, sector_for_angle, BoardGeometry, Rotation};

/// Defensive cutoff; the reference constants settle in well under 200 steps.
pub const DEFAULT_MAX_STEPS: u32 = 2000;

/// Hover hit radius at `scale == 1.0`, slightly larger than the drawn token.
const HIT_RADIUS: f64 = 25.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Charm {
    pub id: &'static str,
    pub name: &'static str,
    pub icon: &'static str,
    pub color: &'static str,
}

pub const CHARMS: [Charm; 7] = [
    Charm {
        id: "sun",
        name: "The Sun",
        icon: "☀️",
        color: "#fbbf24",
    },
    Charm {
        id: "moon",
        name: "The Moon",
        icon: "🌙",
        color: "#e2e8f0",
    },
    Charm {
        id: "key",
        name: "The Key",
        icon: "🗝️",
        color: "#f59e0b",
    },
    Charm {
        id: "heart",
        name: "The Heart",
        icon: "❤️",
        color: "#ef4444",
    },
    Charm {
        id: "skull",
        name: "The End",
        icon: "💀",
        color: "#94a3b8",
    },
    Charm {
        id: "star",
        name: "The Star",
        icon: "⭐",
        color: "#fcd34d",
    },
    Charm {
        id: "eye",
        name: "The Eye",
        icon: "👁️",
        color: "#38bdf8",
    },
];

/// Identifies one cast. A new cast makes every older id stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CastId(pub u64);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CastError {
    #[error("no cast has been started")]
    NoActiveCast,
    #[error("cast {requested:?} was replaced by cast {current:?}")]
    Stale { requested: CastId, current: CastId },
    #[error("tokens still moving after {steps} steps")]
    DidNotSettle { steps: u32 },
    #[error("cast is still in motion")]
    NotSettled,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StepOutcome {
    pub events: Vec<StepEvent>,
    pub all_settled: bool,
}

/// Summary of a cast run to rest.
#[derive(Debug, Clone, PartialEq)]
pub struct CastOutcome {
    pub cast_id: CastId,
    pub steps: u32,
    pub landings: u32,
    pub placements: Vec<CharmPlacement>,
}

impl CastOutcome {
    /// `{charm, zone}` pairs in the shape the narrative service expects.
    pub fn placed_charms(&self) -> Vec<PlacedCharm> {
        self.placements
            .iter()
            .map(|placement| PlacedCharm {
                charm: placement.name.clone(),
                zone: placement.zone_label.clone(),
            })
            .collect()
    }
}

/// Owns the token set of the current cast.
#[derive(Debug, Clone)]
pub struct CastSession {
    geometry: BoardGeometry,
    constants: PhysicsConstants,
    tokens: Vec<CastToken>,
    current: Option<CastId>,
    next_id: u64,
    steps: u32,
    landings: u32,
}

impl CastSession {
    pub fn new(geometry: BoardGeometry) -> Self {
        Self::with_constants(geometry, PhysicsConstants::default())
    }

    pub fn with_constants(geometry: BoardGeometry, constants: PhysicsConstants) -> Self {
        Self {
            geometry,
            constants,
            tokens: Vec::new(),
            current: None,
            next_id: 1,
            steps: 0,
            landings: 0,
        }
    }

    pub fn geometry(&self) -> &BoardGeometry {
        &self.geometry
    }

    pub fn constants(&self) -> &PhysicsConstants {
        &self.constants
    }

    pub fn tokens(&self) -> &[CastToken] {
        &self.tokens
    }

    pub fn current_cast(&self) -> Option<CastId> {
        self.current
    }

    pub fn steps(&self) -> u32 {
        self.steps
    }

    /// Replaces the token set with a fresh release from the board center.
    pub fn begin<R: Rng + ?Sized>(&mut self, rng: &mut R) -> CastId {
        let origin = self.geometry.center();
        self.tokens = (0..CHARMS.len())
            .map(|charm| CastToken::launch(charm, origin, &self.constants, rng))
            .collect();

        let id = CastId(self.next_id);
        self.next_id += 1;
        self.current = Some(id);
        self.steps = 0;
        self.landings = 0;
        id
    }

    pub fn is_settled(&self) -> bool {
        self.current.is_some() && self.tokens.iter().all(|token| token.settled)
    }

    /// Runs one step of the cast `cast_id`. Frames scheduled for a replaced
    /// cast get [`CastError::Stale`] and should stop rescheduling.
    pub fn advance(&mut self, cast_id: CastId) -> Result<StepOutcome, CastError> {
        let current = self.current.ok_or(CastError::NoActiveCast)?;
        if current != cast_id {
            return Err(CastError::Stale {
                requested: cast_id,
                current,
            });
        }

        if self.is_settled() {
            return Ok(StepOutcome {
                events: Vec::new(),
                all_settled: true,
            });
        }

        let mut events = Vec::new();
        let (width, height) = (self.geometry.width, self.geometry.height);
        for (index, token) in self.tokens.iter_mut().enumerate() {
            step_token(token, index, width, height, &self.constants, &mut events);
        }
        self.steps += 1;
        self.landings += events
            .iter()
            .filter(|event| matches!(event, StepEvent::Landed { .. }))
            .count() as u32;

        Ok(StepOutcome {
            events,
            all_settled: self.is_settled(),
        })
    }

    /// Steps the current cast until every token settles or `max_steps` is hit.
    pub fn run_to_completion(&mut self, max_steps: u32) -> Result<CastOutcome, CastError> {
        let cast_id = self.current.ok_or(CastError::NoActiveCast)?;
        while !self.is_settled() {
            if self.steps >= max_steps {
                return Err(CastError::DidNotSettle { steps: self.steps });
            }
            self.advance(cast_id)?;
        }

        Ok(CastOutcome {
            cast_id,
            steps: self.steps,
            landings: self.landings,
            placements: self.placements()?,
        })
    }

    /// Final zone of every token. Only available once the cast has come to rest.
    pub fn placements(&self) -> Result<Vec<CharmPlacement>, CastError> {
        if self.current.is_none() {
            return Err(CastError::NoActiveCast);
        }
        if !self.is_settled() {
            return Err(CastError::NotSettled);
        }

        Ok(self
            .tokens
            .iter()
            .map(|token| {
                let charm = &CHARMS[token.charm];
                let zone = self.geometry.classify(token.x, token.y);
                CharmPlacement {
                    charm_id: charm.id.to_string(),
                    name: charm.name.to_string(),
                    icon: charm.icon.to_string(),
                    x: token.x,
                    y: token.y,
                    zone,
                    zone_label: zone.label(),
                }
            })
            .collect())
    }

    /// Topmost token under the point, if any. Later tokens draw on top.
    pub fn token_at(&self, x: f64, y: f64) -> Option<&CastToken> {
        self.tokens.iter().rev().find(|token| {
            let radius = HIT_RADIUS * token.scale;
            let (dx, dy) = (x - token.x, y - token.y);
            dx * dx + dy * dy < radius * radius
        })
    }
}

pub fn seeded_rng(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}

/// Runs a full cast from `seed` on `geometry` with the reference constants.
pub fn cast_with_seed(geometry: BoardGeometry, seed: u64) -> Result<CastOutcome, CastError> {
    let mut session = CastSession::new(geometry);
    session.begin(&mut seeded_rng(seed));
    session.run_to_completion(DEFAULT_MAX_STEPS)
}
