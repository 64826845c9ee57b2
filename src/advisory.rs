//! Advisory move suggestions from an external service
//!
//! The advisor is an optional collaborator consulted by the selector for
//! profiles that blend in outside opinion. Its answers are untrusted: every
//! suggested cell is checked against the live board and dropped on its own
//! if it is malformed, off the board, occupied, already played or repeated.

use std::collections::HashSet;
use std::time::Duration;

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, instrument, warn};

use crate::board::{Board, Pos, Stone};
use crate::error::AdvisoryError;
use crate::game::MoveRecord;
use crate::profile::Difficulty;

/// Default number of trailing moves sent with a request
pub const DEFAULT_HISTORY_WINDOW: usize = 16;
/// Default cap on advisory candidates kept per response
pub const DEFAULT_MAX_CANDIDATES: usize = 3;

/// Payload sent to the advisory service
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdvisoryRequest {
    pub board: Vec<Vec<u8>>,
    pub player: Stone,
    pub difficulty: Difficulty,
    pub history: Vec<MoveRecord>,
}

impl AdvisoryRequest {
    /// Build a request carrying only the last `window` moves of `history`.
    pub fn new(
        board: &Board,
        player: Stone,
        difficulty: Difficulty,
        history: &[MoveRecord],
        window: usize,
    ) -> Self {
        let start = history.len().saturating_sub(window);
        Self {
            board: board.to_rows(),
            player,
            difficulty,
            history: history[start..].to_vec(),
        }
    }
}

/// One validated suggestion
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdvisoryCandidate {
    pub pos: Pos,
    pub score: f64,
}

/// A validated advisory answer
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Advice {
    /// The advisor's own pick, if it named a legal empty cell
    pub chosen: Option<Pos>,
    pub candidates: Vec<AdvisoryCandidate>,
}

impl Advice {
    pub fn is_empty(&self) -> bool {
        self.chosen.is_none() && self.candidates.is_empty()
    }

    /// Validate a raw response against `board`.
    ///
    /// Keeps at most `limit` candidates, in response order. Fails only when
    /// the response is not an object at all; an object with nothing usable
    /// yields an empty `Advice`.
    pub fn from_value(
        raw: &Value,
        board: &Board,
        played: &[Pos],
        limit: usize,
    ) -> Result<Self, AdvisoryError> {
        let obj = raw
            .as_object()
            .ok_or_else(|| AdvisoryError::Malformed("expected a JSON object".to_string()))?;

        let played: HashSet<Pos> = played.iter().copied().collect();
        let usable = |pos: Pos| board.is_empty(pos) && !played.contains(&pos);

        let chosen = cell(obj.get("x"), obj.get("y"), board).filter(|&p| usable(p));

        let mut seen = HashSet::new();
        let mut candidates = Vec::new();
        if let Some(list) = obj.get("candidates").and_then(Value::as_array) {
            for entry in list {
                if candidates.len() >= limit {
                    break;
                }
                let Some(c) = candidate(entry, board) else {
                    debug!(?entry, "dropping malformed advisory candidate");
                    continue;
                };
                if !usable(c.pos) || !seen.insert(c.pos) {
                    debug!(pos = %c.pos, "dropping unusable advisory candidate");
                    continue;
                }
                candidates.push(c);
            }
        }

        Ok(Self { chosen, candidates })
    }
}

/// Read an integral coordinate pair that lies on the board
fn cell(x: Option<&Value>, y: Option<&Value>, board: &Board) -> Option<Pos> {
    let x = coordinate(x?)?;
    let y = coordinate(y?)?;
    board
        .in_bounds(x, y)
        .then(|| Pos::new(x as u8, y as u8))
}

fn coordinate(v: &Value) -> Option<i32> {
    if let Some(i) = v.as_i64() {
        return i32::try_from(i).ok();
    }
    let f = v.as_f64()?;
    (f.fract() == 0.0 && f.abs() < 1e6).then_some(f as i32)
}

fn candidate(entry: &Value, board: &Board) -> Option<AdvisoryCandidate> {
    let obj = entry.as_object()?;
    let pos = cell(obj.get("x"), obj.get("y"), board)?;
    let score = obj.get("llm_score")?.as_f64().filter(|s| s.is_finite())?;
    Some(AdvisoryCandidate { pos, score })
}

/// Source of advisory suggestions
pub trait Advisor: Send + Sync {
    /// Ask for a suggestion. The returned value is unvalidated JSON.
    fn advise(&self, request: &AdvisoryRequest) -> Result<Value, AdvisoryError>;
}

/// Advisor backed by an HTTP endpoint that accepts the request as JSON.
#[derive(Debug, Clone)]
pub struct HttpAdvisor {
    url: String,
    client: reqwest::blocking::Client,
}

impl HttpAdvisor {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, AdvisoryError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()?;
        Ok(Self {
            url: url.into(),
            client,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Advisor for HttpAdvisor {
    #[instrument(skip_all, fields(url = %self.url, player = %request.player))]
    fn advise(&self, request: &AdvisoryRequest) -> Result<Value, AdvisoryError> {
        let response = self.client.post(&self.url).json(request).send()?;
        let status = response.status();
        if !status.is_success() {
            warn!(%status, "advisory server refused request");
            return Err(AdvisoryError::Status(status.as_u16()));
        }
        let body = response.json::<Value>()?;
        debug!("advisory response received");
        Ok(body)
    }
}
