use serde::{Deserialize, Serialize};

use crate::game::grid::PlaceError;
use crate::game::patterns::GamePattern;
use crate::state::round::FinalStats;

pub const PROTOCOL_VERSION: u8 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientEnvelope {
    pub v: u8,
    #[serde(flatten)]
    pub msg: ClientMessage,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerEnvelope {
    pub v: u8,
    #[serde(flatten)]
    pub msg: ServerMessage,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "t", content = "data", rename_all = "snake_case")]
pub enum ClientMessage {
    Place { x: i32, y: i32 },
    Ping,
    Pong,
    Leave,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "t", content = "data", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Full board snapshot, sent on join, after a successful placement, and
    /// once per tick. `final_stats` appears only once the game is over.
    GridUpdate {
        grid: Vec<Vec<u8>>,
        scores: Scores,
        stats: RoundStats,
        timer: u32,
        game_over: bool,
        pattern: PatternInfo,
        #[serde(skip_serializing_if = "Option::is_none")]
        final_stats: Option<FinalStats>,
    },
    /// Lightweight sub-tick countdown, sent once per second.
    TimerUpdate { timer: u32 },
    /// A placement request was refused; addressed to the requester only.
    PlaceRejected { reason: PlaceError },
    Ping,
    Pong,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scores {
    pub red: u32,
    pub blue: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundStats {
    pub red_clusters: u32,
    pub blue_clusters: u32,
    pub current_round: u32,
    pub activity: u32,
    pub points_placed: u32,
    pub territory_control: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternInfo {
    pub name: String,
    pub description: String,
    pub difficulty: u8,
}

impl From<&GamePattern> for PatternInfo {
    fn from(pattern: &GamePattern) -> Self {
        Self {
            name: pattern.name.to_owned(),
            description: pattern.description.to_owned(),
            difficulty: pattern.difficulty,
        }
    }
}
