use std::collections::HashMap;

use tracing::{debug, info};

use crate::config::{GRID_HEIGHT, GRID_WIDTH, TICK_INTERVAL_SECS};
use crate::game::clusters;
use crate::game::evolution::{self, EngineError};
use crate::game::grid::{Cell, Grid, PlaceError};
use crate::game::patterns::GamePattern;
use crate::net::messages::{ClientMessage, RoundStats, Scores, ServerMessage};
use crate::net::session::OutboundMessage;
use crate::state::round::GameRound;

/// Lifecycle of the single running game. `Seeding` exists only while the
/// initial pattern is applied; `Finished` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    Seeding,
    Running,
    Finished,
}

#[derive(Debug, Default)]
struct SessionEntry {
    placements: u32,
}

/// Owns the authoritative grid and round record for one game and the set of
/// joined sessions. Every mutation flows through `&mut self`, so the caller
/// holding the hub behind one lock serializes placements against ticks.
pub struct GameHub {
    grid: Grid,
    round: GameRound,
    phase: GamePhase,
    pattern: &'static GamePattern,
    timer: u32,
    sessions: HashMap<u64, SessionEntry>,
}

impl GameHub {
    /// Standard game on the configured board, seeded from `pattern`.
    pub fn new(pattern: &'static GamePattern) -> Self {
        let mut grid = Grid::new(GRID_WIDTH, GRID_HEIGHT);
        grid.seed_rle(pattern.rle);
        Self::from_seeded(grid, pattern)
    }

    /// Game over an already-seeded grid. The pattern is carried only as a
    /// label for clients; the grid value is authoritative.
    pub fn from_seeded(grid: Grid, pattern: &'static GamePattern) -> Self {
        let initial_red = grid.red_count() as u32;
        let mut hub = Self {
            round: GameRound::new(initial_red),
            grid,
            phase: GamePhase::Seeding,
            pattern,
            timer: TICK_INTERVAL_SECS,
            sessions: HashMap::new(),
        };
        hub.refresh_stats();
        hub.phase = GamePhase::Running;
        info!(
            pattern = pattern.name,
            initial_red, "game seeded and running"
        );
        hub
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn round(&self) -> &GameRound {
        &self.round
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    /// Register a session and hand it the current snapshot so a late joiner
    /// is never left blank. After the game finishes, joiners still receive
    /// the final snapshot including the final stats.
    pub fn join(&mut self, session_id: u64) -> Vec<OutboundMessage> {
        self.sessions.insert(session_id, SessionEntry::default());
        info!(session_id, sessions = self.sessions.len(), "session joined");
        vec![OutboundMessage {
            session_id,
            message: self.snapshot_message(),
        }]
    }

    pub fn leave(&mut self, session_id: u64) {
        if let Some(entry) = self.sessions.remove(&session_id) {
            info!(
                session_id,
                placements = entry.placements,
                sessions = self.sessions.len(),
                "session left"
            );
        }
    }

    pub fn handle_message(&mut self, session_id: u64, msg: ClientMessage) -> Vec<OutboundMessage> {
        match msg {
            ClientMessage::Place { x, y } => self.place_point(session_id, x, y),
            ClientMessage::Ping => vec![OutboundMessage {
                session_id,
                message: ServerMessage::Pong,
            }],
            // Pong answers the connection actor's probe; nothing to do here.
            ClientMessage::Pong => Vec::new(),
            ClientMessage::Leave => {
                self.leave(session_id);
                Vec::new()
            }
        }
    }

    /// Apply one placement. Success updates the round and the session's
    /// counter and broadcasts a fresh snapshot; failure answers only the
    /// requesting session and leaves everyone else undisturbed.
    pub fn place_point(&mut self, session_id: u64, x: i32, y: i32) -> Vec<OutboundMessage> {
        let result = match self.phase {
            GamePhase::Finished => Err(PlaceError::GameOver),
            _ => self.grid.try_place(x, y),
        };

        match result {
            Ok(()) => {
                self.round.record_placement();
                if let Some(entry) = self.sessions.get_mut(&session_id) {
                    entry.placements += 1;
                }
                self.refresh_stats();
                debug!(session_id, x, y, "point placed");
                self.broadcast(self.snapshot_message())
            }
            Err(reason) => {
                debug!(session_id, x, y, %reason, "placement rejected");
                vec![OutboundMessage {
                    session_id,
                    message: ServerMessage::PlaceRejected { reason },
                }]
            }
        }
    }

    /// Run one simulation tick and broadcast the resulting snapshot. A
    /// no-op once the game is finished. The only error is a corrupt grid,
    /// which the caller must treat as fatal for this game.
    pub fn tick(&mut self) -> Result<Vec<OutboundMessage>, EngineError> {
        if self.phase != GamePhase::Running {
            return Ok(Vec::new());
        }

        self.round.begin_tick();
        let summary = evolution::step(&mut self.grid)?;
        self.refresh_stats();
        self.timer = TICK_INTERVAL_SECS;
        debug!(
            round = self.round.round_count,
            born = summary.born.len(),
            died = summary.died.len(),
            eliminated = summary.eliminated.len(),
            "tick applied"
        );

        if self.grid.red_count() == 0 {
            self.phase = GamePhase::Finished;
            let stats = self.round.finish(0);
            info!(
                rounds = stats.total_rounds,
                score = stats.rank_info.score,
                title = %stats.rank_info.title,
                "all obstacles eliminated, game over"
            );
        }

        Ok(self.broadcast(self.snapshot_message()))
    }

    /// Update the sub-tick countdown and emit the lightweight timer message
    /// to every session.
    pub fn set_timer(&mut self, timer: u32) -> Vec<OutboundMessage> {
        self.timer = timer;
        self.broadcast(ServerMessage::TimerUpdate { timer })
    }

    fn refresh_stats(&mut self) {
        self.round.red_clusters = clusters::count_clusters(&self.grid, Cell::Red) as u32;
        self.round.blue_clusters = clusters::count_clusters(&self.grid, Cell::Blue) as u32;
        self.round.territory_control = clusters::territory_control(&self.grid);
    }

    fn snapshot_message(&self) -> ServerMessage {
        ServerMessage::GridUpdate {
            grid: self.grid.rows(),
            scores: Scores {
                red: self.grid.red_count() as u32,
                blue: self.grid.blue_count() as u32,
            },
            stats: RoundStats {
                red_clusters: self.round.red_clusters,
                blue_clusters: self.round.blue_clusters,
                current_round: self.round.round_count,
                activity: self.round.activity,
                points_placed: self.round.points_placed,
                territory_control: (self.round.territory_control * 100.0).round() / 100.0,
            },
            timer: self.timer,
            game_over: self.phase == GamePhase::Finished,
            pattern: self.pattern.into(),
            final_stats: self.round.final_stats().cloned(),
        }
    }

    fn broadcast(&self, message: ServerMessage) -> Vec<OutboundMessage> {
        self.sessions
            .keys()
            .map(|&session_id| OutboundMessage {
                session_id,
                message: message.clone(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::patterns;

    fn test_pattern() -> &'static GamePattern {
        patterns::pattern_by_id(1).unwrap()
    }

    fn small_hub(reds: &[(usize, usize)]) -> GameHub {
        let mut grid = Grid::new(5, 5);
        for &(x, y) in reds {
            grid.set(x, y, Cell::Red);
        }
        GameHub::from_seeded(grid, test_pattern())
    }

    fn snapshot_fields(msg: &ServerMessage) -> (&Vec<Vec<u8>>, &RoundStats, bool) {
        match msg {
            ServerMessage::GridUpdate {
                grid,
                stats,
                game_over,
                ..
            } => (grid, stats, *game_over),
            other => panic!("expected grid update, got {other:?}"),
        }
    }

    #[test]
    fn join_receives_a_snapshot_immediately() {
        let mut hub = small_hub(&[(2, 2)]);
        let out = hub.join(7);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].session_id, 7);
        let (grid, stats, game_over) = snapshot_fields(&out[0].message);
        assert_eq!(grid[2][2], 1);
        assert_eq!(stats.current_round, 0);
        assert!(!game_over);
    }

    #[test]
    fn successful_placement_broadcasts_to_everyone() {
        let mut hub = small_hub(&[(2, 2)]);
        hub.join(1);
        hub.join(2);
        let out = hub.place_point(1, 0, 0);
        assert_eq!(out.len(), 2);
        for msg in &out {
            let (grid, stats, _) = snapshot_fields(&msg.message);
            assert_eq!(grid[0][0], 2);
            assert_eq!(stats.points_placed, 1);
        }
    }

    #[test]
    fn rejection_reaches_only_the_requester() {
        let mut hub = small_hub(&[(2, 2)]);
        hub.join(1);
        hub.join(2);
        let out = hub.place_point(1, 2, 2);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].session_id, 1);
        assert_eq!(
            out[0].message,
            ServerMessage::PlaceRejected {
                reason: PlaceError::CellOccupied
            }
        );

        let oob = hub.place_point(2, -1, 9);
        assert_eq!(
            oob[0].message,
            ServerMessage::PlaceRejected {
                reason: PlaceError::InvalidPlacement
            }
        );
    }

    #[test]
    fn isolated_red_cell_outlives_every_tick() {
        let mut hub = small_hub(&[(2, 2)]);
        hub.join(1);
        for _ in 0..20 {
            hub.tick().unwrap();
        }
        assert_eq!(hub.phase(), GamePhase::Running);
        assert_eq!(hub.grid().red_count(), 1);
        assert!(!hub.round().finished);
    }

    #[test]
    fn three_blues_eliminate_the_red_and_finish_the_game() {
        let mut hub = small_hub(&[(2, 2)]);
        hub.join(1);
        hub.place_point(1, 1, 1);
        hub.place_point(1, 1, 2);
        hub.place_point(1, 1, 3);

        let out = hub.tick().unwrap();
        let (grid, stats, game_over) = snapshot_fields(&out[0].message);
        assert_eq!(grid[2][2], 0);
        assert_eq!(stats.red_clusters, 0);
        assert!(game_over);
        assert_eq!(hub.phase(), GamePhase::Finished);

        let final_stats = hub.round().final_stats().unwrap();
        assert_eq!(final_stats.total_rounds, 1);
        assert_eq!(final_stats.points_placed, 3);
    }

    #[test]
    fn placements_after_finish_are_rejected_with_game_over() {
        let mut hub = small_hub(&[(2, 2)]);
        hub.join(1);
        hub.place_point(1, 1, 1);
        hub.place_point(1, 1, 2);
        hub.place_point(1, 1, 3);
        hub.tick().unwrap();

        let out = hub.place_point(1, 4, 4);
        assert_eq!(
            out[0].message,
            ServerMessage::PlaceRejected {
                reason: PlaceError::GameOver
            }
        );
        assert_eq!(hub.round().points_placed, 3);
    }

    #[test]
    fn ticks_after_finish_do_nothing() {
        let mut hub = small_hub(&[(2, 2)]);
        hub.join(1);
        hub.place_point(1, 1, 1);
        hub.place_point(1, 1, 2);
        hub.place_point(1, 1, 3);
        hub.tick().unwrap();
        let rounds = hub.round().round_count;

        let out = hub.tick().unwrap();
        assert!(out.is_empty());
        assert_eq!(hub.round().round_count, rounds);
    }

    #[test]
    fn joiner_after_finish_sees_final_stats() {
        let mut hub = small_hub(&[(2, 2)]);
        hub.join(1);
        hub.place_point(1, 1, 1);
        hub.place_point(1, 1, 2);
        hub.place_point(1, 1, 3);
        hub.tick().unwrap();

        let out = hub.join(99);
        match &out[0].message {
            ServerMessage::GridUpdate {
                game_over,
                final_stats,
                ..
            } => {
                assert!(*game_over);
                assert!(final_stats.is_some());
            }
            other => panic!("expected grid update, got {other:?}"),
        }
    }

    #[test]
    fn activity_tracks_placements_between_ticks() {
        let mut hub = small_hub(&[(0, 0), (4, 4)]);
        hub.join(1);
        hub.place_point(1, 2, 2);
        hub.place_point(1, 2, 3);
        hub.tick().unwrap();
        assert_eq!(hub.round().activity, 2);

        hub.tick().unwrap();
        assert_eq!(hub.round().activity, 0);
    }

    #[test]
    fn timer_updates_touch_nothing_but_the_countdown() {
        let mut hub = small_hub(&[(2, 2)]);
        hub.join(1);
        hub.join(2);
        let out = hub.set_timer(3);
        assert_eq!(out.len(), 2);
        for msg in &out {
            assert_eq!(msg.message, ServerMessage::TimerUpdate { timer: 3 });
        }
        assert_eq!(hub.round().round_count, 0);
        assert_eq!(hub.round().points_placed, 0);
    }

    #[test]
    fn ping_is_answered_with_pong_to_the_sender_only() {
        let mut hub = small_hub(&[(2, 2)]);
        hub.join(1);
        hub.join(2);
        let out = hub.handle_message(1, ClientMessage::Ping);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].session_id, 1);
        assert_eq!(out[0].message, ServerMessage::Pong);
    }

    #[test]
    fn leave_only_removes_the_session() {
        let mut hub = small_hub(&[(2, 2)]);
        hub.join(1);
        hub.join(2);
        hub.place_point(1, 0, 0);
        hub.handle_message(1, ClientMessage::Leave);
        assert_eq!(hub.session_count(), 1);
        assert_eq!(hub.grid().blue_count(), 1);
        assert_eq!(hub.round().points_placed, 1);
    }

    #[test]
    fn standard_game_seeds_from_the_pattern() {
        let hub = GameHub::new(test_pattern());
        assert!(hub.grid().red_count() > 0);
        assert_eq!(
            hub.round().initial_red_count,
            hub.grid().red_count() as u32
        );
        assert_eq!(hub.phase(), GamePhase::Running);
    }
}
