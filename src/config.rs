// Tuning constants for the authoritative game server.

/// Board dimensions, fixed for the lifetime of a game.
pub const GRID_WIDTH: usize = 30;
pub const GRID_HEIGHT: usize = 30;

/// Seconds between simulation ticks.
pub const TICK_INTERVAL_SECS: u32 = 5;

/// A blue cell survives a tick iff its blue Moore-neighbor count is in
/// [SURVIVAL_MIN, SURVIVAL_MAX].
pub const SURVIVAL_MIN: usize = 2;
pub const SURVIVAL_MAX: usize = 3;

/// An empty cell becomes blue iff it has exactly this many blue neighbors.
pub const BIRTH_NEIGHBORS: usize = 3;

/// A red cell is eliminated when at least this many blue neighbors surround
/// it in the pre-tick snapshot.
pub const ELIMINATION_THRESHOLD: usize = 3;

/// Difficulty band used when picking the starting obstacle pattern.
pub const MIN_PATTERN_DIFFICULTY: u8 = 1;
pub const MAX_PATTERN_DIFFICULTY: u8 = 5;

/// Seconds between liveness probes; a session that has not answered the
/// previous probe by the time the next one fires is considered lost.
pub const PING_PERIOD_SECS: u64 = 15;

/// Per-session outbound buffer. Snapshots for a session that cannot drain
/// this many messages are dropped rather than delaying other sessions.
pub const OUTBOUND_BUFFER: usize = 64;

/// Default WebSocket bind address.
pub const DEFAULT_ADDR: &str = "0.0.0.0:9001";
