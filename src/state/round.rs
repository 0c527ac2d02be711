use serde::{Deserialize, Serialize};

use crate::config::ELIMINATION_THRESHOLD;

/// The accumulating per-game record. Mutated once per tick and once per
/// placement; frozen (except for the derived final stats) when `finished`
/// flips.
#[derive(Debug, Clone)]
pub struct GameRound {
    pub round_count: u32,
    pub points_placed: u32,
    placements_since_tick: u32,
    pub initial_red_count: u32,
    /// Placements received between the two most recent ticks.
    pub activity: u32,
    pub red_clusters: u32,
    pub blue_clusters: u32,
    pub territory_control: f64,
    pub finished: bool,
    final_stats: Option<FinalStats>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankInfo {
    pub title: String,
    pub description: String,
    pub score: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinalStats {
    pub total_rounds: u32,
    pub points_placed: u32,
    /// Eliminated reds per point placed, as a percentage.
    pub efficiency_ratio: f64,
    pub initial_red_count: u32,
    pub rank_info: RankInfo,
}

impl GameRound {
    pub fn new(initial_red_count: u32) -> Self {
        Self {
            round_count: 0,
            points_placed: 0,
            placements_since_tick: 0,
            initial_red_count,
            activity: 0,
            red_clusters: 0,
            blue_clusters: 0,
            territory_control: 0.0,
            finished: false,
            final_stats: None,
        }
    }

    pub fn record_placement(&mut self) {
        self.points_placed += 1;
        self.placements_since_tick += 1;
    }

    /// Advance the round counter and fold the placements made since the
    /// previous tick into `activity`.
    pub fn begin_tick(&mut self) {
        self.round_count += 1;
        self.activity = self.placements_since_tick;
        self.placements_since_tick = 0;
    }

    /// Flip to finished and derive the final stats exactly once. Repeated
    /// calls keep the first result.
    pub fn finish(&mut self, remaining_red: u32) -> &FinalStats {
        if !self.finished {
            self.finished = true;
            self.final_stats = Some(finalize(self, remaining_red));
        }
        self.final_stats.as_ref().expect("set when finished flips")
    }

    pub fn final_stats(&self) -> Option<&FinalStats> {
        self.final_stats.as_ref()
    }
}

/// Derive the final statistics and rank for a completed round. Pure: the
/// same round and remaining-red count always produce the same stats.
pub fn finalize(round: &GameRound, remaining_red: u32) -> FinalStats {
    let initial = round.initial_red_count;
    let eliminated = initial.saturating_sub(remaining_red);
    let efficiency_ratio = (eliminated as f64 / round.points_placed.max(1) as f64 * 100.0)
        .clamp(0.0, 1000.0);

    FinalStats {
        total_rounds: round.round_count,
        points_placed: round.points_placed,
        efficiency_ratio,
        initial_red_count: initial,
        rank_info: rank(round),
    }
}

fn rank(round: &GameRound) -> RankInfo {
    let initial = round.initial_red_count as f64;
    let points = round.points_placed as f64;
    let rounds = round.round_count as f64;

    let point_efficiency = if round.initial_red_count == 0 {
        0.0
    } else {
        initial / points.max(initial)
    };

    let theoretical_min =
        (round.initial_red_count as f64 / ELIMINATION_THRESHOLD as f64).ceil();
    let speed_rating = (-(rounds - theoretical_min) / 10.0).exp();

    let points_per_round = points / rounds.max(1.0);
    let placement_economy = (-(points_per_round - 2.0) / 3.0).exp();

    let weighted = 0.4 * point_efficiency * 1000.0
        + 0.4 * speed_rating * 1000.0
        + 0.2 * placement_economy * 1000.0;
    let score = weighted.clamp(0.0, 1000.0).round() as u32;

    let (title, description) = match score {
        900..=1000 => (
            "Master Tactician",
            "Perfect execution! Your strategy was flawless.",
        ),
        700..=899 => (
            "Excellent Strategist",
            "Outstanding performance! Your approach was highly effective.",
        ),
        500..=699 => (
            "Skilled Commander",
            "Well played! You showed good strategic thinking.",
        ),
        300..=499 => (
            "Capable Leader",
            "Good job! Keep practicing to improve your efficiency.",
        ),
        _ => (
            "Aspiring Strategist",
            "You achieved victory! Focus on efficiency to improve your rank.",
        ),
    };

    RankInfo {
        title: title.to_owned(),
        description: description.to_owned(),
        score,
    }
}
