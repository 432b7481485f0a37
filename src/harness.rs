//! Monte Carlo experiments over complete self-play games.
//!
//! A round plays many independent games between a subject player and an
//! opponent that opens randomly and then plays optimally. The subject moves
//! first in a configurable share of the games, optionally with a forced
//! opening. Sweeps repeat rounds while varying one of those settings.

use crate::board::Marker;
use crate::chart::Chart;
use crate::error::{Error, Result};
use crate::game::{GameState, play_silently};
use crate::player::{Opening, Player};
use crate::random::{CustomNumberGenerator, RandomGenerator, StandardRandomGenerator};
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info};

/// Result of one game from the subject's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TrialOutcome {
    Win,
    Draw,
    Loss,
}

/// Aggregated outcomes of a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct TrialCounts {
    pub trials: usize,
    pub wins: usize,
    pub draws: usize,
    pub losses: usize,
}

impl TrialCounts {
    pub fn record(mut self, outcome: TrialOutcome) -> Self {
        self.trials += 1;
        match outcome {
            TrialOutcome::Win => self.wins += 1,
            TrialOutcome::Draw => self.draws += 1,
            TrialOutcome::Loss => self.losses += 1,
        }
        self
    }

    pub fn merge(self, other: TrialCounts) -> Self {
        Self {
            trials: self.trials + other.trials,
            wins: self.wins + other.wins,
            draws: self.draws + other.draws,
            losses: self.losses + other.losses,
        }
    }
}

/// Percentages of a round relative to its trial count.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RoundResult {
    pub counts: TrialCounts,
    pub win_pct: f64,
    pub draw_pct: f64,
    pub win_or_draw_pct: f64,
}

impl RoundResult {
    /// A round without trials reports 0% everywhere.
    pub fn from_counts(counts: TrialCounts) -> Self {
        let pct = |count: usize| {
            if counts.trials == 0 {
                0.0
            } else {
                count as f64 * 100.0 / counts.trials as f64
            }
        };
        let win_pct = pct(counts.wins);
        let draw_pct = pct(counts.draws);
        Self {
            counts,
            win_pct,
            draw_pct,
            win_or_draw_pct: win_pct + draw_pct,
        }
    }

    pub fn loss_pct(&self) -> f64 {
        if self.counts.trials == 0 {
            0.0
        } else {
            100.0 - self.win_or_draw_pct
        }
    }
}

/// Runs rounds and sweeps.
///
/// With a seed, every trial draws from its own deterministic generator, so a
/// seeded experiment gives the same counts whether or not it runs in
/// parallel.
#[derive(Debug, Clone, Default)]
pub struct Harness {
    seed: Option<u64>,
    parallel: bool,
}

impl Harness {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Plays `trial_count` games and aggregates the subject's results.
    ///
    /// [`subject_first_count`] games have the subject moving first with
    /// `opening`; in the rest it moves second and searches from its first
    /// move.
    pub fn run_round(
        &self,
        p1_probability: f64,
        trial_count: usize,
        opening: Opening,
    ) -> Result<RoundResult> {
        if !(0.0..=1.0).contains(&p1_probability) {
            return Err(Error::InvalidProbability {
                value: p1_probability,
            });
        }

        let subject_first = subject_first_count(trial_count, p1_probability);
        let trial = |index: usize| self.run_trial(index, index < subject_first, opening);

        let counts = if self.parallel {
            (0..trial_count)
                .into_par_iter()
                .map(trial)
                .try_fold(TrialCounts::default, |acc, outcome| {
                    outcome.map(|outcome| acc.record(outcome))
                })
                .try_reduce(TrialCounts::default, |a, b| Ok(a.merge(b)))?
        } else {
            (0..trial_count).try_fold(TrialCounts::default(), |acc, index| {
                trial(index).map(|outcome| acc.record(outcome))
            })?
        };

        let result = RoundResult::from_counts(counts);
        info!(
            p1_probability,
            trial_count,
            subject_first,
            %opening,
            win_pct = result.win_pct,
            draw_pct = result.draw_pct,
            "round finished"
        );
        Ok(result)
    }

    /// Runs one round per forced first move 0..=8.
    pub fn sweep_first_move(&self, p1_probability: f64, trial_count: usize) -> Result<Chart> {
        self.sweep_first_move_with(p1_probability, trial_count, |_, _| {})
    }

    /// Like [`Harness::sweep_first_move`], reporting each point as it completes.
    pub fn sweep_first_move_with(
        &self,
        p1_probability: f64,
        trial_count: usize,
        mut on_point: impl FnMut(f64, &RoundResult),
    ) -> Result<Chart> {
        let mut chart = Chart::new(
            format!("Outcome by first move (p1 probability {p1_probability}, {trial_count} trials)"),
            "First move position",
        );
        for position in 0..9 {
            let round = self.run_round(p1_probability, trial_count, Opening::Fixed(position))?;
            on_point(position as f64, &round);
            chart.push(position as f64, &round);
        }
        info!(title = %chart.title, "first move sweep finished");
        Ok(chart)
    }

    /// Runs one round per probability `i / steps` for `i` in `0..=steps`.
    pub fn sweep_player1_probability(
        &self,
        steps: usize,
        trial_count: usize,
        opening: Opening,
    ) -> Result<Chart> {
        self.sweep_player1_probability_with(steps, trial_count, opening, |_, _| {})
    }

    /// Like [`Harness::sweep_player1_probability`], reporting each point as it
    /// completes.
    pub fn sweep_player1_probability_with(
        &self,
        steps: usize,
        trial_count: usize,
        opening: Opening,
        mut on_point: impl FnMut(f64, &RoundResult),
    ) -> Result<Chart> {
        if steps == 0 {
            return Err(Error::InvalidConfiguration {
                message: "probability sweep needs at least one step".to_string(),
            });
        }

        let mut chart = Chart::new(
            format!("Outcome by probability of moving first ({opening} opening, {trial_count} trials)"),
            "Probability of moving first",
        );
        for step in 0..=steps {
            let p1_probability = step as f64 / steps as f64;
            let round = self.run_round(p1_probability, trial_count, opening)?;
            on_point(p1_probability, &round);
            chart.push(p1_probability, &round);
        }
        info!(title = %chart.title, "probability sweep finished");
        Ok(chart)
    }

    fn run_trial(&self, index: usize, subject_first: bool, opening: Opening) -> Result<TrialOutcome> {
        match self.seed {
            Some(seed) => play_trial(subject_first, opening, |seat| {
                CustomNumberGenerator::for_trial(seed, index * 2 + seat)
            }),
            None => play_trial(subject_first, opening, |_| StandardRandomGenerator),
        }
    }
}

/// Number of trials in which the subject moves first.
///
/// Halves round to even, so `5` trials at `0.5` give `2`.
pub fn subject_first_count(trial_count: usize, p1_probability: f64) -> usize {
    ((trial_count as f64 * p1_probability).round_ties_even() as usize).min(trial_count)
}

/// Plays one game between the subject and a random-opening opponent.
fn play_trial<R: RandomGenerator>(
    subject_first: bool,
    opening: Opening,
    random: impl Fn(usize) -> R,
) -> Result<TrialOutcome> {
    let (mut player1, mut player2): (Player<R>, Player<R>) = if subject_first {
        (
            Player::automatic_with_opening(Marker::X, opening, random(0)),
            Player::automatic_with_opening(Marker::O, Opening::Random, random(1)),
        )
    } else {
        (
            Player::automatic_with_opening(Marker::X, Opening::Random, random(1)),
            Player::automatic_with_opening(Marker::O, Opening::Search, random(0)),
        )
    };

    let record = play_silently(&mut player1, &mut player2)?;
    let outcome = match (record.state, subject_first) {
        (GameState::Player1Won, true) | (GameState::Player2Won, false) => TrialOutcome::Win,
        (GameState::Player1Won, false) | (GameState::Player2Won, true) => TrialOutcome::Loss,
        _ => TrialOutcome::Draw,
    };
    debug!(subject_first, moves = ?record.moves, ?outcome, "trial finished");
    Ok(outcome)
}
