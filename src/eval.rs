use crate::brain::Policy;
use crate::config::EpisodeConfig;
use crate::draw::NoRender;
use crate::error::GameError;
use crate::game::{EpisodeReport, SnakeGame};
use rayon::prelude::*;
use serde::Serialize;

/// Plays one episode per seed in parallel. Reports come back in seed order.
pub fn evaluate<P>(policy: &P, config: &EpisodeConfig, seeds: &[u64]) -> Result<Vec<EpisodeReport>, GameError>
where
    P: Policy + Sync + ?Sized,
{
    config.validate()?;
    seeds
        .par_iter()
        .map(|&seed| SnakeGame::new(&config.with_seed(seed))?.play(policy, &mut NoRender))
        .collect()
}

/// Scores every policy on the same episode seed.
pub fn evaluate_population<P>(policies: &[P], config: &EpisodeConfig) -> Result<Vec<EpisodeReport>, GameError>
where
    P: Policy + Sync,
{
    config.validate()?;
    policies
        .par_iter()
        .map(|policy| SnakeGame::new(config)?.play(policy, &mut NoRender))
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Summary {
    pub episodes: usize,
    pub mean_score: f64,
    pub best_score: usize,
    pub mean_steps: f64,
}

impl Summary {
    pub fn of(reports: &[EpisodeReport]) -> Self {
        let n = reports.len().max(1) as f64;
        Self {
            episodes: reports.len(),
            mean_score: reports.iter().map(|r| r.score as f64).sum::<f64>() / n,
            best_score: reports.iter().map(|r| r.score).max().unwrap_or(0),
            mean_steps: reports.iter().map(|r| r.num_steps as f64).sum::<f64>() / n,
        }
    }
}
