use crate::apple::AppleGenerator;
use crate::brain::Policy;
use crate::config::EpisodeConfig;
use crate::draw::Render;
use crate::error::GameError;
use crate::snake::{Action, DeathCause, INITIAL_LENGTH, Move, Snake};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Termination {
    Died(DeathCause),
    /// `max_steps_per_apple` steps passed without eating.
    Starved,
    /// No free cell left for the next apple.
    BoardFull,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpisodeReport {
    pub score: usize,
    pub num_steps: u64,
    pub length: usize,
    pub alive: bool,
    pub termination: Option<Termination>,
}

/// One play-through: plants apples and steps the snake until it dies, starves,
/// or fills the board.
#[derive(Debug, Clone)]
pub struct SnakeGame {
    snake: Snake,
    apples: AppleGenerator,
    max_steps_per_apple: u32,
    num_steps: u64,
    steps_since_last_apple: u32,
    started: bool,
    termination: Option<Termination>,
}

impl SnakeGame {
    pub fn new(config: &EpisodeConfig) -> Result<Self, GameError> {
        config.validate()?;
        let snake = Snake::new(config.width, config.height)?;
        Self::with_snake(snake, config)
    }

    pub fn with_snake(snake: Snake, config: &EpisodeConfig) -> Result<Self, GameError> {
        config.validate()?;
        let apples = AppleGenerator::new(snake.landscape().size(), config.seed);
        Ok(Self {
            snake,
            apples,
            max_steps_per_apple: config.max_steps_per_apple,
            num_steps: 0,
            steps_since_last_apple: 0,
            started: false,
            termination: None,
        })
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn score(&self) -> usize {
        self.snake.size().saturating_sub(INITIAL_LENGTH)
    }

    pub fn num_steps(&self) -> u64 {
        self.num_steps
    }

    pub fn termination(&self) -> Option<Termination> {
        self.termination
    }

    pub fn is_finished(&self) -> bool {
        self.termination.is_some()
    }

    pub fn report(&self) -> EpisodeReport {
        EpisodeReport {
            score: self.score(),
            num_steps: self.num_steps,
            length: self.snake.size(),
            alive: self.snake.is_alive(),
            termination: self.termination,
        }
    }

    /// Plants the first apple. Called implicitly by `step` and `play`.
    pub fn start(&mut self) {
        if !self.started {
            self.started = true;
            if self.snake.landscape().apple().is_none() {
                self.plant_next_apple();
            }
        }
    }

    /// Advances one step. Returns the termination once the episode is over;
    /// further calls are no-ops.
    pub fn step<P: Policy + ?Sized>(&mut self, policy: &P) -> Result<Option<Termination>, GameError> {
        check_action_space(policy)?;
        self.start();
        if self.termination.is_some() {
            return Ok(self.termination);
        }

        let action_index = policy.decide(&self.snake.sense())?;
        let action = Action::from_index(action_index).ok_or(GameError::InvalidAction(action_index))?;

        let outcome = self.snake.act(action)?;
        self.num_steps += 1;
        match outcome {
            Move::Died(cause) => self.termination = Some(Termination::Died(cause)),
            Move::Ate => {
                self.steps_since_last_apple = 0;
                self.plant_next_apple();
            }
            Move::Moved => self.steps_since_last_apple += 1,
        }
        if self.termination.is_none() && self.steps_since_last_apple >= self.max_steps_per_apple {
            self.termination = Some(Termination::Starved);
        }
        debug!(step = self.num_steps, ?action, "\n{}", self.snake.landscape());
        Ok(self.termination)
    }

    pub fn play<P, R>(&mut self, policy: &P, render: &mut R) -> Result<EpisodeReport, GameError>
    where
        P: Policy + ?Sized,
        R: Render + ?Sized,
    {
        check_action_space(policy)?;
        self.start();
        render.render(self.snake.landscape());
        while self.termination.is_none() {
            self.step(policy)?;
            render.render(self.snake.landscape());
        }
        let report = self.report();
        debug!(
            steps = report.num_steps,
            score = report.score,
            termination = ?report.termination,
            "episode finished"
        );
        Ok(report)
    }

    fn plant_next_apple(&mut self) {
        if self.snake.landscape().is_full() {
            self.termination = Some(Termination::BoardFull);
            return;
        }
        for candidate in self.apples.by_ref() {
            if self.snake.plant_apple(candidate) {
                break;
            }
        }
    }
}

fn check_action_space<P: Policy + ?Sized>(policy: &P) -> Result<(), GameError> {
    match policy.action_size() {
        Action::COUNT => Ok(()),
        actual => Err(GameError::ActionSpace {
            expected: Action::COUNT,
            actual,
        }),
    }
}
