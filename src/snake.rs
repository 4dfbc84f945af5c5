use crate::error::SnakeError;
use crate::landscape::{Cell, Coordinate, Landscape};
use crate::sensor::{DistanceSensor, Perception};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

pub const INITIAL_LENGTH: usize = 3;

/// Absolute moves, indexed the way the policy emits them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    Left = 0,
    Right = 1,
    Up = 2,
    Down = 3,
}

impl Action {
    pub const COUNT: usize = 4;
    pub const ALL: [Action; Action::COUNT] = [Action::Left, Action::Right, Action::Up, Action::Down];

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn delta(self) -> (i32, i32) {
        match self {
            Action::Left => (-1, 0),
            Action::Right => (1, 0),
            Action::Up => (0, -1),
            Action::Down => (0, 1),
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Action::Left => Action::Right,
            Action::Right => Action::Left,
            Action::Up => Action::Down,
            Action::Down => Action::Up,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeathCause {
    Wall,
    SelfCollision,
}

/// Result of a single [`Snake::act`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Move {
    Moved,
    Ate,
    Died(DeathCause),
}

#[derive(Debug, Clone)]
pub struct Snake {
    body: VecDeque<Coordinate>,
    heading: Action,
    alive: bool,
    landscape: Landscape,
    sensor: DistanceSensor,
}

impl Snake {
    /// Three segments along the top row with the head at `(2, 0)`, heading right.
    pub fn new(width: u16, height: u16) -> Result<Self, SnakeError> {
        let body = (0..INITIAL_LENGTH as i32)
            .rev()
            .map(|x| Coordinate::new(x, 0))
            .collect();
        Self::with_body(width, height, body)
    }

    /// Builds a snake from explicit segments, head first.
    pub fn with_body(width: u16, height: u16, body: Vec<Coordinate>) -> Result<Self, SnakeError> {
        if body.len() < INITIAL_LENGTH {
            return Err(SnakeError::InvalidBody("body needs at least three segments"));
        }
        let mut landscape = Landscape::new(width, height);
        for (i, &seg) in body.iter().enumerate() {
            if !landscape.in_bounds(seg) {
                return Err(SnakeError::InvalidBody("segment outside the grid"));
            }
            if landscape.query(seg) == Cell::Body {
                return Err(SnakeError::InvalidBody("segments overlap"));
            }
            if i > 0 && !seg.touches(body[i - 1]) {
                return Err(SnakeError::InvalidBody("segments are not contiguous"));
            }
            landscape.set_body(seg);
        }
        let heading = Action::ALL
            .into_iter()
            .find(|a| body[1].offset(a.delta()) == body[0])
            .unwrap_or(Action::Right);

        Ok(Self {
            body: body.into(),
            heading,
            alive: true,
            landscape,
            sensor: DistanceSensor,
        })
    }

    pub fn head(&self) -> Coordinate {
        self.body[0]
    }

    pub fn tail(&self) -> Coordinate {
        self.body[self.body.len() - 1]
    }

    pub fn body(&self) -> &VecDeque<Coordinate> {
        &self.body
    }

    pub fn size(&self) -> usize {
        self.body.len()
    }

    pub fn heading(&self) -> Action {
        self.heading
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    pub fn landscape(&self) -> &Landscape {
        &self.landscape
    }

    /// Apple planting goes through here; the body is only ever changed by `act`.
    pub fn plant_apple(&mut self, c: Coordinate) -> bool {
        self.landscape.plant_apple(c)
    }

    pub fn sense(&self) -> Perception {
        self.sensor.sense(self.head(), &self.landscape)
    }

    pub fn act(&mut self, action: Action) -> Result<Move, SnakeError> {
        if !self.alive {
            return Err(SnakeError::Dead);
        }
        let target = self.head().offset(action.delta());

        let ate = match self.landscape.query(target) {
            Cell::Wall => return Ok(self.die(DeathCause::Wall)),
            // the tail moves out of the way on the same step
            Cell::Body if target != self.tail() => return Ok(self.die(DeathCause::SelfCollision)),
            Cell::Apple => true,
            Cell::Body | Cell::Empty => false,
        };

        if !ate {
            if let Some(tail) = self.body.pop_back() {
                self.landscape.clear(tail);
            }
        }
        self.body.push_front(target);
        self.landscape.set_body(target);
        self.heading = action;

        Ok(if ate { Move::Ate } else { Move::Moved })
    }

    fn die(&mut self, cause: DeathCause) -> Move {
        self.alive = false;
        Move::Died(cause)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spawn_marks_three_cells() {
        let snake = Snake::new(15, 15).unwrap();
        assert_eq!(snake.size(), 3);
        assert!(snake.is_alive());
        assert_eq!(snake.head(), Coordinate::new(2, 0));
        assert_eq!(snake.heading(), Action::Right);
        for x in 0..3 {
            assert_eq!(snake.landscape().query(Coordinate::new(x, 0)), Cell::Body);
        }
    }

    #[test]
    fn action_indices_round_trip() {
        for a in Action::ALL {
            assert_eq!(Action::from_index(a.index()), Some(a));
            assert_eq!(a.opposite().opposite(), a);
        }
        assert_eq!(Action::from_index(4), None);
    }

    #[test]
    fn rejects_broken_bodies() {
        let c = Coordinate::new;
        assert!(Snake::with_body(5, 5, vec![c(0, 0), c(1, 0)]).is_err());
        assert!(Snake::with_body(5, 5, vec![c(0, 0), c(1, 0), c(3, 0)]).is_err());
        assert!(Snake::with_body(5, 5, vec![c(0, 0), c(1, 0), c(0, 0)]).is_err());
        assert!(Snake::with_body(5, 5, vec![c(4, 0), c(5, 0), c(6, 0)]).is_err());
    }

    #[test]
    fn heading_follows_the_neck() {
        let c = Coordinate::new;
        let snake = Snake::with_body(5, 5, vec![c(1, 2), c(1, 1), c(1, 0)]).unwrap();
        assert_eq!(snake.heading(), Action::Down);
    }

    #[test]
    fn dead_snake_refuses_to_act() {
        let mut snake = Snake::new(15, 15).unwrap();
        assert_eq!(snake.act(Action::Up), Ok(Move::Died(DeathCause::Wall)));
        let before = snake.body().clone();
        assert_eq!(snake.act(Action::Down), Err(SnakeError::Dead));
        assert_eq!(snake.body(), &before);
    }
}
