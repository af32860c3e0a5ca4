//! Game flow: turn loop over a grid engine, a display sink and an action source.

use crate::grid::{Board, Direction, GridEngine};
use anyhow::Result;
use log::{debug, info, trace};

/// Player action, already mapped from raw input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Up,
    Down,
    Left,
    Right,
    Restart,
    Exit,
}

impl Action {
    pub fn direction(self) -> Option<Direction> {
        match self {
            Self::Up => Some(Direction::Up),
            Self::Down => Some(Direction::Down),
            Self::Left => Some(Direction::Left),
            Self::Right => Some(Direction::Right),
            Self::Restart | Self::Exit => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowState {
    Init,
    Playing,
    Won,
    Lost,
    Exit,
}

/// What the display should say about the board it is drawing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Playing,
    Won,
    Lost,
}

/// Draws one frame per loop iteration.
pub trait DisplaySink {
    fn render(&mut self, score: u64, highscore: u64, board: &Board, status: Status) -> Result<()>;
}

/// Blocks until the next recognised action.
pub trait ActionSource {
    fn next_action(&mut self) -> Result<Action>;
}

pub struct GameFlow<D, A> {
    engine: GridEngine,
    display: D,
    actions: A,
    state: FlowState,
}

impl<D: DisplaySink, A: ActionSource> GameFlow<D, A> {
    pub fn new(engine: GridEngine, display: D, actions: A) -> Self {
        Self {
            engine,
            display,
            actions,
            state: FlowState::Init,
        }
    }

    pub fn state(&self) -> FlowState {
        self.state
    }

    pub fn engine(&self) -> &GridEngine {
        &self.engine
    }

    /// Run one session until the player exits.
    pub fn run(&mut self) -> Result<()> {
        while self.state() != FlowState::Exit {
            self.state = self.step()?;
        }
        Ok(())
    }

    /// Do the current state's work and return the state to enter next.
    pub fn step(&mut self) -> Result<FlowState> {
        match self.state {
            FlowState::Init => {
                self.engine.reset()?;
                info!(
                    "new game with {} tiles, highscore {}",
                    self.engine.board().filled_count(),
                    self.engine.highscore()
                );
                Ok(FlowState::Playing)
            }
            FlowState::Playing => self.play_turn(),
            FlowState::Won => self.await_restart(Status::Won),
            FlowState::Lost => self.await_restart(Status::Lost),
            FlowState::Exit => Ok(FlowState::Exit),
        }
    }

    fn render(&mut self, status: Status) -> Result<()> {
        self.display.render(
            self.engine.score(),
            self.engine.highscore(),
            self.engine.board(),
            status,
        )
    }

    fn play_turn(&mut self) -> Result<FlowState> {
        self.render(Status::Playing)?;
        let action = self.actions.next_action()?;
        match action.direction() {
            Some(direction) => self.slide(direction),
            None if action == Action::Restart => Ok(FlowState::Init),
            None => Ok(FlowState::Exit),
        }
    }

    fn slide(&mut self, direction: Direction) -> Result<FlowState> {
        if !self.engine.make_move(direction)? {
            trace!("{:?} changes nothing", direction);
            return Ok(FlowState::Playing);
        }
        debug!("{:?} applied, score {}", direction, self.engine.score());
        if self.engine.is_win() {
            info!("reached {} with score {}", self.engine.win_value(), self.engine.score());
            return Ok(FlowState::Won);
        }
        if self.engine.is_game_over() {
            info!("no moves left, final score {}", self.engine.score());
            return Ok(FlowState::Lost);
        }
        Ok(FlowState::Playing)
    }

    fn await_restart(&mut self, status: Status) -> Result<FlowState> {
        self.render(status)?;
        Ok(match self.actions.next_action()? {
            Action::Restart => FlowState::Init,
            _ => FlowState::Exit,
        })
    }
}
