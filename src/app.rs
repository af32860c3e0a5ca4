//! App: terminal init, one game session, terminal restore.

use crate::GameConfig;
use crate::flow::GameFlow;
use crate::grid::{GridEngine, GridError};
use crate::input::TerminalInput;
use crate::theme::Theme;
use crate::ui::TerminalDisplay;
use anyhow::Result;
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use log::info;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::io::Write;

pub struct App {
    config: GameConfig,
    theme: Theme,
}

impl App {
    pub fn new(config: GameConfig, theme: Theme) -> Self {
        Self { config, theme }
    }

    /// Engine sized and seeded from the config; board is empty until the first reset.
    fn engine(&self) -> Result<GridEngine, GridError> {
        let rng = match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        GridEngine::new(
            self.config.height,
            self.config.width,
            self.config.win_value,
            rng,
        )
    }

    pub fn run(&self) -> Result<()> {
        enable_raw_mode()?;
        let mut stdout = std::io::stdout();
        enter_alternate_screen(&mut stdout)?;

        let result = ratatui::DefaultTerminal::new(ratatui::backend::CrosstermBackend::new(stdout))
            .map_err(anyhow::Error::from)
            .and_then(|terminal| self.run_session(terminal));

        // Restore both even if one step fails
        let left = execute!(std::io::stdout(), LeaveAlternateScreen);
        let raw = disable_raw_mode();
        result?;
        left?;
        raw?;
        Ok(())
    }

    fn run_session(&self, mut terminal: ratatui::DefaultTerminal) -> Result<()> {
        terminal.hide_cursor()?;
        let display = TerminalDisplay::new(terminal, self.theme.clone());
        let mut flow = GameFlow::new(self.engine()?, display, TerminalInput);
        let result = flow.run();
        info!(
            "session over, score {} highscore {}",
            flow.engine().score(),
            flow.engine().highscore()
        );
        result
    }
}

/// Switch `out` to the alternate screen; leaves raw mode off again if that fails.
fn enter_alternate_screen<W: Write>(out: &mut W) -> Result<()> {
    if let Err(e) = execute!(out, EnterAlternateScreen) {
        let _ = disable_raw_mode();
        return Err(e.into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::Error::from(io::ErrorKind::BrokenPipe))
        }

        fn flush(&mut self) -> io::Result<()> {
            Err(io::Error::from(io::ErrorKind::BrokenPipe))
        }
    }

    #[test]
    fn test_alternate_screen_failure_is_reported() {
        let err = enter_alternate_screen(&mut BrokenPipe).unwrap_err();
        assert_eq!(
            err.downcast_ref::<io::Error>().map(io::Error::kind),
            Some(io::ErrorKind::BrokenPipe)
        );
    }

    #[test]
    fn test_alternate_screen_written_to_sink() {
        let mut out = Vec::new();
        enter_alternate_screen(&mut out).unwrap();
        assert!(!out.is_empty());
    }
}
