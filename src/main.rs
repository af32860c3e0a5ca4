//! Slidetui — 2048-style sliding-tile puzzle in the terminal.

mod app;
mod flow;
mod grid;
mod input;
mod theme;
mod ui;

use anyhow::Result;
use app::App;
use clap::{Parser, ValueEnum};
use log::{info, warn};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Engine parameters derived from the CLI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameConfig {
    pub width: usize,
    pub height: usize,
    pub win_value: u32,
    pub seed: Option<u64>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("win value {0} must be a power of two and at least 4")]
    WinValue(u32),
    #[error("a {0}x{1} board has no room for the two starting tiles")]
    BoardTooSmall(u16, u16),
}

impl GameConfig {
    pub fn from_args(args: &Args) -> Result<Self, ConfigError> {
        if args.win < 4 || !args.win.is_power_of_two() {
            return Err(ConfigError::WinValue(args.win));
        }
        if u32::from(args.width) * u32::from(args.height) < 2 {
            return Err(ConfigError::BoardTooSmall(args.width, args.height));
        }
        Ok(Self {
            width: args.width as usize,
            height: args.height as usize,
            win_value: args.win,
            seed: args.seed,
        })
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.log_file.as_deref())?;
    let config = GameConfig::from_args(&args)?;
    let theme = theme::Theme::load(args.theme.as_deref(), args.palette).unwrap_or_else(|e| {
        warn!("theme not loaded ({e}), using One Dark");
        let mut theme = theme::Theme::default();
        theme.apply_palette(args.palette);
        theme
    });
    info!(
        "starting {}x{} board, win at {}, seed {:?}",
        config.width, config.height, config.win_value, config.seed
    );
    App::new(config, theme).run()
}

/// Logs stay off unless RUST_LOG is set or a log file is given, so nothing draws over the board.
fn init_logging(log_file: Option<&Path>) -> Result<()> {
    let default_level = if log_file.is_some() { "info" } else { "off" };
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level));
    if let Some(path) = log_file {
        let file = std::fs::File::create(path)?;
        builder
            .target(env_logger::Target::Pipe(Box::new(file)))
            .write_style(env_logger::WriteStyle::Never);
    }
    builder.try_init()?;
    Ok(())
}

/// 2048-style sliding-tile puzzle in the terminal.
#[derive(Debug, Parser)]
#[command(
    name = "slidetui",
    version,
    about = "2048-style sliding-tile puzzle in the terminal. Slide tiles, merge equal neighbours, reach 2048.",
    long_about = "Slidetui is a terminal take on 2048.\n\n\
        Every move slides all tiles one way; two equal tiles that meet merge into their sum, \
        which is added to your score. A new 2 or 4 appears after each move that changes the \
        board. Reach the target tile to win; run out of moves and the game is over.\n\n\
        CONTROLS:\n  W/A/S/D or arrows  Slide   (vim: k/h/j/l)\n  R  Restart    Q / Esc  Quit"
)]
pub struct Args {
    /// Board width in columns.
    #[arg(long, default_value_t = grid::DEFAULT_WIDTH as u16, value_name = "COLS", value_parser = clap::value_parser!(u16).range(1..=8))]
    pub width: u16,

    /// Board height in rows.
    #[arg(long, default_value_t = grid::DEFAULT_HEIGHT as u16, value_name = "ROWS", value_parser = clap::value_parser!(u16).range(1..=8))]
    pub height: u16,

    /// Tile value that wins the game (power of two).
    #[arg(long, default_value_t = grid::DEFAULT_WIN_VALUE, value_name = "N")]
    pub win: u32,

    /// Seed for tile spawns; same seed and moves give the same game.
    #[arg(long, value_name = "N")]
    pub seed: Option<u64>,

    /// Path to theme file (btop-style theme[key]=\"value\"). Uses One Dark if not set.
    #[arg(short, long, value_name = "FILE")]
    pub theme: Option<PathBuf>,

    /// Tile colour palette: normal (theme), high-contrast, or colorblind.
    #[arg(long, default_value = "normal")]
    pub palette: Palette,

    /// Write logs to this file (level from RUST_LOG, default info).
    #[arg(long, value_name = "FILE")]
    pub log_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Palette {
    #[default]
    Normal,

    #[value(alias = "highcontrast", alias = "contrast")]
    HighContrast,

    #[value(alias = "colourblind")]
    Colorblind,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("slidetui").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_defaults() {
        let config = GameConfig::from_args(&parse(&[])).unwrap();
        assert_eq!(
            config,
            GameConfig {
                width: 4,
                height: 4,
                win_value: 2048,
                seed: None,
            }
        );
    }

    #[test]
    fn test_custom_board() {
        let args = parse(&["--width", "5", "--height", "3", "--win", "512", "--seed", "9"]);
        let config = GameConfig::from_args(&args).unwrap();
        assert_eq!((config.width, config.height, config.win_value), (5, 3, 512));
        assert_eq!(config.seed, Some(9));
    }

    #[test]
    fn test_rejects_bad_win_value() {
        assert_eq!(
            GameConfig::from_args(&parse(&["--win", "1000"])),
            Err(ConfigError::WinValue(1000))
        );
        assert_eq!(
            GameConfig::from_args(&parse(&["--win", "2"])),
            Err(ConfigError::WinValue(2))
        );
    }

    #[test]
    fn test_rejects_tiny_board() {
        let args = parse(&["--width", "1", "--height", "1"]);
        assert_eq!(GameConfig::from_args(&args), Err(ConfigError::BoardTooSmall(1, 1)));
    }

    #[test]
    fn test_rejects_out_of_range_width() {
        assert!(Args::try_parse_from(["slidetui", "--width", "9"]).is_err());
        assert!(Args::try_parse_from(["slidetui", "--height", "0"]).is_err());
    }

    #[test]
    fn test_palette_alias() {
        assert_eq!(parse(&["--palette", "contrast"]).palette, Palette::HighContrast);
    }
}
