/// External configuration loader.
///
/// Reads `config.toml` from the executable's directory (or CWD).
/// Falls back to sensible defaults if the file is missing or incomplete.

use serde::Deserialize;
use std::path::PathBuf;

// ── Public Config Struct ──

#[derive(Clone, Debug)]
pub struct GameConfig {
    pub speed: SpeedConfig,
    pub board: BoardConfig,
}

#[derive(Clone, Debug)]
pub struct SpeedConfig {
    /// Tick interval in normal mode.
    pub normal_ms: u64,
    /// Tick interval in slow (relaxed) mode.
    pub slow_ms: u64,
}

#[derive(Clone, Debug)]
pub struct BoardConfig {
    pub grid_size: i32,
    pub lives: u32,
    pub snake_length: usize,
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    speed: TomlSpeed,
    #[serde(default)]
    board: TomlBoard,
}

#[derive(Deserialize, Debug)]
struct TomlSpeed {
    #[serde(default = "default_normal_ms")]
    normal_ms: u64,
    #[serde(default = "default_slow_ms")]
    slow_ms: u64,
}

#[derive(Deserialize, Debug)]
struct TomlBoard {
    #[serde(default = "default_grid_size")]
    grid_size: i32,
    #[serde(default = "default_lives")]
    lives: u32,
    #[serde(default = "default_snake_length")]
    snake_length: usize,
}

// ── Defaults ──

fn default_normal_ms() -> u64 { 400 }
fn default_slow_ms() -> u64 { 600 }
fn default_grid_size() -> i32 { 20 }
fn default_lives() -> u32 { 5 }
fn default_snake_length() -> usize { 3 }

impl Default for TomlSpeed {
    fn default() -> Self {
        TomlSpeed {
            normal_ms: default_normal_ms(),
            slow_ms: default_slow_ms(),
        }
    }
}

impl Default for TomlBoard {
    fn default() -> Self {
        TomlBoard {
            grid_size: default_grid_size(),
            lives: default_lives(),
            snake_length: default_snake_length(),
        }
    }
}

// ── Loading ──

impl GameConfig {
    /// Load config from `config.toml`.
    /// Search order: (1) exe directory, (2) current working directory.
    /// Missing file or missing keys gracefully fall back to defaults.
    pub fn load() -> Self {
        let toml_cfg = load_toml(&candidate_dirs());
        GameConfig::from_toml(toml_cfg)
    }

    fn from_toml(toml_cfg: TomlConfig) -> Self {
        // Clamp to values the simulation can actually host: the board
        // must fit the spawn snake with room to move.
        let grid_size = toml_cfg.board.grid_size.max(4);
        let max_length = (grid_size / 2) as usize;
        GameConfig {
            speed: SpeedConfig {
                normal_ms: toml_cfg.speed.normal_ms.max(1),
                slow_ms: toml_cfg.speed.slow_ms.max(1),
            },
            board: BoardConfig {
                grid_size,
                lives: toml_cfg.board.lives.max(1),
                snake_length: toml_cfg.board.snake_length.clamp(1, max_length),
            },
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig::from_toml(TomlConfig::default())
    }
}

/// Candidate directories to search: exe dir + CWD (deduplicated).
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    // 1. Directory of the running executable
    if let Ok(exe) = std::env::current_exe() {
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            dirs.push(parent.to_path_buf());
        }
    }

    // 2. Current working directory
    if let Ok(cwd) = std::env::current_dir() {
        if !dirs.iter().any(|d| d == &cwd) {
            dirs.push(cwd);
        }
    }

    if dirs.is_empty() {
        dirs.push(PathBuf::from("."));
    }

    dirs
}

/// Search for config.toml in candidate directories.
fn load_toml(search_dirs: &[PathBuf]) -> TomlConfig {
    for dir in search_dirs {
        let path = dir.join("config.toml");
        if path.exists() {
            match std::fs::read_to_string(&path) {
                Ok(text) => match toml::from_str::<TomlConfig>(&text) {
                    Ok(cfg) => return cfg,
                    Err(e) => {
                        eprintln!("Warning: config.toml parse error: {e}");
                        eprintln!("Using default settings.");
                        return TomlConfig::default();
                    }
                },
                Err(e) => {
                    eprintln!("Warning: could not read {}: {e}", path.display());
                }
            }
        }
    }
    TomlConfig::default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_shipped_values() {
        let cfg = GameConfig::default();
        assert_eq!(cfg.speed.normal_ms, 400);
        assert_eq!(cfg.speed.slow_ms, 600);
        assert_eq!(cfg.board.grid_size, 20);
        assert_eq!(cfg.board.lives, 5);
        assert_eq!(cfg.board.snake_length, 3);
    }

    #[test]
    fn partial_toml_fills_missing_keys() {
        let toml_cfg: TomlConfig = toml::from_str("[speed]\nnormal_ms = 150\n").unwrap();
        let cfg = GameConfig::from_toml(toml_cfg);
        assert_eq!(cfg.speed.normal_ms, 150);
        assert_eq!(cfg.speed.slow_ms, 600);
        assert_eq!(cfg.board.grid_size, 20);
    }

    #[test]
    fn hostile_values_are_clamped() {
        let toml_cfg: TomlConfig =
            toml::from_str("[board]\ngrid_size = 2\nlives = 0\nsnake_length = 99\n").unwrap();
        let cfg = GameConfig::from_toml(toml_cfg);
        assert_eq!(cfg.board.grid_size, 4);
        assert_eq!(cfg.board.lives, 1);
        assert_eq!(cfg.board.snake_length, 2);
    }
}
