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
    pub rules: RulesConfig,
    pub spawns: SpawnConfig,
    /// Resolved maze file, None → use the embedded maze.
    pub maze_file: Option<PathBuf>,
}

#[derive(Clone, Debug)]
pub struct SpeedConfig {
    /// Wall-clock duration of one frame.
    pub frame_ms: u64,
    /// Agents move every Nth frame.
    pub frames_per_move: u32,
    /// Frames per simulated second (drives the mode clock).
    pub frames_per_second: u32,
}

#[derive(Clone, Debug)]
pub struct RulesConfig {
    /// Simulated seconds before the one-shot Scatter → Chase switch.
    pub scatter_secs: u32,
    /// Frightened countdown length, in once-per-second decrements.
    pub frightened_charges: u32,
}

/// Fixed spawn coordinates, (row, col). Defaults match the embedded maze.
#[derive(Clone, Debug, Deserialize)]
pub struct SpawnConfig {
    #[serde(default = "default_player_spawn")]
    pub player: (usize, usize),
    #[serde(default = "default_ghost_home")]
    pub ghost_home: (usize, usize),
    /// Blinky, Pinky, Inky, Clyde — in that order.
    #[serde(default = "default_ghost_spawns")]
    pub ghosts: [(usize, usize); 4],
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    speed: TomlSpeed,
    #[serde(default)]
    rules: TomlRules,
    #[serde(default)]
    spawns: SpawnConfig,
    #[serde(default)]
    maze: TomlMaze,
}

#[derive(Deserialize, Debug)]
struct TomlSpeed {
    #[serde(default = "default_frame_ms")]
    frame_ms: u64,
    #[serde(default = "default_frames_per_move")]
    frames_per_move: u32,
    #[serde(default = "default_frames_per_second")]
    frames_per_second: u32,
}

#[derive(Deserialize, Debug)]
struct TomlRules {
    #[serde(default = "default_scatter_secs")]
    scatter_secs: u32,
    #[serde(default = "default_frightened_charges")]
    frightened_charges: u32,
}

#[derive(Deserialize, Debug)]
struct TomlMaze {
    #[serde(default = "default_maze_file")]
    file: String,
}

// ── Defaults ──

fn default_frame_ms() -> u64 { 16 }            // ~60 fps
fn default_frames_per_move() -> u32 { 10 }     // 6 moves per second
fn default_frames_per_second() -> u32 { 60 }
fn default_scatter_secs() -> u32 { 7 }
fn default_frightened_charges() -> u32 { 10 }
fn default_maze_file() -> String { "maze.txt".into() }

fn default_player_spawn() -> (usize, usize) { (11, 12) }
fn default_ghost_home() -> (usize, usize) { (9, 12) }
fn default_ghost_spawns() -> [(usize, usize); 4] {
    [(9, 12), (8, 11), (8, 12), (8, 13)]
}

impl Default for TomlSpeed {
    fn default() -> Self {
        TomlSpeed {
            frame_ms: default_frame_ms(),
            frames_per_move: default_frames_per_move(),
            frames_per_second: default_frames_per_second(),
        }
    }
}

impl Default for TomlRules {
    fn default() -> Self {
        TomlRules {
            scatter_secs: default_scatter_secs(),
            frightened_charges: default_frightened_charges(),
        }
    }
}

impl Default for TomlMaze {
    fn default() -> Self {
        TomlMaze { file: default_maze_file() }
    }
}

impl Default for SpawnConfig {
    fn default() -> Self {
        SpawnConfig {
            player: default_player_spawn(),
            ghost_home: default_ghost_home(),
            ghosts: default_ghost_spawns(),
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig::from_toml(TomlConfig::default())
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
        let maze_file = resolve_maze_file(&toml_cfg.maze.file, &candidate_dirs());
        GameConfig {
            speed: SpeedConfig {
                frame_ms: toml_cfg.speed.frame_ms,
                frames_per_move: toml_cfg.speed.frames_per_move,
                frames_per_second: toml_cfg.speed.frames_per_second,
            },
            rules: RulesConfig {
                scatter_secs: toml_cfg.rules.scatter_secs,
                frightened_charges: toml_cfg.rules.frightened_charges,
            },
            spawns: toml_cfg.spawns,
            maze_file,
        }
    }
}

/// Resolve a maze file name against the candidate directories.
/// Absolute paths are kept as-is (missing files surface as load errors);
/// relative names that are found nowhere resolve to None → embedded maze.
fn resolve_maze_file(name: &str, search_dirs: &[PathBuf]) -> Option<PathBuf> {
    let path = PathBuf::from(name);
    if path.is_absolute() {
        return Some(path);
    }
    search_dirs
        .iter()
        .map(|d| d.join(name))
        .find(|p| p.is_file())
}

/// Candidate directories to search: exe dir + CWD (deduplicated).
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    if let Ok(exe) = std::env::current_exe() {
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            dirs.push(parent.to_path_buf());
        }
    }

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
