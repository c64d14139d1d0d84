//! Level-set files.
//!
//! A level set is stored as JSON (`.json`) or YAML (`.yaml` / `.yml`) with the
//! shape of [`LevelSet`]: `{ "levels": [ { "id": 1, "walls": [[[x, y], ...]],
//! "floors": [...], "doors": [...], "switches": [...], "start": [x, y],
//! "end": [x, y] } ] }`. `polys` is accepted as an alias of `floors`.

use std::path::Path;

use ghostmaze_common::{LevelId, SwitchUid};

use crate::level::LevelSet;

/// Errors from loading or validating level data.
#[derive(Debug, thiserror::Error)]
pub enum LevelError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("unsupported level file extension: {0:?}")]
    UnsupportedFormat(String),
    #[error("duplicate level id {0}")]
    DuplicateLevel(LevelId),
    #[error("duplicate {uid} in {level}")]
    DuplicateSwitch { level: LevelId, uid: SwitchUid },
    #[error("unknown {0}")]
    UnknownLevel(LevelId),
}

/// On-disk encodings of a level set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelFormat {
    Json,
    Yaml,
}

impl LevelFormat {
    /// Pick the format from a file extension.
    pub fn from_path(path: &Path) -> Result<Self, LevelError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        match ext.as_str() {
            "json" => Ok(Self::Json),
            "yaml" | "yml" => Ok(Self::Yaml),
            _ => Err(LevelError::UnsupportedFormat(ext)),
        }
    }
}

/// Parse and validate a level set from text.
pub fn parse_level_set(text: &str, format: LevelFormat) -> Result<LevelSet, LevelError> {
    let set: LevelSet = match format {
        LevelFormat::Json => serde_json::from_str(text)?,
        LevelFormat::Yaml => serde_yaml::from_str(text)?,
    };
    set.validate()?;
    Ok(set)
}

/// Read, parse and validate a level-set file.
pub fn load_level_set(path: impl AsRef<Path>) -> Result<LevelSet, LevelError> {
    let path = path.as_ref();
    let format = LevelFormat::from_path(path)?;
    let text = std::fs::read_to_string(path)?;
    let set = parse_level_set(&text, format)?;
    tracing::info!(path = %path.display(), levels = set.len(), "loaded level set");
    Ok(set)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const ONE_LEVEL_JSON: &str = r#"{
        "levels": [{
            "id": 1,
            "walls": [[[0, 0], [100, 0]]],
            "polys": [[[0, 0], [100, 0], [0, 100]]],
            "doors": [{ "polygon": [[0, 0], [0, 50]] }],
            "switches": [{ "uid": 9, "position": [20, 20] }],
            "start": [10, 10],
            "end": [90, 10]
        }]
    }"#;

    #[test]
    fn parses_json_with_polys_alias() {
        let set = parse_level_set(ONE_LEVEL_JSON, LevelFormat::Json).unwrap();
        let level = set.get(LevelId(1)).unwrap();
        assert_eq!(level.floors.len(), 1);
        assert_eq!(level.walls[0].len(), 2);
        assert!(!level.doors[0].open);
        assert_eq!(level.switches[0].uid, SwitchUid(9));
        assert!(!level.switches[0].pressed);
    }

    #[test]
    fn parses_yaml() {
        let yaml = "levels:\n  - id: 2\n    start: [0, 0]\n    end: [5, 5]\n";
        let set = parse_level_set(yaml, LevelFormat::Yaml).unwrap();
        assert_eq!(set.levels[0].id, LevelId(2));
        assert!(set.levels[0].walls.is_empty());
    }

    #[test]
    fn format_from_extension() {
        assert_eq!(
            LevelFormat::from_path(Path::new("a/b.JSON")).unwrap(),
            LevelFormat::Json
        );
        assert_eq!(
            LevelFormat::from_path(Path::new("set.yml")).unwrap(),
            LevelFormat::Yaml
        );
        assert!(matches!(
            LevelFormat::from_path(Path::new("set.toml")),
            Err(LevelError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        file.write_all(ONE_LEVEL_JSON.as_bytes()).unwrap();
        let set = load_level_set(file.path()).unwrap();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn load_rejects_duplicate_switches() {
        let json = r#"{ "levels": [{ "id": 1, "start": [0, 0], "end": [1, 1],
            "switches": [{ "uid": 1, "position": [0, 0] }, { "uid": 1, "position": [1, 1] }] }] }"#;
        let err = parse_level_set(json, LevelFormat::Json).unwrap_err();
        assert!(matches!(err, LevelError::DuplicateSwitch { .. }));
    }

    #[test]
    fn bundled_arena_parses() {
        let text = include_str!("../../../levels/arena.yaml");
        let set = parse_level_set(text, LevelFormat::Yaml).unwrap();
        assert_eq!(set.len(), 2);
        let first = set.require(LevelId(10)).unwrap();
        assert_eq!(first.doors.len(), 2);
        assert_eq!(first.switches.len(), 3);
        assert_eq!(set.require(LevelId(11)).unwrap().floors.len(), 1);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_level_set("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, LevelError::Io(_)));
    }
}
