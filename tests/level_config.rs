//! Loading levels from disk.

use std::io::Write;

use echoes::level::{LevelConfig, LevelError};
use echoes::session::GameSession;
use echoes::enemy::EnemyType;
use echoes::world::{WorldId, ETER};
use static_assertions::assert_impl_all;
use tempfile::NamedTempFile;

assert_impl_all!(GameSession: Send, Sync, Clone);
assert_impl_all!(LevelError: std::error::Error, Send, Sync);

#[test]
fn level_round_trips_through_a_file() {
    let level = LevelConfig::default();
    let json = level
        .to_json_string()
        .unwrap_or_else(|e| panic!("level should serialise: {e}"));
    let mut file = NamedTempFile::new().unwrap_or_else(|e| panic!("temp file: {e}"));
    file.write_all(json.as_bytes())
        .unwrap_or_else(|e| panic!("write level: {e}"));

    let loaded =
        LevelConfig::from_path(file.path()).unwrap_or_else(|e| panic!("load level: {e}"));
    assert_eq!(loaded, level);
}

#[test]
fn missing_file_reports_its_path() {
    let dir = tempfile::tempdir().unwrap_or_else(|e| panic!("temp dir: {e}"));
    let path = dir.path().join("absent.json");
    match LevelConfig::from_path(&path) {
        Err(LevelError::Io { path: reported, .. }) => assert_eq!(reported, path),
        other => panic!("expected an I/O error, got {other:?}"),
    }
}

const MINIMAL: &str = r#"{
    "sections": [
        {
            "id": 0,
            "name": "yard",
            "bounds": { "x_min": -4.0, "x_max": 4.0, "z_min": -4.0, "z_max": 4.0 },
            "key": true,
            "rosters": { "1": [ { "kind": "melee", "x": 1.0, "z": 1.0 } ] }
        }
    ],
    "worlds": [
        {
            "id": 1,
            "name": "Eter",
            "melee": { "hp": 2, "speed": 3.2, "behaviour": "backstab" },
            "ranged": { "hp": 3, "speed": 2.0, "behaviour": "kite_burst", "burst": 2 }
        }
    ],
    "player_start": [0.0, 0.0],
    "altar": { "position": [3.0, 3.0] }
}"#;

#[test]
fn minimal_document_uses_defaults() {
    let level =
        LevelConfig::from_json_str(MINIMAL).unwrap_or_else(|e| panic!("parse: {e}"));
    assert!(level.validate().is_ok());

    let session = GameSession::starting_in(level.clone(), ETER)
        .unwrap_or_else(|e| panic!("start in Eter: {e}"));
    assert_eq!(session.world(), ETER);
    assert!(matches!(
        GameSession::starting_in(level, WorldId(0)),
        Err(LevelError::UndeclaredWorld(WorldId(0)))
    ));
}

#[test]
fn hitless_enemies_are_rejected_before_a_session_starts() {
    let json = MINIMAL.replacen(r#""hp": 2"#, r#""hp": 0"#, 1);
    match LevelConfig::from_json_str(&json) {
        Err(LevelError::EmptyProfile { world, kind }) => {
            assert_eq!(world, ETER);
            assert_eq!(kind, EnemyType::Melee);
        }
        other => panic!("expected an empty profile error, got {other:?}"),
    }
}
