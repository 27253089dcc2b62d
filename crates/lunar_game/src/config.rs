//! Gameplay tuning, loaded from `assets/config/game.json`. Every field has a
//! default matching the shipped balance, so a missing or partial file is not
//! fatal, the caller decides whether to warn and fall back.

use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// World travel speed in units/second while running.
    pub speed: f32,
    /// Score threshold for the win transition.
    pub win_score: u32,
    /// Seconds of run time between barrier spawns.
    pub barrier_spawn_interval: f32,
    /// Travel-axis position where new barriers appear.
    pub barrier_spawn_z: f32,
    /// Travel-axis position behind which barriers are culled and scored.
    pub barrier_cull_z: f32,
    /// Lateral offsets of the three lanes, left to right.
    pub lane_offsets: [f32; 3],
    /// Fraction of the remaining lateral distance covered per frame.
    pub lane_follow: f32,
    /// Upward velocity applied on jump, units/second.
    pub jump_impulse: f32,
    /// World speed multiplier while airborne.
    pub jump_speed_factor: f32,
    pub gravity: f32,
    pub ground_count: usize,
    pub ground_length: f32,
    pub road_count: usize,
    pub road_length: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            speed: 8.0,
            win_score: 200,
            barrier_spawn_interval: 1.2,
            barrier_spawn_z: 70.0,
            barrier_cull_z: -15.0,
            lane_offsets: [-0.925, 0.0, 0.925],
            lane_follow: 0.2,
            jump_impulse: 3.0,
            jump_speed_factor: 0.8,
            gravity: 9.81,
            ground_count: 3,
            ground_length: 140.0,
            road_count: 20,
            road_length: 9.82,
        }
    }
}

pub fn load_tuning_from_path(path: &Path) -> Result<Tuning, String> {
    let raw =
        fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {e}", path.display()))?;
    let tuning: Tuning = serde_json::from_str(&raw)
        .map_err(|e| format!("Failed to parse tuning JSON {}: {e}", path.display()))?;
    validate_tuning(&tuning)?;
    Ok(tuning)
}

fn validate_tuning(tuning: &Tuning) -> Result<(), String> {
    if tuning.speed <= 0.0 {
        return Err("Tuning validation failed: speed must be > 0".to_string());
    }
    if tuning.win_score == 0 {
        return Err("Tuning validation failed: win_score must be > 0".to_string());
    }
    if tuning.barrier_spawn_interval <= 0.0 {
        return Err("Tuning validation failed: barrier_spawn_interval must be > 0".to_string());
    }
    if tuning.barrier_cull_z >= tuning.barrier_spawn_z {
        return Err(
            "Tuning validation failed: barrier_cull_z must be behind barrier_spawn_z".to_string(),
        );
    }
    if !(tuning.lane_follow > 0.0 && tuning.lane_follow <= 1.0) {
        return Err("Tuning validation failed: lane_follow must be in (0, 1]".to_string());
    }
    if tuning.lane_offsets[0] >= tuning.lane_offsets[1]
        || tuning.lane_offsets[1] >= tuning.lane_offsets[2]
    {
        return Err("Tuning validation failed: lane_offsets must be strictly ascending".to_string());
    }
    if tuning.jump_impulse <= 0.0 || tuning.gravity <= 0.0 {
        return Err("Tuning validation failed: jump_impulse and gravity must be > 0".to_string());
    }
    if !(tuning.jump_speed_factor > 0.0 && tuning.jump_speed_factor <= 1.0) {
        return Err("Tuning validation failed: jump_speed_factor must be in (0, 1]".to_string());
    }
    if tuning.ground_count == 0 || tuning.road_count == 0 {
        return Err("Tuning validation failed: segment counts must be > 0".to_string());
    }
    if tuning.ground_length <= 0.0 || tuning.road_length <= 0.0 {
        return Err("Tuning validation failed: segment lengths must be > 0".to_string());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_file_path(name_hint: &str) -> std::path::PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time before unix epoch")
            .as_nanos();
        std::env::temp_dir().join(format!(
            "lunar_tuning_test_{}_{}_{}.json",
            name_hint,
            std::process::id(),
            nanos
        ))
    }

    #[test]
    fn defaults_match_shipped_balance() {
        let tuning = Tuning::default();
        assert_eq!(tuning.speed, 8.0);
        assert_eq!(tuning.win_score, 200);
        assert_eq!(tuning.lane_offsets, [-0.925, 0.0, 0.925]);
        assert_eq!(tuning.ground_count, 3);
        assert_eq!(tuning.road_count, 20);
        validate_tuning(&tuning).expect("defaults must validate");
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let path = temp_file_path("partial");
        fs::write(&path, r#"{ "speed": 12.5, "win_score": 300 }"#).expect("write temp file");

        let tuning = load_tuning_from_path(&path).expect("partial tuning should load");
        assert_eq!(tuning.speed, 12.5);
        assert_eq!(tuning.win_score, 300);
        assert_eq!(tuning.road_length, 9.82);

        let _ = fs::remove_file(path);
    }

    #[test]
    fn rejects_non_positive_speed() {
        let path = temp_file_path("bad_speed");
        fs::write(&path, r#"{ "speed": 0.0 }"#).expect("write temp file");
        let err = load_tuning_from_path(&path).expect_err("zero speed should fail");
        assert!(err.contains("speed must be > 0"));
        let _ = fs::remove_file(path);
    }

    #[test]
    fn rejects_unsorted_lanes() {
        let path = temp_file_path("bad_lanes");
        fs::write(&path, r#"{ "lane_offsets": [0.0, -1.0, 1.0] }"#).expect("write temp file");
        let err = load_tuning_from_path(&path).expect_err("unsorted lanes should fail");
        assert!(err.contains("lane_offsets"));
        let _ = fs::remove_file(path);
    }

    #[test]
    fn rejects_cull_ahead_of_spawn() {
        let path = temp_file_path("bad_cull");
        fs::write(
            &path,
            r#"{ "barrier_spawn_z": 10.0, "barrier_cull_z": 20.0 }"#,
        )
        .expect("write temp file");
        let err = load_tuning_from_path(&path).expect_err("cull ahead of spawn should fail");
        assert!(err.contains("barrier_cull_z"));
        let _ = fs::remove_file(path);
    }
}
