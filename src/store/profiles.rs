//! Game profile store: built-in defaults merged with persisted overrides

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use serde::Deserialize;
use tracing::warn;

use super::StoreError;
use crate::sim::sensitivity::GameProfile;

/// Keyed set of per-title profiles
pub type ProfileSet = BTreeMap<String, GameProfile>;

/// On-disk document shape
#[derive(Debug, Deserialize)]
struct ProfileDocument {
    #[serde(default)]
    profiles: BTreeMap<String, ProfilePatch>,
}

/// Partial profile as persisted: absent fields fall back to the defaults
#[derive(Debug, Default, Deserialize)]
struct ProfilePatch {
    name: Option<String>,
    yaw: Option<f32>,
    hipfire_sens: Option<f32>,
    ads_sens: Option<f32>,
    dpi: Option<f32>,
    fov_h_deg: Option<f32>,
    x_factor: Option<f32>,
    scope_modifier: Option<f32>,
}

impl ProfilePatch {
    fn apply(self, base: &mut GameProfile) {
        if let Some(name) = self.name {
            base.name = name;
        }
        if let Some(yaw) = self.yaw {
            base.yaw = yaw;
        }
        if let Some(sens) = self.hipfire_sens {
            base.hipfire_sens = sens;
        }
        if let Some(ads) = self.ads_sens {
            base.ads_sens = ads;
        }
        if let Some(dpi) = self.dpi {
            base.dpi = dpi;
        }
        if let Some(fov) = self.fov_h_deg {
            base.fov_h_deg = fov;
        }
        if let Some(x_factor) = self.x_factor {
            base.x_factor = Some(x_factor);
        }
        if let Some(scope_modifier) = self.scope_modifier {
            base.scope_modifier = Some(scope_modifier);
        }
    }
}

/// Loads and saves the per-title sensitivity profiles
pub struct ProfileStore {
    path: PathBuf,
}

impl ProfileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Built-in default profile set
    pub fn defaults() -> ProfileSet {
        let mut profiles = ProfileSet::new();
        profiles.insert(
            "cs2".to_string(),
            GameProfile {
                name: "Counter-Strike 2".to_string(),
                yaw: 0.022,
                hipfire_sens: 1.5,
                ads_sens: 1.0,
                dpi: 800.0,
                fov_h_deg: 106.26,
                x_factor: None,
                scope_modifier: None,
            },
        );
        profiles.insert(
            "valorant".to_string(),
            GameProfile {
                name: "Valorant".to_string(),
                yaw: 0.07,
                hipfire_sens: 0.35,
                ads_sens: 1.0,
                dpi: 800.0,
                fov_h_deg: 103.0,
                x_factor: None,
                scope_modifier: None,
            },
        );
        profiles.insert(
            "marvel_rivals".to_string(),
            GameProfile {
                name: "Marvel Rivals".to_string(),
                yaw: 0.0066,
                hipfire_sens: 2.0,
                ads_sens: 1.0,
                dpi: 800.0,
                fov_h_deg: 103.0,
                x_factor: None,
                scope_modifier: None,
            },
        );
        profiles.insert(
            "r6".to_string(),
            GameProfile {
                name: "Rainbow Six Siege".to_string(),
                yaw: 0.0057296,
                hipfire_sens: 50.0,
                ads_sens: 50.0,
                dpi: 800.0,
                fov_h_deg: 90.0,
                x_factor: Some(0.02),
                scope_modifier: Some(0.6),
            },
        );
        profiles.insert(
            "ow2".to_string(),
            GameProfile {
                name: "Overwatch 2".to_string(),
                yaw: 0.0066,
                hipfire_sens: 4.0,
                ads_sens: 1.0,
                dpi: 800.0,
                fov_h_deg: 103.0,
                x_factor: None,
                scope_modifier: None,
            },
        );
        profiles
    }

    /// Load profiles, merging any persisted overrides over the defaults.
    /// Missing or malformed storage is never fatal: the defaults win.
    pub fn load(&self) -> ProfileSet {
        let mut merged = Self::defaults();

        match fs::read_to_string(&self.path) {
            Ok(raw) => match serde_json::from_str::<ProfileDocument>(&raw) {
                Ok(doc) => {
                    for (key, patch) in doc.profiles {
                        if let Some(base) = merged.get_mut(&key) {
                            patch.apply(base);
                        }
                    }
                }
                Err(err) => {
                    warn!(path = %self.path.display(), %err, "Malformed profile file, using defaults");
                }
            },
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
            Err(err) => {
                warn!(path = %self.path.display(), %err, "Failed to read profile file, using defaults");
            }
        }

        for profile in merged.values_mut() {
            profile.sanitize();
        }
        merged
    }

    /// Persist the full profile set
    pub fn save(&self, profiles: &ProfileSet) -> Result<(), StoreError> {
        let payload = serde_json::json!({ "profiles": profiles });
        fs::write(&self.path, serde_json::to_string_pretty(&payload)?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("aim_trainer_{}_{}.json", name, std::process::id()))
    }

    #[test]
    fn missing_file_yields_defaults() {
        let store = ProfileStore::new(temp_path("missing"));
        let profiles = store.load();
        assert_eq!(profiles.len(), 5);
        assert_eq!(profiles["cs2"].yaw, 0.022);
        assert_eq!(profiles["r6"].x_factor, Some(0.02));
    }

    #[test]
    fn corrupt_file_falls_back_to_defaults() {
        let path = temp_path("corrupt");
        fs::write(&path, "{not json").unwrap();
        let profiles = ProfileStore::new(&path).load();
        assert_eq!(profiles.len(), 5);
        assert_eq!(profiles["valorant"].hipfire_sens, 0.35);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn overrides_merge_field_by_field_over_defaults() {
        let path = temp_path("merge");
        fs::write(
            &path,
            r#"{ "profiles": { "cs2": { "hipfire_sens": 2.2, "dpi": 1600 } } }"#,
        )
        .unwrap();

        let profiles = ProfileStore::new(&path).load();
        let cs2 = &profiles["cs2"];
        assert_eq!(cs2.hipfire_sens, 2.2);
        assert_eq!(cs2.dpi, 1600.0);
        // Absent fields keep the defaults
        assert_eq!(cs2.yaw, 0.022);
        assert_eq!(cs2.name, "Counter-Strike 2");
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn out_of_range_overrides_are_clamped_on_load() {
        let path = temp_path("clamp");
        fs::write(
            &path,
            r#"{ "profiles": { "ow2": { "dpi": 999999, "yaw": -1.0 } } }"#,
        )
        .unwrap();

        let profiles = ProfileStore::new(&path).load();
        assert_eq!(profiles["ow2"].dpi, 6400.0);
        assert_eq!(profiles["ow2"].yaw, 0.0001);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn save_then_load_round_trips_edits() {
        let path = temp_path("roundtrip");
        let store = ProfileStore::new(&path);

        let mut profiles = ProfileStore::defaults();
        profiles.get_mut("cs2").unwrap().hipfire_sens = 0.9;
        store.save(&profiles).unwrap();

        let reloaded = store.load();
        assert_eq!(reloaded["cs2"].hipfire_sens, 0.9);
        let _ = fs::remove_file(&path);
    }
}
