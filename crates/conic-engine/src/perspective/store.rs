use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::coords::Vec3;

use super::Camera;

/// String key-value store used to persist the camera between sessions.
pub trait CameraStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: String);
}

/// In-process store. Useful for tests and for hosts that persist elsewhere.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CameraStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) {
        self.entries.insert(key.to_string(), value);
    }
}

/// Store backed by a single JSON object on disk.
///
/// Entries are loaded on open and written back by [`flush`](Self::flush).
/// A missing or unreadable file opens as an empty store.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: HashMap<String, String>,
}

impl FileStore {
    pub fn open(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let entries = match Self::read(&path) {
            Ok(entries) => entries,
            Err(e) => {
                log::warn!("camera store {}: {e:#}", path.display());
                HashMap::new()
            }
        };
        Self { path, entries }
    }

    fn read(path: &Path) -> Result<HashMap<String, String>> {
        if !path.exists() {
            return Ok(HashMap::new());
        }
        let text = std::fs::read_to_string(path).context("failed to read camera store")?;
        serde_json::from_str(&text).context("camera store is not a JSON object of strings")
    }

    /// Writes all entries to disk.
    pub fn flush(&self) -> Result<()> {
        let text = serde_json::to_string_pretty(&self.entries)
            .context("failed to encode camera store")?;
        std::fs::write(&self.path, text)
            .with_context(|| format!("failed to write {}", self.path.display()))
    }
}

impl CameraStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) {
        self.entries.insert(key.to_string(), value);
    }
}

/// Smallest component of `upward` orthogonal to `forward` accepted on load.
const MIN_ORTHOGONAL: f32 = 1e-3;

fn key(prefix: &str, name: &str) -> String {
    format!("{prefix}:camera-{name}")
}

fn read_json(store: &dyn CameraStore, prefix: &str, name: &str) -> Option<serde_json::Value> {
    let k = key(prefix, name);
    let raw = store.get(&k)?;
    match serde_json::from_str(&raw) {
        Ok(v) => Some(v),
        Err(e) => {
            log::warn!("ignoring stored `{k}`: {e}");
            None
        }
    }
}

fn read_vec3(store: &dyn CameraStore, prefix: &str, name: &str) -> Option<Vec3> {
    let value = read_json(store, prefix, name)?;
    let parts = value.as_array().filter(|a| a.len() == 3)?;
    let mut out = [0.0f32; 3];
    for (slot, part) in out.iter_mut().zip(parts) {
        *slot = part.as_f64()? as f32;
    }
    Some(Vec3::from(out))
}

fn read_f32(store: &dyn CameraStore, prefix: &str, name: &str) -> Option<f32> {
    read_json(store, prefix, name)?.as_f64().map(|v| v as f32)
}

impl Camera {
    /// Restores camera state saved under `prefix`.
    ///
    /// Missing or malformed entries fall back to the default camera field by
    /// field. Directions that are not finite and non-zero are rejected,
    /// `upward` is re-orthogonalized against `forward` (a near-parallel pair
    /// keeps the default orientation), and the scale is held to the floor.
    pub fn load(store: &dyn CameraStore, prefix: &str) -> Camera {
        let mut cam = Camera::default();

        let direction = |name| {
            read_vec3(store, prefix, name).filter(|v| v.is_finite() && v.length() > 0.0)
        };

        if let Some(p) = read_vec3(store, prefix, "position").filter(|v| v.is_finite()) {
            cam.position = p;
        }
        if let (Some(f), Some(u)) = (direction("forward"), direction("upward")) {
            let f = f.normalized();
            let u = u.normalized();
            let ortho = u - f * u.dot(f);
            if ortho.length() >= MIN_ORTHOGONAL {
                cam.forward = f;
                cam.upward = ortho.normalized();
            } else {
                log::warn!("ignoring stored camera orientation: forward and upward are parallel");
            }
        }
        if let Some(s) = read_f32(store, prefix, "scale") {
            if s.is_finite() && s >= Camera::MIN_SCALE {
                cam.scale = s;
            } else {
                log::warn!("ignoring stored camera scale {s}");
            }
        }

        cam
    }

    /// Saves camera state under `prefix`.
    pub fn save(&self, store: &mut dyn CameraStore, prefix: &str) {
        let entries = [
            ("position", serde_json::to_string(&self.position.to_array())),
            ("forward", serde_json::to_string(&self.forward.to_array())),
            ("upward", serde_json::to_string(&self.upward.to_array())),
            ("scale", serde_json::to_string(&self.scale)),
        ];
        for (name, encoded) in entries {
            match encoded {
                Ok(v) => store.set(&key(prefix, name), v),
                Err(e) => log::warn!("failed to encode camera {name}: {e}"),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_memory_store() {
        let mut cam = Camera::default();
        cam.move_by(10.0, 20.0, 30.0);
        cam.rotate_by(1.0, 0.5);
        cam.change_scale_by(0.25);

        let mut store = MemoryStore::new();
        cam.save(&mut store, "conic");
        let loaded = Camera::load(&store, "conic");

        assert!((loaded.position - cam.position).length() < 1e-4);
        assert!((loaded.forward - cam.forward).length() < 1e-4);
        assert!((loaded.scale - cam.scale).abs() < 1e-6);
    }

    #[test]
    fn prefixes_are_isolated() {
        let mut cam = Camera::default();
        cam.scale = 3.0;
        let mut store = MemoryStore::new();
        cam.save(&mut store, "a");
        assert_eq!(Camera::load(&store, "b"), Camera::default());
    }

    #[test]
    fn malformed_entries_fall_back_to_defaults() {
        let mut store = MemoryStore::new();
        store.set("conic:camera-position", "not json".into());
        store.set("conic:camera-scale", "0.01".into());
        store.set("conic:camera-forward", "[0, 0, 0]".into());
        assert_eq!(Camera::load(&store, "conic"), Camera::default());
    }

    #[test]
    fn parallel_orientation_keeps_default_pair() {
        let mut store = MemoryStore::new();
        store.set("conic:camera-forward", "[0, 0, -1]".into());
        store.set("conic:camera-upward", "[0, 0, -1]".into());
        let cam = Camera::load(&store, "conic");
        assert_eq!(cam.forward, Camera::default().forward);
        assert_eq!(cam.upward, Camera::default().upward);

        let p = cam.transform(Vec3::new(100.0, 50.0, 0.0));
        assert!(p.x.abs() > 1.0);
    }

    #[test]
    fn skewed_upward_is_orthogonalized() {
        let mut store = MemoryStore::new();
        store.set("conic:camera-forward", "[0, 0, -2]".into());
        store.set("conic:camera-upward", "[0, 1, 1]".into());
        let cam = Camera::load(&store, "conic");
        assert!(cam.forward.dot(cam.upward).abs() < 1e-5);
        assert!((cam.upward.length() - 1.0).abs() < 1e-5);
        assert!((cam.upward - Vec3::new(0.0, 1.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn file_store_persists_entries() {
        let path = std::env::temp_dir().join(format!("conic-camera-{}.json", std::process::id()));
        let mut store = FileStore::open(&path);
        store.set("conic:camera-scale", "2.0".into());
        store.flush().unwrap();

        let reopened = FileStore::open(&path);
        assert_eq!(reopened.get("conic:camera-scale").as_deref(), Some("2.0"));
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn unreadable_file_opens_empty() {
        let path = std::env::temp_dir().join(format!("conic-bad-{}.json", std::process::id()));
        std::fs::write(&path, "[1, 2").unwrap();
        let store = FileStore::open(&path);
        assert!(store.get("anything").is_none());
        let _ = std::fs::remove_file(&path);
    }
}
