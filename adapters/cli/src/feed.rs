//! Fixed-delay snapshot feed backed by a document on disk.

use std::{fs, path::PathBuf, time::Duration};

use anyhow::{Context, Result};
use laser_arena_core::WorldSnapshot;
use laser_arena_world::World;

/// Re-reads a snapshot document on a fixed delay, one tick at a time.
///
/// The feed is fire-and-forget per tick: there is no retry or backpressure,
/// and a failed tick leaves the previously parsed world untouched.
pub(crate) struct SnapshotFeed {
    path: PathBuf,
    interval: Duration,
    elapsed: Duration,
}

impl SnapshotFeed {
    pub(crate) fn new(path: PathBuf, interval: Duration) -> Self {
        Self {
            path,
            interval,
            elapsed: Duration::ZERO,
        }
    }

    /// Loads and parses the snapshot immediately.
    pub(crate) fn load(&self) -> Result<World> {
        let payload = fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read snapshot at {}", self.path.display()))?;
        let snapshot =
            WorldSnapshot::from_json_str(&payload).context("snapshot payload is malformed")?;
        World::parse(&snapshot).context("snapshot could not be parsed into a world")
    }

    /// Accumulates frame time and reloads once per elapsed interval.
    ///
    /// Returns `Ok(None)` while the interval has not elapsed yet; a zero
    /// interval reloads on every frame.
    pub(crate) fn poll(&mut self, frame_dt: Duration) -> Result<Option<World>> {
        self.elapsed += frame_dt;
        if self.elapsed < self.interval {
            return Ok(None);
        }

        self.elapsed = Duration::ZERO;
        self.load().map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    const PAYLOAD: &str = r##"{
        "dimensions": {"width": 2, "height": 2},
        "staticObjects": [],
        "tanks": [{
            "position": [0, 1],
            "color": "#0af",
            "orientation": "east",
            "energy": 2,
            "name": "scout"
        }],
        "lasers": []
    }"##;

    fn write_fixture(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("laser-arena-feed-{name}.json"));
        fs::write(&path, contents).expect("fixture written");
        path
    }

    fn remove_fixture(path: &Path) {
        let _ = fs::remove_file(path);
    }

    #[test]
    fn load_parses_the_document_on_disk() {
        let path = write_fixture("load", PAYLOAD);
        let feed = SnapshotFeed::new(path.clone(), Duration::from_millis(100));

        let world = feed.load().expect("fixture loads");
        assert_eq!(world.players().len(), 1);
        assert_eq!(world.players()[0].name, "scout");

        remove_fixture(&path);
    }

    #[test]
    fn poll_waits_for_the_full_interval() {
        let path = write_fixture("poll", PAYLOAD);
        let mut feed = SnapshotFeed::new(path.clone(), Duration::from_millis(100));

        assert!(feed
            .poll(Duration::from_millis(40))
            .expect("tick succeeds")
            .is_none());
        assert!(feed
            .poll(Duration::from_millis(40))
            .expect("tick succeeds")
            .is_none());
        assert!(feed
            .poll(Duration::from_millis(40))
            .expect("tick succeeds")
            .is_some());

        remove_fixture(&path);
    }

    #[test]
    fn malformed_documents_surface_as_errors() {
        let path = write_fixture("malformed", "{\"dimensions\": {}}");
        let mut feed = SnapshotFeed::new(path.clone(), Duration::ZERO);

        assert!(feed.poll(Duration::from_millis(16)).is_err());

        remove_fixture(&path);
    }
}
