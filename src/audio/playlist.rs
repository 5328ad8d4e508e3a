use std::fs;
use std::path::{Path, PathBuf};

use rand::seq::SliceRandom;
use rand::Rng;

/// A folder of `.mp3` files to pick distraction tracks from.
#[derive(Debug, Clone)]
pub struct Playlist {
    dir: PathBuf,
}

impl Playlist {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Lists the tracks, sorted. A missing or unreadable folder is simply empty.
    pub fn tracks(&self) -> Vec<PathBuf> {
        let Ok(entries) = fs::read_dir(&self.dir) else {
            return Vec::new();
        };

        let mut tracks: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.is_file() && is_mp3(path))
            .collect();
        tracks.sort();
        tracks
    }

    pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<PathBuf> {
        self.tracks().choose(rng).cloned()
    }
}

fn is_mp3(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("mp3"))
}
