use std::path::{Component, Path, PathBuf};

use log::debug;
use walkdir::WalkDir;

use crate::config::LibrarySettings;
use crate::error::ResolveError;

use super::SourceResolver;

/// Resolves songs from a directory laid out as `<root>/<song>/<part>.<ext>`.
pub struct DirectoryResolver {
    root: PathBuf,
    settings: LibrarySettings,
}

impl DirectoryResolver {
    pub fn new(root: impl Into<PathBuf>, settings: LibrarySettings) -> Self {
        Self {
            root: root.into(),
            settings,
        }
    }

    /// Song folders directly below the root, sorted by name.
    pub fn songs(&self) -> Result<Vec<String>, ResolveError> {
        if !self.root.is_dir() {
            return Err(ResolveError::NotFound {
                path: self.root.display().to_string(),
            });
        }

        let mut songs = Vec::new();
        for entry in WalkDir::new(&self.root)
            .min_depth(1)
            .max_depth(1)
            .follow_links(self.settings.follow_links)
            .sort_by_file_name()
        {
            let entry = entry?;
            if entry.file_type().is_dir() && !is_hidden(entry.path()) {
                if let Some(name) = entry.file_name().to_str() {
                    songs.push(name.to_string());
                }
            }
        }
        Ok(songs)
    }
}

impl SourceResolver for DirectoryResolver {
    /// Audio files directly inside the song folder, sorted by file name.
    fn resolve(&self, song_id: &str) -> Result<Vec<String>, ResolveError> {
        if !is_plain_name(song_id) {
            return Err(ResolveError::InvalidSongId(song_id.to_string()));
        }

        let dir = self.root.join(song_id);
        if !dir.is_dir() {
            return Err(ResolveError::NotFound {
                path: dir.display().to_string(),
            });
        }

        let mut sources = Vec::new();
        for entry in WalkDir::new(&dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(self.settings.follow_links)
            .sort_by_file_name()
        {
            let entry = entry?;
            let path = entry.path();
            if entry.file_type().is_file()
                && (self.settings.include_hidden || !is_hidden(path))
                && is_audio_file(path, &self.settings)
            {
                sources.push(path.to_string_lossy().into_owned());
            }
        }

        if sources.is_empty() {
            return Err(ResolveError::Empty {
                song: song_id.to_string(),
            });
        }
        debug!("song '{song_id}' resolved to {} track(s)", sources.len());
        Ok(sources)
    }
}

/// A single normal path component: no separators, no `..`.
fn is_plain_name(song_id: &str) -> bool {
    let mut components = Path::new(song_id).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

fn is_audio_file(path: &Path, settings: &LibrarySettings) -> bool {
    let exts: Vec<String> = settings
        .extensions
        .iter()
        .map(|e| e.trim().trim_start_matches('.').to_ascii_lowercase())
        .filter(|e| !e.is_empty())
        .collect();

    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            exts.iter().any(|e| e == &ext)
        })
        .unwrap_or(false)
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}
