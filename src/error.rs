use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Failed to initialize audio output stream: {0}")]
    OutputStream(String),
    #[error("Unsupported source '{uri}': only local files can be played")]
    UnsupportedSource { uri: String },
    #[error("Failed to open '{path}': {source}")]
    Open {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to decode '{path}': {reason}")]
    Decode { path: String, reason: String },
}

#[derive(Error, Debug)]
pub enum TrackError {
    #[error("Track '{id}' has been disposed")]
    Disposed { id: String },
}

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("No audio sources provided")]
    EmptySourceList,
    #[error("Playback session has been disposed")]
    Disposed,
    #[error(transparent)]
    Track(#[from] TrackError),
    #[error("Failed to open playback backend: {0}")]
    Backend(#[source] EngineError),
    #[error("Session player thread is not running")]
    PlayerGone,
}

#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("Invalid song id '{0}'")]
    InvalidSongId(String),
    #[error("Folder '{path}' does not exist")]
    NotFound { path: String },
    #[error("No audio files found for song '{song}'")]
    Empty { song: String },
    #[error("Failed to read library: {0}")]
    Walk(#[from] walkdir::Error),
}

#[derive(Error, Debug)]
pub enum SignError {
    #[error("Please provide a bucket and key")]
    MissingObject,
    #[error("Signing '{bucket}/{key}' failed: {reason}")]
    Signer {
        bucket: String,
        key: String,
        reason: String,
    },
    #[error("URL lifetime of {secs}s is out of range")]
    LifetimeOutOfRange { secs: u64 },
}
