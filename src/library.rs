//! Resolving songs to ordered lists of playable sources.
//!
//! A song is a folder holding one audio file per voice part. The resolver
//! lists those files; the first one becomes the session leader.

mod scan;

pub use scan::DirectoryResolver;

use crate::error::ResolveError;

/// Turns a song identifier into an ordered list of source URIs.
///
/// The first URI leads the session. Reachability is not checked.
pub trait SourceResolver {
    fn resolve(&self, song_id: &str) -> Result<Vec<String>, ResolveError>;
}
