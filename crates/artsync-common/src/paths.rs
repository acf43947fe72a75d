//! Path utilities for image files and image locations.
//!
//! Image references store their location as a string that is either a local
//! filesystem path or a remote URL. These helpers keep the "is it local" and
//! "is it the same file" decisions in one place.

use std::path::Path;

/// List of supported image file extensions.
const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp", "bmp", "tbn"];

/// List of video file extensions recognised when discovering entries.
const VIDEO_EXTENSIONS: &[&str] = &[
    "mkv", "mp4", "avi", "m4v", "ts", "webm", "mov", "wmv", "flv",
];

/// Check if a path has an image file extension.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use artsync_common::paths::is_image_file;
///
/// assert!(is_image_file(Path::new("poster.jpg")));
/// assert!(is_image_file(Path::new("/path/to/fanart.PNG")));
/// assert!(!is_image_file(Path::new("video.mkv")));
/// ```
pub fn is_image_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Check if a path has a video file extension.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use artsync_common::paths::is_video_file;
///
/// assert!(is_video_file(Path::new("Heat (1995).mkv")));
/// assert!(!is_video_file(Path::new("poster.jpg")));
/// ```
pub fn is_video_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| VIDEO_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Get the list of image file extensions.
pub fn image_extensions() -> &'static [&'static str] {
    IMAGE_EXTENSIONS
}

/// Whether an image location points at a remote resource rather than a file.
///
/// # Examples
///
/// ```
/// use artsync_common::paths::is_remote_location;
///
/// assert!(is_remote_location("https://image.tmdb.org/t/p/original/a.jpg"));
/// assert!(is_remote_location("HTTP://example.com/b.png"));
/// assert!(!is_remote_location("/media/movies/Heat (1995)/poster.jpg"));
/// ```
pub fn is_remote_location(location: &str) -> bool {
    location
        .get(..4)
        .is_some_and(|scheme| scheme.eq_ignore_ascii_case("http"))
}

/// Compare two image locations the way the catalog does: ASCII
/// case-insensitively.
///
/// # Examples
///
/// ```
/// use artsync_common::paths::same_location;
///
/// assert!(same_location("/a/Poster.jpg", "/a/poster.JPG"));
/// assert!(!same_location("/a/poster.jpg", "/b/poster.jpg"));
/// ```
pub fn same_location(a: &str, b: &str) -> bool {
    a.eq_ignore_ascii_case(b)
}

/// Lowercased file stem, or an empty string when the path has none.
pub fn lowercase_stem(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .map(|s| s.to_lowercase())
        .unwrap_or_default()
}
