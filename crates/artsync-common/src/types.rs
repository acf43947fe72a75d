//! Core type definitions for catalog items and their image slots.
//!
//! All enums are serialized in lowercase and round-trip through `Display` /
//! `FromStr`, so the same spelling is used in configuration files, CLI flags
//! and log output.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::Error;

/// Kind of catalog item. Capacity policies are configured per kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    /// A single movie.
    Movie,
    /// A TV series (show).
    Series,
    /// A season within a series.
    Season,
    /// A single episode within a season.
    Episode,
    /// A standalone video that is neither a movie nor an episode.
    Video,
    /// A music album.
    MusicAlbum,
    /// A music artist.
    MusicArtist,
    /// An audio track.
    Audio,
    /// A photo. Its own file is its primary image.
    Photo,
    /// A collection folder grouping multiple items.
    CollectionFolder,
    /// A live TV program listing with no file of its own.
    TvProgram,
}

impl ItemKind {
    /// Every kind, in declaration order.
    pub const ALL: [ItemKind; 11] = [
        Self::Movie,
        Self::Series,
        Self::Season,
        Self::Episode,
        Self::Video,
        Self::MusicAlbum,
        Self::MusicArtist,
        Self::Audio,
        Self::Photo,
        Self::CollectionFolder,
        Self::TvProgram,
    ];

    /// Whether the item's path is a directory rather than a media file.
    pub fn is_folder(&self) -> bool {
        matches!(
            self,
            Self::Series
                | Self::Season
                | Self::MusicAlbum
                | Self::MusicArtist
                | Self::CollectionFolder
        )
    }

    /// Lowercase name, identical to the serialized form.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Movie => "movie",
            Self::Series => "series",
            Self::Season => "season",
            Self::Episode => "episode",
            Self::Video => "video",
            Self::MusicAlbum => "musicalbum",
            Self::MusicArtist => "musicartist",
            Self::Audio => "audio",
            Self::Photo => "photo",
            Self::CollectionFolder => "collectionfolder",
            Self::TvProgram => "tvprogram",
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ItemKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == lower)
            .ok_or_else(|| Error::invalid_input(format!("Invalid item kind: {s}")))
    }
}

/// Image slot type: the role an image plays for an item.
///
/// Repeatable types hold an ordered list where a lower index means a higher
/// priority. Every other type is singular and holds at most one image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageType {
    /// Primary poster/cover image.
    Primary,
    /// Clear art.
    Art,
    /// Background/backdrop image.
    Backdrop,
    /// Banner image.
    Banner,
    /// Logo image.
    Logo,
    /// Landscape thumbnail.
    Thumb,
    /// Disc art image.
    Disc,
    /// Box art image.
    Box,
    /// Rear box art image.
    BoxRear,
    /// Menu image.
    Menu,
    /// Screenshot.
    Screenshot,
    /// Person profile image.
    Profile,
}

impl ImageType {
    /// Every image type, in declaration order.
    pub const ALL: [ImageType; 12] = [
        Self::Primary,
        Self::Art,
        Self::Backdrop,
        Self::Banner,
        Self::Logo,
        Self::Thumb,
        Self::Disc,
        Self::Box,
        Self::BoxRear,
        Self::Menu,
        Self::Screenshot,
        Self::Profile,
    ];

    /// Whether this slot holds an ordered list rather than a single image.
    pub fn is_repeatable(&self) -> bool {
        matches!(self, Self::Backdrop | Self::Screenshot)
    }

    /// Lowercase name, identical to the serialized form.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Primary => "primary",
            Self::Art => "art",
            Self::Backdrop => "backdrop",
            Self::Banner => "banner",
            Self::Logo => "logo",
            Self::Thumb => "thumb",
            Self::Disc => "disc",
            Self::Box => "box",
            Self::BoxRear => "boxrear",
            Self::Menu => "menu",
            Self::Screenshot => "screenshot",
            Self::Profile => "profile",
        }
    }
}

impl fmt::Display for ImageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ImageType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|ty| ty.as_str() == lower)
            .ok_or_else(|| Error::invalid_input(format!("Invalid image type: {s}")))
    }
}

/// Encoded image format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    #[default]
    Jpg,
    Png,
    Gif,
    Webp,
    Bmp,
}

impl ImageFormat {
    /// File extension without the leading dot.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Jpg => "jpg",
            Self::Png => "png",
            Self::Gif => "gif",
            Self::Webp => "webp",
            Self::Bmp => "bmp",
        }
    }

    /// MIME type, e.g. `image/jpeg`.
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Jpg => "image/jpeg",
            Self::Png => "image/png",
            Self::Gif => "image/gif",
            Self::Webp => "image/webp",
            Self::Bmp => "image/bmp",
        }
    }

    /// Parse a `Content-Type` value. Parameters such as `; charset=` are ignored.
    pub fn from_mime(mime: &str) -> Option<Self> {
        let essence = mime.split(';').next()?.trim().to_ascii_lowercase();
        match essence.as_str() {
            "image/jpeg" | "image/jpg" | "image/pjpeg" => Some(Self::Jpg),
            "image/png" => Some(Self::Png),
            "image/gif" => Some(Self::Gif),
            "image/webp" => Some(Self::Webp),
            "image/bmp" | "image/x-ms-bmp" => Some(Self::Bmp),
            _ => None,
        }
    }

    /// Parse a file extension (with or without the leading dot).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.trim_start_matches('.').to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" => Some(Self::Jpg),
            "png" => Some(Self::Png),
            "gif" => Some(Self::Gif),
            "webp" => Some(Self::Webp),
            "bmp" => Some(Self::Bmp),
            _ => None,
        }
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}
