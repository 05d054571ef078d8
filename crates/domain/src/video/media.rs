//! Video value objects: rating, media slots and media files.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Age rating of a video.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Rating {
    L,
    R10,
    R12,
    R14,
    R16,
    R18,
}

/// Returned for an unknown rating code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("The rating must be one of the following values: L, 10, 12, 14, 16, 18, passed value: {0}")]
pub struct InvalidRating(pub String);

impl Rating {
    pub const ALL: [Rating; 6] = [
        Rating::L,
        Rating::R10,
        Rating::R12,
        Rating::R14,
        Rating::R16,
        Rating::R18,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Rating::L => "L",
            Rating::R10 => "10",
            Rating::R12 => "12",
            Rating::R14 => "14",
            Rating::R16 => "16",
            Rating::R18 => "18",
        }
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Rating {
    type Err = InvalidRating;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Rating::ALL
            .into_iter()
            .find(|rating| rating.as_str() == s)
            .ok_or_else(|| InvalidRating(s.to_string()))
    }
}

impl TryFrom<String> for Rating {
    type Error = InvalidRating;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Rating> for String {
    fn from(value: Rating) -> Self {
        value.as_str().to_string()
    }
}

/// Image slots of a video.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageMediaField {
    Banner,
    Thumbnail,
    ThumbnailHalf,
}

/// Audio/video slots of a video.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AudioVideoMediaField {
    Trailer,
    Video,
}

impl AudioVideoMediaField {
    pub fn as_str(self) -> &'static str {
        match self {
            AudioVideoMediaField::Trailer => "trailer",
            AudioVideoMediaField::Video => "video",
        }
    }
}

/// Every media slot of a video.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaField {
    Image(ImageMediaField),
    AudioVideo(AudioVideoMediaField),
}

/// Returned for an unknown media slot name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown media field: {0}")]
pub struct UnknownMediaField(pub String);

const MIB: u64 = 1024 * 1024;

impl MediaField {
    pub const ALL: [MediaField; 5] = [
        MediaField::Image(ImageMediaField::Banner),
        MediaField::Image(ImageMediaField::Thumbnail),
        MediaField::Image(ImageMediaField::ThumbnailHalf),
        MediaField::AudioVideo(AudioVideoMediaField::Trailer),
        MediaField::AudioVideo(AudioVideoMediaField::Video),
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            MediaField::Image(ImageMediaField::Banner) => "banner",
            MediaField::Image(ImageMediaField::Thumbnail) => "thumbnail",
            MediaField::Image(ImageMediaField::ThumbnailHalf) => "thumbnail_half",
            MediaField::AudioVideo(field) => field.as_str(),
        }
    }

    /// Mime types accepted for uploads into this slot.
    pub fn accepted_mime_types(self) -> &'static [&'static str] {
        match self {
            MediaField::Image(_) => &["image/jpeg", "image/png", "image/gif"],
            MediaField::AudioVideo(_) => &["video/mp4"],
        }
    }

    /// Largest accepted upload, in bytes.
    pub fn max_size(self) -> u64 {
        match self {
            MediaField::Image(_) => 2 * MIB,
            MediaField::AudioVideo(AudioVideoMediaField::Trailer) => 500 * MIB,
            MediaField::AudioVideo(AudioVideoMediaField::Video) => 50 * 1024 * MIB,
        }
    }
}

impl fmt::Display for MediaField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MediaField {
    type Err = UnknownMediaField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MediaField::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| UnknownMediaField(s.to_string()))
    }
}

/// An uploaded image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageMedia {
    pub name: String,
    pub location: String,
}

impl ImageMedia {
    /// An image named `name` stored under the `location` folder.
    pub fn new(name: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            location: location.into(),
        }
    }

    /// Full storage path of the image.
    pub fn url(&self) -> String {
        format!("{}/{}", self.location, self.name)
    }
}

/// Encoding state of an audio/video file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioVideoMediaStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

/// An uploaded audio/video file and its encoding state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioVideoMedia {
    pub name: String,
    pub raw_location: String,
    pub encoded_location: Option<String>,
    pub status: AudioVideoMediaStatus,
}

impl AudioVideoMedia {
    /// A freshly uploaded file waiting to be encoded.
    pub fn pending(name: impl Into<String>, raw_location: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            raw_location: raw_location.into(),
            encoded_location: None,
            status: AudioVideoMediaStatus::Pending,
        }
    }

    /// Copy of this media with encoding started.
    pub fn processing(&self) -> Self {
        Self {
            status: AudioVideoMediaStatus::Processing,
            ..self.clone()
        }
    }

    /// Copy of this media encoded to `encoded_location`.
    pub fn completed(&self, encoded_location: impl Into<String>) -> Self {
        Self {
            encoded_location: Some(encoded_location.into()),
            status: AudioVideoMediaStatus::Completed,
            ..self.clone()
        }
    }

    /// Copy of this media whose encoding failed.
    pub fn failed(&self) -> Self {
        Self {
            status: AudioVideoMediaStatus::Failed,
            ..self.clone()
        }
    }

    pub fn is_completed(&self) -> bool {
        self.status == AudioVideoMediaStatus::Completed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rating_parses_codes() {
        assert_eq!("L".parse::<Rating>().unwrap(), Rating::L);
        assert_eq!("14".parse::<Rating>().unwrap(), Rating::R14);
        assert!("21".parse::<Rating>().is_err());
        assert_eq!(serde_json::to_value(Rating::R18).unwrap(), "18");
    }

    #[test]
    fn media_field_names_round_trip() {
        for field in MediaField::ALL {
            assert_eq!(field.as_str().parse::<MediaField>().unwrap(), field);
        }
        assert!("poster".parse::<MediaField>().is_err());
    }

    #[test]
    fn upload_rules_depend_on_slot() {
        let banner = MediaField::Image(ImageMediaField::Banner);
        let trailer = MediaField::AudioVideo(AudioVideoMediaField::Trailer);
        assert!(banner.accepted_mime_types().contains(&"image/png"));
        assert!(!trailer.accepted_mime_types().contains(&"image/png"));
        assert!(trailer.max_size() > banner.max_size());
    }

    #[test]
    fn audio_video_status_transitions() {
        let media = AudioVideoMedia::pending("trailer.mp4", "videos/1/trailer.mp4");
        assert_eq!(media.processing().status, AudioVideoMediaStatus::Processing);
        let done = media.completed("videos/1/encoded");
        assert!(done.is_completed());
        assert_eq!(done.encoded_location.as_deref(), Some("videos/1/encoded"));
        assert_eq!(media.failed().status, AudioVideoMediaStatus::Failed);
    }
}
