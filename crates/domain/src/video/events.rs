//! Video domain events.

use chrono::{DateTime, Utc};
use common::{CastMemberId, CategoryId, GenreId, VideoId};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::event::{DomainEvent, IntegrationEvent};

use super::{AudioVideoMedia, AudioVideoMediaField, AudioVideoMediaStatus, Rating};

/// Name of the integration event derived from a replaced trailer or video.
pub const VIDEO_MEDIA_UPLOADED_INTEGRATION_EVENT: &str = "VideoAudioMediaUploadedIntegrationEvent";

/// Events emitted by a video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum VideoEvent {
    /// Video was created.
    VideoCreated(VideoCreatedData),

    /// A trailer or video file was uploaded into its slot.
    VideoAudioMediaReplaced(VideoAudioMediaReplacedData),

    /// Encoding of a trailer or video file finished.
    AudioVideoMediaProcessed(AudioVideoMediaProcessedData),
}

impl DomainEvent for VideoEvent {
    fn event_name(&self) -> &'static str {
        match self {
            VideoEvent::VideoCreated(_) => "VideoCreated",
            VideoEvent::VideoAudioMediaReplaced(_) => "VideoAudioMediaReplaced",
            VideoEvent::AudioVideoMediaProcessed(_) => "AudioVideoMediaProcessed",
        }
    }

    fn aggregate_id(&self) -> Uuid {
        match self {
            VideoEvent::VideoCreated(data) => data.video_id.as_uuid(),
            VideoEvent::VideoAudioMediaReplaced(data) => data.video_id.as_uuid(),
            VideoEvent::AudioVideoMediaProcessed(data) => data.video_id.as_uuid(),
        }
    }

    fn occurred_on(&self) -> DateTime<Utc> {
        match self {
            VideoEvent::VideoCreated(data) => data.occurred_on,
            VideoEvent::VideoAudioMediaReplaced(data) => data.occurred_on,
            VideoEvent::AudioVideoMediaProcessed(data) => data.occurred_on,
        }
    }

    fn event_version(&self) -> u32 {
        1
    }

    fn integration_event(&self) -> Option<IntegrationEvent> {
        match self {
            VideoEvent::VideoAudioMediaReplaced(data) => Some(IntegrationEvent::new(
                VIDEO_MEDIA_UPLOADED_INTEGRATION_EVENT,
                self.event_version(),
                data.occurred_on,
                json!({
                    "resource_id": format!("{}.{}", data.video_id, data.media_field.as_str()),
                    "file_path": data.media.raw_location,
                }),
            )),
            VideoEvent::VideoCreated(_) | VideoEvent::AudioVideoMediaProcessed(_) => None,
        }
    }
}

/// Data for VideoCreated event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoCreatedData {
    pub video_id: VideoId,
    pub title: String,
    pub description: String,
    pub year_launched: i32,
    pub duration: i32,
    pub rating: Rating,
    pub is_opened: bool,
    pub categories_id: Vec<CategoryId>,
    pub genres_id: Vec<GenreId>,
    pub cast_members_id: Vec<CastMemberId>,
    pub created_at: DateTime<Utc>,
    pub occurred_on: DateTime<Utc>,
}

/// Data for VideoAudioMediaReplaced event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoAudioMediaReplacedData {
    pub video_id: VideoId,
    pub media_field: AudioVideoMediaField,
    pub media: AudioVideoMedia,
    pub occurred_on: DateTime<Utc>,
}

/// Data for AudioVideoMediaProcessed event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioVideoMediaProcessedData {
    pub video_id: VideoId,
    pub media_field: AudioVideoMediaField,
    pub status: AudioVideoMediaStatus,
    pub encoded_location: Option<String>,
    pub occurred_on: DateTime<Utc>,
}
