//! Video aggregate and its media value objects.

mod aggregate;
mod events;
mod media;
mod search;

pub use aggregate::{Video, VideoCreateCommand, VideoProps};
pub use events::{
    AudioVideoMediaProcessedData, VIDEO_MEDIA_UPLOADED_INTEGRATION_EVENT, VideoAudioMediaReplacedData,
    VideoCreatedData, VideoEvent,
};
pub use media::{
    AudioVideoMedia, AudioVideoMediaField, AudioVideoMediaStatus, ImageMedia, ImageMediaField,
    InvalidRating, MediaField, Rating, UnknownMediaField,
};
pub use search::{VideoFilter, VideoSortField};
