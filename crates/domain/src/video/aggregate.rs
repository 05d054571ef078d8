//! Video aggregate implementation.

use chrono::{DateTime, Utc};
use common::{CastMemberId, CategoryId, GenreId, VideoId};

use crate::aggregate::{AggregateRoot, PendingEvents};
use crate::error::{DomainError, Result};
use crate::notification::Notification;
use crate::validation;

use super::{
    AudioVideoMedia, AudioVideoMediaField, AudioVideoMediaProcessedData, AudioVideoMediaStatus,
    ImageMedia, ImageMediaField, Rating, VideoAudioMediaReplacedData, VideoCreatedData, VideoEvent,
};

/// Input for [`Video::create`].
#[derive(Debug, Clone)]
pub struct VideoCreateCommand {
    pub title: String,
    pub description: String,
    pub year_launched: i32,
    pub duration: i32,
    pub rating: Rating,
    pub is_opened: bool,
    pub categories_id: Vec<CategoryId>,
    pub genres_id: Vec<GenreId>,
    pub cast_members_id: Vec<CastMemberId>,
}

/// Stored state of a video.
#[derive(Debug, Clone)]
pub struct VideoProps {
    pub video_id: VideoId,
    pub title: String,
    pub description: String,
    pub year_launched: i32,
    pub duration: i32,
    pub rating: Rating,
    pub is_opened: bool,
    pub is_published: bool,
    pub banner: Option<ImageMedia>,
    pub thumbnail: Option<ImageMedia>,
    pub thumbnail_half: Option<ImageMedia>,
    pub trailer: Option<AudioVideoMedia>,
    pub video: Option<AudioVideoMedia>,
    pub categories_id: Vec<CategoryId>,
    pub genres_id: Vec<GenreId>,
    pub cast_members_id: Vec<CastMemberId>,
    pub created_at: DateTime<Utc>,
}

/// Video aggregate root.
///
/// `is_published` is derived: it holds exactly when both the trailer and
/// the video are present and encoded.
#[derive(Debug, Clone)]
pub struct Video {
    video_id: VideoId,
    title: String,
    description: String,
    year_launched: i32,
    duration: i32,
    rating: Rating,
    is_opened: bool,
    is_published: bool,
    banner: Option<ImageMedia>,
    thumbnail: Option<ImageMedia>,
    thumbnail_half: Option<ImageMedia>,
    trailer: Option<AudioVideoMedia>,
    video: Option<AudioVideoMedia>,
    categories_id: Vec<CategoryId>,
    genres_id: Vec<GenreId>,
    cast_members_id: Vec<CastMemberId>,
    created_at: DateTime<Utc>,
    notification: Notification,
    events: PendingEvents<VideoEvent>,
}

impl Video {
    /// Creates a new video and records `VideoCreated`.
    pub fn create(command: VideoCreateCommand) -> Self {
        let mut video = Self::restore(VideoProps {
            video_id: VideoId::new(),
            title: command.title,
            description: command.description,
            year_launched: command.year_launched,
            duration: command.duration,
            rating: command.rating,
            is_opened: command.is_opened,
            is_published: false,
            banner: None,
            thumbnail: None,
            thumbnail_half: None,
            trailer: None,
            video: None,
            categories_id: command.categories_id,
            genres_id: command.genres_id,
            cast_members_id: command.cast_members_id,
            created_at: validation::now(),
        });
        video.validate();
        video.apply_event(VideoEvent::VideoCreated(VideoCreatedData {
            video_id: video.video_id,
            title: video.title.clone(),
            description: video.description.clone(),
            year_launched: video.year_launched,
            duration: video.duration,
            rating: video.rating,
            is_opened: video.is_opened,
            categories_id: video.categories_id.clone(),
            genres_id: video.genres_id.clone(),
            cast_members_id: video.cast_members_id.clone(),
            created_at: video.created_at,
            occurred_on: validation::now(),
        }));
        video
    }

    /// Rebuilds a stored video.
    pub fn restore(props: VideoProps) -> Self {
        Self {
            video_id: props.video_id,
            title: props.title,
            description: props.description,
            year_launched: props.year_launched,
            duration: props.duration,
            rating: props.rating,
            is_opened: props.is_opened,
            is_published: props.is_published,
            banner: props.banner,
            thumbnail: props.thumbnail,
            thumbnail_half: props.thumbnail_half,
            trailer: props.trailer,
            video: props.video,
            categories_id: validation::dedup(props.categories_id),
            genres_id: validation::dedup(props.genres_id),
            cast_members_id: validation::dedup(props.cast_members_id),
            created_at: props.created_at,
            notification: Notification::new(),
            events: PendingEvents::new(),
        }
    }

    /// Retitles the video and revalidates the title.
    pub fn change_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
        validation::validate_name(&mut self.notification, "title", &self.title);
    }

    pub fn change_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    pub fn change_year_launched(&mut self, year_launched: i32) {
        self.year_launched = year_launched;
    }

    /// Sets the running time.
    pub fn change_duration(&mut self, duration: i32) {
        self.duration = duration;
    }

    pub fn change_rating(&mut self, rating: Rating) {
        self.rating = rating;
    }

    /// Marks the video as opened.
    pub fn mark_as_opened(&mut self) {
        self.is_opened = true;
    }

    pub fn mark_as_not_opened(&mut self) {
        self.is_opened = false;
    }

    /// Puts an image into one of the image slots.
    pub fn replace_image(&mut self, field: ImageMediaField, media: ImageMedia) {
        let slot = match field {
            ImageMediaField::Banner => &mut self.banner,
            ImageMediaField::Thumbnail => &mut self.thumbnail,
            ImageMediaField::ThumbnailHalf => &mut self.thumbnail_half,
        };
        *slot = Some(media);
    }

    /// Puts a trailer or video file into its slot and records
    /// `VideoAudioMediaReplaced`.
    pub fn replace_audio_video(&mut self, field: AudioVideoMediaField, media: AudioVideoMedia) {
        self.apply_event(VideoEvent::VideoAudioMediaReplaced(
            VideoAudioMediaReplacedData {
                video_id: self.video_id,
                media_field: field,
                media,
                occurred_on: validation::now(),
            },
        ));
    }

    /// Records the outcome of encoding the file in `field`.
    ///
    /// A `Completed` outcome needs the encoded location.
    pub fn process_audio_video_media(
        &mut self,
        field: AudioVideoMediaField,
        status: AudioVideoMediaStatus,
        encoded_location: Option<String>,
    ) -> Result<()> {
        if self.audio_video(field).is_none() {
            return Err(DomainError::InvalidArgument(format!(
                "Video {} has no {} media to process",
                self.video_id,
                field.as_str()
            )));
        }
        if status == AudioVideoMediaStatus::Completed && encoded_location.is_none() {
            return Err(DomainError::InvalidArgument(
                "encoded_location is required for completed media".to_string(),
            ));
        }
        self.apply_event(VideoEvent::AudioVideoMediaProcessed(
            AudioVideoMediaProcessedData {
                video_id: self.video_id,
                media_field: field,
                status,
                encoded_location,
                occurred_on: validation::now(),
            },
        ));
        Ok(())
    }

    /// Links a category; already linked ids are ignored.
    pub fn add_category_id(&mut self, category_id: CategoryId) {
        validation::push_unique(&mut self.categories_id, category_id);
    }

    /// Links a genre; already linked ids are ignored.
    pub fn add_genre_id(&mut self, genre_id: GenreId) {
        validation::push_unique(&mut self.genres_id, genre_id);
    }

    /// Links a cast member; already linked ids are ignored.
    pub fn add_cast_member_id(&mut self, cast_member_id: CastMemberId) {
        validation::push_unique(&mut self.cast_members_id, cast_member_id);
    }

    /// Replaces the linked categories, dropping duplicates. An empty set
    /// is recorded as a validation error.
    pub fn sync_categories_id(&mut self, categories_id: Vec<CategoryId>) {
        self.categories_id = validation::dedup(categories_id);
        validation::validate_not_empty(&mut self.notification, "categories_id", &self.categories_id);
    }

    /// Replaces the linked genres, dropping duplicates. An empty set is
    /// recorded as a validation error.
    pub fn sync_genres_id(&mut self, genres_id: Vec<GenreId>) {
        self.genres_id = validation::dedup(genres_id);
        validation::validate_not_empty(&mut self.notification, "genres_id", &self.genres_id);
    }

    /// Replaces the linked cast members, dropping duplicates. An empty set
    /// is recorded as a validation error.
    pub fn sync_cast_members_id(&mut self, cast_members_id: Vec<CastMemberId>) {
        self.cast_members_id = validation::dedup(cast_members_id);
        validation::validate_not_empty(
            &mut self.notification,
            "cast_members_id",
            &self.cast_members_id,
        );
    }

    /// Checks every field rule, recording failures in the notification.
    pub fn validate(&mut self) -> bool {
        validation::validate_name(&mut self.notification, "title", &self.title);
        validation::validate_not_empty(&mut self.notification, "categories_id", &self.categories_id);
        validation::validate_not_empty(&mut self.notification, "genres_id", &self.genres_id);
        validation::validate_not_empty(
            &mut self.notification,
            "cast_members_id",
            &self.cast_members_id,
        );
        !self.notification.has_errors()
    }

    fn refresh_published(&mut self) {
        self.is_published = matches!(
            (&self.trailer, &self.video),
            (Some(trailer), Some(video)) if trailer.is_completed() && video.is_completed()
        );
    }

    fn audio_video_slot(&mut self, field: AudioVideoMediaField) -> &mut Option<AudioVideoMedia> {
        match field {
            AudioVideoMediaField::Trailer => &mut self.trailer,
            AudioVideoMediaField::Video => &mut self.video,
        }
    }

    pub fn video_id(&self) -> VideoId {
        self.video_id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn year_launched(&self) -> i32 {
        self.year_launched
    }

    pub fn duration(&self) -> i32 {
        self.duration
    }

    pub fn rating(&self) -> Rating {
        self.rating
    }

    pub fn is_opened(&self) -> bool {
        self.is_opened
    }

    /// True once both the trailer and the video finished encoding.
    pub fn is_published(&self) -> bool {
        self.is_published
    }

    /// Returns the image stored in `field`, if any.
    pub fn image(&self, field: ImageMediaField) -> Option<&ImageMedia> {
        match field {
            ImageMediaField::Banner => self.banner.as_ref(),
            ImageMediaField::Thumbnail => self.thumbnail.as_ref(),
            ImageMediaField::ThumbnailHalf => self.thumbnail_half.as_ref(),
        }
    }

    /// Returns the audio/video media stored in `field`, if any.
    pub fn audio_video(&self, field: AudioVideoMediaField) -> Option<&AudioVideoMedia> {
        match field {
            AudioVideoMediaField::Trailer => self.trailer.as_ref(),
            AudioVideoMediaField::Video => self.video.as_ref(),
        }
    }

    pub fn categories_id(&self) -> &[CategoryId] {
        &self.categories_id
    }

    pub fn genres_id(&self) -> &[GenreId] {
        &self.genres_id
    }

    pub fn cast_members_id(&self) -> &[CastMemberId] {
        &self.cast_members_id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl PartialEq for Video {
    fn eq(&self, other: &Self) -> bool {
        self.video_id == other.video_id
    }
}

impl Eq for Video {}

impl AggregateRoot for Video {
    type Id = VideoId;
    type Event = VideoEvent;

    fn aggregate_type() -> &'static str {
        "Video"
    }

    fn id(&self) -> Self::Id {
        self.video_id
    }

    fn on_event(&mut self, event: &Self::Event) {
        match event {
            VideoEvent::VideoCreated(_) => {}
            VideoEvent::VideoAudioMediaReplaced(data) => {
                *self.audio_video_slot(data.media_field) = Some(data.media.clone());
            }
            VideoEvent::AudioVideoMediaProcessed(data) => {
                let slot = self.audio_video_slot(data.media_field);
                if let Some(media) = slot.as_ref() {
                    let processed = match (data.status, data.encoded_location.as_deref()) {
                        (AudioVideoMediaStatus::Completed, Some(location)) => {
                            media.completed(location)
                        }
                        (AudioVideoMediaStatus::Processing, _) => media.processing(),
                        (AudioVideoMediaStatus::Failed, _) => media.failed(),
                        (AudioVideoMediaStatus::Pending, _)
                        | (AudioVideoMediaStatus::Completed, None) => media.clone(),
                    };
                    *slot = Some(processed);
                }
            }
        }
        self.refresh_published();
    }

    fn pending_events(&self) -> &PendingEvents<Self::Event> {
        &self.events
    }

    fn pending_events_mut(&mut self) -> &mut PendingEvents<Self::Event> {
        &mut self.events
    }

    fn notification(&self) -> &Notification {
        &self.notification
    }
}
