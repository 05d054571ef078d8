//! Video use cases, including media upload and encoding results.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use common::{CastMemberId, CategoryId, GenreId, VideoId};
use domain::cast_member::CastMember;
use domain::category::Category;
use domain::genre::Genre;
use domain::video::{
    AudioVideoMedia, AudioVideoMediaField, AudioVideoMediaStatus, ImageMedia, MediaField, Rating,
    Video, VideoCreateCommand, VideoFilter,
};
use domain::{CatalogEvent, Repository, SearchParams, SearchResult, SearchableRepository, UnitOfWork};
use serde::Serialize;

use super::{ensure_exist, ensure_valid, find_or_fail};
use crate::error::{ApplicationError, Result};
use crate::service::ApplicationService;
use crate::storage::{Storage, StoreFile};

/// Video as returned to callers, media included.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VideoOutput {
    pub id: VideoId,
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

impl From<&Video> for VideoOutput {
    fn from(video: &Video) -> Self {
        use domain::video::ImageMediaField::{Banner, Thumbnail, ThumbnailHalf};

        Self {
            id: video.video_id(),
            title: video.title().to_string(),
            description: video.description().to_string(),
            year_launched: video.year_launched(),
            duration: video.duration(),
            rating: video.rating(),
            is_opened: video.is_opened(),
            is_published: video.is_published(),
            banner: video.image(Banner).cloned(),
            thumbnail: video.image(Thumbnail).cloned(),
            thumbnail_half: video.image(ThumbnailHalf).cloned(),
            trailer: video.audio_video(AudioVideoMediaField::Trailer).cloned(),
            video: video.audio_video(AudioVideoMediaField::Video).cloned(),
            categories_id: video.categories_id().to_vec(),
            genres_id: video.genres_id().to_vec(),
            cast_members_id: video.cast_members_id().to_vec(),
            created_at: video.created_at(),
        }
    }
}

pub type CreateVideoInput = VideoCreateCommand;

/// Stores a new video after checking that every linked category, genre
/// and cast member exists.
pub struct CreateVideoUseCase<U: UnitOfWork, V, C, G, M> {
    service: ApplicationService<U>,
    repo: Arc<V>,
    categories: Arc<C>,
    genres: Arc<G>,
    cast_members: Arc<M>,
}

impl<U, V, C, G, M> CreateVideoUseCase<U, V, C, G, M>
where
    U: UnitOfWork<Event = CatalogEvent>,
    V: Repository<Video, Transaction = U::Transaction>,
    C: Repository<Category>,
    G: Repository<Genre>,
    M: Repository<CastMember>,
{
    pub fn new(
        service: ApplicationService<U>,
        repo: Arc<V>,
        categories: Arc<C>,
        genres: Arc<G>,
        cast_members: Arc<M>,
    ) -> Self {
        Self {
            service,
            repo,
            categories,
            genres,
            cast_members,
        }
    }

    #[tracing::instrument(skip_all, fields(title = %input.title))]
    pub async fn execute(&mut self, input: CreateVideoInput) -> Result<VideoOutput> {
        let video = Video::create(input);
        ensure_valid(&video)?;
        ensure_exist::<Category, _>(self.categories.as_ref(), video.categories_id()).await?;
        ensure_exist::<Genre, _>(self.genres.as_ref(), video.genres_id()).await?;
        ensure_exist::<CastMember, _>(self.cast_members.as_ref(), video.cast_members_id()).await?;

        let repo = &self.repo;
        self.service
            .run(async |uow: &mut U| {
                repo.insert(&video, uow.transaction()).await?;
                uow.add_aggregate_root(&video)?;
                Ok::<_, ApplicationError>(VideoOutput::from(&video))
            })
            .await
    }
}

/// Deletes a video by id.
pub struct DeleteVideoUseCase<U: UnitOfWork, V> {
    service: ApplicationService<U>,
    repo: Arc<V>,
}

impl<U, V> DeleteVideoUseCase<U, V>
where
    U: UnitOfWork<Event = CatalogEvent>,
    V: Repository<Video, Transaction = U::Transaction>,
{
    pub fn new(service: ApplicationService<U>, repo: Arc<V>) -> Self {
        Self { service, repo }
    }

    #[tracing::instrument(skip(self))]
    pub async fn execute(&mut self, id: VideoId) -> Result<()> {
        let repo = &self.repo;
        self.service
            .run(async |uow: &mut U| {
                repo.delete(id, uow.transaction()).await?;
                Ok::<_, ApplicationError>(())
            })
            .await
    }
}

/// Loads one video.
pub struct GetVideoUseCase<V> {
    repo: Arc<V>,
}

impl<V: Repository<Video>> GetVideoUseCase<V> {
    pub fn new(repo: Arc<V>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self, id: VideoId) -> Result<VideoOutput> {
        let video = find_or_fail::<Video, _>(self.repo.as_ref(), id).await?;
        Ok(VideoOutput::from(&video))
    }
}

/// Searches videos.
pub struct ListVideosUseCase<V> {
    repo: Arc<V>,
}

impl<V: SearchableRepository<Video>> ListVideosUseCase<V> {
    pub fn new(repo: Arc<V>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self, params: SearchParams<VideoFilter>) -> Result<SearchResult<VideoOutput>> {
        let result = self.repo.search(params).await?;
        Ok(result.map_items(|video| VideoOutput::from(&video)))
    }
}

/// An uploaded file as received from the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub raw_name: String,
    pub data: Vec<u8>,
    pub mime_type: String,
    pub size: u64,
}

/// One file bound for one media slot of a video.
#[derive(Debug, Clone)]
pub struct UploadMediaInput {
    pub video_id: VideoId,
    pub field: MediaField,
    pub file: UploadedFile,
}

/// Checks an upload against the slot's mime types and size limit.
///
/// The limit applies to the bytes received; a declared size that
/// disagrees with them is rejected. File names must be a single path
/// segment.
fn validate_upload(field: MediaField, file: &UploadedFile) -> Result<()> {
    let invalid = |reason: String| ApplicationError::InvalidMediaFile {
        field: field.as_str(),
        reason,
    };

    let accepted = field.accepted_mime_types();
    if !accepted.contains(&file.mime_type.as_str()) {
        return Err(invalid(format!(
            "mime type {} is not one of {}",
            file.mime_type,
            accepted.join(", ")
        )));
    }

    let received = file.data.len() as u64;
    if file.size != received {
        return Err(invalid(format!(
            "declared size {} does not match the {received} bytes received",
            file.size
        )));
    }
    if received > field.max_size() {
        return Err(invalid(format!(
            "{received} bytes exceeds the {} byte limit",
            field.max_size()
        )));
    }

    let name = file.raw_name.trim();
    if name.is_empty() {
        return Err(invalid("file name is empty".to_string()));
    }
    if name.contains(['/', '\\']) || name == "." || name == ".." {
        return Err(invalid(format!("file name {name:?} is not a plain file name")));
    }
    Ok(())
}

/// Stores an uploaded file under `videos/<id>/` and records it on the
/// video. Audio/video uploads publish `VideoAudioMediaReplaced` and wait
/// for the encoder.
pub struct UploadMediaUseCase<U: UnitOfWork, V, S> {
    service: ApplicationService<U>,
    repo: Arc<V>,
    storage: Arc<S>,
}

impl<U, V, S> UploadMediaUseCase<U, V, S>
where
    U: UnitOfWork<Event = CatalogEvent>,
    V: Repository<Video, Transaction = U::Transaction>,
    S: Storage,
{
    pub fn new(service: ApplicationService<U>, repo: Arc<V>, storage: Arc<S>) -> Self {
        Self {
            service,
            repo,
            storage,
        }
    }

    #[tracing::instrument(skip_all, fields(video_id = %input.video_id, field = %input.field))]
    pub async fn execute(&mut self, input: UploadMediaInput) -> Result<VideoOutput> {
        validate_upload(input.field, &input.file)?;
        let mut video = find_or_fail::<Video, _>(self.repo.as_ref(), input.video_id).await?;

        let UploadedFile {
            raw_name,
            data,
            mime_type,
            size,
        } = input.file;
        let location = format!("videos/{}", video.video_id());
        let path = format!("{location}/{raw_name}");

        self.storage
            .store(StoreFile {
                id: path.clone(),
                data,
                mime_type: Some(mime_type),
            })
            .await?;
        tracing::debug!(%path, size, "stored media file");

        match input.field {
            MediaField::Image(field) => video.replace_image(field, ImageMedia::new(raw_name, location)),
            MediaField::AudioVideo(field) => {
                video.replace_audio_video(field, AudioVideoMedia::pending(raw_name, path))
            }
        }

        let repo = &self.repo;
        self.service
            .run(async |uow: &mut U| {
                repo.update(&video, uow.transaction()).await?;
                uow.add_aggregate_root(&video)?;
                Ok::<_, ApplicationError>(VideoOutput::from(&video))
            })
            .await
    }
}

/// Outcome reported by the encoder for one audio/video file.
#[derive(Debug, Clone)]
pub struct ProcessAudioVideoMediaInput {
    pub video_id: VideoId,
    pub field: AudioVideoMediaField,
    pub status: AudioVideoMediaStatus,
    pub encoded_location: Option<String>,
}

/// Records the encoder outcome for an audio/video slot. The video is
/// published once both slots completed.
pub struct ProcessAudioVideoMediaUseCase<U: UnitOfWork, V> {
    service: ApplicationService<U>,
    repo: Arc<V>,
}

impl<U, V> ProcessAudioVideoMediaUseCase<U, V>
where
    U: UnitOfWork<Event = CatalogEvent>,
    V: Repository<Video, Transaction = U::Transaction>,
{
    pub fn new(service: ApplicationService<U>, repo: Arc<V>) -> Self {
        Self { service, repo }
    }

    #[tracing::instrument(skip_all, fields(video_id = %input.video_id, field = input.field.as_str()))]
    pub async fn execute(&mut self, input: ProcessAudioVideoMediaInput) -> Result<VideoOutput> {
        let mut video = find_or_fail::<Video, _>(self.repo.as_ref(), input.video_id).await?;
        video.process_audio_video_media(input.field, input.status, input.encoded_location)?;

        let repo = &self.repo;
        self.service
            .run(async |uow: &mut U| {
                repo.update(&video, uow.transaction()).await?;
                uow.add_aggregate_root(&video)?;
                Ok::<_, ApplicationError>(VideoOutput::from(&video))
            })
            .await
    }
}
