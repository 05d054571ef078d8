use common::{CastMemberId, CategoryId, GenreId, VideoId};
use domain::video::{
    AudioVideoMedia, AudioVideoMediaField, ImageMedia, ImageMediaField, Rating, Video,
    VideoFilter, VideoProps, VideoSortField,
};
use sqlx::postgres::PgRow;
use sqlx::query_builder::Separated;
use sqlx::types::Json;
use sqlx::{Postgres, QueryBuilder};
use uuid::Uuid;

use super::{PgEntity, column, push_contains, push_overlaps};
use crate::error::PersistenceError;

fn uuids<T: Copy + Into<Uuid>>(ids: &[T]) -> Vec<Uuid> {
    ids.iter().map(|id| (*id).into()).collect()
}

fn ids<T: From<Uuid>>(row: &PgRow, name: &'static str) -> Result<Vec<T>, PersistenceError> {
    let values: Vec<Uuid> = column(row, name)?;
    Ok(values.into_iter().map(T::from).collect())
}

fn image(row: &PgRow, name: &'static str) -> Result<Option<ImageMedia>, PersistenceError> {
    let value: Option<Json<ImageMedia>> = column(row, name)?;
    Ok(value.map(|Json(media)| media))
}

fn audio_video(
    row: &PgRow,
    name: &'static str,
) -> Result<Option<AudioVideoMedia>, PersistenceError> {
    let value: Option<Json<AudioVideoMedia>> = column(row, name)?;
    Ok(value.map(|Json(media)| media))
}

fn image_json(video: &Video, field: ImageMediaField) -> Option<Json<ImageMedia>> {
    video.image(field).cloned().map(Json)
}

fn audio_video_json(video: &Video, field: AudioVideoMediaField) -> Option<Json<AudioVideoMedia>> {
    video.audio_video(field).cloned().map(Json)
}

impl PgEntity for Video {
    const TABLE: &'static str = "videos";
    const ID_COLUMN: &'static str = "video_id";
    const COLUMNS: &'static str = "video_id, title, description, year_launched, duration, rating, \
        is_opened, is_published, banner, thumbnail, thumbnail_half, trailer, video, \
        categories_id, genres_id, cast_members_id, created_at";

    fn push_row(&self, row: &mut Separated<'_, 'static, Postgres, &'static str>) {
        row.push_bind(self.video_id().as_uuid())
            .push_bind(self.title().to_string())
            .push_bind(self.description().to_string())
            .push_bind(self.year_launched())
            .push_bind(self.duration())
            .push_bind(self.rating().as_str())
            .push_bind(self.is_opened())
            .push_bind(self.is_published())
            .push_bind(image_json(self, ImageMediaField::Banner))
            .push_bind(image_json(self, ImageMediaField::Thumbnail))
            .push_bind(image_json(self, ImageMediaField::ThumbnailHalf))
            .push_bind(audio_video_json(self, AudioVideoMediaField::Trailer))
            .push_bind(audio_video_json(self, AudioVideoMediaField::Video))
            .push_bind(uuids(self.categories_id()))
            .push_bind(uuids(self.genres_id()))
            .push_bind(uuids(self.cast_members_id()))
            .push_bind(self.created_at());
    }

    fn push_assignments(&self, set: &mut Separated<'_, 'static, Postgres, &'static str>) {
        set.push("title = ").push_bind_unseparated(self.title().to_string());
        set.push("description = ")
            .push_bind_unseparated(self.description().to_string());
        set.push("year_launched = ")
            .push_bind_unseparated(self.year_launched());
        set.push("duration = ").push_bind_unseparated(self.duration());
        set.push("rating = ").push_bind_unseparated(self.rating().as_str());
        set.push("is_opened = ").push_bind_unseparated(self.is_opened());
        set.push("is_published = ")
            .push_bind_unseparated(self.is_published());
        set.push("banner = ")
            .push_bind_unseparated(image_json(self, ImageMediaField::Banner));
        set.push("thumbnail = ")
            .push_bind_unseparated(image_json(self, ImageMediaField::Thumbnail));
        set.push("thumbnail_half = ")
            .push_bind_unseparated(image_json(self, ImageMediaField::ThumbnailHalf));
        set.push("trailer = ")
            .push_bind_unseparated(audio_video_json(self, AudioVideoMediaField::Trailer));
        set.push("video = ")
            .push_bind_unseparated(audio_video_json(self, AudioVideoMediaField::Video));
        set.push("categories_id = ")
            .push_bind_unseparated(uuids(self.categories_id()));
        set.push("genres_id = ")
            .push_bind_unseparated(uuids(self.genres_id()));
        set.push("cast_members_id = ")
            .push_bind_unseparated(uuids(self.cast_members_id()));
    }

    fn from_row(row: &PgRow) -> Result<Self, PersistenceError> {
        let rating: String = column(row, "rating")?;
        let rating = rating
            .parse::<Rating>()
            .map_err(|err| PersistenceError::InvalidRow {
                column: "rating",
                message: err.to_string(),
            })?;

        Ok(Video::restore(VideoProps {
            video_id: VideoId::from_uuid(column::<Uuid>(row, "video_id")?),
            title: column(row, "title")?,
            description: column(row, "description")?,
            year_launched: column(row, "year_launched")?,
            duration: column(row, "duration")?,
            rating,
            is_opened: column(row, "is_opened")?,
            is_published: column(row, "is_published")?,
            banner: image(row, "banner")?,
            thumbnail: image(row, "thumbnail")?,
            thumbnail_half: image(row, "thumbnail_half")?,
            trailer: audio_video(row, "trailer")?,
            video: audio_video(row, "video")?,
            categories_id: ids::<CategoryId>(row, "categories_id")?,
            genres_id: ids::<GenreId>(row, "genres_id")?,
            cast_members_id: ids::<CastMemberId>(row, "cast_members_id")?,
            created_at: column(row, "created_at")?,
        }))
    }

    fn sort_expression(field: VideoSortField) -> &'static str {
        match field {
            VideoSortField::Title => "title COLLATE \"C\"",
            VideoSortField::CreatedAt => "created_at",
        }
    }

    fn push_filter(filter: &VideoFilter, query: &mut QueryBuilder<'static, Postgres>) {
        if let Some(title) = &filter.title {
            push_contains(query, "title", title);
        }
        if let Some(categories_id) = &filter.categories_id {
            push_overlaps(query, "categories_id", uuids(categories_id));
        }
        if let Some(genres_id) = &filter.genres_id {
            push_overlaps(query, "genres_id", uuids(genres_id));
        }
        if let Some(cast_members_id) = &filter.cast_members_id {
            push_overlaps(query, "cast_members_id", uuids(cast_members_id));
        }
    }
}
