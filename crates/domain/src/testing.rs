//! Test-data builders for the catalog aggregates.
//!
//! Each builder produces stored aggregates (no pending events). Every
//! field has an explicit default generator taking the item index, and a
//! `with_*` / `with_*_fn` pair to override it.

use chrono::{DateTime, Duration, Utc};
use common::{CastMemberId, CategoryId, GenreId, VideoId};

use crate::cast_member::{CastMember, CastMemberProps, CastMemberType};
use crate::category::{Category, CategoryProps};
use crate::genre::{Genre, GenreProps};
use crate::validation;
use crate::video::{AudioVideoMedia, ImageMedia, Rating, Video, VideoProps};

type Generator<T> = Box<dyn Fn(usize) -> T + Send + Sync>;

fn constant<T: Clone + Send + Sync + 'static>(value: T) -> Generator<T> {
    Box::new(move |_| value.clone())
}

// One second apart, oldest first.
fn increasing_from_now() -> Generator<DateTime<Utc>> {
    let base = validation::now();
    Box::new(move |index| base + Duration::seconds(index as i64))
}

macro_rules! field_setters {
    ($($field:ident: $ty:ty => $with:ident, $with_fn:ident;)*) => {
        $(
            pub fn $with(mut self, value: $ty) -> Self {
                self.$field = constant(value);
                self
            }

            pub fn $with_fn(mut self, f: impl Fn(usize) -> $ty + Send + Sync + 'static) -> Self {
                self.$field = Box::new(f);
                self
            }
        )*
    };
}

pub struct CategoryFakeBuilder {
    count: usize,
    category_id: Generator<CategoryId>,
    name: Generator<String>,
    description: Generator<Option<String>>,
    is_active: Generator<bool>,
    created_at: Generator<DateTime<Utc>>,
}

impl CategoryFakeBuilder {
    pub fn one() -> Self {
        Self::many(1)
    }

    pub fn many(count: usize) -> Self {
        Self {
            count,
            category_id: Box::new(|_| CategoryId::new()),
            name: Box::new(|index| format!("Category {index}")),
            description: Box::new(|index| Some(format!("Description of category {index}"))),
            is_active: constant(true),
            created_at: increasing_from_now(),
        }
    }

    field_setters! {
        category_id: CategoryId => with_category_id, with_category_id_fn;
        name: String => with_name, with_name_fn;
        description: Option<String> => with_description, with_description_fn;
        is_active: bool => with_is_active, with_is_active_fn;
        created_at: DateTime<Utc> => with_created_at, with_created_at_fn;
    }

    pub fn build(&self) -> Category {
        self.build_at(0)
    }

    pub fn build_many(&self) -> Vec<Category> {
        (0..self.count).map(|index| self.build_at(index)).collect()
    }

    fn build_at(&self, index: usize) -> Category {
        Category::restore(CategoryProps {
            category_id: (self.category_id)(index),
            name: (self.name)(index),
            description: (self.description)(index),
            is_active: (self.is_active)(index),
            created_at: (self.created_at)(index),
        })
    }
}

pub struct CastMemberFakeBuilder {
    count: usize,
    cast_member_id: Generator<CastMemberId>,
    name: Generator<String>,
    member_type: Generator<CastMemberType>,
    created_at: Generator<DateTime<Utc>>,
}

impl CastMemberFakeBuilder {
    pub fn one() -> Self {
        Self::many(1)
    }

    pub fn many(count: usize) -> Self {
        Self {
            count,
            cast_member_id: Box::new(|_| CastMemberId::new()),
            name: Box::new(|index| format!("Cast member {index}")),
            member_type: constant(CastMemberType::Actor),
            created_at: increasing_from_now(),
        }
    }

    field_setters! {
        cast_member_id: CastMemberId => with_cast_member_id, with_cast_member_id_fn;
        name: String => with_name, with_name_fn;
        member_type: CastMemberType => with_member_type, with_member_type_fn;
        created_at: DateTime<Utc> => with_created_at, with_created_at_fn;
    }

    pub fn build(&self) -> CastMember {
        self.build_at(0)
    }

    pub fn build_many(&self) -> Vec<CastMember> {
        (0..self.count).map(|index| self.build_at(index)).collect()
    }

    fn build_at(&self, index: usize) -> CastMember {
        CastMember::restore(CastMemberProps {
            cast_member_id: (self.cast_member_id)(index),
            name: (self.name)(index),
            member_type: (self.member_type)(index),
            created_at: (self.created_at)(index),
        })
    }
}

pub struct GenreFakeBuilder {
    count: usize,
    genre_id: Generator<GenreId>,
    name: Generator<String>,
    categories_id: Generator<Vec<CategoryId>>,
    is_active: Generator<bool>,
    created_at: Generator<DateTime<Utc>>,
}

impl GenreFakeBuilder {
    pub fn one() -> Self {
        Self::many(1)
    }

    pub fn many(count: usize) -> Self {
        Self {
            count,
            genre_id: Box::new(|_| GenreId::new()),
            name: Box::new(|index| format!("Genre {index}")),
            categories_id: Box::new(|_| vec![CategoryId::new()]),
            is_active: constant(true),
            created_at: increasing_from_now(),
        }
    }

    field_setters! {
        genre_id: GenreId => with_genre_id, with_genre_id_fn;
        name: String => with_name, with_name_fn;
        categories_id: Vec<CategoryId> => with_categories_id, with_categories_id_fn;
        is_active: bool => with_is_active, with_is_active_fn;
        created_at: DateTime<Utc> => with_created_at, with_created_at_fn;
    }

    pub fn build(&self) -> Genre {
        self.build_at(0)
    }

    pub fn build_many(&self) -> Vec<Genre> {
        (0..self.count).map(|index| self.build_at(index)).collect()
    }

    fn build_at(&self, index: usize) -> Genre {
        Genre::restore(GenreProps {
            genre_id: (self.genre_id)(index),
            name: (self.name)(index),
            categories_id: (self.categories_id)(index),
            is_active: (self.is_active)(index),
            created_at: (self.created_at)(index),
        })
    }
}

pub struct VideoFakeBuilder {
    count: usize,
    video_id: Generator<VideoId>,
    title: Generator<String>,
    description: Generator<String>,
    year_launched: Generator<i32>,
    duration: Generator<i32>,
    rating: Generator<Rating>,
    is_opened: Generator<bool>,
    banner: Generator<Option<ImageMedia>>,
    thumbnail: Generator<Option<ImageMedia>>,
    thumbnail_half: Generator<Option<ImageMedia>>,
    trailer: Generator<Option<AudioVideoMedia>>,
    video: Generator<Option<AudioVideoMedia>>,
    categories_id: Generator<Vec<CategoryId>>,
    genres_id: Generator<Vec<GenreId>>,
    cast_members_id: Generator<Vec<CastMemberId>>,
    created_at: Generator<DateTime<Utc>>,
}

impl VideoFakeBuilder {
    pub fn one() -> Self {
        Self::many(1)
    }

    pub fn many(count: usize) -> Self {
        Self {
            count,
            video_id: Box::new(|_| VideoId::new()),
            title: Box::new(|index| format!("Video {index}")),
            description: Box::new(|index| format!("Description of video {index}")),
            year_launched: constant(2024),
            duration: constant(90),
            rating: constant(Rating::L),
            is_opened: constant(true),
            banner: constant(None),
            thumbnail: constant(None),
            thumbnail_half: constant(None),
            trailer: constant(None),
            video: constant(None),
            categories_id: Box::new(|_| vec![CategoryId::new()]),
            genres_id: Box::new(|_| vec![GenreId::new()]),
            cast_members_id: Box::new(|_| vec![CastMemberId::new()]),
            created_at: increasing_from_now(),
        }
    }

    field_setters! {
        video_id: VideoId => with_video_id, with_video_id_fn;
        title: String => with_title, with_title_fn;
        description: String => with_description, with_description_fn;
        year_launched: i32 => with_year_launched, with_year_launched_fn;
        duration: i32 => with_duration, with_duration_fn;
        rating: Rating => with_rating, with_rating_fn;
        is_opened: bool => with_is_opened, with_is_opened_fn;
        banner: Option<ImageMedia> => with_banner, with_banner_fn;
        thumbnail: Option<ImageMedia> => with_thumbnail, with_thumbnail_fn;
        thumbnail_half: Option<ImageMedia> => with_thumbnail_half, with_thumbnail_half_fn;
        trailer: Option<AudioVideoMedia> => with_trailer, with_trailer_fn;
        video: Option<AudioVideoMedia> => with_video, with_video_fn;
        categories_id: Vec<CategoryId> => with_categories_id, with_categories_id_fn;
        genres_id: Vec<GenreId> => with_genres_id, with_genres_id_fn;
        cast_members_id: Vec<CastMemberId> => with_cast_members_id, with_cast_members_id_fn;
        created_at: DateTime<Utc> => with_created_at, with_created_at_fn;
    }

    pub fn build(&self) -> Video {
        self.build_at(0)
    }

    pub fn build_many(&self) -> Vec<Video> {
        (0..self.count).map(|index| self.build_at(index)).collect()
    }

    fn build_at(&self, index: usize) -> Video {
        let trailer = (self.trailer)(index);
        let video = (self.video)(index);
        let is_published = matches!(
            (&trailer, &video),
            (Some(t), Some(v)) if t.is_completed() && v.is_completed()
        );
        Video::restore(VideoProps {
            video_id: (self.video_id)(index),
            title: (self.title)(index),
            description: (self.description)(index),
            year_launched: (self.year_launched)(index),
            duration: (self.duration)(index),
            rating: (self.rating)(index),
            is_opened: (self.is_opened)(index),
            is_published,
            banner: (self.banner)(index),
            thumbnail: (self.thumbnail)(index),
            thumbnail_half: (self.thumbnail_half)(index),
            trailer,
            video,
            categories_id: (self.categories_id)(index),
            genres_id: (self.genres_id)(index),
            cast_members_id: (self.cast_members_id)(index),
            created_at: (self.created_at)(index),
        })
    }
}
