//! Repository contract shared by every storage backend.
//!
//! Each function seeds an empty backend, runs one behavior and asserts on
//! the outcome. Backend test files call them with fresh repositories so
//! both backends are held to identical results.

#![allow(dead_code)]

use chrono::{SubsecRound, Utc};
use common::{CastMemberId, CategoryId, GenreId};
use domain::cast_member::{CastMember, CastMemberFilter, CastMemberType};
use domain::category::{Category, CategoryFilter};
use domain::genre::{Genre, GenreFilter};
use domain::testing::{
    CastMemberFakeBuilder, CategoryFakeBuilder, GenreFakeBuilder, VideoFakeBuilder,
};
use domain::video::{
    AudioVideoMedia, AudioVideoMediaField, AudioVideoMediaStatus, ImageMedia, ImageMediaField,
    Rating, Video, VideoFilter,
};
use domain::{
    AggregateRoot, CatalogEvent, DomainError, Repository, SearchParams, SearchableRepository, SortDirection,
    UnitOfWork,
};

fn category_ids(items: &[Category]) -> Vec<CategoryId> {
    items.iter().map(Category::category_id).collect()
}

fn names(items: &[Category]) -> Vec<&str> {
    items.iter().map(Category::name).collect()
}

pub async fn default_search_returns_newest_first<R>(repo: &R)
where
    R: SearchableRepository<Category>,
{
    let categories = CategoryFakeBuilder::many(16).build_many();
    repo.bulk_insert(&categories, None).await.unwrap();

    let result = repo.search(SearchParams::new()).await.unwrap();

    let expected: Vec<_> = category_ids(&categories).into_iter().rev().take(15).collect();
    assert_eq!(category_ids(&result.items), expected);
    assert_eq!(result.total, 16);
    assert_eq!(result.current_page, 1);
    assert_eq!(result.per_page, 15);
    assert_eq!(result.last_page(), 2);

    let second = repo.search(SearchParams::new().page(2)).await.unwrap();
    assert_eq!(category_ids(&second.items), vec![categories[0].category_id()]);
}

pub async fn filter_and_sort_paginate_matches<R>(repo: &R)
where
    R: SearchableRepository<Category>,
{
    const NAMES: [&str; 5] = ["test", "a", "TEST", "e", "TeSt"];
    let categories = CategoryFakeBuilder::many(NAMES.len())
        .with_name_fn(|index| NAMES[index].to_string())
        .build_many();
    repo.bulk_insert(&categories, None).await.unwrap();

    let params = SearchParams::new()
        .filter(CategoryFilter::by_name("TEST"))
        .sort("name")
        .per_page(2);

    let first = repo.search(params.clone().page(1)).await.unwrap();
    assert_eq!(names(&first.items), ["TEST", "TeSt"]);
    assert_eq!(first.total, 3);
    assert_eq!(first.last_page(), 2);

    let second = repo.search(params.page(2)).await.unwrap();
    assert_eq!(names(&second.items), ["test"]);
    assert_eq!(second.total, 3);
}

pub async fn sort_descending_by_name<R>(repo: &R)
where
    R: SearchableRepository<Category>,
{
    const NAMES: [&str; 4] = ["b", "a", "d", "c"];
    let categories = CategoryFakeBuilder::many(NAMES.len())
        .with_name_fn(|index| NAMES[index].to_string())
        .build_many();
    repo.bulk_insert(&categories, None).await.unwrap();

    let result = repo
        .search(SearchParams::new().sort("name").sort_dir(SortDirection::Desc))
        .await
        .unwrap();

    assert_eq!(names(&result.items), ["d", "c", "b", "a"]);
}

pub async fn unknown_sort_field_falls_back_to_default<R>(repo: &R)
where
    R: SearchableRepository<Category>,
{
    let categories = CategoryFakeBuilder::many(3).build_many();
    repo.bulk_insert(&categories, None).await.unwrap();

    let result = repo
        .search(SearchParams::new().sort("description").sort_dir(SortDirection::Asc))
        .await
        .unwrap();

    let expected: Vec<_> = category_ids(&categories).into_iter().rev().collect();
    assert_eq!(category_ids(&result.items), expected);
}

pub async fn equal_sort_keys_keep_insertion_order<R>(repo: &R)
where
    R: SearchableRepository<Category>,
{
    let created_at = Utc::now().trunc_subsecs(6);
    let categories = CategoryFakeBuilder::many(4)
        .with_name("Same".to_string())
        .with_created_at(created_at)
        .build_many();
    repo.bulk_insert(&categories, None).await.unwrap();

    let by_default = repo.search(SearchParams::new()).await.unwrap();
    assert_eq!(category_ids(&by_default.items), category_ids(&categories));

    let by_name = repo
        .search(SearchParams::new().sort("name").sort_dir(SortDirection::Desc))
        .await
        .unwrap();
    assert_eq!(category_ids(&by_name.items), category_ids(&categories));
}

pub async fn page_past_the_end_is_empty<R>(repo: &R)
where
    R: SearchableRepository<Category>,
{
    repo.bulk_insert(&CategoryFakeBuilder::many(3).build_many(), None)
        .await
        .unwrap();

    let result = repo
        .search(SearchParams::new().page(5).per_page(2))
        .await
        .unwrap();

    assert!(result.items.is_empty());
    assert_eq!(result.total, 3);
    assert_eq!(result.current_page, 5);
    assert_eq!(result.last_page(), 2);
}

pub async fn empty_repository_search<R>(repo: &R)
where
    R: SearchableRepository<Category>,
{
    let result = repo.search(SearchParams::new()).await.unwrap();
    assert!(result.items.is_empty());
    assert_eq!(result.total, 0);
    assert_eq!(result.last_page(), 0);
}

pub async fn exists_by_id_rejects_empty_list<R>(repo: &R)
where
    R: SearchableRepository<Category>,
{
    let err = repo.exists_by_id(&[]).await.unwrap_err();
    assert!(matches!(err, DomainError::InvalidArgument(_)));
}

pub async fn exists_by_id_partitions_in_request_order<R>(repo: &R)
where
    R: SearchableRepository<Category>,
{
    let categories = CategoryFakeBuilder::many(2).build_many();
    repo.bulk_insert(&categories, None).await.unwrap();
    let unknown = CategoryId::new();
    let ids = [categories[1].category_id(), unknown, categories[0].category_id()];

    let first = repo.exists_by_id(&ids).await.unwrap();
    assert_eq!(
        first.exists,
        vec![categories[1].category_id(), categories[0].category_id()]
    );
    assert_eq!(first.not_exists, vec![unknown]);
    assert!(!first.all_exist());

    let again = repo.exists_by_id(&ids).await.unwrap();
    assert_eq!(again, first);
}

pub async fn find_operations<R>(repo: &R)
where
    R: SearchableRepository<Category>,
{
    let categories = CategoryFakeBuilder::many(3).build_many();
    repo.bulk_insert(&categories, None).await.unwrap();

    let all = repo.find_all().await.unwrap();
    assert_eq!(category_ids(&all), category_ids(&categories));

    let found = repo
        .find_by_ids(&[categories[2].category_id(), CategoryId::new()])
        .await
        .unwrap();
    assert_eq!(category_ids(&found), vec![categories[2].category_id()]);

    assert!(repo.find_by_id(CategoryId::new()).await.unwrap().is_none());
    assert!(repo.find_by_ids(&[]).await.unwrap().is_empty());
}

pub async fn stored_fields_survive_reload<R>(repo: &R)
where
    R: SearchableRepository<Category>,
{
    let category = CategoryFakeBuilder::one()
        .with_description(None)
        .with_is_active(false)
        .build();
    repo.insert(&category, None).await.unwrap();

    let loaded = repo
        .find_by_id(category.category_id())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(loaded.name(), category.name());
    assert_eq!(loaded.description(), None);
    assert!(!loaded.is_active());
    assert_eq!(loaded.created_at(), category.created_at());
}

pub async fn update_and_delete<R>(repo: &R)
where
    R: SearchableRepository<Category>,
{
    let mut category = CategoryFakeBuilder::one().build();
    repo.insert(&category, None).await.unwrap();

    category.change_name("Documentary");
    category.change_description(Some("Real stories".to_string()));
    category.deactivate();
    repo.update(&category, None).await.unwrap();

    let loaded = repo
        .find_by_id(category.category_id())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(loaded.name(), "Documentary");
    assert_eq!(loaded.description(), Some("Real stories"));
    assert!(!loaded.is_active());

    repo.delete(category.category_id(), None).await.unwrap();
    assert!(repo.find_all().await.unwrap().is_empty());
}

pub async fn update_and_delete_unknown_are_not_found<R>(repo: &R)
where
    R: SearchableRepository<Category>,
{
    let category = CategoryFakeBuilder::one().build();

    let err = repo.update(&category, None).await.unwrap_err();
    assert!(err.is_not_found());

    let err = repo.delete(category.category_id(), None).await.unwrap_err();
    assert!(err.is_not_found());
}

pub async fn duplicate_insert_is_rejected<R>(repo: &R)
where
    R: SearchableRepository<Category>,
{
    let category = CategoryFakeBuilder::one().build();
    repo.insert(&category, None).await.unwrap();

    let err = repo.insert(&category, None).await.unwrap_err();
    assert!(matches!(err, DomainError::InvalidArgument(_)));

    let err = repo
        .bulk_insert(&[CategoryFakeBuilder::one().build(), category], None)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::InvalidArgument(_)));
    assert_eq!(repo.find_all().await.unwrap().len(), 1);
}

pub async fn cast_member_filters<R>(repo: &R)
where
    R: SearchableRepository<CastMember>,
{
    const MEMBERS: [(&str, CastMemberType); 4] = [
        ("Ana Director", CastMemberType::Director),
        ("Ana Actor", CastMemberType::Actor),
        ("Bruno", CastMemberType::Director),
        ("Carla", CastMemberType::Actor),
    ];
    let members = CastMemberFakeBuilder::many(MEMBERS.len())
        .with_name_fn(|index| MEMBERS[index].0.to_string())
        .with_member_type_fn(|index| MEMBERS[index].1)
        .build_many();
    repo.bulk_insert(&members, None).await.unwrap();

    let directors = repo
        .search(SearchParams::new().sort("name").filter(CastMemberFilter {
            name: None,
            member_type: Some(CastMemberType::Director),
        }))
        .await
        .unwrap();
    let found: Vec<_> = directors.items.iter().map(CastMember::name).collect();
    assert_eq!(found, ["Ana Director", "Bruno"]);

    let both = repo
        .search(SearchParams::new().filter(CastMemberFilter {
            name: Some("ana".to_string()),
            member_type: Some(CastMemberType::Actor),
        }))
        .await
        .unwrap();
    assert_eq!(both.total, 1);
    assert_eq!(both.items[0].cast_member_id(), members[1].cast_member_id());

    let loaded = repo
        .find_by_id(members[0].cast_member_id())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(loaded.member_type(), CastMemberType::Director);
}

pub async fn genre_category_filter_matches_any<R>(repo: &R)
where
    R: SearchableRepository<Genre>,
{
    let action = CategoryId::new();
    let drama = CategoryId::new();
    let comedy = CategoryId::new();
    let genres = GenreFakeBuilder::many(3)
        .with_categories_id_fn(move |index| match index {
            0 => vec![action],
            1 => vec![drama, comedy],
            _ => vec![comedy],
        })
        .build_many();
    repo.bulk_insert(&genres, None).await.unwrap();

    let result = repo
        .search(SearchParams::new().filter(GenreFilter {
            name: None,
            categories_id: Some(vec![action, drama]),
        }))
        .await
        .unwrap();

    let found: Vec<GenreId> = result.items.iter().map(Genre::genre_id).collect();
    assert_eq!(found, vec![genres[1].genre_id(), genres[0].genre_id()]);
    assert_eq!(result.total, 2);

    let loaded = repo.find_by_id(genres[1].genre_id()).await.unwrap().unwrap();
    assert_eq!(loaded.categories_id(), &[drama, comedy]);
}

pub async fn video_filters_combine<R>(repo: &R)
where
    R: SearchableRepository<Video>,
{
    let horror = CategoryId::new();
    let star = CastMemberId::new();
    let videos = VideoFakeBuilder::many(4)
        .with_title_fn(|index| format!("Night {index}"))
        .with_categories_id_fn(move |index| {
            if index % 2 == 0 {
                vec![horror]
            } else {
                vec![CategoryId::new()]
            }
        })
        .with_cast_members_id_fn(move |index| {
            if index < 2 {
                vec![star]
            } else {
                vec![CastMemberId::new()]
            }
        })
        .build_many();
    repo.bulk_insert(&videos, None).await.unwrap();

    let result = repo
        .search(SearchParams::new().filter(VideoFilter {
            title: Some("NIGHT".to_string()),
            categories_id: Some(vec![horror]),
            cast_members_id: Some(vec![star]),
            ..Default::default()
        }))
        .await
        .unwrap();

    assert_eq!(result.total, 1);
    assert_eq!(result.items[0].video_id(), videos[0].video_id());

    let by_title = repo
        .search(SearchParams::new().sort("title").sort_dir(SortDirection::Desc))
        .await
        .unwrap();
    let titles: Vec<_> = by_title.items.iter().map(Video::title).collect();
    assert_eq!(titles, ["Night 3", "Night 2", "Night 1", "Night 0"]);
}

pub async fn video_media_survive_reload<R>(repo: &R)
where
    R: SearchableRepository<Video>,
{
    let trailer = AudioVideoMedia::pending("trailer.mp4", "videos/raw").completed("videos/encoded");
    let video = VideoFakeBuilder::one()
        .with_rating(Rating::R16)
        .with_banner(Some(ImageMedia::new("banner.png", "videos/images")))
        .with_trailer(Some(trailer.clone()))
        .with_video(Some(AudioVideoMedia::pending("movie.mp4", "videos/raw")))
        .build();
    repo.insert(&video, None).await.unwrap();

    let mut loaded = repo.find_by_id(video.video_id()).await.unwrap().unwrap();
    assert_eq!(loaded.rating(), Rating::R16);
    assert_eq!(
        loaded.image(ImageMediaField::Banner),
        video.image(ImageMediaField::Banner)
    );
    assert!(loaded.image(ImageMediaField::Thumbnail).is_none());
    assert_eq!(loaded.audio_video(AudioVideoMediaField::Trailer), Some(&trailer));
    assert!(!loaded.is_published());

    loaded
        .process_audio_video_media(
            AudioVideoMediaField::Video,
            AudioVideoMediaStatus::Completed,
            Some("videos/encoded".to_string()),
        )
        .unwrap();
    repo.update(&loaded, None).await.unwrap();

    let published = repo.find_by_id(video.video_id()).await.unwrap().unwrap();
    assert!(published.is_published());
    assert!(published.events().is_empty());
}

pub async fn uncommitted_writes_stay_invisible<U, R>(uow: &mut U, repo: &R)
where
    U: UnitOfWork<Event = CatalogEvent>,
    R: Repository<Category, Transaction = U::Transaction>,
{
    let kept = CategoryFakeBuilder::one().build();
    let dropped = CategoryFakeBuilder::one().build();

    uow.start().await.unwrap();
    repo.insert(&kept, uow.transaction()).await.unwrap();
    uow.add_aggregate_root(&kept).unwrap();
    assert!(repo.find_by_id(kept.category_id()).await.unwrap().is_none());

    let tracked = uow.commit().await.unwrap();
    assert_eq!(tracked.len(), 1);
    assert!(repo.find_by_id(kept.category_id()).await.unwrap().is_some());

    uow.start().await.unwrap();
    repo.insert(&dropped, uow.transaction()).await.unwrap();
    uow.add_aggregate_root(&dropped).unwrap();
    uow.rollback().await.unwrap();

    assert!(repo.find_by_id(dropped.category_id()).await.unwrap().is_none());
    assert!(uow.aggregate_roots().is_empty());
    assert!(!uow.is_active());
}

pub async fn transaction_spans_several_writes<U, R>(uow: &mut U, repo: &R)
where
    U: UnitOfWork<Event = CatalogEvent>,
    R: Repository<Category, Transaction = U::Transaction>,
{
    let mut existing = CategoryFakeBuilder::one().build();
    repo.insert(&existing, None).await.unwrap();
    let added = CategoryFakeBuilder::many(2).build_many();

    uow.start().await.unwrap();
    repo.bulk_insert(&added, uow.transaction()).await.unwrap();
    existing.change_name("Renamed");
    repo.update(&existing, uow.transaction()).await.unwrap();
    repo.delete(added[0].category_id(), uow.transaction())
        .await
        .unwrap();
    uow.commit().await.unwrap();

    let all = repo.find_all().await.unwrap();
    assert_eq!(
        category_ids(&all),
        vec![existing.category_id(), added[1].category_id()]
    );
    assert_eq!(all[0].name(), "Renamed");
}
