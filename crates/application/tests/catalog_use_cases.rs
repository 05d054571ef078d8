//! Use cases wired to in-memory repositories, storage and broker.

use std::sync::Arc;

use application::use_cases::cast_member::{
    CreateCastMemberInput, CreateCastMemberUseCase, ListCastMembersUseCase,
};
use application::use_cases::category::{
    CreateCategoryInput, CreateCategoryUseCase, DeleteCategoryUseCase, GetCategoryUseCase,
    ListCategoriesUseCase, UpdateCategoryInput, UpdateCategoryUseCase,
};
use application::use_cases::genre::{CreateGenreInput, CreateGenreUseCase, UpdateGenreInput, UpdateGenreUseCase};
use application::use_cases::video::{
    CreateVideoInput, CreateVideoUseCase, GetVideoUseCase, ProcessAudioVideoMediaInput,
    ProcessAudioVideoMediaUseCase, UploadMediaInput, UploadMediaUseCase, UploadedFile,
};
use application::{ApplicationError, ApplicationService, InMemoryStorage, Storage};
use common::{CategoryId, GenreId, VideoId};
use domain::cast_member::{CastMember, CastMemberFilter, CastMemberType};
use domain::category::{Category, CategoryFilter};
use domain::genre::Genre;
use domain::testing::{
    CastMemberFakeBuilder, CategoryFakeBuilder, GenreFakeBuilder, VideoFakeBuilder,
};
use domain::video::{
    AudioVideoMedia, AudioVideoMediaField, AudioVideoMediaStatus, MediaField, Rating,
    VIDEO_MEDIA_UPLOADED_INTEGRATION_EVENT, Video,
};
use domain::{CatalogEvent, DomainError, Repository, SearchParams};
use events::{DomainEventMediator, InMemoryMessageBroker};
use persistence::{InMemoryRepository, InMemoryUnitOfWork};

type Uow = InMemoryUnitOfWork<CatalogEvent>;

struct Catalog {
    categories: Arc<InMemoryRepository<Category>>,
    genres: Arc<InMemoryRepository<Genre>>,
    cast_members: Arc<InMemoryRepository<CastMember>>,
    videos: Arc<InMemoryRepository<Video>>,
    storage: Arc<InMemoryStorage>,
    broker: InMemoryMessageBroker,
    mediator: Arc<DomainEventMediator<CatalogEvent>>,
}

impl Catalog {
    fn new() -> Self {
        let broker = InMemoryMessageBroker::default();
        Self {
            categories: Arc::new(InMemoryRepository::new()),
            genres: Arc::new(InMemoryRepository::new()),
            cast_members: Arc::new(InMemoryRepository::new()),
            videos: Arc::new(InMemoryRepository::new()),
            storage: Arc::new(InMemoryStorage::new()),
            mediator: Arc::new(DomainEventMediator::new(Arc::new(broker.clone()))),
            broker,
        }
    }

    fn service(&self) -> ApplicationService<Uow> {
        ApplicationService::new(Uow::new(), Arc::clone(&self.mediator))
    }

    async fn seed_video(&self, video: &Video) {
        self.videos.insert(video, None).await.unwrap();
    }

    fn upload(&self) -> UploadMediaUseCase<Uow, InMemoryRepository<Video>, InMemoryStorage> {
        UploadMediaUseCase::new(self.service(), self.videos.clone(), self.storage.clone())
    }

    fn process(&self) -> ProcessAudioVideoMediaUseCase<Uow, InMemoryRepository<Video>> {
        ProcessAudioVideoMediaUseCase::new(self.service(), self.videos.clone())
    }
}

fn mp4(name: &str) -> UploadedFile {
    UploadedFile {
        raw_name: name.to_string(),
        data: b"mp4 bytes".to_vec(),
        mime_type: "video/mp4".to_string(),
        size: 9,
    }
}

fn assert_not_found(err: &ApplicationError, entity: &str, id: &str) {
    match err {
        ApplicationError::Domain(DomainError::NotFound { entity: e, ids }) => {
            assert_eq!(*e, entity);
            assert!(ids.iter().any(|i| i == id), "{ids:?} lacks {id}");
        }
        other => panic!("expected NotFound, got {other:?}"),
    }
}

#[tokio::test]
async fn category_lifecycle() {
    let catalog = Catalog::new();

    let created = CreateCategoryUseCase::new(catalog.service(), catalog.categories.clone())
        .execute(CreateCategoryInput {
            name: "Movie".to_string(),
            description: Some("Feature films".to_string()),
            is_active: None,
        })
        .await
        .unwrap();
    assert!(created.is_active);

    let mut update = UpdateCategoryInput::new(created.id);
    update.name = Some("Movies".to_string());
    update.is_active = Some(false);
    let updated = UpdateCategoryUseCase::new(catalog.service(), catalog.categories.clone())
        .execute(update)
        .await
        .unwrap();
    assert_eq!(updated.name, "Movies");
    assert!(!updated.is_active);
    assert_eq!(updated.created_at, created.created_at);

    let listed = ListCategoriesUseCase::new(catalog.categories.clone())
        .execute(SearchParams::new().filter(CategoryFilter {
            name: Some("MOV".to_string()),
        }))
        .await
        .unwrap();
    assert_eq!(listed.total, 1);
    assert_eq!(listed.items[0], updated);

    DeleteCategoryUseCase::new(catalog.service(), catalog.categories.clone())
        .execute(created.id)
        .await
        .unwrap();
    let err = GetCategoryUseCase::new(catalog.categories.clone())
        .execute(created.id)
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn invalid_update_is_rejected_before_writing() {
    let catalog = Catalog::new();
    let movie = CategoryFakeBuilder::one().with_name("Movie".to_string()).build();
    catalog.categories.insert(&movie, None).await.unwrap();

    let mut update = UpdateCategoryInput::new(movie.category_id());
    update.name = Some("  ".to_string());
    let err = UpdateCategoryUseCase::new(catalog.service(), catalog.categories.clone())
        .execute(update)
        .await
        .unwrap_err();

    match err {
        ApplicationError::Domain(DomainError::Validation(notification)) => {
            assert!(notification.field_errors("name").is_some());
        }
        other => panic!("expected Validation, got {other:?}"),
    }
    let stored = catalog.categories.find_by_id(movie.category_id()).await.unwrap().unwrap();
    assert_eq!(stored.name(), "Movie");
}

#[tokio::test]
async fn deleting_unknown_category_is_not_found() {
    let catalog = Catalog::new();
    let missing = CategoryId::new();

    let err = DeleteCategoryUseCase::new(catalog.service(), catalog.categories.clone())
        .execute(missing)
        .await
        .unwrap_err();

    assert_not_found(&err, "Category", &missing.to_string());
}

#[tokio::test]
async fn cast_members_filter_by_type() {
    let catalog = Catalog::new();
    let mut create = CreateCastMemberUseCase::new(catalog.service(), catalog.cast_members.clone());
    for (name, member_type) in [
        ("Ridley", CastMemberType::Director),
        ("Sigourney", CastMemberType::Actor),
        ("Ian", CastMemberType::Actor),
    ] {
        create
            .execute(CreateCastMemberInput {
                name: name.to_string(),
                member_type,
            })
            .await
            .unwrap();
    }

    let actors = ListCastMembersUseCase::new(catalog.cast_members.clone())
        .execute(
            SearchParams::new()
                .sort("name")
                .filter(CastMemberFilter {
                    member_type: Some(CastMemberType::Actor),
                    ..Default::default()
                }),
        )
        .await
        .unwrap();

    assert_eq!(actors.total, 2);
    let names: Vec<_> = actors.items.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, ["Ian", "Sigourney"]);
}

#[tokio::test]
async fn genre_with_missing_categories_is_not_found() {
    let catalog = Catalog::new();
    let stored = CategoryFakeBuilder::one().build();
    catalog.categories.insert(&stored, None).await.unwrap();
    let missing = CategoryId::new();

    let err = CreateGenreUseCase::new(catalog.service(), catalog.genres.clone(), catalog.categories.clone())
        .execute(CreateGenreInput {
            name: "Drama".to_string(),
            categories_id: vec![stored.category_id(), missing],
            is_active: None,
        })
        .await
        .unwrap_err();

    assert_not_found(&err, "Category", &missing.to_string());
    assert!(err.to_string().contains(&missing.to_string()));
    assert!(!err.to_string().contains(&stored.category_id().to_string()));
    assert!(catalog.genres.is_empty());
}

#[tokio::test]
async fn genre_update_checks_new_categories() {
    let catalog = Catalog::new();
    let categories = CategoryFakeBuilder::many(2).build_many();
    catalog.categories.bulk_insert(&categories, None).await.unwrap();
    let genre = GenreFakeBuilder::one()
        .with_categories_id(vec![categories[0].category_id()])
        .build();
    catalog.genres.insert(&genre, None).await.unwrap();

    let mut update = UpdateGenreUseCase::new(catalog.service(), catalog.genres.clone(), catalog.categories.clone());
    let output = update
        .execute(UpdateGenreInput {
            id: genre.genre_id(),
            name: None,
            categories_id: Some(vec![categories[1].category_id()]),
            is_active: Some(false),
        })
        .await
        .unwrap();
    assert_eq!(output.categories_id, [categories[1].category_id()]);
    assert!(!output.is_active);

    let missing = CategoryId::new();
    let err = update
        .execute(UpdateGenreInput {
            id: genre.genre_id(),
            name: None,
            categories_id: Some(vec![missing]),
            is_active: None,
        })
        .await
        .unwrap_err();
    assert_not_found(&err, "Category", &missing.to_string());

    let stored = catalog.genres.find_by_id(genre.genre_id()).await.unwrap().unwrap();
    assert_eq!(stored.categories_id(), [categories[1].category_id()]);
}

#[tokio::test]
async fn video_create_verifies_every_relation() {
    let catalog = Catalog::new();
    let category = CategoryFakeBuilder::one().build();
    let member = CastMemberFakeBuilder::one().build();
    catalog.categories.insert(&category, None).await.unwrap();
    catalog.cast_members.insert(&member, None).await.unwrap();
    let missing_genre = GenreId::new();

    let input = CreateVideoInput {
        title: "Alien".to_string(),
        description: "In space no one can hear you scream".to_string(),
        year_launched: 1979,
        duration: 117,
        rating: Rating::R14,
        is_opened: false,
        categories_id: vec![category.category_id()],
        genres_id: vec![missing_genre],
        cast_members_id: vec![member.cast_member_id()],
    };
    let mut create = CreateVideoUseCase::new(
        catalog.service(),
        catalog.videos.clone(),
        catalog.categories.clone(),
        catalog.genres.clone(),
        catalog.cast_members.clone(),
    );

    let err = create.execute(input.clone()).await.unwrap_err();
    assert_not_found(&err, "Genre", &missing_genre.to_string());
    assert!(catalog.videos.is_empty());

    let genre = GenreFakeBuilder::one()
        .with_genre_id(missing_genre)
        .with_categories_id(vec![category.category_id()])
        .build();
    catalog.genres.insert(&genre, None).await.unwrap();

    let output = create.execute(input).await.unwrap();
    assert!(!output.is_published);
    assert_eq!(output.rating, Rating::R14);

    let loaded = GetVideoUseCase::new(catalog.videos.clone())
        .execute(output.id)
        .await
        .unwrap();
    assert_eq!(loaded, output);
}

#[tokio::test]
async fn uploading_trailer_publishes_media_uploaded_event() {
    let catalog = Catalog::new();
    let video = VideoFakeBuilder::one().build();
    catalog.seed_video(&video).await;
    let id = video.video_id();

    let output = catalog
        .upload()
        .execute(UploadMediaInput {
            video_id: id,
            field: MediaField::AudioVideo(AudioVideoMediaField::Trailer),
            file: mp4("trailer.mp4"),
        })
        .await
        .unwrap();

    let path = format!("videos/{id}/trailer.mp4");
    let trailer = output.trailer.unwrap();
    assert_eq!(trailer.status, AudioVideoMediaStatus::Pending);
    assert_eq!(trailer.raw_location, path);

    let stored = catalog.storage.get(&path).await.unwrap();
    assert_eq!(stored.data, b"mp4 bytes");
    assert_eq!(stored.mime_type.as_deref(), Some("video/mp4"));

    let messages = catalog.broker.messages().await;
    assert_eq!(messages.len(), 1);
    let event = messages[0].event().unwrap();
    assert_eq!(event.event_name, VIDEO_MEDIA_UPLOADED_INTEGRATION_EVENT);
    assert_eq!(event.payload["resource_id"], format!("{id}.trailer"));
    assert_eq!(event.payload["file_path"], path);
}

#[tokio::test]
async fn uploading_image_publishes_nothing() {
    let catalog = Catalog::new();
    let video = VideoFakeBuilder::one().build();
    catalog.seed_video(&video).await;

    let output = catalog
        .upload()
        .execute(UploadMediaInput {
            video_id: video.video_id(),
            field: "thumbnail_half".parse().unwrap(),
            file: UploadedFile {
                raw_name: "half.png".to_string(),
                data: vec![1, 2, 3],
                mime_type: "image/png".to_string(),
                size: 3,
            },
        })
        .await
        .unwrap();

    let thumbnail = output.thumbnail_half.unwrap();
    assert_eq!(thumbnail.url(), format!("videos/{}/half.png", video.video_id()));
    assert_eq!(catalog.storage.len(), 1);
    assert!(catalog.broker.messages().await.is_empty());
}

#[tokio::test]
async fn upload_with_wrong_mime_type_stores_nothing() {
    let catalog = Catalog::new();
    let video = VideoFakeBuilder::one().build();
    catalog.seed_video(&video).await;

    let err = catalog
        .upload()
        .execute(UploadMediaInput {
            video_id: video.video_id(),
            field: MediaField::AudioVideo(AudioVideoMediaField::Video),
            file: UploadedFile {
                mime_type: "image/png".to_string(),
                ..mp4("movie.png")
            },
        })
        .await
        .unwrap_err();

    assert!(matches!(err, ApplicationError::InvalidMediaFile { field: "video", .. }));
    assert!(catalog.storage.is_empty());
    assert!(catalog.broker.messages().await.is_empty());
}

#[tokio::test]
async fn upload_outside_the_video_folder_stores_nothing() {
    let catalog = Catalog::new();
    let video = VideoFakeBuilder::one().build();
    catalog.seed_video(&video).await;

    let err = catalog
        .upload()
        .execute(UploadMediaInput {
            video_id: video.video_id(),
            field: MediaField::AudioVideo(AudioVideoMediaField::Trailer),
            file: mp4("../../other/movie.mp4"),
        })
        .await
        .unwrap_err();

    assert!(matches!(err, ApplicationError::InvalidMediaFile { field: "trailer", .. }));
    assert!(catalog.storage.is_empty());
}

#[tokio::test]
async fn upload_with_understated_size_stores_nothing() {
    let catalog = Catalog::new();
    let video = VideoFakeBuilder::one().build();
    catalog.seed_video(&video).await;

    let err = catalog
        .upload()
        .execute(UploadMediaInput {
            video_id: video.video_id(),
            field: MediaField::AudioVideo(AudioVideoMediaField::Trailer),
            file: UploadedFile {
                size: 1,
                ..mp4("movie.mp4")
            },
        })
        .await
        .unwrap_err();

    assert!(matches!(err, ApplicationError::InvalidMediaFile { field: "trailer", .. }));
    assert!(catalog.storage.is_empty());
}

#[tokio::test]
async fn upload_to_unknown_video_is_not_found() {
    let catalog = Catalog::new();
    let missing = VideoId::new();

    let err = catalog
        .upload()
        .execute(UploadMediaInput {
            video_id: missing,
            field: MediaField::AudioVideo(AudioVideoMediaField::Trailer),
            file: mp4("trailer.mp4"),
        })
        .await
        .unwrap_err();

    assert_not_found(&err, "Video", &missing.to_string());
    assert!(catalog.storage.is_empty());
}

#[tokio::test]
async fn completing_both_media_publishes_the_video() {
    let catalog = Catalog::new();
    let video = VideoFakeBuilder::one()
        .with_trailer(Some(AudioVideoMedia::pending("trailer.mp4", "videos/v/trailer.mp4")))
        .with_video(Some(AudioVideoMedia::pending("video.mp4", "videos/v/video.mp4")))
        .build();
    catalog.seed_video(&video).await;

    let complete = |field| ProcessAudioVideoMediaInput {
        video_id: video.video_id(),
        field,
        status: AudioVideoMediaStatus::Completed,
        encoded_location: Some("encoded/location".to_string()),
    };

    let output = catalog
        .process()
        .execute(complete(AudioVideoMediaField::Trailer))
        .await
        .unwrap();
    assert!(!output.is_published);

    let output = catalog
        .process()
        .execute(complete(AudioVideoMediaField::Video))
        .await
        .unwrap();
    assert!(output.is_published);

    let stored = catalog.videos.find_by_id(video.video_id()).await.unwrap().unwrap();
    assert!(stored.is_published());
    assert_eq!(
        stored
            .audio_video(AudioVideoMediaField::Video)
            .and_then(|media| media.encoded_location.as_deref()),
        Some("encoded/location")
    );
    assert!(catalog.broker.messages().await.is_empty());
}

#[tokio::test]
async fn failed_encoding_marks_media_failed() {
    let catalog = Catalog::new();
    let video = VideoFakeBuilder::one()
        .with_video(Some(AudioVideoMedia::pending("video.mp4", "videos/v/video.mp4")))
        .build();
    catalog.seed_video(&video).await;

    let output = catalog
        .process()
        .execute(ProcessAudioVideoMediaInput {
            video_id: video.video_id(),
            field: AudioVideoMediaField::Video,
            status: AudioVideoMediaStatus::Failed,
            encoded_location: None,
        })
        .await
        .unwrap();

    assert_eq!(output.video.unwrap().status, AudioVideoMediaStatus::Failed);
    assert!(!output.is_published);
}

#[tokio::test]
async fn completing_without_location_is_rejected() {
    let catalog = Catalog::new();
    let video = VideoFakeBuilder::one()
        .with_trailer(Some(AudioVideoMedia::pending("trailer.mp4", "videos/v/trailer.mp4")))
        .build();
    catalog.seed_video(&video).await;

    let err = catalog
        .process()
        .execute(ProcessAudioVideoMediaInput {
            video_id: video.video_id(),
            field: AudioVideoMediaField::Trailer,
            status: AudioVideoMediaStatus::Completed,
            encoded_location: None,
        })
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ApplicationError::Domain(DomainError::InvalidArgument(_))
    ));
    let stored = catalog.videos.find_by_id(video.video_id()).await.unwrap().unwrap();
    assert_eq!(
        stored.audio_video(AudioVideoMediaField::Trailer).map(|m| m.status),
        Some(AudioVideoMediaStatus::Pending)
    );
}
