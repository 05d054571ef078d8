//! Repository contract against the in-memory backend.

mod contract;

use domain::CatalogEvent;
use persistence::{InMemoryRepository, InMemoryUnitOfWork};

macro_rules! contract {
    ($($name:ident),* $(,)?) => {
        $(
            #[tokio::test]
            async fn $name() {
                contract::$name(&InMemoryRepository::new()).await;
            }
        )*
    };
}

contract!(
    default_search_returns_newest_first,
    filter_and_sort_paginate_matches,
    sort_descending_by_name,
    unknown_sort_field_falls_back_to_default,
    equal_sort_keys_keep_insertion_order,
    page_past_the_end_is_empty,
    empty_repository_search,
    exists_by_id_rejects_empty_list,
    exists_by_id_partitions_in_request_order,
    find_operations,
    stored_fields_survive_reload,
    update_and_delete,
    update_and_delete_unknown_are_not_found,
    duplicate_insert_is_rejected,
    cast_member_filters,
    genre_category_filter_matches_any,
    video_filters_combine,
    video_media_survive_reload,
);

#[tokio::test]
async fn uncommitted_writes_stay_invisible() {
    let mut uow = InMemoryUnitOfWork::<CatalogEvent>::new();
    contract::uncommitted_writes_stay_invisible(&mut uow, &InMemoryRepository::new()).await;
}

#[tokio::test]
async fn transaction_spans_several_writes() {
    let mut uow = InMemoryUnitOfWork::<CatalogEvent>::new();
    contract::transaction_spans_several_writes(&mut uow, &InMemoryRepository::new()).await;
}
