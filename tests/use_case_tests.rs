use std::sync::Arc;

use shopsearch::{
    DeleteProductUseCase, DistanceMetric, IndexProductUseCase, InMemoryVectorStore, MockEmbedding,
    ProductFilters, SearchProductsUseCase, VectorStore, VectorStoreConfig,
};

const DIMS: usize = 16;

fn fixtures() -> (Arc<InMemoryVectorStore>, Arc<MockEmbedding>) {
    (
        Arc::new(InMemoryVectorStore::new(VectorStoreConfig::new(DIMS))),
        Arc::new(MockEmbedding::with_dimensions(DIMS)),
    )
}

#[tokio::test]
async fn indexing_splits_and_stores_chunks_in_order() {
    let (store, embedder) = fixtures();
    let index = IndexProductUseCase::new(store.clone(), embedder).with_max_chunk_chars(40);

    let stored = index
        .execute(
            42,
            7,
            "Red Shoes",
            "Footwear",
            "Bright red running shoes.\n\nBreathable mesh upper.",
        )
        .await
        .expect("index");

    assert_eq!(stored.len(), 2);
    assert_eq!(stored[0].chunk_index, 0);
    assert_eq!(stored[1].chunk_index, 1);
    assert_eq!(store.count().await.unwrap(), 2);

    let first = store
        .get_by_product_id(42)
        .await
        .unwrap()
        .expect("expected indexed chunk");
    assert_eq!(first.chunk_index, 0);
    assert_eq!(first.title, "Red Shoes");
}

#[tokio::test]
async fn reindexing_replaces_previous_chunks() {
    let (store, embedder) = fixtures();
    let index = IndexProductUseCase::new(store.clone(), embedder).with_max_chunk_chars(10);

    index
        .execute(42, 7, "Red Shoes", "Footwear", "First.\n\nSecond.\n\nThird.")
        .await
        .expect("index");
    assert_eq!(store.count().await.unwrap(), 3);

    let stored = index
        .execute(42, 7, "Red Shoes v2", "Footwear", "Tiny.")
        .await
        .expect("reindex");

    assert_eq!(stored.len(), 1);
    assert_eq!(store.count().await.unwrap(), 1);
    let remaining = store.get_by_product_id(42).await.unwrap().unwrap();
    assert_eq!(remaining.title, "Red Shoes v2");
}

#[tokio::test]
async fn indexing_empty_description_fails_without_writes() {
    let (store, embedder) = fixtures();
    let index = IndexProductUseCase::new(store.clone(), embedder);

    let err = index
        .execute(42, 7, "Red Shoes", "Footwear", "   ")
        .await
        .unwrap_err();
    assert!(err.is_invalid_input());
    assert_eq!(store.count().await.unwrap(), 0);
}

#[tokio::test]
async fn search_finds_the_matching_product_first() {
    let (store, embedder) = fixtures();
    let index = IndexProductUseCase::new(store.clone(), embedder.clone());
    let search = SearchProductsUseCase::new(store, embedder);

    index
        .execute(1, 7, "Red Shoes", "Footwear", "red running shoes")
        .await
        .expect("index");
    index
        .execute(2, 7, "Blue Hat", "Accessories", "blue woolen hat")
        .await
        .expect("index");

    // The mock embedder is deterministic, so the identical text embeds at
    // distance zero.
    let results = search
        .execute("red running shoes", DistanceMetric::Cosine, 10, None)
        .await
        .expect("search");

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].chunk().product_id, 1);
    assert!(results[0].distance() < 1e-5);
    assert!(results[0].distance() <= results[1].distance());
}

#[tokio::test]
async fn filtered_search_restricts_candidates() {
    let (store, embedder) = fixtures();
    let index = IndexProductUseCase::new(store.clone(), embedder.clone());
    let search = SearchProductsUseCase::new(store, embedder);

    index
        .execute(1, 7, "Red Shoes", "Footwear", "red running shoes")
        .await
        .expect("index");
    index
        .execute(2, 7, "Blue Hat", "Accessories", "blue woolen hat")
        .await
        .expect("index");

    let results = search
        .execute_filtered(
            "red running shoes",
            &ProductFilters::new().with_title_contains("hat"),
            DistanceMetric::Cosine,
            10,
        )
        .await
        .expect("search");

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].chunk().product_id, 2);
}

#[tokio::test]
async fn delete_use_case_reports_whether_chunks_existed() {
    let (store, embedder) = fixtures();
    let index = IndexProductUseCase::new(store.clone(), embedder);
    let delete = DeleteProductUseCase::new(store.clone());

    index
        .execute(42, 7, "Red Shoes", "Footwear", "red running shoes")
        .await
        .expect("index");

    assert!(delete.execute(42).await.expect("delete"));
    assert!(!delete.execute(42).await.expect("delete"));
    assert_eq!(store.count().await.unwrap(), 0);
}
