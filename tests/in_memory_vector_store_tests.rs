use shopsearch::{
    DistanceMetric, InMemoryVectorStore, ProductChunk, ProductFilters, VectorStore,
    VectorStoreConfig,
};

const DIMS: usize = 3;

fn store() -> InMemoryVectorStore {
    InMemoryVectorStore::new(VectorStoreConfig::new(DIMS))
}

fn chunk(product_id: i64, title: &str, embedding: Vec<f32>) -> ProductChunk {
    ProductChunk::new(
        product_id,
        1,
        title.to_string(),
        "Footwear".to_string(),
        format!("{} description", title),
        embedding,
    )
}

#[tokio::test]
async fn create_enforces_dimensionality() {
    let store = store();

    let err = store
        .create(chunk(1, "Bad", vec![1.0, 0.0, 0.0, 0.0]))
        .await
        .unwrap_err();
    assert!(err.is_invalid_input());
    assert_eq!(store.count().await.unwrap(), 0);
}

#[tokio::test]
async fn search_results_are_ordered_by_ascending_distance() {
    let store = store();

    store.create(chunk(1, "A", vec![1.0, 0.0, 0.0])).await.unwrap();
    store.create(chunk(2, "B", vec![0.0, 1.0, 0.0])).await.unwrap();
    store.create(chunk(3, "C", vec![0.7, 0.7, 0.0])).await.unwrap();
    store.create(chunk(4, "D", vec![0.9, 0.1, 0.0])).await.unwrap();

    let results = store
        .similarity_search(&[1.0, 0.0, 0.0], DistanceMetric::Cosine, 10, None)
        .await
        .unwrap();

    assert_eq!(results.len(), 4);
    for pair in results.windows(2) {
        assert!(pair[0].distance() <= pair[1].distance());
    }
}

#[tokio::test]
async fn threshold_results_are_a_subset_of_looser_threshold() {
    let store = store();

    store.create(chunk(1, "A", vec![1.0, 0.0, 0.0])).await.unwrap();
    store.create(chunk(2, "B", vec![0.0, 1.0, 0.0])).await.unwrap();
    store.create(chunk(3, "C", vec![0.7, 0.7, 0.0])).await.unwrap();

    let strict = store
        .similarity_search(&[1.0, 0.0, 0.0], DistanceMetric::Cosine, 10, Some(0.1))
        .await
        .unwrap();
    let loose = store
        .similarity_search(&[1.0, 0.0, 0.0], DistanceMetric::Cosine, 10, Some(0.6))
        .await
        .unwrap();

    assert!(strict.len() <= loose.len());
    let loose_ids: Vec<&str> = loose.iter().map(|r| r.chunk().id.as_str()).collect();
    for result in &strict {
        assert!(loose_ids.contains(&result.chunk().id.as_str()));
    }
}

#[tokio::test]
async fn limit_bounds_result_count_in_both_modes() {
    let store = store();

    for i in 0..6 {
        store
            .create(chunk(i, &format!("P{}", i), vec![1.0, i as f32 * 0.1, 0.0]))
            .await
            .unwrap();
    }

    let plain = store
        .similarity_search(&[1.0, 0.0, 0.0], DistanceMetric::Cosine, 4, None)
        .await
        .unwrap();
    assert_eq!(plain.len(), 4);

    let hybrid = store
        .hybrid_search(
            &[1.0, 0.0, 0.0],
            &ProductFilters::new().with_title_contains("P"),
            DistanceMetric::Cosine,
            3,
        )
        .await
        .unwrap();
    assert_eq!(hybrid.len(), 3);

    let none = store
        .similarity_search(&[1.0, 0.0, 0.0], DistanceMetric::Cosine, 0, None)
        .await
        .unwrap();
    assert!(none.is_empty());
}

#[tokio::test]
async fn equal_distances_break_ties_on_ascending_id() {
    let store = store();

    // Both are orthogonal to the query: identical cosine distance of 1.0.
    let a = store.create(chunk(1, "A", vec![0.0, 1.0, 0.0])).await.unwrap();
    let b = store.create(chunk(2, "B", vec![0.0, 0.0, 1.0])).await.unwrap();

    let results = store
        .similarity_search(&[1.0, 0.0, 0.0], DistanceMetric::Cosine, 10, None)
        .await
        .unwrap();

    assert_eq!(results.len(), 2);
    let mut expected = vec![a.id.clone(), b.id.clone()];
    expected.sort();
    let actual: Vec<String> = results.iter().map(|r| r.chunk().id.clone()).collect();
    assert_eq!(actual, expected);
}

#[tokio::test]
async fn delete_twice_returns_true_then_false() {
    let store = store();

    let created = store.create(chunk(9, "X", vec![0.0, 0.0, 1.0])).await.unwrap();

    assert!(store.delete_by_id(&created.id).await.unwrap());
    assert!(!store.delete_by_id(&created.id).await.unwrap());
}

#[tokio::test]
async fn pagination_covers_all_rows_exactly_once() {
    let store = store();

    for i in 0..7 {
        store
            .create(chunk(i, &format!("P{}", i), vec![0.0, 0.0, 1.0]))
            .await
            .unwrap();
    }

    let stride = 3;
    let mut seen = Vec::new();
    let mut offset = 0;
    loop {
        let (page, total) = store.list(stride, offset).await.unwrap();
        assert_eq!(total, 7);
        if page.is_empty() {
            break;
        }
        seen.extend(page.into_iter().map(|c| c.id));
        offset += stride;
    }

    seen.sort();
    seen.dedup();
    assert_eq!(seen.len(), 7);
}

#[tokio::test]
async fn hybrid_filters_apply_before_ranking() {
    let store = store();

    store
        .create(chunk(1, "Red Shoes", vec![0.0, 1.0, 0.0]))
        .await
        .unwrap();
    store
        .create(chunk(2, "Blue Hat", vec![1.0, 0.0, 0.0]))
        .await
        .unwrap();

    let results = store
        .hybrid_search(
            &[1.0, 0.0, 0.0],
            &ProductFilters::new().with_title_contains("SHOES"),
            DistanceMetric::Cosine,
            10,
        )
        .await
        .unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].chunk().title, "Red Shoes");
}

#[tokio::test]
async fn get_by_product_id_returns_first_chunk() {
    let store = store();

    store
        .create(
            chunk(10, "Multi", vec![0.0, 1.0, 0.0]).with_chunk_index(1),
        )
        .await
        .unwrap();
    store
        .create(
            chunk(10, "Multi", vec![1.0, 0.0, 0.0]).with_chunk_index(0),
        )
        .await
        .unwrap();

    let first = store
        .get_by_product_id(10)
        .await
        .unwrap()
        .expect("expected a chunk");
    assert_eq!(first.chunk_index, 0);
}

#[tokio::test]
async fn embedding_dimensions_reports_stored_length() {
    let store = store();
    assert_eq!(store.embedding_dimensions().await.unwrap(), None);

    store.create(chunk(1, "Any", vec![0.0, 1.0, 0.0])).await.unwrap();
    assert_eq!(store.embedding_dimensions().await.unwrap(), Some(DIMS));
}
