mod common;

use common::{
    Article, ArticleStore, BrokenStore, RecordingConnection, UnreachableConnection, hit_rows,
    meta_rows,
};
use pretty_assertions::assert_eq;
use scout_sphinx::{Document, Engine, ErrorCategory, ScoutError, SearchBuilder, SphinxEngine};

fn articles_builder(query: &str) -> SearchBuilder<Article> {
    SearchBuilder::new(Article::default(), query)
}

#[tokio::test]
async fn test_empty_batches_issue_no_statements() {
    let engine = SphinxEngine::new(RecordingConnection::new());

    engine.update::<Article>(&[]).await.unwrap();
    engine.delete::<Article>(&[]).await.unwrap();

    assert!(engine.connection().round_trips().is_empty());
}

#[tokio::test]
async fn test_update_replaces_whole_batch_in_one_statement() {
    let engine = SphinxEngine::new(RecordingConnection::new());
    let batch = vec![
        Article::new(1, "Rust", "ownership"),
        Article::new(2, "Sphinx", "it's fast"),
    ];

    engine.update(&batch).await.unwrap();

    assert_eq!(
        engine.connection().round_trips(),
        vec![vec![
            r"REPLACE INTO articles (id, body, title) VALUES (1, 'ownership', 'Rust'), (2, 'it\'s fast', 'Sphinx')"
                .to_string()
        ]]
    );
}

#[tokio::test]
async fn test_update_uses_first_model_columns() {
    let engine = SphinxEngine::new(RecordingConnection::new());
    let batch = vec![
        Document::new("docs", 1).with_field("title", "a"),
        Document::new("docs", 2).with_field("title", "a"),
    ];

    engine.update(&batch).await.unwrap();

    assert_eq!(
        engine.connection().statements(),
        vec!["REPLACE INTO docs (id, title) VALUES (1, 'a'), (2, 'a')".to_string()]
    );
}

#[tokio::test]
async fn test_update_fills_missing_fields_with_null() {
    let engine = SphinxEngine::new(RecordingConnection::new());
    let batch = vec![
        Document::new("docs", 1)
            .with_field("title", "a")
            .with_field("tags", vec![3, 4]),
        Document::new("docs", 2).with_field("title", "b"),
    ];

    engine.update(&batch).await.unwrap();

    assert_eq!(
        engine.connection().statements(),
        vec!["REPLACE INTO docs (id, tags, title) VALUES (1, (3, 4), 'a'), (2, NULL, 'b')".to_string()]
    );
}

#[tokio::test]
async fn test_update_rejects_model_without_fields() {
    let engine = SphinxEngine::new(RecordingConnection::new());

    let err = engine.update(&[Document::new("docs", 1)]).await.unwrap_err();

    assert!(matches!(err, ScoutError::InvalidModel(_)));
    assert!(engine.connection().round_trips().is_empty());
}

#[tokio::test]
async fn test_delete_removes_every_key() {
    let engine = SphinxEngine::new(RecordingConnection::new());
    let batch = vec![Document::new("docs", 5), Document::new("docs", 9)];

    engine.delete(&batch).await.unwrap();

    assert_eq!(
        engine.connection().round_trips(),
        vec![vec!["DELETE FROM docs WHERE id IN (5, 9)".to_string()]]
    );
}

#[tokio::test]
async fn test_search_matches_every_field_but_id() {
    let engine = SphinxEngine::new(RecordingConnection::new().respond_with(vec![hit_rows(&[4])]));
    let builder = SearchBuilder::new(Document::template("articles", ["id", "title"]), "rust")
        .with_limit(5);

    let results = engine.search(&builder).await.unwrap();

    assert_eq!(
        engine.connection().statements(),
        vec!["SELECT * FROM articles WHERE MATCH('(@title rust)') LIMIT 5".to_string()]
    );
    assert_eq!(engine.map_ids(&results), vec![4]);
    assert!(results.meta().is_none());
}

#[tokio::test]
async fn test_search_without_limit_and_with_filter() {
    let engine = SphinxEngine::new(RecordingConnection::new());
    let builder = articles_builder("borrow checker").where_eq("author_id", 7);

    engine.search(&builder).await.unwrap();

    assert_eq!(
        engine.connection().statements(),
        vec![
            "SELECT * FROM articles WHERE MATCH('(@(body,title) borrow checker)') AND author_id = 7"
                .to_string()
        ]
    );
}

#[tokio::test]
async fn test_search_with_zero_limit_is_unbounded() {
    let engine = SphinxEngine::new(RecordingConnection::new());
    let builder = SearchBuilder::new(Document::template("a", ["t"]), "x").with_limit(0);

    engine.search(&builder).await.unwrap();

    assert_eq!(
        engine.connection().statements(),
        vec!["SELECT * FROM a WHERE MATCH('(@t x)')".to_string()]
    );
}

#[tokio::test]
async fn test_paginate_batches_search_and_meta() {
    let connection = RecordingConnection::new().respond_with(vec![
        hit_rows(&[21, 22]),
        meta_rows(&[("total", "2"), ("total_found", "137"), ("time", "0.001")]),
    ]);
    let engine = SphinxEngine::new(connection);

    let results = engine
        .paginate(&articles_builder("rust"), 10, 3)
        .await
        .unwrap();

    assert_eq!(
        engine.connection().round_trips(),
        vec![vec![
            "SELECT * FROM articles WHERE MATCH('(@(body,title) rust)') LIMIT 20, 10".to_string(),
            "SHOW META".to_string(),
        ]]
    );
    assert_eq!(results.len(), 2);
    assert_eq!(engine.get_total_count(&results), 137);
    assert_eq!(engine.map_ids(&results), vec![21, 22]);
}

#[tokio::test]
async fn test_paginate_first_page_starts_at_zero() {
    let engine = SphinxEngine::new(RecordingConnection::new());

    engine.paginate(&articles_builder("rust"), 15, 1).await.unwrap();
    engine.paginate(&articles_builder("rust"), 15, 0).await.unwrap();

    let statements = engine.connection().statements();
    assert!(statements[0].ends_with("LIMIT 0, 15"));
    assert!(statements[2].ends_with("LIMIT 0, 15"));
}

#[tokio::test]
async fn test_paginate_rejects_empty_pages() {
    let engine = SphinxEngine::new(RecordingConnection::new());

    let err = engine
        .paginate(&articles_builder("rust"), 0, 1)
        .await
        .unwrap_err();

    assert_eq!(err.category(), ErrorCategory::Build);
    assert!(engine.connection().round_trips().is_empty());
}

#[tokio::test]
async fn test_total_count_without_meta_is_page_size() {
    let engine = SphinxEngine::new(RecordingConnection::new().respond_with(vec![hit_rows(&[1, 2, 3])]));

    let results = engine.search(&articles_builder("rust")).await.unwrap();

    assert_eq!(engine.get_total_count(&results), 3);
}

#[tokio::test]
async fn test_map_restores_search_ranking() {
    let engine =
        SphinxEngine::new(RecordingConnection::new().respond_with(vec![hit_rows(&[3, 1, 2, 8])]));
    let store = ArticleStore::new(vec![
        Article::new(1, "one", ""),
        Article::new(2, "two", ""),
        Article::new(3, "three", ""),
    ]);

    let results = engine.search(&articles_builder("rust")).await.unwrap();
    let models = engine.map(&results, &store).await.unwrap();

    let ids: Vec<u64> = models.iter().map(|a| a.id).collect();
    assert_eq!(ids, vec![3, 1, 2]);
    assert_eq!(store.lookups(), vec![vec![3, 1, 2, 8]]);
}

#[tokio::test]
async fn test_map_get_after_paginate() {
    let connection = RecordingConnection::new().respond_with(vec![
        hit_rows(&[2, 1]),
        meta_rows(&[("total_found", "40")]),
    ]);
    let engine = SphinxEngine::new(connection);
    let store = ArticleStore::new(vec![Article::new(1, "one", ""), Article::new(2, "two", "")]);

    let results = engine
        .paginate(&articles_builder("rust"), 2, 1)
        .await
        .unwrap();
    let models = engine.map_get(&results, &store).await.unwrap();

    assert_eq!(models, vec![Article::new(2, "two", ""), Article::new(1, "one", "")]);
    assert_eq!(engine.get_total_count(&results), 40);
}

#[tokio::test]
async fn test_map_of_empty_results_skips_lookup() {
    let engine = SphinxEngine::new(RecordingConnection::new());
    let store = ArticleStore::new(vec![Article::new(1, "one", "")]);

    let results = engine.search(&articles_builder("nothing")).await.unwrap();
    let models = engine.map(&results, &store).await.unwrap();

    assert!(models.is_empty());
    assert!(store.lookups().is_empty());
}

#[tokio::test]
async fn test_get_searches_then_maps() {
    let engine = SphinxEngine::new(RecordingConnection::new().respond_with(vec![hit_rows(&[2])]));
    let store = ArticleStore::new(vec![Article::new(1, "one", ""), Article::new(2, "two", "")]);

    let models = engine
        .get(&articles_builder("two").with_limit(1), &store)
        .await
        .unwrap();

    assert_eq!(models, vec![Article::new(2, "two", "")]);
    assert_eq!(engine.connection().round_trips().len(), 1);
}

#[tokio::test]
async fn test_repository_failure_propagates() {
    let engine = SphinxEngine::new(RecordingConnection::new().respond_with(vec![hit_rows(&[1])]));

    let results = engine.search(&articles_builder("rust")).await.unwrap();
    let err = engine.map(&results, &BrokenStore).await.unwrap_err();

    assert_eq!(err.category(), ErrorCategory::Repository);
}

#[tokio::test]
async fn test_connection_failure_propagates() {
    let engine = SphinxEngine::new(UnreachableConnection);

    let err = engine
        .update(&[Article::new(1, "a", "b")])
        .await
        .unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Connection);

    let err = engine
        .paginate(&articles_builder("rust"), 10, 1)
        .await
        .unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Connection);
}
