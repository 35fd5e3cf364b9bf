use ideaforge_core::idea::{Category, IdeaRecord, ViabilityBreakdown};
use ideaforge_core::providers::CatalogStore;
use ideaforge_db::repositories::IdeaRepo;
use ideaforge_db::stores::PgCatalogStore;
use sqlx::PgPool;

fn record(name: &str, category: Category, viability: i32) -> IdeaRecord {
    IdeaRecord {
        name: name.to_string(),
        description: "A cozy game about rebuilding a lighthouse.".to_string(),
        category,
        genre: "Puzzle".to_string(),
        viability,
        viability_breakdown: ViabilityBreakdown {
            originality: 55,
            market_appeal: 60,
            scope: 40,
        },
        source: "reddit".to_string(),
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn upsert_round_trips_record(pool: PgPool) {
    let original = record("Lighthouse Keeper", Category::VideoGame, 64);
    PgCatalogStore::new(pool.clone()).upsert(&original).await.unwrap();

    let stored = IdeaRepo::find_by_name(&pool, "Lighthouse Keeper")
        .await
        .unwrap()
        .expect("idea stored");
    assert_eq!(stored.into_record(), original);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn upsert_overwrites_by_name(pool: PgPool) {
    let store = PgCatalogStore::new(pool.clone());
    store
        .upsert(&record("Lighthouse Keeper", Category::VideoGame, 64))
        .await
        .unwrap();
    store
        .upsert(&record("Lighthouse Keeper", Category::BoardGame, 80))
        .await
        .unwrap();

    assert_eq!(IdeaRepo::list(&pool, None, 10, 0).await.unwrap().len(), 1);
    let stored = IdeaRepo::find_by_name(&pool, "Lighthouse Keeper")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.category, "Board Game");
    assert_eq!(stored.viability, 80);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn list_filters_by_category_and_pages(pool: PgPool) {
    for (name, category) in [
        ("Alpha", Category::CardGame),
        ("Beta", Category::CardGame),
        ("Gamma", Category::Other),
    ] {
        IdeaRepo::upsert(&pool, &record(name, category, 50)).await.unwrap();
    }

    let cards = IdeaRepo::list(&pool, Some(Category::CardGame), 10, 0).await.unwrap();
    assert_eq!(cards.len(), 2);
    assert!(cards.iter().all(|i| i.category == "Card Game"));

    let first_page = IdeaRepo::list(&pool, None, 2, 0).await.unwrap();
    let second_page = IdeaRepo::list(&pool, None, 2, 2).await.unwrap();
    assert_eq!(first_page.len(), 2);
    assert_eq!(second_page.len(), 1);
    let other = IdeaRepo::list(&pool, Some(Category::Other), 10, 0).await.unwrap();
    assert_eq!(other.len(), 1);
    assert_eq!(other[0].name, "Gamma");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn out_of_range_scores_are_rejected_by_schema(pool: PgPool) {
    let result = IdeaRepo::upsert(&pool, &record("Broken", Category::Other, 101)).await;
    assert!(result.is_err());
}
