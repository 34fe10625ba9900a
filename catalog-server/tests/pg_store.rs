//! PgStore tests against a live Postgres
//!
//! Run with: DATABASE_URL=postgres://... cargo test -p catalog-server -- --ignored

use catalog_server::db::{create_pool, migrations, CatalogStore, DbError, PgStore};
use catalog_server::models::{
    CategoryName, IdList, NewCategory, NewProduct, Price, ProductName, ProductPatch, Stock,
    NewTag, TagName, ValidationError,
};
use rust_decimal::Decimal;

async fn store() -> PgStore {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
    let pool = create_pool(&url).await.expect("pool creation failed");
    migrations::run(&pool).await.expect("migrations failed");
    PgStore::new(pool)
}

async fn link_count(store: &PgStore, product_id: i32) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM product_tag WHERE product_id = $1")
        .bind(product_id)
        .fetch_one(store.pool())
        .await
        .unwrap()
}

fn new_product(category_id: i32, tag_ids: Vec<i32>) -> NewProduct {
    NewProduct {
        name: ProductName::new("Atlas").unwrap(),
        price: Price::new(Decimal::new(1000, 2)).unwrap(),
        stock: Stock::new(5).unwrap(),
        category_id,
        tag_ids: IdList::new(tag_ids),
    }
}

async fn category(store: &PgStore, name: &str) -> i32 {
    store
        .create_category(NewCategory {
            name: CategoryName::new(name).unwrap(),
        })
        .await
        .unwrap()
        .id
}

async fn tag(store: &PgStore, name: &str) -> i32 {
    store
        .create_tag(NewTag {
            name: TagName::new(name).unwrap(),
            product_ids: IdList::default(),
        })
        .await
        .unwrap()
        .id
}

#[tokio::test]
#[ignore = "requires database"]
async fn migrations_are_idempotent() {
    let store = store().await;
    migrations::run(store.pool()).await.unwrap();
    store.ping().await.unwrap();
}

#[tokio::test]
#[ignore = "requires database"]
async fn invalid_tag_rolls_back_product_insert() {
    let store = store().await;
    let books = category(&store, "pg-rollback").await;
    let a = tag(&store, "pg-rollback-a").await;

    let err = store
        .create_product(new_product(books, vec![a, i32::MAX]))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DbError::Validation(ValidationError::UnknownReference { resource: "tag", .. })
    ));

    let category = store.get_category(books).await.unwrap();
    assert!(category.products.is_empty());
}

#[tokio::test]
#[ignore = "requires database"]
async fn tag_replacement_and_delete_clean_join_rows() {
    let store = store().await;
    let books = category(&store, "pg-links").await;
    let a = tag(&store, "pg-links-a").await;
    let b = tag(&store, "pg-links-b").await;

    let product = store.create_product(new_product(books, vec![a, b])).await.unwrap();
    assert_eq!(link_count(&store, product.id).await, 2);

    let updated = store
        .update_product(
            product.id,
            ProductPatch {
                tag_ids: Some(IdList::new(vec![b])),
                ..ProductPatch::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.tag_ids(), vec![b]);
    assert_eq!(link_count(&store, product.id).await, 1);

    store.delete_product(product.id).await.unwrap();
    assert_eq!(link_count(&store, product.id).await, 0);
    assert!(matches!(
        store.get_product(product.id).await,
        Err(DbError::NotFound { .. })
    ));
}

#[tokio::test]
#[ignore = "requires database"]
async fn failed_update_leaves_product_untouched() {
    let store = store().await;
    let books = category(&store, "pg-update").await;
    let a = tag(&store, "pg-update-a").await;
    let product = store.create_product(new_product(books, vec![a])).await.unwrap();

    let result = store
        .update_product(
            product.id,
            ProductPatch {
                stock: Some(Stock::new(0).unwrap()),
                tag_ids: Some(IdList::new(vec![i32::MAX])),
                ..ProductPatch::default()
            },
        )
        .await;
    assert!(matches!(result, Err(DbError::Validation(_))));

    let fetched = store.get_product(product.id).await.unwrap();
    assert_eq!(fetched.stock, 5);
    assert_eq!(fetched.tag_ids(), vec![a]);

    store.delete_product(product.id).await.unwrap();
}

#[tokio::test]
#[ignore = "requires database"]
async fn referenced_category_delete_conflicts() {
    let store = store().await;
    let books = category(&store, "pg-conflict").await;
    let product = store.create_product(new_product(books, vec![])).await.unwrap();

    let err = store.delete_category(books).await.unwrap_err();
    assert!(matches!(err, DbError::Conflict { .. }));

    store.delete_product(product.id).await.unwrap();
    store.delete_category(books).await.unwrap();
    assert!(matches!(
        store.delete_category(books).await,
        Err(DbError::NotFound { .. })
    ));
}
