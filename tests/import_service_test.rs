mod common;

use chrono::Utc;
use common::{csv_bytes, fixture_options, TestApp};
use rust_decimal_macros::dec;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, Set};
use uuid::Uuid;

use partsbay_api::{
    entities::{category, import_log, product},
    errors::ServiceError,
};

async fn seed_product(app: &TestApp, sku: &str, brand: &str, image_url: Option<&str>) -> Uuid {
    let id = Uuid::new_v4();
    product::ActiveModel {
        id: Set(id),
        sku: Set(sku.to_string()),
        brand: Set(brand.to_string()),
        department_id: Set(app.department_id),
        title: Set(format!("{} (existing)", sku)),
        supplier_price: Set(dec!(50)),
        price: Set(dec!(55)),
        description: Set(None),
        image_url: Set(image_url.map(str::to_string)),
        category_id: Set(None),
        created_at: Set(Utc::now()),
        updated_at: Set(None),
    }
    .insert(&*app.db)
    .await
    .expect("failed to seed product");
    id
}

#[tokio::test]
async fn three_row_scenario_yields_one_of_each() {
    let app = TestApp::new().await;
    seed_product(&app, "A2", "Febi", None).await;

    let file = csv_bytes(&[
        "sku,title,price,brand,category,image",
        "A1,Brake pad,100,Bosch,,",
        "A2,Oil filter,200,Febi,,",
        "A3,Air filter,,Mahle,,",
    ]);

    let summary = app
        .import
        .import_price_list(&app.manager(), "prices.csv", &file, &fixture_options())
        .await
        .expect("import should succeed");

    assert_eq!(summary.created, 1);
    assert_eq!(summary.updated, 1);
    assert_eq!(summary.skipped, 1);
    assert!(summary.missing_categories.is_empty());

    // created row got the 10% markup
    let created = product::Entity::find()
        .filter(product::Column::Sku.eq("A1"))
        .one(&*app.db)
        .await
        .unwrap()
        .expect("A1 should exist");
    assert_eq!(created.supplier_price, dec!(100));
    assert_eq!(created.price, dec!(110));
    assert_eq!(created.brand, "Bosch");

    // updated row received the new price
    let updated = product::Entity::find()
        .filter(product::Column::Sku.eq("A2"))
        .one(&*app.db)
        .await
        .unwrap()
        .expect("A2 should exist");
    assert_eq!(updated.price, dec!(220));
    assert_eq!(updated.title, "Oil filter");

    // skipped row never landed
    let missing = product::Entity::find()
        .filter(product::Column::Sku.eq("A3"))
        .one(&*app.db)
        .await
        .unwrap();
    assert!(missing.is_none());
}

#[tokio::test]
async fn reimport_is_idempotent() {
    let app = TestApp::new().await;

    let file = csv_bytes(&[
        "sku,title,price,brand,category,image",
        "A1,Brake pad,100,Bosch,,",
        "A2,Oil filter,200,Febi,,",
        "A3,Wiper blade,30,Valeo,,",
    ]);

    let first = app
        .import
        .import_price_list(&app.manager(), "prices.csv", &file, &fixture_options())
        .await
        .unwrap();
    assert_eq!(first.created, 3);
    assert_eq!(first.updated, 0);

    let second = app
        .import
        .import_price_list(&app.manager(), "prices.csv", &file, &fixture_options())
        .await
        .unwrap();
    assert_eq!(second.created, 0);
    assert_eq!(second.updated, first.created + first.updated);
    assert_eq!(second.skipped, 0);

    let count = product::Entity::find().count(&*app.db).await.unwrap();
    assert_eq!(count, 3);
}

#[tokio::test]
async fn unauthorized_category_skips_row_and_creates_nothing() {
    let app = TestApp::new().await;

    let file = csv_bytes(&[
        "sku,title,price,brand,category,image",
        "A1,Brake pad,100,Bosch,Brakes,",
        "A2,Brake disc,150,Bosch,Brakes,",
    ]);

    let summary = app
        .import
        .import_price_list(&app.clerk(), "prices.csv", &file, &fixture_options())
        .await
        .unwrap();

    assert_eq!(summary.created, 0);
    assert_eq!(summary.skipped, 2);
    assert_eq!(summary.missing_categories, vec!["Brakes".to_string()]);

    assert_eq!(category::Entity::find().count(&*app.db).await.unwrap(), 0);
    assert_eq!(product::Entity::find().count(&*app.db).await.unwrap(), 0);

    // the audit row names the unauthorized title
    let log = import_log::Entity::find()
        .one(&*app.db)
        .await
        .unwrap()
        .expect("audit row should exist");
    assert!(log.message.unwrap().contains("Brakes"));
}

#[tokio::test]
async fn privileged_actor_creates_category_once() {
    let app = TestApp::new().await;

    let file = csv_bytes(&[
        "sku,title,price,brand,category,image",
        "A1,Brake pad,100,Bosch,Brakes,",
        "A2,Brake disc,150,Bosch,Brakes,",
    ]);

    let summary = app
        .import
        .import_price_list(&app.manager(), "prices.csv", &file, &fixture_options())
        .await
        .unwrap();

    assert_eq!(summary.created, 2);
    assert!(summary.missing_categories.is_empty());

    let categories = category::Entity::find().all(&*app.db).await.unwrap();
    assert_eq!(categories.len(), 1);
    assert_eq!(categories[0].title, "Brakes");

    for item in product::Entity::find().all(&*app.db).await.unwrap() {
        assert_eq!(item.category_id, Some(categories[0].id));
    }
}

#[tokio::test]
async fn incomplete_mapping_aborts_before_any_write() {
    let app = TestApp::new().await;

    let file = csv_bytes(&[
        "sku,title,price,brand,category,image",
        "A1,Brake pad,100,Bosch,,",
    ]);

    let mut options = fixture_options();
    options.mapping.price = -1;

    let err = app
        .import
        .import_price_list(&app.manager(), "prices.csv", &file, &options)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::ValidationError(_)));

    assert_eq!(product::Entity::find().count(&*app.db).await.unwrap(), 0);
    assert_eq!(import_log::Entity::find().count(&*app.db).await.unwrap(), 0);
}

#[tokio::test]
async fn counts_cover_every_data_row() {
    let app = TestApp::new().await;
    seed_product(&app, "B1", "Febi", None).await;

    let file = csv_bytes(&[
        "sku,title,price,brand,category,image",
        "A1,Brake pad,100,Bosch,,",
        "B1,Oil filter,80,Febi,,",
        ",Nameless,10,Bosch,,",
        "C1,Bad price,free,Bosch,,",
        "C2,Comma price,\"49,90\",Hella,,",
        "C3,Zero price,0,Hella,,",
    ]);

    let summary = app
        .import
        .import_price_list(&app.manager(), "prices.csv", &file, &fixture_options())
        .await
        .unwrap();

    assert_eq!(summary.created + summary.updated + summary.skipped, 6);
    assert_eq!(summary.created, 2); // A1 and C2
    assert_eq!(summary.updated, 1); // B1
    assert_eq!(summary.skipped, 3);

    // comma decimal separator parsed, then 10% markup, rounded half-up
    let comma = product::Entity::find()
        .filter(product::Column::Sku.eq("C2"))
        .one(&*app.db)
        .await
        .unwrap()
        .expect("C2 should exist");
    assert_eq!(comma.supplier_price, dec!(49.90));
    assert_eq!(comma.price, dec!(55)); // 54.89 -> 55
}

#[tokio::test]
async fn preserve_images_policy() {
    let app = TestApp::new().await;
    let id = seed_product(&app, "A1", "Bosch", Some("https://img.example/old.jpg")).await;

    let file = csv_bytes(&[
        "sku,title,price,brand,category,image",
        "A1,Brake pad,100,Bosch,,",
    ]);

    // preserve_images keeps the stored image when the row brings none
    let mut options = fixture_options();
    options.preserve_images = true;
    app.import
        .import_price_list(&app.manager(), "prices.csv", &file, &options)
        .await
        .unwrap();

    let kept = product::Entity::find_by_id(id)
        .one(&*app.db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(kept.image_url.as_deref(), Some("https://img.example/old.jpg"));

    // without the policy the absent image replaces the stored one
    options.preserve_images = false;
    app.import
        .import_price_list(&app.manager(), "prices.csv", &file, &options)
        .await
        .unwrap();

    let replaced = product::Entity::find_by_id(id)
        .one(&*app.db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(replaced.image_url, None);
}

#[tokio::test]
async fn audit_log_written_once_per_run() {
    let app = TestApp::new().await;

    let file = csv_bytes(&[
        "sku,title,price,brand,category,image",
        "A1,Brake pad,100,Bosch,,",
    ]);

    let actor = app.manager();
    app.import
        .import_price_list(&actor, "prices.csv", &file, &fixture_options())
        .await
        .unwrap();

    let logs = import_log::Entity::find().all(&*app.db).await.unwrap();
    assert_eq!(logs.len(), 1);
    let log = &logs[0];
    assert_eq!(log.actor_id, actor.id);
    assert_eq!(log.file_name, "prices.csv");
    assert_eq!(log.created_count, 1);
    assert_eq!(log.updated_count, 0);
    assert_eq!(log.skipped_count, 0);
    assert_eq!(log.message, None);
}

#[tokio::test]
async fn actor_without_import_permission_is_rejected() {
    let app = TestApp::new().await;

    let file = csv_bytes(&[
        "sku,title,price,brand,category,image",
        "A1,Brake pad,100,Bosch,,",
    ]);

    let err = app
        .import
        .import_price_list(&app.actor("viewer"), "prices.csv", &file, &fixture_options())
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Forbidden(_)));
    assert_eq!(product::Entity::find().count(&*app.db).await.unwrap(), 0);
}
