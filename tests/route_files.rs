//! Route files, named includes and hot swapping.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;

use route_rules::config::watcher::RouteFileWatcher;
use route_rules::config::{load_table, ConfigError};
use route_rules::routing::{RouteRequest, RoutingError, RuleTable, SharedRuleTable, Target};

mod common;

use common::RouteFixture;

#[test]
fn test_named_includes_from_disk() {
    let fixture = RouteFixture::new();
    let path = fixture.write(
        "routes.toml",
        r#"
        include_dir = "routes"

        [[routes]]
        property = { site_name = "Demo" }

        [[routes]]
        path = "/shop/"
        include = "shop"

        [[routes]]
        path = ""
        methods = ["GET"]
        controller = ["Home", "index"]
        name = "home"
        "#,
    );
    fixture.write(
        "routes/shop.toml",
        r#"
        [[routes]]
        path = "/products/{sku}"
        view = "shop/product-{sku}"
        args = { currency = "EUR", sku = "ignored" }

        [[routes]]
        path = "admin"
        include = "shop_admin"
        "#,
    );
    fixture.write(
        "routes/shop_admin.toml",
        r#"
        [[routes]]
        path = "{*section}"
        ajax = true
        controller = "ShopAdmin"
        "#,
    );

    let (config, table) = load_table(&path).unwrap();
    assert_eq!(config.include_dir.as_deref(), Some("routes"));
    assert_eq!(table.property("site_name"), Some("Demo"));

    let paths: Vec<&str> = table.rules().iter().map(|r| r.path()).collect();
    assert_eq!(paths, vec!["shop/products/{sku}", "shop/admin/{*section}", ""]);

    let route = common::get(&table, "/shop/products/X-1").unwrap();
    assert_eq!(route.target(), &Target::view("shop/product-X-1"));
    assert_eq!(route.arg("sku"), Some("X-1"));
    assert_eq!(route.arg("currency"), Some("EUR"));

    assert!(common::get(&table, "shop/admin/orders/open").is_none());
    let route = table
        .match_parts("POST", "", true, "shop/admin/orders/open")
        .unwrap();
    assert_eq!(route.arg("section"), Some("orders/open"));

    assert_eq!(table.find_by_name("home").unwrap().path(), "");
}

#[test]
fn test_missing_include_source_aborts_load() {
    let fixture = RouteFixture::new();
    let path = fixture.write(
        "routes.toml",
        "[[routes]]\npath = \"docs\"\ninclude = \"docs\"\n",
    );

    let err = load_table(&path).unwrap_err();
    assert!(matches!(
        err,
        ConfigError::Routing(RoutingError::MissingIncludeSource(ref name)) if name == "docs"
    ));
}

#[test]
fn test_invalid_pattern_in_include_aborts_load() {
    let fixture = RouteFixture::new();
    let path = fixture.write("routes.toml", "[[routes]]\npath = \"x\"\ninclude = \"bad\"\n");
    fixture.write("bad.toml", "[[routes]]\npath = \"{a}/{a}\"\nview = \"v\"\n");

    let err = load_table(&path).unwrap_err();
    assert!(matches!(
        err,
        ConfigError::Routing(RoutingError::DuplicateVariable { .. })
    ));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_swap_under_concurrent_readers() {
    let fixture = RouteFixture::new();
    let v1 = fixture.write("v1.toml", "[[routes]]\npath = \"page\"\nview = \"v1\"\n");
    let v2 = fixture.write("v2.toml", "[[routes]]\npath = \"page\"\nview = \"v2\"\n");

    let (_, table) = load_table(&v1).unwrap();
    let shared = Arc::new(SharedRuleTable::new(table));

    let mut readers = Vec::new();
    for _ in 0..4 {
        let shared = Arc::clone(&shared);
        readers.push(tokio::spawn(async move {
            let mut seen = Vec::new();
            for _ in 0..200 {
                let route = shared
                    .match_request(&RouteRequest::new("GET", "/page"))
                    .expect("every published table matches /page");
                seen.push(route.target().to_string());
                tokio::task::yield_now().await;
            }
            seen
        }));
    }

    tokio::time::sleep(Duration::from_millis(1)).await;
    let (_, table) = load_table(&v2).unwrap();
    shared.replace(table);

    for reader in readers {
        for target in reader.await.unwrap() {
            assert!(target == "v1" || target == "v2", "unexpected target {target}");
        }
    }

    let route = shared.match_request(&RouteRequest::new("GET", "page")).unwrap();
    assert_eq!(route.target(), &Target::view("v2"));
}

/// Wait for the first rebuilt table, then keep the last one sent until the
/// channel has been quiet for a moment.
async fn settled(updates: &mut mpsc::UnboundedReceiver<RuleTable>, wait: Duration) -> Option<RuleTable> {
    let mut latest = tokio::time::timeout(wait, updates.recv()).await.ok().flatten()?;
    while let Ok(Some(table)) = tokio::time::timeout(Duration::from_millis(300), updates.recv()).await {
        latest = table;
    }
    Some(latest)
}

fn view_at(shared: &SharedRuleTable, path: &str) -> Option<String> {
    shared
        .match_request(&RouteRequest::new("GET", path))
        .map(|route| route.target().to_string())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_watcher_rebuilds_on_route_and_include_edits() {
    let fixture = RouteFixture::new();
    let path = fixture.write(
        "routes.toml",
        "[[routes]]\npath = \"admin\"\ninclude = \"admin\"\n",
    );
    fixture.write("admin.toml", "[[routes]]\npath = \"users\"\nview = \"users-v1\"\n");

    let (_, table) = load_table(&path).unwrap();
    let shared = SharedRuleTable::new(table);
    assert_eq!(view_at(&shared, "admin/users").as_deref(), Some("users-v1"));

    let (watcher, mut updates) = RouteFileWatcher::new(&path);
    let _watcher = watcher.run().unwrap();
    tokio::time::sleep(Duration::from_millis(200)).await;

    // Editing the route file itself.
    fixture.replace(
        "routes.toml",
        "[[routes]]\npath = \"staff\"\ninclude = \"admin\"\n",
    );
    let table = settled(&mut updates, Duration::from_secs(5))
        .await
        .expect("route file edit rebuilds the table");
    shared.replace(table);
    assert_eq!(view_at(&shared, "staff/users").as_deref(), Some("users-v1"));
    assert!(view_at(&shared, "admin/users").is_none());

    // Editing an include that lives next to the route file (no include_dir).
    fixture.replace("admin.toml", "[[routes]]\npath = \"users\"\nview = \"users-v2\"\n");
    let table = settled(&mut updates, Duration::from_secs(5))
        .await
        .expect("include edit rebuilds the table");
    shared.replace(table);
    assert_eq!(view_at(&shared, "staff/users").as_deref(), Some("users-v2"));

    // A route file that fails validation sends nothing; the live table stays.
    fixture.replace("routes.toml", "[[routes]]\npath = \"broken\"\n");
    assert!(settled(&mut updates, Duration::from_secs(2)).await.is_none());
    assert_eq!(view_at(&shared, "staff/users").as_deref(), Some("users-v2"));
}
