//! Client and server exercised together over a real TCP socket.
//!
//! Both sides are built from the same codecs; these tests pin the combined
//! behavior, with a [`ListDataLoader`] over the same items as the oracle for
//! what filtered, sorted, paged fetches must return.

use crudkit::prelude::*;

impl_crud_entity!(Person, "people", id: i64, {
    name: String,
    age: i64,
});

fn person(name: &str, age: i64) -> Person {
    Person {
        id: None,
        name: name.to_string(),
        age,
    }
}

fn sample() -> Vec<Person> {
    vec![
        person("Duke Leto Atreides", 45),
        person("Paul Atreides", 15),
        person("Lady Jessica", 38),
        person("Gurney Halleck", 50),
        person("Duncan Idaho", 35),
    ]
}

/// Serve the sample collection on an ephemeral port and return a client
/// pointed at it. The server task lives as long as the test process.
async fn start() -> CrudClient<Person> {
    let store = Arc::new(InMemoryCrudStore::<Person>::with_sequential_ids());
    for p in sample() {
        store.create(p).await.expect("seeding failed");
    }
    let app = CrudRouterBuilder::new("/rest")
        .register::<Person>(store)
        .build();
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind failed");
    let addr = listener.local_addr().expect("no local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("server failed");
    });
    CrudClient::new(format!("http://{addr}/rest/people"))
}

/// What the server must answer, computed client-side over the same items
async fn oracle(
    filter: Option<&Filter>,
    sort_by: &[SortClause],
    range: FetchRange,
) -> Vec<String> {
    let mut items = sample();
    for (i, item) in items.iter_mut().enumerate() {
        item.id = Some(i as i64 + 1);
    }
    let loader = ListDataLoader::new(items);
    loader
        .fetch(filter, sort_by, range)
        .await
        .unwrap()
        .into_iter()
        .map(|p| p.name)
        .collect()
}

#[tokio::test]
async fn test_get_all_unconstrained() {
    let client = start().await;
    let all = client.get_all(None, &[], FetchRange::ALL).await.unwrap();
    assert_eq!(all.len(), 5);
    assert_eq!(all[0].id, Some(1));
}

#[tokio::test]
async fn test_filtered_sorted_paged_fetch_matches_the_oracle() {
    let client = start().await;
    let filter = Filter::ge("age", 30);
    let sort = [SortClause::desc("age"), SortClause::asc("name")];
    let range = FetchRange::new(1, 2);

    let fetched = client
        .get_all(Some(&filter), &sort, range)
        .await
        .unwrap();
    let names: Vec<String> = fetched.into_iter().map(|p| p.name).collect();
    assert_eq!(names, oracle(Some(&filter), &sort, range).await);
}

#[tokio::test]
async fn test_compound_filter_round_trips() {
    let client = start().await;
    let filter = Filter::gt("age", 20).and(Filter::istarts_with("name", "d"));
    let sort = [SortClause::asc("age")];

    let fetched = client
        .get_all(Some(&filter), &sort, FetchRange::ALL)
        .await
        .unwrap();
    let names: Vec<String> = fetched.into_iter().map(|p| p.name).collect();
    assert_eq!(names, vec!["Duncan Idaho", "Duke Leto Atreides"]);
}

#[tokio::test]
async fn test_full_text_filter_round_trips() {
    let client = start().await;
    let filter = Filter::full_text("name", "atr");
    let count = client.get_count(Some(&filter)).await.unwrap();
    assert_eq!(count, 2);
}

#[tokio::test]
async fn test_count() {
    let client = start().await;
    assert_eq!(client.get_count(None).await.unwrap(), 5);
    let filter = Filter::lt("age", 40);
    assert_eq!(client.get_count(Some(&filter)).await.unwrap(), 3);
}

#[tokio::test]
async fn test_get_one_and_error_messages() {
    let client = start().await;
    let p = client.get_one("1").await.unwrap();
    assert_eq!(p.name, "Duke Leto Atreides");

    let err = client.get_one("555").await.unwrap_err();
    assert_eq!(err.to_string(), "404: No such entity with ID 555");

    let err = client.get_one("foobar").await.unwrap_err();
    assert_eq!(err.to_string(), "404: Malformed ID: foobar");
}

#[tokio::test]
async fn test_create_update_delete_cycle() {
    let client = start().await;

    let created = client.create(&person("Chani", 16)).await.unwrap();
    let id = created.id.expect("no id assigned").to_string();
    assert_eq!(created.name, "Chani");

    let mut changed = created.clone();
    changed.age = 17;
    let updated = client.update(&id, &changed).await.unwrap();
    assert_eq!(updated.age, 17);

    client.delete(&id).await.unwrap();
    let err = client.get_one(&id).await.unwrap_err();
    assert_eq!(err.to_string(), format!("404: No such entity with ID {id}"));

    // idempotent: a second delete still succeeds
    client.delete(&id).await.unwrap();
}

#[tokio::test]
async fn test_update_of_absent_id_fails() {
    let client = start().await;
    let err = client.update("555", &person("Nobody", 1)).await.unwrap_err();
    assert!(matches!(err, CrudClientError::Http { status: 404, .. }));
}
