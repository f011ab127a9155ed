use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use axum::response::Response;
use entrybook::db::pool::DbPool;
use entrybook::models::entry::EntryData;
use entrybook::models::reference::ReferenceKind;
use entrybook::web::{AppState, router};
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

const HOME: &str = "/list?page=0&sortBy=name&order=asc&filter=";

async fn app() -> (TempDir, Arc<AppState>) {
    let (dir, state, _) = app_with_pool().await;
    (dir, state)
}

/// Same as [`app`], keeping a handle on the pool to break the schema with.
async fn app_with_pool() -> (TempDir, Arc<AppState>, Arc<DbPool>) {
    let dir = tempfile::tempdir().unwrap();
    let pool = Arc::new(DbPool::open(dir.path().join("web.sqlite"), 2, 16).unwrap());
    let state = AppState::new(Arc::clone(&pool), 10).await.unwrap();
    (dir, Arc::new(state), pool)
}

async fn send(app: Router, req: Request<Body>) -> Response {
    app.oneshot(req).await.unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_form(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_text(res: Response) -> String {
    let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn location(res: &Response) -> &str {
    res.headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
}

/// The `name=value` part of the flash cookie set by a redirect.
fn flash_cookie(res: &Response) -> String {
    let raw = res
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .expect("flash cookie");
    raw.split(';').next().unwrap_or("").to_string()
}

#[tokio::test]
async fn test_root_redirects_to_first_page() {
    let (_dir, state) = app().await;
    let res = send(router(state), get("/")).await;

    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&res), HOME);
}

#[tokio::test]
async fn test_health() {
    let (_dir, state) = app().await;
    let res = send(router(state), get("/health")).await;

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(body_text(res).await, "OK");
}

#[tokio::test]
async fn test_empty_list_shows_nothing_to_display() {
    let (_dir, state) = app().await;
    let res = send(router(state), get(HOME)).await;

    assert_eq!(res.status(), StatusCode::OK);
    let body = body_text(res).await;
    assert!(body.contains("No entries"));
    assert!(body.contains("Nothing to display"));
}

#[tokio::test]
async fn test_list_pages_sorts_and_filters() {
    let (_dir, state) = app().await;
    for i in 0..25 {
        state
            .entries
            .insert(EntryData::named(format!("Machine {i:02}")))
            .await
            .unwrap();
    }
    state.entries.insert(EntryData::named("Zuse Z3")).await.unwrap();

    let body = body_text(send(router(state.clone()), get("/list?page=1")).await).await;
    assert!(body.contains("26 entries found"));
    assert!(body.contains("Displaying 11 to 20 of 26"));
    assert!(body.contains("Machine 10"));
    assert!(!body.contains("Machine 09"));

    let body = body_text(
        send(router(state.clone()), get("/list?sortBy=name&order=desc")).await,
    )
    .await;
    assert!(body.contains("Zuse Z3"));
    assert!(!body.contains("Machine 00"));

    let body = body_text(send(router(state), get("/list?filter=zuse")).await).await;
    assert!(body.contains("One entry found"));
    assert!(body.contains("Zuse Z3"));
}

#[tokio::test]
async fn test_unknown_sort_falls_back_to_name() {
    let (_dir, state) = app().await;
    let res = send(router(state), get("/list?sortBy=bogus&order=sideways")).await;
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_create_form_lists_options() {
    let (_dir, state) = app().await;
    state
        .references
        .add(ReferenceKind::Vendor, "Apple Inc.")
        .await
        .unwrap();
    state
        .references
        .add(ReferenceKind::Department, "Research")
        .await
        .unwrap();

    let res = send(router(state), get("/create")).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = body_text(res).await;
    assert!(body.contains("action=\"/save\""));
    assert!(body.contains("Apple Inc."));
    assert!(body.contains("Research"));
}

#[tokio::test]
async fn test_save_invalid_form_rerenders_with_errors() {
    let (_dir, state) = app().await;
    let res = send(
        router(state.clone()),
        post_form("/save", "name=&start_date=24%2F01%2F1984"),
    )
    .await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = body_text(res).await;
    assert!(body.contains("24/01/1984"));
    assert!(body.contains("help-inline"));

    let page = state
        .entries
        .page(entrybook::models::page::PageQuery::new(0, 10))
        .await
        .unwrap();
    assert_eq!(page.total_count, 0);
}

#[tokio::test]
async fn test_save_valid_form_redirects_with_notice() {
    let (_dir, state) = app().await;
    let apple = state
        .references
        .add(ReferenceKind::Vendor, "Apple Inc.")
        .await
        .unwrap();

    let form = format!("name=Macintosh&start_date=1984-01-24&end_date=&vendor={apple}&department=");
    let res = send(router(state.clone()), post_form("/save", &form)).await;

    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&res), HOME);
    let cookie = flash_cookie(&res);
    assert!(cookie.starts_with("flash="));

    let list = Request::builder()
        .uri(HOME)
        .header(header::COOKIE, &cookie)
        .body(Body::empty())
        .unwrap();
    let res = send(router(state), list).await;
    assert_eq!(res.status(), StatusCode::OK);
    // The notice is consumed by the list page.
    assert!(
        res.headers()
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.contains("Max-Age=0"))
    );
    let body = body_text(res).await;
    assert!(body.contains("Entry Macintosh has been created"));
    assert!(body.contains("Apple Inc."));
    assert!(body.contains("1984-01-24"));
}

#[tokio::test]
async fn test_edit_missing_entry_is_not_found() {
    let (_dir, state) = app().await;
    let res = send(router(state), get("/edit/12345")).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_edit_and_update_existing_entry() {
    let (_dir, state) = app().await;
    let id = state.entries.insert(EntryData::named("ACE")).await.unwrap();

    let res = send(router(state.clone()), get(&format!("/edit/{id}"))).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = body_text(res).await;
    assert!(body.contains(&format!("action=\"/update/{id}\"")));
    assert!(body.contains("value=\"ACE\""));

    let res = send(
        router(state.clone()),
        post_form(&format!("/update/{id}"), "name=Pilot+ACE&start_date=1950-05-10"),
    )
    .await;
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&res), HOME);

    let found = state.entries.lookup(id).await.unwrap().unwrap();
    assert_eq!(found.name, "Pilot ACE");
    assert_eq!(found.start_date_str(), "1950-05-10");
}

#[tokio::test]
async fn test_update_rejects_end_before_start() {
    let (_dir, state) = app().await;
    let id = state.entries.insert(EntryData::named("ACE")).await.unwrap();

    let res = send(
        router(state.clone()),
        post_form(
            &format!("/update/{id}"),
            "name=ACE&start_date=1955-01-01&end_date=1950-01-01",
        ),
    )
    .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let found = state.entries.lookup(id).await.unwrap().unwrap();
    assert_eq!(found.start_date_str(), "");
}

#[tokio::test]
async fn test_update_missing_entry_redirects() {
    let (_dir, state) = app().await;
    let res = send(router(state), post_form("/update/777", "name=Ghost")).await;

    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert!(flash_cookie(&res).starts_with("flash="));
}

#[tokio::test]
async fn test_delete_redirects_and_removes() {
    let (_dir, state) = app().await;
    let id = state.entries.insert(EntryData::named("Amiga")).await.unwrap();

    let res = send(router(state.clone()), post_form(&format!("/delete/{id}"), "")).await;
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&res), HOME);
    assert!(state.entries.lookup(id).await.unwrap().is_none());

    // Deleting again still redirects home.
    let res = send(router(state), post_form(&format!("/delete/{id}"), "")).await;
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&res), HOME);
}

#[tokio::test]
async fn test_save_with_unknown_vendor_is_a_server_error() {
    let (_dir, state) = app().await;
    let res = send(router(state.clone()), post_form("/save", "name=Orphan&vendor=999")).await;

    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(res.headers().get(header::SET_COOKIE).is_none());
    assert!(body_text(res).await.contains("Something went wrong"));

    let page = state
        .entries
        .page(entrybook::models::page::PageQuery::new(0, 10))
        .await
        .unwrap();
    assert_eq!(page.total_count, 0);
}

#[tokio::test]
async fn test_update_with_unknown_vendor_is_a_server_error() {
    let (_dir, state) = app().await;
    let id = state.entries.insert(EntryData::named("ACE")).await.unwrap();

    let res = send(
        router(state.clone()),
        post_form(&format!("/update/{id}"), "name=Pilot+ACE&vendor=999"),
    )
    .await;
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let found = state.entries.lookup(id).await.unwrap().unwrap();
    assert_eq!(found.name, "ACE");
}

#[tokio::test]
async fn test_delete_failure_still_redirects_with_notice() {
    let (_dir, state, pool) = app_with_pool().await;
    let id = state.entries.insert(EntryData::named("Amiga")).await.unwrap();

    // Without the audit table the delete transaction cannot commit.
    pool.run(|conn| Ok(conn.execute_batch("DROP TABLE log;")?))
        .await
        .unwrap();

    let res = send(router(state.clone()), post_form(&format!("/delete/{id}"), "")).await;
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&res), HOME);
    let cookie = flash_cookie(&res);
    assert!(cookie.starts_with("flash="));

    assert!(state.entries.lookup(id).await.unwrap().is_some());

    let list = Request::builder()
        .uri(HOME)
        .header(header::COOKIE, &cookie)
        .body(Body::empty())
        .unwrap();
    let body = body_text(send(router(state), list).await).await;
    assert!(body.contains(&format!("Entry {id} could not be deleted")));
}

#[tokio::test]
async fn test_update_rerender_keeps_input_and_options() {
    let (_dir, state) = app().await;
    let apple = state
        .references
        .add(ReferenceKind::Vendor, "Apple Inc.")
        .await
        .unwrap();
    state
        .references
        .add(ReferenceKind::Department, "Research")
        .await
        .unwrap();
    let id = state.entries.insert(EntryData::named("Lisa")).await.unwrap();

    let form = format!("name=Lisa+2&start_date=1983-13-40&vendor={apple}");
    let res = send(router(state.clone()), post_form(&format!("/update/{id}"), &form)).await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = body_text(res).await;
    assert!(body.contains("value=\"Lisa 2\""));
    assert!(body.contains("value=\"1983-13-40\""));
    assert!(body.contains(&format!("<option value=\"{apple}\" selected>Apple Inc.</option>")));
    assert!(body.contains("Research"));
    assert!(body.contains(&format!("action=\"/update/{id}\"")));

    let found = state.entries.lookup(id).await.unwrap().unwrap();
    assert_eq!(found.name, "Lisa");
}
