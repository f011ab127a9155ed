//! Entry request handlers.
//!
//! Database work always goes through the repositories (and so through the
//! worker pool); rendering happens here, on the runtime, once the awaited
//! results are back.

use super::flash::Flash;
use super::forms::{EntryForm, FormErrors};
use super::server::AppState;
use super::views;
use crate::db::queries::Mutation;
use crate::errors::AppError;
use crate::models::page::PageQuery;
use crate::models::sort::{SortColumn, SortOrder};
use crate::options::FormOptions;
use axum::Form;
use axum::extract::{Path, Query, State};
use axum::http::header::SET_COOKIE;
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::{AppendHeaders, Html, IntoResponse, Redirect, Response};
use serde::Deserialize;
use std::sync::Arc;

/// Store failures surfaced to the browser as a 500 page.
#[derive(Debug)]
pub struct WebError(pub AppError);

impl From<AppError> for WebError {
    fn from(e: AppError) -> Self {
        Self(e)
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self.0, "Request failed");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Html(views::error_page(&self.0.to_string())),
        )
            .into_response()
    }
}

type WebResult = Result<Response, WebError>;

#[derive(Debug, Deserialize)]
pub struct ListParams {
    #[serde(default)]
    pub page: u32,
    #[serde(default, rename = "sortBy")]
    pub sort_by: String,
    #[serde(default)]
    pub order: String,
    #[serde(default)]
    pub filter: String,
}

fn go_home(flash: Flash) -> Response {
    (
        AppendHeaders([(SET_COOKIE, flash.to_cookie())]),
        Redirect::to(&views::home_url()),
    )
        .into_response()
}

/// Handle default path requests, redirect to entries list
pub async fn index() -> Redirect {
    Redirect::to(&views::home_url())
}

/// Display the paginated list of entries.
pub async fn list(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListParams>,
    headers: HeaderMap,
) -> WebResult {
    let query = PageQuery::new(params.page, state.page_size)
        .sorted(
            SortColumn::from_param(&params.sort_by),
            SortOrder::from_param(&params.order),
        )
        .filtered(params.filter);

    let flash = Flash::from_headers(&headers);
    let page = state.entries.page(query.clone()).await?;

    let mut response = Html(views::list_page(&page, &query, flash.as_ref())).into_response();
    if flash.is_some() {
        response
            .headers_mut()
            .append(SET_COOKIE, HeaderValue::from_static(Flash::clear_cookie()));
    }
    Ok(response)
}

/// Display the edit form of an existing entry.
pub async fn edit(State(state): State<Arc<AppState>>, Path(id): Path<i64>) -> WebResult {
    // Option fetches are already running while the entry is looked up.
    let options = FormOptions::start(&state.references);
    let entry = state.entries.lookup(id).await?;
    let options = options.collect().await;

    let Some(entry) = entry else {
        tracing::debug!(id, "Edit requested for a missing entry");
        return Ok((StatusCode::NOT_FOUND, Html(views::not_found(id))).into_response());
    };

    let form = EntryForm::from_entry(&entry);
    Ok(Html(views::edit_form(id, &form, &FormErrors::default(), &options)).into_response())
}

/// Handle the edit form submission.
pub async fn update(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Form(form): Form<EntryForm>,
) -> WebResult {
    let data = match form.validate() {
        Ok(data) => data,
        Err(errors) => {
            let options = FormOptions::start(&state.references).collect().await;
            return Ok((
                StatusCode::BAD_REQUEST,
                Html(views::edit_form(id, &form, &errors, &options)),
            )
                .into_response());
        }
    };

    let name = data.name.clone();
    match state.entries.update(id, data).await? {
        Mutation::Applied(_) => {
            tracing::info!(id, name = %name, "Entry updated");
            Ok(go_home(Flash::success(format!("Entry {name} has been updated"))))
        }
        Mutation::NotFound => {
            tracing::warn!(id, "Update of a missing entry");
            Ok(go_home(Flash::warning(format!("Entry {id} does not exist"))))
        }
    }
}

/// Display the new entry form.
pub async fn create(State(state): State<Arc<AppState>>) -> Response {
    let options = FormOptions::start(&state.references).collect().await;
    Html(views::create_form(
        &EntryForm::default(),
        &FormErrors::default(),
        &options,
    ))
    .into_response()
}

/// Handle the new entry form submission.
pub async fn save(State(state): State<Arc<AppState>>, Form(form): Form<EntryForm>) -> WebResult {
    let data = match form.validate() {
        Ok(data) => data,
        Err(errors) => {
            let options = FormOptions::start(&state.references).collect().await;
            return Ok((
                StatusCode::BAD_REQUEST,
                Html(views::create_form(&form, &errors, &options)),
            )
                .into_response());
        }
    };

    let name = data.name.clone();
    let id = state.entries.insert(data).await?;
    tracing::info!(id, name = %name, "Entry created");
    Ok(go_home(Flash::success(format!("Entry {name} has been created"))))
}

/// Handle entry deletion. Always redirects; the notice tells what happened.
pub async fn delete(State(state): State<Arc<AppState>>, Path(id): Path<i64>) -> Response {
    let flash = match state.entries.delete(id).await {
        Ok(Mutation::Applied(_)) => {
            tracing::info!(id, "Entry deleted");
            Flash::success("Entry has been deleted")
        }
        Ok(Mutation::NotFound) => {
            tracing::warn!(id, "Delete of a missing entry");
            Flash::warning(format!("Entry {id} does not exist"))
        }
        Err(e) => {
            tracing::error!(id, error = %e, "Delete failed");
            Flash::error(format!("Entry {id} could not be deleted"))
        }
    };
    go_home(flash)
}

pub async fn health() -> &'static str {
    "OK"
}
