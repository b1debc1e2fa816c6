//! HTML list pages and form dialogs for every entity.

use axum::{
    Extension, Form, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
};
use services::services::{
    entity_form::{EntityForm, FormValues},
    entity_list::EntityListPage,
    entity_schema::EntitySchema,
};

use super::lookup_schema;
use crate::{AppState, error::ApiError, middleware::CurrentSession};

async fn mount(
    state: &AppState,
    session: &CurrentSession,
    schema: &'static EntitySchema,
) -> EntityListPage {
    EntityListPage::mount(schema, session.data_service(state).await).await
}

fn render(
    state: &AppState,
    session: &CurrentSession,
    page: &EntityListPage,
    form: Option<&EntityForm>,
) -> Result<Html<String>, ApiError> {
    Ok(Html(state.templates.entity_list(&session.identity, page, form)?))
}

/// Back to the list after a mutation, or show it in place with the error banner.
fn after_mutation(
    state: &AppState,
    session: &CurrentSession,
    page: &EntityListPage,
) -> Result<Response, ApiError> {
    if page.last_error().is_some() {
        return Ok(render(state, session, page, None)?.into_response());
    }
    Ok(Redirect::to(&page.schema().path()).into_response())
}

/// Validate a posted form; on success create or update, otherwise re-render
/// the dialog with its errors.
async fn submit(
    state: &AppState,
    session: &CurrentSession,
    mut form: EntityForm,
) -> Result<Response, ApiError> {
    let mut page = EntityListPage::new(form.schema(), session.data_service(state).await);
    if page.submit_form(&mut form).await {
        return after_mutation(state, session, &page);
    }
    page.load().await;
    let html = render(state, session, &page, Some(&form))?;
    Ok((StatusCode::UNPROCESSABLE_ENTITY, html).into_response())
}

/// GET /{entity}
pub async fn list(
    State(state): State<AppState>,
    Extension(session): Extension<CurrentSession>,
    Path(entity): Path<String>,
) -> Result<Html<String>, ApiError> {
    let page = mount(&state, &session, lookup_schema(&entity)?).await;
    render(&state, &session, &page, None)
}

/// GET /{entity}/new
pub async fn new_form(
    State(state): State<AppState>,
    Extension(session): Extension<CurrentSession>,
    Path(entity): Path<String>,
) -> Result<Html<String>, ApiError> {
    let schema = lookup_schema(&entity)?;
    let page = mount(&state, &session, schema).await;
    let form = EntityForm::opened(schema, None);
    render(&state, &session, &page, Some(&form))
}

/// GET /{entity}/{id}/edit
pub async fn edit_form(
    State(state): State<AppState>,
    Extension(session): Extension<CurrentSession>,
    Path((entity, id)): Path<(String, String)>,
) -> Result<Html<String>, ApiError> {
    let schema = lookup_schema(&entity)?;
    let page = mount(&state, &session, schema).await;
    let row = page
        .find_row(&id)
        .ok_or_else(|| ApiError::RowNotFound(id.clone()))?;
    let form = EntityForm::opened(schema, Some(row));
    render(&state, &session, &page, Some(&form))
}

/// POST /{entity}
pub async fn create(
    State(state): State<AppState>,
    Extension(session): Extension<CurrentSession>,
    Path(entity): Path<String>,
    Form(values): Form<FormValues>,
) -> Result<Response, ApiError> {
    let schema = lookup_schema(&entity)?;
    submit(&state, &session, EntityForm::from_submission(schema, None, values)).await
}

/// POST /{entity}/{id}
pub async fn update(
    State(state): State<AppState>,
    Extension(session): Extension<CurrentSession>,
    Path((entity, id)): Path<(String, String)>,
    Form(values): Form<FormValues>,
) -> Result<Response, ApiError> {
    let schema = lookup_schema(&entity)?;
    submit(&state, &session, EntityForm::from_submission(schema, Some(id), values)).await
}

/// POST /{entity}/{id}/delete
pub async fn delete(
    State(state): State<AppState>,
    Extension(session): Extension<CurrentSession>,
    Path((entity, id)): Path<(String, String)>,
) -> Result<Response, ApiError> {
    let schema = lookup_schema(&entity)?;
    let mut page = EntityListPage::new(schema, session.data_service(&state).await);
    page.delete(&id).await;
    after_mutation(&state, &session, &page)
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{entity}", get(list).post(create))
        .route("/{entity}/new", get(new_form))
        .route("/{entity}/{id}", post(update))
        .route("/{entity}/{id}/edit", get(edit_form))
        .route("/{entity}/{id}/delete", post(delete))
}
