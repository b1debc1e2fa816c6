//! JSON mirror of the list pages.

use axum::{
    Extension, Json, Router,
    extract::{Path, State},
    routing::{get, put},
};
use services::services::{
    data_service::Record,
    entity_form::EntityForm,
    entity_list::EntityListPage,
    entity_schema::{ALL, EntitySchema},
};

use super::lookup_schema;
use crate::{AppState, error::ApiError, middleware::CurrentSession, response::ApiResponse};

type RowsResponse = Json<ApiResponse<Vec<Record>>>;

fn rows_response(page: EntityListPage) -> RowsResponse {
    let message = page.last_error().map(str::to_string);
    Json(ApiResponse::partial(page.into_rows(), message))
}

/// Submit `form` through `page`, or report its field errors.
async fn submit(page: &mut EntityListPage, mut form: EntityForm) -> Result<(), ApiError> {
    if !page.submit_form(&mut form).await {
        return Err(ApiError::Validation(form.errors().clone()));
    }
    Ok(())
}

/// GET /api/entities
pub async fn list_entities() -> Json<ApiResponse<Vec<&'static EntitySchema>>> {
    Json(ApiResponse::success(ALL.to_vec()))
}

/// GET /api/{entity}
pub async fn list_rows(
    State(state): State<AppState>,
    Extension(session): Extension<CurrentSession>,
    Path(entity): Path<String>,
) -> Result<RowsResponse, ApiError> {
    let schema = lookup_schema(&entity)?;
    let page = EntityListPage::mount(schema, session.data_service(&state).await).await;
    Ok(rows_response(page))
}

/// POST /api/{entity}
pub async fn create_row(
    State(state): State<AppState>,
    Extension(session): Extension<CurrentSession>,
    Path(entity): Path<String>,
    Json(mut body): Json<Record>,
) -> Result<RowsResponse, ApiError> {
    let schema = lookup_schema(&entity)?;
    body.remove("id");
    let mut page = EntityListPage::new(schema, session.data_service(&state).await);
    submit(&mut page, EntityForm::opened(schema, Some(&body))).await?;
    Ok(rows_response(page))
}

/// PUT /api/{entity}/{id}
pub async fn update_row(
    State(state): State<AppState>,
    Extension(session): Extension<CurrentSession>,
    Path((entity, id)): Path<(String, String)>,
    Json(mut body): Json<Record>,
) -> Result<RowsResponse, ApiError> {
    let schema = lookup_schema(&entity)?;
    body.insert("id".to_string(), id.into());
    let mut page = EntityListPage::new(schema, session.data_service(&state).await);
    submit(&mut page, EntityForm::opened(schema, Some(&body))).await?;
    Ok(rows_response(page))
}

/// DELETE /api/{entity}/{id}
pub async fn delete_row(
    State(state): State<AppState>,
    Extension(session): Extension<CurrentSession>,
    Path((entity, id)): Path<(String, String)>,
) -> Result<RowsResponse, ApiError> {
    let schema = lookup_schema(&entity)?;
    let mut page = EntityListPage::new(schema, session.data_service(&state).await);
    page.delete(&id).await;
    Ok(rows_response(page))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/entities", get(list_entities))
        .route("/{entity}", get(list_rows).post(create_row))
        .route("/{entity}/{id}", put(update_row).delete(delete_row))
}
