//! Book endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::{
        book::{BookFilter, BookPayload, BookQuery},
        envelope::{BookData, BookIdData, BookListData, Envelope, NoData},
    },
    services::books::{MSG_CREATED, MSG_DELETED, MSG_FOUND, MSG_LISTED, MSG_UPDATED},
};

use super::{ApiJson, ApiQuery};

/// Add a book
#[utoipa::path(
    post,
    path = "/books",
    tag = "books",
    request_body = BookPayload,
    responses(
        (status = 201, description = "Book added", body = crate::models::envelope::BookIdEnvelope),
        (status = 400, description = "Missing name or readPage greater than pageCount", body = crate::models::envelope::MessageEnvelope)
    )
)]
pub async fn create_book(
    State(state): State<crate::AppState>,
    ApiJson(payload): ApiJson<BookPayload>,
) -> AppResult<(StatusCode, Json<Envelope<BookIdData>>)> {
    let book_id = state.services.books.create(&payload)?;
    Ok((
        StatusCode::CREATED,
        Json(Envelope::success(MSG_CREATED, BookIdData { book_id })),
    ))
}

/// List books, optionally filtered
#[utoipa::path(
    get,
    path = "/books",
    tag = "books",
    params(BookQuery),
    responses(
        (status = 200, description = "Matching books", body = crate::models::envelope::BookListEnvelope)
    )
)]
pub async fn list_books(
    State(state): State<crate::AppState>,
    ApiQuery(query): ApiQuery<BookQuery>,
) -> AppResult<Json<Envelope<BookListData>>> {
    let books = state.services.books.list(&BookFilter::from(&query))?;
    Ok(Json(Envelope::success(MSG_LISTED, BookListData { books })))
}

/// Get book details by ID
#[utoipa::path(
    get,
    path = "/books/{id}",
    tag = "books",
    params(("id" = String, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Book details", body = crate::models::envelope::BookEnvelope),
        (status = 404, description = "Book not found", body = crate::models::envelope::MessageEnvelope)
    )
)]
pub async fn get_book(
    State(state): State<crate::AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Envelope<BookData>>> {
    let book = state.services.books.get_by_id(&id)?;
    Ok(Json(Envelope::success(MSG_FOUND, BookData { book })))
}

/// Replace a book's fields
#[utoipa::path(
    put,
    path = "/books/{id}",
    tag = "books",
    params(("id" = String, Path, description = "Book ID")),
    request_body = BookPayload,
    responses(
        (status = 200, description = "Book updated", body = crate::models::envelope::MessageEnvelope),
        (status = 400, description = "Missing name or readPage greater than pageCount", body = crate::models::envelope::MessageEnvelope),
        (status = 404, description = "Book not found", body = crate::models::envelope::MessageEnvelope)
    )
)]
pub async fn update_book(
    State(state): State<crate::AppState>,
    Path(id): Path<String>,
    ApiJson(payload): ApiJson<BookPayload>,
) -> AppResult<Json<Envelope<NoData>>> {
    state.services.books.update(&id, &payload)?;
    Ok(Json(Envelope::message(MSG_UPDATED)))
}

/// Delete a book
#[utoipa::path(
    delete,
    path = "/books/{id}",
    tag = "books",
    params(("id" = String, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Book deleted", body = crate::models::envelope::MessageEnvelope),
        (status = 404, description = "Book not found", body = crate::models::envelope::MessageEnvelope)
    )
)]
pub async fn delete_book(
    State(state): State<crate::AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Envelope<NoData>>> {
    state.services.books.delete(&id)?;
    Ok(Json(Envelope::message(MSG_DELETED)))
}
