//! Response envelope shared by every endpoint

use serde::Serialize;
use utoipa::ToSchema;

use super::book::{Book, BookShort};

/// Outcome marker carried in every response body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    Success,
    Fail,
}

/// `{status, message, data?}` wrapper
#[derive(Debug, Serialize, ToSchema)]
#[aliases(
    BookIdEnvelope = Envelope<BookIdData>,
    BookListEnvelope = Envelope<BookListData>,
    BookEnvelope = Envelope<BookData>,
    MessageEnvelope = Envelope<NoData>
)]
pub struct Envelope<T>
where
    T: for<'a> ToSchema<'a>,
{
    pub status: ResponseStatus,
    /// Human-readable outcome
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> Envelope<T>
where
    T: Serialize + for<'a> ToSchema<'a>,
{
    pub fn success(message: impl Into<String>, data: T) -> Self {
        Self {
            status: ResponseStatus::Success,
            message: message.into(),
            data: Some(data),
        }
    }
}

impl Envelope<NoData> {
    /// Success without a data payload
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            status: ResponseStatus::Success,
            message: message.into(),
            data: None,
        }
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            status: ResponseStatus::Fail,
            message: message.into(),
            data: None,
        }
    }
}

/// Placeholder for envelopes that never carry data
#[derive(Debug, Serialize, ToSchema)]
pub struct NoData {}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookIdData {
    pub book_id: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BookListData {
    pub books: Vec<BookShort>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BookData {
    pub book: Book,
}
