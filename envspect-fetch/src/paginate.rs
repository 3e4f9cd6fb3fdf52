//! Cursor pagination for listing endpoints.
//!
//! CircleCI v2 listings return an `items` array and an opaque
//! `next_page_token`. [`collect_pages`] walks a listing to exhaustion and
//! concatenates the items; callers supply a fetch closure so the retrier can
//! be composed beneath each page request.

use std::future::Future;

use tracing::debug;

use crate::error::FetchError;
use crate::source::{ApiResponse, Page};

/// Walks a cursor-paginated listing to exhaustion.
///
/// `fetch` is invoked with `None` for the first page, then with each
/// server-issued token exactly once, until a page without a usable token
/// arrives. Items are concatenated in page order. Pages with empty `items`
/// but a present token keep the walk going.
///
/// # Errors
///
/// A non-success page is fatal: the walk stops with
/// [`FetchError::PaginationFailed`] carrying the status and error body.
/// Transport errors from `fetch` propagate unchanged.
pub async fn collect_pages<T, F, Fut>(mut fetch: F) -> Result<Vec<T>, FetchError>
where
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = Result<ApiResponse<Page<T>>, FetchError>>,
{
    let mut items = Vec::new();
    let mut page_token: Option<String> = None;
    let mut pages: u32 = 0;

    loop {
        let response = fetch(page_token.take()).await?;
        if !response.is_success() {
            return Err(FetchError::PaginationFailed {
                status: response.status,
                status_text: response.status_text,
                body: response.error_body.unwrap_or_default(),
            });
        }

        let page = response.body.ok_or_else(|| {
            FetchError::InvalidResponse("success response carried no page body".to_string())
        })?;
        pages += 1;

        let more = page.has_more();
        if more {
            page_token = page.next_page_token;
        }
        items.extend(page.items);

        if !more {
            debug!(pages, items = items.len(), "Listing complete");
            return Ok(items);
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::VecDeque;

    /// Walks a scripted listing, recording the token passed to each fetch.
    async fn run_scripted(
        script: Vec<Result<ApiResponse<Page<i32>>, FetchError>>,
    ) -> (Result<Vec<i32>, FetchError>, Vec<Option<String>>) {
        let queue = RefCell::new(VecDeque::from(script));
        let tokens = RefCell::new(Vec::new());

        let result = collect_pages(|token| {
            tokens.borrow_mut().push(token);
            let next = queue.borrow_mut().pop_front().expect("script exhausted");
            async move { next }
        })
        .await;

        (result, tokens.into_inner())
    }

    #[tokio::test]
    async fn test_single_page_listing() {
        let script = vec![Ok(ApiResponse::success(Page::last(vec![1, 2, 3])))];
        let (result, tokens) = run_scripted(script).await;

        assert_eq!(result.unwrap(), vec![1, 2, 3]);
        assert_eq!(tokens, vec![None]);
    }

    #[tokio::test]
    async fn test_items_concatenate_in_page_order() {
        let script = vec![
            Ok(ApiResponse::success(Page::with_token(vec![1, 2], "t1"))),
            Ok(ApiResponse::success(Page::with_token(vec![3], "t2"))),
            Ok(ApiResponse::success(Page::last(vec![4, 5]))),
        ];
        let (result, tokens) = run_scripted(script).await;

        assert_eq!(result.unwrap(), vec![1, 2, 3, 4, 5]);
        // each token handed to exactly one fetch, in order
        assert_eq!(
            tokens,
            vec![None, Some("t1".to_string()), Some("t2".to_string())]
        );
    }

    #[tokio::test]
    async fn test_empty_page_with_token_continues() {
        let script = vec![
            Ok(ApiResponse::success(Page::with_token(vec![], "t1"))),
            Ok(ApiResponse::success(Page::last(vec![9]))),
        ];
        let (result, tokens) = run_scripted(script).await;

        assert_eq!(result.unwrap(), vec![9]);
        assert_eq!(tokens.len(), 2);
    }

    #[tokio::test]
    async fn test_empty_listing_is_valid() {
        let script = vec![Ok(ApiResponse::success(Page::last(vec![])))];
        let (result, _) = run_scripted(script).await;

        assert_eq!(result.unwrap(), Vec::<i32>::new());
    }

    #[tokio::test]
    async fn test_empty_string_token_ends_listing() {
        let script = vec![Ok(ApiResponse::success(Page::with_token(vec![7], "")))];
        let (result, tokens) = run_scripted(script).await;

        assert_eq!(result.unwrap(), vec![7]);
        assert_eq!(tokens.len(), 1);
    }

    #[tokio::test]
    async fn test_non_success_page_is_fatal() {
        let script = vec![
            Ok(ApiResponse::success(Page::with_token(vec![1], "t1"))),
            Ok(ApiResponse::failure(500, "Internal Server Error")
                .with_error_body(r#"{"message": "oops"}"#)),
        ];
        let (result, tokens) = run_scripted(script).await;

        match result {
            Err(FetchError::PaginationFailed {
                status,
                status_text,
                body,
            }) => {
                assert_eq!(status, 500);
                assert_eq!(status_text, "Internal Server Error");
                assert_eq!(body, r#"{"message": "oops"}"#);
            }
            other => panic!("expected PaginationFailed, got {other:?}"),
        }
        assert_eq!(tokens.len(), 2);
    }

    #[tokio::test]
    async fn test_missing_success_body_is_invalid() {
        // status 200 but no parsed body
        let response = ApiResponse::<Page<i32>>::failure(200, "OK");
        let (result, _) = run_scripted(vec![Ok(response)]).await;

        assert!(matches!(result, Err(FetchError::InvalidResponse(_))));
    }
}
