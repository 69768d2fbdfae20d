use crate::{error::ShortenError, AppState};
use axum::{
    extract::{Path, State},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use serde_json::json;
use std::{borrow::Cow, sync::Arc};

/// GET /:code
///
/// 1. Resolve the code (cache first, store on a miss).
/// 2. Apply the scheme rule to the stored original.
/// 3. Percent-encode it and return a 302 redirect to it.
pub async fn redirect(State(state): State<Arc<AppState>>, Path(code): Path<String>) -> Response {
    let original = match state.shortener.resolve(&code).await {
        Ok(original) => original,
        Err(ShortenError::NotFound(_)) => {
            return (StatusCode::NOT_FOUND, Json("Not Found!")).into_response();
        }
        Err(e) => {
            tracing::error!("Failed to resolve short code '{}': {:?}", code, e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Server error" })),
            )
                .into_response();
        }
    };

    let location = encode_location(&redirect_target(&original));
    match HeaderValue::from_str(&location) {
        Ok(value) => (StatusCode::FOUND, [(header::LOCATION, value)]).into_response(),
        Err(e) => {
            tracing::error!("Unusable redirect target for '{}': {:?}", code, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Server error" })),
            )
                .into_response()
        }
    }
}

/// Bytes escaped in a `Location` value: controls, space, and the ASCII
/// characters that are never valid in a URL. Reserved characters pass through.
const LOCATION: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'<')
    .add(b'>')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Percent-encode a redirect target so it is always a valid header value.
///
/// Non-ASCII is encoded as UTF-8. Existing `%XX` escapes are kept; a `%` not
/// followed by two hex digits becomes `%25`.
pub fn encode_location(target: &str) -> String {
    let mut out = String::with_capacity(target.len());
    let mut rest = target;

    while let Some(idx) = rest.find('%') {
        out.extend(utf8_percent_encode(&rest[..idx], LOCATION));
        let after = &rest[idx + 1..];
        let escaped =
            after.len() >= 2 && after.as_bytes()[..2].iter().all(u8::is_ascii_hexdigit);
        out.push_str(if escaped { "%" } else { "%25" });
        rest = after;
    }
    out.extend(utf8_percent_encode(rest, LOCATION));

    out
}

/// Prefix `https://` to originals stored without an `http://` or `https://`
/// scheme (ASCII case-insensitive). The stored value itself is not touched.
pub fn redirect_target(original: &str) -> Cow<'_, str> {
    if has_http_scheme(original) {
        Cow::Borrowed(original)
    } else {
        Cow::Owned(format!("https://{original}"))
    }
}

fn has_http_scheme(url: &str) -> bool {
    ["http://", "https://"].iter().any(|scheme| {
        url.get(..scheme.len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(scheme))
    })
}
