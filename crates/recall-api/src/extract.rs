//! Extractors whose rejections render as [`ApiError`] envelopes instead of
//! axum's plain-text bodies.

use axum::extract::{FromRequest, FromRequestParts};

use crate::error::ApiError;

/// [`axum::Json`] with an enveloped `400` on a missing content type,
/// malformed JSON or a body that does not match `T`.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// [`axum::extract::Path`] with an enveloped `400` on unparseable segments.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct ApiPath<T>(pub T);
