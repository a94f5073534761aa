//! `/api` 反向代理
//!
//! 把同源的 `/api/*` 请求原样转发给配置的后端，再把上游响应转交回浏览器。

use axum::body::Body;
use axum::extract::{Request, State};
use axum::http::HeaderMap;
use axum::response::Response;
use http_body_util::{BodyExt, LengthLimitError, Limited};
use multi_inventory_shared::env::api_url;

use crate::error::{PreviewError, Result};
use crate::server::SharedState;

/// 单个请求体的上限，超出时返回 413
pub const MAX_BODY_BYTES: usize = 8 * 1024 * 1024;

/// 逐跳头部，以及由客户端库重新计算的头部
const HOP_BY_HOP: &[&str] = &[
    "connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
    "host",
    "content-length",
];

fn strip_hop_by_hop(headers: &mut HeaderMap) {
    for name in HOP_BY_HOP {
        headers.remove(*name);
    }
}

pub async fn forward(State(state): State<SharedState>, req: Request) -> Result<Response> {
    let target = state
        .config
        .proxy_target
        .as_deref()
        .ok_or(PreviewError::NoProxyTarget)?;

    let (parts, body) = req.into_parts();
    let path = parts
        .uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or_else(|| parts.uri.path());
    let url = api_url(target, path);

    let body = match Limited::new(body, MAX_BODY_BYTES).collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(e) if e.is::<LengthLimitError>() => {
            return Err(PreviewError::PayloadTooLarge(MAX_BODY_BYTES));
        }
        Err(e) => return Err(PreviewError::Body(e)),
    };
    let mut headers = parts.headers;
    strip_hop_by_hop(&mut headers);

    tracing::debug!(method = %parts.method, %url, "proxying");
    let upstream = state
        .client
        .request(parts.method, &url)
        .headers(headers)
        .body(body)
        .send()
        .await
        .inspect_err(|e| tracing::warn!(%url, error = %e, "upstream unreachable"))?;

    let status = upstream.status();
    let mut response_headers = upstream.headers().clone();
    strip_hop_by_hop(&mut response_headers);
    let bytes = upstream.bytes().await?;

    let mut response = Response::new(Body::from(bytes));
    *response.status_mut() = status;
    *response.headers_mut() = response_headers;
    Ok(response)
}
