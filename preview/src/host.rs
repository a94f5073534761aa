//! 预览主机白名单
//!
//! 只放行白名单中的主机名和回环地址，其余请求直接返回 403。

use std::net::IpAddr;

use axum::extract::{Request, State};
use axum::http::header::HOST;
use axum::middleware::Next;
use axum::response::Response;

use crate::error::PreviewError;
use crate::server::SharedState;

/// 从 `Host` 头取出主机名（去掉端口和 IPv6 方括号）
pub fn host_name(raw: &str) -> &str {
    let raw = raw.trim();
    if let Some(rest) = raw.strip_prefix('[') {
        return rest.split(']').next().unwrap_or_default();
    }
    match raw.rsplit_once(':') {
        // 不带方括号的 IPv6 字面量含有多个冒号，没有端口可剥离
        Some((name, port)) if !name.contains(':') && port.bytes().all(|b| b.is_ascii_digit()) => {
            name
        }
        _ => raw,
    }
}

pub fn is_loopback(name: &str) -> bool {
    name.eq_ignore_ascii_case("localhost")
        || name.parse::<IpAddr>().is_ok_and(|ip| ip.is_loopback())
}

pub fn is_allowed(allowed: &[String], name: &str) -> bool {
    !name.is_empty()
        && (is_loopback(name) || allowed.iter().any(|h| h.eq_ignore_ascii_case(name)))
}

pub async fn require_allowed_host(
    State(state): State<SharedState>,
    req: Request,
    next: Next,
) -> Result<Response, PreviewError> {
    let raw = req
        .headers()
        .get(HOST)
        .and_then(|v| v.to_str().ok())
        .or_else(|| req.uri().authority().map(|a| a.as_str()))
        .unwrap_or_default()
        .to_string();
    let name = host_name(&raw);

    if !is_allowed(&state.config.allowed_hosts, name) {
        tracing::warn!(host = %raw, path = %req.uri().path(), "blocked request for host outside allow-list");
        return Err(PreviewError::HostNotAllowed(name.to_string()));
    }

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ports_and_brackets_are_stripped() {
        assert_eq!(host_name("inventory.justnansuri.com"), "inventory.justnansuri.com");
        assert_eq!(host_name("a.com:4173"), "a.com");
        assert_eq!(host_name("[::1]:4173"), "::1");
        assert_eq!(host_name("::1"), "::1");
        assert_eq!(host_name(" b.com "), "b.com");
    }

    #[test]
    fn loopback_names_and_literals() {
        assert!(is_loopback("localhost"));
        assert!(is_loopback("LOCALHOST"));
        assert!(is_loopback("127.0.0.1"));
        assert!(is_loopback("::1"));
        assert!(!is_loopback("10.0.0.1"));
        assert!(!is_loopback("example.com"));
    }

    #[test]
    fn allow_list_is_case_insensitive() {
        let allowed = vec!["inventory.justnansuri.com".to_string(), "a.com".to_string()];
        assert!(is_allowed(&allowed, "A.COM"));
        assert!(is_allowed(&allowed, "inventory.justnansuri.com"));
        assert!(is_allowed(&allowed, "127.0.0.1"));
        assert!(!is_allowed(&allowed, "evil.com"));
        assert!(!is_allowed(&allowed, ""));
    }
}
