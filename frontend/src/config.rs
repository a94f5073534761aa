//! 前端配置
//!
//! `VITE_API_BASE_URL` 在构建时读取并内联进 WASM 包，未设置时使用同源相对路径。

use std::sync::LazyLock;

use multi_inventory_shared::env::resolve_api_base;

static API_BASE: LazyLock<String> =
    LazyLock::new(|| resolve_api_base(option_env!("VITE_API_BASE_URL")));

/// 所有 API 请求的前缀
pub fn api_base() -> &'static str {
    API_BASE.as_str()
}

/// 核单页面的自动刷新间隔
pub const ORDER_REFRESH_INTERVAL_MS: u64 = 10_000;
