//! 路由定义模块 - 领域模型
//!
//! 这是纯粹的业务逻辑层，不依赖于 DOM 或 web_sys。
//! 路由表在编译期固定，启动后不可变。

use std::fmt::Display;

/// 路由表中的一项
#[derive(Debug, PartialEq, Eq)]
pub struct RouteEntry {
    /// 路径模式，`:name` 段匹配任意非空段
    pub path: &'static str,
    /// 路由名，同时作为视图注册表的键
    pub name: &'static str,
    /// **核心守卫属性：该路由是否需要认证**
    pub requires_auth: bool,
    /// 静态重定向目标（如 `/` -> `/dashboard`）
    pub redirect: Option<&'static str>,
}

/// 路由名常量
pub mod names {
    pub const LOGIN: &str = "login";
    pub const REGISTER: &str = "register";
    pub const ROOT: &str = "root";
    pub const DASHBOARD: &str = "dashboard";
    pub const INVENTORY_LIST: &str = "inventory-list";
    pub const INVENTORY_ADD: &str = "inventory-add";
    pub const INVENTORY_EDIT: &str = "inventory-edit";
    pub const INVENTORY_SCAN: &str = "inventory-scan";
    pub const SALES_LIST: &str = "sales-list";
    pub const SALES_CREATE: &str = "sales-create";
    pub const ORDER_CHECKER: &str = "order-checker";
    pub const NOT_FOUND: &str = "not-found";
}

const fn public(path: &'static str, name: &'static str) -> RouteEntry {
    RouteEntry {
        path,
        name,
        requires_auth: false,
        redirect: None,
    }
}

const fn protected(path: &'static str, name: &'static str) -> RouteEntry {
    RouteEntry {
        path,
        name,
        requires_auth: true,
        redirect: None,
    }
}

/// 应用路由表
pub static ROUTES: &[RouteEntry] = &[
    public("/login", names::LOGIN),
    public("/register", names::REGISTER),
    RouteEntry {
        path: "/",
        name: names::ROOT,
        requires_auth: false,
        redirect: Some("/dashboard"),
    },
    protected("/dashboard", names::DASHBOARD),
    protected("/inventory", names::INVENTORY_LIST),
    protected("/inventory/add", names::INVENTORY_ADD),
    protected("/inventory/edit/:id", names::INVENTORY_EDIT),
    protected("/inventory/scan", names::INVENTORY_SCAN),
    protected("/sales", names::SALES_LIST),
    protected("/sales/create", names::SALES_CREATE),
    protected("/order-checker", names::ORDER_CHECKER),
];

/// 未匹配任何路由时使用（公开页面）
pub static NOT_FOUND: RouteEntry = public("/404", names::NOT_FOUND);

/// 路径参数与查询参数
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteParams {
    params: Vec<(&'static str, String)>,
    query: Vec<(String, String)>,
}

impl RouteParams {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| *k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn query(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

/// 一次解析的结果：命中的路由项 + 具体路径 + 参数
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch {
    pub entry: &'static RouteEntry,
    /// 规范化后的路径（不含查询串）
    pub path: String,
    /// 原始查询串（不含 `?`）
    pub search: String,
    pub params: RouteParams,
}

impl RouteMatch {
    pub fn name(&self) -> &'static str {
        self.entry.name
    }

    pub fn requires_auth(&self) -> bool {
        self.entry.requires_auth
    }

    /// 写入 History 的完整地址
    pub fn href(&self) -> String {
        if self.search.is_empty() {
            self.path.clone()
        } else {
            format!("{}?{}", self.path, self.search)
        }
    }
}

impl Display for RouteMatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.href())
    }
}

/// 将 URL 解析为路由
///
/// 忽略片段和末尾的 `/`，未知路径解析为 [`NOT_FOUND`]。
pub fn resolve(url: &str) -> RouteMatch {
    let url = url.split('#').next().unwrap_or_default();
    let (raw_path, search) = url.split_once('?').unwrap_or((url, ""));
    let path = normalize_path(raw_path);
    let query = parse_query(search);

    let segments: Vec<&str> = split_segments(&path);
    for entry in ROUTES {
        if let Some(params) = match_pattern(entry.path, &segments) {
            return RouteMatch {
                entry,
                path,
                search: search.to_string(),
                params: RouteParams { params, query },
            };
        }
    }

    RouteMatch {
        entry: &NOT_FOUND,
        path,
        search: search.to_string(),
        params: RouteParams {
            params: Vec::new(),
            query,
        },
    }
}

fn normalize_path(raw: &str) -> String {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{}", trimmed)
    }
}

fn split_segments(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

fn match_pattern(pattern: &'static str, segments: &[&str]) -> Option<Vec<(&'static str, String)>> {
    let pattern_segments = split_segments(pattern);
    if pattern_segments.len() != segments.len() {
        return None;
    }
    let mut params = Vec::new();
    for (expected, actual) in pattern_segments.into_iter().zip(segments) {
        match expected.strip_prefix(':') {
            Some(name) => params.push((name, decode_component(actual))),
            None if expected == *actual => {}
            None => return None,
        }
    }
    Some(params)
}

fn parse_query(search: &str) -> Vec<(String, String)> {
    search
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (k, v) = pair.split_once('=').unwrap_or((pair, ""));
            (decode_component(k), decode_component(v))
        })
        .collect()
}

/// 解码 `%XX` 与 `+`，非法序列原样保留
pub fn decode_component(raw: &str) -> String {
    let bytes = raw.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'+' => {
                out.push(b' ');
                i += 1;
            }
            b'%' if i + 2 < bytes.len() => {
                let hex = std::str::from_utf8(&bytes[i + 1..i + 3])
                    .ok()
                    .filter(|h| h.bytes().all(|c| c.is_ascii_hexdigit()))
                    .and_then(|h| u8::from_str_radix(h, 16).ok());
                match hex {
                    Some(b) => {
                        out.push(b);
                        i += 3;
                    }
                    None => {
                        out.push(b'%');
                        i += 1;
                    }
                }
            }
            b => {
                out.push(b);
                i += 1;
            }
        }
    }
    String::from_utf8_lossy(&out).into_owned()
}

/// 编码查询参数值
pub fn encode_component(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for b in raw.bytes() {
        if b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'.' | b'~') {
            out.push(b as char);
        } else {
            out.push_str(&format!("%{:02X}", b));
        }
    }
    out
}
