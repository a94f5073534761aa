//! 环境配置解析
//!
//! 启动时解析一次，之后不可变。缺失或为空的变量一律回退到默认值，不视为错误。

/// API 源地址，为空时请求走同源相对路径
pub const ENV_API_BASE_URL: &str = "VITE_API_BASE_URL";
/// 额外允许访问预览包的主机名，逗号分隔
pub const ENV_ALLOWED_HOSTS: &str = "VITE_ALLOWED_HOSTS";
/// 开发/预览时 `/api` 反向代理的后端源地址
pub const ENV_PROXY_TARGET: &str = "VITE_PROXY_TARGET";

/// 无论环境如何配置都允许的预览主机
pub const DEFAULT_PREVIEW_HOST: &str = "inventory.justnansuri.com";

/// 所有 API 请求共享的路径前缀
pub const API_PREFIX: &str = "/api";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvironmentConfig {
    pub api_base: String,
    pub allowed_hosts: Vec<String>,
    pub proxy_target: Option<String>,
}

impl EnvironmentConfig {
    /// 通过任意查找函数解析配置，便于在测试中替换进程环境
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_base = resolve_api_base(lookup(ENV_API_BASE_URL).as_deref());
        let extra = parse_allowed_hosts(lookup(ENV_ALLOWED_HOSTS).as_deref());
        let proxy_target = lookup(ENV_PROXY_TARGET)
            .map(|v| v.trim().trim_end_matches('/').to_string())
            .filter(|v| !v.is_empty());

        Self {
            api_base,
            allowed_hosts: allowed_hosts(extra),
            proxy_target,
        }
    }

    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn is_host_allowed(&self, host: &str) -> bool {
        self.allowed_hosts
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(host))
    }
}

/// 变量存在时原样使用，否则为空字符串
pub fn resolve_api_base(value: Option<&str>) -> String {
    value.unwrap_or_default().to_string()
}

/// 拼接 API 地址，保证 base 与 path 之间恰好一个 `/`
pub fn api_url(base: &str, path: &str) -> String {
    let base = base.trim_end_matches('/');
    if path.starts_with('/') {
        format!("{}{}", base, path)
    } else {
        format!("{}/{}", base, path)
    }
}

/// 逗号分隔，去掉两端空白，丢弃空项
pub fn parse_allowed_hosts(value: Option<&str>) -> Vec<String> {
    value
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|h| !h.is_empty())
        .map(str::to_string)
        .collect()
}

/// 默认主机在前，随后是额外主机；重复项只保留第一次出现
pub fn allowed_hosts(extra: Vec<String>) -> Vec<String> {
    let mut hosts = vec![DEFAULT_PREVIEW_HOST.to_string()];
    for host in extra {
        if !hosts.iter().any(|h| h.eq_ignore_ascii_case(&host)) {
            hosts.push(host);
        }
    }
    hosts
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn api_base_defaults_to_empty() {
        assert_eq!(resolve_api_base(None), "");
        let config = EnvironmentConfig::from_lookup(lookup(&[]));
        assert_eq!(config.api_base, "");
    }

    #[test]
    fn api_base_is_taken_verbatim() {
        assert_eq!(resolve_api_base(Some("https://x")), "https://x");
        let config = EnvironmentConfig::from_lookup(lookup(&[(ENV_API_BASE_URL, "https://x")]));
        assert_eq!(config.api_base, "https://x");
    }

    #[test]
    fn extra_hosts_are_trimmed_and_empty_entries_dropped() {
        assert_eq!(
            parse_allowed_hosts(Some("a.com, ,b.com")),
            vec!["a.com".to_string(), "b.com".to_string()]
        );
        assert!(parse_allowed_hosts(None).is_empty());
        assert!(parse_allowed_hosts(Some(" , ,")).is_empty());
    }

    #[test]
    fn default_host_is_always_present() {
        let config = EnvironmentConfig::from_lookup(lookup(&[(ENV_ALLOWED_HOSTS, "a.com, ,b.com")]));
        assert_eq!(
            config.allowed_hosts,
            vec![DEFAULT_PREVIEW_HOST, "a.com", "b.com"]
        );

        let bare = EnvironmentConfig::from_lookup(lookup(&[]));
        assert_eq!(bare.allowed_hosts, vec![DEFAULT_PREVIEW_HOST]);
    }

    #[test]
    fn duplicate_hosts_keep_first_occurrence() {
        let hosts = allowed_hosts(parse_allowed_hosts(Some(
            "a.com,INVENTORY.justnansuri.com,a.com",
        )));
        assert_eq!(hosts, vec![DEFAULT_PREVIEW_HOST, "a.com"]);
    }

    #[test]
    fn host_check_ignores_case() {
        let config = EnvironmentConfig::from_lookup(lookup(&[(ENV_ALLOWED_HOSTS, "Shop.Example")]));
        assert!(config.is_host_allowed("shop.example"));
        assert!(config.is_host_allowed(DEFAULT_PREVIEW_HOST));
        assert!(!config.is_host_allowed("evil.example"));
    }

    #[test]
    fn proxy_target_blank_means_none() {
        let config = EnvironmentConfig::from_lookup(lookup(&[(ENV_PROXY_TARGET, "  ")]));
        assert_eq!(config.proxy_target, None);

        let config = EnvironmentConfig::from_lookup(lookup(&[(
            ENV_PROXY_TARGET,
            "http://localhost:8080/",
        )]));
        assert_eq!(config.proxy_target.as_deref(), Some("http://localhost:8080"));
    }

    #[test]
    fn api_url_joins_with_single_slash() {
        assert_eq!(api_url("", "/api/sales"), "/api/sales");
        assert_eq!(api_url("https://x/", "/api/sales"), "https://x/api/sales");
        assert_eq!(api_url("https://x", "api/sales"), "https://x/api/sales");
    }
}
