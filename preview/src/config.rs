//! 预览服务器配置
//!
//! 命令行参数优先，其次是进程环境（含 `.env`），最后是内置默认值。

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use multi_inventory_shared::env::EnvironmentConfig;

#[derive(Debug, Clone, Parser)]
#[command(name = "multi-inventory-preview")]
#[command(about = "Serve the built inventory frontend with host checks and an /api proxy")]
#[command(version)]
pub struct Args {
    /// Directory containing the built bundle (index.html + wasm)
    #[arg(long, env = "PREVIEW_DIST", default_value = "frontend/dist")]
    pub dist: PathBuf,

    /// Address to listen on
    #[arg(long, env = "PREVIEW_BIND", default_value = "127.0.0.1:4173")]
    pub bind: SocketAddr,

    /// Backend origin for /api requests, overrides VITE_PROXY_TARGET
    #[arg(long)]
    pub proxy_target: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewConfig {
    pub dist: PathBuf,
    pub bind: SocketAddr,
    /// 默认预览主机在前；回环地址不在列表中但始终放行
    pub allowed_hosts: Vec<String>,
    pub proxy_target: Option<String>,
}

impl PreviewConfig {
    pub fn from_parts(args: Args, env: EnvironmentConfig) -> Self {
        let proxy_target = args
            .proxy_target
            .map(|t| t.trim().trim_end_matches('/').to_string())
            .filter(|t| !t.is_empty())
            .or(env.proxy_target);

        Self {
            dist: args.dist,
            bind: args.bind,
            allowed_hosts: env.allowed_hosts,
            proxy_target,
        }
    }

    pub fn load() -> Self {
        Self::from_parts(Args::parse(), EnvironmentConfig::from_env())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use multi_inventory_shared::env::{DEFAULT_PREVIEW_HOST, ENV_PROXY_TARGET};

    fn env(proxy: Option<&str>) -> EnvironmentConfig {
        EnvironmentConfig::from_lookup(|key| match key {
            ENV_PROXY_TARGET => proxy.map(str::to_string),
            _ => None,
        })
    }

    #[test]
    fn defaults_apply_without_flags() {
        let args = Args::try_parse_from(["preview"]).unwrap();
        let config = PreviewConfig::from_parts(args, env(None));
        assert_eq!(config.dist, PathBuf::from("frontend/dist"));
        assert_eq!(config.bind, "127.0.0.1:4173".parse().unwrap());
        assert_eq!(config.allowed_hosts, vec![DEFAULT_PREVIEW_HOST]);
        assert_eq!(config.proxy_target, None);
    }

    #[test]
    fn flag_overrides_environment_proxy() {
        let args =
            Args::try_parse_from(["preview", "--proxy-target", "http://10.0.0.2:8080/"]).unwrap();
        let config = PreviewConfig::from_parts(args, env(Some("http://localhost:8080")));
        assert_eq!(config.proxy_target.as_deref(), Some("http://10.0.0.2:8080"));
    }

    #[test]
    fn environment_proxy_is_used_when_flag_is_blank() {
        let args = Args::try_parse_from(["preview", "--proxy-target", " "]).unwrap();
        let config = PreviewConfig::from_parts(args, env(Some("http://localhost:8080/")));
        assert_eq!(config.proxy_target.as_deref(), Some("http://localhost:8080"));
    }
}
