//! Multi Inventory 预览服务器
//!
//! 托管 `trunk build` 产出的静态包：
//! - `host`: 预览主机白名单
//! - `proxy`: `/api` 反向代理
//! - `server`: 路由组装与启动

pub mod config;
pub mod error;
pub mod host;
pub mod proxy;
pub mod server;

pub use config::{Args, PreviewConfig};
pub use error::PreviewError;
pub use server::{AppState, SharedState, build_router, serve};
