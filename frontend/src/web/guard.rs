//! 导航守卫
//!
//! 每次路由切换提交之前执行。会话状态通过 [`SessionSource`] 显式传入，
//! 守卫本身不访问浏览器存储，因此可以脱离 DOM 测试。

use super::route::{RouteMatch, resolve};

/// 认证失败时的重定向目标
pub const LOGIN_PATH: &str = "/login";

/// 静态重定向与守卫重定向的最大跳转次数
const MAX_REDIRECTS: usize = 8;

/// 会话标记来源
///
/// 只关心标记是否存在，不校验其内容、有效期或签名。
pub trait SessionSource {
    fn session_marker(&self) -> Option<String>;
}

/// 某一时刻的会话快照
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionSnapshot(pub Option<String>);

impl SessionSource for SessionSnapshot {
    fn session_marker(&self) -> Option<String> {
        self.0.clone()
    }
}

/// 守卫的裁决
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Next {
    /// 放行
    Proceed,
    /// 丢弃原目标，改为跳转到给定路径
    Redirect(&'static str),
}

/// **核心守卫逻辑**
///
/// 目标路由不需要认证时无条件放行；否则仅凭会话标记是否存在决定。
/// 空字符串与存储不可用都视为未登录。
pub fn before_each(to: &RouteMatch, from: Option<&RouteMatch>, session: &dyn SessionSource) -> Next {
    if !to.requires_auth() {
        return Next::Proceed;
    }

    let authenticated = session
        .session_marker()
        .is_some_and(|marker| !marker.is_empty());
    if authenticated {
        return Next::Proceed;
    }

    tracing::info!(
        to = %to,
        from = from.map(|f| f.path.as_str()).unwrap_or("-"),
        "access denied, redirecting to login"
    );
    Next::Redirect(LOGIN_PATH)
}

/// 导航管线的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    /// 最终提交的路由
    pub route: RouteMatch,
    /// 是否经历过重定向（静态或守卫）
    pub redirected: bool,
}

/// 请求 -> 解析 -> 静态重定向 -> 守卫 -> 最终路由
///
/// 原目标在重定向时被丢弃，不保留登录后的回跳地址。
pub fn resolve_navigation(url: &str, from: Option<&RouteMatch>, session: &dyn SessionSource) -> Resolved {
    let mut target = resolve(url);
    let mut redirected = false;

    for _ in 0..MAX_REDIRECTS {
        if let Some(redirect) = target.entry.redirect {
            target = resolve(redirect);
            redirected = true;
            continue;
        }
        match before_each(&target, from, session) {
            Next::Proceed => break,
            Next::Redirect(path) => {
                target = resolve(path);
                redirected = true;
            }
        }
    }

    Resolved {
        route: target,
        redirected,
    }
}

#[cfg(test)]
mod tests {
    use super::super::route::{ROUTES, names};
    use super::*;
    use std::cell::Cell;

    fn signed_in() -> SessionSnapshot {
        SessionSnapshot(Some(r#"{"id":"1","username":"ana"}"#.to_string()))
    }

    fn signed_out() -> SessionSnapshot {
        SessionSnapshot(None)
    }

    /// 计数读取次数的会话源，用于确认公开页面不读取会话
    struct CountingSession {
        marker: Option<String>,
        reads: Cell<usize>,
    }

    impl SessionSource for CountingSession {
        fn session_marker(&self) -> Option<String> {
            self.reads.set(self.reads.get() + 1);
            self.marker.clone()
        }
    }

    fn concrete(pattern: &str) -> String {
        pattern.replace(":id", "7")
    }

    #[test]
    fn protected_routes_redirect_without_marker() {
        for entry in ROUTES.iter().filter(|e| e.requires_auth) {
            let to = resolve(&concrete(entry.path));
            assert_eq!(
                before_each(&to, None, &signed_out()),
                Next::Redirect(LOGIN_PATH),
                "{} should be guarded",
                entry.path
            );
        }
    }

    #[test]
    fn protected_routes_proceed_with_marker() {
        for entry in ROUTES.iter().filter(|e| e.requires_auth) {
            let to = resolve(&concrete(entry.path));
            assert_eq!(before_each(&to, None, &signed_in()), Next::Proceed);
        }
    }

    #[test]
    fn public_routes_proceed_regardless_of_session() {
        for entry in ROUTES.iter().filter(|e| !e.requires_auth) {
            let to = resolve(entry.path);
            let session = CountingSession {
                marker: None,
                reads: Cell::new(0),
            };
            assert_eq!(before_each(&to, None, &session), Next::Proceed);
            assert_eq!(before_each(&to, None, &signed_in()), Next::Proceed);
            assert_eq!(session.reads.get(), 0);
        }
        assert_eq!(before_each(&resolve("/missing"), None, &signed_out()), Next::Proceed);
    }

    #[test]
    fn empty_marker_counts_as_absent() {
        let to = resolve("/dashboard");
        let session = SessionSnapshot(Some(String::new()));
        assert_eq!(before_each(&to, None, &session), Next::Redirect(LOGIN_PATH));
    }

    #[test]
    fn root_redirects_to_dashboard_then_guards() {
        let resolved = resolve_navigation("/", None, &signed_in());
        assert_eq!(resolved.route.name(), names::DASHBOARD);
        assert_eq!(resolved.route.href(), "/dashboard");
        assert!(resolved.redirected);

        let resolved = resolve_navigation("/", None, &signed_out());
        assert_eq!(resolved.route.name(), names::LOGIN);
        assert!(resolved.redirected);
    }

    #[test]
    fn sales_create_scenario() {
        let resolved = resolve_navigation("/sales/create", None, &signed_out());
        assert_eq!(resolved.route.href(), LOGIN_PATH);
        assert!(resolved.redirected);

        let from = resolved.route;
        let resolved = resolve_navigation("/sales/create", Some(&from), &signed_in());
        assert_eq!(resolved.route.href(), "/sales/create");
        assert_eq!(resolved.route.name(), names::SALES_CREATE);
        assert!(!resolved.redirected);
    }

    #[test]
    fn redirect_discards_original_target() {
        let resolved = resolve_navigation("/inventory/edit/9?tab=stock", None, &signed_out());
        assert_eq!(resolved.route.href(), "/login");
        assert!(resolved.route.params.query("tab").is_none());
    }

    #[test]
    fn public_pages_keep_params() {
        let resolved = resolve_navigation("/login?registered=1", None, &signed_out());
        assert_eq!(resolved.route.params.query("registered"), Some("1"));
        assert!(!resolved.redirected);
    }
}
