//! 认证模块
//!
//! 管理会话上下文，与路由系统解耦：
//! 路由服务只订阅会话信号，登录、注销、刷新都在这里完成。
//! 流程函数对传输层泛型，便于在原生测试中驱动。

use leptos::prelude::*;
use sqlab_shared::{Credentials, RegisterRequest, UserInfo};

use crate::api::SqlabApi;
use crate::config::AppConfig;
use crate::error::{ClientError, ClientResult};
use crate::session::{Session, SessionKey, SessionStore};
use crate::web::http::{FetchTransport, HttpTransport};

pub const LOGIN_FAILED: &str = "Échec de la connexion. Vérifie tes identifiants.";

/// 会话上下文
///
/// 会话信号是存储的快照，每次写入存储后调用 `reload` 刷新。
#[derive(Clone, Copy)]
pub struct SessionContext {
    session: RwSignal<Session>,
    store: StoredValue<SessionStore>,
    config: StoredValue<AppConfig>,
}

impl SessionContext {
    pub fn new(store: SessionStore, config: AppConfig) -> Self {
        Self {
            session: RwSignal::new(store.snapshot()),
            store: StoredValue::new(store),
            config: StoredValue::new(config),
        }
    }

    /// 会话信号（用于路由服务注入）
    pub fn session(&self) -> Signal<Session> {
        self.session.into()
    }

    pub fn store(&self) -> SessionStore {
        self.store.get_value()
    }

    pub fn config(&self) -> AppConfig {
        self.config.get_value()
    }

    /// 使用存储中当前令牌的 API 客户端
    pub fn api(&self) -> SqlabApi<FetchTransport> {
        SqlabApi::browser(self.config(), self.store().get(SessionKey::AccessToken))
    }

    /// 从存储重新读取会话并通知订阅者
    pub fn reload(&self) {
        let snapshot = self.store().snapshot();
        log::debug!(
            "[Session] authenticated={} role={:?}",
            snapshot.is_authenticated(),
            snapshot.role
        );
        self.session.set(snapshot);
    }
}

/// 从 Context 获取会话上下文
pub fn use_session() -> SessionContext {
    use_context::<SessionContext>().expect("SessionContext should be provided")
}

// =========================================================
// 流程（与浏览器无关）
// =========================================================

/// 登录流程
///
/// 获取令牌 -> 用新令牌获取用户信息 -> 一次性保存令牌与角色。
/// 写入前没有 await，流程在任意一步被中止都不会留下半个会话；
/// 用户信息获取失败时清除旧会话。
pub async fn authenticate<T: HttpTransport>(
    transport: &T,
    config: &AppConfig,
    store: &SessionStore,
    credentials: &Credentials,
) -> ClientResult<Session> {
    let anonymous = SqlabApi::new(transport, config.clone(), None);
    let tokens = anonymous
        .obtain_token(credentials)
        .await
        .map_err(|e| e.in_op("auth.authenticate"))?;
    let api = anonymous.with_token(tokens.access.clone());
    match api.user_info().await {
        Ok(user) => {
            store.save_tokens(&tokens);
            store.save_role(user.role());
            log::info!("[Session] signed in as {} ({})", user.username, user.role());
            Ok(store.snapshot())
        }
        Err(e) => {
            store.clear_all();
            Err(e.in_op("auth.authenticate"))
        }
    }
}

/// 使用 refreshToken 换取新的 accessToken
pub async fn refresh_access<T: HttpTransport>(
    transport: &T,
    config: &AppConfig,
    store: &SessionStore,
) -> ClientResult<Session> {
    let refresh = store
        .get(SessionKey::RefreshToken)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ClientError::missing_session().in_op("auth.refresh"))?;
    let api = SqlabApi::new(transport, config.clone(), None);
    let access = api
        .refresh_token(&refresh)
        .await
        .map_err(|e| e.in_op("auth.refresh"))?;
    store.set(SessionKey::AccessToken, &access);
    log::info!("[Session] access token refreshed");
    Ok(store.snapshot())
}

/// 用服务端返回的角色覆盖缓存角色；返回是否发生变化
pub fn sync_role(store: &SessionStore, user: &UserInfo) -> bool {
    let role = user.role();
    if store.snapshot().role == Some(role) {
        return false;
    }
    store.save_role(role);
    log::info!("[Session] role synchronised to {}", role);
    true
}

pub async fn register_account<T: HttpTransport>(
    transport: &T,
    config: &AppConfig,
    request: &RegisterRequest,
) -> ClientResult<()> {
    let api = SqlabApi::new(transport, config.clone(), None);
    api.register(request)
        .await
        .map(|created| log::info!("[Session] account {} created", created.id))
        .map_err(|e| e.in_op("auth.register"))
}

// =========================================================
// 浏览器入口
// =========================================================

/// 登录并更新会话信号
///
/// 失败时返回展示给用户的消息。
pub async fn login(ctx: SessionContext, credentials: Credentials) -> Result<(), String> {
    let result = authenticate(&FetchTransport, &ctx.config(), &ctx.store(), &credentials).await;
    ctx.reload();
    result.map(|_| ()).map_err(|e| {
        log::warn!("[Session] login failed: {}", e);
        LOGIN_FAILED.to_string()
    })
}

pub async fn register(ctx: SessionContext, request: RegisterRequest) -> Result<(), String> {
    register_account(&FetchTransport, &ctx.config(), &request)
        .await
        .map_err(|e| e.message().to_string())
}

pub async fn refresh(ctx: SessionContext) -> ClientResult<()> {
    let result = refresh_access(&FetchTransport, &ctx.config(), &ctx.store()).await;
    ctx.reload();
    result.map(|_| ())
}

/// 注销并清除会话
///
/// 重定向由路由服务的会话监听自动处理。
pub fn logout(ctx: SessionContext) {
    ctx.store().clear_all();
    ctx.reload();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClientErrorKind;
    use crate::web::http::MockTransport;
    use crate::web::task::bind;
    use serde_json::json;
    use sqlab_shared::Role;
    use sqlab_shared::protocol::HttpMethod;

    const BASE: &str = "https://api.test";

    fn setup() -> (MockTransport, AppConfig, SessionStore) {
        (
            MockTransport::new(),
            AppConfig::new(BASE),
            SessionStore::in_memory(),
        )
    }

    fn credentials() -> Credentials {
        Credentials {
            username: "prof".to_string(),
            password: "motdepasse".to_string(),
        }
    }

    #[tokio::test]
    async fn login_stores_tokens_and_role() {
        let (transport, config, store) = setup();
        transport.mock_response(
            HttpMethod::Post,
            "https://api.test/api/token/",
            200,
            json!({"access": "acc", "refresh": "ref"}),
        );
        transport.mock_response(
            HttpMethod::Get,
            "https://api.test/api/user/",
            200,
            json!({"username": "prof", "email": "p@ecole.fr", "is_teacher": true}),
        );

        let session = authenticate(&transport, &config, &store, &credentials())
            .await
            .unwrap();

        assert_eq!(session.access_token.as_deref(), Some("acc"));
        assert_eq!(session.refresh_token.as_deref(), Some("ref"));
        assert_eq!(session.role, Some(Role::Teacher));

        // 用户信息请求必须使用新令牌
        let req = transport.last_request().unwrap();
        assert_eq!(req.header("Authorization"), Some("Bearer acc"));
    }

    #[tokio::test]
    async fn rejected_credentials_leave_no_session() {
        let (transport, config, store) = setup();
        transport.mock_response(
            HttpMethod::Post,
            "https://api.test/api/token/",
            401,
            json!({"detail": "No active account found with the given credentials"}),
        );

        let err = authenticate(&transport, &config, &store, &credentials())
            .await
            .unwrap_err();
        assert_eq!(err.kind, ClientErrorKind::Unauthorized);
        assert_eq!(store.snapshot(), Session::default());
        assert_eq!(transport.request_count(), 1);
    }

    #[tokio::test]
    async fn user_info_failure_rolls_back_tokens() {
        let (transport, config, store) = setup();
        transport.mock_response(
            HttpMethod::Post,
            "https://api.test/api/token/",
            200,
            json!({"access": "acc", "refresh": "ref"}),
        );
        transport.mock_response(
            HttpMethod::Get,
            "https://api.test/api/user/",
            500,
            json!({"error": "boom"}),
        );

        assert!(
            authenticate(&transport, &config, &store, &credentials())
                .await
                .is_err()
        );
        assert!(!store.snapshot().is_authenticated());
    }

    #[tokio::test]
    async fn login_aborted_with_its_view_writes_nothing() {
        let (transport, config, store) = setup();
        transport.mock_response(
            HttpMethod::Post,
            "https://api.test/api/token/",
            200,
            json!({"access": "acc", "refresh": "ref"}),
        );
        transport.mock_pending("https://api.test/api/user/");

        let creds = credentials();
        let (handle, task) = bind(authenticate(&transport, &config, &store, &creds));
        let mut task = Box::pin(task);
        assert!(futures::poll!(task.as_mut()).is_pending());
        assert_eq!(transport.request_count(), 2);

        // 令牌已拿到但用户信息未返回时离开页面
        handle.abort();
        assert!(task.await.is_err());
        assert_eq!(store.snapshot(), Session::default());
    }

    #[tokio::test]
    async fn refresh_replaces_only_the_access_token() {
        let (transport, config, store) = setup();
        store.set(SessionKey::AccessToken, "old");
        store.set(SessionKey::RefreshToken, "ref");
        store.save_role(Role::Student);
        transport.mock_response(
            HttpMethod::Post,
            "https://api.test/api/token/refresh/",
            200,
            json!({"access": "new"}),
        );

        let session = refresh_access(&transport, &config, &store).await.unwrap();
        assert_eq!(session.access_token.as_deref(), Some("new"));
        assert_eq!(session.refresh_token.as_deref(), Some("ref"));
        assert_eq!(session.role, Some(Role::Student));
    }

    #[tokio::test]
    async fn refresh_without_refresh_token_sends_nothing() {
        let (transport, config, store) = setup();
        let err = refresh_access(&transport, &config, &store).await.unwrap_err();
        assert_eq!(err.kind, ClientErrorKind::MissingSession);
        assert_eq!(transport.request_count(), 0);
    }

    #[tokio::test]
    async fn register_surfaces_server_error() {
        let (transport, config, _) = setup();
        transport.mock_response(
            HttpMethod::Post,
            "https://api.test/api/register/",
            400,
            json!({"error": "Nom d'utilisateur déjà pris."}),
        );
        let request = RegisterRequest {
            username: "lea".to_string(),
            password: "motdepasse".to_string(),
            email: "lea@ecole.fr".to_string(),
            is_teacher: false,
        };
        let err = register_account(&transport, &config, &request)
            .await
            .unwrap_err();
        assert_eq!(err.message(), "Nom d'utilisateur déjà pris.");
    }

    #[test]
    fn sync_role_overwrites_stale_role() {
        let store = SessionStore::in_memory();
        store.save_role(Role::Student);
        let user = UserInfo {
            username: "prof".to_string(),
            email: String::new(),
            is_teacher: true,
        };
        assert!(sync_role(&store, &user));
        assert_eq!(store.snapshot().role, Some(Role::Teacher));
        assert!(!sync_role(&store, &user));
    }
}
