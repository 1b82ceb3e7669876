use std::fmt;

use sqlab_shared::ErrorBody;

// =========================================================
// 错误类别枚举
// =========================================================

/// 客户端错误类别
///
/// 每个类别对应一种降级方式：重定向或内联提示，没有任何类别是致命的。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientErrorKind {
    /// 本地没有 accessToken，请求不会发出
    MissingSession,
    /// 表单校验失败，请求不会发出
    Validation,
    /// 400: 服务端拒绝了输入
    BadRequest,
    /// 401: 令牌无效或过期
    Unauthorized,
    /// 403: 角色不允许或资源被锁定
    Forbidden,
    /// 404: 资源未找到
    NotFound,
    /// 5xx 及其它非成功状态
    Server,
    /// 网络层失败（无响应）
    Network,
    /// 响应体无法解析
    Decode,
}

impl ClientErrorKind {
    pub fn from_status(status: u16) -> Self {
        match status {
            400 => ClientErrorKind::BadRequest,
            401 => ClientErrorKind::Unauthorized,
            403 => ClientErrorKind::Forbidden,
            404 => ClientErrorKind::NotFound,
            _ => ClientErrorKind::Server,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            ClientErrorKind::MissingSession => "MISSING_SESSION",
            ClientErrorKind::Validation => "VALIDATION",
            ClientErrorKind::BadRequest => "BAD_REQUEST",
            ClientErrorKind::Unauthorized => "UNAUTHORIZED",
            ClientErrorKind::Forbidden => "FORBIDDEN",
            ClientErrorKind::NotFound => "NOT_FOUND",
            ClientErrorKind::Server => "SERVER_ERROR",
            ClientErrorKind::Network => "NETWORK_ERROR",
            ClientErrorKind::Decode => "DECODE_ERROR",
        }
    }
}

// =========================================================
// 核心错误类型
// =========================================================

/// 客户端错误
///
/// - kind: 错误类别
/// - status: HTTP 状态码（如果有响应）
/// - message: 面向用户的消息（服务端 `error` 字段优先）
/// - ops: 操作追踪，如 `api.call(/api/submit/)`
#[derive(Debug, Clone, PartialEq)]
pub struct ClientError {
    pub kind: ClientErrorKind,
    pub status: Option<u16>,
    message: String,
    ops: Vec<String>,
}

impl ClientError {
    pub fn new(kind: ClientErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            status: None,
            message: message.into(),
            ops: Vec::new(),
        }
    }

    // --- Convenience constructors ---

    pub fn missing_session() -> Self {
        Self::new(
            ClientErrorKind::MissingSession,
            "Aucun token d'accès trouvé. Veuillez vous connecter.",
        )
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ClientErrorKind::Validation, message)
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(ClientErrorKind::Network, message)
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::new(ClientErrorKind::Decode, message)
    }

    /// 由非成功响应构造；优先使用响应体中的 `error`/`detail`
    pub fn from_response(status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|b| b.message().map(str::to_string))
            .unwrap_or_else(|| format!("Requête refusée ({})", status));
        Self {
            kind: ClientErrorKind::from_status(status),
            status: Some(status),
            message,
            ops: Vec::new(),
        }
    }

    /// 添加操作追踪
    pub fn in_op(mut self, operation: impl Into<String>) -> Self {
        self.ops.push(operation.into());
        self
    }

    // --- Accessors ---

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn ops(&self) -> &[String] {
        &self.ops
    }

    pub fn is_auth_failure(&self) -> bool {
        matches!(
            self.kind,
            ClientErrorKind::MissingSession | ClientErrorKind::Unauthorized
        )
    }
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.kind.error_code(), self.message)?;
        if !self.ops.is_empty() {
            write!(f, " | trace: {}", self.ops.join(" -> "))?;
        }
        Ok(())
    }
}

impl std::error::Error for ClientError {}

impl From<gloo_net::Error> for ClientError {
    fn from(e: gloo_net::Error) -> Self {
        match e {
            gloo_net::Error::SerdeError(e) => ClientError::decode(e.to_string()),
            other => ClientError::network(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(e: serde_json::Error) -> Self {
        ClientError::decode(e.to_string())
    }
}

pub type ClientResult<T> = std::result::Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_error_uses_server_message() {
        let err = ClientError::from_response(400, r#"{"error":"Le fichier doit être un PDF."}"#);
        assert_eq!(err.kind, ClientErrorKind::BadRequest);
        assert_eq!(err.status, Some(400));
        assert_eq!(err.message(), "Le fichier doit être un PDF.");
    }

    #[test]
    fn response_error_falls_back_to_status() {
        let err = ClientError::from_response(502, "<html>Bad gateway</html>");
        assert_eq!(err.kind, ClientErrorKind::Server);
        assert_eq!(err.message(), "Requête refusée (502)");
    }

    #[test]
    fn display_includes_trace() {
        let err = ClientError::from_response(404, r#"{"error":"Soumission non trouvée."}"#)
            .in_op("api.call(/api/submissions/9/edit/)")
            .in_op("submissions.replace");
        assert_eq!(
            err.to_string(),
            "[NOT_FOUND] Soumission non trouvée. | trace: api.call(/api/submissions/9/edit/) -> submissions.replace"
        );
    }

    #[test]
    fn auth_failures_are_flagged() {
        assert!(ClientError::missing_session().is_auth_failure());
        assert!(ClientError::from_response(401, "{}").is_auth_failure());
        assert!(!ClientError::from_response(403, "{}").is_auth_failure());
    }
}
