//! REST API 客户端
//!
//! 在可配置的 API 地址之上做一层薄封装：
//! 附加 Bearer 令牌、编码请求体、将非 2xx 响应映射为 `ClientError`。

use futures::future::join_all;
use sqlab_shared::protocol::{
    AdjustSubmission, CreateExercise, DeleteExercise, EditExercise, Endpoint, FetchExercise,
    FetchStudentPerformance, FetchTeacherStatistics, FetchUserInfo, ListExerciseSubmissions,
    ListExercises, ListSubmissions, ListTeacherExercises, ReplaceSubmissionFile, SubmitAnswer,
    Upload, resolve_file_url,
};
use sqlab_shared::{
    Created, Credentials, Exercise, ExerciseRecord, HEADER_AUTHORIZATION, Message, RefreshRequest,
    RegisterRequest, ScoreAdjustment, SubmissionReceipt, SubmissionRecord, SubmissionSummary,
    TeacherExercise, TeacherStatistics, TokenPair, UserInfo,
};

use crate::config::AppConfig;
use crate::error::{ClientError, ClientResult};
use crate::web::http::{FetchTransport, HttpRequest, HttpTransport};

#[derive(Debug, Clone)]
pub struct SqlabApi<T = FetchTransport> {
    transport: T,
    config: AppConfig,
    access_token: Option<String>,
}

impl SqlabApi<FetchTransport> {
    /// 浏览器客户端
    pub fn browser(config: AppConfig, access_token: Option<String>) -> Self {
        Self::new(FetchTransport, config, access_token)
    }
}

impl<T: HttpTransport> SqlabApi<T> {
    pub fn new(transport: T, config: AppConfig, access_token: Option<String>) -> Self {
        Self {
            transport,
            config,
            access_token: access_token.filter(|t| !t.is_empty()),
        }
    }

    /// 替换令牌（登录与刷新之后）
    pub fn with_token(mut self, access_token: String) -> Self {
        self.access_token = Some(access_token);
        self
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// 文件链接的完整下载地址
    pub fn file_url(&self, file: &str) -> String {
        resolve_file_url(&self.config.api_base_url, file)
    }

    /// **核心方法：执行一个端点调用**
    ///
    /// 需要认证的端点在没有令牌时直接返回 `MissingSession`，不发出请求。
    /// 空响应体按 JSON `null` 解析，因此 `()` 响应可以接受 204。
    pub async fn call<E: Endpoint>(&self, endpoint: &E) -> ClientResult<E::Response> {
        let path = endpoint.path();
        let op = format!("api.call({})", path);

        let mut req = HttpRequest::new(&self.config.url(&path), E::METHOD);
        if E::AUTHENTICATED {
            let token = self
                .access_token
                .as_deref()
                .ok_or_else(|| ClientError::missing_session().in_op(op.clone()))?;
            req = req.with_header(HEADER_AUTHORIZATION, &format!("Bearer {}", token));
        }
        req = req.with_payload(endpoint.payload());

        let res = self
            .transport
            .send(req)
            .await
            .map_err(|e| e.in_op(op.clone()))?;

        if !res.ok() {
            let err = ClientError::from_response(res.status, &res.body).in_op(op);
            log::warn!("[Api] {} {} -> {}", E::METHOD.as_str(), path, err);
            return Err(err);
        }

        let body = if res.body.trim().is_empty() {
            "null"
        } else {
            res.body.as_str()
        };
        serde_json::from_str(body).map_err(|e| ClientError::from(e).in_op(op))
    }

    // =========================================================
    // Auth
    // =========================================================

    pub async fn obtain_token(&self, credentials: &Credentials) -> ClientResult<TokenPair> {
        self.call(credentials).await
    }

    pub async fn refresh_token(&self, refresh: &str) -> ClientResult<String> {
        let req = RefreshRequest {
            refresh: refresh.to_string(),
        };
        Ok(self.call(&req).await?.access)
    }

    pub async fn register(&self, req: &RegisterRequest) -> ClientResult<Created> {
        self.call(req).await
    }

    pub async fn user_info(&self) -> ClientResult<UserInfo> {
        self.call(&FetchUserInfo).await
    }

    // =========================================================
    // Exercises
    // =========================================================

    pub async fn exercises(&self) -> ClientResult<Vec<Exercise>> {
        self.call(&ListExercises).await
    }

    pub async fn exercise(&self, id: u64) -> ClientResult<ExerciseRecord> {
        self.call(&FetchExercise { id }).await
    }

    pub async fn teacher_exercises(&self) -> ClientResult<Vec<TeacherExercise>> {
        self.call(&ListTeacherExercises).await
    }

    pub async fn create_exercise(
        &self,
        title: &str,
        file: Upload,
        correction: Option<Upload>,
    ) -> ClientResult<Created> {
        self.call(&CreateExercise {
            title: title.to_string(),
            file,
            correction,
        })
        .await
    }

    pub async fn edit_exercise(
        &self,
        id: u64,
        title: &str,
        file: Option<Upload>,
        correction: Option<Upload>,
    ) -> ClientResult<ExerciseRecord> {
        self.call(&EditExercise {
            id,
            title: title.to_string(),
            file,
            correction,
        })
        .await
    }

    pub async fn delete_exercise(&self, id: u64) -> ClientResult<()> {
        self.call(&DeleteExercise { id }).await
    }

    // =========================================================
    // Submissions
    // =========================================================

    pub async fn submit(&self, exercise_id: u64, file: Upload) -> ClientResult<SubmissionReceipt> {
        self.call(&SubmitAnswer { exercise_id, file }).await
    }

    pub async fn submissions(&self) -> ClientResult<Vec<SubmissionSummary>> {
        self.call(&ListSubmissions).await
    }

    pub async fn replace_submission_file(
        &self,
        id: u64,
        file: Upload,
    ) -> ClientResult<SubmissionRecord> {
        self.call(&ReplaceSubmissionFile { id, file }).await
    }

    pub async fn exercise_submissions(&self, exercise_id: u64) -> ClientResult<Vec<SubmissionRecord>> {
        self.call(&ListExerciseSubmissions { exercise_id }).await
    }

    /// 每个练习的提交数量；单个请求失败时计为 0
    pub async fn submission_counts(&self, exercise_ids: &[u64]) -> Vec<(u64, usize)> {
        let counts = join_all(exercise_ids.iter().map(|id| self.exercise_submissions(*id))).await;
        exercise_ids
            .iter()
            .zip(counts)
            .map(|(id, res)| (*id, res.map(|subs| subs.len()).unwrap_or(0)))
            .collect()
    }

    pub async fn adjust_submission(
        &self,
        id: u64,
        adjustment: ScoreAdjustment,
    ) -> ClientResult<Message> {
        self.call(&AdjustSubmission { id, adjustment }).await
    }

    pub async fn student_performance(&self) -> ClientResult<Vec<SubmissionRecord>> {
        self.call(&FetchStudentPerformance).await
    }

    pub async fn teacher_statistics(&self) -> ClientResult<TeacherStatistics> {
        self.call(&FetchTeacherStatistics).await
    }
}

#[cfg(test)]
mod tests;
