use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

pub mod date;
pub mod protocol;
pub mod report;

// =========================================================
// 常量定义 (Constants)
// =========================================================

pub const HEADER_AUTHORIZATION: &str = "Authorization";
pub const MIME_PDF: &str = "application/pdf";
/// 上传文件大小上限（与服务端保持一致）
pub const MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;
/// 教师评分的满分
pub const MAX_SCORE: u8 = 20;

// =========================================================
// 角色 (Role)
// =========================================================

/// 用户角色
///
/// 只是客户端缓存的提示，来源于最近一次成功的用户信息请求，不做任何校验。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Teacher,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::Teacher => "teacher",
        }
    }

    /// 解析存储中的角色字符串，未知值视为缺失
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "student" => Some(Role::Student),
            "teacher" => Some(Role::Teacher),
            _ => None,
        }
    }

    pub fn from_is_teacher(is_teacher: bool) -> Self {
        if is_teacher { Role::Teacher } else { Role::Student }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =========================================================
// 认证 (Auth)
// =========================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshRequest {
    pub refresh: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshedToken {
    pub access: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub email: String,
    pub is_teacher: bool,
}

/// `{message, id}` returned by the create endpoints
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Created {
    pub message: String,
    pub id: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInfo {
    pub username: String,
    pub email: String,
    pub is_teacher: bool,
}

impl UserInfo {
    pub fn role(&self) -> Role {
        Role::from_is_teacher(self.is_teacher)
    }
}

/// Error body used by the REST API.
///
/// Views send `{"error": "..."}`; the token endpoints send `{"detail": "..."}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub detail: Option<String>,
}

impl ErrorBody {
    pub fn message(&self) -> Option<&str> {
        self.error.as_deref().or(self.detail.as_deref())
    }
}

// =========================================================
// 练习 (Exercises)
// =========================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exercise {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub file: Option<String>,
    /// 仅对教师返回
    #[serde(default)]
    pub correction_models: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeacherExercise {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub file: Option<String>,
    #[serde(default)]
    pub correction_models: Option<String>,
    pub created_at: String,
}

/// Serializer shape returned by the detail and edit endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseRecord {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub file: Option<String>,
}

// =========================================================
// 提交 (Submissions)
// =========================================================

/// Row of `/api/submissions/`.
///
/// `student_username` is only present when a teacher lists submissions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionSummary {
    pub id: u64,
    pub exercise_title: String,
    #[serde(default)]
    pub student_username: Option<String>,
    #[serde(default)]
    pub file: Option<String>,
    pub submitted_at: String,
    #[serde(default)]
    pub score: Option<i32>,
    #[serde(default)]
    pub feedback: Option<String>,
    #[serde(default)]
    pub is_locked: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentRef {
    pub id: u64,
    pub username: String,
    #[serde(default)]
    pub email: String,
}

/// Full submission record (per-exercise listing, edit result, performance).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionRecord {
    pub id: u64,
    pub student: StudentRef,
    /// 练习标题
    #[serde(default)]
    pub exercise: Option<String>,
    #[serde(default)]
    pub file: Option<String>,
    pub submitted_at: String,
    #[serde(default)]
    pub score: Option<i32>,
    #[serde(default)]
    pub feedback: Option<String>,
    #[serde(default)]
    pub is_locked: bool,
}

/// Response of `/api/submit/`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionReceipt {
    pub id: u64,
    pub exercise: u64,
    pub file: String,
    pub submitted_at: String,
    #[serde(default)]
    pub score: Option<i32>,
    #[serde(default)]
    pub feedback: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreAdjustment {
    pub score: u8,
    pub feedback: String,
}

// =========================================================
// 统计 (Statistics)
// =========================================================

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExerciseStats {
    pub average_score: f64,
    pub submission_count: u32,
}

/// 以练习 id 为键的统计表（JSON 中键为字符串）
pub type TeacherStatistics = BTreeMap<u64, ExerciseStats>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_parse_rejects_unknown_values() {
        assert_eq!(Role::parse("student"), Some(Role::Student));
        assert_eq!(Role::parse("teacher"), Some(Role::Teacher));
        assert_eq!(Role::parse("admin"), None);
        assert_eq!(Role::parse("Teacher"), None);
        assert_eq!(Role::parse(""), None);
    }

    #[test]
    fn user_info_maps_teacher_flag_to_role() {
        let user: UserInfo =
            serde_json::from_str(r#"{"username":"ana","email":"a@b.fr","is_teacher":true}"#)
                .unwrap();
        assert_eq!(user.role(), Role::Teacher);
    }

    #[test]
    fn student_submission_rows_default_optional_fields() {
        let rows: Vec<SubmissionSummary> = serde_json::from_str(
            r#"[{"id":3,"exercise_title":"Jointures","file":null,
                "submitted_at":"2025-03-12T14:30:00+00:00","score":null,"feedback":null}]"#,
        )
        .unwrap();
        assert_eq!(rows[0].student_username, None);
        assert!(!rows[0].is_locked);
        assert_eq!(rows[0].score, None);
    }

    #[test]
    fn statistics_keys_are_parsed_as_exercise_ids() {
        let stats: TeacherStatistics = serde_json::from_str(
            r#"{"2":{"average_score":12.5,"submission_count":4},
                "1":{"average_score":0,"submission_count":0}}"#,
        )
        .unwrap();
        let ids: Vec<u64> = stats.keys().copied().collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(stats[&2].average_score, 12.5);
    }

    #[test]
    fn error_body_prefers_error_over_detail() {
        let body: ErrorBody =
            serde_json::from_str(r#"{"detail":"Token invalide","error":"Exercice non trouvé."}"#)
                .unwrap();
        assert_eq!(body.message(), Some("Exercice non trouvé."));

        let body: ErrorBody = serde_json::from_str(r#"{"detail":"Token invalide"}"#).unwrap();
        assert_eq!(body.message(), Some("Token invalide"));
    }
}
