use crate::{
    Created, Credentials, Exercise, ExerciseRecord, MIME_PDF, Message, RefreshRequest,
    RefreshedToken, RegisterRequest, ScoreAdjustment, SubmissionReceipt, SubmissionRecord,
    SubmissionSummary, TeacherExercise, TeacherStatistics, TokenPair, UserInfo,
};
use serde::de::DeserializeOwned;
use serde_json::json;

/// HTTP Methods for API Requests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

/// A file picked by the user, read into memory before upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upload {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl Upload {
    pub fn new(file_name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            mime_type: mime_type.into(),
            bytes,
        }
    }

    pub fn is_pdf(&self) -> bool {
        self.mime_type == MIME_PDF
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FormValue {
    Text(String),
    File(Upload),
}

#[derive(Debug, Clone, PartialEq)]
pub struct FormField {
    pub name: String,
    pub value: FormValue,
}

impl FormField {
    pub fn text(name: &str, value: impl Into<String>) -> Self {
        Self {
            name: name.to_string(),
            value: FormValue::Text(value.into()),
        }
    }

    pub fn file(name: &str, upload: Upload) -> Self {
        Self {
            name: name.to_string(),
            value: FormValue::File(upload),
        }
    }
}

/// Request body of an endpoint.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Empty,
    Json(serde_json::Value),
    Multipart(Vec<FormField>),
}

/// A trait that defines the request-response relationship and metadata for an API endpoint.
pub trait Endpoint {
    /// The response type returned by this request.
    type Response: DeserializeOwned;
    /// The HTTP method.
    const METHOD: HttpMethod;
    /// Whether the bearer token must be attached.
    const AUTHENTICATED: bool = true;

    /// The URL path, relative to the API origin.
    fn path(&self) -> String;

    fn payload(&self) -> Payload {
        Payload::Empty
    }
}

/// Resolve a file link returned by the API against the API origin.
pub fn resolve_file_url(base_url: &str, file: &str) -> String {
    if file.starts_with("http://") || file.starts_with("https://") {
        file.to_string()
    } else if file.starts_with('/') {
        format!("{}{}", base_url.trim_end_matches('/'), file)
    } else {
        format!("{}/{}", base_url.trim_end_matches('/'), file)
    }
}

/// Last path segment of a file link, used as the download name.
pub fn file_name_of(file: &str) -> &str {
    let path = file.split(['?', '#']).next().unwrap_or(file);
    path.rsplit('/').find(|s| !s.is_empty()).unwrap_or(path)
}

// =========================================================
// Auth
// =========================================================

impl Endpoint for Credentials {
    type Response = TokenPair;
    const METHOD: HttpMethod = HttpMethod::Post;
    const AUTHENTICATED: bool = false;

    fn path(&self) -> String {
        "/api/token/".to_string()
    }

    fn payload(&self) -> Payload {
        Payload::Json(json!({ "username": self.username, "password": self.password }))
    }
}

impl Endpoint for RefreshRequest {
    type Response = RefreshedToken;
    const METHOD: HttpMethod = HttpMethod::Post;
    const AUTHENTICATED: bool = false;

    fn path(&self) -> String {
        "/api/token/refresh/".to_string()
    }

    fn payload(&self) -> Payload {
        Payload::Json(json!({ "refresh": self.refresh }))
    }
}

impl Endpoint for RegisterRequest {
    type Response = Created;
    const METHOD: HttpMethod = HttpMethod::Post;
    const AUTHENTICATED: bool = false;

    fn path(&self) -> String {
        "/api/register/".to_string()
    }

    fn payload(&self) -> Payload {
        Payload::Json(json!({
            "username": self.username,
            "password": self.password,
            "email": self.email,
            "is_teacher": self.is_teacher,
        }))
    }
}

/// Fetch the profile of the token owner
#[derive(Debug, Clone, Copy)]
pub struct FetchUserInfo;

impl Endpoint for FetchUserInfo {
    type Response = UserInfo;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        "/api/user/".to_string()
    }
}

// =========================================================
// Exercises
// =========================================================

#[derive(Debug, Clone, Copy)]
pub struct ListExercises;

impl Endpoint for ListExercises {
    type Response = Vec<Exercise>;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        "/api/exercises/".to_string()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FetchExercise {
    pub id: u64,
}

impl Endpoint for FetchExercise {
    type Response = ExerciseRecord;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        format!("/api/exercises/{}/", self.id)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ListTeacherExercises;

impl Endpoint for ListTeacherExercises {
    type Response = Vec<TeacherExercise>;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        "/api/teacher-exercises/".to_string()
    }
}

#[derive(Debug, Clone)]
pub struct CreateExercise {
    pub title: String,
    pub file: Upload,
    pub correction: Option<Upload>,
}

impl Endpoint for CreateExercise {
    type Response = Created;
    const METHOD: HttpMethod = HttpMethod::Post;

    fn path(&self) -> String {
        "/api/exercises/add/".to_string()
    }

    fn payload(&self) -> Payload {
        let mut fields = vec![
            FormField::text("title", self.title.clone()),
            FormField::file("file", self.file.clone()),
        ];
        if let Some(correction) = &self.correction {
            fields.push(FormField::file("correction_models", correction.clone()));
        }
        Payload::Multipart(fields)
    }
}

#[derive(Debug, Clone)]
pub struct EditExercise {
    pub id: u64,
    pub title: String,
    pub file: Option<Upload>,
    pub correction: Option<Upload>,
}

impl Endpoint for EditExercise {
    type Response = ExerciseRecord;
    const METHOD: HttpMethod = HttpMethod::Put;

    fn path(&self) -> String {
        format!("/api/exercises/{}/edit/", self.id)
    }

    fn payload(&self) -> Payload {
        let mut fields = vec![FormField::text("title", self.title.clone())];
        if let Some(file) = &self.file {
            fields.push(FormField::file("file", file.clone()));
        }
        if let Some(correction) = &self.correction {
            fields.push(FormField::file("correction_models", correction.clone()));
        }
        Payload::Multipart(fields)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct DeleteExercise {
    pub id: u64,
}

impl Endpoint for DeleteExercise {
    type Response = ();
    const METHOD: HttpMethod = HttpMethod::Delete;

    fn path(&self) -> String {
        format!("/api/exercises/{}/delete/", self.id)
    }
}

// =========================================================
// Submissions
// =========================================================

#[derive(Debug, Clone)]
pub struct SubmitAnswer {
    pub exercise_id: u64,
    pub file: Upload,
}

impl Endpoint for SubmitAnswer {
    type Response = SubmissionReceipt;
    const METHOD: HttpMethod = HttpMethod::Post;

    fn path(&self) -> String {
        "/api/submit/".to_string()
    }

    fn payload(&self) -> Payload {
        Payload::Multipart(vec![
            FormField::text("exercise", self.exercise_id.to_string()),
            FormField::file("file", self.file.clone()),
        ])
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ListSubmissions;

impl Endpoint for ListSubmissions {
    type Response = Vec<SubmissionSummary>;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        "/api/submissions/".to_string()
    }
}

/// Replace the file of an unlocked submission
#[derive(Debug, Clone)]
pub struct ReplaceSubmissionFile {
    pub id: u64,
    pub file: Upload,
}

impl Endpoint for ReplaceSubmissionFile {
    type Response = SubmissionRecord;
    const METHOD: HttpMethod = HttpMethod::Put;

    fn path(&self) -> String {
        format!("/api/submissions/{}/edit/", self.id)
    }

    fn payload(&self) -> Payload {
        Payload::Multipart(vec![FormField::file("file", self.file.clone())])
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ListExerciseSubmissions {
    pub exercise_id: u64,
}

impl Endpoint for ListExerciseSubmissions {
    type Response = Vec<SubmissionRecord>;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        format!("/api/exercises/{}/submissions/", self.exercise_id)
    }
}

/// Teacher grading; the server locks the submission afterwards.
#[derive(Debug, Clone)]
pub struct AdjustSubmission {
    pub id: u64,
    pub adjustment: ScoreAdjustment,
}

impl Endpoint for AdjustSubmission {
    type Response = Message;
    const METHOD: HttpMethod = HttpMethod::Post;

    fn path(&self) -> String {
        format!("/api/submissions/{}/adjust/", self.id)
    }

    fn payload(&self) -> Payload {
        Payload::Json(json!({
            "score": self.adjustment.score,
            "feedback": self.adjustment.feedback,
        }))
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FetchStudentPerformance;

impl Endpoint for FetchStudentPerformance {
    type Response = Vec<SubmissionRecord>;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        "/api/student-performance/".to_string()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FetchTeacherStatistics;

impl Endpoint for FetchTeacherStatistics {
    type Response = TeacherStatistics;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        "/api/teacher-statistics/".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pdf(name: &str) -> Upload {
        Upload::new(name, MIME_PDF, b"%PDF-1.7".to_vec())
    }

    #[test]
    fn create_exercise_omits_missing_correction() {
        let endpoint = CreateExercise {
            title: "Sous-requêtes".to_string(),
            file: pdf("enonce.pdf"),
            correction: None,
        };
        let Payload::Multipart(fields) = endpoint.payload() else {
            panic!("expected multipart payload");
        };
        let names: Vec<&str> = fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["title", "file"]);
    }

    #[test]
    fn edit_exercise_sends_title_and_only_replaced_files() {
        let endpoint = EditExercise {
            id: 7,
            title: "Index".to_string(),
            file: None,
            correction: Some(pdf("corrige.pdf")),
        };
        assert_eq!(endpoint.path(), "/api/exercises/7/edit/");
        let Payload::Multipart(fields) = endpoint.payload() else {
            panic!("expected multipart payload");
        };
        assert_eq!(fields[0], FormField::text("title", "Index"));
        assert_eq!(fields[1].name, "correction_models");
        assert_eq!(fields.len(), 2);
    }

    #[test]
    fn submit_answer_sends_exercise_id_as_text() {
        let endpoint = SubmitAnswer {
            exercise_id: 12,
            file: pdf("reponse.pdf"),
        };
        let Payload::Multipart(fields) = endpoint.payload() else {
            panic!("expected multipart payload");
        };
        assert_eq!(fields[0], FormField::text("exercise", "12"));
        assert!(matches!(&fields[1].value, FormValue::File(u) if u.file_name == "reponse.pdf"));
    }

    #[test]
    fn token_endpoints_are_anonymous() {
        assert!(!Credentials::AUTHENTICATED);
        assert!(!RefreshRequest::AUTHENTICATED);
        assert!(!RegisterRequest::AUTHENTICATED);
        assert!(FetchUserInfo::AUTHENTICATED);
        assert!(DeleteExercise::AUTHENTICATED);
    }

    #[test]
    fn adjust_payload_carries_score_and_feedback() {
        let endpoint = AdjustSubmission {
            id: 4,
            adjustment: ScoreAdjustment {
                score: 15,
                feedback: "Bonne jointure".to_string(),
            },
        };
        assert_eq!(endpoint.path(), "/api/submissions/4/adjust/");
        assert_eq!(
            endpoint.payload(),
            Payload::Json(json!({ "score": 15, "feedback": "Bonne jointure" }))
        );
    }

    #[test]
    fn resolve_file_url_keeps_absolute_links() {
        let base = "https://api.example.org/";
        assert_eq!(
            resolve_file_url(base, "https://cdn.example.org/a.pdf"),
            "https://cdn.example.org/a.pdf"
        );
        assert_eq!(
            resolve_file_url(base, "/media/exercises/a.pdf"),
            "https://api.example.org/media/exercises/a.pdf"
        );
        assert_eq!(
            resolve_file_url(base, "media/a.pdf"),
            "https://api.example.org/media/a.pdf"
        );
    }

    #[test]
    fn file_name_is_last_segment() {
        assert_eq!(file_name_of("/media/exercises/tp1.pdf"), "tp1.pdf");
        assert_eq!(file_name_of("https://x.org/m/tp2.pdf?sig=abc"), "tp2.pdf");
        assert_eq!(file_name_of("tp3.pdf"), "tp3.pdf");
    }
}
