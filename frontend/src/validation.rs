//! 表单校验
//!
//! 所有校验都在发出请求前完成，失败时返回直接展示给用户的消息。

use sqlab_shared::protocol::Upload;
use sqlab_shared::{Credentials, MAX_SCORE, MAX_UPLOAD_BYTES, RegisterRequest, ScoreAdjustment};

pub const MIN_PASSWORD_LEN: usize = 8;

pub fn validate_credentials(username: &str, password: &str) -> Result<Credentials, String> {
    if username.trim().is_empty() || password.is_empty() {
        return Err("Veuillez remplir tous les champs.".to_string());
    }
    Ok(Credentials {
        username: username.trim().to_string(),
        password: password.to_string(),
    })
}

pub fn validate_registration(
    username: &str,
    email: &str,
    password: &str,
    is_teacher: bool,
) -> Result<RegisterRequest, String> {
    let username = username.trim();
    let email = email.trim();
    if username.is_empty() || email.is_empty() || password.is_empty() {
        return Err("Veuillez remplir tous les champs.".to_string());
    }
    if !email.contains('@') {
        return Err("Adresse e-mail invalide.".to_string());
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(format!(
            "Le mot de passe doit contenir au moins {} caractères.",
            MIN_PASSWORD_LEN
        ));
    }
    Ok(RegisterRequest {
        username: username.to_string(),
        password: password.to_string(),
        email: email.to_string(),
        is_teacher,
    })
}

/// PDF 且不超过 10 Mo
pub fn validate_pdf(upload: &Upload) -> Result<(), String> {
    if !upload.is_pdf() {
        return Err("Veuillez sélectionner un fichier PDF valide.".to_string());
    }
    if upload.size() > MAX_UPLOAD_BYTES {
        return Err(format!(
            "Le fichier « {} » dépasse la taille maximale de 10 Mo.",
            upload.file_name
        ));
    }
    Ok(())
}

pub fn validate_submission(
    exercise_id: Option<u64>,
    file: Option<&Upload>,
) -> Result<(u64, Upload), String> {
    let exercise_id = exercise_id.ok_or_else(|| "Veuillez sélectionner un exercice.".to_string())?;
    let file = file.ok_or_else(|| "Veuillez sélectionner un fichier PDF à soumettre.".to_string())?;
    validate_pdf(file)?;
    Ok((exercise_id, file.clone()))
}

/// 创建练习时必须有题目和文件；编辑时文件可选
pub fn validate_exercise_form(
    title: &str,
    file: Option<&Upload>,
    correction: Option<&Upload>,
    file_required: bool,
) -> Result<String, String> {
    let title = title.trim();
    if title.is_empty() || (file_required && file.is_none()) {
        return Err("Veuillez remplir tous les champs requis (titre et fichier).".to_string());
    }
    if let Some(file) = file {
        validate_pdf(file)?;
    }
    if let Some(correction) = correction {
        validate_pdf(correction)?;
    }
    Ok(title.to_string())
}

/// 分数为 0..=20 的整数
pub fn validate_adjustment(score: &str, feedback: &str) -> Result<ScoreAdjustment, String> {
    let err = || format!("Veuillez entrer une note valide entre 0 et {}.", MAX_SCORE);
    let score: u8 = score.trim().parse().map_err(|_| err())?;
    if score > MAX_SCORE {
        return Err(err());
    }
    Ok(ScoreAdjustment {
        score,
        feedback: feedback.trim().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlab_shared::MIME_PDF;

    fn pdf(size: usize) -> Upload {
        Upload::new("tp.pdf", MIME_PDF, vec![0; size])
    }

    #[test]
    fn credentials_require_both_fields() {
        assert!(validate_credentials("", "x").is_err());
        assert!(validate_credentials("lea", "").is_err());
        assert_eq!(validate_credentials(" lea ", "pw").unwrap().username, "lea");
    }

    #[test]
    fn registration_enforces_password_length() {
        let err = validate_registration("lea", "lea@ecole.fr", "court", false).unwrap_err();
        assert_eq!(err, "Le mot de passe doit contenir au moins 8 caractères.");
        let req = validate_registration("lea", "lea@ecole.fr", "motdepasse", true).unwrap();
        assert!(req.is_teacher);
    }

    #[test]
    fn registration_rejects_bad_email() {
        assert!(validate_registration("lea", "lea.ecole.fr", "motdepasse", false).is_err());
    }

    #[test]
    fn submission_checks_in_order() {
        assert_eq!(
            validate_submission(None, None).unwrap_err(),
            "Veuillez sélectionner un exercice."
        );
        assert_eq!(
            validate_submission(Some(1), None).unwrap_err(),
            "Veuillez sélectionner un fichier PDF à soumettre."
        );
        let txt = Upload::new("a.txt", "text/plain", vec![1]);
        assert!(validate_submission(Some(1), Some(&txt)).is_err());
        assert_eq!(validate_submission(Some(1), Some(&pdf(10))).unwrap().0, 1);
    }

    #[test]
    fn uploads_over_ten_megabytes_are_rejected() {
        let limit = MAX_UPLOAD_BYTES as usize;
        assert!(validate_pdf(&pdf(limit)).is_ok());
        assert!(validate_pdf(&pdf(limit + 1)).is_err());
    }

    #[test]
    fn exercise_form_requires_file_only_on_create() {
        assert!(validate_exercise_form("Jointures", None, None, true).is_err());
        assert_eq!(
            validate_exercise_form(" Jointures ", None, None, false).unwrap(),
            "Jointures"
        );
        assert!(validate_exercise_form("", Some(&pdf(1)), None, true).is_err());
        let bad = Upload::new("c.docx", "application/msword", vec![1]);
        assert!(validate_exercise_form("Vues", Some(&pdf(1)), Some(&bad), true).is_err());
    }

    #[test]
    fn adjustment_accepts_only_integers_in_range() {
        assert_eq!(validate_adjustment("0", "").unwrap().score, 0);
        assert_eq!(validate_adjustment(" 20 ", "ok").unwrap().score, 20);
        for bad in ["21", "-1", "12.5", "", "douze"] {
            assert!(validate_adjustment(bad, "").is_err(), "{}", bad);
        }
    }
}
