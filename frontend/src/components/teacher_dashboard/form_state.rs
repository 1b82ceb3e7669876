//! 练习表单状态
//!
//! 创建对话框和行内编辑共用同一结构，负责字段持有、重置与校验。

use leptos::prelude::*;
use sqlab_shared::TeacherExercise;
use sqlab_shared::protocol::Upload;

use crate::validation::validate_exercise_form;

/// 校验通过的表单内容
#[derive(Debug, Clone, PartialEq)]
pub struct ExerciseDraft {
    pub title: String,
    pub file: Option<Upload>,
    pub correction: Option<Upload>,
}

#[derive(Clone, Copy)]
pub struct FormState {
    pub title: RwSignal<String>,
    pub file: RwSignal<Option<Upload>>,
    pub correction: RwSignal<Option<Upload>>,
}

impl FormState {
    pub fn new() -> Self {
        Self {
            title: RwSignal::new(String::new()),
            file: RwSignal::new(None),
            correction: RwSignal::new(None),
        }
    }

    pub fn reset(&self) {
        self.title.set(String::new());
        self.file.set(None);
        self.correction.set(None);
    }

    /// 以已有练习填充；文件留空表示不替换
    pub fn load(&self, exercise: &TeacherExercise) {
        self.title.set(exercise.title.clone());
        self.file.set(None);
        self.correction.set(None);
    }

    pub fn file_name(&self) -> Signal<Option<String>> {
        let file = self.file;
        Signal::derive(move || file.with(|f| f.as_ref().map(|f| f.file_name.clone())))
    }

    pub fn correction_name(&self) -> Signal<Option<String>> {
        let correction = self.correction;
        Signal::derive(move || correction.with(|f| f.as_ref().map(|f| f.file_name.clone())))
    }

    pub fn to_draft(&self, file_required: bool) -> Result<ExerciseDraft, String> {
        let file = self.file.get();
        let correction = self.correction.get();
        let title = validate_exercise_form(
            &self.title.get(),
            file.as_ref(),
            correction.as_ref(),
            file_required,
        )?;
        Ok(ExerciseDraft {
            title,
            file,
            correction,
        })
    }
}

impl Default for FormState {
    fn default() -> Self {
        Self::new()
    }
}
