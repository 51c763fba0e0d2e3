//! 题库
//!
//! 内存中的题目集合,提供整理(乱序、归类)、检索、
//! 以及人工录入/编辑/删除的全部操作。

use rand::seq::SliceRandom;

use crate::error::{AppError, AppResult, BankError};
use crate::models::question::{Answer, Layout, Question, VisualType};

/// 各题型的数量统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TypeCounts {
    pub mcq: usize,
    pub essay: usize,
    pub short: usize,
}

impl TypeCounts {
    pub fn total(&self) -> usize {
        self.mcq + self.essay + self.short
    }
}

/// 人工表单的提交模式
#[derive(Debug, Clone)]
pub enum FormMode {
    /// 新增题目
    New,
    /// 编辑已有题目(不可改变题型)
    Editing { question_id: String },
}

/// 人工录入/编辑表单
///
/// 选择题用 `options` + `correct_index`,填空和论述用 `correct_text`。
#[derive(Debug, Clone)]
pub struct QuestionForm {
    pub mode: FormMode,
    pub kind: VisualType,
    pub text: String,
    /// 选择题的选项文本,空白项在提交时被过滤掉
    pub options: Vec<String>,
    /// 正确选项在过滤后选项中的下标
    pub correct_index: usize,
    /// 填空/论述的参考答案
    pub correct_text: String,
    pub mark: f64,
    pub essay_lines: u32,
}

/// 题库
#[derive(Debug, Default)]
pub struct QuestionBank {
    questions: Vec<Question>,
}

impl QuestionBank {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_questions(questions: Vec<Question>) -> Self {
        Self { questions }
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn into_questions(self) -> Vec<Question> {
        self.questions
    }

    pub fn get(&self, id: &str) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == id)
    }

    /// 追加一批题目(导入的结果)
    pub fn append(&mut self, mut new_questions: Vec<Question>) {
        self.questions.append(&mut new_questions);
    }

    /// 整体替换题库内容(导入项目文件时)
    pub fn replace_all(&mut self, questions: Vec<Question>) {
        self.questions = questions;
    }

    /// 按 ID 删除题目,返回是否删除了东西
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.questions.len();
        self.questions.retain(|q| q.id != id);
        self.questions.len() != before
    }

    /// 打乱题目顺序
    pub fn shuffle_questions(&mut self) {
        let mut rng = rand::thread_rng();
        self.questions.shuffle(&mut rng);
    }

    /// 打乱每道选择题的选项顺序,其他题型不动
    pub fn shuffle_answers(&mut self) {
        let mut rng = rand::thread_rng();
        for q in &mut self.questions {
            if q.visual() == VisualType::Multichoice {
                q.answers.shuffle(&mut rng);
            }
        }
    }

    /// 按展示题型归类:选择/真假在前,填空居中,论述在后
    ///
    /// 稳定排序,同题型内保持原有相对顺序。
    pub fn group_by_type(&mut self) {
        self.questions
            .sort_by_key(|q| q.display_type().sort_order());
    }

    /// 按题干子串检索,大小写不敏感
    pub fn search(&self, term: &str) -> Vec<&Question> {
        let term = term.to_lowercase();
        self.questions
            .iter()
            .filter(|q| q.text.to_lowercase().contains(&term))
            .collect()
    }

    /// 统计各渲染题型的数量
    pub fn type_counts(&self) -> TypeCounts {
        let mut counts = TypeCounts::default();
        for q in &self.questions {
            match q.visual() {
                VisualType::Multichoice => counts.mcq += 1,
                VisualType::Shortanswer => counts.short += 1,
                VisualType::Essay => counts.essay += 1,
            }
        }
        counts
    }

    /// 提交人工表单,校验通过后写入题库,返回题目 ID
    ///
    /// 校验失败时题库保持原样。
    pub fn submit_form(&mut self, form: QuestionForm) -> AppResult<String> {
        if form.text.trim().is_empty() {
            return Err(AppError::Bank(BankError::EmptyStem));
        }
        let mark = sanitize_mark(form.mark);
        let ts = chrono::Utc::now().timestamp_millis();

        match &form.mode {
            FormMode::New => {
                let answers = match form.kind {
                    VisualType::Multichoice => build_option_answers(&form, ts, &[])?,
                    _ => vec![Answer {
                        id: "ans1".to_string(),
                        text: form.correct_text.clone(),
                        fraction: 100.0,
                        feedback: None,
                    }],
                };
                let id = format!("manual_{}", ts);
                self.questions.push(Question {
                    id: id.clone(),
                    name: "سؤال يدوي".to_string(),
                    text: form.text.clone(),
                    source_type: kind_tag(form.kind).to_string(),
                    visual_type: Some(form.kind),
                    layout: Some(match form.kind {
                        VisualType::Multichoice => Layout::Columns,
                        _ => Layout::Full,
                    }),
                    mark,
                    answers,
                    essay_lines: Some(form.essay_lines),
                    correct_answer_text: Some(form.correct_text.clone()),
                });
                Ok(id)
            }
            FormMode::Editing { question_id } => {
                let index = self
                    .questions
                    .iter()
                    .position(|q| q.id == *question_id)
                    .ok_or_else(|| AppError::question_not_found(question_id.clone()))?;

                // 先按现有题目的题型重建答案,校验失败时不触碰题库
                let answers = match self.questions[index].visual() {
                    VisualType::Multichoice => {
                        build_option_answers(&form, ts, &self.questions[index].answers)?
                    }
                    _ => {
                        let existing = self.questions[index].answers.first();
                        vec![Answer {
                            id: existing
                                .map(|a| a.id.clone())
                                .unwrap_or_else(|| "ans1".to_string()),
                            text: form.correct_text.clone(),
                            fraction: 100.0,
                            feedback: existing.and_then(|a| a.feedback.clone()),
                        }]
                    }
                };

                let q = &mut self.questions[index];
                q.text = form.text.clone();
                q.mark = mark;
                q.essay_lines = Some(form.essay_lines);
                q.correct_answer_text = Some(form.correct_text.clone());
                q.answers = answers;
                Ok(question_id.clone())
            }
        }
    }
}

/// 由表单选项构造选择题答案
///
/// 空白选项先被过滤,正确下标按过滤后的序列计。编辑场景下
/// 按位置沿用已有答案的 ID 和反馈,新增的位置分配新 ID。
fn build_option_answers(form: &QuestionForm, ts: i64, existing: &[Answer]) -> AppResult<Vec<Answer>> {
    let kept: Vec<&String> = form
        .options
        .iter()
        .filter(|t| !t.trim().is_empty())
        .collect();
    if kept.len() < 2 {
        return Err(AppError::too_few_options(kept.len()));
    }
    Ok(kept
        .iter()
        .enumerate()
        .map(|(idx, text)| Answer {
            id: existing
                .get(idx)
                .map(|a| a.id.clone())
                .unwrap_or_else(|| format!("new_a_{}_{}", ts, idx)),
            text: (*text).clone(),
            fraction: if idx == form.correct_index { 100.0 } else { 0.0 },
            feedback: existing.get(idx).and_then(|a| a.feedback.clone()),
        })
        .collect())
}

/// 分数必须是正的有限数,否则回落到 1
fn sanitize_mark(mark: f64) -> f64 {
    if mark.is_finite() && mark > 0.0 {
        mark
    } else {
        1.0
    }
}

fn kind_tag(kind: VisualType) -> &'static str {
    match kind {
        VisualType::Multichoice => "multichoice",
        VisualType::Shortanswer => "shortanswer",
        VisualType::Essay => "essay",
    }
}
