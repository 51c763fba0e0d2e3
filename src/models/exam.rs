//! 试卷级数据模型
//!
//! 试卷头信息、版式设置、生成设置与生成出的试卷版本。
//! 字段与项目 JSON 的 camelCase 键对应,版式默认值与前端渲染端约定一致。

use serde::{Deserialize, Serialize};

use crate::models::question::{DisplayType, Question};

/// 试卷头信息
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExamDetails {
    pub university: String,
    pub college: String,
    pub department: String,
    pub exam_name: String,
    pub exam_type: String,
    /// 考试时长,自由文本(如 "ساعتان")
    pub duration: String,
    pub date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
}

impl Default for ExamDetails {
    fn default() -> Self {
        Self {
            university: String::new(),
            college: String::new(),
            department: String::new(),
            exam_name: String::new(),
            exam_type: String::new(),
            duration: String::new(),
            date: chrono::Local::now().format("%Y-%m-%d").to_string(),
            logo: None,
        }
    }
}

/// 试卷头各行的字号档位
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HeaderSizes {
    pub university: String,
    pub college: String,
    pub department: String,
    pub exam_name: String,
}

impl Default for HeaderSizes {
    fn default() -> Self {
        Self {
            university: "text-xl".to_string(),
            college: "text-lg".to_string(),
            department: "text-xl".to_string(),
            exam_name: "text-lg".to_string(),
        }
    }
}

/// 试卷版式设置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExamStyle {
    pub font_family: String,
    /// 选择题选项的分栏数
    pub columns: u32,
    pub answer_layout: String,
    pub header_color: String,
    pub question_color: String,
    pub base_font_size: String,
    pub header_sizes: HeaderSizes,
    pub show_column_divider: bool,
    pub question_style: String,
    pub show_answer_key: bool,
    pub show_student_answer_sheet: bool,
    pub show_student_id: bool,
    pub text_direction: String,
    pub show_footer: bool,
    pub footer_text: String,
}

impl Default for ExamStyle {
    fn default() -> Self {
        Self {
            font_family: "Tajawal".to_string(),
            columns: 2,
            answer_layout: "auto".to_string(),
            header_color: "#000000".to_string(),
            question_color: "#000000".to_string(),
            base_font_size: "base".to_string(),
            header_sizes: HeaderSizes::default(),
            show_column_divider: false,
            question_style: "simple".to_string(),
            show_answer_key: true,
            show_student_answer_sheet: true,
            show_student_id: true,
            text_direction: "rtl".to_string(),
            show_footer: false,
            footer_text: "مع تمنياتي بالتوفيق".to_string(),
        }
    }
}

/// 组卷设置(exam.toml 的 [generation] 段)
///
/// 各题型配额缺省时使用题库中该题型的现有数量。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationSettings {
    pub version_count: usize,
    pub mcq_count: Option<usize>,
    pub essay_count: Option<usize>,
    pub short_count: Option<usize>,
    pub shuffle_questions: bool,
    pub shuffle_answers: bool,
    pub group_by_type: bool,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            version_count: 1,
            mcq_count: None,
            essay_count: None,
            short_count: None,
            shuffle_questions: false,
            shuffle_answers: false,
            group_by_type: false,
        }
    }
}

/// 生成出的一个试卷版本
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExamVersion {
    /// 版本标识,如 v0、v1
    pub id: String,
    /// 版本字母,A 到 Z
    pub label: String,
    pub questions: Vec<Question>,
}

/// 试卷上的一个分区:同一展示题型的连续一段题目
#[derive(Debug)]
pub struct QuestionSection<'a> {
    pub display_type: DisplayType,
    pub questions: Vec<&'a Question>,
}

impl QuestionSection<'_> {
    /// 分区指导语
    pub fn instruction(&self) -> &'static str {
        self.display_type.section_instruction()
    }
}

/// 分区序数词,"السؤال الأول" 中的序数部分
const SECTION_ORDINALS: [&str; 5] = ["الأول", "الثاني", "الثالث", "الرابع", "الخامس"];

/// 第 index 个分区的序数词,超出预设时退化为数字
pub fn section_ordinal(index: usize) -> String {
    SECTION_ORDINALS
        .get(index)
        .map(|s| s.to_string())
        .unwrap_or_else(|| format!("{}", index + 1))
}

/// 把题目序列按展示题型切成连续分区
///
/// 保持题目顺序不变,相邻同题型的题目进同一分区。
pub fn group_for_display(questions: &[Question]) -> Vec<QuestionSection<'_>> {
    let mut sections: Vec<QuestionSection> = Vec::new();
    for q in questions {
        let display_type = q.display_type();
        match sections.last_mut() {
            Some(last) if last.display_type == display_type => last.questions.push(q),
            _ => sections.push(QuestionSection {
                display_type,
                questions: vec![q],
            }),
        }
    }
    sections
}
