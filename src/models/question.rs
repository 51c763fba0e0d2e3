//! 题目数据模型
//!
//! 与项目 JSON 文件的字段一一对应(camelCase)。
//! `type` 字段保留来源标签原文,渲染口径统一通过 [`Question::visual`] 获得。

use crate::utils::logging::truncate_text;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 答案选项
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Answer {
    pub id: String,
    pub text: String,
    /// 得分比例,正确答案为 100
    #[serde(default)]
    pub fraction: f64,
    /// 答案反馈(仅 Moodle 来源携带)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feedback: Option<String>,
}

/// 渲染口径的题型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VisualType {
    Multichoice,
    Shortanswer,
    Essay,
}

impl VisualType {
    /// 从来源标签推导渲染题型
    ///
    /// Moodle 的 truefalse 按选择题渲染,numerical 按填空题渲染,
    /// 未知标签一律按选择题处理。
    pub fn from_raw(tag: &str) -> VisualType {
        match tag {
            "essay" => VisualType::Essay,
            "shortanswer" | "numerical" => VisualType::Shortanswer,
            _ => VisualType::Multichoice,
        }
    }
}

/// 排版方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    /// 选项分两列排布
    Columns,
    /// 整行排布
    Full,
}

/// 展示层题型,真假题在这一层才被区分出来
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayType {
    Multichoice,
    Truefalse,
    Shortanswer,
    Essay,
}

impl DisplayType {
    /// 试卷分区的指导语
    pub fn section_instruction(&self) -> &'static str {
        match self {
            DisplayType::Multichoice => "اختر الإجابة الصحيحة فيما يلي.",
            DisplayType::Shortanswer => "أكمل الفراغات التالية.",
            DisplayType::Essay => "أجب عن الأسئلة التالية.",
            DisplayType::Truefalse => {
                "ضع إشارة (✓) أمام العبارة الصحيحة و (✗) أمام الخاطئة."
            }
        }
    }

    /// 分区排序权重,选择题和真假题排最前,论述题最后
    pub fn sort_order(&self) -> u8 {
        match self {
            DisplayType::Multichoice | DisplayType::Truefalse => 1,
            DisplayType::Shortanswer => 2,
            DisplayType::Essay => 3,
        }
    }
}

/// 一道题目
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: String,
    pub name: String,
    /// 题干(Word 来源可能携带加粗等 HTML 标记)
    pub text: String,
    /// 来源标签原文,如 multichoice、truefalse、numerical
    #[serde(rename = "type")]
    pub source_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visual_type: Option<VisualType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout: Option<Layout>,
    #[serde(default = "default_mark")]
    pub mark: f64,
    #[serde(default)]
    pub answers: Vec<Answer>,
    /// 论述题的作答行数
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub essay_lines: Option<u32>,
    /// 参考答案(填空/论述用,选择题为空字符串)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correct_answer_text: Option<String>,
}

fn default_mark() -> f64 {
    1.0
}

impl Question {
    /// 渲染口径题型:优先用 visualType,缺失时从来源标签推导
    pub fn visual(&self) -> VisualType {
        self.visual_type
            .unwrap_or_else(|| VisualType::from_raw(&self.source_type))
    }

    /// 展示层题型:恰好两个选项的选择题按真假题展示
    pub fn display_type(&self) -> DisplayType {
        match self.visual() {
            VisualType::Multichoice if self.answers.len() == 2 => DisplayType::Truefalse,
            VisualType::Multichoice => DisplayType::Multichoice,
            VisualType::Shortanswer => DisplayType::Shortanswer,
            VisualType::Essay => DisplayType::Essay,
        }
    }

    /// 实际排版方式:未指定时选择题分栏,其余整行
    pub fn effective_layout(&self) -> Layout {
        self.layout.unwrap_or_else(|| match self.visual() {
            VisualType::Multichoice => Layout::Columns,
            _ => Layout::Full,
        })
    }

    /// 作答行数,未指定时默认 3 行
    pub fn answer_lines(&self) -> u32 {
        self.essay_lines.unwrap_or(3)
    }
}

impl fmt::Display for Question {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let preview = truncate_text(&self.text, 40);
        write!(
            f,
            "[{}] {} ({:?}, {} 分)",
            self.name,
            preview,
            self.visual(),
            self.mark
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(source_type: &str, visual_type: Option<VisualType>, answers: usize) -> Question {
        Question {
            id: "q1".to_string(),
            name: "سؤال 1".to_string(),
            text: "ما عاصمة مصر؟".to_string(),
            source_type: source_type.to_string(),
            visual_type,
            layout: None,
            mark: 1.0,
            answers: (0..answers)
                .map(|i| Answer {
                    id: format!("a{}", i),
                    text: format!("خيار {}", i),
                    fraction: 0.0,
                    feedback: None,
                })
                .collect(),
            essay_lines: None,
            correct_answer_text: None,
        }
    }

    #[test]
    fn visual_type_falls_back_to_source_tag() {
        assert_eq!(question("truefalse", None, 2).visual(), VisualType::Multichoice);
        assert_eq!(question("numerical", None, 0).visual(), VisualType::Shortanswer);
        assert_eq!(question("essay", None, 0).visual(), VisualType::Essay);
        assert_eq!(question("unknown", None, 0).visual(), VisualType::Multichoice);
        assert_eq!(
            question("essay", Some(VisualType::Shortanswer), 0).visual(),
            VisualType::Shortanswer
        );
    }

    #[test]
    fn two_answer_multichoice_displays_as_truefalse() {
        assert_eq!(question("multichoice", None, 2).display_type(), DisplayType::Truefalse);
        assert_eq!(
            question("multichoice", None, 4).display_type(),
            DisplayType::Multichoice
        );
        // 两个选项的填空题不受影响
        assert_eq!(
            question("shortanswer", None, 2).display_type(),
            DisplayType::Shortanswer
        );
    }

    #[test]
    fn layout_defaults_depend_on_visual_type() {
        assert_eq!(question("multichoice", None, 4).effective_layout(), Layout::Columns);
        assert_eq!(question("essay", None, 0).effective_layout(), Layout::Full);

        let mut q = question("essay", None, 0);
        q.layout = Some(Layout::Columns);
        assert_eq!(q.effective_layout(), Layout::Columns);
    }

    #[test]
    fn serde_uses_camel_case_keys() {
        let mut q = question("truefalse", Some(VisualType::Multichoice), 2);
        q.correct_answer_text = Some(String::new());
        q.essay_lines = Some(3);

        let json = serde_json::to_string(&q).expect("序列化应该成功");
        assert!(json.contains("\"type\":\"truefalse\""));
        assert!(json.contains("\"visualType\":\"multichoice\""));
        assert!(json.contains("\"essayLines\":3"));
        assert!(json.contains("\"correctAnswerText\":\"\""));

        let back: Question = serde_json::from_str(&json).expect("反序列化应该成功");
        assert_eq!(back, q);
    }

    #[test]
    fn missing_mark_defaults_to_one() {
        let json = r#"{"id":"x","name":"n","text":"t","type":"essay"}"#;
        let q: Question = serde_json::from_str(json).expect("反序列化应该成功");
        assert_eq!(q.mark, 1.0);
        assert!(q.answers.is_empty());
        assert_eq!(q.answer_lines(), 3);
    }
}
