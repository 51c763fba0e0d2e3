//! Moodle XML 题目提取器
//!
//! 读取 Moodle 导出的 XML 题库,每个 `<question>` 节点映射为一道题。
//! category 节点只占序号不产出题目;truefalse 在导入时统一按选择题
//! 存储,展示层再根据选项数识别判断题。

use chrono::Utc;
use roxmltree::Document;
use tracing::debug;

use crate::error::{AppError, AppResult, ParseError};
use crate::models::question::{Answer, Layout, Question, VisualType};
use crate::utils::text::strip_bom;
use crate::utils::xml::{child, get_attr_local, is_tag, text_content};

/// Moodle XML 题目提取器
pub struct MoodleExtractor;

impl MoodleExtractor {
    pub fn new() -> Self {
        Self
    }

    /// 从 XML 文本中提取题目
    ///
    /// `id_offset` 是题库中已有的题目数,多文件导入时用它错开 ID。
    /// 序号按文档里的 question 节点顺序计,被跳过的节点同样占位。
    pub fn extract(&self, xml: &str, id_offset: usize) -> AppResult<Vec<Question>> {
        let doc = Document::parse(strip_bom(xml))?;
        let ts = Utc::now().timestamp_millis();
        let mut questions = Vec::new();

        for (index, node) in doc
            .descendants()
            .filter(|n| is_tag(n, "question"))
            .enumerate()
        {
            let moodle_type = get_attr_local(&node, "type").unwrap_or("unknown");
            if moodle_type == "category" {
                continue;
            }

            // 没有题干节点的不成题;题干允许为空串
            let question_text = match child(&node, "questiontext").and_then(|qt| child(&qt, "text"))
            {
                Some(text_node) => text_content(&text_node),
                None => continue,
            };

            let name = child(&node, "name")
                .and_then(|n| child(&n, "text"))
                .map(|n| text_content(&n))
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| format!("Question {}", index + 1));

            let mark = node
                .descendants()
                .find(|n| is_tag(n, "defaultgrade"))
                .and_then(|n| text_content(&n).trim().parse::<f64>().ok())
                .unwrap_or(1.0);

            let visual = VisualType::from_raw(moodle_type);
            let abs_index = id_offset + index;

            let answers: Vec<Answer> = node
                .descendants()
                .filter(|n| is_tag(n, "answer"))
                .enumerate()
                .filter_map(|(answer_index, answer_node)| {
                    // 没有 text 节点的选项丢弃,但序号照样前进
                    let text_node = answer_node.descendants().find(|n| is_tag(n, "text"))?;
                    let fraction = get_attr_local(&answer_node, "fraction")
                        .and_then(|v| v.parse::<f64>().ok())
                        .unwrap_or(0.0);
                    let feedback = child(&answer_node, "feedback")
                        .and_then(|f| child(&f, "text"))
                        .map(|n| text_content(&n))
                        .unwrap_or_default();
                    Some(Answer {
                        id: format!("q{}_a{}", abs_index, answer_index),
                        text: text_content(&text_node),
                        fraction,
                        feedback: Some(feedback),
                    })
                })
                .collect();

            let correct_answer_text = if visual != VisualType::Multichoice {
                answers
                    .iter()
                    .find(|a| a.fraction == 100.0)
                    .map(|a| a.text.clone())
                    .unwrap_or_default()
            } else {
                String::new()
            };

            let layout = if matches!(visual, VisualType::Essay | VisualType::Shortanswer) {
                Layout::Full
            } else {
                Layout::Columns
            };

            questions.push(Question {
                id: format!("q_{}_{}", ts, abs_index),
                name,
                text: question_text,
                source_type: moodle_type.to_string(),
                visual_type: Some(visual),
                layout: Some(layout),
                mark,
                answers,
                essay_lines: Some(3),
                correct_answer_text: Some(correct_answer_text),
            });
        }

        if questions.is_empty() {
            return Err(AppError::Parse(ParseError::NoQuestionsFound));
        }
        debug!("📋 解析到 {} 道题目", questions.len());
        Ok(questions)
    }
}

impl Default for MoodleExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::question::DisplayType;

    #[test]
    fn multichoice_question_is_parsed_with_answers() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<quiz>
  <question type="multichoice">
    <name><text>سؤال العواصم</text></name>
    <questiontext format="html"><text><![CDATA[ما عاصمة مصر؟]]></text></questiontext>
    <defaultgrade>2.5</defaultgrade>
    <answer fraction="100"><text>القاهرة</text><feedback><text>صحيح</text></feedback></answer>
    <answer fraction="0"><text>الرياض</text></answer>
  </question>
</quiz>"#;

        let questions = MoodleExtractor::new().extract(xml, 0).expect("解析应该成功");
        assert_eq!(questions.len(), 1);

        let q = &questions[0];
        assert!(q.id.starts_with("q_"));
        assert_eq!(q.name, "سؤال العواصم");
        assert_eq!(q.text, "ما عاصمة مصر؟");
        assert_eq!(q.source_type, "multichoice");
        assert_eq!(q.mark, 2.5);
        assert_eq!(q.layout, Some(Layout::Columns));
        assert_eq!(q.correct_answer_text.as_deref(), Some(""));

        assert_eq!(q.answers.len(), 2);
        assert_eq!(q.answers[0].id, "q0_a0");
        assert_eq!(q.answers[0].text, "القاهرة");
        assert_eq!(q.answers[0].fraction, 100.0);
        assert_eq!(q.answers[0].feedback.as_deref(), Some("صحيح"));
        // 没有 feedback 节点时落成空串,和有无字段的序列化保持一致
        assert_eq!(q.answers[1].feedback.as_deref(), Some(""));
    }

    #[test]
    fn truefalse_is_stored_as_multichoice_and_displayed_as_truefalse() {
        let xml = r#"<quiz>
  <question type="truefalse">
    <name><text>عبارة</text></name>
    <questiontext><text>النيل أطول نهر في العالم</text></questiontext>
    <answer fraction="100"><text>صح</text></answer>
    <answer fraction="0"><text>خطأ</text></answer>
  </question>
</quiz>"#;

        let questions = MoodleExtractor::new().extract(xml, 0).expect("解析应该成功");
        let q = &questions[0];
        assert_eq!(q.source_type, "truefalse");
        assert_eq!(q.visual(), VisualType::Multichoice);
        assert_eq!(q.display_type(), DisplayType::Truefalse);
    }

    #[test]
    fn category_nodes_are_skipped_but_keep_their_index() {
        let xml = r#"<quiz>
  <question type="category">
    <category><text>$course$/أسئلة</text></category>
  </question>
  <question type="shortanswer">
    <questiontext><text>عاصمة فرنسا هي ____</text></questiontext>
    <answer fraction="100"><text>باريس</text></answer>
  </question>
</quiz>"#;

        let questions = MoodleExtractor::new().extract(xml, 0).expect("解析应该成功");
        assert_eq!(questions.len(), 1);

        let q = &questions[0];
        // category 占了 0 号位
        assert!(q.id.ends_with("_1"));
        assert_eq!(q.name, "Question 2");
        assert_eq!(q.answers[0].id, "q1_a0");
        assert_eq!(q.correct_answer_text.as_deref(), Some("باريس"));
        assert_eq!(q.layout, Some(Layout::Full));
    }

    #[test]
    fn question_without_text_node_is_dropped() {
        let xml = r#"<quiz>
  <question type="essay">
    <name><text>بدون نص</text></name>
  </question>
  <question type="essay">
    <questiontext><text>اشرح أهمية الماء</text></questiontext>
  </question>
</quiz>"#;

        let questions = MoodleExtractor::new().extract(xml, 0).expect("解析应该成功");
        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].text, "اشرح أهمية الماء");
        assert!(questions[0].answers.is_empty());
    }

    #[test]
    fn unparsable_grade_falls_back_to_one() {
        let xml = r#"<quiz>
  <question type="essay">
    <questiontext><text>اشرح</text></questiontext>
    <defaultgrade>كثير</defaultgrade>
  </question>
</quiz>"#;

        let questions = MoodleExtractor::new().extract(xml, 0).expect("解析应该成功");
        assert_eq!(questions[0].mark, 1.0);
    }

    #[test]
    fn id_offset_shifts_question_and_answer_ids() {
        let xml = r#"<quiz>
  <question type="multichoice">
    <questiontext><text>سؤال</text></questiontext>
    <answer fraction="100"><text>نعم</text></answer>
    <answer fraction="0"><text>لا</text></answer>
  </question>
</quiz>"#;

        let questions = MoodleExtractor::new().extract(xml, 4).expect("解析应该成功");
        assert!(questions[0].id.ends_with("_4"));
        assert_eq!(questions[0].answers[1].id, "q4_a1");
    }

    #[test]
    fn broken_xml_reports_parse_error() {
        let err = MoodleExtractor::new()
            .extract("<quiz><question", 0)
            .expect_err("应该报 XML 错误");
        assert!(matches!(
            err,
            AppError::Parse(ParseError::UnreadableXml { .. })
        ));
    }

    #[test]
    fn quiz_without_questions_is_an_error() {
        let err = MoodleExtractor::new()
            .extract("<quiz></quiz>", 0)
            .expect_err("应该报没有题目");
        assert!(matches!(
            err,
            AppError::Parse(ParseError::NoQuestionsFound)
        ));
    }
}
