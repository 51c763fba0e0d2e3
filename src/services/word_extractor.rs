//! Word 题目提取器
//!
//! 在归一化的文档块序列上识别题目:
//! - 列表块:顶层项为题干,嵌套项为选项,加粗的选项是正确答案
//! - 普通段落:一段一题,含下划线或连续填充符(ـ)的是填空题,其余是论述题
//! - 题干段落后面可以跟 ("...")  形式的多行答案块,以及独立的纯数字分数行

use chrono::Utc;
use regex::Regex;
use tracing::debug;

use crate::error::{AppError, AppResult, ParseError};
use crate::models::block::{DocBlock, DocList};
use crate::models::question::{Answer, Layout, Question, VisualType};
use crate::services::block_cursor::BlockCursor;
use crate::utils::text::{normalize_digits, strip_emphasis_tags};

/// 填空题缺答案时的占位:答案见卷面
const SHORTANSWER_PLACEHOLDER: &str = "(انظر الورقة)";
/// 论述题缺答案时的占位:留给阅卷人
const ESSAY_PLACEHOLDER: &str = "(متروك لتقدير المصحح)";

/// Word 题目提取器
pub struct WordExtractor {
    /// 题干末尾的括号注解,如 (باريس)
    paren_re: Regex,
    /// 题干末尾的 *N 行数标记,N 允许阿拉伯数字
    essay_re: Regex,
    /// 两个以上连续的阿拉伯语填充符
    tatweel_re: Regex,
}

impl WordExtractor {
    pub fn new() -> AppResult<Self> {
        Ok(Self {
            paren_re: Regex::new(r"\(([^)]+)\)\s*$")?,
            essay_re: Regex::new(r"^(.*)\*([0-9٠-٩]+)\s*$")?,
            tatweel_re: Regex::new("ـ{2,}")?,
        })
    }

    /// 从文档块序列中提取题目
    ///
    /// `id_offset` 是题库中已有的题目数,多文件导入时用它错开 ID。
    /// 一道题都没认出来时报错。
    pub fn extract(&self, blocks: &[DocBlock], id_offset: usize) -> AppResult<Vec<Question>> {
        let ts = Utc::now().timestamp_millis();
        let mut questions = Vec::new();
        let mut cursor = BlockCursor::new(blocks);

        while let Some(block) = cursor.peek() {
            if block.is_blank() {
                cursor.advance();
                continue;
            }
            match block {
                DocBlock::List(list) => {
                    cursor.advance();
                    self.extract_list_questions(list, &mut questions, id_offset, ts);
                }
                DocBlock::Paragraph(para) => {
                    cursor.advance();
                    // 孤立的答案块开头不属于任何题目
                    if para.text.starts_with("(\"") {
                        continue;
                    }
                    let inline_answer = take_inline_answer(&mut cursor);
                    let mark = take_mark_line(&mut cursor).unwrap_or(1.0);
                    let question = self.build_paragraph_question(
                        &para.text,
                        inline_answer,
                        mark,
                        questions.len(),
                        id_offset,
                        ts,
                    );
                    debug!("  识别题目: {}", question);
                    questions.push(question);
                }
            }
        }

        if questions.is_empty() {
            return Err(AppError::Parse(ParseError::NoQuestionsFound));
        }
        Ok(questions)
    }

    /// 列表块按"题干 + 嵌套选项"识别选择题
    ///
    /// 自身内容为空或没有嵌套选项的顶层项不成题,直接跳过。
    fn extract_list_questions(
        &self,
        list: &DocList,
        questions: &mut Vec<Question>,
        id_offset: usize,
        ts: i64,
    ) {
        for item in &list.items {
            let stem = item.rich_html.trim();
            if stem.is_empty() {
                continue;
            }
            let nested = match &item.nested {
                Some(n) => n,
                None => continue,
            };

            let local_index = questions.len();
            let abs_index = id_offset + local_index;
            let answers: Vec<Answer> = nested
                .items
                .iter()
                .enumerate()
                .map(|(answer_index, answer_item)| Answer {
                    id: format!("doc_q{}_a{}", abs_index, answer_index),
                    text: strip_emphasis_tags(&answer_item.rich_html)
                        .trim()
                        .to_string(),
                    fraction: if answer_item.emphasized { 100.0 } else { 0.0 },
                    feedback: None,
                })
                .collect();
            if answers.is_empty() {
                continue;
            }

            debug!("  识别选择题: {} 个选项", answers.len());
            questions.push(Question {
                id: format!("doc_q_{}_{}", ts, abs_index),
                name: format!("سؤال {}", local_index + 1),
                text: stem.to_string(),
                source_type: "multichoice".to_string(),
                visual_type: Some(VisualType::Multichoice),
                layout: Some(Layout::Columns),
                mark: 1.0,
                answers,
                essay_lines: Some(3),
                correct_answer_text: Some(String::new()),
            });
        }
    }

    /// 普通段落成题:按下划线/填充符判填空,按题干末尾的 *N 定论述行数
    fn build_paragraph_question(
        &self,
        raw_text: &str,
        inline_answer: Option<String>,
        mark: f64,
        local_index: usize,
        id_offset: usize,
        ts: i64,
    ) -> Question {
        let abs_index = id_offset + local_index;
        let multi_line_answer = inline_answer.unwrap_or_default();
        let is_shortanswer = raw_text.contains('_') || self.tatweel_re.is_match(raw_text);

        if is_shortanswer {
            // 题干末尾的 (إجابة) 注解是行内参考答案,优先于多行答案块
            let (display_text, inline_correct) = match self.paren_re.captures(raw_text) {
                Some(caps) => match (caps.get(0), caps.get(1)) {
                    (Some(whole), Some(inner)) => (
                        raw_text[..whole.start()].trim().to_string(),
                        inner.as_str().trim().to_string(),
                    ),
                    _ => (raw_text.to_string(), String::new()),
                },
                None => (raw_text.to_string(), String::new()),
            };
            let final_answer = if inline_correct.is_empty() {
                multi_line_answer
            } else {
                inline_correct
            };
            let answer_text = if final_answer.is_empty() {
                SHORTANSWER_PLACEHOLDER.to_string()
            } else {
                final_answer.clone()
            };

            Question {
                id: format!("doc_q_{}_{}", ts, abs_index),
                name: format!("سؤال {}", local_index + 1),
                text: display_text,
                source_type: "shortanswer".to_string(),
                visual_type: Some(VisualType::Shortanswer),
                layout: Some(Layout::Full),
                mark,
                answers: vec![Answer {
                    id: "a1".to_string(),
                    text: answer_text,
                    fraction: 100.0,
                    feedback: None,
                }],
                essay_lines: None,
                correct_answer_text: Some(final_answer),
            }
        } else {
            let (display_text, essay_lines) = match self.essay_re.captures(raw_text) {
                Some(caps) => match (caps.get(1), caps.get(2)) {
                    (Some(stem), Some(digits)) => (
                        stem.as_str().trim().to_string(),
                        normalize_digits(digits.as_str())
                            .parse::<u32>()
                            .ok()
                            .filter(|&n| n > 0)
                            .unwrap_or(3),
                    ),
                    _ => (raw_text.to_string(), 3),
                },
                None => (raw_text.to_string(), 3),
            };
            let correct = if multi_line_answer.is_empty() {
                ESSAY_PLACEHOLDER.to_string()
            } else {
                multi_line_answer
            };

            Question {
                id: format!("doc_q_{}_{}", ts, abs_index),
                name: format!("سؤال {}", local_index + 1),
                text: display_text,
                source_type: "essay".to_string(),
                visual_type: Some(VisualType::Essay),
                layout: Some(Layout::Full),
                mark,
                answers: Vec::new(),
                essay_lines: Some(essay_lines),
                correct_answer_text: Some(correct),
            }
        }
    }
}

// ========== 前瞻辅助函数 ==========

/// 尝试消费紧随题干的 ("...")  多行答案块
///
/// 下一个非空块必须是以 (" 开头的段落;从它起逐段收集,直到
/// 某段以 ") 结尾才算完整。中途碰到空白、列表或文档结尾时整个
/// 前瞻作废,主游标原地不动。
fn take_inline_answer(cursor: &mut BlockCursor) -> Option<String> {
    let mut probe = cursor.clone();
    probe.skip_blank();

    match probe.peek() {
        Some(DocBlock::Paragraph(p)) if p.text.starts_with("(\"") => {}
        _ => return None,
    }

    let mut collected = String::new();
    loop {
        match probe.peek() {
            Some(DocBlock::Paragraph(p)) if !p.text.is_empty() => {
                collected.push_str(&p.text);
                collected.push('\n');
                probe.advance();
                if p.text.ends_with("\")") {
                    *cursor = probe;
                    return Some(strip_answer_wrapper(&collected));
                }
            }
            _ => return None,
        }
    }
}

/// 去掉答案块的 (" 前缀和 ") 后缀
fn strip_answer_wrapper(collected: &str) -> String {
    let trimmed = collected.trim();
    let trimmed = trimmed.strip_prefix("(\"").unwrap_or(trimmed);
    let trimmed = trimmed.strip_suffix("\")").unwrap_or(trimmed);
    trimmed.trim().to_string()
}

/// 尝试消费独立的分数行
///
/// 下一个非空块必须是纯数字段落(阿拉伯数字也算)且数值大于零,
/// 否则什么都不消费。像 "١٠ درجات" 这样带单位的行不算分数行。
fn take_mark_line(cursor: &mut BlockCursor) -> Option<f64> {
    let mut probe = cursor.clone();
    probe.skip_blank();

    let text = match probe.peek() {
        Some(DocBlock::Paragraph(p)) if !p.text.is_empty() => p.text.as_str(),
        _ => return None,
    };

    let converted = normalize_digits(text);
    if converted.is_empty() || !converted.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let mark: f64 = converted.parse().ok()?;
    if mark <= 0.0 {
        return None;
    }

    probe.advance();
    *cursor = probe;
    Some(mark)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::block::{DocListItem, DocParagraph};

    fn para(text: &str) -> DocBlock {
        DocBlock::Paragraph(DocParagraph {
            text: text.to_string(),
            rich_html: text.to_string(),
        })
    }

    fn blank() -> DocBlock {
        para("")
    }

    fn item(rich_html: &str, emphasized: bool, nested: Option<DocList>) -> DocListItem {
        DocListItem {
            rich_html: rich_html.to_string(),
            text: strip_emphasis_tags(rich_html).trim().to_string(),
            emphasized,
            nested,
        }
    }

    fn mcq_list() -> DocBlock {
        let options = DocList {
            ordered: false,
            items: vec![
                item("<strong>القاهرة</strong>", true, None),
                item("الرياض", false, None),
                item("بغداد", false, None),
            ],
        };
        DocBlock::List(DocList {
            ordered: true,
            items: vec![item("ما عاصمة مصر؟", false, Some(options))],
        })
    }

    fn extractor() -> WordExtractor {
        WordExtractor::new().expect("正则应该能编译")
    }

    #[test]
    fn list_item_with_nested_options_becomes_multichoice() {
        let blocks = vec![mcq_list()];
        let questions = extractor().extract(&blocks, 0).expect("提取应该成功");

        assert_eq!(questions.len(), 1);
        let q = &questions[0];
        assert!(q.id.starts_with("doc_q_"));
        assert_eq!(q.name, "سؤال 1");
        assert_eq!(q.source_type, "multichoice");
        assert_eq!(q.layout, Some(Layout::Columns));
        assert_eq!(q.mark, 1.0);
        assert_eq!(q.essay_lines, Some(3));
        assert_eq!(q.correct_answer_text.as_deref(), Some(""));

        assert_eq!(q.answers.len(), 3);
        assert_eq!(q.answers[0].id, "doc_q0_a0");
        assert_eq!(q.answers[0].text, "القاهرة"); // 加粗标签被剥掉
        assert_eq!(q.answers[0].fraction, 100.0);
        assert_eq!(q.answers[1].fraction, 0.0);
    }

    #[test]
    fn list_item_without_options_is_skipped() {
        let list = DocBlock::List(DocList {
            ordered: true,
            items: vec![
                item("عنوان بدون خيارات", false, None),
                item(
                    "ما عاصمة مصر؟",
                    false,
                    Some(DocList {
                        ordered: false,
                        items: vec![item("القاهرة", true, None), item("الرياض", false, None)],
                    }),
                ),
            ],
        });
        let questions = extractor().extract(&[list], 0).expect("提取应该成功");
        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].name, "سؤال 1");
    }

    #[test]
    fn underscore_paragraph_with_annotation_becomes_shortanswer() {
        let blocks = vec![para("عاصمة فرنسا هي ____ (باريس)")];
        let questions = extractor().extract(&blocks, 0).expect("提取应该成功");

        let q = &questions[0];
        assert_eq!(q.source_type, "shortanswer");
        assert_eq!(q.text, "عاصمة فرنسا هي ____");
        assert_eq!(q.correct_answer_text.as_deref(), Some("باريس"));
        assert_eq!(q.layout, Some(Layout::Full));
        assert_eq!(q.essay_lines, None);
        assert_eq!(q.answers.len(), 1);
        assert_eq!(q.answers[0].id, "a1");
        assert_eq!(q.answers[0].text, "باريس");
        assert_eq!(q.answers[0].fraction, 100.0);
    }

    #[test]
    fn tatweel_fill_marks_shortanswer_with_placeholder() {
        let blocks = vec![para("أكمل: عاصمة العراق ـــــــ")];
        let questions = extractor().extract(&blocks, 0).expect("提取应该成功");

        let q = &questions[0];
        assert_eq!(q.source_type, "shortanswer");
        assert_eq!(q.correct_answer_text.as_deref(), Some(""));
        assert_eq!(q.answers[0].text, SHORTANSWER_PLACEHOLDER);
    }

    #[test]
    fn star_suffix_sets_essay_line_count() {
        let blocks = vec![para("اشرح دورة الماء في الطبيعة *٥")];
        let questions = extractor().extract(&blocks, 0).expect("提取应该成功");

        let q = &questions[0];
        assert_eq!(q.source_type, "essay");
        assert_eq!(q.text, "اشرح دورة الماء في الطبيعة");
        assert_eq!(q.essay_lines, Some(5));
        assert!(q.answers.is_empty());
        assert_eq!(q.correct_answer_text.as_deref(), Some(ESSAY_PLACEHOLDER));
    }

    #[test]
    fn essay_without_marker_defaults_to_three_lines() {
        let blocks = vec![para("اشرح أهمية الماء"), para("تحدث عن النيل *0")];
        let questions = extractor().extract(&blocks, 0).expect("提取应该成功");

        assert_eq!(questions[0].essay_lines, Some(3));
        // *0 不是合法行数,回落到 3
        assert_eq!(questions[1].essay_lines, Some(3));
        assert_eq!(questions[1].text, "تحدث عن النيل");
    }

    #[test]
    fn multi_line_answer_block_is_consumed() {
        let blocks = vec![
            para("اشرح أهمية الشمس"),
            blank(),
            para("(\"الشمس مصدر الطاقة"),
            para("والضوء والحرارة\")"),
            blank(),
            para("5"),
            para("سؤال تال"),
        ];
        let questions = extractor().extract(&blocks, 0).expect("提取应该成功");

        assert_eq!(questions.len(), 2);
        let q = &questions[0];
        assert_eq!(
            q.correct_answer_text.as_deref(),
            Some("الشمس مصدر الطاقة\nوالضوء والحرارة")
        );
        assert_eq!(q.mark, 5.0);
        assert_eq!(questions[1].text, "سؤال تال");
        assert_eq!(questions[1].mark, 1.0);
    }

    #[test]
    fn unterminated_answer_block_consumes_nothing() {
        let blocks = vec![
            para("اشرح أهمية الماء"),
            blank(),
            para("(\"بداية بدون نهاية"),
            blank(),
            para("سؤال آخر"),
        ];
        let questions = extractor().extract(&blocks, 0).expect("提取应该成功");

        // 未闭合的答案块被当作孤立行跳过,后面的段落照常成题
        assert_eq!(questions.len(), 2);
        assert_eq!(
            questions[0].correct_answer_text.as_deref(),
            Some(ESSAY_PLACEHOLDER)
        );
        assert_eq!(questions[1].text, "سؤال آخر");
    }

    #[test]
    fn bare_numeral_line_is_a_mark_but_annotated_one_is_not() {
        let blocks = vec![para("اشرح أهمية الماء"), blank(), para("١٠")];
        let questions = extractor().extract(&blocks, 0).expect("提取应该成功");
        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].mark, 10.0);

        // 带单位的数字行不是分数行,自己成题
        let blocks = vec![para("اشرح أهمية الماء"), para("١٠ درجات")];
        let questions = extractor().extract(&blocks, 0).expect("提取应该成功");
        assert_eq!(questions.len(), 2);
        assert_eq!(questions[0].mark, 1.0);
        assert_eq!(questions[1].text, "١٠ درجات");
    }

    #[test]
    fn orphan_answer_opening_is_skipped() {
        let blocks = vec![para("(\"إجابة يتيمة\")"), para("سؤال حقيقي")];
        let questions = extractor().extract(&blocks, 0).expect("提取应该成功");
        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].text, "سؤال حقيقي");
        assert_eq!(questions[0].name, "سؤال 1");
    }

    #[test]
    fn id_offset_shifts_ids_but_not_names() {
        let blocks = vec![mcq_list()];
        let questions = extractor().extract(&blocks, 7).expect("提取应该成功");

        let q = &questions[0];
        assert!(q.id.ends_with("_7"));
        assert_eq!(q.answers[0].id, "doc_q7_a0");
        assert_eq!(q.name, "سؤال 1");
    }

    #[test]
    fn no_recognizable_questions_is_an_error() {
        let err = extractor()
            .extract(&[blank(), blank()], 0)
            .expect_err("应该报没有题目");
        assert!(matches!(
            err,
            AppError::Parse(ParseError::NoQuestionsFound)
        ));
    }
}
