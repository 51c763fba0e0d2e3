//! 试卷版本生成器
//!
//! 把题库按题型切成三个池子,每个版本对每个池子独立乱序后抽取配额,
//! 按 选择题、论述题、填空题 的顺序拼出该版本的题目序列。

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, info};

use crate::error::{AppError, AppResult, GenerateError};
use crate::models::bank::QuestionBank;
use crate::models::exam::ExamVersion;
use crate::models::question::{Question, VisualType};

/// 单次生成请求:版本数和各题型配额
#[derive(Debug, Clone, Copy)]
pub struct VersionRequest {
    pub count: usize,
    pub mcq_count: usize,
    pub essay_count: usize,
    pub short_count: usize,
}

/// 试卷版本生成器
pub struct VersionGenerator;

impl VersionGenerator {
    pub fn new() -> Self {
        Self
    }

    /// 生成 `request.count` 个版本
    ///
    /// 版本字母从 A 起步最多到 Z,版本数限制在 [1, 26]。
    /// 配额超过池子容量时按池子全量截断,同一版本内不会重复抽题。
    pub fn generate(
        &self,
        bank: &QuestionBank,
        request: &VersionRequest,
    ) -> AppResult<Vec<ExamVersion>> {
        if request.count == 0 || request.count > 26 {
            return Err(AppError::invalid_version_count(request.count));
        }
        if request.mcq_count == 0 && request.essay_count == 0 && request.short_count == 0 {
            return Err(GenerateError::EmptyQuotas.into());
        }

        let mcqs: Vec<&Question> = bank
            .questions()
            .iter()
            .filter(|q| q.visual() == VisualType::Multichoice)
            .collect();
        let essays: Vec<&Question> = bank
            .questions()
            .iter()
            .filter(|q| q.visual() == VisualType::Essay)
            .collect();
        let shorts: Vec<&Question> = bank
            .questions()
            .iter()
            .filter(|q| q.visual() == VisualType::Shortanswer)
            .collect();

        let mut rng = rand::thread_rng();
        let mut versions = Vec::with_capacity(request.count);
        for i in 0..request.count {
            let questions = [
                draw(&mcqs, request.mcq_count, &mut rng),
                draw(&essays, request.essay_count, &mut rng),
                draw(&shorts, request.short_count, &mut rng),
            ]
            .concat();
            let label = char::from(b'A' + i as u8).to_string();
            debug!("  版本 {}: {} 道题", label, questions.len());
            versions.push(ExamVersion {
                id: format!("v{}", i),
                label,
                questions,
            });
        }

        info!("📦 生成 {} 个试卷版本", versions.len());
        Ok(versions)
    }
}

impl Default for VersionGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// 从池子里乱序抽取最多 `quota` 道题
fn draw(pool: &[&Question], quota: usize, rng: &mut impl Rng) -> Vec<Question> {
    let mut shuffled = pool.to_vec();
    shuffled.shuffle(rng);
    shuffled.into_iter().take(quota).cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn question(id: &str, kind: VisualType) -> Question {
        Question {
            id: id.to_string(),
            name: format!("سؤال {}", id),
            text: "نص السؤال".to_string(),
            source_type: "multichoice".to_string(),
            visual_type: Some(kind),
            layout: None,
            mark: 1.0,
            answers: Vec::new(),
            essay_lines: None,
            correct_answer_text: None,
        }
    }

    fn sample_bank() -> QuestionBank {
        QuestionBank::from_questions(vec![
            question("s1", VisualType::Shortanswer),
            question("m1", VisualType::Multichoice),
            question("e1", VisualType::Essay),
            question("m2", VisualType::Multichoice),
        ])
    }

    #[test]
    fn labels_and_ids_run_from_a() {
        let request = VersionRequest {
            count: 3,
            mcq_count: 2,
            essay_count: 1,
            short_count: 1,
        };
        let versions = VersionGenerator::new()
            .generate(&sample_bank(), &request)
            .expect("生成应该成功");

        assert_eq!(versions.len(), 3);
        assert_eq!(versions[0].id, "v0");
        assert_eq!(versions[0].label, "A");
        assert_eq!(versions[2].label, "C");
    }

    #[test]
    fn versions_group_types_in_fixed_order() {
        let request = VersionRequest {
            count: 1,
            mcq_count: 2,
            essay_count: 1,
            short_count: 1,
        };
        let versions = VersionGenerator::new()
            .generate(&sample_bank(), &request)
            .expect("生成应该成功");

        let kinds: Vec<VisualType> = versions[0].questions.iter().map(|q| q.visual()).collect();
        assert_eq!(
            kinds,
            vec![
                VisualType::Multichoice,
                VisualType::Multichoice,
                VisualType::Essay,
                VisualType::Shortanswer,
            ]
        );
    }

    #[test]
    fn quota_beyond_pool_size_does_not_duplicate() {
        let request = VersionRequest {
            count: 1,
            mcq_count: 10,
            essay_count: 0,
            short_count: 0,
        };
        let versions = VersionGenerator::new()
            .generate(&sample_bank(), &request)
            .expect("生成应该成功");

        let ids: HashSet<&str> = versions[0].questions.iter().map(|q| q.id.as_str()).collect();
        assert_eq!(versions[0].questions.len(), 2);
        assert_eq!(ids.len(), 2);
    }

    #[test]
    fn all_zero_quotas_are_rejected() {
        let request = VersionRequest {
            count: 1,
            mcq_count: 0,
            essay_count: 0,
            short_count: 0,
        };
        let err = VersionGenerator::new()
            .generate(&sample_bank(), &request)
            .expect_err("应该拒绝全零配额");
        assert!(matches!(err, AppError::Generate(GenerateError::EmptyQuotas)));
    }

    #[test]
    fn version_count_outside_range_is_rejected() {
        let generator = VersionGenerator::new();
        for count in [0, 27] {
            let request = VersionRequest {
                count,
                mcq_count: 1,
                essay_count: 0,
                short_count: 0,
            };
            let err = generator
                .generate(&sample_bank(), &request)
                .expect_err("应该拒绝越界的版本数");
            assert!(matches!(
                err,
                AppError::Generate(GenerateError::InvalidVersionCount { .. })
            ));
        }
    }
}
