//! 项目文件模型
//!
//! 导出/导入的 JSON 项目文件,一个文件承载整场考试的状态。

use serde::{Deserialize, Serialize};

use crate::models::exam::{ExamDetails, ExamStyle};
use crate::models::question::Question;

/// 完整的考试项目:试卷头信息、版式与题库
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExamProject {
    pub details: ExamDetails,
    pub style: ExamStyle,
    pub questions: Vec<Question>,
    /// 导出时间,ISO-8601 格式,导入时可缺失
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exported_at: Option<String>,
}
