//! 文件导入流程 - 流程层
//!
//! 核心职责:定义"一个文件"的完整导入流程
//!
//! 流程顺序:
//! 1. 按扩展名选解析路径(.docx / .xml)
//! 2. 读文件 → 归一化/解析 → 提取题目
//! 3. 解析类失败按跳过处理,不打断整个批次

use std::path::Path;

use anyhow::{Context, Result};
use tokio::fs;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::models::question::Question;
use crate::services::{DocxReader, MoodleExtractor, WordExtractor};

/// 单个文件的导入结果
#[derive(Debug, Clone, PartialEq)]
pub enum ImportOutcome {
    /// 导入成功,附提取出的题目
    Imported(Vec<Question>),
    /// 跳过(解析失败或类型不支持)
    Skipped { reason: String },
}

/// 文件导入流程

/// - 编排单个文件从字节到题目的全过程
/// - 决定哪些失败是跳过、哪些失败要中断
/// - 不持有题库,提取出的题目交还编排层合并
pub struct ImportFlow {
    docx_reader: DocxReader,
    word_extractor: WordExtractor,
    moodle_extractor: MoodleExtractor,
    verbose_logging: bool,
}

impl ImportFlow {
    /// 创建新的导入流程
    pub fn new(config: &Config) -> AppResult<Self> {
        Ok(Self {
            docx_reader: DocxReader::new(),
            word_extractor: WordExtractor::new()?,
            moodle_extractor: MoodleExtractor::new(),
            verbose_logging: config.verbose_logging,
        })
    }

    /// 处理一个源文件
    ///
    /// `id_offset` 传当前题库的题目数,保证跨文件的题目 ID 不冲突。
    /// IO 错误向上抛;解析错误转成 [`ImportOutcome::Skipped`]。
    pub async fn process_file(&self, path: &Path, id_offset: usize) -> Result<ImportOutcome> {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let extension = path
            .extension()
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();

        let parsed = if extension == "docx" {
            info!("[文件 {}] 🔍 解析 Word 文档...", file_name);
            let data = fs::read(path)
                .await
                .with_context(|| format!("无法读取文件: {}", path.display()))?;
            self.docx_reader
                .read(&data)
                .and_then(|blocks| self.word_extractor.extract(&blocks, id_offset))
        } else if extension == "xml" {
            info!("[文件 {}] 🔍 解析 Moodle XML...", file_name);
            let content = fs::read_to_string(path)
                .await
                .with_context(|| format!("无法读取文件: {}", path.display()))?;
            self.moodle_extractor.extract(&content, id_offset)
        } else {
            return Ok(ImportOutcome::Skipped {
                reason: "不支持的文件类型".to_string(),
            });
        };

        match parsed {
            Ok(questions) => {
                if self.verbose_logging {
                    for question in &questions {
                        debug!("[文件 {}]   {}", file_name, question);
                    }
                }
                Ok(ImportOutcome::Imported(questions))
            }
            // 单个文件解析失败不致命,跳过让批次继续
            Err(AppError::Parse(e)) => {
                warn!("[文件 {}] ⚠️ 解析失败: {}", file_name, e);
                Ok(ImportOutcome::Skipped {
                    reason: e.to_string(),
                })
            }
            Err(e) => Err(e.into()),
        }
    }
}
