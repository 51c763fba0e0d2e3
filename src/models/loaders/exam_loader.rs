//! 试卷项目文件加载器
//!
//! exam.toml 描述文件、项目 JSON、试卷版本 JSON 的读写,
//! 以及题目源文件(.docx / .xml)的扫描。

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::error::AppError;
use crate::models::exam::{ExamDetails, ExamStyle, ExamVersion, GenerationSettings};
use crate::models::project::ExamProject;

/// 试卷描述文件(exam.toml)的内容
///
/// 三个段落都可以缺省,键名与项目 JSON 保持一致(camelCase)。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExamFile {
    pub details: ExamDetails,
    pub style: ExamStyle,
    pub generation: GenerationSettings,
}

/// 读取试卷描述文件
pub async fn load_exam_file(path: &Path) -> Result<ExamFile> {
    let content = fs::read_to_string(path)
        .await
        .with_context(|| format!("无法读取试卷描述文件: {}", path.display()))?;

    let exam: ExamFile = toml::from_str(&content)
        .with_context(|| format!("无法解析试卷描述文件: {}", path.display()))?;

    Ok(exam)
}

/// 读取项目 JSON 文件
pub async fn load_project(path: &Path) -> Result<ExamProject> {
    let content = fs::read_to_string(path)
        .await
        .with_context(|| format!("无法读取项目文件: {}", path.display()))?;

    let project: ExamProject = serde_json::from_str(&content)
        .map_err(AppError::from)
        .with_context(|| format!("无法解析项目文件: {}", path.display()))?;

    Ok(project)
}

/// 写出项目 JSON 文件
pub async fn save_project(path: &Path, project: &ExamProject) -> Result<()> {
    let json = serde_json::to_string_pretty(project).context("项目序列化失败")?;
    fs::write(path, json)
        .await
        .with_context(|| format!("无法写入项目文件: {}", path.display()))?;
    Ok(())
}

/// 写出试卷版本 JSON 文件
pub async fn save_versions(path: &Path, versions: &[ExamVersion]) -> Result<()> {
    let json = serde_json::to_string_pretty(versions).context("试卷版本序列化失败")?;
    fs::write(path, json)
        .await
        .with_context(|| format!("无法写入试卷版本文件: {}", path.display()))?;
    Ok(())
}

/// 扫描文件夹中的题目源文件
///
/// 只认 .docx 和 .xml(大小写不敏感),按文件名排序保证导入顺序稳定。
pub async fn scan_source_files(folder_path: &str) -> Result<Vec<PathBuf>> {
    let folder = PathBuf::from(folder_path);

    if !folder.exists() {
        anyhow::bail!("文件夹不存在: {}", folder_path);
    }

    let mut files = Vec::new();
    let mut entries = fs::read_dir(&folder)
        .await
        .with_context(|| format!("无法读取文件夹: {}", folder_path))?;

    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .map(|s| s.to_ascii_lowercase());
        if matches!(ext.as_deref(), Some("docx") | Some("xml")) {
            files.push(path);
        }
    }

    files.sort();
    Ok(files)
}
