use crate::config::Config;
use crate::models::loaders::{
    load_exam_file, load_project, save_project, save_versions, scan_source_files,
};
use crate::models::{
    group_for_display, section_ordinal, ExamDetails, ExamProject, ExamStyle, GenerationSettings,
    QuestionBank,
};
use crate::services::{VersionGenerator, VersionRequest};
use crate::utils::logging;
use crate::workflow::{ImportFlow, ImportOutcome};
use anyhow::{Context, Result};
use chrono::Utc;
use std::path::Path;
use tokio::fs;
use tracing::{debug, error, info, warn};

/// 应用主结构
pub struct App {
    config: Config,
    details: ExamDetails,
    style: ExamStyle,
    settings: GenerationSettings,
    bank: QuestionBank,
}

impl App {
    /// 初始化应用
    pub async fn initialize(config: Config) -> Result<Self> {
        // 初始化日志文件
        logging::init_log_file(&config.output_log_file)?;
        logging::log_startup(&config.input_folder, &config.exam_file);

        let mut details = ExamDetails::default();
        let mut style = ExamStyle::default();
        let mut settings = GenerationSettings::default();
        let mut bank = QuestionBank::new();

        // 从上次导出的工程文件恢复题库
        if !config.project_file.is_empty() {
            let project = load_project(Path::new(&config.project_file)).await?;
            info!(
                "📦 从工程文件恢复 {} 道题目: {}",
                project.questions.len(),
                config.project_file
            );
            details = project.details;
            style = project.style;
            bank.replace_all(project.questions);
        }

        // 试卷描述文件优先级高于工程文件里存的卷头与样式
        if Path::new(&config.exam_file).exists() {
            let exam_file = load_exam_file(Path::new(&config.exam_file)).await?;
            details = exam_file.details;
            style = exam_file.style;
            settings = exam_file.generation;
        } else {
            info!("💡 没有找到试卷描述文件 {},使用默认卷头与样式", config.exam_file);
        }

        Ok(Self {
            config,
            details,
            style,
            settings,
            bank,
        })
    }

    /// 运行应用主逻辑
    pub async fn run(mut self) -> Result<()> {
        // 扫描题目源文件
        info!("\n📁 正在扫描题目文件...");
        let files = scan_source_files(&self.config.input_folder).await?;

        if files.is_empty() {
            warn!("⚠️ 没有找到可导入的文件(.docx / .xml),程序结束");
            return Ok(());
        }
        logging::log_files_found(files.len());

        // 逐个导入,单个文件失败不影响其余文件
        let flow = ImportFlow::new(&self.config)?;
        let mut stats = SessionStats {
            total_files: files.len(),
            ..Default::default()
        };

        for path in &files {
            let file_name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string());

            match flow.process_file(path, self.bank.len()).await {
                Ok(ImportOutcome::Imported(questions)) => {
                    logging::log_file_imported(&file_name, questions.len());
                    stats.files_imported += 1;
                    stats.questions_imported += questions.len();
                    self.bank.append(questions);
                }
                Ok(ImportOutcome::Skipped { reason }) => {
                    warn!("⚠️ 跳过 {}: {}", file_name, reason);
                    stats.files_skipped += 1;
                }
                Err(e) => {
                    error!("❌ 处理 {} 时发生错误: {}", file_name, e);
                    stats.files_skipped += 1;
                }
            }
        }

        info!(
            "✓ 导入完成: {}/{} 个文件,共 {} 道题",
            stats.files_imported, stats.total_files, stats.questions_imported
        );

        if self.bank.is_empty() {
            warn!("⚠️ 所有文件都没能导入题目,程序结束");
            return Ok(());
        }

        // 应用生成设置里的整理选项
        if self.settings.shuffle_questions {
            info!("🔀 打乱题目顺序");
            self.bank.shuffle_questions();
        }
        if self.settings.shuffle_answers {
            info!("🔀 打乱选择题的选项顺序");
            self.bank.shuffle_answers();
        }
        if self.settings.group_by_type {
            info!("📑 按题型归组");
            self.bank.group_by_type();
        }

        let counts = self.bank.type_counts();
        info!(
            "📊 题库统计: 选择题 {} / 论述题 {} / 填空题 {}",
            counts.mcq, counts.essay, counts.short
        );

        fs::create_dir_all(&self.config.output_folder)
            .await
            .with_context(|| format!("无法创建输出目录: {}", self.config.output_folder))?;

        // 先落盘工程文件,组卷失败也不丢已导入的题
        let project = ExamProject {
            details: self.details.clone(),
            style: self.style.clone(),
            questions: self.bank.questions().to_vec(),
            exported_at: Some(Utc::now().format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()),
        };
        let project_path = Path::new(&self.config.output_folder).join("project.json");
        save_project(&project_path, &project).await?;
        info!("💾 工程文件已保存: {}", project_path.display());

        // 组卷
        let request = VersionRequest {
            count: self.settings.version_count,
            mcq_count: self.settings.mcq_count.unwrap_or(counts.mcq),
            essay_count: self.settings.essay_count.unwrap_or(counts.essay),
            short_count: self.settings.short_count.unwrap_or(counts.short),
        };
        let versions = VersionGenerator::new().generate(&self.bank, &request)?;

        if self.config.verbose_logging {
            for version in &versions {
                let sections = group_for_display(&version.questions);
                for (i, section) in sections.iter().enumerate() {
                    debug!(
                        "  版本 {} 第 {} 部分: {} ({} 道题)",
                        version.label,
                        section_ordinal(i),
                        section.instruction(),
                        section.questions.len()
                    );
                }
            }
        }

        let versions_path = Path::new(&self.config.output_folder).join("versions.json");
        save_versions(&versions_path, &versions).await?;
        info!("💾 试卷版本已保存: {}", versions_path.display());

        stats.versions_generated = versions.len();
        logging::print_final_stats(
            stats.files_imported,
            stats.files_skipped,
            self.bank.len(),
            stats.versions_generated,
            &self.config.output_log_file,
        );

        Ok(())
    }
}

/// 会话统计
#[derive(Debug, Default)]
struct SessionStats {
    total_files: usize,
    files_imported: usize,
    files_skipped: usize,
    questions_imported: usize,
    versions_generated: usize,
}
