//! # Exam Version Generator
//!
//! 一个从 Word / Moodle 题库生成多版本试卷的 Rust 应用程序
//!
//! ## 架构设计
//!
//! 本系统采用严格的四层架构：
//!
//! ### ① 模型层（Models）
//! - `models/` - 题目、试卷、题库的数据结构与序列化规则
//! - `QuestionBank` - 内存题库,负责乱序/归组/人工录入
//! - `models/loaders` - TOML 试卷描述与 JSON 工程文件的读写
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，每个能力独立可测
//! - `DocxReader` - 把 .docx 归一化成文档块序列
//! - `WordExtractor` / `MoodleExtractor` - 从文档块 / XML 提取题目
//! - `VersionGenerator` - 按配额抽题生成 A/B/C... 版本
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一个文件"的完整导入流程
//! - `ImportFlow` - 按扩展名分发解析路径,解析失败转为跳过
//!
//! ### ④ 编排层（Orchestration）
//! - `app` - 加载配置与试卷描述,遍历文件导入,落盘工程与版本
//!
//! ## 模块结构

pub mod app;
pub mod config;
pub mod error;
pub mod logger;

pub mod models;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use app::App;
pub use config::Config;
pub use error::{AppError, AppResult, BankError, FileError, GenerateError, ParseError};
pub use models::question::{Answer, Question, VisualType};
pub use models::{ExamDetails, ExamProject, ExamStyle, ExamVersion, GenerationSettings, QuestionBank};
pub use services::{DocxReader, MoodleExtractor, VersionGenerator, VersionRequest, WordExtractor};
pub use workflow::{ImportFlow, ImportOutcome};
