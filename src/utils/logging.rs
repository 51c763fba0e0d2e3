use anyhow::Result;
/// 日志工具模块
///
/// 提供日志格式化和输出的辅助函数
use std::fs;
use tracing::info;

/// 初始化日志文件
///
/// # 参数
/// - `log_file_path`: 日志文件路径
///
/// # 返回
/// 返回是否成功初始化
pub fn init_log_file(log_file_path: &str) -> Result<()> {
    let log_header = format!(
        "{}\n试卷生成日志 - {}\n{}\n\n",
        "=".repeat(60),
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        "=".repeat(60)
    );
    fs::write(log_file_path, log_header)?;
    Ok(())
}

/// 记录程序启动信息
///
/// # 参数
/// - `input_folder`: 题目文件所在文件夹
/// - `exam_file`: 试卷描述文件路径
pub fn log_startup(input_folder: &str, exam_file: &str) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 试卷版本生成模式");
    info!("📁 题目文件夹: {}", input_folder);
    info!("📋 试卷描述文件: {}", exam_file);
    info!("{}", "=".repeat(60));
}

/// 记录找到的题目文件信息
///
/// # 参数
/// - `total`: 文件总数
pub fn log_files_found(total: usize) {
    info!("✓ 找到 {} 个待导入的文件", total);
    info!("💡 文件将按名称顺序依次导入\n");
}

/// 记录单个文件导入完成
///
/// # 参数
/// - `file_name`: 文件名
/// - `count`: 导入的题目数量
pub fn log_file_imported(file_name: &str, count: usize) {
    info!("✓ [{}] 导入 {} 道题目", file_name, count);
}

/// 打印最终统计信息
///
/// # 参数
/// - `imported`: 成功导入的文件数
/// - `skipped`: 跳过的文件数
/// - `question_count`: 题库中的题目总数
/// - `version_count`: 生成的试卷版本数
/// - `log_file_path`: 日志文件路径
pub fn print_final_stats(
    imported: usize,
    skipped: usize,
    question_count: usize,
    version_count: usize,
    log_file_path: &str,
) {
    info!("\n{}", "=".repeat(60));
    info!("📊 全部处理完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("✅ 导入文件: {} 个 (跳过 {} 个)", imported, skipped);
    info!("📦 题库题目: {} 道", question_count);
    info!("📄 试卷版本: {} 个", version_count);
    info!("{}", "=".repeat(60));
    info!("\n日志已保存至: {}", log_file_path);
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
