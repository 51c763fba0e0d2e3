/// 程序配置文件
#[derive(Clone, Debug)]
pub struct Config {
    /// 题目源文件所在目录
    pub input_folder: String,
    /// 生成结果输出目录
    pub output_folder: String,
    /// 试卷描述文件(TOML)
    pub exam_file: String,
    /// 已导出工程文件(JSON),为空表示不加载
    pub project_file: String,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    /// 输出日志文件
    pub output_log_file: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input_folder: "exam_docs".to_string(),
            output_folder: "output".to_string(),
            exam_file: "exam.toml".to_string(),
            project_file: String::new(),
            verbose_logging: false,
            output_log_file: "output.txt".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            input_folder: std::env::var("INPUT_FOLDER").unwrap_or(default.input_folder),
            output_folder: std::env::var("OUTPUT_FOLDER").unwrap_or(default.output_folder),
            exam_file: std::env::var("EXAM_FILE").unwrap_or(default.exam_file),
            project_file: std::env::var("PROJECT_FILE").unwrap_or(default.project_file),
            verbose_logging: std::env::var("VERBOSE_LOGGING").ok().and_then(|v| v.parse().ok()).unwrap_or(default.verbose_logging),
            output_log_file: std::env::var("OUTPUT_LOG_FILE").unwrap_or(default.output_log_file),
        }
    }
}
