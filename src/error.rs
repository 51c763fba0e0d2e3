use std::fmt;

/// 应用程序错误类型
#[derive(Debug)]
pub enum AppError {
    /// 文档解析错误
    Parse(ParseError),
    /// 题库操作错误
    Bank(BankError),
    /// 组卷错误
    Generate(GenerateError),
    /// 文件操作错误
    File(FileError),
    /// 其他错误（用于包装第三方库错误）
    Other(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Parse(e) => write!(f, "解析错误: {}", e),
            AppError::Bank(e) => write!(f, "题库错误: {}", e),
            AppError::Generate(e) => write!(f, "组卷错误: {}", e),
            AppError::File(e) => write!(f, "文件错误: {}", e),
            AppError::Other(msg) => write!(f, "错误: {}", msg),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Parse(e) => Some(e),
            AppError::Bank(e) => Some(e),
            AppError::Generate(e) => Some(e),
            AppError::File(e) => Some(e),
            AppError::Other(_) => None,
        }
    }
}

/// 文档解析错误
#[derive(Debug)]
pub enum ParseError {
    /// 文档容器无法打开（损坏或不是有效的 docx）
    UnreadableDocument {
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 文档内容为空
    EmptyDocument,
    /// XML 内容无法解析
    UnreadableXml {
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 文档中没有可识别的题目
    NoQuestionsFound,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::UnreadableDocument { source } => {
                write!(f, "文档无法读取: {}", source)
            }
            ParseError::EmptyDocument => write!(f, "文档为空或无法读取"),
            ParseError::UnreadableXml { source } => {
                write!(f, "XML解析失败: {}", source)
            }
            ParseError::NoQuestionsFound => write!(f, "文件中没有找到有效的题目"),
        }
    }
}

impl std::error::Error for ParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ParseError::UnreadableDocument { source } | ParseError::UnreadableXml { source } => {
                Some(source.as_ref() as &(dyn std::error::Error + 'static))
            }
            _ => None,
        }
    }
}

/// 题库操作错误
#[derive(Debug)]
pub enum BankError {
    /// 题干为空
    EmptyStem,
    /// 选择题的非空选项不足
    TooFewOptions {
        count: usize,
    },
    /// 题目不存在
    QuestionNotFound {
        id: String,
    },
}

impl fmt::Display for BankError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BankError::EmptyStem => write!(f, "题干不能为空"),
            BankError::TooFewOptions { count } => {
                write!(f, "选择题至少需要 2 个非空选项 (当前: {})", count)
            }
            BankError::QuestionNotFound { id } => {
                write!(f, "题目不存在 (ID: {})", id)
            }
        }
    }
}

impl std::error::Error for BankError {}

/// 组卷错误
#[derive(Debug)]
pub enum GenerateError {
    /// 所有题型的配额都为零
    EmptyQuotas,
    /// 版本数量超出范围
    InvalidVersionCount {
        count: usize,
    },
}

impl fmt::Display for GenerateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenerateError::EmptyQuotas => {
                write!(f, "所有题型的配额都为零")
            }
            GenerateError::InvalidVersionCount { count } => {
                write!(f, "版本数量 {} 超出范围 [1, 26]", count)
            }
        }
    }
}

impl std::error::Error for GenerateError {}

/// 文件操作错误
#[derive(Debug)]
pub enum FileError {
    /// 文件不存在
    NotFound {
        path: String,
    },
    /// 读取文件失败
    ReadFailed {
        path: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 写入文件失败
    WriteFailed {
        path: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// TOML 解析失败
    TomlParseFailed {
        path: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// JSON 解析失败
    JsonParseFailed {
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 目录不存在
    DirectoryNotFound {
        path: String,
    },
}

impl fmt::Display for FileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileError::NotFound { path } => write!(f, "文件不存在: {}", path),
            FileError::ReadFailed { path, source } => {
                write!(f, "读取文件失败 ({}): {}", path, source)
            }
            FileError::WriteFailed { path, source } => {
                write!(f, "写入文件失败 ({}): {}", path, source)
            }
            FileError::TomlParseFailed { path, source } => {
                write!(f, "TOML解析失败 ({}): {}", path, source)
            }
            FileError::JsonParseFailed { source } => {
                write!(f, "JSON解析失败: {}", source)
            }
            FileError::DirectoryNotFound { path } => write!(f, "目录不存在: {}", path),
        }
    }
}

impl std::error::Error for FileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FileError::ReadFailed { source, .. }
            | FileError::WriteFailed { source, .. }
            | FileError::TomlParseFailed { source, .. }
            | FileError::JsonParseFailed { source } => {
                Some(source.as_ref() as &(dyn std::error::Error + 'static))
            }
            _ => None,
        }
    }
}

// ========== 从常见错误类型转换 ==========
// 注意：不需要手动实现 From<AppError> for anyhow::Error，
// 因为 anyhow 已经为所有实现了 std::error::Error 的类型提供了自动实现

impl From<GenerateError> for AppError {
    fn from(err: GenerateError) -> Self {
        AppError::Generate(err)
    }
}

impl From<roxmltree::Error> for AppError {
    fn from(err: roxmltree::Error) -> Self {
        AppError::Parse(ParseError::UnreadableXml {
            source: Box::new(err),
        })
    }
}

impl From<regex::Error> for AppError {
    fn from(err: regex::Error) -> Self {
        AppError::Other(format!("正则表达式编译失败: {}", err))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::File(FileError::JsonParseFailed {
            source: Box::new(err),
        })
    }
}

impl From<toml::de::Error> for AppError {
    fn from(err: toml::de::Error) -> Self {
        AppError::File(FileError::TomlParseFailed {
            path: String::new(), // TOML错误通常不包含路径信息
            source: Box::new(err),
        })
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::File(FileError::ReadFailed {
            path: String::new(),
            source: Box::new(err),
        })
    }
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建文件读取错误
    pub fn file_read_failed(path: impl Into<String>, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        AppError::File(FileError::ReadFailed {
            path: path.into(),
            source: Box::new(source),
        })
    }

    /// 创建文件写入错误
    pub fn file_write_failed(path: impl Into<String>, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        AppError::File(FileError::WriteFailed {
            path: path.into(),
            source: Box::new(source),
        })
    }

    /// 创建目录不存在错误
    pub fn directory_not_found(path: impl Into<String>) -> Self {
        AppError::File(FileError::DirectoryNotFound { path: path.into() })
    }

    /// 创建题目不存在错误
    pub fn question_not_found(id: impl Into<String>) -> Self {
        AppError::Bank(BankError::QuestionNotFound { id: id.into() })
    }

    /// 创建选项不足错误
    pub fn too_few_options(count: usize) -> Self {
        AppError::Bank(BankError::TooFewOptions { count })
    }

    /// 创建版本数量错误
    pub fn invalid_version_count(count: usize) -> Self {
        AppError::Generate(GenerateError::InvalidVersionCount { count })
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
