//! 文档块模型
//!
//! DocxReader 的输出:按文档顺序排列的段落与列表,
//! 是 WordExtractor 识别题目的原料。

/// 文档中的一个顶层块
#[derive(Debug, Clone, PartialEq)]
pub enum DocBlock {
    Paragraph(DocParagraph),
    List(DocList),
}

/// 普通段落
#[derive(Debug, Clone, PartialEq)]
pub struct DocParagraph {
    /// 纯文本(已去除首尾空白)
    pub text: String,
    /// 带加粗标记的 HTML 片段
    pub rich_html: String,
}

/// 列表(有序或无序)
#[derive(Debug, Clone, PartialEq)]
pub struct DocList {
    pub ordered: bool,
    pub items: Vec<DocListItem>,
}

/// 列表项,可携带一层嵌套子列表
#[derive(Debug, Clone, PartialEq)]
pub struct DocListItem {
    /// 列表项自身内容的 HTML(不含嵌套子列表)
    pub rich_html: String,
    /// 纯文本
    pub text: String,
    /// 是否含有加粗文字
    pub emphasized: bool,
    /// 嵌套子列表
    pub nested: Option<DocList>,
}

impl DocBlock {
    /// 判断块是否没有任何可见文本
    pub fn is_blank(&self) -> bool {
        match self {
            DocBlock::Paragraph(p) => p.text.is_empty(),
            DocBlock::List(l) => l.is_blank(),
        }
    }
}

impl DocList {
    fn is_blank(&self) -> bool {
        self.items
            .iter()
            .all(|item| item.text.is_empty() && item.nested.as_ref().map_or(true, |n| n.is_blank()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paragraph(text: &str) -> DocBlock {
        DocBlock::Paragraph(DocParagraph {
            text: text.to_string(),
            rich_html: text.to_string(),
        })
    }

    #[test]
    fn blank_paragraph_is_blank() {
        assert!(paragraph("").is_blank());
        assert!(!paragraph("سؤال").is_blank());
    }

    #[test]
    fn list_is_blank_only_when_all_items_empty() {
        let blank_list = DocBlock::List(DocList {
            ordered: true,
            items: vec![DocListItem {
                rich_html: String::new(),
                text: String::new(),
                emphasized: false,
                nested: None,
            }],
        });
        assert!(blank_list.is_blank());

        let list = DocBlock::List(DocList {
            ordered: true,
            items: vec![DocListItem {
                rich_html: "ما عاصمة مصر؟".to_string(),
                text: "ما عاصمة مصر؟".to_string(),
                emphasized: false,
                nested: None,
            }],
        });
        assert!(!list.is_blank());
    }
}
