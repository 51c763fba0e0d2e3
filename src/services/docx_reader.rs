//! Word 文档读取器
//!
//! 把 .docx(OOXML zip 容器)归一化为 [`DocBlock`] 序列:
//! 普通段落保留加粗标记的 HTML 片段,带编号属性的段落按
//! 编号层级聚合成列表(含一层嵌套)。表格、图片等与题目
//! 识别无关的内容直接忽略。

use std::collections::HashMap;
use std::io::{Cursor, Read, Seek};

use roxmltree::{Document as XmlDoc, Node};
use thiserror::Error;
use tracing::debug;
use zip::ZipArchive;

use crate::error::{AppError, AppResult, ParseError};
use crate::models::block::{DocBlock, DocList, DocListItem, DocParagraph};
use crate::utils::text::{escape_html, strip_bom};
use crate::utils::xml::{child, get_attr_local, is_tag};

/// docx 容器层面的错误
#[derive(Debug, Error)]
pub enum DocxError {
    #[error("压缩包无法打开: {0}")]
    Archive(#[from] zip::result::ZipError),
    #[error("缺少 word/document.xml")]
    MissingDocumentXml,
    #[error("document.xml 解析失败: {0}")]
    Xml(#[from] roxmltree::Error),
}

impl From<DocxError> for AppError {
    fn from(err: DocxError) -> Self {
        AppError::Parse(ParseError::UnreadableDocument {
            source: Box::new(err),
        })
    }
}

/// Word 文档读取器
pub struct DocxReader;

impl DocxReader {
    pub fn new() -> Self {
        Self
    }

    /// 读取 docx 字节流,归一化为文档块序列
    ///
    /// 容器打不开或 XML 损坏时报"文档无法读取",
    /// 正文没有任何块时报"文档为空"。
    pub fn read(&self, data: &[u8]) -> AppResult<Vec<DocBlock>> {
        let blocks = self.parse_container(data)?;
        if blocks.is_empty() {
            return Err(AppError::Parse(ParseError::EmptyDocument));
        }
        debug!("📄 文档归一化完成: {} 个块", blocks.len());
        Ok(blocks)
    }

    fn parse_container(&self, data: &[u8]) -> Result<Vec<DocBlock>, DocxError> {
        let mut zip = ZipArchive::new(Cursor::new(data))?;
        let numbering = read_numbering(&mut zip);
        let document_xml =
            read_zip_text(&mut zip, "word/document.xml").ok_or(DocxError::MissingDocumentXml)?;
        let doc = XmlDoc::parse(strip_bom(&document_xml))?;

        let mut blocks = Vec::new();
        if let Some(body) = doc.descendants().find(|n| is_tag(n, "body")) {
            blocks = parse_body(&body, &numbering);
        }
        Ok(blocks)
    }
}

impl Default for DocxReader {
    fn default() -> Self {
        Self::new()
    }
}

// ========== OOXML 解析辅助函数 ==========

/// 一个编号段落的列表属性
struct ListInfo {
    ordered: bool,
    num_id: String,
    ilvl: u32,
}

/// word/numbering.xml 的摘要:numId -> abstractNumId -> 各层级是否有序
#[derive(Debug, Default)]
struct NumberingInfo {
    num_to_abstract: HashMap<String, String>,
    abstract_levels: HashMap<String, HashMap<String, bool>>,
}

impl NumberingInfo {
    fn is_ordered(&self, num_id: &str, ilvl: &str) -> Option<bool> {
        let abs = self.num_to_abstract.get(num_id)?;
        let levels = self.abstract_levels.get(abs)?;
        levels.get(ilvl).copied()
    }
}

fn read_zip_text<R: Read + Seek>(zip: &mut ZipArchive<R>, path: &str) -> Option<String> {
    let mut file = zip.by_name(path).ok()?;
    let mut text = String::new();
    file.read_to_string(&mut text).ok()?;
    Some(text)
}

/// 读取编号定义,文件缺失或损坏时按无编号处理
fn read_numbering<R: Read + Seek>(zip: &mut ZipArchive<R>) -> NumberingInfo {
    let text = match read_zip_text(zip, "word/numbering.xml") {
        Some(t) => t,
        None => return NumberingInfo::default(),
    };
    let doc = match XmlDoc::parse(strip_bom(&text)) {
        Ok(d) => d,
        Err(_) => return NumberingInfo::default(),
    };

    let mut info = NumberingInfo::default();

    for num in doc.descendants().filter(|n| is_tag(n, "num")) {
        if let Some(num_id) = get_attr_local(&num, "numId") {
            if let Some(abs) = child(&num, "abstractNumId").and_then(|n| get_attr_local(&n, "val"))
            {
                info.num_to_abstract
                    .insert(num_id.to_string(), abs.to_string());
            }
        }
    }

    for abs in doc.descendants().filter(|n| is_tag(n, "abstractNum")) {
        if let Some(abs_id) = get_attr_local(&abs, "abstractNumId") {
            let mut levels: HashMap<String, bool> = HashMap::new();
            for lvl in abs.children().filter(|n| is_tag(n, "lvl")) {
                if let Some(ilvl) = get_attr_local(&lvl, "ilvl") {
                    let fmt = child(&lvl, "numFmt").and_then(|n| get_attr_local(&n, "val"));
                    levels.insert(ilvl.to_string(), fmt.unwrap_or("") != "bullet");
                }
            }
            info.abstract_levels.insert(abs_id.to_string(), levels);
        }
    }

    info
}

fn paragraph_list_info(p: &Node, numbering: &NumberingInfo) -> Option<ListInfo> {
    let ppr = child(p, "pPr")?;
    let numpr = child(&ppr, "numPr")?;
    let ilvl_str = child(&numpr, "ilvl").and_then(|n| get_attr_local(&n, "val"))?;
    let num_id = child(&numpr, "numId").and_then(|n| get_attr_local(&n, "val"))?;
    let ilvl: u32 = ilvl_str.parse().unwrap_or(0);
    let ordered = numbering.is_ordered(num_id, ilvl_str).unwrap_or(false);
    Some(ListInfo {
        ordered,
        num_id: num_id.to_string(),
        ilvl,
    })
}

fn parse_body(body: &Node, numbering: &NumberingInfo) -> Vec<DocBlock> {
    let nodes: Vec<Node> = body.children().filter(|n| n.is_element()).collect();
    let mut blocks = Vec::new();
    let mut i = 0usize;

    while i < nodes.len() {
        let node = &nodes[i];
        if is_tag(node, "p") {
            if paragraph_list_info(node, numbering).is_some() {
                let (list, new_i) = parse_list(&nodes, i, numbering);
                if !list.items.is_empty() {
                    blocks.push(DocBlock::List(list));
                }
                i = new_i;
                continue;
            }
            // 空白段落也要保留,题目边界的判定依赖它们
            blocks.push(DocBlock::Paragraph(parse_paragraph(node)));
            i += 1;
        } else {
            // 表格、分节符等跳过
            i += 1;
        }
    }
    blocks
}

/// 从 nodes[start] 开始聚合一个列表,返回列表和下一个未消费的下标
///
/// 与 start 同层级、同编号的段落成为列表项,紧随某项的更深
/// 层级段落递归聚成该项的嵌套子列表。
fn parse_list(nodes: &[Node], start: usize, numbering: &NumberingInfo) -> (DocList, usize) {
    let first_info = match paragraph_list_info(&nodes[start], numbering) {
        Some(info) => info,
        None => {
            return (
                DocList {
                    ordered: false,
                    items: Vec::new(),
                },
                start + 1,
            )
        }
    };
    let base_ilvl = first_info.ilvl;
    let base_num_id = first_info.num_id;
    let base_ordered = first_info.ordered;

    let mut list = DocList {
        ordered: base_ordered,
        items: Vec::new(),
    };
    let mut i = start;

    while i < nodes.len() {
        let node = &nodes[i];
        if !is_tag(node, "p") {
            break;
        }
        let info = match paragraph_list_info(node, numbering) {
            Some(x) => x,
            None => break,
        };
        if info.ilvl < base_ilvl {
            break;
        }
        if info.ilvl == base_ilvl && (info.ordered != base_ordered || info.num_id != base_num_id) {
            break;
        }
        if info.ilvl > base_ilvl {
            // 深层段落正常情况下已被内层循环消费,走到这里说明列表结构异常
            break;
        }

        let (text, rich_html, emphasized) = parse_paragraph_content(node);
        list.items.push(DocListItem {
            rich_html,
            text,
            emphasized,
            nested: None,
        });
        i += 1;

        // 紧随其后的更深层级段落归入当前项的嵌套子列表
        while i < nodes.len() && is_tag(&nodes[i], "p") {
            match paragraph_list_info(&nodes[i], numbering) {
                Some(sub) if sub.ilvl > base_ilvl => {
                    let (sublist, new_i) = parse_list(nodes, i, numbering);
                    if let Some(last) = list.items.last_mut() {
                        match &mut last.nested {
                            Some(existing) => existing.items.extend(sublist.items),
                            None => last.nested = Some(sublist),
                        }
                    }
                    i = new_i;
                }
                _ => break,
            }
        }
    }

    (list, i)
}

fn parse_paragraph(node: &Node) -> DocParagraph {
    let (text, rich_html, _) = parse_paragraph_content(node);
    DocParagraph { text, rich_html }
}

/// 拆出段落的纯文本、带加粗标记的 HTML、是否含加粗文字
///
/// 段落级 rPr 里的加粗是各 run 的默认值,run 自己的 rPr 可以覆盖。
fn parse_paragraph_content(node: &Node) -> (String, String, bool) {
    let base_bold = child(node, "pPr")
        .and_then(|ppr| child(&ppr, "rPr"))
        .and_then(|rpr| child(&rpr, "b"))
        .and_then(|b| read_on_off(&b));

    let mut text = String::new();
    let mut html = String::new();
    let mut has_bold = false;

    for c in node.children().filter(|n| n.is_element()) {
        if is_tag(&c, "r") {
            append_run(&c, base_bold, &mut text, &mut html, &mut has_bold);
        } else if is_tag(&c, "hyperlink") {
            // 链接只保留文字
            for r in c.children().filter(|n| is_tag(n, "r")) {
                append_run(&r, base_bold, &mut text, &mut html, &mut has_bold);
            }
        }
    }

    (text.trim().to_string(), html.trim().to_string(), has_bold)
}

fn append_run(
    run: &Node,
    base_bold: Option<bool>,
    text: &mut String,
    html: &mut String,
    has_bold: &mut bool,
) {
    let local_bold = child(run, "rPr")
        .and_then(|rpr| child(&rpr, "b"))
        .and_then(|b| read_on_off(&b));
    let bold = local_bold.or(base_bold).unwrap_or(false);

    for c in run.children().filter(|n| n.is_element()) {
        if is_tag(&c, "t") {
            let t = c.text().unwrap_or("");
            if t.is_empty() {
                continue;
            }
            text.push_str(t);
            if bold {
                html.push_str("<strong>");
                html.push_str(&escape_html(t));
                html.push_str("</strong>");
                *has_bold = true;
            } else {
                html.push_str(&escape_html(t));
            }
        } else if is_tag(&c, "tab") {
            text.push('\t');
            html.push('\t');
        } else if is_tag(&c, "br") {
            html.push_str("<br/>");
        }
    }
}

/// OOXML 的开关属性:缺省即开,"0"/"false"/"off" 为关
fn read_on_off(node: &Node) -> Option<bool> {
    let value = get_attr_local(node, "val").map(|v| v.to_ascii_lowercase());
    match value.as_deref() {
        None => Some(true),
        Some("0") | Some("false") | Some("off") => Some(false),
        Some(_) => Some(true),
    }
}
