//! 文本处理工具
//!
//! 阿拉伯语试题文本的数字归一化、HTML 标签处理等辅助函数。

use phf::phf_map;

/// 阿拉伯-印度数字到 ASCII 数字的映射表
static ARABIC_INDIC_DIGITS: phf::Map<char, char> = phf_map! {
    '٠' => '0',
    '١' => '1',
    '٢' => '2',
    '٣' => '3',
    '٤' => '4',
    '٥' => '5',
    '٦' => '6',
    '٧' => '7',
    '٨' => '8',
    '٩' => '9',
};

/// 将文本中的阿拉伯-印度数字替换为 ASCII 数字
///
/// 其他字符原样保留,例如 "١٠ درجات" 会变成 "10 درجات"。
pub fn normalize_digits(text: &str) -> String {
    text.chars()
        .map(|c| ARABIC_INDIC_DIGITS.get(&c).copied().unwrap_or(c))
        .collect()
}

/// 去掉字符串开头的 UTF-8 BOM
pub fn strip_bom(s: &str) -> &str {
    s.strip_prefix('\u{feff}').unwrap_or(s)
}

/// 移除 HTML 片段中的加粗标签(`<strong>` 和 `<b>`,含属性和闭合形式)
///
/// 只删标签本身,标签内的文本保留。大小写不敏感。
pub fn strip_emphasis_tags(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut rest = html;

    loop {
        match rest.find('<') {
            Some(start) => {
                out.push_str(&rest[..start]);
                let tail = &rest[start..];
                match tail.find('>') {
                    Some(end) => {
                        let tag = &tail[..=end];
                        if !is_emphasis_tag(tag) {
                            out.push_str(tag);
                        }
                        rest = &tail[end + 1..];
                    }
                    None => {
                        // 未闭合的 '<',按普通文本保留
                        out.push_str(tail);
                        break;
                    }
                }
            }
            None => {
                out.push_str(rest);
                break;
            }
        }
    }

    out
}

/// 判断一个完整标签(含尖括号)是否为加粗标签
fn is_emphasis_tag(tag: &str) -> bool {
    let inner = tag.trim_start_matches('<').trim_end_matches('>').trim();
    let inner = inner.strip_prefix('/').unwrap_or(inner);
    let name: String = inner
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric())
        .collect();
    let name = name.to_ascii_lowercase();
    name == "b" || name == "strong"
}

/// 转义 HTML 特殊字符
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_digits_converts_arabic_indic() {
        assert_eq!(normalize_digits("١٠"), "10");
        assert_eq!(normalize_digits("٥ درجات"), "5 درجات");
        assert_eq!(normalize_digits("42"), "42");
        assert_eq!(normalize_digits(""), "");
    }

    #[test]
    fn strip_bom_removes_leading_bom_only() {
        assert_eq!(strip_bom("\u{feff}<quiz>"), "<quiz>");
        assert_eq!(strip_bom("<quiz>"), "<quiz>");
    }

    #[test]
    fn strip_emphasis_tags_keeps_inner_text() {
        assert_eq!(strip_emphasis_tags("<strong>القاهرة</strong>"), "القاهرة");
        assert_eq!(strip_emphasis_tags("<b>نعم</b> لا"), "نعم لا");
        assert_eq!(
            strip_emphasis_tags("<STRONG class=\"x\">أ</STRONG>"),
            "أ"
        );
    }

    #[test]
    fn strip_emphasis_tags_leaves_other_tags() {
        assert_eq!(strip_emphasis_tags("a <em>b</em>"), "a <em>b</em>");
        assert_eq!(strip_emphasis_tags("x < y"), "x < y");
    }

    #[test]
    fn escape_html_handles_ampersand_first() {
        assert_eq!(escape_html("a & b < c"), "a &amp; b &lt; c");
        assert_eq!(escape_html("&lt;"), "&amp;lt;");
    }
}
