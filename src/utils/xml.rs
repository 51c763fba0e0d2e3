//! roxmltree 节点访问工具
//!
//! OOXML 文档带命名空间前缀(w:p、w:r 等),这里统一按本地名匹配。

use roxmltree::Node;

/// 判断节点是否为指定本地名的元素
pub fn is_tag(node: &Node, local: &str) -> bool {
    node.is_element() && node.tag_name().name() == local
}

/// 按本地名读取属性值,忽略命名空间前缀
pub fn get_attr_local<'a>(node: &Node<'a, 'a>, local: &str) -> Option<&'a str> {
    node.attributes()
        .find(|a| {
            let name = a.name();
            match name.rsplit_once(':') {
                Some((_, l)) => l == local,
                None => name == local,
            }
        })
        .map(|a| a.value())
}

/// 查找第一个指定本地名的子元素
pub fn child<'a>(node: &Node<'a, 'a>, local: &str) -> Option<Node<'a, 'a>> {
    node.children()
        .find(|n| n.is_element() && n.tag_name().name() == local)
}

/// 拼接节点下所有文本后代(等价于 DOM 的 textContent)
pub fn text_content(node: &Node) -> String {
    node.descendants()
        .filter(|n| n.is_text())
        .filter_map(|n| n.text())
        .collect()
}
