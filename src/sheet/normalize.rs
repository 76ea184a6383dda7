// ==========================================
// 站点维护报表系统 - 文本归一化
// ==========================================
// 职责: 标签/单元格文本的统一比较口径
// 规则: 去除阿拉伯语拉长符(ـ)、去除全部空白、
//       阿拉伯-印度数字转写为 ASCII 数字
// 约束: 搜索词与被搜文本必须经过同一归一化
// ==========================================

/// 阿拉伯语拉长符（Tatweel，U+0640）
const TATWEEL: char = '\u{0640}';

/// 归一化标签/单元格文本
///
/// 纯函数；空输入返回空串
pub fn normalize(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_whitespace() && *c != TATWEEL)
        .map(|c| match c {
            // 阿拉伯-印度数字 ٠..٩ (U+0660..U+0669)
            '\u{0660}'..='\u{0669}' => {
                char::from_u32('0' as u32 + (c as u32 - 0x0660)).unwrap_or(c)
            }
            _ => c,
        })
        .collect()
}
