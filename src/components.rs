//! 内置组件
//!
//! 宿主共享给插件包的通用组件、加载失败占位组件，以及JSON插件包使用的模板组件。

use crate::types::*;
use serde_json::Value;
use std::sync::Arc;

/// 共享组件名称
pub const AMOUNT_DISPLAY: &str = "AmountDisplay";
pub const HASH_LINK: &str = "HashLink";
pub const ASSET_DETAILS: &str = "AssetDetails";
pub const DEFI_PROTOCOL_ICON: &str = "DefiProtocolIcon";

/// 加载失败占位组件名称
pub const PREMIUM_LOADING_FAILED: &str = "PremiumLoadingFailed";

/// 读取字符串属性
fn prop_str(props: &Value, key: &str) -> String {
    match props.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

/// 转义HTML特殊字符
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// 读取用于渲染的属性，已转义
fn prop_html(props: &Value, key: &str) -> String {
    escape_html(&prop_str(props, key))
}

/// 金额显示
#[derive(Debug, Default)]
pub struct AmountDisplay;

impl Component for AmountDisplay {
    fn name(&self) -> &str {
        AMOUNT_DISPLAY
    }

    fn render(&self, props: &Value) -> String {
        let value = prop_html(props, "value");
        let asset = prop_html(props, "asset");
        if asset.is_empty() {
            format!("<span class=\"amount-display\">{}</span>", value)
        } else {
            format!("<span class=\"amount-display\">{} {}</span>", value, asset)
        }
    }
}

/// 哈希链接，长哈希只显示首尾
#[derive(Debug, Default)]
pub struct HashLink;

impl HashLink {
    fn truncate(hash: &str) -> String {
        let chars: Vec<char> = hash.chars().collect();
        if chars.len() <= 12 {
            return hash.to_string();
        }
        let head: String = chars[..6].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{}...{}", head, tail)
    }
}

impl Component for HashLink {
    fn name(&self) -> &str {
        HASH_LINK
    }

    fn render(&self, props: &Value) -> String {
        let hash = prop_str(props, "text");
        format!(
            "<a class=\"hash-link\" title=\"{}\">{}</a>",
            escape_html(&hash),
            escape_html(&Self::truncate(&hash))
        )
    }
}

/// 资产详情
#[derive(Debug, Default)]
pub struct AssetDetails;

impl Component for AssetDetails {
    fn name(&self) -> &str {
        ASSET_DETAILS
    }

    fn render(&self, props: &Value) -> String {
        format!("<div class=\"asset-details\">{}</div>", prop_html(props, "asset"))
    }
}

/// DeFi协议图标
#[derive(Debug, Default)]
pub struct DefiProtocolIcon;

impl Component for DefiProtocolIcon {
    fn name(&self) -> &str {
        DEFI_PROTOCOL_ICON
    }

    fn render(&self, props: &Value) -> String {
        let protocol = prop_html(props, "protocol").to_lowercase();
        format!("<img class=\"defi-protocol-icon\" src=\"assets/images/defi/{}.svg\"/>", protocol)
    }
}

/// 高级组件加载失败时的占位组件
#[derive(Debug, Default)]
pub struct PremiumLoadingFailed;

impl Component for PremiumLoadingFailed {
    fn name(&self) -> &str {
        PREMIUM_LOADING_FAILED
    }

    fn render(&self, _props: &Value) -> String {
        "<div class=\"premium-loading-failed\">Loading of the premium component failed</div>".to_string()
    }
}

/// 占位组件引用
pub fn fallback_component() -> ComponentRef {
    Arc::new(PremiumLoadingFailed)
}

/// 宿主共享组件列表
pub fn shared_components() -> Vec<ComponentRef> {
    vec![
        Arc::new(AmountDisplay),
        Arc::new(HashLink),
        Arc::new(AssetDetails),
        Arc::new(DefiProtocolIcon),
    ]
}

/// 模板组件 - 插件包用 `{{ key }}` 占位符声明的组件
#[derive(Debug, Clone)]
pub struct TemplateComponent {
    name: String,
    template: String,
}

impl TemplateComponent {
    pub fn new(name: &str, template: &str) -> Self {
        Self {
            name: name.to_string(),
            template: template.to_string(),
        }
    }
}

impl Component for TemplateComponent {
    fn name(&self) -> &str {
        &self.name
    }

    fn render(&self, props: &Value) -> String {
        render_template(&self.template, props)
    }
}

/// 替换模板中的 `{{ key }}` 占位符，属性值转义后写入；未闭合的占位符原样保留
pub fn render_template(template: &str, props: &Value) -> String {
    let mut output = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        output.push_str(&rest[..start]);
        let after_open = &rest[start + 2..];
        match after_open.find("}}") {
            Some(end) => {
                let key = after_open[..end].trim();
                output.push_str(&prop_html(props, key));
                rest = &after_open[end + 2..];
            }
            None => {
                output.push_str(&rest[start..]);
                rest = "";
            }
        }
    }
    output.push_str(rest);
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_render_template() {
        let props = json!({"title": "Statistics", "count": 3, "empty": null});
        assert_eq!(
            render_template("<h1>{{ title }}</h1><p>{{count}}</p>", &props),
            "<h1>Statistics</h1><p>3</p>"
        );
        assert_eq!(render_template("[{{ missing }}][{{ empty }}]", &props), "[][]");
        assert_eq!(render_template("open {{ title", &props), "open {{ title");
        assert_eq!(render_template("no placeholders", &props), "no placeholders");
    }

    #[test]
    fn test_hash_link_truncation() {
        let link = HashLink;
        let rendered = link.render(&json!({"text": "0x9531c059098e3d194ff87febb587ab07b30b1306"}));
        assert!(rendered.contains(">0x9531...1306<"));

        let short = link.render(&json!({"text": "0xabc"}));
        assert!(short.contains(">0xabc<"));
    }

    #[test]
    fn test_shared_component_names() {
        let names: Vec<String> = shared_components().iter().map(|c| c.name().to_string()).collect();
        assert_eq!(names, vec![AMOUNT_DISPLAY, HASH_LINK, ASSET_DETAILS, DEFI_PROTOCOL_ICON]);
    }

    #[test]
    fn test_amount_display() {
        let amount = AmountDisplay;
        assert_eq!(
            amount.render(&json!({"value": "1.5", "asset": "ETH"})),
            "<span class=\"amount-display\">1.5 ETH</span>"
        );
        assert_eq!(amount.render(&json!({"value": 2})), "<span class=\"amount-display\">2</span>");
    }

    #[test]
    fn test_fallback_component() {
        let fallback = fallback_component();
        assert_eq!(fallback.name(), PREMIUM_LOADING_FAILED);
        assert!(fallback.render(&Value::Null).contains("failed"));
    }

    #[test]
    fn test_props_are_escaped() {
        let props = json!({"title": "<script>alert(\"x\")</script>", "pair": "A&B"});
        assert_eq!(
            render_template("<h1>{{ title }}</h1><i>{{ pair }}</i>", &props),
            "<h1>&lt;script&gt;alert(&quot;x&quot;)&lt;/script&gt;</h1><i>A&amp;B</i>"
        );

        let link = HashLink.render(&json!({"text": "\"><img src=x>"}));
        assert_eq!(
            link,
            "<a class=\"hash-link\" title=\"&quot;&gt;&lt;img src=x&gt;\">&quot;&gt;&lt;img...c=x&gt;</a>"
        );

        let asset = AssetDetails.render(&json!({"asset": "<b>ETH</b>"}));
        assert_eq!(asset, "<div class=\"asset-details\">&lt;b&gt;ETH&lt;/b&gt;</div>");
    }
}
