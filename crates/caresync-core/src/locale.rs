use serde::{Deserialize, Serialize};
use std::fmt;

/// 界面语言
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Es,
    Fr,
}

impl Locale {
    /// 所有支持的语言，顺序即关键词表的合并顺序
    pub const ALL: [Locale; 3] = [Locale::En, Locale::Es, Locale::Fr];

    pub fn code(self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::Es => "es",
            Locale::Fr => "fr",
        }
    }

    /// 解析语言代码，不支持的值回退到默认语言
    ///
    /// 接受 "es"、"ES"、"es-MX" 这类写法。
    pub fn parse_or_default(code: &str) -> Self {
        let primary = code
            .trim()
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        match primary.as_str() {
            "en" => Locale::En,
            "es" => Locale::Es,
            "fr" => Locale::Fr,
            _ => {
                if !code.trim().is_empty() {
                    log::warn!("不支持的语言 {code:?}，回退到 {}", Locale::default());
                }
                Locale::default()
            }
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
