//! 姓名模糊匹配
//!
//! 两种匹配刻意分开实现：
//! - 限定匹配：已命中医生/病人关键词后，在对应目录里找人。医生名先去掉称谓前缀。
//! - 兜底匹配：没有任何关键词命中时，直接用姓名原词扫描。
//!
//! 两者都只让长度大于 2 的词参与子串匹配。

use crate::directory::NamedEntity;

/// 参与匹配的最短词长（字符数）
pub const MIN_WORD_CHARS: usize = 3;

/// 医生姓名前的称谓（小写）
const HONORIFICS: &[&str] = &["dr. ", "dr ", "dra. ", "dra ", "doctor ", "docteur "];

/// 姓名的预处理方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameForm {
    /// 原样使用
    AsIs,
    /// 去掉开头的称谓
    StripHonorific,
}

/// 去掉开头的称谓，输入应已转小写
pub fn strip_honorific(name: &str) -> &str {
    for prefix in HONORIFICS {
        if let Some(rest) = name.strip_prefix(prefix) {
            return rest.trim_start();
        }
    }
    name
}

/// 姓名中可以参与匹配的词
pub fn significant_words(name: &str) -> impl Iterator<Item = &str> {
    name.split_whitespace()
        .filter(|w| w.chars().count() >= MIN_WORD_CHARS)
}

/// 姓名中是否有词出现在语句里（语句应已规范化为小写）
pub fn name_matches(name: &str, form: NameForm, utterance: &str) -> bool {
    let lower = name.to_lowercase();
    let name = match form {
        NameForm::AsIs => lower.as_str(),
        NameForm::StripHonorific => strip_honorific(&lower),
    };
    let hit = significant_words(name).any(|w| utterance.contains(w));
    hit
}

/// 限定匹配：在单个目录中按顺序找第一个命中的实体
pub fn match_qualified<'a, E: NamedEntity>(
    entities: &'a [E],
    utterance: &str,
    form: NameForm,
) -> Option<&'a E> {
    entities
        .iter()
        .find(|e| name_matches(e.name(), form, utterance))
}

/// 兜底匹配：姓名按原样拆词
pub fn match_fallback<'a, E: NamedEntity>(entities: &'a [E], utterance: &str) -> Option<&'a E> {
    entities
        .iter()
        .find(|e| name_matches(e.name(), NameForm::AsIs, utterance))
}
