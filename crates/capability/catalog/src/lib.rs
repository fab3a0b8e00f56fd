//! 设备型号目录：型号 → (实体类型, 通道能力数, 默认属性)。
//!
//! 目录在编译期固定，运行时只读，可在所有回调间无锁共享。

mod models;

use domain::{EntityType, PropertyMap};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::OnceLock;

/// 默认属性值。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefaultValue {
    Text(&'static str),
    Int(i64),
    List(&'static [&'static str]),
}

impl DefaultValue {
    pub fn to_value(&self) -> Value {
        match self {
            Self::Text(text) => Value::String((*text).to_string()),
            Self::Int(number) => Value::from(*number),
            Self::List(items) => Value::Array(
                items
                    .iter()
                    .map(|item| Value::String((*item).to_string()))
                    .collect(),
            ),
        }
    }
}

/// 单个型号的完整目录条目。
#[derive(Debug, Clone, Copy)]
pub struct ModelSpec {
    pub model: &'static str,
    pub entity_type: EntityType,
    /// 多路电机/开关的独立可控输出数。
    pub ability: Option<u8>,
    /// 默认属性；空表示该型号不做补全。
    pub defaults: &'static [(&'static str, DefaultValue)],
}

impl ModelSpec {
    pub fn has_defaults(&self) -> bool {
        !self.defaults.is_empty()
    }

    pub fn default_properties(&self) -> PropertyMap {
        self.defaults
            .iter()
            .map(|(key, value)| (*key, value.to_value()))
            .collect()
    }
}

static INDEX: OnceLock<HashMap<&'static str, &'static ModelSpec>> = OnceLock::new();

fn index() -> &'static HashMap<&'static str, &'static ModelSpec> {
    INDEX.get_or_init(|| {
        models::MODELS
            .iter()
            .map(|spec| (spec.model, spec))
            .collect()
    })
}

/// 按型号查询目录；未收录的型号返回 None，调用方应丢弃该设备。
pub fn lookup(model: &str) -> Option<&'static ModelSpec> {
    index().get(model).copied()
}

/// 全部目录条目。
pub fn models() -> &'static [ModelSpec] {
    models::MODELS
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn models_are_unique() {
        let mut seen = HashSet::new();
        for spec in models() {
            assert!(seen.insert(spec.model), "duplicate model {}", spec.model);
        }
        assert_eq!(index().len(), models().len());
    }

    #[test]
    fn ability_only_on_covers() {
        for spec in models().iter().filter(|spec| spec.ability.is_some()) {
            assert_eq!(spec.entity_type, EntityType::Cover, "{}", spec.model);
        }
    }

    #[test]
    fn default_value_renders_json() {
        assert_eq!(DefaultValue::Int(32).to_value(), serde_json::json!(32));
        assert_eq!(
            DefaultValue::List(&["low", "mid"]).to_value(),
            serde_json::json!(["low", "mid"])
        );
    }
}
