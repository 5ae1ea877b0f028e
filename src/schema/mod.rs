//! Abstract index schema / 抽象索引结构定义
//!
//! A schema is supplied by the caller for every call and never cached here.
//! Field maps keep insertion order, which drives the order of the native
//! index definition.

pub mod marshaller;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{AdapterError, Result};

pub use marshaller::Marshaller;

/// Abstract document (JSON object) / 抽象文档
pub type Document = serde_json::Map<String, serde_json::Value>;

/// Ordered field name -> field definition / 有序字段映射
pub type FieldMap = IndexMap<String, Field>;

fn default_type_field() -> String {
    "type".to_string()
}

/// Field kind / 字段类型
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FieldKind {
    Identifier,
    Text,
    DateTime,
    Boolean,
    Integer,
    Float,
    /// Nested object with its own field map / 嵌套对象
    Object { fields: FieldMap },
    /// Discriminated union: type name -> field map / 按类型区分的字段
    Typed {
        types: IndexMap<String, FieldMap>,
        /// Document key holding the discriminant / 保存类型标识的键名
        #[serde(default = "default_type_field")]
        type_field: String,
    },
}

impl FieldKind {
    /// Kind name (used in logs and error messages) / 类型名称
    pub fn name(&self) -> &'static str {
        match self {
            FieldKind::Identifier => "identifier",
            FieldKind::Text => "text",
            FieldKind::DateTime => "date_time",
            FieldKind::Boolean => "boolean",
            FieldKind::Integer => "integer",
            FieldKind::Float => "float",
            FieldKind::Object { .. } => "object",
            FieldKind::Typed { .. } => "typed",
        }
    }
}

/// Field definition / 字段定义
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    #[serde(flatten)]
    pub kind: FieldKind,
    #[serde(default)]
    pub searchable: bool,
    #[serde(default)]
    pub sortable: bool,
    #[serde(default)]
    pub filterable: bool,
    #[serde(default)]
    pub multiple: bool,
}

impl Field {
    pub fn new(kind: FieldKind) -> Self {
        Self {
            kind,
            searchable: false,
            sortable: false,
            filterable: false,
            multiple: false,
        }
    }

    pub fn identifier() -> Self {
        Self::new(FieldKind::Identifier)
    }

    pub fn text() -> Self {
        Self::new(FieldKind::Text)
    }

    pub fn date_time() -> Self {
        Self::new(FieldKind::DateTime)
    }

    pub fn boolean() -> Self {
        Self::new(FieldKind::Boolean)
    }

    pub fn integer() -> Self {
        Self::new(FieldKind::Integer)
    }

    pub fn float() -> Self {
        Self::new(FieldKind::Float)
    }

    pub fn object(fields: FieldMap) -> Self {
        Self::new(FieldKind::Object { fields })
    }

    pub fn typed(types: IndexMap<String, FieldMap>) -> Self {
        Self::new(FieldKind::Typed {
            types,
            type_field: default_type_field(),
        })
    }

    pub fn searchable(mut self) -> Self {
        self.searchable = true;
        self
    }

    pub fn sortable(mut self) -> Self {
        self.sortable = true;
        self
    }

    pub fn filterable(mut self) -> Self {
        self.filterable = true;
        self
    }

    pub fn multiple(mut self) -> Self {
        self.multiple = true;
        self
    }

    /// Override the discriminant key of a typed field / 设置类型标识键名
    pub fn type_field(mut self, key: &str) -> Self {
        if let FieldKind::Typed { type_field, .. } = &mut self.kind {
            *type_field = key.to_string();
        }
        self
    }

    /// Whether the field takes part in the native index at all / 是否需要建立索引
    pub fn is_indexed(&self) -> bool {
        self.searchable || self.sortable || self.filterable
    }
}

/// Build a field map from `(name, field)` pairs / 构建字段映射
pub fn fields<I, S>(entries: I) -> FieldMap
where
    I: IntoIterator<Item = (S, Field)>,
    S: Into<String>,
{
    entries.into_iter().map(|(name, field)| (name.into(), field)).collect()
}

/// Abstract index schema / 抽象索引
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Index {
    /// Index name, also the document key prefix / 索引名称
    pub name: String,
    pub fields: FieldMap,
}

impl Index {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: FieldMap::new(),
        }
    }

    pub fn with_field(mut self, name: impl Into<String>, field: Field) -> Self {
        self.fields.insert(name.into(), field);
        self
    }

    /// Load a schema from its JSON representation / 从JSON加载索引结构
    pub fn from_json(content: &str) -> Result<Self> {
        let index: Index = serde_json::from_str(content)?;
        index.identifier_field()?;
        Ok(index)
    }

    /// Name of the top-level identifier field / 获取主键字段名
    pub fn identifier_field(&self) -> Result<&str> {
        self.fields
            .iter()
            .find(|(_, field)| field.kind == FieldKind::Identifier)
            .map(|(name, _)| name.as_str())
            .ok_or_else(|| {
                AdapterError::InvalidSchema(format!(
                    "index \"{}\" has no identifier field",
                    self.name
                ))
            })
    }

    /// Native document key for an identifier / 文档存储键
    pub fn document_key(&self, identifier: &str) -> String {
        format!("{}:{}", self.name, identifier)
    }
}
