//! Search request model / 搜索请求模型
//!
//! - `Search`: target indexes, filters, sort, pagination / 搜索请求
//! - `Condition`: closed set of filter conditions / 过滤条件
//! - `SearchResult`: lazily decoded documents + total / 搜索结果

pub mod condition;
pub mod result;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::schema::Index;

pub use condition::{Condition, ConditionValue};
pub use result::{Documents, SearchResult};

/// Sort direction / 排序方向
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    /// Native (upper-case) keyword / 原生关键字
    pub fn as_native(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

impl FromStr for SortDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            other => Err(format!("unknown sort direction: {}", other)),
        }
    }
}

/// Search request / 搜索请求
#[derive(Debug, Clone, Default)]
pub struct Search {
    /// Target indexes / 目标索引
    pub indexes: Vec<Index>,
    /// Filters, joined with AND semantics / 过滤条件
    pub filters: Vec<Condition>,
    /// Sort field -> direction, in request order / 排序
    pub sort_bys: IndexMap<String, SortDirection>,
    /// Offset (for pagination) / 偏移量
    pub offset: usize,
    /// Maximum number of results, `None` means unset / 最大返回结果数
    pub limit: Option<usize>,
}

impl Search {
    pub fn new(index: Index) -> Self {
        Self {
            indexes: vec![index],
            ..Default::default()
        }
    }

    pub fn with_index(mut self, index: Index) -> Self {
        self.indexes.push(index);
        self
    }

    pub fn with_filter(mut self, condition: Condition) -> Self {
        self.filters.push(condition);
        self
    }

    pub fn with_sort(mut self, field: impl Into<String>, direction: SortDirection) -> Self {
        self.sort_bys.insert(field.into(), direction);
        self
    }

    pub fn with_offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}
