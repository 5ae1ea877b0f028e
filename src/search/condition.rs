//! Filter conditions / 过滤条件

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{AdapterError, Result};

/// Condition value / 条件值
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConditionValue {
    Boolean(bool),
    Integer(i64),
    Float(f64),
    Text(String),
}

impl ConditionValue {
    /// Numeric reading of the value / 转换为数值
    pub fn as_number(&self) -> Result<f64> {
        let number = match self {
            ConditionValue::Integer(v) => *v as f64,
            ConditionValue::Float(v) => *v,
            ConditionValue::Boolean(v) => if *v { 1.0 } else { 0.0 },
            ConditionValue::Text(v) => v.trim().parse::<f64>().map_err(|_| {
                AdapterError::InvalidArgument(format!("\"{}\" is not a numeric bound", v))
            })?,
        };

        // NaN / inf 不能作为范围边界
        if !number.is_finite() {
            return Err(AdapterError::InvalidArgument(format!(
                "\"{}\" is not a finite numeric bound",
                self
            )));
        }
        Ok(number)
    }
}

impl fmt::Display for ConditionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConditionValue::Boolean(v) => write!(f, "{}", v),
            ConditionValue::Integer(v) => write!(f, "{}", v),
            ConditionValue::Float(v) => write!(f, "{}", v),
            ConditionValue::Text(v) => f.write_str(v),
        }
    }
}

impl From<&str> for ConditionValue {
    fn from(value: &str) -> Self {
        ConditionValue::Text(value.to_string())
    }
}

impl From<String> for ConditionValue {
    fn from(value: String) -> Self {
        ConditionValue::Text(value)
    }
}

impl From<i64> for ConditionValue {
    fn from(value: i64) -> Self {
        ConditionValue::Integer(value)
    }
}

impl From<i32> for ConditionValue {
    fn from(value: i32) -> Self {
        ConditionValue::Integer(value as i64)
    }
}

impl From<f64> for ConditionValue {
    fn from(value: f64) -> Self {
        ConditionValue::Float(value)
    }
}

impl From<bool> for ConditionValue {
    fn from(value: bool) -> Self {
        ConditionValue::Boolean(value)
    }
}

/// Filter condition / 过滤条件
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Condition {
    /// Free-text query / 全文搜索
    Search { query: String },
    /// Identifier match / 主键匹配
    Identifier { identifier: String },
    Equal { field: String, value: ConditionValue },
    NotEqual { field: String, value: ConditionValue },
    GreaterThan { field: String, value: ConditionValue },
    GreaterThanEqual { field: String, value: ConditionValue },
    LessThan { field: String, value: ConditionValue },
    LessThanEqual { field: String, value: ConditionValue },
}

impl Condition {
    pub fn search(query: impl Into<String>) -> Self {
        Condition::Search { query: query.into() }
    }

    pub fn identifier(identifier: impl Into<String>) -> Self {
        Condition::Identifier {
            identifier: identifier.into(),
        }
    }

    pub fn equal(field: impl Into<String>, value: impl Into<ConditionValue>) -> Self {
        Condition::Equal {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn not_equal(field: impl Into<String>, value: impl Into<ConditionValue>) -> Self {
        Condition::NotEqual {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn greater_than(field: impl Into<String>, value: impl Into<ConditionValue>) -> Self {
        Condition::GreaterThan {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn greater_than_equal(field: impl Into<String>, value: impl Into<ConditionValue>) -> Self {
        Condition::GreaterThanEqual {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn less_than(field: impl Into<String>, value: impl Into<ConditionValue>) -> Self {
        Condition::LessThan {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn less_than_equal(field: impl Into<String>, value: impl Into<ConditionValue>) -> Self {
        Condition::LessThanEqual {
            field: field.into(),
            value: value.into(),
        }
    }
}
