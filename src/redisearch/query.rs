//! Search request -> `FT.SEARCH` query string and arguments / 查询翻译
//!
//! Clauses are joined with a single space, which the native query language
//! reads as AND. An empty filter list matches everything (`*`).

use crate::error::{AdapterError, Result};
use crate::schema::Index;
use crate::search::{Condition, ConditionValue, Search};

use super::fields::native_name;

/// Query dialect selector appended to every search / 查询方言
pub const DIALECT: &str = "3";

/// Limit used when only an offset is requested / 默认返回数量
pub const DEFAULT_LIMIT: usize = 10;

/// Punctuation the native tokenizer treats as syntax / 需要转义的字符
const ESCAPED_CHARS: &str = ",.<>{}[]\"':;!@#$%^&*()-+=~";

/// Backslash-escape query punctuation / 转义查询特殊字符
pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if ESCAPED_CHARS.contains(c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Numeric bound as a float literal / 数值边界
pub fn escape_number(value: &ConditionValue) -> Result<String> {
    Ok(value.as_number()?.to_string())
}

/// Translated native query / 翻译后的原生查询
#[derive(Debug, Clone, PartialEq)]
pub struct NativeQuery {
    pub index: String,
    pub query: String,
    pub arguments: Vec<String>,
}

impl NativeQuery {
    /// Full `FT.SEARCH` command / 完整命令
    pub fn into_command(self) -> Vec<String> {
        let mut command = Vec::with_capacity(self.arguments.len() + 3);
        command.push("FT.SEARCH".to_string());
        command.push(self.index);
        command.push(self.query);
        command.extend(self.arguments);
        command
    }
}

/// Translate a general search (exactly one target index) / 翻译搜索请求
pub fn translate(search: &Search) -> Result<NativeQuery> {
    let index = single_index(search)?;

    Ok(NativeQuery {
        index: index.name.clone(),
        query: build_query(index, &search.filters)?,
        arguments: build_arguments(search),
    })
}

/// The only target index of a search / 唯一的目标索引
pub fn single_index(search: &Search) -> Result<&Index> {
    match search.indexes.as_slice() {
        [index] => Ok(index),
        [] => Err(AdapterError::InvalidArgument(
            "search request has no target index".to_string(),
        )),
        indexes => Err(AdapterError::Unsupported(format!(
            "RediSearch does not support searching multiple indexes in one request ({})",
            indexes
                .iter()
                .map(|index| index.name.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        ))),
    }
}

/// Build the query string / 构建查询字符串
pub fn build_query(index: &Index, filters: &[Condition]) -> Result<String> {
    if filters.is_empty() {
        return Ok("*".to_string());
    }

    let clauses = filters
        .iter()
        .map(|filter| filter_clause(index, filter))
        .collect::<Result<Vec<_>>>()?;

    Ok(clauses.join(" "))
}

/// Translate one condition / 翻译单个条件
pub fn filter_clause(index: &Index, condition: &Condition) -> Result<String> {
    let clause = match condition {
        Condition::Search { query } => escape(query),
        Condition::Identifier { identifier } => {
            format!("@{}:({})", index.identifier_field()?, escape(identifier))
        }
        Condition::Equal { field, value } => {
            format!("@{}:({})", native_name(field), escape(&value.to_string()))
        }
        Condition::NotEqual { field, value } => {
            format!("-@{}:({})", native_name(field), escape(&value.to_string()))
        }
        Condition::GreaterThan { field, value } => {
            format!("@{}:[({} inf]", native_name(field), escape_number(value)?)
        }
        Condition::GreaterThanEqual { field, value } => {
            format!("@{}:[{} inf]", native_name(field), escape_number(value)?)
        }
        Condition::LessThan { field, value } => {
            format!("@{}:[-inf ({}]", native_name(field), escape_number(value)?)
        }
        Condition::LessThanEqual { field, value } => {
            format!("@{}:[-inf {}]", native_name(field), escape_number(value)?)
        }
    };

    Ok(clause)
}

/// Build SORTBY / LIMIT / DIALECT arguments / 构建排序、分页参数
pub fn build_arguments(search: &Search) -> Vec<String> {
    let mut arguments = Vec::new();

    for (field, direction) in &search.sort_bys {
        arguments.push("SORTBY".to_string());
        arguments.push(escape(field));
        arguments.push(escape(direction.as_native()).to_uppercase());
    }

    let limit = search.limit.unwrap_or(0);
    if search.offset != 0 || limit != 0 {
        arguments.push("LIMIT".to_string());
        arguments.push(search.offset.to_string());
        arguments.push(if limit == 0 { DEFAULT_LIMIT } else { limit }.to_string());
    }

    arguments.push("DIALECT".to_string());
    arguments.push(DIALECT.to_string());

    arguments
}
