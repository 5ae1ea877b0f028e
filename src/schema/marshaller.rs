//! Document marshaller / 文档编组
//!
//! Converts abstract documents to the stored JSON layout and back. Typed
//! fields are stored under their discriminant (`{name: {type: value}}`), which
//! is the layout addressed by the JSON paths of the native index.

use indexmap::IndexMap;
use serde_json::Value;

use super::{Document, FieldKind, FieldMap};
use crate::error::{AdapterError, Result};

/// Key recording the position of a multiple typed value / 多值类型字段的原始顺序
const ORIGINAL_INDEX: &str = "_originalIndex";

/// Field-tree driven (un)marshaller / 基于字段树的编组器
#[derive(Debug, Clone, Default)]
pub struct Marshaller;

impl Marshaller {
    pub fn new() -> Self {
        Self
    }

    /// Abstract document -> stored layout / 转换为存储格式
    pub fn marshall(&self, fields: &FieldMap, document: &Document) -> Result<Document> {
        let mut raw = Document::new();

        for (name, field) in fields {
            let Some(value) = document.get(name) else {
                continue;
            };

            let marshalled = match &field.kind {
                FieldKind::Object { fields: inner } => {
                    self.map_values(value, field.multiple, |v| self.marshall_object(inner, v))?
                }
                FieldKind::Typed { types, type_field } => {
                    self.marshall_typed(name, types, type_field, field.multiple, value)?
                }
                _ => value.clone(),
            };

            raw.insert(name.clone(), marshalled);
        }

        Ok(raw)
    }

    /// Stored layout -> abstract document / 还原为抽象文档
    pub fn unmarshall(&self, fields: &FieldMap, raw: &Document) -> Document {
        let mut document = Document::new();

        for (name, field) in fields {
            let Some(value) = raw.get(name) else {
                continue;
            };

            let unmarshalled = match &field.kind {
                FieldKind::Object { fields: inner } => match (field.multiple, value) {
                    (true, Value::Array(items)) => Value::Array(
                        items.iter().map(|item| self.unmarshall_object(inner, item)).collect(),
                    ),
                    _ => self.unmarshall_object(inner, value),
                },
                FieldKind::Typed { types, type_field } => {
                    self.unmarshall_typed(types, type_field, field.multiple, value)
                }
                _ => value.clone(),
            };

            document.insert(name.clone(), unmarshalled);
        }

        document
    }

    fn map_values<F>(&self, value: &Value, multiple: bool, f: F) -> Result<Value>
    where
        F: Fn(&Value) -> Result<Value>,
    {
        match (multiple, value) {
            (true, Value::Array(items)) => Ok(Value::Array(
                items.iter().map(&f).collect::<Result<Vec<_>>>()?,
            )),
            _ => f(value),
        }
    }

    fn marshall_object(&self, fields: &FieldMap, value: &Value) -> Result<Value> {
        match value {
            Value::Object(map) => Ok(Value::Object(self.marshall(fields, map)?)),
            other => Ok(other.clone()),
        }
    }

    fn unmarshall_object(&self, fields: &FieldMap, value: &Value) -> Value {
        match value {
            Value::Object(map) => Value::Object(self.unmarshall(fields, map)),
            other => other.clone(),
        }
    }

    fn marshall_typed(
        &self,
        name: &str,
        types: &IndexMap<String, FieldMap>,
        type_field: &str,
        multiple: bool,
        value: &Value,
    ) -> Result<Value> {
        if value.is_null() {
            return Ok(Value::Null);
        }

        if !multiple {
            let (type_name, marshalled) = self.marshall_typed_value(name, types, type_field, value)?;
            let mut grouped = Document::new();
            grouped.insert(type_name, Value::Object(marshalled));
            return Ok(Value::Object(grouped));
        }

        let items = value.as_array().ok_or_else(|| {
            AdapterError::InvalidArgument(format!("field \"{}\" expects a list of typed values", name))
        })?;

        let mut grouped = Document::new();
        for (position, item) in items.iter().enumerate() {
            let (type_name, mut marshalled) =
                self.marshall_typed_value(name, types, type_field, item)?;
            marshalled.insert(ORIGINAL_INDEX.to_string(), Value::from(position));

            let bucket = grouped
                .entry(type_name)
                .or_insert_with(|| Value::Array(Vec::new()));
            if let Value::Array(bucket) = bucket {
                bucket.push(Value::Object(marshalled));
            }
        }

        Ok(Value::Object(grouped))
    }

    fn marshall_typed_value(
        &self,
        name: &str,
        types: &IndexMap<String, FieldMap>,
        type_field: &str,
        value: &Value,
    ) -> Result<(String, Document)> {
        let object = value.as_object().ok_or_else(|| {
            AdapterError::InvalidArgument(format!("field \"{}\" expects an object", name))
        })?;

        let type_name = object
            .get(type_field)
            .and_then(Value::as_str)
            .ok_or_else(|| {
                AdapterError::InvalidArgument(format!(
                    "field \"{}\" is missing its \"{}\" discriminant",
                    name, type_field
                ))
            })?;

        let fields = types.get(type_name).ok_or_else(|| {
            AdapterError::InvalidArgument(format!(
                "field \"{}\" has undeclared type \"{}\"",
                name, type_name
            ))
        })?;

        Ok((type_name.to_string(), self.marshall(fields, object)?))
    }

    fn unmarshall_typed(
        &self,
        types: &IndexMap<String, FieldMap>,
        type_field: &str,
        multiple: bool,
        value: &Value,
    ) -> Value {
        let Value::Object(grouped) = value else {
            return value.clone();
        };

        let mut collected: Vec<(u64, Value)> = Vec::new();
        for (type_name, stored) in grouped {
            let Some(fields) = types.get(type_name) else {
                continue;
            };

            let items: Vec<&Value> = match stored {
                Value::Array(items) if multiple => items.iter().collect(),
                other => vec![other],
            };

            for item in items {
                let Value::Object(raw) = item else {
                    continue;
                };
                let position = raw
                    .get(ORIGINAL_INDEX)
                    .and_then(Value::as_u64)
                    .unwrap_or(collected.len() as u64);

                let mut document = Document::new();
                document.insert(type_field.to_string(), Value::String(type_name.clone()));
                document.extend(self.unmarshall(fields, raw));
                collected.push((position, Value::Object(document)));
            }
        }

        if !multiple {
            return collected
                .into_iter()
                .next()
                .map(|(_, document)| document)
                .unwrap_or(Value::Null);
        }

        collected.sort_by_key(|(position, _)| *position);
        Value::Array(collected.into_iter().map(|(_, document)| document).collect())
    }
}
