//! Field mapper: abstract field tree -> flat native field list / 字段映射
//!
//! Nested object and typed fields compose a dotted public name
//! (`footer.title`, `blocks.text.title`) and a JSON path
//! (`$.footer.title`, `$.blocks.text[*].title`). The native engine cannot
//! reference dots, so the native attribute name replaces `.` with `__`.

use indexmap::IndexMap;

use crate::schema::{FieldKind, FieldMap};

/// Native attribute type / 原生字段类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NativeType {
    Text,
    Tag,
    Numeric,
}

impl NativeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            NativeType::Text => "TEXT",
            NativeType::Tag => "TAG",
            NativeType::Numeric => "NUMERIC",
        }
    }
}

/// Flattened native field definition / 扁平化的原生字段定义
#[derive(Debug, Clone, PartialEq)]
pub struct NativeField {
    /// Dotted public name / 公开字段名
    pub name: String,
    pub json_path: String,
    pub native_type: NativeType,
    pub searchable: bool,
    pub sortable: bool,
    pub filterable: bool,
}

impl NativeField {
    /// Attribute name usable in native queries / 原生查询中的字段名
    pub fn native_name(&self) -> String {
        native_name(&self.name)
    }

    /// Stored for sorting only, not indexed / 仅排序不索引
    pub fn is_noindex(&self) -> bool {
        !self.searchable && !self.filterable
    }
}

/// Dotted name -> native attribute name / 转换为原生字段名
pub fn native_name(name: &str) -> String {
    name.replace('.', "__")
}

/// Flattened fields keyed by dotted name, in schema order / 扁平化字段
pub type NativeFields = IndexMap<String, NativeField>;

/// Flatten a field tree from the document root / 从根节点展开字段树
pub fn flatten_fields(fields: &FieldMap) -> NativeFields {
    flatten(fields, "", "$.")
}

fn flatten(fields: &FieldMap, prefix: &str, json_path_prefix: &str) -> NativeFields {
    let mut native_fields = NativeFields::new();

    for (field_name, field) in fields {
        let mut json_path = format!("{}{}", json_path_prefix, field_name);
        if field.multiple {
            json_path.push_str("[*]");
        }
        let name = format!("{}{}", prefix, field_name);

        // 未开启搜索、排序、过滤的字段直接忽略
        if !field.is_indexed() {
            continue;
        }

        let native_type = match &field.kind {
            FieldKind::Identifier | FieldKind::Text | FieldKind::DateTime => NativeType::Text,
            FieldKind::Boolean => NativeType::Tag,
            FieldKind::Integer | FieldKind::Float => NativeType::Numeric,
            FieldKind::Object { fields: inner } => {
                let nested = flatten(inner, &format!("{}.", name), &format!("{}.", json_path));
                merge(&mut native_fields, nested);
                continue;
            }
            FieldKind::Typed { types, .. } => {
                for (type_name, inner) in types {
                    // the [*] marker must follow the discriminant, not precede it
                    let type_path = match json_path.strip_suffix("[*]") {
                        Some(base) if field.multiple => format!("{}.{}[*]", base, type_name),
                        _ => format!("{}.{}", json_path, type_name),
                    };
                    let nested = flatten(
                        inner,
                        &format!("{}.{}.", name, type_name),
                        &format!("{}.", type_path),
                    );
                    merge(&mut native_fields, nested);
                }
                continue;
            }
        };

        insert(
            &mut native_fields,
            NativeField {
                name,
                json_path,
                native_type,
                searchable: field.searchable,
                sortable: field.sortable,
                filterable: field.filterable,
            },
        );
    }

    native_fields
}

fn merge(target: &mut NativeFields, source: NativeFields) {
    for (_, field) in source {
        insert(target, field);
    }
}

/// Last write wins, keeping the position of the first entry / 同名字段后者覆盖
fn insert(target: &mut NativeFields, field: NativeField) {
    if let Some(previous) = target.insert(field.name.clone(), field) {
        tracing::warn!(
            "Duplicate flattened field \"{}\" ({}) overridden",
            previous.name,
            previous.json_path
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{fields, Field};

    fn paths(native: &NativeFields) -> Vec<(String, String, &'static str)> {
        native
            .values()
            .map(|f| (f.native_name(), f.json_path.clone(), f.native_type.as_str()))
            .collect()
    }

    #[test]
    fn test_flat_fields() {
        let schema = fields([
            ("id", Field::identifier()),
            ("title", Field::text().searchable()),
            ("published", Field::date_time().sortable()),
            ("visible", Field::boolean().filterable()),
            ("rating", Field::float().filterable().sortable()),
            ("views", Field::integer().filterable()),
            ("notes", Field::text()),
        ]);

        let native = flatten_fields(&schema);
        assert_eq!(
            paths(&native),
            vec![
                ("title".to_string(), "$.title".to_string(), "TEXT"),
                ("published".to_string(), "$.published".to_string(), "TEXT"),
                ("visible".to_string(), "$.visible".to_string(), "TAG"),
                ("rating".to_string(), "$.rating".to_string(), "NUMERIC"),
                ("views".to_string(), "$.views".to_string(), "NUMERIC"),
            ]
        );
        assert!(native["published"].is_noindex());
        assert!(!native["rating"].is_noindex());
        assert!(!native.contains_key("id"));
        assert!(!native.contains_key("notes"));
    }

    #[test]
    fn test_object_and_multiple() {
        let schema = fields([
            ("tags", Field::text().filterable().multiple()),
            (
                "footer",
                Field::object(fields([
                    ("title", Field::text().searchable()),
                    ("hidden", Field::text()),
                ]))
                .searchable(),
            ),
            (
                "comments",
                Field::object(fields([("email", Field::text().filterable())]))
                    .filterable()
                    .multiple(),
            ),
        ]);

        let native = flatten_fields(&schema);
        assert_eq!(
            paths(&native),
            vec![
                ("tags".to_string(), "$.tags[*]".to_string(), "TEXT"),
                ("footer__title".to_string(), "$.footer.title".to_string(), "TEXT"),
                ("comments__email".to_string(), "$.comments[*].email".to_string(), "TEXT"),
            ]
        );
        assert_eq!(native["footer.title"].name, "footer.title");
    }

    #[test]
    fn test_object_without_flags_is_skipped() {
        let schema = fields([(
            "footer",
            Field::object(fields([("title", Field::text().searchable())])),
        )]);
        assert!(flatten_fields(&schema).is_empty());
    }

    #[test]
    fn test_typed_fields() {
        let single = Field::typed(IndexMap::from([(
            "image".to_string(),
            fields([("media", Field::integer().filterable())]),
        )]))
        .filterable();

        let multiple = Field::typed(IndexMap::from([
            (
                "text".to_string(),
                fields([
                    ("title", Field::text().searchable()),
                    ("tags", Field::text().filterable().multiple()),
                ]),
            ),
            (
                "embed".to_string(),
                fields([("media", Field::text().searchable())]),
            ),
        ]))
        .searchable()
        .multiple();

        let schema = fields([("header", single), ("blocks", multiple)]);
        let native = flatten_fields(&schema);
        assert_eq!(
            paths(&native),
            vec![
                ("header__image__media".to_string(), "$.header.image.media".to_string(), "NUMERIC"),
                ("blocks__text__title".to_string(), "$.blocks.text[*].title".to_string(), "TEXT"),
                ("blocks__text__tags".to_string(), "$.blocks.text[*].tags[*]".to_string(), "TEXT"),
                ("blocks__embed__media".to_string(), "$.blocks.embed[*].media".to_string(), "TEXT"),
            ]
        );
    }

    #[test]
    fn test_duplicate_names_last_write_wins() {
        let mut first = flatten_fields(&fields([(
            "meta",
            Field::object(fields([("title", Field::text().searchable())])).searchable(),
        )]));
        merge(
            &mut first,
            flatten_fields(&fields([(
                "meta",
                Field::object(fields([("title", Field::integer().sortable())])).sortable(),
            )])),
        );
        assert_eq!(first.len(), 1);
        assert_eq!(first["meta.title"].native_type, NativeType::Numeric);
        assert!(first["meta.title"].sortable);
    }
}
