use std::collections::BTreeMap;

use stability_engine::wire::{FieldValue, Record};
use stability_engine::{ColumnType, Schema};

#[must_use]
pub fn demo_schema() -> Vec<Schema> {
    vec![
        Schema::new("id".to_owned(), ColumnType::U32, 6),
        Schema::new("value".to_owned(), ColumnType::F64, 10),
        Schema::new("active".to_owned(), ColumnType::Bool, 5),
        Schema::new("name".to_owned(), ColumnType::Utf8, 20),
        Schema::new("tags".to_owned(), ColumnType::ListUtf8, 20),
    ]
}

#[must_use]
pub fn demo_row(id: u32, value: f64, active: bool, name: &str, tags: &[&str]) -> Record {
    let mut row: Record = BTreeMap::new();
    row.insert("id".to_owned(), FieldValue::Number(f64::from(id)));
    row.insert("value".to_owned(), FieldValue::Number(value));
    row.insert("active".to_owned(), FieldValue::Bool(active));
    row.insert("name".to_owned(), FieldValue::Str(name.to_owned()));
    row.insert(
        "tags".to_owned(),
        FieldValue::List(tags.iter().map(|s| (*s).to_owned()).collect()),
    );
    row
}
