//! JSON Schema (draft 2020-12) documents generated from the contract schemas

use serde_json::{json, Map, Value};

use crate::schema::registry::{
    ContractKind, ContractSchema, FieldShape, FieldSpec, SchemaBody, BLOCK_SCHEMA,
    TEMPLATE_SCHEMA,
};

const DRAFT: &str = "https://json-schema.org/draft/2020-12/schema";

/// Build the JSON Schema document for a contract
pub fn json_schema(kind: ContractKind) -> Value {
    let schema = kind.schema();
    let mut document = match schema.body {
        SchemaBody::Object(fields) => object_schema(fields),
        SchemaBody::ListOf(item) => json!({
            "type": "array",
            "items": { "$ref": format!("#/$defs/{}", item.as_str()) }
        }),
    };

    let mut defs = Map::new();
    if uses_template(schema) {
        defs.insert("template".to_string(), definition(&TEMPLATE_SCHEMA));
    }
    if uses_blocks(schema) {
        defs.insert("block".to_string(), definition(&BLOCK_SCHEMA));
    }

    if let Some(obj) = document.as_object_mut() {
        obj.insert("$schema".to_string(), json!(DRAFT));
        obj.insert(
            "$id".to_string(),
            json!(format!("sender-contract/{}.schema.json", kind.as_str())),
        );
        obj.insert("title".to_string(), json!(schema.title));
        obj.insert("description".to_string(), json!(schema.description));
        if !defs.is_empty() {
            obj.insert("$defs".to_string(), Value::Object(defs));
        }
    }
    document
}

fn definition(schema: &ContractSchema) -> Value {
    let mut value = object_schema(schema.fields());
    if let Some(obj) = value.as_object_mut() {
        obj.insert("title".to_string(), json!(schema.title));
        obj.insert("description".to_string(), json!(schema.description));
    }
    value
}

fn uses_template(schema: &ContractSchema) -> bool {
    schema.body == SchemaBody::ListOf(ContractKind::Template)
}

fn uses_blocks(schema: &ContractSchema) -> bool {
    uses_template(schema)
        || schema
            .fields()
            .iter()
            .any(|f| f.shape == FieldShape::BlockList)
}

fn object_schema(fields: &[FieldSpec]) -> Value {
    let properties: Map<String, Value> = fields
        .iter()
        .map(|f| (f.name.to_string(), field_schema(f)))
        .collect();
    let required: Vec<&str> = fields
        .iter()
        .filter(|f| f.is_required())
        .map(|f| f.name)
        .collect();

    json!({
        "type": "object",
        "required": required,
        "properties": properties
    })
}

fn field_schema(field: &FieldSpec) -> Value {
    let mut value = match field.shape {
        FieldShape::Text => json!({ "type": "string", "minLength": 1 }),
        FieldShape::Identifier => json!({ "type": "string", "pattern": "\\S" }),
        FieldShape::OneOf(allowed) => json!({ "type": "string", "enum": allowed }),
        FieldShape::Map => json!({ "type": "object" }),
        FieldShape::TextList => json!({ "type": "array", "items": { "type": "string" } }),
        FieldShape::BlockList => json!({
            "type": "array",
            "minItems": 1,
            "items": { "$ref": "#/$defs/block" }
        }),
    };

    if let Some(obj) = value.as_object_mut() {
        obj.insert("description".to_string(), json!(field.description));
        if let Some(default) = field.default_value() {
            obj.insert("default".to_string(), default);
        }
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_schema_shape() {
        let schema = json_schema(ContractKind::Block);
        assert_eq!(schema["type"], "object");
        assert_eq!(schema["required"], json!(["id", "type"]));
        assert_eq!(schema["properties"]["props"]["default"], json!({}));
        assert_eq!(schema["properties"]["type"]["enum"].as_array().unwrap().len(), 8);
        assert!(schema.get("$defs").is_none());
    }

    #[test]
    fn test_template_schema_references_block() {
        let schema = json_schema(ContractKind::Template);
        assert_eq!(schema["properties"]["blocks"]["items"]["$ref"], "#/$defs/block");
        assert_eq!(schema["properties"]["blocks"]["minItems"], 1);
        assert_eq!(schema["properties"]["type"]["default"], "transactional");
        assert!(schema["$defs"]["block"].is_object());
    }

    #[test]
    fn test_suite_schema_defines_template_and_block() {
        let schema = json_schema(ContractKind::Suite);
        assert_eq!(schema["type"], "array");
        assert_eq!(schema["items"]["$ref"], "#/$defs/template");
        assert!(schema["$defs"]["template"].is_object());
        assert!(schema["$defs"]["block"].is_object());
        assert_eq!(schema["title"], "Generation Suite");
    }

    #[test]
    fn test_field_descriptions_are_carried() {
        let schema = json_schema(ContractKind::Edit);
        assert_eq!(
            schema["properties"]["summary"]["description"],
            "Human-readable description of the change"
        );
        assert_eq!(schema["required"], json!(["updatedBlocks", "summary"]));
    }
}
