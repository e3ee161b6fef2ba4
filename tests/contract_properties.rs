//! Behavioural properties of the content contracts, checked through the
//! public library API.

use sender_contract::schema::{json_schema, validate, ContractKind};
use sender_contract::{
    validate_block, validate_edit_result, validate_template, BlockType, ContractError,
    TemplateType, ViolationKind,
};
use serde_json::{json, Value};

fn violations(err: ContractError) -> Vec<(String, ViolationKind)> {
    err.into_failure()
        .expect("expected a validation failure")
        .violations()
        .iter()
        .map(|v| (v.path.to_string(), v.kind))
        .collect()
}

fn template_with_blocks(blocks: Value) -> Value {
    json!({ "name": "Welcome", "category": "onboarding", "blocks": blocks })
}

// ============================================================================
// Blocks
// ============================================================================

#[test]
fn test_omitted_props_default_to_empty_map_for_every_type() {
    for name in BlockType::NAMES {
        let block = validate_block(&json!({ "id": "b1", "type": name })).unwrap();
        assert!(block.props.is_empty(), "props not defaulted for {}", name);
        assert_eq!(block.block_type.as_str(), *name);
    }
}

#[test]
fn test_type_outside_closed_set_is_invalid_enum() {
    let candidates = [
        json!("Header"),
        json!("HEADER"),
        json!("carousel"),
        json!(""),
        json!(" text"),
        json!(3),
        json!(null),
        json!(["header"]),
    ];

    for candidate in candidates {
        let err = validate_block(&json!({ "id": "b1", "type": candidate })).unwrap_err();
        assert_eq!(
            violations(err),
            vec![("type".to_string(), ViolationKind::InvalidEnum)],
            "for type {}",
            candidate
        );
    }
}

#[test]
fn test_props_must_be_a_mapping() {
    for props in [json!([]), json!("text"), json!(1), json!(null)] {
        let err = validate_block(&json!({ "id": "b1", "type": "text", "props": props })).unwrap_err();
        assert_eq!(
            violations(err),
            vec![("props".to_string(), ViolationKind::InvalidType)]
        );
    }
}

#[test]
fn test_blank_ids_are_missing() {
    for id in ["", " ", "\t\n"] {
        let err = validate_block(&json!({ "id": id, "type": "text" })).unwrap_err();
        assert_eq!(
            violations(err),
            vec![("id".to_string(), ViolationKind::MissingField)]
        );
    }
}

// ============================================================================
// Templates
// ============================================================================

#[test]
fn test_empty_blocks_fail_regardless_of_other_fields() {
    let inputs = [
        json!({ "name": "A", "category": "c", "blocks": [] }),
        json!({ "name": "A", "category": "c", "type": "marketing", "blocks": [] }),
        json!({ "name": "", "category": "", "type": "bogus", "variables": 7, "blocks": [] }),
    ];

    for input in inputs {
        let found = violations(validate_template(&input).unwrap_err());
        assert!(
            found.contains(&("blocks".to_string(), ViolationKind::EmptyCollection)),
            "missing EmptyCollection in {:?}",
            found
        );
    }
}

#[test]
fn test_omitted_template_type_defaults_to_transactional() {
    let template =
        validate_template(&template_with_blocks(json!([{ "id": "b1", "type": "text" }]))).unwrap();
    assert_eq!(template.template_type, TemplateType::Transactional);
    assert!(template.variables.is_empty());
}

#[test]
fn test_two_malformed_blocks_are_both_reported_in_order() {
    let input = template_with_blocks(json!([
        { "type": "header" },
        { "id": "ok", "type": "text" },
        { "id": "b3", "type": "marquee" }
    ]));

    assert_eq!(
        violations(validate_template(&input).unwrap_err()),
        vec![
            ("blocks[0].id".to_string(), ViolationKind::MissingField),
            ("blocks[2].type".to_string(), ViolationKind::InvalidEnum),
        ]
    );
}

#[test]
fn test_normalized_output_is_idempotent() {
    let inputs = [
        (
            ContractKind::Block,
            json!({ "id": "b1", "type": "image", "junk": true }),
        ),
        (
            ContractKind::Template,
            json!({
                "name": "Digest",
                "category": "news",
                "blocks": [{ "id": "h", "type": "header" }, { "id": "f", "type": "footer", "props": { "x": [1, 2] } }]
            }),
        ),
        (
            ContractKind::Suite,
            json!([{ "name": "A", "category": "a", "blocks": [{ "id": "a", "type": "spacer" }] }]),
        ),
        (
            ContractKind::Edit,
            json!({ "updatedBlocks": [{ "id": "b1", "type": "text" }], "summary": "x" }),
        ),
    ];

    for (kind, input) in inputs {
        let first = validate(kind, &input).unwrap();
        let as_value = serde_json::to_value(&first).unwrap();
        let second = validate(kind, &as_value).unwrap();
        assert_eq!(first, second, "{} not idempotent", kind);
        assert_eq!(as_value, serde_json::to_value(&second).unwrap());
    }
}

// ============================================================================
// Edit results
// ============================================================================

#[test]
fn test_edit_id_sets_default_to_empty() {
    let edit = validate_edit_result(&json!({
        "updatedBlocks": [{ "id": "b1", "type": "text" }],
        "summary": "x"
    }))
    .unwrap();

    assert!(edit.changed_block_ids.is_empty());
    assert!(edit.added_block_ids.is_empty());
    assert!(edit.removed_block_ids.is_empty());
}

#[test]
fn test_every_malformed_updated_block_is_reported_in_order() {
    let err = validate_edit_result(&json!({
        "updatedBlocks": [
            { "type": "text" },
            { "id": "b", "type": "x", "props": [] }
        ],
        "summary": "s"
    }))
    .unwrap_err();

    assert_eq!(
        violations(err),
        vec![
            ("updatedBlocks[0].id".to_string(), ViolationKind::MissingField),
            ("updatedBlocks[1].type".to_string(), ViolationKind::InvalidEnum),
            ("updatedBlocks[1].props".to_string(), ViolationKind::InvalidType),
        ]
    );
}

#[test]
fn test_edit_ids_are_not_cross_checked() {
    let edit = validate_edit_result(&json!({
        "updatedBlocks": [{ "id": "b1", "type": "text" }],
        "changedBlockIds": ["not-there"],
        "addedBlockIds": ["", "b1"],
        "removedBlockIds": ["b1"],
        "summary": "x"
    }))
    .unwrap();

    assert_eq!(edit.changed_block_ids, vec!["not-there"]);
    assert_eq!(edit.added_block_ids, vec!["", "b1"]);
}

// ============================================================================
// Purity
// ============================================================================

#[test]
fn test_concurrent_calls_agree() {
    let input = template_with_blocks(json!([{ "type": "header" }, { "id": "b", "type": "nope" }]));
    let expected = format!("{:?}", validate_template(&input));

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| scope.spawn(|| format!("{:?}", validate_template(&input))))
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }
    });
}

// ============================================================================
// Exported JSON Schema agrees with the validator
// ============================================================================

fn compiled(kind: ContractKind) -> jsonschema::Validator {
    let mut schema = json_schema(kind);
    schema.as_object_mut().unwrap().remove("$id");
    jsonschema::validator_for(&schema).unwrap()
}

fn assert_agreement(kind: ContractKind, instances: &[Value]) {
    let validator = compiled(kind);
    for instance in instances {
        assert_eq!(
            validator.is_valid(instance),
            validate(kind, instance).is_ok(),
            "{} disagreement on {}",
            kind,
            instance
        );
    }
}

#[test]
fn test_block_schema_agrees_with_validator() {
    assert_agreement(
        ContractKind::Block,
        &[
            json!({ "id": "b1", "type": "text" }),
            json!({ "id": "b1", "type": "text", "props": { "a": 1 }, "extra": null }),
            json!({ "id": " ", "type": "text" }),
            json!({ "id": "b1", "type": "Text" }),
            json!({ "id": "b1", "type": "text", "props": null }),
            json!({ "id": "b1", "type": "text", "props": [] }),
            json!({ "type": "text" }),
            json!({ "id": 4, "type": "text" }),
            json!("b1"),
        ],
    );
}

#[test]
fn test_template_schema_agrees_with_validator() {
    let block = json!({ "id": "b1", "type": "button" });
    assert_agreement(
        ContractKind::Template,
        &[
            json!({ "name": "A", "category": "c", "blocks": [block] }),
            json!({ "name": "A", "category": "c", "type": "marketing", "variables": ["x"], "blocks": [block] }),
            json!({ "name": "A", "category": "c", "type": "Marketing", "blocks": [block] }),
            json!({ "name": "A", "category": "c", "blocks": [] }),
            json!({ "name": "A", "category": "c", "blocks": [5] }),
            json!({ "name": "", "category": "c", "blocks": [block] }),
            json!({ "name": "A", "category": "c", "variables": [1], "blocks": [block] }),
            json!({ "name": "A", "blocks": [block] }),
        ],
    );
}

#[test]
fn test_suite_and_edit_schemas_agree_with_validator() {
    let template = json!({ "name": "A", "category": "c", "blocks": [{ "id": "b", "type": "text" }] });
    assert_agreement(
        ContractKind::Suite,
        &[
            json!([]),
            json!([template.clone(), template.clone()]),
            json!([template.clone(), { "name": "B" }]),
            json!({ "templates": [template] }),
        ],
    );

    assert_agreement(
        ContractKind::Edit,
        &[
            json!({ "updatedBlocks": [{ "id": "b", "type": "text" }], "summary": "s" }),
            json!({ "updatedBlocks": [], "summary": "s" }),
            json!({ "updatedBlocks": [{ "id": "b", "type": "text" }], "summary": "" }),
            json!({ "updatedBlocks": [{ "id": "b", "type": "text" }], "summary": "s", "removedBlockIds": "b" }),
        ],
    );
}
