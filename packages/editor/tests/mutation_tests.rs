//! Integration tests for the mutation API and history semantics.

use ebb_document::factory::{attrs, create_button};
use ebb_document::templates::starter_templates;
use ebb_document::{
    document_to_mjml, mjml_to_document, tree, ConditionOperator, ConditionalRule, EmailNode,
    NodeKind,
};
use ebb_editor::DocumentModel;
use pretty_assertions::assert_eq;
use std::collections::HashSet;

fn collect_ids(node: &EmailNode, out: &mut Vec<String>) {
    out.push(node.id.clone());
    for child in &node.children {
        collect_ids(child, out);
    }
}

fn first_text_id(model: &DocumentModel) -> String {
    model.document().body.children[0].children[0].children[0]
        .id
        .clone()
}

#[test]
fn inserted_button_round_trips_through_markup() {
    let mut model = DocumentModel::new();
    let body_id = model.document().body.id.clone();

    let button = create_button("Click me", attrs(&[("align", "center")]));
    let button_id = button.id.clone();
    assert!(model.insert_node(&body_id, 0, button));

    let first = &model.document().body.children[0];
    assert_eq!(first.kind, NodeKind::Button);
    assert_eq!(first.html_content.as_deref(), Some("Click me"));
    assert_eq!(first.attributes.get("align").map(String::as_str), Some("center"));

    let mjml = document_to_mjml(model.document());
    assert!(mjml.contains(&format!("ebb-node-{button_id}")));
    assert!(mjml.contains("Click me"));
    assert!(mjml.contains("<mj-button"));
}

#[test]
fn section_condition_serializes_as_directive_pair() {
    let mut model = DocumentModel::new();
    let section_id = model.document().body.children[0].id.clone();
    let rule = ConditionalRule {
        variable: "vip".to_string(),
        operator: ConditionOperator::Equals,
        value: Some("true".to_string()),
    };

    assert!(model.update_node_condition(&section_id, Some(rule.clone())));
    let mjml = document_to_mjml(model.document());

    let open = "<mj-raw><!-- [if vip == \"true\"] --></mj-raw>";
    let close = "<mj-raw><!--[endif]--></mj-raw>";
    let open_at = mjml.find(open).expect("opening directive");
    let section_at = mjml.find("<mj-section").expect("section element");
    let section_close_at = mjml.find("</mj-section>").expect("section close");
    let close_at = mjml.find(close).expect("closing directive");
    assert!(open_at < section_at);
    assert!(section_close_at < close_at);

    let parsed = mjml_to_document(&mjml).expect("round trip");
    assert_eq!(parsed.body.children[0].condition, Some(rule));
    assert_eq!(&parsed, model.document());
}

#[test]
fn move_node_up_on_first_child_is_a_refused_no_op() {
    let mut model = DocumentModel::new();
    let column = &model.document().body.children[0].children[0];
    let column_id = column.id.clone();
    let first_child_id = column.children[0].id.clone();
    let before: Vec<String> = column.children.iter().map(|c| c.id.clone()).collect();

    assert!(!model.move_node_up(&first_child_id));

    let column = tree::find_node(&model.document().body, &column_id).unwrap();
    let after: Vec<String> = column.children.iter().map(|c| c.id.clone()).collect();
    assert_eq!(after, before);
    assert!(!model.can_undo());
}

#[test]
fn move_up_and_down_swap_adjacent_siblings() {
    let mut model = DocumentModel::new();
    let body_id = model.document().body.id.clone();
    let first_section_id = model.document().body.children[0].id.clone();

    let extra = create_button("Go", attrs(&[]));
    let extra_id = extra.id.clone();
    assert!(model.insert_node(&body_id, 1, extra));

    assert!(model.move_node_up(&extra_id));
    let order: Vec<&str> = model
        .document()
        .body
        .children
        .iter()
        .map(|c| c.id.as_str())
        .collect();
    assert_eq!(order, vec![extra_id.as_str(), first_section_id.as_str()]);

    assert!(model.move_node_down(&extra_id));
    assert!(!model.move_node_down(&extra_id));
}

#[test]
fn duplicate_keeps_identifiers_unique_across_documents() {
    let mut models: Vec<DocumentModel> = starter_templates()
        .iter()
        .map(|t| DocumentModel::with_document((t.factory)()))
        .collect();

    for model in &mut models {
        let section_id = model.document().body.children[0].id.clone();
        let new_id = model.duplicate_node(&section_id).expect("duplicable");
        assert_ne!(new_id, section_id);
        // Duplicate the duplicate too.
        model.duplicate_node(&new_id).expect("duplicable");
    }

    let mut all_ids = Vec::new();
    for model in &models {
        collect_ids(&model.document().body, &mut all_ids);
    }
    let unique: HashSet<&String> = all_ids.iter().collect();
    assert_eq!(unique.len(), all_ids.len());
}

#[test]
fn duplicate_of_root_or_missing_node_returns_none() {
    let mut model = DocumentModel::new();
    let body_id = model.document().body.id.clone();
    assert_eq!(model.duplicate_node(&body_id), None);
    assert_eq!(model.duplicate_node("ghost"), None);
    assert!(!model.can_undo());
}

#[test]
fn duplicated_subtree_matches_original_payloads() {
    let mut model = DocumentModel::new();
    let section_id = model.document().body.children[0].id.clone();
    let new_id = model.duplicate_node(&section_id).unwrap();

    let body = &model.document().body;
    let original = tree::find_node(body, &section_id).unwrap();
    let clone = tree::find_node(body, &new_id).unwrap();
    assert_eq!(body.children[1].id, new_id);
    assert_eq!(clone.kind, original.kind);
    assert_eq!(clone.attributes, original.attributes);
    assert_eq!(clone.children.len(), original.children.len());
    assert_ne!(clone.children[0].id, original.children[0].id);
}

#[test]
fn undo_redo_are_exact_inverses() {
    let mut model = DocumentModel::new();
    let text_id = first_text_id(&model);
    let initial = model.document().clone();

    assert!(model.update_node_attribute(&text_id, "color", "#336699"));
    let mutated = model.document().clone();
    assert_ne!(mutated, initial);

    assert!(model.undo());
    assert_eq!(model.document(), &initial);
    assert!(model.redo());
    assert_eq!(model.document(), &mutated);
}

#[test]
fn undo_walks_back_through_a_mutation_sequence() {
    let mut model = DocumentModel::new();
    let text_id = first_text_id(&model);
    let body_id = model.document().body.id.clone();

    let state0 = model.document().clone();
    model.update_node_content(&text_id, "<p>hello</p>");
    let state1 = model.document().clone();
    model.insert_node(&body_id, 1, create_button("More", attrs(&[])));
    let state2 = model.document().clone();
    model.update_preview_text("A preview");

    assert!(model.undo());
    assert_eq!(model.document(), &state2);
    assert!(model.undo());
    assert_eq!(model.document(), &state1);
    assert!(model.undo());
    assert_eq!(model.document(), &state0);
    assert!(!model.undo());

    assert!(model.redo());
    assert_eq!(model.document(), &state1);
}

#[test]
fn new_mutation_after_undo_discards_redo() {
    let mut model = DocumentModel::new();
    model.update_preview_text("one");
    model.update_preview_text("two");
    assert!(model.undo());
    assert!(model.can_redo());

    model.update_preview_text("three");
    assert!(!model.can_redo());
    assert_eq!(model.document().head_attributes.preview_text, "three");
}

#[test]
fn move_into_descendant_is_rejected_without_history() {
    let mut model = DocumentModel::new();
    let section_id = model.document().body.children[0].id.clone();
    let column_id = model.document().body.children[0].children[0].id.clone();
    let before = model.document().clone();

    assert!(!model.move_node_to(&section_id, &column_id, 0));
    assert!(!model.move_node_to(&section_id, "ghost", 0));
    assert!(!model.move_node_to("ghost", &section_id, 0));
    assert_eq!(model.document(), &before);
    assert!(!model.can_undo());
}

#[test]
fn move_node_to_reparents_between_columns() {
    let mut model = DocumentModel::new();
    let section_id = model.document().body.children[0].id.clone();
    let text_id = first_text_id(&model);

    let second_column = ebb_document::factory::create_column(vec![]);
    let second_column_id = second_column.id.clone();
    assert!(model.insert_node(&section_id, 1, second_column));

    assert!(model.move_node_to(&text_id, &second_column_id, 0));
    let body = &model.document().body;
    assert!(body.children[0].children[0].children.is_empty());
    assert_eq!(body.children[0].children[1].children[0].id, text_id);
}

#[test]
fn replace_document_is_undoable() {
    let mut model = DocumentModel::new();
    let before = model.document().clone();
    let replacement = (starter_templates()[1].factory)();
    model.replace_document(replacement.clone());
    assert_eq!(model.document(), &replacement);

    assert!(model.undo());
    assert_eq!(model.document(), &before);
}
