use super::*;

// =============================================================
// resolve
// =============================================================

#[test]
fn resolve_generate_model_is_post_to_generate_endpoint() {
    let details = resolve("generate_model").expect("catalog hit");
    assert_eq!(details.kind, ActionKind::GenerateModel);
    assert_eq!(details.method, Method::POST);
    assert_eq!(details.endpoint, "http://your-internal-api.com/generate-model");
    assert_eq!(details.description, "Generate a model");
}

#[test]
fn resolve_deploy_model_points_at_deploy_endpoint() {
    let details = resolve("deploy_model").expect("catalog hit");
    assert_eq!(details.endpoint, "http://your-internal-api.com/deploy");
}

#[test]
fn resolve_unknown_key_is_none() {
    assert!(resolve("not_a_key").is_none());
}

#[test]
fn resolve_is_case_sensitive() {
    assert!(resolve("Deploy_Model").is_none());
    assert!(resolve("").is_none());
}

// =============================================================
// ActionKind
// =============================================================

#[test]
fn every_kind_round_trips_through_its_key() {
    for kind in ActionKind::ALL {
        assert_eq!(kind.key().parse::<ActionKind>().unwrap(), kind);
        assert_eq!(kind.details().key, kind.key());
        assert_eq!(kind.details().kind, kind);
    }
}

#[test]
fn catalog_methods_are_all_post() {
    assert!(ActionKind::ALL.iter().all(|k| k.details().method == Method::POST));
}

#[test]
fn duplicate_and_delete_share_restart_endpoint() {
    assert_eq!(
        ActionKind::DuplicateModel.details().endpoint,
        ActionKind::DeleteModel.details().endpoint
    );
}

#[test]
fn unknown_key_error_names_the_key() {
    let err = "rollback_model".parse::<ActionKind>().unwrap_err();
    assert_eq!(err, UnknownActionKey("rollback_model".into()));
    assert_eq!(err.to_string(), "unknown action key: rollback_model");
}

#[test]
fn kind_deserializes_from_wire_key() {
    let kind: ActionKind = serde_json::from_str("\"delete_model\"").unwrap();
    assert_eq!(kind, ActionKind::DeleteModel);
    assert_eq!(kind.to_string(), "delete_model");
}
