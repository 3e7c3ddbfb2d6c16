use roadfy_client::models::{
    AuthOutcome, EntityType, Interaction, InteractionType, RegisterRequest, Role, TokenResponse,
    User,
};
use serde_json::{Value, json};

// --- Role ---

#[test]
fn test_role_wire_names() {
    assert_eq!(serde_json::to_value(Role::Customer).unwrap(), "customer");
    assert_eq!(serde_json::to_value(Role::BusinessAdmin).unwrap(), "business-admin");
    assert_eq!(serde_json::to_value(Role::SuperAdmin).unwrap(), "super-admin");

    let role: Role = serde_json::from_value(json!("super-admin")).unwrap();
    assert_eq!(role, Role::SuperAdmin);
}

#[test]
fn test_unknown_role_is_kept_verbatim() {
    let role: Role = serde_json::from_value(json!("auditor")).unwrap();

    assert_eq!(role, Role::Other("auditor".to_string()));
    assert_eq!(role.as_str(), "auditor");
    assert_eq!(serde_json::to_value(&role).unwrap(), "auditor");
}

// --- User ---

#[test]
fn test_user_accepts_numeric_ids() {
    let user: User = serde_json::from_value(json!({
        "id": 12,
        "email": "ana@roadfy.mx",
        "role": "business-admin",
        "business_id": 3,
    }))
    .unwrap();

    assert_eq!(user.id, "12");
    assert_eq!(user.business_id.as_deref(), Some("3"));
}

#[test]
fn test_user_defaults_missing_fields() {
    let user: User = serde_json::from_value(json!({ "id": "u-1", "business_id": null })).unwrap();

    assert_eq!(user.email, "");
    assert_eq!(user.role, Role::Customer);
    assert_eq!(user.business_id, None);
    assert_eq!(user.created_at, None);
}

#[test]
fn test_user_rejects_structured_id() {
    let result: Result<User, _> = serde_json::from_value(json!({ "id": { "oid": 1 } }));
    assert!(result.is_err());
}

#[test]
fn test_user_round_trip_preserves_unknown_fields() {
    let raw = json!({
        "id": "u-1",
        "email": "ana@roadfy.mx",
        "role": "customer",
        "created_at": "2025-01-10T12:00:00Z",
        "phone": "+52 55 0000 0000",
        "preferences": { "newsletter": true },
    });

    let user: User = serde_json::from_value(raw.clone()).unwrap();
    assert_eq!(user.extra.len(), 2);
    assert_eq!(serde_json::to_value(&user).unwrap(), raw);
}

// --- Payloads ---

#[test]
fn test_register_request_shape() {
    let request = RegisterRequest {
        email: "taller@roadfy.mx".to_string(),
        password: "password1".to_string(),
        role: Role::BusinessAdmin,
    };

    assert_eq!(
        serde_json::to_value(&request).unwrap(),
        json!({ "email": "taller@roadfy.mx", "password": "password1", "role": "business-admin" })
    );
}

#[test]
fn test_token_response_without_type() {
    let token: TokenResponse = serde_json::from_value(json!({ "access_token": "tok" })).unwrap();

    assert_eq!(token.access_token, "tok");
    assert_eq!(token.token_type, None);
}

// --- Outcomes ---

#[test]
fn test_auth_outcome_wire_shape() {
    let success: AuthOutcome<Value> = AuthOutcome::Success(json!({ "id": "u-1" }));
    let failure: AuthOutcome<Value> = AuthOutcome::failure("Email already registered");

    assert_eq!(
        serde_json::to_value(&success).unwrap(),
        json!({ "success": true, "data": { "id": "u-1" } })
    );
    assert_eq!(
        serde_json::to_value(&failure).unwrap(),
        json!({ "success": false, "error": "Email already registered" })
    );
    assert!(success.is_success());
    assert_eq!(success.error(), None);
    assert_eq!(failure.error(), Some("Email already registered"));
    assert_eq!(failure.into_option(), None);
}

#[test]
fn test_login_outcome_carries_user_key() {
    let user: User = serde_json::from_value(json!({ "id": "u1", "role": "customer" })).unwrap();
    let wire = serde_json::to_value(AuthOutcome::Success(user)).unwrap();

    assert_eq!(wire["success"], true);
    assert_eq!(wire["user"]["id"], "u1");
    assert_eq!(wire.get("data"), None);
}

// --- Interactions ---

#[test]
fn test_interaction_wire_shape() {
    let plain = Interaction::new(InteractionType::Compare, EntityType::Tire, "42");
    assert_eq!(
        serde_json::to_value(&plain).unwrap(),
        json!({ "interaction_type": "COMPARE", "entity_type": "TIRE", "entity_id": "42" })
    );

    let search = Interaction::new(InteractionType::Search, EntityType::Page, "catalog")
        .with_metadata(json!({ "brand": "Michelin" }));
    let value = serde_json::to_value(&search).unwrap();
    assert_eq!(value["entity_type"], "PAGE");
    assert_eq!(value["metadata"]["brand"], "Michelin");
}
