//! Custom assertions para tests.

use serde_json::Value;

/// Verifica un envelope exitoso: `success` true y `errors` vacio.
pub fn assert_success_envelope(json: &Value) {
    assert!(json.is_object(), "Response should be a JSON object");
    assert_eq!(json["success"], true, "Expected success envelope: {json}");
    assert_eq!(
        json["errors"].as_array().map(Vec::len),
        Some(0),
        "Expected no errors: {json}"
    );
}

/// Verifica un envelope de error con un unico codigo y retorna el mensaje.
pub fn assert_error_envelope(json: &Value, code: &str) -> String {
    assert_eq!(json["success"], false, "Expected error envelope: {json}");

    let errors = json["errors"].as_array().expect("'errors' should be an array");
    assert_eq!(errors.len(), 1, "Expected exactly one error: {json}");

    let error = &errors[0];
    assert_eq!(error["code"], code);
    assert!(error["timestamp"].is_string(), "Missing timestamp: {json}");

    error["message"]
        .as_str()
        .expect("'message' should be a string")
        .to_string()
}

/// Verifica que el response YAML sea valido.
pub fn assert_valid_yaml(text: &str) -> Value {
    serde_yaml::from_str(text).unwrap_or_else(|e| panic!("Invalid YAML ({e}): {text}"))
}
