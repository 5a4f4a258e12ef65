use anyhow::{Context, Result};
use rhub_client::ApiError;
use serde::Serialize;
use serde_json::{json, Value};

/// Result of a successful request. `data` is left out for empty bodies.
pub fn success(changed: bool, body: &str) -> Result<Value> {
    if body.is_empty() {
        return Ok(json!({ "changed": changed }));
    }
    let data: Value = serde_json::from_str(body).context("Fail parse response json")?;
    Ok(json!({ "changed": changed, "data": data }))
}

pub fn failure(err: &ApiError) -> Value {
    json!({
        "failed": true,
        "msg": err.message,
        "problem": err.problem,
    })
}

pub fn print_json<T: Serialize>(data: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(data)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rhub_client::UNKNOWN_ERROR;

    #[test]
    fn test_success_with_data() {
        let value = success(true, r#"{"id":1}"#).unwrap();
        assert_eq!(value, json!({"changed": true, "data": {"id": 1}}));
    }

    #[test]
    fn test_success_without_body() {
        let value = success(true, "").unwrap();
        assert_eq!(value, json!({"changed": true}));
    }

    #[test]
    fn test_success_invalid_json() {
        assert!(success(false, "not json").is_err());
    }

    #[test]
    fn test_failure_payload() {
        let err = ApiError::from_parts(
            rhub_client::StatusCode::FORBIDDEN,
            Default::default(),
            r#"{"detail":"forbidden","status":403}"#,
        );
        assert_eq!(
            failure(&err),
            json!({
                "failed": true,
                "msg": "forbidden",
                "problem": {"detail": "forbidden", "status": 403},
            })
        );

        let err = ApiError::from_parts(rhub_client::StatusCode::BAD_GATEWAY, Default::default(), "");
        assert_eq!(failure(&err)["msg"], UNKNOWN_ERROR);
        assert_eq!(failure(&err)["problem"], json!({}));
    }
}
