use crate::api::error::AppError;
use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, Request},
};
use serde::de::DeserializeOwned;
use validator::Validate;

/// JSON procedure input, deserialized and validated before the handler runs.
///
/// An empty body is read as `{}` so procedures whose fields are all optional
/// can be called without one.
pub struct RpcInput<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for RpcInput<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;

        let value = parse_input::<T>(&bytes)?;
        Ok(RpcInput(value))
    }
}

pub fn parse_input<T>(bytes: &[u8]) -> Result<T, AppError>
where
    T: DeserializeOwned + Validate,
{
    let body: &[u8] = if bytes.iter().all(u8::is_ascii_whitespace) {
        b"{}"
    } else {
        bytes
    };

    let value: T =
        serde_json::from_slice(body).map_err(|e| AppError::Validation(e.to_string()))?;
    value.validate()?;
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Deserialize, Validate)]
    struct Sample {
        #[validate(range(min = 1))]
        #[serde(default = "default_count")]
        count: i64,
    }

    fn default_count() -> i64 {
        5
    }

    #[test]
    fn test_empty_body_reads_as_empty_object() {
        let sample: Sample = parse_input(b"").unwrap();
        assert_eq!(sample.count, 5);

        let sample: Sample = parse_input(b"  \n").unwrap();
        assert_eq!(sample.count, 5);
    }

    #[test]
    fn test_out_of_range_is_validation_error() {
        let err = parse_input::<Sample>(br#"{"count": 0}"#).err().unwrap();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_malformed_json_is_validation_error() {
        let err = parse_input::<Sample>(b"{not json").err().unwrap();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
