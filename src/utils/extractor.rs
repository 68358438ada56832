use actix_web::{FromRequest, HttpRequest, HttpResponse, dev::Payload, error::InternalError};
use std::future::{Ready, ready};

use crate::models::{ApiResponse, ErrorCode};

/// 路径中 `me` 的字面量
pub const ME_LITERAL: &str = "me";

fn bad_path_parameter(message: String) -> actix_web::Error {
    let response = HttpResponse::BadRequest().json(ApiResponse::error_empty(
        ErrorCode::BadRequest,
        message.clone(),
    ));
    InternalError::from_response(message, response).into()
}

/// 解析正整数 ID
pub fn parse_positive_id(raw: Option<&str>, name: &str) -> Result<i64, String> {
    let raw = raw.ok_or_else(|| format!("Missing path parameter '{name}'"))?;
    match raw.parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(format!("Invalid path parameter '{name}': {raw}")),
    }
}

/// 路径中的 `{id}` 段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SafeIDI64(pub i64);

impl FromRequest for SafeIDI64 {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(
            parse_positive_id(req.match_info().get("id"), "id")
                .map(SafeIDI64)
                .map_err(bad_path_parameter),
        )
    }
}

/// `{id}` 或 `me`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersonRef {
    Me,
    Id(i64),
}

impl PersonRef {
    pub fn parse(raw: Option<&str>) -> Result<Self, String> {
        match raw {
            Some(ME_LITERAL) => Ok(PersonRef::Me),
            other => parse_positive_id(other, "id").map(PersonRef::Id),
        }
    }

    /// `me` 解析为当前用户
    pub fn resolve(self, current_user_id: i64) -> i64 {
        match self {
            PersonRef::Me => current_user_id,
            PersonRef::Id(id) => id,
        }
    }
}

macro_rules! define_person_ref_extractor {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub struct $name(pub PersonRef);

        impl FromRequest for $name {
            type Error = actix_web::Error;
            type Future = Ready<Result<Self, Self::Error>>;

            fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
                ready(
                    PersonRef::parse(req.match_info().get("id"))
                        .map($name)
                        .map_err(bad_path_parameter),
                )
            }
        }
    };
}

define_person_ref_extractor!(
    /// `/students/{id|me}`
    SafeStudentRef
);
define_person_ref_extractor!(
    /// `/teachers/{id|me}`
    SafeTeacherRef
);

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn test_parse_positive_id() {
        assert_eq!(parse_positive_id(Some("15"), "id"), Ok(15));
        assert!(parse_positive_id(Some("0"), "id").is_err());
        assert!(parse_positive_id(Some("-3"), "id").is_err());
        assert!(parse_positive_id(Some("abc"), "id").is_err());
        assert!(parse_positive_id(None, "id").is_err());
    }

    #[test]
    fn test_person_ref() {
        assert_eq!(PersonRef::parse(Some("me")), Ok(PersonRef::Me));
        assert_eq!(PersonRef::parse(Some("12")), Ok(PersonRef::Id(12)));
        assert!(PersonRef::parse(Some("ME")).is_err());
        assert_eq!(PersonRef::Me.resolve(7), 7);
        assert_eq!(PersonRef::Id(3).resolve(7), 3);
    }

    #[actix_web::test]
    async fn test_extractor_from_match_info() {
        let req = TestRequest::default().param("id", "me").to_http_request();
        let extracted = SafeStudentRef::extract(&req).await.unwrap();
        assert_eq!(extracted.0, PersonRef::Me);

        let req = TestRequest::default().param("id", "42").to_http_request();
        assert_eq!(SafeIDI64::extract(&req).await.unwrap().0, 42);

        let req = TestRequest::default().param("id", "x").to_http_request();
        assert!(SafeTeacherRef::extract(&req).await.is_err());
    }
}
