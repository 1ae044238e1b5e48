// ABOUTME: Defines the RTSP status codes used in composed replies
// ABOUTME: Implements the status code -> reason phrase mapping (§6)

/// Status codes the reply composer can emit (§6).
///
/// Unlike [`crate::datatypes::Method`], this is not exhaustive of the real
/// protocol's status codes - only the ones this server's handlers produce.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusCode {
    Ok,
    BadRequest,
    Unauthorized,
    NotFound,
    MethodNotAllowed,
    SessionNotFound,
    UnsupportedTransport,
    InternalServerError,
}

impl StatusCode {
    pub fn code(&self) -> u16 {
        match self {
            StatusCode::Ok => 200,
            StatusCode::BadRequest => 400,
            StatusCode::Unauthorized => 401,
            StatusCode::NotFound => 404,
            StatusCode::MethodNotAllowed => 405,
            StatusCode::SessionNotFound => 454,
            StatusCode::UnsupportedTransport => 461,
            StatusCode::InternalServerError => 500,
        }
    }

    /// Reason phrase emitted on the status line, per spec.md §6's status
    /// code table. Only a code outside that table would fall back to the
    /// literal `Unknown`; every variant here has one, so the fallback has
    /// no match arm left to occupy.
    pub fn reason(&self) -> &'static str {
        match self {
            StatusCode::Ok => "OK",
            StatusCode::BadRequest => "Bad Request",
            StatusCode::Unauthorized => "Unauthorized",
            StatusCode::NotFound => "Not Found",
            StatusCode::MethodNotAllowed => "Method Not Allowed",
            StatusCode::SessionNotFound => "Session Not Found",
            StatusCode::UnsupportedTransport => "Unsupported Transport",
            StatusCode::InternalServerError => "Internal Server Error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_reason_phrases() {
        assert_eq!(StatusCode::Ok.reason(), "OK");
        assert_eq!(StatusCode::BadRequest.reason(), "Bad Request");
        assert_eq!(StatusCode::NotFound.reason(), "Not Found");
        assert_eq!(StatusCode::InternalServerError.reason(), "Internal Server Error");
    }

    #[test]
    fn remaining_codes_have_exact_reason_text() {
        assert_eq!(StatusCode::MethodNotAllowed.reason(), "Method Not Allowed");
        assert_eq!(StatusCode::SessionNotFound.reason(), "Session Not Found");
        assert_eq!(StatusCode::UnsupportedTransport.reason(), "Unsupported Transport");
        assert_eq!(StatusCode::Unauthorized.reason(), "Unauthorized");
    }

    #[test]
    fn codes_match_spec_table() {
        assert_eq!(StatusCode::Ok.code(), 200);
        assert_eq!(StatusCode::BadRequest.code(), 400);
        assert_eq!(StatusCode::Unauthorized.code(), 401);
        assert_eq!(StatusCode::NotFound.code(), 404);
        assert_eq!(StatusCode::MethodNotAllowed.code(), 405);
        assert_eq!(StatusCode::SessionNotFound.code(), 454);
        assert_eq!(StatusCode::UnsupportedTransport.code(), 461);
        assert_eq!(StatusCode::InternalServerError.code(), 500);
    }
}
