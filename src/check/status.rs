/// What an HTTP status says about a key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StatusClass {
    /// 200
    Ok,
    /// 401, 403 and any other 4xx except 429
    Remove,
    /// 429, 5xx and anything else we cannot judge
    Keep,
}

pub(crate) fn classify_status(status: u16) -> StatusClass {
    match status {
        200 => StatusClass::Ok,
        401 | 403 => StatusClass::Remove,
        429 => StatusClass::Keep,
        500.. => StatusClass::Keep,
        400..=499 => StatusClass::Remove,
        _ => StatusClass::Keep,
    }
}

/// Human readable reason for a non-200 status
pub(crate) fn status_reason(status: u16) -> String {
    match status {
        401 | 403 => format!("unauthorized (HTTP {status})"),
        429 => "rate limited (HTTP 429)".to_string(),
        500.. => format!("server error (HTTP {status})"),
        400..=499 => format!("rejected (HTTP {status})"),
        _ => format!("unexpected response (HTTP {status})"),
    }
}
