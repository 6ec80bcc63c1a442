use serde_json::Value;

/// The human readable `detail` message of an error body, if there is one.
/// Error bodies follow the `{"detail": "..."}` convention, but nothing guarantees it:
/// validation errors carry a list of objects in `detail`, and only an object body counts.
#[must_use]
pub fn detail_message(body: &[u8]) -> Option<String> {
    let parsed = serde_json::from_slice::<Value>(body).ok()?;
    parsed
        .get("detail")?
        .as_str()
        .filter(|s| !s.trim().is_empty())
        .map(str::to_string)
}
