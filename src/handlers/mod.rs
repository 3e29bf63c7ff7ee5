pub mod admin;
pub mod home;
pub mod quiz;

use bytes::Bytes;

use crate::rejections::AppError;

/// Decode a raw urlencoded form body into key/value pairs. Used where a
/// form legitimately repeats a key (bulk selection checkboxes), which the
/// serde-based extractors cannot represent.
pub(crate) fn form_pairs(body: &Bytes) -> Result<Vec<(String, String)>, AppError> {
    let body_str =
        std::str::from_utf8(body).map_err(|_| AppError::Input("form body is not UTF-8"))?;

    let mut pairs = Vec::new();
    for pair in body_str.split('&') {
        if pair.is_empty() {
            continue;
        }
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        let decode = |s: &str| {
            urlencoding::decode(&s.replace('+', " "))
                .map(|v| v.into_owned())
                .map_err(|_| AppError::Input("form body is not valid urlencoding"))
        };
        pairs.push((decode(key)?, decode(value)?));
    }

    Ok(pairs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_keys_survive() {
        let body = Bytes::from_static(b"ids=1&ids=2&ids=3");
        let pairs = form_pairs(&body).expect("parse");
        assert_eq!(pairs.len(), 3);
        assert!(pairs.iter().all(|(k, _)| k == "ids"));
    }

    #[test]
    fn plus_and_percent_decode() {
        let body = Bytes::from_static(b"name=Hund+%26+Halter");
        let pairs = form_pairs(&body).expect("parse");
        assert_eq!(pairs[0], ("name".to_string(), "Hund & Halter".to_string()));
    }
}
