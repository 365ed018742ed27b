//! Prefilled links: a base form URL followed by `&field=value` pairs.

use crate::config::FormFields;

/// An ordered list of (field identifier, value) pairs.
pub type FieldMap = Vec<(String, String)>;

/// Percent-encodes a single query component.
///
/// Everything outside of `A-Z a-z 0-9 - . _ ~` is escaped. A space becomes
/// `%20`, never `+`: the form service does not decode the `+` form.
pub fn encode_component(s: &str) -> String {
    urlencoding::encode(s).into_owned()
}

/// Appends the fields to the base URL.
///
/// The base URL must already carry a query parameter: the pairs are always
/// joined with `&`. The base URL is not inspected.
///
/// ```
/// use prefill_engine::encoder::build_url;
///
/// let fields = vec![("r1".to_string(), "hello world".to_string())];
/// let url = build_url("https://forms.example.com/page?id=x", &fields);
/// assert_eq!(url, "https://forms.example.com/page?id=x&r1=hello%20world");
/// ```
pub fn build_url(base_url: &str, fields: &[(String, String)]) -> String {
    let query: Vec<String> = fields
        .iter()
        .map(|(k, v)| format!("{}={}", encode_component(k), encode_component(v)))
        .collect();
    if query.is_empty() {
        return base_url.to_string();
    }
    format!("{}&{}", base_url, query.join("&"))
}

/// Selects the fields of a prefilled link.
///
/// The code and the name are always present. The writing is only included for the
/// second round and when it is not empty, the info only when it is not empty.
pub fn prefill_fields(
    fields: &FormFields,
    code: &str,
    name: &str,
    writing: &str,
    info: &str,
    first_session_only: bool,
) -> FieldMap {
    let mut res: FieldMap = vec![
        (fields.code.clone(), code.to_string()),
        (fields.name.clone(), name.to_string()),
    ];
    if !first_session_only && !writing.is_empty() {
        res.push((fields.writing.clone(), writing.to_string()));
    }
    if !info.is_empty() {
        res.push((fields.writing_info.clone(), info.to_string()));
    }
    res
}

/// Builds the complete prefilled URL for one participant.
pub fn prefilled_url(
    base_url: &str,
    fields: &FormFields,
    code: &str,
    name: &str,
    writing: &str,
    info: &str,
    first_session_only: bool,
) -> String {
    let fm = prefill_fields(fields, code, name, writing, info, first_session_only);
    build_url(base_url, &fm)
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://forms.example.com/Pages/ResponsePage.aspx?id=abc";

    fn fields() -> FormFields {
        FormFields {
            code: "rcode".to_string(),
            name: "rname".to_string(),
            writing: "rwriting".to_string(),
            writing_info: "rinfo".to_string(),
        }
    }

    #[test]
    fn space_is_percent_20() {
        let url = build_url(BASE, &[("f".to_string(), "hello world".to_string())]);
        assert!(url.ends_with("&f=hello%20world"));
        assert!(!url.contains('+'));
    }

    #[test]
    fn reserved_characters() {
        assert_eq!(encode_component("a+b&c=d/e?"), "a%2Bb%26c%3Dd%2Fe%3F");
        assert_eq!(encode_component("line1\nline2"), "line1%0Aline2");
        assert_eq!(encode_component("safe-._~"), "safe-._~");
        assert_eq!(encode_component("café"), "caf%C3%A9");
    }

    #[test]
    fn first_round_fields() {
        let fm = prefill_fields(&fields(), "STU001", "Alice", "some text", "Write 250 words", true);
        let keys: Vec<&str> = fm.iter().map(|p| p.0.as_str()).collect();
        assert_eq!(keys, vec!["rcode", "rname", "rinfo"]);
    }

    #[test]
    fn second_round_fields() {
        let fm = prefill_fields(&fields(), "STU001", "Alice", "some text", "progress", false);
        let keys: Vec<&str> = fm.iter().map(|p| p.0.as_str()).collect();
        assert_eq!(keys, vec!["rcode", "rname", "rwriting", "rinfo"]);

        let fm = prefill_fields(&fields(), "STU001", "Alice", "", "", false);
        let keys: Vec<&str> = fm.iter().map(|p| p.0.as_str()).collect();
        assert_eq!(keys, vec!["rcode", "rname"]);
    }

    #[test]
    fn full_url() {
        let url = prefilled_url(BASE, &fields(), "STU001", "Alice Smith", "", "Go", true);
        assert_eq!(
            url,
            format!("{}&rcode=STU001&rname=Alice%20Smith&rinfo=Go", BASE)
        );
    }

    #[test]
    fn malformed_base_passes_through() {
        let url = build_url("not a url", &[("f".to_string(), "v".to_string())]);
        assert_eq!(url, "not a url&f=v");
    }
}
