use bb_api_types::Candidate;
use serde_json::Value;

/// Upper bound on candidates offered to the user.
pub const MAX_CANDIDATES: usize = 5;

const COVER_BASE_URL: &str = "https://covers.openlibrary.org/b/id";

pub fn cover_uri(cover_id: u64) -> String {
    format!("{COVER_BASE_URL}/{cover_id}-L.jpg")
}

/// Maps raw documents to candidates, keeping source order and the first
/// [`MAX_CANDIDATES`] entries.
pub fn normalize_docs(docs: &[Value]) -> Vec<Candidate> {
    docs.iter()
        .take(MAX_CANDIDATES)
        .map(normalize_doc)
        .collect()
}

/// Unexpected shapes degrade to empty or absent fields.
pub fn normalize_doc(doc: &Value) -> Candidate {
    Candidate {
        title: doc
            .get("title")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_owned(),
        author: author_of(doc.get("author_name")),
        isbn: isbn_of(doc.get("isbn")),
        cover_uri: doc.get("cover_i").and_then(cover_id_of).map(cover_uri),
    }
}

fn author_of(value: Option<&Value>) -> String {
    match value {
        Some(Value::Array(names)) => names
            .iter()
            .filter_map(Value::as_str)
            .collect::<Vec<_>>()
            .join(", "),
        Some(Value::String(name)) => name.clone(),
        _ => String::new(),
    }
}

fn isbn_of(value: Option<&Value>) -> Option<String> {
    let isbn = match value? {
        Value::Array(values) => values.first()?.as_str()?,
        Value::String(isbn) => isbn.as_str(),
        _ => return None,
    };
    (!isbn.is_empty()).then(|| isbn.to_owned())
}

// zero is treated as "no cover"
fn cover_id_of(value: &Value) -> Option<u64> {
    value.as_u64().filter(|id| *id != 0)
}
