use serde_json::Value;
use tracing::warn;

/// What a single page body turned out to contain.
#[derive(Debug, Clone, PartialEq)]
pub enum PageOutcome {
    /// Rows of the page, in the order the server sent them. May be empty.
    Records(Vec<Value>),
    /// Nothing usable in the body: not JSON, or the collection key is missing.
    EndOfData,
}

/// Pulls the rows stored under `collection` out of a response body.
/// Records are passed through untouched.
pub fn extract_page(body: &str, collection: &str) -> PageOutcome {
    let envelope: Value = match serde_json::from_str(body) {
        Ok(v) => v,
        Err(e) => {
            warn!(collection, error = %e, "response is not valid JSON");
            return PageOutcome::EndOfData;
        }
    };

    let Value::Object(mut map) = envelope else {
        warn!(collection, "response is not a JSON object");
        return PageOutcome::EndOfData;
    };

    match map.remove(collection) {
        Some(Value::Array(rows)) => PageOutcome::Records(rows),
        Some(_) => {
            warn!(collection, "collection key does not hold an array");
            PageOutcome::EndOfData
        }
        None => PageOutcome::EndOfData,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const KEY: &str = "FimaNfipPolicies";

    #[test]
    fn keeps_rows_in_order() {
        let body = json!({
            "metadata": {"skip": 0},
            KEY: [{"id": 3}, {"id": 1}, {"id": 2}],
        })
        .to_string();
        assert_eq!(
            extract_page(&body, KEY),
            PageOutcome::Records(vec![json!({"id": 3}), json!({"id": 1}), json!({"id": 2})])
        );
    }

    #[test]
    fn empty_array_is_a_short_page() {
        let body = json!({ KEY: [] }).to_string();
        assert_eq!(extract_page(&body, KEY), PageOutcome::Records(vec![]));
    }

    #[test]
    fn unusable_bodies_end_the_data() {
        let missing_key = json!({"FimaNfipClaims": []}).to_string();
        let not_array = json!({ KEY: {"id": 1} }).to_string();
        for body in ["", "<html>oops</html>", "[1, 2]", "null", &missing_key, &not_array] {
            assert_eq!(extract_page(body, KEY), PageOutcome::EndOfData, "body: {body}");
        }
    }
}
