//! `OpenAPI` document access.

use serde_json::{Map, Value};

/// HTTP methods that carry operations, in page order.
const METHODS: [&str; 8] = [
    "get", "put", "post", "delete", "options", "head", "patch", "trace",
];

/// `$ref` chains longer than this are left unresolved.
const MAX_REF_DEPTH: usize = 16;

/// Parsed `OpenAPI` document.
#[derive(Debug)]
pub struct ApiDocument {
    root: Value,
}

impl ApiDocument {
    /// Parse a JSON document.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not JSON.
    pub fn parse(text: &str) -> Result<Self, serde_json::Error> {
        Ok(Self {
            root: serde_json::from_str(text)?,
        })
    }

    /// Every operation of every path, in document order.
    #[must_use]
    pub fn operations(&self) -> Vec<Operation<'_>> {
        let Some(paths) = self.root.get("paths").and_then(Value::as_object) else {
            return Vec::new();
        };
        let mut operations = Vec::new();
        for (route, item) in paths {
            let item = self.resolve(item);
            for method in METHODS {
                if let Some(op) = item.get(method).filter(|op| op.is_object()) {
                    operations.push(Operation {
                        method,
                        route,
                        op,
                        shared_params: item.get("parameters"),
                    });
                }
            }
        }
        operations
    }

    /// Follow local `$ref` pointers (`#/components/...`).
    ///
    /// Values without a resolvable local reference are returned as is.
    #[must_use]
    pub fn resolve<'a>(&'a self, value: &'a Value) -> &'a Value {
        let mut current = value;
        for _ in 0..MAX_REF_DEPTH {
            let Some(target) = ref_pointer(current).and_then(|p| self.root.pointer(p)) else {
                return current;
            };
            current = target;
        }
        current
    }
}

/// JSON pointer of a local `$ref`, without the leading `#`.
pub(crate) fn ref_pointer(value: &Value) -> Option<&str> {
    value.get("$ref")?.as_str()?.strip_prefix('#')
}

/// One operation (method + route).
#[derive(Clone, Copy, Debug)]
pub struct Operation<'a> {
    /// Lower-case method.
    pub method: &'static str,
    /// Path template.
    pub route: &'a str,
    op: &'a Value,
    shared_params: Option<&'a Value>,
}

impl<'a> Operation<'a> {
    fn text(&self, key: &str) -> Option<&'a str> {
        self.op
            .get(key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// `operationId`.
    #[must_use]
    pub fn operation_id(&self) -> Option<&'a str> {
        self.text("operationId")
    }

    /// Summary line.
    #[must_use]
    pub fn summary(&self) -> Option<&'a str> {
        self.text("summary")
    }

    /// Long description.
    #[must_use]
    pub fn description(&self) -> Option<&'a str> {
        self.text("description")
    }

    /// Page title: summary, else `operationId`, else `METHOD route`.
    #[must_use]
    pub fn title(&self) -> String {
        self.summary()
            .or_else(|| self.operation_id())
            .map_or_else(
                || format!("{} {}", self.method.to_uppercase(), self.route),
                ToOwned::to_owned,
            )
    }

    /// Resolved parameters: path-level ones overridden by operation-level
    /// ones with the same name and location.
    #[must_use]
    pub fn parameters(&self, doc: &'a ApiDocument) -> Vec<&'a Value> {
        let own: Vec<&Value> = list(self.op.get("parameters"))
            .map(|p| doc.resolve(p))
            .collect();
        let mut params: Vec<&Value> = list(self.shared_params)
            .map(|p| doc.resolve(p))
            .filter(|shared| !own.iter().any(|p| same_param(p, shared)))
            .collect();
        params.extend(own);
        params
    }

    /// Request body schema, preferring JSON content.
    #[must_use]
    pub fn request_schema(&self, doc: &'a ApiDocument) -> Option<&'a Value> {
        let body = doc.resolve(self.op.get("requestBody")?);
        content_schema(doc, body)
    }

    /// First success response (`2xx`, else `default`) and its schema.
    #[must_use]
    pub fn response(&self, doc: &'a ApiDocument) -> Option<(&'a str, &'a Value)> {
        let responses = self.op.get("responses")?.as_object()?;
        let (status, response) = responses
            .iter()
            .find(|(status, _)| status.starts_with('2'))
            .or_else(|| responses.iter().find(|(status, _)| *status == "default"))?;
        let schema = content_schema(doc, doc.resolve(response))?;
        Some((status.as_str(), schema))
    }
}

fn list(value: Option<&Value>) -> impl Iterator<Item = &Value> {
    value.and_then(Value::as_array).into_iter().flatten()
}

fn same_param(a: &Value, b: &Value) -> bool {
    a.get("name") == b.get("name") && a.get("in") == b.get("in")
}

fn content_schema<'a>(doc: &'a ApiDocument, holder: &'a Value) -> Option<&'a Value> {
    let content: &Map<String, Value> = holder.get("content")?.as_object()?;
    let media = content
        .get("application/json")
        .or_else(|| content.values().next())?;
    media.get("schema").map(|s| doc.resolve(s))
}
