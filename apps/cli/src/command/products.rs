use super::{Command, catalog_context, print_json};
use crate::config::Config;
use crate::error::Result;
use catalog::{CatalogError, ProductNode, load_product_nodes};
use catalog_search::{Document, Selection};
use serde_json::{Map, Value, json};

pub struct ProductsCommand {
    config: Config,
    store: String,
    ids: Vec<String>,
    fields: Vec<String>,
}

impl ProductsCommand {
    pub fn new(cfg: Config, store: String, ids: Vec<String>, fields: Vec<String>) -> Self {
        Self {
            config: cfg,
            store,
            ids,
            fields,
        }
    }
}

#[async_trait::async_trait]
impl Command for ProductsCommand {
    async fn execute(&self) -> Result<()> {
        let ctx = catalog_context(&self.config)?;
        let selection = Selection::from_paths(self.fields.iter().map(String::as_str));

        let nodes = load_product_nodes(&ctx, &self.store, &self.ids, &selection).await?;
        let output: Vec<Value> = nodes.iter().map(node_json).collect();
        print_json(&output)
    }
}

/// 嵌套字段失败时输出 `{"error": ...}`，不影响其他字段
fn node_json(node: &ProductNode) -> Value {
    let mut output = document_json(&node.product);

    if let Some(category) = &node.category {
        let value = match category {
            Ok(Some(doc)) => Value::Object(document_json(doc)),
            Ok(None) => Value::Null,
            Err(e) => error_json(e),
        };
        output.insert("category".to_string(), value);
    }
    if let Some(variations) = &node.variations {
        let value = match variations {
            Ok(docs) => Value::Array(docs.iter().map(|d| Value::Object(document_json(d))).collect()),
            Err(e) => error_json(e),
        };
        output.insert("variations".to_string(), value);
    }

    Value::Object(output)
}

fn document_json(doc: &Document) -> Map<String, Value> {
    let mut output = Map::new();
    output.insert("id".to_string(), json!(doc.id));
    output.extend(doc.source.clone());
    output
}

fn error_json(error: &CatalogError) -> Value {
    json!({ "error": error.to_string(), "retryable": error.is_retryable() })
}
