use super::{Command, print_json};
use crate::cli::Kind;
use crate::error::Result;
use catalog::{LoadProductsQuery, SearchCategoryQuery, Store, compile_load_products, compile_search_categories};
use catalog_search::{DocumentType, DslPhraseParser, FieldPathSet, IncludeRuleTable};
use serde_json::{Value, json};

/// 不访问索引，只展示查询编译结果
pub struct ExplainCommand {
    kind: Kind,
    fields: Vec<String>,
    ids: Vec<String>,
}

impl ExplainCommand {
    pub fn new(kind: Kind, fields: Vec<String>, ids: Vec<String>) -> Self {
        Self { kind, fields, ids }
    }

    fn explain(&self) -> Result<Value> {
        let paths: FieldPathSet = self.fields.iter().map(String::as_str).collect();
        let document_type = match self.kind {
            Kind::Product => DocumentType::Product,
            Kind::Category => DocumentType::Category,
        };
        let table = IncludeRuleTable::for_document(document_type);

        let query = match self.kind {
            Kind::Product => compile_load_products(&LoadProductsQuery::new(self.ids.iter().cloned(), paths.clone()))?,
            Kind::Category => {
                let query = SearchCategoryQuery {
                    object_ids: self.ids.clone(),
                    include_fields: paths.clone(),
                    ..Default::default()
                };
                let store = Store {
                    id: String::new(),
                    catalog: "<catalog>".to_string(),
                };
                compile_search_categories(&DslPhraseParser, &query, &store)?
            }
        };

        Ok(json!({
            "table": table.name,
            "rules": table.explain(&paths),
            "includeFields": table.resolve(&paths),
            "query": query,
        }))
    }
}

#[async_trait::async_trait]
impl Command for ExplainCommand {
    async fn execute(&self) -> Result<()> {
        print_json(&self.explain()?)
    }
}
