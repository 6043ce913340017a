// catalog-search/src/schema/builder.rs
//! Schema 构建器
//!
//! 构建 Tantivy 索引 Schema，统一管理字段配置

use tantivy::Index;
use tantivy::schema::*;
use tantivy_jieba::JiebaTokenizer;

use super::fields::*;

/// 中文分词器名称
pub const JIEBA_TOKENIZER: &str = "jieba";

/// 构建 Tantivy Schema
///
/// # 字段
/// - `__key`: 类型 + ID 组合键，精确匹配
/// - `__id`: 文档 ID，精确匹配，存储
/// - `__type`: 文档类型，精确匹配
/// - `__outline`: 分类路径，多值精确匹配
/// - `__content`: 全文检索，中文分词
/// - `__object`: 对象主体 JSON，原样分词，支持过滤和范围查询
/// - `__source`: 完整文档 JSON，仅存储
pub fn build_schema() -> Schema {
    let mut schema_builder = Schema::builder();

    schema_builder.add_text_field(FIELD_KEY, STRING);
    schema_builder.add_text_field(FIELD_DOC_ID, STRING | STORED);
    schema_builder.add_text_field(FIELD_TYPE, STRING);
    schema_builder.add_text_field(FIELD_OUTLINE, STRING);

    // 中文分词配置（搜索短语）
    let content_options = TextOptions::default().set_indexing_options(
        TextFieldIndexing::default()
            .set_tokenizer(JIEBA_TOKENIZER)
            .set_index_option(IndexRecordOption::WithFreqsAndPositions),
    );
    schema_builder.add_text_field(FIELD_CONTENT, content_options);

    // 对象主体不分词，过滤条件按原值精确匹配
    let object_options = JsonObjectOptions::default()
        .set_indexing_options(
            TextFieldIndexing::default()
                .set_tokenizer("raw")
                .set_index_option(IndexRecordOption::Basic),
        )
        .set_fast(Some("raw"));
    schema_builder.add_json_field(GROUP_OBJECT, object_options);

    schema_builder.add_text_field(FIELD_SOURCE, STORED);

    schema_builder.build()
}

/// 注册自定义分词器
pub fn register_tokenizers(index: &Index) {
    index.tokenizers().register(JIEBA_TOKENIZER, JiebaTokenizer {});
}

/// Schema 字段辅助结构
///
/// 缓存字段引用，避免重复查找
#[derive(Debug, Clone, Copy)]
pub struct SchemaFields {
    pub key: Field,
    pub doc_id: Field,
    pub doc_type: Field,
    pub outline: Field,
    pub content: Field,
    pub object: Field,
    pub source: Field,
}

impl SchemaFields {
    /// 从 Schema 中提取所有字段引用
    pub fn from_schema(schema: &Schema) -> tantivy::Result<Self> {
        Ok(Self {
            key: schema.get_field(FIELD_KEY)?,
            doc_id: schema.get_field(FIELD_DOC_ID)?,
            doc_type: schema.get_field(FIELD_TYPE)?,
            outline: schema.get_field(FIELD_OUTLINE)?,
            content: schema.get_field(FIELD_CONTENT)?,
            object: schema.get_field(GROUP_OBJECT)?,
            source: schema.get_field(FIELD_SOURCE)?,
        })
    }
}
