// catalog-search/src/include_rules.rs
//! Include 规则表
//!
//! 根据客户端请求的字段路径，决定需要从索引取回哪些字段组。
//! 每条规则由触发条件和取回内容组成；结果是所有触发规则的并集，
//! 与规则顺序无关。

use std::collections::BTreeSet;

use serde::Serialize;

use crate::field_path::{FieldPath, FieldPathSet};
use crate::schema::{DocumentType, FieldGroup, FieldRef, IndexField};

/// 规则触发条件（均忽略大小写）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// 总是触发
    Always,
    /// 任意路径以该前缀开头
    AnyPrefix(&'static str),
    /// 任意路径包含其中一个子串
    AnyContains(&'static [&'static str]),
}

impl Trigger {
    pub fn matches(&self, path: &FieldPath) -> bool {
        match self {
            Trigger::Always => true,
            Trigger::AnyPrefix(prefix) => path.starts_with_ignore_case(prefix),
            Trigger::AnyContains(needles) => {
                needles.iter().any(|needle| path.contains_ignore_case(needle))
            }
        }
    }

    /// 触发路径投影后的剩余部分（前缀触发时剥离前缀）
    fn projected<'a>(&self, path: &'a FieldPath) -> Option<&'a str> {
        match self {
            Trigger::AnyPrefix(prefix) => path.strip_prefix_ignore_case(prefix),
            _ if self.matches(path) => Some(path.as_str()),
            _ => None,
        }
    }
}

/// 规则触发后取回的内容
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Inclusion {
    /// 每个触发路径一一映射到字段组内，外加隐含字段
    Project {
        group: FieldGroup,
        implicit: &'static [&'static str],
    },
    /// 固定字段列表
    Fields(&'static [FieldRef]),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IncludeRule {
    pub name: &'static str,
    pub trigger: Trigger,
    pub inclusion: Inclusion,
}

impl IncludeRule {
    /// 规则对给定路径集合产生的字段；未触发时为空
    pub fn evaluate(&self, paths: &FieldPathSet) -> BTreeSet<IndexField> {
        let mut fields = BTreeSet::new();
        let triggered: Vec<&FieldPath> = paths.iter().filter(|p| self.trigger.matches(p)).collect();
        let fires = self.trigger == Trigger::Always || !triggered.is_empty();
        if !fires {
            return fields;
        }

        match self.inclusion {
            Inclusion::Project { group, implicit } => {
                fields.extend(
                    triggered
                        .iter()
                        .filter_map(|p| self.trigger.projected(p))
                        .filter_map(FieldPath::new)
                        .map(|p| IndexField::new(group, p.as_str())),
                );
                fields.extend(implicit.iter().map(|path| IndexField::new(group, *path)));
            }
            Inclusion::Fields(list) => {
                fields.extend(list.iter().map(|f| f.to_index_field()));
            }
        }
        fields
    }
}

/// 单条规则的解析结果（用于诊断输出）
#[derive(Debug, Clone, Serialize)]
pub struct RuleOutcome {
    pub rule: &'static str,
    pub fields: BTreeSet<IndexField>,
}

/// 有序规则表
#[derive(Debug)]
pub struct IncludeRuleTable {
    pub name: &'static str,
    pub rules: &'static [IncludeRule],
}

impl IncludeRuleTable {
    /// 按文档类型选择规则表
    pub fn for_document(document_type: DocumentType) -> &'static IncludeRuleTable {
        match document_type {
            DocumentType::Product => &PRODUCT_INCLUDE_RULES,
            DocumentType::Category => &CATEGORY_INCLUDE_RULES,
        }
    }

    /// 所有触发规则结果的并集
    ///
    /// 纯函数：相同输入总是得到相同结果，结果总包含 `__object.id`。
    pub fn resolve(&self, paths: &FieldPathSet) -> BTreeSet<IndexField> {
        let mut fields: BTreeSet<IndexField> = self
            .rules
            .iter()
            .flat_map(|rule| rule.evaluate(paths))
            .collect();
        fields.insert(IndexField::object_id());
        fields
    }

    /// 逐条列出触发的规则及其字段
    pub fn explain(&self, paths: &FieldPathSet) -> Vec<RuleOutcome> {
        self.rules
            .iter()
            .map(|rule| RuleOutcome {
                rule: rule.name,
                fields: rule.evaluate(paths),
            })
            .filter(|outcome| !outcome.fields.is_empty())
            .collect()
    }
}

const OBJECT: FieldGroup = FieldGroup::Object;

/// 商品规则表
pub static PRODUCT_INCLUDE_RULES: IncludeRuleTable = IncludeRuleTable {
    name: "product",
    rules: &[
        IncludeRule {
            name: "object",
            trigger: Trigger::Always,
            inclusion: Inclusion::Project {
                group: OBJECT,
                implicit: &["id"],
            },
        },
        IncludeRule {
            name: "prices",
            trigger: Trigger::AnyPrefix("prices."),
            inclusion: Inclusion::Project {
                group: FieldGroup::Prices,
                implicit: &["id"],
            },
        },
        IncludeRule {
            name: "variations",
            trigger: Trigger::AnyPrefix("variations."),
            inclusion: Inclusion::Fields(&[FieldRef::whole(FieldGroup::Variations)]),
        },
        IncludeRule {
            name: "category",
            trigger: Trigger::AnyPrefix("category."),
            inclusion: Inclusion::Fields(&[FieldRef::object("categoryId")]),
        },
        IncludeRule {
            name: "master-variation",
            trigger: Trigger::AnyPrefix("masterVariation."),
            inclusion: Inclusion::Project {
                group: OBJECT,
                implicit: &["mainProductId"],
            },
        },
        IncludeRule {
            name: "seo",
            trigger: Trigger::AnyContains(&["slug", "meta"]),
            inclusion: Inclusion::Fields(&[FieldRef::object("seoInfos")]),
        },
        IncludeRule {
            name: "images",
            trigger: Trigger::AnyContains(&["imgSrc"]),
            inclusion: Inclusion::Fields(&[FieldRef::object("images")]),
        },
        IncludeRule {
            name: "brand",
            trigger: Trigger::AnyContains(&["brandName"]),
            inclusion: Inclusion::Fields(&[FieldRef::object("properties")]),
        },
        IncludeRule {
            name: "descriptions",
            trigger: Trigger::AnyContains(&["descriptions"]),
            inclusion: Inclusion::Fields(&[FieldRef::object("reviews")]),
        },
        IncludeRule {
            name: "availability",
            trigger: Trigger::AnyContains(&["availabilityData"]),
            inclusion: Inclusion::Fields(&[
                FieldRef::object("isActive"),
                FieldRef::object("isBuyable"),
                FieldRef::object("trackInventory"),
            ]),
        },
    ],
};

/// 分类规则表
pub static CATEGORY_INCLUDE_RULES: IncludeRuleTable = IncludeRuleTable {
    name: "category",
    rules: &[
        IncludeRule {
            name: "object",
            trigger: Trigger::Always,
            inclusion: Inclusion::Project {
                group: OBJECT,
                implicit: &["id"],
            },
        },
        IncludeRule {
            name: "seo",
            trigger: Trigger::AnyContains(&["slug", "meta"]),
            inclusion: Inclusion::Fields(&[FieldRef::object("seoInfos")]),
        },
        IncludeRule {
            name: "parent",
            trigger: Trigger::AnyContains(&["parent", "hasParent"]),
            inclusion: Inclusion::Fields(&[
                FieldRef::object("parentId"),
                FieldRef::object("outlines"),
            ]),
        },
    ],
};

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn paths(raw: &[&str]) -> FieldPathSet {
        raw.iter().copied().collect()
    }

    fn resolve_product(raw: &[&str]) -> BTreeSet<IndexField> {
        PRODUCT_INCLUDE_RULES.resolve(&paths(raw))
    }

    #[test]
    fn test_requested_paths_with_prices() {
        let fields = resolve_product(&["id", "name", "prices.list"]);
        assert!(fields.contains(&IndexField::object("id")));
        assert!(fields.contains(&IndexField::object("name")));
        assert!(fields.contains(&IndexField::prices("list")));
        assert!(fields.contains(&IndexField::prices("id")));
    }

    #[test]
    fn test_seo_included_once() {
        let fields = resolve_product(&["slug", "metaTitle"]);
        let seo: Vec<_> = fields
            .iter()
            .filter(|f| **f == IndexField::object("seoInfos"))
            .collect();
        assert_eq!(seo.len(), 1);
    }

    #[test]
    fn test_empty_selection_resolves_to_id_only() {
        let fields = resolve_product(&[]);
        assert_eq!(fields, BTreeSet::from([IndexField::object_id()]));
    }

    #[rstest]
    #[case(&["variations.id"], IndexField::whole(FieldGroup::Variations))]
    #[case(&["category.name"], IndexField::object("categoryId"))]
    #[case(&["masterVariation.images"], IndexField::object("mainProductId"))]
    #[case(&["masterVariation.images"], IndexField::object("images"))]
    #[case(&["imgSrc"], IndexField::object("images"))]
    #[case(&["brandName"], IndexField::object("properties"))]
    #[case(&["descriptions.content"], IndexField::object("reviews"))]
    #[case(&["availabilityData.isBuyable"], IndexField::object("trackInventory"))]
    #[case(&["PRICES.sale"], IndexField::prices("sale"))]
    fn test_rule_fires(#[case] raw: &[&str], #[case] expected: IndexField) {
        let fields = resolve_product(raw);
        assert!(fields.contains(&expected), "{expected} not in {fields:?}");
    }

    #[rstest]
    #[case(&["name"], IndexField::prices("id"))]
    #[case(&["name"], IndexField::object("mainProductId"))]
    #[case(&["pricesTotal"], IndexField::prices("id"))]
    #[case(&["categoryId"], IndexField::whole(FieldGroup::Variations))]
    fn test_rule_does_not_fire(#[case] raw: &[&str], #[case] unexpected: IndexField) {
        assert!(!resolve_product(raw).contains(&unexpected));
    }

    #[rstest]
    #[case(&[])]
    #[case(&["name"])]
    #[case(&["prices.list", "slug", "variations.code"])]
    fn test_id_always_present(#[case] raw: &[&str]) {
        assert!(resolve_product(raw).contains(&IndexField::object_id()));
        assert!(
            CATEGORY_INCLUDE_RULES
                .resolve(&paths(raw))
                .contains(&IndexField::object_id())
        );
    }

    #[test]
    fn test_union_distributes() {
        let left = paths(&["name", "prices.list", "slug"]);
        let right = paths(&["category.id", "masterVariation.code", "availabilityData.x"]);

        let combined = PRODUCT_INCLUDE_RULES.resolve(&left.union(&right));
        let separate: BTreeSet<_> = PRODUCT_INCLUDE_RULES
            .resolve(&left)
            .union(&PRODUCT_INCLUDE_RULES.resolve(&right))
            .cloned()
            .collect();
        assert_eq!(combined, separate);
    }

    #[test]
    fn test_resolve_is_pure() {
        let requested = paths(&["prices.list", "imgSrc", "brandName"]);
        assert_eq!(
            PRODUCT_INCLUDE_RULES.resolve(&requested),
            PRODUCT_INCLUDE_RULES.resolve(&requested)
        );
    }

    #[test]
    fn test_category_parent_rule() {
        let fields = CATEGORY_INCLUDE_RULES.resolve(&paths(&["parent.name"]));
        assert!(fields.contains(&IndexField::object("parentId")));
        assert!(fields.contains(&IndexField::object("outlines")));
    }

    #[test]
    fn test_explain_lists_fired_rules() {
        let outcomes = PRODUCT_INCLUDE_RULES.explain(&paths(&["prices.list"]));
        let names: Vec<_> = outcomes.iter().map(|o| o.rule).collect();
        assert_eq!(names, vec!["object", "prices"]);
    }

    #[test]
    fn test_table_for_document() {
        assert_eq!(IncludeRuleTable::for_document(DocumentType::Product).name, "product");
        assert_eq!(IncludeRuleTable::for_document(DocumentType::Category).name, "category");
    }
}
