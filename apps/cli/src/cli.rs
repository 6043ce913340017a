use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Increase verbosity. Can be used multiple times (e.g., -v, -vv, -vvv).
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// 将 JSON 文档数组写入索引
    Index {
        /// 文档文件路径，内容为商品或分类文档的 JSON 数组
        documents: PathBuf,
    },
    /// 按 ID 加载商品，并解析请求的嵌套字段
    Products {
        #[arg(long)]
        store: String,
        #[arg(long, value_delimiter = ',', required = true)]
        ids: Vec<String>,
        /// 输出字段路径，例如 `name,category.name,variations.color`
        #[arg(long, value_delimiter = ',')]
        fields: Vec<String>,
    },
    /// 在商店目录内搜索分类
    Categories {
        #[arg(long)]
        store: String,
        /// 搜索短语
        #[arg(long)]
        query: Option<String>,
        /// 过滤表达式，例如 `name:phones AND NOT code:old`
        #[arg(long)]
        filter: Option<String>,
        #[arg(long)]
        fuzzy: bool,
        #[arg(long, default_value_t = 0)]
        fuzzy_level: i32,
        #[arg(long, default_value_t = 0)]
        skip: i64,
        #[arg(long)]
        take: Option<i64>,
        /// 排序表达式，例如 `priority:desc;name`
        #[arg(long)]
        sort: Option<String>,
        #[arg(long, value_delimiter = ',')]
        ids: Vec<String>,
        #[arg(long, value_delimiter = ',')]
        fields: Vec<String>,
    },
    /// 列出商品关联（游标分页）
    Associations {
        /// 商品 ID
        #[arg(long)]
        id: String,
        /// 每页条数，默认使用配置中的 association-page-size
        #[arg(long)]
        first: Option<i64>,
        /// 上一页的 endCursor
        #[arg(long)]
        after: Option<String>,
        #[arg(long)]
        query: Option<String>,
        #[arg(long)]
        group: Option<String>,
    },
    /// 显示字段选择命中的 include 规则及编译后的查询
    Explain {
        #[arg(long, value_enum, default_value_t = Kind::Product)]
        kind: Kind,
        #[arg(long, value_delimiter = ',')]
        fields: Vec<String>,
        #[arg(long, value_delimiter = ',')]
        ids: Vec<String>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Kind {
    Product,
    Category,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_products() {
        let cli = Cli::parse_from([
            "catalog",
            "-vv",
            "products",
            "--store",
            "electronics",
            "--ids",
            "p1,p2",
            "--fields",
            "name,category.name",
        ]);

        assert_eq!(cli.verbose, 2);
        match cli.command {
            Some(Commands::Products { store, ids, fields }) => {
                assert_eq!(store, "electronics");
                assert_eq!(ids, vec!["p1", "p2"]);
                assert_eq!(fields, vec!["name", "category.name"]);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_products_requires_ids() {
        assert!(Cli::try_parse_from(["catalog", "products", "--store", "electronics"]).is_err());
    }

    #[test]
    fn test_parse_associations() {
        let cli = Cli::parse_from(["catalog", "associations", "--id", "p1", "--after", "19"]);
        match cli.command {
            Some(Commands::Associations { id, first, after, .. }) => {
                assert_eq!(id, "p1");
                assert_eq!(first, None);
                assert_eq!(after.as_deref(), Some("19"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_explain_defaults_to_product() {
        let cli = Cli::parse_from(["catalog", "explain", "--fields", "variations.id"]);
        assert!(matches!(
            cli.command,
            Some(Commands::Explain { kind: Kind::Product, .. })
        ));
    }
}
