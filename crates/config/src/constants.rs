pub const TOP_LEVEL_DOMAIN: &str = "org";
pub const AUTHOR: &str = "digital-catalog";
pub const APP_NAME: &str = "catalog";

/// 命令行工具配置文件名
pub const CLI_CONFIG_FILE_NAME: &str = "cli.toml";

/// 索引目录名（位于数据目录下）
pub const INDEX_DIR_NAME: &str = "index";
