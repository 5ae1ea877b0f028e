use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use serde_json::{json, Value};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use redisearch_adapter::adapter::{Adapter, AdapterRegistry};
use redisearch_adapter::config;
use redisearch_adapter::schema::{Document, Index};
use redisearch_adapter::search::{Condition, ConditionValue, Search, SortDirection};
use redisearch_adapter::task::{SyncTask, TaskOptions};

#[derive(Parser)]
#[command(version, long_version = env!("BUILD_TIME"), about = "RediSearch adapter admin tool / RediSearch 适配器管理工具")]
struct Cli {
    /// Print the completed task handle of write operations / 输出任务句柄
    #[arg(long, global = true, default_value_t = false)]
    return_task: bool,
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// 索引是否存在
    Exists {
        #[arg(long)]
        schema: String,
    },
    /// 创建索引
    Create {
        #[arg(long)]
        schema: String,
    },
    /// 删除索引
    Drop {
        #[arg(long)]
        schema: String,
    },
    /// 保存文档（JSON文件）
    Save {
        #[arg(long)]
        schema: String,
        #[arg(long)]
        document: String,
    },
    /// 删除文档
    Delete {
        #[arg(long)]
        schema: String,
        #[arg(long)]
        id: String,
    },
    /// 按主键获取文档
    Get {
        #[arg(long)]
        schema: String,
        #[arg(long)]
        id: String,
    },
    /// 搜索
    Search {
        #[arg(long)]
        schema: String,
        /// Full text query / 全文检索
        #[arg(long)]
        query: Option<String>,
        /// field=value, field!=value, field>value, field>=value, field<value, field<=value
        #[arg(long)]
        filter: Vec<String>,
        /// field:asc or field:desc
        #[arg(long)]
        sort: Vec<String>,
        #[arg(long, default_value_t = 0)]
        offset: usize,
        #[arg(long)]
        limit: Option<usize>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration / 加载配置
    let config_path = config::get_config_path();
    let created = !config_path.exists();
    config::init_config().map_err(|e| anyhow!(e))?;
    let app_config = config::config();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| app_config.log.filter.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if created {
        tracing::info!("Created default configuration at {:?}", config_path);
    } else {
        tracing::info!("Loaded configuration from {:?}", config_path);
    }

    let registry = AdapterRegistry::new();
    redisearch_adapter::register_adapters(&registry).await?;
    let adapter = registry
        .create_adapter("default", &app_config.adapter.adapter_type, app_config.adapter_config())
        .await?;

    let options = if cli.return_task {
        TaskOptions::with_task()
    } else {
        TaskOptions::default()
    };

    let output = run(cli.cmd, &**adapter, &options).await?;
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

async fn run(cmd: Cmd, adapter: &dyn Adapter, options: &TaskOptions) -> Result<Value> {
    let output = match cmd {
        Cmd::Exists { schema } => {
            let index = load_schema(&schema)?;
            json!({ "exists": adapter.schema_manager().exist_index(&index).await? })
        }
        Cmd::Create { schema } => {
            let index = load_schema(&schema)?;
            task_output(adapter.schema_manager().create_index(&index, options).await?)
        }
        Cmd::Drop { schema } => {
            let index = load_schema(&schema)?;
            task_output(adapter.schema_manager().drop_index(&index, options).await?)
        }
        Cmd::Save { schema, document } => {
            let index = load_schema(&schema)?;
            let document = load_document(&document)?;
            task_output(adapter.indexer().save(&index, &document, options).await?)
        }
        Cmd::Delete { schema, id } => {
            let index = load_schema(&schema)?;
            task_output(adapter.indexer().delete(&index, &id, options).await?)
        }
        Cmd::Get { schema, id } => {
            let index = load_schema(&schema)?;
            let search = Search::new(index)
                .with_filter(Condition::identifier(id))
                .with_limit(1);
            let document = adapter.searcher().search(&search).await?.into_iter().next();
            json!({ "document": document })
        }
        Cmd::Search {
            schema,
            query,
            filter,
            sort,
            offset,
            limit,
        } => {
            let mut search = Search::new(load_schema(&schema)?).with_offset(offset);
            if let Some(query) = query {
                search = search.with_filter(Condition::search(query));
            }
            for expression in &filter {
                search = search.with_filter(parse_filter(expression)?);
            }
            for expression in &sort {
                let (field, direction) = parse_sort(expression)?;
                search = search.with_sort(field, direction);
            }
            if let Some(limit) = limit {
                search = search.with_limit(limit);
            }

            let result = adapter.searcher().search(&search).await?;
            let total = result.total;
            let documents: Vec<Document> = result.into_iter().collect();
            json!({ "total": total, "documents": documents })
        }
    };

    Ok(output)
}

fn task_output(task: Option<SyncTask>) -> Value {
    json!({ "ok": true, "task": task })
}

fn load_schema(path: &str) -> Result<Index> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read schema file: {}", path))?;
    Ok(Index::from_json(&content)?)
}

fn load_document(path: &str) -> Result<Document> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read document file: {}", path))?;
    match serde_json::from_str(&content)? {
        Value::Object(document) => Ok(document),
        _ => Err(anyhow!("Document must be a JSON object: {}", path)),
    }
}

/// `field<op>value`; the value is read as JSON first so numbers and booleans keep their type
fn parse_filter(expression: &str) -> Result<Condition> {
    // 两字符运算符优先匹配
    const OPERATORS: [&str; 6] = ["!=", ">=", "<=", "=", ">", "<"];

    let (position, operator) = OPERATORS
        .iter()
        .filter_map(|op| expression.find(op).map(|position| (position, *op)))
        .min_by_key(|(position, op)| (*position, std::cmp::Reverse(op.len())))
        .ok_or_else(|| anyhow!("Invalid filter: {}", expression))?;

    let field = expression[..position].trim();
    let raw = expression[position + operator.len()..].trim();
    if field.is_empty() {
        return Err(anyhow!("Invalid filter: {}", expression));
    }

    let value: ConditionValue = serde_json::from_str(raw).unwrap_or_else(|_| ConditionValue::from(raw));
    Ok(match operator {
        "!=" => Condition::not_equal(field, value),
        ">=" => Condition::greater_than_equal(field, value),
        "<=" => Condition::less_than_equal(field, value),
        ">" => Condition::greater_than(field, value),
        "<" => Condition::less_than(field, value),
        _ => Condition::equal(field, value),
    })
}

fn parse_sort(expression: &str) -> Result<(String, SortDirection)> {
    match expression.rsplit_once(':') {
        Some((field, direction)) => {
            let direction = direction.parse().map_err(|e: String| anyhow!(e))?;
            Ok((field.to_string(), direction))
        }
        None => Ok((expression.to_string(), SortDirection::Asc)),
    }
}
