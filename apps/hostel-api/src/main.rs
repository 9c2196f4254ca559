//! 宿舍管理 HTTP API：角色仪表盘、工单、检索、人员目录与房间图片。

mod handlers;
mod middleware;
mod routes;
mod utils;

#[cfg(test)]
mod test_support;

use hostel_auth::{Authenticator, DocumentProfileDirectory, IdentityResolver, JwtManager};
use hostel_blob::{BlobStore, HttpBlobStore, InMemoryBlobStore};
use hostel_config::AppConfig;
use hostel_dashboard::{DashboardService, DirectoryService};
use hostel_issues::IssueService;
use hostel_search::SearchService;
use hostel_storage::{DocumentStore, InMemoryDocumentStore, PgDocumentStore, seed_demo};
use hostel_telemetry::init_tracing;
use std::sync::Arc;

/// 请求处理共享状态：启动时构造一次，各服务通过构造函数注入存储。
#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<dyn Authenticator>,
    pub dashboard: Arc<DashboardService>,
    pub directory: Arc<DirectoryService>,
    pub issues: Arc<IssueService>,
    pub search: Arc<SearchService>,
    pub blob: Arc<dyn BlobStore>,
    pub settings: ApiSettings,
}

/// HTTP 层使用的运行参数。
#[derive(Debug, Clone)]
pub struct ApiSettings {
    pub blob_folder: String,
    pub max_image_bytes: usize,
    pub issue_list_limit: usize,
}

impl ApiSettings {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            blob_folder: config.blob.folder.clone(),
            max_image_bytes: config.blob.max_image_bytes,
            issue_list_limit: config.issue_list_limit,
        }
    }
}

impl AppState {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        auth: Arc<dyn Authenticator>,
        blob: Arc<dyn BlobStore>,
        settings: ApiSettings,
    ) -> Self {
        Self {
            auth,
            dashboard: Arc::new(DashboardService::new(store.clone())),
            directory: Arc::new(DirectoryService::new(store.clone())),
            issues: Arc::new(IssueService::new(store.clone())),
            search: Arc::new(SearchService::new(store)),
            blob,
            settings,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 加载本地 .env（如存在），便于直接 cargo run 启动
    dotenvy::dotenv().ok();
    // 从环境变量加载运行配置
    let config = AppConfig::from_env()?;
    // 初始化结构化日志
    init_tracing();

    // 文档存储：配置了数据库时使用 Postgres，否则使用内存存储 + 演示数据
    let store: Arc<dyn DocumentStore> = match &config.database_url {
        Some(url) => {
            let store = PgDocumentStore::connect(url).await?;
            store.ensure_schema().await?;
            Arc::new(store)
        }
        None => {
            tracing::warn!(target: "hostel.api", "HOSTEL_DATABASE_URL not set, using in-memory store with demo data");
            let store = InMemoryDocumentStore::new();
            seed_demo(&store);
            Arc::new(store)
        }
    };

    // 对象存储：配置了上传地址时走 HTTP，否则保存在内存中
    let blob: Arc<dyn BlobStore> = match &config.blob.endpoint {
        Some(endpoint) => Arc::new(HttpBlobStore::new(
            reqwest::Client::new(),
            endpoint.clone(),
            config.blob.api_key.clone(),
        )),
        None => Arc::new(InMemoryBlobStore::new()),
    };

    // 身份解析：JWT + 员工档案作用域补全
    let jwt = JwtManager::new(config.jwt_secret.clone(), config.jwt_issuer.clone());
    let resolver = IdentityResolver::new(jwt)
        .with_profiles(Arc::new(DocumentProfileDirectory::new(store.clone())));

    let state = AppState::new(store, Arc::new(resolver), blob, ApiSettings::from_config(&config));
    let app = routes::create_router(state);

    let listener = tokio::net::TcpListener::bind(&config.http_addr).await?;
    tracing::info!(target: "hostel.api", addr = %config.http_addr, "listening");
    axum::serve(listener, app).await?;
    Ok(())
}
