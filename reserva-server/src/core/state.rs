use sqlx::SqlitePool;
use std::sync::Arc;
use std::time::Duration;

use crate::auth::JwtService;
use crate::core::Config;
use crate::db::DbService;
use crate::reservations::AvailabilityCache;
use crate::utils::AppError;

/// 服务器状态 - 持有所有服务的单例引用
///
/// ServerState 是服务的核心数据结构，使用 Arc 实现浅拷贝，
/// 作为 axum Router 的共享状态注入所有处理函数。
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Config | 配置项 (不可变) |
/// | db | DbService | SQLite 连接池 |
/// | jwt_service | Arc<JwtService> | JWT 认证服务 |
/// | availability_cache | Arc<AvailabilityCache> | 空位查询缓存 |
#[derive(Clone)]
pub struct ServerState {
    /// 服务器配置
    pub config: Config,
    /// 数据库服务
    pub db: DbService,
    /// JWT 认证服务 (Arc 共享所有权)
    pub jwt_service: Arc<JwtService>,
    /// 空位查询缓存 (只服务读路径，预订事务从不读它)
    pub availability_cache: Arc<AvailabilityCache>,
}

impl ServerState {
    /// 初始化所有服务
    ///
    /// 打开数据库 (并运行迁移)、构造 JWT 服务和缓存
    pub async fn initialize(config: &Config) -> Result<Self, AppError> {
        let db = DbService::new(&config.database_path).await?;
        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));
        let availability_cache = Arc::new(AvailabilityCache::new(Duration::from_secs(
            config.availability_cache_ttl_secs,
        )));

        Ok(Self {
            config: config.clone(),
            db,
            jwt_service,
            availability_cache,
        })
    }

    /// 获取数据库连接池
    pub fn pool(&self) -> &SqlitePool {
        &self.db.pool
    }

    /// 获取 JWT 服务
    pub fn jwt_service(&self) -> Arc<JwtService> {
        self.jwt_service.clone()
    }
}
