//! Reserva Server - 餐厅桌台预订与菜单后端
//!
//! # 架构概述
//!
//! 本模块是预订服务的主入口，提供以下核心功能：
//!
//! - **预订引擎** (`reservations`): 空位查询、原子预订、整区批量预订
//! - **库存台账** (`stock`): 菜品库存的守卫式增减
//! - **数据库** (`db`): SQLite (WAL) 存储与仓储层
//! - **认证** (`auth`): JWT 认证与角色检查
//! - **HTTP API** (`api`): RESTful API 接口
//! - **报表** (`reports`): 只读统计投影
//!
//! # 模块结构
//!
//! ```text
//! reserva-server/src/
//! ├── core/          # 配置、状态、服务器
//! ├── auth/          # JWT 认证、中间件
//! ├── api/           # HTTP 路由和处理器
//! ├── reservations/  # 预订引擎 (一致性核心)
//! ├── stock/         # 库存台账
//! ├── reports/       # 统计报表
//! ├── utils/         # 工具函数
//! └── db/            # 数据库层
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod reports;
pub mod reservations;
pub mod stock;
pub mod utils;

// Re-export 公共类型
pub use auth::{CurrentUser, JwtService, Role};
pub use core::{Config, Server, ServerState};
pub use reservations::{AvailabilityCache, CreateReservation, ReservationError};
pub use utils::{AppError, AppResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

pub fn print_banner() {
    println!(
        r#"
    ____
   / __ \___  ________  ______   ______ _
  / /_/ / _ \/ ___/ _ \/ ___/ | / / __ `/
 / _, _/  __(__  )  __/ /   | |/ / /_/ /
/_/ |_|\___/____/\___/_/    |___/\__,_/
    "#
    );
}

/// 设置运行环境: dotenv, 工作目录, 日志
pub fn setup_environment() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    let work_dir = std::env::var("WORK_DIR").unwrap_or_else(|_| "/var/lib/reserva".into());
    std::fs::create_dir_all(&work_dir)?;

    let log_dir = format!("{}/logs", work_dir.trim_end_matches('/'));
    std::fs::create_dir_all(&log_dir)?;

    let log_level = std::env::var("LOG_LEVEL").ok();
    init_logger_with_file(log_level.as_deref(), Some(&log_dir));

    Ok(())
}
