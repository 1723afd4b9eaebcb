// ==========================================
// TIPO DE PROCESO 分类系统 - API 层
// ==========================================
// 职责: 提供业务 API 接口,供命令行调用
// ==========================================

pub mod catalog_api;
pub mod config_api;
pub mod dashboard_api;
pub mod error;
pub mod report_api;

// 重导出核心类型
pub use catalog_api::CatalogApi;
pub use config_api::{ConfigApi, ConfigItem};
pub use dashboard_api::{DashboardApi, DashboardStats};
pub use error::{ApiError, ApiResult};
pub use report_api::{
    HistoryStatus, ProcessReportRequest, ProcessReportResponse, ReportApi,
};
