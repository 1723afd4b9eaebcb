// ==========================================
// TIPO DE PROCESO 分类系统 - 核心库
// ==========================================
// 职责: 报关商品报表 → 标签工艺分类（ADHERIBLE / COSTURA / SIN NORMA / CUMPLE）
// 流程: 数据源加载 → 字段解析 → 分类规则 → 一致性协调 → 导出 → 历史合并
// 并发: 单线程、同步
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 导入层 - 外部数据
pub mod importer;

// 引擎层 - 分类规则
pub mod engine;

// 持久化层 - 历史表 / 报表登记
pub mod repository;

// 导出层 - 结果表 / 目录转换
pub mod exporter;

// 配置层 - 路径与规则开关
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一）
pub mod db;

// 日志系统
pub mod logging;

// API 层 - 业务接口
pub mod api;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域
pub use domain::{labels, ReportLayout, ResultRow, SourceKind, Table};

// 引擎
pub use engine::{
    ClassificationRules, PipelineContext, ProgressSink, Reconciler, RuleOptions, RunSummary,
};

// API
pub use api::{ApiError, ApiResult, ProcessReportRequest, ReportApi};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "Clasificador de TIPO DE PROCESO";
