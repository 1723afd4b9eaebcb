// ==========================================
// ReportApi / DashboardApi 端到端测试
// ==========================================
// 测试范围:
// - 处理报表: 写出结果 → 合并历史 → 登记报表
// - 版式无法识别时不产生输出
// - 历史表失败降级为警告
// - 新零件号查询、统计面板、目录转换
// - 目录维护: 登记新零件号 / 替换已有条目
// ==========================================


use std::fs;
use test_helpers::TestWorkspace;
use tipo_proceso::api::{
    ApiError, CatalogApi, DashboardApi, HistoryStatus, ProcessReportRequest, ReportApi,
};
use tipo_proceso::domain::{labels, ReportLayout};
use tipo_proceso::engine::NoProgress;
use tipo_proceso::repository::{open_history_store, UpsertOutcome};

fn standard_report(ws: &TestWorkspace) -> std::path::PathBuf {
    ws.write_mimpo_report(
        "reporte_mimpo.csv",
        &[
            &["123", "GORRA", "004"],
            &["456", "BOLSA", "NOM-050-SCFI-2004"],
            &["999", "SIN DATOS", "N/D"],
        ],
    )
}

fn request(reporte: std::path::PathBuf) -> ProcessReportRequest {
    ProcessReportRequest {
        reporte,
        salida: None,
        formato: None,
    }
}

#[test]
fn test_process_report_full_flow() {
    let ws = TestWorkspace::new().unwrap();
    let reporte = standard_report(&ws);
    let api = ReportApi::new(ws.config());

    let response = api
        .process_report(&request(reporte), &mut NoProgress)
        .expect("process report");

    // 输出文件
    assert_eq!(response.salida, ws.path().join("TIPO DE PROCESO.csv"));
    assert!(response.salida.exists());
    let content = fs::read_to_string(&response.salida).unwrap();
    assert!(content.starts_with("ITEM,TIPO DE PROCESO,NORMA,CRITERIO,DESCRIPCION"));

    assert_eq!(response.layout, ReportLayout::Mimpo);
    assert_eq!(response.filas_reporte, 3);
    assert_eq!(response.summary.total, 3);
    let items: Vec<i64> = response.rows.iter().map(|r| r.item).collect();
    assert_eq!(items, vec![123, 456, 999]);
    assert_eq!(response.rows[0].tipo_proceso, labels::COSTURA);
    assert_eq!(response.rows[2].tipo_proceso, labels::SIN_NORMA);
    assert_eq!(response.rows[2].norma, labels::SIN_NORMA);

    // 历史表（默认位于配置目录）
    match &response.historial {
        HistoryStatus::Actualizado { outcome, .. } => {
            assert_eq!(outcome.previous, 0);
            assert_eq!(outcome.added, 3);
            assert_eq!(outcome.total, 3);
        }
        other => panic!("historial no actualizado: {:?}", other),
    }
    let history = open_history_store(&api.config().historial_path())
        .unwrap()
        .load_all()
        .unwrap();
    assert_eq!(history, response.rows);

    assert!(response.archivo_registrado);
    assert!(response.advertencias.is_empty());
}

#[test]
fn test_second_run_updates_history_and_skips_registration() {
    let ws = TestWorkspace::new().unwrap();
    let history_path = ws.set_history("historial.db");
    let reporte = standard_report(&ws);
    let api = ReportApi::new(ws.config());

    api.process_report(&request(reporte.clone()), &mut NoProgress)
        .unwrap();
    let second = api
        .process_report(&request(reporte), &mut NoProgress)
        .unwrap();

    match &second.historial {
        HistoryStatus::Actualizado { outcome, .. } => {
            assert_eq!(outcome.previous, 3);
            assert_eq!(outcome.updated, 3);
            assert_eq!(outcome.added, 0);
        }
        other => panic!("historial no actualizado: {:?}", other),
    }
    assert!(history_path.exists());
    assert!(!second.archivo_registrado);
}

#[test]
fn test_unrecognized_layout_writes_nothing() {
    let ws = TestWorkspace::new().unwrap();
    let reporte = test_helpers::write_csv(
        ws.path(),
        "desconocido.csv",
        &["Codigo", "Texto"],
        &[&["123", "GORRA"]],
    )
    .unwrap();
    let api = ReportApi::new(ws.config());

    let err = api
        .process_report(&request(reporte), &mut NoProgress)
        .unwrap_err();
    assert!(matches!(err, ApiError::LayoutNotRecognized(_)));
    assert!(!ws.path().join("TIPO DE PROCESO.csv").exists());
    assert!(!api.config().historial_path().exists());
}

#[test]
fn test_history_failure_is_a_warning() {
    let ws = TestWorkspace::new().unwrap();
    ws.set_history("historial.xlsx");
    let reporte = standard_report(&ws);
    let api = ReportApi::new(ws.config());

    let response = api
        .process_report(&request(reporte), &mut NoProgress)
        .expect("output survives history failure");

    assert!(matches!(response.historial, HistoryStatus::Fallido { .. }));
    assert_eq!(response.advertencias.len(), 1);
    assert!(response.salida.exists());
    assert!(response.archivo_registrado);
}

#[test]
fn test_progress_is_reported() {
    let ws = TestWorkspace::new().unwrap();
    let reporte = standard_report(&ws);
    let api = ReportApi::new(ws.config());

    let mut fractions = Vec::new();
    let mut sink = |p: tipo_proceso::engine::PipelineProgress| fractions.push(p.fraction);
    api.process_report(&request(reporte), &mut sink).unwrap();

    assert!(!fractions.is_empty());
    assert!(fractions.windows(2).all(|w| w[0] <= w[1]));
    assert_eq!(fractions.last().copied(), Some(1.0));
}

#[test]
fn test_find_new_items() {
    let ws = TestWorkspace::new().unwrap();
    let reporte = ws.write_fh_report(
        "reporte_fh.csv",
        &[&["123", "GORRA", "004"], &["777", "NUEVO", "020"]],
    );
    let api = ReportApi::new(ws.config());

    assert_eq!(api.find_new_items(&reporte).unwrap(), vec![777]);
}

#[test]
fn test_added_item_is_no_longer_new() {
    let ws = TestWorkspace::new().unwrap();
    let reporte = ws.write_fh_report(
        "reporte_fh.csv",
        &[&["123", "GORRA", "004"], &["777", "", "004"]],
    );
    let config = ws.config();
    let catalog = CatalogApi::new(&config);
    let api = ReportApi::new(ws.config());
    assert_eq!(api.find_new_items(&reporte).unwrap(), vec![777]);

    let outcome = catalog
        .add_catalog_item(777, "PANTALON", "NOM004TEXX")
        .unwrap();
    assert_eq!(outcome, UpsertOutcome::Insertado);
    assert!(api.find_new_items(&reporte).unwrap().is_empty());

    let response = api
        .process_report(&request(reporte), &mut NoProgress)
        .unwrap();
    let row = response.rows.iter().find(|r| r.item == 777).unwrap();
    assert_eq!(row.descripcion, "PANTALON");
    assert_eq!(row.tipo_proceso, labels::COSTURA);
}

#[test]
fn test_existing_catalog_entries_are_replaced() {
    let ws = TestWorkspace::new().unwrap();
    let config = ws.config();
    let catalog = CatalogApi::new(&config);

    // 目录中 123 以数字存储,按文本匹配
    assert_eq!(
        catalog.add_catalog_item(123, "GORRA NUEVA", "NOM050").unwrap(),
        UpsertOutcome::Actualizado
    );
    let base: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&ws.base_general).unwrap()).unwrap();
    let records = base.as_array().unwrap();
    assert_eq!(records.len(), 3);
    assert_eq!(records[0]["EAN"], "123");
    assert_eq!(records[0]["CODIGO FORMATO"], "NOM050");

    // 合规目录: 456 替换,777 追加
    assert_eq!(
        catalog
            .add_compliance_item(456, "PENDIENTE", "FALTA ETIQUETA")
            .unwrap(),
        UpsertOutcome::Actualizado
    );
    assert_eq!(
        catalog.add_compliance_item(777, "CUMPLE", "").unwrap(),
        UpsertOutcome::Insertado
    );
    let stats = DashboardApi::new(&config).compliance_stats().unwrap();
    assert_eq!(stats.total_codigos, 3);
    assert_eq!(stats.codigos_cumple, 1);
}

#[test]
fn test_dashboard_stats_after_run() {
    let ws = TestWorkspace::new().unwrap();
    let reporte = standard_report(&ws);
    let config = ws.config();
    ReportApi::new(ws.config())
        .process_report(&request(reporte), &mut NoProgress)
        .unwrap();

    let dashboard = DashboardApi::new(&config);
    let stats = dashboard.dashboard_stats().unwrap();
    // "CUMPLE TOTAL" 不是恰好 CUMPLE
    assert_eq!(stats.codigos.total_codigos, 2);
    assert_eq!(stats.codigos.codigos_cumple, 0);
    assert_eq!(stats.codigos.codigos_revisados, 2);
    assert_eq!(stats.archivos.total_archivos, 1);
    assert_eq!(stats.archivos.archivos_recientes[0].nombre, "reporte_mimpo.csv");
    assert_eq!(stats.total_historial, Some(3));

    dashboard.clear_processed_files().unwrap();
    assert_eq!(dashboard.processed_files().unwrap().total_archivos, 0);
}

#[test]
fn test_convert_catalog_to_json() {
    let ws = TestWorkspace::new().unwrap();
    let source = test_helpers::write_csv(
        ws.path(),
        "BASE GENERAL.csv",
        &["EAN", "DESCRIPTION", "CODIGO FORMATO"],
        &[&["123", "GORRA", "NOM004"], &["124", "", "NOM050"]],
    )
    .unwrap();
    let target = ws.path().join("salida").join("base_general.json");

    let summary = ReportApi::new(ws.config())
        .convert_catalog(&source, &target)
        .unwrap();
    assert_eq!(summary.rows, 2);
    assert_eq!(summary.columns, 3);

    let value: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&target).unwrap()).unwrap();
    assert_eq!(value[0]["EAN"], "123");
    assert!(value[1]["DESCRIPTION"].is_null());
}
