// ==========================================
// CSV 目录导入集成测试
// ==========================================
// 测试目标: 四类 CSV 导入 → SQLite → 优化器可直接使用
// ==========================================


use climate_invest_optimizer::api::error::ApiError;
use climate_invest_optimizer::api::import_api::ImportApi;
use climate_invest_optimizer::domain::optimization::OptimizationRequest;
use climate_invest_optimizer::domain::types::{Level, MeasureType};
use climate_invest_optimizer::engine::OptimizationStrategy;
use climate_invest_optimizer::importer::{CsvCatalogImporter, ImportError, ImportKind};
use climate_invest_optimizer::repository::{
    ClusterRiskRepository, MeasureRepository, PropertyRepository, SqliteClusterRiskRepository,
    SqliteMeasureRepository, SqlitePropertyRepository,
};
use std::path::Path;
use std::sync::Arc;
use test_helpers::{build_optimizer, create_test_db, open_test_connection, write_csv};

const MEASURES_CSV: &str = "\u{feff}Name,Estimated_Cost,Type
Drenaje sostenible,1200,material
Cubierta verde,800,natural
Plan de emergencia ante inundación,200,inmaterial
";

const PROPERTIES_CSV: &str = "id,location,cluster_id,total_risk
1,Madrid Centro,1,0.35

2,Valencia Puerto,1,0.5
";

const RISKS_CSV: &str = "cluster_id,risk_id,risk_name,exposure,sensitivity,consequence,probability
1,1,Inundación costera/fluvial/pluvial,high,high,very_high,high
1,2,Ola de calor,Medium,medium,MEDIUM,desconocido
";

fn import_all(importer: &CsvCatalogImporter) {
    for (kind, content) in [
        (ImportKind::Measures, MEASURES_CSV),
        (ImportKind::Properties, PROPERTIES_CSV),
        (ImportKind::ClusterRisks, RISKS_CSV),
    ] {
        let file = write_csv(content).unwrap();
        importer.import(kind, file.path()).unwrap();
    }
}

fn row_count(db_path: &str, table: &str) -> i64 {
    let conn = open_test_connection(db_path).unwrap();
    conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| row.get(0))
        .unwrap()
}

// ==========================================
// 正常导入
// ==========================================

#[test]
fn test_import_full_catalog() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    let importer = CsvCatalogImporter::new(&db_path).unwrap();

    let measures = write_csv(MEASURES_CSV).unwrap();
    assert_eq!(importer.import_measures(measures.path()).unwrap(), 3);

    let properties = write_csv(PROPERTIES_CSV).unwrap();
    assert_eq!(importer.import_properties(properties.path()).unwrap(), 2);

    let risks = write_csv(RISKS_CSV).unwrap();
    assert_eq!(importer.import_cluster_risks(risks.path()).unwrap(), 2);

    // 目录顺序 + 类型拼写兼容
    let catalog = SqliteMeasureRepository::new(&db_path).unwrap().list_all().unwrap();
    assert_eq!(catalog.len(), 3);
    assert_eq!(catalog[2].name, "Plan de emergencia ante inundación");
    assert_eq!(catalog[2].measure_type, MeasureType::Immaterial);

    // 集群自动登记
    assert_eq!(row_count(&db_path, "cluster"), 1);

    let property = SqlitePropertyRepository::new(&db_path).unwrap().find_by_id(2).unwrap().unwrap();
    assert_eq!(property.location, "Valencia Puerto");

    // 等级大小写不敏感，无法识别的按 medium
    let risks = SqliteClusterRiskRepository::new(&db_path).unwrap().find_by_cluster(1).unwrap();
    assert_eq!(risks.len(), 2);
    assert_eq!(risks[1].levels.exposure, Level::Medium);
    assert_eq!(risks[1].levels.probability, Level::Medium);
    assert!((risks[1].risk_score - 0.0625).abs() < 1e-12);
}

#[test]
fn test_reimport_updates_existing_rows() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    let importer = CsvCatalogImporter::new(&db_path).unwrap();
    import_all(&importer);

    let update = write_csv("name,estimated_cost,type\nCubierta verde,950,natural\n").unwrap();
    assert_eq!(importer.import_measures(update.path()).unwrap(), 1);

    assert_eq!(row_count(&db_path, "measure"), 3);
    let repo = SqliteMeasureRepository::new(&db_path).unwrap();
    let cubierta = repo.find_by_name("Cubierta verde").unwrap().unwrap();
    assert_eq!(cubierta.estimated_cost, 950.0);
}

#[test]
fn test_applied_measures_are_excluded_from_optimization() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    let importer = CsvCatalogImporter::new(&db_path).unwrap();
    import_all(&importer);

    let applied = write_csv(
        "property_id,measure_name\n1,Cubierta verde\n1,Cubierta verde\n2,Drenaje sostenible\n",
    )
    .unwrap();
    // 重复记录忽略
    assert_eq!(importer.import_applied_measures(applied.path()).unwrap(), 2);

    let repo = SqlitePropertyRepository::new(&db_path).unwrap();
    assert_eq!(repo.applied_measure_names(1).unwrap(), vec!["Cubierta verde"]);

    let optimizer = build_optimizer(&db_path).unwrap();
    let result = optimizer
        .optimize(&OptimizationRequest::new(vec![1, 2], 100_000.0, OptimizationStrategy::Greedy))
        .unwrap();
    assert_eq!(result.measure_count(), 4);
    assert!(!result
        .recommended_measures
        .iter()
        .any(|m| m.property_id == 1 && m.measure.name == "Cubierta verde"));
}

// ==========================================
// 拒绝整个文件
// ==========================================

#[test]
fn test_invalid_row_rejects_whole_file() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    let importer = CsvCatalogImporter::new(&db_path).unwrap();

    let file = write_csv(
        "name,estimated_cost,type\nDrenaje sostenible,1200,material\nCubierta verde,ochocientos,natural\n",
    )
    .unwrap();
    let err = importer.import_measures(file.path()).unwrap_err();
    match err {
        ImportError::TypeConversionError { row, field, .. } => {
            assert_eq!(row, 2);
            assert_eq!(field, "estimated_cost");
        }
        other => panic!("unexpected error: {:?}", other),
    }
    assert_eq!(row_count(&db_path, "measure"), 0);

    let file = write_csv("name,estimated_cost,type\nSeguro,100,financial\n").unwrap();
    assert!(matches!(
        importer.import_measures(file.path()),
        Err(ImportError::TypeConversionError { .. })
    ));

    let file = write_csv("name,estimated_cost,type\nGratis,0,natural\n").unwrap();
    assert!(matches!(
        importer.import_measures(file.path()),
        Err(ImportError::TypeConversionError { .. })
    ));
}

#[test]
fn test_foreign_key_violation_reports_row() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    let importer = CsvCatalogImporter::new(&db_path).unwrap();
    import_all(&importer);

    let file = write_csv(
        "property_id,measure_name\n1,Cubierta verde\n2,Muro de contención\n",
    )
    .unwrap();
    let err = importer.import_applied_measures(file.path()).unwrap_err();
    assert!(matches!(err, ImportError::ForeignKeyViolation { row: 2, .. }));

    // 事务回滚，第 1 行也未写入
    assert_eq!(row_count(&db_path, "property_measure"), 0);
}

#[test]
fn test_missing_column_and_file_errors() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    let importer = CsvCatalogImporter::new(&db_path).unwrap();

    let file = write_csv("id,location,total_risk\n1,Madrid,0.3\n").unwrap();
    match importer.import_properties(file.path()).unwrap_err() {
        ImportError::MissingColumn(column) => assert_eq!(column, "cluster_id"),
        other => panic!("unexpected error: {:?}", other),
    }

    let err = importer
        .import_measures(Path::new("/nonexistent/dir/measures.csv"))
        .unwrap_err();
    assert!(matches!(err, ImportError::FileNotFound(_)));

    let xlsx = tempfile::Builder::new().suffix(".xlsx").tempfile().unwrap();
    let err = importer.import_measures(xlsx.path()).unwrap_err();
    assert!(matches!(err, ImportError::UnsupportedFormat(_)));
}

// ==========================================
// API 层
// ==========================================

#[test]
fn test_import_api_response_and_errors() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    let api = ImportApi::new(Arc::new(CsvCatalogImporter::new(&db_path).unwrap()));

    let file = write_csv(MEASURES_CSV).unwrap();
    let path = file.path().to_str().unwrap();
    let response = api.import_csv("measures", path).unwrap();
    assert_eq!(response.kind, "measures");
    assert_eq!(response.imported, 3);
    assert_eq!(response.source_file, path);

    let err = api.import_csv("roller_campaigns", path).unwrap_err();
    assert!(matches!(err, ApiError::InvalidInput(_)));

    let err = api.import_csv("properties", "/nonexistent/properties.csv").unwrap_err();
    assert!(matches!(err, ApiError::ImportError(_)));
    assert_eq!(err.code(), "IMPORT_ERROR");
}
