// ==========================================
// SQLite 仓储集成测试
// ==========================================
// 测试目标: 资产/措施/集群风险仓储 + 风险评估
// ==========================================


use climate_invest_optimizer::api::error::ApiError;
use climate_invest_optimizer::api::optimization_api::OptimizationApi;
use climate_invest_optimizer::config::OptimizerConfig;
use climate_invest_optimizer::domain::optimization::OptimizationRequest;
use climate_invest_optimizer::domain::types::{Level, MeasureType};
use climate_invest_optimizer::engine::{
    BudgetOptimizer, OptimizationError, OptimizationStrategy, RiskAssessmentEngine,
};
use climate_invest_optimizer::repository::{
    ClusterRiskRepository, MeasureRepository, PropertyRepository, RepositoryError,
    SqliteClusterRiskRepository, SqliteMeasureRepository, SqlitePropertyRepository,
};
use std::sync::Arc;
use test_helpers::{
    build_repositories, create_portfolio_db, open_test_connection, CATALOG, RISK_FLOOD,
    RISK_HEAT, RISK_STORM, RISK_WILDFIRE,
};

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

// ==========================================
// 资产仓储
// ==========================================

#[test]
fn test_property_lookup_and_applied_measures() {
    let (_temp_file, db_path) = create_portfolio_db().unwrap();
    let repo = SqlitePropertyRepository::new(&db_path).unwrap();

    let property = repo.find_by_id(2).unwrap().expect("property 2 should exist");
    assert_eq!(property.location, "Valencia Puerto");
    assert_eq!(property.cluster_id, 1);
    assert!(approx(property.total_risk, 0.5));

    assert!(repo.find_by_id(999).unwrap().is_none());

    assert_eq!(repo.applied_measure_names(2).unwrap(), vec!["Drenaje sostenible"]);
    assert!(repo.applied_measure_names(1).unwrap().is_empty());

    let ids: Vec<i64> = repo.list_all().unwrap().iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![1, 2, 3]);

    let in_cluster: Vec<i64> = repo.find_by_cluster(1).unwrap().iter().map(|p| p.id).collect();
    assert_eq!(in_cluster, vec![1, 2]);
}

// ==========================================
// 措施目录仓储
// ==========================================

#[test]
fn test_measure_catalog_keeps_insertion_order() {
    let (_temp_file, db_path) = create_portfolio_db().unwrap();
    let repo = SqliteMeasureRepository::new(&db_path).unwrap();

    let names: Vec<String> = repo.list_all().unwrap().into_iter().map(|m| m.name).collect();
    let expected: Vec<String> = CATALOG.iter().map(|(name, _, _)| name.to_string()).collect();
    assert_eq!(names, expected);

    let plan = repo
        .find_by_name("Plan de emergencia ante inundación")
        .unwrap()
        .unwrap();
    assert_eq!(plan.estimated_cost, 200.0);
    assert_eq!(plan.measure_type, MeasureType::Immaterial);

    assert!(repo.find_by_name("Muro de contención").unwrap().is_none());
}

#[test]
fn test_unknown_measure_type_is_field_error() {
    let (_temp_file, db_path) = create_portfolio_db().unwrap();
    let conn = open_test_connection(&db_path).unwrap();
    conn.execute(
        "INSERT INTO measure (name, estimated_cost, measure_type) VALUES ('Seguro paramétrico', 50, 'financial')",
        [],
    )
    .unwrap();

    let repo = SqliteMeasureRepository::new(&db_path).unwrap();
    let err = repo.list_all().unwrap_err();
    assert!(matches!(err, RepositoryError::FieldValueError { .. }));

    // 优化器整体失败，不返回部分结果
    let optimizer = BudgetOptimizer::new(build_repositories(&db_path).unwrap(), OptimizerConfig::default());
    let request = OptimizationRequest::new(vec![1], 1000.0, OptimizationStrategy::Greedy);
    let err = optimizer.optimize(&request).unwrap_err();
    assert!(matches!(err, OptimizationError::DataSourceFailure { .. }));
    assert_eq!(err.code(), "DATABASE_ERROR");
}

// ==========================================
// 集群风险仓储
// ==========================================

#[test]
fn test_cluster_risk_scores_are_derived() {
    let (_temp_file, db_path) = create_portfolio_db().unwrap();
    let repo = SqliteClusterRiskRepository::new(&db_path).unwrap();

    let risks = repo.find_by_cluster(1).unwrap();
    let ids: Vec<i64> = risks.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![RISK_FLOOD, RISK_HEAT, RISK_STORM]);

    // (0.7·0.7)·(0.9·0.7)
    assert!(approx(risks[0].risk_score, 0.3087));
    assert_eq!(risks[0].levels.consequence, Level::VeryHigh);
    // 全部 medium
    assert!(approx(risks[1].risk_score, 0.0625));
    // (0.3·0.5)·(0.5·0.3)
    assert!(approx(risks[2].risk_score, 0.0225));

    assert!(repo.find_by_cluster(42).unwrap().is_empty());
}

#[test]
fn test_unrecognized_level_text_scores_as_medium() {
    let (_temp_file, db_path) = create_portfolio_db().unwrap();
    let conn = open_test_connection(&db_path).unwrap();
    conn.execute(
        "UPDATE cluster_risk SET exposure = 'extreme', probability = '' WHERE cluster_id = 2 AND risk_id = ?1",
        [RISK_WILDFIRE],
    )
    .unwrap();

    let repo = SqliteClusterRiskRepository::new(&db_path).unwrap();
    let wildfire = repo
        .find_by_cluster(2)
        .unwrap()
        .into_iter()
        .find(|r| r.id == RISK_WILDFIRE)
        .unwrap();

    assert_eq!(wildfire.levels.exposure, Level::Medium);
    assert_eq!(wildfire.levels.probability, Level::Medium);
    // (0.5·0.9)·(0.9·0.5)
    assert!(approx(wildfire.risk_score, 0.2025));
}

// ==========================================
// 风险评估
// ==========================================

#[test]
fn test_risk_assessment_sorted_by_score() {
    let (_temp_file, db_path) = create_portfolio_db().unwrap();
    let engine = RiskAssessmentEngine::new(build_repositories(&db_path).unwrap());

    let assessment = engine.assess(3).unwrap();
    assert_eq!(assessment.property_label, "Alicante Sur");
    let ids: Vec<i64> = assessment.risks.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![RISK_HEAT, RISK_WILDFIRE]);
    assert!(approx(assessment.overall_risk_score, (0.6561 + 0.3969) / 2.0));
    assert_eq!(assessment.risk_level, Level::Medium);

    let assessment = engine.assess(1).unwrap();
    assert!(approx(assessment.overall_risk_score, (0.3087 + 0.0625 + 0.0225) / 3.0));
    assert_eq!(assessment.risk_level, Level::VeryLow);
}

#[test]
fn test_risk_assessment_via_api() {
    let (_temp_file, db_path) = create_portfolio_db().unwrap();
    let repos = build_repositories(&db_path).unwrap();
    let api = OptimizationApi::new(
        Arc::new(BudgetOptimizer::new(repos.clone(), OptimizerConfig::default())),
        Arc::new(RiskAssessmentEngine::new(repos)),
    );

    let assessment = api.risk_assessment(2).unwrap();
    assert_eq!(assessment.risks.len(), 3);
    assert_eq!(assessment.risks[0].name, "Inundación costera/fluvial/pluvial");

    let err = api.risk_assessment(999).unwrap_err();
    assert!(matches!(err, ApiError::PropertyNotFound(999)));
    assert_eq!(err.code(), "PROPERTY_NOT_FOUND");
}

#[test]
fn test_unreachable_database_is_connection_error() {
    let err = match SqlitePropertyRepository::new("/nonexistent/dir/climate.db") {
        Ok(_) => panic!("opening a database in a missing directory should fail"),
        Err(err) => err,
    };
    assert!(matches!(err, RepositoryError::DatabaseConnectionError(_)));

    let err: ApiError = err.into();
    assert_eq!(err.code(), "DATABASE_ERROR");
}
