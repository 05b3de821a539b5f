// ==========================================
// 气候投资优化系统 - 命令行入口
// ==========================================
// 用法:
//   climate-invest-optimizer <db_path> <request.json>        执行预算优化，输出结果 JSON
//   climate-invest-optimizer assess <db_path> <property_id>  输出资产风险评估
//   climate-invest-optimizer import <db_path> <kind> <file.csv>
//   climate-invest-optimizer config <db_path> [<key> <value>]
//
// db_path 传 "-" 时使用默认数据库路径
// ==========================================

use climate_invest_optimizer::app::{get_default_db_path, AppState};
use climate_invest_optimizer::logging;
use std::error::Error;

const USAGE: &str = "用法:
  climate-invest-optimizer <db_path> <request.json>
  climate-invest-optimizer assess <db_path> <property_id>
  climate-invest-optimizer import <db_path> <measures|properties|cluster_risks|applied_measures> <file.csv>
  climate-invest-optimizer config <db_path> [<key> <value>]";

fn resolve_db_path(arg: Option<String>) -> String {
    match arg {
        Some(p) if p != "-" && !p.trim().is_empty() => p,
        _ => get_default_db_path(),
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    logging::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let mut args = args.into_iter();

    let first = args.next().ok_or(USAGE)?;

    match first.as_str() {
        "assess" => {
            let state = AppState::new(resolve_db_path(args.next()))?;
            let property_id: i64 = args.next().ok_or(USAGE)?.trim().parse()?;
            let assessment = state.optimization_api.risk_assessment(property_id)?;
            println!("{}", serde_json::to_string_pretty(&assessment)?);
        }
        "import" => {
            let state = AppState::new(resolve_db_path(args.next()))?;
            let kind = args.next().ok_or(USAGE)?;
            let file = args.next().ok_or(USAGE)?;
            let response = state.import_api.import_csv(&kind, &file)?;
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        "config" => {
            let state = AppState::new(resolve_db_path(args.next()))?;
            if let (Some(key), Some(value)) = (args.next(), args.next()) {
                state.config_manager.set_global_config_value(&key, &value)?;
            }
            println!("{}", state.config_manager.get_config_snapshot()?);
        }
        "-h" | "--help" | "help" => {
            println!("{}", USAGE);
        }
        _ => {
            let state = AppState::new(resolve_db_path(Some(first)))?;
            let request_path = args.next().ok_or(USAGE)?;
            let request_json = std::fs::read_to_string(&request_path)?;
            println!("{}", state.optimization_api.optimize_budget_json(&request_json));
        }
    }

    Ok(())
}
