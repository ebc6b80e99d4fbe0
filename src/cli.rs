//! 命令行: 同步批次状态, 查询用户券

use std::io::Write;

use serde_json::Value;

use crate::config::WechatPayConfig;
use crate::error::{AppError, AppResult};
use crate::models::UserCouponsQuery;
use crate::services::BusifavorService;

pub const USAGE: &str = "\
Usage:
  busifavor sync-stock [STOCK_ID]
  busifavor list-user-coupons OPENID [--appid APPID] [--stock-id STOCK_ID]
                                     [--status STATUS] [--limit N] [--offset N]

Commands:
  sync-stock          同步一个批次的状态; 不带 STOCK_ID 时同步本地所有批次
  list-user-coupons   查询用户的商家券 (--limit 默认 10, --offset 默认 0)";

const DEFAULT_LIMIT: u32 = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    SyncStock {
        stock_id: Option<String>,
    },
    ListUserCoupons {
        openid: String,
        appid: Option<String>,
        stock_id: Option<String>,
        status: Option<String>,
        limit: u32,
        offset: u32,
    },
}

/// 解析参数 (不含程序名); 参数错误返回 `ValidationError`
pub fn parse_args<I>(args: I) -> AppResult<Command>
where
    I: IntoIterator<Item = String>,
{
    let mut args = args.into_iter();
    let Some(command) = args.next() else {
        return Err(AppError::ValidationError("missing command".to_string()));
    };

    match command.as_str() {
        "help" | "-h" | "--help" => Ok(Command::Help),
        "sync-stock" => {
            let stock_id = args.next();
            if let Some(extra) = args.next() {
                return Err(AppError::ValidationError(format!(
                    "unexpected argument: {extra}"
                )));
            }
            Ok(Command::SyncStock { stock_id })
        }
        "list-user-coupons" => parse_list_user_coupons(args),
        other => Err(AppError::ValidationError(format!("unknown command: {other}"))),
    }
}

fn parse_list_user_coupons(mut args: impl Iterator<Item = String>) -> AppResult<Command> {
    let mut openid = None;
    let mut appid = None;
    let mut stock_id = None;
    let mut status = None;
    let mut limit = DEFAULT_LIMIT;
    let mut offset = 0;

    while let Some(arg) = args.next() {
        if !arg.starts_with("--") {
            if openid.replace(arg.clone()).is_some() {
                return Err(AppError::ValidationError(format!(
                    "unexpected argument: {arg}"
                )));
            }
            continue;
        }

        // 同时支持 `--key value` 和 `--key=value`
        let (key, inline) = match arg.split_once('=') {
            Some((key, value)) => (key.to_string(), Some(value.to_string())),
            None => (arg.clone(), None),
        };
        let value = match inline.or_else(|| args.next()) {
            Some(value) => value,
            None => {
                return Err(AppError::ValidationError(format!("{key} requires a value")));
            }
        };

        match key.as_str() {
            "--appid" => appid = Some(value),
            "--stock-id" => stock_id = Some(value),
            "--status" => status = Some(value),
            "--limit" => limit = parse_number(&key, &value)?,
            "--offset" => offset = parse_number(&key, &value)?,
            _ => return Err(AppError::ValidationError(format!("unknown option: {key}"))),
        }
    }

    let openid = openid.ok_or_else(|| AppError::ValidationError("missing OPENID".to_string()))?;
    Ok(Command::ListUserCoupons {
        openid,
        appid,
        stock_id,
        status,
        limit,
        offset,
    })
}

fn parse_number(key: &str, value: &str) -> AppResult<u32> {
    value
        .parse()
        .map_err(|_| AppError::ValidationError(format!("{key} expects a number, got {value}")))
}

/// 执行命令并返回进程退出码
pub async fn run(
    command: Command,
    service: &BusifavorService,
    wechat_pay: &WechatPayConfig,
    out: &mut impl Write,
) -> std::io::Result<i32> {
    match command {
        Command::Help => {
            writeln!(out, "{USAGE}")?;
            Ok(0)
        }
        Command::SyncStock {
            stock_id: Some(stock_id),
        } => sync_single_stock(service, &stock_id, out).await,
        Command::SyncStock { stock_id: None } => sync_all_stocks(service, out).await,
        Command::ListUserCoupons {
            openid,
            appid,
            stock_id,
            status,
            limit,
            offset,
        } => {
            let appid = appid
                .filter(|a| !a.is_empty())
                .unwrap_or_else(|| wechat_pay.appid.clone());
            let query = UserCouponsQuery {
                openid,
                appid,
                stock_id,
                status,
                offset: Some(offset),
                limit: Some(limit),
            };
            list_user_coupons(service, query, out).await
        }
    }
}

/// 批次状态优先取 `stock_state`, 其次 `status`
fn stock_state(response: &Value) -> &str {
    ["stock_state", "status"]
        .iter()
        .find_map(|key| response.get(*key).and_then(Value::as_str))
        .unwrap_or("unknown")
}

async fn sync_single_stock(
    service: &BusifavorService,
    stock_id: &str,
    out: &mut impl Write,
) -> std::io::Result<i32> {
    match service.get_stock(stock_id).await {
        Ok(response) => {
            writeln!(
                out,
                "[OK] 批次 {stock_id} 同步成功, 当前状态: {}",
                stock_state(&response)
            )?;
            Ok(0)
        }
        Err(e) => {
            writeln!(out, "[ERROR] 批次 {stock_id} 同步失败: {e}")?;
            Ok(1)
        }
    }
}

async fn sync_all_stocks(service: &BusifavorService, out: &mut impl Write) -> std::io::Result<i32> {
    let report = match service.sync_all_stocks().await {
        Ok(report) => report,
        Err(e) => {
            writeln!(out, "[ERROR] 读取本地批次失败: {e}")?;
            return Ok(1);
        }
    };
    writeln!(out, "本地共 {} 个批次, 开始同步", report.outcomes.len())?;

    for outcome in &report.outcomes {
        match &outcome.result {
            Ok(response) => writeln!(out, "  {}: {}", outcome.stock, stock_state(response))?,
            Err(e) => writeln!(out, "  {}: 同步失败: {e}", outcome.stock)?,
        }
    }

    let (success_count, failed_count) = (report.success_count(), report.failed_count());
    if failed_count == 0 {
        writeln!(out, "[OK] {success_count} 个批次全部同步成功")?;
    } else {
        writeln!(
            out,
            "[WARNING] 同步完成, 成功: {success_count}, 失败: {failed_count}"
        )?;
    }
    Ok(0)
}

async fn list_user_coupons(
    service: &BusifavorService,
    query: UserCouponsQuery,
    out: &mut impl Write,
) -> std::io::Result<i32> {
    if query.appid.is_empty() {
        writeln!(out, "[ERROR] 查询失败: 未指定 appid, 也未配置 WECHAT_APPID")?;
        return Ok(1);
    }

    let response = match service.get_user_coupons(query).await {
        Ok(response) => response,
        Err(e) => {
            writeln!(out, "[ERROR] 查询失败: {e}")?;
            return Ok(1);
        }
    };

    let coupons = response
        .get("data")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();
    if coupons.is_empty() {
        writeln!(out, "[WARNING] 没有符合条件的商家券")?;
        return Ok(0);
    }

    let columns = [
        "coupon_code",
        "stock_id",
        "status",
        "create_time",
        "use_time",
        "expire_time",
    ];
    writeln!(out, "{}", columns.join("\t"))?;
    for coupon in coupons {
        let row: Vec<String> = columns.iter().map(|key| cell(coupon, key)).collect();
        writeln!(out, "{}", row.join("\t"))?;
    }
    writeln!(out, "[OK] 共 {} 张券", coupons.len())?;
    Ok(0)
}

fn cell(coupon: &Value, key: &str) -> String {
    match coupon.get(key) {
        None | Some(Value::Null) => "N/A".to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::stock_entity as stock;
    use crate::repositories::StockRepository;
    use crate::test_utils::{MockBusifavorApi, setup_db};
    use serde_json::json;
    use std::sync::Arc;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn wechat_pay(appid: &str) -> WechatPayConfig {
        WechatPayConfig {
            appid: appid.to_string(),
            ..Default::default()
        }
    }

    async fn run_to_string(
        command: Command,
        service: &BusifavorService,
        appid: &str,
    ) -> (i32, String) {
        let mut out = Vec::new();
        let code = run(command, service, &wechat_pay(appid), &mut out)
            .await
            .unwrap();
        (code, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_parse_sync_stock() {
        assert_eq!(
            parse_args(args(&["sync-stock"])).unwrap(),
            Command::SyncStock { stock_id: None }
        );
        assert_eq!(
            parse_args(args(&["sync-stock", "S1"])).unwrap(),
            Command::SyncStock {
                stock_id: Some("S1".into())
            }
        );
        assert!(parse_args(args(&["sync-stock", "S1", "S2"])).is_err());
    }

    #[test]
    fn test_parse_list_user_coupons_defaults_and_options() {
        assert_eq!(
            parse_args(args(&["list-user-coupons", "o1"])).unwrap(),
            Command::ListUserCoupons {
                openid: "o1".into(),
                appid: None,
                stock_id: None,
                status: None,
                limit: 10,
                offset: 0,
            }
        );
        assert_eq!(
            parse_args(args(&[
                "list-user-coupons",
                "--appid",
                "wx_app",
                "o1",
                "--stock-id=S1",
                "--status",
                "USED",
                "--limit",
                "20",
                "--offset=5",
            ]))
            .unwrap(),
            Command::ListUserCoupons {
                openid: "o1".into(),
                appid: Some("wx_app".into()),
                stock_id: Some("S1".into()),
                status: Some("USED".into()),
                limit: 20,
                offset: 5,
            }
        );
    }

    #[test]
    fn test_parse_rejects_bad_arguments() {
        assert!(parse_args(Vec::<String>::new()).is_err());
        assert!(parse_args(args(&["drop-tables"])).is_err());
        assert!(parse_args(args(&["list-user-coupons"])).is_err());
        assert!(parse_args(args(&["list-user-coupons", "o1", "--limit", "ten"])).is_err());
        assert!(parse_args(args(&["list-user-coupons", "o1", "--appid"])).is_err());
        assert!(parse_args(args(&["list-user-coupons", "o1", "--verbose", "1"])).is_err());
        assert_eq!(parse_args(args(&["--help"])).unwrap(), Command::Help);
    }

    #[test]
    fn test_stock_state_precedence() {
        assert_eq!(stock_state(&json!({"stock_state": "ONGOING", "status": "PAUSED"})), "ONGOING");
        assert_eq!(stock_state(&json!({"status": "PAUSED"})), "PAUSED");
        assert_eq!(stock_state(&json!({})), "unknown");
    }

    #[tokio::test]
    async fn test_sync_single_stock_exit_codes() {
        let api = Arc::new(MockBusifavorApi::new());
        api.respond(json!({"stock_state": "ONGOING"})).await;
        api.fail(AppError::ExternalApiError("GET returned 404".into()))
            .await;
        let service = BusifavorService::new(setup_db().await, api);

        let command = Command::SyncStock {
            stock_id: Some("S1".into()),
        };
        let (code, output) = run_to_string(command.clone(), &service, "").await;
        assert_eq!(code, 0);
        assert!(output.contains("ONGOING"));

        let (code, output) = run_to_string(command, &service, "").await;
        assert_eq!(code, 1);
        assert!(output.contains("returned 404"));
    }

    #[tokio::test]
    async fn test_sync_all_stocks_reports_summary() {
        let db = setup_db().await;
        StockRepository::save(
            &db,
            stock::Model {
                stock_id: "S1".into(),
                stock_name: "新人券".into(),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        let api = Arc::new(MockBusifavorApi::new());
        api.fail(AppError::ExternalApiError("GET returned 500".into()))
            .await;
        let service = BusifavorService::new(db, api);

        let (code, output) =
            run_to_string(Command::SyncStock { stock_id: None }, &service, "").await;
        assert_eq!(code, 0);
        assert!(output.contains("新人券 (S1)"));
        assert!(output.contains("失败: 1"));
    }

    #[tokio::test]
    async fn test_list_user_coupons_prints_rows() {
        let api = Arc::new(MockBusifavorApi::new());
        api.respond(json!({
            "data": [{
                "coupon_code": "COUPON123",
                "stock_id": "STOCK123",
                "status": "SENDED",
                "create_time": "2023-01-01 10:00:00",
                "use_time": null,
                "expire_time": "2023-12-31 23:59:59",
            }]
        }))
        .await;
        let service = BusifavorService::new(setup_db().await, api.clone());

        let command = parse_args(args(&["list-user-coupons", "o1"])).unwrap();
        let (code, output) = run_to_string(command, &service, "wx_cfg").await;
        assert_eq!(code, 0);
        assert!(output.contains("COUPON123\tSTOCK123\tSENDED\t2023-01-01 10:00:00\tN/A\t"));
        assert!(output.contains("共 1 张券"));

        let requests = api.requests().await;
        assert_eq!(
            requests[0].query,
            vec![
                ("appid", "wx_cfg".to_string()),
                ("offset", "0".to_string()),
                ("limit", "10".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_list_user_coupons_empty_and_failure() {
        let api = Arc::new(MockBusifavorApi::new());
        api.respond(json!({"data": []})).await;
        api.fail(AppError::ExternalApiError("API Error".into())).await;
        let service = BusifavorService::new(setup_db().await, api);

        let command = parse_args(args(&["list-user-coupons", "o1", "--appid", "wx_app"])).unwrap();
        let (code, output) = run_to_string(command.clone(), &service, "").await;
        assert_eq!(code, 0);
        assert!(output.contains("WARNING"));

        let (code, output) = run_to_string(command, &service, "").await;
        assert_eq!(code, 1);
        assert!(output.contains("查询失败"));

        let command = parse_args(args(&["list-user-coupons", "o1"])).unwrap();
        let (code, _) = run_to_string(command, &service, "").await;
        assert_eq!(code, 1);
    }
}
