//! 商家券接口的请求定义
//!
//! 每个请求只描述路径、方法、查询参数和请求体, 签名与发送交给 [`BusifavorApi`](super::BusifavorApi) 的实现。

use reqwest::Method;
use serde_json::{Value, json};

use crate::models::{UseCouponParams, UserCouponsQuery};

pub trait ApiRequest: Send + Sync + std::fmt::Debug {
    /// 相对于接口根地址的路径
    fn path(&self) -> String;

    fn method(&self) -> Method {
        Method::GET
    }

    fn query(&self) -> Vec<(&'static str, String)> {
        Vec::new()
    }

    fn body(&self) -> Option<Value> {
        None
    }
}

/// 创建商家券批次
#[derive(Debug, Clone)]
pub struct CreateStockRequest {
    pub data: Value,
}

impl ApiRequest for CreateStockRequest {
    fn path(&self) -> String {
        "v3/marketing/busifavor/stocks".to_string()
    }

    fn method(&self) -> Method {
        Method::POST
    }

    fn body(&self) -> Option<Value> {
        Some(self.data.clone())
    }
}

/// 查询商家券批次详情
#[derive(Debug, Clone)]
pub struct GetStockRequest {
    pub stock_id: String,
}

impl ApiRequest for GetStockRequest {
    fn path(&self) -> String {
        format!("v3/marketing/busifavor/stocks/{}", self.stock_id)
    }
}

/// 核销用户券
#[derive(Debug, Clone)]
pub struct UseCouponRequest {
    pub params: UseCouponParams,
}

impl ApiRequest for UseCouponRequest {
    fn path(&self) -> String {
        "v3/marketing/busifavor/coupons/use".to_string()
    }

    fn method(&self) -> Method {
        Method::POST
    }

    fn body(&self) -> Option<Value> {
        let p = &self.params;
        Some(json!({
            "coupon_code": p.coupon_code,
            "stock_id": p.stock_id,
            "appid": p.appid,
            "openid": p.openid,
            "use_request_no": p.use_request_no,
        }))
    }
}

/// 查询用户单张券详情
#[derive(Debug, Clone)]
pub struct GetCouponRequest {
    pub coupon_code: String,
    pub openid: String,
    pub appid: String,
}

impl ApiRequest for GetCouponRequest {
    fn path(&self) -> String {
        format!(
            "v3/marketing/busifavor/users/{}/coupons/{}",
            self.openid, self.coupon_code
        )
    }

    fn query(&self) -> Vec<(&'static str, String)> {
        vec![("appid", self.appid.clone())]
    }
}

/// 根据过滤条件查询用户券
#[derive(Debug, Clone)]
pub struct GetUserCouponsRequest {
    pub query: UserCouponsQuery,
}

impl ApiRequest for GetUserCouponsRequest {
    fn path(&self) -> String {
        format!("v3/marketing/busifavor/users/{}/coupons", self.query.openid)
    }

    fn query(&self) -> Vec<(&'static str, String)> {
        let q = &self.query;
        let mut params = vec![("appid", q.appid.clone())];
        // 只带上有值的条件
        if let Some(stock_id) = &q.stock_id {
            params.push(("stock_id", stock_id.clone()));
        }
        if let Some(status) = &q.status {
            params.push(("status", status.clone()));
        }
        if let Some(offset) = q.offset {
            params.push(("offset", offset.to_string()));
        }
        if let Some(limit) = q.limit {
            params.push(("limit", limit.to_string()));
        }
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_stock_request() {
        let req = CreateStockRequest {
            data: json!({"stock_name": "测试"}),
        };
        assert_eq!(req.path(), "v3/marketing/busifavor/stocks");
        assert_eq!(req.method(), Method::POST);
        assert_eq!(req.body(), Some(json!({"stock_name": "测试"})));
        assert!(req.query().is_empty());
    }

    #[test]
    fn test_get_stock_request() {
        let req = GetStockRequest {
            stock_id: "1212".into(),
        };
        assert_eq!(req.path(), "v3/marketing/busifavor/stocks/1212");
        assert_eq!(req.method(), Method::GET);
        assert!(req.body().is_none());
    }

    #[test]
    fn test_use_coupon_request_body() {
        let req = UseCouponRequest {
            params: UseCouponParams {
                coupon_code: "C1".into(),
                stock_id: "S1".into(),
                appid: "wx1".into(),
                openid: "o1".into(),
                use_request_no: "R1".into(),
            },
        };
        assert_eq!(req.path(), "v3/marketing/busifavor/coupons/use");
        assert_eq!(req.method(), Method::POST);
        assert_eq!(
            req.body(),
            Some(json!({
                "coupon_code": "C1",
                "stock_id": "S1",
                "appid": "wx1",
                "openid": "o1",
                "use_request_no": "R1",
            }))
        );
    }

    #[test]
    fn test_get_coupon_request() {
        let req = GetCouponRequest {
            coupon_code: "C1".into(),
            openid: "o1".into(),
            appid: "wx1".into(),
        };
        assert_eq!(req.path(), "v3/marketing/busifavor/users/o1/coupons/C1");
        assert_eq!(req.query(), vec![("appid", "wx1".to_string())]);
    }

    #[test]
    fn test_user_coupons_query_only_includes_present_keys() {
        let req = GetUserCouponsRequest {
            query: UserCouponsQuery {
                openid: "o1".into(),
                appid: "wx1".into(),
                status: Some("SENDED".into()),
                limit: Some(10),
                ..Default::default()
            },
        };
        assert_eq!(req.path(), "v3/marketing/busifavor/users/o1/coupons");
        assert_eq!(
            req.query(),
            vec![
                ("appid", "wx1".to_string()),
                ("status", "SENDED".to_string()),
                ("limit", "10".to_string()),
            ]
        );

        let full = GetUserCouponsRequest {
            query: UserCouponsQuery {
                openid: "o1".into(),
                appid: "wx1".into(),
                stock_id: Some("S1".into()),
                status: None,
                offset: Some(0),
                limit: None,
            },
        };
        let keys: Vec<_> = full.query().into_iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["appid", "stock_id", "offset"]);
    }
}
