//! 对微信接口返回的原始 JSON 做的几个小工具

use serde_json::{Map, Value};

/// 键存在且不为 null
pub fn present<'a>(value: &'a Value, key: &str) -> Option<&'a Value> {
    value.get(key).filter(|v| !v.is_null())
}

/// 按弱类型语义判断真假: null、false、0、""、"0"、空数组/对象为假
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !(s.is_empty() || s == "0"),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

/// 浅合并两个对象, 重复键以 `overlay` 为准; 非对象按空对象处理
pub fn merge_objects(base: &Value, overlay: &Value) -> Value {
    let mut merged: Map<String, Value> = base.as_object().cloned().unwrap_or_default();
    if let Some(extra) = overlay.as_object() {
        for (key, value) in extra {
            merged.insert(key.clone(), value.clone());
        }
    }
    Value::Object(merged)
}

/// 对象或数组原样返回, 否则为 `None`
pub fn as_blob(value: Option<&Value>) -> Option<Value> {
    value
        .filter(|v| v.is_object() || v.is_array())
        .cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_present_skips_null() {
        let v = json!({"a": 1, "b": null});
        assert_eq!(present(&v, "a"), Some(&json!(1)));
        assert_eq!(present(&v, "b"), None);
        assert_eq!(present(&v, "c"), None);
    }

    #[test]
    fn test_is_truthy() {
        for falsy in [json!(null), json!(false), json!(0), json!(0.0), json!(""), json!("0"), json!([]), json!({})] {
            assert!(!is_truthy(&falsy), "{falsy} should be falsy");
        }
        for truthy in [json!(true), json!(1), json!("yes"), json!("false"), json!([0]), json!({"k": 0})] {
            assert!(is_truthy(&truthy), "{truthy} should be truthy");
        }
    }

    #[test]
    fn test_merge_objects_overlay_wins() {
        let merged = merge_objects(
            &json!({"stock_name": "A", "comment": "c"}),
            &json!({"stock_name": "B", "stock_id": "123"}),
        );
        assert_eq!(merged, json!({"stock_name": "B", "comment": "c", "stock_id": "123"}));
    }

    #[test]
    fn test_merge_objects_non_object_base() {
        assert_eq!(merge_objects(&json!(null), &json!({"a": 1})), json!({"a": 1}));
    }

    #[test]
    fn test_as_blob() {
        assert_eq!(as_blob(Some(&json!({"a": 1}))), Some(json!({"a": 1})));
        assert_eq!(as_blob(Some(&json!([1]))), Some(json!([1])));
        assert_eq!(as_blob(Some(&json!("x"))), None);
        assert_eq!(as_blob(None), None);
    }
}
