//! 留存记录 schema
//!
//! 声明请求体的期望结构：`rssi_values` 为整数列表、`last_retention` 为整数，
//! 二者均为必填。`timestamp` 由服务端写入，不出现在请求体中。
//!
//! 默认不启用校验，仅在配置 `enforceSchema` 后由处理器调用。

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use super::model::{RETENTION_FIELD, RSSI_FIELD};

const MISSING: &str = "Missing data for required field.";
const NOT_INTEGER: &str = "Not a valid integer.";
const NOT_LIST: &str = "Not a valid list.";

/// 字段路径 -> 错误信息
pub type SchemaErrors = BTreeMap<String, String>;

/// 通过校验的读数
#[derive(Debug, Clone, PartialEq)]
pub struct RetentionReading {
    pub rssi_values: Vec<i64>,
    pub last_retention: i64,
}

/// 请求体 schema
///
/// 整数校验为宽松模式：接受整数值的浮点数（`42.0`）和整数字符串（`"42"`），
/// 超出 i64 范围的值视为无效
pub struct RetentionSchema;

impl RetentionSchema {
    /// 校验请求体，收集所有字段错误后一次性返回
    pub fn validate(payload: &Map<String, Value>) -> Result<RetentionReading, SchemaErrors> {
        let mut errors = SchemaErrors::new();

        let rssi_values = match payload.get(RSSI_FIELD) {
            None | Some(Value::Null) => {
                errors.insert(RSSI_FIELD.to_string(), MISSING.to_string());
                None
            }
            Some(Value::Array(items)) => {
                let mut values = Vec::with_capacity(items.len());
                for (i, item) in items.iter().enumerate() {
                    match coerce_integer(item) {
                        Some(v) => values.push(v),
                        None => {
                            let field = format!("{}.{}", RSSI_FIELD, i);
                            errors.insert(field, NOT_INTEGER.to_string());
                        }
                    }
                }
                Some(values)
            }
            Some(_) => {
                errors.insert(RSSI_FIELD.to_string(), NOT_LIST.to_string());
                None
            }
        };

        let last_retention = match payload.get(RETENTION_FIELD) {
            None | Some(Value::Null) => {
                errors.insert(RETENTION_FIELD.to_string(), MISSING.to_string());
                None
            }
            Some(value) => {
                let parsed = coerce_integer(value);
                if parsed.is_none() {
                    errors.insert(RETENTION_FIELD.to_string(), NOT_INTEGER.to_string());
                }
                parsed
            }
        };

        match (rssi_values, last_retention) {
            (Some(rssi_values), Some(last_retention)) if errors.is_empty() => {
                Ok(RetentionReading {
                    rssi_values,
                    last_retention,
                })
            }
            _ => Err(errors),
        }
    }
}

/// 将 JSON 值宽松地转换为 i64
fn coerce_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            let f = n.as_f64()?;
            // 2^63 本身超出 i64 范围
            let in_range = f >= i64::MIN as f64 && f < i64::MAX as f64;
            (f.fract() == 0.0 && in_range).then_some(f as i64)
        }),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn validate(value: Value) -> Result<RetentionReading, SchemaErrors> {
        match value {
            Value::Object(map) => RetentionSchema::validate(&map),
            _ => panic!("not an object"),
        }
    }

    #[test]
    fn test_valid_reading() {
        let reading =
            validate(json!({"rssi_values": [-60, -65, -70], "last_retention": 42})).unwrap();
        assert_eq!(reading.rssi_values, vec![-60, -65, -70]);
        assert_eq!(reading.last_retention, 42);
    }

    #[test]
    fn test_empty_rssi_list_is_valid() {
        let reading = validate(json!({"rssi_values": [], "last_retention": 0})).unwrap();
        assert!(reading.rssi_values.is_empty());
    }

    #[test]
    fn test_missing_fields_reported_together() {
        let errors = validate(json!({})).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors["rssi_values"], MISSING);
        assert_eq!(errors["last_retention"], MISSING);
    }

    #[test]
    fn test_wrong_types() {
        let errors = validate(json!({"rssi_values": "loud", "last_retention": 1.5})).unwrap_err();
        assert_eq!(errors["rssi_values"], NOT_LIST);
        assert_eq!(errors["last_retention"], NOT_INTEGER);
    }

    #[test]
    fn test_bad_list_item_reports_index() {
        let errors =
            validate(json!({"rssi_values": [-60, "x", -70], "last_retention": 3})).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors["rssi_values.1"], NOT_INTEGER);
    }

    #[test]
    fn test_integral_floats_and_numeric_strings_are_coerced() {
        let reading =
            validate(json!({"rssi_values": [-60.0, "-65", " -70 "], "last_retention": "42"}))
                .unwrap();
        assert_eq!(reading.rssi_values, vec![-60, -65, -70]);
        assert_eq!(reading.last_retention, 42);

        let reading = validate(json!({"rssi_values": [], "last_retention": 42.0})).unwrap();
        assert_eq!(reading.last_retention, 42);
    }

    #[test]
    fn test_out_of_range_and_non_numeric_rejected() {
        let errors = validate(json!({
            "rssi_values": [u64::MAX, "4.2", true],
            "last_retention": "forty-two"
        }))
        .unwrap_err();
        assert_eq!(errors["rssi_values.0"], NOT_INTEGER);
        assert_eq!(errors["rssi_values.1"], NOT_INTEGER);
        assert_eq!(errors["rssi_values.2"], NOT_INTEGER);
        assert_eq!(errors["last_retention"], NOT_INTEGER);

        assert_eq!(coerce_integer(&json!(1e19)), None);
        assert_eq!(coerce_integer(&json!(i64::MAX)), Some(i64::MAX));
    }
}
