use serde_json::{json, Value};
use std::sync::LazyLock;

pub static CONFIG_SCHEMA: LazyLock<Value> = LazyLock::new(|| {
    json!({
        "$schema": "http://json-schema.org/draft-07/schema#",
        "type": "object",
        "properties": {
            "generator": {
                "type": "object",
                "properties": {
                    "departments": { "type": "array", "items": { "type": "string", "minLength": 1 }, "minItems": 1 },
                    "metrics": { "type": "array", "items": { "$ref": "#/$defs/metric" }, "minItems": 1 },
                    "start_date": { "type": "string", "pattern": "^\\d{4}-\\d{2}-\\d{2}$" },
                    "days": { "type": "integer", "minimum": 1 },
                    "seasonal_amplitude": { "type": "number" },
                    "seasonal_period_days": { "type": "integer", "minimum": 2 },
                    "trend_slope": { "type": "number" },
                    "anomaly_rate": { "type": "number", "minimum": 0, "maximum": 1 },
                    "anomaly_min_sigma": { "type": "number", "minimum": 0 },
                    "anomaly_max_sigma": { "type": "number", "minimum": 0 },
                    "seed": { "type": "integer", "minimum": 0 }
                },
                "additionalProperties": false
            },
            "forecast": {
                "type": "object",
                "properties": {
                    "horizon_days": { "type": "integer", "minimum": 1 },
                    "min_history": { "type": "integer", "minimum": 2 },
                    "confidence_level": { "type": "number", "exclusiveMinimum": 0, "exclusiveMaximum": 1 },
                    "metrics": { "type": "array", "items": { "type": "string" } }
                },
                "additionalProperties": false
            },
            "analysis": {
                "type": "object",
                "properties": {
                    "z_threshold": { "type": "number", "exclusiveMinimum": 0 }
                },
                "additionalProperties": false
            },
            "llm": {
                "type": "object",
                "properties": {
                    "provider": { "type": "string", "enum": ["openai", "local", "openai_compatible"] },
                    "model": { "type": "string" },
                    "api_key": { "type": "string" },
                    "base_url": { "type": "string" },
                    "timeout_secs": { "type": "integer", "minimum": 1 },
                    "max_retries": { "type": "integer", "minimum": 0 },
                    "temperature": { "type": "number", "minimum": 0, "maximum": 2 }
                },
                "additionalProperties": false
            },
            "output": {
                "type": "object",
                "properties": {
                    "directory": { "type": "string" }
                },
                "additionalProperties": false
            }
        },
        "additionalProperties": false,
        "$defs": {
            "metric": {
                "type": "object",
                "required": ["name", "base", "noise_sd"],
                "properties": {
                    "name": { "type": "string", "minLength": 1 },
                    "base": { "type": "number" },
                    "noise_sd": { "type": "number", "minimum": 0 },
                    "seasonal_scale": { "type": "number" },
                    "min": { "type": ["number", "null"] },
                    "max": { "type": ["number", "null"] }
                }
            }
        }
    })
});
