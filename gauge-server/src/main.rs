//! Gauge JSON-RPC Server
//!
//! Newline-delimited JSON-RPC 2.0 over stdin/stdout. Logs go to stderr.
//!
//! Methods:
//! - initialize, ping
//! - parse: quantity text -> value in the kind's base unit
//! - format: base-unit value -> text, with an optional format string
//! - convert: quantity text -> value in another unit
//! - units: list kinds, or the units of one kind
//! - set_default_unit: change the unit used when none is written or requested
//! - parse_dynamic: quantity text with any (composite) unit -> value and dimension
//!
//! The registry is built from `GAUGE_UNITS_CONFIG` / `GAUGE_CULTURE` at startup.

use gauge_core::{Culture, Error};
use gauge_units::{DynamicQuantity, UnitRegistry, UnitsConfig};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value as JsonValue};
use std::io::{self, BufRead, Write};
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

const SERVER_NAME: &str = "gauge";
const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

const PARSE_ERROR: i32 = -32700;
const METHOD_NOT_FOUND: i32 = -32601;
const INVALID_PARAMS: i32 = -32602;
const QUANTITY_ERROR: i32 = -32000;

// JSON-RPC protocol types
#[derive(Debug, Deserialize)]
struct RpcRequest {
    #[allow(dead_code)]
    jsonrpc: String,
    id: Option<JsonValue>,
    method: String,
    #[serde(default)]
    params: Option<JsonValue>,
}

#[derive(Debug, Serialize)]
struct RpcResponse {
    jsonrpc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<RpcError>,
}

#[derive(Debug, Serialize)]
struct RpcError {
    code: i32,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<JsonValue>,
}

impl From<Error> for RpcError {
    fn from(err: Error) -> Self {
        RpcError {
            code: QUANTITY_ERROR,
            message: err.to_string(),
            data: Some(json!({
                "code": err.code(),
                "suggestion": err.suggestion(),
            })),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ParseParams {
    kind: String,
    input: String,
    #[serde(default)]
    culture: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FormatParams {
    kind: String,
    value: f64,
    #[serde(default)]
    format: Option<String>,
    #[serde(default)]
    culture: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ConvertParams {
    kind: String,
    input: String,
    to: String,
    #[serde(default)]
    culture: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct UnitsParams {
    #[serde(default)]
    kind: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SetDefaultParams {
    kind: String,
    symbol: String,
}

#[derive(Debug, Deserialize)]
struct ParseDynamicParams {
    input: String,
    #[serde(default)]
    culture: Option<String>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let registry = match UnitsConfig::from_env().and_then(|config| config.build()) {
        Ok(registry) => registry,
        Err(err) => {
            error!(error = %err, "invalid unit configuration");
            std::process::exit(1);
        }
    };

    info!(
        version = SERVER_VERSION,
        culture = %registry.culture().name,
        kinds = registry.kinds().count(),
        "Gauge server started"
    );

    let mut server = Server::new(registry);
    let stdin = io::stdin();
    let mut reader = io::BufReader::new(stdin.lock());

    loop {
        let mut line = String::new();
        match reader.read_line(&mut line) {
            Ok(0) => {
                info!("client disconnected (EOF)");
                break;
            }
            Ok(_) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }

                let Some(response) = server.handle_line(line) else {
                    continue;
                };

                if let Err(e) = write_response(&response) {
                    error!(error = %e, "error writing response");
                    break;
                }
            }
            Err(e) => {
                error!(error = %e, "error reading input");
                break;
            }
        }
    }

    info!("server shutting down");
}

fn write_response(response: &RpcResponse) -> io::Result<()> {
    let json = serde_json::to_string(response)?;
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{}", json)?;
    stdout.flush()
}

struct Server {
    registry: UnitRegistry,
}

impl Server {
    fn new(registry: UnitRegistry) -> Self {
        Server { registry }
    }

    /// Handle one line of input; `None` for notifications
    fn handle_line(&mut self, line: &str) -> Option<RpcResponse> {
        let request: RpcRequest = match serde_json::from_str(line) {
            Ok(r) => r,
            Err(e) => {
                warn!(error = %e, "error parsing request");
                return Some(RpcResponse {
                    jsonrpc: "2.0".to_string(),
                    id: None,
                    result: None,
                    error: Some(RpcError {
                        code: PARSE_ERROR,
                        message: format!("Parse error: {}", e),
                        data: None,
                    }),
                });
            }
        };

        debug!(method = %request.method, "processing");
        let response = self.handle_request(&request);

        // Notifications (no id) get no response
        if request.id.is_none() {
            debug!(method = %request.method, "notification processed");
            return None;
        }
        Some(response)
    }

    fn handle_request(&mut self, request: &RpcRequest) -> RpcResponse {
        let params = &request.params;
        let result = match request.method.as_str() {
            "initialize" => Ok(json!({
                "serverInfo": { "name": SERVER_NAME, "version": SERVER_VERSION },
                "culture": self.registry.culture().name,
            })),
            "initialized" | "ping" => Ok(json!({})),
            "parse" => params_for(params).and_then(|p| self.parse(p)),
            "format" => params_for(params).and_then(|p| self.format(p)),
            "convert" => params_for(params).and_then(|p| self.convert(p)),
            "units" => optional_params_for(params).and_then(|p| self.units(p)),
            "set_default_unit" => params_for(params).and_then(|p| self.set_default_unit(p)),
            "parse_dynamic" => params_for(params).and_then(|p| self.parse_dynamic(p)),
            _ => Err(RpcError {
                code: METHOD_NOT_FOUND,
                message: format!("Method not found: {}", request.method),
                data: None,
            }),
        };

        match result {
            Ok(r) => RpcResponse {
                jsonrpc: "2.0".to_string(),
                id: request.id.clone(),
                result: Some(r),
                error: None,
            },
            Err(e) => RpcResponse {
                jsonrpc: "2.0".to_string(),
                id: request.id.clone(),
                result: None,
                error: Some(e),
            },
        }
    }

    fn culture(&self, name: Option<&str>) -> Result<Culture, Error> {
        match name {
            Some(name) => {
                Culture::from_name(name).ok_or_else(|| Error::UnknownCulture(name.to_string()))
            }
            None => Ok(self.registry.culture().clone()),
        }
    }

    fn parse(&self, p: ParseParams) -> Result<JsonValue, RpcError> {
        let culture = self.culture(p.culture.as_deref())?;
        let value = self.registry.parse_value(&p.kind, &p.input, &culture)?;
        let unit = self
            .registry
            .base_unit(&p.kind)
            .ok_or_else(|| Error::UnknownKind(p.kind.clone()))?;
        Ok(json!({ "value": value, "unit": unit.symbol }))
    }

    fn format(&self, p: FormatParams) -> Result<JsonValue, RpcError> {
        let culture = self.culture(p.culture.as_deref())?;
        let text = self
            .registry
            .format_value(&p.kind, p.value, p.format.as_deref(), &culture)?;
        Ok(json!({ "text": text }))
    }

    fn convert(&self, p: ConvertParams) -> Result<JsonValue, RpcError> {
        let culture = self.culture(p.culture.as_deref())?;
        let value = self.registry.parse_value(&p.kind, &p.input, &culture)?;
        let target = self
            .registry
            .try_get_unit(&p.kind, &p.to)
            .ok_or_else(|| Error::unknown_unit(p.to.as_str(), p.to.as_str(), p.kind.as_str()))?;
        Ok(json!({ "value": target.from_base(value), "unit": target.symbol }))
    }

    fn units(&self, p: UnitsParams) -> Result<JsonValue, RpcError> {
        let Some(kind) = p.kind else {
            let kinds: Vec<JsonValue> = self
                .registry
                .kinds()
                .map(|name| {
                    json!({
                        "name": name,
                        "dimension": self.registry.kind_dimension(name),
                        "default": self.registry.default_unit(name).map(|u| u.symbol),
                    })
                })
                .collect();
            return Ok(json!({ "kinds": kinds }));
        };

        let units = self
            .registry
            .units(&kind)
            .ok_or_else(|| Error::UnknownKind(kind.clone()))?;
        let units: Vec<JsonValue> = units
            .iter()
            .map(|u| json!({ "symbol": u.symbol, "scale": u.scale }))
            .collect();
        Ok(json!({
            "kind": kind,
            "dimension": self.registry.kind_dimension(&kind),
            "default": self.registry.default_unit(&kind).map(|u| u.symbol),
            "units": units,
        }))
    }

    fn set_default_unit(&mut self, p: SetDefaultParams) -> Result<JsonValue, RpcError> {
        if !self.registry.contains_kind(&p.kind) {
            return Err(Error::UnknownKind(p.kind).into());
        }
        if !self.registry.try_set_default_unit(&p.kind, &p.symbol) {
            let symbol = p.symbol.as_str();
            return Err(Error::unknown_unit(symbol, symbol, p.kind.as_str()).into());
        }
        info!(kind = %p.kind, symbol = %p.symbol, "default unit changed");
        Ok(json!({ "ok": true }))
    }

    fn parse_dynamic(&self, p: ParseDynamicParams) -> Result<JsonValue, RpcError> {
        let culture = self.culture(p.culture.as_deref())?;
        let quantity = DynamicQuantity::parse(&p.input, &self.registry, &culture)?;
        let text = quantity.format(None, &self.registry, &culture)?;
        Ok(json!({
            "value": quantity.value(),
            "dimension": quantity.dimension(),
            "text": text,
        }))
    }
}

fn params_for<T: DeserializeOwned>(params: &Option<JsonValue>) -> Result<T, RpcError> {
    let params = params.clone().ok_or_else(|| RpcError {
        code: INVALID_PARAMS,
        message: "Missing params".to_string(),
        data: None,
    })?;
    serde_json::from_value(params).map_err(|e| RpcError {
        code: INVALID_PARAMS,
        message: format!("Invalid params: {}", e),
        data: None,
    })
}

fn optional_params_for<T: DeserializeOwned + Default>(
    params: &Option<JsonValue>,
) -> Result<T, RpcError> {
    match params {
        None => Ok(T::default()),
        Some(_) => params_for(params),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn server() -> Server {
        Server::new(UnitRegistry::builtin(Culture::invariant()))
    }

    fn call(server: &mut Server, request: JsonValue) -> JsonValue {
        let response = server.handle_line(&request.to_string()).unwrap();
        serde_json::to_value(response).unwrap()
    }

    fn rpc(method: &str, params: JsonValue) -> JsonValue {
        json!({ "jsonrpc": "2.0", "id": 1, "method": method, "params": params })
    }

    #[test]
    fn test_ping() {
        let response = call(&mut server(), json!({ "jsonrpc": "2.0", "id": 7, "method": "ping" }));
        assert_eq!(response["id"], 7);
        assert_eq!(response["result"], json!({}));
    }

    #[test]
    fn test_notification_has_no_response() {
        let line = json!({ "jsonrpc": "2.0", "method": "initialized" }).to_string();
        assert!(server().handle_line(&line).is_none());
    }

    #[test]
    fn test_parse_error() {
        let response = server().handle_line("{not json").unwrap();
        assert_eq!(response.error.unwrap().code, PARSE_ERROR);
    }

    #[test]
    fn test_parse() {
        let response = call(
            &mut server(),
            rpc("parse", json!({ "kind": "Density", "input": "2 kg/dm^3" })),
        );
        assert_eq!(response["result"]["value"], 2000.0);
        assert_eq!(response["result"]["unit"], "kg/m^3");
    }

    #[test]
    fn test_parse_with_culture() {
        let response = call(
            &mut server(),
            rpc("parse", json!({ "kind": "Length", "input": "1,5 km", "culture": "de-DE" })),
        );
        assert_eq!(response["result"]["value"], 1500.0);
    }

    #[test]
    fn test_format() {
        let response = call(
            &mut server(),
            rpc("format", json!({ "kind": "Length", "value": 1500.0, "format": "0.00 [km]" })),
        );
        assert_eq!(response["result"]["text"], "1.50 km");
    }

    #[test]
    fn test_convert() {
        let response = call(
            &mut server(),
            rpc("convert", json!({ "kind": "Length", "input": "1500 m", "to": "km" })),
        );
        assert_eq!(response["result"]["value"], 1.5);
        assert_eq!(response["result"]["unit"], "km");
    }

    #[test]
    fn test_units() {
        let mut s = server();
        let all = call(&mut s, json!({ "jsonrpc": "2.0", "id": 1, "method": "units" }));
        assert_eq!(all["result"]["kinds"][0]["name"], "Fraction");

        let length = call(&mut s, rpc("units", json!({ "kind": "Length" })));
        assert_eq!(length["result"]["default"], "m");
        assert_eq!(length["result"]["units"][1]["symbol"], "km");
    }

    #[test]
    fn test_set_default_unit() {
        let mut s = server();
        let response = call(
            &mut s,
            rpc("set_default_unit", json!({ "kind": "Fraction", "symbol": "%" })),
        );
        assert_eq!(response["result"]["ok"], true);

        let text = call(&mut s, rpc("format", json!({ "kind": "Fraction", "value": 0.5 })));
        assert_eq!(text["result"]["text"], "50 %");

        let bad = call(
            &mut s,
            rpc("set_default_unit", json!({ "kind": "Fraction", "symbol": "furlong" })),
        );
        assert_eq!(bad["error"]["data"]["code"], "UNKNOWN_UNIT");
    }

    #[test]
    fn test_parse_dynamic() {
        let response = call(&mut server(), rpc("parse_dynamic", json!({ "input": "10 kg*m/s^2" })));
        assert_eq!(response["result"]["value"], 10.0);
        assert_eq!(response["result"]["dimension"], json!([1, 1, -2, 0, 0, 0, 0]));
        assert_eq!(response["result"]["text"], "10 N");
    }

    #[test]
    fn test_errors_carry_codes() {
        let mut s = server();
        let unknown_unit = call(
            &mut s,
            rpc("parse", json!({ "kind": "Length", "input": "100 Metre" })),
        );
        assert_eq!(unknown_unit["error"]["code"], QUANTITY_ERROR);
        assert_eq!(unknown_unit["error"]["data"]["code"], "UNKNOWN_UNIT");

        let malformed = call(
            &mut s,
            rpc("format", json!({ "kind": "Length", "value": 1.0, "format": "0 [km" })),
        );
        assert_eq!(malformed["error"]["data"]["code"], "MALFORMED_FORMAT");

        let culture = call(
            &mut s,
            rpc("parse", json!({ "kind": "Length", "input": "1", "culture": "xx-XX" })),
        );
        assert_eq!(culture["error"]["data"]["code"], "UNKNOWN_CULTURE");

        let missing = call(&mut s, rpc("parse", json!({ "kind": "Length" })));
        assert_eq!(missing["error"]["code"], INVALID_PARAMS);

        let method = call(&mut s, rpc("evaluate", json!({})));
        assert_eq!(method["error"]["code"], METHOD_NOT_FOUND);
    }
}
