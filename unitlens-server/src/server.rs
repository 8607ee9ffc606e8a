//! Request loop and method dispatch
//!
//! Reads one JSON-RPC message per line, answers requests on the same
//! writer and emits `hints/decorations` notifications whenever the active
//! line's hints change.

use crate::config;
use crate::error::ServerError;
use crate::overlay::Overlay;
use crate::protocol::{Notification, RpcError, RpcRequest, RpcResponse};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value as JsonValue};
use std::io::{BufRead, Write};
use tracing::{debug, info, warn};
use unitlens::UnitLens;
use unitlens_core::{Position, Settings, UnitLensError};

pub const SERVER_NAME: &str = "unitlens";
pub const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InitializeParams {
    #[serde(default)]
    client_info: Option<ClientInfo>,
    #[serde(default)]
    initialization_options: Option<InitializationOptions>,
}

#[derive(Debug, Deserialize)]
struct ClientInfo {
    name: String,
}

#[derive(Debug, Deserialize)]
struct InitializationOptions {
    #[serde(default)]
    settings: Option<JsonValue>,
}

#[derive(Debug, Deserialize)]
struct ConfigurationParams {
    settings: JsonValue,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RefreshParams {
    uri: String,
    language_id: String,
    text: String,
    line: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HoverParams {
    #[serde(default)]
    uri: Option<String>,
    language_id: String,
    text: String,
    position: Position,
}

#[derive(Debug, Deserialize)]
struct ConvertParams {
    converter: String,
    value: JsonValue,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ConverterInfo {
    id: &'static str,
    name: &'static str,
    description: &'static str,
    from_unit: &'static str,
    to_unit: &'static str,
    namespace: &'static str,
    defaults: JsonValue,
    examples: &'static [&'static str],
}

pub struct Server<W: Write> {
    lens: UnitLens,
    settings: Settings,
    overlay: Overlay,
    out: W,
    outbox: Vec<Notification>,
    shutdown_requested: bool,
}

impl<W: Write> Server<W> {
    pub fn new(lens: UnitLens, settings: Settings, out: W) -> Self {
        Self {
            lens,
            settings,
            overlay: Overlay::new(),
            out,
            outbox: Vec::new(),
            shutdown_requested: false,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn writer(&self) -> &W {
        &self.out
    }

    /// Serve until `exit`, EOF or a read failure. The overlay is released
    /// on the way out in every case.
    pub fn run<R: BufRead>(&mut self, mut reader: R) -> Result<(), ServerError> {
        info!("Server ready, waiting for requests");

        let outcome = loop {
            let mut buf = Vec::new();
            match reader.read_until(b'\n', &mut buf) {
                Ok(0) => {
                    info!("Client disconnected (EOF)");
                    break Ok(());
                }
                Ok(_) => match self.handle_bytes(buf) {
                    Ok(Flow::Continue) => {}
                    Ok(Flow::Exit) => break Ok(()),
                    Err(e) => break Err(e),
                },
                Err(e) => {
                    warn!(error = %e, "Error reading input");
                    break Err(ServerError::from(e));
                }
            }
        };

        self.release_overlay()?;
        info!("Server shutting down");
        outcome
    }

    /// Raw line from the transport. Bytes that are not UTF-8 are answered
    /// with a parse error like any other malformed message.
    pub fn handle_bytes(&mut self, buf: Vec<u8>) -> Result<Flow, ServerError> {
        match String::from_utf8(buf) {
            Ok(line) => self.handle_line(&line),
            Err(e) => {
                warn!(error = %e, "Input line is not valid UTF-8");
                self.send(&RpcResponse::failure(None, RpcError::parse_error(e.to_string())))?;
                Ok(Flow::Continue)
            }
        }
    }

    pub fn handle_line(&mut self, line: &str) -> Result<Flow, ServerError> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(Flow::Continue);
        }
        debug!(bytes = line.len(), "received message");

        let request: RpcRequest = match serde_json::from_str(line) {
            Ok(r) => r,
            Err(e) => {
                warn!(error = %e, "Error parsing request");
                self.send(&RpcResponse::failure(None, RpcError::parse_error(e.to_string())))?;
                return Ok(Flow::Continue);
            }
        };

        if request.jsonrpc != "2.0" {
            warn!(version = %request.jsonrpc, "unexpected jsonrpc version");
        }

        if request.method == "exit" {
            info!("exit received");
            return Ok(Flow::Exit);
        }

        debug!(method = %request.method, "processing");
        let result = self.dispatch(&request);

        for notification in std::mem::take(&mut self.outbox) {
            self.send(&notification)?;
        }

        let Some(id) = request.id else {
            if let Err(e) = result {
                warn!(method = %request.method, error = %e.message, "notification failed");
            }
            return Ok(Flow::Continue);
        };

        let response = match result {
            Ok(value) => RpcResponse::success(Some(id), value),
            Err(e) => RpcResponse::failure(Some(id), e),
        };
        self.send(&response)?;
        Ok(Flow::Continue)
    }

    fn dispatch(&mut self, request: &RpcRequest) -> Result<JsonValue, RpcError> {
        if self.shutdown_requested {
            return Err(RpcError::invalid_request(format!(
                "server is shutting down, '{}' not accepted",
                request.method
            )));
        }

        match request.method.as_str() {
            "initialize" => self.initialize(&request.params),
            "initialized" | "ping" => Ok(json!({})),
            "converters/list" => self.converters_list(),
            "workspace/didChangeConfiguration" => self.change_configuration(&request.params),
            "hints/refresh" => self.refresh(&request.params),
            "hints/hover" => self.hover(&request.params),
            "hints/convert" => self.convert(&request.params),
            "shutdown" => self.shutdown(),
            other => Err(RpcError::method_not_found(other)),
        }
    }

    fn initialize(&mut self, params: &Option<JsonValue>) -> Result<JsonValue, RpcError> {
        let params: Option<InitializeParams> = match params {
            Some(_) => Some(parse_params(params)?),
            None => None,
        };

        let client = params
            .as_ref()
            .and_then(|p| p.client_info.as_ref())
            .map(|c| c.name.as_str())
            .unwrap_or("unknown");
        info!(client, "Client connected");

        if let Some(settings) = params
            .and_then(|p| p.initialization_options)
            .and_then(|o| o.settings)
        {
            self.settings = Settings::from_json(settings)?;
            debug!("settings seeded from initializationOptions");
        }

        Ok(json!({
            "serverInfo": {
                "name": SERVER_NAME,
                "version": SERVER_VERSION,
            },
            "capabilities": {
                "hoverProvider": true,
                "inlineHints": true,
                "languages": self.lens.gate().languages(),
            },
            "converters": self.converter_infos()?,
        }))
    }

    fn converters_list(&self) -> Result<JsonValue, RpcError> {
        Ok(json!({ "converters": self.converter_infos()? }))
    }

    fn converter_infos(&self) -> Result<Vec<ConverterInfo>, UnitLensError> {
        self.lens
            .registry()
            .list()
            .into_iter()
            .map(|meta| {
                let defaults = meta
                    .defaults
                    .iter()
                    .map(|d| serde_json::to_value(d.value).map(|v| (d.key.to_string(), v)))
                    .collect::<Result<serde_json::Map<_, _>, _>>()
                    .map_err(|e| UnitLensError::internal(e.to_string()))?;
                Ok(ConverterInfo {
                    id: meta.id,
                    name: meta.name,
                    description: meta.description,
                    from_unit: meta.from_unit,
                    to_unit: meta.to_unit,
                    namespace: meta.namespace,
                    defaults: JsonValue::Object(defaults),
                    examples: meta.examples,
                })
            })
            .collect()
    }

    fn change_configuration(&mut self, params: &Option<JsonValue>) -> Result<JsonValue, RpcError> {
        let params: ConfigurationParams = parse_params(params)?;
        self.settings = Settings::from_json(params.settings)?;
        info!("settings replaced");
        Ok(JsonValue::Null)
    }

    fn refresh(&mut self, params: &Option<JsonValue>) -> Result<JsonValue, RpcError> {
        let params: RefreshParams = parse_params(params)?;

        let hints = if self.lens.supports(&params.language_id) {
            self.lens
                .active_line_hints(&params.text, params.line, &self.settings)
        } else {
            debug!(language = %params.language_id, "unsupported document, clearing hints");
            Vec::new()
        };

        let count = hints.len();
        debug!(uri = %params.uri, previous = ?self.overlay.current(), hints = count, "refresh");
        let notifications = self.overlay.publish(&params.uri, hints);
        self.outbox.extend(notifications);
        Ok(json!({ "hints": count }))
    }

    fn hover(&mut self, params: &Option<JsonValue>) -> Result<JsonValue, RpcError> {
        let params: HoverParams = parse_params(params)?;

        if !config::show_tooltip(&self.settings) {
            return Ok(JsonValue::Null);
        }
        if !self.lens.supports(&params.language_id) {
            debug!(
                uri = params.uri.as_deref().unwrap_or("-"),
                language = %params.language_id,
                "hover on unsupported document"
            );
            return Ok(JsonValue::Null);
        }

        let Some(tooltip) = self
            .lens
            .tooltip(&params.text, params.position, &self.settings)
        else {
            return Ok(JsonValue::Null);
        };

        Ok(json!({
            "contents": {
                "kind": "markdown",
                "value": tooltip.contents.to_markdown(),
            },
            "range": tooltip.range,
            "converter": tooltip.converter,
        }))
    }

    fn convert(&mut self, params: &Option<JsonValue>) -> Result<JsonValue, RpcError> {
        let params: ConvertParams = parse_params(params)?;
        let value = match &params.value {
            JsonValue::String(s) => s.clone(),
            JsonValue::Number(n) => n.to_string(),
            _ => {
                return Err(UnitLensError::invalid_param("value", "expected a string or number").into())
            }
        };

        let conversion = self
            .lens
            .convert_literal(&params.converter, &value, &self.settings)?;

        Ok(json!({
            "converter": conversion.converter,
            "matched": conversion.matched,
            "converted": conversion.converted,
            "hint": conversion.hint,
            "tooltip": conversion.tooltip.to_markdown(),
        }))
    }

    fn shutdown(&mut self) -> Result<JsonValue, RpcError> {
        info!("shutdown requested");
        self.shutdown_requested = true;
        self.outbox.extend(self.overlay.release());
        Ok(JsonValue::Null)
    }

    fn release_overlay(&mut self) -> Result<(), ServerError> {
        if self.overlay.is_released() {
            return Ok(());
        }
        if let Some(notification) = self.overlay.release() {
            self.send(&notification)?;
        }
        Ok(())
    }

    fn send<T: Serialize>(&mut self, message: &T) -> Result<(), ServerError> {
        let json = serde_json::to_string(message)?;
        writeln!(self.out, "{}", json)?;
        self.out.flush()?;
        Ok(())
    }
}

impl<W: Write> Drop for Server<W> {
    fn drop(&mut self) {
        if let Err(e) = self.release_overlay() {
            warn!(error = %e, "failed to clear hints on drop");
        }
    }
}

fn parse_params<T: DeserializeOwned>(params: &Option<JsonValue>) -> Result<T, RpcError> {
    let value = params
        .clone()
        .ok_or_else(|| UnitLensError::missing_param("params"))?;
    serde_json::from_value(value)
        .map_err(|e| UnitLensError::invalid_param("params", e.to_string()).into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::overlay::DECORATIONS_METHOD;
    use crate::protocol::{INVALID_PARAMS, INVALID_REQUEST, METHOD_NOT_FOUND, PARSE_ERROR};
    use std::io::Cursor;

    const DOC: &str = "{\n  \"width\": \"16px\",\n  \"margin\": \"1.5rem\"\n}\n";

    fn server() -> Server<Vec<u8>> {
        Server::new(UnitLens::with_standard_converters(), Settings::new(), Vec::new())
    }

    fn messages(server: &Server<Vec<u8>>) -> Vec<JsonValue> {
        String::from_utf8(server.writer().clone())
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }

    fn send(server: &mut Server<Vec<u8>>, message: JsonValue) -> Flow {
        server.handle_line(&message.to_string()).unwrap()
    }

    fn refresh(uri: &str, language: &str, line: u32) -> JsonValue {
        json!({
            "jsonrpc": "2.0",
            "method": "hints/refresh",
            "params": {"uri": uri, "languageId": language, "text": DOC, "line": line}
        })
    }

    fn hover(character: u32) -> JsonValue {
        json!({
            "jsonrpc": "2.0",
            "id": 7,
            "method": "hints/hover",
            "params": {"languageId": "json", "text": DOC, "position": {"line": 1, "character": character}}
        })
    }

    #[test]
    fn test_initialize_lists_converters() {
        let mut server = server();
        send(&mut server, json!({"jsonrpc": "2.0", "id": 1, "method": "initialize", "params": {}}));

        let out = messages(&server);
        assert_eq!(out.len(), 1);
        let result = &out[0]["result"];
        assert_eq!(result["serverInfo"]["name"], "unitlens");
        assert_eq!(result["capabilities"]["languages"], json!(["json", "jsonc"]));
        assert_eq!(result["converters"][0]["id"], "remToPx");
        assert_eq!(result["converters"][1]["id"], "pxToRem");
        assert_eq!(result["converters"][1]["defaults"]["baseFontSize"], 16.0);
        assert_eq!(result["converters"][1]["examples"][0], "\"16px\" → 1rem");
        assert_eq!(result["converters"][0]["examples"][1], "\"1.25rem\" → 20px");
    }

    #[test]
    fn test_initialize_seeds_settings() {
        let mut server = server();
        send(
            &mut server,
            json!({
                "jsonrpc": "2.0",
                "id": 1,
                "method": "initialize",
                "params": {"initializationOptions": {"settings": {"unitConversionHints.remToPx": {"baseFontSize": 10}}}}
            }),
        );
        assert_eq!(
            server
                .settings()
                .section("unitConversionHints.remToPx")
                .number("baseFontSize"),
            Some(10.0)
        );
    }

    #[test]
    fn test_refresh_publishes_decorations() {
        let mut server = server();
        let flow = send(&mut server, refresh("file:///a.json", "json", 1));
        assert_eq!(flow, Flow::Continue);

        let out = messages(&server);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0]["method"], DECORATIONS_METHOD);
        let decorations = &out[0]["params"]["decorations"];
        assert_eq!(decorations.as_array().unwrap().len(), 1);
        assert_eq!(decorations[0]["text"], " // 1rem");
        assert_eq!(decorations[0]["position"], json!({"line": 1, "character": 18}));
        assert_eq!(decorations[0]["style"]["color"], "disabledForeground");
    }

    #[test]
    fn test_refresh_uses_current_settings() {
        let mut server = server();
        send(
            &mut server,
            json!({
                "jsonrpc": "2.0",
                "method": "workspace/didChangeConfiguration",
                "params": {"settings": {"unitConversionHints.remToPx.baseFontSize": 10}}
            }),
        );
        send(&mut server, refresh("file:///a.json", "json", 2));

        let out = messages(&server);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0]["params"]["decorations"][0]["text"], " // 15px");
    }

    #[test]
    fn test_refresh_unsupported_language_clears() {
        let mut server = server();
        send(&mut server, refresh("file:///a.css", "css", 1));

        let out = messages(&server);
        assert_eq!(out[0]["params"]["decorations"], json!([]));
    }

    #[test]
    fn test_refresh_switching_views() {
        let mut server = server();
        send(&mut server, refresh("file:///a.json", "json", 1));
        send(&mut server, refresh("file:///b.json", "json", 2));

        let out = messages(&server);
        assert_eq!(out.len(), 3);
        assert_eq!(out[1]["params"]["uri"], "file:///a.json");
        assert_eq!(out[1]["params"]["decorations"], json!([]));
        assert_eq!(out[2]["params"]["uri"], "file:///b.json");
        assert_eq!(out[2]["params"]["decorations"][0]["text"], " // 24px");
    }

    #[test]
    fn test_hover_inside_literal() {
        let mut server = server();
        send(&mut server, hover(13));

        let out = messages(&server);
        assert_eq!(out[0]["id"], 7);
        let result = &out[0]["result"];
        assert_eq!(result["contents"]["kind"], "markdown");
        assert!(result["contents"]["value"]
            .as_str()
            .unwrap()
            .starts_with("**16px** = **1rem**"));
        assert_eq!(result["range"]["start"], json!({"line": 1, "character": 11}));
        assert_eq!(result["range"]["end"], json!({"line": 1, "character": 17}));
    }

    #[test]
    fn test_hover_outside_literal() {
        let mut server = server();
        send(&mut server, hover(3));
        assert_eq!(messages(&server)[0]["result"], JsonValue::Null);
    }

    #[test]
    fn test_hover_disabled() {
        let settings = Settings::new().with(config::GLOBAL_NAMESPACE, config::SHOW_TOOLTIP, false);
        let mut server = Server::new(UnitLens::with_standard_converters(), settings, Vec::new());
        send(&mut server, hover(13));
        assert_eq!(messages(&server)[0]["result"], JsonValue::Null);
    }

    #[test]
    fn test_convert_bare_value() {
        let mut server = server();
        send(
            &mut server,
            json!({"jsonrpc": "2.0", "id": 3, "method": "hints/convert", "params": {"converter": "pxToRem", "value": 24}}),
        );
        let result = &messages(&server)[0]["result"];
        assert_eq!(result["converted"], "1.5rem");
        assert_eq!(result["hint"], " // 1.5rem");
    }

    #[test]
    fn test_convert_unknown_converter() {
        let mut server = server();
        send(
            &mut server,
            json!({"jsonrpc": "2.0", "id": 3, "method": "hints/convert", "params": {"converter": "pxToEm", "value": "16px"}}),
        );
        let error = &messages(&server)[0]["error"];
        assert_eq!(error["code"], INVALID_PARAMS);
        assert_eq!(error["data"]["code"], "UNKNOWN_CONVERTER");
    }

    #[test]
    fn test_missing_params() {
        let mut server = server();
        send(&mut server, json!({"jsonrpc": "2.0", "id": 4, "method": "hints/hover"}));
        assert_eq!(messages(&server)[0]["error"]["code"], INVALID_PARAMS);
    }

    #[test]
    fn test_unknown_method() {
        let mut server = server();
        send(&mut server, json!({"jsonrpc": "2.0", "id": 5, "method": "tools/list"}));
        assert_eq!(messages(&server)[0]["error"]["code"], METHOD_NOT_FOUND);
    }

    #[test]
    fn test_unknown_notification_gets_no_response() {
        let mut server = server();
        send(&mut server, json!({"jsonrpc": "2.0", "method": "tools/list"}));
        assert!(messages(&server).is_empty());
    }

    #[test]
    fn test_parse_error() {
        let mut server = server();
        server.handle_line("{not json").unwrap();
        let out = messages(&server);
        assert_eq!(out[0]["error"]["code"], PARSE_ERROR);
        assert_eq!(out[0]["id"], JsonValue::Null);
    }

    #[test]
    fn test_shutdown_clears_once() {
        let mut server = server();
        send(&mut server, refresh("file:///a.json", "json", 1));
        send(&mut server, json!({"jsonrpc": "2.0", "id": 9, "method": "shutdown"}));
        send(&mut server, json!({"jsonrpc": "2.0", "id": 10, "method": "ping"}));
        let flow = send(&mut server, json!({"jsonrpc": "2.0", "method": "exit"}));
        assert_eq!(flow, Flow::Exit);

        let out = messages(&server);
        assert_eq!(out.len(), 4);
        assert_eq!(out[1]["params"]["decorations"], json!([]));
        assert_eq!(out[2]["id"], 9);
        assert_eq!(out[2]["result"], JsonValue::Null);
        assert_eq!(out[3]["error"]["code"], INVALID_REQUEST);
    }

    #[test]
    fn test_run_until_eof_releases_overlay() {
        let input = format!(
            "{}\n\n{}\n",
            json!({"jsonrpc": "2.0", "id": 1, "method": "ping"}),
            refresh("file:///a.json", "json", 1)
        );
        let mut server = server();
        server.run(Cursor::new(input)).unwrap();

        let out = messages(&server);
        assert_eq!(out.len(), 3);
        assert_eq!(out[0]["result"], json!({}));
        assert_eq!(out[1]["params"]["decorations"][0]["text"], " // 1rem");
        assert_eq!(out[2]["params"]["decorations"], json!([]));
    }

    #[test]
    fn test_run_survives_invalid_utf8() {
        let mut input = b"\xff\xfe garbage\n".to_vec();
        input.extend_from_slice(json!({"jsonrpc": "2.0", "id": 2, "method": "ping"}).to_string().as_bytes());
        input.push(b'\n');

        let mut server = server();
        server.run(Cursor::new(input)).unwrap();

        let out = messages(&server);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0]["error"]["code"], PARSE_ERROR);
        assert_eq!(out[0]["id"], JsonValue::Null);
        assert_eq!(out[1]["id"], 2);
        assert_eq!(out[1]["result"], json!({}));
    }

    #[test]
    fn test_run_stops_at_exit() {
        let input = format!(
            "{}\n{}\n",
            json!({"jsonrpc": "2.0", "method": "exit"}),
            json!({"jsonrpc": "2.0", "id": 1, "method": "ping"})
        );
        let mut server = server();
        server.run(Cursor::new(input)).unwrap();
        assert!(messages(&server).is_empty());
    }
}
