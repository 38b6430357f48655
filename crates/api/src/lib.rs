//! HTTP front end exposing decoding and analysis over JSON.
//!
//! | route          | body                                   | response                    |
//! |----------------|----------------------------------------|-----------------------------|
//! | `GET /`        |                                        | service health              |
//! | `POST /decode` | `{ "bytecode": "0x..", "disassembly"? }` | records + disassembly text |
//! | `POST /analyze`| `{ "bytecode": "0x..", "config"? }`    | the full analysis report    |

use axum::{
    Router,
    extract::Json,
    http::StatusCode,
    response::Json as ResponseJson,
    routing::{get, post},
};
use bytescope_analysis::{Report, analyze_concurrently};
use bytescope_core::config::{AnalysisConfig, DisassemblyOptions};
use bytescope_core::decoder::{self, DecodeInfo, DecodedBytecode, SourceType};
use bytescope_core::disasm::{InstructionRecord, disassemble, to_records};
use bytescope_utils::errors::{AnalysisError, DecodeError};
use serde::{Deserialize, Serialize};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{error, info};

/// Body of `POST /decode`.
#[derive(Debug, Deserialize, Serialize)]
pub struct DecodeRequest {
    /// Bytecode as hex (with or without 0x prefix)
    pub bytecode: String,
    /// Rendering options for the disassembly text
    #[serde(default)]
    pub disassembly: Option<DisassemblyOptions>,
}

/// Response of `POST /decode`.
#[derive(Debug, Deserialize, Serialize)]
pub struct DecodeResponse {
    /// Length, hash and origin of the input
    pub info: DecodeInfo,
    /// One wire record per instruction
    pub instructions: Vec<InstructionRecord>,
    /// Disassembly text, one line per instruction
    pub disassembly: String,
}

/// Body of `POST /analyze`.
#[derive(Debug, Deserialize, Serialize)]
pub struct AnalyzeRequest {
    /// Bytecode as hex (with or without 0x prefix)
    pub bytecode: String,
    /// Analysis options; the standard preset when absent
    #[serde(default)]
    pub config: Option<AnalysisConfig>,
}

/// JSON body returned with every 4xx/5xx status.
#[derive(Debug, Deserialize, Serialize)]
pub struct ErrorResponse {
    /// Short error category
    pub error: String,
    /// Underlying error message
    pub details: Option<String>,
}

type ApiError = (StatusCode, ResponseJson<ErrorResponse>);

fn bad_request(error: &str, details: impl ToString) -> ApiError {
    (
        StatusCode::BAD_REQUEST,
        ResponseJson(ErrorResponse {
            error: error.to_string(),
            details: Some(details.to_string()),
        }),
    )
}

fn decode_request(bytecode: &str) -> Result<DecodedBytecode, ApiError> {
    let bytes = decoder::input_to_bytes(bytecode, false)
        .map_err(|e| bad_request("Invalid hex bytecode", e))?;
    decoder::decode_bytecode_from_bytes(&bytes, SourceType::HexString).map_err(|e| match e {
        DecodeError::EmptyBytecode => bad_request("Empty bytecode", e),
        other => bad_request("Decoding failed", other),
    })
}

/// Builds the service router with tracing and permissive CORS.
pub fn app() -> Router {
    Router::new()
        .route("/", get(health_check))
        .route("/decode", post(decode_bytecode))
        .route("/analyze", post(analyze_bytecode))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods(Any)
                        .allow_headers(Any),
                ),
        )
}

async fn health_check() -> ResponseJson<serde_json::Value> {
    ResponseJson(serde_json::json!({
        "status": "healthy",
        "service": "bytescope-api",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn decode_bytecode(
    Json(request): Json<DecodeRequest>,
) -> Result<ResponseJson<DecodeResponse>, ApiError> {
    let decoded = decode_request(&request.bytecode)?;
    info!(
        "decoded {} bytes into {} instructions",
        decoded.info.byte_length,
        decoded.instructions.len()
    );

    let opts = request.disassembly.unwrap_or_default();
    Ok(ResponseJson(DecodeResponse {
        disassembly: disassemble(&decoded.instructions, &opts),
        instructions: to_records(&decoded.instructions),
        info: decoded.info,
    }))
}

async fn analyze_bytecode(
    Json(request): Json<AnalyzeRequest>,
) -> Result<ResponseJson<Report>, ApiError> {
    let decoded = decode_request(&request.bytecode)?;
    let config = request.config.unwrap_or_default();

    match analyze_concurrently(decoded, config).await {
        Ok(report) => Ok(ResponseJson(report)),
        Err(e @ AnalysisError::Decode(_)) => Err(bad_request("Decoding failed", e)),
        Err(e) => {
            error!("analysis failed: {}", e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                ResponseJson(ErrorResponse {
                    error: "Analysis failed".to_string(),
                    details: Some(e.to_string()),
                }),
            ))
        }
    }
}
