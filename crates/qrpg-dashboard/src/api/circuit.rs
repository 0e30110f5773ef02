//! Password circuit endpoint.

use axum::Json;

use qrpg_ir::Circuit;

use crate::dto::CircuitView;
use crate::error::ApiError;

/// GET /api/circuit - Diagram and OpenQASM of the password circuit.
pub async fn circuit() -> Result<Json<CircuitView>, ApiError> {
    let circuit = Circuit::password_register()?;
    let qasm = qrpg_qasm3::emit(&circuit)?;
    Ok(Json(CircuitView::new(&circuit, qasm)))
}
