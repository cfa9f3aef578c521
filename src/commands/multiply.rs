//! # Multiplicación de enteros
//! src/commands/multiply.rs
//!
//! `POST /multiply` con body `a=<int>&b=<int>` (form urlencoded).
//!
//! # Ejemplo de request
//! ```text
//! POST /multiply HTTP/1.1
//! Content-Length: 7
//!
//! a=3&b=4
//! ```
//!
//! Responde `200` con `12\n`. El producto usa aritmética de 64 bits con
//! wraparound.

use crate::http::form::form_value;
use crate::http::{HttpRequest, Response, StatusCode};
use once_cell::sync::Lazy;
use regex::Regex;

/// Un entero con signo opcional y al menos un dígito
static INTEGER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[+-]?[0-9]+$").expect("integer regex is valid"));

/// Handler para `POST /multiply`
pub fn multiply_handler(req: &HttpRequest) -> Response {
    let body = req.body();

    // Obtener ambos operandos
    let (a, b) = match (form_value(body, "a"), form_value(body, "b")) {
        (Some(a), Some(b)) => (a, b),
        _ => {
            return Response::text(
                StatusCode::BadRequest,
                "Bad Request: expected a=INT&b=INT",
            );
        }
    };

    if !INTEGER_RE.is_match(&a) || !INTEGER_RE.is_match(&b) {
        return Response::text(
            StatusCode::BadRequest,
            "Bad Request: a and b must be integers",
        );
    }

    // La regex ya garantiza el formato; solo puede fallar por rango
    let (a, b) = match (a.parse::<i64>(), b.parse::<i64>()) {
        (Ok(a), Ok(b)) => (a, b),
        _ => {
            return Response::text(
                StatusCode::BadRequest,
                "Bad Request: a and b must fit in a signed 64-bit integer",
            );
        }
    };

    Response::text(StatusCode::Ok, &format!("{}\n", a.wrapping_mul(b)))
}
