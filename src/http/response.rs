//! # Construcción de Respuestas HTTP
//! src/http/response.rs
//!
//! Descriptor de respuesta que arman los handlers y que el writer serializa
//! una sola vez hacia el socket.
//!
//! ## Formato en el cable
//!
//! ```text
//! HTTP/1.1 301 Moved Permanently\r\n
//! Content-Type: text/plain\r\n
//! Content-Length: 17\r\n
//! Location: https://google.com\r\n
//! Connection: close\r\n
//! \r\n
//! Moved Permanently
//! ```
//!
//! El orden es fijo: status line, `Content-Type`, `Content-Length`, headers
//! extra del handler (en el orden en que se agregaron) y `Connection: close`.

use super::io::reliable_write;
use super::StatusCode;
use std::io::{self, Write};

/// Representa una respuesta HTTP/1.1 completa
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// Código de estado HTTP (200, 404, etc.)
    status: StatusCode,

    /// Valor del header `Content-Type`
    content_type: String,

    /// Headers adicionales (ej: `Location`), en orden de inserción
    extra_headers: Vec<(String, String)>,

    /// Cuerpo de la respuesta (puede ser vacío)
    body: Vec<u8>,
}

impl Response {
    /// Crea una respuesta `text/plain` sin body
    ///
    /// # Ejemplo
    /// ```
    /// use pooled_http_server::http::{Response, StatusCode};
    ///
    /// let response = Response::new(StatusCode::Ok);
    /// assert!(response.body().is_empty());
    /// ```
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            content_type: "text/plain".to_string(),
            extra_headers: Vec::new(),
            body: Vec::new(),
        }
    }

    /// Respuesta de texto plano con el body dado
    pub fn text(status: StatusCode, body: &str) -> Self {
        Self::new(status).with_body(body)
    }

    /// Respuesta cuyo body es el reason phrase del código
    ///
    /// Se usa para 403, 404 y 405: el body coincide con el texto de razón.
    ///
    /// # Ejemplo
    /// ```
    /// use pooled_http_server::http::{Response, StatusCode};
    ///
    /// let response = Response::reason(StatusCode::NotFound);
    /// assert_eq!(response.body(), b"Not Found");
    /// ```
    pub fn reason(status: StatusCode) -> Self {
        Self::text(status, status.reason_phrase())
    }

    /// Respuesta 200 `text/html`
    pub fn html(body: &str) -> Self {
        Self::new(StatusCode::Ok)
            .with_content_type("text/html")
            .with_body(body)
    }

    /// Cambia el `Content-Type`
    pub fn with_content_type(mut self, content_type: &str) -> Self {
        self.content_type = content_type.to_string();
        self
    }

    /// Agrega un header extra
    ///
    /// Los duplicados se conservan; se emiten en el orden de inserción.
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.extra_headers.push((name.to_string(), value.to_string()));
        self
    }

    /// Establece el cuerpo de la respuesta desde un string
    pub fn with_body(self, body: &str) -> Self {
        self.with_body_bytes(body.as_bytes().to_vec())
    }

    /// Establece el cuerpo de la respuesta desde bytes
    pub fn with_body_bytes(mut self, body: Vec<u8>) -> Self {
        self.body = body;
        self
    }

    /// Convierte la respuesta a bytes listos para enviar por el socket
    ///
    /// `Content-Length` se calcula siempre desde el body y
    /// `Connection: close` se agrega siempre al final de los headers.
    ///
    /// # Ejemplo
    /// ```
    /// use pooled_http_server::http::{Response, StatusCode};
    ///
    /// let bytes = Response::text(StatusCode::Ok, "12\n").to_bytes();
    /// assert_eq!(
    ///     bytes,
    ///     b"HTTP/1.1 200 OK\r\nContent-Type: text/plain\r\nContent-Length: 3\r\nConnection: close\r\n\r\n12\n"
    /// );
    /// ```
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut head = format!(
            "HTTP/1.1 {}\r\nContent-Type: {}\r\nContent-Length: {}\r\n",
            self.status,
            self.content_type,
            self.body.len()
        );

        for (name, value) in &self.extra_headers {
            head.push_str(name);
            head.push_str(": ");
            head.push_str(value);
            head.push_str("\r\n");
        }

        head.push_str("Connection: close\r\n\r\n");

        let mut result = Vec::with_capacity(head.len() + self.body.len());
        result.extend_from_slice(head.as_bytes());
        result.extend_from_slice(&self.body);
        result
    }

    /// Serializa y escribe la respuesta completa como un único buffer
    pub fn write_to<W: Write + ?Sized>(&self, writer: &mut W) -> io::Result<()> {
        reliable_write(writer, &self.to_bytes())?;
        writer.flush()
    }

    /// Obtiene el código de estado de la respuesta
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Obtiene el `Content-Type`
    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    /// Busca un header extra por nombre (sin distinguir mayúsculas)
    pub fn header(&self, name: &str) -> Option<&str> {
        self.extra_headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Obtiene los headers extra
    pub fn extra_headers(&self) -> &[(String, String)] {
        &self.extra_headers
    }

    /// Obtiene una referencia al body
    pub fn body(&self) -> &[u8] {
        &self.body
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_response() {
        let response = Response::new(StatusCode::Ok);
        assert_eq!(response.status(), StatusCode::Ok);
        assert_eq!(response.content_type(), "text/plain");
        assert!(response.extra_headers().is_empty());
        assert!(response.body().is_empty());
    }

    #[test]
    fn test_reason_body() {
        let response = Response::reason(StatusCode::MethodNotAllowed);
        assert_eq!(response.body(), b"Method Not Allowed");
    }

    #[test]
    fn test_header_order_on_wire() {
        let response = Response::text(StatusCode::MovedPermanently, "Moved Permanently")
            .with_header("Location", "https://google.com");

        let text = String::from_utf8(response.to_bytes()).unwrap();
        assert_eq!(
            text,
            "HTTP/1.1 301 Moved Permanently\r\n\
             Content-Type: text/plain\r\n\
             Content-Length: 17\r\n\
             Location: https://google.com\r\n\
             Connection: close\r\n\
             \r\n\
             Moved Permanently"
        );
    }

    #[test]
    fn test_duplicate_extra_headers_kept() {
        let response = Response::new(StatusCode::Ok)
            .with_header("X-Tag", "a")
            .with_header("X-Tag", "b");

        let text = String::from_utf8(response.to_bytes()).unwrap();
        let first = text.find("X-Tag: a\r\n").unwrap();
        let second = text.find("X-Tag: b\r\n").unwrap();
        assert!(first < second);
        assert_eq!(response.header("x-tag"), Some("a"));
    }

    #[test]
    fn test_empty_body_response() {
        let text = String::from_utf8(Response::new(StatusCode::Ok).to_bytes()).unwrap();
        assert!(text.contains("Content-Length: 0\r\n"));
        assert!(text.ends_with("Connection: close\r\n\r\n"));
    }

    #[test]
    fn test_html_response() {
        let response = Response::html("<h1>hi</h1>");
        assert_eq!(response.content_type(), "text/html");
        assert_eq!(response.status(), StatusCode::Ok);
    }

    #[test]
    fn test_content_length_counts_bytes() {
        let response = Response::new(StatusCode::Ok).with_body_bytes(vec![0xC3, 0xB1, 0x00, 0xFF]);
        let bytes = response.to_bytes();
        let text = String::from_utf8_lossy(&bytes);
        assert!(text.contains("Content-Length: 4\r\n"));
        assert!(bytes.ends_with(&[0xC3, 0xB1, 0x00, 0xFF]));
    }

    #[test]
    fn test_write_to() {
        let response = Response::reason(StatusCode::Forbidden);
        let mut out = Vec::new();
        response.write_to(&mut out).unwrap();
        assert_eq!(out, response.to_bytes());
    }
}
