//! # Módulo HTTP
//!
//! Subconjunto estricto de HTTP/1.1 implementado desde cero:
//!
//! - Lectura/escritura confiable sobre el socket
//! - Framing y parsing de requests (headers + body por `Content-Length`)
//! - Construcción de responses
//! - Decodificación de formularios
//!
//! ## Lo que NO se soporta
//!
//! - Conexiones persistentes: toda respuesta lleva `Connection: close`
//! - Chunked transfer encoding
//! - `Expect: 100-continue`
//!
//! ### Formato de Response
//!
//! ```text
//! HTTP/1.1 200 OK\r\n
//! Content-Type: text/plain\r\n
//! Content-Length: 3\r\n
//! Connection: close\r\n
//! \r\n
//! 12
//! ```

pub mod form;      // Formularios urlencoded
pub mod io;        // Lecturas/escrituras confiables
pub mod request;   // Parsing de HTTP requests
pub mod response;  // Construcción de HTTP responses
pub mod status;    // Códigos de estado HTTP

// Re-exportamos los tipos principales para facilitar su uso
pub use request::{read_request, HttpRequest, Method, ParseError};
pub use response::Response;
pub use status::StatusCode;
