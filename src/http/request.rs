//! # Parsing de Requests HTTP/1.1
//! src/http/request.rs
//!
//! Parser incremental que consume un stream de bytes y produce un
//! `HttpRequest` o un error de framing.
//!
//! ## Formato de un Request
//!
//! ```text
//! POST /multiply HTTP/1.1\r\n
//! Host: localhost:8080\r\n
//! Content-Length: 7\r\n
//! \r\n
//! a=3&b=4
//! ```
//!
//! ## Máquina de estados
//!
//! 1. **Headers**: acumula bytes hasta encontrar `\r\n\r\n`. Si se superan
//!    `MAX_HEADER_BYTES` sin encontrarlo, aborta con `HeaderBlockTooLarge`.
//! 2. **Body**: lee hasta completar exactamente `Content-Length` bytes.
//! 3. **Done**: el request está completo.
//!
//! Cualquier error de framing significa: no responder, cerrar la conexión.

use super::io::reliable_read;
use std::io::{self, Read};

/// Secuencia que separa headers del body
const HEADER_TERMINATOR: &[u8] = b"\r\n\r\n";

/// Máximo de bytes acumulados antes de encontrar el terminador de headers
pub const MAX_HEADER_BYTES: usize = 64 * 1024;

/// Tamaño de cada lectura del socket
const READ_CHUNK: usize = 4096;

/// Método HTTP de la request line
///
/// Los métodos que el router no conoce se conservan como `Extension`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Method {
    GET,
    HEAD,
    POST,
    PUT,
    DELETE,
    PATCH,
    OPTIONS,
    /// Cualquier otro token (ej: "PROPFIND")
    Extension(String),
}

impl Method {
    /// Convierte el token de la request line en un método
    ///
    /// Nunca falla: el token se compara de forma exacta (los métodos HTTP
    /// distinguen mayúsculas) y lo desconocido queda como `Extension`.
    pub fn from_token(token: &str) -> Self {
        match token {
            "GET" => Method::GET,
            "HEAD" => Method::HEAD,
            "POST" => Method::POST,
            "PUT" => Method::PUT,
            "DELETE" => Method::DELETE,
            "PATCH" => Method::PATCH,
            "OPTIONS" => Method::OPTIONS,
            other => Method::Extension(other.to_string()),
        }
    }

    /// Convierte el método a string
    pub fn as_str(&self) -> &str {
        match self {
            Method::GET => "GET",
            Method::HEAD => "HEAD",
            Method::POST => "POST",
            Method::PUT => "PUT",
            Method::DELETE => "DELETE",
            Method::PATCH => "PATCH",
            Method::OPTIONS => "OPTIONS",
            Method::Extension(token) => token,
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errores de framing
///
/// Todos se manejan igual: la conexión se cierra sin enviar respuesta.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// El cliente cerró antes de terminar los headers
    Incomplete,

    /// La request line no tiene exactamente 3 tokens
    MalformedRequestLine,

    /// No apareció `\r\n\r\n` dentro de `MAX_HEADER_BYTES`
    HeaderBlockTooLarge,

    /// El cliente cerró antes de completar `Content-Length` bytes de body
    BodyIncomplete { expected: usize, received: usize },

    /// `Content-Length` no es un entero decimal
    InvalidContentLength(String),

    /// Error de lectura del socket
    Io(io::ErrorKind),
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::Incomplete => write!(f, "Connection closed before end of headers"),
            ParseError::MalformedRequestLine => write!(f, "Malformed request line"),
            ParseError::HeaderBlockTooLarge => {
                write!(f, "Header block exceeds {} bytes", MAX_HEADER_BYTES)
            }
            ParseError::BodyIncomplete { expected, received } => write!(
                f,
                "Body incomplete: expected {} bytes, received {}",
                expected, received
            ),
            ParseError::InvalidContentLength(v) => write!(f, "Invalid Content-Length: {}", v),
            ParseError::Io(kind) => write!(f, "Read error: {}", kind),
        }
    }
}

impl std::error::Error for ParseError {}

/// Representa un request HTTP parseado
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    /// Método HTTP
    method: Method,

    /// URI tal como llegó (puede incluir `?query`)
    uri: String,

    /// Versión (ej: "HTTP/1.1"); no se valida
    version: String,

    /// Headers en orden de llegada, duplicados incluidos
    headers: Vec<(String, String)>,

    /// Body (exactamente `Content-Length` bytes)
    body: Vec<u8>,
}

impl HttpRequest {
    /// Parsea un request completo desde memoria
    ///
    /// Útil para tests y para handlers que reciben bytes ya leídos.
    /// Un buffer sin terminador o con body corto es `Incomplete` /
    /// `BodyIncomplete`, igual que si el cliente cerrara la conexión.
    ///
    /// # Ejemplo
    ///
    /// ```
    /// use pooled_http_server::http::HttpRequest;
    ///
    /// let request = HttpRequest::parse(b"GET /index.html?x=1 HTTP/1.1\r\n\r\n").unwrap();
    /// assert_eq!(request.path(), "/index.html");
    /// assert_eq!(request.query(), Some("x=1"));
    /// ```
    pub fn parse(buffer: &[u8]) -> Result<Self, ParseError> {
        let mut framer = RequestFramer::new();
        match framer.push(buffer)? {
            Progress::Complete(request) => Ok(request),
            Progress::NeedMore => Err(framer.end_of_stream()),
        }
    }

    /// Obtiene el método HTTP
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Obtiene la URI completa
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// Path: la URI hasta el primer `?`
    pub fn path(&self) -> &str {
        match self.uri.split_once('?') {
            Some((path, _)) => path,
            None => &self.uri,
        }
    }

    /// Query: lo que sigue al primer `?`, si existe
    pub fn query(&self) -> Option<&str> {
        self.uri.split_once('?').map(|(_, query)| query)
    }

    /// Obtiene la versión HTTP
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Obtiene todos los headers en orden
    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// Primer header con ese nombre (sin distinguir mayúsculas)
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Todos los valores de un header repetido, en orden
    pub fn headers_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.headers
            .iter()
            .filter(move |(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Obtiene el body del request
    pub fn body(&self) -> &[u8] {
        &self.body
    }
}

/// Request line + headers, antes de leer el body
#[derive(Debug)]
struct RequestHead {
    method: Method,
    uri: String,
    version: String,
    headers: Vec<(String, String)>,
}

impl RequestHead {
    /// Parsea el bloque de headers (sin el terminador)
    fn parse(block: &[u8]) -> Result<Self, ParseError> {
        let block = String::from_utf8_lossy(block);

        // `split` tolera una última línea sin `\r\n`
        let mut lines = block.split("\r\n");

        let request_line = lines.next().unwrap_or_default();
        let mut tokens = request_line.split_whitespace();
        let (method, uri, version) = match (tokens.next(), tokens.next(), tokens.next(), tokens.next()) {
            (Some(method), Some(uri), Some(version), None) => (method, uri, version),
            _ => return Err(ParseError::MalformedRequestLine),
        };

        let headers = lines
            .filter_map(|line| {
                // Una línea sin ':' se ignora
                let (name, value) = line.split_once(':')?;
                let value = value.trim_matches(|c| c == ' ' || c == '\t');
                Some((name.to_string(), value.to_string()))
            })
            .collect();

        Ok(Self {
            method: Method::from_token(method),
            uri: uri.to_string(),
            version: version.to_string(),
            headers,
        })
    }

    /// `Content-Length` declarado (0 si no hay)
    ///
    /// Si se repite, vale el último.
    fn content_length(&self) -> Result<usize, ParseError> {
        let value = self
            .headers
            .iter()
            .rev()
            .find(|(key, _)| key.eq_ignore_ascii_case("Content-Length"))
            .map(|(_, value)| value.as_str());

        match value {
            None => Ok(0),
            Some(v) => v
                .parse::<usize>()
                .map_err(|_| ParseError::InvalidContentLength(v.to_string())),
        }
    }

    fn into_request(self, body: Vec<u8>) -> HttpRequest {
        HttpRequest {
            method: self.method,
            uri: self.uri,
            version: self.version,
            headers: self.headers,
            body,
        }
    }
}

/// Fase actual del framer
#[derive(Debug)]
enum Phase {
    /// Acumulando bytes hasta `\r\n\r\n`
    Headers { buffer: Vec<u8> },

    /// Headers listos; acumulando body
    Body {
        head: RequestHead,
        expected: usize,
        body: Vec<u8>,
    },

    /// Ya se entregó el request
    Done,
}

/// Resultado de alimentar bytes al framer
#[derive(Debug)]
pub enum Progress {
    /// Faltan bytes
    NeedMore,

    /// Request completo
    Complete(HttpRequest),
}

/// Máquina de estados de framing para un único request
///
/// No hace I/O: recibe los bytes con `push` y `read_request` se encarga
/// de leer del socket.
#[derive(Debug)]
pub struct RequestFramer {
    phase: Phase,
}

impl RequestFramer {
    pub fn new() -> Self {
        Self {
            phase: Phase::Headers {
                buffer: Vec::with_capacity(8192),
            },
        }
    }

    /// Agrega bytes recién leídos y avanza la máquina
    pub fn push(&mut self, chunk: &[u8]) -> Result<Progress, ParseError> {
        match std::mem::replace(&mut self.phase, Phase::Done) {
            Phase::Headers { mut buffer } => {
                // Solo hace falta buscar desde el final anterior (menos 3 bytes)
                let search_from = buffer.len().saturating_sub(HEADER_TERMINATOR.len() - 1);
                buffer.extend_from_slice(chunk);

                let Some(offset) = find_terminator(&buffer[search_from..]) else {
                    if buffer.len() > MAX_HEADER_BYTES {
                        return Err(ParseError::HeaderBlockTooLarge);
                    }
                    self.phase = Phase::Headers { buffer };
                    return Ok(Progress::NeedMore);
                };

                let header_end = search_from + offset;
                let head = RequestHead::parse(&buffer[..header_end])?;
                let expected = head.content_length()?;

                // Bytes de body que llegaron junto con los headers
                let body = buffer.split_off(header_end + HEADER_TERMINATOR.len());
                self.advance_body(head, expected, body)
            }
            Phase::Body {
                head,
                expected,
                mut body,
            } => {
                body.extend_from_slice(chunk);
                self.advance_body(head, expected, body)
            }
            Phase::Done => Ok(Progress::NeedMore),
        }
    }

    fn advance_body(
        &mut self,
        head: RequestHead,
        expected: usize,
        mut body: Vec<u8>,
    ) -> Result<Progress, ParseError> {
        if body.len() >= expected {
            body.truncate(expected);
            return Ok(Progress::Complete(head.into_request(body)));
        }

        self.phase = Phase::Body {
            head,
            expected,
            body,
        };
        Ok(Progress::NeedMore)
    }

    /// Cuántos bytes de body faltan, si ya se pasaron los headers
    pub fn body_remaining(&self) -> Option<usize> {
        match &self.phase {
            Phase::Body { expected, body, .. } => Some(expected - body.len()),
            _ => None,
        }
    }

    /// Error correspondiente a que el stream terminó en la fase actual
    pub fn end_of_stream(&self) -> ParseError {
        match &self.phase {
            Phase::Body { expected, body, .. } => ParseError::BodyIncomplete {
                expected: *expected,
                received: body.len(),
            },
            _ => ParseError::Incomplete,
        }
    }
}

impl Default for RequestFramer {
    fn default() -> Self {
        Self::new()
    }
}

fn find_terminator(haystack: &[u8]) -> Option<usize> {
    haystack
        .windows(HEADER_TERMINATOR.len())
        .position(|window| window == HEADER_TERMINATOR)
}

/// Lee un request completo desde `stream`
///
/// Usa `reliable_read` para cada lectura. Un fin de stream o un error antes
/// de completar el request es un error de framing.
pub fn read_request<R: Read + ?Sized>(stream: &mut R) -> Result<HttpRequest, ParseError> {
    let mut framer = RequestFramer::new();
    let mut chunk = [0u8; READ_CHUNK];

    loop {
        // En la fase de body no se lee más de lo declarado
        let want = framer
            .body_remaining()
            .map_or(READ_CHUNK, |remaining| remaining.clamp(1, READ_CHUNK));

        let n = reliable_read(stream, &mut chunk[..want]).map_err(|e| ParseError::Io(e.kind()))?;
        if n == 0 {
            return Err(framer.end_of_stream());
        }

        if let Progress::Complete(request) = framer.push(&chunk[..n])? {
            return Ok(request);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    /// Reader que entrega los bytes de a `step` por lectura
    struct Trickle {
        data: Vec<u8>,
        pos: usize,
        step: usize,
    }

    impl Read for Trickle {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            let n = self.step.min(buf.len()).min(self.data.len() - self.pos);
            buf[..n].copy_from_slice(&self.data[self.pos..self.pos + n]);
            self.pos += n;
            Ok(n)
        }
    }

    fn post_with_body(len: usize) -> Vec<u8> {
        let mut raw = format!("POST /upload HTTP/1.1\r\nContent-Length: {}\r\n\r\n", len).into_bytes();
        raw.extend(std::iter::repeat(b'x').take(len));
        raw
    }

    #[test]
    fn test_parse_simple_get() {
        let request = HttpRequest::parse(b"GET / HTTP/1.1\r\n\r\n").unwrap();

        assert_eq!(request.method(), &Method::GET);
        assert_eq!(request.uri(), "/");
        assert_eq!(request.version(), "HTTP/1.1");
        assert!(request.headers().is_empty());
        assert!(request.body().is_empty());
    }

    #[test]
    fn test_path_and_query_split_at_first_question_mark() {
        let request = HttpRequest::parse(b"GET /a?b=1?c HTTP/1.1\r\n\r\n").unwrap();
        assert_eq!(request.path(), "/a");
        assert_eq!(request.query(), Some("b=1?c"));

        let request = HttpRequest::parse(b"GET /plain HTTP/1.1\r\n\r\n").unwrap();
        assert_eq!(request.query(), None);
    }

    #[test]
    fn test_headers_order_duplicates_and_case() {
        let raw = b"GET / HTTP/1.1\r\nHost: localhost\r\nX-A: 1\r\nx-a:\t 2 \t\r\n\r\n";
        let request = HttpRequest::parse(raw).unwrap();

        assert_eq!(request.headers().len(), 3);
        assert_eq!(request.headers()[0], ("Host".to_string(), "localhost".to_string()));
        assert_eq!(request.header("HOST"), Some("localhost"));
        assert_eq!(request.header("X-a"), Some("1"));
        assert_eq!(request.headers_named("X-a").collect::<Vec<_>>(), vec!["1", "2"]);
    }

    #[test]
    fn test_header_value_keeps_inner_colons() {
        let raw = b"GET / HTTP/1.1\r\nHost: example.com:8080\r\n\r\n";
        let request = HttpRequest::parse(raw).unwrap();
        assert_eq!(request.header("host"), Some("example.com:8080"));
    }

    #[test]
    fn test_line_without_colon_is_ignored() {
        let raw = b"GET / HTTP/1.1\r\ngarbage\r\nHost: h\r\n\r\n";
        let request = HttpRequest::parse(raw).unwrap();
        assert_eq!(request.headers().len(), 1);
    }

    #[test]
    fn test_unknown_method_is_kept() {
        let request = HttpRequest::parse(b"BREW /pot HTTP/1.1\r\n\r\n").unwrap();
        assert_eq!(request.method(), &Method::Extension("BREW".to_string()));
        assert_eq!(request.method().as_str(), "BREW");
    }

    #[test]
    fn test_request_line_token_count() {
        assert_eq!(
            HttpRequest::parse(b"GET /\r\n\r\n").unwrap_err(),
            ParseError::MalformedRequestLine
        );
        assert_eq!(
            HttpRequest::parse(b"GET / HTTP/1.1 extra\r\n\r\n").unwrap_err(),
            ParseError::MalformedRequestLine
        );
        assert_eq!(
            HttpRequest::parse(b"\r\n\r\n").unwrap_err(),
            ParseError::MalformedRequestLine
        );
    }

    #[test]
    fn test_missing_terminator_is_incomplete() {
        assert_eq!(
            HttpRequest::parse(b"GET / HTTP/1.1\r\nHost: x\r\n").unwrap_err(),
            ParseError::Incomplete
        );
        assert_eq!(HttpRequest::parse(b"").unwrap_err(), ParseError::Incomplete);
    }

    #[test]
    fn test_body_lengths() {
        for len in [0usize, 1, 65535] {
            let raw = post_with_body(len);
            let request = read_request(&mut Cursor::new(raw)).unwrap();
            assert_eq!(request.body().len(), len, "Content-Length {}", len);
        }
    }

    #[test]
    fn test_body_over_many_small_reads() {
        let mut stream = Trickle {
            data: post_with_body(10_000),
            pos: 0,
            step: 7,
        };
        let request = read_request(&mut stream).unwrap();
        assert_eq!(request.body().len(), 10_000);
        assert_eq!(request.path(), "/upload");
    }

    #[test]
    fn test_content_length_case_insensitive() {
        let raw = b"POST /multiply HTTP/1.1\r\ncontent-length: 7\r\n\r\na=3&b=4";
        let request = HttpRequest::parse(raw).unwrap();
        assert_eq!(request.body(), b"a=3&b=4");
    }

    #[test]
    fn test_repeated_content_length_uses_last() {
        let raw = b"POST /m HTTP/1.1\r\nContent-Length: 1\r\ncontent-length: 3\r\n\r\nabc";
        let request = HttpRequest::parse(raw).unwrap();
        assert_eq!(request.body(), b"abc");

        let raw = b"POST /m HTTP/1.1\r\nContent-Length: 3\r\nContent-Length: 1\r\n\r\nabc";
        assert_eq!(HttpRequest::parse(raw).unwrap().body(), b"a");
    }

    #[test]
    fn test_extra_bytes_after_body_are_dropped() {
        let raw = b"POST /m HTTP/1.1\r\nContent-Length: 3\r\n\r\nabcdef";
        let request = HttpRequest::parse(raw).unwrap();
        assert_eq!(request.body(), b"abc");
    }

    #[test]
    fn test_body_incomplete() {
        let raw = b"POST /m HTTP/1.1\r\nContent-Length: 10\r\n\r\nabc";
        let err = read_request(&mut Cursor::new(raw.to_vec())).unwrap_err();
        assert_eq!(
            err,
            ParseError::BodyIncomplete {
                expected: 10,
                received: 3
            }
        );
    }

    #[test]
    fn test_invalid_content_length() {
        let raw = b"POST /m HTTP/1.1\r\nContent-Length: ten\r\n\r\n";
        assert_eq!(
            HttpRequest::parse(raw).unwrap_err(),
            ParseError::InvalidContentLength("ten".to_string())
        );
    }

    #[test]
    fn test_header_block_too_large() {
        let mut raw = b"GET / HTTP/1.1\r\nX-Big: ".to_vec();
        raw.extend(std::iter::repeat(b'a').take(MAX_HEADER_BYTES + 10));

        let err = read_request(&mut Cursor::new(raw)).unwrap_err();
        assert_eq!(err, ParseError::HeaderBlockTooLarge);
    }

    #[test]
    fn test_terminator_split_across_reads() {
        let mut framer = RequestFramer::new();
        assert!(matches!(framer.push(b"GET / HTTP/1.1\r\n\r").unwrap(), Progress::NeedMore));
        match framer.push(b"\n").unwrap() {
            Progress::Complete(request) => assert_eq!(request.path(), "/"),
            Progress::NeedMore => panic!("request should be complete"),
        }
    }

    #[test]
    fn test_framer_reports_body_remaining() {
        let mut framer = RequestFramer::new();
        assert_eq!(framer.body_remaining(), None);
        framer
            .push(b"POST / HTTP/1.1\r\nContent-Length: 5\r\n\r\nab")
            .unwrap();
        assert_eq!(framer.body_remaining(), Some(3));
        assert_eq!(
            framer.end_of_stream(),
            ParseError::BodyIncomplete {
                expected: 5,
                received: 2
            }
        );
    }

    #[test]
    fn test_read_error_is_reported() {
        struct Broken;
        impl Read for Broken {
            fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
                Err(io::Error::from(io::ErrorKind::ConnectionReset))
            }
        }

        assert_eq!(
            read_request(&mut Broken).unwrap_err(),
            ParseError::Io(io::ErrorKind::ConnectionReset)
        );
    }
}
