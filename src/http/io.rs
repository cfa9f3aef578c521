//! # Primitivas de I/O confiables
//! src/http/io.rs
//!
//! Envoltorios sobre `Read`/`Write` que ocultan las lecturas y escrituras
//! parciales del transporte:
//!
//! - `reliable_read`: reintenta si la llamada fue interrumpida (EINTR).
//! - `reliable_write`: escribe todos los bytes o retorna error.
//!
//! El parser y el writer de respuestas solo usan estas dos funciones.

use std::io::{self, ErrorKind, Read, Write};

/// Lee una vez desde `reader`, reintentando mientras la llamada sea interrumpida
///
/// Retorna `Ok(0)` al llegar al fin del stream.
pub fn reliable_read<R: Read + ?Sized>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    loop {
        match reader.read(buf) {
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            result => return result,
        }
    }
}

/// Escribe todo `bytes` en `writer`
///
/// Las escrituras parciales avanzan un offset y continúan; las interrumpidas
/// se reintentan. Una escritura que acepta 0 bytes es un error (`WriteZero`).
///
/// # Retorna
///
/// * `Ok(n)` - Se escribieron los `n == bytes.len()` bytes
/// * `Err(e)` - Error irrecuperable del transporte
pub fn reliable_write<W: Write + ?Sized>(writer: &mut W, bytes: &[u8]) -> io::Result<usize> {
    let mut written = 0;

    while written < bytes.len() {
        match writer.write(&bytes[written..]) {
            Ok(0) => {
                return Err(io::Error::new(
                    ErrorKind::WriteZero,
                    "transport accepted zero bytes",
                ));
            }
            Ok(n) => written += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }

    Ok(written)
}
