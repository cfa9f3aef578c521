//! # Formularios `application/x-www-form-urlencoded`
//! src/http/form.rs
//!
//! Decodificación de bodies tipo `a=3&b=4`.
//!
//! El decoder es tolerante: un `%` que no va seguido de dos dígitos
//! hexadecimales válidos se copia tal cual y el escaneo continúa.

/// Valor de un dígito hexadecimal ASCII
fn hex_value(byte: u8) -> Option<u8> {
    match byte {
        b'0'..=b'9' => Some(byte - b'0'),
        b'a'..=b'f' => Some(byte - b'a' + 10),
        b'A'..=b'F' => Some(byte - b'A' + 10),
        _ => None,
    }
}

/// Decodifica `+` → espacio y `%XX` → byte
///
/// # Ejemplo
/// ```
/// use pooled_http_server::http::form::percent_decode;
///
/// assert_eq!(percent_decode(b"a+b%20c"), b"a b c");
/// assert_eq!(percent_decode(b"100%zz"), b"100%zz");
/// ```
pub fn percent_decode(input: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(input.len());
    let mut i = 0;

    while i < input.len() {
        match input[i] {
            b'+' => out.push(b' '),
            b'%' => {
                let escaped = input
                    .get(i + 1)
                    .and_then(|&hi| hex_value(hi))
                    .zip(input.get(i + 2).and_then(|&lo| hex_value(lo)));

                match escaped {
                    Some((hi, lo)) => {
                        out.push((hi << 4) | lo);
                        i += 2;
                    }
                    None => out.push(b'%'),
                }
            }
            other => out.push(other),
        }
        i += 1;
    }

    out
}

/// Busca `key` en un body `k1=v1&k2=v2` y retorna su valor decodificado
///
/// Gana la primera aparición de la clave. Un par sin `=` cuenta como
/// clave con valor vacío. Los bytes no UTF-8 se reemplazan por U+FFFD.
///
/// # Ejemplo
/// ```
/// use pooled_http_server::http::form::form_value;
///
/// assert_eq!(form_value(b"b=4&a=3&a=9", "a").as_deref(), Some("3"));
/// assert_eq!(form_value(b"a=3", "b"), None);
/// ```
pub fn form_value(body: &[u8], key: &str) -> Option<String> {
    body.split(|&b| b == b'&')
        .filter(|pair| !pair.is_empty())
        .find_map(|pair| {
            let (raw_key, raw_value) = match pair.iter().position(|&b| b == b'=') {
                Some(eq) => (&pair[..eq], &pair[eq + 1..]),
                None => (pair, &pair[pair.len()..]),
            };

            if percent_decode(raw_key) == key.as_bytes() {
                Some(String::from_utf8_lossy(&percent_decode(raw_value)).into_owned())
            } else {
                None
            }
        })
}
