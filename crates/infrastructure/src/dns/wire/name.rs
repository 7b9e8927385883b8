use super::WireError;

const MAX_LABEL_LEN: usize = 63;

/// Upper bound on compression pointers followed while decoding one name.
pub const MAX_POINTER_HOPS: usize = 64;

/// Decodes a possibly compressed name starting at `start`.
///
/// Returns the dotted name without the trailing dot and the offset of the
/// first byte after the name at its original position. Pointers must target
/// an offset strictly before themselves, which rules out cycles.
pub(crate) fn read_name(buf: &[u8], start: usize) -> Result<(String, usize), WireError> {
    let mut labels: Vec<String> = Vec::new();
    let mut pos = start;
    let mut end: Option<usize> = None;
    let mut hops = 0usize;

    loop {
        let len = *buf.get(pos).ok_or(WireError::Truncated("name"))?;

        if len == 0 {
            break;
        }

        match len & 0xC0 {
            0xC0 => {
                let low = *buf
                    .get(pos + 1)
                    .ok_or(WireError::Truncated("compression pointer"))?;
                let target = (((len & 0x3F) as usize) << 8) | low as usize;
                if target >= pos {
                    return Err(WireError::ForwardPointer { at: pos, target });
                }
                hops += 1;
                if hops > MAX_POINTER_HOPS {
                    return Err(WireError::TooManyPointers(MAX_POINTER_HOPS));
                }
                end.get_or_insert(pos + 2);
                pos = target;
            }
            0x00 => {
                let len = len as usize;
                let label = buf
                    .get(pos + 1..pos + 1 + len)
                    .ok_or(WireError::Truncated("label"))?;
                labels.push(String::from_utf8_lossy(label).into_owned());
                pos += 1 + len;
            }
            _ => return Err(WireError::UnsupportedLabel(len)),
        }
    }

    Ok((labels.join("."), end.unwrap_or(pos + 1)))
}

/// Appends `name` in uncompressed label format. Empty labels and a trailing
/// dot are ignored, so `""` and `"."` both encode the root.
pub(crate) fn write_name(out: &mut Vec<u8>, name: &str) -> Result<(), WireError> {
    for label in name.split('.').filter(|l| !l.is_empty()) {
        if label.len() > MAX_LABEL_LEN {
            return Err(WireError::LabelTooLong(label.len()));
        }
        out.push(label.len() as u8);
        out.extend_from_slice(label.as_bytes());
    }
    out.push(0);
    Ok(())
}
