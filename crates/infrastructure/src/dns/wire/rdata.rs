use super::name::{read_name, write_name};
use super::WireError;
use pac_routing_domain::RecordType;
use std::net::{Ipv4Addr, Ipv6Addr};

/// NAPTR record payload (RFC 3403 §4.1).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NaptrData {
    pub order: u16,
    pub preference: u16,
    pub flags: String,
    pub services: String,
    pub regexp: String,
    pub replacement: String,
}

impl NaptrData {
    /// Reads NAPTR rdata spanning `start..end` of `buf`. The replacement
    /// name may be compressed against the rest of the packet.
    pub(crate) fn read(buf: &[u8], start: usize, end: usize) -> Result<Self, WireError> {
        let rdata = buf.get(..end).ok_or(WireError::Truncated("NAPTR rdata"))?;
        let order = read_u16(rdata, start, "NAPTR order")?;
        let preference = read_u16(rdata, start + 2, "NAPTR preference")?;
        let mut pos = start + 4;
        let flags = read_character_string(rdata, &mut pos)?;
        let services = read_character_string(rdata, &mut pos)?;
        let regexp = read_character_string(rdata, &mut pos)?;
        let (replacement, _) = read_name(rdata, pos)?;

        Ok(Self {
            order,
            preference,
            flags,
            services,
            regexp,
            replacement,
        })
    }

    /// URL carried by the regexp substitution, e.g. `!^.*$!https://smp!`
    /// yields `https://smp`. Only catch-all patterns are understood.
    pub fn smp_url(&self) -> Option<&str> {
        let delim = self.regexp.chars().next()?;
        let body = &self.regexp[delim.len_utf8()..];
        let mut parts = body.split(delim);
        let pattern = parts.next()?;
        let replacement = parts.next()?;
        let trailer = parts.next()?;

        if !matches!(pattern, "^.*$" | ".*") || !trailer.is_empty() || parts.next().is_some() {
            return None;
        }
        if replacement.is_empty() {
            return None;
        }
        Some(replacement)
    }
}

/// Typed view over the record payloads the system produces and consumes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RData {
    A(Ipv4Addr),
    Aaaa(Ipv6Addr),
    Txt(Vec<String>),
    Cname(String),
    Naptr(NaptrData),
    Unknown { rtype: u16, data: Vec<u8> },
}

impl RData {
    pub fn type_code(&self) -> u16 {
        match self {
            RData::A(_) => RecordType::A.to_u16(),
            RData::Aaaa(_) => RecordType::AAAA.to_u16(),
            RData::Txt(_) => RecordType::TXT.to_u16(),
            RData::Cname(_) => RecordType::CNAME.to_u16(),
            RData::Naptr(_) => RecordType::NAPTR.to_u16(),
            RData::Unknown { rtype, .. } => *rtype,
        }
    }

    pub fn encode(&self) -> Result<Vec<u8>, WireError> {
        let mut out = Vec::new();
        match self {
            RData::A(addr) => out.extend_from_slice(&addr.octets()),
            RData::Aaaa(addr) => out.extend_from_slice(&addr.octets()),
            RData::Txt(strings) => {
                for s in strings {
                    write_character_string(&mut out, s)?;
                }
            }
            RData::Cname(target) => write_name(&mut out, target)?,
            RData::Naptr(naptr) => {
                out.extend_from_slice(&naptr.order.to_be_bytes());
                out.extend_from_slice(&naptr.preference.to_be_bytes());
                write_character_string(&mut out, &naptr.flags)?;
                write_character_string(&mut out, &naptr.services)?;
                write_character_string(&mut out, &naptr.regexp)?;
                write_name(&mut out, &naptr.replacement)?;
            }
            RData::Unknown { data, .. } => out.extend_from_slice(data),
        }
        Ok(out)
    }

    /// Decodes self-contained rdata (no compression pointers).
    pub fn decode(rtype: u16, data: &[u8]) -> Result<Self, WireError> {
        match RecordType::from_u16(rtype) {
            Some(RecordType::A) => {
                let octets: [u8; 4] = data.try_into().map_err(|_| WireError::InvalidRdata {
                    rtype: "A",
                    reason: format!("expected 4 bytes, got {}", data.len()),
                })?;
                Ok(RData::A(Ipv4Addr::from(octets)))
            }
            Some(RecordType::AAAA) => {
                let octets: [u8; 16] = data.try_into().map_err(|_| WireError::InvalidRdata {
                    rtype: "AAAA",
                    reason: format!("expected 16 bytes, got {}", data.len()),
                })?;
                Ok(RData::Aaaa(Ipv6Addr::from(octets)))
            }
            Some(RecordType::TXT) => {
                let mut strings = Vec::new();
                let mut pos = 0;
                while pos < data.len() {
                    strings.push(read_character_string(data, &mut pos)?);
                }
                Ok(RData::Txt(strings))
            }
            Some(RecordType::CNAME) => Ok(RData::Cname(read_name(data, 0)?.0)),
            Some(RecordType::NAPTR) => Ok(RData::Naptr(NaptrData::read(data, 0, data.len())?)),
            _ => Ok(RData::Unknown {
                rtype,
                data: data.to_vec(),
            }),
        }
    }
}

pub(crate) fn read_u16(buf: &[u8], pos: usize, what: &'static str) -> Result<u16, WireError> {
    buf.get(pos..pos + 2)
        .map(|b| u16::from_be_bytes([b[0], b[1]]))
        .ok_or(WireError::Truncated(what))
}

fn read_character_string(buf: &[u8], pos: &mut usize) -> Result<String, WireError> {
    let len = *buf
        .get(*pos)
        .ok_or(WireError::Truncated("character string"))? as usize;
    let bytes = buf
        .get(*pos + 1..*pos + 1 + len)
        .ok_or(WireError::Truncated("character string"))?;
    *pos += 1 + len;
    Ok(String::from_utf8_lossy(bytes).into_owned())
}

fn write_character_string(out: &mut Vec<u8>, s: &str) -> Result<(), WireError> {
    let len = u8::try_from(s.len()).map_err(|_| WireError::StringTooLong(s.len()))?;
    out.push(len);
    out.extend_from_slice(s.as_bytes());
    Ok(())
}
