use super::name::{read_name, write_name};
use super::rdata::{read_u16, NaptrData, RData};
use super::WireError;
use pac_routing_domain::{RecordClass, RecordType};

pub const HEADER_SIZE: usize = 12;

/// Largest datagram exchanged without EDNS0.
pub const MAX_UDP_PAYLOAD: usize = 512;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DnsQuestion {
    pub name: String,
    pub qtype: u16,
    pub qclass: u16,
}

impl DnsQuestion {
    pub fn new(name: impl Into<String>, qtype: RecordType) -> Self {
        Self {
            name: name.into(),
            qtype: qtype.to_u16(),
            qclass: RecordClass::IN.to_u16(),
        }
    }

    pub fn record_type(&self) -> Option<RecordType> {
        RecordType::from_u16(self.qtype)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DnsResourceRecord {
    pub name: String,
    pub rtype: u16,
    pub rclass: u16,
    pub ttl: u32,
    pub rdata: Vec<u8>,
}

impl DnsResourceRecord {
    /// IN-class record carrying the encoded form of `data`.
    pub fn new(name: impl Into<String>, ttl: u32, data: &RData) -> Result<Self, WireError> {
        Ok(Self {
            name: name.into(),
            rtype: data.type_code(),
            rclass: RecordClass::IN.to_u16(),
            ttl,
            rdata: data.encode()?,
        })
    }

    /// Same record published under another owner name.
    pub fn renamed(&self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..self.clone()
        }
    }

    pub fn data(&self) -> Result<RData, WireError> {
        RData::decode(self.rtype, &self.rdata)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DnsMessage {
    pub id: u16,
    pub qr: bool,
    pub opcode: u8,
    pub aa: bool,
    pub tc: bool,
    pub rd: bool,
    pub ra: bool,
    pub z: u8,
    pub rcode: u8,
    pub questions: Vec<DnsQuestion>,
    pub answers: Vec<DnsResourceRecord>,
    pub authorities: Vec<DnsResourceRecord>,
    pub additionals: Vec<DnsResourceRecord>,
}

impl DnsMessage {
    /// Standard recursive query for one name and type.
    pub fn query(id: u16, name: impl Into<String>, qtype: RecordType) -> Self {
        Self {
            id,
            rd: true,
            questions: vec![DnsQuestion::new(name, qtype)],
            ..Self::default()
        }
    }

    pub fn parse(buf: &[u8]) -> Result<Self, WireError> {
        if buf.len() < HEADER_SIZE {
            return Err(WireError::TooShort(buf.len()));
        }

        let id = u16::from_be_bytes([buf[0], buf[1]]);
        let flags = u16::from_be_bytes([buf[2], buf[3]]);
        let qdcount = u16::from_be_bytes([buf[4], buf[5]]);
        let ancount = u16::from_be_bytes([buf[6], buf[7]]);
        let nscount = u16::from_be_bytes([buf[8], buf[9]]);
        let arcount = u16::from_be_bytes([buf[10], buf[11]]);

        let mut pos = HEADER_SIZE;

        let mut questions = Vec::with_capacity(capacity_hint(buf, qdcount));
        for _ in 0..qdcount {
            let (name, next) = read_name(buf, pos)?;
            let qtype = read_u16(buf, next, "question type")?;
            let qclass = read_u16(buf, next + 2, "question class")?;
            pos = next + 4;
            questions.push(DnsQuestion {
                name,
                qtype,
                qclass,
            });
        }

        let answers = read_records(buf, &mut pos, ancount)?;
        let authorities = read_records(buf, &mut pos, nscount)?;
        let additionals = read_records(buf, &mut pos, arcount)?;

        Ok(Self {
            id,
            qr: flags & 0x8000 != 0,
            opcode: ((flags >> 11) & 0x0F) as u8,
            aa: flags & 0x0400 != 0,
            tc: flags & 0x0200 != 0,
            rd: flags & 0x0100 != 0,
            ra: flags & 0x0080 != 0,
            z: ((flags >> 4) & 0x07) as u8,
            rcode: (flags & 0x0F) as u8,
            questions,
            answers,
            authorities,
            additionals,
        })
    }

    /// Authoritative response skeleton for `query`: same id, opcode, RD and
    /// questions, RCODE NOERROR, no answers yet.
    pub fn response_for(query: &DnsMessage) -> Self {
        Self {
            id: query.id,
            qr: true,
            opcode: query.opcode,
            aa: true,
            rd: query.rd,
            questions: query.questions.clone(),
            ..Self::default()
        }
    }

    fn flags(&self) -> u16 {
        (u16::from(self.qr) << 15)
            | (u16::from(self.opcode & 0x0F) << 11)
            | (u16::from(self.aa) << 10)
            | (u16::from(self.tc) << 9)
            | (u16::from(self.rd) << 8)
            | (u16::from(self.ra) << 7)
            | (u16::from(self.z & 0x07) << 4)
            | u16::from(self.rcode & 0x0F)
    }

    /// Serializes the message. Section counts always come from the lists.
    pub fn to_bytes(&self) -> Result<Vec<u8>, WireError> {
        let mut out = Vec::with_capacity(MAX_UDP_PAYLOAD);

        out.extend_from_slice(&self.id.to_be_bytes());
        out.extend_from_slice(&self.flags().to_be_bytes());
        for count in [
            self.questions.len(),
            self.answers.len(),
            self.authorities.len(),
            self.additionals.len(),
        ] {
            let count = u16::try_from(count).map_err(|_| WireError::TooManyRecords)?;
            out.extend_from_slice(&count.to_be_bytes());
        }

        for question in &self.questions {
            write_name(&mut out, &question.name)?;
            out.extend_from_slice(&question.qtype.to_be_bytes());
            out.extend_from_slice(&question.qclass.to_be_bytes());
        }

        for record in self
            .answers
            .iter()
            .chain(&self.authorities)
            .chain(&self.additionals)
        {
            write_name(&mut out, &record.name)?;
            out.extend_from_slice(&record.rtype.to_be_bytes());
            out.extend_from_slice(&record.rclass.to_be_bytes());
            out.extend_from_slice(&record.ttl.to_be_bytes());
            let rdlength = u16::try_from(record.rdata.len()).map_err(|_| WireError::InvalidRdata {
                rtype: "any",
                reason: format!("{} bytes of rdata", record.rdata.len()),
            })?;
            out.extend_from_slice(&rdlength.to_be_bytes());
            out.extend_from_slice(&record.rdata);
        }

        Ok(out)
    }

    /// Serializes the message for a datagram of at most `limit` bytes.
    /// Whole records are dropped from the end (additionals, authorities,
    /// then answers) until it fits, and TC is set (RFC 1035 4.2.1).
    pub fn to_datagram(&self, limit: usize) -> Result<Vec<u8>, WireError> {
        let bytes = self.to_bytes()?;
        if bytes.len() <= limit {
            return Ok(bytes);
        }

        let mut truncated = self.clone();
        truncated.tc = true;
        while truncated.drop_last_record() {
            let bytes = truncated.to_bytes()?;
            if bytes.len() <= limit {
                return Ok(bytes);
            }
        }
        truncated.to_bytes()
    }

    fn drop_last_record(&mut self) -> bool {
        self.additionals.pop().is_some()
            || self.authorities.pop().is_some()
            || self.answers.pop().is_some()
    }
}

/// Smallest encoded question or record is 5 bytes (root name, type,
/// class), so the header count cannot pre-allocate past what the buffer
/// could hold.
fn capacity_hint(buf: &[u8], count: u16) -> usize {
    usize::from(count).min(buf.len().saturating_sub(HEADER_SIZE) / 5)
}

fn read_records(
    buf: &[u8],
    pos: &mut usize,
    count: u16,
) -> Result<Vec<DnsResourceRecord>, WireError> {
    let mut records = Vec::with_capacity(capacity_hint(buf, count));

    for _ in 0..count {
        let (name, next) = read_name(buf, *pos)?;
        let header = buf
            .get(next..next + 10)
            .ok_or(WireError::Truncated("resource record header"))?;
        let rtype = u16::from_be_bytes([header[0], header[1]]);
        let rclass = u16::from_be_bytes([header[2], header[3]]);
        let ttl = u32::from_be_bytes([header[4], header[5], header[6], header[7]]);
        let rdlength = u16::from_be_bytes([header[8], header[9]]) as usize;

        let start = next + 10;
        let end = start + rdlength;
        let raw = buf.get(start..end).ok_or(WireError::Truncated("rdata"))?;

        let rdata = match RecordType::from_u16(rtype) {
            Some(RecordType::CNAME) => {
                let (target, _) = read_name(&buf[..end], start)?;
                RData::Cname(target).encode()?
            }
            Some(RecordType::NAPTR) => RData::Naptr(NaptrData::read(buf, start, end)?).encode()?,
            _ => raw.to_vec(),
        };

        records.push(DnsResourceRecord {
            name,
            rtype,
            rclass,
            ttl,
            rdata,
        });
        *pos = end;
    }

    Ok(records)
}
