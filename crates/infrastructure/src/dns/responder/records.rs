use super::ResponderError;
use crate::dns::wire::{DnsMessage, DnsQuestion, DnsResourceRecord, NaptrData, RData};
use pac_routing_domain::config::{LocalRecordConfig, ResponderConfig};
use pac_routing_domain::{compute_sml_hostname, PeppolScheme, RecordClass, RecordType};
use std::collections::BTreeMap;
use std::net::{Ipv4Addr, Ipv6Addr};
use std::str::FromStr;

const SAMPLE_TTL: u32 = 300;

/// Read-only record table consulted by the responder.
///
/// Exact names are matched case-insensitively. Names ending in
/// `.{wildcard_suffix}` fall back to the wildcard bucket, whose records are
/// answered under the queried name.
#[derive(Debug, Clone, Default)]
pub struct RecordTable {
    exact: BTreeMap<String, Vec<DnsResourceRecord>>,
    wildcard_suffix: Option<String>,
    wildcard: Vec<DnsResourceRecord>,
}

impl RecordTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, record: DnsResourceRecord) {
        let key = normalize(&record.name);
        self.exact.entry(key).or_default().push(record);
    }

    pub fn with_record(
        mut self,
        name: &str,
        ttl: u32,
        data: RData,
    ) -> Result<Self, ResponderError> {
        self.insert(DnsResourceRecord::new(name, ttl, &data)?);
        Ok(self)
    }

    /// Answers every name under `suffix` with `data`.
    pub fn with_wildcard(
        mut self,
        suffix: &str,
        ttl: u32,
        data: RData,
    ) -> Result<Self, ResponderError> {
        let suffix = normalize(suffix);
        let record = DnsResourceRecord::new(format!("*.{}", suffix), ttl, &data)?;
        self.wildcard_suffix = Some(suffix);
        self.wildcard.push(record);
        Ok(self)
    }

    /// Publishes the SMP of a participant the way the SML does: a `U` NAPTR
    /// with a catch-all regexp under the participant's hashed hostname.
    pub fn with_participant(
        self,
        sml_zone: &str,
        scheme_id: &str,
        participant_id: &str,
        smp_url: &str,
    ) -> Result<Self, ResponderError> {
        let hostname = compute_sml_hostname(sml_zone, scheme_id, participant_id);
        self.with_record(
            &hostname,
            SAMPLE_TTL,
            RData::Naptr(NaptrData {
                order: 100,
                preference: 10,
                flags: "U".to_string(),
                services: "Meta:SMP".to_string(),
                regexp: format!("!^.*$!{}!", smp_url),
                replacement: ".".to_string(),
            }),
        )
    }

    /// The fixed example.com records plus the `*.test` wildcard.
    pub fn sample() -> Result<Self, ResponderError> {
        Self::new()
            .with_samples()?
            .with_wildcard("test", SAMPLE_TTL, RData::A(Ipv4Addr::new(192, 168, 1, 100)))
    }

    fn with_samples(self) -> Result<Self, ResponderError> {
        self.with_record("example.com", SAMPLE_TTL, RData::A(Ipv4Addr::LOCALHOST))?
            .with_record("ipv6.example.com", SAMPLE_TTL, RData::Aaaa(Ipv6Addr::LOCALHOST))?
            .with_record(
                "txt.example.com",
                SAMPLE_TTL,
                RData::Txt(vec!["Hello DNS Server!".into(), "v=1.0".into()]),
            )?
            .with_record(
                "naptr.example.com",
                SAMPLE_TTL,
                service_naptr(10, 50, "SIP+D2U", "_sip._udp.example.com"),
            )?
            .with_record(
                "naptr.example.com",
                SAMPLE_TTL,
                service_naptr(20, 100, "SIP+D2T", "_sip._tcp.example.com"),
            )?
            .with_record(
                "peppol.example.com",
                SAMPLE_TTL,
                service_naptr(10, 100, "PEPPOL-AS4", "_peppol-as4._tcp.peppol.example.com"),
            )?
            .with_record(
                "peppol.example.com",
                SAMPLE_TTL,
                service_naptr(20, 50, "PEPPOL-SMP", "_peppol-smp._tcp.peppol.example.com"),
            )
    }

    pub fn from_config(config: &ResponderConfig) -> Result<Self, ResponderError> {
        let mut table = if config.include_samples {
            Self::new().with_samples()?
        } else {
            Self::new()
        };

        if !config.wildcard_suffix.is_empty() {
            let address = Ipv4Addr::from_str(&config.wildcard_address).map_err(|e| {
                ResponderError::InvalidRecord {
                    name: format!("*.{}", config.wildcard_suffix),
                    record_type: "A".to_string(),
                    reason: e.to_string(),
                }
            })?;
            table = table.with_wildcard(&config.wildcard_suffix, SAMPLE_TTL, RData::A(address))?;
        }

        for record in &config.records {
            let data = record_data(record)?;
            table = table.with_record(&record.name, record.ttl, data)?;
        }

        for participant in &config.participants {
            let scheme = PeppolScheme::from_str(&participant.scheme)
                .map(|s| s.code().to_string())
                .unwrap_or_else(|_| participant.scheme.clone());
            table = table.with_participant(
                &config.sml_zone,
                &scheme,
                &participant.id,
                &participant.smp_url,
            )?;
        }

        Ok(table)
    }

    /// Records of type `qtype` for `name`, exact match first, then wildcard.
    pub fn find(&self, name: &str, qtype: u16) -> Vec<DnsResourceRecord> {
        let key = normalize(name);

        if let Some(records) = self.exact.get(&key) {
            let matching: Vec<_> = records
                .iter()
                .filter(|r| r.rtype == qtype)
                .cloned()
                .collect();
            if !matching.is_empty() {
                return matching;
            }
        }

        match &self.wildcard_suffix {
            Some(suffix) if key.ends_with(&format!(".{}", suffix)) => self
                .wildcard
                .iter()
                .filter(|r| r.rtype == qtype)
                .map(|r| r.renamed(name))
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Answers for one question. Only class IN is served; a miss on any
    /// type other than CNAME falls back to the name's CNAME records.
    pub fn answer(&self, question: &DnsQuestion) -> Vec<DnsResourceRecord> {
        if question.qclass != RecordClass::IN.to_u16() {
            return Vec::new();
        }

        let records = self.find(&question.name, question.qtype);
        let cname = RecordType::CNAME.to_u16();
        if records.is_empty() && question.qtype != cname {
            return self.find(&question.name, cname);
        }
        records
    }

    /// Full response to `query`. The RCODE stays NOERROR even when nothing
    /// matched.
    pub fn respond(&self, query: &DnsMessage) -> DnsMessage {
        let mut response = DnsMessage::response_for(query);
        for question in &query.questions {
            response.answers.extend(self.answer(question));
        }
        response
    }

    /// `(name, type)` pairs, sorted by name, for startup logging.
    pub fn summary(&self) -> Vec<(String, String)> {
        let exact = self.exact.iter().flat_map(|(name, records)| {
            records
                .iter()
                .map(move |r| (name.clone(), RecordType::describe(r.rtype)))
        });
        let wildcard = self
            .wildcard
            .iter()
            .map(|r| (r.name.clone(), RecordType::describe(r.rtype)));
        exact.chain(wildcard).collect()
    }

    pub fn len(&self) -> usize {
        self.exact.values().map(Vec::len).sum::<usize>() + self.wildcard.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn normalize(name: &str) -> String {
    name.trim_end_matches('.').to_ascii_lowercase()
}

fn service_naptr(order: u16, preference: u16, services: &str, replacement: &str) -> RData {
    RData::Naptr(NaptrData {
        order,
        preference,
        flags: "S".to_string(),
        services: services.to_string(),
        regexp: String::new(),
        replacement: replacement.to_string(),
    })
}

fn record_data(record: &LocalRecordConfig) -> Result<RData, ResponderError> {
    let invalid = |reason: String| ResponderError::InvalidRecord {
        name: record.name.clone(),
        record_type: record.record_type.clone(),
        reason,
    };
    let value = || {
        record
            .value
            .clone()
            .ok_or_else(|| invalid("missing value".to_string()))
    };

    let record_type = RecordType::from_str(&record.record_type).map_err(invalid)?;

    match record_type {
        RecordType::A => Ipv4Addr::from_str(&value()?)
            .map(RData::A)
            .map_err(|e| invalid(e.to_string())),
        RecordType::AAAA => Ipv6Addr::from_str(&value()?)
            .map(RData::Aaaa)
            .map_err(|e| invalid(e.to_string())),
        RecordType::CNAME => Ok(RData::Cname(value()?)),
        RecordType::TXT => {
            let mut strings = record.strings.clone();
            if let Some(v) = &record.value {
                strings.insert(0, v.clone());
            }
            if strings.is_empty() {
                return Err(invalid("missing value".to_string()));
            }
            Ok(RData::Txt(strings))
        }
        RecordType::NAPTR => {
            let naptr = record
                .naptr
                .as_ref()
                .ok_or_else(|| invalid("missing naptr fields".to_string()))?;
            Ok(RData::Naptr(NaptrData {
                order: naptr.order,
                preference: naptr.preference,
                flags: naptr.flags.clone(),
                services: naptr.services.clone(),
                regexp: naptr.regexp.clone(),
                replacement: naptr.replacement.clone(),
            }))
        }
        other => Err(invalid(format!("{} records are not served", other))),
    }
}
